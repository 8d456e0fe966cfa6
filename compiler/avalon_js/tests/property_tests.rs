//! Property-based tests for control-flow lowering.
//!
//! Random nestings of `if`, `while`, `for`, `try`, `break`, `continue` and
//! `yield` are lowered and checked for:
//! 1. Label integrity: labels are 1..=n, each defined once, and every
//!    transfer targets a defined label.
//! 2. Determinism: two fresh compilers emit identical text.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::doc_markdown,
    clippy::redundant_closure_for_method_calls,
    reason = "Proptest macros generate code with these patterns"
)]

use std::sync::Arc;

use avalon_ir::build::*;
use avalon_ir::{ModuleScope, ObjectId, SourceObject, Stmt};
use avalon_js::{Compiler, Label, Op};
use proptest::prelude::*;

// -- Body Generation Strategies --

#[derive(Clone, Debug)]
enum Shape {
    Pass,
    Break,
    Continue,
    Yield,
    If(Vec<Shape>, Vec<Shape>),
    While(Vec<Shape>),
    For(Vec<Shape>),
    Try(Vec<Shape>, bool),
}

fn shape_strategy() -> impl Strategy<Value = Shape> {
    let leaf = prop_oneof![
        Just(Shape::Pass),
        Just(Shape::Break),
        Just(Shape::Continue),
        Just(Shape::Yield),
    ];
    leaf.prop_recursive(4, 48, 4, |inner| {
        let block = prop::collection::vec(inner, 1..4);
        prop_oneof![
            (block.clone(), prop::collection::vec(shape_leaf(), 0..2))
                .prop_map(|(body, orelse)| Shape::If(body, orelse)),
            block.clone().prop_map(Shape::While),
            block.clone().prop_map(Shape::For),
            (block, any::<bool>()).prop_map(|(body, bare)| Shape::Try(body, bare)),
        ]
    })
}

fn shape_leaf() -> impl Strategy<Value = Shape> {
    prop_oneof![Just(Shape::Pass), Just(Shape::Break), Just(Shape::Yield)]
}

/// Build statements; `break`/`continue` outside a loop become `pass`.
fn build(shapes: &[Shape], in_loop: bool) -> Vec<Stmt> {
    shapes
        .iter()
        .map(|shape| match shape {
            Shape::Pass => pass(),
            Shape::Break if in_loop => brk(),
            Shape::Continue if in_loop => cont(),
            Shape::Break | Shape::Continue => pass(),
            Shape::Yield => expr(yield_(name("x"))),
            Shape::If(body, orelse) => if_(name("x"), build(body, in_loop), build(orelse, in_loop)),
            Shape::While(body) => while_(name("x"), build(body, true)),
            Shape::For(body) => for_(name("item"), name("x"), build(body, true)),
            Shape::Try(body, bare) => {
                let mut handlers = vec![handler(
                    Some(name("KeyError")),
                    Some("e"),
                    vec![pass()],
                )];
                if *bare {
                    handlers.push(handler(None, None, build(body, in_loop)));
                }
                try_(build(body, in_loop), handlers)
            }
        })
        .collect()
}

fn function(shapes: &[Shape]) -> SourceObject {
    SourceObject::from_definition(
        ObjectId::new(1),
        Arc::new(ModuleScope::new("app")),
        def("f", &["x"], build(shapes, false)),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn labels_are_contiguous_and_unique(shapes in prop::collection::vec(shape_strategy(), 1..5)) {
        let object = function(&shapes);
        let machine = Compiler::default().lower_function(&object, "f").unwrap();

        let mut labels: Vec<u32> = machine.labels().map(Label::index).collect();
        labels.sort_unstable();
        let count = u32::try_from(labels.len()).unwrap();
        prop_assert_eq!(labels, (1..=count).collect::<Vec<_>>());
    }

    #[test]
    fn every_transfer_has_a_target(shapes in prop::collection::vec(shape_strategy(), 1..5)) {
        let object = function(&shapes);
        let machine = Compiler::default().lower_function(&object, "f").unwrap();

        let defined: Vec<Label> = machine.labels().collect();
        for target in machine.ops.iter().filter_map(Op::target) {
            prop_assert_eq!(defined.iter().filter(|l| **l == target).count(), 1);
        }
    }

    #[test]
    fn emission_is_deterministic(shapes in prop::collection::vec(shape_strategy(), 1..5)) {
        let object = function(&shapes);
        let first = Compiler::default().compile(&object).unwrap();
        let second = Compiler::default().compile(&object).unwrap();
        prop_assert_eq!(&*first, &*second);
    }
}
