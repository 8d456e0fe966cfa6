use super::*;
use crate::build::{
    assign, class, def, expr, for_, handler, name, num, pass, ret, try_, tuple, while_, yield_,
};
use pretty_assertions::assert_eq;

#[test]
fn yield_in_body_marks_generator() {
    let body = vec![while_(name("x"), vec![expr(yield_(num(1)))])];
    assert!(contains_yield(&body));
}

#[test]
fn yield_in_nested_def_does_not_count() {
    let body = vec![
        def("inner", &[], vec![expr(yield_(num(1)))]),
        ret(num(2)),
    ];
    assert!(!contains_yield(&body));
}

#[test]
fn bound_names_collects_targets_in_source_order() {
    let body = vec![
        assign(tuple(vec![name("a"), name("b")]), name("pair")),
        for_(name("item"), name("items"), vec![assign(name("a"), num(0))]),
        try_(
            vec![pass()],
            vec![handler(Some(name("ValueError")), Some("err"), vec![pass()])],
        ),
        def("helper", &["inner_param"], vec![assign(name("hidden"), num(1))]),
        class("Local", vec![], vec![assign(name("attr"), num(1))]),
    ];
    assert_eq!(
        bound_names(&body),
        vec!["a", "b", "item", "err", "helper", "Local"]
    );
}

#[test]
fn attribute_targets_bind_nothing() {
    let body = vec![assign(crate::build::attr(name("self"), "x"), num(1))];
    assert!(bound_names(&body).is_empty());
}
