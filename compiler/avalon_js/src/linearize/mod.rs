//! Control-flow linearization.
//!
//! Every function body becomes a resumable state machine: a state record
//! (`$ctx`) holding an integer program counter, a bag of locals and an
//! explicit handler stack, plus a `switch` over the program counter inside
//! a perpetual loop. Structured statements are lowered to the flat [`Op`]
//! list first (see [`control_flow`]); [`render`] then prints that list.
//!
//! # Label allocation
//!
//! A fresh [`BranchPoint`] is created for each function body. Labels are
//! handed out in the order a depth-first traversal first needs them, so
//! output is reproducible, and two functions never observe each other's
//! counters.

pub(crate) mod control_flow;
mod ir;

pub use ir::{Label, Op, StateMachine};

use avalon_ir::visitor::{bound_names, contains_yield};
use avalon_ir::FunctionDef;
use rustc_hash::FxHashSet;
use tracing::trace;

use crate::emit::{extend, indent, reindent};
use crate::resolve::escape;
use crate::runtime::GENERATOR;

/// Receiver path of function locals in emitted code.
pub const LOCALS: &str = "$ctx.local";

/// Per-function monotonic label allocator.
#[derive(Debug, Default)]
pub struct BranchPoint {
    count: u32,
}

impl BranchPoint {
    pub fn new() -> Self {
        BranchPoint::default()
    }

    /// The next unused label.
    pub fn create(&mut self) -> Label {
        self.count += 1;
        let label = Label::new(self.count);
        trace!(%label, "allocated label");
        label
    }

    /// Number of labels handed out so far.
    pub fn count(&self) -> u32 {
        self.count
    }
}

/// State of one function body while it is being lowered.
#[derive(Debug)]
pub(crate) struct FunctionBuilder {
    pub(crate) branch: BranchPoint,
    locals: FxHashSet<String>,
    handler_depth: usize,
}

impl FunctionBuilder {
    /// Parameters and every name the body binds are locals.
    pub(crate) fn new(def: &FunctionDef) -> Self {
        let locals = def
            .params
            .iter()
            .map(|p| p.name.as_str())
            .chain(bound_names(&def.body))
            .map(str::to_owned)
            .collect();
        FunctionBuilder {
            branch: BranchPoint::new(),
            locals,
            handler_depth: 0,
        }
    }

    pub(crate) fn is_local(&self, name: &str) -> bool {
        self.locals.contains(name)
    }

    /// Number of handlers pushed by enclosing `try` blocks of this function.
    pub(crate) fn handler_depth(&self) -> usize {
        self.handler_depth
    }

    pub(crate) fn enter_handler(&mut self) {
        self.handler_depth += 1;
    }

    pub(crate) fn exit_handler(&mut self) {
        self.handler_depth = self.handler_depth.saturating_sub(1);
    }
}

/// Package lowered operations as a state machine.
pub(crate) fn finish(def: &FunctionDef, ops: Vec<Op>) -> StateMachine {
    let machine = StateMachine {
        name: escape(&def.name).into_owned(),
        params: def
            .params
            .iter()
            .map(|p| escape(&p.name).into_owned())
            .collect(),
        ops,
        is_generator: contains_yield(&def.body),
    };
    trace!(
        name = %machine.name,
        labels = machine.labels().count(),
        generator = machine.is_generator,
        "lowered function"
    );
    machine
}

/// Render a state machine as a function assigned onto `context`.
pub fn render(machine: &StateMachine, context: &str, width: usize) -> Vec<String> {
    let handlers = machine.uses_handlers();
    let name = &machine.name;
    let params = machine.params.join(", ");
    let seeded = machine
        .params
        .iter()
        .map(|p| format!("{p}: {p}"))
        .collect::<Vec<_>>()
        .join(", ");

    let mut tpl = vec![format!("{context}.{name} = function {name}({params}) {{")];
    let record = if handlers {
        "var $ctx = {next_state: 0, ctx: this, end: false, try_stack: []};"
    } else {
        "var $ctx = {next_state: 0, ctx: this, end: false};"
    };

    let mut func = vec![
        record.to_owned(),
        format!("{LOCALS} = {{{seeded}}};"),
        "$ctx.func = function($ctx) {".to_owned(),
    ];

    // `case` labels sit one level above the code they introduce.
    let mut dispatch = vec![format!("case {}:", Label::ENTRY)];
    let mut body = Vec::new();
    for op in &machine.ops {
        if let Op::Label(label) = op {
            extend(&mut dispatch, indent(body.drain(..), width, 1));
            dispatch.push(format!("case {label}:"));
        } else {
            render_op(op, width, &mut body);
        }
    }
    extend(&mut dispatch, indent(body, width, 1));
    dispatch.push("default:".to_owned());
    extend(
        &mut dispatch,
        indent(
            ["$ctx.end = true;", "$ctx.result = undefined;", "return;"],
            width,
            1,
        ),
    );

    let mut switch = vec!["switch ($ctx.next_state) {".to_owned()];
    extend(&mut switch, indent(dispatch, width, 1));
    switch.push("}".to_owned());

    if handlers {
        let mut looped = vec!["while (true) try {".to_owned()];
        extend(&mut looped, indent(switch, width, 1));
        extend(&mut looped, "} catch ($exception) {");
        extend(
            &mut looped,
            indent(
                [
                    "if ($ctx.try_stack.length === 0) {",
                    "  $ctx.end = true;",
                    "  throw $exception;",
                    "}",
                    "$ctx.exception = $exception;",
                    "$ctx.next_state = $ctx.try_stack.pop();",
                ]
                .map(|line| reindent(line, width)),
                width,
                1,
            ),
        );
        extend(&mut looped, "}");
        extend(&mut func, indent(looped, width, 1));
    } else {
        switch[0] = format!("while (true) {}", switch[0]);
        extend(&mut func, indent(switch, width, 1));
    }
    extend(&mut func, "};");

    if machine.is_generator {
        func.push(format!("return {GENERATOR}($ctx);"));
    } else {
        func.push("return $ctx.func.call(this, $ctx);".to_owned());
    }

    extend(&mut tpl, indent(func, width, 1));
    extend(&mut tpl, "};");
    tpl
}

/// Render operations outside a dispatch loop, labels as bare `case` lines.
///
/// Outside a function only straight code is produced, so this is how
/// module-level and class-body statements come out.
pub(crate) fn render_ops(ops: &[Op], width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for op in ops {
        if let Op::Label(label) = op {
            lines.push(format!("case {label}:"));
        } else {
            render_op(op, width, &mut lines);
        }
    }
    lines
}

fn render_op(op: &Op, width: usize, out: &mut Vec<String>) {
    let jump = |target: Label| format!("$ctx.next_state = {target}; continue;");
    let pad = " ".repeat(width);
    match op {
        Op::Label(_) => {}
        Op::Code(lines) => out.extend(lines.iter().cloned()),
        Op::Jump(target) => out.push(jump(*target)),
        Op::JumpUnless { test, target } => {
            out.push(format!("if (!({test})) {{"));
            out.push(format!("{pad}{}", jump(*target)));
            out.push("}".to_owned());
        }
        Op::PushHandler(handler) => out.push(format!("$ctx.try_stack.push({handler});")),
        Op::PopHandler => out.push("$ctx.try_stack.pop();".to_owned()),
        Op::Yield { value, resume } => {
            out.push(format!("$ctx.result = {value};"));
            out.push(format!("$ctx.next_state = {resume};"));
            out.push("return $ctx.result;".to_owned());
        }
        Op::Return(value) => {
            out.push("$ctx.end = true;".to_owned());
            out.push(format!(
                "$ctx.result = {};",
                value.as_deref().unwrap_or("undefined")
            ));
            out.push("return $ctx.result;".to_owned());
        }
        Op::Throw(value) => out.push(format!("throw {value};")),
        Op::CatchUnless { classes, next } => {
            let tests: Vec<String> = classes
                .iter()
                .map(|class| format!("$ctx.exception instanceof {class}"))
                .collect();
            out.push(format!("if (!({})) {{", tests.join(" || ")));
            out.push(format!("{pad}{}", jump(*next)));
            out.push("}".to_owned());
        }
        Op::RethrowUnless { class } => out.push(format!(
            "if (!($ctx.exception instanceof {class})) throw $ctx.exception;"
        )),
        Op::BindCaught { target } => out.push(format!("{target} = $ctx.exception;")),
        Op::ClearCaught => out.push("$ctx.exception = undefined;".to_owned()),
        Op::Rethrow => out.push("throw $ctx.exception;".to_owned()),
    }
}

#[cfg(test)]
mod tests;
