//! Exception classes raised by the runtime and by compiled code.

use avalon_ir::build::{
    assign, attr, binop, class, def, def_with, module, name, none, or, param, param_default, pass,
    ret, string,
};
use avalon_ir::{BinOp, Module, Stmt};

/// Subclasses of `Exception` with no behaviour of their own.
const PLAIN: &[&str] = &[
    "RuntimeError",
    "ValueError",
    "NotImplemented",
    "TypeError",
    "AttributeError",
    "KeyError",
    "IndexError",
];

pub(super) fn tree() -> Module {
    let base = class(
        "Exception",
        vec![name("object")],
        vec![
            def_with(
                "__init__",
                vec![param("self"), param_default("message", none())],
                vec![assign(
                    attr(name("self"), "message"),
                    or(vec![name("message"), string("")]),
                )],
            ),
            def(
                "__repr__",
                &["self"],
                vec![ret(binop(
                    binop(attr(name("self"), "__name__"), BinOp::Add, string(": ")),
                    BinOp::Add,
                    attr(name("self"), "message"),
                ))],
            ),
        ],
    );

    let stop_iteration = class(
        super::STOP_ITERATION,
        vec![name("Exception")],
        vec![def_with(
            "__init__",
            vec![param("self"), param_default("value", none())],
            vec![
                assign(attr(name("self"), "value"), name("value")),
                assign(attr(name("self"), "message"), string("")),
            ],
        )],
    );

    let mut body: Vec<Stmt> = vec![base, stop_iteration];
    body.extend(
        PLAIN
            .iter()
            .map(|exc| class(exc, vec![name("Exception")], vec![pass()])),
    );
    module(body)
}
