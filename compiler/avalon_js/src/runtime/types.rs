//! Primitive types: the root `object` class and the `generator` wrapper
//! around compiled state machines.

use avalon_ir::build::{assign, attr, class, def, method_call, module, name, none, raw, ret};
use avalon_ir::Module;

/// Re-enter the state machine once. A finished machine raises
/// `StopIteration` both before and after re-entry.
const SEND: &str = r"
    var ctx = self.ctx;
    if (ctx.end) throw StopIteration(ctx.result);
    ctx.send = value;
    ctx.func.call(ctx.ctx, ctx);
    if (ctx.end) throw StopIteration(ctx.result);
    return ctx.result;
";

const TO_STRING: &str = r"
    if (self.__repr__) return self.__repr__(self);
    return '<' + self.__name__ + ' object>';
";

pub(super) fn tree() -> Module {
    module(vec![
        class(
            "object",
            vec![],
            vec![def("toString", &["self"], vec![raw(TO_STRING)])],
        ),
        class(
            "generator",
            vec![name("object")],
            vec![
                def(
                    "__init__",
                    &["self", "ctx"],
                    vec![assign(attr(name("self"), "ctx"), name("ctx"))],
                ),
                def("__iter__", &["self"], vec![ret(name("self"))]),
                def(
                    "next",
                    &["self"],
                    vec![ret(method_call(name("self"), "send", vec![none()]))],
                ),
                def("send", &["self", "value"], vec![raw(SEND)]),
                def(
                    "close",
                    &["self"],
                    vec![raw("self.ctx.end = true;\nself.ctx.result = undefined;")],
                ),
            ],
        ),
    ])
}
