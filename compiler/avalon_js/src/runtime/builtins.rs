//! Builtin functions.
//!
//! Attribute and item access in compiled code always goes through
//! `getattr`/`getitem`/`setattr`/`setitem` so objects can install fallback
//! hooks. The fallback order is fixed: own field, then the object's hook,
//! then the default or an `AttributeError`.

use avalon_ir::build::{
    assign, aug_assign, compare, def, expr, if_, module, name, num, raw, raw_expr, ret, while_,
    yield_,
};
use avalon_ir::{BinOp, CmpOp, Module};

const GETATTR: &str = r#"
    if (obj !== undefined && obj !== null) {
      if (obj[name] !== undefined) return obj[name];
      if (obj.__getattr__) return obj.__getattr__(obj, name);
    }
    if (default_value === undefined) {
      var objName = obj && obj.__name__;
      throw AttributeError("'" + objName + "' object has no attribute '" + name + "'");
    }
    return default_value;
"#;

const SETATTR: &str = r"
    if (obj.__setattr__) return obj.__setattr__(obj, name, value);
    obj[name] = value;
";

const GETITEM: &str = r"
    if (obj && obj.__getitem__) return obj.__getitem__(obj, key);
    return obj[key];
";

const SETITEM: &str = r"
    if (obj.__setitem__) return obj.__setitem__(obj, key, value);
    obj[key] = value;
";

/// Iterators are objects with a `next` method that raises `StopIteration`
/// when exhausted. Array-likes are wrapped.
const ITER: &str = r"
    if (obj && obj.next) return obj;
    if (obj && obj.__iter__) return obj.__iter__(obj);
    var index = 0;
    return {
      next: function next() {
        if (index >= obj.length) throw StopIteration();
        return obj[index++];
      }
    };
";

const METHOD: &str = r"
    return function() {
      var args = Array.prototype.slice.call(arguments);
      return func.apply(this, [obj].concat(args));
    };
";

pub(super) fn tree() -> Module {
    module(vec![
        def(
            "bool",
            &["obj"],
            vec![
                raw("if (obj && obj.__nonzero__) return obj.__nonzero__(obj);"),
                ret(raw_expr("Boolean(obj)")),
            ],
        ),
        def("getattr", &["obj", "name", "default_value"], vec![raw(GETATTR)]),
        def("getitem", &["obj", "key"], vec![raw(GETITEM)]),
        def("isinstance", &["obj", "cls"], vec![raw("return obj instanceof cls;")]),
        def(super::ITER, &["obj"], vec![raw(ITER)]),
        def(
            "len",
            &["obj"],
            vec![raw("if (obj && obj.__len__) return obj.__len__(obj);\nreturn obj.length;")],
        ),
        def(super::BIND_METHOD, &["obj", "func"], vec![raw(METHOD)]),
        def("next", &["iterator"], vec![raw("return iterator.next();")]),
        def(
            "range",
            &["start", "stop", "step"],
            vec![
                if_(
                    compare(name("stop"), CmpOp::Is, name("None")),
                    vec![
                        assign(name("stop"), name("start")),
                        assign(name("start"), num(0)),
                    ],
                    vec![],
                ),
                if_(
                    compare(name("step"), CmpOp::Is, name("None")),
                    vec![assign(name("step"), num(1))],
                    vec![],
                ),
                while_(
                    compare(name("start"), CmpOp::Lt, name("stop")),
                    vec![
                        expr(yield_(name("start"))),
                        aug_assign(name("start"), BinOp::Add, name("step")),
                    ],
                ),
            ],
        ),
        def("setattr", &["obj", "name", "value"], vec![raw(SETATTR)]),
        def("setitem", &["obj", "key", "value"], vec![raw(SETITEM)]),
    ])
}
