use super::*;
use avalon_ir::visitor::contains_yield;

fn function<'a>(module: &'a Module, name: &str) -> Option<&'a avalon_ir::FunctionDef> {
    module.body.iter().find_map(|stmt| match stmt {
        Stmt::FunctionDef(def) if def.name == name => Some(def),
        _ => None,
    })
}

#[test]
fn modules_load_in_page_order() {
    let runtime = Runtime::load();
    let names: Vec<_> = runtime.modules().iter().map(|m| m.name).collect();
    assert_eq!(names, ["types", "exceptions", "builtins"]);
}

#[test]
fn namespaces_list_top_level_definitions() {
    let runtime = Runtime::load();
    let ns = runtime.namespaces();

    for builtin in [
        "bool",
        "getattr",
        "getitem",
        "isinstance",
        ITER,
        "len",
        BIND_METHOD,
        "next",
        "range",
        "setattr",
        "setitem",
    ] {
        assert!(ns.builtins.contains(builtin), "missing builtin {builtin}");
    }
    for exc in ["Exception", STOP_ITERATION, "AttributeError", "KeyError"] {
        assert!(ns.exceptions.contains(exc), "missing exception {exc}");
    }
    assert!(ns.types.contains("object"));
    assert!(ns.types.contains(GENERATOR));
    assert!(!ns.builtins.contains("object"));
}

#[test]
fn range_is_a_generator() {
    let runtime = Runtime::load();
    let builtins = &runtime.modules()[2].tree;
    let range = function(builtins, "range");
    assert!(range.is_some_and(|def| contains_yield(&def.body)));
    assert!(function(builtins, "len").is_some_and(|def| !contains_yield(&def.body)));
}
