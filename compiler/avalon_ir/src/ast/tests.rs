use super::*;
use crate::build::{class, def, name, num, pass, string};

#[test]
fn kind_names_follow_source_spelling() {
    assert_eq!(SyntaxKind::FunctionDef.name(), "def");
    assert_eq!(SyntaxKind::Try.to_string(), "try");
    assert_eq!(Stmt::Break.kind(), SyntaxKind::Break);
    assert_eq!(name("x").kind(), SyntaxKind::Name);
}

#[test]
fn float_literal_displays_as_decimal() {
    assert_eq!(Number::float(1.5).to_string(), "1.5");
    assert_eq!(Number::Int(-3).to_string(), "-3");
    assert_eq!(Number::float(2.0), Number::float(2.0));
}

#[test]
fn class_methods_are_listed_in_source_order() {
    let Stmt::ClassDef(cls) = class(
        "Todo",
        vec![],
        vec![
            def("first", &["self"], vec![pass()]),
            Stmt::Expr(string("doc")),
            def("second", &["self"], vec![pass()]),
        ],
    ) else {
        panic!("class builder must produce a class");
    };
    let names: Vec<_> = cls.methods().map(|m| m.name.as_str()).collect();
    assert_eq!(names, ["first", "second"]);
    assert!(cls.declares("second"));
    assert!(!cls.declares("__init__"));
}

#[test]
fn as_name_only_matches_bare_names() {
    assert_eq!(name("x").as_name(), Some("x"));
    assert_eq!(num(1).as_name(), None);
}
