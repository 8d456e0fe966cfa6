use super::*;
use pretty_assertions::assert_eq;

#[test]
fn indent_skips_empty_lines() {
    let lines = indent(["a", "", "b"], 2, 2);
    assert_eq!(lines, vec!["    a", "", "    b"]);
}

#[test]
fn extend_accepts_text_and_lines() {
    let mut template = vec!["first".to_owned()];
    extend(&mut template, "second");
    extend(&mut template, vec!["third".to_owned(), "fourth".to_owned()]);
    assert_eq!(template, vec!["first", "second", "third", "fourth"]);
}

#[test]
fn fragment_text_joins_lines() {
    let fragment = Fragment::from(vec!["a".to_owned(), "b".to_owned()]);
    assert_eq!(fragment.clone().into_text(), "a\nb");
    assert_eq!(fragment.into_lines().len(), 2);
    assert_eq!(Fragment::from("x").into_lines(), vec!["x"]);
}

#[test]
fn raw_lines_strip_common_indentation() {
    let code = "\n    if (obj) {\n      return obj;\n    }\n    ";
    assert_eq!(raw_lines(code), vec!["if (obj) {", "  return obj;", "}"]);
}

#[test]
fn raw_lines_keep_mismatched_multibyte_indentation() {
    assert_eq!(raw_lines("  a();\n\u{3000}b();"), vec!["  a();", "\u{3000}b();"]);
    assert_eq!(
        raw_lines("\u{3000}\u{3000}a();\n\u{3000}b();"),
        vec!["\u{3000}a();", "b();"]
    );
}

#[test]
fn raw_lines_of_blank_code_is_empty() {
    assert!(raw_lines("   \n  ").is_empty());
}

#[test]
fn string_literals_are_escaped() {
    assert_eq!(string_literal("a\"b\nc"), "\"a\\\"b\\nc\"");
    assert_eq!(string_array(&["$scope", "$element"]), "[\"$scope\",\"$element\"]");
    assert_eq!(string_array(&[]), "[]");
}
