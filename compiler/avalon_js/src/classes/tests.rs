use avalon_ir::build::*;
use avalon_ir::{BinOp, ModuleScope, Stmt, SyntaxKind};
use pretty_assertions::assert_eq;

use crate::config::{HostValues, ScopeDescriptor, ScopeTable};
use crate::dispatch::{Dispatcher, Node};
use crate::emit::{Fragment, DEFAULT_INDENT};
use crate::error::{CompileError, CompileResult};
use crate::resolve::Resolver;
use crate::runtime::Runtime;

fn class_lines(stmt: &Stmt, scopes: &ScopeTable) -> CompileResult<Vec<String>> {
    let runtime = Runtime::load();
    let module = ModuleScope::new("app");
    let resolver = Resolver::new(runtime.namespaces(), &module, HostValues::default());
    let mut dispatcher = Dispatcher::new(resolver, scopes, DEFAULT_INDENT);
    dispatcher
        .visit(Node::Stmt(stmt), None, true)
        .map(Fragment::into_lines)
}

fn todo_scopes() -> ScopeTable {
    ScopeTable::builder()
        .scope(ScopeDescriptor::new("TodoList").on("click", ".done", "toggle"))
        .build()
        .unwrap()
}

fn toggle() -> Stmt {
    def(
        "toggle",
        &["self", "target", "event"],
        vec![assign(attr(name("target"), "done"), name("True"))],
    )
}

/// Trimmed body lines of the method `name`, without its header.
fn method_body(lines: &[String], name: &str) -> Vec<String> {
    let header = format!("function {name}(");
    let start = lines.iter().position(|l| l.contains(&header)).unwrap();
    let depth = lines[start].len() - lines[start].trim_start().len();
    lines[start + 1..]
        .iter()
        .take_while(|l| !(l.trim() == "};" && l.len() - l.trim_start().len() == depth))
        .map(|l| l.trim().to_owned())
        .collect()
}

#[test]
fn plain_class_layout() {
    let class = class(
        "Todo",
        vec![],
        vec![def("done", &["self"], vec![ret(num(1))])],
    );
    let lines = class_lines(&class, &ScopeTable::default()).unwrap();
    let expected = vec![
        "this.Todo = function Todo() {",
        "  if (!(this instanceof Todo)) {",
        "    var $self = Object.create(Todo.prototype);",
        "    Todo.apply($self, arguments);",
        "    return $self;",
        "  }",
        "  Todo.$bind(this);",
        "  if (this.__init__) {",
        "    this.__init__.apply(this, [this].concat(Array.prototype.slice.call(arguments)));",
        "  }",
        "};",
        "this.Todo.prototype.__name__ = \"Todo\";",
        "this.Todo.prototype.done = function done(self) {",
        "  var $ctx = {next_state: 0, ctx: this, end: false};",
        "  $ctx.local = {self: self};",
        "  $ctx.func = function($ctx) {",
        "    while (true) switch ($ctx.next_state) {",
        "      case 0:",
        "        $ctx.end = true;",
        "        $ctx.result = 1;",
        "        return $ctx.result;",
        "      default:",
        "        $ctx.end = true;",
        "        $ctx.result = undefined;",
        "        return;",
        "    }",
        "  };",
        "  return $ctx.func.call(this, $ctx);",
        "};",
        "this.Todo.$bind = function $bind(self) {",
        "  self.done = method(self, this.prototype.done);",
        "};",
        "this.Todo.$inject = [];",
    ];
    assert_eq!(lines, expected);
}

#[test]
fn base_class_links_prototype_and_binding() {
    let class = class(
        "Done",
        vec![name("object")],
        vec![
            def("__init__", &["self"], vec![pass()]),
            def("label", &["self"], vec![ret(string("done"))]),
        ],
    );
    let lines = class_lines(&class, &ScopeTable::default()).unwrap();
    assert!(lines.contains(&"this.Done.prototype = Object.create(object.prototype);".to_owned()));
    assert!(lines.contains(&"this.Done.prototype.constructor = this.Done;".to_owned()));
    assert!(lines.contains(&"  if (object.$bind) object.$bind(self);".to_owned()));
    assert!(lines.contains(&"  self.label = method(self, this.prototype.label);".to_owned()));
    // hooks receive the instance explicitly and stay unbound
    assert!(!lines.iter().any(|l| l.contains("self.__init__ =")));
}

#[test]
fn class_attributes_land_on_the_prototype() {
    let class = class("Todo", vec![], vec![assign(name("limit"), num(10))]);
    let lines = class_lines(&class, &ScopeTable::default()).unwrap();
    assert!(lines.contains(&"this.Todo.prototype.limit = 10;".to_owned()));
}

#[test]
fn class_body_has_no_enclosing_loop() {
    let outer = def(
        "f",
        &[],
        vec![while_(
            name("True"),
            vec![class("Inner", vec![], vec![brk()])],
        )],
    );
    let err = class_lines(&outer, &ScopeTable::default()).unwrap_err();
    assert_eq!(
        err,
        CompileError::InvalidControlFlowContext {
            statement: SyntaxKind::Break,
            required: "a loop",
        }
    );
}

#[test]
fn multiple_inheritance_is_rejected() {
    let class = class("Both", vec![name("A"), name("B")], vec![pass()]);
    let err = class_lines(&class, &ScopeTable::default()).unwrap_err();
    assert!(matches!(
        err,
        CompileError::UnsupportedConstruct {
            construct: SyntaxKind::ClassDef,
            ref detail,
        } if detail.contains("2 bases")
    ));
}

#[test]
fn registered_base_emits_a_reactive_scope() {
    let class = class("TodoCtrl", vec![name("TodoList")], vec![toggle()]);
    let lines = class_lines(&class, &todo_scopes()).unwrap();

    assert_eq!(lines[0], "this.TodoList = function TodoCtrl($scope, $element) {");
    assert!(lines.contains(
        &"  $scope.toggle = function toggle(self, target, event) {".to_owned()
    ));
    assert!(lines.contains(
        &"  $element.on(\"click\", \".done\", function eventHandler(e) {".to_owned()
    ));
    assert!(lines.contains(
        &"    $scope.$apply(function() { $scope.toggle(t, e); });".to_owned()
    ));
    assert!(lines.contains(&"  $scope.$on(\"$destroy\", function() {".to_owned()));
    assert!(lines.contains(&"  var $getattr = $scope.__getattr__;".to_owned()));
    assert_eq!(
        lines.last().map(String::as_str),
        Some(r#"this.TodoList.$inject = ["$scope","$element"];"#)
    );
}

#[test]
fn scope_methods_are_bound_to_the_scope() {
    let class = class(
        "TodoCtrl",
        vec![name("TodoList")],
        vec![
            def("__init__", &["self"], vec![pass()]),
            toggle(),
            def(
                "bump",
                &["self"],
                vec![aug_assign(attr(name("self"), "count"), BinOp::Add, num(1))],
            ),
        ],
    );
    let lines = class_lines(&class, &todo_scopes()).unwrap();

    let toggle_bind = "  $scope.toggle = method($scope, $scope.toggle);".to_owned();
    let bump_bind = "  $scope.bump = method($scope, $scope.bump);".to_owned();
    assert!(lines.contains(&toggle_bind));
    assert!(lines.contains(&bump_bind));
    assert!(!lines.iter().any(|l| l.contains("$scope.__init__ = method(")));

    // bound before any event can fire
    let bound_at = lines.iter().position(|l| *l == bump_bind).unwrap();
    let wired_at = lines.iter().position(|l| l.contains("$element.on(")).unwrap();
    assert!(bound_at < wired_at);
}

#[test]
fn scope_is_found_through_a_module_attribute() {
    let class = class(
        "TodoCtrl",
        vec![attr(name("avalon"), "TodoList")],
        vec![toggle()],
    );
    let lines = class_lines(&class, &todo_scopes()).unwrap();
    assert!(lines.iter().any(|l| l.contains("$element.on(")));
}

#[test]
fn scope_and_plain_classes_share_method_bodies() {
    let scoped = class("TodoCtrl", vec![name("TodoList")], vec![toggle()]);
    let plain = class("TodoCtrl", vec![name("Unregistered")], vec![toggle()]);
    let scopes = todo_scopes();

    let scoped = class_lines(&scoped, &scopes).unwrap();
    let plain = class_lines(&plain, &scopes).unwrap();

    assert!(scoped.iter().any(|l| l.contains("$element.on(")));
    assert!(scoped.iter().any(|l| l.contains("$destroy")));
    assert!(!plain.iter().any(|l| l.contains("$element.on(")));
    assert!(!plain.iter().any(|l| l.contains("$destroy")));
    assert_eq!(method_body(&scoped, "toggle"), method_body(&plain, "toggle"));
}
