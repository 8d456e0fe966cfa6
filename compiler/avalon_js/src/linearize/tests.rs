use super::control_flow::{escape_to, suspend, Clause, Conditional, ForLoop, TryBlock, WhileLoop};
use super::*;
use pretty_assertions::assert_eq;

fn code(line: &str) -> Op {
    Op::Code(vec![line.to_owned()])
}

fn machine(ops: Vec<Op>, is_generator: bool) -> StateMachine {
    StateMachine {
        name: "f".to_owned(),
        params: vec!["a".to_owned()],
        ops,
        is_generator,
    }
}

#[test]
fn branch_point_starts_after_entry() {
    let mut branch = BranchPoint::new();
    assert_eq!(branch.create(), Label::new(1));
    assert_eq!(branch.create(), Label::new(2));
    assert_eq!(branch.count(), 2);
    assert_ne!(branch.create(), Label::ENTRY);
}

#[test]
fn separate_branch_points_do_not_share_labels() {
    let mut first = BranchPoint::new();
    let mut second = BranchPoint::new();
    first.create();
    first.create();
    assert_eq!(second.create(), Label::new(1));
}

#[test]
fn conditional_jumps_over_body_into_else() {
    let mut branch = BranchPoint::new();
    let ops = Conditional::open(&mut branch).close("x".to_owned(), vec![code("a();")], vec![
        code("b();"),
    ]);
    assert_eq!(
        ops,
        vec![
            Op::JumpUnless {
                test: "x".to_owned(),
                target: Label::new(1)
            },
            code("a();"),
            Op::Jump(Label::new(2)),
            Op::Label(Label::new(1)),
            code("b();"),
            Op::Label(Label::new(2)),
        ]
    );
}

#[test]
fn while_loop_layout() {
    let mut branch = BranchPoint::new();
    let shape = WhileLoop::open(&mut branch);
    let points = shape.points;
    let body = escape_to(points.break_point, 0);
    let ops = shape.close("go".to_owned(), body);
    assert_eq!(
        ops,
        vec![
            Op::Label(Label::new(1)),
            Op::JumpUnless {
                test: "go".to_owned(),
                target: Label::new(2)
            },
            Op::Jump(Label::new(2)),
            Op::Jump(Label::new(1)),
            Op::Label(Label::new(2)),
        ]
    );
}

#[test]
fn for_loop_guards_only_the_step() {
    let mut branch = BranchPoint::new();
    let shape = ForLoop::open(&mut branch);
    assert_eq!(shape.step(), "$ctx.local.$iter1.next()");
    let bind = vec![format!("$ctx.local.x = {};", shape.step())];
    let ops = shape.close("xs", bind, vec![code("use();")]);
    assert_eq!(
        ops,
        vec![
            code("$ctx.local.$iter1 = iter(xs);"),
            Op::Label(Label::new(1)),
            Op::PushHandler(Label::new(3)),
            code("$ctx.local.x = $ctx.local.$iter1.next();"),
            Op::PopHandler,
            code("use();"),
            Op::Jump(Label::new(1)),
            Op::Label(Label::new(3)),
            Op::RethrowUnless {
                class: "StopIteration".to_owned()
            },
            Op::ClearCaught,
            Op::Label(Label::new(2)),
        ]
    );
}

#[test]
fn try_without_bare_clause_rethrows() {
    let mut branch = BranchPoint::new();
    let shape = TryBlock::open(&mut branch);
    let next = branch.create();
    let ops = shape.close(vec![code("risky();")], vec![], vec![Clause {
        class: Some((vec!["KeyError".to_owned()], next)),
        bind: Some("$ctx.local.e".to_owned()),
        body: vec![code("handle();")],
    }]);
    assert_eq!(
        ops,
        vec![
            Op::PushHandler(Label::new(1)),
            code("risky();"),
            Op::PopHandler,
            Op::Jump(Label::new(2)),
            Op::Label(Label::new(1)),
            Op::CatchUnless {
                classes: vec!["KeyError".to_owned()],
                next: Label::new(3)
            },
            Op::BindCaught {
                target: "$ctx.local.e".to_owned()
            },
            code("handle();"),
            Op::ClearCaught,
            Op::Jump(Label::new(2)),
            Op::Label(Label::new(3)),
            Op::Rethrow,
            Op::Label(Label::new(2)),
        ]
    );
}

#[test]
fn bare_clause_catches_everything() {
    let mut branch = BranchPoint::new();
    let shape = TryBlock::open(&mut branch);
    let ops = shape.close(vec![], vec![code("fine();")], vec![Clause {
        class: None,
        bind: None,
        body: vec![],
    }]);
    assert!(!ops.contains(&Op::Rethrow));
    // The else body runs after the handler is popped.
    let pop = ops.iter().position(|op| *op == Op::PopHandler);
    let orelse = ops.iter().position(|op| *op == code("fine();"));
    assert!(pop < orelse);
}

#[test]
fn suspension_defines_its_resume_label() {
    let mut branch = BranchPoint::new();
    let ops = suspend(&mut branch, "1".to_owned());
    assert_eq!(
        ops,
        vec![
            Op::Yield {
                value: "1".to_owned(),
                resume: Label::new(1)
            },
            Op::Label(Label::new(1)),
        ]
    );
}

#[test]
fn escape_pops_before_jumping() {
    let ops = escape_to(Label::new(4), 2);
    assert_eq!(
        ops,
        vec![Op::PopHandler, Op::PopHandler, Op::Jump(Label::new(4))]
    );
}

#[test]
fn plain_function_renders_without_handler_stack() {
    let lines = render(&machine(vec![Op::Return(Some("a".to_owned()))], false), "this", 2);
    assert_eq!(
        lines,
        vec![
            "this.f = function f(a) {",
            "  var $ctx = {next_state: 0, ctx: this, end: false};",
            "  $ctx.local = {a: a};",
            "  $ctx.func = function($ctx) {",
            "    while (true) switch ($ctx.next_state) {",
            "      case 0:",
            "        $ctx.end = true;",
            "        $ctx.result = a;",
            "        return $ctx.result;",
            "      default:",
            "        $ctx.end = true;",
            "        $ctx.result = undefined;",
            "        return;",
            "    }",
            "  };",
            "  return $ctx.func.call(this, $ctx);",
            "};",
        ]
    );
}

#[test]
fn generator_renders_catch_routing() {
    let ops = vec![
        Op::Yield {
            value: "1".to_owned(),
            resume: Label::new(1),
        },
        Op::Label(Label::new(1)),
    ];
    let lines = render(&machine(ops, true), "this", 2);
    assert_eq!(
        lines,
        vec![
            "this.f = function f(a) {",
            "  var $ctx = {next_state: 0, ctx: this, end: false, try_stack: []};",
            "  $ctx.local = {a: a};",
            "  $ctx.func = function($ctx) {",
            "    while (true) try {",
            "      switch ($ctx.next_state) {",
            "        case 0:",
            "          $ctx.result = 1;",
            "          $ctx.next_state = 1;",
            "          return $ctx.result;",
            "        case 1:",
            "        default:",
            "          $ctx.end = true;",
            "          $ctx.result = undefined;",
            "          return;",
            "      }",
            "    } catch ($exception) {",
            "      if ($ctx.try_stack.length === 0) {",
            "        $ctx.end = true;",
            "        throw $exception;",
            "      }",
            "      $ctx.exception = $exception;",
            "      $ctx.next_state = $ctx.try_stack.pop();",
            "    }",
            "  };",
            "  return generator($ctx);",
            "};",
        ]
    );
}

#[test]
fn render_honours_indent_width() {
    let ops = vec![Op::JumpUnless {
        test: "a".to_owned(),
        target: Label::new(1),
    }];
    let lines = render(&machine(ops, false), "this", 4);
    assert!(lines.contains(&"                if (!(a)) {".to_owned()));
    assert!(lines.contains(&"                    $ctx.next_state = 1; continue;".to_owned()));
}

#[test]
fn handler_ops_render_against_the_state_record() {
    let ops = vec![
        Op::PushHandler(Label::new(1)),
        Op::PopHandler,
        Op::Label(Label::new(1)),
        Op::CatchUnless {
            classes: vec!["KeyError".to_owned()],
            next: Label::new(2),
        },
        Op::ClearCaught,
        Op::Label(Label::new(2)),
        Op::Rethrow,
    ];
    let text = render(&machine(ops, false), "this", 2).join("\n");
    assert!(text.contains("$ctx.try_stack.push(1);"));
    assert!(text.contains("$ctx.try_stack.pop();"));
    assert!(text.contains("if (!($ctx.exception instanceof KeyError)) {"));
    assert!(text.contains("$ctx.exception = undefined;"));
    assert!(text.contains("throw $ctx.exception;"));
    assert!(text.contains("} catch ($exception) {"));
}

#[test]
fn multi_class_clause_renders_a_disjunction() {
    let ops = vec![
        Op::PushHandler(Label::new(1)),
        Op::PopHandler,
        Op::Label(Label::new(1)),
        Op::CatchUnless {
            classes: vec!["ValueError".to_owned(), "KeyError".to_owned()],
            next: Label::new(2),
        },
        Op::ClearCaught,
        Op::Label(Label::new(2)),
        Op::Rethrow,
    ];
    let text = render(&machine(ops, false), "this", 2).join("\n");
    assert!(text.contains(
        "if (!($ctx.exception instanceof ValueError || $ctx.exception instanceof KeyError)) {"
    ));
    assert!(!text.contains("instanceof ["));
}
