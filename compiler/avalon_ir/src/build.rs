//! Tree constructors.
//!
//! Hosts that reflect over live source objects, the runtime shim modules and
//! tests all build trees through these helpers instead of spelling out the
//! nested enum literals.

use crate::ast::{
    BinOp, BoolOp, ClassDef, CmpOp, ExceptHandler, Expr, FunctionDef, Module, Number, Param, Stmt,
    UnaryOp,
};

pub fn module(body: Vec<Stmt>) -> Module {
    Module::new(body)
}

// ── Statements ──────────────────────────────────────────────────────

/// `def name(params): body` with plain positional parameters.
pub fn def(name: &str, params: &[&str], body: Vec<Stmt>) -> Stmt {
    def_with(name, params.iter().map(|p| param(p)).collect(), body)
}

pub fn def_with(name: &str, params: Vec<Param>, body: Vec<Stmt>) -> Stmt {
    Stmt::FunctionDef(FunctionDef {
        name: name.to_owned(),
        params,
        body,
        decorators: Vec::new(),
    })
}

/// A definition carrying `@decorator` expressions.
pub fn decorated(decorators: Vec<Expr>, stmt: Stmt) -> Stmt {
    match stmt {
        Stmt::FunctionDef(def) => Stmt::FunctionDef(FunctionDef { decorators, ..def }),
        Stmt::ClassDef(cls) => Stmt::ClassDef(ClassDef { decorators, ..cls }),
        other => other,
    }
}

pub fn param(name: &str) -> Param {
    Param {
        name: name.to_owned(),
        default: None,
    }
}

pub fn param_default(name: &str, default: Expr) -> Param {
    Param {
        name: name.to_owned(),
        default: Some(default),
    }
}

pub fn class(name: &str, bases: Vec<Expr>, body: Vec<Stmt>) -> Stmt {
    Stmt::ClassDef(ClassDef {
        name: name.to_owned(),
        bases,
        body,
        decorators: Vec::new(),
    })
}

pub fn assign(target: Expr, value: Expr) -> Stmt {
    Stmt::Assign {
        targets: vec![target],
        value,
    }
}

/// `a = b = value`
pub fn assign_chain(targets: Vec<Expr>, value: Expr) -> Stmt {
    Stmt::Assign { targets, value }
}

pub fn aug_assign(target: Expr, op: BinOp, value: Expr) -> Stmt {
    Stmt::AugAssign { target, op, value }
}

pub fn for_(target: Expr, iter: Expr, body: Vec<Stmt>) -> Stmt {
    Stmt::For {
        target,
        iter,
        body,
        orelse: Vec::new(),
    }
}

pub fn while_(test: Expr, body: Vec<Stmt>) -> Stmt {
    Stmt::While {
        test,
        body,
        orelse: Vec::new(),
    }
}

pub fn if_(test: Expr, body: Vec<Stmt>, orelse: Vec<Stmt>) -> Stmt {
    Stmt::If { test, body, orelse }
}

pub fn try_(body: Vec<Stmt>, handlers: Vec<ExceptHandler>) -> Stmt {
    Stmt::Try {
        body,
        handlers,
        orelse: Vec::new(),
        finalbody: Vec::new(),
    }
}

/// `except class as name: body`; a `None` class catches everything.
pub fn handler(class: Option<Expr>, name: Option<&str>, body: Vec<Stmt>) -> ExceptHandler {
    ExceptHandler {
        class,
        name: name.map(str::to_owned),
        body,
    }
}

pub fn ret(value: Expr) -> Stmt {
    Stmt::Return(Some(value))
}

pub fn ret_none() -> Stmt {
    Stmt::Return(None)
}

pub fn raise(value: Expr) -> Stmt {
    Stmt::Raise(Some(value))
}

pub fn reraise() -> Stmt {
    Stmt::Raise(None)
}

pub fn expr(value: Expr) -> Stmt {
    Stmt::Expr(value)
}

pub fn pass() -> Stmt {
    Stmt::Pass
}

pub fn brk() -> Stmt {
    Stmt::Break
}

pub fn cont() -> Stmt {
    Stmt::Continue
}

pub fn import(names: &[&str]) -> Stmt {
    Stmt::Import(names.iter().map(|n| (*n).to_owned()).collect())
}

/// `JSCode("...")` as a statement: raw target code spliced verbatim.
pub fn raw(code: &str) -> Stmt {
    Stmt::Expr(raw_expr(code))
}

// ── Expressions ─────────────────────────────────────────────────────

pub fn name(id: &str) -> Expr {
    Expr::Name(id.to_owned())
}

pub fn num(n: i64) -> Expr {
    Expr::Num(Number::Int(n))
}

pub fn float(n: f64) -> Expr {
    Expr::Num(Number::float(n))
}

pub fn string(s: &str) -> Expr {
    Expr::Str(s.to_owned())
}

pub fn none() -> Expr {
    name("None")
}

pub fn call(func: Expr, args: Vec<Expr>) -> Expr {
    Expr::Call {
        func: Box::new(func),
        args,
    }
}

/// `receiver.method(args)`
pub fn method_call(receiver: Expr, method: &str, args: Vec<Expr>) -> Expr {
    call(attr(receiver, method), args)
}

pub fn attr(value: Expr, attr: &str) -> Expr {
    Expr::Attribute {
        value: Box::new(value),
        attr: attr.to_owned(),
    }
}

pub fn subscript(value: Expr, index: Expr) -> Expr {
    Expr::Subscript {
        value: Box::new(value),
        index: Box::new(index),
    }
}

pub fn list(items: Vec<Expr>) -> Expr {
    Expr::List(items)
}

pub fn tuple(items: Vec<Expr>) -> Expr {
    Expr::Tuple(items)
}

pub fn dict(entries: Vec<(Expr, Expr)>) -> Expr {
    let (keys, values) = entries.into_iter().unzip();
    Expr::Dict { keys, values }
}

pub fn binop(left: Expr, op: BinOp, right: Expr) -> Expr {
    Expr::BinOp {
        left: Box::new(left),
        op,
        right: Box::new(right),
    }
}

pub fn unary(op: UnaryOp, operand: Expr) -> Expr {
    Expr::UnaryOp {
        op,
        operand: Box::new(operand),
    }
}

pub fn not(operand: Expr) -> Expr {
    unary(UnaryOp::Not, operand)
}

pub fn compare(left: Expr, op: CmpOp, right: Expr) -> Expr {
    Expr::Compare {
        left: Box::new(left),
        ops: vec![op],
        comparators: vec![right],
    }
}

pub fn and(values: Vec<Expr>) -> Expr {
    Expr::BoolOp {
        op: BoolOp::And,
        values,
    }
}

pub fn or(values: Vec<Expr>) -> Expr {
    Expr::BoolOp {
        op: BoolOp::Or,
        values,
    }
}

pub fn if_exp(test: Expr, body: Expr, orelse: Expr) -> Expr {
    Expr::IfExp {
        test: Box::new(test),
        body: Box::new(body),
        orelse: Box::new(orelse),
    }
}

pub fn yield_(value: Expr) -> Expr {
    Expr::Yield(Some(Box::new(value)))
}

pub fn yield_none() -> Expr {
    Expr::Yield(None)
}

/// `JSCode("...")` in expression position.
pub fn raw_expr(code: &str) -> Expr {
    call(name("JSCode"), vec![string(code)])
}
