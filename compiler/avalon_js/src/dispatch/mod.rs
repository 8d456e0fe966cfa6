//! Tree-walking driver.
//!
//! [`Dispatcher::visit`] routes every node to exactly one handler by kind and
//! threads the inherited attributes down the walk: the receiver context,
//! the label allocator of the enclosing function, and the loop labels that
//! `break`/`continue` target.
//!
//! # Architecture
//!
//! ```text
//! Dispatcher
//! ├── node_chain   (parent links, innermost last)
//! ├── frames       (inherited attributes per visited node)
//! ├── functions    (one FunctionBuilder per function being lowered)
//! └── Resolver     (free-name lookup)
//! ```
//!
//! Handlers are grouped by category:
//!
//! - [`statements`]: control flow, definitions and simple statements
//! - [`assign`]: stores, unpacking and augmented assignment
//! - [`operators`]: boolean, binary, unary and comparison operators
//! - [`calls`]: calls and intrinsics
//! - [`identifiers`]: names, attributes, subscripts and literals
//!
//! Class definitions are handled in [`crate::classes`].

mod assign;
mod calls;
mod identifiers;
mod operators;
mod statements;

use avalon_ir::{Expr, FunctionDef, Module, Stmt, SyntaxKind};

use crate::config::ScopeTable;
use crate::emit::Fragment;
use crate::error::{CompileError, CompileResult};
use crate::linearize::control_flow::LoopPoints;
use crate::linearize::{self, FunctionBuilder, Op, StateMachine};
use crate::resolve::Resolver;

/// Any node the dispatcher can visit.
#[derive(Copy, Clone, Debug)]
pub enum Node<'ast> {
    Module(&'ast Module),
    Stmt(&'ast Stmt),
    Expr(&'ast Expr),
}

impl Node<'_> {
    pub fn kind(self) -> SyntaxKind {
        match self {
            Node::Module(_) => SyntaxKind::Module,
            Node::Stmt(stmt) => stmt.kind(),
            Node::Expr(expr) => expr.kind(),
        }
    }
}

/// Attributes a node inherits from its parent.
#[derive(Clone, Debug, Default)]
struct Frame {
    /// Receiver path definitions and stores are emitted onto.
    context: Option<String>,
    /// Labels of the nearest enclosing loop.
    loop_points: Option<LoopPoints>,
    /// Handler depth when the nearest loop was entered.
    loop_depth: usize,
    /// Index into `functions` of the function being lowered.
    function: Option<usize>,
    /// Inside an `except` clause of the current function.
    in_handler: bool,
}

pub struct Dispatcher<'a> {
    resolver: Resolver<'a>,
    pub(crate) scopes: &'a ScopeTable,
    pub(crate) width: usize,
    node_chain: Vec<SyntaxKind>,
    frames: Vec<Frame>,
    functions: Vec<FunctionBuilder>,
    visits: u64,
}

impl<'a> Dispatcher<'a> {
    pub fn new(resolver: Resolver<'a>, scopes: &'a ScopeTable, width: usize) -> Self {
        Dispatcher {
            resolver,
            scopes,
            width,
            node_chain: Vec::new(),
            frames: vec![Frame::default()],
            functions: Vec::new(),
            visits: 0,
        }
    }

    /// Nodes visited so far.
    pub fn visits(&self) -> u64 {
        self.visits
    }

    /// Kind of the node currently being visited.
    pub fn current(&self) -> Option<SyntaxKind> {
        self.node_chain.last().copied()
    }

    /// Kind of the parent of the node currently being visited.
    pub fn parent(&self) -> Option<SyntaxKind> {
        self.node_chain.iter().rev().nth(1).copied()
    }

    /// Visit one node.
    ///
    /// An explicit `context` overrides the inherited one. With `inherit`
    /// false the node starts from a blank frame: no context besides the
    /// explicit one, no enclosing function, no loop labels.
    ///
    /// Statements yield lines; expressions yield text.
    pub fn visit(
        &mut self,
        node: Node<'_>,
        context: Option<&str>,
        inherit: bool,
    ) -> CompileResult<Fragment> {
        match node {
            Node::Module(module) => {
                self.enter(SyntaxKind::Module, context, inherit);
                let result = self.module_body(module);
                self.leave();
                result.map(Fragment::Lines)
            }
            Node::Stmt(stmt) => {
                let ops = self.stmt_with(stmt, context, inherit)?;
                Ok(Fragment::Lines(linearize::render_ops(&ops, self.width)))
            }
            Node::Expr(expr) => self.expr_with(expr, context, inherit).map(Fragment::Text),
        }
    }

    /// Lower a function definition without rendering it.
    pub fn lower_function(&mut self, def: &FunctionDef) -> CompileResult<StateMachine> {
        self.functions.push(FunctionBuilder::new(def));
        let index = self.functions.len() - 1;
        self.frames.push(Frame {
            context: Some(linearize::LOCALS.to_owned()),
            function: Some(index),
            ..Frame::default()
        });

        let result = self.function_body(def);

        self.frames.pop();
        self.functions.pop();
        Ok(linearize::finish(def, result?))
    }

    fn function_body(&mut self, def: &FunctionDef) -> CompileResult<Vec<Op>> {
        let mut ops = Vec::new();
        let mut defaults = Vec::new();
        for param in &def.params {
            if let Some(default) = &param.default {
                let value = self.expr(default)?;
                let local = self.local(&param.name);
                defaults.push(format!("if ({local} === undefined) {local} = {value};"));
            }
        }
        if !defaults.is_empty() {
            ops.push(Op::Code(defaults));
        }
        ops.extend(self.block(&def.body)?);
        Ok(ops)
    }

    fn module_body(&mut self, module: &Module) -> CompileResult<Vec<String>> {
        let mut lines = Vec::new();
        for stmt in &module.body {
            let ops = self.stmt(stmt)?;
            lines.extend(linearize::render_ops(&ops, self.width));
        }
        Ok(lines)
    }

    // ========================================
    // Walk plumbing
    // ========================================

    fn enter(&mut self, kind: SyntaxKind, context: Option<&str>, inherit: bool) {
        self.visits += 1;
        self.node_chain.push(kind);
        let mut frame = if inherit {
            self.frame().clone()
        } else {
            Frame::default()
        };
        if let Some(context) = context {
            frame.context = Some(context.to_owned());
        }
        self.frames.push(frame);
    }

    fn leave(&mut self) {
        self.node_chain.pop();
        self.frames.pop();
    }

    fn frame(&self) -> &Frame {
        // The root frame is never popped.
        &self.frames[self.frames.len() - 1]
    }

    fn frame_mut(&mut self) -> &mut Frame {
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }

    pub(crate) fn stmt(&mut self, stmt: &Stmt) -> CompileResult<Vec<Op>> {
        self.stmt_with(stmt, None, true)
    }

    pub(crate) fn stmt_with(
        &mut self,
        stmt: &Stmt,
        context: Option<&str>,
        inherit: bool,
    ) -> CompileResult<Vec<Op>> {
        self.enter(stmt.kind(), context, inherit);
        let result = self.lower_stmt(stmt);
        self.leave();
        result
    }

    pub(crate) fn block(&mut self, body: &[Stmt]) -> CompileResult<Vec<Op>> {
        let mut ops = Vec::new();
        for stmt in body {
            ops.extend(self.stmt(stmt)?);
        }
        Ok(ops)
    }

    /// Lower a block outside any function, where only straight code exists.
    pub(crate) fn block_lines(&mut self, body: &[Stmt]) -> CompileResult<Vec<String>> {
        let ops = self.block(body)?;
        Ok(linearize::render_ops(&ops, self.width))
    }

    pub(crate) fn expr(&mut self, expr: &Expr) -> CompileResult<String> {
        self.expr_with(expr, None, true)
    }

    fn expr_with(
        &mut self,
        expr: &Expr,
        context: Option<&str>,
        inherit: bool,
    ) -> CompileResult<String> {
        self.enter(expr.kind(), context, inherit);
        let result = self.lower_expr(expr);
        self.leave();
        result
    }

    fn lower_expr(&mut self, expr: &Expr) -> CompileResult<String> {
        match expr {
            Expr::BoolOp { op, values } => self.bool_op(*op, values),
            Expr::BinOp { left, op, right } => self.bin_op(left, *op, right),
            Expr::UnaryOp { op, operand } => self.unary_op(*op, operand),
            Expr::Compare {
                left,
                ops,
                comparators,
            } => self.compare(left, ops, comparators),
            Expr::Call { func, args } => self.call(func, args),
            Expr::Attribute { value, attr } => self.attribute(value, attr),
            Expr::Subscript { value, index } => self.subscript(value, index),
            Expr::Name(id) => Ok(self.name(id)),
            Expr::Num(number) => Ok(number.to_string()),
            Expr::Str(text) => Ok(crate::emit::string_literal(text)),
            Expr::List(items) | Expr::Tuple(items) => self.sequence(items),
            Expr::Dict { keys, values } => self.dict(keys, values),
            Expr::IfExp { test, body, orelse } => {
                let test = self.expr(test)?;
                let body = self.expr(body)?;
                let orelse = self.expr(orelse)?;
                Ok(format!("({test} ? {body} : {orelse})"))
            }
            Expr::Yield(_) => {
                self.require_function(SyntaxKind::Yield)?;
                Err(CompileError::unsupported(
                    SyntaxKind::Yield,
                    "yield must be a statement or the whole value of an assignment",
                ))
            }
            Expr::Lambda { .. }
            | Expr::ListComp(_)
            | Expr::DictComp(_)
            | Expr::GeneratorExp(_)
            | Expr::Starred(_)
            | Expr::Slice { .. } => Err(CompileError::unsupported(
                expr.kind(),
                "no lowering exists for this expression",
            )),
        }
    }

    // ========================================
    // Function state
    // ========================================

    fn builder(&self) -> Option<&FunctionBuilder> {
        self.frame().function.map(|index| &self.functions[index])
    }

    fn builder_mut(&mut self) -> Option<&mut FunctionBuilder> {
        let index = self.frame().function?;
        self.functions.get_mut(index)
    }

    /// The function being lowered, or `InvalidControlFlowContext` for
    /// `statement` outside one.
    fn require_function(&mut self, statement: SyntaxKind) -> CompileResult<&mut FunctionBuilder> {
        self.builder_mut()
            .ok_or_else(|| CompileError::outside(statement, "a function body"))
    }

    pub(crate) fn in_function(&self) -> bool {
        self.frame().function.is_some()
    }

    /// Receiver path for definitions at the current position.
    pub(crate) fn context(&self) -> &str {
        self.frame().context.as_deref().unwrap_or("this")
    }

    /// Explicit receiver path, if any. Module level has none.
    fn explicit_context(&self) -> Option<&str> {
        self.frame().context.as_deref()
    }

    fn local(&self, name: &str) -> String {
        format!("{}.{}", linearize::LOCALS, crate::resolve::escape(name))
    }
}
