//! Statement handlers.
//!
//! Inside a function body every statement lowers to [`Op`]s for the state
//! machine. Outside one (module level, class bodies) control flow stays
//! structured and only [`Op::Code`] is produced.

use avalon_ir::{ExceptHandler, Expr, FunctionDef, Stmt, SyntaxKind};

use super::Dispatcher;
use crate::emit::{extend, indent, raw_lines};
use crate::error::{CompileError, CompileResult};
use crate::linearize::control_flow::{
    escape_to, suspend, Clause, Conditional, ForLoop, LoopPoints, TryBlock, WhileLoop,
};
use crate::linearize::{self, Op};

impl Dispatcher<'_> {
    pub(super) fn lower_stmt(&mut self, stmt: &Stmt) -> CompileResult<Vec<Op>> {
        match stmt {
            Stmt::FunctionDef(def) => self.function_def(def).map(code),
            Stmt::ClassDef(class) => self.class_def(class).map(code),
            Stmt::Return(value) => self.return_(value.as_ref()),
            Stmt::Assign { targets, value } => self.assign(targets, value),
            Stmt::AugAssign { target, op, value } => self.aug_assign(target, *op, value).map(code),
            Stmt::For {
                target,
                iter,
                body,
                orelse,
            } => self.for_(target, iter, body, orelse),
            Stmt::While { test, body, orelse } => self.while_(test, body, orelse),
            Stmt::If { test, body, orelse } => self.if_(test, body, orelse),
            Stmt::Try {
                body,
                handlers,
                orelse,
                finalbody,
            } => self.try_(body, handlers, orelse, finalbody),
            Stmt::Raise(value) => self.raise(value.as_ref()),
            Stmt::Import(_) => Ok(Vec::new()),
            Stmt::Expr(value) => self.expr_stmt(value),
            Stmt::Pass => Ok(code(vec!["// pass".to_owned()])),
            Stmt::Break => self.jump_out(SyntaxKind::Break),
            Stmt::Continue => self.jump_out(SyntaxKind::Continue),
            Stmt::With { .. } | Stmt::Delete(_) | Stmt::Global(_) | Stmt::Assert { .. } => Err(
                CompileError::unsupported(stmt.kind(), "no lowering exists for this statement"),
            ),
        }
    }

    // ========================================
    // Definitions
    // ========================================

    fn function_def(&mut self, def: &FunctionDef) -> CompileResult<Vec<String>> {
        let context = self.context().to_owned();
        let machine = self.lower_function(def)?;
        Ok(linearize::render(&machine, &context, self.width))
    }

    fn return_(&mut self, value: Option<&Expr>) -> CompileResult<Vec<Op>> {
        self.require_function(SyntaxKind::Return)?;
        let value = value.map(|v| self.expr(v)).transpose()?;
        Ok(vec![Op::Return(value)])
    }

    // ========================================
    // Expression statements and yield
    // ========================================

    fn expr_stmt(&mut self, value: &Expr) -> CompileResult<Vec<Op>> {
        if let Expr::Yield(yielded) = value {
            return self.yield_(yielded.as_deref());
        }
        if let Some(raw) = self.raw_code(value)? {
            return Ok(code(raw_lines(&raw)));
        }
        let value = self.expr(value)?;
        Ok(code(vec![format!("{value};")]))
    }

    /// Suspend the machine; the resumed value is left in `$ctx.send`.
    pub(super) fn yield_(&mut self, value: Option<&Expr>) -> CompileResult<Vec<Op>> {
        self.require_function(SyntaxKind::Yield)?;
        let value = match value {
            Some(value) => self.expr(value)?,
            None => "undefined".to_owned(),
        };
        let branch = &mut self.require_function(SyntaxKind::Yield)?.branch;
        Ok(suspend(branch, value))
    }

    // ========================================
    // Conditionals and loops
    // ========================================

    fn if_(&mut self, test: &Expr, body: &[Stmt], orelse: &[Stmt]) -> CompileResult<Vec<Op>> {
        let test = self.expr(test)?;
        if !self.in_function() {
            return self.structured_if(test, body, orelse);
        }

        let shape = Conditional::open(&mut self.require_function(SyntaxKind::If)?.branch);
        let body = self.block(body)?;
        let orelse = self.block(orelse)?;
        Ok(shape.close(test, body, orelse))
    }

    /// `if` outside a function: there is no dispatch loop to jump in.
    fn structured_if(
        &mut self,
        test: String,
        body: &[Stmt],
        orelse: &[Stmt],
    ) -> CompileResult<Vec<Op>> {
        let mut tpl = vec![format!("if ({test}) {{")];
        let body = self.block_lines(body)?;
        extend(&mut tpl, indent(body, self.width, 1));
        if orelse.is_empty() {
            tpl.push("}".to_owned());
        } else {
            tpl.push("} else {".to_owned());
            let orelse = self.block_lines(orelse)?;
            extend(&mut tpl, indent(orelse, self.width, 1));
            tpl.push("}".to_owned());
        }
        Ok(code(tpl))
    }

    fn while_(&mut self, test: &Expr, body: &[Stmt], orelse: &[Stmt]) -> CompileResult<Vec<Op>> {
        if !orelse.is_empty() {
            return Err(CompileError::unsupported(
                SyntaxKind::While,
                "while-else is not supported",
            ));
        }
        let shape = WhileLoop::open(&mut self.require_function(SyntaxKind::While)?.branch);
        let test = self.expr(test)?;
        let body = self.loop_body(shape.points, body)?;
        Ok(shape.close(test, body))
    }

    fn for_(
        &mut self,
        target: &Expr,
        iter: &Expr,
        body: &[Stmt],
        orelse: &[Stmt],
    ) -> CompileResult<Vec<Op>> {
        if !orelse.is_empty() {
            return Err(CompileError::unsupported(
                SyntaxKind::For,
                "for-else is not supported",
            ));
        }
        let shape = ForLoop::open(&mut self.require_function(SyntaxKind::For)?.branch);
        let iterable = self.expr(iter)?;
        let bind = self.store_all(std::slice::from_ref(target), &shape.step())?;
        let body = self.loop_body(shape.points, body)?;
        Ok(shape.close(&iterable, bind, body))
    }

    /// Lower a loop body with `points` as the `break`/`continue` targets.
    fn loop_body(&mut self, points: LoopPoints, body: &[Stmt]) -> CompileResult<Vec<Op>> {
        let depth = self.builder().map_or(0, |b| b.handler_depth());
        let frame = self.frame_mut();
        frame.loop_points = Some(points);
        frame.loop_depth = depth;
        self.block(body)
    }

    fn jump_out(&mut self, statement: SyntaxKind) -> CompileResult<Vec<Op>> {
        let Some(points) = self.frame().loop_points else {
            return Err(CompileError::outside(statement, "a loop"));
        };
        let popped = self
            .builder()
            .map_or(0, |b| b.handler_depth())
            .saturating_sub(self.frame().loop_depth);
        let target = if statement == SyntaxKind::Break {
            points.break_point
        } else {
            points.loop_point
        };
        Ok(escape_to(target, popped))
    }

    // ========================================
    // Exceptions
    // ========================================

    fn try_(
        &mut self,
        body: &[Stmt],
        handlers: &[ExceptHandler],
        orelse: &[Stmt],
        finalbody: &[Stmt],
    ) -> CompileResult<Vec<Op>> {
        let builder = self.require_function(SyntaxKind::Try)?;
        if !finalbody.is_empty() {
            return Err(CompileError::unsupported(
                SyntaxKind::Try,
                "try-finally is not supported",
            ));
        }
        let shape = TryBlock::open(&mut builder.branch);

        builder.enter_handler();
        let body = self.block(body);
        if let Some(builder) = self.builder_mut() {
            builder.exit_handler();
        }
        let body = body?;
        let orelse = self.block(orelse)?;

        let mut clauses = Vec::with_capacity(handlers.len());
        for handler in handlers {
            let catch_all = handler.class.is_none();
            self.enter(SyntaxKind::ExceptHandler, None, true);
            let clause = self.clause(handler);
            self.leave();
            clauses.push(clause?);
            if catch_all {
                break;
            }
        }
        Ok(shape.close(body, orelse, clauses))
    }

    fn clause(&mut self, handler: &ExceptHandler) -> CompileResult<Clause> {
        self.frame_mut().in_handler = true;
        let class = match &handler.class {
            Some(class) => {
                let classes = match class {
                    Expr::Tuple(elts) | Expr::List(elts) => elts
                        .iter()
                        .map(|elt| self.expr(elt))
                        .collect::<CompileResult<Vec<_>>>()?,
                    class => vec![self.expr(class)?],
                };
                let next = self.require_function(SyntaxKind::ExceptHandler)?.branch.create();
                Some((classes, next))
            }
            None => None,
        };
        let bind = handler.name.as_deref().map(|name| self.local(name));
        let body = self.block(&handler.body)?;
        Ok(Clause { class, bind, body })
    }

    fn raise(&mut self, value: Option<&Expr>) -> CompileResult<Vec<Op>> {
        match value {
            Some(value) => Ok(vec![Op::Throw(self.expr(value)?)]),
            None if self.frame().in_handler => Ok(vec![Op::Rethrow]),
            None => Err(CompileError::outside(SyntaxKind::Raise, "an except clause")),
        }
    }
}

fn code(lines: Vec<String>) -> Vec<Op> {
    if lines.is_empty() {
        Vec::new()
    } else {
        vec![Op::Code(lines)]
    }
}
