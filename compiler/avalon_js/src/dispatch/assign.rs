//! Assignment handlers.
//!
//! Stores never write object fields directly: attribute and item stores go
//! through the runtime `setattr`/`setitem` so objects can intercept them.
//! Names are stored onto the current receiver (function locals, a class
//! prototype, a reactive scope) or declared with `var` at module level.

use avalon_ir::{BinOp, Expr, SyntaxKind};

use super::operators::binary;
use super::Dispatcher;
use crate::emit::string_literal;
use crate::error::{CompileError, CompileResult};
use crate::linearize::Op;
use crate::resolve::escape;

/// Temporary holding the value of a chained or unpacking assignment.
const TEMP: &str = "$assign";

/// Where a resumed generator finds the value passed to `send`.
const SENT: &str = "$ctx.send";

impl Dispatcher<'_> {
    pub(super) fn assign(&mut self, targets: &[Expr], value: &Expr) -> CompileResult<Vec<Op>> {
        if let Expr::Yield(yielded) = value {
            let mut ops = self.yield_(yielded.as_deref())?;
            ops.push(Op::Code(self.store_all(targets, SENT)?));
            return Ok(ops);
        }
        let value = self.expr(value)?;
        Ok(vec![Op::Code(self.store_all(targets, &value)?)])
    }

    /// Store `value` into every target, unpacking tuple and list targets.
    pub(super) fn store_all(&mut self, targets: &[Expr], value: &str) -> CompileResult<Vec<String>> {
        if let [single] = targets {
            if !matches!(single, Expr::Tuple(_) | Expr::List(_)) {
                return Ok(vec![self.store(single, value)?]);
            }
        }

        let mut lines = vec![format!("var {TEMP} = {value};")];
        for target in targets {
            match target {
                Expr::Tuple(items) | Expr::List(items) => {
                    for (i, item) in items.iter().enumerate() {
                        lines.push(self.store(item, &format!("{TEMP}[{i}]"))?);
                    }
                }
                _ => lines.push(self.store(target, TEMP)?),
            }
        }
        Ok(lines)
    }

    pub(super) fn aug_assign(
        &mut self,
        target: &Expr,
        op: BinOp,
        value: &Expr,
    ) -> CompileResult<Vec<String>> {
        if !matches!(
            target,
            Expr::Name(_) | Expr::Attribute { .. } | Expr::Subscript { .. }
        ) {
            return Err(CompileError::InvalidAssignmentTarget {
                target: target.kind(),
            });
        }
        let current = self.expr(target)?;
        let value = self.expr(value)?;
        Ok(vec![self.store(target, &binary(op, &current, &value))?])
    }

    fn store(&mut self, target: &Expr, value: &str) -> CompileResult<String> {
        self.enter(target.kind(), None, true);
        let result = self.lower_store(target, value);
        self.leave();
        result
    }

    fn lower_store(&mut self, target: &Expr, value: &str) -> CompileResult<String> {
        match target {
            Expr::Name(id) => Ok(match self.explicit_context() {
                Some(context) => format!("{context}.{} = {value};", escape(id)),
                None => format!("var {} = {value};", escape(id)),
            }),
            Expr::Attribute { value: object, attr } => {
                let object = self.expr(object)?;
                Ok(format!(
                    "setattr({object}, {}, {value});",
                    string_literal(attr)
                ))
            }
            Expr::Subscript {
                value: object,
                index,
            } => {
                if matches!(**index, Expr::Slice { .. }) {
                    return Err(CompileError::unsupported(
                        SyntaxKind::Slice,
                        "slice assignment is not supported",
                    ));
                }
                let object = self.expr(object)?;
                let key = self.expr(index)?;
                Ok(format!("setitem({object}, {key}, {value});"))
            }
            _ => Err(CompileError::InvalidAssignmentTarget {
                target: target.kind(),
            }),
        }
    }
}
