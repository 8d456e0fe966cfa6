//! Operator handlers.

use avalon_ir::{BinOp, BoolOp, CmpOp, Expr, SyntaxKind, UnaryOp};

use super::Dispatcher;
use crate::error::{CompileError, CompileResult};

/// Render a binary operation on already-rendered operands.
pub(super) fn binary(op: BinOp, left: &str, right: &str) -> String {
    let symbol = match op {
        BinOp::Pow => return format!("Math.pow({left}, {right})"),
        BinOp::FloorDiv => return format!("Math.floor({left} / {right})"),
        BinOp::Add => "+",
        BinOp::Sub => "-",
        BinOp::Mult => "*",
        BinOp::Div => "/",
        BinOp::Mod => "%",
        BinOp::LShift => "<<",
        BinOp::RShift => ">>",
        BinOp::BitOr => "|",
        BinOp::BitXor => "^",
        BinOp::BitAnd => "&",
    };
    format!("({left} {symbol} {right})")
}

fn comparison(op: CmpOp) -> CompileResult<&'static str> {
    Ok(match op {
        CmpOp::Eq => "==",
        CmpOp::NotEq => "!=",
        CmpOp::Lt => "<",
        CmpOp::LtE => "<=",
        CmpOp::Gt => ">",
        CmpOp::GtE => ">=",
        CmpOp::Is => "===",
        CmpOp::IsNot => "!==",
        CmpOp::In | CmpOp::NotIn => {
            return Err(CompileError::unsupported(
                SyntaxKind::Compare,
                "membership tests are not supported",
            ))
        }
    })
}

impl Dispatcher<'_> {
    pub(super) fn bool_op(&mut self, op: BoolOp, values: &[Expr]) -> CompileResult<String> {
        let separator = match op {
            BoolOp::And => " && ",
            BoolOp::Or => " || ",
        };
        let values = values
            .iter()
            .map(|v| self.expr(v))
            .collect::<CompileResult<Vec<_>>>()?;
        Ok(format!("({})", values.join(separator)))
    }

    pub(super) fn bin_op(&mut self, left: &Expr, op: BinOp, right: &Expr) -> CompileResult<String> {
        let left = self.expr(left)?;
        let right = self.expr(right)?;
        Ok(binary(op, &left, &right))
    }

    pub(super) fn unary_op(&mut self, op: UnaryOp, operand: &Expr) -> CompileResult<String> {
        let symbol = match op {
            UnaryOp::Invert => "~",
            UnaryOp::Not => "!",
            UnaryOp::UAdd => "+",
            UnaryOp::USub => "-",
        };
        let operand = self.expr(operand)?;
        Ok(format!("{symbol}({operand})"))
    }

    /// `a < b < c` becomes `(a < b) && (b < c)`.
    pub(super) fn compare(
        &mut self,
        left: &Expr,
        ops: &[CmpOp],
        comparators: &[Expr],
    ) -> CompileResult<String> {
        let mut left = self.expr(left)?;
        let mut parts = Vec::with_capacity(ops.len());
        for (op, right) in ops.iter().zip(comparators) {
            let symbol = comparison(*op)?;
            let right = self.expr(right)?;
            parts.push(format!("({left} {symbol} {right})"));
            left = right;
        }
        Ok(parts.join(" && "))
    }
}
