//! Call handlers.
//!
//! Every call goes through `Function.prototype.apply` with an explicit
//! receiver: the object an attribute was loaded from, or `this`.

use avalon_ir::{Expr, SyntaxKind};

use super::Dispatcher;
use crate::error::{CompileError, CompileResult};
use crate::resolve::{Intrinsic, Resolved};

impl Dispatcher<'_> {
    pub(super) fn call(&mut self, func: &Expr, args: &[Expr]) -> CompileResult<String> {
        match self.intrinsic(func) {
            Some(Intrinsic::RawCode) => {
                let code = raw_code_argument(args)?;
                return Ok(code.trim().to_owned());
            }
            Some(Intrinsic::Print) => {
                let args = self.arguments(args)?;
                return Ok(format!("console.log({args})"));
            }
            None => {}
        }

        let receiver = match func {
            Expr::Attribute { value, .. } => self.expr(value)?,
            _ => "this".to_owned(),
        };
        let callee = self.expr(func)?;
        let args = self.arguments(args)?;
        Ok(format!("{callee}.apply({receiver}, [{args}])"))
    }

    /// The code of a `JSCode("...")` call, if `value` is one.
    pub(super) fn raw_code(&mut self, value: &Expr) -> CompileResult<Option<String>> {
        match value {
            Expr::Call { func, args } if self.intrinsic(func) == Some(Intrinsic::RawCode) => {
                raw_code_argument(args).map(|code| Some(code.to_owned()))
            }
            _ => Ok(None),
        }
    }

    fn intrinsic(&self, func: &Expr) -> Option<Intrinsic> {
        let name = func.as_name()?;
        if self.is_local(name) {
            return None;
        }
        match self.resolver.lookup(name)? {
            Resolved::Intrinsic(intrinsic) => Some(intrinsic),
            _ => None,
        }
    }

    fn arguments(&mut self, args: &[Expr]) -> CompileResult<String> {
        let args = args
            .iter()
            .map(|a| self.expr(a))
            .collect::<CompileResult<Vec<_>>>()?;
        Ok(args.join(", "))
    }
}

fn raw_code_argument(args: &[Expr]) -> CompileResult<&str> {
    match args {
        [Expr::Str(code)] => Ok(code),
        _ => Err(CompileError::unsupported(
            SyntaxKind::Call,
            "JSCode takes a single string literal",
        )),
    }
}
