//! Names, attribute and item loads, and literals.

use avalon_ir::{Expr, SyntaxKind};

use super::Dispatcher;
use crate::emit::string_literal;
use crate::error::{CompileError, CompileResult};
use crate::resolve::escape;

impl Dispatcher<'_> {
    /// Locals first, then the resolver; unresolved names pass through.
    pub(super) fn name(&self, id: &str) -> String {
        if self.is_local(id) {
            return self.local(id);
        }
        match self.resolver.lookup(id) {
            Some(resolved) => resolved.target().to_owned(),
            None => escape(id).into_owned(),
        }
    }

    pub(super) fn is_local(&self, id: &str) -> bool {
        self.builder().is_some_and(|b| b.is_local(id))
    }

    pub(super) fn attribute(&mut self, value: &Expr, attr: &str) -> CompileResult<String> {
        let object = self.expr(value)?;
        Ok(format!("getattr({object}, {})", string_literal(attr)))
    }

    pub(super) fn subscript(&mut self, value: &Expr, index: &Expr) -> CompileResult<String> {
        if matches!(index, Expr::Slice { .. }) {
            return Err(CompileError::unsupported(
                SyntaxKind::Slice,
                "slicing is not supported",
            ));
        }
        let object = self.expr(value)?;
        let key = self.expr(index)?;
        Ok(format!("getitem({object}, {key})"))
    }

    pub(super) fn sequence(&mut self, items: &[Expr]) -> CompileResult<String> {
        let items = items
            .iter()
            .map(|item| self.expr(item))
            .collect::<CompileResult<Vec<_>>>()?;
        Ok(format!("[{}]", items.join(", ")))
    }

    pub(super) fn dict(&mut self, keys: &[Expr], values: &[Expr]) -> CompileResult<String> {
        let mut entries = Vec::with_capacity(keys.len());
        for (key, value) in keys.iter().zip(values) {
            let key = self.expr(key)?;
            let value = self.expr(value)?;
            entries.push(format!("{key}: {value}"));
        }
        Ok(format!("{{{}}}", entries.join(", ")))
    }
}
