//! Read-only tree traversal.
//!
//! Override `visit_*` methods to act on specific nodes and call the matching
//! `walk_*` function to continue into children. Not calling `walk_*` prunes
//! the subtree, which is how scope-aware passes stop at nested definitions.
//!
//! # Example
//!
//! ```text
//! struct CountYields(usize);
//!
//! impl<'ast> Visitor<'ast> for CountYields {
//!     fn visit_expr(&mut self, expr: &'ast Expr) {
//!         if let Expr::Yield(_) = expr {
//!             self.0 += 1;
//!         }
//!         walk_expr(self, expr);
//!     }
//! }
//! ```

use crate::ast::{ClassDef, ExceptHandler, Expr, FunctionDef, Module, Stmt};

pub trait Visitor<'ast> {
    fn visit_module(&mut self, module: &'ast Module) {
        walk_block(self, &module.body);
    }

    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        walk_stmt(self, stmt);
    }

    fn visit_function(&mut self, def: &'ast FunctionDef) {
        walk_function(self, def);
    }

    fn visit_class(&mut self, class: &'ast ClassDef) {
        walk_class(self, class);
    }

    fn visit_handler(&mut self, handler: &'ast ExceptHandler) {
        walk_handler(self, handler);
    }

    fn visit_expr(&mut self, expr: &'ast Expr) {
        walk_expr(self, expr);
    }
}

pub fn walk_block<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, body: &'ast [Stmt]) {
    for stmt in body {
        visitor.visit_stmt(stmt);
    }
}

pub fn walk_function<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, def: &'ast FunctionDef) {
    for decorator in &def.decorators {
        visitor.visit_expr(decorator);
    }
    for param in &def.params {
        if let Some(default) = &param.default {
            visitor.visit_expr(default);
        }
    }
    walk_block(visitor, &def.body);
}

pub fn walk_class<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, class: &'ast ClassDef) {
    for decorator in &class.decorators {
        visitor.visit_expr(decorator);
    }
    for base in &class.bases {
        visitor.visit_expr(base);
    }
    walk_block(visitor, &class.body);
}

pub fn walk_handler<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    handler: &'ast ExceptHandler,
) {
    if let Some(class) = &handler.class {
        visitor.visit_expr(class);
    }
    walk_block(visitor, &handler.body);
}

pub fn walk_stmt<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, stmt: &'ast Stmt) {
    match stmt {
        Stmt::FunctionDef(def) => visitor.visit_function(def),
        Stmt::ClassDef(class) => visitor.visit_class(class),
        Stmt::Return(value) | Stmt::Raise(value) => {
            if let Some(value) = value {
                visitor.visit_expr(value);
            }
        }
        Stmt::Assign { targets, value } => {
            for target in targets {
                visitor.visit_expr(target);
            }
            visitor.visit_expr(value);
        }
        Stmt::AugAssign { target, value, .. } => {
            visitor.visit_expr(target);
            visitor.visit_expr(value);
        }
        Stmt::For {
            target,
            iter,
            body,
            orelse,
        } => {
            visitor.visit_expr(target);
            visitor.visit_expr(iter);
            walk_block(visitor, body);
            walk_block(visitor, orelse);
        }
        Stmt::While { test, body, orelse } | Stmt::If { test, body, orelse } => {
            visitor.visit_expr(test);
            walk_block(visitor, body);
            walk_block(visitor, orelse);
        }
        Stmt::Try {
            body,
            handlers,
            orelse,
            finalbody,
        } => {
            walk_block(visitor, body);
            for handler in handlers {
                visitor.visit_handler(handler);
            }
            walk_block(visitor, orelse);
            walk_block(visitor, finalbody);
        }
        Stmt::Expr(value) => visitor.visit_expr(value),
        Stmt::With { items, body } => {
            for item in items {
                visitor.visit_expr(item);
            }
            walk_block(visitor, body);
        }
        Stmt::Delete(targets) => {
            for target in targets {
                visitor.visit_expr(target);
            }
        }
        Stmt::Assert { test, msg } => {
            visitor.visit_expr(test);
            if let Some(msg) = msg {
                visitor.visit_expr(msg);
            }
        }
        Stmt::Import(_)
        | Stmt::Pass
        | Stmt::Break
        | Stmt::Continue
        | Stmt::Global(_) => {}
    }
}

pub fn walk_expr<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, expr: &'ast Expr) {
    match expr {
        Expr::BoolOp { values, .. } | Expr::List(values) | Expr::Tuple(values) => {
            for value in values {
                visitor.visit_expr(value);
            }
        }
        Expr::BinOp { left, right, .. } => {
            visitor.visit_expr(left);
            visitor.visit_expr(right);
        }
        Expr::UnaryOp { operand, .. } => visitor.visit_expr(operand),
        Expr::Compare {
            left, comparators, ..
        } => {
            visitor.visit_expr(left);
            for comparator in comparators {
                visitor.visit_expr(comparator);
            }
        }
        Expr::Call { func, args } => {
            visitor.visit_expr(func);
            for arg in args {
                visitor.visit_expr(arg);
            }
        }
        Expr::Attribute { value, .. } => visitor.visit_expr(value),
        Expr::Subscript { value, index } => {
            visitor.visit_expr(value);
            visitor.visit_expr(index);
        }
        Expr::Dict { keys, values } => {
            for (key, value) in keys.iter().zip(values) {
                visitor.visit_expr(key);
                visitor.visit_expr(value);
            }
        }
        Expr::IfExp { test, body, orelse } => {
            visitor.visit_expr(test);
            visitor.visit_expr(body);
            visitor.visit_expr(orelse);
        }
        Expr::Yield(value) => {
            if let Some(value) = value {
                visitor.visit_expr(value);
            }
        }
        Expr::Lambda { body, .. } => visitor.visit_expr(body),
        Expr::ListComp(inner)
        | Expr::DictComp(inner)
        | Expr::GeneratorExp(inner)
        | Expr::Starred(inner) => visitor.visit_expr(inner),
        Expr::Slice { lower, upper } => {
            for bound in [lower, upper].into_iter().flatten() {
                visitor.visit_expr(bound);
            }
        }
        Expr::Name(_) | Expr::Num(_) | Expr::Str(_) => {}
    }
}

// ── Scope queries ───────────────────────────────────────────────────

/// Whether a function body suspends, i.e. contains a `yield` outside any
/// nested definition.
pub fn contains_yield(body: &[Stmt]) -> bool {
    struct FindYield(bool);

    impl<'ast> Visitor<'ast> for FindYield {
        fn visit_function(&mut self, _def: &'ast FunctionDef) {}

        fn visit_class(&mut self, _class: &'ast ClassDef) {}

        fn visit_expr(&mut self, expr: &'ast Expr) {
            if matches!(expr, Expr::Yield(_)) {
                self.0 = true;
            } else {
                walk_expr(self, expr);
            }
        }
    }

    let mut finder = FindYield(false);
    walk_block(&mut finder, body);
    finder.0
}

/// Names bound by a function body: parameters excluded, nested definitions
/// included by name only. Source order, no duplicates.
pub fn bound_names(body: &[Stmt]) -> Vec<&str> {
    struct Bindings<'ast> {
        names: Vec<&'ast str>,
        seen: rustc_hash::FxHashSet<&'ast str>,
    }

    impl<'ast> Bindings<'ast> {
        fn bind(&mut self, name: &'ast str) {
            if self.seen.insert(name) {
                self.names.push(name);
            }
        }

        fn bind_target(&mut self, target: &'ast Expr) {
            match target {
                Expr::Name(id) => self.bind(id),
                Expr::Tuple(items) | Expr::List(items) => {
                    for item in items {
                        self.bind_target(item);
                    }
                }
                _ => {}
            }
        }
    }

    impl<'ast> Visitor<'ast> for Bindings<'ast> {
        fn visit_stmt(&mut self, stmt: &'ast Stmt) {
            match stmt {
                Stmt::Assign { targets, .. } => {
                    for target in targets {
                        self.bind_target(target);
                    }
                }
                Stmt::AugAssign { target, .. } | Stmt::For { target, .. } => {
                    self.bind_target(target);
                }
                _ => {}
            }
            walk_stmt(self, stmt);
        }

        fn visit_function(&mut self, def: &'ast FunctionDef) {
            self.bind(&def.name);
        }

        fn visit_class(&mut self, class: &'ast ClassDef) {
            self.bind(&class.name);
        }

        fn visit_handler(&mut self, handler: &'ast ExceptHandler) {
            if let Some(name) = &handler.name {
                self.bind(name);
            }
            walk_handler(self, handler);
        }
    }

    let mut bindings = Bindings {
        names: Vec::new(),
        seen: rustc_hash::FxHashSet::default(),
    };
    walk_block(&mut bindings, body);
    bindings.names
}

#[cfg(test)]
mod tests;
