//! Class and reactive-scope code generation.
//!
//! An ordinary class becomes a constructor function plus a prototype:
//!
//! ```text
//! ctx.C = function C() { ... }                      constructor, `new` optional
//! ctx.C.prototype = Object.create(Base.prototype)   only with a base
//! ctx.C.prototype.m = function m(self, ...) { ... } one per method
//! ctx.C.$bind = function $bind(self) { ... }        per-instance method binding
//! ctx.C.$inject = []
//! ```
//!
//! A class whose base is a registered [`ScopeDescriptor`] is emitted as a
//! controller instead: the body runs against the injected `$scope`, its
//! ordinary methods are bound to the scope, and event wiring, teardown and
//! attribute fallback are appended.

use avalon_ir::{ClassDef, Expr, Stmt, SyntaxKind};
use tracing::debug;

use crate::config::ScopeDescriptor;
use crate::dispatch::Dispatcher;
use crate::emit::{extend, indent, reindent, string_array, string_literal};
use crate::error::{CompileError, CompileResult};
use crate::linearize::render_ops;
use crate::resolve::escape;
use crate::runtime::BIND_METHOD;

/// Framework-injected constructor parameters of a reactive scope.
const SCOPE_INJECT: [&str; 2] = ["$scope", "$element"];

/// The name a base expression is registered under: `Base` or `module.Base`.
fn base_name(base: &Expr) -> Option<&str> {
    match base {
        Expr::Name(id) => Some(id),
        Expr::Attribute { attr, .. } => Some(attr),
        _ => None,
    }
}

/// Double-underscore hooks stay unbound; the runtime passes the receiver.
fn is_hook(method: &str) -> bool {
    method.len() > 4 && method.starts_with("__") && method.ends_with("__")
}

impl Dispatcher<'_> {
    pub(crate) fn class_def(&mut self, class: &ClassDef) -> CompileResult<Vec<String>> {
        let base = match class.bases.as_slice() {
            [] => None,
            [base] => Some(base),
            bases => {
                return Err(CompileError::unsupported(
                    SyntaxKind::ClassDef,
                    format!(
                        "class `{}` has {} bases; only single inheritance is supported",
                        class.name,
                        bases.len()
                    ),
                ))
            }
        };

        let scope = base
            .and_then(base_name)
            .and_then(|name| self.scopes.get(name))
            .cloned();
        match scope {
            Some(scope) => self.scope_class(class, &scope),
            None => self.plain_class(class, base),
        }
    }

    /// Lower class-body statements onto `context`. Class bodies inherit no
    /// function, loop or handler state from where the class is defined.
    fn class_body(&mut self, body: &[Stmt], context: &str) -> CompileResult<Vec<String>> {
        let mut lines = Vec::new();
        for stmt in body {
            let ops = self.stmt_with(stmt, Some(context), false)?;
            lines.extend(render_ops(&ops, self.width));
        }
        Ok(lines)
    }

    fn plain_class(&mut self, class: &ClassDef, base: Option<&Expr>) -> CompileResult<Vec<String>> {
        let width = self.width;
        let name = escape(&class.name).into_owned();
        let path = format!("{}.{name}", self.context());
        let prototype = format!("{path}.prototype");
        let base = base.map(|b| self.expr(b)).transpose()?;

        let mut tpl = vec![format!("{path} = function {name}() {{")];
        let constructor = [
            format!("if (!(this instanceof {name})) {{"),
            format!("  var $self = Object.create({name}.prototype);"),
            format!("  {name}.apply($self, arguments);"),
            "  return $self;".to_owned(),
            "}".to_owned(),
            format!("{name}.$bind(this);"),
            "if (this.__init__) {".to_owned(),
            "  this.__init__.apply(this, [this].concat(Array.prototype.slice.call(arguments)));"
                .to_owned(),
            "}".to_owned(),
        ];
        extend(&mut tpl, indent(constructor.map(|l| reindent(&l, width)), width, 1));
        tpl.push("};".to_owned());

        if let Some(base) = &base {
            tpl.push(format!("{prototype} = Object.create({base}.prototype);"));
            tpl.push(format!("{prototype}.constructor = {path};"));
        }
        tpl.push(format!(
            "{prototype}.__name__ = {};",
            string_literal(&class.name)
        ));

        extend(&mut tpl, self.class_body(&class.body, &prototype)?);

        // Called as `C.$bind(instance)`, so `this` is the constructor.
        tpl.push(format!("{path}.$bind = function $bind(self) {{"));
        let mut binder = Vec::new();
        if let Some(base) = &base {
            binder.push(format!("if ({base}.$bind) {base}.$bind(self);"));
        }
        for method in class.methods().filter(|m| !is_hook(&m.name)) {
            let method = escape(&method.name);
            binder.push(format!(
                "self.{method} = {BIND_METHOD}(self, this.prototype.{method});"
            ));
        }
        extend(&mut tpl, indent(binder, width, 1));
        tpl.push("};".to_owned());
        tpl.push(format!("{path}.$inject = [];"));
        Ok(tpl)
    }

    fn scope_class(&mut self, class: &ClassDef, scope: &ScopeDescriptor) -> CompileResult<Vec<String>> {
        debug!(class = %class.name, scope = %scope.name, "emitting reactive scope");
        let width = self.width;
        let path = format!("{}.{}", self.context(), escape(&scope.name));
        let scope_var = SCOPE_INJECT[0];

        let mut tpl = vec![format!(
            "{path} = function {}({}) {{",
            escape(&class.name),
            SCOPE_INJECT.join(", ")
        )];

        let mut body = self.class_body(&class.body, scope_var)?;
        for method in class.methods().filter(|m| !is_hook(&m.name)) {
            let method = escape(&method.name);
            body.push(format!(
                "{scope_var}.{method} = {BIND_METHOD}({scope_var}, {scope_var}.{method});"
            ));
        }

        for binding in &scope.events {
            body.extend(
                [
                    format!(
                        "$element.on({}, {}, function eventHandler(e) {{",
                        string_literal(&binding.event),
                        string_literal(&binding.selector)
                    ),
                    "  var t = angular.element(e.target).scope();".to_owned(),
                    format!(
                        "  $scope.$apply(function() {{ $scope.{}(t, e); }});",
                        escape(&binding.handler)
                    ),
                    "});".to_owned(),
                ]
                .map(|l| reindent(&l, width)),
            );
        }

        let tail = [
            "$scope.$on(\"$destroy\", function() {",
            "  $element.off();",
            "});",
            "var $getattr = $scope.__getattr__;",
            "$scope.__getattr__ = function __getattr__(self, name) {",
            "  if (self.$item && self.$item[name] !== undefined) return self.$item[name];",
            "  if ($getattr) return $getattr(self, name);",
            "  throw AttributeError(\"'\" + self.__name__ + \"' object has no attribute '\" + name + \"'\");",
            "};",
            "if ($scope.__init__) {",
            "  var __init__ = $scope.__init__;",
            "  delete $scope.__init__;",
            "  __init__.apply($scope, [$scope].concat(Array.prototype.slice.call(arguments, 2)));",
            "}",
        ];
        body.extend(tail.map(|l| reindent(l, width)));

        extend(&mut tpl, indent(body, width, 1));
        tpl.push("};".to_owned());
        tpl.push(format!("{path}.$inject = {};", string_array(&SCOPE_INJECT)));
        Ok(tpl)
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
