//! Free-name resolution.
//!
//! A name that is not local to the function being compiled is resolved in
//! layers:
//!
//! 1. reserved literals and intrinsics (`True`, `False`, `None`, `JSCode`, `print`)
//! 2. runtime builtin shims
//! 3. runtime exception shims
//! 4. runtime primitive-type shims
//! 5. top-level bindings of the enclosing source module
//!
//! Module bindings holding the session store or the document-store root are
//! rewritten to fixed identifiers by value identity. Anything unresolved is
//! passed through as written, which lets source code reference names that
//! only exist in the generated runtime.

use std::borrow::Cow;

use avalon_ir::ModuleScope;

use crate::config::HostValues;
use crate::runtime::RuntimeNamespaces;

/// Target identifier of the session store singleton.
pub const SESSION_IDENT: &str = "_session";
/// Target identifier of the document-store root singleton.
pub const MODEL_ROOT_IDENT: &str = "avalon.model";

/// Names with compile-time meaning rather than a runtime value.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Intrinsic {
    /// `JSCode("...")`: splice target code verbatim.
    RawCode,
    /// `print(...)`: `console.log(...)`.
    Print,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolved {
    Literal(&'static str),
    Intrinsic(Intrinsic),
    Builtin(String),
    Exception(String),
    Type(String),
    Session,
    ModelRoot,
    Module(String),
}

impl Resolved {
    /// The identifier emitted for a load of the name.
    pub fn target(&self) -> &str {
        match self {
            Resolved::Literal(text) => text,
            Resolved::Intrinsic(Intrinsic::RawCode) => "JSCode",
            Resolved::Intrinsic(Intrinsic::Print) => "console.log",
            Resolved::Builtin(name)
            | Resolved::Exception(name)
            | Resolved::Type(name)
            | Resolved::Module(name) => name,
            Resolved::Session => SESSION_IDENT,
            Resolved::ModelRoot => MODEL_ROOT_IDENT,
        }
    }
}

pub struct Resolver<'a> {
    runtime: &'a RuntimeNamespaces,
    module: &'a ModuleScope,
    host: HostValues,
}

impl<'a> Resolver<'a> {
    pub fn new(runtime: &'a RuntimeNamespaces, module: &'a ModuleScope, host: HostValues) -> Self {
        Resolver {
            runtime,
            module,
            host,
        }
    }

    pub fn lookup(&self, name: &str) -> Option<Resolved> {
        if let Some(reserved) = reserved(name) {
            return Some(reserved);
        }
        let escaped = || escape(name).into_owned();
        if self.runtime.builtins.contains(name) {
            return Some(Resolved::Builtin(escaped()));
        }
        if self.runtime.exceptions.contains(name) {
            return Some(Resolved::Exception(escaped()));
        }
        if self.runtime.types.contains(name) {
            return Some(Resolved::Type(escaped()));
        }

        let value = self.module.binding(name)?;
        if Some(value) == self.host.session {
            Some(Resolved::Session)
        } else if Some(value) == self.host.model_root {
            Some(Resolved::ModelRoot)
        } else {
            Some(Resolved::Module(escaped()))
        }
    }
}

fn reserved(name: &str) -> Option<Resolved> {
    let resolved = match name {
        "True" => Resolved::Literal("true"),
        "False" => Resolved::Literal("false"),
        "None" => Resolved::Literal("undefined"),
        "JSCode" => Resolved::Intrinsic(Intrinsic::RawCode),
        "print" => Resolved::Intrinsic(Intrinsic::Print),
        _ => return None,
    };
    Some(resolved)
}

/// Target-language reserved words and predeclared names that source
/// identifiers must not collide with.
const TARGET_RESERVED: &[&str] = &[
    "arguments",
    "await",
    "case",
    "catch",
    "const",
    "debugger",
    "default",
    "delete",
    "do",
    "enum",
    "eval",
    "export",
    "extends",
    "false",
    "finally",
    "function",
    "implements",
    "instanceof",
    "interface",
    "let",
    "new",
    "null",
    "package",
    "private",
    "protected",
    "public",
    "static",
    "super",
    "switch",
    "this",
    "throw",
    "true",
    "typeof",
    "undefined",
    "var",
    "void",
];

/// Suffix a source identifier that collides with a target reserved word.
///
/// Source keywords (`if`, `for`, `class`, ...) can never reach here as
/// identifiers, so only target-only words are listed.
pub fn escape(name: &str) -> Cow<'_, str> {
    if TARGET_RESERVED.contains(&name) {
        Cow::Owned(format!("{name}_"))
    } else {
        Cow::Borrowed(name)
    }
}
