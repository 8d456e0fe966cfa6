//! Runtime shim modules.
//!
//! The emitted code relies on a small runtime written in the source language
//! itself (with raw target code where the source language cannot express a
//! primitive). The shims are compiled like any other module and shipped once
//! per page, ahead of application code.
//!
//! # Hook convention
//!
//! Ordinary methods are bound per instance and called without `self`.
//! Double-underscore hooks (`__init__`, `__getattr__`, `__getitem__`, ...)
//! stay unbound: the runtime passes the receiver as the first argument, so
//! a hook inherited by a child scope still sees the object it was invoked on.

mod builtins;
mod exceptions;
mod types;

use avalon_ir::{Module, Stmt};
use rustc_hash::FxHashSet;

/// Class used to signal iterator exhaustion.
pub const STOP_ITERATION: &str = "StopIteration";

/// Builtin turning an iterable into an iterator.
pub const ITER: &str = "iter";

/// Type shim wrapping a suspended state machine.
pub const GENERATOR: &str = "generator";

/// Builtin producing per-instance bound method wrappers.
pub const BIND_METHOD: &str = "method";

/// One shim module, named for logging.
#[derive(Clone, Debug)]
pub struct RuntimeModule {
    pub name: &'static str,
    pub tree: Module,
}

/// Names defined by each shim module, consulted by the resolver.
#[derive(Clone, Debug, Default)]
pub struct RuntimeNamespaces {
    pub builtins: FxHashSet<String>,
    pub exceptions: FxHashSet<String>,
    pub types: FxHashSet<String>,
}

/// The shim modules together with their namespaces.
#[derive(Clone, Debug)]
pub struct Runtime {
    modules: Vec<RuntimeModule>,
    namespaces: RuntimeNamespaces,
}

impl Runtime {
    pub fn load() -> Self {
        let types = RuntimeModule {
            name: "types",
            tree: types::tree(),
        };
        let exceptions = RuntimeModule {
            name: "exceptions",
            tree: exceptions::tree(),
        };
        let builtins = RuntimeModule {
            name: "builtins",
            tree: builtins::tree(),
        };

        let namespaces = RuntimeNamespaces {
            builtins: defined_names(&builtins.tree),
            exceptions: defined_names(&exceptions.tree),
            types: defined_names(&types.tree),
        };

        // Types first: exception classes link their prototypes to `object`
        // while the page loads.
        Runtime {
            modules: vec![types, exceptions, builtins],
            namespaces,
        }
    }

    /// Modules in page order.
    pub fn modules(&self) -> &[RuntimeModule] {
        &self.modules
    }

    pub fn namespaces(&self) -> &RuntimeNamespaces {
        &self.namespaces
    }
}

fn defined_names(module: &Module) -> FxHashSet<String> {
    module
        .body
        .iter()
        .filter_map(|stmt| match stmt {
            Stmt::FunctionDef(def) => Some(def.name.clone()),
            Stmt::ClassDef(class) => Some(class.name.clone()),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests;
