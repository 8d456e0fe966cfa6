//! Source objects handed to the compiler by the host runtime.
//!
//! A source object is a function, class or module together with its parsed
//! tree and the top-level bindings of the module that defines it. Identity
//! is carried by an [`ObjectId`] assigned by the host: two objects with the
//! same id are the same object, regardless of their names.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::ast::{Module, Stmt};

/// Host-assigned identity of a live object.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct ObjectId(u64);

impl ObjectId {
    #[inline]
    pub const fn new(raw: u64) -> Self {
        ObjectId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Function,
    Class,
    Module,
}

/// Top-level bindings of a source module, by name.
///
/// Values are object identities so the compiler can recognise well-known
/// singletons no matter what the module calls them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModuleScope {
    name: String,
    bindings: FxHashMap<String, ObjectId>,
}

impl ModuleScope {
    pub fn new(name: impl Into<String>) -> Self {
        ModuleScope {
            name: name.into(),
            bindings: FxHashMap::default(),
        }
    }

    #[must_use]
    pub fn with_binding(mut self, name: impl Into<String>, value: ObjectId) -> Self {
        self.bindings.insert(name.into(), value);
        self
    }

    pub fn bind(&mut self, name: impl Into<String>, value: ObjectId) {
        self.bindings.insert(name.into(), value);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn binding(&self, name: &str) -> Option<ObjectId> {
        self.bindings.get(name).copied()
    }
}

/// A function, class or module plus its parsed tree.
#[derive(Clone, Debug)]
pub struct SourceObject {
    pub id: ObjectId,
    pub kind: SourceKind,
    pub name: String,
    pub module: Arc<ModuleScope>,
    pub tree: Module,
}

impl SourceObject {
    /// Wrap a single `def` or `class` statement, the way reflecting over a
    /// live function or class yields a module holding just its definition.
    ///
    /// Any other statement is treated as a one-statement module.
    pub fn from_definition(id: ObjectId, module: Arc<ModuleScope>, stmt: Stmt) -> Self {
        let (kind, name) = match &stmt {
            Stmt::FunctionDef(def) => (SourceKind::Function, def.name.clone()),
            Stmt::ClassDef(class) => (SourceKind::Class, class.name.clone()),
            _ => (SourceKind::Module, module.name().to_owned()),
        };
        SourceObject {
            id,
            kind,
            name,
            module,
            tree: Module::new(vec![stmt]),
        }
    }

    /// A whole module object.
    pub fn from_module(id: ObjectId, module: Arc<ModuleScope>, tree: Module) -> Self {
        SourceObject {
            id,
            kind: SourceKind::Module,
            name: module.name().to_owned(),
            module,
            tree,
        }
    }
}

#[cfg(test)]
mod tests;
