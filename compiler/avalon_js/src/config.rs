//! Compiler configuration.
//!
//! All tables are built before compilation starts and are immutable
//! afterwards. There is no process-wide registry: a [`Compiler`](crate::Compiler)
//! sees exactly the scopes and host values it was constructed with.

use avalon_ir::{ClassDef, Expr, ObjectId};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::emit::DEFAULT_INDENT;

// ── Scope descriptors ───────────────────────────────────────────────

/// One delegated DOM event wired by a reactive scope.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventBinding {
    pub event: String,
    /// Delegation selector; empty means the scope element itself.
    #[serde(default)]
    pub selector: String,
    /// Name of the scope method invoked for the event.
    pub handler: String,
}

/// A reactive scope known to the front-end framework.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeDescriptor {
    pub name: String,
    #[serde(default)]
    pub events: Vec<EventBinding>,
}

impl ScopeDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        ScopeDescriptor {
            name: name.into(),
            events: Vec::new(),
        }
    }

    /// Add an event binding.
    #[must_use]
    pub fn on(
        mut self,
        event: impl Into<String>,
        selector: impl Into<String>,
        handler: impl Into<String>,
    ) -> Self {
        self.events.push(EventBinding {
            event: event.into(),
            selector: selector.into(),
            handler: handler.into(),
        });
        self
    }

    /// Collect event bindings from methods decorated `@event.<name>(selector)`,
    /// `@event.<name>` or `@event("<name>", selector)`, in method order.
    pub fn from_class(name: impl Into<String>, class: &ClassDef) -> Self {
        let mut scope = ScopeDescriptor::new(name);
        for method in class.methods() {
            for decorator in &method.decorators {
                if let Some((event, selector)) = event_decorator(decorator) {
                    scope.events.push(EventBinding {
                        event,
                        selector,
                        handler: method.name.clone(),
                    });
                }
            }
        }
        scope
    }
}

fn event_decorator(decorator: &Expr) -> Option<(String, String)> {
    let is_event = |expr: &Expr| expr.as_name() == Some("event");
    let literal = |expr: Option<&Expr>| match expr {
        Some(Expr::Str(s)) => Some(s.clone()),
        _ => None,
    };

    match decorator {
        Expr::Attribute { value, attr } if is_event(value) => Some((attr.clone(), String::new())),
        Expr::Call { func, args } => match func.as_ref() {
            Expr::Attribute { value, attr } if is_event(value) => {
                Some((attr.clone(), literal(args.first()).unwrap_or_default()))
            }
            callee if is_event(callee) => Some((
                literal(args.first())?,
                literal(args.get(1)).unwrap_or_default(),
            )),
            _ => None,
        },
        _ => None,
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("scope `{0}` is already registered")]
    DuplicateScope(String),
}

/// Registered reactive scopes, looked up by base-class name.
#[derive(Clone, Debug, Default)]
pub struct ScopeTable {
    scopes: FxHashMap<String, ScopeDescriptor>,
}

impl ScopeTable {
    pub fn builder() -> ScopeTableBuilder {
        ScopeTableBuilder::default()
    }

    pub fn get(&self, name: &str) -> Option<&ScopeDescriptor> {
        self.scopes.get(name)
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

#[derive(Default)]
pub struct ScopeTableBuilder {
    scopes: Vec<ScopeDescriptor>,
}

impl ScopeTableBuilder {
    #[must_use]
    pub fn scope(mut self, scope: ScopeDescriptor) -> Self {
        self.scopes.push(scope);
        self
    }

    #[must_use]
    pub fn scopes(mut self, scopes: impl IntoIterator<Item = ScopeDescriptor>) -> Self {
        self.scopes.extend(scopes);
        self
    }

    pub fn build(self) -> Result<ScopeTable, ConfigError> {
        let mut scopes = FxHashMap::default();
        for scope in self.scopes {
            if scopes.contains_key(&scope.name) {
                return Err(ConfigError::DuplicateScope(scope.name));
            }
            scopes.insert(scope.name.clone(), scope);
        }
        Ok(ScopeTable { scopes })
    }
}

// ── Host values ─────────────────────────────────────────────────────

/// Identities of the singletons the hosting runtime rewrites by value.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct HostValues {
    /// Shared per-request session store, emitted as `_session`.
    pub session: Option<ObjectId>,
    /// Document-store root, emitted as `avalon.model`.
    pub model_root: Option<ObjectId>,
}

impl HostValues {
    pub fn new(session: ObjectId, model_root: ObjectId) -> Self {
        HostValues {
            session: Some(session),
            model_root: Some(model_root),
        }
    }
}

// ── Compiler configuration ──────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct CompilerConfig {
    pub scopes: ScopeTable,
    pub host: HostValues,
    /// Spaces per indentation level in emitted code.
    pub indent_width: usize,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        CompilerConfig {
            scopes: ScopeTable::default(),
            host: HostValues::default(),
            indent_width: DEFAULT_INDENT,
        }
    }
}

impl CompilerConfig {
    #[must_use]
    pub fn with_scopes(mut self, scopes: ScopeTable) -> Self {
        self.scopes = scopes;
        self
    }

    #[must_use]
    pub fn with_host(mut self, host: HostValues) -> Self {
        self.host = host;
        self
    }

    #[must_use]
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }
}
