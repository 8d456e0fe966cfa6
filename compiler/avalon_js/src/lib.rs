//! Source-to-source compiler from the indentation-structured source language
//! to browser JavaScript.
//!
//! The target has no coroutines, so every function body is lowered to an
//! explicit state machine: an integer program counter, a bag of locals and
//! a handler stack, driven by a `switch` inside a perpetual loop. Classes
//! become constructor functions with prototype links and per-instance
//! method binding; classes based on a registered reactive scope become
//! framework controllers with event wiring.
//!
//! # Architecture
//!
//! ```text
//! Compiler ── ArtifactCache (per-object memoization)
//!    │
//!    └─ Dispatcher ─┬─ Resolver     free names → runtime shims / module bindings
//!                   ├─ linearize    function bodies → Op list → switch dispatch
//!                   ├─ classes      constructors, prototypes, reactive scopes
//!                   └─ emit         line lists and indentation
//! ```
//!
//! # Tracing
//!
//! - `RUST_LOG=avalon_js=debug`: compile requests, cache hits and stores.
//! - `RUST_LOG=avalon_js=trace`: every label allocation and lowered function.

mod cache;
mod classes;
pub mod config;
pub mod dispatch;
pub mod emit;
mod error;
pub mod linearize;
pub mod machine;
pub mod resolve;
pub mod runtime;

use std::sync::{Arc, Once};

use avalon_ir::{Module, ModuleScope, ObjectId, SourceObject, Stmt, SyntaxKind};
use tracing::debug;

pub use cache::ArtifactCache;
pub use config::{
    CompilerConfig, ConfigError, EventBinding, HostValues, ScopeDescriptor, ScopeTable,
};
pub use dispatch::{Dispatcher, Node};
pub use emit::Fragment;
pub use error::{CompileError, CompileResult};
pub use linearize::{BranchPoint, Label, Op, StateMachine};
pub use resolve::{Resolved, Resolver};
pub use runtime::{Runtime, RuntimeNamespaces};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times.
/// Enable with `RUST_LOG=avalon_js=debug` or `RUST_LOG=avalon_js=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

/// Compiles source objects, memoizing one artifact per object identity.
pub struct Compiler {
    config: CompilerConfig,
    runtime: Runtime,
    cache: ArtifactCache,
    runtime_artifact: Option<Arc<str>>,
    visits: u64,
}

impl Compiler {
    pub fn new(config: CompilerConfig) -> Self {
        Compiler {
            config,
            runtime: Runtime::load(),
            cache: ArtifactCache::new(),
            runtime_artifact: None,
            visits: 0,
        }
    }

    /// Compile a function, class or module.
    ///
    /// Repeated requests for the same object return the cached artifact
    /// without walking the tree again. A failed compilation caches nothing.
    pub fn compile(&mut self, object: &SourceObject) -> CompileResult<Arc<str>> {
        if let Some(artifact) = self.cache.get(object.id) {
            debug!(id = %object.id, name = %object.name, "cache hit");
            return Ok(artifact);
        }

        debug!(id = %object.id, name = %object.name, kind = ?object.kind, "compiling");
        let text = self.translate(&object.module, &object.tree)?;
        let artifact = self.cache.insert(object.id, text);
        debug!(id = %object.id, bytes = artifact.len(), "cached artifact");
        Ok(artifact)
    }

    /// Compile several objects and concatenate their artifacts in order.
    pub fn compile_all(&mut self, objects: &[SourceObject]) -> CompileResult<String> {
        let mut artifacts = Vec::with_capacity(objects.len());
        for object in objects {
            artifacts.push(self.compile(object)?);
        }
        Ok(artifacts
            .iter()
            .map(|a| &**a)
            .collect::<Vec<&str>>()
            .join("\n"))
    }

    /// The runtime shims, compiled once, in page order.
    pub fn runtime(&mut self) -> CompileResult<Arc<str>> {
        if let Some(artifact) = &self.runtime_artifact {
            return Ok(Arc::clone(artifact));
        }

        let scopes = ScopeTable::default();
        let mut parts = Vec::with_capacity(self.runtime.modules().len());
        for module in self.runtime.modules() {
            debug!(module = module.name, "compiling runtime module");
            let scope = ModuleScope::new(module.name);
            let resolver = Resolver::new(self.runtime.namespaces(), &scope, HostValues::default());
            let mut dispatcher = Dispatcher::new(resolver, &scopes, self.config.indent_width);
            let result = dispatcher.visit(Node::Module(&module.tree), None, true);
            self.visits += dispatcher.visits();
            parts.push(result?.into_text());
        }

        let artifact: Arc<str> = Arc::from(parts.join("\n"));
        debug!(bytes = artifact.len(), "assembled runtime");
        self.runtime_artifact = Some(Arc::clone(&artifact));
        Ok(artifact)
    }

    /// Lower one function of `object` without rendering it.
    ///
    /// `name` is looked up among top-level definitions first, then among
    /// the methods of top-level classes.
    pub fn lower_function(&mut self, object: &SourceObject, name: &str) -> CompileResult<StateMachine> {
        let def = object
            .tree
            .body
            .iter()
            .find_map(|stmt| match stmt {
                Stmt::FunctionDef(def) if def.name == name => Some(def),
                _ => None,
            })
            .or_else(|| {
                object.tree.body.iter().find_map(|stmt| match stmt {
                    Stmt::ClassDef(class) => class.methods().find(|def| def.name == name),
                    _ => None,
                })
            })
            .ok_or_else(|| {
                CompileError::unsupported(
                    SyntaxKind::FunctionDef,
                    format!("`{}` defines no function `{name}`", object.name),
                )
            })?;

        let resolver = Resolver::new(self.runtime.namespaces(), &object.module, self.config.host);
        let mut dispatcher = Dispatcher::new(resolver, &self.config.scopes, self.config.indent_width);
        let result = dispatcher.lower_function(def);
        self.visits += dispatcher.visits();
        result
    }

    /// Nodes visited across all compilations so far.
    pub fn visits(&self) -> u64 {
        self.visits
    }

    pub fn is_cached(&self, id: ObjectId) -> bool {
        self.cache.contains(id)
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    fn translate(&mut self, module: &ModuleScope, tree: &Module) -> CompileResult<String> {
        let resolver = Resolver::new(self.runtime.namespaces(), module, self.config.host);
        let mut dispatcher = Dispatcher::new(resolver, &self.config.scopes, self.config.indent_width);
        let result = dispatcher.visit(Node::Module(tree), None, true);
        self.visits += dispatcher.visits();
        Ok(result?.into_text())
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Compiler::new(CompilerConfig::default())
    }
}

