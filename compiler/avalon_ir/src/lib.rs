//! Avalon IR - syntax tree and source-object model.
//!
//! This crate holds the input side of the compiler:
//! - The syntax tree of the source language ([`ast`])
//! - Tree constructors used by hosts, runtime shims and tests ([`build`])
//! - Read-only traversal ([`visitor`])
//! - Source objects with host-assigned identity ([`source`])
//!
//! Parsing is not part of this crate. Hosts produce trees from live objects
//! and hand them over as [`SourceObject`]s.

pub mod ast;
pub mod build;
mod source;
pub mod visitor;

pub use ast::{
    BinOp, BoolOp, ClassDef, CmpOp, ExceptHandler, Expr, FunctionDef, Module, Number, Param, Stmt,
    SyntaxKind, UnaryOp,
};
pub use source::{ModuleScope, ObjectId, SourceKind, SourceObject};
