//! Compile errors.
//!
//! Every failure is fatal for the object being compiled: nothing partial is
//! emitted and nothing is cached.

use avalon_ir::SyntaxKind;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    /// A node kind with no handler, or a construct the lowering rejects.
    #[error("unsupported construct `{construct}`: {detail}")]
    UnsupportedConstruct {
        construct: SyntaxKind,
        detail: String,
    },

    /// `break`/`continue`/`return`/`yield`/`try` outside the construct that
    /// gives it meaning.
    #[error("`{statement}` outside {required}")]
    InvalidControlFlowContext {
        statement: SyntaxKind,
        required: &'static str,
    },

    /// An assignment whose target is not a name, attribute, subscript or
    /// unpacking of those.
    #[error("cannot assign to {target}")]
    InvalidAssignmentTarget { target: SyntaxKind },
}

impl CompileError {
    pub(crate) fn unsupported(construct: SyntaxKind, detail: impl Into<String>) -> Self {
        CompileError::UnsupportedConstruct {
            construct,
            detail: detail.into(),
        }
    }

    pub(crate) fn outside(statement: SyntaxKind, required: &'static str) -> Self {
        CompileError::InvalidControlFlowContext {
            statement,
            required,
        }
    }
}

pub type CompileResult<T> = Result<T, CompileError>;
