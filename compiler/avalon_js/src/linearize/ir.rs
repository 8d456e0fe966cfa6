//! Flat operation list produced by lowering one function body.
//!
//! Structured control flow is gone at this level: what remains is straight
//! code, label definitions, jumps and explicit handler-stack operations.
//! The same list is rendered to a `switch` dispatch loop and interpreted by
//! the reference executor in [`crate::machine`].

use std::fmt;

/// A state of the dispatch loop.
///
/// State 0 is the function entry; allocated labels start at 1 and are unique
/// within one function only.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Label(u32);

impl Label {
    pub const ENTRY: Label = Label(0);

    #[inline]
    pub(crate) const fn new(index: u32) -> Self {
        Label(index)
    }

    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Op {
    /// Start of a dispatch state. Execution falls through into it.
    Label(Label),
    /// Straight-line target code, one statement per line.
    Code(Vec<String>),
    Jump(Label),
    /// Jump when `test` is falsy.
    JumpUnless { test: String, target: Label },
    /// Route exceptions to `handler` until the matching pop.
    PushHandler(Label),
    PopHandler,
    /// Stash `value` as the result, suspend, and resume at `resume`.
    Yield { value: String, resume: Label },
    /// Finish the machine with an optional result.
    Return(Option<String>),
    Throw(String),
    /// Inside a handler: continue at `next` unless the caught value is an
    /// instance of one of `classes`.
    CatchUnless { classes: Vec<String>, next: Label },
    /// Inside a handler: rethrow the caught value unless it is an instance
    /// of `class`.
    RethrowUnless { class: String },
    /// Store the caught value into a local.
    BindCaught { target: String },
    ClearCaught,
    /// Throw the caught value again.
    Rethrow,
}

impl Op {
    /// The label this operation may transfer control to.
    pub fn target(&self) -> Option<Label> {
        match self {
            Op::Jump(target)
            | Op::JumpUnless { target, .. }
            | Op::PushHandler(target)
            | Op::CatchUnless { next: target, .. } => Some(*target),
            Op::Yield { resume, .. } => Some(*resume),
            _ => None,
        }
    }
}

/// A lowered function.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateMachine {
    pub name: String,
    pub params: Vec<String>,
    pub ops: Vec<Op>,
    /// The body yields: invocation returns a generator object.
    pub is_generator: bool,
}

impl StateMachine {
    /// Labels defined in the body, in emission order.
    pub fn labels(&self) -> impl Iterator<Item = Label> + '_ {
        self.ops.iter().filter_map(|op| match op {
            Op::Label(label) => Some(*label),
            _ => None,
        })
    }

    /// Whether the rendered function needs a handler stack and a catch
    /// wrapper around the dispatch loop.
    pub fn uses_handlers(&self) -> bool {
        self.is_generator
            || self
                .ops
                .iter()
                .any(|op| matches!(op, Op::PushHandler(_)))
    }
}
