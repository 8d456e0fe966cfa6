//! Lowering shapes for structured statements.
//!
//! Each shape allocates its labels when opened, before its sub-blocks are
//! lowered, so nested constructs always receive higher label numbers than
//! their parent. Closing a shape lays the lowered sub-blocks out around the
//! jumps and label definitions.

use super::{BranchPoint, Label, Op, LOCALS};
use crate::runtime::{ITER, STOP_ITERATION};

/// `if test: body else: orelse`
#[derive(Debug)]
pub(crate) struct Conditional {
    else_point: Label,
    continue_point: Label,
}

impl Conditional {
    pub(crate) fn open(branch: &mut BranchPoint) -> Self {
        let else_point = branch.create();
        let continue_point = branch.create();
        Conditional {
            else_point,
            continue_point,
        }
    }

    pub(crate) fn close(self, test: String, body: Vec<Op>, orelse: Vec<Op>) -> Vec<Op> {
        let mut ops = vec![Op::JumpUnless {
            test,
            target: self.else_point,
        }];
        ops.extend(body);
        ops.push(Op::Jump(self.continue_point));
        ops.push(Op::Label(self.else_point));
        ops.extend(orelse);
        ops.push(Op::Label(self.continue_point));
        ops
    }
}

/// Labels shared by both loop kinds. `break`/`continue` in the body target
/// these.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct LoopPoints {
    pub(crate) loop_point: Label,
    pub(crate) break_point: Label,
}

impl LoopPoints {
    fn open(branch: &mut BranchPoint) -> Self {
        let loop_point = branch.create();
        let break_point = branch.create();
        LoopPoints {
            loop_point,
            break_point,
        }
    }
}

/// `while test: body`
#[derive(Debug)]
pub(crate) struct WhileLoop {
    pub(crate) points: LoopPoints,
}

impl WhileLoop {
    pub(crate) fn open(branch: &mut BranchPoint) -> Self {
        WhileLoop {
            points: LoopPoints::open(branch),
        }
    }

    pub(crate) fn close(self, test: String, body: Vec<Op>) -> Vec<Op> {
        let LoopPoints {
            loop_point,
            break_point,
        } = self.points;
        let mut ops = vec![
            Op::Label(loop_point),
            Op::JumpUnless {
                test,
                target: break_point,
            },
        ];
        ops.extend(body);
        ops.push(Op::Jump(loop_point));
        ops.push(Op::Label(break_point));
        ops
    }
}

/// `for target in iterable: body`
///
/// The iterable is evaluated once into a hidden local. Each step calls
/// `next()` under a pushed handler; `StopIteration` lands on the break
/// point, anything else is rethrown to the enclosing handler.
#[derive(Debug)]
pub(crate) struct ForLoop {
    pub(crate) points: LoopPoints,
    exhausted: Label,
}

impl ForLoop {
    pub(crate) fn open(branch: &mut BranchPoint) -> Self {
        let points = LoopPoints::open(branch);
        let exhausted = branch.create();
        ForLoop { points, exhausted }
    }

    /// Local holding the iterator, unique per loop within the function.
    pub(crate) fn iterator(&self) -> String {
        format!("{LOCALS}.$iter{}", self.points.loop_point)
    }

    /// Expression producing the next item.
    pub(crate) fn step(&self) -> String {
        format!("{}.next()", self.iterator())
    }

    /// `bind` stores [`ForLoop::step`] into the loop target.
    pub(crate) fn close(self, iterable: &str, bind: Vec<String>, body: Vec<Op>) -> Vec<Op> {
        let LoopPoints {
            loop_point,
            break_point,
        } = self.points;
        let mut ops = vec![
            Op::Code(vec![format!("{} = {ITER}({iterable});", self.iterator())]),
            Op::Label(loop_point),
            Op::PushHandler(self.exhausted),
            Op::Code(bind),
            Op::PopHandler,
        ];
        ops.extend(body);
        ops.extend([
            Op::Jump(loop_point),
            Op::Label(self.exhausted),
            Op::RethrowUnless {
                class: STOP_ITERATION.to_owned(),
            },
            Op::ClearCaught,
            Op::Label(break_point),
        ]);
        ops
    }
}

/// One `except` clause, already lowered.
#[derive(Debug)]
pub(crate) struct Clause {
    /// Classes to match and the label of the next clause; `None` for a
    /// bare `except:`.
    pub(crate) class: Option<(Vec<String>, Label)>,
    /// Local receiving the caught value.
    pub(crate) bind: Option<String>,
    pub(crate) body: Vec<Op>,
}

/// `try: body except ...: ... else: orelse`
#[derive(Debug)]
pub(crate) struct TryBlock {
    except_point: Label,
    continue_point: Label,
}

impl TryBlock {
    pub(crate) fn open(branch: &mut BranchPoint) -> Self {
        let except_point = branch.create();
        let continue_point = branch.create();
        TryBlock {
            except_point,
            continue_point,
        }
    }

    pub(crate) fn close(self, body: Vec<Op>, orelse: Vec<Op>, clauses: Vec<Clause>) -> Vec<Op> {
        let mut ops = vec![Op::PushHandler(self.except_point)];
        ops.extend(body);
        ops.push(Op::PopHandler);
        ops.extend(orelse);
        ops.push(Op::Jump(self.continue_point));
        ops.push(Op::Label(self.except_point));

        let mut catch_all = false;
        for clause in clauses {
            let next = match clause.class {
                Some((classes, next)) => {
                    ops.push(Op::CatchUnless { classes, next });
                    Some(next)
                }
                None => {
                    catch_all = true;
                    None
                }
            };
            if let Some(target) = clause.bind {
                ops.push(Op::BindCaught { target });
            }
            ops.extend(clause.body);
            ops.push(Op::ClearCaught);
            ops.push(Op::Jump(self.continue_point));
            if let Some(next) = next {
                ops.push(Op::Label(next));
            }
            // Clauses after a bare `except:` are unreachable.
            if catch_all {
                break;
            }
        }
        if !catch_all {
            ops.push(Op::Rethrow);
        }
        ops.push(Op::Label(self.continue_point));
        ops
    }
}

/// Suspend with `value`, resuming at a fresh label.
pub(crate) fn suspend(branch: &mut BranchPoint, value: String) -> Vec<Op> {
    let resume = branch.create();
    vec![Op::Yield { value, resume }, Op::Label(resume)]
}

/// Leave `popped` handler levels, then jump.
pub(crate) fn escape_to(target: Label, popped: usize) -> Vec<Op> {
    let mut ops = vec![Op::PopHandler; popped];
    ops.push(Op::Jump(target));
    ops
}
