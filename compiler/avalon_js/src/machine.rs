//! Reference executor for lowered state machines.
//!
//! [`Machine`] interprets a [`StateMachine`] with the semantics of the
//! emitted dispatch loop: execution starts at state 0 and falls through
//! labels, jumps set the next state, a thrown value is routed to the most
//! recently pushed handler (or escapes when none is left), a yield suspends
//! and records its resume state, and a return or running off the end
//! finishes the machine for good.
//!
//! Target-language code inside the operations is opaque here; a [`Host`]
//! evaluates it. The caught value and the value passed to `send` live in
//! [`Registers`] so the host can read them as `$ctx.exception` and
//! `$ctx.send`.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::linearize::{Label, Op, StateMachine};

/// Values visible to host code besides its own locals.
#[derive(Clone, Debug)]
pub struct Registers<V> {
    /// Value passed to the latest `send`.
    pub sent: Option<V>,
    /// Exception being handled.
    pub caught: Option<V>,
}

impl<V> Default for Registers<V> {
    fn default() -> Self {
        Registers {
            sent: None,
            caught: None,
        }
    }
}

/// Evaluator for the target code embedded in operations.
///
/// `Err` from `eval` or `exec` is a thrown value.
pub trait Host {
    type Value: Clone;

    fn undefined(&self) -> Self::Value;

    fn eval(&mut self, expr: &str, registers: &Registers<Self::Value>)
        -> Result<Self::Value, Self::Value>;

    fn exec(&mut self, code: &str, registers: &Registers<Self::Value>) -> Result<(), Self::Value>;

    fn truthy(&self, value: &Self::Value) -> bool;

    fn is_instance(&self, value: &Self::Value, class: &str) -> bool;
}

/// Outcome of one resumption.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resumption<V> {
    Yielded(V),
    /// The machine finished, with the returned value if there was one.
    Done(Option<V>),
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MachineError<V> {
    #[error("state machine already finished")]
    Finished,
    #[error("uncaught exception: {0:?}")]
    Uncaught(V),
    #[error("no state {0}")]
    UnknownState(Label),
}

/// What the dispatch loop does after one operation.
enum Flow<V> {
    Next,
    Goto(Label),
    Suspend(V),
    Finish(Option<V>),
}

pub struct Machine<'m, V> {
    machine: &'m StateMachine,
    /// Operation index of each state.
    states: FxHashMap<Label, usize>,
    next_state: Label,
    handlers: SmallVec<[Label; 4]>,
    registers: Registers<V>,
    end: bool,
}

impl<'m, V: Clone> Machine<'m, V> {
    pub fn new(machine: &'m StateMachine) -> Self {
        let mut states = FxHashMap::default();
        states.insert(Label::ENTRY, 0);
        for (index, op) in machine.ops.iter().enumerate() {
            if let Op::Label(label) = op {
                states.insert(*label, index);
            }
        }
        Machine {
            machine,
            states,
            next_state: Label::ENTRY,
            handlers: SmallVec::new(),
            registers: Registers::default(),
            end: false,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.end
    }

    /// Depth of the handler stack.
    pub fn handler_depth(&self) -> usize {
        self.handlers.len()
    }

    /// Advance with no input.
    pub fn next<H: Host<Value = V>>(&mut self, host: &mut H) -> Result<Resumption<V>, MachineError<V>> {
        let undefined = host.undefined();
        self.send(host, undefined)
    }

    /// Advance, making `value` the result of the pending yield.
    pub fn send<H: Host<Value = V>>(
        &mut self,
        host: &mut H,
        value: V,
    ) -> Result<Resumption<V>, MachineError<V>> {
        if self.end {
            return Err(MachineError::Finished);
        }
        self.registers.sent = Some(value);
        let result = self.run(host);
        if !matches!(result, Ok(Resumption::Yielded(_))) {
            self.end = true;
        }
        result
    }

    fn entry(&self, label: Label) -> Result<usize, MachineError<V>> {
        self.states
            .get(&label)
            .copied()
            .ok_or(MachineError::UnknownState(label))
    }

    fn run<H: Host<Value = V>>(&mut self, host: &mut H) -> Result<Resumption<V>, MachineError<V>> {
        let machine = self.machine;
        let ops = &machine.ops;
        let mut pc = self.entry(self.next_state)?;
        loop {
            // Running off the end is the `default` case.
            let Some(op) = ops.get(pc) else {
                return Ok(Resumption::Done(None));
            };
            pc += 1;

            match self.step(op, host) {
                Ok(Flow::Next) => {}
                Ok(Flow::Goto(label)) => pc = self.entry(label)?,
                Ok(Flow::Suspend(value)) => return Ok(Resumption::Yielded(value)),
                Ok(Flow::Finish(value)) => return Ok(Resumption::Done(value)),
                Err(thrown) => match self.handlers.pop() {
                    Some(handler) => {
                        self.registers.caught = Some(thrown);
                        pc = self.entry(handler)?;
                    }
                    None => return Err(MachineError::Uncaught(thrown)),
                },
            }
        }
    }

    fn step<H: Host<Value = V>>(&mut self, op: &Op, host: &mut H) -> Result<Flow<V>, V> {
        match op {
            Op::Label(_) => {}
            Op::Code(lines) => host.exec(&lines.join("\n"), &self.registers)?,
            Op::Jump(target) => return Ok(Flow::Goto(*target)),
            Op::JumpUnless { test, target } => {
                let value = host.eval(test, &self.registers)?;
                if !host.truthy(&value) {
                    return Ok(Flow::Goto(*target));
                }
            }
            Op::PushHandler(handler) => self.handlers.push(*handler),
            Op::PopHandler => {
                self.handlers.pop();
            }
            Op::Yield { value, resume } => {
                let value = host.eval(value, &self.registers)?;
                self.next_state = *resume;
                return Ok(Flow::Suspend(value));
            }
            Op::Return(value) => {
                let value = match value {
                    Some(expr) => Some(host.eval(expr, &self.registers)?),
                    None => None,
                };
                return Ok(Flow::Finish(value));
            }
            Op::Throw(value) => return Err(host.eval(value, &self.registers)?),
            Op::CatchUnless { classes, next } => {
                if !classes.iter().any(|class| self.caught_is(host, class)) {
                    return Ok(Flow::Goto(*next));
                }
            }
            Op::RethrowUnless { class } => {
                if !self.caught_is(host, class) {
                    return Err(self.caught(host));
                }
            }
            Op::BindCaught { target } => {
                host.exec(&format!("{target} = $ctx.exception;"), &self.registers)?;
            }
            Op::ClearCaught => self.registers.caught = None,
            Op::Rethrow => return Err(self.caught(host)),
        }
        Ok(Flow::Next)
    }

    fn caught_is<H: Host<Value = V>>(&self, host: &H, class: &str) -> bool {
        self.registers
            .caught
            .as_ref()
            .is_some_and(|value| host.is_instance(value, class))
    }

    fn caught<H: Host<Value = V>>(&self, host: &H) -> V {
        self.registers
            .caught
            .clone()
            .unwrap_or_else(|| host.undefined())
    }
}
