//! Step-wise interpreter over a compiled [`Program`].
//!
//! Each [`ExecutionState::execute_step`] call runs control flow until it
//! performs exactly one primitive action, runs out of work, or faults.
//! Control flow is free in terms of steps but metered by
//! [`EngineLimits::max_control_ops_per_step`].

use std::sync::Arc;

use karel_types::program::{CondId, Condition, Op, Program};
use karel_types::{RuntimeFault, Span};
use karel_world::WorldState;
use serde::{Deserialize, Serialize};

use crate::frame::{Frame, FrameKind};
use crate::limits::EngineLimits;

/// Outcome of one [`ExecutionState::execute_step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "camelCase")]
pub enum StepResult {
    /// One primitive action was performed; the run goes on.
    Continued,
    /// The entry procedure returned.
    Finished,
    Fault(RuntimeFault),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum Status {
    Running,
    Finished,
    Faulted(RuntimeFault),
}

/// Start a run of `program` with default limits.
pub fn begin_run(program: Arc<Program>) -> ExecutionState {
    ExecutionState::begin(program, EngineLimits::default())
}

/// The progress of one run through a program.
#[derive(Debug, Clone)]
pub struct ExecutionState {
    program: Arc<Program>,
    limits: EngineLimits,
    stack: Vec<Frame>,
    status: Status,
    call_depth: usize,
    actions: u64,
    current_span: Option<Span>,
}

impl ExecutionState {
    /// Start a run of `program`. Zero bounds in `limits` are treated as one.
    pub fn begin(program: Arc<Program>, limits: EngineLimits) -> Self {
        let limits = limits.normalized();
        let entry = program.entry();
        let body = program.procedure(entry).body;
        Self {
            program,
            limits,
            stack: vec![Frame::new(body, FrameKind::Procedure(entry))],
            status: Status::Running,
            call_depth: 1,
            actions: 0,
            current_span: None,
        }
    }

    /// Advance the run by one primitive action.
    ///
    /// A fault leaves `world` exactly as it was before the failed action.
    /// Once the run has finished or faulted every further call returns
    /// [`RuntimeFault::AlreadyTerminated`] and leaves `world` untouched.
    pub fn execute_step(&mut self, world: &mut WorldState) -> StepResult {
        if self.status != Status::Running {
            return StepResult::Fault(RuntimeFault::AlreadyTerminated);
        }

        let mut ops: u64 = 0;
        loop {
            if ops >= self.limits.max_control_ops_per_step {
                return self.fault(RuntimeFault::GasExhausted {
                    limit: self.limits.max_control_ops_per_step,
                });
            }
            ops += 1;

            let program = &*self.program;
            let Some(frame) = self.stack.last_mut() else {
                return self.finish();
            };
            let block = program.block(frame.block);

            let Some(instruction) = block.get(frame.pc) else {
                // End of block.
                match frame.kind {
                    FrameKind::Procedure(_) => {
                        self.stack.pop();
                        self.call_depth -= 1;
                    }
                    FrameKind::Branch => {
                        self.stack.pop();
                    }
                    FrameKind::While(cond) | FrameKind::DoWhile(cond) => {
                        if eval_condition(program, cond, world) {
                            frame.pc = 0;
                        } else {
                            self.stack.pop();
                        }
                    }
                    FrameKind::Repeat { remaining } => {
                        if remaining > 1 {
                            frame.kind = FrameKind::Repeat {
                                remaining: remaining - 1,
                            };
                            frame.pc = 0;
                        } else {
                            self.stack.pop();
                        }
                    }
                }
                continue;
            };
            frame.pc += 1;

            match instruction.op {
                Op::Action(action) => {
                    let span = instruction.span;
                    return match world.apply(action) {
                        Ok(()) => {
                            self.actions += 1;
                            self.current_span = Some(span);
                            let robot = world.robot();
                            tracing::trace!(
                                %action,
                                x = robot.x,
                                y = robot.y,
                                direction = %robot.direction,
                                line = span.start_line,
                                "action"
                            );
                            StepResult::Continued
                        }
                        Err(fault) => {
                            self.current_span = Some(span);
                            self.fault(fault)
                        }
                    };
                }
                Op::Call(callee) => {
                    if self.call_depth >= self.limits.max_call_depth {
                        self.current_span = Some(instruction.span);
                        return self.fault(RuntimeFault::StackOverflow {
                            depth: self.limits.max_call_depth,
                        });
                    }
                    let body = program.procedure(callee).body;
                    self.stack.push(Frame::new(body, FrameKind::Procedure(callee)));
                    self.call_depth += 1;
                }
                Op::If {
                    cond,
                    then_block,
                    else_block,
                } => {
                    let arm = if eval_condition(program, cond, world) {
                        Some(then_block)
                    } else {
                        else_block
                    };
                    if let Some(arm) = arm {
                        self.stack.push(Frame::new(arm, FrameKind::Branch));
                    }
                }
                Op::While { cond, body } => {
                    if eval_condition(program, cond, world) {
                        self.stack.push(Frame::new(body, FrameKind::While(cond)));
                    }
                }
                Op::DoWhile { body, cond } => {
                    self.stack.push(Frame::new(body, FrameKind::DoWhile(cond)));
                }
                Op::Repeat { count, body } => {
                    if count > 0 {
                        self.stack
                            .push(Frame::new(body, FrameKind::Repeat { remaining: count }));
                    }
                }
            }
        }
    }

    fn finish(&mut self) -> StepResult {
        tracing::debug!(actions = self.actions, "run finished");
        self.status = Status::Finished;
        StepResult::Finished
    }

    fn fault(&mut self, fault: RuntimeFault) -> StepResult {
        tracing::debug!(
            %fault,
            actions = self.actions,
            line = self.current_span.map(|s| s.start_line),
            "run faulted"
        );
        self.stack.clear();
        self.call_depth = 0;
        self.status = Status::Faulted(fault);
        StepResult::Fault(fault)
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn status(&self) -> Status {
        self.status
    }

    /// `true` once the run has finished or faulted.
    pub fn is_terminal(&self) -> bool {
        self.status != Status::Running
    }

    pub fn program(&self) -> &Arc<Program> {
        &self.program
    }

    pub fn limits(&self) -> EngineLimits {
        self.limits
    }

    /// Primitive actions performed so far.
    pub fn actions(&self) -> u64 {
        self.actions
    }

    /// Procedure frames on the stack, the entry procedure included.
    pub fn call_depth(&self) -> usize {
        self.call_depth
    }

    pub fn stack(&self) -> &[Frame] {
        &self.stack
    }

    /// Source span of the most recent action, or of the instruction that
    /// faulted.
    pub fn current_span(&self) -> Option<Span> {
        self.current_span
    }

    /// Name of the innermost running procedure.
    pub fn current_procedure(&self) -> Option<&str> {
        self.stack.iter().rev().find_map(|frame| match frame.kind {
            FrameKind::Procedure(id) => Some(self.program.procedure(id).name.as_str()),
            _ => None,
        })
    }
}

/// Evaluate a condition tree. Reads the world only.
fn eval_condition(program: &Program, id: CondId, world: &WorldState) -> bool {
    match program.condition(id) {
        Condition::Predicate(p) => world.sense(p),
        Condition::Not(inner) => !eval_condition(program, inner, world),
        Condition::And(a, b) => eval_condition(program, a, world) && eval_condition(program, b, world),
        Condition::Or(a, b) => eval_condition(program, a, world) || eval_condition(program, b, world),
    }
}
