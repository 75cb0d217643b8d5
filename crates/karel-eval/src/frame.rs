//! Call-stack frames.

use karel_types::program::{BlockId, CondId, ProcId};

/// Why a block is on the stack, and what happens when it runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// Procedure body; popping it returns to the caller.
    Procedure(ProcId),
    /// `if`/`else` arm; popped once.
    Branch,
    /// Re-tests the condition before repeating.
    While(CondId),
    /// Re-tests the condition after each pass.
    DoWhile(CondId),
    /// Counts down passes still to run, this one included.
    Repeat { remaining: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub block: BlockId,
    /// Index of the next instruction in `block`.
    pub pc: usize,
    pub kind: FrameKind,
}

impl Frame {
    pub(crate) fn new(block: BlockId, kind: FrameKind) -> Self {
        Self { block, pc: 0, kind }
    }
}
