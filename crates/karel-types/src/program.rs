//! The compiled, validated form of a Karel program.
//!
//! Blocks and conditions live in flat arenas addressed by small ids, so an
//! execution frame is just `(BlockId, index)` and a [`Program`] can be
//! shared behind an `Arc` without lifetimes. Every id stored in a
//! `Program` refers to an entry of that same program.

use crate::{Predicate, Primitive, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProcId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CondId(pub u32);

/// Name of the implicit procedure built from top-level statements.
pub const IMPLICIT_ENTRY: &str = "<main>";

#[derive(Debug, Clone, PartialEq)]
pub struct Procedure {
    pub name: String,
    pub body: BlockId,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    pub op: Op,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Action(Primitive),
    Call(ProcId),
    If {
        cond: CondId,
        then_block: BlockId,
        else_block: Option<BlockId>,
    },
    /// Pre-tested loop.
    While { cond: CondId, body: BlockId },
    /// Post-tested loop: the body runs at least once.
    DoWhile { body: BlockId, cond: CondId },
    Repeat { count: u32, body: BlockId },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Condition {
    Predicate(Predicate),
    Not(CondId),
    And(CondId, CondId),
    Or(CondId, CondId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    procedures: Vec<Procedure>,
    blocks: Vec<Vec<Instruction>>,
    conditions: Vec<Condition>,
    entry: ProcId,
    max_nesting: usize,
}

impl Program {
    pub fn entry(&self) -> ProcId {
        self.entry
    }

    pub fn entry_procedure(&self) -> &Procedure {
        self.procedure(self.entry)
    }

    pub fn procedure(&self, id: ProcId) -> &Procedure {
        &self.procedures[id.0 as usize]
    }

    pub fn procedures(&self) -> &[Procedure] {
        &self.procedures
    }

    pub fn find_procedure(&self, name: &str) -> Option<ProcId> {
        self.procedures
            .iter()
            .position(|p| p.name == name)
            .map(|i| ProcId(i as u32))
    }

    pub fn block(&self, id: BlockId) -> &[Instruction] {
        &self.blocks[id.0 as usize]
    }

    pub fn condition(&self, id: CondId) -> Condition {
        self.conditions[id.0 as usize]
    }

    /// Deepest static block nesting of any procedure body.
    pub fn max_nesting(&self) -> usize {
        self.max_nesting
    }

    /// Number of primitive actions written in the source (not executed).
    pub fn static_action_count(&self) -> usize {
        self.blocks
            .iter()
            .flatten()
            .filter(|i| matches!(i.op, Op::Action(_)))
            .count()
    }
}

/// Assembles a [`Program`]. Blocks are added innermost-first, so a
/// block's children always have ids before the block itself.
#[derive(Debug, Default)]
pub struct ProgramBuilder {
    procedures: Vec<Procedure>,
    blocks: Vec<Vec<Instruction>>,
    conditions: Vec<Condition>,
    max_nesting: usize,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_block(&mut self, instructions: Vec<Instruction>) -> BlockId {
        self.blocks.push(instructions);
        BlockId(self.blocks.len() as u32 - 1)
    }

    pub fn add_condition(&mut self, condition: Condition) -> CondId {
        self.conditions.push(condition);
        CondId(self.conditions.len() as u32 - 1)
    }

    /// Procedures must be added in [`ProcId`] order.
    pub fn add_procedure(&mut self, name: impl Into<String>, body: BlockId, span: Span) -> ProcId {
        self.procedures.push(Procedure {
            name: name.into(),
            body,
            span,
        });
        ProcId(self.procedures.len() as u32 - 1)
    }

    pub fn note_nesting(&mut self, depth: usize) {
        self.max_nesting = self.max_nesting.max(depth);
    }

    pub fn finish(self, entry: ProcId) -> Program {
        Program {
            procedures: self.procedures,
            blocks: self.blocks,
            conditions: self.conditions,
            entry,
            max_nesting: self.max_nesting,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(p: Primitive) -> Instruction {
        Instruction {
            op: Op::Action(p),
            span: Span::point(1, 1),
        }
    }

    #[test]
    fn builder_assigns_sequential_ids() {
        let mut b = ProgramBuilder::new();
        let inner = b.add_block(vec![action(Primitive::Move)]);
        let cond = b.add_condition(Condition::Predicate(Predicate::FrontIsClear));
        let outer = b.add_block(vec![Instruction {
            op: Op::While { cond, body: inner },
            span: Span::point(1, 1),
        }]);
        let main = b.add_procedure("main", outer, Span::point(1, 1));
        b.note_nesting(2);
        let program = b.finish(main);

        assert_eq!(inner, BlockId(0));
        assert_eq!(outer, BlockId(1));
        assert_eq!(program.entry_procedure().name, "main");
        assert_eq!(program.find_procedure("main"), Some(ProcId(0)));
        assert_eq!(program.find_procedure("other"), None);
        assert_eq!(program.max_nesting(), 2);
        assert_eq!(program.static_action_count(), 1);
        assert_eq!(
            program.condition(cond),
            Condition::Predicate(Predicate::FrontIsClear)
        );
    }
}
