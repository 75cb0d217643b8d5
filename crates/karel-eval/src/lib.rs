//! Karel execution engine.
//!
//! Runs a compiled [`karel_types::Program`] against a
//! [`karel_world::WorldState`] one primitive action per step, so a
//! scheduler can interleave steps with rendering.

mod engine;
pub mod frame;
mod limits;

pub use engine::{begin_run, ExecutionState, Status, StepResult};
pub use limits::EngineLimits;
