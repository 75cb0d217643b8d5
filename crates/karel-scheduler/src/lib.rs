//! Karel step scheduler.
//!
//! Paces program execution with a fixed-cadence heartbeat so rendering
//! and logical steps stay decoupled: the host calls
//! [`Scheduler::on_heartbeat`] (or [`Ide::heartbeat`]) at a steady rate,
//! and every `action_heartbeats`-th beat performs one primitive action.

pub mod clock;
mod config;
pub mod controller;
mod error;
mod scheduler;

pub use clock::{Clock, Heartbeat, ManualClock, SystemClock};
pub use config::{KarelConfig, SchedulerConfig};
pub use controller::{
    Ide, IdeEvent, LoadCompletion, Renderer, SourceProvider, WorldLoadError, WorldLoader,
};
pub use error::SchedulerError;
pub use scheduler::{HeartbeatOutcome, Scheduler, SchedulerState};
