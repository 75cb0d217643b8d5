//! A browser session: one scheduler driven by JavaScript.
//!
//! The page owns the animation loop and world fetching, so this is the
//! scheduler without the [`karel_scheduler::Ide`] collaborators. Worlds
//! arrive as text (or by built-in name) and results go back as plain
//! serializable values.

use std::sync::Arc;

use karel_compiler::CompileOutcome;
use karel_eval::StepResult;
use karel_scheduler::controller::PROGRAM_FILE;
use karel_scheduler::{HeartbeatOutcome, KarelConfig, Scheduler, SchedulerError, SchedulerState};
use karel_types::{Primitive, Span};
use karel_world::{builtin_world, WorldError, WorldSnapshot, WorldState};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("unknown world '{0}'; pass its text to loadWorld")]
    UnknownWorld(String),

    #[error("{name}: {source}")]
    World { name: String, source: WorldError },

    #[error("unknown action '{0}'")]
    UnknownAction(String),

    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
}

/// Result of pressing play.
#[derive(Debug, Clone, Serialize)]
pub struct PlayReport {
    pub compile: CompileOutcome,
    pub started: bool,
    /// Why a successfully compiled program did not start.
    pub rejected: Option<String>,
}

/// Scheduler status for the page's toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SessionStatus {
    #[serde(flatten)]
    pub state: SchedulerState,
    pub actions: u64,
    pub paused: bool,
    pub span: Option<Span>,
}

pub struct Session {
    scheduler: Scheduler,
    world_name: Option<String>,
}

impl Session {
    pub fn new(config: KarelConfig) -> Self {
        Self {
            scheduler: Scheduler::new(config),
            world_name: None,
        }
    }

    /// Load world `name`. Without `text` only built-in worlds resolve.
    pub fn load_world(&mut self, name: &str, text: Option<&str>) -> Result<(), SessionError> {
        let text = text
            .or_else(|| builtin_world(name))
            .ok_or_else(|| SessionError::UnknownWorld(name.to_string()))?;
        let world = WorldState::from_text(text).map_err(|source| SessionError::World {
            name: name.to_string(),
            source,
        })?;
        self.scheduler.load_world(world);
        self.world_name = Some(name.to_string());
        Ok(())
    }

    /// Compile `source` and, if it compiles, start running it.
    pub fn play(&mut self, source: &str) -> PlayReport {
        let (program, errors) = karel_compiler::compile_with_diagnostics(source, PROGRAM_FILE);
        let compile = CompileOutcome::new(program.as_ref(), errors);
        let Some(program) = program else {
            return PlayReport {
                compile,
                started: false,
                rejected: None,
            };
        };
        match self.scheduler.start(Arc::new(program)) {
            Ok(()) => PlayReport {
                compile,
                started: true,
                rejected: None,
            },
            Err(e) => PlayReport {
                compile,
                started: false,
                rejected: Some(e.to_string()),
            },
        }
    }

    pub fn stop(&mut self) {
        self.scheduler.stop();
    }

    pub fn heartbeat(&mut self) -> HeartbeatOutcome {
        self.scheduler.on_heartbeat()
    }

    pub fn single_step(&mut self) -> Result<StepResult, SessionError> {
        Ok(self.scheduler.request_single_step()?)
    }

    pub fn resume(&mut self) -> Result<(), SessionError> {
        Ok(self.scheduler.resume()?)
    }

    /// Apply a primitive by its source name, e.g. `"turnLeft"`.
    pub fn step_action(&mut self, name: &str) -> Result<(), SessionError> {
        let action =
            Primitive::from_name(name).ok_or_else(|| SessionError::UnknownAction(name.to_string()))?;
        Ok(self.scheduler.request_action(action)?)
    }

    pub fn world(&self) -> Option<WorldSnapshot> {
        self.scheduler.world().map(WorldState::snapshot)
    }

    pub fn world_name(&self) -> Option<&str> {
        self.world_name.as_deref()
    }

    pub fn status(&self) -> SessionStatus {
        let state = self.scheduler.state();
        SessionStatus {
            state,
            actions: self.scheduler.actions(),
            paused: state == SchedulerState::Idle && self.scheduler.has_live_run(),
            span: self.scheduler.current_span(),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(KarelConfig::default())
    }
}
