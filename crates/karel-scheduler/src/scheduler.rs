//! The step scheduler state machine.
//!
//! ```text
//!            start                 Finished
//!   Idle ───────────▶ Running ───────────────▶ Idle
//!    ▲  ◀─────────────   │
//!    │      stop         │ Fault
//!    │                   ▼
//!    └────── stop ─── Faulted
//! ```
//!
//! While `Running`, every `action_heartbeats`-th heartbeat executes one
//! step. Single-stepping runs one step immediately and leaves the
//! scheduler `Idle` with the run paused; [`Scheduler::resume`] continues it.

use std::sync::Arc;

use karel_eval::{EngineLimits, ExecutionState, StepResult};
use karel_types::{Primitive, Program, RuntimeFault, Span};
use karel_world::WorldState;
use serde::{Deserialize, Serialize};

use crate::config::{KarelConfig, SchedulerConfig};
use crate::error::SchedulerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum SchedulerState {
    Idle,
    Running,
    Faulted(RuntimeFault),
}

/// What one heartbeat did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum HeartbeatOutcome {
    /// Nothing is running.
    Idle,
    /// Running, but this beat was not an action beat.
    Waiting,
    Stepped(StepResult),
    /// A step was already in flight.
    Ignored,
}

pub struct Scheduler {
    config: SchedulerConfig,
    limits: EngineLimits,
    state: SchedulerState,
    world: Option<WorldState>,
    /// The world as loaded; `stop` returns to it.
    initial_world: Option<WorldState>,
    program: Option<Arc<Program>>,
    run: Option<ExecutionState>,
    countdown: u32,
    in_flight: bool,
    /// Actions performed by the current or most recent run.
    actions: u64,
    current_span: Option<Span>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(KarelConfig::default())
    }
}

impl Scheduler {
    pub fn new(config: KarelConfig) -> Self {
        Self {
            config: config.scheduler,
            limits: config.limits,
            state: SchedulerState::Idle,
            world: None,
            initial_world: None,
            program: None,
            run: None,
            countdown: config.scheduler.heartbeats_per_step(),
            in_flight: false,
            actions: 0,
            current_span: None,
        }
    }

    // ── World ────────────────────────────────────────────────────────────────

    /// Install a freshly loaded world. Any run is discarded.
    pub fn load_world(&mut self, world: WorldState) {
        tracing::debug!(width = world.width(), height = world.height(), "world loaded");
        self.initial_world = Some(world.clone());
        self.world = Some(world);
        self.discard_run();
    }

    /// Drop the world, e.g. while a new one is loading.
    pub fn unload_world(&mut self) {
        self.world = None;
        self.initial_world = None;
        self.discard_run();
    }

    pub fn world(&self) -> Option<&WorldState> {
        self.world.as_ref()
    }

    // ── Run control ──────────────────────────────────────────────────────────

    /// Begin running `program` from the current world.
    pub fn start(&mut self, program: Arc<Program>) -> Result<(), SchedulerError> {
        if self.world.is_none() {
            return Err(SchedulerError::WorldNotLoaded);
        }
        self.run = Some(ExecutionState::begin(Arc::clone(&program), self.limits));
        self.program = Some(program);
        self.actions = 0;
        self.current_span = None;
        self.countdown = self.config.heartbeats_per_step();
        self.state = SchedulerState::Running;
        tracing::info!("run started");
        Ok(())
    }

    /// Execute one step right away and pause.
    ///
    /// Continues the live run, or begins a new run of the last started
    /// program when there is none.
    pub fn request_single_step(&mut self) -> Result<StepResult, SchedulerError> {
        if self.world.is_none() {
            return Err(SchedulerError::WorldNotLoaded);
        }
        let program = self.program.clone().ok_or(SchedulerError::NoProgram)?;
        if self.run.is_none() {
            self.run = Some(ExecutionState::begin(program, self.limits));
            self.actions = 0;
            self.current_span = None;
        }
        self.state = SchedulerState::Idle;
        Ok(self.step())
    }

    /// Continue a run paused by single-stepping.
    pub fn resume(&mut self) -> Result<(), SchedulerError> {
        if self.run.is_none() || self.state != SchedulerState::Idle {
            return Err(SchedulerError::NothingToResume);
        }
        self.countdown = self.config.heartbeats_per_step();
        self.state = SchedulerState::Running;
        tracing::debug!("run resumed");
        Ok(())
    }

    /// Abandon the run and put the world back as it was loaded.
    pub fn stop(&mut self) {
        self.discard_run();
        if let Some(initial) = &self.initial_world {
            self.world = Some(initial.clone());
        }
        tracing::info!("stopped");
    }

    /// Advance the heartbeat countdown, stepping when it reaches zero.
    pub fn on_heartbeat(&mut self) -> HeartbeatOutcome {
        if self.in_flight {
            return HeartbeatOutcome::Ignored;
        }
        if self.state != SchedulerState::Running {
            return HeartbeatOutcome::Idle;
        }
        self.countdown = self.countdown.saturating_sub(1);
        if self.countdown > 0 {
            return HeartbeatOutcome::Waiting;
        }
        self.countdown = self.config.heartbeats_per_step();
        HeartbeatOutcome::Stepped(self.step())
    }

    /// Apply one primitive straight to the world, outside any run.
    pub fn request_action(&mut self, action: Primitive) -> Result<(), SchedulerError> {
        let world = self.world.as_mut().ok_or(SchedulerError::WorldNotLoaded)?;
        world.apply(action)?;
        tracing::debug!(%action, "manual action");
        Ok(())
    }

    fn step(&mut self) -> StepResult {
        let (Some(run), Some(world)) = (self.run.as_mut(), self.world.as_mut()) else {
            self.state = SchedulerState::Idle;
            return StepResult::Fault(RuntimeFault::AlreadyTerminated);
        };
        self.in_flight = true;
        let result = run.execute_step(world);
        self.in_flight = false;
        self.actions = run.actions();
        self.current_span = run.current_span();

        match result {
            StepResult::Continued => {}
            StepResult::Finished => {
                tracing::info!(actions = self.actions, "run finished");
                self.run = None;
                self.state = SchedulerState::Idle;
            }
            StepResult::Fault(fault) => {
                tracing::info!(%fault, actions = self.actions, "run faulted");
                self.run = None;
                self.state = SchedulerState::Faulted(fault);
            }
        }
        result
    }

    fn discard_run(&mut self) {
        self.run = None;
        self.state = SchedulerState::Idle;
        self.countdown = self.config.heartbeats_per_step();
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// `true` while a run exists that has not ended.
    pub fn has_live_run(&self) -> bool {
        self.run.is_some()
    }

    pub fn program(&self) -> Option<&Arc<Program>> {
        self.program.as_ref()
    }

    pub fn actions(&self) -> u64 {
        self.actions
    }

    /// Span of the last action, or of the instruction that faulted.
    pub fn current_span(&self) -> Option<Span> {
        self.current_span
    }
}
