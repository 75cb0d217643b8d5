//! The IDE controller: wires the scheduler to an editor, a world loader
//! and a renderer.
//!
//! The controller owns no UI. It asks its collaborators for source text
//! and world files, and tells the renderer when to redraw and what
//! happened (compile errors, faults, completion, load failures).

use std::sync::Arc;

use karel_eval::StepResult;
use karel_types::{CompileError, CompileErrors, Primitive, RuntimeFault, Span};
use karel_world::{builtin_world, WorldState};
use thiserror::Error;

use crate::clock::{Clock, Heartbeat};
use crate::error::SchedulerError;
use crate::scheduler::{HeartbeatOutcome, Scheduler};

/// File name used in diagnostics for editor contents.
pub const PROGRAM_FILE: &str = "program.k";

// ══════════════════════════════════════════════════════════════════════════════
// Collaborators
// ══════════════════════════════════════════════════════════════════════════════

/// Supplies the program text, typically from an editor.
pub trait SourceProvider {
    fn source(&self) -> Option<String>;
}

impl SourceProvider for String {
    fn source(&self) -> Option<String> {
        Some(self.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorldLoadError {
    #[error("world '{0}' was not found")]
    NotFound(String),
    #[error("could not read world '{name}': {reason}")]
    Unreadable { name: String, reason: String },
}

/// A finished load request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadCompletion {
    pub name: String,
    pub result: Result<String, WorldLoadError>,
}

/// Fetches world files, possibly asynchronously.
pub trait WorldLoader {
    /// Begin loading `name`.
    fn request(&mut self, name: &str);
    /// A completed load, if one is ready.
    fn poll(&mut self) -> Option<LoadCompletion>;
}

/// Notable things the renderer should show besides the world itself.
#[derive(Debug, Clone, PartialEq)]
pub enum IdeEvent {
    CompileFailed(CompileErrors),
    CompileWarnings(Vec<CompileError>),
    Started,
    Finished { actions: u64 },
    Faulted { fault: RuntimeFault, span: Option<Span> },
    /// A manual step button failed.
    ActionFailed(RuntimeFault),
    Rejected(SchedulerError),
    WorldLoaded(String),
    WorldLoadFailed(String),
    NoSource,
}

pub trait Renderer {
    fn draw(&mut self, world: &WorldState);
    fn report(&mut self, event: IdeEvent);
}

// ══════════════════════════════════════════════════════════════════════════════
// Ide
// ══════════════════════════════════════════════════════════════════════════════

pub struct Ide<S, L, R> {
    scheduler: Scheduler,
    source: S,
    loader: L,
    renderer: R,
    world_name: String,
    loading: bool,
}

impl<S: SourceProvider, L: WorldLoader, R: Renderer> Ide<S, L, R> {
    /// Create the controller and start loading `initial_world`.
    pub fn new(scheduler: Scheduler, source: S, loader: L, renderer: R, initial_world: &str) -> Self {
        let mut ide = Self {
            scheduler,
            source,
            loader,
            renderer,
            world_name: String::new(),
            loading: false,
        };
        ide.change_world(initial_world);
        ide
    }

    // ── Buttons ──────────────────────────────────────────────────────────────

    /// Compile the current source and run it from the current world.
    pub fn play(&mut self) {
        let Some(source) = self.source.source() else {
            self.renderer.report(IdeEvent::NoSource);
            return;
        };
        let (program, diagnostics) = karel_compiler::compile_with_diagnostics(&source, PROGRAM_FILE);
        let Some(program) = program else {
            self.renderer.report(IdeEvent::CompileFailed(diagnostics));
            return;
        };
        if !diagnostics.warnings.is_empty() {
            self.renderer.report(IdeEvent::CompileWarnings(diagnostics.warnings));
        }
        match self.scheduler.start(Arc::new(program)) {
            Ok(()) => self.renderer.report(IdeEvent::Started),
            Err(e) => self.renderer.report(IdeEvent::Rejected(e)),
        }
    }

    /// Stop the run and reset the world.
    pub fn stop(&mut self) {
        self.scheduler.stop();
        self.redraw();
    }

    /// Switch to another world. Built-in worlds load at once; others go
    /// through the loader and arrive via [`Ide::poll_world_loader`].
    pub fn change_world(&mut self, name: &str) {
        self.world_name = name.to_string();
        self.scheduler.unload_world();
        match builtin_world(name) {
            Some(text) => {
                self.loading = false;
                self.world_file_loaded(name, text);
            }
            None => {
                tracing::debug!(world = name, "requesting world");
                self.loading = true;
                self.loader.request(name);
            }
        }
    }

    /// Install any finished world loads. Completions for a world that is
    /// no longer selected are ignored.
    pub fn poll_world_loader(&mut self) {
        while let Some(completion) = self.loader.poll() {
            if completion.name != self.world_name || !self.loading {
                tracing::debug!(world = %completion.name, "ignoring stale world load");
                continue;
            }
            self.loading = false;
            match completion.result {
                Ok(text) => self.world_file_loaded(&completion.name, &text),
                Err(e) => self.renderer.report(IdeEvent::WorldLoadFailed(e.to_string())),
            }
        }
    }

    fn world_file_loaded(&mut self, name: &str, text: &str) {
        match WorldState::from_text(text) {
            Ok(world) => {
                self.scheduler.load_world(world);
                self.redraw();
                self.renderer.report(IdeEvent::WorldLoaded(name.to_string()));
            }
            Err(e) => self
                .renderer
                .report(IdeEvent::WorldLoadFailed(format!("{name}: {e}"))),
        }
    }

    /// One heartbeat: maybe step, then redraw.
    pub fn heartbeat(&mut self) -> HeartbeatOutcome {
        let outcome = self.scheduler.on_heartbeat();
        if let HeartbeatOutcome::Stepped(result) = outcome {
            self.after_step(result);
        }
        outcome
    }

    /// Fire every heartbeat `pacer` says is due on `clock`; returns how
    /// many fired.
    pub fn tick(&mut self, pacer: &mut Heartbeat, clock: &dyn Clock) -> u32 {
        let beats = pacer.due(clock);
        for _ in 0..beats {
            self.heartbeat();
        }
        beats
    }

    /// Run exactly one step of the program and pause.
    pub fn single_step(&mut self) {
        match self.scheduler.request_single_step() {
            Ok(result) => self.after_step(result),
            Err(e) => self.renderer.report(IdeEvent::Rejected(e)),
        }
    }

    /// Continue a paused run.
    pub fn resume(&mut self) {
        if let Err(e) = self.scheduler.resume() {
            self.renderer.report(IdeEvent::Rejected(e));
        }
    }

    pub fn step_move(&mut self) {
        self.step_action(Primitive::Move);
    }

    pub fn step_turn_left(&mut self) {
        self.step_action(Primitive::TurnLeft);
    }

    pub fn step_turn_right(&mut self) {
        self.step_action(Primitive::TurnRight);
    }

    pub fn step_put_beeper(&mut self) {
        self.step_action(Primitive::PutBeeper);
    }

    pub fn step_pick_beeper(&mut self) {
        self.step_action(Primitive::PickBeeper);
    }

    fn step_action(&mut self, action: Primitive) {
        match self.scheduler.request_action(action) {
            Ok(()) => {}
            Err(SchedulerError::Fault(fault)) => self.renderer.report(IdeEvent::ActionFailed(fault)),
            Err(e) => self.renderer.report(IdeEvent::Rejected(e)),
        }
        self.redraw();
    }

    fn after_step(&mut self, result: StepResult) {
        self.redraw();
        match result {
            StepResult::Continued => {}
            StepResult::Finished => self.renderer.report(IdeEvent::Finished {
                actions: self.scheduler.actions(),
            }),
            StepResult::Fault(fault) => self.renderer.report(IdeEvent::Faulted {
                fault,
                span: self.scheduler.current_span(),
            }),
        }
    }

    fn redraw(&mut self) {
        if let Some(world) = self.scheduler.world() {
            self.renderer.draw(world);
        }
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn world(&self) -> Option<&WorldState> {
        self.scheduler.world()
    }

    pub fn world_name(&self) -> &str {
        &self.world_name
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}
