//! `check`, `show` and `run`.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::thread;

use anyhow::{Context, Result};
use karel_scheduler::{Heartbeat, Ide, KarelConfig, Scheduler, SchedulerState, SystemClock};
use karel_world::{builtin_world, WorldState};

use crate::exit_codes;
use crate::loader::FsWorldLoader;
use crate::render::{self, AsciiRenderer};

// ── check ────────────────────────────────────────────────────────────────────

/// Compile `program` and print its diagnostics.
pub fn check(program: &Path, json: bool, out: &mut impl Write, err: &mut impl Write) -> Result<i32> {
    let source = read_program(program)?;
    let filename = program.display().to_string();

    if json {
        let outcome = karel_compiler::compile_to_result(&source, &filename);
        let code = if outcome.success { exit_codes::SUCCESS } else { exit_codes::FAILURE };
        writeln!(out, "{}", serde_json::to_string_pretty(&outcome).context("serialize json")?)?;
        return Ok(code);
    }

    let (compiled, diagnostics) = karel_compiler::compile_with_diagnostics(&source, &filename);
    for warning in &diagnostics.warnings {
        write!(err, "warning: {}", render::format_diagnostic(warning))?;
    }
    for error in &diagnostics.errors {
        write!(err, "{}", render::format_diagnostic(error))?;
    }
    match compiled {
        Some(program) => {
            writeln!(
                out,
                "ok: {} procedure(s), entry '{}', {} action(s)",
                program.procedures().len(),
                program.entry_procedure().name,
                program.static_action_count()
            )?;
            Ok(exit_codes::SUCCESS)
        }
        None => {
            writeln!(err, "{} error(s)", diagnostics.total_errors)?;
            Ok(exit_codes::FAILURE)
        }
    }
}

// ── show ─────────────────────────────────────────────────────────────────────

/// Print a world file as a grid.
pub fn show(world: &str, out: &mut impl Write) -> Result<i32> {
    let text = match builtin_named(world) {
        Some(text) => text.to_string(),
        None => fs::read_to_string(world).with_context(|| format!("read {world}"))?,
    };
    let world_state = WorldState::from_text(&text).with_context(|| format!("parse {world}"))?;
    write!(out, "{}", render::render_world(&world_state))?;
    writeln!(out, "{}", render::describe_world(&world_state))?;
    Ok(exit_codes::SUCCESS)
}

// ── run ──────────────────────────────────────────────────────────────────────

pub struct RunOptions {
    pub program: PathBuf,
    /// World file path, or the name of a built-in world.
    pub world: String,
    pub config: KarelConfig,
    /// Stop once this many actions have run.
    pub max_steps: Option<u64>,
    /// Print only the final world instead of every frame.
    pub quiet: bool,
    /// Redraw frames in place.
    pub clear: bool,
}

/// Run a program in real time, one heartbeat at a time.
pub fn run<O: Write, E: Write>(options: RunOptions, out: O, err: E) -> Result<i32> {
    let source = read_program(&options.program)?;
    let (dir, name) = split_world_path(&options.world);

    let renderer = AsciiRenderer::new(out, err, !options.quiet, options.clear);
    let scheduler = Scheduler::new(options.config);
    let mut ide = Ide::new(scheduler, source, FsWorldLoader::new(dir), renderer, &name);
    while ide.is_loading() {
        ide.poll_world_loader();
    }
    if ide.world().is_none() {
        return finish(ide.renderer_mut(), exit_codes::FAILURE);
    }

    ide.play();
    if ide.scheduler().state() != SchedulerState::Running {
        return finish(ide.renderer_mut(), exit_codes::FAILURE);
    }

    let clock = SystemClock::new();
    let mut pacer = Heartbeat::from_config(&options.config.scheduler);
    let mut code = exit_codes::SUCCESS;
    loop {
        ide.tick(&mut pacer, &clock);
        match ide.scheduler().state() {
            SchedulerState::Running => {}
            SchedulerState::Idle => break,
            SchedulerState::Faulted(_) => {
                code = exit_codes::FAULTED;
                break;
            }
        }
        if let Some(limit) = options.max_steps {
            if ide.scheduler().actions() >= limit {
                ide.renderer_mut().note(&format!("stopped after {limit} actions\n"));
                code = exit_codes::STEP_LIMIT;
                break;
            }
        }
        thread::sleep(pacer.until_next(&clock));
    }
    finish(ide.renderer_mut(), code)
}

fn finish<O: Write, E: Write>(renderer: &mut AsciiRenderer<O, E>, code: i32) -> Result<i32> {
    renderer.print_final().context("write output")?;
    if let Some(e) = renderer.take_io_error() {
        return Err(e).context("write output");
    }
    Ok(code)
}

fn read_program(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
}

/// The built-in world called `world`. A path with a directory part is
/// always a file, even if its file name matches a built-in.
fn builtin_named(world: &str) -> Option<&'static str> {
    if Path::new(world).components().count() == 1 {
        builtin_world(world)
    } else {
        None
    }
}

/// Loader directory and world name for `world`. A file named like a
/// built-in keeps its directory in the name so it is not mistaken for one.
fn split_world_path(world: &str) -> (PathBuf, String) {
    let path = Path::new(world);
    let dir = path.parent().filter(|d| !d.as_os_str().is_empty());
    match (dir, path.file_name()) {
        (None, _) => (PathBuf::from("."), world.to_string()),
        (Some(_), Some(file)) if builtin_world(&file.to_string_lossy()).is_some() => {
            (PathBuf::from("."), world.to_string())
        }
        (Some(dir), Some(file)) => (dir.to_path_buf(), file.to_string_lossy().into_owned()),
        (Some(_), None) => (PathBuf::from("."), world.to_string()),
    }
}
