//! ASCII rendering of worlds and IDE events.

use std::io::{self, Write};

use karel_scheduler::{IdeEvent, Renderer};
use karel_types::{CompileError, RuntimeFault, Span};
use karel_world::{BeeperBag, Cell, Direction, WorldState};

const CLEAR_SCREEN: &str = "\x1b[H\x1b[2J";

// ══════════════════════════════════════════════════════════════════════════════
// World text
// ══════════════════════════════════════════════════════════════════════════════

/// Draw `world` with north at the top.
///
/// The robot is `^ > v <`, beeper piles are their count (`*` above nine),
/// `|` and `-` between cells are walls.
pub fn render_world(world: &WorldState) -> String {
    let (width, height) = (world.width(), world.height());
    let border = format!("+{}+\n", "-".repeat((2 * width - 1) as usize));
    let mut out = border.clone();
    for y in (0..height).rev() {
        out.push('|');
        for x in 0..width {
            let cell = Cell::new(x, y);
            out.push(cell_char(world, cell));
            if x + 1 < width {
                out.push(if world.is_blocked(cell, Direction::East) { '|' } else { ' ' });
            }
        }
        out.push_str("|\n");

        if y > 0 && (0..width).any(|x| world.is_blocked(Cell::new(x, y), Direction::South)) {
            out.push('|');
            for x in 0..width {
                let wall = world.is_blocked(Cell::new(x, y), Direction::South);
                out.push(if wall { '-' } else { ' ' });
                if x + 1 < width {
                    out.push(' ');
                }
            }
            out.push_str("|\n");
        }
    }
    out.push_str(&border);
    out
}

fn cell_char(world: &WorldState, cell: Cell) -> char {
    let robot = world.robot();
    if robot.cell() == cell {
        return match robot.direction {
            Direction::North => '^',
            Direction::East => '>',
            Direction::South => 'v',
            Direction::West => '<',
        };
    }
    match world.beepers_at(cell) {
        0 => '.',
        n @ 1..=9 => char::from(b'0' + n as u8),
        _ => '*',
    }
}

/// One-line description, in the 1-based coordinates of world files.
pub fn describe_world(world: &WorldState) -> String {
    let robot = world.robot();
    let bag = match world.beeper_bag() {
        BeeperBag::Infinite => "infinite".to_string(),
        BeeperBag::Finite(n) => n.to_string(),
    };
    let (piles, beepers) = world
        .beeper_cells()
        .fold((0, 0u64), |(piles, total), (_, n)| (piles + 1, total + u64::from(n)));
    format!(
        "{}x{} world; robot at ({}, {}) facing {}; bag: {}; {} beepers on {} cells",
        world.width(),
        world.height(),
        robot.x + 1,
        robot.y + 1,
        robot.direction,
        bag,
        beepers,
        piles
    )
}

/// Multi-line rendering of one diagnostic.
pub fn format_diagnostic(error: &CompileError) -> String {
    let mut out = format!("{}:{}\n", error.file, error);
    if !error.source_line.is_empty() {
        out.push_str(&format!("  | {}\n", error.source_line));
    }
    if let Some(suggestion) = &error.suggestion {
        out.push_str(&format!("  = help: {suggestion}\n"));
    }
    out
}

// ══════════════════════════════════════════════════════════════════════════════
// Renderer
// ══════════════════════════════════════════════════════════════════════════════

/// How a run ended, as seen by the renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum RunEnd {
    Finished { actions: u64 },
    Faulted { fault: RuntimeFault, span: Option<Span> },
}

/// Writes frames to `out` and messages to `err`.
pub struct AsciiRenderer<O, E> {
    out: O,
    err: E,
    frames: bool,
    clear: bool,
    ended: Option<RunEnd>,
    last_frame: String,
    io_error: Option<io::Error>,
}

impl<O: Write, E: Write> AsciiRenderer<O, E> {
    /// `frames` prints every redraw; `clear` redraws in place on a terminal.
    pub fn new(out: O, err: E, frames: bool, clear: bool) -> Self {
        Self {
            out,
            err,
            frames,
            clear,
            ended: None,
            last_frame: String::new(),
            io_error: None,
        }
    }

    pub fn ended(&self) -> Option<&RunEnd> {
        self.ended.as_ref()
    }

    pub fn last_frame(&self) -> &str {
        &self.last_frame
    }

    /// Write the last frame unless every frame was already printed.
    pub fn print_final(&mut self) -> io::Result<()> {
        if !self.frames && !self.last_frame.is_empty() {
            self.out.write_all(self.last_frame.as_bytes())?;
        }
        self.out.flush()
    }

    /// The first write error, if any draw or report failed.
    pub fn take_io_error(&mut self) -> Option<io::Error> {
        self.io_error.take()
    }

    pub fn into_parts(self) -> (O, E) {
        (self.out, self.err)
    }

    /// Write a message to the error stream.
    pub fn note(&mut self, message: &str) {
        if let Err(e) = self.err.write_all(message.as_bytes()) {
            self.io_error.get_or_insert(e);
        }
    }
}

impl<O: Write, E: Write> Renderer for AsciiRenderer<O, E> {
    fn draw(&mut self, world: &WorldState) {
        self.last_frame = render_world(world);
        if !self.frames {
            return;
        }
        let result = if self.clear {
            write!(self.out, "{CLEAR_SCREEN}{}", self.last_frame)
        } else {
            writeln!(self.out, "{}", self.last_frame)
        };
        if let Err(e) = result.and_then(|()| self.out.flush()) {
            self.io_error.get_or_insert(e);
        }
    }

    fn report(&mut self, event: IdeEvent) {
        match event {
            IdeEvent::CompileFailed(errors) => {
                for error in &errors.errors {
                    self.note(&format_diagnostic(error));
                }
                self.note(&format!("{} error(s)\n", errors.total_errors));
            }
            IdeEvent::CompileWarnings(warnings) => {
                for warning in &warnings {
                    self.note(&format!("warning: {}", format_diagnostic(warning)));
                }
            }
            IdeEvent::Started => tracing::debug!("run started"),
            IdeEvent::Finished { actions } => {
                self.note(&format!("finished after {actions} actions\n"));
                self.ended = Some(RunEnd::Finished { actions });
            }
            IdeEvent::Faulted { fault, span } => {
                let message = match span {
                    Some(span) => format!("fault at {span}: {fault}\n"),
                    None => format!("fault: {fault}\n"),
                };
                self.note(&message);
                self.ended = Some(RunEnd::Faulted { fault, span });
            }
            IdeEvent::ActionFailed(fault) => self.note(&format!("cannot do that: {fault}\n")),
            IdeEvent::Rejected(e) => self.note(&format!("error: {e}\n")),
            IdeEvent::WorldLoaded(name) => tracing::info!(world = %name, "world loaded"),
            IdeEvent::WorldLoadFailed(message) => self.note(&format!("error: {message}\n")),
            IdeEvent::NoSource => self.note("error: no program source\n"),
        }
    }
}
