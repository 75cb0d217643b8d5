//! Reader and writer for the classic Karel world-file format.
//!
//! ```text
//! Dimension: (10, 8)
//! Wall: (3, 1) East
//! Beeper: (5, 5) 2
//! Karel: (1, 1) North
//! BeeperBag: INFINITY
//! Speed: 0.50
//! ```
//!
//! File coordinates are 1-based. Keys and direction names are
//! case-insensitive, blank lines and `#` comments are skipped, and the
//! entries may appear in any order. `Speed` is accepted and ignored.

use std::fmt::Write as _;

use crate::error::WorldError;
use crate::geometry::{Cell, Direction};
use crate::state::{BeeperBag, WorldState};

/// Worlds that resolve without a loader round trip.
const BUILTIN_WORLDS: &[(&str, &str)] = &[("15x15.w", "Dimension: (15,15)\n")];

/// Text of a built-in world, if `name` is one.
pub fn builtin_world(name: &str) -> Option<&'static str> {
    BUILTIN_WORLDS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, text)| *text)
}

enum Entry {
    Dimension(u32, u32),
    Wall(u32, u32, Direction),
    Beeper(u32, u32, u32),
    Karel(u32, u32, Direction),
    Bag(BeeperBag),
}

struct Line<'a> {
    number: usize,
    rest: &'a str,
}

impl<'a> Line<'a> {
    fn error(&self, message: impl Into<String>) -> WorldError {
        WorldError::Syntax {
            line: self.number,
            message: message.into(),
        }
    }

    /// `(x, y)` at the start of the remaining text.
    fn coordinates(&mut self) -> Result<(u32, u32), WorldError> {
        let text = self.rest.trim_start();
        let inner_end = text
            .strip_prefix('(')
            .and_then(|t| t.find(')'))
            .ok_or_else(|| self.error("expected coordinates like (x, y)"))?;
        let inner = &text[1..=inner_end];
        self.rest = &text[inner_end + 2..];
        let (x, y) = inner
            .split_once(',')
            .ok_or_else(|| self.error(format!("expected '(x, y)', got '({inner})'")))?;
        Ok((self.number(x)?, self.number(y)?))
    }

    fn number(&self, text: &str) -> Result<u32, WorldError> {
        let text = text.trim();
        text.parse()
            .map_err(|_| self.error(format!("expected a whole number, got '{text}'")))
    }

    fn word(&mut self) -> Option<&'a str> {
        let text = self.rest.trim_start();
        let end = text.find(char::is_whitespace).unwrap_or(text.len());
        if end == 0 {
            return None;
        }
        self.rest = &text[end..];
        Some(&text[..end])
    }

    fn direction(&mut self) -> Result<Direction, WorldError> {
        let word = self
            .word()
            .ok_or_else(|| self.error("expected a direction (North, East, South or West)"))?;
        Direction::from_name(word).ok_or_else(|| self.error(format!("unknown direction '{word}'")))
    }

    fn finish(&self) -> Result<(), WorldError> {
        let extra = self.rest.trim();
        if extra.is_empty() {
            Ok(())
        } else {
            Err(self.error(format!("unexpected '{extra}'")))
        }
    }
}

fn parse_line(number: usize, text: &str) -> Result<Option<Entry>, WorldError> {
    let text = text.trim();
    if text.is_empty() || text.starts_with('#') {
        return Ok(None);
    }
    let mut line = Line { number, rest: "" };
    let (key, rest) = text
        .split_once(':')
        .ok_or_else(|| line.error(format!("expected 'Key: value', got '{text}'")))?;
    line.rest = rest;

    let entry = match key.trim().to_ascii_lowercase().as_str() {
        "dimension" => {
            let (w, h) = line.coordinates()?;
            Entry::Dimension(w, h)
        }
        "wall" => {
            let (x, y) = line.coordinates()?;
            Entry::Wall(x, y, line.direction()?)
        }
        "beeper" => {
            let (x, y) = line.coordinates()?;
            let count = match line.word() {
                Some(word) => line.number(word)?,
                None => 1,
            };
            Entry::Beeper(x, y, count)
        }
        "karel" => {
            let (x, y) = line.coordinates()?;
            Entry::Karel(x, y, line.direction()?)
        }
        "beeperbag" => {
            let word = line.word().ok_or_else(|| line.error("expected a count or INFINITY"))?;
            if word.eq_ignore_ascii_case("infinity") || word.eq_ignore_ascii_case("infinite") {
                Entry::Bag(BeeperBag::Infinite)
            } else {
                Entry::Bag(BeeperBag::Finite(line.number(word)?))
            }
        }
        "speed" => return Ok(None),
        other => return Err(line.error(format!("unknown entry '{other}'"))),
    };
    line.finish()?;
    Ok(Some(entry))
}

/// Convert 1-based file coordinates to a cell, checking bounds.
fn cell(number: usize, x: u32, y: u32, world: &WorldState) -> Result<Cell, WorldError> {
    if x == 0 || y == 0 || x > world.width() || y > world.height() {
        return Err(WorldError::Syntax {
            line: number,
            message: format!(
                "({x}, {y}) is outside the {}x{} world",
                world.width(),
                world.height()
            ),
        });
    }
    Ok(Cell::new(x - 1, y - 1))
}

impl WorldState {
    /// Read a world file.
    ///
    /// Beeper lines for the same cell add up; a later `Karel` or
    /// `BeeperBag` line replaces an earlier one.
    pub fn from_text(text: &str) -> Result<Self, WorldError> {
        let mut entries = Vec::new();
        let mut dimension = None;
        for (index, raw) in text.lines().enumerate() {
            let number = index + 1;
            match parse_line(number, raw)? {
                Some(Entry::Dimension(w, h)) => {
                    if dimension.is_some() {
                        return Err(WorldError::Syntax {
                            line: number,
                            message: "'Dimension' given more than once".to_string(),
                        });
                    }
                    dimension = Some((number, w, h));
                }
                Some(entry) => entries.push((number, entry)),
                None => {}
            }
        }

        let (dim_line, width, height) = dimension.ok_or(WorldError::MissingDimension)?;
        let mut world = WorldState::new(width, height).map_err(|e| WorldError::Syntax {
            line: dim_line,
            message: e.to_string(),
        })?;
        for (number, entry) in entries {
            match entry {
                Entry::Dimension(..) => {}
                Entry::Wall(x, y, side) => {
                    let c = cell(number, x, y, &world)?;
                    world.add_wall(c, side)?;
                }
                Entry::Beeper(x, y, count) => {
                    let c = cell(number, x, y, &world)?;
                    let total = world.beepers_at(c).saturating_add(count);
                    world.set_beepers(c, total)?;
                }
                Entry::Karel(x, y, direction) => {
                    let c = cell(number, x, y, &world)?;
                    world.place_robot(c, direction)?;
                }
                Entry::Bag(bag) => world.set_beeper_bag(bag),
            }
        }
        Ok(world)
    }

    /// Write the world in the format [`WorldState::from_text`] reads.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Dimension: ({}, {})", self.width(), self.height());
        for wall in self.walls() {
            let _ = writeln!(out, "Wall: ({}, {}) {}", wall.cell.x + 1, wall.cell.y + 1, wall.side);
        }
        for (c, count) in self.beeper_cells() {
            let _ = writeln!(out, "Beeper: ({}, {}) {count}", c.x + 1, c.y + 1);
        }
        let robot = self.robot();
        let _ = writeln!(out, "Karel: ({}, {}) {}", robot.x + 1, robot.y + 1, robot.direction);
        match self.beeper_bag() {
            BeeperBag::Infinite => out.push_str("BeeperBag: INFINITY\n"),
            BeeperBag::Finite(n) => {
                let _ = writeln!(out, "BeeperBag: {n}");
            }
        }
        out
    }
}
