//! Cells, compass directions and wall edges.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Compass heading. North is `y + 1`, East is `x + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Quarter turn counter-clockwise.
    pub fn left(self) -> Self {
        match self {
            Direction::North => Direction::West,
            Direction::West => Direction::South,
            Direction::South => Direction::East,
            Direction::East => Direction::North,
        }
    }

    /// Quarter turn clockwise.
    pub fn right(self) -> Self {
        match self {
            Direction::North => Direction::East,
            Direction::East => Direction::South,
            Direction::South => Direction::West,
            Direction::West => Direction::North,
        }
    }

    pub fn opposite(self) -> Self {
        self.left().left()
    }

    /// `(dx, dy)` of one step in this direction.
    pub fn delta(self) -> (i64, i64) {
        match self {
            Direction::North => (0, 1),
            Direction::East => (1, 0),
            Direction::South => (0, -1),
            Direction::West => (-1, 0),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::North => "North",
            Direction::East => "East",
            Direction::South => "South",
            Direction::West => "West",
        }
    }

    /// Case-insensitive; accepts full names and single letters.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "north" | "n" => Some(Direction::North),
            "east" | "e" => Some(Direction::East),
            "south" | "s" => Some(Direction::South),
            "west" | "w" => Some(Direction::West),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A grid cell, 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: u32,
    pub y: u32,
}

impl Cell {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// The neighbouring cell in `direction`, or `None` past the grid edge.
    pub fn neighbor(self, direction: Direction, width: u32, height: u32) -> Option<Cell> {
        let (dx, dy) = direction.delta();
        let x = i64::from(self.x) + dx;
        let y = i64::from(self.y) + dy;
        if x < 0 || y < 0 || x >= i64::from(width) || y >= i64::from(height) {
            return None;
        }
        Some(Cell::new(x as u32, y as u32))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A wall on the edge between two cells.
///
/// Stored normalized to the north or east side of a cell, so the wall
/// south of `(x, y)` and the wall north of `(x, y - 1)` are the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Wall {
    pub cell: Cell,
    pub side: Direction,
}

impl Wall {
    /// The wall on `side` of `cell`. `None` for an edge on the grid
    /// boundary, which is always blocked anyway.
    pub fn new(cell: Cell, side: Direction, width: u32, height: u32) -> Option<Wall> {
        match side {
            Direction::North | Direction::East => {
                cell.neighbor(side, width, height)?;
                Some(Wall { cell, side })
            }
            Direction::South | Direction::West => {
                let other = cell.neighbor(side, width, height)?;
                Some(Wall {
                    cell: other,
                    side: side.opposite(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turning_cycles() {
        for d in Direction::ALL {
            assert_eq!(d.left().right(), d);
            assert_eq!(d.left().left().left().left(), d);
            assert_eq!(d.opposite().opposite(), d);
        }
        assert_eq!(Direction::East.left(), Direction::North);
        assert_eq!(Direction::East.right(), Direction::South);
    }

    #[test]
    fn direction_names() {
        assert_eq!(Direction::from_name("NORTH"), Some(Direction::North));
        assert_eq!(Direction::from_name("w"), Some(Direction::West));
        assert_eq!(Direction::from_name("up"), None);
    }

    #[test]
    fn neighbors_stop_at_edges() {
        let c = Cell::new(0, 0);
        assert_eq!(c.neighbor(Direction::North, 3, 3), Some(Cell::new(0, 1)));
        assert_eq!(c.neighbor(Direction::West, 3, 3), None);
        assert_eq!(c.neighbor(Direction::South, 3, 3), None);
        assert_eq!(Cell::new(2, 2).neighbor(Direction::East, 3, 3), None);
    }

    #[test]
    fn walls_normalize() {
        let a = Wall::new(Cell::new(1, 1), Direction::South, 3, 3);
        let b = Wall::new(Cell::new(1, 0), Direction::North, 3, 3);
        assert_eq!(a, b);
        let c = Wall::new(Cell::new(1, 1), Direction::West, 3, 3);
        let d = Wall::new(Cell::new(0, 1), Direction::East, 3, 3);
        assert_eq!(c, d);
        assert_eq!(Wall::new(Cell::new(0, 0), Direction::West, 3, 3), None);
    }
}
