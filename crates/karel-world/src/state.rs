//! The mutable world: grid, walls, beepers and the robot.

use std::collections::{BTreeMap, BTreeSet};

use karel_types::{Predicate, Primitive, RuntimeFault};
use serde::{Deserialize, Serialize};

use crate::error::WorldError;
use crate::geometry::{Cell, Direction, Wall};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Robot {
    pub x: u32,
    pub y: u32,
    pub direction: Direction,
}

impl Robot {
    pub fn cell(&self) -> Cell {
        Cell::new(self.x, self.y)
    }
}

/// Beepers carried by the robot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BeeperBag {
    Finite(u32),
    Infinite,
}

impl BeeperBag {
    pub fn is_empty(&self) -> bool {
        matches!(self, BeeperBag::Finite(0))
    }

    fn take(&mut self) {
        if let BeeperBag::Finite(n) = self {
            *n = n.saturating_sub(1);
        }
    }

    fn give(&mut self) {
        if let BeeperBag::Finite(n) = self {
            *n = n.saturating_add(1);
        }
    }
}

/// A Karel world.
///
/// The robot is always inside the grid, every stored beeper count is
/// positive and every stored wall separates two in-grid cells. All
/// mutations either succeed completely or leave the world untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldState {
    width: u32,
    height: u32,
    robot: Robot,
    beeper_bag: BeeperBag,
    beepers: BTreeMap<Cell, u32>,
    walls: BTreeSet<Wall>,
}

impl WorldState {
    /// An empty `width` x `height` world with the robot at the origin
    /// facing East and an infinite beeper bag.
    pub fn new(width: u32, height: u32) -> Result<Self, WorldError> {
        if width == 0 || height == 0 {
            return Err(WorldError::InvalidDimension { width, height });
        }
        Ok(Self {
            width,
            height,
            robot: Robot {
                x: 0,
                y: 0,
                direction: Direction::East,
            },
            beeper_bag: BeeperBag::Infinite,
            beepers: BTreeMap::new(),
            walls: BTreeSet::new(),
        })
    }

    fn check_cell(&self, cell: Cell) -> Result<(), WorldError> {
        if cell.x >= self.width || cell.y >= self.height {
            return Err(WorldError::OutOfBounds {
                x: cell.x,
                y: cell.y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    // ── Setup ────────────────────────────────────────────────────────────────

    pub fn place_robot(&mut self, cell: Cell, direction: Direction) -> Result<(), WorldError> {
        self.check_cell(cell)?;
        self.robot = Robot {
            x: cell.x,
            y: cell.y,
            direction,
        };
        Ok(())
    }

    /// Set the beeper count of `cell`; zero clears it.
    pub fn set_beepers(&mut self, cell: Cell, count: u32) -> Result<(), WorldError> {
        self.check_cell(cell)?;
        if count == 0 {
            self.beepers.remove(&cell);
        } else {
            self.beepers.insert(cell, count);
        }
        Ok(())
    }

    /// Add a wall on `side` of `cell`. Boundary edges are already blocked
    /// and are accepted without being stored.
    pub fn add_wall(&mut self, cell: Cell, side: Direction) -> Result<(), WorldError> {
        self.check_cell(cell)?;
        if let Some(wall) = Wall::new(cell, side, self.width, self.height) {
            self.walls.insert(wall);
        }
        Ok(())
    }

    pub fn set_beeper_bag(&mut self, bag: BeeperBag) {
        self.beeper_bag = bag;
    }

    // ── Mutation primitives ──────────────────────────────────────────────────

    pub fn move_forward(&mut self) -> Result<(), RuntimeFault> {
        let here = self.robot.cell();
        if self.is_blocked(here, self.robot.direction) {
            return Err(RuntimeFault::BlockedByWall);
        }
        let Some(next) = here.neighbor(self.robot.direction, self.width, self.height) else {
            return Err(RuntimeFault::BlockedByWall);
        };
        self.robot.x = next.x;
        self.robot.y = next.y;
        Ok(())
    }

    pub fn turn_left(&mut self) -> Result<(), RuntimeFault> {
        self.robot.direction = self.robot.direction.left();
        Ok(())
    }

    pub fn turn_right(&mut self) -> Result<(), RuntimeFault> {
        self.robot.direction = self.robot.direction.right();
        Ok(())
    }

    pub fn put_beeper(&mut self) -> Result<(), RuntimeFault> {
        if self.beeper_bag.is_empty() {
            return Err(RuntimeFault::NoBeeperToPutDown);
        }
        let here = self.robot.cell();
        if self.beepers_at(here) == u32::MAX {
            return Err(RuntimeFault::CellFull);
        }
        self.beeper_bag.take();
        *self.beepers.entry(here).or_insert(0) += 1;
        Ok(())
    }

    pub fn pick_beeper(&mut self) -> Result<(), RuntimeFault> {
        let here = self.robot.cell();
        match self.beepers.get_mut(&here) {
            None => Err(RuntimeFault::NoBeeperToPickUp),
            Some(count) => {
                *count -= 1;
                if *count == 0 {
                    self.beepers.remove(&here);
                }
                self.beeper_bag.give();
                Ok(())
            }
        }
    }

    /// Perform one primitive action.
    pub fn apply(&mut self, action: Primitive) -> Result<(), RuntimeFault> {
        match action {
            Primitive::Move => self.move_forward(),
            Primitive::TurnLeft => self.turn_left(),
            Primitive::TurnRight => self.turn_right(),
            Primitive::PutBeeper => self.put_beeper(),
            Primitive::PickBeeper => self.pick_beeper(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────────────

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn robot(&self) -> Robot {
        self.robot
    }

    pub fn beeper_bag(&self) -> BeeperBag {
        self.beeper_bag
    }

    pub fn facing(&self) -> Direction {
        self.robot.direction
    }

    /// `true` when leaving `cell` towards `direction` crosses a wall or the
    /// grid edge.
    pub fn is_blocked(&self, cell: Cell, direction: Direction) -> bool {
        match Wall::new(cell, direction, self.width, self.height) {
            None => true,
            Some(wall) => self.walls.contains(&wall),
        }
    }

    pub fn front_is_clear(&self) -> bool {
        !self.is_blocked(self.robot.cell(), self.robot.direction)
    }

    pub fn left_is_clear(&self) -> bool {
        !self.is_blocked(self.robot.cell(), self.robot.direction.left())
    }

    pub fn right_is_clear(&self) -> bool {
        !self.is_blocked(self.robot.cell(), self.robot.direction.right())
    }

    pub fn beepers_at(&self, cell: Cell) -> u32 {
        self.beepers.get(&cell).copied().unwrap_or(0)
    }

    pub fn beepers_present(&self) -> bool {
        self.beepers_at(self.robot.cell()) > 0
    }

    pub fn beepers_in_bag(&self) -> bool {
        !self.beeper_bag.is_empty()
    }

    /// Evaluate a sensing predicate against the current state.
    pub fn sense(&self, predicate: Predicate) -> bool {
        match predicate {
            Predicate::FrontIsClear => self.front_is_clear(),
            Predicate::FrontIsBlocked => !self.front_is_clear(),
            Predicate::LeftIsClear => self.left_is_clear(),
            Predicate::LeftIsBlocked => !self.left_is_clear(),
            Predicate::RightIsClear => self.right_is_clear(),
            Predicate::RightIsBlocked => !self.right_is_clear(),
            Predicate::BeepersPresent => self.beepers_present(),
            Predicate::NoBeepersPresent => !self.beepers_present(),
            Predicate::BeepersInBag => self.beepers_in_bag(),
            Predicate::NoBeepersInBag => !self.beepers_in_bag(),
            Predicate::FacingNorth => self.facing() == Direction::North,
            Predicate::FacingEast => self.facing() == Direction::East,
            Predicate::FacingSouth => self.facing() == Direction::South,
            Predicate::FacingWest => self.facing() == Direction::West,
            Predicate::NotFacingNorth => self.facing() != Direction::North,
            Predicate::NotFacingEast => self.facing() != Direction::East,
            Predicate::NotFacingSouth => self.facing() != Direction::South,
            Predicate::NotFacingWest => self.facing() != Direction::West,
        }
    }

    /// Cells holding beepers, in row-major order.
    pub fn beeper_cells(&self) -> impl Iterator<Item = (Cell, u32)> + '_ {
        self.beepers.iter().map(|(c, n)| (*c, *n))
    }

    pub fn walls(&self) -> impl Iterator<Item = Wall> + '_ {
        self.walls.iter().copied()
    }

    // ── Snapshots ────────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            width: self.width,
            height: self.height,
            robot: self.robot,
            beeper_bag: self.beeper_bag,
            beepers: self
                .beeper_cells()
                .map(|(cell, count)| BeeperPile { cell, count })
                .collect(),
            walls: self.walls().collect(),
        }
    }

    /// Rebuild a world from a snapshot, validating every cell.
    pub fn restore(snapshot: &WorldSnapshot) -> Result<Self, WorldError> {
        let mut world = WorldState::new(snapshot.width, snapshot.height)?;
        world.place_robot(snapshot.robot.cell(), snapshot.robot.direction)?;
        world.set_beeper_bag(snapshot.beeper_bag);
        for pile in &snapshot.beepers {
            world.set_beepers(pile.cell, pile.count)?;
        }
        for wall in &snapshot.walls {
            world.add_wall(wall.cell, wall.side)?;
        }
        Ok(world)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeeperPile {
    #[serde(flatten)]
    pub cell: Cell,
    pub count: u32,
}

/// Plain-data copy of a [`WorldState`], for reset, rendering and transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldSnapshot {
    pub width: u32,
    pub height: u32,
    pub robot: Robot,
    pub beeper_bag: BeeperBag,
    pub beepers: Vec<BeeperPile>,
    pub walls: Vec<Wall>,
}
