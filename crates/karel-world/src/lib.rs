//! Karel world model.
//!
//! A [`WorldState`] is a rectangular grid with walls between cells, piles
//! of beepers on cells and one robot. It is mutated only through the five
//! primitive actions and read through the sensing queries the language
//! exposes as predicates.

mod error;
mod format;
pub mod geometry;
mod state;

pub use error::WorldError;
pub use format::builtin_world;
pub use geometry::{Cell, Direction, Wall};
pub use state::{BeeperBag, BeeperPile, Robot, WorldSnapshot, WorldState};
