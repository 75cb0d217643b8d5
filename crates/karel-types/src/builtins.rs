//! Built-in vocabulary of the Karel language.
//!
//! Primitive actions consume a step and mutate the world. Sensing
//! predicates are read-only and only appear inside conditions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An atomic, step-consuming action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Primitive {
    Move,
    TurnLeft,
    TurnRight,
    PutBeeper,
    PickBeeper,
}

impl Primitive {
    pub const ALL: [Primitive; 5] = [
        Primitive::Move,
        Primitive::TurnLeft,
        Primitive::TurnRight,
        Primitive::PutBeeper,
        Primitive::PickBeeper,
    ];

    /// Name as written in Karel source.
    pub fn name(self) -> &'static str {
        match self {
            Primitive::Move => "move",
            Primitive::TurnLeft => "turnLeft",
            Primitive::TurnRight => "turnRight",
            Primitive::PutBeeper => "putBeeper",
            Primitive::PickBeeper => "pickBeeper",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A read-only boolean query against the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Predicate {
    FrontIsClear,
    FrontIsBlocked,
    LeftIsClear,
    LeftIsBlocked,
    RightIsClear,
    RightIsBlocked,
    BeepersPresent,
    NoBeepersPresent,
    BeepersInBag,
    NoBeepersInBag,
    FacingNorth,
    FacingEast,
    FacingSouth,
    FacingWest,
    NotFacingNorth,
    NotFacingEast,
    NotFacingSouth,
    NotFacingWest,
}

impl Predicate {
    pub const ALL: [Predicate; 18] = [
        Predicate::FrontIsClear,
        Predicate::FrontIsBlocked,
        Predicate::LeftIsClear,
        Predicate::LeftIsBlocked,
        Predicate::RightIsClear,
        Predicate::RightIsBlocked,
        Predicate::BeepersPresent,
        Predicate::NoBeepersPresent,
        Predicate::BeepersInBag,
        Predicate::NoBeepersInBag,
        Predicate::FacingNorth,
        Predicate::FacingEast,
        Predicate::FacingSouth,
        Predicate::FacingWest,
        Predicate::NotFacingNorth,
        Predicate::NotFacingEast,
        Predicate::NotFacingSouth,
        Predicate::NotFacingWest,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Predicate::FrontIsClear => "frontIsClear",
            Predicate::FrontIsBlocked => "frontIsBlocked",
            Predicate::LeftIsClear => "leftIsClear",
            Predicate::LeftIsBlocked => "leftIsBlocked",
            Predicate::RightIsClear => "rightIsClear",
            Predicate::RightIsBlocked => "rightIsBlocked",
            Predicate::BeepersPresent => "beepersPresent",
            Predicate::NoBeepersPresent => "noBeepersPresent",
            Predicate::BeepersInBag => "beepersInBag",
            Predicate::NoBeepersInBag => "noBeepersInBag",
            Predicate::FacingNorth => "facingNorth",
            Predicate::FacingEast => "facingEast",
            Predicate::FacingSouth => "facingSouth",
            Predicate::FacingWest => "facingWest",
            Predicate::NotFacingNorth => "notFacingNorth",
            Predicate::NotFacingEast => "notFacingEast",
            Predicate::NotFacingSouth => "notFacingSouth",
            Predicate::NotFacingWest => "notFacingWest",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Any name the language defines without a user declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Action(Primitive),
    Predicate(Predicate),
}

impl Builtin {
    pub fn lookup(name: &str) -> Option<Self> {
        Primitive::from_name(name)
            .map(Builtin::Action)
            .or_else(|| Predicate::from_name(name).map(Builtin::Predicate))
    }

    /// Every built-in name, actions first.
    pub fn names() -> impl Iterator<Item = &'static str> {
        Primitive::ALL
            .into_iter()
            .map(Primitive::name)
            .chain(Predicate::ALL.into_iter().map(Predicate::name))
    }
}
