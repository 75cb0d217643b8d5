//! World-file reader tests.

use karel_world::{builtin_world, BeeperBag, Cell, Direction, WorldError, WorldState};

fn load(text: &str) -> WorldState {
    WorldState::from_text(text).unwrap_or_else(|e| panic!("expected a world, got {e}"))
}

fn error_line(text: &str) -> usize {
    match WorldState::from_text(text) {
        Err(WorldError::Syntax { line, .. }) => line,
        other => panic!("expected a syntax error, got {other:?}"),
    }
}

#[test]
fn reads_every_entry() {
    let w = load(
        "Dimension: (10, 8)\n\
         Wall: (3, 1) East\n\
         Beeper: (5, 5) 2\n\
         Karel: (2, 3) North\n\
         BeeperBag: 4\n\
         Speed: 0.50\n",
    );
    assert_eq!((w.width(), w.height()), (10, 8));
    assert!(w.is_blocked(Cell::new(2, 0), Direction::East));
    assert!(w.is_blocked(Cell::new(3, 0), Direction::West));
    assert_eq!(w.beepers_at(Cell::new(4, 4)), 2);
    let r = w.robot();
    assert_eq!((r.x, r.y, r.direction), (1, 2, Direction::North));
    assert_eq!(w.beeper_bag(), BeeperBag::Finite(4));
}

#[test]
fn defaults_apply_when_entries_are_missing() {
    let w = load("Dimension: (4, 4)");
    let r = w.robot();
    assert_eq!((r.x, r.y, r.direction), (0, 0, Direction::East));
    assert_eq!(w.beeper_bag(), BeeperBag::Infinite);
}

#[test]
fn keys_and_directions_ignore_case() {
    let w = load("dimension: (3,3)\nKAREL: (3,3) west\nbeeperbag: infinity\nwall: (1,1) n");
    assert_eq!(w.facing(), Direction::West);
    assert_eq!(w.beeper_bag(), BeeperBag::Infinite);
    assert!(w.is_blocked(Cell::new(0, 0), Direction::North));
}

#[test]
fn entries_may_precede_dimension() {
    let w = load("Beeper: (2, 2) 1\n\n# a comment\nDimension: (2, 2)\n");
    assert_eq!(w.beepers_at(Cell::new(1, 1)), 1);
}

#[test]
fn beeper_lines_add_up() {
    let w = load("Dimension: (2, 2)\nBeeper: (1, 1) 2\nBeeper: (1, 1)\n");
    assert_eq!(w.beepers_at(Cell::new(0, 0)), 3);
}

#[test]
fn missing_dimension_is_an_error() {
    assert_eq!(
        WorldState::from_text("Karel: (1, 1) East"),
        Err(WorldError::MissingDimension)
    );
    assert_eq!(WorldState::from_text(""), Err(WorldError::MissingDimension));
}

#[test]
fn errors_carry_line_numbers() {
    assert_eq!(error_line("Dimension: (3, 3)\nKarel: (4, 1) East"), 2);
    assert_eq!(error_line("Dimension: (3, 3)\n\nWall: (1, 1) Up"), 3);
    assert_eq!(error_line("Dimension: (3, x)"), 1);
    assert_eq!(error_line("Dimension: (3, 3)\nTeleport: (1, 1)"), 2);
    assert_eq!(error_line("Dimension: (0, 3)"), 1);
    assert_eq!(error_line("Dimension: (3, 3)\nDimension: (4, 4)"), 2);
    assert_eq!(error_line("Dimension: (3, 3)\nKarel: (1, 1) East extra"), 2);
    assert_eq!(error_line("Dimension 3 3"), 1);
}

#[test]
fn error_messages_are_readable() {
    let err = WorldState::from_text("Dimension: (3, 3)\nBeeper: (0, 1) 1").unwrap_err();
    assert_eq!(err.to_string(), "line 2: (0, 1) is outside the 3x3 world");
}

#[test]
fn text_round_trips() {
    let source = "Dimension: (5, 4)\nWall: (2, 2) North\nBeeper: (3, 1) 2\nKarel: (4, 4) South\nBeeperBag: 9\n";
    let w = load(source);
    assert_eq!(load(&w.to_text()), w);
    assert_eq!(w.to_text(), source);
}

#[test]
fn builtin_world_resolves() {
    let text = builtin_world("15x15.w").expect("built in");
    let w = load(text);
    assert_eq!((w.width(), w.height()), (15, 15));
    assert_eq!(builtin_world("maze.w"), None);
}
