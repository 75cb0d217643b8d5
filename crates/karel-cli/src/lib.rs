//! Terminal front-end for Karel.
//!
//! `karel check` compiles a program, `karel show` draws a world file and
//! `karel run` drives the IDE controller with a filesystem world loader,
//! an ASCII renderer and the system clock.

pub mod commands;
pub mod config;
pub mod exit_codes;
pub mod loader;
pub mod logging;
pub mod render;
