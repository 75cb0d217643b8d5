//! `karel` command-line entry point.

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use karel_cli::commands::{self, RunOptions};
use karel_cli::{config, exit_codes, logging};

#[derive(Parser)]
#[command(name = "karel", version, about = "Write programs for Karel the robot and watch them run")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile a program and report errors and warnings.
    Check {
        program: PathBuf,
        /// Print the compile result as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Draw a world file.
    Show { world: String },
    /// Run a program in a world, one heartbeat at a time.
    Run {
        program: PathBuf,
        /// World file, or a built-in world such as 15x15.w.
        #[arg(short, long, default_value = "15x15.w")]
        world: String,
        /// Configuration file (defaults to ./karel.toml when present).
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Milliseconds between heartbeats.
        #[arg(long)]
        heartbeat_ms: Option<u64>,
        /// Heartbeats per program step.
        #[arg(long)]
        action_heartbeats: Option<u32>,
        /// Stop after this many actions.
        #[arg(long)]
        max_steps: Option<u64>,
        /// Print only the final world.
        #[arg(short, long)]
        quiet: bool,
    },
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {:#}", err);
            std::process::exit(exit_codes::FAILURE);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    let mut stdout = io::stdout().lock();
    let mut stderr = io::stderr().lock();
    match cli.command {
        Command::Check { program, json } => commands::check(&program, json, &mut stdout, &mut stderr),
        Command::Show { world } => commands::show(&world, &mut stdout),
        Command::Run {
            program,
            world,
            config,
            heartbeat_ms,
            action_heartbeats,
            max_steps,
            quiet,
        } => {
            let mut config = config::load(config.as_deref())?;
            if let Some(ms) = heartbeat_ms {
                config.scheduler.heartbeat_ms = ms;
            }
            if let Some(n) = action_heartbeats {
                config.scheduler.action_heartbeats = n;
            }
            let clear = !quiet && io::stdout().is_terminal();
            let options = RunOptions {
                program,
                world,
                config,
                max_steps,
                quiet,
                clear,
            };
            commands::run(options, stdout, stderr)
        }
    }
}
