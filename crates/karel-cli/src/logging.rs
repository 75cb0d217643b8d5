//! Diagnostic tracing for the CLI.
//!
//! Program output (frames, diagnostics, the final summary) goes to
//! stdout/stderr directly; this is only the `tracing` side channel.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG`; defaults to `warn`. Output: stderr, compact format.
///
/// ```bash
/// RUST_LOG=karel_eval=trace karel run maze.k --world maze.w
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
