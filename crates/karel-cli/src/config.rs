//! `karel.toml` loading.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use karel_scheduler::KarelConfig;

/// Looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "karel.toml";

/// Read the configuration at `path`, or `karel.toml` if present, or the
/// defaults.
pub fn load(path: Option<&Path>) -> Result<KarelConfig> {
    match path {
        Some(path) => read(path),
        None if Path::new(DEFAULT_CONFIG_FILE).is_file() => read(Path::new(DEFAULT_CONFIG_FILE)),
        None => Ok(KarelConfig::default()),
    }
}

fn read(path: &Path) -> Result<KarelConfig> {
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let config = toml::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_partial_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("karel.toml");
        fs::write(&path, "[scheduler]\nheartbeat_ms = 20\n").expect("write");
        let config = load(Some(path.as_path())).expect("load");
        assert_eq!(config.scheduler.heartbeat_ms, 20);
        assert_eq!(config.scheduler.action_heartbeats, 1);
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = load(Some(Path::new("/nonexistent/karel.toml"))).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/karel.toml"));
    }

    #[test]
    fn bad_toml_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("karel.toml");
        fs::write(&path, "[scheduler]\nheartbeat_ms = \"soon\"\n").expect("write");
        let err = load(Some(path.as_path())).unwrap_err();
        assert!(format!("{err:#}").starts_with("parse "));
    }
}
