//! World loading from the filesystem.

use std::collections::VecDeque;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use karel_scheduler::{LoadCompletion, WorldLoadError, WorldLoader};

/// Reads world files relative to a base directory.
///
/// The read happens on `request`; the completion is handed out on the next
/// `poll`, the way a browser fetch would arrive on a later tick.
#[derive(Debug, Default)]
pub struct FsWorldLoader {
    base: PathBuf,
    ready: VecDeque<LoadCompletion>,
}

impl FsWorldLoader {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            ready: VecDeque::new(),
        }
    }

    fn read(&self, name: &str) -> Result<String, WorldLoadError> {
        let path = self.base.join(name);
        fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => WorldLoadError::NotFound(path.display().to_string()),
            _ => WorldLoadError::Unreadable {
                name: path.display().to_string(),
                reason: e.to_string(),
            },
        })
    }
}

impl WorldLoader for FsWorldLoader {
    fn request(&mut self, name: &str) {
        let result = self.read(name);
        self.ready.push_back(LoadCompletion {
            name: name.to_string(),
            result,
        });
    }

    fn poll(&mut self) -> Option<LoadCompletion> {
        self.ready.pop_front()
    }
}
