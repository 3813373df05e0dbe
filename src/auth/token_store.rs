use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// A single persisted slot holding the bearer token.
///
/// Every operation is best effort: storage failures are logged and degrade to
/// "no token" or a no-op, so callers must not assume a `set` stuck.
pub trait TokenStore: Send + Sync {
    fn set(&self, token: &str);
    fn get(&self) -> Option<String>;
    fn remove(&self);
}

/// Keeps the token in a file named after the storage key.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(dir: impl AsRef<Path>, key: &str) -> Self {
        Self {
            path: dir.as_ref().join(key),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn set(&self, token: &str) {
        if let Some(parent) = self.path.parent() {
            if let Err(err) = std::fs::create_dir_all(parent) {
                log::error!("Error setting auth token in {}: {}", self.path.display(), err);
                return;
            }
        }
        if let Err(err) = std::fs::write(&self.path, token) {
            log::error!("Error setting auth token in {}: {}", self.path.display(), err);
        }
    }

    fn get(&self) -> Option<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim_end();
                (!token.is_empty()).then(|| token.to_string())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => None,
            Err(err) => {
                log::error!("Error getting auth token from {}: {}", self.path.display(), err);
                None
            }
        }
    }

    fn remove(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => {
                log::error!("Error removing auth token from {}: {}", self.path.display(), err);
            }
        }
    }
}

/// In-process slot, shared between clones.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryTokenStore {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(token.into()))),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn set(&self, token: &str) {
        match self.slot.lock() {
            Ok(mut slot) => *slot = Some(token.to_string()),
            Err(err) => log::error!("Error setting auth token: {}", err),
        }
    }

    fn get(&self) -> Option<String> {
        match self.slot.lock() {
            Ok(slot) => slot.clone(),
            Err(err) => {
                log::error!("Error getting auth token: {}", err);
                None
            }
        }
    }

    fn remove(&self) {
        match self.slot.lock() {
            Ok(mut slot) => *slot = None,
            Err(err) => log::error!("Error removing auth token: {}", err),
        }
    }
}
