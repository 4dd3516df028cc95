//! Single-slot bearer-token storage.
//!
//! DESIGN
//! ======
//! The slot holds at most one token. `FileTokenStore` writes through to a
//! single file so the credential survives restarts of the same client
//! install, and keeps an in-memory copy so reads on the request path never
//! touch the disk. Only `SessionManager` writes the slot; every domain
//! client reads it.
//!
//! No expiry is checked here. Stale tokens are rejected by the backend.

use std::io;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to write token file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Durable single-slot holder of the current bearer credential.
pub trait TokenStore: Send + Sync {
    /// Replace the slot contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the token could not be persisted.
    fn set(&self, token: &str) -> Result<(), StoreError>;

    /// Current token, if any.
    fn get(&self) -> Option<String>;

    /// Empty the slot. Never fails.
    fn clear(&self);
}

// =============================================================================
// FILE STORE
// =============================================================================

pub struct FileTokenStore {
    path: PathBuf,
    slot: RwLock<Option<String>>,
}

impl FileTokenStore {
    /// Open the slot at `path`, loading any token a previous run left there.
    ///
    /// A missing or unreadable file opens as an empty slot.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let slot = match std::fs::read_to_string(&path) {
            Ok(contents) => {
                let token = contents.trim();
                (!token.is_empty()).then(|| token.to_owned())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "token file unreadable; starting empty");
                None
            }
        };
        Self { path, slot: RwLock::new(slot) }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_file(&self, token: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, token)?;
        restrict_permissions(&self.path)
    }
}

impl TokenStore for FileTokenStore {
    fn set(&self, token: &str) -> Result<(), StoreError> {
        let mut slot = self.slot.write();
        self.write_file(token).map_err(|source| StoreError::Write { path: self.path.clone(), source })?;
        *slot = Some(token.to_owned());
        Ok(())
    }

    fn get(&self) -> Option<String> {
        self.slot.read().clone()
    }

    fn clear(&self) {
        let mut slot = self.slot.write();
        *slot = None;
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(path = %self.path.display(), error = %e, "failed to remove token file"),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> io::Result<()> {
    Ok(())
}

// =============================================================================
// MEMORY STORE
// =============================================================================

/// Process-local slot; nothing survives a restart.
#[derive(Default)]
pub struct MemoryTokenStore {
    slot: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self { slot: RwLock::new(Some(token.into())) }
    }
}

impl TokenStore for MemoryTokenStore {
    fn set(&self, token: &str) -> Result<(), StoreError> {
        *self.slot.write() = Some(token.to_owned());
        Ok(())
    }

    fn get(&self) -> Option<String> {
        self.slot.read().clone()
    }

    fn clear(&self) {
        *self.slot.write() = None;
    }
}

#[cfg(test)]
#[path = "token_store_test.rs"]
mod tests;
