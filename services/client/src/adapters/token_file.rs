//! services/client/src/adapters/token_file.rs
//!
//! Durable single-key token storage backed by a file. This is the client's
//! only persisted state; it is cleared on logout or whenever an invalid
//! token is detected.

use elevate_core::ports::{PortError, PortResult, TokenStorage};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

/// A token store that keeps the bearer token in a single file.
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    /// Creates a new `FileTokenStorage`.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl TokenStorage for FileTokenStorage {
    fn load(&self) -> PortResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => {
                let token = raw.trim().to_string();
                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(token))
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PortError::Unexpected(format!(
                "failed to read the token file: {}",
                e
            ))),
        }
    }

    fn store(&self, token: &str) -> PortResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                PortError::Unexpected(format!("failed to create the token directory: {}", e))
            })?;
        }
        fs::write(&self.path, token)
            .map_err(|e| PortError::Unexpected(format!("failed to write the token file: {}", e)))
    }

    fn clear(&self) -> PortResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PortError::Unexpected(format!(
                "failed to remove the token file: {}",
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_returns_none_for_a_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileTokenStorage::new(dir.path().join("token"));
        assert_eq!(storage.load().unwrap(), None);
    }

    #[test]
    fn store_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileTokenStorage::new(dir.path().join("nested").join("token"));
        storage.store("header.payload.signature").unwrap();
        assert_eq!(
            storage.load().unwrap(),
            Some("header.payload.signature".to_string())
        );
    }

    #[test]
    fn clear_removes_the_token_and_tolerates_absence() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileTokenStorage::new(dir.path().join("token"));
        storage.store("header.payload.signature").unwrap();

        storage.clear().unwrap();
        assert_eq!(storage.load().unwrap(), None);

        // Clearing again must not fail.
        storage.clear().unwrap();
    }

    #[test]
    fn a_whitespace_only_file_counts_as_no_token() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        fs::write(&path, "\n  \n").unwrap();
        let storage = FileTokenStorage::new(path);
        assert_eq!(storage.load().unwrap(), None);
    }
}
