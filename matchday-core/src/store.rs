//! JSON document store.
//!
//! The whole domain state lives in one pretty-printed JSON file. Load is
//! forgiving: a missing or corrupt document comes back as the empty initial
//! state so the bot stays operational. Save is atomic from a reader's point
//! of view (temp file in the same directory, then rename).

use std::fs;
use std::path::{Path, PathBuf};

use crate::state::DomainState;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to write document: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode document: {0}")]
    Encode(#[from] serde_json::Error),
}

pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the document, falling back to the empty initial state when the
    /// file is missing or unreadable. Corruption is logged, not surfaced.
    pub fn load(&self) -> DomainState {
        match fs::read_to_string(&self.path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(state) => state,
                Err(e) => {
                    tracing::warn!(path = %self.path.display(), error = %e,
                        "Corrupt data file, starting from empty state");
                    DomainState::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => DomainState::default(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e,
                    "Cannot read data file, starting from empty state");
                DomainState::default()
            }
        }
    }

    /// Persist the full document. A concurrent reader sees either the old
    /// or the new document, never a partial write.
    pub fn save(&self, state: &DomainState) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(state)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
