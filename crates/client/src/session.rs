//! Persisted session identity.
//!
//! One JSON file holds the authenticated user (`{ "id": ..., "type": ... }`),
//! written at login and read before any screen talks to the backend.  A
//! missing file is the "identity not ready yet" condition, not an error:
//! dependent loads defer and retry on their next trigger.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

use siteflow_core::types::EntityId;

use crate::error::ClientResult;

/// The authenticated user, as persisted locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: EntityId,
    /// User category as the backend reports it (e.g. `"supervisor"`).
    #[serde(rename = "type")]
    pub user_type: String,
}

impl Session {
    /// The base64-wrapped user id the backend expects in `UpdatedBy`.
    pub fn encoded_id(&self) -> String {
        BASE64.encode(self.id.to_string())
    }
}

/// Reads and writes the session file.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted session.
    ///
    /// Returns `Ok(None)` when the file does not exist yet; malformed JSON
    /// is an error (a corrupt session should surface, not silently defer).
    pub fn load(&self) -> ClientResult<Option<Session>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No session file yet");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let session: Session = serde_json::from_str(&raw)?;
        Ok(Some(session))
    }

    /// Persist the session, creating parent directories as needed.
    pub fn save(&self, session: &Session) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(session)?;
        std::fs::write(&self.path, raw)?;
        tracing::info!(path = %self.path.display(), user_id = session.id, "Session saved");
        Ok(())
    }

    /// Remove the persisted session, if any.
    pub fn clear(&self) -> ClientResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
