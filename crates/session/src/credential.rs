use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::error::SessionError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
}

/// The bearer token and the profile it was issued for, persisted and
/// replaced together as one value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCredential {
    pub token: String,
    pub user: UserProfile,
}

/// Durable client-local credential storage. The manager writes the
/// whole credential or nothing; partial state never hits disk.
pub trait CredentialStore: Send + Sync {
    fn load(&self) -> Option<SessionCredential>;
    fn save(&self, credential: &SessionCredential) -> Result<(), SessionError>;
    fn clear(&self);
}

/// JSON-file backed store, the desktop analogue of localStorage.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Option<SessionCredential> {
        let contents = fs::read_to_string(&self.path).ok()?;
        serde_json::from_str(&contents).ok()
    }

    fn save(&self, credential: &SessionCredential) -> Result<(), SessionError> {
        let json = serde_json::to_string(credential)
            .map_err(|e| SessionError::Storage(e.to_string()))?;
        fs::write(&self.path, json).map_err(|e| SessionError::Storage(e.to_string()))
    }

    fn clear(&self) {
        // A missing file is already the cleared state.
        let _ = fs::remove_file(&self.path);
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryCredentialStore {
    inner: Mutex<Option<SessionCredential>>,
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Option<SessionCredential> {
        self.inner.lock().unwrap().clone()
    }

    fn save(&self, credential: &SessionCredential) -> Result<(), SessionError> {
        *self.inner.lock().unwrap() = Some(credential.clone());
        Ok(())
    }

    fn clear(&self) {
        *self.inner.lock().unwrap() = None;
    }
}
