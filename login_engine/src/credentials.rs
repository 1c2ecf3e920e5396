//! The credential store.
//!
//! Credentials are loaded in bulk from a JSON file at startup, and appended to (in memory only) whenever a
//! registration completes. Nothing is ever written back to the source file, and nothing is ever removed.
//!
//! Passwords are stored and compared in plaintext, with no attempt at constant-time comparison. This is a known gap
//! and not something callers should rely on.
use std::{
    fs,
    path::Path,
    sync::{PoisonError, RwLock},
};

use log::*;
use login_common::Secret;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CredentialStoreError {
    #[error("Could not read the credential source at {path}. {source}")]
    Io { path: String, source: std::io::Error },
    #[error("The credential source is not a valid JSON list of credentials. {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// Opaque identifier. Empty for users that registered during the lifetime of this process.
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub password: Secret<String>,
}

impl Credential {
    pub fn new<S: Into<String>>(id: S, name: S, password: Secret<String>) -> Self {
        Self { id: id.into(), name: name.into(), password }
    }
}

/// Reads a JSON array of `{id, name, password}` objects from `path`.
pub fn load_credentials<P: AsRef<Path>>(path: P) -> Result<Vec<Credential>, CredentialStoreError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .map_err(|source| CredentialStoreError::Io { path: path.display().to_string(), source })?;
    let credentials = serde_json::from_str::<Vec<Credential>>(&contents)?;
    Ok(credentials)
}

/// A thread-safe list of credentials. Reads (`validate`) and the single write path (`append`) share one lock.
#[derive(Debug, Default)]
pub struct CredentialStore {
    credentials: RwLock<Vec<Credential>>,
}

impl CredentialStore {
    pub fn new(credentials: Vec<Credential>) -> Self {
        Self { credentials: RwLock::new(credentials) }
    }

    /// Loads the credential store from the file at `path`. There is no degraded mode: if this fails, the caller should
    /// not start serving traffic.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CredentialStoreError> {
        let credentials = load_credentials(path.as_ref())?;
        info!("🔑️ Loaded {} users from {}", credentials.len(), path.as_ref().display());
        Ok(Self::new(credentials))
    }

    pub fn from_json(json: &str) -> Result<Self, CredentialStoreError> {
        let credentials = serde_json::from_str::<Vec<Credential>>(json)?;
        Ok(Self::new(credentials))
    }

    /// Returns true iff there is a credential whose name and password both match exactly.
    pub fn validate(&self, name: &str, password: &str) -> bool {
        // A panicking writer can only have been part way through a `push`, which leaves the list intact.
        let credentials = self.credentials.read().unwrap_or_else(PoisonError::into_inner);
        credentials.iter().any(|c| c.name == name && c.password.reveal() == password)
    }

    /// Returns a copy of the first credential named `name`, if any.
    pub fn find(&self, name: &str) -> Option<Credential> {
        let credentials = self.credentials.read().unwrap_or_else(PoisonError::into_inner);
        credentials.iter().find(|c| c.name == name).cloned()
    }

    pub fn append(&self, credential: Credential) {
        trace!("🔑️ Adding credential for {}", credential.name);
        let mut credentials = self.credentials.write().unwrap_or_else(PoisonError::into_inner);
        credentials.push(credential);
    }

    pub fn len(&self) -> usize {
        self.credentials.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
