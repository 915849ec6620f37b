//! API key storage with expiry.
//!
//! The key lives in the OS keyring under the `classlog` service, wrapped
//! in a JSON payload carrying the save timestamp. A key older than
//! [`CREDENTIAL_TTL_SECS`] is discarded on read and reported absent, so
//! callers cannot distinguish expiry from never-set.

use std::sync::Mutex;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Keys expire two hours after the last save.
pub const CREDENTIAL_TTL_SECS: i64 = 2 * 60 * 60;

const SERVICE: &str = "classlog";
const ENTRY: &str = "api_key";

/// Credential store error types.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("stored credential is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredCredential {
    key: String,
    saved_at: i64,
}

impl StoredCredential {
    fn expired(&self, now: i64) -> bool {
        now > self.saved_at + CREDENTIAL_TTL_SECS
    }
}

/// Source of the API key used by [`ReportClient`](super::ReportClient).
///
/// `get` returning `Ok(None)` means no usable key, whether never set or
/// expired.
pub trait CredentialStore: Send + Sync {
    fn get(&self) -> Result<Option<String>, CredentialError>;
    fn set(&self, key: &str) -> Result<(), CredentialError>;
    fn clear(&self) -> Result<(), CredentialError>;
}

/// OS-keyring-backed store.
#[derive(Debug, Default)]
pub struct KeyringCredentialStore;

impl KeyringCredentialStore {
    pub fn new() -> Self {
        Self
    }

    fn entry() -> Result<keyring::Entry, CredentialError> {
        Ok(keyring::Entry::new(SERVICE, ENTRY)?)
    }
}

impl CredentialStore for KeyringCredentialStore {
    fn get(&self) -> Result<Option<String>, CredentialError> {
        let raw = match Self::entry()?.get_password() {
            Ok(raw) => raw,
            Err(keyring::Error::NoEntry) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let stored: StoredCredential = serde_json::from_str(&raw)?;
        if stored.expired(Utc::now().timestamp()) {
            self.clear()?;
            return Ok(None);
        }
        Ok(Some(stored.key))
    }

    fn set(&self, key: &str) -> Result<(), CredentialError> {
        let payload = StoredCredential {
            key: key.to_string(),
            saved_at: Utc::now().timestamp(),
        };
        Self::entry()?.set_password(&serde_json::to_string(&payload)?)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), CredentialError> {
        match Self::entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store for tests and ephemeral use.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    inner: Mutex<Option<StoredCredential>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(key: &str) -> Self {
        Self {
            inner: Mutex::new(Some(StoredCredential {
                key: key.to_string(),
                saved_at: Utc::now().timestamp(),
            })),
        }
    }

    /// Shift the save timestamp into the past, for expiry tests.
    pub fn backdate(&self, secs: i64) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(stored) = inner.as_mut() {
            stored.saved_at -= secs;
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Result<Option<String>, CredentialError> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        match inner.as_ref() {
            Some(stored) if stored.expired(Utc::now().timestamp()) => {
                *inner = None;
                Ok(None)
            }
            Some(stored) => Ok(Some(stored.key.clone())),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str) -> Result<(), CredentialError> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        *inner = Some(StoredCredential {
            key: key.to_string(),
            saved_at: Utc::now().timestamp(),
        });
        Ok(())
    }

    fn clear(&self) -> Result<(), CredentialError> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        *inner = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryCredentialStore::new();
        assert_eq!(store.get().unwrap(), None);
        store.set("abc123").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("abc123"));
        store.clear().unwrap();
        assert_eq!(store.get().unwrap(), None);
    }

    #[test]
    fn expired_key_reads_as_absent_and_is_discarded() {
        let store = MemoryCredentialStore::with_key("abc123");
        store.backdate(CREDENTIAL_TTL_SECS + 1);
        assert_eq!(store.get().unwrap(), None);
        // The stored value is gone, not just hidden.
        store.backdate(-(CREDENTIAL_TTL_SECS + 1));
        assert_eq!(store.get().unwrap(), None);
    }

    #[test]
    fn key_within_ttl_is_returned() {
        let store = MemoryCredentialStore::with_key("abc123");
        store.backdate(CREDENTIAL_TTL_SECS - 60);
        assert_eq!(store.get().unwrap().as_deref(), Some("abc123"));
    }

    #[test]
    fn set_refreshes_expiry() {
        let store = MemoryCredentialStore::with_key("old");
        store.backdate(CREDENTIAL_TTL_SECS - 10);
        store.set("new").unwrap();
        store.backdate(60);
        assert_eq!(store.get().unwrap().as_deref(), Some("new"));
    }
}
