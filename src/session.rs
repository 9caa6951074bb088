use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Utc};

use crate::error::ApiError;
use crate::types::TokenData;

pub const JWT_USERNAME: &str = "jwt_username";
pub const JWT_ACCESS_TOKEN: &str = "jwt_access_token";
pub const JWT_REFRESH_TOKEN: &str = "jwt_refresh_token";

pub const SESSION_KEYS: [&str; 3] = [JWT_USERNAME, JWT_ACCESS_TOKEN, JWT_REFRESH_TOKEN];

/// Scoped key/value storage for the session credentials.
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), ApiError>;
    fn remove(&self, key: &str) -> Result<(), ApiError>;
}

pub fn store_tokens(storage: &dyn SessionStorage, tokens: &TokenData) -> Result<(), ApiError> {
    storage.set(JWT_USERNAME, &tokens.username)?;
    storage.set(JWT_ACCESS_TOKEN, &tokens.accesstoken)?;
    storage.set(JWT_REFRESH_TOKEN, &tokens.refreshtoken)?;
    Ok(())
}

pub fn clear_tokens(storage: &dyn SessionStorage) -> Result<(), ApiError> {
    for key in SESSION_KEYS {
        storage.remove(key)?;
    }
    Ok(())
}

pub fn load_tokens(storage: &dyn SessionStorage) -> Option<TokenData> {
    Some(TokenData {
        username: storage.get(JWT_USERNAME)?,
        accesstoken: storage.get(JWT_ACCESS_TOKEN)?,
        refreshtoken: storage.get(JWT_REFRESH_TOKEN)?,
    })
}

// ============================================================================
// In-memory storage (lives as long as the process)
// ============================================================================

#[derive(Default)]
pub struct MemoryStorage {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.values.lock().map(|v| v.is_empty()).unwrap_or(true)
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ApiError> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| ApiError::Storage("memory storage poisoned".into()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), ApiError> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| ApiError::Storage("memory storage poisoned".into()))?;
        values.remove(key);
        Ok(())
    }
}

// ============================================================================
// File-backed storage (survives between CLI invocations)
// ============================================================================

pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> BTreeMap<String, String> {
        fs::read_to_string(&self.path)
            .ok()
            .and_then(|data| serde_json::from_str(&data).ok())
            .unwrap_or_default()
    }

    fn write(&self, values: &BTreeMap<String, String>) -> Result<(), ApiError> {
        if values.is_empty() {
            if self.path.exists() {
                fs::remove_file(&self.path)?;
            }
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(values)?)?;
        Ok(())
    }

    fn update(&self, f: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<(), ApiError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| ApiError::Storage("session file lock poisoned".into()))?;
        let mut values = self.read();
        f(&mut values);
        self.write(&values)
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.read().remove(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ApiError> {
        self.update(|values| {
            values.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), ApiError> {
        self.update(|values| {
            values.remove(key);
        })
    }
}

// ============================================================================
// JWT payload inspection (no signature check)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TokenClaims {
    pub subject: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl TokenClaims {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now)
    }
}

pub fn decode_claims(token: &str) -> Option<TokenClaims> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let value: serde_json::Value = serde_json::from_slice(&bytes).ok()?;

    let subject = value
        .get("username")
        .or_else(|| value.get("sub"))
        .and_then(|v| v.as_str())
        .map(str::to_string);
    let expires_at = value
        .get("exp")
        .and_then(|v| v.as_i64())
        .and_then(|secs| DateTime::from_timestamp(secs, 0));

    Some(TokenClaims {
        subject,
        expires_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tokens() -> TokenData {
        TokenData {
            username: "alice".into(),
            accesstoken: "access".into(),
            refreshtoken: "refresh".into(),
        }
    }

    #[test]
    fn memory_storage_round_trips_and_clears() {
        let storage = MemoryStorage::new();
        store_tokens(&storage, &tokens()).unwrap();
        assert_eq!(load_tokens(&storage), Some(tokens()));

        clear_tokens(&storage).unwrap();
        assert!(storage.is_empty());
        assert_eq!(load_tokens(&storage), None);
    }

    #[test]
    fn file_storage_persists_between_instances() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("session.json");

        store_tokens(&FileStorage::new(&path), &tokens()).unwrap();
        let reopened = FileStorage::new(&path);
        assert_eq!(reopened.get(JWT_ACCESS_TOKEN).as_deref(), Some("access"));

        clear_tokens(&reopened).unwrap();
        assert!(!path.exists());
        assert_eq!(reopened.get(JWT_USERNAME), None);
    }

    #[test]
    fn decode_claims_reads_subject_and_expiry() {
        let payload = URL_SAFE_NO_PAD.encode(br#"{"username":"alice","exp":1700000000}"#);
        let token = format!("eyJhbGciOiJIUzI1NiJ9.{}.sig", payload);

        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.subject.as_deref(), Some("alice"));
        let exp = claims.expires_at.unwrap();
        assert_eq!(exp.timestamp(), 1_700_000_000);
        assert!(claims.is_expired(exp));
        assert!(!claims.is_expired(exp - chrono::Duration::seconds(1)));
    }

    #[test]
    fn decode_claims_rejects_opaque_tokens() {
        assert_eq!(decode_claims("opaque"), None);
        assert_eq!(decode_claims("a.!!!.c"), None);
    }
}
