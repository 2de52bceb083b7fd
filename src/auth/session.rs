//! Persistent storage for the access/refresh token pair.
//!
//! The pair lives in `session.json` under the app's data directory, keyed by
//! the fixed `access_token`/`refresh_token` field names. It is written at
//! login and on every successful refresh, and cleared at logout. The store
//! is a trait so the guard and login flows can be tested against an
//! in-memory fake.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Session file name in the data directory
const SESSION_FILE: &str = "session.json";

/// Storage for the credential pair. One writer at a time; callers are
/// serialized through the UI event loop.
pub trait TokenStore {
    fn access_token(&self) -> Option<String>;
    fn refresh_token(&self) -> Option<String>;
    /// Overwrite both tokens atomically (both or neither).
    fn store(&mut self, access: &str, refresh: &str) -> Result<()>;
    fn clear(&mut self) -> Result<()>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredTokens {
    access_token: String,
    refresh_token: String,
}

/// File-backed token store.
pub struct Session {
    data_dir: PathBuf,
    tokens: Option<StoredTokens>,
}

impl Session {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            tokens: None,
        }
    }

    /// Load tokens from disk. Returns whether a pair was found.
    pub fn load(&mut self) -> Result<bool> {
        let path = self.session_path();
        if path.exists() {
            let contents =
                std::fs::read_to_string(&path).context("Failed to read session file")?;
            let tokens: StoredTokens =
                serde_json::from_str(&contents).context("Failed to parse session file")?;
            self.tokens = Some(tokens);
            return Ok(true);
        }
        Ok(false)
    }

    fn save(&self) -> Result<()> {
        if let Some(ref tokens) = self.tokens {
            let path = self.session_path();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let contents = serde_json::to_string_pretty(tokens)?;
            std::fs::write(path, contents)?;
        }
        Ok(())
    }

    fn session_path(&self) -> PathBuf {
        self.data_dir.join(SESSION_FILE)
    }
}

impl TokenStore for Session {
    fn access_token(&self) -> Option<String> {
        self.tokens.as_ref().map(|t| t.access_token.clone())
    }

    fn refresh_token(&self) -> Option<String> {
        self.tokens.as_ref().map(|t| t.refresh_token.clone())
    }

    fn store(&mut self, access: &str, refresh: &str) -> Result<()> {
        self.tokens = Some(StoredTokens {
            access_token: access.to_string(),
            refresh_token: refresh.to_string(),
        });
        self.save()
    }

    fn clear(&mut self) -> Result<()> {
        self.tokens = None;
        let path = self.session_path();
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(tag: &str) -> Session {
        let dir = std::env::temp_dir().join(format!("stockroom-test-{}-{}", tag, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        Session::new(dir)
    }

    #[test]
    fn test_empty_store_has_no_tokens() {
        let mut session = temp_store("empty");
        assert!(!session.load().unwrap());
        assert!(session.access_token().is_none());
        assert!(session.refresh_token().is_none());
    }

    #[test]
    fn test_store_and_reload_round_trip() {
        let mut session = temp_store("roundtrip");
        session.store("A1", "R1").unwrap();
        assert_eq!(session.access_token().as_deref(), Some("A1"));

        // A fresh store over the same directory sees the persisted pair
        let mut reloaded = Session::new(session.data_dir.clone());
        assert!(reloaded.load().unwrap());
        assert_eq!(reloaded.access_token().as_deref(), Some("A1"));
        assert_eq!(reloaded.refresh_token().as_deref(), Some("R1"));

        session.clear().unwrap();
        let _ = std::fs::remove_dir_all(&session.data_dir);
    }

    #[test]
    fn test_store_overwrites_both_tokens() {
        let mut session = temp_store("overwrite");
        session.store("A1", "R1").unwrap();
        session.store("A2", "R2").unwrap();
        assert_eq!(session.access_token().as_deref(), Some("A2"));
        assert_eq!(session.refresh_token().as_deref(), Some("R2"));

        session.clear().unwrap();
        let _ = std::fs::remove_dir_all(&session.data_dir);
    }

    #[test]
    fn test_clear_removes_file() {
        let mut session = temp_store("clear");
        session.store("A1", "R1").unwrap();
        let path = session.session_path();
        assert!(path.exists());

        session.clear().unwrap();
        assert!(!path.exists());
        assert!(session.access_token().is_none());

        let mut reloaded = Session::new(session.data_dir.clone());
        assert!(!reloaded.load().unwrap());
        let _ = std::fs::remove_dir_all(&session.data_dir);
    }
}
