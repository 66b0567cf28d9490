//! Token set persistence.
//!
//! The stored set is replaced wholesale on every successful exchange; there
//! are no partial updates.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use crate::error::Result;
use crate::exchange::TokenSet;
use crate::persist;

/// Default token file name within the data directory.
pub const TOKEN_FILE: &str = "tokens.json";

// ============================================================================
// TokenStore Trait
// ============================================================================

/// Durable storage for the current [`TokenSet`].
#[async_trait]
pub trait TokenStore: Send + Sync + std::fmt::Debug {
    /// Replace the stored token set.
    async fn save(&self, tokens: &TokenSet) -> Result<()>;

    /// Load the stored token set, if any.
    async fn load(&self) -> Result<Option<TokenSet>>;
}

/// Shared token store for use across handlers.
pub type SharedTokenStore = Arc<dyn TokenStore>;

// ============================================================================
// FileTokenStore
// ============================================================================

/// File-backed token store (`tokens.json`).
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileTokenStore {
    /// Create a store writing `tokens.json` inside `data_dir`.
    pub fn new(data_dir: &Path) -> Self {
        Self::with_path(data_dir.join(TOKEN_FILE))
    }

    /// Create with a custom token path.
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    /// Get the token file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn save(&self, tokens: &TokenSet) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        persist::write_json_atomic(&self.path, tokens).await?;
        tracing::info!("Tokens saved to {}", self.path.display());
        Ok(())
    }

    async fn load(&self) -> Result<Option<TokenSet>> {
        persist::read_json(&self.path).await
    }
}

// ============================================================================
// InMemoryTokenStore (for testing)
// ============================================================================

/// In-memory token store for testing.
#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    tokens: RwLock<Option<TokenSet>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn save(&self, tokens: &TokenSet) -> Result<()> {
        *self.tokens.write().await = Some(tokens.clone());
        Ok(())
    }

    async fn load(&self) -> Result<Option<TokenSet>> {
        Ok(self.tokens.read().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample(access: &str) -> TokenSet {
        TokenSet {
            access_token: access.to_string(),
            refresh_token: Some("refresh".to_string()),
            token_type: "Bearer".to_string(),
            expires_in: 3600,
            scope: "events:subscribe".to_string(),
        }
    }

    #[tokio::test]
    async fn test_file_round_trip_across_restart() {
        let temp = tempdir().unwrap();
        let tokens = sample("access-1");
        FileTokenStore::new(temp.path()).save(&tokens).await.unwrap();

        let reopened = FileTokenStore::new(temp.path());
        assert_eq!(reopened.load().await.unwrap(), Some(tokens));
    }

    #[tokio::test]
    async fn test_file_save_replaces_wholesale() {
        let temp = tempdir().unwrap();
        let store = FileTokenStore::new(temp.path());
        store.save(&sample("first")).await.unwrap();

        let second = TokenSet {
            refresh_token: None,
            ..sample("second")
        };
        store.save(&second).await.unwrap();

        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded, second);
        assert!(loaded.refresh_token.is_none());
    }

    #[tokio::test]
    async fn test_file_load_empty() {
        let temp = tempdir().unwrap();
        assert!(FileTokenStore::new(temp.path()).load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_saves_leave_valid_document() {
        let temp = tempdir().unwrap();
        let store = Arc::new(FileTokenStore::new(temp.path()));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move { store.save(&sample(&format!("t{i}"))).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let loaded = store.load().await.unwrap().unwrap();
        assert!(loaded.access_token.starts_with('t'));
    }

    #[tokio::test]
    async fn test_in_memory_store() {
        let store = InMemoryTokenStore::new();
        assert!(store.load().await.unwrap().is_none());
        store.save(&sample("a")).await.unwrap();
        assert_eq!(store.load().await.unwrap().unwrap().access_token, "a");
    }
}
