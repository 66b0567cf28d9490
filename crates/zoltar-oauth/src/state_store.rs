//! Pending-authorization storage between the redirect and the callback.
//!
//! Only one authorization may be in flight at a time: `put` replaces whatever
//! was pending. `consume` is single-use, so a callback cannot be replayed.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use subtle::ConstantTimeEq;
use tokio::sync::Mutex;

use crate::error::{OAuthError, Result};
use crate::persist;
use crate::pkce::AuthorizationRequest;

/// Default pending-authorization file name within the data directory.
pub const STATE_FILE: &str = "pkce.json";

// ============================================================================
// AuthorizationStateStore Trait
// ============================================================================

/// Storage for the single in-flight [`AuthorizationRequest`].
#[async_trait]
pub trait AuthorizationStateStore: Send + Sync + std::fmt::Debug {
    /// Persist `request` as the pending authorization, replacing any other.
    async fn put(&self, request: &AuthorizationRequest) -> Result<()>;

    /// Match the callback's `state` and return the PKCE verifier.
    ///
    /// Fails with [`OAuthError::StateMismatch`] when nothing is pending, the
    /// state differs, or either `state` or `code` is empty. On success the
    /// pending request is discarded.
    async fn consume(&self, state: &str, code: &str) -> Result<String>;
}

/// Shared state store for use across handlers.
pub type SharedStateStore = Arc<dyn AuthorizationStateStore>;

/// Constant-time state comparison. Length differences return false.
fn states_match(expected: &str, presented: &str) -> bool {
    expected.as_bytes().ct_eq(presented.as_bytes()).into()
}

/// Decide whether `pending` answers this callback.
fn accepts(pending: Option<&AuthorizationRequest>, state: &str, code: &str) -> bool {
    if state.is_empty() || code.is_empty() {
        return false;
    }
    pending.is_some_and(|req| states_match(&req.state, state))
}

// ============================================================================
// FileStateStore
// ============================================================================

/// File-backed store holding a single `pkce.json` record.
#[derive(Debug)]
pub struct FileStateStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStateStore {
    /// Create a store writing `pkce.json` inside `data_dir`.
    pub fn new(data_dir: &Path) -> Self {
        Self::with_path(data_dir.join(STATE_FILE))
    }

    /// Create with a custom file path.
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    /// Get the state file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl AuthorizationStateStore for FileStateStore {
    async fn put(&self, request: &AuthorizationRequest) -> Result<()> {
        let _guard = self.lock.lock().await;
        persist::write_json_atomic(&self.path, request).await?;
        tracing::debug!(path = %self.path.display(), "Pending authorization stored");
        Ok(())
    }

    async fn consume(&self, state: &str, code: &str) -> Result<String> {
        let _guard = self.lock.lock().await;

        // An unreadable record is indistinguishable from no record to the caller.
        let pending: Option<AuthorizationRequest> =
            persist::read_json(&self.path).await.unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Discarding unreadable pending authorization");
                None
            });

        if !accepts(pending.as_ref(), state, code) {
            return Err(OAuthError::StateMismatch);
        }

        persist::remove(&self.path).await?;
        pending
            .map(|req| req.verifier)
            .ok_or(OAuthError::StateMismatch)
    }
}

// ============================================================================
// InMemoryStateStore
// ============================================================================

/// In-memory state store for tests and ephemeral deployments.
#[derive(Debug, Default)]
pub struct InMemoryStateStore {
    pending: Mutex<Option<AuthorizationRequest>>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuthorizationStateStore for InMemoryStateStore {
    async fn put(&self, request: &AuthorizationRequest) -> Result<()> {
        *self.pending.lock().await = Some(request.clone());
        Ok(())
    }

    async fn consume(&self, state: &str, code: &str) -> Result<String> {
        let mut pending = self.pending.lock().await;
        if !accepts(pending.as_ref(), state, code) {
            return Err(OAuthError::StateMismatch);
        }
        pending
            .take()
            .map(|req| req.verifier)
            .ok_or(OAuthError::StateMismatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn exercise(store: &dyn AuthorizationStateStore) {
        let first = AuthorizationRequest::generate();
        let second = AuthorizationRequest::generate();

        // Nothing pending yet.
        assert!(matches!(
            store.consume(&first.state, "code").await,
            Err(OAuthError::StateMismatch)
        ));

        store.put(&first).await.unwrap();
        store.put(&second).await.unwrap();

        // Superseded state no longer matches.
        assert!(matches!(
            store.consume(&first.state, "code").await,
            Err(OAuthError::StateMismatch)
        ));
        // Missing code is rejected without discarding the pending request.
        assert!(matches!(
            store.consume(&second.state, "").await,
            Err(OAuthError::StateMismatch)
        ));

        let verifier = store.consume(&second.state, "code").await.unwrap();
        assert_eq!(verifier, second.verifier);

        // Single use.
        assert!(matches!(
            store.consume(&second.state, "code").await,
            Err(OAuthError::StateMismatch)
        ));
    }

    #[tokio::test]
    async fn test_in_memory_store() {
        exercise(&InMemoryStateStore::new()).await;
    }

    #[tokio::test]
    async fn test_file_store() {
        let temp = tempdir().unwrap();
        let store = FileStateStore::new(temp.path());
        exercise(&store).await;
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_file_store_survives_restart() {
        let temp = tempdir().unwrap();
        let req = AuthorizationRequest::generate();
        FileStateStore::new(temp.path()).put(&req).await.unwrap();

        let reopened = FileStateStore::new(temp.path());
        assert_eq!(reopened.consume(&req.state, "c").await.unwrap(), req.verifier);
    }

    #[tokio::test]
    async fn test_corrupt_record_is_mismatch() {
        let temp = tempdir().unwrap();
        let store = FileStateStore::new(temp.path());
        tokio::fs::write(store.path(), b"garbage").await.unwrap();

        assert!(matches!(
            store.consume("anything", "code").await,
            Err(OAuthError::StateMismatch)
        ));
    }

    #[test]
    fn test_states_match() {
        assert!(states_match("abcd", "abcd"));
        assert!(!states_match("abcd", "abce"));
        assert!(!states_match("abcd", "abc"));
        assert!(!states_match("abcd", ""));
    }
}
