//! Small JSON document persistence helpers shared by the file-backed stores.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{OAuthError, Result};

/// Serialize `value` and atomically replace `path` with it.
///
/// The document is written to a sibling temp file and renamed over the
/// target, so a concurrent reader sees either the old or the new contents.
pub(crate) async fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            OAuthError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    let json = serde_json::to_vec_pretty(value)
        .map_err(|e| OAuthError::Serialization(format!("Failed to serialize: {}", e)))?;

    let tmp = temp_path(path);
    tokio::fs::write(&tmp, json).await.map_err(|e| {
        OAuthError::Storage(format!("Failed to write {}: {}", tmp.display(), e))
    })?;

    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(OAuthError::Storage(format!(
            "Failed to replace {}: {}",
            path.display(),
            e
        )));
    }

    Ok(())
}

/// Read and deserialize `path`, returning `None` when it does not exist.
pub(crate) async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let content = match tokio::fs::read(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(OAuthError::Storage(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            )));
        }
    };

    serde_json::from_slice(&content)
        .map(Some)
        .map_err(|e| OAuthError::Serialization(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Remove `path`, treating an already-missing file as success.
pub(crate) async fn remove(path: &Path) -> Result<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(OAuthError::Storage(format!(
            "Failed to remove {}: {}",
            path.display(),
            e
        ))),
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
