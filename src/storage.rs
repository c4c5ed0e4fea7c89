use crate::errors::{ActivityError, AppError};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, path::Path};
use tokio::fs;
use tracing::error;

pub trait BlobStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<(), ActivityError>;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryBlobStore {
    blobs: BTreeMap<String, String>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> Option<String> {
        self.blobs.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), ActivityError> {
        self.blobs.insert(key.to_string(), value);
        Ok(())
    }
}

/// Reads the blob file. A missing or unreadable file yields an empty store.
pub async fn load_blobs(path: &Path) -> MemoryBlobStore {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(blobs) => blobs,
            Err(err) => {
                error!("failed to parse data file: {err}");
                MemoryBlobStore::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => MemoryBlobStore::default(),
        Err(err) => {
            error!("failed to read data file: {err}");
            MemoryBlobStore::default()
        }
    }
}

pub async fn persist_blobs(path: &Path, blobs: &MemoryBlobStore) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(blobs).map_err(AppError::internal)?;
    fs::write(path, payload).await?;
    Ok(())
}
