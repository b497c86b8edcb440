//! Object storage for profile media and resumes.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum StorageError {
  #[error("Upload rejected: {0}")]
  Rejected(String),
  #[error("Storage unavailable: {0}")]
  Unavailable(String),
}

/// Binary upload target. Returns a URL the uploaded object can be fetched from.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
  async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<String, StorageError>;
}

#[derive(Debug, Clone)]
pub struct StoredObject {
  pub bytes: Vec<u8>,
  pub content_type: String,
}

/// In-process object storage. Each upload replaces the object at its path and
/// gets a fresh download token.
#[derive(Debug, Clone)]
pub struct MemoryObjectStorage {
  base_url: String,
  objects: Arc<RwLock<HashMap<String, StoredObject>>>,
}

impl Default for MemoryObjectStorage {
  fn default() -> Self {
    Self::new("memory://objects")
  }
}

impl MemoryObjectStorage {
  pub fn new(base_url: impl Into<String>) -> Self {
    Self {
      base_url: base_url.into(),
      objects: Arc::new(RwLock::new(HashMap::new())),
    }
  }

  pub async fn object(&self, path: &str) -> Option<StoredObject> {
    self.objects.read().await.get(path).cloned()
  }

  pub async fn len(&self) -> usize {
    self.objects.read().await.len()
  }

  pub async fn is_empty(&self) -> bool {
    self.len().await == 0
  }
}

#[async_trait]
impl ObjectStorage for MemoryObjectStorage {
  async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<String, StorageError> {
    if path.is_empty() || path.starts_with('/') {
      return Err(StorageError::Rejected(format!("invalid object path '{path}'")));
    }

    debug!(path, bytes = bytes.len(), content_type, "Storing object");
    self.objects.write().await.insert(
      path.to_string(),
      StoredObject {
        bytes,
        content_type: content_type.to_string(),
      },
    );
    Ok(format!("{}/{}?token={}", self.base_url, path, Uuid::new_v4()))
  }
}
