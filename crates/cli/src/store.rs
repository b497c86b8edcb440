//! JSON-file backed client for one CLI invocation

use std::{path::Path, sync::Arc};

use anyhow::{Context, Result};
use branchit::{Client, config::Config, db::MemoryStore, identity::Session};
use tracing::debug;

/// Store seeded from `data` (if it exists) plus a session for `actor`.
pub struct Workspace {
  pub store: MemoryStore,
  pub client: Client,
}

impl Workspace {
  pub fn open(data: Option<&Path>, actor: Option<&str>, email: Option<&str>, config: Config) -> Result<Self> {
    let store = match data {
      Some(path) if path.exists() => {
        let raw = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let snapshot: serde_json::Value =
          serde_json::from_str(&raw).with_context(|| format!("Invalid JSON in {}", path.display()))?;
        MemoryStore::from_snapshot(snapshot).with_context(|| format!("Invalid store snapshot {}", path.display()))?
      }
      _ => MemoryStore::new(),
    };

    let session = match actor {
      Some(actor) => Session::signed_in(actor, email),
      None => Session::anonymous(),
    };
    debug!(actor = ?actor, data = ?data, "Opened workspace");

    let client = Client::in_memory(store.clone(), Arc::new(session), config);
    Ok(Self { store, client })
  }

  /// Write the store back to `data` so mutations persist between runs.
  pub async fn save(&self, data: Option<&Path>) -> Result<()> {
    let Some(path) = data else {
      return Ok(());
    };
    let snapshot = self.store.snapshot().await;
    if let Some(parent) = path.parent()
      && !parent.as_os_str().is_empty()
    {
      std::fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, serde_json::to_string_pretty(&snapshot)?)
      .with_context(|| format!("Failed to write {}", path.display()))?;
    debug!(path = %path.display(), "Saved store snapshot");
    Ok(())
  }
}
