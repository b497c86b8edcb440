use std::{
  collections::{BTreeMap, HashMap},
  sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
  },
};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, trace, warn};

use super::{
  document::{apply_set, apply_transform, lookup_path, string_at},
  store::{DbError, Document, DocumentStore, Result, SetMode, Transaction, WriteOp},
};

#[derive(Debug, Clone)]
struct Entry {
  version: u64,
  doc: Document,
}

#[derive(Debug, Default)]
struct State {
  collections: HashMap<String, BTreeMap<String, Entry>>,
  /// Monotonic write clock. Version 0 means "absent".
  clock: u64,
}

impl State {
  fn version_of(&self, collection: &str, id: &str) -> u64 {
    self
      .collections
      .get(collection)
      .and_then(|c| c.get(id))
      .map(|e| e.version)
      .unwrap_or(0)
  }

  fn doc_of(&self, collection: &str, id: &str) -> Option<&Document> {
    self.collections.get(collection).and_then(|c| c.get(id)).map(|e| &e.doc)
  }

  /// Stage every op against a scratch view, then publish all of them.
  /// Nothing is touched if any op fails.
  fn apply(&mut self, ops: Vec<WriteOp>) -> Result<()> {
    let mut staged: HashMap<(String, String), Option<Document>> = HashMap::new();
    let mut order: Vec<(String, String)> = Vec::new();

    for op in ops {
      let (collection, id) = op.target();
      let key = (collection.to_string(), id.to_string());
      let current = match staged.get(&key) {
        Some(doc) => doc.clone(),
        None => self.doc_of(collection, id).cloned(),
      };

      let next = match op {
        WriteOp::Set { fields, mode, .. } => Some(apply_set(current, fields, mode)),
        WriteOp::Delete { .. } => None,
        WriteOp::Update { field, transform, .. } => {
          let Some(mut doc) = current else {
            return Err(DbError::NotFound(format!("{}/{}", key.0, key.1)));
          };
          apply_transform(&mut doc, &field, &transform)?;
          Some(doc)
        }
      };

      if !staged.contains_key(&key) {
        order.push(key.clone());
      }
      staged.insert(key, next);
    }

    for key in order {
      let Some(next) = staged.remove(&key) else { continue };
      let (collection, id) = key;
      self.clock += 1;
      let version = self.clock;
      let docs = self.collections.entry(collection).or_default();
      match next {
        Some(doc) => {
          docs.insert(id, Entry { version, doc });
        }
        None => {
          docs.remove(&id);
        }
      }
    }
    Ok(())
  }
}

/// In-process [`DocumentStore`] with per-document versions for optimistic
/// transactions.
///
/// Clones share state. The store can be switched into an unavailable mode in
/// which every call fails with [`DbError::Unavailable`], which is how callers
/// exercise degraded-backend paths.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  state: Arc<RwLock<State>>,
  unavailable: Arc<AtomicBool>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Build a store from a `{collection: {id: document}}` JSON snapshot.
  pub fn from_snapshot(snapshot: Value) -> Result<Self> {
    let Value::Object(collections) = snapshot else {
      return Err(DbError::InvalidInput("snapshot must be an object of collections".into()));
    };

    let mut state = State::default();
    for (name, docs) in collections {
      let Value::Object(docs) = docs else {
        return Err(DbError::InvalidInput(format!("collection '{name}' must be an object")));
      };
      let target = state.collections.entry(name.clone()).or_default();
      for (id, doc) in docs {
        let Value::Object(doc) = doc else {
          return Err(DbError::InvalidInput(format!("document '{name}/{id}' must be an object")));
        };
        state.clock += 1;
        target.insert(
          id,
          Entry {
            version: state.clock,
            doc,
          },
        );
      }
    }

    debug!(collections = state.collections.len(), documents = state.clock, "Loaded store snapshot");
    Ok(Self {
      state: Arc::new(RwLock::new(state)),
      unavailable: Arc::new(AtomicBool::new(false)),
    })
  }

  /// Export all documents in the same shape [`MemoryStore::from_snapshot`] reads.
  pub async fn snapshot(&self) -> Value {
    let state = self.state.read().await;
    let mut out = serde_json::Map::new();
    for (name, docs) in &state.collections {
      let docs = docs
        .iter()
        .map(|(id, entry)| (id.clone(), Value::Object(entry.doc.clone())))
        .collect();
      out.insert(name.clone(), Value::Object(docs));
    }
    Value::Object(out)
  }

  /// Toggle simulated backend outage.
  pub fn set_unavailable(&self, unavailable: bool) {
    if unavailable {
      warn!("Memory store switched to unavailable");
    }
    self.unavailable.store(unavailable, Ordering::SeqCst);
  }

  fn ensure_available(flag: &AtomicBool) -> Result<()> {
    if flag.load(Ordering::SeqCst) {
      return Err(DbError::Unavailable("backend offline".into()));
    }
    Ok(())
  }

  async fn scan<F>(&self, collection: &str, limit: usize, matches: F) -> Result<Vec<(String, Document)>>
  where
    F: Fn(&Document) -> bool,
  {
    Self::ensure_available(&self.unavailable)?;
    let state = self.state.read().await;
    let Some(docs) = state.collections.get(collection) else {
      return Ok(Vec::new());
    };
    Ok(
      docs
        .iter()
        .filter(|(_, e)| matches(&e.doc))
        .take(limit)
        .map(|(id, e)| (id.clone(), e.doc.clone()))
        .collect(),
    )
  }
}

#[async_trait]
impl DocumentStore for MemoryStore {
  #[tracing::instrument(level = "trace", skip(self))]
  async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
    Self::ensure_available(&self.unavailable)?;
    let state = self.state.read().await;
    Ok(state.doc_of(collection, id).cloned())
  }

  #[tracing::instrument(level = "trace", skip(self, fields))]
  async fn set(&self, collection: &str, id: &str, fields: Document, mode: SetMode) -> Result<()> {
    Self::ensure_available(&self.unavailable)?;
    let mut state = self.state.write().await;
    state.apply(vec![WriteOp::set(collection, id, fields, mode)])
  }

  #[tracing::instrument(level = "trace", skip(self))]
  async fn delete(&self, collection: &str, id: &str) -> Result<()> {
    Self::ensure_available(&self.unavailable)?;
    let mut state = self.state.write().await;
    state.apply(vec![WriteOp::delete(collection, id)])
  }

  #[tracing::instrument(level = "trace", skip(self, ops), fields(batch_size = ops.len()))]
  async fn run_batch(&self, ops: Vec<WriteOp>) -> Result<()> {
    Self::ensure_available(&self.unavailable)?;
    let mut state = self.state.write().await;
    let count = ops.len();
    state.apply(ops)?;
    trace!(ops = count, clock = state.clock, "Batch committed");
    Ok(())
  }

  async fn begin(&self) -> Result<Box<dyn Transaction>> {
    Self::ensure_available(&self.unavailable)?;
    Ok(Box::new(MemoryTransaction {
      state: Arc::clone(&self.state),
      unavailable: Arc::clone(&self.unavailable),
      reads: HashMap::new(),
      writes: Vec::new(),
    }))
  }

  #[tracing::instrument(level = "trace", skip(self))]
  async fn where_between(
    &self,
    collection: &str,
    field: &str,
    lo: &str,
    hi: &str,
    limit: usize,
  ) -> Result<Vec<(String, Document)>> {
    Self::ensure_available(&self.unavailable)?;
    let state = self.state.read().await;
    let Some(docs) = state.collections.get(collection) else {
      return Ok(Vec::new());
    };

    // Range queries come back ordered by the queried field.
    let mut hits: Vec<(&str, &String, &Entry)> = docs
      .iter()
      .filter_map(|(id, e)| {
        let value = string_at(&e.doc, field)?;
        (value >= lo && value <= hi).then_some((value, id, e))
      })
      .collect();
    hits.sort_by(|a, b| a.0.cmp(b.0).then_with(|| a.1.cmp(b.1)));

    Ok(
      hits
        .into_iter()
        .take(limit)
        .map(|(_, id, e)| (id.clone(), e.doc.clone()))
        .collect(),
    )
  }

  #[tracing::instrument(level = "trace", skip(self))]
  async fn where_equals(
    &self,
    collection: &str,
    field: &str,
    value: &Value,
    limit: usize,
  ) -> Result<Vec<(String, Document)>> {
    self
      .scan(collection, limit, |doc| lookup_path(doc, field) == Some(value))
      .await
  }

  #[tracing::instrument(level = "trace", skip(self))]
  async fn list(&self, collection: &str, limit: usize) -> Result<Vec<(String, Document)>> {
    self.scan(collection, limit, |_| true).await
  }
}

struct MemoryTransaction {
  state: Arc<RwLock<State>>,
  unavailable: Arc<AtomicBool>,
  reads: HashMap<(String, String), u64>,
  writes: Vec<WriteOp>,
}

#[async_trait]
impl Transaction for MemoryTransaction {
  async fn get(&mut self, collection: &str, id: &str) -> Result<Option<Document>> {
    if !self.writes.is_empty() {
      return Err(DbError::ReadAfterWrite(format!("{collection}/{id}")));
    }
    MemoryStore::ensure_available(&self.unavailable)?;
    // Give concurrent writers a chance to interleave between reads and commit.
    tokio::task::yield_now().await;

    let state = self.state.read().await;
    let version = state.version_of(collection, id);
    self
      .reads
      .entry((collection.to_string(), id.to_string()))
      .or_insert(version);
    Ok(state.doc_of(collection, id).cloned())
  }

  fn set(&mut self, collection: &str, id: &str, fields: Document, mode: SetMode) {
    self.writes.push(WriteOp::set(collection, id, fields, mode));
  }

  fn delete(&mut self, collection: &str, id: &str) {
    self.writes.push(WriteOp::delete(collection, id));
  }

  async fn commit(&mut self) -> Result<()> {
    MemoryStore::ensure_available(&self.unavailable)?;
    let mut state = self.state.write().await;

    for ((collection, id), seen) in &self.reads {
      if state.version_of(collection, id) != *seen {
        debug!(collection = %collection, id = %id, "Read set changed before commit");
        return Err(DbError::Conflict(format!("{collection}/{id}")));
      }
    }

    let writes = std::mem::take(&mut self.writes);
    state.apply(writes)
  }
}
