use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Profiles keyed by actor id.
pub const USERS: &str = "users";
/// Username reservations keyed by normalized handle.
pub const USERNAMES: &str = "usernames";
/// Admin-managed configuration documents.
pub const CONFIG: &str = "config";

/// A stored document: top-level field name to JSON value.
pub type Document = serde_json::Map<String, Value>;

#[derive(Error, Debug)]
pub enum DbError {
  #[error("Not found: {0}")]
  NotFound(String),
  /// A document read inside a transaction changed before commit.
  #[error("Transaction conflict on {0}")]
  Conflict(String),
  /// Transactions must issue every read before their first write.
  #[error("Read of {0} issued after a write in the same transaction")]
  ReadAfterWrite(String),
  #[error("Store unavailable: {0}")]
  Unavailable(String),
  #[error("Serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
  #[error("Invalid input: {0}")]
  InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, DbError>;

/// How a `set` combines with an existing document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SetMode {
  /// Replace the whole document.
  #[default]
  Overwrite,
  /// Replace only the given top-level fields, keeping the rest.
  Merge,
}

/// Server-side array transform applied to one field of an existing document.
///
/// Both transforms are commutative set algebra on the stored array, so
/// concurrent writers never clobber each other's unrelated elements.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldTransform {
  /// Append each value not already present.
  ArrayUnion(Vec<Value>),
  /// Remove every occurrence of each value.
  ArrayRemove(Vec<Value>),
}

/// One write inside an atomic batch.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
  Set {
    collection: String,
    id: String,
    fields: Document,
    mode: SetMode,
  },
  /// Field transform on an existing document. Fails the batch with
  /// [`DbError::NotFound`] when the document does not exist.
  Update {
    collection: String,
    id: String,
    field: String,
    transform: FieldTransform,
  },
  Delete {
    collection: String,
    id: String,
  },
}

impl WriteOp {
  pub fn array_union(collection: &str, id: &str, field: &str, value: impl Into<Value>) -> Self {
    WriteOp::Update {
      collection: collection.to_string(),
      id: id.to_string(),
      field: field.to_string(),
      transform: FieldTransform::ArrayUnion(vec![value.into()]),
    }
  }

  pub fn array_remove(collection: &str, id: &str, field: &str, value: impl Into<Value>) -> Self {
    WriteOp::Update {
      collection: collection.to_string(),
      id: id.to_string(),
      field: field.to_string(),
      transform: FieldTransform::ArrayRemove(vec![value.into()]),
    }
  }

  pub fn set(collection: &str, id: &str, fields: Document, mode: SetMode) -> Self {
    WriteOp::Set {
      collection: collection.to_string(),
      id: id.to_string(),
      fields,
      mode,
    }
  }

  pub fn delete(collection: &str, id: &str) -> Self {
    WriteOp::Delete {
      collection: collection.to_string(),
      id: id.to_string(),
    }
  }

  pub fn target(&self) -> (&str, &str) {
    match self {
      WriteOp::Set { collection, id, .. } | WriteOp::Update { collection, id, .. } | WriteOp::Delete { collection, id } => {
        (collection.as_str(), id.as_str())
      }
    }
  }
}

/// Document database contract.
///
/// Query results come back in provider-defined order; callers must not rely
/// on it. Field names in queries may be dotted paths into nested maps.
#[async_trait]
pub trait DocumentStore: Send + Sync {
  async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>>;

  async fn set(&self, collection: &str, id: &str, fields: Document, mode: SetMode) -> Result<()>;

  /// Deleting an absent document succeeds.
  async fn delete(&self, collection: &str, id: &str) -> Result<()>;

  /// Commit every op or none of them. Ops carry no read dependency.
  async fn run_batch(&self, ops: Vec<WriteOp>) -> Result<()>;

  /// Start a transaction; see [`Transaction`].
  async fn begin(&self) -> Result<Box<dyn Transaction>>;

  /// Documents whose string `field` lies in `[lo, hi]`, at most `limit`.
  async fn where_between(
    &self,
    collection: &str,
    field: &str,
    lo: &str,
    hi: &str,
    limit: usize,
  ) -> Result<Vec<(String, Document)>>;

  /// Documents whose `field` equals `value`, at most `limit`.
  async fn where_equals(
    &self,
    collection: &str,
    field: &str,
    value: &Value,
    limit: usize,
  ) -> Result<Vec<(String, Document)>>;

  /// Bounded scan of a collection, at most `limit` documents.
  async fn list(&self, collection: &str, limit: usize) -> Result<Vec<(String, Document)>>;
}

/// Optimistic transaction handle.
///
/// Reads are snapshot-consistent and recorded; writes are buffered and applied
/// atomically by [`Transaction::commit`], which fails with
/// [`DbError::Conflict`] if any document read here changed in the meantime.
/// Every read must precede the first buffered write.
#[async_trait]
pub trait Transaction: Send {
  async fn get(&mut self, collection: &str, id: &str) -> Result<Option<Document>>;

  fn set(&mut self, collection: &str, id: &str, fields: Document, mode: SetMode);

  fn delete(&mut self, collection: &str, id: &str);

  async fn commit(&mut self) -> Result<()>;
}
