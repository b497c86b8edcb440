use serde::{Deserialize, Serialize};

use super::actor::ActorId;
use crate::db::{DbError, Document};

/// Reservation document in the `usernames` collection, keyed by the
/// normalized handle itself so that inserting it doubles as the uniqueness check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
  pub uid: ActorId,
  /// Epoch millis.
  #[serde(default)]
  pub created_at: i64,
}

impl Reservation {
  pub fn new(uid: ActorId, created_at: i64) -> Self {
    Self { uid, created_at }
  }

  pub fn is_owned_by(&self, actor: &ActorId) -> bool {
    &self.uid == actor
  }

  pub fn from_document(doc: Document) -> Result<Self, DbError> {
    Ok(serde_json::from_value(serde_json::Value::Object(doc))?)
  }

  pub fn to_document(&self) -> Document {
    let mut doc = Document::new();
    doc.insert("uid".to_string(), self.uid.as_str().into());
    doc.insert("createdAt".to_string(), self.created_at.into());
    doc
  }
}
