//! User profile document model.
//!
//! One document per actor in the `users` collection, stored in camelCase.
//! Relationship fields are sets of actor ids: the store keeps them as arrays
//! and duplicates collapse when a document is read back.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::actor::ActorId;
use crate::db::Document;

/// Document field names shared by the services that write profiles.
pub mod fields {
  pub const UID: &str = "uid";
  pub const USERNAME: &str = "username";
  pub const USERNAME_UPDATED_AT: &str = "usernameUpdatedAt";
  pub const UPDATED_AT: &str = "updatedAt";
  pub const DISPLAY_NAME: &str = "displayName";
  pub const DEPARTMENT: &str = "affiliation.department";
  pub const BATCH: &str = "affiliation.batch";

  pub const FOLLOWING: &str = "following";
  pub const FOLLOWERS: &str = "followers";
  pub const CONNECTIONS: &str = "connections";
  pub const PENDING_SENT: &str = "pendingConnectionsSent";
  pub const PENDING_RECEIVED: &str = "pendingConnectionsReceived";

  /// Fields owned by the relationship graph engine.
  pub const RELATIONSHIP_FIELDS: &[&str] = &[FOLLOWING, FOLLOWERS, CONNECTIONS, PENDING_SENT, PENDING_RECEIVED];

  /// Fields owned by the username registry.
  pub const HANDLE_FIELDS: &[&str] = &[USERNAME, USERNAME_UPDATED_AT];
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserProfile {
  pub uid: ActorId,
  /// Normalized handle, empty when none has been reserved yet.
  pub username: String,
  pub display_name: String,
  pub about: Option<String>,
  pub profile_pic_url: Option<String>,
  pub background_pic_url: Option<String>,
  /// Epoch millis of the last handle change.
  pub username_updated_at: i64,
  /// Epoch millis of the last profile edit.
  pub updated_at: i64,

  pub affiliation: Affiliation,

  pub skills: Vec<String>,
  pub resume_url: Option<String>,
  pub projects: Vec<Project>,
  pub achievements: Vec<Achievement>,
  pub social_links: SocialLinks,

  pub points: i64,
  pub badges: Vec<String>,

  // Follow edges need no acceptance.
  pub following: BTreeSet<ActorId>,
  pub followers: BTreeSet<ActorId>,

  // Connections are mutual and acceptance-gated.
  pub connections: BTreeSet<ActorId>,
  pub pending_connections_sent: BTreeSet<ActorId>,
  pub pending_connections_received: BTreeSet<ActorId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Affiliation {
  pub department: String,
  /// Cohort identifier, e.g. the graduation year.
  pub batch: String,
  pub enrollment_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Project {
  pub title: String,
  pub description: String,
  pub tech_stack: Vec<String>,
  pub link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Achievement {
  pub title: String,
  pub date: String,
  pub issuer: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SocialLinks {
  pub linked_in: Option<String>,
  pub github: Option<String>,
  pub instagram: Option<String>,
  pub mail: Option<String>,
  pub discord: Option<String>,
  pub reddit: Option<String>,
  pub website: Option<String>,
}

impl UserProfile {
  /// Minimal profile bound to an actor id, used when a stored document
  /// cannot be mapped or does not exist yet.
  pub fn minimal(uid: ActorId) -> Self {
    Self {
      uid,
      ..Default::default()
    }
  }

  /// Map a stored document to a profile.
  ///
  /// Schema drift never fails the read: a document that does not match the
  /// expected shape yields [`UserProfile::minimal`] for `uid`. The document id
  /// wins over a missing or blank `uid` field.
  pub fn from_document(uid: &ActorId, doc: Document) -> Self {
    match serde_json::from_value::<UserProfile>(serde_json::Value::Object(doc)) {
      Ok(mut profile) => {
        if profile.uid.is_blank() {
          profile.uid = uid.clone();
        }
        profile
      }
      Err(e) => {
        warn!(uid = %uid, err = %e, "Profile document did not match schema, using minimal profile");
        Self::minimal(uid.clone())
      }
    }
  }

  /// Full document representation.
  pub fn to_document(&self) -> Document {
    match serde_json::to_value(self) {
      Ok(serde_json::Value::Object(map)) => map,
      _ => Document::new(),
    }
  }

  /// Document containing only the fields the profile-edit surface owns.
  ///
  /// Relationship sets and the handle are stripped so a merge write of an
  /// edited profile cannot overwrite concurrent graph or registry writes.
  pub fn editable_document(&self) -> Document {
    let mut doc = self.to_document();
    for field in fields::RELATIONSHIP_FIELDS.iter().chain(fields::HANDLE_FIELDS) {
      doc.remove(*field);
    }
    doc
  }

  /// Case-insensitive skill set.
  pub fn skill_set(&self) -> BTreeSet<String> {
    self.skills.iter().map(|s| s.trim().to_lowercase()).collect()
  }
}
