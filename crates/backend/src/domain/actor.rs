use serde::{Deserialize, Serialize};

/// Opaque, stable identifier issued by the identity provider.
///
/// Profiles are keyed by this id in the `users` collection and every
/// relationship set stores peers by it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(String);

impl ActorId {
  pub fn new(id: impl Into<String>) -> Self {
    ActorId(id.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Blank ids never identify an actor.
  pub fn is_blank(&self) -> bool {
    self.0.trim().is_empty()
  }
}

impl std::fmt::Display for ActorId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl From<&str> for ActorId {
  fn from(id: &str) -> Self {
    ActorId(id.to_string())
  }
}

impl From<String> for ActorId {
  fn from(id: String) -> Self {
    ActorId(id)
  }
}

impl AsRef<str> for ActorId {
  fn as_ref(&self) -> &str {
    &self.0
  }
}
