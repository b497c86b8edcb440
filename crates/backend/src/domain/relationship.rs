use serde::{Deserialize, Serialize};

/// Relationship between the acting actor and a target, derived from one read
/// of the actor's own profile. Never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipStatus {
  pub is_self: bool,
  pub is_following: bool,
  pub is_follower: bool,
  pub is_connected: bool,
  pub request_sent: bool,
  pub request_received: bool,
}

impl RelationshipStatus {
  /// Fixed status reported when the target is the actor.
  pub fn self_status() -> Self {
    Self {
      is_self: true,
      ..Default::default()
    }
  }
}

/// Predicate applied to merged search results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchFilter {
  #[default]
  All,
  /// Only profiles the actor is connected to.
  Connections,
  /// Only profiles sharing the actor's department.
  Department,
  /// Only profiles sharing the actor's batch.
  Batch,
  /// Only profiles with at least one connection in common with the actor.
  MutualConnections,
  /// Only profiles sharing at least one skill (case-insensitive).
  Skills,
}

impl SearchFilter {
  pub fn as_str(&self) -> &'static str {
    match self {
      SearchFilter::All => "all",
      SearchFilter::Connections => "connections",
      SearchFilter::Department => "department",
      SearchFilter::Batch => "batch",
      SearchFilter::MutualConnections => "mutual_connections",
      SearchFilter::Skills => "skills",
    }
  }
}

impl std::str::FromStr for SearchFilter {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "all" => Ok(SearchFilter::All),
      "connections" => Ok(SearchFilter::Connections),
      "department" | "dept" => Ok(SearchFilter::Department),
      "batch" => Ok(SearchFilter::Batch),
      "mutual_connections" | "mutual-connections" | "mutual" => Ok(SearchFilter::MutualConnections),
      "skills" => Ok(SearchFilter::Skills),
      other => Err(format!("Unknown search filter: {}", other)),
    }
  }
}

impl std::fmt::Display for SearchFilter {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}
