//! Unified error type for service operations.
//!
//! Graph, registry and profile operations surface every failure as a
//! [`ServiceError`]; callers render it through [`ServiceError::code`].

use crate::{db::DbError, storage::StorageError};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
  /// No actor is signed in.
  #[error("Not authenticated")]
  NotAuthenticated,
  /// The actor targeted itself where that is forbidden.
  #[error("Cannot perform this operation on yourself")]
  SelfOperation,
  #[error("Invalid username '{handle}': {reason}")]
  InvalidUsername { handle: String, reason: &'static str },
  /// The handle is reserved by someone else, or auto-assignment ran out of candidates.
  #[error("Username '{0}' is already taken")]
  UsernameTaken(String),
  /// Rename attempted inside the cooldown window.
  #[error("Username was changed too recently; try again in {remaining_days} day(s)")]
  UsernameCooldown { remaining_days: i64 },
  #[error("Permission denied: {0}")]
  PermissionDenied(String),
  /// Network or store failure.
  #[error("Backend unavailable: {0}")]
  BackendUnavailable(String),
  #[error("{item_type} not found: {id}")]
  NotFound { item_type: &'static str, id: String },
  /// Input validation outside the username grammar.
  #[error("Validation error: {0}")]
  Validation(String),
}

impl ServiceError {
  /// Stable code for UI rendering.
  pub fn code(&self) -> &'static str {
    match self {
      Self::NotAuthenticated => "NOT_AUTHENTICATED",
      Self::SelfOperation => "SELF_OPERATION",
      Self::InvalidUsername { .. } => "INVALID_USERNAME",
      Self::UsernameTaken(_) => "USERNAME_TAKEN",
      Self::UsernameCooldown { .. } => "USERNAME_COOLDOWN",
      Self::PermissionDenied(_) => "PERMISSION_DENIED",
      Self::BackendUnavailable(_) => "BACKEND_UNAVAILABLE",
      Self::NotFound { .. } => "NOT_FOUND",
      Self::Validation(_) => "VALIDATION",
    }
  }

  pub fn not_found(item_type: &'static str, id: impl Into<String>) -> Self {
    Self::NotFound {
      item_type,
      id: id.into(),
    }
  }

  pub fn validation(msg: impl Into<String>) -> Self {
    Self::Validation(msg.into())
  }

  pub fn invalid_username(handle: impl Into<String>, reason: &'static str) -> Self {
    Self::InvalidUsername {
      handle: handle.into(),
      reason,
    }
  }

  pub fn backend(msg: impl Into<String>) -> Self {
    Self::BackendUnavailable(msg.into())
  }
}

impl From<DbError> for ServiceError {
  fn from(e: DbError) -> Self {
    match e {
      DbError::NotFound(id) => Self::not_found("document", id),
      other => Self::backend(other.to_string()),
    }
  }
}

impl From<StorageError> for ServiceError {
  fn from(e: StorageError) -> Self {
    match e {
      StorageError::Rejected(msg) => Self::validation(msg),
      StorageError::Unavailable(msg) => Self::backend(msg),
    }
  }
}
