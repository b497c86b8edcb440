//! Current-actor abstraction.
//!
//! Authentication itself happens elsewhere; services only ask who is acting.

use std::sync::RwLock;

use crate::domain::actor::ActorId;

/// Upstream identity snapshot used to seed a fresh profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActorSnapshot {
  pub display_name: Option<String>,
  pub photo_url: Option<String>,
}

pub trait IdentityProvider: Send + Sync {
  /// `None` when nobody is signed in.
  fn current_actor_id(&self) -> Option<ActorId>;

  fn current_actor_email(&self) -> Option<String>;

  fn current_actor_snapshot(&self) -> ActorSnapshot {
    ActorSnapshot::default()
  }
}

#[derive(Debug, Clone, Default)]
struct Signed {
  id: Option<ActorId>,
  email: Option<String>,
  snapshot: ActorSnapshot,
}

/// In-process identity that can be signed in and out at runtime.
#[derive(Debug, Default)]
pub struct Session {
  inner: RwLock<Signed>,
}

impl Session {
  pub fn anonymous() -> Self {
    Self::default()
  }

  pub fn signed_in(id: impl Into<ActorId>, email: Option<&str>) -> Self {
    let session = Self::default();
    session.sign_in(id, email);
    session
  }

  pub fn sign_in(&self, id: impl Into<ActorId>, email: Option<&str>) {
    self.sign_in_with(id, email, ActorSnapshot::default());
  }

  pub fn sign_in_with(&self, id: impl Into<ActorId>, email: Option<&str>, snapshot: ActorSnapshot) {
    let id = id.into();
    let mut inner = match self.inner.write() {
      Ok(guard) => guard,
      Err(poisoned) => poisoned.into_inner(),
    };
    *inner = Signed {
      id: (!id.is_blank()).then_some(id),
      email: email.map(str::to_string),
      snapshot,
    };
  }

  pub fn sign_out(&self) {
    let mut inner = match self.inner.write() {
      Ok(guard) => guard,
      Err(poisoned) => poisoned.into_inner(),
    };
    *inner = Signed::default();
  }

  fn read(&self) -> Signed {
    match self.inner.read() {
      Ok(guard) => guard.clone(),
      Err(poisoned) => poisoned.into_inner().clone(),
    }
  }
}

impl IdentityProvider for Session {
  fn current_actor_id(&self) -> Option<ActorId> {
    self.read().id
  }

  fn current_actor_email(&self) -> Option<String> {
    self.read().email
  }

  fn current_actor_snapshot(&self) -> ActorSnapshot {
    self.read().snapshot
  }
}
