//! Identity-guarded cache of the signed-in actor's own profile.
//!
//! The cache holds at most one owner at a time. A read only hits when the
//! slot's owner is the actor asking, so switching accounts can never surface
//! the previous actor's profile. It is an accelerator only: graph and
//! discovery reads go straight to the store.

use std::sync::Arc;

use moka::sync::Cache;

use crate::domain::{actor::ActorId, profile::UserProfile};

/// Owner and profile share one entry, so a write replaces both at once.
type Slot = (ActorId, Arc<UserProfile>);

#[derive(Clone)]
pub struct ProfileCache {
  slot: Cache<(), Slot>,
}

impl Default for ProfileCache {
  fn default() -> Self {
    Self::new()
  }
}

impl ProfileCache {
  pub fn new() -> Self {
    Self {
      slot: Cache::builder().max_capacity(1).build(),
    }
  }

  /// Cached profile, only if owned by `current`.
  pub fn read(&self, current: &ActorId) -> Option<Arc<UserProfile>> {
    self
      .slot
      .get(&())
      .and_then(|(owner, profile)| (owner == *current).then_some(profile))
  }

  /// Replace the slot wholesale.
  pub fn write(&self, owner: ActorId, profile: UserProfile) {
    self.slot.insert((), (owner, Arc::new(profile)));
  }

  pub fn invalidate(&self) {
    self.slot.invalidate(&());
  }
}
