use chrono::Utc;

use super::util::ServiceError;
use crate::{
  cache::ProfileCache, config::Config, db::DocumentStore, domain::actor::ActorId, identity::IdentityProvider,
  storage::ObjectStorage,
};

/// Dependencies shared by every service operation.
///
/// Borrowed from a [`crate::Client`] (or assembled directly in tests); the
/// services themselves are stateless free functions over this context.
#[derive(Clone, Copy)]
pub struct ServiceContext<'a> {
  pub store: &'a dyn DocumentStore,
  pub identity: &'a dyn IdentityProvider,
  pub cache: &'a ProfileCache,
  pub storage: &'a dyn ObjectStorage,
  pub config: &'a Config,
}

impl<'a> ServiceContext<'a> {
  pub fn new(
    store: &'a dyn DocumentStore,
    identity: &'a dyn IdentityProvider,
    cache: &'a ProfileCache,
    storage: &'a dyn ObjectStorage,
    config: &'a Config,
  ) -> Self {
    Self {
      store,
      identity,
      cache,
      storage,
      config,
    }
  }

  /// Current actor, if one is signed in.
  pub fn actor(&self) -> Option<ActorId> {
    self.identity.current_actor_id().filter(|id| !id.is_blank())
  }

  pub fn require_actor(&self) -> Result<ActorId, ServiceError> {
    self.actor().ok_or(ServiceError::NotAuthenticated)
  }

  /// Wall clock in epoch millis.
  pub fn now_millis(&self) -> i64 {
    Utc::now().timestamp_millis()
  }
}
