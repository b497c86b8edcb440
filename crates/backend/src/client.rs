use std::sync::Arc;

use crate::{
  cache::ProfileCache,
  config::Config,
  db::{DocumentStore, MemoryStore},
  identity::IdentityProvider,
  service::ServiceContext,
  storage::{MemoryObjectStorage, ObjectStorage},
};

/// Owns the long-lived collaborators and hands out service contexts.
///
/// The profile cache lives here, one per client, rather than in a global.
#[derive(Clone)]
pub struct Client {
  store: Arc<dyn DocumentStore>,
  identity: Arc<dyn IdentityProvider>,
  storage: Arc<dyn ObjectStorage>,
  cache: ProfileCache,
  config: Arc<Config>,
}

impl Client {
  pub fn new(
    store: Arc<dyn DocumentStore>,
    identity: Arc<dyn IdentityProvider>,
    storage: Arc<dyn ObjectStorage>,
    config: Arc<Config>,
  ) -> Self {
    Self {
      store,
      identity,
      storage,
      cache: ProfileCache::new(),
      config,
    }
  }

  /// Client over in-process store and object storage.
  pub fn in_memory(store: MemoryStore, identity: Arc<dyn IdentityProvider>, config: Config) -> Self {
    Self::new(
      Arc::new(store),
      identity,
      Arc::new(MemoryObjectStorage::default()),
      Arc::new(config),
    )
  }

  pub fn context(&self) -> ServiceContext<'_> {
    ServiceContext::new(
      self.store.as_ref(),
      self.identity.as_ref(),
      &self.cache,
      self.storage.as_ref(),
      &self.config,
    )
  }

  pub fn cache(&self) -> &ProfileCache {
    &self.cache
  }

  pub fn config(&self) -> &Config {
    &self.config
  }
}
