//! Shared test helpers for service-level integration tests.

use std::sync::Arc;

use serde_json::{Value, json};

use crate::{
  Client,
  cache::ProfileCache,
  config::Config,
  db::{DocumentStore, MemoryStore, SetMode, USERNAMES, USERS},
  domain::{actor::ActorId, profile::UserProfile, username::Reservation},
  identity::Session,
  service::ServiceContext,
  storage::MemoryObjectStorage,
};

/// Test context over an in-memory store with a switchable signed-in actor.
pub struct TestContext {
  pub store: MemoryStore,
  pub session: Session,
  pub cache: ProfileCache,
  pub storage: MemoryObjectStorage,
  pub config: Config,
}

impl TestContext {
  pub fn new() -> Self {
    Self::with_config(Config::default())
  }

  pub fn with_config(config: Config) -> Self {
    Self {
      store: MemoryStore::new(),
      session: Session::anonymous(),
      cache: ProfileCache::new(),
      storage: MemoryObjectStorage::default(),
      config,
    }
  }

  pub fn ctx(&self) -> ServiceContext<'_> {
    ServiceContext::new(&self.store, &self.session, &self.cache, &self.storage, &self.config)
  }

  /// Act as `uid` for subsequent calls.
  pub fn sign_in(&self, uid: &str) -> &Self {
    self.session.sign_in(uid, None);
    self
  }

  /// Independent client for `uid` sharing this context's store.
  pub fn client_for(&self, uid: &str) -> Client {
    Client::in_memory(
      self.store.clone(),
      Arc::new(Session::signed_in(uid, None)),
      self.config.clone(),
    )
  }

  /// Create a profile document with the given extra fields.
  pub async fn seed_profile(&self, uid: &str, fields: Value) {
    let mut doc = json!({ "uid": uid, "username": "", "displayName": uid });
    if let (Some(base), Value::Object(extra)) = (doc.as_object_mut(), fields) {
      base.extend(extra);
    }
    let Value::Object(doc) = doc else { unreachable!() };
    self
      .store
      .set(USERS, uid, doc, SetMode::Overwrite)
      .await
      .expect("seed profile");
  }

  /// Profile as stored, bypassing every cache.
  pub async fn stored_profile(&self, uid: &str) -> UserProfile {
    self
      .stored_profile_opt(uid)
      .await
      .unwrap_or_else(|| panic!("profile {uid} missing"))
  }

  pub async fn stored_profile_opt(&self, uid: &str) -> Option<UserProfile> {
    self
      .store
      .get(USERS, uid)
      .await
      .expect("read profile")
      .map(|doc| UserProfile::from_document(&id(uid), doc))
  }

  pub async fn reservation(&self, handle: &str) -> Option<Reservation> {
    self
      .store
      .get(USERNAMES, handle)
      .await
      .expect("read reservation")
      .map(|doc| Reservation::from_document(doc).expect("reservation shape"))
  }
}

pub fn id(uid: &str) -> ActorId {
  ActorId::from(uid)
}

/// Ids of `profiles`, in order.
pub fn uids(profiles: &[UserProfile]) -> Vec<&str> {
  profiles.iter().map(|p| p.uid.as_str()).collect()
}
