use std::collections::HashSet;

use rand::seq::SliceRandom;
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
  db::{Document, USERS},
  domain::{
    actor::ActorId,
    profile::{UserProfile, fields},
  },
  service::{context::ServiceContext, profile::load_profile},
};

/// People the actor may want to connect with.
///
/// Same-department profiles first, then same-batch profiles, then (when
/// `include_random`) a few random profiles from a different department or
/// batch. Existing connections, pending requests in either direction and the
/// actor are never suggested. A store failure returns what was collected
/// before it.
pub async fn suggestions(ctx: &ServiceContext<'_>, limit: usize, include_random: bool) -> Vec<UserProfile> {
  let Some(actor) = ctx.actor() else {
    return Vec::new();
  };
  if limit == 0 {
    return Vec::new();
  }

  let me = match load_profile(ctx.store, &actor).await {
    Ok(profile) => profile.unwrap_or_else(|| UserProfile::minimal(actor.clone())),
    Err(e) => {
      warn!(operation = "suggestions", err = %e, "Could not read own profile");
      return Vec::new();
    }
  };

  let mut picker = Picker::new(&me, limit);
  let department = me.affiliation.department.trim();
  let batch = me.affiliation.batch.trim();

  if !department.is_empty() {
    match ctx
      .store
      .where_equals(USERS, fields::DEPARTMENT, &Value::from(department), limit)
      .await
    {
      Ok(docs) => picker.extend(docs),
      Err(e) => return picker.degrade("department", e),
    }
  }

  if !picker.is_full() && !batch.is_empty() {
    match ctx
      .store
      .where_equals(USERS, fields::BATCH, &Value::from(batch), limit)
      .await
    {
      Ok(docs) => picker.extend(docs),
      Err(e) => return picker.degrade("batch", e),
    }
  }

  if include_random && !picker.is_full() {
    let discovery = &ctx.config.discovery;
    match ctx.store.list(USERS, discovery.random_pool_cap).await {
      Ok(docs) => picker.extend_random(docs, discovery.random_pick),
      Err(e) => return picker.degrade("random", e),
    }
  }

  debug!(actor = %actor, count = picker.picked.len(), "Suggestions complete");
  picker.finish()
}

/// Accumulates suggestions while tracking who must not appear.
struct Picker<'a> {
  me: &'a UserProfile,
  limit: usize,
  excluded: HashSet<ActorId>,
  picked: Vec<UserProfile>,
}

impl<'a> Picker<'a> {
  fn new(me: &'a UserProfile, limit: usize) -> Self {
    let excluded = me
      .connections
      .iter()
      .chain(&me.pending_connections_sent)
      .chain(&me.pending_connections_received)
      .chain(std::iter::once(&me.uid))
      .cloned()
      .collect();
    Self {
      me,
      limit,
      excluded,
      picked: Vec::new(),
    }
  }

  fn is_full(&self) -> bool {
    self.picked.len() >= self.limit
  }

  fn extend(&mut self, docs: Vec<(String, Document)>) {
    for profile in self.eligible(docs) {
      self.excluded.insert(profile.uid.clone());
      self.picked.push(profile);
    }
  }

  fn extend_random(&mut self, docs: Vec<(String, Document)>, pick: usize) {
    let mut pool: Vec<UserProfile> = self
      .eligible(docs)
      .into_iter()
      .filter(|p| {
        p.affiliation.department != self.me.affiliation.department || p.affiliation.batch != self.me.affiliation.batch
      })
      .collect();
    pool.shuffle(&mut rand::thread_rng());

    let room = self.limit.saturating_sub(self.picked.len());
    for profile in pool.into_iter().take(pick.min(room)) {
      self.excluded.insert(profile.uid.clone());
      self.picked.push(profile);
    }
  }

  /// Profiles in `docs` not yet excluded, deduplicated among themselves.
  fn eligible(&self, docs: Vec<(String, Document)>) -> Vec<UserProfile> {
    let mut seen = HashSet::new();
    docs
      .into_iter()
      .map(|(id, doc)| UserProfile::from_document(&ActorId::from(id), doc))
      .filter(|p| !self.excluded.contains(&p.uid) && seen.insert(p.uid.clone()))
      .collect()
  }

  fn degrade(self, step: &'static str, err: impl std::fmt::Display) -> Vec<UserProfile> {
    warn!(operation = "suggestions", step, err = %err, kept = self.picked.len(), "Suggestion query failed, returning partial result");
    self.finish()
  }

  fn finish(mut self) -> Vec<UserProfile> {
    self.picked.truncate(self.limit);
    self.picked
  }
}
