use std::collections::HashSet;

use tracing::debug;

use super::ranking::{matches_filter, rank};
use crate::{
  db::{Document, USERS},
  domain::{
    actor::ActorId,
    profile::{UserProfile, fields},
    relationship::SearchFilter,
  },
  service::{
    context::ServiceContext,
    profile::load_profile,
    util::{ServiceError, best_effort},
  },
};

/// Upper bound of a prefix range: sorts after every string starting with the prefix.
const PREFIX_SENTINEL: char = '\u{f8ff}';

/// Find profiles whose handle starts with `query` or whose display name
/// contains it.
///
/// Returns nothing for a blank query or when nobody is signed in. Store
/// failures degrade to an empty result.
pub async fn search(ctx: &ServiceContext<'_>, query: &str, filter: SearchFilter, limit: usize) -> Vec<UserProfile> {
  let query = query.trim().to_lowercase();
  let Some(actor) = ctx.actor() else {
    return Vec::new();
  };
  if query.is_empty() || limit == 0 {
    return Vec::new();
  }

  best_effort("search", run_search(ctx, &actor, &query, filter, limit)).await
}

async fn run_search(
  ctx: &ServiceContext<'_>,
  actor: &ActorId,
  query: &str,
  filter: SearchFilter,
  limit: usize,
) -> Result<Vec<UserProfile>, ServiceError> {
  let me = load_profile(ctx.store, actor)
    .await?
    .unwrap_or_else(|| UserProfile::minimal(actor.clone()));

  let upper = format!("{query}{PREFIX_SENTINEL}");
  let (by_handle, scanned) = futures::try_join!(
    ctx.store.where_between(USERS, fields::USERNAME, query, &upper, limit),
    ctx.store.list(USERS, ctx.config.discovery.display_name_scan_cap),
  )?;

  let by_name = scanned.into_iter().filter(|(_, doc)| display_name_contains(doc, query));

  let mut seen = HashSet::new();
  let mut results: Vec<UserProfile> = by_handle
    .into_iter()
    .chain(by_name)
    .map(|(id, doc)| UserProfile::from_document(&ActorId::from(id), doc))
    .filter(|p| &p.uid != actor && seen.insert(p.uid.clone()))
    .filter(|p| matches_filter(filter, &me, p))
    .collect();

  rank(&me, &mut results);
  results.truncate(limit);

  debug!(actor = %actor, query, filter = %filter, results = results.len(), "Search complete");
  Ok(results)
}

fn display_name_contains(doc: &Document, needle: &str) -> bool {
  crate::db::string_at(doc, fields::DISPLAY_NAME).is_some_and(|name| name.to_lowercase().contains(needle))
}
