use std::collections::BTreeSet;

use futures::future::join_all;
use tracing::debug;

use crate::{
  domain::{actor::ActorId, profile::UserProfile},
  service::{
    context::ServiceContext,
    profile::load_profile,
    util::{ServiceError, best_effort},
  },
};

/// Which id set of a profile to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
  PendingReceived,
  Connections,
  Followers,
  Following,
}

impl Edge {
  fn ids(self, profile: UserProfile) -> BTreeSet<ActorId> {
    match self {
      Edge::PendingReceived => profile.pending_connections_received,
      Edge::Connections => profile.connections,
      Edge::Followers => profile.followers,
      Edge::Following => profile.following,
    }
  }
}

/// Profiles that sent the actor a connection request.
pub async fn pending_requests(ctx: &ServiceContext<'_>) -> Vec<UserProfile> {
  list_edge(ctx, None, Edge::PendingReceived).await
}

/// Connections of `user`, or of the actor when `None`.
pub async fn connections(ctx: &ServiceContext<'_>, user: Option<&ActorId>) -> Vec<UserProfile> {
  list_edge(ctx, user, Edge::Connections).await
}

/// Followers of `user`, or of the actor when `None`.
pub async fn followers(ctx: &ServiceContext<'_>, user: Option<&ActorId>) -> Vec<UserProfile> {
  list_edge(ctx, user, Edge::Followers).await
}

/// Profiles `user` follows, or the actor follows when `None`.
pub async fn following(ctx: &ServiceContext<'_>, user: Option<&ActorId>) -> Vec<UserProfile> {
  list_edge(ctx, user, Edge::Following).await
}

async fn list_edge(ctx: &ServiceContext<'_>, user: Option<&ActorId>, edge: Edge) -> Vec<UserProfile> {
  let owner = match user.filter(|u| !u.is_blank()) {
    Some(user) => user.clone(),
    None => match ctx.actor() {
      Some(actor) => actor,
      None => return Vec::new(),
    },
  };
  best_effort("network", resolve_edge(ctx, owner, edge)).await
}

async fn resolve_edge(ctx: &ServiceContext<'_>, owner: ActorId, edge: Edge) -> Result<Vec<UserProfile>, ServiceError> {
  let Some(profile) = load_profile(ctx.store, &owner).await? else {
    return Ok(Vec::new());
  };
  let ids = edge.ids(profile);

  // A peer whose profile fails to load is skipped, not fatal.
  let loaded = join_all(ids.iter().map(|id| load_profile(ctx.store, id))).await;
  let profiles: Vec<UserProfile> = loaded.into_iter().filter_map(|r| r.ok().flatten()).collect();

  debug!(owner = %owner, edge = ?edge, ids = ids.len(), resolved = profiles.len(), "Resolved network listing");
  Ok(profiles)
}
