use tracing::debug;

use crate::{
  db::USERS,
  domain::{actor::ActorId, profile::UserProfile, relationship::RelationshipStatus},
  service::{context::ServiceContext, util::ServiceError},
};

/// How the actor relates to `target`.
///
/// Reads the actor's own profile from the store, never the cache. Asking
/// about oneself yields the fixed self status without any read. A missing own
/// profile yields all flags false.
pub async fn relationship_status(ctx: &ServiceContext<'_>, target: &ActorId) -> Result<RelationshipStatus, ServiceError> {
  let actor = ctx.require_actor()?;
  if &actor == target {
    return Ok(RelationshipStatus::self_status());
  }

  let Some(doc) = ctx.store.get(USERS, actor.as_str()).await? else {
    debug!(actor = %actor, "No profile for actor, reporting no relationship");
    return Ok(RelationshipStatus::default());
  };
  let me = UserProfile::from_document(&actor, doc);

  Ok(RelationshipStatus {
    is_self: false,
    is_following: me.following.contains(target),
    is_follower: me.followers.contains(target),
    is_connected: me.connections.contains(target),
    request_sent: me.pending_connections_sent.contains(target),
    request_received: me.pending_connections_received.contains(target),
  })
}
