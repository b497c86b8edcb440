//! Relationship graph engine.
//!
//! Every edge mutation is a single atomic batch of array transforms on the two
//! profiles involved. Set-union and set-difference commute, so concurrent
//! toggles on the same pair never clobber unrelated edges and no read is
//! needed first. Concurrent follow/unfollow of the same pair resolves to
//! whichever batch reaches the store last.
//!
//! Cancelling a caller stops the wait, not the effect: a batch already handed
//! to the store may still land.
//!
//! ## Available Operations
//!
//! - [`follow`] / [`unfollow`] - asymmetric edges, no acceptance
//! - [`send_connection_request`], [`accept_connection_request`],
//!   [`reject_connection_request`], [`cancel_connection_request`],
//!   [`remove_connection`] - acceptance-gated symmetric edges
//! - [`relationship_status`] - six-flag view derived from one profile read

mod connection;
mod status;

use tracing::{debug, info, warn};

pub use self::{
  connection::{
    accept_connection_request, cancel_connection_request, reject_connection_request, remove_connection,
    send_connection_request,
  },
  status::relationship_status,
};
use super::{context::ServiceContext, util::ServiceError};
use crate::{
  db::{USERS, WriteOp},
  domain::{actor::ActorId, profile::fields},
};

/// Follow `target`. Idempotent.
pub async fn follow(ctx: &ServiceContext<'_>, target: &ActorId) -> Result<(), ServiceError> {
  let actor = ctx.require_actor()?;
  reject_self(&actor, target)?;

  apply_edges(
    ctx,
    "follow",
    &actor,
    target,
    vec![
      WriteOp::array_union(USERS, target.as_str(), fields::FOLLOWERS, actor.as_str()),
      WriteOp::array_union(USERS, actor.as_str(), fields::FOLLOWING, target.as_str()),
    ],
  )
  .await
}

/// Stop following `target`. Idempotent.
pub async fn unfollow(ctx: &ServiceContext<'_>, target: &ActorId) -> Result<(), ServiceError> {
  let actor = ctx.require_actor()?;
  require_target(target)?;

  apply_edges(
    ctx,
    "unfollow",
    &actor,
    target,
    vec![
      WriteOp::array_remove(USERS, target.as_str(), fields::FOLLOWERS, actor.as_str()),
      WriteOp::array_remove(USERS, actor.as_str(), fields::FOLLOWING, target.as_str()),
    ],
  )
  .await
}

fn require_target(target: &ActorId) -> Result<(), ServiceError> {
  if target.is_blank() {
    return Err(ServiceError::validation("target actor id is empty"));
  }
  Ok(())
}

fn reject_self(actor: &ActorId, target: &ActorId) -> Result<(), ServiceError> {
  require_target(target)?;
  if actor == target {
    return Err(ServiceError::SelfOperation);
  }
  Ok(())
}

/// Commit one edge batch and drop the cached self-profile on success.
async fn apply_edges(
  ctx: &ServiceContext<'_>,
  operation: &'static str,
  actor: &ActorId,
  peer: &ActorId,
  ops: Vec<WriteOp>,
) -> Result<(), ServiceError> {
  debug!(operation, actor = %actor, peer = %peer, ops = ops.len(), "Applying relationship batch");

  match ctx.store.run_batch(ops).await {
    Ok(()) => {
      ctx.cache.invalidate();
      info!(operation, actor = %actor, peer = %peer, "Relationship updated");
      Ok(())
    }
    Err(e) => {
      warn!(operation, actor = %actor, peer = %peer, err = %e, "Relationship batch failed");
      Err(e.into())
    }
  }
}
