use super::{apply_edges, reject_self, require_target};
use crate::{
  db::{USERS, WriteOp},
  domain::{actor::ActorId, profile::fields},
  service::{context::ServiceContext, util::ServiceError},
};

/// Ask `target` to connect.
///
/// No check is made for an existing connection or a request already pending
/// in either direction; set-union absorbs repeats.
pub async fn send_connection_request(ctx: &ServiceContext<'_>, target: &ActorId) -> Result<(), ServiceError> {
  let actor = ctx.require_actor()?;
  reject_self(&actor, target)?;

  apply_edges(
    ctx,
    "send_connection_request",
    &actor,
    target,
    vec![
      WriteOp::array_union(USERS, actor.as_str(), fields::PENDING_SENT, target.as_str()),
      WriteOp::array_union(USERS, target.as_str(), fields::PENDING_RECEIVED, actor.as_str()),
    ],
  )
  .await
}

/// Accept a request from `requester`.
///
/// Does not verify that the request still exists: accepting a withdrawn
/// request still connects the pair, which keeps client retries idempotent.
pub async fn accept_connection_request(ctx: &ServiceContext<'_>, requester: &ActorId) -> Result<(), ServiceError> {
  let actor = ctx.require_actor()?;
  reject_self(&actor, requester)?;

  apply_edges(
    ctx,
    "accept_connection_request",
    &actor,
    requester,
    vec![
      WriteOp::array_remove(USERS, actor.as_str(), fields::PENDING_RECEIVED, requester.as_str()),
      WriteOp::array_remove(USERS, requester.as_str(), fields::PENDING_SENT, actor.as_str()),
      WriteOp::array_union(USERS, actor.as_str(), fields::CONNECTIONS, requester.as_str()),
      WriteOp::array_union(USERS, requester.as_str(), fields::CONNECTIONS, actor.as_str()),
    ],
  )
  .await
}

/// Decline a request from `requester`. No connection is created.
pub async fn reject_connection_request(ctx: &ServiceContext<'_>, requester: &ActorId) -> Result<(), ServiceError> {
  let actor = ctx.require_actor()?;
  require_target(requester)?;

  apply_edges(
    ctx,
    "reject_connection_request",
    &actor,
    requester,
    vec![
      WriteOp::array_remove(USERS, actor.as_str(), fields::PENDING_RECEIVED, requester.as_str()),
      WriteOp::array_remove(USERS, requester.as_str(), fields::PENDING_SENT, actor.as_str()),
    ],
  )
  .await
}

/// Withdraw a request the actor sent to `target`.
pub async fn cancel_connection_request(ctx: &ServiceContext<'_>, target: &ActorId) -> Result<(), ServiceError> {
  let actor = ctx.require_actor()?;
  require_target(target)?;

  apply_edges(
    ctx,
    "cancel_connection_request",
    &actor,
    target,
    vec![
      WriteOp::array_remove(USERS, actor.as_str(), fields::PENDING_SENT, target.as_str()),
      WriteOp::array_remove(USERS, target.as_str(), fields::PENDING_RECEIVED, actor.as_str()),
    ],
  )
  .await
}

pub async fn remove_connection(ctx: &ServiceContext<'_>, peer: &ActorId) -> Result<(), ServiceError> {
  let actor = ctx.require_actor()?;
  require_target(peer)?;

  apply_edges(
    ctx,
    "remove_connection",
    &actor,
    peer,
    vec![
      WriteOp::array_remove(USERS, actor.as_str(), fields::CONNECTIONS, peer.as_str()),
      WriteOp::array_remove(USERS, peer.as_str(), fields::CONNECTIONS, actor.as_str()),
    ],
  )
  .await
}
