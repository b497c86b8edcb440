//! Username registry.
//!
//! Handles are globally unique. Uniqueness is enforced by a reservation
//! document in the `usernames` collection keyed by the normalized handle, so
//! creating it inside a transaction doubles as the uniqueness check. The
//! owning profile carries the handle and the time it last changed.
//!
//! Per actor a handle moves `Unset -> Reserved -> Renamed -> Unset`.
//!
//! Every mutation runs in a retrying transaction whose body only reads,
//! buffers writes and returns: it may run more than once. All reads in a body
//! happen before its first write. Cancelling a caller stops the wait, not the
//! effect.
//!
//! ## Available Operations
//!
//! - [`normalize`] / [`validate`] - handle grammar
//! - [`is_available`] - advisory availability check
//! - [`reserve`] - claim a handle
//! - [`change_username`] - move to a new handle, releasing the old one
//! - [`release`] - drop a handle the actor owns
//! - [`ensure_assigned`] - give a handle-less actor a generated one

mod assign;
mod validation;

use serde_json::Value;
use tracing::{debug, info};

pub use self::{
  assign::{candidate, candidates, derive_head},
  validation::{MAX_USERNAME_LENGTH, MIN_USERNAME_LENGTH, normalize, parse, validate},
};
use super::{context::ServiceContext, util::ServiceError};
use crate::{
  db::{Document, SetMode, Transaction, USERNAMES, USERS, run_transaction, string_at},
  domain::{actor::ActorId, profile::fields, username::Reservation},
};

const DAY_MILLIS: i64 = 24 * 60 * 60 * 1000;

/// Whether `handle` is valid and currently unreserved.
///
/// Advisory only: a later [`reserve`] can still lose a race.
pub async fn is_available(ctx: &ServiceContext<'_>, handle: &str) -> Result<bool, ServiceError> {
  let handle = parse(handle)?;
  let taken = ctx.store.get(USERNAMES, &handle).await?.is_some();
  debug!(handle = %handle, taken, "Checked username availability");
  Ok(!taken)
}

/// Claim `handle` for the actor. Fails with `UsernameTaken` if any
/// reservation exists for it, including one the actor already holds.
pub async fn reserve(ctx: &ServiceContext<'_>, handle: &str) -> Result<String, ServiceError> {
  let actor = ctx.require_actor()?;
  let handle = parse(handle)?;
  let now = ctx.now_millis();

  run_transaction(ctx.store, attempts(ctx), |tx| {
    let actor = actor.clone();
    let handle = handle.clone();
    Box::pin(async move {
      if tx.get(USERNAMES, &handle).await?.is_some() {
        return Err(ServiceError::UsernameTaken(handle));
      }

      tx.set(USERNAMES, &handle, Reservation::new(actor.clone(), now).to_document(), SetMode::Overwrite);
      tx.set(USERS, actor.as_str(), handle_fields(&handle, now), SetMode::Merge);
      Ok(())
    })
  })
  .await?;

  ctx.cache.invalidate();
  info!(actor = %actor, handle = %handle, "Username reserved");
  Ok(handle)
}

/// Move the actor to `new_handle`.
///
/// Subject to the configured cooldown. Changing to the current handle is a
/// no-op. The old reservation is deleted only if the actor still owns it.
pub async fn change_username(ctx: &ServiceContext<'_>, new_handle: &str) -> Result<String, ServiceError> {
  let actor = ctx.require_actor()?;
  let new_handle = parse(new_handle)?;
  let now = ctx.now_millis();
  let cooldown = ctx.config.registry.cooldown_millis();

  let previous = run_transaction(ctx.store, attempts(ctx), |tx| {
    let actor = actor.clone();
    let new_handle = new_handle.clone();
    Box::pin(async move {
      let (old_handle, last_change) = read_handle(tx, &actor).await?;

      if cooldown > 0 {
        let elapsed = now - last_change;
        if elapsed < cooldown {
          let remaining_days = (cooldown - elapsed + DAY_MILLIS - 1) / DAY_MILLIS;
          return Err(ServiceError::UsernameCooldown { remaining_days });
        }
      }

      if old_handle == new_handle {
        return Ok(None);
      }

      let new_owned = reservation_owned(tx, &new_handle, &actor).await?;
      let old_owned = if old_handle.is_empty() {
        None
      } else {
        reservation_owned(tx, &old_handle, &actor).await?
      };

      if new_owned == Some(false) {
        return Err(ServiceError::UsernameTaken(new_handle));
      }

      tx.set(USERNAMES, &new_handle, Reservation::new(actor.clone(), now).to_document(), SetMode::Overwrite);
      if old_owned == Some(true) {
        tx.delete(USERNAMES, &old_handle);
      }
      tx.set(USERS, actor.as_str(), handle_fields(&new_handle, now), SetMode::Merge);
      Ok(Some(old_handle))
    })
  })
  .await?;

  match previous {
    Some(old) => {
      ctx.cache.invalidate();
      info!(actor = %actor, from = %old, to = %new_handle, "Username changed");
    }
    None => debug!(actor = %actor, handle = %new_handle, "Username unchanged"),
  }
  Ok(new_handle)
}

/// Release `handle`. Releasing an absent handle succeeds; releasing someone
/// else's fails with `PermissionDenied`. The actor's profile handle is cleared
/// only if it still equals the released one.
pub async fn release(ctx: &ServiceContext<'_>, handle: &str) -> Result<(), ServiceError> {
  let actor = ctx.require_actor()?;
  let handle = normalize(handle);
  if handle.is_empty() {
    return Err(ServiceError::invalid_username(handle, "must not be empty"));
  }
  let now = ctx.now_millis();

  let released = run_transaction(ctx.store, attempts(ctx), |tx| {
    let actor = actor.clone();
    let handle = handle.clone();
    Box::pin(async move {
      let Some(owned) = reservation_owned(tx, &handle, &actor).await? else {
        return Ok(false);
      };
      if !owned {
        return Err(ServiceError::PermissionDenied(format!("username '{handle}' belongs to another user")));
      }

      let (current, _) = read_handle(tx, &actor).await?;

      tx.delete(USERNAMES, &handle);
      if current == handle {
        tx.set(USERS, actor.as_str(), handle_fields("", now), SetMode::Merge);
      }
      Ok(true)
    })
  })
  .await?;

  if released {
    ctx.cache.invalidate();
    info!(actor = %actor, handle = %handle, "Username released");
  } else {
    debug!(actor = %actor, handle = %handle, "Username already released");
  }
  Ok(())
}

/// Make sure the actor has a handle, generating `prefix + head[+n]` if not.
///
/// The head comes from `hint_email` (or the identity's email, or the actor
/// id). Candidates are tried in order and the first one that is free or
/// already the actor's wins. Returns the actor's handle.
pub async fn ensure_assigned(ctx: &ServiceContext<'_>, hint_email: Option<&str>) -> Result<String, ServiceError> {
  let actor = ctx.require_actor()?;

  if let Some(doc) = ctx.store.get(USERS, actor.as_str()).await?
    && let Some(existing) = string_at(&doc, fields::USERNAME).filter(|h| !h.trim().is_empty())
  {
    debug!(actor = %actor, handle = %existing, "Username already assigned");
    return Ok(existing.to_string());
  }

  let email = hint_email.map(str::to_string).or_else(|| ctx.identity.current_actor_email());
  let registry = &ctx.config.registry;
  let head = derive_head(email.as_deref(), &actor, &registry.default_prefix);
  let pool = candidates(&registry.default_prefix, &head, registry.max_suffix_tries as usize);
  let now = ctx.now_millis();

  let (handle, assigned) = run_transaction(ctx.store, attempts(ctx), |tx| {
    let actor = actor.clone();
    let pool = pool.clone();
    Box::pin(async move {
      let (existing, _) = read_handle(tx, &actor).await?;
      if !existing.is_empty() {
        return Ok((existing, false));
      }

      let mut chosen = None;
      for candidate in &pool {
        if reservation_owned(tx, candidate, &actor).await?.unwrap_or(true) {
          chosen = Some(candidate.clone());
          break;
        }
      }

      let Some(handle) = chosen else {
        let base = pool.first().cloned().unwrap_or_default();
        return Err(ServiceError::UsernameTaken(base));
      };
      tx.set(USERNAMES, &handle, Reservation::new(actor.clone(), now).to_document(), SetMode::Overwrite);
      tx.set(USERS, actor.as_str(), handle_fields(&handle, now), SetMode::Merge);
      Ok((handle, true))
    })
  })
  .await?;

  if assigned {
    ctx.cache.invalidate();
    info!(actor = %actor, handle = %handle, "Username assigned");
  }
  Ok(handle)
}

fn attempts(ctx: &ServiceContext<'_>) -> usize {
  ctx.config.store.transaction_attempts as usize
}

fn handle_fields(handle: &str, now: i64) -> Document {
  let mut doc = Document::new();
  doc.insert(fields::USERNAME.to_string(), Value::from(handle));
  doc.insert(fields::USERNAME_UPDATED_AT.to_string(), Value::from(now));
  doc
}

/// Current handle and last change time from the actor's profile.
async fn read_handle(tx: &mut Box<dyn Transaction>, actor: &ActorId) -> Result<(String, i64), ServiceError> {
  let Some(doc) = tx.get(USERS, actor.as_str()).await? else {
    return Ok((String::new(), 0));
  };
  let handle = string_at(&doc, fields::USERNAME).map(normalize).unwrap_or_default();
  let changed_at = doc.get(fields::USERNAME_UPDATED_AT).and_then(Value::as_i64).unwrap_or(0);
  Ok((handle, changed_at))
}

/// Whether `actor` owns the reservation for `handle`, or `None` if there is
/// none. A malformed reservation belongs to nobody we can name, so it counts
/// as someone else's.
async fn reservation_owned(
  tx: &mut Box<dyn Transaction>,
  handle: &str,
  actor: &ActorId,
) -> Result<Option<bool>, ServiceError> {
  let Some(doc) = tx.get(USERNAMES, handle).await? else {
    return Ok(None);
  };
  Ok(Some(Reservation::from_document(doc).is_ok_and(|r| r.is_owned_by(actor))))
}
