//! Profile repository.
//!
//! Reads and edits of whole profiles. Edits are merge writes of the editable
//! fields only, so they never race with the graph engine's edge transforms or
//! the registry's handle writes.
//!
//! ## Available Operations
//!
//! - [`get_or_create_profile`] - the actor's own profile, created on first access
//! - [`get_profile`] - any profile, tolerant of schema drift
//! - [`save_profile`] - persist profile edits
//! - [`upload_profile_image`], [`upload_background_image`], [`upload_resume`] - media
//! - [`departments`] - department catalogue

mod catalogue;
mod media;

use serde_json::Value;
use tracing::{debug, info};

pub use self::{
  catalogue::departments,
  media::{upload_background_image, upload_profile_image, upload_resume},
};
use super::{context::ServiceContext, util::ServiceError};
use crate::{
  db::{DbError, DocumentStore, SetMode, USERS},
  domain::{
    actor::ActorId,
    profile::{UserProfile, fields},
  },
};

/// Read a profile straight from the store, bypassing the cache.
pub async fn load_profile(store: &dyn DocumentStore, uid: &ActorId) -> Result<Option<UserProfile>, DbError> {
  Ok(
    store
      .get(USERS, uid.as_str())
      .await?
      .map(|doc| UserProfile::from_document(uid, doc)),
  )
}

/// The actor's own profile, creating it from the identity snapshot on first
/// access. Served from the cache when it holds the actor's profile.
pub async fn get_or_create_profile(ctx: &ServiceContext<'_>) -> Result<UserProfile, ServiceError> {
  let actor = ctx.require_actor()?;
  if let Some(cached) = ctx.cache.read(&actor) {
    return Ok(cached.as_ref().clone());
  }

  let profile = match load_profile(ctx.store, &actor).await? {
    Some(profile) => profile,
    None => {
      let snapshot = ctx.identity.current_actor_snapshot();
      let mut profile = UserProfile::minimal(actor.clone());
      profile.display_name = snapshot.display_name.unwrap_or_default();
      profile.profile_pic_url = snapshot.photo_url;
      profile.updated_at = ctx.now_millis();

      ctx
        .store
        .set(USERS, actor.as_str(), profile.to_document(), SetMode::Overwrite)
        .await?;
      info!(actor = %actor, "Created profile");
      profile
    }
  };

  ctx.cache.write(actor, profile.clone());
  Ok(profile)
}

/// Any actor's profile. A blank or unknown uid yields `None`; a document that
/// no longer matches the schema yields a minimal profile for `uid`.
pub async fn get_profile(ctx: &ServiceContext<'_>, uid: &ActorId) -> Result<Option<UserProfile>, ServiceError> {
  if uid.is_blank() {
    return Ok(None);
  }

  let actor = ctx.actor();
  if let Some(actor) = &actor
    && actor == uid
    && let Some(cached) = ctx.cache.read(actor)
  {
    return Ok(Some(cached.as_ref().clone()));
  }

  let profile = load_profile(ctx.store, uid).await?;
  if let (Some(actor), Some(profile)) = (actor, &profile)
    && &actor == uid
  {
    ctx.cache.write(actor, profile.clone());
  }
  debug!(uid = %uid, found = profile.is_some(), "Loaded profile");
  Ok(profile)
}

/// Persist the editable fields of the actor's profile.
///
/// Relationship sets and the handle in `profile` are ignored; the stored
/// values win. Returns the stored profile after the write.
pub async fn save_profile(ctx: &ServiceContext<'_>, profile: &UserProfile) -> Result<UserProfile, ServiceError> {
  let actor = ctx.require_actor()?;
  if !profile.uid.is_blank() && profile.uid != actor {
    return Err(ServiceError::PermissionDenied("cannot edit another user's profile".to_string()));
  }

  let mut doc = profile.editable_document();
  doc.insert(fields::UID.to_string(), Value::from(actor.as_str()));
  doc.insert(fields::UPDATED_AT.to_string(), Value::from(ctx.now_millis()));
  ctx.store.set(USERS, actor.as_str(), doc, SetMode::Merge).await?;

  let saved = load_profile(ctx.store, &actor)
    .await?
    .ok_or_else(|| ServiceError::not_found("profile", actor.as_str()))?;
  ctx.cache.write(actor.clone(), saved.clone());
  info!(actor = %actor, "Profile saved");
  Ok(saved)
}
