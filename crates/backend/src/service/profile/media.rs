use serde_json::Value;
use tracing::info;

use crate::{
  db::{Document, SetMode, USERS},
  domain::profile::fields,
  service::{context::ServiceContext, util::ServiceError},
};

/// Upload a profile picture and point the profile at it.
pub async fn upload_profile_image(ctx: &ServiceContext<'_>, bytes: Vec<u8>, ext: &str) -> Result<String, ServiceError> {
  upload(ctx, "profile", ext, bytes, "profilePicUrl").await
}

/// Upload a background picture and point the profile at it.
pub async fn upload_background_image(
  ctx: &ServiceContext<'_>,
  bytes: Vec<u8>,
  ext: &str,
) -> Result<String, ServiceError> {
  upload(ctx, "background", ext, bytes, "backgroundPicUrl").await
}

/// Upload a PDF resume. Anything over the configured ceiling is rejected
/// before the upload starts.
pub async fn upload_resume(ctx: &ServiceContext<'_>, bytes: Vec<u8>) -> Result<String, ServiceError> {
  let max = ctx.config.profile.resume_max_bytes;
  if bytes.len() > max {
    return Err(ServiceError::validation(format!(
      "resume is {} bytes, the limit is {max} bytes",
      bytes.len()
    )));
  }
  upload(ctx, "resume", "pdf", bytes, "resumeUrl").await
}

/// Store `bytes` at `users/{actor}/{artifact}.{ext}` and merge the URL into
/// the profile under `field`.
async fn upload(
  ctx: &ServiceContext<'_>,
  artifact: &str,
  ext: &str,
  bytes: Vec<u8>,
  field: &str,
) -> Result<String, ServiceError> {
  let actor = ctx.require_actor()?;
  let ext = ext.trim().trim_start_matches('.').to_ascii_lowercase();
  if ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
    return Err(ServiceError::validation(format!("invalid file extension '{ext}'")));
  }

  let path = format!("users/{}/{}.{}", actor, artifact, ext);
  let size = bytes.len();
  let url = ctx.storage.upload(&path, bytes, content_type(&ext)).await?;

  let mut doc = Document::new();
  doc.insert(field.to_string(), Value::from(url.as_str()));
  doc.insert(fields::UPDATED_AT.to_string(), Value::from(ctx.now_millis()));
  ctx.store.set(USERS, actor.as_str(), doc, SetMode::Merge).await?;
  ctx.cache.invalidate();

  info!(actor = %actor, path = %path, bytes = size, "Uploaded profile media");
  Ok(url)
}

fn content_type(ext: &str) -> &'static str {
  match ext {
    "png" => "image/png",
    "jpg" | "jpeg" => "image/jpeg",
    "webp" => "image/webp",
    "gif" => "image/gif",
    "pdf" => "application/pdf",
    _ => "application/octet-stream",
  }
}
