use serde_json::Value;
use tracing::warn;

use crate::{db::CONFIG, service::context::ServiceContext};

const DEPARTMENTS_DOC: &str = "departments";

/// Valid department names from `config/departments`, falling back to the
/// configured default list when the document is missing, malformed or
/// unreachable.
pub async fn departments(ctx: &ServiceContext<'_>) -> Vec<String> {
  let fallback = || ctx.config.profile.default_departments.clone();

  let doc = match ctx.store.get(CONFIG, DEPARTMENTS_DOC).await {
    Ok(Some(doc)) => doc,
    Ok(None) => return fallback(),
    Err(e) => {
      warn!(err = %e, "Department catalogue unavailable, using defaults");
      return fallback();
    }
  };

  let list: Vec<String> = match doc.get("list") {
    Some(Value::Array(items)) => items
      .iter()
      .filter_map(Value::as_str)
      .map(str::trim)
      .filter(|d| !d.is_empty())
      .map(str::to_string)
      .collect(),
    _ => Vec::new(),
  };

  if list.is_empty() {
    warn!("Department catalogue is empty or malformed, using defaults");
    return fallback();
  }
  list
}
