//! Integration tests for profile reads, edits, media uploads and departments.

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;
  use serde_json::json;

  use crate::{
    db::{CONFIG, DocumentStore, SetMode},
    domain::config::DEFAULT_DEPARTMENTS,
    identity::ActorSnapshot,
    service::{
      __tests__::helpers::{TestContext, id},
      graph, profile,
    },
  };

  #[tokio::test]
  async fn test_get_or_create_from_identity_snapshot() {
    let t = TestContext::new();
    t.session.sign_in_with(
      "a",
      Some("ann@uni.edu"),
      ActorSnapshot {
        display_name: Some("Ann".into()),
        photo_url: Some("https://img/ann.png".into()),
      },
    );

    let created = profile::get_or_create_profile(&t.ctx()).await.unwrap();
    assert_eq!(created.display_name, "Ann");
    assert_eq!(created.profile_pic_url.as_deref(), Some("https://img/ann.png"));
    assert!(created.updated_at > 0);
    assert_eq!(t.stored_profile("a").await, created);
  }

  #[tokio::test]
  async fn test_cache_never_serves_another_actor() {
    let t = TestContext::new();
    t.seed_profile("a", json!({ "displayName": "Ann" })).await;
    t.seed_profile("b", json!({ "displayName": "Bob" })).await;

    t.sign_in("a");
    assert_eq!(profile::get_or_create_profile(&t.ctx()).await.unwrap().display_name, "Ann");
    t.sign_in("b");
    assert_eq!(profile::get_or_create_profile(&t.ctx()).await.unwrap().display_name, "Bob");
    assert!(t.cache.read(&id("a")).is_none());
  }

  #[tokio::test]
  async fn test_get_profile_edge_cases() {
    let t = TestContext::new();
    t.seed_profile("b", json!({ "displayName": "Bob" })).await;
    t.seed_profile("drift", json!({ "skills": "not-a-list" })).await;
    t.sign_in("a");

    assert!(profile::get_profile(&t.ctx(), &id("")).await.unwrap().is_none());
    assert!(profile::get_profile(&t.ctx(), &id("missing")).await.unwrap().is_none());
    assert_eq!(profile::get_profile(&t.ctx(), &id("b")).await.unwrap().unwrap().display_name, "Bob");

    let drifted = profile::get_profile(&t.ctx(), &id("drift")).await.unwrap().unwrap();
    assert_eq!(drifted.uid, id("drift"));
    assert!(drifted.skills.is_empty());
  }

  #[tokio::test]
  async fn test_save_profile_keeps_edges_and_handle() {
    let t = TestContext::new();
    t.seed_profile("a", json!({ "username": "ann" })).await;
    t.seed_profile("b", json!({})).await;
    t.sign_in("a");

    let mut edited = profile::get_or_create_profile(&t.ctx()).await.unwrap();
    // A follow lands while the edit form is open.
    graph::follow(&t.ctx(), &id("b")).await.unwrap();

    edited.about = Some("hello".into());
    edited.username = "hijack".into();
    edited.skills = vec!["Rust".into()];
    let saved = profile::save_profile(&t.ctx(), &edited).await.unwrap();

    assert_eq!(saved.about.as_deref(), Some("hello"));
    assert_eq!(saved.username, "ann");
    assert!(saved.following.contains(&id("b")));
    assert_eq!(t.stored_profile("a").await, saved);
  }

  #[tokio::test]
  async fn test_save_profile_of_someone_else_denied() {
    let t = TestContext::new();
    t.seed_profile("b", json!({})).await;
    t.sign_in("a");
    let other = t.stored_profile("b").await;
    let err = profile::save_profile(&t.ctx(), &other).await.unwrap_err();
    assert_eq!(err.code(), "PERMISSION_DENIED");
  }

  #[tokio::test]
  async fn test_upload_paths_and_profile_links() {
    let t = TestContext::new();
    t.seed_profile("a", json!({})).await;
    t.sign_in("a");

    let url = profile::upload_profile_image(&t.ctx(), vec![1, 2, 3], ".PNG").await.unwrap();
    assert!(t.storage.object("users/a/profile.png").await.is_some());
    assert_eq!(t.stored_profile("a").await.profile_pic_url.as_deref(), Some(url.as_str()));

    profile::upload_background_image(&t.ctx(), vec![4], "jpg").await.unwrap();
    let stored = t.storage.object("users/a/background.jpg").await.unwrap();
    assert_eq!(stored.content_type, "image/jpeg");

    let resume = profile::upload_resume(&t.ctx(), vec![0; 1_000_000]).await.unwrap();
    assert!(resume.contains("users/a/resume.pdf"));
  }

  #[tokio::test]
  async fn test_resume_over_limit_rejected_before_upload() {
    let t = TestContext::new();
    t.sign_in("a");
    let err = profile::upload_resume(&t.ctx(), vec![0; 1_000_001]).await.unwrap_err();
    assert_eq!(err.code(), "VALIDATION");
    assert!(t.storage.is_empty().await);
  }

  #[tokio::test]
  async fn test_departments_from_config_document() {
    let t = TestContext::new();
    t.store
      .set(
        CONFIG,
        "departments",
        json!({ "list": ["CSE", " ", "ECE"] }).as_object().cloned().unwrap(),
        SetMode::Overwrite,
      )
      .await
      .unwrap();
    assert_eq!(profile::departments(&t.ctx()).await, vec!["CSE", "ECE"]);
  }

  #[tokio::test]
  async fn test_departments_fallback() {
    let t = TestContext::new();
    let defaults: Vec<String> = DEFAULT_DEPARTMENTS.iter().map(|d| d.to_string()).collect();
    assert_eq!(defaults.len(), 10);
    assert_eq!(profile::departments(&t.ctx()).await, defaults);

    t.store
      .set(
        CONFIG,
        "departments",
        json!({ "list": "CSE" }).as_object().cloned().unwrap(),
        SetMode::Overwrite,
      )
      .await
      .unwrap();
    assert_eq!(profile::departments(&t.ctx()).await, defaults);

    t.store.set_unavailable(true);
    assert_eq!(profile::departments(&t.ctx()).await, defaults);
  }
}
