//! Integration tests for the username registry.

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use pretty_assertions::assert_eq;
  use serde_json::json;

  use crate::{
    config::Config,
    db::{DocumentStore, SetMode, USERNAMES},
    domain::profile::UserProfile,
    service::{
      __tests__::helpers::{TestContext, id},
      profile, username,
      util::ServiceError,
    },
  };

  #[tokio::test]
  async fn test_reserve_claims_handle() {
    let t = TestContext::new();
    t.seed_profile("a", json!({})).await;
    t.sign_in("a");

    let handle = username::reserve(&t.ctx(), "  Alice ").await.unwrap();
    assert_eq!(handle, "alice");
    assert!(t.reservation("alice").await.unwrap().is_owned_by(&id("a")));
    assert_eq!(t.stored_profile("a").await.username, "alice");
    assert!(!username::is_available(&t.ctx(), "alice").await.unwrap());
  }

  #[tokio::test]
  async fn test_reserve_taken_handle_fails() {
    let t = TestContext::new();
    t.sign_in("a");
    username::reserve(&t.ctx(), "alice").await.unwrap();

    t.sign_in("b");
    let err = username::reserve(&t.ctx(), "alice").await.unwrap_err();
    assert!(matches!(err, ServiceError::UsernameTaken(ref h) if h == "alice"));
    assert!(t.reservation("alice").await.unwrap().is_owned_by(&id("a")));
  }

  #[tokio::test]
  async fn test_concurrent_reserve_has_one_winner() {
    let t = TestContext::new();
    let first = t.client_for("a");
    let second = t.client_for("b");

    let (ctx1, ctx2) = (first.context(), second.context());
    let (r1, r2) = tokio::join!(username::reserve(&ctx1, "alice"), username::reserve(&ctx2, "alice"));

    let outcomes = [r1.is_ok(), r2.is_ok()];
    assert_eq!(outcomes.iter().filter(|ok| **ok).count(), 1);
    let loser = if r1.is_ok() { r2 } else { r1 };
    assert_eq!(loser.unwrap_err().code(), "USERNAME_TAKEN");

    let owner = t.reservation("alice").await.unwrap().uid;
    assert_eq!(t.stored_profile(owner.as_str()).await.username, "alice");
  }

  #[tokio::test]
  async fn test_invalid_handles_rejected_before_any_read() {
    let t = TestContext::new();
    t.sign_in("a");
    t.store.set_unavailable(true);
    for bad in ["ab", "1abc", "a..b", "abc_"] {
      let err = username::reserve(&t.ctx(), bad).await.unwrap_err();
      assert_eq!(err.code(), "INVALID_USERNAME", "{bad}");
    }
  }

  #[tokio::test]
  async fn test_change_username_moves_reservation() {
    let t = TestContext::new();
    t.seed_profile("a", json!({})).await;
    t.sign_in("a");
    username::reserve(&t.ctx(), "alice").await.unwrap();

    username::change_username(&t.ctx(), "alice2").await.unwrap();
    assert!(t.reservation("alice").await.is_none());
    assert!(t.reservation("alice2").await.unwrap().is_owned_by(&id("a")));
    assert_eq!(t.stored_profile("a").await.username, "alice2");
  }

  #[tokio::test]
  async fn test_change_to_taken_handle_fails() {
    let t = TestContext::new();
    t.sign_in("b");
    username::reserve(&t.ctx(), "bob").await.unwrap();
    t.sign_in("a");
    username::reserve(&t.ctx(), "alice").await.unwrap();

    let err = username::change_username(&t.ctx(), "bob").await.unwrap_err();
    assert_eq!(err.code(), "USERNAME_TAKEN");
    assert!(t.reservation("alice").await.unwrap().is_owned_by(&id("a")));
    assert_eq!(t.stored_profile("a").await.username, "alice");
  }

  #[tokio::test]
  async fn test_change_to_malformed_reservation_is_taken() {
    let t = TestContext::new();
    t.store
      .set(
        USERNAMES,
        "bob",
        json!({"createdAt": 1}).as_object().cloned().unwrap(),
        SetMode::Overwrite,
      )
      .await
      .unwrap();
    t.sign_in("a");
    username::reserve(&t.ctx(), "alice").await.unwrap();

    let err = username::change_username(&t.ctx(), "bob").await.unwrap_err();
    assert_eq!(err.code(), "USERNAME_TAKEN");
    assert_eq!(t.stored_profile("a").await.username, "alice");
  }

  #[tokio::test]
  async fn test_change_to_same_handle_is_noop() {
    let t = TestContext::new();
    t.sign_in("a");
    username::reserve(&t.ctx(), "alice").await.unwrap();
    let before = t.store.snapshot().await;

    assert_eq!(username::change_username(&t.ctx(), "ALICE").await.unwrap(), "alice");
    assert_eq!(t.store.snapshot().await, before);
  }

  #[tokio::test]
  async fn test_change_respects_cooldown() {
    let mut config = Config::default();
    config.registry.cooldown_days = 7;
    let t = TestContext::with_config(config);
    t.sign_in("a");
    username::reserve(&t.ctx(), "alice").await.unwrap();

    let err = username::change_username(&t.ctx(), "alice2").await.unwrap_err();
    assert!(matches!(err, ServiceError::UsernameCooldown { remaining_days: 7 }));
    assert!(t.reservation("alice2").await.is_none());
  }

  #[tokio::test]
  async fn test_cooldown_elapsed_allows_change() {
    let mut config = Config::default();
    config.registry.cooldown_days = 7;
    let t = TestContext::with_config(config);
    let eight_days_ago = Utc::now().timestamp_millis() - 8 * 24 * 60 * 60 * 1000;
    t.seed_profile("a", json!({ "username": "alice", "usernameUpdatedAt": eight_days_ago }))
      .await;
    t.sign_in("a");

    username::change_username(&t.ctx(), "alice2").await.unwrap();
    assert_eq!(t.stored_profile("a").await.username, "alice2");
  }

  #[tokio::test]
  async fn test_release_is_idempotent() {
    let t = TestContext::new();
    t.sign_in("a");
    username::reserve(&t.ctx(), "alice").await.unwrap();

    username::release(&t.ctx(), "alice").await.unwrap();
    assert!(t.reservation("alice").await.is_none());
    assert_eq!(t.stored_profile("a").await.username, "");

    username::release(&t.ctx(), "alice").await.unwrap();
  }

  #[tokio::test]
  async fn test_release_other_owner_denied() {
    let t = TestContext::new();
    t.sign_in("a");
    username::reserve(&t.ctx(), "alice").await.unwrap();

    t.sign_in("b");
    let err = username::release(&t.ctx(), "alice").await.unwrap_err();
    assert_eq!(err.code(), "PERMISSION_DENIED");
    assert!(t.reservation("alice").await.is_some());
  }

  #[tokio::test]
  async fn test_release_keeps_profile_handle_if_changed() {
    let t = TestContext::new();
    t.seed_profile("a", json!({ "username": "newer" })).await;
    t.store
      .set(
        USERNAMES,
        "older",
        json!({"uid": "a", "createdAt": 1}).as_object().cloned().unwrap(),
        SetMode::Overwrite,
      )
      .await
      .unwrap();
    t.sign_in("a");

    username::release(&t.ctx(), "older").await.unwrap();
    assert!(t.reservation("older").await.is_none());
    assert_eq!(t.stored_profile("a").await.username, "newer");
  }

  #[tokio::test]
  async fn test_ensure_assigned_from_email() {
    let t = TestContext::new();
    t.seed_profile("a", json!({})).await;
    t.sign_in("a");

    let handle = username::ensure_assigned(&t.ctx(), Some("Jane.Doe@uni.edu")).await.unwrap();
    assert_eq!(handle, "user_jane.doe");
    assert!(t.reservation("user_jane.doe").await.unwrap().is_owned_by(&id("a")));
  }

  #[tokio::test]
  async fn test_ensure_assigned_skips_taken_candidates() {
    let t = TestContext::new();
    t.sign_in("other");
    username::reserve(&t.ctx(), "user_jane").await.unwrap();
    username::change_username(&t.ctx(), "user_jane1").await.unwrap();
    t.sign_in("third");
    username::reserve(&t.ctx(), "user_jane").await.unwrap();

    t.sign_in("a");
    let handle = username::ensure_assigned(&t.ctx(), Some("jane@uni.edu")).await.unwrap();
    assert_eq!(handle, "user_jane2");
  }

  #[tokio::test]
  async fn test_ensure_assigned_is_idempotent() {
    let t = TestContext::new();
    t.sign_in("a");
    let first = username::ensure_assigned(&t.ctx(), Some("jane@uni.edu")).await.unwrap();
    let before = t.store.snapshot().await;
    let second = username::ensure_assigned(&t.ctx(), Some("someone.else@uni.edu")).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(t.store.snapshot().await, before);
  }

  #[tokio::test]
  async fn test_ensure_assigned_falls_back_to_actor_id() {
    let t = TestContext::new();
    t.sign_in("9XkQ2pLmZZ");
    let handle = username::ensure_assigned(&t.ctx(), None).await.unwrap();
    assert_eq!(handle, "user_u9xkq2plm");
  }

  #[tokio::test]
  async fn test_ensure_assigned_exhausted() {
    let mut config = Config::default();
    config.registry.max_suffix_tries = 1;
    let t = TestContext::with_config(config);
    t.sign_in("x");
    username::reserve(&t.ctx(), "user_jane").await.unwrap();
    t.sign_in("y");
    username::reserve(&t.ctx(), "user_jane1").await.unwrap();

    t.sign_in("a");
    let err = username::ensure_assigned(&t.ctx(), Some("jane@uni.edu")).await.unwrap_err();
    assert_eq!(err.code(), "USERNAME_TAKEN");
    assert_eq!(t.stored_profile_opt("a").await, None);
  }

  #[tokio::test]
  async fn test_registry_write_invalidates_cache() {
    let t = TestContext::new();
    t.sign_in("a");
    profile::get_or_create_profile(&t.ctx()).await.unwrap();
    assert!(t.cache.read(&id("a")).is_some());

    username::reserve(&t.ctx(), "alice").await.unwrap();
    assert!(t.cache.read(&id("a")).is_none());
    let fresh: UserProfile = profile::get_or_create_profile(&t.ctx()).await.unwrap();
    assert_eq!(fresh.username, "alice");
  }
}
