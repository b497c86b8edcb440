//! Integration tests for search, suggestions and network listings.

#[cfg(test)]
mod tests {
  use std::collections::HashSet;

  use async_trait::async_trait;
  use pretty_assertions::assert_eq;
  use serde_json::{Value, json};

  use crate::{
    db::{DbError, Document, DocumentStore, MemoryStore, Result, SetMode, Transaction, WriteOp},
    domain::{profile::fields, relationship::SearchFilter},
    service::{
      __tests__::helpers::{TestContext, id, uids},
      ServiceContext, discovery, graph,
    },
  };

  /// `a` is connected to `b`, follows `c`, and knows nothing of `d`.
  async fn ranking_fixture() -> TestContext {
    let t = TestContext::new();
    t.seed_profile("a", json!({ "displayName": "Sam Actor", "connections": ["b"], "following": ["c"] }))
      .await;
    t.seed_profile("b", json!({ "displayName": "Sam Zed", "connections": ["a"] })).await;
    t.seed_profile("c", json!({ "displayName": "Sam Cole", "followers": ["a"] })).await;
    t.seed_profile("d", json!({ "displayName": "Sam Able", "username": "samable" })).await;
    t.seed_profile("e", json!({ "displayName": "Unrelated" })).await;
    t.sign_in("a");
    t
  }

  #[tokio::test]
  async fn test_search_ranks_connections_then_follows_then_name() {
    let t = ranking_fixture().await;
    let results = discovery::search(&t.ctx(), "Sam", SearchFilter::All, 10).await;
    assert_eq!(uids(&results), vec!["b", "c", "d"]);
  }

  #[tokio::test]
  async fn test_search_dedups_and_excludes_actor() {
    let t = ranking_fixture().await;
    // "d" matches both by handle prefix and by display name.
    let results = discovery::search(&t.ctx(), "sam", SearchFilter::All, 10).await;
    let ids = uids(&results);
    assert_eq!(ids.iter().filter(|id| **id == "d").count(), 1);
    assert!(!ids.contains(&"a"));
  }

  #[tokio::test]
  async fn test_search_handle_prefix() {
    let t = ranking_fixture().await;
    let results = discovery::search(&t.ctx(), "samab", SearchFilter::All, 10).await;
    assert_eq!(uids(&results), vec!["d"]);
  }

  #[tokio::test]
  async fn test_search_filter_and_limit() {
    let t = ranking_fixture().await;
    let results = discovery::search(&t.ctx(), "sam", SearchFilter::Connections, 10).await;
    assert_eq!(uids(&results), vec!["b"]);

    let results = discovery::search(&t.ctx(), "sam", SearchFilter::All, 2).await;
    assert_eq!(uids(&results), vec!["b", "c"]);
  }

  #[tokio::test]
  async fn test_search_department_and_batch_filters_match_exactly() {
    let t = TestContext::new();
    t.seed_profile("a", json!({ "displayName": "Kim A", "affiliation": { "department": "CS", "batch": "2024" } }))
      .await;
    t.seed_profile("b", json!({ "displayName": "Kim B", "affiliation": { "department": "CS", "batch": "2023" } }))
      .await;
    t.seed_profile("c", json!({ "displayName": "Kim C", "affiliation": { "department": "cs", "batch": "2024" } }))
      .await;
    t.seed_profile("d", json!({ "displayName": "Kim D", "affiliation": { "department": "EE", "batch": "2024" } }))
      .await;
    t.sign_in("a");

    let results = discovery::search(&t.ctx(), "kim", SearchFilter::Department, 10).await;
    assert_eq!(uids(&results), vec!["b"]);

    let results = discovery::search(&t.ctx(), "kim", SearchFilter::Batch, 10).await;
    assert_eq!(uids(&results), vec!["c", "d"]);
  }

  #[tokio::test]
  async fn test_search_fails_closed() {
    let t = ranking_fixture().await;
    assert!(discovery::search(&t.ctx(), "   ", SearchFilter::All, 10).await.is_empty());

    t.session.sign_out();
    assert!(discovery::search(&t.ctx(), "sam", SearchFilter::All, 10).await.is_empty());

    t.sign_in("a");
    t.store.set_unavailable(true);
    assert!(discovery::search(&t.ctx(), "sam", SearchFilter::All, 10).await.is_empty());
  }

  #[tokio::test]
  async fn test_suggestions_same_department() {
    let t = TestContext::new();
    t.seed_profile("u1", json!({ "affiliation": { "department": "CS", "batch": "2024" } }))
      .await;
    for uid in ["u2", "u3", "u4"] {
      t.seed_profile(uid, json!({ "affiliation": { "department": "CS", "batch": "2023" } }))
        .await;
    }
    t.seed_profile("u5", json!({ "affiliation": { "department": "EE", "batch": "2022" } }))
      .await;
    t.sign_in("u1");

    let results = discovery::suggestions(&t.ctx(), 10, false).await;
    let got: HashSet<_> = uids(&results).into_iter().collect();
    assert_eq!(got, HashSet::from(["u2", "u3", "u4"]));
  }

  #[tokio::test]
  async fn test_suggestions_never_include_known_people() {
    let t = TestContext::new();
    let cs = json!({ "department": "CS", "batch": "2024" });
    t.seed_profile(
      "a",
      json!({
        "affiliation": cs,
        "connections": ["b"],
        "pendingConnectionsSent": ["c"],
        "pendingConnectionsReceived": ["d"]
      }),
    )
    .await;
    for uid in ["b", "c", "d", "e", "f"] {
      t.seed_profile(uid, json!({ "affiliation": cs })).await;
    }
    t.seed_profile("g", json!({ "affiliation": { "department": "ME", "batch": "2024" } }))
      .await;
    t.seed_profile("h", json!({ "affiliation": { "department": "EE", "batch": "2020" } }))
      .await;
    t.sign_in("a");

    let results = discovery::suggestions(&t.ctx(), 10, true).await;
    let ids = uids(&results);
    for known in ["a", "b", "c", "d"] {
      assert!(!ids.contains(&known), "{known} suggested");
    }
    assert!(ids.contains(&"e") && ids.contains(&"f") && ids.contains(&"g"));
    let unique: HashSet<_> = ids.iter().collect();
    assert_eq!(unique.len(), ids.len());
  }

  #[tokio::test]
  async fn test_suggestions_random_pick_is_bounded() {
    let t = TestContext::new();
    t.seed_profile("a", json!({ "affiliation": { "department": "CS", "batch": "2024" } }))
      .await;
    for uid in ["r1", "r2", "r3", "r4"] {
      t.seed_profile(uid, json!({ "affiliation": { "department": "EE", "batch": "2020" } }))
        .await;
    }
    t.sign_in("a");

    assert!(discovery::suggestions(&t.ctx(), 10, false).await.is_empty());
    let results = discovery::suggestions(&t.ctx(), 10, true).await;
    assert_eq!(results.len(), 2);
  }

  #[tokio::test]
  async fn test_suggestions_degrade_to_empty() {
    let t = TestContext::new();
    t.sign_in("a");
    t.store.set_unavailable(true);
    assert!(discovery::suggestions(&t.ctx(), 10, true).await.is_empty());
  }

  /// Store whose equality queries on the batch field fail.
  struct BatchQueryFails(MemoryStore);

  #[async_trait]
  impl DocumentStore for BatchQueryFails {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
      self.0.get(collection, id).await
    }
    async fn set(&self, collection: &str, id: &str, fields: Document, mode: SetMode) -> Result<()> {
      self.0.set(collection, id, fields, mode).await
    }
    async fn delete(&self, collection: &str, id: &str) -> Result<()> {
      self.0.delete(collection, id).await
    }
    async fn run_batch(&self, ops: Vec<WriteOp>) -> Result<()> {
      self.0.run_batch(ops).await
    }
    async fn begin(&self) -> Result<Box<dyn Transaction>> {
      self.0.begin().await
    }
    async fn where_between(
      &self,
      collection: &str,
      field: &str,
      lo: &str,
      hi: &str,
      limit: usize,
    ) -> Result<Vec<(String, Document)>> {
      self.0.where_between(collection, field, lo, hi, limit).await
    }
    async fn where_equals(
      &self,
      collection: &str,
      field: &str,
      value: &Value,
      limit: usize,
    ) -> Result<Vec<(String, Document)>> {
      if field == fields::BATCH {
        return Err(DbError::Unavailable("batch index offline".into()));
      }
      self.0.where_equals(collection, field, value, limit).await
    }
    async fn list(&self, collection: &str, limit: usize) -> Result<Vec<(String, Document)>> {
      self.0.list(collection, limit).await
    }
  }

  #[tokio::test]
  async fn test_suggestions_keep_partial_result() {
    let t = TestContext::new();
    t.seed_profile("a", json!({ "affiliation": { "department": "CS", "batch": "2024" } }))
      .await;
    t.seed_profile("b", json!({ "affiliation": { "department": "CS", "batch": "2021" } }))
      .await;
    t.seed_profile("c", json!({ "affiliation": { "department": "EE", "batch": "2024" } }))
      .await;
    t.sign_in("a");

    let flaky = BatchQueryFails(t.store.clone());
    let ctx = ServiceContext::new(&flaky, &t.session, &t.cache, &t.storage, &t.config);
    let results = discovery::suggestions(&ctx, 10, true).await;
    assert_eq!(uids(&results), vec!["b"]);
  }

  #[tokio::test]
  async fn test_network_listings() {
    let t = TestContext::new();
    for uid in ["a", "b", "c"] {
      t.seed_profile(uid, json!({})).await;
    }
    t.sign_in("a");
    graph::follow(&t.ctx(), &id("b")).await.unwrap();
    graph::follow(&t.ctx(), &id("c")).await.unwrap();
    t.sign_in("c");
    graph::send_connection_request(&t.ctx(), &id("a")).await.unwrap();

    t.sign_in("a");
    let mut following = uids(&discovery::following(&t.ctx(), None).await)
      .into_iter()
      .map(str::to_string)
      .collect::<Vec<_>>();
    following.sort();
    assert_eq!(following, vec!["b", "c"]);
    assert_eq!(uids(&discovery::followers(&t.ctx(), Some(&id("b"))).await), vec!["a"]);
    assert_eq!(uids(&discovery::pending_requests(&t.ctx()).await), vec!["c"]);
    assert!(discovery::connections(&t.ctx(), None).await.is_empty());
  }

  #[tokio::test]
  async fn test_network_skips_missing_profiles() {
    let t = TestContext::new();
    t.seed_profile("a", json!({ "connections": ["b", "ghost"] })).await;
    t.seed_profile("b", json!({})).await;
    t.sign_in("a");
    assert_eq!(uids(&discovery::connections(&t.ctx(), None).await), vec!["b"]);
  }
}
