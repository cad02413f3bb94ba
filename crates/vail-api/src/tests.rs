//! Router tests against an in-memory store and a canned upstream.

use std::{collections::HashMap, sync::Arc, time::Duration};

use axum::{
  body::Body,
  http::{Request, StatusCode},
  response::Response,
};
use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use tower::ServiceExt;
use vail_core::{
  catalog::KNOWN_CODES,
  schema::ProjectionSchema,
  stat::{HistoryRow, LatestRecord, UserSnapshot},
  store::{HistoryStore, LatestStore, Reconciliation, StatsSource},
};
use vail_store_sqlite::SqliteStore;

use crate::{AppState, api_router};

// ─── Fixtures ────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
#[error("upstream unreachable")]
struct Unreachable;

/// Upstream stand-in serving a fixed set of users.
#[derive(Default)]
struct CannedSource {
  users: HashMap<String, UserSnapshot>,
  down:  bool,
}

impl StatsSource for CannedSource {
  type Error = Unreachable;

  fn fetch<'a>(
    &'a self,
    user_id: &'a str,
  ) -> impl Future<Output = Result<Option<UserSnapshot>, Unreachable>> + Send + 'a {
    async move {
      if self.down {
        return Err(Unreachable);
      }
      Ok(self.users.get(user_id).cloned())
    }
  }
}

fn snapshot(pairs: &[(&str, f64)]) -> UserSnapshot {
  pairs.iter().map(|(code, value)| (*code, *value)).collect()
}

async fn make_state(source: CannedSource) -> AppState<SqliteStore, CannedSource> {
  AppState {
    store:          Arc::new(SqliteStore::open_in_memory().await.unwrap()),
    source:         Arc::new(source),
    schema:         Arc::new(ProjectionSchema::build(KNOWN_CODES.iter().copied()).unwrap()),
    query_deadline: None,
  }
}

/// Store whose capture-instant scan stalls for `delay`.
struct SlowStore {
  inner: SqliteStore,
  delay: Duration,
}

impl LatestStore for SlowStore {
  type Error = vail_store_sqlite::Error;

  async fn replace_user_stats(
    &self,
    user_id: &str,
    snapshot: &UserSnapshot,
    at: DateTime<Utc>,
  ) -> Result<Reconciliation, Self::Error> {
    self.inner.replace_user_stats(user_id, snapshot, at).await
  }

  async fn latest_stats(&self, user_id: &str) -> Result<Vec<LatestRecord>, Self::Error> {
    self.inner.latest_stats(user_id).await
  }

  async fn user_exists(&self, user_id: &str) -> Result<bool, Self::Error> {
    self.inner.user_exists(user_id).await
  }
}

impl HistoryStore for SlowStore {
  type Error = vail_store_sqlite::Error;

  async fn append_history(&self, rows: &[HistoryRow]) -> Result<(), Self::Error> {
    self.inner.append_history(rows).await
  }

  async fn has_history(&self, user_id: &str) -> Result<bool, Self::Error> {
    self.inner.has_history(user_id).await
  }

  async fn capture_instants(
    &self,
    user_id: &str,
    lower: DateTime<Utc>,
    upper: DateTime<Utc>,
    limit: u32,
  ) -> Result<Vec<DateTime<Utc>>, Self::Error> {
    tokio::time::sleep(self.delay).await;
    self.inner.capture_instants(user_id, lower, upper, limit).await
  }

  async fn snapshot_at(
    &self,
    user_id: &str,
    at: DateTime<Utc>,
  ) -> Result<UserSnapshot, Self::Error> {
    self.inner.snapshot_at(user_id, at).await
  }
}

async fn get<S>(state: AppState<S, CannedSource>, uri: &str) -> Response
where
  S: LatestStore + HistoryStore + 'static,
{
  let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
  api_router(state).oneshot(req).await.unwrap()
}

async fn json_body(resp: Response) -> Value {
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  serde_json::from_slice(&bytes).unwrap()
}

// ── Live stats ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn live_stats_fill_missing_codes_with_zero() {
  let source = CannedSource {
    users: HashMap::from([(
      "u1".to_string(),
      snapshot(&[("kills", 10.0), ("deaths", 4.0)]),
    )]),
    ..Default::default()
  };
  let state = make_state(source).await;

  let resp = get(state.clone(), "/v2/users/u1/stats").await;
  assert_eq!(resp.status(), StatusCode::OK);

  let body = json_body(resp).await;
  let kd = &body["stats"]["general"]["kills_and_deaths"];
  assert_eq!(kd["kills"], json!(10));
  assert_eq!(kd["deaths"], json!(4));
  assert_eq!(kd["assists"], json!(0));
  assert_eq!(body["stats"]["general"]["prestige"], json!(0));
  assert_eq!(body["stats"]["weapons"]["kanto"]["kills"]["total"], json!(0));
  assert!(body["captured_at"].is_f64());

  let stored = state.store.latest_stats("u1").await.unwrap();
  assert_eq!(stored.len(), 2);
}

#[tokio::test]
async fn live_stats_retire_vanished_codes() {
  let state = make_state(CannedSource {
    users: HashMap::from([("u1".to_string(), snapshot(&[("kills", 3.0)]))]),
    ..Default::default()
  })
  .await;
  state
    .store
    .replace_user_stats(
      "u1",
      &snapshot(&[("kills", 1.0), ("weapon-ak-kills", 7.0)]),
      DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
    )
    .await
    .unwrap();

  let resp = get(state.clone(), "/v2/users/u1/stats").await;
  assert_eq!(resp.status(), StatusCode::OK);

  let codes: Vec<String> = state
    .store
    .latest_stats("u1")
    .await
    .unwrap()
    .into_iter()
    .map(|r| r.code)
    .collect();
  assert_eq!(codes, ["kills"]);
}

#[tokio::test]
async fn upstream_miss_is_404_and_writes_nothing() {
  let state = make_state(CannedSource::default()).await;

  let resp = get(state.clone(), "/v2/users/nobody/stats").await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  let body = json_body(resp).await;
  assert_eq!(body["code"], "USER_NOT_FOUND");
  assert_eq!(body["detail"], "user not found");

  assert!(!state.store.user_exists("nobody").await.unwrap());
  assert!(state.store.latest_stats("nobody").await.unwrap().is_empty());
}

#[tokio::test]
async fn upstream_failure_is_503() {
  let state = make_state(CannedSource { down: true, ..Default::default() }).await;

  let resp = get(state, "/v2/users/u1/stats").await;
  assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
  assert_eq!(json_body(resp).await["code"], "SERVICE_UNAVAILABLE");
}

// ── Timeseries ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn timeseries_unknown_user_is_404() {
  let state = make_state(CannedSource::default()).await;

  let resp = get(state, "/v2/users/ghost/stats/timeseries").await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  let body = json_body(resp).await;
  assert_eq!(body["code"], "USER_NOT_FOUND");
  assert_eq!(body["detail"], "user not found/not scraped yet.");
}

#[tokio::test]
async fn timeseries_rejects_bad_parameters() {
  let state = make_state(CannedSource::default()).await;
  let cases = [
    ("limit=0", "limit"),
    ("limit=101", "limit"),
    ("limit=abc", "limit"),
    ("before=200&after=100", "before"),
    ("before=nope", "before"),
    ("after=nope", "after"),
  ];

  for (query, field) in cases {
    let resp = get(state.clone(), &format!("/v2/users/u1/stats/timeseries?{query}")).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "query {query}");
    let body = json_body(resp).await;
    assert_eq!(body["code"], "QUERY_PARAMETER_INVALID", "query {query}");
    assert_eq!(body["field"], field, "query {query}");
  }
}

#[tokio::test]
async fn timeseries_lists_snapshots_newest_first() {
  let state = make_state(CannedSource::default()).await;
  for (secs, kills) in [(100, 1.0), (200, 2.0), (300, 3.0)] {
    let rows = HistoryRow::from_snapshot(
      "u1",
      &snapshot(&[("kills", kills), ("map-khidi-games-won", kills)]),
      DateTime::from_timestamp(secs, 0).unwrap(),
    );
    state.store.append_history(&rows).await.unwrap();
  }

  let resp = get(state, "/v2/users/u1/stats/timeseries?before=150&limit=5").await;
  assert_eq!(resp.status(), StatusCode::OK);

  let body = json_body(resp).await;
  let items = body["items"].as_array().unwrap();
  assert_eq!(items.len(), 2);
  assert_eq!(items[0]["timestamp"], json!(300.0));
  assert_eq!(items[1]["timestamp"], json!(200.0));
  assert_eq!(items[0]["general"]["kills_and_deaths"]["kills"], json!(3));
  assert_eq!(items[1]["maps"]["khidi"]["match_results"]["wins"], json!(2));
}

#[tokio::test]
async fn timeseries_repeated_parameter_keeps_first_value() {
  let state = make_state(CannedSource::default()).await;
  for secs in [100, 200, 300] {
    let rows = HistoryRow::from_snapshot(
      "u1",
      &snapshot(&[("kills", 1.0)]),
      DateTime::from_timestamp(secs, 0).unwrap(),
    );
    state.store.append_history(&rows).await.unwrap();
  }

  let resp = get(state.clone(), "/v2/users/u1/stats/timeseries?limit=1&limit=2").await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = json_body(resp).await;
  assert_eq!(body["items"].as_array().unwrap().len(), 1);

  let resp = get(state, "/v2/users/u1/stats/timeseries?limit=0&limit=5").await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body = json_body(resp).await;
  assert_eq!(body["code"], "QUERY_PARAMETER_INVALID");
  assert_eq!(body["field"], "limit");
}

#[tokio::test]
async fn timeseries_past_deadline_is_504() {
  let inner = SqliteStore::open_in_memory().await.unwrap();
  inner
    .append_history(&HistoryRow::from_snapshot(
      "u1",
      &snapshot(&[("kills", 1.0)]),
      DateTime::from_timestamp(100, 0).unwrap(),
    ))
    .await
    .unwrap();
  let state = AppState {
    store:          Arc::new(SlowStore { inner, delay: Duration::from_millis(500) }),
    source:         Arc::new(CannedSource::default()),
    schema:         Arc::new(ProjectionSchema::build(KNOWN_CODES.iter().copied()).unwrap()),
    query_deadline: Some(Duration::from_millis(20)),
  };

  let resp = get(state, "/v2/users/u1/stats/timeseries").await;
  assert_eq!(resp.status(), StatusCode::GATEWAY_TIMEOUT);
  let body = json_body(resp).await;
  assert_eq!(body["code"], "QUERY_TIMEOUT");
  assert!(body.get("items").is_none());
}
