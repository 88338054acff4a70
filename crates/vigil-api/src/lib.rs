//! HTTP surface for the vigil crime-reporting backend.
//!
//! Exposes an axum [`Router`] backed by any [`CrimeStore`]. Every mutating
//! route goes through the bearer-token extractors in [`auth`]; read routes
//! (report listing, tallies) are public.

pub mod accounts;
pub mod admin;
pub mod alerts;
pub mod auth;
pub mod crimes;
pub mod error;
pub mod sos;
pub mod token;
pub mod votes;

pub use error::ApiError;
pub use token::{TokenError, TokenService};

use std::{path::PathBuf, sync::Arc};

use axum::{
  Json, Router,
  routing::{get, post, put},
};
use serde::Deserialize;
use serde_json::{Value, json};
use vigil_core::store::CrimeStore;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised once at startup from the TOML
/// file and `VIGIL_*` environment variables. The process refuses to start
/// without the token settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  pub host:              String,
  pub port:              u16,
  pub store_path:        PathBuf,
  pub jwt_secret:        String,
  /// Signing algorithm name, e.g. `HS256`.
  pub jwt_algorithm:     String,
  pub token_ttl_minutes: i64,
}

impl ServerConfig {
  pub fn algorithm(
    &self,
  ) -> Result<jsonwebtoken::Algorithm, jsonwebtoken::errors::Error> {
    self.jwt_algorithm.parse()
  }
}

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: CrimeStore> {
  pub store:  Arc<S>,
  pub tokens: Arc<TokenService>,
}

// ─── Router ──────────────────────────────────────────────────────────────────

async fn home() -> Json<Value> {
  Json(json!({ "message": "Welcome to Crowdsource Crime alert system" }))
}

/// Build the full API router for `state`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: CrimeStore + Clone + Send + Sync + 'static,
{
  Router::new()
    .route("/", get(home))
    // Accounts
    .route("/auth/signup", post(accounts::signup::<S>))
    .route("/auth/login", post(accounts::login::<S>))
    .route("/auth/me", get(accounts::me::<S>))
    .route("/auth/users/me", put(accounts::update_me::<S>))
    // Reports
    .route("/crime/crimes", post(crimes::create::<S>))
    .route("/crime/", get(crimes::list::<S>))
    .route(
      "/crime/{id}",
      get(crimes::get_one::<S>)
        .put(crimes::update::<S>)
        .delete(crimes::delete::<S>),
    )
    // Votes
    .route("/vote/crimes/{id}/vote", post(votes::cast::<S>))
    .route("/vote/crimes/{id}/votes", get(votes::tally::<S>))
    // Alert subscriptions
    .route(
      "/alerts/subscribe",
      post(alerts::subscribe::<S>).get(alerts::get_subscription::<S>),
    )
    // SOS
    .route("/sos/send_sos", post(sos::send::<S>))
    .route("/sos/sos_alerts", get(sos::list::<S>))
    // Moderation
    .route("/admin/crime/{id}/flag", post(admin::flag::<S>))
    .route("/admin/crimes/flagged", get(admin::flagged::<S>))
    .route("/admin/statistics", get(admin::statistics::<S>))
    .with_state(state)
}

// ─── Integration tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use jsonwebtoken::Algorithm;
  use tower::ServiceExt as _;
  use vigil_store_sqlite::SqliteStore;

  async fn make_state() -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    AppState {
      store:  Arc::new(store),
      tokens: Arc::new(TokenService::new("test-secret", Algorithm::HS256, 30)),
    }
  }

  async fn send(
    state: &AppState<SqliteStore>,
    method: &str,
    uri: &str,
    token: Option<&str>,
    forwarded_for: Option<&str>,
    body: Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
      builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    if let Some(ip) = forwarded_for {
      builder = builder.header("x-forwarded-for", ip);
    }

    let request = match body {
      Some(value) => builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(value.to_string()))
        .unwrap(),
      None => builder.body(Body::empty()).unwrap(),
    };

    let response = router(state.clone()).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
      .await
      .unwrap();
    let value = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
  }

  async fn send_json(
    state: &AppState<SqliteStore>,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
  ) -> (StatusCode, Value) {
    send(state, method, uri, token, None, body).await
  }

  async fn signup(state: &AppState<SqliteStore>, username: &str, role: &str) {
    let (status, _) = send_json(
      state,
      "POST",
      "/auth/signup",
      None,
      Some(json!({
        "fullname": format!("{username} example"),
        "username": username,
        "email": format!("{username}@example.com"),
        "password": "hunter2!",
        "role": role,
      })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
  }

  async fn login(state: &AppState<SqliteStore>, username: &str, password: &str) -> String {
    let form = format!("username={username}&password={password}");
    let request = Request::builder()
      .method("POST")
      .uri("/auth/login")
      .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
      .body(Body::from(form))
      .unwrap();

    let response = router(state.clone()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
      .await
      .unwrap();
    let value: Value = serde_json::from_slice(&bytes).unwrap();
    value["access_token"].as_str().unwrap().to_string()
  }

  async fn create_crime(
    state: &AppState<SqliteStore>,
    token: &str,
    crime_type: &str,
    lat: f64,
    lng: f64,
  ) -> i64 {
    let (status, body) = send_json(
      state,
      "POST",
      "/crime/crimes",
      Some(token),
      Some(json!({
        "crime_type": crime_type,
        "description": format!("{crime_type} incident"),
        "latitude": lat,
        "longitude": lng,
      })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "body: {body}");
    body["crime"][0]["id"].as_i64().unwrap()
  }

  // ── Home ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn home_returns_welcome_message() {
    let state = make_state().await;
    let (status, body) = send_json(&state, "GET", "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("Crime alert"));
  }

  // ── Accounts ────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn signup_login_me_roundtrip() {
    let state = make_state().await;
    signup(&state, "alice", "user").await;
    let token = login(&state, "alice", "hunter2!").await;

    let (status, body) = send_json(&state, "GET", "/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");
    assert_eq!(body["email"], "alice@example.com");
    assert_eq!(body["role"], "user");
    // The stored hash never leaves the server.
    assert!(body.get("password_hash").is_none());
  }

  #[tokio::test]
  async fn signup_with_taken_email_is_rejected() {
    let state = make_state().await;
    signup(&state, "alice", "user").await;

    let (status, body) = send_json(
      &state,
      "POST",
      "/auth/signup",
      None,
      Some(json!({
        "fullname": "Other Alice",
        "username": "alice-two",
        "email": "alice@example.com",
        "password": "hunter2!",
      })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Email or username already taken");
  }

  #[tokio::test]
  async fn login_with_wrong_password_is_401() {
    let state = make_state().await;
    signup(&state, "alice", "user").await;

    let form = "username=alice&password=wrong";
    let request = Request::builder()
      .method("POST")
      .uri("/auth/login")
      .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
      .body(Body::from(form))
      .unwrap();
    let response = router(state.clone()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().contains_key(header::WWW_AUTHENTICATE));
  }

  #[tokio::test]
  async fn me_rejects_missing_and_garbage_tokens() {
    let state = make_state().await;

    let (status, _) = send_json(&state, "GET", "/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) =
      send_json(&state, "GET", "/auth/me", Some("not.a.token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn me_rejects_expired_token() {
    let state = make_state().await;
    signup(&state, "alice", "user").await;

    // Same secret, negative TTL: expired at issue.
    let stale = TokenService::new("test-secret", Algorithm::HS256, -5)
      .issue("alice")
      .unwrap();
    let (status, _) = send_json(&state, "GET", "/auth/me", Some(&stale), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn profile_update_and_password_change() {
    let state = make_state().await;
    signup(&state, "alice", "user").await;
    let token = login(&state, "alice", "hunter2!").await;

    let (status, body) = send_json(
      &state,
      "PUT",
      "/auth/users/me",
      Some(&token),
      Some(json!({ "fullname": "Alice Liddell" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fullname"], "Alice Liddell");

    // Wrong old password: rejected before anything is written.
    let (status, body) = send_json(
      &state,
      "PUT",
      "/auth/users/me",
      Some(&token),
      Some(json!({ "old_password": "wrong", "new_password": "correct-horse" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Old password is incorrect");

    let (status, _) = send_json(
      &state,
      "PUT",
      "/auth/users/me",
      Some(&token),
      Some(json!({ "old_password": "hunter2!", "new_password": "correct-horse" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    login(&state, "alice", "correct-horse").await;
  }

  // ── Reports ─────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn creating_a_crime_requires_auth() {
    let state = make_state().await;
    let (status, _) = send_json(
      &state,
      "POST",
      "/crime/crimes",
      None,
      Some(json!({
        "crime_type": "theft",
        "description": "no token",
        "latitude": 0.0,
        "longitude": 0.0,
      })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn create_and_fetch_crime() {
    let state = make_state().await;
    signup(&state, "alice", "user").await;
    let token = login(&state, "alice", "hunter2!").await;

    let id = create_crime(&state, &token, "theft", 51.5074, -0.1278).await;

    let (status, body) =
      send_json(&state, "GET", &format!("/crime/{id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["crime_type"], "theft");

    let (status, body) = send_json(&state, "GET", "/crime/999", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Crime not found");
  }

  #[tokio::test]
  async fn crime_with_invalid_coordinates_is_400() {
    let state = make_state().await;
    signup(&state, "alice", "user").await;
    let token = login(&state, "alice", "hunter2!").await;

    let (status, _) = send_json(
      &state,
      "POST",
      "/crime/crimes",
      Some(&token),
      Some(json!({
        "crime_type": "theft",
        "description": "off the map",
        "latitude": 95.0,
        "longitude": 0.0,
      })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn listing_filters_by_type_and_radius() {
    let state = make_state().await;
    signup(&state, "alice", "user").await;
    let token = login(&state, "alice", "hunter2!").await;

    // One in New York, one in Los Angeles.
    create_crime(&state, &token, "theft", 40.7128, -74.0060).await;
    create_crime(&state, &token, "assault", 34.0522, -118.2437).await;

    let (status, body) = send_json(&state, "GET", "/crime/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (_, body) =
      send_json(&state, "GET", "/crime/?crime_type=theft", None, None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    // 100 km around Manhattan keeps only the New York report.
    let (_, body) = send_json(
      &state,
      "GET",
      "/crime/?radius=100&lat=40.7128&lng=-74.0060",
      None,
      None,
    )
    .await;
    let listed = body.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["crime_type"], "theft");
  }

  #[tokio::test]
  async fn only_the_owner_may_update_a_crime() {
    let state = make_state().await;
    signup(&state, "alice", "user").await;
    signup(&state, "bob", "user").await;
    let alice = login(&state, "alice", "hunter2!").await;
    let bob = login(&state, "bob", "hunter2!").await;

    let id = create_crime(&state, &alice, "theft", 51.5, -0.12).await;

    let (status, body) = send_json(
      &state,
      "PUT",
      &format!("/crime/{id}"),
      Some(&bob),
      Some(json!({ "description": "hijacked" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["detail"], "Not authorized to update this crime");

    let (status, body) = send_json(
      &state,
      "PUT",
      &format!("/crime/{id}"),
      Some(&alice),
      Some(json!({ "description": "corrected" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["description"], "corrected");
  }

  #[tokio::test]
  async fn only_the_owner_may_delete_and_votes_cascade() {
    let state = make_state().await;
    signup(&state, "alice", "user").await;
    signup(&state, "bob", "user").await;
    let alice = login(&state, "alice", "hunter2!").await;
    let bob = login(&state, "bob", "hunter2!").await;

    let id = create_crime(&state, &alice, "theft", 51.5, -0.12).await;

    let (status, _) = send_json(
      &state,
      "POST",
      &format!("/vote/crimes/{id}/vote"),
      Some(&bob),
      Some(json!({ "vote_type": "up" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) =
      send_json(&state, "DELETE", &format!("/crime/{id}"), Some(&bob), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) =
      send_json(&state, "DELETE", &format!("/crime/{id}"), Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) =
      send_json(&state, "GET", &format!("/crime/{id}"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, tally) =
      send_json(&state, "GET", &format!("/vote/crimes/{id}/votes"), None, None).await;
    assert_eq!(tally["total"], json!({}));
  }

  #[tokio::test]
  async fn deleting_a_missing_crime_is_404() {
    let state = make_state().await;
    signup(&state, "alice", "user").await;
    let token = login(&state, "alice", "hunter2!").await;

    let (status, _) =
      send_json(&state, "DELETE", "/crime/999", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  // ── Votes ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn identified_votes_deduplicate_per_user() {
    let state = make_state().await;
    signup(&state, "alice", "user").await;
    let token = login(&state, "alice", "hunter2!").await;
    let id = create_crime(&state, &token, "theft", 51.5, -0.12).await;

    let uri = format!("/vote/crimes/{id}/vote");
    let (status, _) =
      send_json(&state, "POST", &uri, Some(&token), Some(json!({ "vote_type": "up" }))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) =
      send_json(&state, "POST", &uri, Some(&token), Some(json!({ "vote_type": "down" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Vote already cast for this crime");
  }

  #[tokio::test]
  async fn anonymous_votes_deduplicate_per_address() {
    let state = make_state().await;
    signup(&state, "alice", "user").await;
    let token = login(&state, "alice", "hunter2!").await;
    let id = create_crime(&state, &token, "theft", 51.5, -0.12).await;

    let uri = format!("/vote/crimes/{id}/vote");
    let vote = json!({ "vote_type": "up" });

    let (status, _) =
      send(&state, "POST", &uri, None, Some("203.0.113.1"), Some(vote.clone())).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) =
      send(&state, "POST", &uri, None, Some("203.0.113.2"), Some(vote.clone())).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) =
      send(&state, "POST", &uri, None, Some("203.0.113.1"), Some(vote)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn tally_splits_and_combines_identity_classes() {
    let state = make_state().await;
    signup(&state, "alice", "user").await;
    signup(&state, "bob", "user").await;
    let alice = login(&state, "alice", "hunter2!").await;
    let bob = login(&state, "bob", "hunter2!").await;
    let id = create_crime(&state, &alice, "theft", 51.5, -0.12).await;

    let uri = format!("/vote/crimes/{id}/vote");
    send_json(&state, "POST", &uri, Some(&alice), Some(json!({ "vote_type": "up" }))).await;
    send_json(&state, "POST", &uri, Some(&bob), Some(json!({ "vote_type": "up" }))).await;
    send(&state, "POST", &uri, None, Some("203.0.113.9"), Some(json!({ "vote_type": "down" })))
      .await;

    let (status, body) =
      send_json(&state, "GET", &format!("/vote/crimes/{id}/votes"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["authenticated"], json!({ "up": 2 }));
    assert_eq!(body["anonymous"], json!({ "down": 1 }));
    assert_eq!(body["total"], json!({ "up": 2, "down": 1 }));
  }

  // ── Alert subscriptions ─────────────────────────────────────────────────

  #[tokio::test]
  async fn subscription_radius_bounds_are_enforced() {
    let state = make_state().await;
    signup(&state, "alice", "user").await;
    let token = login(&state, "alice", "hunter2!").await;

    for bad in [0.0, 150.0] {
      let (status, _) = send_json(
        &state,
        "POST",
        "/alerts/subscribe",
        Some(&token),
        Some(json!({ "latitude": 51.5, "longitude": -0.12, "radius": bad })),
      )
      .await;
      assert_eq!(status, StatusCode::BAD_REQUEST, "radius {bad}");
    }

    let (status, _) = send_json(
      &state,
      "POST",
      "/alerts/subscribe",
      Some(&token),
      Some(json!({ "latitude": 51.5, "longitude": -0.12, "radius": 10.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
  }

  #[tokio::test]
  async fn subscribing_twice_updates_in_place() {
    let state = make_state().await;
    signup(&state, "alice", "user").await;
    let token = login(&state, "alice", "hunter2!").await;

    let (_, first) = send_json(
      &state,
      "POST",
      "/alerts/subscribe",
      Some(&token),
      Some(json!({ "latitude": 51.5, "longitude": -0.12, "radius": 5.0 })),
    )
    .await;

    let (status, second) = send_json(
      &state,
      "POST",
      "/alerts/subscribe",
      Some(&token),
      Some(json!({ "latitude": 48.85, "longitude": 2.35, "radius": 20.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(second["id"], first["id"]);

    let (status, stored) =
      send_json(&state, "GET", "/alerts/subscribe", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored["radius"], 20.0);
    assert_eq!(stored["latitude"], 48.85);
  }

  #[tokio::test]
  async fn fetching_a_missing_subscription_is_404() {
    let state = make_state().await;
    signup(&state, "alice", "user").await;
    let token = login(&state, "alice", "hunter2!").await;

    let (status, body) =
      send_json(&state, "GET", "/alerts/subscribe", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "No subscription found for the user");
  }

  // ── SOS ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn sos_accepts_anonymous_and_identified_senders() {
    let state = make_state().await;
    signup(&state, "alice", "user").await;
    signup(&state, "watch", "admin").await;
    let alice = login(&state, "alice", "hunter2!").await;
    let admin = login(&state, "watch", "hunter2!").await;

    let (status, body) = send_json(
      &state,
      "POST",
      "/sos/send_sos",
      None,
      Some(json!({ "latitude": 51.5, "longitude": -0.12 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sos_alert"]["user_id"], Value::Null);
    assert_eq!(body["sos_alert"]["message"], "No message provided");

    let (status, _) = send_json(
      &state,
      "POST",
      "/sos/send_sos",
      Some(&alice),
      Some(json!({ "latitude": 51.6, "longitude": -0.13, "message": "trapped" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Listing is admin-only.
    let (status, _) =
      send_json(&state, "GET", "/sos/sos_alerts", Some(&alice), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) =
      send_json(&state, "GET", "/sos/sos_alerts", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
  }

  // ── Moderation ──────────────────────────────────────────────────────────

  #[tokio::test]
  async fn flagging_is_admin_only_and_404s_on_missing_reports() {
    let state = make_state().await;
    signup(&state, "alice", "user").await;
    signup(&state, "watch", "admin").await;
    let alice = login(&state, "alice", "hunter2!").await;
    let admin = login(&state, "watch", "hunter2!").await;

    let id = create_crime(&state, &alice, "theft", 51.5, -0.12).await;

    let (status, _) = send_json(
      &state,
      "POST",
      &format!("/admin/crime/{id}/flag"),
      Some(&alice),
      Some(json!({ "reason": "spam" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send_json(
      &state,
      "POST",
      "/admin/crime/999/flag",
      Some(&admin),
      Some(json!({ "reason": "spam" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Omitted reason falls back to the documented default.
    let (status, flag) = send_json(
      &state,
      "POST",
      &format!("/admin/crime/{id}/flag"),
      Some(&admin),
      Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(flag["reason"], "No reason provided");
    assert_eq!(flag["is_flagged"], true);

    // The flagged list is open to any authenticated caller.
    let (status, listed) =
      send_json(&state, "GET", "/admin/crimes/flagged", Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn statistics_are_admin_only() {
    let state = make_state().await;
    signup(&state, "alice", "user").await;
    signup(&state, "watch", "admin").await;
    let alice = login(&state, "alice", "hunter2!").await;
    let admin = login(&state, "watch", "hunter2!").await;

    create_crime(&state, &alice, "theft", 51.5, -0.12).await;
    create_crime(&state, &alice, "theft", 51.5, -0.12).await;
    create_crime(&state, &alice, "assault", 48.85, 2.35).await;

    let (status, _) =
      send_json(&state, "GET", "/admin/statistics", Some(&alice), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, stats) =
      send_json(&state, "GET", "/admin/statistics", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_reports"], 3);
    assert_eq!(stats["top_crime_types"][0]["type"], "theft");
    assert_eq!(stats["top_crime_types"][0]["count"], 2);
    assert_eq!(stats["hotspots"][0]["crime_count"], 2);
    assert_eq!(stats["hotspots"][0]["location"]["latitude"], 51.5);
  }
}
