//! Handlers for `/alerts` endpoints — the geo-radius subscription upsert.

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use vigil_core::{
  store::CrimeStore,
  subscription::{Subscription, SubscriptionInput},
};

use crate::{AppState, auth::CurrentUser, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct SubscribeBody {
  pub latitude:  f64,
  pub longitude: f64,
  /// Kilometres.
  pub radius:    f64,
  pub is_active: Option<bool>,
}

/// `POST /alerts/subscribe` — validated upsert; at most one subscription per
/// user, later calls overwrite it in place.
pub async fn subscribe<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  Json(body): Json<SubscribeBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CrimeStore + Clone + Send + Sync + 'static,
{
  let input = SubscriptionInput {
    latitude:  body.latitude,
    longitude: body.longitude,
    radius:    body.radius,
    is_active: body.is_active,
  };
  input.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

  let subscription = state
    .store
    .upsert_subscription(user.id, input)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok((StatusCode::CREATED, Json(subscription)))
}

/// `GET /alerts/subscribe`
pub async fn get_subscription<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
) -> Result<Json<Subscription>, ApiError>
where
  S: CrimeStore + Clone + Send + Sync + 'static,
{
  let subscription = state
    .store
    .subscription_for_user(user.id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound("No subscription found for the user".to_string()))?;

  Ok(Json(subscription))
}
