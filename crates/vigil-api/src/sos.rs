//! Handlers for `/sos` endpoints — urgent alerts, identified or anonymous.

use axum::{
  Json,
  extract::State,
};
use serde::Deserialize;
use serde_json::{Value, json};
use vigil_core::{
  sos::{DEFAULT_SOS_MESSAGE, NewSosAlert, SosAlert},
  store::CrimeStore,
};

use crate::{
  AppState,
  auth::{CurrentUser, MaybeUser, require_admin},
  error::ApiError,
};

#[derive(Debug, Deserialize)]
pub struct SosBody {
  pub latitude:  f64,
  pub longitude: f64,
  pub message:   Option<String>,
}

/// `POST /sos/send_sos` — identity is attached when present, never required.
pub async fn send<S>(
  State(state): State<AppState<S>>,
  MaybeUser(user): MaybeUser,
  Json(body): Json<SosBody>,
) -> Result<Json<Value>, ApiError>
where
  S: CrimeStore + Clone + Send + Sync + 'static,
{
  let input = NewSosAlert {
    user_id:   user.map(|u| u.id),
    message:   body
      .message
      .unwrap_or_else(|| DEFAULT_SOS_MESSAGE.to_string()),
    latitude:  body.latitude,
    longitude: body.longitude,
  };
  input.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

  let alert = state
    .store
    .create_sos_alert(input)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  tracing::warn!(
    "SOS alert {} at ({}, {})",
    alert.id, alert.latitude, alert.longitude
  );

  Ok(Json(json!({
    "message": "SOS alert sent successfully",
    "sos_alert": alert,
  })))
}

/// `GET /sos/sos_alerts` — admin only.
pub async fn list<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<SosAlert>>, ApiError>
where
  S: CrimeStore + Clone + Send + Sync + 'static,
{
  require_admin(&user)?;

  let alerts = state
    .store
    .list_sos_alerts()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(alerts))
}
