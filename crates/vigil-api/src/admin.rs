//! Handlers for `/admin` endpoints — flagging and aggregate statistics.

use axum::{
  Json,
  extract::{Path, State},
};
use serde::Deserialize;
use vigil_core::{
  moderation::{DEFAULT_FLAG_REASON, Flag, NewFlag, Statistics},
  store::CrimeStore,
};

use crate::{
  AppState,
  auth::{CurrentUser, require_admin},
  error::ApiError,
};

fn default_true() -> bool { true }

#[derive(Debug, Deserialize)]
pub struct FlagBody {
  pub reason:     Option<String>,
  #[serde(default = "default_true")]
  pub is_flagged: bool,
}

/// `POST /admin/crime/{id}/flag` — admin only; 404 on a missing report.
pub async fn flag<S>(
  State(state): State<AppState<S>>,
  Path(crime_id): Path<i64>,
  CurrentUser(user): CurrentUser,
  Json(body): Json<FlagBody>,
) -> Result<Json<Flag>, ApiError>
where
  S: CrimeStore + Clone + Send + Sync + 'static,
{
  require_admin(&user)?;

  let input = NewFlag {
    crime_id,
    flagged_by: user.id,
    reason: body
      .reason
      .unwrap_or_else(|| DEFAULT_FLAG_REASON.to_string()),
    is_flagged: body.is_flagged,
  };

  let flag = state
    .store
    .flag_report(input)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound("Crime not found".to_string()))?;

  Ok(Json(flag))
}

/// `GET /admin/crimes/flagged` — any authenticated caller.
pub async fn flagged<S>(
  State(state): State<AppState<S>>,
  CurrentUser(_user): CurrentUser,
) -> Result<Json<Vec<Flag>>, ApiError>
where
  S: CrimeStore + Clone + Send + Sync + 'static,
{
  let flags = state
    .store
    .flagged_reports()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(flags))
}

/// `GET /admin/statistics` — admin only: totals, top categories, hotspots.
pub async fn statistics<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
) -> Result<Json<Statistics>, ApiError>
where
  S: CrimeStore + Clone + Send + Sync + 'static,
{
  require_admin(&user)?;

  let stats = state
    .store
    .statistics()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(stats))
}
