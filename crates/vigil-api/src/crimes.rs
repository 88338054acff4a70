//! Handlers for `/crime` endpoints.
//!
//! Listing is public; mutation requires authentication and, for update and
//! delete, ownership of the report.

use axum::{
  Json,
  extract::{Path, Query, State},
};
use serde::Deserialize;
use serde_json::{Value, json};
use vigil_core::{
  geo,
  report::{NewReport, Report, ReportPatch},
  store::{CrimeStore, ReportFilter},
};

use crate::{AppState, auth::CurrentUser, error::ApiError};

// ─── Create ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateReportBody {
  pub crime_type:  String,
  pub description: String,
  pub latitude:    f64,
  pub longitude:   f64,
  pub media_url:   Option<String>,
}

/// `POST /crime/crimes`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  Json(body): Json<CreateReportBody>,
) -> Result<Json<Value>, ApiError>
where
  S: CrimeStore + Clone + Send + Sync + 'static,
{
  let input = NewReport {
    user_id:     user.id,
    crime_type:  body.crime_type,
    description: body.description,
    latitude:    body.latitude,
    longitude:   body.longitude,
    media_url:   body.media_url,
  };
  input.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

  let report = state
    .store
    .create_report(input)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok(Json(json!({
    "message": "Crime created successfully",
    "crime": [report],
  })))
}

// ─── List ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub crime_type: Option<String>,
  /// Radius in km; applied with `lat`/`lng` as an in-memory post-filter.
  pub radius:     Option<f64>,
  pub lat:        Option<f64>,
  pub lng:        Option<f64>,
}

/// `GET /crime/` — optional category and geo-radius filters. Candidates are
/// category-filtered by the store, then distance-filtered here.
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Report>>, ApiError>
where
  S: CrimeStore + Clone + Send + Sync + 'static,
{
  let filter = ReportFilter { crime_type: params.crime_type };
  let mut reports = state
    .store
    .list_reports(&filter)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  if let (Some(radius), Some(lat), Some(lng)) = (params.radius, params.lat, params.lng) {
    reports.retain(|r| geo::distance_km(lat, lng, r.latitude, r.longitude) <= radius);
  }

  Ok(Json(reports))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /crime/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Report>, ApiError>
where
  S: CrimeStore + Clone + Send + Sync + 'static,
{
  let report = state
    .store
    .report(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound("Crime not found".to_string()))?;
  Ok(Json(report))
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UpdateReportBody {
  pub crime_type:  Option<String>,
  pub description: Option<String>,
  pub latitude:    Option<f64>,
  pub longitude:   Option<f64>,
  pub media_url:   Option<String>,
}

/// `PUT /crime/{id}` — owner only.
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
  CurrentUser(user): CurrentUser,
  Json(body): Json<UpdateReportBody>,
) -> Result<Json<Report>, ApiError>
where
  S: CrimeStore + Clone + Send + Sync + 'static,
{
  let existing = state
    .store
    .report(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound("Crime not found".to_string()))?;

  if existing.user_id != user.id {
    return Err(ApiError::Forbidden(
      "Not authorized to update this crime".to_string(),
    ));
  }

  let patch = ReportPatch {
    crime_type:  body.crime_type,
    description: body.description,
    latitude:    body.latitude,
    longitude:   body.longitude,
    media_url:   body.media_url,
  };
  patch.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

  let updated = state
    .store
    .update_report(id, patch)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound("Crime not found".to_string()))?;

  Ok(Json(updated))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /crime/{id}` — owner only; cascades to votes and flags.
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
  CurrentUser(user): CurrentUser,
) -> Result<Json<Value>, ApiError>
where
  S: CrimeStore + Clone + Send + Sync + 'static,
{
  let existing = state
    .store
    .report(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound("Crime not found".to_string()))?;

  if existing.user_id != user.id {
    return Err(ApiError::Forbidden(
      "Not authorized to delete this crime".to_string(),
    ));
  }

  state
    .store
    .delete_report(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok(Json(json!({ "message": "Crime deleted successfully" })))
}
