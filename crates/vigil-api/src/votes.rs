//! Handlers for `/vote` endpoints.
//!
//! Casting accepts both identified and anonymous callers; the anonymous
//! dedup key is the originating address. Tallies are public.

use axum::{
  Json,
  extract::{Path, State},
};
use serde::Deserialize;
use vigil_core::{
  store::CrimeStore,
  vote::{Vote, VoteTally, VoterIdentity},
};

use crate::{
  AppState,
  auth::{ClientIp, MaybeUser},
  error::ApiError,
};

#[derive(Debug, Deserialize)]
pub struct VoteBody {
  pub vote_type: String,
}

/// `POST /vote/crimes/{id}/vote` — one vote per (report, identity).
pub async fn cast<S>(
  State(state): State<AppState<S>>,
  Path(crime_id): Path<i64>,
  MaybeUser(user): MaybeUser,
  ClientIp(ip): ClientIp,
  Json(body): Json<VoteBody>,
) -> Result<Json<Vote>, ApiError>
where
  S: CrimeStore + Clone + Send + Sync + 'static,
{
  let voter = match user {
    Some(user) => VoterIdentity::Identified(user.id),
    None => {
      let ip = ip.ok_or_else(|| {
        ApiError::BadRequest("Cannot determine voter address".to_string())
      })?;
      VoterIdentity::Anonymous(ip)
    }
  };

  let vote = state
    .store
    .cast_vote(crime_id, voter, &body.vote_type)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| {
      ApiError::BadRequest("Vote already cast for this crime".to_string())
    })?;

  Ok(Json(vote))
}

/// `GET /vote/crimes/{id}/votes` — per-type counts, split by identity class
/// and combined. An unknown report id yields empty maps.
pub async fn tally<S>(
  State(state): State<AppState<S>>,
  Path(crime_id): Path<i64>,
) -> Result<Json<VoteTally>, ApiError>
where
  S: CrimeStore + Clone + Send + Sync + 'static,
{
  let tally = state
    .store
    .tally(crime_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(tally))
}
