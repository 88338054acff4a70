//! Geo-radius alert subscriptions — at most one per user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, geo};

pub const MIN_RADIUS_KM: f64 = 0.1;
pub const MAX_RADIUS_KM: f64 = 100.0;

/// A user's alert configuration. The store guarantees at most one row per
/// user; later creations update the existing row in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
  pub id:         i64,
  pub user_id:    i64,
  pub latitude:   f64,
  pub longitude:  f64,
  pub radius:     f64,
  pub is_active:  bool,
  pub created_at: DateTime<Utc>,
}

/// Upsert input. A `None` `is_active` keeps the existing row's value, or
/// defaults to `true` when creating.
#[derive(Debug, Clone)]
pub struct SubscriptionInput {
  pub latitude:  f64,
  pub longitude: f64,
  pub radius:    f64,
  pub is_active: Option<bool>,
}

impl SubscriptionInput {
  pub fn validate(&self) -> Result<()> {
    geo::validate_coordinates(self.latitude, self.longitude)?;
    if !(MIN_RADIUS_KM..=MAX_RADIUS_KM).contains(&self.radius) {
      return Err(Error::RadiusOutOfRange(self.radius));
    }
    Ok(())
  }
}
