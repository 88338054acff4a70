//! Crime reports — the central user-submitted record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Result, geo};

/// A submitted incident report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
  pub id:          i64,
  pub user_id:     i64,
  pub crime_type:  String,
  pub description: String,
  pub latitude:    f64,
  pub longitude:   f64,
  pub media_url:   Option<String>,
  pub created_at:  DateTime<Utc>,
  /// Refreshed on every mutation; always ≥ `created_at`.
  pub updated_at:  DateTime<Utc>,
}

/// Input for creating a report.
#[derive(Debug, Clone)]
pub struct NewReport {
  pub user_id:     i64,
  pub crime_type:  String,
  pub description: String,
  pub latitude:    f64,
  pub longitude:   f64,
  pub media_url:   Option<String>,
}

impl NewReport {
  pub fn validate(&self) -> Result<()> {
    geo::validate_coordinates(self.latitude, self.longitude)
  }
}

/// Partial report update; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ReportPatch {
  pub crime_type:  Option<String>,
  pub description: Option<String>,
  pub latitude:    Option<f64>,
  pub longitude:   Option<f64>,
  pub media_url:   Option<String>,
}

impl ReportPatch {
  /// Validate whichever coordinates the patch supplies. A half-specified
  /// pair is checked against its own range only.
  pub fn validate(&self) -> Result<()> {
    geo::validate_coordinates(
      self.latitude.unwrap_or(0.0),
      self.longitude.unwrap_or(0.0),
    )
  }
}
