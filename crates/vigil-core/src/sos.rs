//! SOS alerts — urgent location broadcasts, identified or anonymous.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Result, geo};

/// Message stored when a sender provides none.
pub const DEFAULT_SOS_MESSAGE: &str = "No message provided";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SosAlert {
  pub id:         i64,
  /// `None` for alerts sent without authentication.
  pub user_id:    Option<i64>,
  pub message:    String,
  pub latitude:   f64,
  pub longitude:  f64,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSosAlert {
  pub user_id:   Option<i64>,
  pub message:   String,
  pub latitude:  f64,
  pub longitude: f64,
}

impl NewSosAlert {
  pub fn validate(&self) -> Result<()> {
    geo::validate_coordinates(self.latitude, self.longitude)
  }
}
