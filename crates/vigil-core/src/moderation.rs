//! Admin moderation: report flags and aggregate statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reason stored when a flagging admin provides none.
pub const DEFAULT_FLAG_REASON: &str = "No reason provided";

/// An admin's flag on a report. Cascades away with the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flag {
  pub id:         i64,
  pub crime_id:   i64,
  /// The flagging admin's user id.
  pub flagged_by: i64,
  pub reason:     String,
  pub is_flagged: bool,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewFlag {
  pub crime_id:   i64,
  pub flagged_by: i64,
  pub reason:     String,
  pub is_flagged: bool,
}

// ─── Statistics ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
  pub latitude:  f64,
  pub longitude: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrimeTypeCount {
  #[serde(rename = "type")]
  pub crime_type: String,
  pub count:      u64,
}

/// A group of reports sharing an exact coordinate pair. Grouping is by
/// literal equality, not spatial clustering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hotspot {
  pub location:    Location,
  pub crime_count: u64,
}

/// Aggregate numbers for the admin dashboard: total report count, top five
/// crime types, top five exact-coordinate groups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Statistics {
  pub total_reports:   u64,
  pub top_crime_types: Vec<CrimeTypeCount>,
  pub hotspots:        Vec<Hotspot>,
}
