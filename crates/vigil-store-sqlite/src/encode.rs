//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Roles are stored as their
//! lowercase names, IP addresses in their canonical display form.

use chrono::{DateTime, Utc};
use vigil_core::{
  moderation::Flag,
  report::Report,
  sos::SosAlert,
  subscription::Subscription,
  user::{Role, User},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Role ────────────────────────────────────────────────────────────────────

pub fn encode_role(role: Role) -> &'static str {
  match role {
    Role::User => "user",
    Role::Admin => "admin",
  }
}

pub fn decode_role(s: &str) -> Result<Role> {
  match s {
    "user" => Ok(Role::User),
    "admin" => Ok(Role::Admin),
    other => Err(Error::UnknownRole(other.to_string())),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub user_id:       i64,
  pub fullname:      String,
  pub username:      String,
  pub email:         String,
  pub role:          String,
  pub password_hash: String,
  pub created_at:    String,
}

impl RawUser {
  pub fn into_user(self) -> Result<User> {
    Ok(User {
      id:            self.user_id,
      fullname:      self.fullname,
      username:      self.username,
      email:         self.email,
      role:          decode_role(&self.role)?,
      password_hash: self.password_hash,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `crimes` row.
pub struct RawReport {
  pub crime_id:    i64,
  pub user_id:     i64,
  pub crime_type:  String,
  pub description: String,
  pub latitude:    f64,
  pub longitude:   f64,
  pub media_url:   Option<String>,
  pub created_at:  String,
  pub updated_at:  String,
}

impl RawReport {
  pub fn into_report(self) -> Result<Report> {
    Ok(Report {
      id:          self.crime_id,
      user_id:     self.user_id,
      crime_type:  self.crime_type,
      description: self.description,
      latitude:    self.latitude,
      longitude:   self.longitude,
      media_url:   self.media_url,
      created_at:  decode_dt(&self.created_at)?,
      updated_at:  decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw strings read directly from a `subscriptions` row.
pub struct RawSubscription {
  pub id:         i64,
  pub user_id:    i64,
  pub latitude:   f64,
  pub longitude:  f64,
  pub radius:     f64,
  pub is_active:  bool,
  pub created_at: String,
}

impl RawSubscription {
  pub fn into_subscription(self) -> Result<Subscription> {
    Ok(Subscription {
      id:         self.id,
      user_id:    self.user_id,
      latitude:   self.latitude,
      longitude:  self.longitude,
      radius:     self.radius,
      is_active:  self.is_active,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `flags` row.
pub struct RawFlag {
  pub flag_id:    i64,
  pub crime_id:   i64,
  pub flagged_by: i64,
  pub reason:     String,
  pub is_flagged: bool,
  pub created_at: String,
}

impl RawFlag {
  pub fn into_flag(self) -> Result<Flag> {
    Ok(Flag {
      id:         self.flag_id,
      crime_id:   self.crime_id,
      flagged_by: self.flagged_by,
      reason:     self.reason,
      is_flagged: self.is_flagged,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `sos_alerts` row.
pub struct RawSosAlert {
  pub sos_id:     i64,
  pub user_id:    Option<i64>,
  pub message:    String,
  pub latitude:   f64,
  pub longitude:  f64,
  pub created_at: String,
}

impl RawSosAlert {
  pub fn into_alert(self) -> Result<SosAlert> {
    Ok(SosAlert {
      id:         self.sos_id,
      user_id:    self.user_id,
      message:    self.message,
      latitude:   self.latitude,
      longitude:  self.longitude,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}
