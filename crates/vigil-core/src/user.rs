//! User accounts and roles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Authorisation role attached to every account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  #[default]
  User,
  Admin,
}

impl Role {
  pub fn is_admin(self) -> bool { matches!(self, Role::Admin) }
}

/// A registered account.
///
/// `email` is unique across the store; `username` is not required to be, but
/// is what tokens resolve through.
#[derive(Debug, Clone, Serialize)]
pub struct User {
  pub id:         i64,
  pub fullname:   String,
  pub username:   String,
  pub email:      String,
  pub role:       Role,
  /// Argon2 PHC string. Never serialised into responses.
  #[serde(skip_serializing)]
  pub password_hash: String,
  pub created_at: DateTime<Utc>,
}

/// Input for creating an account. The password is hashed by the caller
/// before it reaches the store.
#[derive(Debug, Clone)]
pub struct NewUser {
  pub fullname:      String,
  pub username:      String,
  pub email:         String,
  pub role:          Role,
  pub password_hash: String,
}

/// Partial profile update; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
  pub fullname:      Option<String>,
  pub username:      Option<String>,
  pub password_hash: Option<String>,
}
