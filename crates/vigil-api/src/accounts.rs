//! Handlers for `/auth` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/auth/signup` | Rejects a taken email or username |
//! | `POST` | `/auth/login` | Form-encoded; returns a bearer token |
//! | `GET`  | `/auth/me` | Caller profile |
//! | `PUT`  | `/auth/users/me` | Partial update; password change checks the old one |

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::{
  Form, Json,
  extract::State,
};
use rand_core::OsRng;
use serde::Deserialize;
use serde_json::{Value, json};
use vigil_core::{
  store::CrimeStore,
  user::{NewUser, Role, User, UserPatch},
};

use crate::{AppState, auth::CurrentUser, error::ApiError};

// ─── Password helpers ────────────────────────────────────────────────────────

pub(crate) fn hash_password(password: &str) -> Result<String, ApiError> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| ApiError::Store(format!("password hashing failed: {e}").into()))
}

pub(crate) fn verify_password(password: &str, hash: &str) -> bool {
  PasswordHash::new(hash)
    .and_then(|parsed| Argon2::default().verify_password(password.as_bytes(), &parsed))
    .is_ok()
}

// ─── Signup ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SignupBody {
  pub fullname: String,
  pub username: String,
  pub email:    String,
  pub password: String,
  #[serde(default)]
  pub role:     Role,
}

/// `POST /auth/signup`
pub async fn signup<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<SignupBody>,
) -> Result<Json<Value>, ApiError>
where
  S: CrimeStore + Clone + Send + Sync + 'static,
{
  let input = NewUser {
    fullname:      body.fullname,
    username:      body.username,
    email:         body.email,
    role:          body.role,
    password_hash: hash_password(&body.password)?,
  };

  let user = state
    .store
    .create_user(input)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::BadRequest("Email or username already taken".to_string()))?;

  tracing::info!("New account: {}", user.username);

  Ok(Json(json!({
    "message": "User created successfully",
    "username": user.username,
  })))
}

// ─── Login ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginForm {
  pub username: String,
  pub password: String,
}

/// `POST /auth/login` — form-encoded credentials, bearer token out.
pub async fn login<S>(
  State(state): State<AppState<S>>,
  Form(form): Form<LoginForm>,
) -> Result<Json<Value>, ApiError>
where
  S: CrimeStore + Clone + Send + Sync + 'static,
{
  let user = state
    .store
    .user_by_username(&form.username)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .filter(|user| verify_password(&form.password, &user.password_hash))
    .ok_or_else(|| {
      ApiError::Unauthenticated("Incorrect username or password".to_string())
    })?;

  let token = state
    .tokens
    .issue(&user.username)
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok(Json(json!({ "access_token": token, "token_type": "bearer" })))
}

// ─── Profile ─────────────────────────────────────────────────────────────────

/// `GET /auth/me`
pub async fn me<S>(CurrentUser(user): CurrentUser) -> Json<User>
where
  S: CrimeStore + Clone + Send + Sync + 'static,
{
  Json(user)
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileBody {
  pub fullname:     Option<String>,
  pub username:     Option<String>,
  pub old_password: Option<String>,
  pub new_password: Option<String>,
}

/// `PUT /auth/users/me` — partial update. Changing the password requires the
/// old one to verify against the stored hash.
pub async fn update_me<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  Json(body): Json<UpdateProfileBody>,
) -> Result<Json<User>, ApiError>
where
  S: CrimeStore + Clone + Send + Sync + 'static,
{
  let mut patch = UserPatch {
    fullname: body.fullname,
    username: body.username,
    password_hash: None,
  };

  if let (Some(old), Some(new)) = (&body.old_password, &body.new_password) {
    if !verify_password(old, &user.password_hash) {
      return Err(ApiError::BadRequest("Old password is incorrect".to_string()));
    }
    patch.password_hash = Some(hash_password(new)?);
  }

  let updated = state
    .store
    .update_user(user.id, patch)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

  Ok(Json(updated))
}
