//! Bearer-token extractors and the admin gate.
//!
//! `CurrentUser` is the required mode: any missing or failing step is a 401.
//! `MaybeUser` is the optional mode used by endpoints that accept both
//! identified and anonymous actors (voting, SOS): an absent, empty, or
//! invalid token — or one resolving to no user — yields `None` rather than
//! a rejection.

use std::net::{IpAddr, SocketAddr};

use axum::{
  extract::{ConnectInfo, FromRequestParts},
  http::{HeaderMap, header, request::Parts},
};
use vigil_core::{store::CrimeStore, user::User};

use crate::{AppState, error::ApiError};

/// Pull the token out of `Authorization: Bearer <token>`, treating an empty
/// or whitespace-only token as absent.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
  let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
  let token = value.strip_prefix("Bearer ")?.trim();
  (!token.is_empty()).then_some(token)
}

/// Resolve a verified token subject to a stored account.
async fn resolve_user<S>(
  state: &AppState<S>,
  token: &str,
) -> Result<Option<User>, ApiError>
where
  S: CrimeStore + Clone + Send + Sync + 'static,
{
  let username = match state.tokens.verify(token) {
    Ok(username) => username,
    Err(e) => return Err(ApiError::Unauthenticated(e.to_string())),
  };

  state
    .store
    .user_by_username(&username)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))
}

// ─── Required mode ───────────────────────────────────────────────────────────

/// The authenticated caller. Rejects with 401 when absent or unverifiable.
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<AppState<S>> for CurrentUser
where
  S: CrimeStore + Clone + Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let token = bearer_token(&parts.headers)
      .ok_or_else(|| ApiError::Unauthenticated("Not authenticated".to_string()))?;

    let user = resolve_user(state, token)
      .await?
      .ok_or_else(|| ApiError::Unauthenticated("User not found".to_string()))?;

    Ok(CurrentUser(user))
  }
}

// ─── Optional mode ───────────────────────────────────────────────────────────

/// The caller if identifiable, `None` otherwise. Only infrastructure
/// failures reject.
pub struct MaybeUser(pub Option<User>);

impl<S> FromRequestParts<AppState<S>> for MaybeUser
where
  S: CrimeStore + Clone + Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let Some(token) = bearer_token(&parts.headers) else {
      return Ok(MaybeUser(None));
    };

    match resolve_user(state, token).await {
      Ok(user) => Ok(MaybeUser(user)),
      Err(ApiError::Unauthenticated(_)) => Ok(MaybeUser(None)),
      Err(e) => Err(e),
    }
  }
}

// ─── Client address ──────────────────────────────────────────────────────────

/// Originating address of the request, if determinable: the first
/// `X-Forwarded-For` entry, else the connection's peer address. Used as the
/// anonymous voter identity; never rejects.
pub struct ClientIp(pub Option<IpAddr>);

impl<S> FromRequestParts<S> for ClientIp
where
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    _state: &S,
  ) -> Result<Self, Self::Rejection> {
    if let Some(value) = parts
      .headers
      .get("x-forwarded-for")
      .and_then(|v| v.to_str().ok())
      && let Some(first) = value.split(',').next()
      && let Ok(ip) = first.trim().parse()
    {
      return Ok(ClientIp(Some(ip)));
    }

    Ok(ClientIp(
      parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip()),
    ))
  }
}

// ─── Role gate ───────────────────────────────────────────────────────────────

/// Admin-only check, applied after authentication succeeds.
pub fn require_admin(user: &User) -> Result<(), ApiError> {
  if user.role.is_admin() {
    Ok(())
  } else {
    Err(ApiError::Forbidden("Admins only".to_string()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use axum::http::HeaderValue;

  fn headers_with_auth(value: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
    headers
  }

  #[test]
  fn bearer_token_extracts_value() {
    let headers = headers_with_auth("Bearer abc.def.ghi");
    assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));
  }

  #[test]
  fn missing_header_yields_none() {
    assert_eq!(bearer_token(&HeaderMap::new()), None);
  }

  #[test]
  fn empty_token_yields_none() {
    assert_eq!(bearer_token(&headers_with_auth("Bearer ")), None);
    assert_eq!(bearer_token(&headers_with_auth("Bearer    ")), None);
  }

  #[test]
  fn non_bearer_scheme_yields_none() {
    assert_eq!(bearer_token(&headers_with_auth("Basic dXNlcjpwdw==")), None);
  }
}
