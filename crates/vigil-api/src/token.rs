//! Signed bearer tokens with an absolute expiry.
//!
//! Tokens embed the username as `sub` and expire `ttl_minutes` after issue.
//! There is no revocation list: a token stays valid until natural expiry,
//! an accepted limitation (no server-side logout).

use chrono::Utc;
use jsonwebtoken::{
  Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
  /// Bad signature, malformed token, or expired.
  #[error("invalid token")]
  InvalidToken,

  /// The payload decoded but carries no usable subject claim.
  #[error("token payload missing subject")]
  MissingSubject,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
  sub: Option<String>,
  exp: usize,
}

/// Issues and verifies the API's bearer tokens. Secret and algorithm come
/// from [`ServerConfig`](crate::ServerConfig), never from code.
pub struct TokenService {
  encoding:    EncodingKey,
  decoding:    DecodingKey,
  header:      Header,
  validation:  Validation,
  ttl_minutes: i64,
}

impl TokenService {
  pub fn new(secret: &str, algorithm: Algorithm, ttl_minutes: i64) -> Self {
    Self {
      encoding:    EncodingKey::from_secret(secret.as_bytes()),
      decoding:    DecodingKey::from_secret(secret.as_bytes()),
      header:      Header::new(algorithm),
      validation:  Validation::new(algorithm),
      ttl_minutes,
    }
  }

  /// Produce a signed token for `subject`, expiring after the configured TTL.
  pub fn issue(&self, subject: &str) -> Result<String, jsonwebtoken::errors::Error> {
    let expiry = Utc::now() + chrono::Duration::minutes(self.ttl_minutes);
    let claims = Claims {
      sub: Some(subject.to_owned()),
      exp: expiry.timestamp() as usize,
    };
    encode(&self.header, &claims, &self.encoding)
  }

  /// Decode and check signature and expiry, returning the subject.
  pub fn verify(&self, token: &str) -> Result<String, TokenError> {
    let data = decode::<Claims>(token, &self.decoding, &self.validation)
      .map_err(|_| TokenError::InvalidToken)?;

    data
      .claims
      .sub
      .filter(|s| !s.is_empty())
      .ok_or(TokenError::MissingSubject)
  }
}
