//! Error types for `vigil-core`.

use thiserror::Error;

use crate::subscription::{MAX_RADIUS_KM, MIN_RADIUS_KM};

#[derive(Debug, Error)]
pub enum Error {
  #[error("latitude {0} is out of range [-90, 90]")]
  LatitudeOutOfRange(f64),

  #[error("longitude {0} is out of range [-180, 180]")]
  LongitudeOutOfRange(f64),

  #[error("radius {0} km is out of range [{MIN_RADIUS_KM}, {MAX_RADIUS_KM}]")]
  RadiusOutOfRange(f64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
