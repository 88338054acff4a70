//! Great-circle distance on a spherical Earth.
//!
//! Report listing filters candidates by distance in memory; keeping this a
//! pure function lets a storage-side bounding-box pre-filter be added later
//! without changing the contract.

use crate::{Error, Result};

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two coordinates, in kilometres.
///
/// Deterministic and side-effect free. Inputs are degrees.
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
  let dlat = (lat2 - lat1).to_radians();
  let dlon = (lon2 - lon1).to_radians();

  let a = (dlat / 2.0).sin().powi(2)
    + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlon / 2.0).sin().powi(2);

  2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}

/// Check that a coordinate pair lies within the valid ranges.
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<()> {
  if !(-90.0..=90.0).contains(&latitude) {
    return Err(Error::LatitudeOutOfRange(latitude));
  }
  if !(-180.0..=180.0).contains(&longitude) {
    return Err(Error::LongitudeOutOfRange(longitude));
  }
  Ok(())
}
