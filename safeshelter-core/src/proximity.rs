//! Nearest facility lookup.
//!
//! A linear scan is plenty for the tens to low hundreds of markers per layer.

use serde::Serialize;

use crate::geometry::haversine_km;
use crate::{Error, Facility, GeoPoint};

/// The closest facility and its straight-line distance from the user
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Nearest<'a> {
    pub facility: &'a Facility,
    pub distance_km: f64,
}

/// Relative tolerance under which two distances count as equal
pub const TIE_TOLERANCE: f64 = 1e-9;

/// Finds the facility with the smallest great-circle distance to `user`.
///
/// Ties keep the facility that comes first in `facilities`. Distances within
/// [`TIE_TOLERANCE`] of each other (relative) are ties, so a later facility
/// only wins when it is closer beyond floating-point noise.
///
/// # Errors
///
/// Returns [`Error::EmptyCollection`] when `facilities` is empty. This is an
/// informational condition for the caller, not a failure.
pub fn find_nearest(user: GeoPoint, facilities: &[Facility]) -> Result<Nearest<'_>, Error> {
    let mut best: Option<Nearest<'_>> = None;

    for facility in facilities {
        let distance_km = haversine_km(user, facility.location);
        match best {
            Some(current) if !strictly_closer(distance_km, current.distance_km) => {}
            _ => {
                best = Some(Nearest {
                    facility,
                    distance_km,
                });
            }
        }
    }

    best.ok_or(Error::EmptyCollection)
}

fn strictly_closer(candidate_km: f64, current_km: f64) -> bool {
    candidate_km < current_km * (1.0 - TIE_TOLERANCE)
}
