use std::future::Future;
use std::time::Duration;

use crate::{Error, GeoPoint};

/// Upper bound on a position query
pub const DEFAULT_GEOLOCATION_TIMEOUT: Duration = Duration::from_secs(10);

/// Source of the user's current position (device GPS, browser, fixed point...).
///
/// Implementations report refusal as [`Error::GeolocationDenied`] and a
/// missing fix as [`Error::GeolocationUnavailable`].
pub trait PositionProvider: Send + Sync {
    fn current_position(&self) -> impl Future<Output = Result<GeoPoint, Error>> + Send;
}

/// A known position, e.g. one supplied with a request
impl PositionProvider for GeoPoint {
    async fn current_position(&self) -> Result<GeoPoint, Error> {
        Ok(*self)
    }
}

/// Queries `provider`, giving up after `timeout`.
///
/// # Errors
///
/// [`Error::GeolocationTimeout`] when no position arrives in time, otherwise
/// whatever the provider reports. Nothing is retried.
pub async fn locate<P: PositionProvider>(
    provider: &P,
    timeout: Duration,
) -> Result<GeoPoint, Error> {
    tokio::time::timeout(timeout, provider.current_position())
        .await
        .map_err(|_| Error::GeolocationTimeout(timeout))?
}
