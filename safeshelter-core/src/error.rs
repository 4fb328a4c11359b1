use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("No facilities available")]
    EmptyCollection,
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Upstream returned HTTP {0}")]
    HttpStatus(u16),
    #[error("No route found: {0}")]
    NoRoute(String),
    #[error("Malformed geometry: {0}")]
    MalformedGeometry(String),
    #[error("Invalid coordinate: lat={lat}, lng={lng}")]
    InvalidCoordinate { lat: f64, lng: f64 },
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("GeoJSON error: {0}")]
    GeoJsonError(String),
    #[error("Geolocation permission denied")]
    GeolocationDenied,
    #[error("Geolocation unavailable")]
    GeolocationUnavailable,
    #[error("Geolocation timed out after {0:?}")]
    GeolocationTimeout(Duration),
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => Error::HttpStatus(status.as_u16()),
            None => Error::NetworkError(e.to_string()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::InvalidData(e.to_string())
    }
}

impl Error {
    /// Message shown to the user when this condition reaches the map.
    pub fn user_message(&self) -> &'static str {
        match self {
            Error::EmptyCollection => "Ingen data tilgjengelig",
            Error::GeolocationDenied => {
                "Posisjonstilgang nektet. Vennligst aktiver posisjonstjenester."
            }
            Error::GeolocationUnavailable => "Posisjonsinformasjon er utilgjengelig.",
            Error::GeolocationTimeout(_) => "Forespørsel om posisjon tidsavbrutt.",
            Error::NetworkError(_) | Error::HttpStatus(_) | Error::NoRoute(_) => {
                "Kunne ikke kontakte tjenesten. Prøv igjen senere."
            }
            Error::MalformedGeometry(_)
            | Error::InvalidCoordinate { .. }
            | Error::InvalidData(_)
            | Error::GeoJsonError(_) => "Ugyldige data mottatt",
        }
    }

    /// True for the informational conditions that are not failures.
    pub fn is_informational(&self) -> bool {
        matches!(self, Error::EmptyCollection)
    }
}
