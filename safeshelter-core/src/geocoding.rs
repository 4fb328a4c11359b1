//! Forward and reverse geocoding against a Nominatim-compatible service

use std::time::Duration;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::routing::DEFAULT_USER_AGENT;
use crate::{Error, GeoPoint};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NominatimConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    /// Comma separated ISO codes passed as `countrycodes`; empty searches worldwide
    pub country_codes: String,
    pub suggestion_limit: usize,
    /// Nominatim's usage policy rejects requests without one
    pub user_agent: String,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            timeout_secs: 10,
            country_codes: "no".to_string(),
            suggestion_limit: 5,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// A geocoding candidate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Place {
    pub display_name: String,
    pub location: GeoPoint,
}

/// Nominatim reports coordinates as decimal strings
#[derive(Debug, Deserialize)]
struct SearchHit {
    display_name: String,
    lat: String,
    lon: String,
}

#[derive(Debug, Deserialize)]
struct ReverseHit {
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl TryFrom<SearchHit> for Place {
    type Error = Error;

    fn try_from(hit: SearchHit) -> Result<Self, Self::Error> {
        let lat = hit.lat.trim().parse::<f64>();
        let lng = hit.lon.trim().parse::<f64>();
        let (Ok(lat), Ok(lng)) = (lat, lng) else {
            return Err(Error::InvalidData(format!(
                "unparseable coordinates '{}', '{}'",
                hit.lat, hit.lon
            )));
        };
        Ok(Place {
            display_name: hit.display_name,
            location: GeoPoint::new(lat, lng)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct NominatimClient {
    client: reqwest::Client,
    config: NominatimConfig,
}

impl NominatimClient {
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] if the HTTP client cannot be built
    pub fn new(config: NominatimConfig) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::InvalidData(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &NominatimConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.config.base_url.trim_end_matches('/'))
    }

    /// Free-text search, best match first. Candidates with unusable
    /// coordinates are left out.
    ///
    /// # Errors
    ///
    /// Network failures, non-2xx statuses and unexpected bodies
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<Place>, Error> {
        let limit = limit.to_string();
        let mut params = vec![("format", "json"), ("q", query), ("limit", limit.as_str())];
        if !self.config.country_codes.is_empty() {
            params.push(("countrycodes", self.config.country_codes.as_str()));
        }

        let response = self.client.get(self.endpoint("search")).query(&params).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus(status.as_u16()));
        }

        let hits: Vec<SearchHit> = response.json().await?;
        debug!("Geocoding '{query}' returned {} hits", hits.len());
        Ok(hits
            .into_iter()
            .filter_map(|hit| {
                Place::try_from(hit)
                    .inspect_err(|e| debug!("Skipping geocoding hit: {e}"))
                    .ok()
            })
            .collect())
    }

    /// Type-ahead suggestions; failures give an empty list
    pub async fn suggestions(&self, query: &str) -> Vec<Place> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        match self.search(query, self.config.suggestion_limit).await {
            Ok(places) => places,
            Err(e) => {
                warn!("Location suggestions for '{query}' failed: {e}");
                Vec::new()
            }
        }
    }

    /// Best match for "go to location"
    pub async fn search_first(&self, query: &str) -> Result<Option<Place>, Error> {
        Ok(self.search(query, 1).await?.into_iter().next())
    }

    /// Address of the place at `point`, if the service knows one
    pub async fn reverse(&self, point: GeoPoint) -> Result<Option<String>, Error> {
        let lat = point.lat.to_string();
        let lon = point.lng.to_string();
        let params = [
            ("format", "json"),
            ("lat", lat.as_str()),
            ("lon", lon.as_str()),
            ("zoom", "18"),
            ("addressdetails", "1"),
        ];

        let response = self.client.get(self.endpoint("reverse")).query(&params).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus(status.as_u16()));
        }

        let hit: ReverseHit = response.json().await?;
        if let Some(reason) = hit.error {
            debug!("Reverse geocoding ({}, {}) found nothing: {reason}", point.lat, point.lng);
        }
        Ok(hit.display_name)
    }
}
