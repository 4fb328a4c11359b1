use std::future::Future;
use std::time::Duration;

use log::debug;
use serde::Deserialize;
use serde_json::Value;

use crate::{Error, FacilityKind};

/// Anything that can hand out the raw rows of a facility table
pub trait FacilitySource: Send + Sync {
    fn fetch(&self, kind: FacilityKind) -> impl Future<Output = Result<Value, Error>> + Send;
}

/// Connection settings for the hosted database REST API
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SupabaseConfig {
    pub url: String,
    pub key: String,
    pub shelter_table: String,
    pub fire_station_table: String,
    pub hospital_table: String,
    pub timeout_secs: u64,
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            key: String::new(),
            shelter_table: "tilfluktsrom".to_string(),
            fire_station_table: "brannstasjoner_agder".to_string(),
            hospital_table: "sykehus".to_string(),
            timeout_secs: 20,
        }
    }
}

impl SupabaseConfig {
    pub fn table(&self, kind: FacilityKind) -> &str {
        match kind {
            FacilityKind::Shelter => &self.shelter_table,
            FacilityKind::FireStation => &self.fire_station_table,
            FacilityKind::Hospital => &self.hospital_table,
        }
    }
}

/// Reads facility tables from the hosted database REST endpoint
#[derive(Debug, Clone)]
pub struct SupabaseSource {
    client: reqwest::Client,
    config: SupabaseConfig,
}

impl SupabaseSource {
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] when no database URL is configured or the
    /// HTTP client cannot be built
    pub fn new(config: SupabaseConfig) -> Result<Self, Error> {
        if config.url.is_empty() {
            return Err(Error::InvalidData(
                "database URL is not configured".to_string(),
            ));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::InvalidData(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &SupabaseConfig {
        &self.config
    }

    /// Fetches a whole table as returned by the REST API
    ///
    /// # Errors
    ///
    /// Network failures, non-2xx statuses and non-JSON bodies
    pub async fn fetch_table(&self, table: &str) -> Result<Value, Error> {
        let url = format!("{}/rest/v1/{table}", self.config.url.trim_end_matches('/'));
        debug!("Fetching table {table}");

        let response = self
            .client
            .get(&url)
            .header("apikey", &self.config.key)
            .bearer_auth(&self.config.key)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }
}

impl FacilitySource for SupabaseSource {
    async fn fetch(&self, kind: FacilityKind) -> Result<Value, Error> {
        self.fetch_table(self.config.table(kind)).await
    }
}
