//! Rows as returned by the hosted database tables

use serde::Deserialize;
use serde_json::Value;

use super::de::deserialize_scalar_string;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct ShelterRow {
    #[serde(deserialize_with = "deserialize_scalar_string")]
    pub id: Option<String>,
    #[serde(deserialize_with = "deserialize_scalar_string")]
    pub gid: Option<String>,
    #[serde(deserialize_with = "deserialize_scalar_string")]
    pub adresse: Option<String>,
    #[serde(deserialize_with = "deserialize_scalar_string")]
    pub plasser: Option<String>,
    #[serde(deserialize_with = "deserialize_scalar_string")]
    pub romnr: Option<String>,
    pub geom: Value,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FireStationRow {
    #[serde(deserialize_with = "deserialize_scalar_string")]
    pub id: Option<String>,
    #[serde(deserialize_with = "deserialize_scalar_string")]
    pub gid: Option<String>,
    #[serde(deserialize_with = "deserialize_scalar_string")]
    pub sted: Option<String>,
    #[serde(deserialize_with = "deserialize_scalar_string")]
    pub brannvesen: Option<String>,
    #[serde(deserialize_with = "deserialize_scalar_string")]
    pub stasjonstype: Option<String>,
    pub geom: Value,
}

/// Hospital rows come either as plain table rows or as GeoJSON features
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct HospitalRow {
    #[serde(deserialize_with = "deserialize_scalar_string")]
    pub id: Option<String>,
    #[serde(deserialize_with = "deserialize_scalar_string")]
    pub gid: Option<String>,
    #[serde(deserialize_with = "deserialize_scalar_string")]
    pub navn: Option<String>,
    #[serde(deserialize_with = "deserialize_scalar_string")]
    pub name: Option<String>,
    pub geom: Value,
    pub geometry: Value,
    pub properties: Value,
}
