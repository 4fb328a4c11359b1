//! Emergency facilities shown as map markers

use std::fmt;
use std::str::FromStr;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use super::GeoPoint;
use crate::Error;

/// Category of a facility. Each kind is loaded from its own table and
/// rendered on its own marker layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacilityKind {
    Shelter,
    FireStation,
    Hospital,
}

impl FacilityKind {
    pub const ALL: [FacilityKind; 3] = [
        FacilityKind::Shelter,
        FacilityKind::FireStation,
        FacilityKind::Hospital,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FacilityKind::Shelter => "shelter",
            FacilityKind::FireStation => "fire_station",
            FacilityKind::Hospital => "hospital",
        }
    }

    /// Display name used in popups and notifications
    pub fn label(self) -> &'static str {
        match self {
            FacilityKind::Shelter => "Tilfluktsrom",
            FacilityKind::FireStation => "Brannstasjon",
            FacilityKind::Hospital => "Sykehus",
        }
    }
}

impl fmt::Display for FacilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FacilityKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "shelter" | "shelters" | "tilfluktsrom" => Ok(FacilityKind::Shelter),
            "fire_station" | "fire_stations" | "firestation" | "brannstasjon"
            | "brannstasjoner" => Ok(FacilityKind::FireStation),
            "hospital" | "hospitals" | "sykehus" => Ok(FacilityKind::Hospital),
            other => Err(Error::InvalidData(format!("unknown facility kind '{other}'"))),
        }
    }
}

/// A shelter, fire station or hospital
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub id: String,
    pub kind: FacilityKind,
    pub location: GeoPoint,
    pub name: String,
    /// Domain attributes from the source record (address, capacity, station type...)
    #[serde(default)]
    pub attributes: HashMap<String, String>,
}

impl Facility {
    pub fn new(id: impl Into<String>, kind: FacilityKind, location: GeoPoint) -> Self {
        Self {
            id: id.into(),
            kind,
            location,
            name: kind.label().to_string(),
            attributes: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Shelter capacity (number of places), when known
    pub fn capacity(&self) -> Option<u32> {
        self.attribute("capacity")
            .and_then(|c| c.trim().parse::<u32>().ok())
    }
}
