use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::GeoPoint;
use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelMode {
    #[default]
    Driving,
    Walking,
}

impl TravelMode {
    /// Profile segment of the routing service URL
    pub fn profile(self) -> &'static str {
        match self {
            TravelMode::Driving => "driving",
            TravelMode::Walking => "foot",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TravelMode::Driving => "driving",
            TravelMode::Walking => "walking",
        }
    }

    /// Norwegian noun used in route notifications ("med bil", "med gange")
    pub fn label(self) -> &'static str {
        match self {
            TravelMode::Driving => "bil",
            TravelMode::Walking => "gange",
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TravelMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "driving" | "car" => Ok(TravelMode::Driving),
            "walking" | "foot" => Ok(TravelMode::Walking),
            other => Err(Error::InvalidData(format!("unknown travel mode '{other}'"))),
        }
    }
}

/// Route between two points as consumed by the map.
///
/// `geometry` is `None` for a straight-line estimate, in which case
/// `fallback` is also set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResult {
    pub distance_meters: f64,
    pub duration_seconds: f64,
    pub geometry: Option<Vec<GeoPoint>>,
    pub mode: TravelMode,
    pub fallback: bool,
}

impl RouteResult {
    pub fn distance_km(&self) -> f64 {
        self.distance_meters / 1000.0
    }

    pub fn duration_minutes(&self) -> f64 {
        self.duration_seconds / 60.0
    }

    pub fn summary(&self) -> RouteSummary {
        RouteSummary::from(self)
    }
}

/// Human readable distance and duration for the directions panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSummary {
    pub distance_text: String,
    pub duration_text: String,
}

impl From<&RouteResult> for RouteSummary {
    fn from(route: &RouteResult) -> Self {
        Self {
            distance_text: format_distance(route.distance_meters),
            duration_text: format_duration(route.duration_seconds),
        }
    }
}

impl fmt::Display for RouteSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, ca. {}", self.distance_text, self.duration_text)
    }
}

/// Kilometres with two decimals above 1 km, whole metres below
pub fn format_distance(meters: f64) -> String {
    let km = meters / 1000.0;
    if km > 1.0 {
        format!("{km:.2} km")
    } else {
        format!("{} m", meters.round())
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_duration(seconds: f64) -> String {
    let total_minutes = (seconds / 60.0).round().max(0.0) as u64;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    if hours > 0 {
        format!("{hours} t {minutes} min")
    } else {
        format!("{minutes} min")
    }
}
