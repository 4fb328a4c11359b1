//! Conversion of raw table rows into [`Facility`] values
//!
//! A row that cannot be turned into a facility is logged and skipped; it
//! never aborts processing of the rest of the collection.

use log::warn;
use serde::Deserialize;
use serde_json::Value;

use super::de::scalar_to_string;
use super::geom::{SourceCrs, extract_point};
use super::raw_types::{FireStationRow, HospitalRow, ShelterRow};
use crate::{Error, Facility, FacilityKind};

/// Facilities parsed from one table plus the number of rows dropped
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseReport {
    pub facilities: Vec<Facility>,
    pub skipped: usize,
}

/// Splits a source payload into rows.
///
/// Accepts a JSON array of rows or a GeoJSON `FeatureCollection`.
///
/// # Errors
///
/// Returns [`Error::InvalidData`] for any other payload shape
pub fn rows_from_payload(payload: Value) -> Result<Vec<Value>, Error> {
    match payload {
        Value::Array(rows) => Ok(rows),
        Value::Object(mut object)
            if object.get("type").and_then(Value::as_str) == Some("FeatureCollection") =>
        {
            match object.remove("features") {
                Some(Value::Array(features)) => Ok(features),
                _ => Err(Error::InvalidData(
                    "FeatureCollection without a features array".to_string(),
                )),
            }
        }
        other => Err(Error::InvalidData(format!(
            "expected an array of records, got {}",
            type_name(&other)
        ))),
    }
}

/// Parses every row of one facility table
pub fn parse_facilities(kind: FacilityKind, rows: &[Value]) -> ParseReport {
    let mut report = ParseReport::default();

    for (index, row) in rows.iter().enumerate() {
        match parse_row(kind, index, row) {
            Ok(facility) => report.facilities.push(facility),
            Err(e) => {
                warn!("Skipping {kind} record #{index}: {e}");
                report.skipped += 1;
            }
        }
    }

    report
}

fn parse_row(kind: FacilityKind, index: usize, row: &Value) -> Result<Facility, Error> {
    match kind {
        FacilityKind::Shelter => parse_shelter(index, row),
        FacilityKind::FireStation => parse_fire_station(index, row),
        FacilityKind::Hospital => parse_hospital(index, row),
    }
}

fn parse_shelter(index: usize, row: &Value) -> Result<Facility, Error> {
    let row = ShelterRow::deserialize(row)?;
    let location = extract_point(&row.geom, SourceCrs::Detect)?;
    let address = row
        .adresse
        .ok_or_else(|| Error::InvalidData("shelter without address".to_string()))?;

    let id = row
        .id
        .or(row.gid)
        .unwrap_or_else(|| fallback_id(FacilityKind::Shelter, index));
    let mut facility = Facility::new(id, FacilityKind::Shelter, location)
        .with_name("Offentlig tilfluktsrom")
        .with_attribute("address", address);
    if let Some(capacity) = row.plasser {
        facility = facility.with_attribute("capacity", capacity);
    }
    if let Some(room) = row.romnr {
        facility = facility.with_attribute("room_number", room);
    }
    Ok(facility)
}

fn parse_fire_station(index: usize, row: &Value) -> Result<Facility, Error> {
    let row = FireStationRow::deserialize(row)?;
    // Station coordinates are stored projected
    let location = extract_point(&row.geom, SourceCrs::Utm32N)?;
    let place = row
        .sted
        .ok_or_else(|| Error::InvalidData("fire station without place name".to_string()))?;

    let id = row
        .id
        .or(row.gid)
        .unwrap_or_else(|| fallback_id(FacilityKind::FireStation, index));
    Ok(Facility::new(id, FacilityKind::FireStation, location)
        .with_name(place)
        .with_attribute(
            "department",
            row.brannvesen.unwrap_or_else(|| "Brannvesen".to_string()),
        )
        .with_attribute(
            "station_type",
            row.stasjonstype.unwrap_or_else(|| "Standard".to_string()),
        ))
}

fn parse_hospital(index: usize, row: &Value) -> Result<Facility, Error> {
    let row = HospitalRow::deserialize(row)?;

    // GeoJSON features keep the geometry and attributes apart
    let geometry = if row.geometry.is_null() {
        &row.geom
    } else {
        &row.geometry
    };
    let location = extract_point(geometry, SourceCrs::Detect)?;

    let property = |key: &str| row.properties.get(key).and_then(scalar_to_string);
    let name = row
        .navn
        .or(row.name)
        .or_else(|| property("name"))
        .or_else(|| property("navn"))
        .unwrap_or_else(|| FacilityKind::Hospital.label().to_string());
    let id = row
        .id
        .or(row.gid)
        .or_else(|| property("id"))
        .unwrap_or_else(|| fallback_id(FacilityKind::Hospital, index));

    let mut facility = Facility::new(id, FacilityKind::Hospital, location).with_name(name);
    if let Value::Object(properties) = &row.properties {
        for (key, value) in properties {
            if key == "name" || key == "navn" || key == "id" {
                continue;
            }
            if let Some(value) = scalar_to_string(value) {
                facility = facility.with_attribute(key.clone(), value);
            }
        }
    }
    Ok(facility)
}

fn fallback_id(kind: FacilityKind, index: usize) -> String {
    format!("{kind}-{index}")
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
