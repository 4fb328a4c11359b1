use geo::{Coord, LineString, Point, line_string};
use geojson::{Feature, FeatureCollection, Geometry, GeometryValue};
use serde_json::json;

use crate::{Error, Facility, GeoPoint, RouteResult};

impl RouteResult {
    /// Converts the route to a `GeoJSON` `Feature` with a `LineString` geometry.
    ///
    /// A route without geometry (straight-line estimate) is drawn as a direct
    /// line from `start` to `end`.
    pub fn to_geojson(&self, start: GeoPoint, end: GeoPoint) -> Result<Feature, Error> {
        let geometry = match &self.geometry {
            Some(points) if points.len() > 1 => {
                let coords: Vec<Coord<f64>> = points.iter().map(|&p| p.into()).collect();
                Geometry::new(GeometryValue::from(&LineString::new(coords)))
            }
            _ => create_direct_line_geometry(start, end),
        };

        let value = json!({
            "type": "Feature",
            "geometry": geometry,
            "properties": {
                "mode": self.mode,
                "distance_m": self.distance_meters,
                "duration_s": self.duration_seconds,
                "fallback": self.fallback,
                "summary": self.summary().to_string(),
            }
        });

        serde_json::from_value::<Feature>(value).map_err(|e| Error::GeoJsonError(e.to_string()))
    }

    pub fn to_geojson_string(&self, start: GeoPoint, end: GeoPoint) -> Result<String, Error> {
        serde_json::to_string(&self.to_geojson(start, end)?)
            .map_err(|e| Error::GeoJsonError(e.to_string()))
    }
}

impl Facility {
    /// Marker as a `GeoJSON` point feature carrying the facility attributes
    pub fn to_feature(&self) -> Result<Feature, Error> {
        let geometry = Geometry::new(GeometryValue::from(&Point::from(self.location)));

        let value = json!({
            "type": "Feature",
            "id": self.id,
            "geometry": geometry,
            "properties": {
                "kind": self.kind,
                "name": self.name,
                "attributes": self.attributes,
            }
        });

        serde_json::from_value::<Feature>(value).map_err(|e| Error::GeoJsonError(e.to_string()))
    }
}

/// Marker layer as a `GeoJSON` `FeatureCollection`
pub fn facilities_to_geojson(facilities: &[Facility]) -> Result<FeatureCollection, Error> {
    let features = facilities
        .iter()
        .map(Facility::to_feature)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(FeatureCollection {
        features,
        bbox: None,
        foreign_members: None,
    })
}

fn create_direct_line_geometry(start: GeoPoint, end: GeoPoint) -> Geometry {
    let direct_line = line_string![
        (x: start.lng, y: start.lat),
        (x: end.lng, y: end.lat)
    ];
    Geometry::new(GeometryValue::from(&direct_line))
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;
    use crate::routing::straight_line_route;
    use crate::{FacilityKind, TravelMode};

    fn start() -> GeoPoint {
        GeoPoint::new(58.1599, 8.0182).unwrap()
    }

    fn end() -> GeoPoint {
        GeoPoint::new(58.17, 8.02).unwrap()
    }

    #[test]
    fn fallback_route_is_drawn_as_direct_line() {
        let route = straight_line_route(start(), end(), TravelMode::Driving);
        let json: Value =
            serde_json::from_str(&route.to_geojson_string(start(), end()).unwrap()).unwrap();

        assert_eq!(json["geometry"]["type"], "LineString");
        assert_eq!(
            json["geometry"]["coordinates"],
            serde_json::json!([[8.0182, 58.1599], [8.02, 58.17]])
        );
        assert_eq!(json["properties"]["fallback"], true);
        assert_eq!(json["properties"]["mode"], "driving");
    }

    #[test]
    fn service_geometry_is_kept() {
        let mid = GeoPoint::new(58.165, 8.019).unwrap();
        let route = RouteResult {
            distance_meters: 1500.0,
            duration_seconds: 180.0,
            geometry: Some(vec![start(), mid, end()]),
            mode: TravelMode::Walking,
            fallback: false,
        };
        let json: Value =
            serde_json::from_str(&route.to_geojson_string(start(), end()).unwrap()).unwrap();
        assert_eq!(json["geometry"]["coordinates"].as_array().unwrap().len(), 3);
        assert_eq!(json["properties"]["summary"], "1.50 km, ca. 3 min");
    }

    #[test]
    fn facilities_become_point_features() {
        let facilities = vec![
            Facility::new("1", FacilityKind::Hospital, end()).with_name("Sørlandet sykehus"),
        ];
        let collection = facilities_to_geojson(&facilities).unwrap();
        assert_eq!(collection.features.len(), 1);

        let json = serde_json::to_value(&collection).unwrap();
        let feature = &json["features"][0];
        assert_eq!(feature["geometry"]["type"], "Point");
        assert_eq!(feature["geometry"]["coordinates"], serde_json::json!([8.02, 58.17]));
        assert_eq!(feature["properties"]["name"], "Sørlandet sykehus");
        assert_eq!(feature["properties"]["kind"], "hospital");
    }
}
