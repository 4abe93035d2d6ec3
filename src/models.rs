//! # Response models
//!
//! Plain `serde` value types returned by the [`Celestial`](crate::celestial::Celestial)
//! operations. Planet queries are wrapped in a GeoJSON `Feature` whose point
//! geometry is the observer site; almanac queries use flat envelopes.
//!
//! ```text
//! PlanetPositionResponse
//! ├── apiversion
//! ├── type = "Feature"
//! ├── geometry { type = "Point", coordinates = [lon, lat] }
//! ├── properties.data  (PlanetPositionData)
//! └── artifact_ref = null
//! ```
use serde::Serialize;

use crate::{
    almanac::{MoonPhaseData, SeasonEvent},
    constants::{AstronomicalUnit, Degree, Hours, Kilometer, API_VERSION},
    events::EventOccurrence,
    photometry::Visibility,
    planet::Planet,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FeatureType {
    Feature,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GeometryType {
    Point,
}

/// Observer site as a GeoJSON point, `[longitude, latitude]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoJsonPoint {
    #[serde(rename = "type")]
    pub kind: GeometryType,
    pub coordinates: [Degree; 2],
}

impl GeoJsonPoint {
    pub fn new(latitude: Degree, longitude: Degree) -> Self {
        GeoJsonPoint {
            kind: GeometryType::Point,
            coordinates: [longitude, latitude],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Properties<T> {
    pub data: T,
}

/// GeoJSON `Feature` carrying one query result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feature<T> {
    pub apiversion: String,
    #[serde(rename = "type")]
    pub kind: FeatureType,
    pub geometry: GeoJsonPoint,
    pub properties: Properties<T>,
    /// Reference filled in by an external result store, always `None` here.
    pub artifact_ref: Option<String>,
}

impl<T> Feature<T> {
    pub fn new(latitude: Degree, longitude: Degree, data: T) -> Self {
        Feature {
            apiversion: API_VERSION.to_string(),
            kind: FeatureType::Feature,
            geometry: GeoJsonPoint::new(latitude, longitude),
            properties: Properties { data },
            artifact_ref: None,
        }
    }

    pub fn data(&self) -> &T {
        &self.properties.data
    }
}

/// Position and observing conditions of a planet at one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanetPositionData {
    pub planet: Planet,
    /// Date as requested, local when a timezone was given.
    pub date: String,
    /// Time as requested, local when a timezone was given.
    pub time: String,
    pub altitude: Degree,
    pub azimuth: Degree,
    pub distance_au: AstronomicalUnit,
    pub distance_km: Kilometer,
    /// Illuminated fraction of the disk, percent.
    pub illumination: f64,
    pub magnitude: f64,
    /// IAU abbreviation or `"N/A"`.
    pub constellation: String,
    pub right_ascension: String,
    pub declination: String,
    pub elongation: Degree,
    pub visibility: Visibility,
}

/// Rise, set and transit times of a planet on one UTC day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanetEventsData {
    pub planet: Planet,
    pub date: String,
    pub events: Vec<EventOccurrence>,
    /// Constellation at 12:00 UTC.
    pub constellation: String,
    /// Magnitude at 12:00 UTC.
    pub magnitude: f64,
}

pub type PlanetPositionResponse = Feature<PlanetPositionData>;
pub type PlanetEventsResponse = Feature<PlanetEventsData>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonsResponse {
    pub apiversion: String,
    pub year: i32,
    pub tz: Hours,
    pub dst: bool,
    pub data: Vec<SeasonEvent>,
}

impl SeasonsResponse {
    pub fn new(year: i32, tz: Option<Hours>, dst: bool, data: Vec<SeasonEvent>) -> Self {
        SeasonsResponse {
            apiversion: API_VERSION.to_string(),
            year,
            tz: tz.unwrap_or(0.0),
            dst,
            data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoonPhasesResponse {
    pub apiversion: String,
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub numphases: usize,
    pub phasedata: Vec<MoonPhaseData>,
}

#[cfg(test)]
mod models_test {
    use super::*;
    use crate::events::Phenomenon;
    use serde_json::json;

    #[test]
    fn test_events_feature_json() {
        let data = PlanetEventsData {
            planet: Planet::Jupiter,
            date: "2024-3-15".into(),
            events: vec![EventOccurrence {
                phen: Phenomenon::UpperTransit,
                time: "17:02".into(),
            }],
            constellation: "Tau".into(),
            magnitude: -2.1,
        };
        let value = serde_json::to_value(Feature::new(48.85, 2.35, data)).unwrap();
        assert_eq!(
            value,
            json!({
                "apiversion": API_VERSION,
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [2.35, 48.85]},
                "properties": {"data": {
                    "planet": "Jupiter",
                    "date": "2024-3-15",
                    "events": [{"phen": "Upper Transit", "time": "17:02"}],
                    "constellation": "Tau",
                    "magnitude": -2.1
                }},
                "artifact_ref": null
            })
        );
    }

    #[test]
    fn test_seasons_defaults() {
        let response = SeasonsResponse::new(2024, None, false, Vec::new());
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["tz"], json!(0.0));
        assert_eq!(value["dst"], json!(false));
        assert_eq!(value["data"], json!([]));
    }
}
