// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Normalized activity record shared by the GPX and Strava ingestion paths.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// A single point of a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Coordinate {
    /// Latitude in degrees
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    /// Longitude in degrees
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: f64,
    /// Elevation in meters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation: Option<f64>,
    /// Timestamp (ISO 8601)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl Coordinate {
    /// Coordinate with no elevation or timestamp.
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng,
            elevation: None,
            timestamp: None,
        }
    }
}

/// One recorded activity: route plus derived metrics.
///
/// `coordinates` keeps track order. Distance, elevation, duration and pace
/// are computed from it, or taken from the upstream totals for Strava
/// activities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActivityRecord {
    #[validate(length(min = 1))]
    pub id: String,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    /// Distance in meters
    #[serde(rename = "distance", alias = "distanceMeters")]
    #[validate(range(min = 0.0))]
    pub distance_meters: f64,
    /// Duration in seconds
    #[serde(rename = "duration", alias = "durationSeconds")]
    #[validate(range(min = 0.0))]
    pub duration_seconds: f64,
    /// Total elevation gain in meters
    #[serde(rename = "elevation", alias = "elevationGainMeters")]
    #[validate(range(min = 0.0))]
    pub elevation_gain_meters: f64,
    /// Pace in seconds per kilometer
    #[serde(rename = "pace", alias = "paceSecondsPerKm")]
    #[validate(range(min = 0.0))]
    pub pace_seconds_per_km: f64,
    #[validate(length(min = 1), nested)]
    pub coordinates: Vec<Coordinate>,
    /// Start date/time (ISO 8601)
    pub start_time: String,
    /// Sport type (Ride, Run, Hike, etc.)
    #[serde(rename = "type", alias = "activityType")]
    #[validate(length(min = 1))]
    pub activity_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> ActivityRecord {
        ActivityRecord {
            id: "gpx_1_abc".to_string(),
            name: "Morning Run".to_string(),
            distance_meters: 5000.0,
            duration_seconds: 1800.0,
            elevation_gain_meters: 45.0,
            pace_seconds_per_km: 360.0,
            coordinates: vec![Coordinate::new(37.7749, -122.4194)],
            start_time: "2024-01-15T10:00:00Z".to_string(),
            activity_type: "Run".to_string(),
        }
    }

    #[test]
    fn test_wire_field_names() {
        let json = serde_json::to_value(sample_record()).unwrap();

        assert_eq!(json["distance"], 5000.0);
        assert_eq!(json["duration"], 1800.0);
        assert_eq!(json["elevation"], 45.0);
        assert_eq!(json["pace"], 360.0);
        assert_eq!(json["startTime"], "2024-01-15T10:00:00Z");
        assert_eq!(json["type"], "Run");
        // Absent optional fields are omitted rather than null
        assert!(json["coordinates"][0].get("elevation").is_none());
    }

    #[test]
    fn test_descriptive_aliases_accepted() {
        let json = serde_json::json!({
            "id": "x",
            "name": "Ride",
            "distanceMeters": 1000.0,
            "durationSeconds": 200.0,
            "elevationGainMeters": 10.0,
            "paceSecondsPerKm": 200.0,
            "coordinates": [{ "lat": 1.0, "lng": 2.0 }],
            "startTime": "2024-01-15T10:00:00Z",
            "activityType": "Ride"
        });

        let record: ActivityRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.distance_meters, 1000.0);
        assert_eq!(record.activity_type, "Ride");
    }

    #[test]
    fn test_validation_rejects_bad_records() {
        assert!(sample_record().validate().is_ok());

        let mut empty_route = sample_record();
        empty_route.coordinates.clear();
        assert!(empty_route.validate().is_err());

        let mut negative = sample_record();
        negative.distance_meters = -1.0;
        assert!(negative.validate().is_err());

        let mut off_planet = sample_record();
        off_planet.coordinates[0].lat = 91.0;
        assert!(off_planet.validate().is_err());
    }
}
