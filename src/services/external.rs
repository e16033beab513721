// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava activity → `ActivityRecord` conversion.
//!
//! Upstream totals (distance, moving time, elevation gain) are trusted as-is;
//! only the route shape comes from the decoded polyline.

use crate::models::{ActivityRecord, Coordinate};
use crate::services::metrics::pace;
use serde::Deserialize;

/// Polyline precision used by Strava (1e-5 degrees).
const POLYLINE_PRECISION: u32 = 5;

/// Failure to fetch or decode an external activity.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Invalid or expired access token")]
    Unauthorized,

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid activity payload: {0}")]
    InvalidPayload(String),

    #[error("Failed to decode polyline: {0}")]
    Polyline(String),

    #[error("Activity {0} has no route")]
    MissingRoute(u64),
}

/// Detailed Strava activity response.
#[derive(Debug, Clone, Deserialize)]
pub struct ExternalActivity {
    pub id: u64,
    pub name: String,
    /// Meters
    pub distance: f64,
    /// Seconds
    pub moving_time: f64,
    /// Meters
    #[serde(default)]
    pub total_elevation_gain: f64,
    pub start_date: String,
    #[serde(rename = "type")]
    pub activity_type: String,
    pub map: ExternalMap,
}

impl ExternalActivity {
    /// The encoded route, if the activity has a non-empty summary polyline.
    pub fn get_polyline(&self) -> Option<&str> {
        self.map
            .summary_polyline
            .as_deref()
            .filter(|p| !p.is_empty())
    }
}

/// Activity map data. Only the summary polyline is read; the detailed
/// `polyline` of the detail endpoint is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExternalMap {
    #[serde(default)]
    pub summary_polyline: Option<String>,
}

/// Decode an encoded polyline (precision 5) into coordinates.
pub fn decode_route_polyline(encoded: &str) -> Result<Vec<Coordinate>, RetrievalError> {
    let line = polyline::decode_polyline(encoded, POLYLINE_PRECISION)
        .map_err(|e| RetrievalError::Polyline(e.to_string()))?;

    Ok(line
        .coords()
        .map(|c| Coordinate::new(c.y, c.x))
        .collect())
}

/// Convert a Strava activity to an `ActivityRecord`.
pub fn convert_external_activity(
    activity: &ExternalActivity,
) -> Result<ActivityRecord, RetrievalError> {
    let encoded = activity
        .get_polyline()
        .ok_or(RetrievalError::MissingRoute(activity.id))?;
    let coordinates = decode_route_polyline(encoded)?;
    if coordinates.is_empty() {
        return Err(RetrievalError::MissingRoute(activity.id));
    }

    let distance_meters = activity.distance.max(0.0);
    let duration_seconds = activity.moving_time.max(0.0);

    Ok(ActivityRecord {
        id: activity.id.to_string(),
        name: activity.name.clone(),
        distance_meters,
        duration_seconds,
        elevation_gain_meters: activity.total_elevation_gain.max(0.0),
        pace_seconds_per_km: pace(distance_meters, duration_seconds),
        coordinates,
        start_time: activity.start_date.clone(),
        activity_type: activity.activity_type.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_polyline_reads_summary() {
        let map = ExternalMap {
            summary_polyline: Some("summary".to_string()),
        };
        let mut activity = ExternalActivity {
            id: 1,
            name: "Ride".to_string(),
            distance: 0.0,
            moving_time: 0.0,
            total_elevation_gain: 0.0,
            start_date: "2024-01-15T10:00:00Z".to_string(),
            activity_type: "Ride".to_string(),
            map,
        };
        assert_eq!(activity.get_polyline(), Some("summary"));

        activity.map.summary_polyline = Some(String::new());
        assert_eq!(activity.get_polyline(), None);

        activity.map.summary_polyline = None;
        assert_eq!(activity.get_polyline(), None);
    }

    #[test]
    fn test_zero_distance_pace_guard() {
        let activity: ExternalActivity = serde_json::from_value(serde_json::json!({
            "id": 7,
            "name": "Indoor",
            "distance": 0.0,
            "moving_time": 1800,
            "start_date": "2024-01-15T10:00:00Z",
            "type": "Workout",
            "map": { "summary_polyline": "_p~iF~ps|U" }
        }))
        .unwrap();

        let record = convert_external_activity(&activity).unwrap();
        assert_eq!(record.pace_seconds_per_km, 0.0);
        assert_eq!(record.elevation_gain_meters, 0.0);
        assert_eq!(record.coordinates.len(), 1);
    }
}
