// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Track parsing: structural track document → `ActivityRecord`.
//!
//! Only the first segment of the first track is used. Files with several
//! tracks or segments are not merged.

use crate::models::{ActivityRecord, Coordinate, TrackDocument};
use crate::services::metrics::ActivityMetrics;
use crate::time_utils::format_utc_rfc3339;
use chrono::Utc;

/// Fallback name when the track carries none.
pub const UNKNOWN_ACTIVITY_NAME: &str = "Unknown Activity";

/// GPX has no activity type field.
pub const UNKNOWN_ACTIVITY_TYPE: &str = "Unknown";

/// Minimum number of points needed to define a route.
pub const MIN_TRACK_POINTS: usize = 2;

/// Track data that cannot be turned into an activity.
#[derive(Debug, thiserror::Error)]
pub enum MalformedInputError {
    #[error("No tracks found in GPX file")]
    NoTrack,

    #[error("Insufficient track points: found {found}, need at least 2")]
    InsufficientPoints { found: usize },

    #[error("Track point {index} has an invalid coordinate")]
    CoordinateOutOfRange { index: usize },

    #[error("Invalid GPX file: {0}")]
    InvalidGpx(String),
}

/// Read GPX bytes and convert them to an activity.
pub fn parse_gpx(bytes: &[u8]) -> Result<ActivityRecord, MalformedInputError> {
    let doc = TrackDocument::read_gpx(bytes)?;
    parse_track(&doc)
}

/// Convert a track document to an activity.
pub fn parse_track(doc: &TrackDocument) -> Result<ActivityRecord, MalformedInputError> {
    let track = doc.tracks.first().ok_or(MalformedInputError::NoTrack)?;
    let points = track
        .segments
        .first()
        .map(|segment| segment.points.as_slice())
        .unwrap_or_default();

    if points.len() < MIN_TRACK_POINTS {
        return Err(MalformedInputError::InsufficientPoints {
            found: points.len(),
        });
    }

    let coordinates = points
        .iter()
        .enumerate()
        .map(|(index, p)| {
            let valid = p.lat.is_finite()
                && p.lon.is_finite()
                && (-90.0..=90.0).contains(&p.lat)
                && (-180.0..=180.0).contains(&p.lon);
            if !valid {
                return Err(MalformedInputError::CoordinateOutOfRange { index });
            }
            Ok(Coordinate {
                lat: p.lat,
                lng: p.lon,
                elevation: p.elevation,
                timestamp: p.time.clone(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let metrics = ActivityMetrics::from_coordinates(&coordinates);
    let start_time = coordinates[0]
        .timestamp
        .clone()
        .unwrap_or_else(|| format_utc_rfc3339(Utc::now()));
    let name = track
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(UNKNOWN_ACTIVITY_NAME)
        .to_string();

    tracing::debug!(
        points = coordinates.len(),
        tracks = doc.tracks.len(),
        segments = track.segments.len(),
        distance_meters = metrics.distance_meters,
        "Parsed track"
    );

    Ok(ActivityRecord {
        id: generate_activity_id(),
        name,
        distance_meters: metrics.distance_meters,
        duration_seconds: metrics.duration_seconds,
        elevation_gain_meters: metrics.elevation_gain_meters,
        pace_seconds_per_km: metrics.pace_seconds_per_km,
        coordinates,
        start_time,
        activity_type: UNKNOWN_ACTIVITY_TYPE.to_string(),
    })
}

/// Opaque id: `gpx_<unix millis>_<random suffix>`. Not cryptographic.
fn generate_activity_id() -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("gpx_{}_{}", Utc::now().timestamp_millis(), &suffix[..9])
}
