// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Summary metrics derived from an ordered route.
//!
//! Known limitation: a point without elevation counts as elevation 0 for
//! the gain calculation, so gaps in the elevation profile can over- or
//! under-count gain around them.

use crate::models::Coordinate;
use crate::services::geo_math::haversine_distance;
use crate::time_utils::parse_timestamp;

/// Distance, gain, duration and pace of one route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivityMetrics {
    pub distance_meters: f64,
    pub elevation_gain_meters: f64,
    pub duration_seconds: f64,
    pub pace_seconds_per_km: f64,
}

impl ActivityMetrics {
    pub fn from_coordinates(points: &[Coordinate]) -> Self {
        let distance_meters = total_distance(points);
        let duration_seconds = duration(points);

        Self {
            distance_meters,
            elevation_gain_meters: total_elevation_gain(points),
            duration_seconds,
            pace_seconds_per_km: pace(distance_meters, duration_seconds),
        }
    }
}

/// Sum of haversine distances between consecutive points, in meters.
pub fn total_distance(points: &[Coordinate]) -> f64 {
    points
        .windows(2)
        .map(|pair| haversine_distance(&pair[0], &pair[1]))
        .sum()
}

/// Sum of positive elevation deltas between consecutive points, in meters.
pub fn total_elevation_gain(points: &[Coordinate]) -> f64 {
    points
        .windows(2)
        .map(|pair| {
            let previous = pair[0].elevation.unwrap_or(0.0);
            let current = pair[1].elevation.unwrap_or(0.0);
            (current - previous).max(0.0)
        })
        .sum()
}

/// Seconds between the first and last timestamped points.
///
/// Points without a parseable timestamp are skipped. Returns 0 when fewer
/// than two points carry one.
pub fn duration(points: &[Coordinate]) -> f64 {
    let timestamp = |p: &Coordinate| p.timestamp.as_deref().and_then(parse_timestamp);

    let Some((first_index, start)) = points
        .iter()
        .enumerate()
        .find_map(|(i, p)| timestamp(p).map(|t| (i, t)))
    else {
        return 0.0;
    };
    let Some((last_index, end)) = points
        .iter()
        .enumerate()
        .rev()
        .find_map(|(i, p)| timestamp(p).map(|t| (i, t)))
    else {
        return 0.0;
    };

    if last_index <= first_index {
        return 0.0;
    }

    let millis = (end - start).num_milliseconds().max(0);
    (millis as f64 / 1000.0).round()
}

/// Pace in seconds per kilometer, 0 for zero distance.
pub fn pace(distance_meters: f64, duration_seconds: f64) -> f64 {
    if distance_meters == 0.0 {
        return 0.0;
    }
    duration_seconds / (distance_meters / 1000.0)
}
