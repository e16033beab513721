// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Great-circle distance and projection of routes onto a drawing viewport.

use crate::models::Coordinate;
use geo::{BoundingRect, Coord, LineString};

/// Mean Earth radius in meters used by the haversine formula.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Great-circle distance between two coordinates, in meters.
pub fn haversine_distance(a: &Coordinate, b: &Coordinate) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let delta_phi = (b.lat - a.lat).to_radians();
    let delta_lambda = (b.lng - a.lng).to_radians();

    let h = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Geographic bounding box of a route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl ViewportBounds {
    /// Bounding box of the given coordinates, `None` when empty.
    pub fn from_coordinates(coords: &[Coordinate]) -> Option<Self> {
        let line: LineString<f64> = coords
            .iter()
            .map(|c| Coord { x: c.lng, y: c.lat })
            .collect();
        let rect = line.bounding_rect()?;

        Some(Self {
            min_lat: rect.min().y,
            max_lat: rect.max().y,
            min_lng: rect.min().x,
            max_lng: rect.max().x,
        })
    }

    /// Latitude extent, or 1 when all latitudes are equal.
    pub fn lat_range(&self) -> f64 {
        non_degenerate(self.max_lat - self.min_lat)
    }

    /// Longitude extent, or 1 when all longitudes are equal.
    pub fn lng_range(&self) -> f64 {
        non_degenerate(self.max_lng - self.min_lng)
    }
}

fn non_degenerate(range: f64) -> f64 {
    if range > 0.0 {
        range
    } else {
        1.0
    }
}

/// Map a route onto a `width` x `height` drawing region.
///
/// The route is scaled uniformly to fit inside the region minus `padding`
/// on every side and centered along the axis with slack. Y grows downward,
/// so north ends up at the top. Returns an empty vector for fewer than two
/// coordinates.
pub fn project_to_viewport(
    coords: &[Coordinate],
    width: f64,
    height: f64,
    padding: f64,
) -> Vec<(f64, f64)> {
    if coords.len() < 2 {
        return Vec::new();
    }
    let Some(bounds) = ViewportBounds::from_coordinates(coords) else {
        return Vec::new();
    };

    let inner_width = (width - 2.0 * padding).max(0.0);
    let inner_height = (height - 2.0 * padding).max(0.0);

    let scale_x = inner_width / bounds.lng_range();
    let scale_y = inner_height / bounds.lat_range();
    let scale = scale_x.min(scale_y);

    let offset_x = padding + (inner_width - (bounds.max_lng - bounds.min_lng) * scale) / 2.0;
    let offset_y = padding + (inner_height - (bounds.max_lat - bounds.min_lat) * scale) / 2.0;

    coords
        .iter()
        .map(|c| {
            let x = offset_x + (c.lng - bounds.min_lng) * scale;
            let y = offset_y + (bounds.max_lat - c.lat) * scale;
            (x, y)
        })
        .collect()
}
