// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Structural track document: tracks → segments → points.
//!
//! This is the intermediate form the track parser works on. It can be read
//! from GPX XML or deserialized directly from JSON.

use crate::services::track::MalformedInputError;
use serde::{Deserialize, Serialize};
use std::io::Read;

/// A parsed track file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackDocument {
    #[serde(default)]
    pub tracks: Vec<Track>,
}

/// A named track made of one or more segments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub name: Option<String>,
    #[serde(default)]
    pub segments: Vec<TrackSegment>,
}

/// An unbroken sequence of recorded points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackSegment {
    #[serde(default)]
    pub points: Vec<TrackPoint>,
}

/// A recorded point as it appears in the track file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    pub lat: f64,
    pub lon: f64,
    pub elevation: Option<f64>,
    /// RFC 3339 timestamp
    pub time: Option<String>,
}

impl TrackDocument {
    /// Read a GPX document.
    pub fn read_gpx<R: Read>(reader: R) -> Result<Self, MalformedInputError> {
        let gpx = gpx::read(reader).map_err(|e| MalformedInputError::InvalidGpx(e.to_string()))?;
        Ok(Self::from(gpx))
    }
}

impl From<gpx::Gpx> for TrackDocument {
    fn from(gpx: gpx::Gpx) -> Self {
        let tracks = gpx
            .tracks
            .into_iter()
            .map(|track| Track {
                name: track.name,
                segments: track
                    .segments
                    .into_iter()
                    .map(|segment| TrackSegment {
                        points: segment
                            .points
                            .iter()
                            .map(|pt| TrackPoint {
                                lat: pt.point().y(),
                                lon: pt.point().x(),
                                elevation: pt.elevation,
                                time: pt.time.as_ref().and_then(|t| t.format().ok()),
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect();

        Self { tracks }
    }
}
