// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod activity;
pub mod style;
pub mod track;

pub use activity::{ActivityRecord, Coordinate};
pub use style::{OverlayStyle, OverlayStyleConfig, OverlayTemplate, Position};
pub use track::{Track, TrackDocument, TrackPoint, TrackSegment};
