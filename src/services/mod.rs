// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod canvas;
pub mod external;
pub mod geo_math;
pub mod metrics;
pub mod overlay;
pub mod strava;
pub mod track;

pub use external::{convert_external_activity, ExternalActivity, RetrievalError};
pub use overlay::{decode_background, CompositionError, OverlayComposer, RenderedOverlay};
pub use strava::StravaClient;
pub use track::{parse_gpx, parse_track, MalformedInputError};
