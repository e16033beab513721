// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Routeshare: turn GPS tracks and Strava activities into story overlays
//!
//! This crate parses GPX recordings or fetches Strava activities, computes
//! distance, elevation, duration and pace, and renders them with a route
//! map into a 1080x1920 PNG.

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use services::{OverlayComposer, StravaClient};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub strava: StravaClient,
    pub composer: OverlayComposer,
}

impl AppState {
    /// Build state from configuration.
    pub fn new(config: Config) -> Result<Self, services::CompositionError> {
        let strava = StravaClient::new(config.strava_api_base_url.clone(), config.strava_timeout);
        let composer = OverlayComposer::new()?;
        Ok(Self {
            config,
            strava,
            composer,
        })
    }
}
