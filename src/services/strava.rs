// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava API client for fetching activities.
//!
//! The caller supplies a valid access token; this client does no OAuth
//! exchange or refresh. Every call is a single attempt: failures surface as
//! `RetrievalError` immediately and retries are left to the caller.

use crate::models::ActivityRecord;
use crate::services::external::{convert_external_activity, ExternalActivity, RetrievalError};
use serde::{Deserialize, Serialize};
use std::time::Duration;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Strava API client.
#[derive(Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl StravaClient {
    /// Create a client against the given API base URL.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }

    /// Get a detailed activity by ID.
    pub async fn get_activity(
        &self,
        access_token: &str,
        activity_id: u64,
    ) -> Result<ExternalActivity, RetrievalError> {
        let url = format!("{}/activities/{}", self.base_url, activity_id);
        self.get_json(&url, access_token, &[]).await
    }

    /// Fetch an activity and convert it to an `ActivityRecord`.
    pub async fn fetch_activity_record(
        &self,
        access_token: &str,
        activity_id: u64,
    ) -> Result<ActivityRecord, RetrievalError> {
        let activity = self.get_activity(access_token, activity_id).await?;
        let record = convert_external_activity(&activity)?;
        tracing::info!(
            activity_id,
            points = record.coordinates.len(),
            "Converted Strava activity"
        );
        Ok(record)
    }

    /// List the athlete's most recent activities (first page only).
    pub async fn list_activities(
        &self,
        access_token: &str,
        per_page: u32,
    ) -> Result<Vec<ExternalActivitySummary>, RetrievalError> {
        let url = format!("{}/athlete/activities", self.base_url);
        let query = [("page", "1".to_string()), ("per_page", per_page.to_string())];
        self.get_json(&url, access_token, &query).await
    }

    /// Generic GET request with JSON response.
    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        access_token: &str,
        query: &[(&str, String)],
    ) -> Result<T, RetrievalError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(access_token)
            .query(query)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| RetrievalError::Request(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Check response status and parse JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, RetrievalError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();

            return Err(match status.as_u16() {
                429 => {
                    tracing::warn!("Strava rate limit hit (429)");
                    RetrievalError::RateLimited
                }
                401 => RetrievalError::Unauthorized,
                code => RetrievalError::Status { status: code, body },
            });
        }

        response
            .json()
            .await
            .map_err(|e| RetrievalError::InvalidPayload(e.to_string()))
    }
}

/// Summary activity for list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ExternalActivitySummary {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: u64,
    pub name: String,
    pub distance: f64,
    pub moving_time: f64,
    #[serde(default)]
    pub total_elevation_gain: f64,
    pub start_date: String,
    #[serde(rename = "type")]
    pub activity_type: String,
}
