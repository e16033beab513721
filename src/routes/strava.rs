// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava activity routes.
//!
//! The caller passes its own Strava access token as a bearer token; it is
//! forwarded upstream and never stored.

use crate::error::{AppError, Result};
use crate::models::ActivityRecord;
use crate::services::strava::ExternalActivitySummary;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

const DEFAULT_LIST_LIMIT: u32 = 10;
/// Strava caps `per_page` at 200.
const MAX_LIST_LIMIT: u32 = 200;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/strava/activities", get(list_activities))
        .route("/api/strava/activities/{id}", get(get_activity))
}

#[derive(Deserialize)]
struct ListQuery {
    limit: Option<u32>,
}

async fn list_activities(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<ExternalActivitySummary>>> {
    let token = bearer_token(&headers)?;
    let limit = query
        .limit
        .unwrap_or(DEFAULT_LIST_LIMIT)
        .clamp(1, MAX_LIST_LIMIT);

    let activities = state.strava.list_activities(token, limit).await?;
    tracing::debug!(count = activities.len(), limit, "Listed Strava activities");

    Ok(Json(activities))
}

async fn get_activity(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Result<Json<ActivityRecord>> {
    let token = bearer_token(&headers)?;
    let record = state.strava.fetch_activity_record(token, id).await?;
    Ok(Json(record))
}

/// Extract the token from `Authorization: Bearer <token>`.
fn bearer_token(headers: &HeaderMap) -> Result<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AppError::Unauthorized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        assert!(bearer_token(&headers).is_err());

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(bearer_token(&headers).is_err());

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert!(bearer_token(&headers).is_err());

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc123"));
        assert_eq!(bearer_token(&headers).unwrap(), "abc123");
    }
}
