// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! GPX upload routes.

use crate::error::{AppError, Result};
use crate::models::ActivityRecord;
use crate::services::parse_gpx;
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{multipart::MultipartError, Multipart},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Multipart field carrying the file.
pub const UPLOAD_FIELD: &str = "gpxFile";

const GPX_MIME_TYPE: &str = "application/gpx+xml";

static SAMPLE_GPX: &[u8] = include_bytes!("../../assets/sample_run.gpx");

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/gpx/upload", post(upload_gpx))
        .route("/api/gpx/sample", get(sample_gpx))
}

/// Parsed activity response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActivityDataResponse {
    pub message: String,
    pub activity_data: ActivityRecord,
}

/// Upload a GPX file and parse it into an activity.
///
/// The file is held in memory for the duration of the request only.
async fn upload_gpx(mut multipart: Multipart) -> Result<Json<ActivityDataResponse>> {
    let mut upload: Option<Bytes> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let is_gpx = field.content_type() == Some(GPX_MIME_TYPE)
            || field
                .file_name()
                .is_some_and(|name| name.to_ascii_lowercase().ends_with(".gpx"));
        if !is_gpx {
            return Err(AppError::BadRequest(
                "Only GPX files are allowed".to_string(),
            ));
        }

        upload = Some(field.bytes().await.map_err(multipart_error)?);
        break;
    }

    let bytes = upload.ok_or_else(|| AppError::BadRequest("No file uploaded".to_string()))?;
    tracing::info!(bytes = bytes.len(), "Received GPX upload");

    let activity = parse_gpx(&bytes)?;
    tracing::info!(
        activity_id = %activity.id,
        points = activity.coordinates.len(),
        "GPX file parsed"
    );

    Ok(Json(ActivityDataResponse {
        message: "GPX file parsed successfully".to_string(),
        activity_data: activity,
    }))
}

/// Sample activity for trying the overlay without a file.
async fn sample_gpx() -> Result<Json<ActivityDataResponse>> {
    let activity = parse_gpx(SAMPLE_GPX).map_err(anyhow::Error::from)?;
    Ok(Json(ActivityDataResponse {
        message: "Sample GPX data".to_string(),
        activity_data: activity,
    }))
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::BadRequest("File too large".to_string())
    } else {
        AppError::BadRequest(format!("Upload error: {}", err.body_text()))
    }
}
