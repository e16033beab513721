// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Overlay generation and template routes.

use crate::error::{AppError, Result};
use crate::models::{ActivityRecord, OverlayStyle, OverlayStyleConfig, OverlayTemplate};
use crate::services::{decode_background, RenderedOverlay};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/overlay/generate", post(generate_overlay))
        .route("/api/overlay/generate/custom", post(generate_custom_overlay))
        .route("/api/overlay/templates", get(list_templates))
        .route(
            "/api/overlay/templates/{template_id}/preview",
            post(preview_template),
        )
}

/// Overlay request with an optional partial style.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateOverlayRequest {
    pub activity_data: Option<ActivityRecord>,
    /// Base64 or `data:` URL
    pub background_image: Option<String>,
    #[serde(default)]
    pub overlay_style: OverlayStyle,
}

/// Overlay request where the style is called `customStyle`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomOverlayRequest {
    pub activity_data: Option<ActivityRecord>,
    pub background_image: Option<String>,
    #[serde(default)]
    pub custom_style: OverlayStyle,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRequest {
    pub activity_data: Option<ActivityRecord>,
}

/// A template as listed by the API.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TemplateResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Path of the preview endpoint
    pub preview: String,
    pub style: OverlayStyleConfig,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TemplatesResponse {
    pub templates: Vec<TemplateResponse>,
}

async fn generate_overlay(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<GenerateOverlayRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(req) = payload.map_err(json_error)?;
    let overlay = render(
        &state,
        req.activity_data,
        req.overlay_style,
        req.background_image,
    )
    .await?;

    Ok(png_attachment(overlay, "story-overlay.png"))
}

async fn generate_custom_overlay(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<CustomOverlayRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(req) = payload.map_err(json_error)?;
    let overlay = render(
        &state,
        req.activity_data,
        req.custom_style,
        req.background_image,
    )
    .await?;

    Ok(png_attachment(overlay, "custom-overlay.png"))
}

async fn list_templates() -> Json<TemplatesResponse> {
    let templates = OverlayTemplate::all()
        .iter()
        .map(|t| TemplateResponse {
            id: t.id.to_string(),
            name: t.name.to_string(),
            description: t.description.to_string(),
            preview: format!("/api/overlay/templates/{}/preview", t.id),
            style: t.style.clone(),
        })
        .collect();

    Json(TemplatesResponse { templates })
}

/// Render a template over a transparent canvas.
async fn preview_template(
    State(state): State<Arc<AppState>>,
    Path(template_id): Path<String>,
    payload: std::result::Result<Json<PreviewRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(req) = payload.map_err(json_error)?;
    let template = OverlayTemplate::find(&template_id)
        .ok_or_else(|| AppError::NotFound(format!("Template {} not found", template_id)))?;

    let overlay = render(
        &state,
        req.activity_data,
        OverlayStyle::from(template.style.clone()),
        None,
    )
    .await?;

    Ok((
        [
            (header::CONTENT_TYPE, "image/png"),
            (header::CACHE_CONTROL, "public, max-age=3600"),
        ],
        overlay.png,
    )
        .into_response())
}

/// Validate the request and run the composer off the async runtime.
async fn render(
    state: &Arc<AppState>,
    activity: Option<ActivityRecord>,
    style: OverlayStyle,
    background: Option<String>,
) -> Result<RenderedOverlay> {
    let activity =
        activity.ok_or_else(|| AppError::BadRequest("Activity data is required".to_string()))?;
    activity
        .validate()
        .map_err(|e| AppError::BadRequest(format!("Invalid activity data: {}", e)))?;
    style
        .validate()
        .map_err(|e| AppError::BadRequest(format!("Invalid overlay style: {}", e)))?;

    let background = background
        .as_deref()
        .filter(|b| !b.trim().is_empty())
        .map(decode_background)
        .transpose()?;

    let composer = state.composer.clone();
    let activity_id = activity.id.clone();
    let overlay = tokio::task::spawn_blocking(move || {
        composer.compose(&activity, &style, background.as_deref())
    })
    .await
    .map_err(|e| anyhow::anyhow!("Overlay task failed: {}", e))??;

    tracing::info!(
        activity_id = %activity_id,
        bytes = overlay.png.len(),
        position = ?overlay.style.position,
        "Generated overlay"
    );

    Ok(overlay)
}

fn png_attachment(overlay: RenderedOverlay, filename: &str) -> Response {
    (
        [
            (header::CONTENT_TYPE, "image/png".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        overlay.png,
    )
        .into_response()
}

fn json_error(rejection: JsonRejection) -> AppError {
    AppError::BadRequest(rejection.body_text())
}
