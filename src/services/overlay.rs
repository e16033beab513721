// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Story overlay composition.
//!
//! One synchronous pipeline per call:
//! 1. Merge the partial style over the defaults
//! 2. Lay out the title, route map and stat blocks as one content block
//! 3. Draw them over the background image (or a transparent canvas)
//! 4. Encode the 1080x1920 result as PNG
//!
//! Any failure aborts the whole render; no partial image is returned.

use crate::models::{ActivityRecord, OverlayStyle, OverlayStyleConfig, Position};
use crate::services::canvas::{
    cover_fit, draw_dot, draw_text_centered, fill_rect_blended, parse_css_color, stroke_polyline,
    text_width,
};
use crate::services::geo_math::project_to_viewport;
use ab_glyph::FontRef;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{DynamicImage, ImageFormat, ImageReader, Limits, Rgba, RgbaImage};
use std::io::Cursor;

/// Output size, matching the 9:16 story format.
pub const STORY_WIDTH: u32 = 1080;
pub const STORY_HEIGHT: u32 = 1920;

/// Logical drawing region the route is projected into.
pub const MAP_VIEWPORT_WIDTH: f64 = 800.0;
pub const MAP_VIEWPORT_HEIGHT: f64 = 450.0;
pub const MAP_PADDING: f64 = 40.0;

const CONTENT_MARGIN: u32 = 80;
const PANEL_INSET: u32 = 40;
const SECTION_GAP: u32 = 48;
const RULE_THICKNESS: u32 = 4;
const RULE_GAP: u32 = 32;
const LABEL_GAP: u32 = 8;
const COLUMN_GUTTER: u32 = 16;

/// Stroke width and marker radius in logical map units.
const ROUTE_STROKE_WIDTH: f64 = 12.0;
const MARKER_RADIUS: f64 = 10.0;

const TITLE_MAX_PX: f32 = 72.0;
const TITLE_MAX_CHARS: usize = 20;

const START_MARKER_COLOR: Rgba<u8> = Rgba([0x10, 0xb9, 0x81, 0xff]);
const END_MARKER_COLOR: Rgba<u8> = Rgba([0xef, 0x44, 0x44, 0xff]);

/// Decoded size cap for background images (256 MiB).
const MAX_BACKGROUND_ALLOC: u64 = 256 * 1024 * 1024;

static FONT_DATA: &[u8] = include_bytes!("../../assets/DejaVuSans-Bold.ttf");

/// Failure while laying out or rasterizing an overlay.
#[derive(Debug, thiserror::Error)]
pub enum CompositionError {
    #[error("Failed to load font: {0}")]
    Font(String),

    #[error("Invalid background image: {0}")]
    Background(String),

    #[error("Unsupported {field}: {value}")]
    Color { field: &'static str, value: String },

    #[error("Failed to encode image: {0}")]
    Encode(String),
}

/// A finished overlay image.
#[derive(Debug, Clone)]
pub struct RenderedOverlay {
    /// PNG-encoded image
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Style after merging the caller's overrides
    pub style: OverlayStyleConfig,
}

/// Renders activities into story overlays.
#[derive(Clone)]
pub struct OverlayComposer {
    font: FontRef<'static>,
}

impl OverlayComposer {
    /// Create a composer using the embedded font.
    pub fn new() -> Result<Self, CompositionError> {
        let font =
            FontRef::try_from_slice(FONT_DATA).map_err(|e| CompositionError::Font(e.to_string()))?;
        Ok(Self { font })
    }

    /// Render an overlay for `activity`.
    ///
    /// `background` holds raw encoded image bytes (PNG or JPEG), see
    /// [`decode_background`] for embedded payloads.
    pub fn compose(
        &self,
        activity: &ActivityRecord,
        style: &OverlayStyle,
        background: Option<&[u8]>,
    ) -> Result<RenderedOverlay, CompositionError> {
        let style = style.resolve();
        let palette = Palette::from_style(&style)?;

        let mut canvas = match background {
            Some(bytes) => cover_fit(load_background(bytes)?, STORY_WIDTH, STORY_HEIGHT),
            None => RgbaImage::new(STORY_WIDTH, STORY_HEIGHT),
        };

        let layout = Layout::compute(&self.font, activity, &style);
        self.draw(&mut canvas, activity, &layout, &palette);

        let mut png = Vec::new();
        DynamicImage::ImageRgba8(canvas)
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|e| CompositionError::Encode(e.to_string()))?;

        tracing::debug!(
            activity_id = %activity.id,
            bytes = png.len(),
            map = layout.map.is_some(),
            stats = layout.stats.is_some(),
            "Composed overlay"
        );

        Ok(RenderedOverlay {
            png,
            width: STORY_WIDTH,
            height: STORY_HEIGHT,
            style,
        })
    }

    fn draw(
        &self,
        canvas: &mut RgbaImage,
        activity: &ActivityRecord,
        layout: &Layout,
        palette: &Palette,
    ) {
        let content_x = CONTENT_MARGIN as f64;
        let content_width = (STORY_WIDTH - 2 * CONTENT_MARGIN) as f64;
        let center_x = content_x + content_width / 2.0;

        fill_rect_blended(
            canvas,
            (CONTENT_MARGIN - PANEL_INSET) as i64,
            layout.top - PANEL_INSET as i64,
            STORY_WIDTH - 2 * (CONTENT_MARGIN - PANEL_INSET),
            layout.height + 2 * PANEL_INSET,
            palette.panel,
        );

        let title = &layout.title;
        draw_text_centered(
            canvas,
            &self.font,
            title.px,
            center_x,
            title.y,
            &title.text,
            palette.primary,
        );

        if let Some(map) = &layout.map {
            let scale = content_width / MAP_VIEWPORT_WIDTH;
            let points: Vec<(f64, f64)> = project_to_viewport(
                &activity.coordinates,
                MAP_VIEWPORT_WIDTH,
                MAP_VIEWPORT_HEIGHT,
                MAP_PADDING,
            )
            .into_iter()
            .map(|(x, y)| (content_x + x * scale, map.y as f64 + y * scale))
            .collect();

            stroke_polyline(canvas, &points, ROUTE_STROKE_WIDTH * scale, palette.primary);
            if let (Some(&start), Some(&end)) = (points.first(), points.last()) {
                draw_dot(canvas, start, MARKER_RADIUS * scale, START_MARKER_COLOR);
                draw_dot(canvas, end, MARKER_RADIUS * scale, END_MARKER_COLOR);
            }
        }

        if let Some(stats) = &layout.stats {
            fill_rect_blended(
                canvas,
                content_x as i64,
                stats.y,
                content_width as u32,
                RULE_THICKNESS,
                palette.secondary,
            );

            let column_width = content_width / stats.blocks.len() as f64;
            for (i, block) in stats.blocks.iter().enumerate() {
                let column_center = content_x + column_width * (i as f64 + 0.5);
                draw_text_centered(
                    canvas,
                    &self.font,
                    stats.value_px,
                    column_center,
                    stats.value_y,
                    &block.value,
                    palette.primary,
                );
                draw_text_centered(
                    canvas,
                    &self.font,
                    stats.label_px,
                    column_center,
                    stats.label_y,
                    block.label,
                    palette.secondary,
                );
            }
        }
    }
}

/// Decode background image bytes, refusing images whose pixel data would
/// exceed the allocation cap.
fn load_background(bytes: &[u8]) -> Result<DynamicImage, CompositionError> {
    let mut limits = Limits::default();
    limits.max_alloc = Some(MAX_BACKGROUND_ALLOC);

    let mut reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| CompositionError::Background(e.to_string()))?;
    reader.limits(limits);
    reader
        .decode()
        .map_err(|e| CompositionError::Background(e.to_string()))
}

/// Decode an embedded background payload into raw image bytes.
///
/// Accepts plain base64 or a `data:<mime>;base64,<payload>` URL. ASCII
/// whitespace inside the payload (line breaks from pasting) is ignored.
pub fn decode_background(payload: &str) -> Result<Vec<u8>, CompositionError> {
    let payload = payload.trim();

    let encoded = if let Some(rest) = payload.strip_prefix("data:") {
        let (header, data) = rest.split_once(',').ok_or_else(|| {
            CompositionError::Background("data URL is missing its payload".to_string())
        })?;
        if !header.ends_with(";base64") {
            return Err(CompositionError::Background(
                "data URL must be base64 encoded".to_string(),
            ));
        }
        data
    } else if payload.starts_with("http://") || payload.starts_with("https://") {
        return Err(CompositionError::Background(
            "remote background images are not supported".to_string(),
        ));
    } else {
        payload
    };

    let compact: String = encoded
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let bytes = STANDARD
        .decode(compact)
        .map_err(|e| CompositionError::Background(e.to_string()))?;
    if bytes.is_empty() {
        return Err(CompositionError::Background("empty image payload".to_string()));
    }
    Ok(bytes)
}

/// Distance in kilometers with one decimal.
pub fn format_distance_km(meters: f64) -> String {
    format!("{:.1}", meters / 1000.0)
}

/// `H:MM:SS` from one hour on, `M:SS` below.
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0).round() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

/// Elevation rounded to whole meters.
pub fn format_elevation(meters: f64) -> String {
    format!("{}", meters.round() as i64)
}

/// Resolved style colors.
struct Palette {
    primary: Rgba<u8>,
    secondary: Rgba<u8>,
    panel: Rgba<u8>,
}

impl Palette {
    fn from_style(style: &OverlayStyleConfig) -> Result<Self, CompositionError> {
        let parse = |field: &'static str, value: &str| {
            parse_css_color(value).ok_or_else(|| CompositionError::Color {
                field,
                value: value.to_string(),
            })
        };

        Ok(Self {
            primary: parse("primaryColor", &style.primary_color)?,
            secondary: parse("secondaryColor", &style.secondary_color)?,
            panel: parse("backgroundColor", &style.background_color)?,
        })
    }
}

struct TitleLayout {
    text: String,
    px: f32,
    y: i64,
}

struct MapLayout {
    y: i64,
}

struct StatBlock {
    value: String,
    label: &'static str,
}

struct StatsLayout {
    /// Top of the rule
    y: i64,
    value_px: f32,
    value_y: i64,
    label_px: f32,
    label_y: i64,
    blocks: Vec<StatBlock>,
}

/// Vertical placement of every section of the content block.
struct Layout {
    top: i64,
    height: u32,
    title: TitleLayout,
    map: Option<MapLayout>,
    stats: Option<StatsLayout>,
}

impl Layout {
    fn compute(
        font: &FontRef<'static>,
        activity: &ActivityRecord,
        style: &OverlayStyleConfig,
    ) -> Self {
        let content_width = STORY_WIDTH - 2 * CONTENT_MARGIN;
        let font_size = style.font_size as f32;

        let title_px = (font_size * 1.2).min(TITLE_MAX_PX);
        let title_text = fit_title(font, title_px, &activity.name, content_width);
        let title_height = line_height(title_px);

        let show_map = style.show_map && activity.coordinates.len() >= 2;
        let map_height =
            (MAP_VIEWPORT_HEIGHT * content_width as f64 / MAP_VIEWPORT_WIDTH).round() as u32;

        let blocks = vec![
            StatBlock {
                value: format_distance_km(activity.distance_meters),
                label: "Kilometers",
            },
            StatBlock {
                value: format_duration(activity.duration_seconds),
                label: "Duration",
            },
            StatBlock {
                value: format_elevation(activity.elevation_gain_meters),
                label: "Elevation (m)",
            },
        ];
        let column_width = content_width / blocks.len() as u32 - COLUMN_GUTTER;
        let value_px = shrink_to_fit(
            font,
            font_size * 2.0,
            blocks.iter().map(|b| b.value.as_str()),
            column_width,
        );
        let label_px = shrink_to_fit(
            font,
            font_size * 0.75,
            blocks.iter().map(|b| b.label),
            column_width,
        );
        let stats_height = RULE_THICKNESS
            + RULE_GAP
            + line_height(value_px)
            + LABEL_GAP
            + line_height(label_px);

        let mut height = title_height;
        if show_map {
            height += SECTION_GAP + map_height;
        }
        if style.show_stats {
            height += SECTION_GAP + stats_height;
        }

        let top = match style.position {
            Position::Top => CONTENT_MARGIN as i64,
            Position::Center => (STORY_HEIGHT as i64 - height as i64) / 2,
            Position::Bottom => STORY_HEIGHT as i64 - CONTENT_MARGIN as i64 - height as i64,
        };

        let mut cursor = top + title_height as i64;
        let map = show_map.then(|| {
            let y = cursor + SECTION_GAP as i64;
            cursor = y + map_height as i64;
            MapLayout { y }
        });
        let stats = style.show_stats.then(|| {
            let y = cursor + SECTION_GAP as i64;
            let value_y = y + (RULE_THICKNESS + RULE_GAP) as i64;
            let label_y = value_y + (line_height(value_px) + LABEL_GAP) as i64;
            StatsLayout {
                y,
                value_px,
                value_y,
                label_px,
                label_y,
                blocks,
            }
        });

        Self {
            top,
            height,
            title: TitleLayout {
                text: title_text,
                px: title_px,
                y: top,
            },
            map,
            stats,
        }
    }
}

fn line_height(px: f32) -> u32 {
    (px * 1.2).ceil() as u32
}

/// Largest size up to `px` at which every text fits in `max_width`.
fn shrink_to_fit<'a>(
    font: &FontRef<'static>,
    px: f32,
    texts: impl Iterator<Item = &'a str>,
    max_width: u32,
) -> f32 {
    let widest = texts.map(|t| text_width(font, px, t)).max().unwrap_or(0);
    if widest <= max_width || widest == 0 {
        px
    } else {
        px * max_width as f32 / widest as f32
    }
}

/// Truncate long names to their first characters plus an ellipsis.
fn fit_title(font: &FontRef<'static>, px: f32, name: &str, max_width: u32) -> String {
    if text_width(font, px, name) <= max_width {
        return name.to_string();
    }
    let truncated: String = name.chars().take(TITLE_MAX_CHARS).collect();
    format!("{}...", truncated.trim_end())
}
