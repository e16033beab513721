// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Overlay style configuration, partial overrides, and built-in templates.

use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::{Validate, ValidationError};

/// Vertical anchoring of the overlay content block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Position {
    Top,
    Center,
    #[default]
    Bottom,
}

/// Fully resolved overlay style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct OverlayStyleConfig {
    pub primary_color: String,
    pub secondary_color: String,
    /// Panel fill behind the content block (any supported CSS color)
    pub background_color: String,
    pub font_size: u32,
    pub position: Position,
    pub show_map: bool,
    pub show_stats: bool,
}

static DEFAULT_STYLE: LazyLock<OverlayStyleConfig> = LazyLock::new(|| OverlayStyleConfig {
    primary_color: "#1a1a1a".to_string(),
    secondary_color: "#666666".to_string(),
    background_color: "rgba(255, 255, 255, 0.9)".to_string(),
    font_size: 48,
    position: Position::Bottom,
    show_map: true,
    show_stats: true,
});

impl Default for OverlayStyleConfig {
    fn default() -> Self {
        DEFAULT_STYLE.clone()
    }
}

/// Caller-supplied style where every field is optional.
///
/// Unset fields fall back to the defaults when resolved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct OverlayStyle {
    #[validate(custom(function = "validate_hex_color"))]
    pub primary_color: Option<String>,
    #[validate(custom(function = "validate_hex_color"))]
    pub secondary_color: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub background_color: Option<String>,
    #[validate(range(min = 12, max = 120))]
    pub font_size: Option<u32>,
    pub position: Option<Position>,
    pub show_map: Option<bool>,
    pub show_stats: Option<bool>,
}

impl OverlayStyle {
    /// Merge this partial style over the defaults, field by field.
    pub fn resolve(&self) -> OverlayStyleConfig {
        self.resolve_over(&DEFAULT_STYLE)
    }

    /// Merge this partial style over an arbitrary base.
    pub fn resolve_over(&self, base: &OverlayStyleConfig) -> OverlayStyleConfig {
        OverlayStyleConfig {
            primary_color: self
                .primary_color
                .clone()
                .unwrap_or_else(|| base.primary_color.clone()),
            secondary_color: self
                .secondary_color
                .clone()
                .unwrap_or_else(|| base.secondary_color.clone()),
            background_color: self
                .background_color
                .clone()
                .unwrap_or_else(|| base.background_color.clone()),
            font_size: self.font_size.unwrap_or(base.font_size),
            position: self.position.unwrap_or(base.position),
            show_map: self.show_map.unwrap_or(base.show_map),
            show_stats: self.show_stats.unwrap_or(base.show_stats),
        }
    }
}

impl From<OverlayStyleConfig> for OverlayStyle {
    fn from(config: OverlayStyleConfig) -> Self {
        Self {
            primary_color: Some(config.primary_color),
            secondary_color: Some(config.secondary_color),
            background_color: Some(config.background_color),
            font_size: Some(config.font_size),
            position: Some(config.position),
            show_map: Some(config.show_map),
            show_stats: Some(config.show_stats),
        }
    }
}

/// `#` followed by exactly six hex digits.
fn validate_hex_color(value: &str) -> Result<(), ValidationError> {
    let valid = value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit());
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("hex_color"))
    }
}

/// A named style preset.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct OverlayTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub style: OverlayStyleConfig,
}

static TEMPLATES: LazyLock<Vec<OverlayTemplate>> = LazyLock::new(|| {
    vec![
        OverlayTemplate {
            id: "minimal",
            name: "Minimal",
            description: "Clean, simple design with essential stats",
            style: DEFAULT_STYLE.clone(),
        },
        OverlayTemplate {
            id: "bold",
            name: "Bold",
            description: "High contrast design with large text",
            style: OverlayStyleConfig {
                primary_color: "#ffffff".to_string(),
                secondary_color: "#cccccc".to_string(),
                background_color: "rgba(0, 0, 0, 0.8)".to_string(),
                font_size: 56,
                position: Position::Center,
                show_map: true,
                show_stats: true,
            },
        },
        OverlayTemplate {
            id: "colorful",
            name: "Colorful",
            description: "Vibrant colors with gradient backgrounds",
            style: OverlayStyleConfig {
                primary_color: "#3b82f6".to_string(),
                secondary_color: "#1e40af".to_string(),
                background_color: "rgba(59, 130, 246, 0.1)".to_string(),
                font_size: 52,
                position: Position::Top,
                show_map: true,
                show_stats: true,
            },
        },
    ]
});

impl OverlayTemplate {
    /// All built-in templates.
    pub fn all() -> &'static [OverlayTemplate] {
        &TEMPLATES
    }

    /// Look up a built-in template by id.
    pub fn find(id: &str) -> Option<&'static OverlayTemplate> {
        TEMPLATES.iter().find(|t| t.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_only_override_keeps_defaults() {
        let partial = OverlayStyle {
            position: Some(Position::Top),
            ..Default::default()
        };

        let resolved = partial.resolve();

        assert_eq!(resolved.position, Position::Top);
        assert_eq!(
            resolved,
            OverlayStyleConfig {
                position: Position::Top,
                ..OverlayStyleConfig::default()
            }
        );
    }

    #[test]
    fn test_documented_defaults() {
        let style = OverlayStyle::default().resolve();

        assert_eq!(style.primary_color, "#1a1a1a");
        assert_eq!(style.secondary_color, "#666666");
        assert_eq!(style.font_size, 48);
        assert_eq!(style.position, Position::Bottom);
        assert!(style.show_map);
        assert!(style.show_stats);
    }

    #[test]
    fn test_resolve_does_not_touch_defaults() {
        let loud = OverlayStyle {
            primary_color: Some("#ff0000".to_string()),
            font_size: Some(100),
            ..Default::default()
        };
        let _ = loud.resolve();

        assert_eq!(OverlayStyleConfig::default().primary_color, "#1a1a1a");
        assert_eq!(OverlayStyleConfig::default().font_size, 48);
    }

    #[test]
    fn test_partial_style_from_camel_case_json() {
        let style: OverlayStyle =
            serde_json::from_str(r#"{"position":"center","showMap":false}"#).unwrap();

        assert_eq!(style.position, Some(Position::Center));
        assert_eq!(style.show_map, Some(false));
        assert_eq!(style.primary_color, None);
    }

    #[test]
    fn test_style_validation() {
        let ok = OverlayStyle {
            primary_color: Some("#A1b2C3".to_string()),
            font_size: Some(12),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());

        let too_big = OverlayStyle {
            font_size: Some(121),
            ..Default::default()
        };
        assert!(too_big.validate().is_err());

        let not_hex = OverlayStyle {
            secondary_color: Some("red".to_string()),
            ..Default::default()
        };
        assert!(not_hex.validate().is_err());
    }

    #[test]
    fn test_templates() {
        let ids: Vec<&str> = OverlayTemplate::all().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["minimal", "bold", "colorful"]);

        let bold = OverlayTemplate::find("bold").expect("bold template exists");
        assert_eq!(bold.style.font_size, 56);
        assert_eq!(bold.style.position, Position::Center);

        assert!(OverlayTemplate::find("neon").is_none());
    }
}
