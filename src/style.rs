use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

const BACKGROUND: &str = "#ffffff";
const STROKE: &str = "#000000";
const TEXT: &str = "#1b1f23";
const ENTITY_FILL: &str = "#d0d7de";
const FILL_OPACITY: f32 = 0.7;
const FONT_FAMILY: &str = "sans-serif";
const FONT_SIZE: f32 = 13.0;
const FIELD_FONT_SIZE: f32 = 10.0;
const TITLE_FONT_SIZE: f32 = 18.0;
const LINE_WIDTH: f32 = 1.5;
const SCALE: f32 = 1000.0;

/// Appearance of the rendered diagram: colors, fonts and the pixel scale.
///
/// All render-side decisions live here; the layout core never sees any of
/// it. Every field has a default so a style file only needs to override
/// what it cares about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagramStyle {
    #[serde(default = "default_background")]
    pub background: String,
    #[serde(default = "default_stroke")]
    pub stroke: String,
    #[serde(default = "default_text")]
    pub text: String,
    /// Fill for entities without a category, or with an unmapped one.
    #[serde(default = "default_entity_fill")]
    pub entity_fill: String,
    #[serde(default = "default_fill_opacity")]
    pub fill_opacity: f32,

    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    #[serde(default = "default_field_font_size")]
    pub field_font_size: f32,
    #[serde(default = "default_title_font_size")]
    pub title_font_size: f32,

    #[serde(default = "default_line_width")]
    pub line_width: f32,
    /// Pixels per diagram unit.
    #[serde(default = "default_scale")]
    pub scale: f32,

    /// Entity category to fill color.
    #[serde(default = "default_category_colors")]
    pub category_colors: BTreeMap<String, String>,
}

fn default_background() -> String {
    BACKGROUND.to_string()
}
fn default_stroke() -> String {
    STROKE.to_string()
}
fn default_text() -> String {
    TEXT.to_string()
}
fn default_entity_fill() -> String {
    ENTITY_FILL.to_string()
}
fn default_fill_opacity() -> f32 {
    FILL_OPACITY
}
fn default_font_family() -> String {
    FONT_FAMILY.to_string()
}
fn default_font_size() -> f32 {
    FONT_SIZE
}
fn default_field_font_size() -> f32 {
    FIELD_FONT_SIZE
}
fn default_title_font_size() -> f32 {
    TITLE_FONT_SIZE
}
fn default_line_width() -> f32 {
    LINE_WIDTH
}
fn default_scale() -> f32 {
    SCALE
}

fn default_category_colors() -> BTreeMap<String, String> {
    [
        ("primary", "#4C9BE8"),
        ("secondary", "#5DBB63"),
        ("tertiary", "#F7C04B"),
        ("support", "#E85D5D"),
        ("relation", "#B19CD9"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

impl Default for DiagramStyle {
    fn default() -> Self {
        Self {
            background: default_background(),
            stroke: default_stroke(),
            text: default_text(),
            entity_fill: default_entity_fill(),
            fill_opacity: default_fill_opacity(),
            font_family: default_font_family(),
            font_size: default_font_size(),
            field_font_size: default_field_font_size(),
            title_font_size: default_title_font_size(),
            line_width: default_line_width(),
            scale: default_scale(),
            category_colors: default_category_colors(),
        }
    }
}

impl DiagramStyle {
    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("Failed to parse style TOML: {}", e))
    }

    pub fn fill_for(&self, category: Option<&str>) -> &str {
        category
            .and_then(|c| self.category_colors.get(c))
            .map(String::as_str)
            .unwrap_or(&self.entity_fill)
    }
}
