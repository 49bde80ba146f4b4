use crate::history::DEFAULT_HISTORY_DEPTH;
use crate::model::Color;
use crate::surface::{
    DEFAULT_ERASER_WIDTH, DEFAULT_STROKE_WIDTH, MAX_STROKE_WIDTH, MIN_STROKE_WIDTH,
};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const SETTINGS_FILE_NAME: &str = "mathboard_settings.json";

/// Persisted canvas configuration. Every field has a default so partial
/// or missing settings files still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasSettings {
    #[serde(default = "default_stroke_color")]
    pub stroke_color: Color,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f32,
    #[serde(default = "default_eraser_width")]
    pub eraser_width: f32,
    #[serde(default = "default_background_color")]
    pub background_color: Color,
    #[serde(default = "default_swatches")]
    pub swatches: Vec<Color>,
    #[serde(default = "default_enable_pressure")]
    pub enable_pressure: bool,
    #[serde(default = "default_history_depth")]
    pub history_depth: usize,
    #[serde(default = "default_reveal_delay_ms")]
    pub reveal_delay_ms: u64,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// When enabled the application initialises the logger at debug level.
    #[serde(default)]
    pub debug_logging: bool,
}

fn default_stroke_color() -> Color {
    Color::WHITE
}

fn default_stroke_width() -> f32 {
    DEFAULT_STROKE_WIDTH
}

fn default_eraser_width() -> f32 {
    DEFAULT_ERASER_WIDTH
}

fn default_background_color() -> Color {
    Color::BLACK
}

fn default_swatches() -> Vec<Color> {
    vec![
        Color::WHITE,
        Color::rgba(255, 0, 0, 255),
        Color::rgba(255, 165, 0, 255),
        Color::rgba(255, 255, 0, 255),
        Color::rgba(0, 255, 0, 255),
        Color::rgba(0, 0, 255, 255),
        Color::rgba(128, 0, 128, 255),
        Color::rgba(255, 105, 180, 255),
    ]
}

fn default_enable_pressure() -> bool {
    true
}

fn default_history_depth() -> usize {
    DEFAULT_HISTORY_DEPTH
}

fn default_reveal_delay_ms() -> u64 {
    1000
}

fn default_api_base_url() -> String {
    "http://localhost:8900".to_string()
}

impl Default for CanvasSettings {
    fn default() -> Self {
        CanvasSettings {
            stroke_color: default_stroke_color(),
            stroke_width: default_stroke_width(),
            eraser_width: default_eraser_width(),
            background_color: default_background_color(),
            swatches: default_swatches(),
            enable_pressure: default_enable_pressure(),
            history_depth: default_history_depth(),
            reveal_delay_ms: default_reveal_delay_ms(),
            api_base_url: default_api_base_url(),
            debug_logging: false,
        }
    }
}

impl CanvasSettings {
    /// Clamps persisted values back into their valid ranges.
    pub fn normalize(&mut self) {
        self.stroke_width = self.stroke_width.clamp(MIN_STROKE_WIDTH, MAX_STROKE_WIDTH);
        self.eraser_width = self.eraser_width.clamp(MIN_STROKE_WIDTH, MAX_STROKE_WIDTH);
        self.history_depth = self.history_depth.max(1);
        if self.swatches.is_empty() {
            self.swatches = default_swatches();
        }
    }
}

/// Loads settings from `path`. A missing file yields the defaults.
pub fn load_from_path(path: &Path) -> anyhow::Result<CanvasSettings> {
    if !path.exists() {
        return Ok(CanvasSettings::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read canvas settings from {}", path.display()))?;
    let mut settings: CanvasSettings = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse canvas settings from {}", path.display()))?;
    settings.normalize();
    Ok(settings)
}

pub fn save_to_path(path: &Path, settings: &CanvasSettings) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(settings)?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write canvas settings to {}", path.display()))?;
    Ok(())
}
