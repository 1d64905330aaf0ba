//! Runtime configuration loaded from JSON

use crate::color::rgb888_to_555;
use crate::error::PipelineError;
use crate::pipeline::Viewport;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_WIDTH: u16 = 240;
pub const DEFAULT_HEIGHT: u16 = 160;
pub const DEFAULT_SCALE: u32 = 5;

/// Display and demo settings. Missing fields fall back to defaults, so a
/// file holding only `{"scale": 3}` is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logical canvas width in pixels
    pub width: u16,
    /// Logical canvas height in pixels
    pub height: u16,
    /// Window pixels per canvas pixel
    pub scale: u32,
    pub vsync: bool,
    /// Clear color as 8-bit RGB
    pub background: [u8; 3],
    /// Model file to display instead of the built-in cube
    pub model: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            scale: DEFAULT_SCALE,
            vsync: true,
            background: [0, 0, 0],
            model: None,
        }
    }
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| e.to_string())
    }

    /// Load config from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, String> {
        let json = fs::read_to_string(path).map_err(|e| e.to_string())?;
        Self::from_json(&json)
    }

    /// Save config to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), String> {
        let json = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;
        fs::write(path, json).map_err(|e| e.to_string())
    }

    pub fn viewport(&self) -> Result<Viewport, PipelineError> {
        Viewport::new(self.width, self.height)
    }

    pub fn background_555(&self) -> u16 {
        let [r, g, b] = self.background;
        rgb888_to_555(r, g, b)
    }

    /// Window size in real pixels. Saturates instead of overflowing for
    /// huge scales.
    pub fn window_size(&self) -> (u32, u32) {
        let scale = self.scale.max(1);
        (
            u32::from(self.width).saturating_mul(scale),
            u32::from(self.height).saturating_mul(scale),
        )
    }
}
