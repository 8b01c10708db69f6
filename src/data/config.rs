use crate::data::assets;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelMode {
    Live,
    Synthetic,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default = "default_settings_key")]
    pub settings_key: String,
    #[serde(default = "default_band_count")]
    pub band_count: usize,
    #[serde(default = "default_level_mode")]
    pub level_mode: LevelMode,
    #[serde(default = "default_smoothing")]
    pub smoothing: f32,
    #[serde(default = "default_preview_frames")]
    pub preview_frames: u32,
    #[serde(default = "default_frame_ms")]
    pub frame_ms: u64,
}

fn default_settings_key() -> String {
    "round-sound-settings".to_string()
}

fn default_band_count() -> usize {
    64
}

fn default_level_mode() -> LevelMode {
    LevelMode::Synthetic
}

fn default_smoothing() -> f32 {
    0.3
}

fn default_preview_frames() -> u32 {
    30
}

fn default_frame_ms() -> u64 {
    33
}

impl Default for Config {
    fn default() -> Self {
        Self {
            settings_key: default_settings_key(),
            band_count: default_band_count(),
            level_mode: default_level_mode(),
            smoothing: default_smoothing(),
            preview_frames: default_preview_frames(),
            frame_ms: default_frame_ms(),
        }
    }
}

impl Config {
    /// Loads `<root>/config/default.toml`, writing the bundled one first if missing.
    /// A file that fails to parse is logged and replaced by defaults in memory.
    pub fn load_or_default(root: &Path) -> Result<Self> {
        let path = assets::ensure_default_config(root)?;
        let raw = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
        Ok(Self::parse_or_default(&raw))
    }

    pub fn parse_or_default(raw: &str) -> Self {
        match toml::from_str::<Self>(raw) {
            Ok(cfg) => cfg.sanitized(),
            Err(e) => {
                log::warn!("config unreadable, using defaults: {e}");
                Self::default()
            }
        }
    }

    fn sanitized(mut self) -> Self {
        if self.band_count == 0 {
            self.band_count = default_band_count();
        }
        self.smoothing = self.smoothing.clamp(0.0, 1.0);
        self
    }
}
