use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub const FFT_SIZE_OPTIONS: [FftSize; 4] = [FftSize::N1024, FftSize::N2048, FftSize::N4096, FftSize::N8192];

pub const DEFAULT_WNP_PORT: u16 = 8974;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum FftSize {
    N1024,
    N2048,
    N4096,
    N8192,
}

impl FftSize {
    pub fn as_u32(self) -> u32 {
        match self {
            FftSize::N1024 => 1024,
            FftSize::N2048 => 2048,
            FftSize::N4096 => 4096,
            FftSize::N8192 => 8192,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported fft size {0} (expected 1024, 2048, 4096 or 8192)")]
pub struct UnsupportedFftSize(pub u32);

impl TryFrom<u32> for FftSize {
    type Error = UnsupportedFftSize;

    fn try_from(v: u32) -> Result<Self, Self::Error> {
        FFT_SIZE_OPTIONS
            .into_iter()
            .find(|s| s.as_u32() == v)
            .ok_or(UnsupportedFftSize(v))
    }
}

impl From<FftSize> for u32 {
    fn from(s: FftSize) -> u32 {
        s.as_u32()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioSettings {
    pub fft_size: FftSize,
    pub freq_min: f64,
    pub freq_max: f64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            fft_size: FftSize::N2048,
            freq_min: 20.0,
            freq_max: 20000.0,
        }
    }
}

impl AudioSettings {
    /// The store merges without checking this; it is the editor's job to call it.
    pub fn is_valid(&self) -> bool {
        self.freq_min >= 0.0 && self.freq_min < self.freq_max
    }

    pub fn merge(&mut self, patch: AudioSettingsPatch) {
        if let Some(v) = patch.fft_size {
            self.fft_size = v;
        }
        if let Some(v) = patch.freq_min {
            self.freq_min = v;
        }
        if let Some(v) = patch.freq_max {
            self.freq_max = v;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioSettingsPatch {
    pub fft_size: Option<FftSize>,
    pub freq_min: Option<f64>,
    pub freq_max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorScheme {
    pub primary: String,
    pub primary_glow: String,
    pub secondary: String,
    pub accent: String,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            primary: "#ff8c42".to_string(),
            primary_glow: "rgba(255, 140, 66, 0.6)".to_string(),
            secondary: "#ff6b35".to_string(),
            accent: "#ffaa66".to_string(),
        }
    }
}

impl ColorScheme {
    pub fn merge(&mut self, patch: ColorSchemePatch) {
        if let Some(v) = patch.primary {
            self.primary = v;
        }
        if let Some(v) = patch.primary_glow {
            self.primary_glow = v;
        }
        if let Some(v) = patch.secondary {
            self.secondary = v;
        }
        if let Some(v) = patch.accent {
            self.accent = v;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorSchemePatch {
    pub primary: Option<String>,
    pub primary_glow: Option<String>,
    pub secondary: Option<String>,
    pub accent: Option<String>,
}

/// Everything the app persists. `wnp` is the WebNowPlaying integration block and is
/// kept as an untyped map so fields added by newer builds survive a round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    pub audio: AudioSettings,
    pub colors: ColorScheme,
    pub wnp: Map<String, Value>,
}

impl Default for AppSettings {
    fn default() -> Self {
        let mut wnp = Map::new();
        wnp.insert("port".to_string(), Value::from(DEFAULT_WNP_PORT));
        Self {
            audio: AudioSettings::default(),
            colors: ColorScheme::default(),
            wnp,
        }
    }
}

/// Stored form: every section optional so partial blobs merge onto defaults.
#[derive(Debug, Default, Deserialize)]
struct StoredSettings {
    audio: Option<AudioSettingsPatch>,
    colors: Option<ColorSchemePatch>,
    wnp: Option<Map<String, Value>>,
}

impl AppSettings {
    /// Parses a stored blob and shallow-merges each section onto the defaults.
    pub fn from_stored_json(raw: &str) -> serde_json::Result<Self> {
        let stored: StoredSettings = serde_json::from_str(raw)?;
        let mut out = Self::default();
        if let Some(audio) = stored.audio {
            out.audio.merge(audio);
        }
        if let Some(colors) = stored.colors {
            out.colors.merge(colors);
        }
        if let Some(wnp) = stored.wnp {
            out.wnp.extend(wnp);
        }
        Ok(out)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
