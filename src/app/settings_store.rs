use crate::audio::levels::AudioConfig;
use crate::data::kv_store::KeyValueStore;
use crate::data::settings::{AppSettings, AudioSettings, AudioSettingsPatch, ColorScheme, ColorSchemePatch};
use crate::ui::colors::generate_color_scheme;
use crate::ui::style::{apply_color_scheme, StyleTarget};
use serde_json::{Map, Value};
use std::sync::mpsc::{self, Receiver, Sender};

/// Owns the live settings. Every mutation persists the whole object, then restyles
/// the root when colors changed, then notifies audio subscribers when audio changed.
pub struct SettingsStore<B: KeyValueStore, T: StyleTarget> {
    settings: AppSettings,
    backend: B,
    key: String,
    style: T,
    audio_subscribers: Vec<Sender<AudioConfig>>,
}

impl<B: KeyValueStore, T: StyleTarget> SettingsStore<B, T> {
    /// Never fails: unreadable or corrupt storage yields defaults.
    pub fn load(backend: B, key: impl Into<String>, style: T) -> Self {
        let key = key.into();
        let settings = read_settings(&backend, &key);
        let mut store = Self {
            settings,
            backend,
            key,
            style,
            audio_subscribers: Vec::new(),
        };
        store.apply_styles();
        store
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn audio(&self) -> &AudioSettings {
        &self.settings.audio
    }

    pub fn colors(&self) -> &ColorScheme {
        &self.settings.colors
    }

    pub fn wnp(&self) -> &Map<String, Value> {
        &self.settings.wnp
    }

    pub fn style(&self) -> &T {
        &self.style
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn subscribe_audio(&mut self) -> Receiver<AudioConfig> {
        let (tx, rx) = mpsc::channel();
        self.audio_subscribers.push(tx);
        rx
    }

    pub fn update_audio_settings(&mut self, patch: AudioSettingsPatch) {
        self.mutate(|s| s.audio.merge(patch));
    }

    /// Replaces the whole colors section with the scheme derived from `hex`.
    pub fn update_primary_color(&mut self, hex: &str) {
        let scheme = generate_color_scheme(hex);
        self.mutate(|s| s.colors = scheme);
    }

    /// Overrides individual colors without re-deriving the rest.
    pub fn update_color_scheme(&mut self, patch: ColorSchemePatch) {
        self.mutate(|s| s.colors.merge(patch));
    }

    pub fn update_wnp_settings(&mut self, patch: Map<String, Value>) {
        self.mutate(|s| s.wnp.extend(patch));
    }

    pub fn reset_to_defaults(&mut self) {
        self.mutate(|s| *s = AppSettings::default());
    }

    fn mutate(&mut self, f: impl FnOnce(&mut AppSettings)) {
        let before_audio = self.settings.audio.clone();
        let before_colors = self.settings.colors.clone();

        f(&mut self.settings);

        self.persist();
        if self.settings.colors != before_colors {
            self.apply_styles();
        }
        if self.settings.audio != before_audio {
            self.notify_audio();
        }
    }

    fn persist(&mut self) {
        let raw = match self.settings.to_json() {
            Ok(raw) => raw,
            Err(e) => {
                log::error!("failed to encode settings: {e}");
                return;
            }
        };
        if let Err(e) = self.backend.set(&self.key, &raw) {
            log::warn!("failed to save settings: {e}");
        }
    }

    fn apply_styles(&mut self) {
        apply_color_scheme(&mut self.style, &self.settings.colors);
    }

    fn notify_audio(&mut self) {
        let msg = AudioConfig::from(&self.settings.audio);
        self.audio_subscribers.retain(|tx| tx.send(msg).is_ok());
    }
}

fn read_settings<B: KeyValueStore>(backend: &B, key: &str) -> AppSettings {
    let raw = match backend.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return AppSettings::default(),
        Err(e) => {
            log::warn!("failed to load settings: {e}");
            return AppSettings::default();
        }
    };
    match AppSettings::from_stored_json(&raw) {
        Ok(s) => s,
        Err(e) => {
            log::warn!("failed to parse stored settings: {e}");
            AppSettings::default()
        }
    }
}
