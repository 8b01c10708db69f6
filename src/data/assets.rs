use anyhow::{Context, Result};
use directories::BaseDirs;
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_CONFIG_DIR: &str = "ROUND_SOUND_CONFIG_DIR";

pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../config/default.toml");

const CONFIG_REL: &str = "config/default.toml";
const STORAGE_REL: &str = "storage.json";

/// Root of everything the app writes. The env override wins, then the OS config dir.
pub fn resolve_config_root() -> PathBuf {
    if let Some(p) = std::env::var_os(ENV_CONFIG_DIR) {
        return PathBuf::from(p);
    }

    // Linux: $XDG_CONFIG_HOME/round-sound
    // macOS: ~/Library/Application Support/round-sound
    // Windows: %APPDATA%\round-sound
    if let Some(dirs) = BaseDirs::new() {
        return dirs.config_dir().join("round-sound");
    }

    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".round-sound")
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_REL)
}

pub fn storage_path(root: &Path) -> PathBuf {
    root.join(STORAGE_REL)
}

/// Writes the bundled default config on first run. Never overwrites.
pub fn ensure_default_config(root: &Path) -> Result<PathBuf> {
    let path = config_path(root);
    write_if_missing(&path, DEFAULT_CONFIG_TOML)?;
    Ok(path)
}

fn write_if_missing(path: &Path, contents: &str) -> Result<()> {
    if path.is_file() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("mkdir {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("write {}", path.display()))
}
