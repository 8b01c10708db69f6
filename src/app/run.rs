use crate::app::commands::{Command, USAGE};
use crate::app::settings_store::SettingsStore;
use crate::audio::levels::{AudioConfig, LevelSource, LiveLevels, SyntheticLevels};
use crate::data::config::{Config, LevelMode};
use crate::data::kv_store::KeyValueStore;
use crate::playback::player::{Player, RepeatMode, StateMode};
use crate::render::preview;
use crate::ui::style::RootStyle;
use crate::ui::theme::{detect_color_capability, Theme};
use anyhow::{Context, Result};
use std::io::{self, Read};
use std::thread;
use std::time::Duration;

const RAY_WIDTH: usize = 48;

pub fn run<B: KeyValueStore>(command: Command, config: &Config, store: &mut SettingsStore<B, RootStyle>) -> Result<()> {
    match command {
        Command::Help => println!("{USAGE}"),
        Command::Show => show(store)?,
        Command::Css(None) => print!("{}", store.style().to_css()),
        Command::Css(Some(name)) => println!("{}", style_var(store.style(), &name)?),
        Command::Primary(hex) => {
            store.update_primary_color(&hex);
            show_colors(store)?;
        }
        Command::Color(patch) => {
            store.update_color_scheme(patch);
            show_colors(store)?;
        }
        Command::Audio(patch) => {
            store.update_audio_settings(patch);
            if !store.audio().is_valid() {
                log::warn!(
                    "frequency range {}..{} Hz is empty; the analyzer will see no bands",
                    store.audio().freq_min,
                    store.audio().freq_max
                );
            }
            println!("{}", serde_json::to_string_pretty(store.audio())?);
        }
        Command::Wnp(patch) => {
            store.update_wnp_settings(patch);
            println!("{}", serde_json::to_string_pretty(store.wnp())?);
        }
        Command::Reset => {
            store.reset_to_defaults();
            show(store)?;
        }
        Command::Levels(frames) => levels(config, store, frames.unwrap_or(config.preview_frames))?,
        Command::Player => player(store)?,
    }
    Ok(())
}

/// Looks up one style variable; the leading `--` is optional.
fn style_var<'a>(style: &'a RootStyle, name: &str) -> Result<&'a str> {
    let name = if name.starts_with("--") { name.to_string() } else { format!("--{name}") };
    style.get(&name).with_context(|| format!("no style variable {name}"))
}

fn theme_for<B: KeyValueStore>(store: &SettingsStore<B, RootStyle>) -> Theme {
    Theme::new(store.colors(), detect_color_capability())
}

fn show<B: KeyValueStore>(store: &SettingsStore<B, RootStyle>) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(store.settings())?);
    println!();
    show_colors(store)
}

fn show_colors<B: KeyValueStore>(store: &SettingsStore<B, RootStyle>) -> Result<()> {
    let theme = theme_for(store);
    let mut out = io::stdout();
    preview::print_swatches(&mut out, &theme, store.colors())?;
    preview::print_ray(&mut out, &theme, store.colors(), true, RAY_WIDTH)?;
    preview::print_ray(&mut out, &theme, store.colors(), false, RAY_WIDTH)?;
    Ok(())
}

fn levels<B: KeyValueStore>(config: &Config, store: &mut SettingsStore<B, RootStyle>, frames: u32) -> Result<()> {
    let mut source: Box<dyn LevelSource> = match config.level_mode {
        LevelMode::Synthetic => Box::new(SyntheticLevels::new(config.band_count)),
        // Analyzer config goes to stderr so stdout stays free for the bars.
        LevelMode::Live => Box::new(LiveLevels::spawn(io::stdin(), io::stderr(), config.band_count, config.smoothing)),
    };
    let config_rx = store.subscribe_audio();
    source.send_config(&AudioConfig::from(store.audio()));

    let theme = theme_for(store);
    let mut out = io::stdout();
    let frame_time = Duration::from_millis(config.frame_ms);
    for _ in 0..frames {
        while let Ok(cfg) = config_rx.try_recv() {
            source.send_config(&cfg);
        }
        if let Some(levels) = source.poll() {
            preview::print_levels(&mut out, &theme, levels)?;
        }
        thread::sleep(frame_time);
    }
    if !source.is_active() {
        log::info!("no level frames received");
    }
    Ok(())
}

fn player<B: KeyValueStore>(store: &SettingsStore<B, RootStyle>) -> Result<()> {
    let mut raw = String::new();
    io::stdin().read_to_string(&mut raw).context("read player JSON from stdin")?;
    let player: Player = serde_json::from_str(&raw).context("parse player JSON")?;

    let state = match player.state {
        StateMode::Playing => "playing",
        StateMode::Paused => "paused",
        StateMode::Stopped => "stopped",
    };
    let repeat = |m: RepeatMode| match m {
        RepeatMode::None => "off",
        RepeatMode::All => "all",
        RepeatMode::One => "one",
    };
    let title = if player.title.is_empty() { "Unknown" } else { player.title.as_str() };
    println!("{title} - {}", player.artist);
    println!(
        "{state}  {}  ({:.0}%)  vol {}",
        player.progress_label(),
        player.progress() * 100.0,
        player.volume
    );
    println!("repeat {} (next {})", repeat(player.repeat), repeat(player.next_repeat()));

    let theme = theme_for(store);
    preview::print_ray(&mut io::stdout(), &theme, store.colors(), player.is_playing(), RAY_WIDTH)?;
    Ok(())
}
