mod app;
mod audio;
mod data;
mod playback;
mod render;
mod ui;
mod utils;

use anyhow::Result;

fn main() -> Result<()> {
    env_logger::init();

    let command = match app::commands::parse(std::env::args().skip(1)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e}\n\n{}", app::commands::USAGE);
            std::process::exit(2);
        }
    };

    let root = data::assets::resolve_config_root();
    let config = data::config::Config::load_or_default(&root)?;
    let backend = data::kv_store::FileStore::new(data::assets::storage_path(&root));
    let mut store = app::settings_store::SettingsStore::load(backend, config.settings_key.clone(), ui::style::RootStyle::new());
    log::debug!("settings storage at {}", store.backend().path().display());

    app::run::run(command, &config, &mut store)
}
