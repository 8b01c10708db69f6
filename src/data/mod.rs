pub mod assets;
pub mod config;
pub mod kv_store;
pub mod settings;
