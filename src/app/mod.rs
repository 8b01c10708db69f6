pub mod commands;
pub mod run;
pub mod settings_store;
