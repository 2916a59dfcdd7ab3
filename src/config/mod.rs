//! Configuration module for LapKeys.
//!
//! - `types`: serde default helpers
//! - `config_struct`: the persisted `Config` record
//! - `io`: the settings store (load, save, path)

mod config_struct;
mod io;
mod types;

pub use config_struct::Config;
pub use io::{get_config_dir, ConfigError, ConfigStore, JsonConfigStore};
