mod app;
mod key_mapping;
mod settings_ui;
pub mod utils;

pub use app::signal_restore_window;
pub use app::SettingsApp;
