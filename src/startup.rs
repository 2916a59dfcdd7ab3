//! "Run at login" registration. Best effort: failures are logged and
//! otherwise ignored.

/// Command-line flag the startup entry passes so the app starts in the tray.
pub const MINIMIZED_ARG: &str = "--minimized";

pub trait StartupRegistration {
    fn is_enabled(&self) -> bool;
    fn set_enabled(&mut self, enabled: bool);
}

#[cfg(windows)]
pub use self::run_key::RunKeyStartup;

#[cfg(windows)]
mod run_key {
    use super::{StartupRegistration, MINIMIZED_ARG};
    use auto_launch::AutoLaunch;
    use tracing::{info, warn};
    use winreg::enums::{HKEY_CURRENT_USER, KEY_READ};
    use winreg::RegKey;

    const RUN_KEY: &str = "Software\\Microsoft\\Windows\\CurrentVersion\\Run";

    /// `HKCU\...\Run` entry named after the application.
    pub struct RunKeyStartup {
        app_name: String,
        launcher: Option<AutoLaunch>,
    }

    impl RunKeyStartup {
        pub fn new(app_name: &str) -> Self {
            let launcher = match std::env::current_exe() {
                Ok(path) => {
                    // Quoted so paths with spaces survive the Run key.
                    let quoted = format!("\"{}\"", path.to_string_lossy());
                    Some(AutoLaunch::new(app_name, &quoted, &[MINIMIZED_ARG]))
                }
                Err(e) => {
                    warn!(error = %e, "executable path unavailable, startup toggle disabled");
                    None
                }
            };
            Self {
                app_name: app_name.to_string(),
                launcher,
            }
        }
    }

    impl StartupRegistration for RunKeyStartup {
        fn is_enabled(&self) -> bool {
            let hkcu = RegKey::predef(HKEY_CURRENT_USER);
            if let Ok(key) = hkcu.open_subkey_with_flags(RUN_KEY, KEY_READ) {
                if key.get_value::<String, _>(&self.app_name).is_ok() {
                    return true;
                }
            }
            self.launcher
                .as_ref()
                .and_then(|l| l.is_enabled().ok())
                .unwrap_or(false)
        }

        fn set_enabled(&mut self, enabled: bool) {
            let Some(launcher) = &self.launcher else {
                return;
            };
            let result = if enabled {
                launcher.enable()
            } else {
                launcher.disable()
            };
            match result {
                Ok(()) => info!(enabled, "startup registration updated"),
                Err(e) => warn!(enabled, error = %e, "startup registration failed"),
            }
        }
    }
}
