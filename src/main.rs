#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]
#![cfg_attr(not(windows), allow(dead_code))]

mod brightness;
mod config;
mod coordinator;
mod display;
mod hotkey;
mod icon_gen;
mod logging;
mod overlay;
mod startup;

#[cfg(windows)]
mod gui;
#[cfg(windows)]
mod platform;
#[cfg(windows)]
mod win_types;

#[cfg(test)]
mod testing;

pub const APP_NAME: &str = "LapKeys";
pub const WINDOW_TITLE: &str = "LapKeys - Laptop Control";

pub const WINDOW_WIDTH: f32 = 460.0;
pub const WINDOW_HEIGHT: f32 = 640.0;

#[cfg(windows)]
pub const RESTORE_EVENT_NAME: windows::core::PCWSTR = windows::core::w!("Local\\LapKeysRestoreEvent");

#[cfg(windows)]
mod app_main {
    use crate::win_types::{to_wstring, SendHandle};
    use crate::{gui, icon_gen, logging, APP_NAME, RESTORE_EVENT_NAME, WINDOW_HEIGHT, WINDOW_TITLE, WINDOW_WIDTH};
    use anyhow::Context;
    use lazy_static::lazy_static;
    use std::panic;
    use tracing::{error, info, warn};
    use tray_icon::menu::{Menu, MenuItem, PredefinedMenuItem};
    use windows::core::*;
    use windows::Win32::Foundation::*;
    use windows::Win32::System::Com::CoInitialize;
    use windows::Win32::System::Threading::*;
    use windows::Win32::UI::WindowsAndMessaging::*;

    // Manual-reset event a second launch sets to bring the window back.
    lazy_static! {
        static ref RESTORE_EVENT: Option<SendHandle> = unsafe {
            CreateEventW(None, true, false, RESTORE_EVENT_NAME).ok().map(SendHandle)
        };
    }

    fn enable_dark_mode_for_app() {
        use windows::Win32::System::LibraryLoader::{GetProcAddress, LoadLibraryW};

        // PreferredAppMode::AllowDark
        const ALLOW_DARK: u32 = 1;

        unsafe {
            if let Ok(uxtheme) = LoadLibraryW(w!("uxtheme.dll")) {
                // SetPreferredAppMode is only exported by ordinal (135).
                let ordinal = 135u16;
                let ordinal_ptr = ordinal as usize as *const u8;
                let proc_name = PCSTR::from_raw(ordinal_ptr);

                if let Some(set_preferred_app_mode) = GetProcAddress(uxtheme, proc_name) {
                    let func: extern "system" fn(u32) -> u32 =
                        std::mem::transmute(set_preferred_app_mode);
                    func(ALLOW_DARK);
                }
            }
        }
    }

    fn install_panic_hook() {
        panic::set_hook(Box::new(|panic_info| {
            let location = if let Some(location) = panic_info.location() {
                format!("File: {}\nLine: {}", location.file(), location.line())
            } else {
                "Unknown location".to_string()
            };

            let payload = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic payload".to_string()
            };

            error!(%payload, %location, "panic");

            let error_msg = format!("LapKeys crashed.\n\nError: {}\n\nLocation:\n{}", payload, location);
            let wide_msg = to_wstring(&error_msg);
            let wide_title = to_wstring("LapKeys Crash Report");
            unsafe {
                MessageBoxW(
                    None,
                    PCWSTR(wide_msg.as_ptr()),
                    PCWSTR(wide_title.as_ptr()),
                    MB_ICONERROR | MB_OK,
                );
            }
        }));
    }

    /// Holds the single-instance mutex for the life of the process.
    struct InstanceGuard(Option<HANDLE>);

    impl Drop for InstanceGuard {
        fn drop(&mut self) {
            if let Some(handle) = self.0.take() {
                unsafe {
                    let _ = CloseHandle(handle);
                }
            }
        }
    }

    /// `None` when another instance already runs; it has been asked to show
    /// its window.
    fn acquire_single_instance() -> Option<InstanceGuard> {
        // The first instance owns the event; a second one signals it.
        let _ = RESTORE_EVENT.as_ref();

        unsafe {
            let handle = match CreateMutexW(None, true, w!("Local\\LapKeysSingleInstanceMutex")) {
                Ok(handle) => handle,
                Err(e) => {
                    warn!(error = %e, "single-instance mutex unavailable");
                    return Some(InstanceGuard(None));
                }
            };
            if GetLastError() == ERROR_ALREADY_EXISTS {
                if let Some(event) = RESTORE_EVENT.as_ref() {
                    let _ = SetEvent(event.0);
                } else {
                    gui::signal_restore_window();
                }
                let _ = CloseHandle(handle);
                return None;
            }
            Some(InstanceGuard(Some(handle)))
        }
    }

    pub fn run() -> anyhow::Result<()> {
        // Tray icon and WMI both need COM on the UI thread.
        unsafe {
            let _ = CoInitialize(None);
        }
        enable_dark_mode_for_app();

        let config_dir = crate::config::get_config_dir();
        if let Err(e) = logging::init_file_logging(&config_dir) {
            logging::init_stderr_logging();
            warn!(error = %e, "logging to stderr");
        }
        install_panic_hook();

        let Some(_instance) = acquire_single_instance() else {
            info!("already running, asked the other instance to show itself");
            return Ok(());
        };

        let start_minimized = std::env::args().any(|a| a == crate::startup::MINIMIZED_ARG);
        info!(version = env!("CARGO_PKG_VERSION"), start_minimized, "starting {APP_NAME}");

        // --- TRAY MENU SETUP ---
        let tray_menu = Menu::new();
        let tray_show_item = MenuItem::with_id("1002", "Show", true, None);
        let tray_quit_item = MenuItem::with_id("1001", "Exit", true, None);
        tray_menu
            .append_items(&[&tray_show_item, &PredefinedMenuItem::separator(), &tray_quit_item])
            .context("building the tray menu")?;

        // --- WINDOW SETUP ---
        // Starts invisible; the first frame shows it unless launched into the tray.
        let system_dark = gui::utils::is_system_in_dark_mode();
        let viewport_builder = eframe::egui::ViewportBuilder::default()
            .with_title(WINDOW_TITLE)
            .with_inner_size([WINDOW_WIDTH, WINDOW_HEIGHT])
            .with_min_inner_size([380.0, 420.0])
            .with_resizable(true)
            .with_visible(false)
            .with_icon(std::sync::Arc::new(icon_gen::get_window_icon(system_dark)));

        let options = eframe::NativeOptions {
            viewport: viewport_builder,
            ..Default::default()
        };

        eframe::run_native(
            WINDOW_TITLE,
            options,
            Box::new(move |cc| {
                let app = gui::SettingsApp::new(tray_menu, start_minimized, &cc.egui_ctx)?;
                Ok(Box::new(app))
            }),
        )
        .map_err(|e| anyhow::anyhow!("settings window failed: {e}"))?;

        info!("{APP_NAME} exited");
        Ok(())
    }
}

#[cfg(windows)]
fn main() -> anyhow::Result<()> {
    app_main::run()
}

#[cfg(not(windows))]
fn main() {
    logging::init_stderr_logging();
    tracing::error!("{APP_NAME} only runs on Windows");
    std::process::exit(1);
}
