use super::types::{Runtime, SettingsApp, SharedRuntime, RESTORE_SIGNAL};
use crate::config::JsonConfigStore;
use crate::coordinator::{Collaborators, Coordinator};
use crate::gui::utils::{is_system_in_dark_mode, show_main_window_native};
use crate::icon_gen;
use crate::overlay::OsdWindow;
use crate::platform::{
    post_to_shell, set_shell_handler, AsyncKeyboardState, MessageWindow, ShellMessage,
    Win32DisplayModes, WmiBrightness,
};
use crate::startup::RunKeyStartup;
use crate::{APP_NAME, RESTORE_EVENT_NAME, WINDOW_TITLE};
use anyhow::Context;
use eframe::egui;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::Ordering;
use std::sync::mpsc::channel;
use tracing::{debug, info, warn};
use tray_icon::{menu::Menu, menu::MenuEvent, MouseButton, TrayIcon, TrayIconBuilder, TrayIconEvent};
use windows::Win32::Foundation::{CloseHandle, WAIT_OBJECT_0};
use windows::Win32::System::Threading::*;

impl SettingsApp {
    /// Runs on the UI thread inside the eframe creator, so the shell and OSD
    /// windows belong to the thread winit pumps.
    pub fn new(tray_menu: Menu, start_minimized: bool, ctx: &egui::Context) -> anyhow::Result<Self> {
        let shell = MessageWindow::create().context("creating the hotkey message window")?;
        let osd = match OsdWindow::create() {
            Ok(osd) => Some(osd),
            Err(e) => {
                warn!(error = %e, "on-screen display unavailable");
                None
            }
        };

        let store = JsonConfigStore::at_default_location();
        info!(path = %store.path().display(), "settings file");

        let (tx, rx) = channel();
        let collab = Collaborators {
            display: Box::new(Win32DisplayModes),
            brightness: Box::new(WmiBrightness::default()),
            registrar: Box::new(shell.registrar()),
            keyboard: Box::new(AsyncKeyboardState),
            startup: Box::new(RunKeyStartup::new(APP_NAME)),
            store: Box::new(store),
        };
        let mut coordinator = Coordinator::new(collab, tx);
        coordinator.initialize();

        let dark = coordinator.config().is_dark_mode;
        if let Some(osd) = &osd {
            osd.set_dark(dark);
        }

        let runtime = Rc::new(RefCell::new(Runtime {
            coordinator,
            notifications: rx,
            osd,
            shell,
        }));
        install_shell_handler(&runtime, ctx.clone());
        spawn_tray_listeners();
        spawn_restore_listener();

        let system_dark = is_system_in_dark_mode();
        let tray_icon = build_tray_icon(&tray_menu, system_dark);

        Ok(Self {
            runtime,
            tray_icon,
            tray_menu,
            tray_retry_timer: 0.0,
            is_quitting: false,
            start_minimized,
            startup_done: false,
            last_dark_mode: dark,
            last_system_theme_dark: system_dark,
            theme_check_timer: 0.0,
            brightness_draft: None,
        })
    }
}

pub(crate) fn build_tray_icon(menu: &Menu, system_dark: bool) -> Option<TrayIcon> {
    let icon = icon_gen::get_tray_icon(system_dark)?;
    match TrayIconBuilder::new()
        .with_tooltip(WINDOW_TITLE)
        .with_icon(icon)
        .with_menu(Box::new(menu.clone()))
        .build()
    {
        Ok(tray) => Some(tray),
        Err(e) => {
            warn!(error = %e, "tray icon not created yet");
            None
        }
    }
}

/// Routes shell messages into the coordinator. Holds the runtime weakly: the
/// handler lives in a thread-local the runtime itself clears on drop.
fn install_shell_handler(runtime: &SharedRuntime, ctx: egui::Context) {
    let weak = Rc::downgrade(runtime);
    set_shell_handler(move |message| {
        let Some(runtime) = weak.upgrade() else {
            return;
        };
        match message {
            ShellMessage::Hotkey(id) => {
                let Ok(mut rt) = runtime.try_borrow_mut() else {
                    // A frame is in progress; retry once it has finished.
                    post_to_shell(message);
                    return;
                };
                rt.coordinator.handle_hotkey(id);
                rt.pump_notifications();
                ctx.request_repaint();
            }
            ShellMessage::ShowWindow => {
                show_main_window_native(WINDOW_TITLE);
                RESTORE_SIGNAL.store(true, Ordering::SeqCst);
                ctx.request_repaint();
            }
            ShellMessage::Exit => {
                info!("exit requested");
                if let Ok(mut rt) = runtime.try_borrow_mut() {
                    rt.coordinator.shutdown();
                }
                std::process::exit(0);
            }
        }
    });
}

fn spawn_tray_listeners() {
    // Tray thread
    std::thread::spawn(move || {
        while let Ok(event) = TrayIconEvent::receiver().recv() {
            if let TrayIconEvent::DoubleClick {
                button: MouseButton::Left,
                ..
            } = event
            {
                post_to_shell(ShellMessage::ShowWindow);
            }
        }
    });

    // Menu thread
    std::thread::spawn(move || {
        while let Ok(event) = MenuEvent::receiver().recv() {
            match event.id.0.as_str() {
                "1001" => post_to_shell(ShellMessage::Exit),
                "1002" => post_to_shell(ShellMessage::ShowWindow),
                other => debug!(id = other, "unhandled menu item"),
            }
        }
    });
}

/// A second launch sets the named restore event instead of starting.
fn spawn_restore_listener() {
    std::thread::spawn(move || loop {
        unsafe {
            match OpenEventW(EVENT_ALL_ACCESS, false, RESTORE_EVENT_NAME) {
                Ok(event_handle) => {
                    let result = WaitForSingleObject(event_handle, INFINITE);
                    if result == WAIT_OBJECT_0 {
                        debug!("restore requested by another instance");
                        post_to_shell(ShellMessage::ShowWindow);
                        let _ = ResetEvent(event_handle);
                    }
                    let _ = CloseHandle(event_handle);
                }
                Err(_) => std::thread::sleep(std::time::Duration::from_millis(100)),
            }
        }
    });
}
