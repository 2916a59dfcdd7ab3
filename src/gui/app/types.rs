use crate::coordinator::{Coordinator, Notification};
use crate::overlay::OsdWindow;
use crate::platform::MessageWindow;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::AtomicBool;
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use tray_icon::{menu::Menu, TrayIcon};

lazy_static::lazy_static! {
    pub static ref RESTORE_SIGNAL: Arc<AtomicBool> = Arc::new(AtomicBool::new(false));
}

/// UI-thread state shared between the settings window and the shell window
/// procedure. Fields drop in order, so the coordinator releases its hotkeys
/// before the window they are registered against goes away.
pub(crate) struct Runtime {
    pub(crate) coordinator: Coordinator,
    pub(crate) notifications: Receiver<Notification>,
    pub(crate) osd: Option<OsdWindow>,
    pub(crate) shell: MessageWindow,
}

pub type SharedRuntime = Rc<RefCell<Runtime>>;

pub struct SettingsApp {
    pub(crate) runtime: SharedRuntime,
    pub(crate) tray_icon: Option<TrayIcon>,
    pub(crate) tray_menu: Menu,
    pub(crate) tray_retry_timer: f64, // Timer for lazy tray icon creation
    pub(crate) is_quitting: bool,

    pub(crate) start_minimized: bool,
    pub(crate) startup_done: bool,

    pub(crate) last_dark_mode: bool,
    pub(crate) last_system_theme_dark: bool, // Taskbar theme, drives the tray icon
    pub(crate) theme_check_timer: f64,

    /// Slider value while the user drags; written to the panel on release.
    pub(crate) brightness_draft: Option<f32>,
}
