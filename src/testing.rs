//! In-memory stand-ins for the OS seams, shared by unit tests.
//!
//! Each fake keeps its state behind `Rc<RefCell<..>>` so a test can keep a
//! handle after moving a clone into the code under test.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::rc::Rc;

use crate::brightness::{BrightnessBackend, BrightnessError};
use crate::config::{Config, ConfigError, ConfigStore};
use crate::display::{DisplayError, DisplayMode, DisplayModes};
use crate::hotkey::{HotkeyError, HotkeyRegistrar, Key, KeyboardState, Modifiers};
use crate::startup::StartupRegistration;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegistrarCall {
    Register(i32, Modifiers, Key),
    Unregister(i32),
}

#[derive(Default)]
struct RegistrarState {
    // The OS keeps duplicates per id, so every live registration is recorded.
    live: BTreeMap<i32, Vec<(Modifiers, Key)>>,
    claimed: HashSet<(u32, u32)>,
    calls: Vec<RegistrarCall>,
}

#[derive(Clone, Default)]
pub struct FakeRegistrar {
    state: Rc<RefCell<RegistrarState>>,
}

impl FakeRegistrar {
    /// Marks a chord as owned by another application.
    pub fn claim_elsewhere(&self, modifiers: Modifiers, key: Key) {
        self.state
            .borrow_mut()
            .claimed
            .insert((modifiers.bits(), key.vk()));
    }

    pub fn live_count(&self, id: i32) -> usize {
        self.state.borrow().live.get(&id).map_or(0, Vec::len)
    }

    pub fn live_chord(&self, id: i32) -> Option<(Modifiers, Key)> {
        self.state
            .borrow()
            .live
            .get(&id)
            .and_then(|v| v.last().copied())
    }

    pub fn total_live(&self) -> usize {
        self.state.borrow().live.values().map(Vec::len).sum()
    }

    pub fn calls(&self) -> Vec<RegistrarCall> {
        self.state.borrow().calls.clone()
    }
}

impl HotkeyRegistrar for FakeRegistrar {
    fn register(&mut self, id: i32, modifiers: Modifiers, key: Key) -> Result<(), HotkeyError> {
        let mut state = self.state.borrow_mut();
        state.calls.push(RegistrarCall::Register(id, modifiers, key));
        if state.claimed.contains(&(modifiers.bits(), key.vk())) {
            return Err(HotkeyError::Conflict {
                chord: format!("{modifiers:?}+{key}"),
            });
        }
        state.live.entry(id).or_default().push((modifiers, key));
        Ok(())
    }

    fn unregister(&mut self, id: i32) -> Result<(), HotkeyError> {
        let mut state = self.state.borrow_mut();
        state.calls.push(RegistrarCall::Unregister(id));
        match state.live.get_mut(&id) {
            Some(list) if !list.is_empty() => {
                list.pop();
                Ok(())
            }
            _ => Err(HotkeyError::NotRegistered(id)),
        }
    }
}

struct DisplayState {
    current: DisplayMode,
    modes: Vec<DisplayMode>,
    rejected: HashSet<u32>,
    applied: Vec<(u32, u32, u32)>,
}

#[derive(Clone)]
pub struct FakeDisplay {
    state: Rc<RefCell<DisplayState>>,
}

fn mode((width, height, refresh_rate): (u32, u32, u32)) -> DisplayMode {
    DisplayMode {
        width,
        height,
        refresh_rate,
        bits_per_pixel: 32,
    }
}

impl FakeDisplay {
    pub fn new(current: (u32, u32, u32), modes: &[(u32, u32, u32)]) -> Self {
        Self {
            state: Rc::new(RefCell::new(DisplayState {
                current: mode(current),
                modes: modes.iter().copied().map(mode).collect(),
                rejected: HashSet::new(),
                applied: Vec::new(),
            })),
        }
    }

    /// Makes the driver refuse any mode with this rate.
    pub fn reject_rate(&self, rate: u32) {
        self.state.borrow_mut().rejected.insert(rate);
    }

    pub fn applied(&self) -> Vec<(u32, u32, u32)> {
        self.state.borrow().applied.clone()
    }
}

impl DisplayModes for FakeDisplay {
    fn current_mode(&self) -> Result<DisplayMode, DisplayError> {
        Ok(self.state.borrow().current)
    }

    fn all_modes(&self) -> Vec<DisplayMode> {
        self.state.borrow().modes.clone()
    }

    fn apply(&mut self, width: u32, height: u32, refresh_rate: u32) -> Result<(), DisplayError> {
        let mut state = self.state.borrow_mut();
        if state.rejected.contains(&refresh_rate) {
            return Err(DisplayError::ModeRejected {
                width,
                height,
                rate: refresh_rate,
                code: -2,
            });
        }
        state.applied.push((width, height, refresh_rate));
        state.current = DisplayMode {
            width,
            height,
            refresh_rate,
            ..state.current
        };
        Ok(())
    }
}

#[derive(Default)]
struct BrightnessState {
    level: u8,
    supported: bool,
    get_calls: usize,
    set_calls: usize,
}

#[derive(Clone)]
pub struct FakeBrightness {
    state: Rc<RefCell<BrightnessState>>,
}

impl FakeBrightness {
    pub fn with_level(level: u8) -> Self {
        Self {
            state: Rc::new(RefCell::new(BrightnessState {
                level,
                supported: true,
                ..Default::default()
            })),
        }
    }

    /// A device without a brightness interface: every call fails.
    pub fn unsupported() -> Self {
        Self {
            state: Rc::new(RefCell::new(BrightnessState::default())),
        }
    }

    pub fn set_level(&self, level: u8) {
        self.state.borrow_mut().level = level;
    }

    pub fn level(&self) -> u8 {
        self.state.borrow().level
    }

    pub fn get_calls(&self) -> usize {
        self.state.borrow().get_calls
    }

    pub fn total_calls(&self) -> usize {
        let state = self.state.borrow();
        state.get_calls + state.set_calls
    }
}

impl BrightnessBackend for FakeBrightness {
    fn get(&mut self) -> Result<u8, BrightnessError> {
        let mut state = self.state.borrow_mut();
        state.get_calls += 1;
        if !state.supported {
            return Err(BrightnessError::Backend("no WmiMonitorBrightness".into()));
        }
        Ok(state.level)
    }

    fn set(&mut self, level: u8) -> Result<(), BrightnessError> {
        let mut state = self.state.borrow_mut();
        state.set_calls += 1;
        if !state.supported {
            return Err(BrightnessError::Backend("no WmiMonitorBrightnessMethods".into()));
        }
        state.level = level;
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct FakeKeyboard {
    held: Rc<RefCell<HashSet<Key>>>,
}

impl FakeKeyboard {
    pub fn press(&self, key: Key) {
        self.held.borrow_mut().insert(key);
    }

    pub fn release(&self, key: Key) {
        self.held.borrow_mut().remove(&key);
    }

    pub fn release_all(&self) {
        self.held.borrow_mut().clear();
    }
}

impl KeyboardState for FakeKeyboard {
    fn live_modifiers(&self) -> Modifiers {
        let held = self.held.borrow();
        Modifiers::from_key_state(|k| held.contains(&k))
    }
}

#[derive(Clone, Default)]
pub struct FakeStartup {
    enabled: Rc<RefCell<bool>>,
}

impl FakeStartup {
    pub fn enabled(&self) -> bool {
        *self.enabled.borrow()
    }
}

impl StartupRegistration for FakeStartup {
    fn is_enabled(&self) -> bool {
        *self.enabled.borrow()
    }

    fn set_enabled(&mut self, enabled: bool) {
        *self.enabled.borrow_mut() = enabled;
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    saved: Rc<RefCell<Option<Config>>>,
    saves: Rc<RefCell<usize>>,
}

impl MemoryStore {
    pub fn with(config: Config) -> Self {
        Self {
            saved: Rc::new(RefCell::new(Some(config))),
            saves: Rc::default(),
        }
    }

    pub fn saved(&self) -> Option<Config> {
        self.saved.borrow().clone()
    }

    pub fn save_count(&self) -> usize {
        *self.saves.borrow()
    }
}

impl ConfigStore for MemoryStore {
    fn load(&self) -> Config {
        self.saved.borrow().clone().unwrap_or_default()
    }

    fn save(&self, config: &Config) -> Result<(), ConfigError> {
        *self.saved.borrow_mut() = Some(config.clone());
        *self.saves.borrow_mut() += 1;
        Ok(())
    }
}
