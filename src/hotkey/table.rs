use std::collections::BTreeMap;

use thiserror::Error;
use tracing::{debug, info, warn};

use super::binding::HotkeyBinding;
use super::keys::{Key, Modifiers};

#[derive(Debug, Error)]
pub enum HotkeyError {
    #[error("{chord} is already registered by another application")]
    Conflict { chord: String },
    #[error("hotkey id {0} is not registered")]
    NotRegistered(i32),
    #[error("hotkey registration is unavailable: {0}")]
    Unavailable(String),
}

/// OS-level global hotkey registration, one registration per id.
pub trait HotkeyRegistrar {
    fn register(&mut self, id: i32, modifiers: Modifiers, key: Key) -> Result<(), HotkeyError>;
    fn unregister(&mut self, id: i32) -> Result<(), HotkeyError>;
}

impl<R: HotkeyRegistrar + ?Sized> HotkeyRegistrar for Box<R> {
    fn register(&mut self, id: i32, modifiers: Modifiers, key: Key) -> Result<(), HotkeyError> {
        (**self).register(id, modifiers, key)
    }

    fn unregister(&mut self, id: i32) -> Result<(), HotkeyError> {
        (**self).unregister(id)
    }
}

/// Bindings that currently hold a live OS registration, keyed by id.
pub struct HotkeyTable<R> {
    registrar: R,
    bindings: BTreeMap<i32, HotkeyBinding>,
}

impl<R: HotkeyRegistrar> HotkeyTable<R> {
    pub fn new(registrar: R) -> Self {
        Self {
            registrar,
            bindings: BTreeMap::new(),
        }
    }

    /// Registers `binding` under its id. A binding already held for the id is
    /// released first so the OS never carries two registrations for one id;
    /// if the new chord is refused, the previous binding is registered again.
    pub fn register(&mut self, binding: HotkeyBinding) -> bool {
        let previous = self.bindings.get(&binding.id).cloned();
        if previous.is_some() {
            debug!(id = binding.id, "replacing live registration");
            self.unregister(binding.id);
        }

        match self
            .registrar
            .register(binding.id, binding.modifiers, binding.key)
        {
            Ok(()) => {
                info!(id = binding.id, chord = %binding, "hotkey registered");
                self.bindings.insert(binding.id, binding);
                true
            }
            Err(e) => {
                warn!(id = binding.id, chord = %binding, error = %e, "hotkey registration failed");
                if let Some(previous) = previous {
                    self.restore(previous);
                }
                false
            }
        }
    }

    fn restore(&mut self, binding: HotkeyBinding) {
        match self
            .registrar
            .register(binding.id, binding.modifiers, binding.key)
        {
            Ok(()) => {
                debug!(id = binding.id, chord = %binding, "previous hotkey restored");
                self.bindings.insert(binding.id, binding);
            }
            Err(e) => {
                warn!(id = binding.id, chord = %binding, error = %e, "previous hotkey lost");
            }
        }
    }

    /// Drops the registration for `id`. Returns false if nothing was held or
    /// the OS refused; the table entry is removed either way.
    pub fn unregister(&mut self, id: i32) -> bool {
        if self.bindings.remove(&id).is_none() {
            return false;
        }
        match self.registrar.unregister(id) {
            Ok(()) => true,
            Err(e) => {
                warn!(id, error = %e, "hotkey unregistration failed");
                false
            }
        }
    }

    pub fn unregister_all(&mut self) {
        let ids: Vec<i32> = self.bindings.keys().copied().collect();
        for id in ids {
            self.unregister(id);
        }
    }

    /// Replace semantics: the old registration for the id goes away before
    /// the new one is attempted, and is not brought back on failure.
    pub fn update(&mut self, binding: HotkeyBinding) -> bool {
        self.unregister(binding.id);
        self.register(binding)
    }

    pub fn lookup(&self, id: i32) -> Option<&HotkeyBinding> {
        self.bindings.get(&id)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    #[cfg(test)]
    pub fn registrar(&self) -> &R {
        &self.registrar
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hotkey::HotkeyAction;
    use crate::testing::FakeRegistrar;

    fn cycle(mods: Modifiers, key: Key) -> HotkeyBinding {
        HotkeyBinding::new(HotkeyAction::CycleRefreshRate, mods, key)
    }

    #[test]
    fn register_stores_binding_on_success() {
        let mut table = HotkeyTable::new(FakeRegistrar::default());
        let binding = cycle(Modifiers::CONTROL | Modifiers::SHIFT, Key::R);
        assert!(table.register(binding.clone()));
        assert_eq!(table.lookup(1), Some(&binding));
        assert_eq!(table.registrar().live_count(1), 1);
    }

    #[test]
    fn conflict_leaves_table_unchanged() {
        let registrar = FakeRegistrar::default();
        registrar.claim_elsewhere(Modifiers::CONTROL, Key::R);
        let mut table = HotkeyTable::new(registrar);

        assert!(!table.register(cycle(Modifiers::CONTROL, Key::R)));
        assert!(table.is_empty());
        assert_eq!(table.registrar().live_count(1), 0);
    }

    #[test]
    fn update_never_leaves_two_registrations_for_one_id() {
        let mut table = HotkeyTable::new(FakeRegistrar::default());
        assert!(table.register(cycle(Modifiers::CONTROL, Key::R)));
        assert!(table.update(cycle(Modifiers::ALT, Key::F5)));
        assert_eq!(table.registrar().live_count(1), 1);
        assert_eq!(
            table.registrar().live_chord(1),
            Some((Modifiers::ALT, Key::F5))
        );

        // Plain register on a held id behaves the same way.
        assert!(table.register(cycle(Modifiers::WIN, Key::F6)));
        assert_eq!(table.registrar().live_count(1), 1);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn refused_chord_on_held_id_keeps_previous_binding() {
        let registrar = FakeRegistrar::default();
        registrar.claim_elsewhere(Modifiers::ALT, Key::F5);
        let mut table = HotkeyTable::new(registrar);
        let old = cycle(Modifiers::CONTROL, Key::R);
        assert!(table.register(old.clone()));

        assert!(!table.register(cycle(Modifiers::ALT, Key::F5)));
        assert_eq!(table.lookup(1), Some(&old));
        assert_eq!(table.registrar().live_count(1), 1);
        assert_eq!(
            table.registrar().live_chord(1),
            Some((Modifiers::CONTROL, Key::R))
        );
    }

    #[test]
    fn refused_update_drops_the_slot() {
        let registrar = FakeRegistrar::default();
        registrar.claim_elsewhere(Modifiers::ALT, Key::F5);
        let mut table = HotkeyTable::new(registrar);
        assert!(table.register(cycle(Modifiers::CONTROL, Key::R)));

        assert!(!table.update(cycle(Modifiers::ALT, Key::F5)));
        assert_eq!(table.lookup(1), None);
        assert_eq!(table.registrar().live_count(1), 0);
    }

    #[test]
    fn unregister_is_safe_when_absent() {
        let mut table = HotkeyTable::new(FakeRegistrar::default());
        assert!(!table.unregister(3));
        assert!(table.registrar().calls().is_empty());
    }

    #[test]
    fn unregister_all_clears_every_id() {
        let mut table = HotkeyTable::new(FakeRegistrar::default());
        for (action, key) in HotkeyAction::ALL.into_iter().zip([Key::F1, Key::F2, Key::F3]) {
            assert!(table.register(HotkeyBinding::new(action, Modifiers::CONTROL, key)));
        }
        assert_eq!(table.len(), 3);
        table.unregister_all();
        assert!(table.is_empty());
        for action in HotkeyAction::ALL {
            assert_eq!(table.registrar().live_count(action.id()), 0);
        }
    }
}
