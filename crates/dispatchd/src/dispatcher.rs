//! The dispatch service handle.
//!
//! Workflow operations live in their own modules as `impl Dispatcher`
//! blocks. Every public state-changing operation holds the transition gate
//! for its whole read-check-write sequence, so two consoles triaging the
//! same alert cannot both succeed.

use crate::notifier::Notifier;
use crate::store::SharedStore;
use dispatch_shared::DispatchEvent;
use std::sync::{Mutex, MutexGuard};

pub struct Dispatcher {
    pub(crate) store: SharedStore,
    pub(crate) notifier: Notifier,
    gate: Mutex<()>,
}

impl Dispatcher {
    pub fn new(store: SharedStore, notifier: Notifier) -> Self {
        Self {
            store,
            notifier,
            gate: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Serialise a state transition. A poisoned gate is still usable:
    /// the guarded data lives in the store, not behind the mutex.
    pub(crate) fn gate(&self) -> MutexGuard<'_, ()> {
        self.gate.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub(crate) fn emit(&self, event: DispatchEvent) {
        self.notifier.publish(event);
    }
}
