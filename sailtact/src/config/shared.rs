//! Settings shared between the ingestion path, the ticker and the UI.

use parking_lot::RwLock;

use super::settings::AdvisorSettings;

/// Concurrently mutable settings.
///
/// Writers replace values under a short write lock; readers clone a
/// snapshot so a single operation never sees a half-applied update.
/// Changes only affect operations that start after the write.
#[derive(Debug, Default)]
pub struct SharedSettings {
    inner: RwLock<AdvisorSettings>,
}

impl SharedSettings {
    /// Wrap an initial set of settings.
    pub fn new(settings: AdvisorSettings) -> Self {
        Self {
            inner: RwLock::new(settings),
        }
    }

    /// Point-in-time copy of the current settings.
    pub fn snapshot(&self) -> AdvisorSettings {
        self.inner.read().clone()
    }

    /// Apply a mutation and return `(previous, current)` snapshots.
    pub fn update<F>(&self, f: F) -> (AdvisorSettings, AdvisorSettings)
    where
        F: FnOnce(&mut AdvisorSettings),
    {
        let mut guard = self.inner.write();
        let previous = guard.clone();
        f(&mut guard);
        (previous, guard.clone())
    }

    /// Replace all settings at once.
    pub fn replace(&self, settings: AdvisorSettings) -> AdvisorSettings {
        std::mem::replace(&mut *self.inner.write(), settings)
    }
}
