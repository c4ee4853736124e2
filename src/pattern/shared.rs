// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F.

//! Thread-shareable registry handle.
//!
//! Registries are small and detection is infrequent next to scoring
//! traffic, so one coarse mutex serializes every registration, reset and
//! scan. Callbacks run while the lock is held and must not call back into
//! the same handle.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::RegistryError;
use crate::pattern::registry::{PatternDef, PatternRegistry, PatternSummary};

/// Cloneable handle to a [`PatternRegistry`] behind a mutex.
#[derive(Debug, Clone, Default)]
pub struct SharedRegistry {
    inner: Arc<Mutex<PatternRegistry>>,
}

impl SharedRegistry {
    /// Wraps an existing registry.
    #[must_use]
    pub fn new(registry: PatternRegistry) -> Self {
        Self {
            inner: Arc::new(Mutex::new(registry)),
        }
    }

    /// See [`PatternRegistry::register`].
    pub fn register(&self, def: PatternDef) -> Result<(), RegistryError> {
        self.lock().register(def)
    }

    /// See [`PatternRegistry::reset`].
    pub fn reset(&self, name: &str) -> Result<(), RegistryError> {
        self.lock().reset(name)
    }

    /// See [`PatternRegistry::reset_all`].
    pub fn reset_all(&self) {
        self.lock().reset_all();
    }

    /// See [`PatternRegistry::list`].
    #[must_use]
    pub fn list(&self, category: Option<&str>) -> Vec<PatternSummary> {
        self.lock().list(category)
    }

    /// Runs detection with the lock held for the whole scan.
    pub fn detect<S: AsRef<str>>(&self, tokens: &[S]) {
        self.lock().detect(tokens);
    }

    /// Runs `f` with exclusive access to the registry.
    pub fn with<R>(&self, f: impl FnOnce(&mut PatternRegistry) -> R) -> R {
        f(&mut self.lock())
    }

    /// A callback that panicked mid-scan leaves counters at a valid
    /// (partially advanced) value, so poisoning is not propagated.
    fn lock(&self) -> MutexGuard<'_, PatternRegistry> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl From<PatternRegistry> for SharedRegistry {
    fn from(registry: PatternRegistry) -> Self {
        Self::new(registry)
    }
}
