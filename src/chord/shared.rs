use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;
use std::time::Duration;

use super::{Action, ActionUpdate, Chord, Command, Resolution};
use crate::error::Result;

/// Owned counterpart of [`Resolution`], detached from the chord's lock.
#[derive(Debug, Clone, PartialEq)]
pub enum OwnedResolution {
    Selected(Action),
    /// The selected action; its command holds the nested chord.
    NestedInto(Action),
    NotFound,
}

/// A chord that several hotkeys may run and edit at once.
///
/// Resolution takes the read lock, mutation the write lock. Neither is held
/// while waiting for input.
#[derive(Clone, Default)]
pub struct SharedChord {
    inner: Arc<RwLock<Chord>>,
}

impl SharedChord {
    pub fn new(chord: Chord) -> Self {
        SharedChord {
            inner: Arc::new(RwLock::new(chord)),
        }
    }

    pub fn read(&self) -> RwLockReadGuard<'_, Chord> {
        self.inner.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, Chord> {
        self.inner.write()
    }

    pub fn snapshot(&self) -> Chord {
        self.inner.read().clone()
    }

    pub fn timeout(&self) -> Duration {
        self.inner.read().timeout()
    }

    pub fn resolve_owned(&self, input: &str) -> OwnedResolution {
        match self.inner.read().resolve(input) {
            Resolution::Selected(action) => OwnedResolution::Selected(action.clone()),
            Resolution::NestedInto(_, action) => OwnedResolution::NestedInto(action.clone()),
            Resolution::NotFound => OwnedResolution::NotFound,
        }
    }

    pub fn add_action(&self, action: Action) -> Result<()> {
        self.inner.write().add_action(action)
    }

    pub fn set(&self, key: impl Into<String>, command: impl Into<Command>) -> Option<Action> {
        self.inner.write().set(key, command)
    }

    pub fn update(&self, key: &str, update: ActionUpdate) -> Result<()> {
        self.inner.write().update(key, update)
    }

    pub fn remove(&self, key: &str) -> Result<Action> {
        self.inner.write().remove(key)
    }

    pub fn clear(&self) {
        self.inner.write().clear()
    }
}

impl From<Chord> for SharedChord {
    fn from(chord: Chord) -> Self {
        SharedChord::new(chord)
    }
}
