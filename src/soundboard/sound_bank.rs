//! Registry from "what a pad wants to play" to "what the backend has loaded".

use std::collections::HashMap;
use std::fmt;

use crate::soundboard::library::SoundId;
use crate::soundboard::services::SoundHandle;

/// Identity of a clip as the board sees it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SoundKey {
    /// A bundled sound.
    Default(SoundId),
    /// A user-picked file, by URI.
    Custom(String),
}

impl fmt::Display for SoundKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SoundKey::Default(id) => write!(f, "sound{id}"),
            SoundKey::Custom(uri) => f.write_str(uri),
        }
    }
}

/// Loaded handles keyed by [`SoundKey`].
///
/// The bank never talks to the backend itself: every method that drops a
/// handle from the map hands it back so the caller can unload it.
#[derive(Debug, Default)]
pub struct SoundBank {
    handles: HashMap<SoundKey, SoundHandle>,
}

impl SoundBank {
    pub fn get(&self, key: &SoundKey) -> Option<SoundHandle> {
        self.handles.get(key).copied()
    }

    pub fn contains(&self, key: &SoundKey) -> bool {
        self.handles.contains_key(key)
    }

    /// Stores `handle`, returning the handle it displaced.
    #[must_use = "a displaced handle must be unloaded"]
    pub fn insert(&mut self, key: SoundKey, handle: SoundHandle) -> Option<SoundHandle> {
        self.handles.insert(key, handle)
    }

    #[must_use = "a removed handle must be unloaded"]
    pub fn remove(&mut self, key: &SoundKey) -> Option<SoundHandle> {
        self.handles.remove(key)
    }

    /// Empties the bank, yielding every handle for teardown.
    pub fn drain(&mut self) -> impl Iterator<Item = (SoundKey, SoundHandle)> + '_ {
        self.handles.drain()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}
