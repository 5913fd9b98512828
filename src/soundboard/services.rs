//! External collaborators the soundboard drives but does not implement.
//!
//! Playback, file picking and orientation are platform services. The board
//! only ever talks to them through these traits, which keeps the state
//! machine testable with scripted stand-ins.

use std::fmt;
use std::path::Path;

use thiserror::Error;

use crate::audio_engine::AudioError;

/// Opaque reference to a clip loaded by an [`AudioBackend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoundHandle {
    slot: usize,
    generation: u32,
}

impl SoundHandle {
    pub fn new(slot: usize, generation: u32) -> Self {
        Self { slot, generation }
    }

    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for SoundHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.slot, self.generation)
    }
}

/// One start of a clip, as returned by [`AudioBackend::play`].
///
/// Restarting a clip yields a new `trigger`, so the end of an earlier run can
/// be told apart from the end of the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Playback {
    pub handle: SoundHandle,
    pub trigger: u64,
}

/// Session-level playback behaviour requested from the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioSession {
    /// Keep playing when the device's silent switch is on.
    pub plays_in_silent_mode: bool,
    /// Keep the session alive while the app is in the background.
    pub stays_active_in_background: bool,
    /// Lower other apps' audio instead of stopping it.
    pub duck_others: bool,
}

impl Default for AudioSession {
    fn default() -> Self {
        Self {
            plays_in_silent_mode: true,
            stays_active_in_background: true,
            duck_others: true,
        }
    }
}

/// Notification from the backend about a clip's playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// The clip played through to its last frame.
    Finished(Playback),
}

/// Loads, plays and releases clips.
///
/// Every method taking a handle must fail with [`AudioError::StaleHandle`]
/// and leave the backend untouched when the handle is not currently loaded.
pub trait AudioBackend {
    fn configure_session(&mut self, session: &AudioSession) -> Result<(), AudioError>;

    fn load(&mut self, path: &Path) -> Result<SoundHandle, AudioError>;

    /// Starts the clip from its first frame.
    fn play(&mut self, handle: SoundHandle) -> Result<Playback, AudioError>;

    /// Stops the clip and rewinds it.
    fn stop(&mut self, handle: SoundHandle) -> Result<(), AudioError>;

    fn unload(&mut self, handle: SoundHandle) -> Result<(), AudioError>;

    /// Silences every clip without unloading anything.
    fn stop_all(&mut self) -> Result<(), AudioError>;

    fn poll_event(&mut self) -> Option<PlaybackEvent>;
}

/// A file chosen through the platform picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedFile {
    /// Location of the (cached) copy of the file.
    pub uri: String,
    /// Display name reported by the picker, if any.
    pub name: Option<String>,
}

#[derive(Debug, Error)]
pub enum PickError {
    #[error("file picker failed: {0}")]
    Failed(String),
}

/// Document picker restricted to audio files.
pub trait FilePicker {
    /// Returns `Ok(None)` when the user cancels.
    fn pick_audio(&mut self) -> Result<Option<PickedFile>, PickError>;
}

#[derive(Debug, Error)]
#[error("orientation unlock failed: {0}")]
pub struct OrientationError(pub String);

pub trait OrientationLock {
    fn unlock(&mut self) -> Result<(), OrientationError>;
}

/// Orientation service for hosts that never lock the screen.
#[derive(Debug, Default)]
pub struct NoOrientationLock;

impl OrientationLock for NoOrientationLock {
    fn unlock(&mut self) -> Result<(), OrientationError> {
        Ok(())
    }
}
