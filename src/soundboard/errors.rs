//! Soundboard error types.

use thiserror::Error;

use crate::audio_engine::AudioError;
use crate::soundboard::library::SoundId;
use crate::soundboard::services::PickError;

#[derive(Debug, Error)]
pub enum SoundboardError {
    #[error("no pad with id {0}")]
    UnknownPad(u32),

    #[error("no default sound with id {0} (expected 1..=16)")]
    UnknownSound(SoundId),

    #[error("unsupported pad count {0} (expected one of 4, 6, 8, 16)")]
    InvalidPadCount(usize),

    #[error("no pad color with index {0} (expected 0..8)")]
    InvalidColor(usize),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The picked file was assigned to the pad but could not be loaded.
    #[error("could not load the selected audio file {uri}: {source}")]
    CustomSoundLoad {
        uri: String,
        #[source]
        source: AudioError,
    },

    #[error(transparent)]
    Picker(#[from] PickError),
}
