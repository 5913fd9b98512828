//! Audio-specific error types.

use thiserror::Error;

/// Errors that can occur while loading audio files.
#[derive(Debug, Error)]
pub enum SampleLoadError {
    /// Failed to open the audio file.
    #[error("failed to open file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to decode the audio file.
    #[error("failed to decode audio file: {0}")]
    Decode(#[from] symphonia::core::errors::Error),

    /// Failed to create resampler.
    #[error("failed to create resampler: {0}")]
    ResamplerConstruction(#[from] rubato::ResamplerConstructionError),

    /// Failed to resample audio.
    #[error("failed to resample audio: {0}")]
    Resample(#[from] rubato::ResampleError),

    /// Audio file has no default track.
    #[error("audio file has no default track")]
    NoDefaultTrack,

    /// Audio file is missing sample rate information.
    #[error("audio file is missing a sample rate")]
    MissingSampleRate,

    /// Audio file is missing channel information.
    #[error("audio file is missing channel information")]
    MissingChannels,

    /// The file decoded to zero frames.
    #[error("audio file contains no audio frames")]
    Empty,

    /// Unsupported channel mapping configuration.
    #[error(
        "unsupported channel mapping: file has {file_channels} channels, output has {output_channels} channels (only mono↔stereo supported)"
    )]
    UnsupportedChannels {
        /// Number of channels in the source file.
        file_channels: usize,
        /// Number of channels expected for output.
        output_channels: usize,
    },
}

/// Errors reported by an [`AudioBackend`](crate::soundboard::AudioBackend).
#[derive(Debug, Error)]
pub enum AudioError {
    /// No output device could be opened.
    #[error("no audio output device found")]
    NoDevice,

    /// The output stream could not be built or started.
    #[error("audio stream error: {0}")]
    Stream(String),

    /// The clip could not be loaded.
    #[error("failed to load {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: SampleLoadError,
    },

    /// Every sample slot is in use.
    #[error("no free sample slot (all {0} slots are loaded)")]
    SlotsExhausted(usize),

    /// The handle was never loaded or has already been unloaded.
    #[error("sound handle {0} is not loaded")]
    StaleHandle(crate::soundboard::SoundHandle),

    /// The control ring is full; the command was dropped.
    #[error("control buffer full, dropped {0}")]
    QueueFull(&'static str),

    /// A lock around the control ring was poisoned.
    #[error("failed to acquire {0} lock")]
    Lock(&'static str),
}
