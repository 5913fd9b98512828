//! Audio engine configuration constants and limits.

/// Number of sample slots the engine can hold at once.
///
/// Enough for every bundled sound plus one custom sound per pad, with headroom
/// for a preview that has not been unloaded yet.
pub const MAX_LOADED_SOUNDS: usize = 48;

/// Maximum number of voices that can be active simultaneously.
pub const MAX_VOICES: usize = 32;

/// Minimum volume level (silence).
pub const VOLUME_MIN: f32 = 0.0;

/// Maximum volume level (100%).
pub const VOLUME_MAX: f32 = 1.0;

/// Capacity of each control/audio ring buffer.
pub const RING_CAPACITY: usize = 1024;

/// Fixed callback size requested from the output device, in frames.
pub const BUFFER_FRAMES: u32 = 512;

/// Input chunk size fed to the resampler, in frames.
pub const RESAMPLE_CHUNK_FRAMES: usize = 1024;
