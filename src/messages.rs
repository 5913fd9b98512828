//! Message definitions for communication between the control thread and the audio thread.
//!
//! This module defines the enums that serve as the wire format for messages passed through the
//! ring buffers between the soundboard (control) thread and the real-time audio thread.

use std::sync::Arc;

#[derive(Debug, Clone)]
pub(crate) struct SampleBuffer {
    pub channels: usize,
    pub samples: Arc<[f32]>,
}

impl SampleBuffer {
    /// Number of frames (samples per channel) in the buffer.
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            return 0;
        }
        self.samples.len() / self.channels
    }
}

/// Message that is emitted from the audio thread.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioMessage {
    /// A one-shot voice reached the end of the sample in the given slot.
    ///
    /// `generation` is the slot's generation when the sample was loaded and
    /// `trigger` the value sent with the `PlaySample` that started the voice.
    SampleFinished {
        id: usize,
        generation: u32,
        trigger: u64,
    },
}

/// Message that is emitted from the control side.
#[derive(Debug, Clone)]
pub(crate) enum ControlMessage {
    /// Publish a loaded sample into an audio-thread slot.
    ///
    /// # Parameters
    /// * `id` - Sample slot (0..MAX_LOADED_SOUNDS)
    /// * `generation` - Generation of the handle issued for this load
    /// * `sample` - Pre-decoded immutable sample buffer (shared handle)
    LoadSample {
        id: usize,
        generation: u32,
        sample: SampleBuffer,
    },

    /// Play a loaded sample from its first frame.
    ///
    /// # Parameters
    /// * `id` - Identifier of the sample to play
    /// * `volume` - Playback volume (0.0 to 1.0)
    /// * `trigger` - Control-side counter echoed back in `SampleFinished`
    PlaySample { id: usize, volume: f32, trigger: u64 },

    /// Stop all active voices for a sample.
    StopSample { id: usize },

    /// Stop all currently active voices.
    StopAll(),

    /// Unload a sample slot.
    ///
    /// This stops all active voices for the sample and clears the sample buffer in the slot.
    UnloadSample { id: usize },
}
