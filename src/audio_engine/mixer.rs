//! Real-time audio mixer implementation.
//!
//! This module provides the [`RtMixer`] struct which handles real-time mixing
//! of one-shot pad voices over a fixed sample bank.
//!
//! The mixer manages a pool of [`VoiceSlot`] instances
//! and operates on [`SampleBuffer`](crate::messages::SampleBuffer) data loaded via
//! [`decode_audio_file_to_sample_buffer`](crate::audio_engine::sample_loader::decode_audio_file_to_sample_buffer).

use crate::audio_engine::constants::{MAX_LOADED_SOUNDS, MAX_VOICES, VOLUME_MAX, VOLUME_MIN};
use crate::audio_engine::voice::{VoiceProgress, VoiceSlot};
use crate::messages::{AudioMessage, SampleBuffer};
use cpal::Sample;

/// Real-time mixer that handles sample loading and voice management.
///
/// The mixer maintains a sample bank with preloaded audio samples and manages
/// multiple concurrent voices for playback. All operations are
/// allocation-free and real-time safe.
pub struct RtMixer {
    /// Number of output channels (1 for mono, 2 for stereo).
    channels: usize,

    /// Sample storage with MAX_LOADED_SOUNDS slots.
    sample_bank: [Option<SampleBuffer>; MAX_LOADED_SOUNDS],

    /// Generation of the sample currently in each bank slot.
    generations: [u32; MAX_LOADED_SOUNDS],

    /// Active voices with MAX_VOICES slots.
    voices: [VoiceSlot; MAX_VOICES],
}

impl RtMixer {
    /// Creates a new RtMixer with the specified number of channels.
    pub fn new(channels: usize) -> Self {
        Self {
            channels,
            sample_bank: std::array::from_fn(|_| None),
            generations: [0; MAX_LOADED_SOUNDS],
            voices: std::array::from_fn(|_| VoiceSlot::default()),
        }
    }

    /// Loads a sample into the sample bank at the specified slot.
    ///
    /// The sample must have the same number of channels as the mixer.
    /// Invalid IDs are silently ignored. Voices still playing the previous
    /// occupant of the slot are stopped.
    pub fn load_sample(&mut self, id: usize, generation: u32, sample: SampleBuffer) {
        if id >= MAX_LOADED_SOUNDS {
            return;
        }

        if sample.channels != self.channels {
            log::warn!(
                "rejecting sample for slot {id}: {} channels, mixer has {}",
                sample.channels,
                self.channels
            );
            return;
        }

        self.stop_sample(id);
        self.sample_bank[id] = Some(sample);
        self.generations[id] = generation;
    }

    /// Starts playback of a loaded sample from its first frame.
    ///
    /// A sample that is already sounding is restarted rather than layered.
    /// If no free voice slot is available, the playback request is silently dropped.
    pub fn play_sample(&mut self, id: usize, volume: f32, trigger: u64) {
        if id >= MAX_LOADED_SOUNDS {
            return;
        }

        if !volume.is_finite() || !(VOLUME_MIN..=VOLUME_MAX).contains(&volume) {
            return;
        }

        let Some(sample) = self.sample_bank[id].as_ref() else {
            return;
        };
        let sample = sample.clone();
        let generation = self.generations[id];

        if let Some(voice) = self.voices.iter_mut().find(|v| v.is_playing_sample(id)) {
            voice.start(id, generation, trigger, sample, volume);
            return;
        }

        if let Some(voice) = self.voices.iter_mut().find(|v| !v.active) {
            voice.start(id, generation, trigger, sample, volume);
        }

        // No free voice slot: drop deterministically.
    }

    /// Stops all active voices.
    pub fn stop_all(&mut self) {
        for voice in &mut self.voices {
            voice.stop();
        }
    }

    /// Stops all voices playing a specific sample.
    pub fn stop_sample(&mut self, id: usize) {
        if id >= MAX_LOADED_SOUNDS {
            return;
        }

        for voice_slot in &mut self.voices {
            if voice_slot.is_playing_sample(id) {
                voice_slot.stop();
            }
        }
    }

    /// Unloads a sample from the sample bank.
    ///
    /// This stops all voices playing the sample and removes it from the bank.
    pub fn unload_sample(&mut self, id: usize) {
        if id >= MAX_LOADED_SOUNDS {
            return;
        }

        self.stop_sample(id);
        self.sample_bank[id] = None;
    }

    /// Renders audio frames to the output buffer.
    ///
    /// Mixes all active voices into the interleaved output buffer and calls
    /// `on_finished` with a [`AudioMessage::SampleFinished`] for every voice
    /// that played its last frame during this pass.
    pub fn render(&mut self, output: &mut [f32], mut on_finished: impl FnMut(AudioMessage)) {
        output.fill(Sample::EQUILIBRIUM);

        if self.channels == 0 {
            return;
        }

        for voice in &mut self.voices {
            let (id, generation, trigger) = (voice.sample_id, voice.generation, voice.trigger);
            if voice.mix_into(output, self.channels) == VoiceProgress::Finished {
                on_finished(AudioMessage::SampleFinished {
                    id,
                    generation,
                    trigger,
                });
            }
        }
    }

    /// Gets the number of channels configured for this mixer.
    pub fn channels(&self) -> usize {
        self.channels
    }
}
