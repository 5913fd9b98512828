//! Voice management for real-time audio mixing.
//!
//! This module provides the [`VoiceSlot`] struct, one entry of the mixer's fixed voice pool.
//! A slot is either idle or playing one sample from the bank exactly once.
//!
//! Voices are managed by the [`RtMixer`](crate::audio_engine::mixer::RtMixer).

use crate::messages::SampleBuffer;

/// What happened to a voice during one render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceProgress {
    /// The voice was idle and contributed nothing.
    Idle,
    /// The voice rendered frames and still has more to play.
    Playing,
    /// The voice played its last frame during this pass.
    Finished,
}

/// A single voice in the mixer, representing a playing audio sample.
#[derive(Debug, Default)]
pub struct VoiceSlot {
    /// Whether the slot is currently playing.
    pub active: bool,

    /// ID of the sample bank slot being played.
    pub sample_id: usize,

    /// Generation of the slot's sample when the voice started.
    pub generation: u32,

    /// Trigger counter of the `PlaySample` that started the voice.
    pub trigger: u64,

    /// The sample buffer being played.
    pub sample: Option<SampleBuffer>,

    /// Current playback position in frames.
    pub frame_pos: usize,

    /// Volume multiplier for this voice (0.0 to 1.0).
    pub volume: f32,
}

impl VoiceSlot {
    /// Starts playing `sample` from its first frame.
    pub fn start(
        &mut self,
        sample_id: usize,
        generation: u32,
        trigger: u64,
        sample: SampleBuffer,
        volume: f32,
    ) {
        self.active = true;
        self.sample_id = sample_id;
        self.generation = generation;
        self.trigger = trigger;
        self.sample = Some(sample);
        self.frame_pos = 0;
        self.volume = volume;
    }

    /// Returns the slot to idle and drops its sample reference.
    pub fn stop(&mut self) {
        self.active = false;
        self.sample = None;
        self.frame_pos = 0;
        self.volume = 0.0;
    }

    pub fn is_playing_sample(&self, sample_id: usize) -> bool {
        self.active && self.sample_id == sample_id
    }

    /// Adds this voice into the interleaved `output` at the voice's volume.
    ///
    /// `channels` must match the sample's channel count; a mismatched or
    /// empty sample stops the voice.
    pub fn mix_into(&mut self, output: &mut [f32], channels: usize) -> VoiceProgress {
        if !self.active {
            return VoiceProgress::Idle;
        }

        let Some(sample) = self.sample.as_ref() else {
            self.stop();
            return VoiceProgress::Finished;
        };

        let sample_frames = sample.frames();
        if sample.channels != channels || sample_frames == 0 || channels == 0 {
            self.stop();
            return VoiceProgress::Finished;
        }

        let out_frames = output.len() / channels;
        let remaining = sample_frames.saturating_sub(self.frame_pos);
        let frames = out_frames.min(remaining);
        let volume = self.volume;

        let start = self.frame_pos * channels;
        let src = &sample.samples[start..start + frames * channels];
        for (out, s) in output[..frames * channels].iter_mut().zip(src) {
            *out += s * volume;
        }

        self.frame_pos += frames;
        if self.frame_pos >= sample_frames {
            self.stop();
            VoiceProgress::Finished
        } else {
            VoiceProgress::Playing
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn sample(channels: usize, values: Vec<f32>) -> SampleBuffer {
        SampleBuffer {
            channels,
            samples: Arc::from(values.into_boxed_slice()),
        }
    }

    #[test]
    fn test_start_resets_position() {
        let mut voice = VoiceSlot::default();
        voice.start(3, 1, 1, sample(1, vec![0.1, 0.2]), 0.75);
        voice.frame_pos = 1;

        voice.start(3, 1, 2, sample(1, vec![0.1, 0.2]), 0.5);

        assert!(voice.is_playing_sample(3));
        assert_eq!(voice.frame_pos, 0);
        assert_eq!(voice.trigger, 2);
        assert!((voice.volume - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_idle_voice_contributes_nothing() {
        let mut voice = VoiceSlot::default();
        let mut out = vec![0.0; 4];

        assert_eq!(voice.mix_into(&mut out, 2), VoiceProgress::Idle);
        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_voice_finishes_at_sample_end() {
        let mut voice = VoiceSlot::default();
        voice.start(0, 1, 1, sample(1, vec![0.5, 0.5, 0.5]), 1.0);

        let mut out = vec![0.0; 2];
        assert_eq!(voice.mix_into(&mut out, 1), VoiceProgress::Playing);
        assert_eq!(out, vec![0.5, 0.5]);

        let mut out = vec![0.0; 2];
        assert_eq!(voice.mix_into(&mut out, 1), VoiceProgress::Finished);
        assert_eq!(out, vec![0.5, 0.0]);
        assert!(!voice.active);
        assert!(voice.sample.is_none());
    }

    #[test]
    fn test_channel_mismatch_stops_voice() {
        let mut voice = VoiceSlot::default();
        voice.start(0, 1, 1, sample(2, vec![0.5, 0.5]), 1.0);

        let mut out = vec![0.0; 4];
        assert_eq!(voice.mix_into(&mut out, 1), VoiceProgress::Finished);
        assert!(!voice.active);
    }

    #[test]
    fn test_volume_scales_output() {
        let mut voice = VoiceSlot::default();
        voice.start(0, 1, 1, sample(2, vec![0.5, -0.5]), 0.5);

        let mut out = vec![0.0; 2];
        voice.mix_into(&mut out, 2);

        assert!((out[0] - 0.25).abs() < 1e-6);
        assert!((out[1] + 0.25).abs() < 1e-6);
    }
}
