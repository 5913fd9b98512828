//! Audio Engine Module
//!
//! This module provides real-time playback of pad clips. It is organized into
//! sub-modules, each with a specific responsibility:
//!
//! - [`audio_stream`]: CPAL audio stream management and real-time callback
//! - [`constants`]: Configuration constants and limits
//! - [`errors`]: Audio-specific error types
//! - [`voice`]: One-shot voice lifecycle
//! - [`mixer`]: Real-time mixing engine
//! - [`sample_loader`]: Audio file loading and decoding
//! - [`slots`]: Control-side handle bookkeeping
//!
//! The main [`AudioEngine`] struct orchestrates these components and implements
//! [`AudioBackend`] for the soundboard.

use crate::audio_engine::audio_stream::{AudioStreamHandle, create_audio_stream, start_stream};
use crate::audio_engine::sample_loader::decode_audio_file_to_sample_buffer;
use crate::audio_engine::slots::SlotTable;
use crate::messages::{AudioMessage, ControlMessage};
use crate::soundboard::{AudioBackend, AudioSession, Playback, PlaybackEvent, SoundHandle};
use std::path::Path;

mod audio_stream;
mod constants;
mod errors;
mod mixer;
mod sample_loader;
mod slots;
mod voice;

pub use audio_stream::setup_logger;
pub use constants::{MAX_LOADED_SOUNDS, MAX_VOICES, VOLUME_MAX, VOLUME_MIN};
pub use errors::{AudioError, SampleLoadError};

/// AudioEngine plays pad clips on the default output device using cpal.
pub struct AudioEngine {
    stream_handle: AudioStreamHandle,
    slots: SlotTable,
    volume: f32,
    next_trigger: u64,
}

impl AudioEngine {
    /// Opens the default output device and starts the stream.
    pub fn new() -> Result<Self, AudioError> {
        let handle = create_audio_stream()?;
        start_stream(&handle.stream)?;

        Ok(AudioEngine {
            stream_handle: handle,
            slots: SlotTable::new(MAX_LOADED_SOUNDS),
            volume: VOLUME_MAX,
            next_trigger: 0,
        })
    }

    /// Sets the per-trigger playback volume (0.0 to 1.0).
    pub fn set_volume(&mut self, volume: f32) -> Result<(), AudioError> {
        if !volume.is_finite() || !(VOLUME_MIN..=VOLUME_MAX).contains(&volume) {
            return Err(AudioError::Stream(format!("volume out of range: {volume}")));
        }

        self.volume = volume;
        Ok(())
    }

    pub fn output_sample_rate(&self) -> u32 {
        self.stream_handle.output_sample_rate
    }

    pub fn output_channels(&self) -> usize {
        self.stream_handle.output_channels
    }

    fn send(&self, message: ControlMessage, what: &'static str) -> Result<(), AudioError> {
        let mut producer_guard = self
            .stream_handle
            .producer
            .lock()
            .map_err(|_| AudioError::Lock("producer"))?;

        producer_guard
            .push(message)
            .map_err(|_| AudioError::QueueFull(what))
    }
}

impl AudioBackend for AudioEngine {
    fn configure_session(&mut self, session: &AudioSession) -> Result<(), AudioError> {
        // Nothing to apply on a desktop output stream; it plays while the engine lives.
        log::debug!("audio session requested: {session:?}");
        Ok(())
    }

    fn load(&mut self, path: &Path) -> Result<SoundHandle, AudioError> {
        let sample = decode_audio_file_to_sample_buffer(
            path,
            self.stream_handle.output_channels,
            self.stream_handle.output_sample_rate,
        )
        .map_err(|source| AudioError::Load {
            path: path.display().to_string(),
            source,
        })?;

        let handle = self.slots.allocate()?;
        let frames = sample.frames();
        if let Err(e) = self.send(
            ControlMessage::LoadSample {
                id: handle.slot(),
                generation: handle.generation(),
                sample,
            },
            "LoadSample",
        ) {
            let _ = self.slots.release(handle);
            return Err(e);
        }

        log::debug!(
            "loaded {} into slot {handle} ({:.2}s)",
            path.display(),
            frames as f32 / self.stream_handle.output_sample_rate as f32
        );
        Ok(handle)
    }

    fn play(&mut self, handle: SoundHandle) -> Result<Playback, AudioError> {
        let id = self.slots.resolve(handle)?;
        let trigger = self.next_trigger + 1;
        self.send(
            ControlMessage::PlaySample {
                id,
                volume: self.volume,
                trigger,
            },
            "PlaySample",
        )?;

        self.next_trigger = trigger;
        Ok(Playback { handle, trigger })
    }

    fn stop(&mut self, handle: SoundHandle) -> Result<(), AudioError> {
        let id = self.slots.resolve(handle)?;
        self.send(ControlMessage::StopSample { id }, "StopSample")
    }

    fn unload(&mut self, handle: SoundHandle) -> Result<(), AudioError> {
        let id = self.slots.resolve(handle)?;
        self.send(ControlMessage::UnloadSample { id }, "UnloadSample")?;
        self.slots.release(handle)?;
        Ok(())
    }

    fn stop_all(&mut self) -> Result<(), AudioError> {
        self.send(ControlMessage::StopAll(), "StopAll")
    }

    fn poll_event(&mut self) -> Option<PlaybackEvent> {
        let mut consumer_guard = match self.stream_handle.consumer.lock() {
            Ok(guard) => guard,
            Err(_) => {
                log::error!("Failed to acquire consumer lock");
                return None;
            }
        };

        while let Ok(message) = consumer_guard.pop() {
            match message {
                AudioMessage::SampleFinished {
                    id,
                    generation,
                    trigger,
                } => {
                    // Dropped when the sample was unloaded after the voice finished.
                    if let Some(handle) = self.slots.live_handle(id, generation) {
                        return Some(PlaybackEvent::Finished(Playback { handle, trigger }));
                    }
                }
            }
        }

        None
    }
}

impl Drop for AudioEngine {
    fn drop(&mut self) {
        log::info!(
            "Shutting down AudioEngine ({} sounds still loaded)",
            self.slots.loaded()
        );
    }
}
