//! Audio Stream Module
//!
//! This module handles CPAL audio stream management including:
//! - Stream initialization and configuration
//! - Audio callback setup
//! - Real-time message processing

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, Stream, StreamConfig};
use env_logger::{Builder, Env};
use rtrb::{Consumer, Producer, RingBuffer};
use std::sync::{Arc, Mutex};

use crate::audio_engine::constants::{BUFFER_FRAMES, RING_CAPACITY};
use crate::audio_engine::errors::AudioError;
use crate::audio_engine::mixer::RtMixer;
use crate::messages::{AudioMessage, ControlMessage};

/// Handle to the audio stream with associated message channels
pub struct AudioStreamHandle {
    pub stream: Stream,
    pub producer: Arc<Mutex<Producer<ControlMessage>>>,
    pub consumer: Arc<Mutex<Consumer<AudioMessage>>>,
    pub output_channels: usize,
    pub output_sample_rate: u32,
}

/// Setup and configure the logger.
pub fn setup_logger() {
    // Users can override via `RUST_LOG`, e.g. `RUST_LOG=leo_pad_audio=debug`.
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .try_init()
        .unwrap_or(()); // Ignore initialization errors
}

/// Applies one control message to the mixer.
fn dispatch(mixer: &mut RtMixer, message: ControlMessage) {
    match message {
        ControlMessage::LoadSample {
            id,
            generation,
            sample,
        } => mixer.load_sample(id, generation, sample),
        ControlMessage::PlaySample {
            id,
            volume,
            trigger,
        } => mixer.play_sample(id, volume, trigger),
        ControlMessage::StopSample { id } => mixer.stop_sample(id),
        ControlMessage::StopAll() => mixer.stop_all(),
        ControlMessage::UnloadSample { id } => mixer.unload_sample(id),
    }
}

/// Create and configure the audio stream
///
/// This function:
/// 1. Sets up the default audio device
/// 2. Creates ring buffers for message passing
/// 3. Initializes the mixer
/// 4. Builds and returns the audio stream
pub fn create_audio_stream() -> Result<AudioStreamHandle, AudioError> {
    setup_logger();

    let host = cpal::default_host();
    let device = host.default_output_device().ok_or(AudioError::NoDevice)?;

    let config = device
        .default_output_config()
        .map_err(|e| AudioError::Stream(e.to_string()))?;
    let sample_rate = config.sample_rate();
    let channels = config.channels();

    log::info!("Starting AudioEngine... ({} ch@{} Hz)", channels, sample_rate);

    // Control -> audio thread
    let (producer_in, mut consumer_in) = RingBuffer::new(RING_CAPACITY);

    // Audio thread -> control
    let (mut producer_out, consumer_out) = RingBuffer::new(RING_CAPACITY);

    let mut mixer = RtMixer::new(channels as usize);

    let stream_config = StreamConfig {
        channels,
        sample_rate,
        buffer_size: BufferSize::Fixed(BUFFER_FRAMES),
    };

    let stream = device
        .build_output_stream(
            &stream_config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                while let Ok(message) = consumer_in.pop() {
                    dispatch(&mut mixer, message);
                }

                mixer.render(data, |message| {
                    let _ = producer_out.push(message);
                });
            },
            |err| {
                log::error!("Audio stream error: {}", err);
            },
            None,
        )
        .map_err(|e| AudioError::Stream(e.to_string()))?;

    Ok(AudioStreamHandle {
        stream,
        producer: Arc::new(Mutex::new(producer_in)),
        consumer: Arc::new(Mutex::new(consumer_out)),
        output_channels: channels as usize,
        output_sample_rate: sample_rate,
    })
}

/// Start playing the audio stream
pub fn start_stream(stream: &Stream) -> Result<(), AudioError> {
    stream
        .play()
        .map_err(|e| AudioError::Stream(e.to_string()))
}
