//! Audio file loading and decoding functionality.
//!
//! This module provides functions for loading and decoding audio files into sample buffers
//! that can be used by the real-time mixer.

use rubato::{FftFixedIn, Resampler};
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use symphonia::core::{
    audio::SampleBuffer as SymphoniaSampleBuffer, codecs::DecoderOptions,
    errors::Error as SymphoniaError, formats::FormatOptions, io::MediaSourceStream,
    meta::MetadataOptions, probe::Hint,
};
use symphonia::default::{get_codecs, get_probe};

use crate::audio_engine::constants::RESAMPLE_CHUNK_FRAMES;
use crate::audio_engine::errors::SampleLoadError;
use crate::messages::SampleBuffer;

/// Decodes an audio file into a sample buffer with the specified output configuration.
///
/// This function loads an audio file from disk, decodes it using the Symphonia library,
/// resamples it to `output_rate_hz` when the file rate differs and converts it to a
/// floating-point sample buffer with the requested channel count.
///
/// # Parameters
///
/// - `path`: Path to the audio file to load
/// - `output_channels`: Number of output channels (1 for mono, 2 for stereo)
/// - `output_rate_hz`: Output sample rate in Hz
///
/// # Errors
///
/// - File not found or cannot be opened
/// - Audio format not recognized or corrupted
/// - Unsupported channel count
/// - File without any audio frames
pub fn decode_audio_file_to_sample_buffer(
    path: &Path,
    output_channels: usize,
    output_rate_hz: u32,
) -> Result<SampleBuffer, SampleLoadError> {
    let file = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;
    let mut format = probed.format;

    let track = format
        .default_track()
        .ok_or(SampleLoadError::NoDefaultTrack)?;
    let track_id = track.id;
    let file_rate_hz = track
        .codec_params
        .sample_rate
        .ok_or(SampleLoadError::MissingSampleRate)?;
    let file_channels = track
        .codec_params
        .channels
        .ok_or(SampleLoadError::MissingChannels)?
        .count();

    let mut decoder = get_codecs().make(&track.codec_params, &DecoderOptions::default())?;

    let mut decoded: Vec<f32> = Vec::new();
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(err))
                if err.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(err) => return Err(SampleLoadError::Decode(err)),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let audio_buf = match decoder.decode(&packet) {
            Ok(buf) => buf,
            // A corrupt frame (common at the head of MP3s) is skipped, not fatal.
            Err(SymphoniaError::DecodeError(msg)) => {
                log::debug!("skipping undecodable packet in {}: {msg}", path.display());
                continue;
            }
            Err(err) => return Err(SampleLoadError::Decode(err)),
        };
        let spec = *audio_buf.spec();
        let duration = audio_buf.capacity() as u64;

        let mut sample_buf = SymphoniaSampleBuffer::<f32>::new(duration, spec);
        sample_buf.copy_interleaved_ref(audio_buf);
        decoded.extend_from_slice(sample_buf.samples());
    }

    if decoded.len() < file_channels {
        return Err(SampleLoadError::Empty);
    }

    let resampled = resample_interleaved(decoded, file_channels, file_rate_hz, output_rate_hz)?;
    let mapped = map_channels(resampled, file_channels, output_channels)?;

    Ok(SampleBuffer {
        channels: output_channels,
        samples: Arc::from(mapped.into_boxed_slice()),
    })
}

/// Converts interleaved samples from `from_hz` to `to_hz`.
///
/// The output is trimmed to the resampler's delay so that it starts at the
/// first input frame and holds `frames * to_hz / from_hz` frames.
pub fn resample_interleaved(
    samples: Vec<f32>,
    channels: usize,
    from_hz: u32,
    to_hz: u32,
) -> Result<Vec<f32>, SampleLoadError> {
    if from_hz == to_hz || channels == 0 {
        return Ok(samples);
    }

    let frames = samples.len() / channels;
    let expected_frames = (frames as u64 * u64::from(to_hz) / u64::from(from_hz)) as usize;

    let mut planar: Vec<Vec<f32>> = vec![Vec::with_capacity(frames); channels];
    for frame in samples.chunks_exact(channels) {
        for (channel, sample) in frame.iter().enumerate() {
            planar[channel].push(*sample);
        }
    }

    let mut resampler = FftFixedIn::<f32>::new(
        from_hz as usize,
        to_hz as usize,
        RESAMPLE_CHUNK_FRAMES,
        2,
        channels,
    )?;
    let delay = resampler.output_delay();

    let mut out: Vec<Vec<f32>> = vec![Vec::with_capacity(expected_frames + delay); channels];
    let mut pos = 0;
    while pos + resampler.input_frames_next() <= frames {
        let next = resampler.input_frames_next();
        let chunk: Vec<&[f32]> = planar.iter().map(|c| &c[pos..pos + next]).collect();
        let block = resampler.process(&chunk[..], None)?;
        for (dst, src) in out.iter_mut().zip(block) {
            dst.extend_from_slice(&src);
        }
        pos += next;
    }

    if pos < frames {
        let chunk: Vec<&[f32]> = planar.iter().map(|c| &c[pos..]).collect();
        let block = resampler.process_partial(Some(&chunk[..]), None)?;
        for (dst, src) in out.iter_mut().zip(block) {
            dst.extend_from_slice(&src);
        }
    }

    // Flush until the delayed tail has been emitted.
    while out[0].len() < expected_frames + delay {
        let block = resampler.process_partial::<Vec<f32>>(None, None)?;
        if block.first().is_none_or(|b| b.is_empty()) {
            break;
        }
        for (dst, src) in out.iter_mut().zip(block) {
            dst.extend_from_slice(&src);
        }
    }

    let available = out[0].len().saturating_sub(delay).min(expected_frames);
    let mut interleaved = Vec::with_capacity(available * channels);
    for frame in delay..delay + available {
        for channel in &out {
            interleaved.push(channel[frame]);
        }
    }

    Ok(interleaved)
}

/// Maps audio samples from one channel configuration to another.
///
/// Currently supports:
/// - Mono (1 channel) → Stereo (2 channels): duplicates mono signal to both channels
/// - Stereo (2 channels) → Mono (1 channel): averages both channels
/// - Same channel count: no conversion needed
pub fn map_channels(
    samples: Vec<f32>,
    file_channels: usize,
    output_channels: usize,
) -> Result<Vec<f32>, SampleLoadError> {
    if file_channels == output_channels {
        return Ok(samples);
    }

    match (file_channels, output_channels) {
        // Mono → Stereo: duplicate each sample
        (1, 2) => {
            let mut out = Vec::with_capacity(samples.len() * 2);
            for s in samples {
                out.push(s);
                out.push(s);
            }
            Ok(out)
        }
        // Stereo → Mono: average each frame
        (2, 1) => {
            let mut out = Vec::with_capacity(samples.len() / 2);
            for frame in samples.chunks_exact(2) {
                out.push((frame[0] + frame[1]) * 0.5);
            }
            Ok(out)
        }
        _ => Err(SampleLoadError::UnsupportedChannels {
            file_channels,
            output_channels,
        }),
    }
}
