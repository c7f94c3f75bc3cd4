use std::io::Cursor;

use hound::{SampleFormat, WavReader};

use crate::application::ports::{DurationProber, InvalidAudioError};
use crate::domain::{CANONICAL_BITS_PER_SAMPLE, CANONICAL_CHANNELS, CANONICAL_SAMPLE_RATE};

#[derive(Debug, Default, Clone, Copy)]
pub struct WavDurationProber;

impl DurationProber for WavDurationProber {
    fn probe(&self, wav: &[u8]) -> Result<f64, InvalidAudioError> {
        probe_duration(wav)
    }
}

/// Reads the playback duration of canonical WAV audio from its header.
///
/// The frame count comes from the data chunk length; samples are not decoded.
pub fn probe_duration(wav: &[u8]) -> Result<f64, InvalidAudioError> {
    let reader = WavReader::new(Cursor::new(wav))
        .map_err(|e| InvalidAudioError::Malformed(e.to_string()))?;
    let spec = reader.spec();

    let canonical = spec.channels == CANONICAL_CHANNELS
        && spec.sample_rate == CANONICAL_SAMPLE_RATE
        && spec.bits_per_sample == CANONICAL_BITS_PER_SAMPLE
        && spec.sample_format == SampleFormat::Int;
    if !canonical {
        return Err(InvalidAudioError::NotCanonical {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            format: match spec.sample_format {
                SampleFormat::Int => "integer",
                SampleFormat::Float => "float",
            },
        });
    }

    let duration_secs = f64::from(reader.duration()) / f64::from(spec.sample_rate);
    if !duration_secs.is_finite() || duration_secs < 0.0 {
        return Err(InvalidAudioError::Malformed(format!(
            "computed duration {duration_secs} is not a valid length"
        )));
    }

    Ok(duration_secs)
}
