/// Measures the playback length of canonical WAV audio from its header.
pub trait DurationProber: Send + Sync {
    fn probe(&self, wav: &[u8]) -> Result<f64, InvalidAudioError>;
}

#[derive(Debug, thiserror::Error)]
pub enum InvalidAudioError {
    #[error("malformed WAV container: {0}")]
    Malformed(String),
    #[error(
        "not canonical PCM: {channels} channel(s), {sample_rate} Hz, {bits_per_sample}-bit {format}"
    )]
    NotCanonical {
        channels: u16,
        sample_rate: u32,
        bits_per_sample: u16,
        format: &'static str,
    },
}
