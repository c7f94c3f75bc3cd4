use bytes::Bytes;

pub const CANONICAL_SAMPLE_RATE: u32 = 16_000;
pub const CANONICAL_CHANNELS: u16 = 1;
pub const CANONICAL_BITS_PER_SAMPLE: u16 = 16;

/// WAV-framed PCM in the canonical format (mono, 16 kHz, s16le) with its
/// probed duration.
#[derive(Debug, Clone)]
pub struct NormalizedAudio {
    bytes: Bytes,
    duration_secs: f64,
}

impl NormalizedAudio {
    pub fn new(bytes: impl Into<Bytes>, duration_secs: f64) -> Self {
        Self {
            bytes: bytes.into(),
            duration_secs,
        }
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
