/// Raw audio payload exactly as downloaded, in whatever container the sender used.
#[derive(Debug, Clone)]
pub struct InboundAudio {
    bytes: Vec<u8>,
}

impl InboundAudio {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
