use std::fmt;

pub const EMPTY_TRANSCRIPT_PLACEHOLDER: &str =
    "Could not transcribe text from the audio, empty audio clip?";

/// Recognized text of one voice message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    text: String,
    segments: usize,
}

impl Transcript {
    /// Joins recognized segments line by line. Blank segments are dropped and
    /// a result with no segments left becomes the placeholder text.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let parts: Vec<String> = segments
            .into_iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if parts.is_empty() {
            return Self::empty();
        }

        Self {
            segments: parts.len(),
            text: parts.join("\n"),
        }
    }

    pub fn empty() -> Self {
        Self {
            text: EMPTY_TRANSCRIPT_PLACEHOLDER.to_string(),
            segments: 0,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn segment_count(&self) -> usize {
        self.segments
    }

    pub fn is_placeholder(&self) -> bool {
        self.segments == 0
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
