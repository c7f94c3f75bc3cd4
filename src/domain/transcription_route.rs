use std::fmt;

use super::{BlobHandle, NormalizedAudio};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    Inline,
    Remote,
}

impl RouteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteKind::Inline => "inline",
            RouteKind::Remote => "remote",
        }
    }
}

impl fmt::Display for RouteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How one run sends its audio to the recognizer. Chosen once per run.
#[derive(Debug, Clone)]
pub enum TranscriptionRoute {
    Inline(NormalizedAudio),
    Remote(BlobHandle),
}

impl TranscriptionRoute {
    pub fn kind(&self) -> RouteKind {
        match self {
            TranscriptionRoute::Inline(_) => RouteKind::Inline,
            TranscriptionRoute::Remote(_) => RouteKind::Remote,
        }
    }
}

/// Duration threshold above which audio goes through object storage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoutingPolicy {
    remote_threshold_secs: f64,
    always_remote: bool,
}

impl RoutingPolicy {
    pub const DEFAULT_REMOTE_THRESHOLD_SECS: f64 = 60.0;

    pub fn new(remote_threshold_secs: f64, always_remote: bool) -> Self {
        Self {
            remote_threshold_secs,
            always_remote,
        }
    }

    pub fn remote_threshold_secs(&self) -> f64 {
        self.remote_threshold_secs
    }

    /// `duration > threshold` routes remote; the threshold itself stays inline.
    pub fn select(&self, duration_secs: f64) -> RouteKind {
        if self.always_remote || duration_secs > self.remote_threshold_secs {
            RouteKind::Remote
        } else {
            RouteKind::Inline
        }
    }
}

impl Default for RoutingPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_REMOTE_THRESHOLD_SECS, false)
    }
}
