mod blob_handle;
mod chat_id;
mod inbound_audio;
mod inbound_event;
mod normalized_audio;
mod sender_identity;
mod transcript;
mod transcription_route;

pub use blob_handle::{BlobHandle, recording_object_key};
pub use chat_id::ChatId;
pub use inbound_audio::InboundAudio;
pub use inbound_event::{AudioFileRef, AudioKind, InboundEvent, InboundEventKind, VoiceMessage};
pub use normalized_audio::{
    CANONICAL_BITS_PER_SAMPLE, CANONICAL_CHANNELS, CANONICAL_SAMPLE_RATE, NormalizedAudio,
};
pub use sender_identity::SenderIdentity;
pub use transcript::{EMPTY_TRANSCRIPT_PLACEHOLDER, Transcript};
pub use transcription_route::{RouteKind, RoutingPolicy, TranscriptionRoute};
