mod access_gate;
mod blob_lease;
mod message_worker;
mod pipeline_error;
mod voice_pipeline;

pub use access_gate::AccessGate;
pub use blob_lease::BlobLease;
pub use message_worker::{MessageWorker, UNAUTHORIZED_REPLY};
pub use pipeline_error::{PipelineError, PipelineStage};
pub use voice_pipeline::{PipelinePolicy, VoicePipeline};
