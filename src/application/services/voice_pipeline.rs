use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::application::ports::{
    AudioTranscoder, ChatClient, DurationProber, TranscriptionService, TransientBlobStore,
};
use crate::domain::{
    InboundAudio, NormalizedAudio, RouteKind, RoutingPolicy, Transcript, TranscriptionRoute,
    VoiceMessage,
};

use super::{AccessGate, BlobLease, PipelineError, PipelineStage};

const UPLOAD_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Decisions a run makes that do not involve any backend.
#[derive(Debug, Clone)]
pub struct PipelinePolicy {
    pub gate: AccessGate,
    pub routing: RoutingPolicy,
    pub run_timeout: Duration,
}

/// Turns one voice message into a transcript:
/// gate → download → transcode → probe → route → transcribe → cleanup.
pub struct VoicePipeline {
    chat: Arc<dyn ChatClient>,
    transcoder: Arc<dyn AudioTranscoder>,
    prober: Arc<dyn DurationProber>,
    blob_store: Arc<dyn TransientBlobStore>,
    transcription: Arc<dyn TranscriptionService>,
    policy: PipelinePolicy,
}

struct RunContext<'a> {
    cancel: &'a CancellationToken,
    deadline: Instant,
}

impl VoicePipeline {
    pub fn new(
        chat: Arc<dyn ChatClient>,
        transcoder: Arc<dyn AudioTranscoder>,
        prober: Arc<dyn DurationProber>,
        blob_store: Arc<dyn TransientBlobStore>,
        transcription: Arc<dyn TranscriptionService>,
        policy: PipelinePolicy,
    ) -> Self {
        Self {
            chat,
            transcoder,
            prober,
            blob_store,
            transcription,
            policy,
        }
    }

    /// Runs every stage for `message`. Scratch files and staged blobs are
    /// cleaned up before this returns, whatever the outcome.
    pub async fn run(
        &self,
        message: &VoiceMessage,
        cancel: &CancellationToken,
    ) -> Result<Transcript, PipelineError> {
        if !self.policy.gate.is_authorized(&message.sender) {
            return Err(PipelineError::Unauthorized {
                sender: message.sender.clone(),
            });
        }

        let ctx = RunContext {
            cancel,
            deadline: Instant::now() + self.policy.run_timeout,
        };

        let raw = guarded(&ctx, PipelineStage::Download, async {
            self.chat
                .download_audio(&message.file)
                .await
                .map_err(PipelineError::Download)
        })
        .await?;
        let inbound = InboundAudio::new(raw);
        tracing::debug!(
            bytes = inbound.len(),
            kind = message.file.kind.as_str(),
            "Audio downloaded"
        );

        let wav = guarded(&ctx, PipelineStage::Transcode, async {
            self.transcoder
                .normalize(inbound.bytes())
                .await
                .map_err(PipelineError::Transcode)
        })
        .await?;
        drop(inbound);

        let duration_secs = self
            .prober
            .probe(&wav)
            .map_err(PipelineError::InvalidAudio)?;
        let audio = NormalizedAudio::new(wav, duration_secs);

        let kind = self.policy.routing.select(duration_secs);
        tracing::info!(duration_secs, route = %kind, "Audio normalized");

        match kind {
            RouteKind::Inline => {
                let route = TranscriptionRoute::Inline(audio);
                self.recognize(&ctx, &route).await
            }
            RouteKind::Remote => {
                let lease = self.stage_blob(&ctx, audio.bytes().clone()).await?;
                drop(audio);

                let route = TranscriptionRoute::Remote(lease.handle().clone());
                let result = self.recognize(&ctx, &route).await;
                lease.release().await;
                result
            }
        }
    }

    /// Uploads outside the cancellation race, so a blob the backend has
    /// stored is always owned by a lease. Cancellation and the deadline are
    /// checked once the upload settles.
    async fn stage_blob(
        &self,
        ctx: &RunContext<'_>,
        data: Bytes,
    ) -> Result<BlobLease, PipelineError> {
        let upload = BlobLease::acquire(Arc::clone(&self.blob_store), data);
        let lease = match tokio::time::timeout(UPLOAD_TIMEOUT, upload).await {
            Ok(result) => result.map_err(PipelineError::Storage)?,
            Err(_) => {
                return Err(PipelineError::TimedOut {
                    stage: PipelineStage::Upload,
                });
            }
        };

        if let Some(interrupted) = ctx.interruption(PipelineStage::Upload) {
            lease.release().await;
            return Err(interrupted);
        }
        Ok(lease)
    }

    async fn recognize(
        &self,
        ctx: &RunContext<'_>,
        route: &TranscriptionRoute,
    ) -> Result<Transcript, PipelineError> {
        let transcript = guarded(ctx, PipelineStage::Transcribe, async {
            match route {
                TranscriptionRoute::Inline(audio) => {
                    self.transcription.recognize_inline(audio).await
                }
                TranscriptionRoute::Remote(handle) => {
                    self.transcription.recognize_remote(handle).await
                }
            }
            .map_err(PipelineError::Transcription)
        })
        .await?;

        tracing::info!(
            route = %route.kind(),
            segments = transcript.segment_count(),
            chars = transcript.as_str().len(),
            "Transcription completed"
        );
        Ok(transcript)
    }
}

impl RunContext<'_> {
    fn interruption(&self, stage: PipelineStage) -> Option<PipelineError> {
        if self.cancel.is_cancelled() {
            Some(PipelineError::Cancelled { stage })
        } else if Instant::now() >= self.deadline {
            Some(PipelineError::TimedOut { stage })
        } else {
            None
        }
    }
}

/// Races a stage against run cancellation and the run deadline.
async fn guarded<T, F>(
    ctx: &RunContext<'_>,
    stage: PipelineStage,
    stage_future: F,
) -> Result<T, PipelineError>
where
    F: Future<Output = Result<T, PipelineError>>,
{
    tokio::select! {
        biased;
        _ = ctx.cancel.cancelled() => Err(PipelineError::Cancelled { stage }),
        _ = tokio::time::sleep_until(ctx.deadline) => Err(PipelineError::TimedOut { stage }),
        result = stage_future => result,
    }
}
