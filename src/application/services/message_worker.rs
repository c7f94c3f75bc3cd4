use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::application::ports::ChatClient;
use crate::domain::{InboundEvent, InboundEventKind, VoiceMessage};

use super::{PipelineError, VoicePipeline};

pub const UNAUTHORIZED_REPLY: &str = "You are not allowed to use this bot";

/// Consumes the ordered event feed and runs the pipeline for every voice or
/// audio message.
///
/// A run starts only after it holds a permit, so with a single permit runs
/// execute one after another in feed order.
pub struct MessageWorker {
    receiver: mpsc::Receiver<InboundEvent>,
    pipeline: Arc<VoicePipeline>,
    chat: Arc<dyn ChatClient>,
    permits: Arc<Semaphore>,
    shutdown: CancellationToken,
}

impl MessageWorker {
    pub fn new(
        receiver: mpsc::Receiver<InboundEvent>,
        pipeline: Arc<VoicePipeline>,
        chat: Arc<dyn ChatClient>,
        max_concurrent_runs: usize,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            receiver,
            pipeline,
            chat,
            permits: Arc::new(Semaphore::new(max_concurrent_runs.max(1))),
            shutdown,
        }
    }

    /// Runs until the feed closes, then waits for in-flight runs to finish.
    pub async fn run(mut self) {
        tracing::info!("Message worker started");
        let mut runs = JoinSet::new();

        while let Some(event) = self.receiver.recv().await {
            let message = match event.kind {
                InboundEventKind::Voice(message) => message,
                InboundEventKind::Other => {
                    tracing::debug!(update_id = event.update_id, "Ignoring non-audio event");
                    continue;
                }
            };

            let Ok(permit) = Arc::clone(&self.permits).acquire_owned().await else {
                break;
            };

            let span = tracing::info_span!(
                "voice_message",
                update_id = event.update_id,
                chat_id = %message.chat_id,
                sender = %message.sender,
            );
            let pipeline = Arc::clone(&self.pipeline);
            let chat = Arc::clone(&self.chat);
            let cancel = self.shutdown.child_token();

            runs.spawn(
                async move {
                    handle_message(&pipeline, chat.as_ref(), message, &cancel).await;
                    drop(permit);
                }
                .instrument(span),
            );

            while let Some(finished) = runs.try_join_next() {
                log_join_result(finished);
            }
        }

        while let Some(finished) = runs.join_next().await {
            log_join_result(finished);
        }
        tracing::info!("Message worker stopped: channel closed");
    }
}

async fn handle_message(
    pipeline: &VoicePipeline,
    chat: &dyn ChatClient,
    message: VoiceMessage,
    cancel: &CancellationToken,
) {
    match pipeline.run(&message, cancel).await {
        Ok(transcript) => {
            if let Err(e) = chat.send_message(message.chat_id, transcript.as_str()).await {
                tracing::error!(error = %e, "Failed to deliver transcript");
                return;
            }
            tracing::info!(
                placeholder = transcript.is_placeholder(),
                "Transcript delivered"
            );
        }
        Err(PipelineError::Unauthorized { sender }) => {
            tracing::warn!(sender = %sender, "Sender is not allowed to use the bot");
            if let Err(e) = chat.send_message(message.chat_id, UNAUTHORIZED_REPLY).await {
                tracing::error!(error = %e, "Failed to deliver rejection notice");
            }
        }
        Err(e) => {
            tracing::error!(stage = %e.stage(), error = %e, "Voice message processing failed");
        }
    }
}

fn log_join_result(result: Result<(), tokio::task::JoinError>) {
    if let Err(e) = result {
        tracing::error!(error = %e, "Pipeline task terminated abnormally");
    }
}
