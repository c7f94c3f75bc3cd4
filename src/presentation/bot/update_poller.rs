use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::application::ports::ChatClient;
use crate::domain::InboundEvent;

const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Long-polls the chat platform and forwards events to the worker in
/// platform order.
///
/// Every received update advances the offset, including ones the worker
/// will ignore, so the platform never redelivers them.
pub struct UpdatePoller {
    chat: Arc<dyn ChatClient>,
    sender: mpsc::Sender<InboundEvent>,
    retry_delay: Duration,
}

impl UpdatePoller {
    pub fn new(chat: Arc<dyn ChatClient>, sender: mpsc::Sender<InboundEvent>) -> Self {
        Self {
            chat,
            sender,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Polls until `shutdown` fires or the worker goes away. Dropping the
    /// sender on return closes the feed.
    pub async fn run(self, shutdown: CancellationToken) {
        tracing::info!("Update poller started");
        let mut offset: i64 = 0;

        loop {
            let polled = tokio::select! {
                _ = shutdown.cancelled() => break,
                polled = self.chat.poll_events(offset) => polled,
            };

            let events = match polled {
                Ok(events) => events,
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        retry_in_secs = self.retry_delay.as_secs(),
                        "Polling for updates failed"
                    );
                    tokio::select! {
                        _ = shutdown.cancelled() => break,
                        _ = tokio::time::sleep(self.retry_delay) => continue,
                    }
                }
            };

            for event in events {
                offset = offset.max(event.update_id + 1);
                if self.sender.send(event).await.is_err() {
                    tracing::warn!("Message worker is gone, stopping update poller");
                    return;
                }
            }
        }

        tracing::info!("Update poller stopped");
    }
}
