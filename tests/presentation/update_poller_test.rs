use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use voicescribe::application::ports::ChatClientError;
use voicescribe::domain::InboundEvent;
use voicescribe::presentation::bot::UpdatePoller;

use crate::helpers::fakes::{CallLog, FakeChatClient, voice_message};

#[tokio::test]
async fn given_polled_batches_when_running_then_events_forwarded_in_order_and_offset_advances() {
    let chat = Arc::new(
        FakeChatClient::new(CallLog::default())
            .with_poll(Ok(vec![
                InboundEvent::other(5),
                InboundEvent::voice(6, voice_message("alice")),
            ]))
            .with_poll(Ok(vec![InboundEvent::other(9)])),
    );
    let (sender, mut receiver) = mpsc::channel(8);
    let shutdown = CancellationToken::new();
    let task = tokio::spawn(UpdatePoller::new(chat.clone(), sender).run(shutdown.clone()));

    let mut ids = Vec::new();
    for _ in 0..3 {
        ids.push(receiver.recv().await.unwrap().update_id);
    }
    shutdown.cancel();
    task.await.unwrap();

    assert_eq!(ids, vec![5, 6, 9]);
    let offsets = chat.offsets.lock().unwrap().clone();
    assert!(offsets.starts_with(&[0, 7]), "{offsets:?}");
    assert!(offsets[2..].iter().all(|offset| *offset == 10));
}

#[tokio::test]
async fn given_poll_error_when_running_then_retries_with_same_offset() {
    let chat = Arc::new(
        FakeChatClient::new(CallLog::default())
            .with_poll(Err(ChatClientError::Request("timeout".into())))
            .with_poll(Ok(vec![InboundEvent::other(1)])),
    );
    let (sender, mut receiver) = mpsc::channel(8);
    let shutdown = CancellationToken::new();
    let poller =
        UpdatePoller::new(chat.clone(), sender).with_retry_delay(Duration::from_millis(10));
    let task = tokio::spawn(poller.run(shutdown.clone()));

    let event = receiver.recv().await.unwrap();
    shutdown.cancel();
    task.await.unwrap();

    assert_eq!(event.update_id, 1);
    let offsets = chat.offsets.lock().unwrap().clone();
    assert_eq!(&offsets[..2], &[0, 0]);
}

#[tokio::test]
async fn given_shutdown_when_running_then_poller_stops_and_feed_closes() {
    let chat = Arc::new(FakeChatClient::new(CallLog::default()));
    let (sender, mut receiver) = mpsc::channel(8);
    let shutdown = CancellationToken::new();
    let task = tokio::spawn(UpdatePoller::new(chat, sender).run(shutdown.clone()));

    shutdown.cancel();
    task.await.unwrap();

    assert!(receiver.recv().await.is_none());
}
