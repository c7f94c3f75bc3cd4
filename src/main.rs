use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use voicescribe::application::ports::ChatClient;
use voicescribe::application::services::{AccessGate, MessageWorker, PipelinePolicy, VoicePipeline};
use voicescribe::domain::RoutingPolicy;
use voicescribe::infrastructure::audio::{FfmpegTranscoder, WavDurationProber, check_ffmpeg_binary};
use voicescribe::infrastructure::observability::{TracingConfig, init_tracing};
use voicescribe::infrastructure::speech::{
    GoogleCredentials, GoogleSpeechConfig, GoogleSpeechService, PollingConfig,
};
use voicescribe::infrastructure::storage::BlobStoreFactory;
use voicescribe::infrastructure::telegram::TelegramClient;
use voicescribe::presentation::bot::UpdatePoller;
use voicescribe::presentation::config::Settings;

const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Parser)]
#[command(name = "voicescribe", version, about = "Transcribes Telegram voice notes")]
struct Args {
    /// Path to the YAML configuration file.
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    dotenvy::dotenv().ok();

    let settings = Settings::load(&args.config)
        .with_context(|| format!("loading settings from {}", args.config.display()))?;

    init_tracing(TracingConfig::from(&settings.logging));

    check_ffmpeg_binary(&settings.pipeline.ffmpeg_path).with_context(|| {
        format!(
            "ffmpeg binary {} is not usable",
            settings.pipeline.ffmpeg_path.display()
        )
    })?;

    let http = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .build()
        .context("building HTTP client")?;

    let telegram = TelegramClient::new(
        http.clone(),
        settings.telegram.api_base_url.clone(),
        settings.telegram.bot_token.clone(),
        Duration::from_secs(settings.telegram.poll_timeout_secs),
    )?;
    let bot_username = telegram
        .bot_username()
        .await
        .context("authorizing bot token")?;
    tracing::info!(bot = %bot_username, "Authorized on Telegram");
    let chat: Arc<dyn ChatClient> = Arc::new(telegram);

    let credentials_file = settings
        .google
        .credentials_file
        .clone()
        .context("google.credentials_file is not set")?;
    let credentials = GoogleCredentials::service_account(&credentials_file, http.clone())?;
    let transcription = Arc::new(GoogleSpeechService::new(
        http,
        credentials,
        GoogleSpeechConfig {
            base_url: settings.google.speech_base_url.clone(),
            project_id: settings.google.project_id.clone(),
            recognizer_name: settings.google.recognizer_name.clone(),
            language_codes: settings.google.language_codes.clone(),
            model: settings.google.model.clone(),
            polling: PollingConfig {
                initial_interval: Duration::from_millis(settings.google.poll_initial_interval_ms),
                max_interval: Duration::from_millis(settings.google.poll_max_interval_ms),
                timeout: Duration::from_secs(settings.google.operation_timeout_secs),
            },
        },
    ));

    let blob_store = BlobStoreFactory::create(&settings.storage, &credentials_file)?;

    let transcoder = Arc::new(
        FfmpegTranscoder::new(settings.pipeline.ffmpeg_path.clone())
            .with_scratch_dir(settings.pipeline.scratch_dir.clone()),
    );

    let gate = if settings.access.enabled {
        AccessGate::new(settings.access.allowed_users.iter().cloned())
    } else {
        tracing::warn!("Access gate disabled, every sender is allowed");
        AccessGate::disabled()
    };

    let pipeline = Arc::new(VoicePipeline::new(
        Arc::clone(&chat),
        transcoder,
        Arc::new(WavDurationProber),
        blob_store,
        transcription,
        PipelinePolicy {
            gate,
            routing: RoutingPolicy::new(
                settings.pipeline.remote_threshold_secs,
                settings.pipeline.always_remote,
            ),
            run_timeout: settings.pipeline.run_timeout(),
        },
    ));

    let shutdown = CancellationToken::new();
    let (sender, receiver) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

    let worker = MessageWorker::new(
        receiver,
        pipeline,
        Arc::clone(&chat),
        settings.pipeline.max_concurrent_runs,
        shutdown.clone(),
    );
    let poller = UpdatePoller::new(chat, sender);

    tracing::info!(
        threshold_secs = settings.pipeline.remote_threshold_secs,
        always_remote = settings.pipeline.always_remote,
        max_concurrent_runs = settings.pipeline.max_concurrent_runs,
        "Spawning background tasks..."
    );
    let worker_task = tokio::spawn(worker.run());
    let poller_task = tokio::spawn(poller.run(shutdown.clone()));

    tokio::signal::ctrl_c()
        .await
        .context("waiting for shutdown signal")?;
    tracing::info!("Shutdown requested, cancelling in-flight runs");
    shutdown.cancel();

    if let Err(e) = poller_task.await {
        tracing::error!(error = %e, "Update poller panicked");
    }
    if let Err(e) = worker_task.await {
        tracing::error!(error = %e, "Message worker panicked");
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
