use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tokio::time::Instant;

use crate::application::ports::{TranscriptionError, TranscriptionService};
use crate::domain::{BlobHandle, NormalizedAudio, Transcript};

use super::google_auth::GoogleCredentials;

pub const DEFAULT_SPEECH_BASE_URL: &str = "https://speech.googleapis.com";

/// Backoff for polling a batch recognition operation.
#[derive(Debug, Clone)]
pub struct PollingConfig {
    pub initial_interval: Duration,
    pub max_interval: Duration,
    pub timeout: Duration,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_secs(1),
            max_interval: Duration::from_secs(10),
            timeout: Duration::from_secs(30 * 60),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GoogleSpeechConfig {
    pub base_url: String,
    pub project_id: String,
    pub recognizer_name: String,
    pub language_codes: Vec<String>,
    pub model: String,
    pub polling: PollingConfig,
}

/// Full resource name of a recognizer in the global location.
pub fn recognizer_path(project_id: &str, recognizer_name: &str) -> String {
    format!("projects/{project_id}/locations/global/recognizers/{recognizer_name}")
}

fn recognition_config(config: &GoogleSpeechConfig) -> Value {
    json!({
        "autoDecodingConfig": {},
        "languageCodes": config.language_codes,
        "model": config.model,
    })
}

/// Body of a synchronous `recognize` call with the audio inlined.
pub fn recognize_request(config: &GoogleSpeechConfig, wav: &[u8]) -> Value {
    json!({
        "config": recognition_config(config),
        "content": BASE64.encode(wav),
    })
}

/// Body of a `batchRecognize` call for one staged file, results returned inline.
pub fn batch_recognize_request(config: &GoogleSpeechConfig, uri: &str) -> Value {
    json!({
        "config": recognition_config(config),
        "files": [{ "uri": uri }],
        "recognitionOutputConfig": { "inlineResponseConfig": {} },
    })
}

#[derive(Debug, Default, Deserialize)]
struct RecognitionResults {
    #[serde(default)]
    results: Vec<RecognitionResult>,
}

#[derive(Debug, Deserialize)]
struct RecognitionResult {
    #[serde(default)]
    alternatives: Vec<Alternative>,
}

#[derive(Debug, Deserialize)]
struct Alternative {
    #[serde(default)]
    transcript: String,
}

impl RecognitionResults {
    fn into_transcript(self) -> Transcript {
        Transcript::from_segments(
            self.results
                .into_iter()
                .filter_map(|r| r.alternatives.into_iter().next())
                .map(|a| a.transcript),
        )
    }
}

#[derive(Debug, Deserialize)]
struct Operation {
    name: String,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    error: Option<Status>,
    #[serde(default)]
    response: Option<BatchRecognizeResponse>,
}

#[derive(Debug, Deserialize)]
struct Status {
    #[serde(default)]
    code: i32,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct BatchRecognizeResponse {
    #[serde(default)]
    results: HashMap<String, FileResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileResult {
    #[serde(default)]
    error: Option<Status>,
    #[serde(default)]
    inline_result: Option<InlineResult>,
    #[serde(default)]
    transcript: Option<RecognitionResults>,
}

#[derive(Debug, Deserialize)]
struct InlineResult {
    #[serde(default)]
    transcript: RecognitionResults,
}

/// Google Cloud Speech-to-Text v2 over REST.
pub struct GoogleSpeechService {
    http: reqwest::Client,
    credentials: GoogleCredentials,
    config: GoogleSpeechConfig,
    recognizer: String,
}

impl GoogleSpeechService {
    pub fn new(
        http: reqwest::Client,
        credentials: GoogleCredentials,
        config: GoogleSpeechConfig,
    ) -> Self {
        let recognizer = recognizer_path(&config.project_id, &config.recognizer_name);
        Self {
            http,
            credentials,
            config,
            recognizer,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/v2/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn call<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, TranscriptionError> {
        let token = self.credentials.bearer_token().await?;
        let response = request
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| TranscriptionError::ApiRequestFailed(format!("request: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(TranscriptionError::ApiRequestFailed(format!(
                "status {status}: {body}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| TranscriptionError::InvalidResponse(e.to_string()))
    }

    async fn wait_for(&self, mut operation: Operation) -> Result<Operation, TranscriptionError> {
        let polling = &self.config.polling;
        let started = Instant::now();
        let mut interval = polling.initial_interval;

        while !operation.done {
            if started.elapsed() >= polling.timeout {
                return Err(TranscriptionError::OperationTimedOut {
                    operation: operation.name,
                    waited_secs: started.elapsed().as_secs(),
                });
            }
            tracing::debug!(
                operation = %operation.name,
                interval_ms = interval.as_millis() as u64,
                "Waiting for batch recognition"
            );
            tokio::time::sleep(interval).await;
            interval = (interval * 2).min(polling.max_interval);

            let url = self.endpoint(&operation.name);
            operation = self.call(self.http.get(url)).await?;
        }
        Ok(operation)
    }
}

#[async_trait]
impl TranscriptionService for GoogleSpeechService {
    async fn recognize_inline(
        &self,
        audio: &NormalizedAudio,
    ) -> Result<Transcript, TranscriptionError> {
        let url = self.endpoint(&format!("{}:recognize", self.recognizer));
        let body = recognize_request(&self.config, audio.bytes());

        tracing::debug!(
            recognizer = %self.recognizer,
            bytes = audio.len(),
            "Sending inline recognition request"
        );
        let results: RecognitionResults = self.call(self.http.post(url).json(&body)).await?;
        Ok(results.into_transcript())
    }

    async fn recognize_remote(
        &self,
        handle: &BlobHandle,
    ) -> Result<Transcript, TranscriptionError> {
        let url = self.endpoint(&format!("{}:batchRecognize", self.recognizer));
        let body = batch_recognize_request(&self.config, handle.uri());

        let operation: Operation = self.call(self.http.post(url).json(&body)).await?;
        tracing::info!(operation = %operation.name, blob = %handle, "Batch recognition started");

        let operation = self.wait_for(operation).await?;
        if let Some(status) = operation.error {
            return Err(TranscriptionError::OperationFailed(format!(
                "code {}: {}",
                status.code, status.message
            )));
        }

        let mut response = operation.response.ok_or_else(|| {
            TranscriptionError::InvalidResponse("finished operation has no response".into())
        })?;
        let file = response
            .results
            .remove(handle.uri())
            .ok_or_else(|| TranscriptionError::MissingResult(handle.uri().to_string()))?;

        if let Some(status) = file.error.filter(|s| s.code != 0) {
            return Err(TranscriptionError::OperationFailed(format!(
                "{}: code {}: {}",
                handle.uri(),
                status.code,
                status.message
            )));
        }

        let results = file
            .inline_result
            .map(|inline| inline.transcript)
            .or(file.transcript)
            .unwrap_or_default();
        Ok(results.into_transcript())
    }
}
