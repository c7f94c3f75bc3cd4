use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use voicescribe::application::ports::{TranscriptionError, TranscriptionService};
use voicescribe::domain::{BlobHandle, EMPTY_TRANSCRIPT_PLACEHOLDER, NormalizedAudio};
use voicescribe::infrastructure::speech::{
    GoogleCredentials, GoogleSpeechConfig, GoogleSpeechService, PollingConfig,
    batch_recognize_request, recognize_request, recognizer_path,
};

use crate::helpers::mock_server;

const RECOGNIZER: &str = "/v2/projects/proj-1/locations/global/recognizers/voice";
const BLOB_URI: &str = "gs://voice-bucket/rec-1.wav";

fn config(base_url: &str) -> GoogleSpeechConfig {
    GoogleSpeechConfig {
        base_url: base_url.to_string(),
        project_id: "proj-1".to_string(),
        recognizer_name: "voice".to_string(),
        language_codes: vec!["ru-RU".to_string(), "en-GB".to_string()],
        model: "long".to_string(),
        polling: PollingConfig {
            initial_interval: Duration::from_millis(5),
            max_interval: Duration::from_millis(20),
            timeout: Duration::from_secs(5),
        },
    }
}

fn service(base_url: &str) -> GoogleSpeechService {
    GoogleSpeechService::new(
        reqwest::Client::new(),
        GoogleCredentials::Static("test-token".to_string()),
        config(base_url),
    )
}

#[derive(Clone, Default)]
struct Recorded {
    bodies: Arc<Mutex<Vec<Value>>>,
    auth: Arc<Mutex<Vec<String>>>,
    polls: Arc<AtomicUsize>,
}

impl Recorded {
    fn record(&self, headers: &HeaderMap, body: Value) {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        self.auth.lock().unwrap().push(auth);
        self.bodies.lock().unwrap().push(body);
    }
}

fn batch_done(results: Value) -> Value {
    json!({
        "name": "operations/op-1",
        "done": true,
        "response": {
            "@type": "type.googleapis.com/google.cloud.speech.v2.BatchRecognizeResponse",
            "results": results,
        }
    })
}

#[test]
fn given_project_and_name_when_building_recognizer_path_then_global_location() {
    assert_eq!(
        recognizer_path("project123", "recognizerABC"),
        "projects/project123/locations/global/recognizers/recognizerABC"
    );
}

#[test]
fn given_blob_uri_when_building_batch_request_then_single_inline_file() {
    let body = batch_recognize_request(&config("http://unused"), BLOB_URI);

    assert_eq!(body["files"][0]["uri"], BLOB_URI);
    assert_eq!(body["files"].as_array().unwrap().len(), 1);
    assert!(body["recognitionOutputConfig"]["inlineResponseConfig"].is_object());
    assert_eq!(body["config"]["model"], "long");
    assert_eq!(body["config"]["languageCodes"], json!(["ru-RU", "en-GB"]));
    assert!(body["config"]["autoDecodingConfig"].is_object());
}

#[test]
fn given_audio_when_building_inline_request_then_content_is_base64() {
    let body = recognize_request(&config("http://unused"), b"RIFF");

    assert_eq!(body["content"], "UklGRg==");
}

#[tokio::test]
async fn given_inline_results_when_recognizing_then_first_alternatives_joined() {
    let recorded = Recorded::default();
    let router = Router::new()
        .route(
            &format!("{RECOGNIZER}:recognize"),
            post(
                |State(r): State<Recorded>, h: HeaderMap, Json(b): Json<Value>| async move {
                    r.record(&h, b);
                    Json(json!({
                        "results": [
                            {
                                "alternatives": [
                                    { "transcript": "hello there" },
                                    { "transcript": "yellow hair" }
                                ]
                            },
                            { "alternatives": [] },
                            { "alternatives": [{ "transcript": "general" }] }
                        ]
                    }))
                },
            ),
        )
        .with_state(recorded.clone());
    let base = mock_server::spawn(router).await;

    let transcript = service(&base)
        .recognize_inline(&NormalizedAudio::new(b"RIFF".to_vec(), 1.0))
        .await
        .unwrap();

    assert_eq!(transcript.as_str(), "hello there\ngeneral");
    assert_eq!(*recorded.auth.lock().unwrap(), vec!["Bearer test-token".to_string()]);
    assert_eq!(recorded.bodies.lock().unwrap()[0]["content"], "UklGRg==");
}

#[tokio::test]
async fn given_no_results_when_recognizing_inline_then_placeholder() {
    let router = Router::new().route(
        &format!("{RECOGNIZER}:recognize"),
        post(|| async { Json(json!({})) }),
    );
    let base = mock_server::spawn(router).await;

    let transcript = service(&base)
        .recognize_inline(&NormalizedAudio::new(b"RIFF".to_vec(), 1.0))
        .await
        .unwrap();

    assert_eq!(transcript.as_str(), EMPTY_TRANSCRIPT_PLACEHOLDER);
}

#[tokio::test]
async fn given_backend_error_status_when_recognizing_then_api_request_failed() {
    let router = Router::new().route(
        &format!("{RECOGNIZER}:recognize"),
        post(|| async { (StatusCode::FORBIDDEN, "permission denied") }),
    );
    let base = mock_server::spawn(router).await;

    let err = service(&base)
        .recognize_inline(&NormalizedAudio::new(b"RIFF".to_vec(), 1.0))
        .await
        .unwrap_err();

    assert!(matches!(err, TranscriptionError::ApiRequestFailed(msg) if msg.contains("403")));
}

#[tokio::test]
async fn given_pending_operation_when_recognizing_remote_then_polls_until_done() {
    let recorded = Recorded::default();
    let router = Router::new()
        .route(
            &format!("{RECOGNIZER}:batchRecognize"),
            post(
                |State(r): State<Recorded>, h: HeaderMap, Json(b): Json<Value>| async move {
                    r.record(&h, b);
                    Json(json!({ "name": "operations/op-1", "done": false }))
                },
            ),
        )
        .route(
            "/v2/operations/op-1",
            get(|State(r): State<Recorded>| async move {
                if r.polls.fetch_add(1, Ordering::SeqCst) < 2 {
                    return Json(json!({ "name": "operations/op-1", "done": false }));
                }
                Json(batch_done(json!({
                    BLOB_URI: {
                        "inlineResult": {
                            "transcript": {
                                "results": [
                                    { "alternatives": [{ "transcript": "part one" }] },
                                    { "alternatives": [{ "transcript": "part two" }] }
                                ]
                            }
                        }
                    }
                })))
            }),
        )
        .with_state(recorded.clone());
    let base = mock_server::spawn(router).await;

    let transcript = service(&base)
        .recognize_remote(&BlobHandle::new("rec-1.wav", BLOB_URI))
        .await
        .unwrap();

    assert_eq!(transcript.as_str(), "part one\npart two");
    assert_eq!(recorded.polls.load(Ordering::SeqCst), 3);
    assert_eq!(recorded.bodies.lock().unwrap()[0]["files"][0]["uri"], BLOB_URI);
}

#[tokio::test]
async fn given_file_entry_without_segments_when_recognizing_remote_then_placeholder() {
    let router = Router::new().route(
        &format!("{RECOGNIZER}:batchRecognize"),
        post(|| async { Json(batch_done(json!({ BLOB_URI: { "inlineResult": {} } }))) }),
    );
    let base = mock_server::spawn(router).await;

    let transcript = service(&base)
        .recognize_remote(&BlobHandle::new("rec-1.wav", BLOB_URI))
        .await
        .unwrap();

    assert!(transcript.is_placeholder());
}

#[tokio::test]
async fn given_result_for_other_uri_when_recognizing_remote_then_missing_result() {
    let router = Router::new().route(
        &format!("{RECOGNIZER}:batchRecognize"),
        post(|| async {
            Json(batch_done(json!({ "gs://voice-bucket/other.wav": { "inlineResult": {} } })))
        }),
    );
    let base = mock_server::spawn(router).await;

    let err = service(&base)
        .recognize_remote(&BlobHandle::new("rec-1.wav", BLOB_URI))
        .await
        .unwrap_err();

    assert!(matches!(err, TranscriptionError::MissingResult(uri) if uri == BLOB_URI));
}

#[tokio::test]
async fn given_operation_error_when_recognizing_remote_then_operation_failed() {
    let router = Router::new().route(
        &format!("{RECOGNIZER}:batchRecognize"),
        post(|| async {
            Json(json!({
                "name": "operations/op-1",
                "done": true,
                "error": { "code": 3, "message": "audio too long" }
            }))
        }),
    );
    let base = mock_server::spawn(router).await;

    let err = service(&base)
        .recognize_remote(&BlobHandle::new("rec-1.wav", BLOB_URI))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        TranscriptionError::OperationFailed(msg) if msg.contains("audio too long")
    ));
}

#[tokio::test]
async fn given_file_level_error_when_recognizing_remote_then_operation_failed() {
    let router = Router::new().route(
        &format!("{RECOGNIZER}:batchRecognize"),
        post(|| async {
            Json(batch_done(json!({
                BLOB_URI: { "error": { "code": 5, "message": "object not found" } }
            })))
        }),
    );
    let base = mock_server::spawn(router).await;

    let err = service(&base)
        .recognize_remote(&BlobHandle::new("rec-1.wav", BLOB_URI))
        .await
        .unwrap_err();

    assert!(matches!(err, TranscriptionError::OperationFailed(_)));
}

#[tokio::test]
async fn given_operation_never_finishes_when_recognizing_remote_then_times_out() {
    let router = Router::new()
        .route(
            &format!("{RECOGNIZER}:batchRecognize"),
            post(|| async { Json(json!({ "name": "operations/op-1" })) }),
        )
        .route(
            "/v2/operations/op-1",
            get(|| async { Json(json!({ "name": "operations/op-1", "done": false })) }),
        );
    let base = mock_server::spawn(router).await;
    let mut cfg = config(&base);
    cfg.polling.timeout = Duration::from_millis(100);
    let service = GoogleSpeechService::new(
        reqwest::Client::new(),
        GoogleCredentials::Static("test-token".to_string()),
        cfg,
    );

    let err = service
        .recognize_remote(&BlobHandle::new("rec-1.wav", BLOB_URI))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        TranscriptionError::OperationTimedOut { operation, .. } if operation == "operations/op-1"
    ));
}
