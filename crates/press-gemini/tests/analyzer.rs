//! Orchestrator tests against a scripted remote service.

use std::time::Duration;

use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use press_gemini::{AnalysisError, GeminiClient, GeminiConfig, VideoAnalyzer};

const FILE_NAME: &str = "files/test-video";

fn test_config(server: &MockServer) -> GeminiConfig {
    let mut config = GeminiConfig::new("test-key");
    config.base_url = server.uri();
    config.poll_interval = Duration::from_millis(10);
    config
}

fn analyzer_for(server: &MockServer, dir: &TempDir) -> VideoAnalyzer {
    analyzer_with_config(test_config(server), dir)
}

fn analyzer_with_config(config: GeminiConfig, dir: &TempDir) -> VideoAnalyzer {
    let client = GeminiClient::new(config).unwrap();
    VideoAnalyzer::new(client, dir.path())
}

/// Mount the two-step upload returning a remote file in `initial_state`.
async fn mount_upload(server: &MockServer, initial_state: &str) {
    Mock::given(method("POST"))
        .and(path("/upload/v1beta/files"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Goog-Upload-URL", format!("{}/upload-session", server.uri()).as_str()),
        )
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/upload-session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "file": {
                "name": FILE_NAME,
                "uri": format!("{}/v1beta/{}", server.uri(), FILE_NAME),
                "mimeType": "video/mp4",
                "state": initial_state,
            }
        })))
        .mount(server)
        .await;
}

/// Mount state checks: `processing_polls` PROCESSING responses, then ACTIVE.
async fn mount_poll_sequence(server: &MockServer, processing_polls: u64) {
    if processing_polls > 0 {
        Mock::given(method("GET"))
            .and(path(format!("/v1beta/{}", FILE_NAME)))
            .respond_with(ResponseTemplate::new(200).set_body_json(file_json("PROCESSING")))
            .up_to_n_times(processing_polls)
            .expect(processing_polls)
            .mount(server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path(format!("/v1beta/{}", FILE_NAME)))
        .respond_with(ResponseTemplate::new(200).set_body_json(file_json("ACTIVE")))
        .expect(1)
        .mount(server)
        .await;
}

fn file_json(state: &str) -> serde_json::Value {
    json!({
        "name": FILE_NAME,
        "uri": format!("https://example.invalid/v1beta/{}", FILE_NAME),
        "mimeType": "video/mp4",
        "state": state,
    })
}

fn generation_response(text: &str) -> serde_json::Value {
    json!({
        "candidates": [
            { "content": { "parts": [ { "text": text } ] } }
        ]
    })
}

async fn mount_generate(server: &MockServer, text: &str, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(generation_response(text)))
        .expect(expected_calls)
        .mount(server)
        .await;
}

async fn mount_delete(server: &MockServer, status: u16, expected_calls: u64) {
    Mock::given(method("DELETE"))
        .and(path(format!("/v1beta/{}", FILE_NAME)))
        .respond_with(ResponseTemplate::new(status))
        .expect(expected_calls)
        .mount(server)
        .await;
}

fn dir_is_empty(dir: &TempDir) -> bool {
    std::fs::read_dir(dir.path()).unwrap().next().is_none()
}

const VALID_PAYLOAD: &str = "{\"title\":\"T\",\"description\":\"D\",\"hashtags\":[\"a\",\"b\"]}";

// Scenario: 10MB upload, PROCESSING -> PROCESSING -> ACTIVE, valid JSON,
// then both cleanups.
#[tokio::test]
async fn analyze_success_scenario() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_upload(&server, "PROCESSING").await;
    mount_poll_sequence(&server, 2).await;
    mount_generate(&server, VALID_PAYLOAD, 1).await;
    mount_delete(&server, 200, 1).await;

    let analyzer = analyzer_for(&server, &dir);
    let video = vec![0u8; 10 * 1024 * 1024];

    let report = analyzer.analyze(&video, "big-video.mp4").await.unwrap();

    assert_eq!(report.payload.title, "T");
    assert_eq!(report.payload.description, "D");
    assert_eq!(report.payload.hashtags, vec!["a", "b"]);
    assert!(dir_is_empty(&dir), "local temp file must not outlive the job");
}

// P3: N PROCESSING responses then ACTIVE means exactly N+1 state checks,
// and generation only runs after ACTIVE. Counts enforced by mock
// expectations on drop.
#[tokio::test]
async fn analyze_polls_until_active() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_upload(&server, "PROCESSING").await;
    mount_poll_sequence(&server, 3).await;
    mount_generate(&server, VALID_PAYLOAD, 1).await;
    mount_delete(&server, 200, 1).await;

    let analyzer = analyzer_for(&server, &dir);
    let report = analyzer.analyze(b"video bytes", "clip.mp4").await.unwrap();

    assert_eq!(report.payload.title, "T");
    assert!(dir_is_empty(&dir));
}

// P4: FAILED on the first poll short-circuits; generate is never called.
#[tokio::test]
async fn analyze_failed_processing_short_circuits() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_upload(&server, "PROCESSING").await;
    Mock::given(method("GET"))
        .and(path(format!("/v1beta/{}", FILE_NAME)))
        .respond_with(ResponseTemplate::new(200).set_body_json(file_json("FAILED")))
        .expect(1)
        .mount(&server)
        .await;
    mount_generate(&server, VALID_PAYLOAD, 0).await;
    mount_delete(&server, 200, 1).await;

    let analyzer = analyzer_for(&server, &dir);
    let err = analyzer.analyze(b"corrupt", "bad.mp4").await.unwrap_err();

    assert!(matches!(err, AnalysisError::RemoteProcessing(_)));
    assert!(dir_is_empty(&dir));
}

// P5: markdown fences are stripped, nothing else changes.
#[tokio::test]
async fn analyze_strips_markdown_fences() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_upload(&server, "ACTIVE").await;
    mount_generate(&server, &format!("```json\n{}\n```", VALID_PAYLOAD), 1).await;
    mount_delete(&server, 200, 1).await;

    let analyzer = analyzer_for(&server, &dir);
    let report = analyzer.analyze(b"video", "clip.mp4").await.unwrap();

    assert_eq!(report.text, VALID_PAYLOAD);
    assert!(!report.text.contains("```"));
}

// P6: unparseable output is labeled, never substituted.
#[tokio::test]
async fn analyze_labels_malformed_payload() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_upload(&server, "ACTIVE").await;
    mount_generate(&server, "not json at all", 1).await;
    mount_delete(&server, 200, 1).await;

    let analyzer = analyzer_for(&server, &dir);
    let err = analyzer.analyze(b"video", "clip.mp4").await.unwrap_err();

    match err {
        AnalysisError::MalformedPayload { raw } => assert_eq!(raw, "not json at all"),
        other => panic!("expected MalformedPayload, got {:?}", other),
    }
    assert!(dir_is_empty(&dir));
}

// P1/P2 on the upload failure path: the local file is still removed, and
// no remote delete is attempted because no handle was ever obtained.
#[tokio::test]
async fn analyze_upload_failure_still_cleans_local() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .and(path("/upload/v1beta/files"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_delete(&server, 200, 0).await;

    let analyzer = analyzer_for(&server, &dir);
    let err = analyzer.analyze(b"video", "clip.mp4").await.unwrap_err();

    assert!(matches!(err, AnalysisError::Upload(_)));
    assert!(dir_is_empty(&dir));
}

// Remote delete failures are logged and swallowed; the job outcome is
// unaffected.
#[tokio::test]
async fn analyze_remote_delete_failure_is_swallowed() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_upload(&server, "ACTIVE").await;
    mount_generate(&server, VALID_PAYLOAD, 1).await;
    mount_delete(&server, 500, 1).await;

    let analyzer = analyzer_for(&server, &dir);
    let report = analyzer.analyze(b"video", "clip.mp4").await.unwrap();

    assert_eq!(report.payload.title, "T");
    assert!(dir_is_empty(&dir));
}

// With a configured ceiling the poll phase fails with its own error kind
// instead of spinning forever.
#[tokio::test]
async fn analyze_poll_ceiling_when_configured() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_upload(&server, "PROCESSING").await;
    Mock::given(method("GET"))
        .and(path(format!("/v1beta/{}", FILE_NAME)))
        .respond_with(ResponseTemplate::new(200).set_body_json(file_json("PROCESSING")))
        .mount(&server)
        .await;
    mount_delete(&server, 200, 1).await;

    let mut config = test_config(&server);
    config.poll_interval = Duration::from_millis(100);
    config.poll_timeout = Some(Duration::from_millis(250));

    let analyzer = analyzer_with_config(config, &dir);
    let err = analyzer.analyze(b"video", "clip.mp4").await.unwrap_err();

    assert!(matches!(err, AnalysisError::PollTimeout(_)));
    assert!(dir_is_empty(&dir));
}
