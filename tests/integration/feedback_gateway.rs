//! Feedback routes against a mock backend

use assert_matches::assert_matches;
use feedback_dashboard::api::{ApiError, FeedbackClient, FeedbackGateway};
use feedback_dashboard::models::{Config, FeedbackSource, NewFeedback};
use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use serde_json::json;
use std::io::Write;
use wiremock::matchers::{body_json, body_string_contains, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{backend, logging, test_data};

fn client(server: &MockServer) -> FeedbackClient {
    FeedbackClient::with_api(backend::api_for(server))
}

#[tokio::test]
async fn test_list_feedback_decodes_processing_and_scored_rows() {
    logging::init_test_logging();
    logging::log_test_step("List feedback from mock backend");

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feedback/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([test_data::feedback_json(1, Some(8.4)), test_data::feedback_json(2, None)])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let records = client(&server).list_feedback().await.unwrap();
    logging::log_test_data("records", &records);

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].priority_score, Some(8.4));
    assert_eq!(records[0].theme.as_deref(), Some("Bug Report"));
    assert!(records[1].is_processing());
    assert_eq!(records[1].created_at.to_rfc3339(), "2025-03-04T10:11:12.345678+00:00");
}

#[tokio::test]
async fn test_get_feedback_by_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feedback/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(test_data::feedback_json(42, Some(6.0))))
        .mount(&server)
        .await;

    let record = client(&server).get_feedback(42).await.unwrap();
    assert_eq!(record.id, 42);
    assert_eq!(record.urgency, Some(8));
}

#[tokio::test]
async fn test_create_feedback_posts_text_and_source() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/feedback/"))
        .and(body_json(json!({"text": "App crashes on login", "source": "support"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(test_data::feedback_json(9, None)))
        .expect(1)
        .mount(&server)
        .await;

    let body = NewFeedback {
        text: "App crashes on login".to_string(),
        source: FeedbackSource::Support,
    };
    let record = client(&server).create_feedback(&body).await.unwrap();
    assert_eq!(record.id, 9);
}

#[tokio::test]
async fn test_delete_feedback() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/feedback/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Feedback deleted"})))
        .expect(1)
        .mount(&server)
        .await;

    client(&server).delete_feedback(5).await.unwrap();
}

#[tokio::test]
async fn test_delete_missing_feedback_is_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/feedback/404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Feedback not found"})))
        .mount(&server)
        .await;

    let err = client(&server).delete_feedback(404).await.unwrap_err();
    assert!(err.is_not_found());
    assert_matches!(err, ApiError::Status { status, ref body } if status == StatusCode::NOT_FOUND && body.contains("not found"));
}

#[tokio::test]
async fn test_upload_csv_sends_multipart_file() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/feedback/upload-csv"))
        .and(header_exists("content-type"))
        .and(body_string_contains("name=\"file\""))
        .and(body_string_contains("text,source"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"message": "Successfully uploaded 2 feedback entries"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "text,source\nSlow search,web\nLove the new UI,survey").unwrap();

    let receipt = client(&server).upload_csv(file.path()).await.unwrap();
    assert_eq!(receipt.message, "Successfully uploaded 2 feedback entries");
}

#[tokio::test]
async fn test_upload_missing_file_fails_before_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/feedback/upload-csv"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let err = client(&server)
        .upload_csv(&dir.path().join("missing.csv"))
        .await
        .unwrap_err();
    assert_matches!(err, ApiError::Io { .. });
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feedback/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client(&server).list_feedback().await.unwrap_err();
    assert_matches!(err, ApiError::Decode(_));
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() {
    let config = Config {
        api_url: "http://127.0.0.1:9".to_string(),
        request_timeout_secs: 2,
        ..Config::default()
    };

    let err = FeedbackClient::new(&config).unwrap().list_feedback().await.unwrap_err();
    assert_matches!(err, ApiError::Transport(_));
}
