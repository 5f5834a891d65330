//! Report and health routes against a mock backend

use assert_matches::assert_matches;
use feedback_dashboard::api::{ApiError, ReportClient, ReportGateway};
use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{backend, test_data};

fn client(server: &MockServer) -> ReportClient {
    ReportClient::with_api(backend::api_for(server))
}

#[tokio::test]
async fn test_latest_report() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/report/latest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(test_data::report_json(3)))
        .mount(&server)
        .await;

    let report = client(&server).latest_report().await.unwrap().unwrap();
    assert_eq!(report.id, 3);
    assert_eq!(report.generated_at.to_rfc3339(), "2025-03-05T08:00:00+00:00");
    assert!(report.markdown_report.starts_with("# Priority Report"));
}

#[tokio::test]
async fn test_latest_report_not_found_means_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/report/latest"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "No reports found"})))
        .mount(&server)
        .await;

    assert_eq!(client(&server).latest_report().await.unwrap(), None);
}

#[tokio::test]
async fn test_latest_report_server_error_propagates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/report/latest"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client(&server).latest_report().await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
}

#[tokio::test]
async fn test_list_reports() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/report/all"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([test_data::report_json(2), test_data::report_json(1)])),
        )
        .mount(&server)
        .await;

    let reports = client(&server).list_reports().await.unwrap();
    let ids: Vec<i64> = reports.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![2, 1]);
}

#[tokio::test]
async fn test_generate_report_uses_post_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/report/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(test_data::report_json(8)))
        .expect(1)
        .mount(&server)
        .await;

    let report = client(&server).generate_report().await.unwrap();
    assert_eq!(report.id, 8);
}

#[tokio::test]
async fn test_send_report_email_posts_address() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/report/send-to-email"))
        .and(body_json(json!({"email": "lead@example.com"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Report sent"})))
        .expect(1)
        .mount(&server)
        .await;

    client(&server).send_report_email("lead@example.com").await.unwrap();
}

#[tokio::test]
async fn test_send_report_email_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/report/send-to-email"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"detail": "SMTP error"})))
        .mount(&server)
        .await;

    let err = client(&server).send_report_email("lead@example.com").await.unwrap_err();
    assert_matches!(err, ApiError::Status { status, .. } if status == StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_health_probe() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "healthy",
            "timestamp": "2025-03-05T08:00:00.123456",
            "database": "connected",
            "llm_configured": true
        })))
        .mount(&server)
        .await;

    let health = backend::api_for(&server).health().await.unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.database, "connected");
    assert!(health.llm_configured);
}
