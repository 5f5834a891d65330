//! Controller driven end to end through the HTTP clients

use feedback_dashboard::api::{FeedbackClient, ReportClient};
use feedback_dashboard::ui::{DashboardController, Notice};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{backend, logging, test_data};

fn controller(server: &MockServer, threshold: usize) -> DashboardController {
    DashboardController::new(
        Arc::new(FeedbackClient::with_api(backend::api_for(server))),
        Arc::new(ReportClient::with_api(backend::api_for(server))),
        threshold,
    )
}

async fn settle(controller: &mut DashboardController) {
    while controller.tracker.has_active_operations() {
        controller.process_next_update().await;
    }
}

fn feedback_list(ids: std::ops::RangeInclusive<i64>) -> serde_json::Value {
    json!(ids.map(|id| test_data::feedback_json(id, Some(id as f64))).collect::<Vec<_>>())
}

#[tokio::test]
async fn test_submit_reaching_threshold_refreshes_and_generates_report() {
    logging::init_test_logging();
    logging::log_test_step("Mount, submit fourth entry, expect auto report");

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feedback/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(feedback_list(1..=3)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/feedback/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(feedback_list(1..=4)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/report/latest"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "No reports found"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/feedback/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(test_data::feedback_json(4, None)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/report/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(test_data::report_json(1)))
        .expect(1)
        .mount(&server)
        .await;

    let mut c = controller(&server, 4);
    c.mount();
    settle(&mut c).await;
    assert_eq!(c.feedback.len(), 3);
    assert!(c.report.is_none());
    assert_eq!(c.notice, None);

    c.form.text = "Search results are stale".to_string();
    assert!(c.submit_feedback());
    settle(&mut c).await;

    assert_eq!(c.feedback.len(), 4);
    assert_eq!(c.report.as_ref().map(|r| r.id), Some(1));
    assert_eq!(c.sorted_feedback()[0].id, 4);
    assert!(c.form.text.is_empty());
}

#[tokio::test]
async fn test_confirmed_delete_refetches() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feedback/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(feedback_list(1..=2)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/feedback/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(feedback_list(1..=1)))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/feedback/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Feedback deleted"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut c = controller(&server, 0);
    c.refresh_feedback();
    settle(&mut c).await;

    // Highest priority first, so row 0 is id 2.
    c.request_delete_selected();
    assert_eq!(c.pending_delete, Some(2));
    assert!(c.confirm_delete(true));
    settle(&mut c).await;

    assert_eq!(c.feedback.len(), 1);
    assert_eq!(c.notice, Some(Notice::success("Deleted feedback 2")));
}

#[tokio::test]
async fn test_report_failure_leaves_dashboard_usable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feedback/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(feedback_list(1..=2)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/report/latest"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database unavailable"))
        .mount(&server)
        .await;

    let mut c = controller(&server, 0);
    c.mount();
    settle(&mut c).await;

    assert_eq!(c.feedback.len(), 2);
    assert!(c.report.is_none());
    assert_eq!(c.notice, Some(Notice::error("Failed to load the latest report")));
    assert_eq!(c.stats().display_avg_urgency(), "8.0");
}
