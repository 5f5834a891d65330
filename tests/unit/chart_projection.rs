//! Chart series built from backend shaped records

use feedback_dashboard::analysis::{scatter_series, theme_aggregate, PriorityBand};
use pretty_assertions::assert_eq;
use test_log::test;

use crate::common::test_data;

#[test]
fn test_scatter_bands_for_fixture_set() {
    let records = vec![
        test_data::create_scored_record(1, "Billing", 4, 6, 8.0),
        test_data::create_scored_record(2, "Billing", 3, 2, 6.0),
        test_data::create_scored_record(3, "UI", 2, 1, 5.9),
        test_data::create_processing_record(4),
        test_data::create_scored_record(5, "UI", 0, 7, 9.5),
    ];

    let bands: Vec<(i64, i64, PriorityBand)> = scatter_series(&records)
        .map(|p| (p.urgency, p.impact, p.band()))
        .collect();

    assert_eq!(
        bands,
        vec![
            (4, 6, PriorityBand::High),
            (3, 2, PriorityBand::Medium),
            (2, 1, PriorityBand::Low),
        ]
    );
}

#[test]
fn test_scatter_keeps_unscored_points_with_axes() {
    let mut record = test_data::create_processing_record(9);
    record.urgency = Some(5);
    record.impact = Some(5);

    let points: Vec<_> = scatter_series(std::slice::from_ref(&record)).collect();
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].band(), PriorityBand::Unscored);
    assert_eq!(points[0].theme, None);
}

#[test]
fn test_bug_report_bucket_mean() {
    let records = vec![
        test_data::create_scored_record(1, "Bug Report", 5, 5, 4.0),
        test_data::create_scored_record(2, "Feature Request", 5, 5, 7.0),
        test_data::create_scored_record(3, "Bug Report", 5, 5, 6.0),
        test_data::create_processing_record(4),
        test_data::create_scored_record(5, "Bug Report", 5, 5, 8.0),
    ];

    let buckets = theme_aggregate(&records);
    let summary: Vec<(&str, usize, f64)> = buckets
        .iter()
        .map(|b| (b.display_theme(), b.count, b.avg_priority))
        .collect();

    assert_eq!(
        summary,
        vec![
            ("Bug Report", 3, 6.0),
            ("Feature Request", 1, 7.0),
            ("Processing...", 1, 0.0),
        ]
    );
}
