//! Ordering and statistics over mixed scored/processing fixtures

use feedback_dashboard::analysis::{aggregate_stats, sorted_view, SortDirection, SortKey, SortState};
use feedback_dashboard::models::FeedbackRecord;
use pretty_assertions::assert_eq;
use test_log::test;

use crate::common::{logging, test_data};

fn mixed_records() -> Vec<FeedbackRecord> {
    vec![
        test_data::create_scored_record(1, "Billing", 4, 6, 5.2),
        test_data::create_processing_record(2),
        test_data::create_scored_record(3, "bug report", 9, 9, 9.1),
        test_data::create_scored_record(4, "Bug Report", 7, 5, 5.2),
        test_data::create_processing_record(5),
    ]
}

fn ids(view: &[&FeedbackRecord]) -> Vec<i64> {
    view.iter().map(|r| r.id).collect()
}

#[test]
fn test_every_key_yields_a_permutation() {
    logging::init_test_logging();
    let records = mixed_records();
    let keys = [
        SortKey::Id,
        SortKey::Text,
        SortKey::Source,
        SortKey::Sentiment,
        SortKey::Theme,
        SortKey::Summary,
        SortKey::Urgency,
        SortKey::Impact,
        SortKey::PriorityScore,
        SortKey::CreatedAt,
    ];

    for key in keys {
        for direction in [SortDirection::Ascending, SortDirection::Descending] {
            let mut sorted = ids(&sorted_view(&records, &SortState::new(key, direction)));
            logging::log_test_data("sorted ids", &(key, direction, &sorted));
            sorted.sort_unstable();
            assert_eq!(sorted, vec![1, 2, 3, 4, 5]);
        }
    }
}

#[test]
fn test_default_view_puts_unscored_last_in_input_order() {
    let records = mixed_records();
    let view = sorted_view(&records, &SortState::default());
    // 1 and 4 tie on 5.2; 2 and 5 tie on the absent score.
    assert_eq!(ids(&view), vec![3, 1, 4, 2, 5]);
}

#[test]
fn test_theme_sort_ignores_case_and_keeps_ties_stable() {
    let records = mixed_records();
    let view = sorted_view(&records, &SortState::new(SortKey::Theme, SortDirection::Ascending));
    assert_eq!(ids(&view), vec![2, 5, 1, 3, 4]);
}

#[test]
fn test_toggle_sequence_from_default() {
    let records = mixed_records();
    let mut state = SortState::default();

    state.toggle(SortKey::Urgency);
    assert_eq!(ids(&sorted_view(&records, &state)), vec![3, 4, 1, 2, 5]);

    state.toggle(SortKey::Urgency);
    assert_eq!(ids(&sorted_view(&records, &state)), vec![2, 5, 1, 4, 3]);
}

#[test]
fn test_stats_count_processing_records() {
    let stats = aggregate_stats(&mixed_records());
    assert_eq!(stats.total, 5);
    assert_eq!(stats.avg_urgency, 4.0);
    assert_eq!(stats.display_avg_impact(), "4.0");
}
