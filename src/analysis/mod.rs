//! Client-side projections over the feedback list: table ordering, summary
//! statistics and chart series. Nothing here talks to the backend.

pub mod chart;
pub mod list_view;

pub use chart::{scatter_series, theme_aggregate, PriorityBand, ScatterPoint, ThemeBucket};
pub use list_view::{aggregate_stats, sorted_view, SortDirection, SortKey, SortState, SummaryStats};
