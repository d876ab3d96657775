//! Burst-protection analytics: daily and per-account rollups, feature
//! impact, KPI trends, and active-usage window timelines.
//!
//! Every entry point is a pure function over in-memory collections.

pub mod enrich;
pub mod impact;
pub mod intervals;
pub mod kpi;
pub mod metrics;
pub mod rows;
pub mod sorting;
pub mod windows;

#[cfg(test)]
mod test_support;

pub use enrich::{enrich_rows, DepletionCategory, EnrichedRow};
pub use impact::{calculate_feature_impact, FeatureImpact};
pub use intervals::{merge_intervals, TimeInterval};
pub use kpi::{calculate_kpis, KpiMetrics, Trend};
pub use metrics::{calculate_metrics, DashboardMetrics};
pub use rows::{aggregate_by_account, aggregate_by_day, AccountSummary, DailyMetric};
pub use sorting::{sort_rows, SortField, SortOrder};
pub use windows::{
    aggregate_windows_by_campaign, aggregate_windows_by_day, filter_windows, window_time_span,
    CampaignWindowSummary, WindowDayMetric, WindowFilter,
};
