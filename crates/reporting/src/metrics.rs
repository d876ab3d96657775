//! Dashboard metrics: one call producing every row-derived view.

use burst_core::types::TelemetryRow;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::impact::{calculate_feature_impact, FeatureImpact};
use crate::kpi::{calculate_kpis, KpiMetrics};
use crate::rows::{aggregate_by_account, aggregate_by_day, AccountSummary, DailyMetric};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardMetrics {
    pub kpis: KpiMetrics,
    pub daily_metrics: Vec<DailyMetric>,
    pub account_summaries: Vec<AccountSummary>,
    pub feature_impact: Vec<FeatureImpact>,
}

/// Daily rollup runs first; KPI trends are read off it.
pub fn calculate_metrics(rows: &[TelemetryRow]) -> DashboardMetrics {
    let daily_metrics = aggregate_by_day(rows);
    let account_summaries = aggregate_by_account(rows);
    let feature_impact = calculate_feature_impact(rows);
    let kpis = calculate_kpis(rows, &daily_metrics);

    info!(
        rows = rows.len(),
        days = daily_metrics.len(),
        accounts = account_summaries.len(),
        compared = feature_impact.len(),
        "dashboard metrics calculated"
    );

    DashboardMetrics {
        kpis,
        daily_metrics,
        account_summaries,
        feature_impact,
    }
}
