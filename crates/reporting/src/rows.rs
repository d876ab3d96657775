//! Per-day and per-account rollups of burst-protection telemetry.

use std::collections::{BTreeMap, HashMap, HashSet};

use burst_core::types::TelemetryRow;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Aggregate of every row observed on one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyMetric {
    pub date: NaiveDate,
    /// Mean over rows with a rate (0.0 when none have one).
    pub avg_depletion_rate: f64,
    pub mac_avg: f64,
    pub total_spikes: u64,
    pub total_blocking: f64,
    /// Rows with status BLOCKED.
    pub accounts_blocked: usize,
    /// Distinct accounts seen that day.
    pub accounts_tracked: usize,
}

/// Aggregate of every row of one account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub account_id: u64,
    pub description: String,
    pub feature_date: NaiveDate,
    /// Inclusive span between first and last observed day.
    pub days_active: i64,
    pub avg_depletion_rate: f64,
    pub mac_avg: f64,
    pub total_spikes: u64,
    pub blocking_days: usize,
    /// `blocking_days / rows * 100`.
    pub blocking_rate: f64,
    pub total_blocking_amount: f64,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// One entry per day present in `rows`, ascending by day. Days without rows
/// are not synthesized.
pub fn aggregate_by_day(rows: &[TelemetryRow]) -> Vec<DailyMetric> {
    let mut days: BTreeMap<NaiveDate, Vec<&TelemetryRow>> = BTreeMap::new();
    for row in rows {
        days.entry(row.observed_day()).or_default().push(row);
    }

    let metrics: Vec<DailyMetric> = days
        .into_iter()
        .map(|(date, group)| {
            let accounts: HashSet<u64> = group.iter().map(|r| r.account_id).collect();
            DailyMetric {
                date,
                avg_depletion_rate: mean_depletion_rate(&group),
                mac_avg: mean_mac(&group),
                total_spikes: total_spikes(&group),
                total_blocking: total_blocking(&group),
                accounts_blocked: blocked_count(&group),
                accounts_tracked: accounts.len(),
            }
        })
        .collect();

    debug!(rows = rows.len(), days = metrics.len(), "rows aggregated by day");
    metrics
}

/// One summary per account, highest mean depletion rate first.
pub fn aggregate_by_account(rows: &[TelemetryRow]) -> Vec<AccountSummary> {
    let groups = group_by_account(rows);

    let mut summaries: Vec<AccountSummary> = groups
        .into_iter()
        .filter_map(|(account_id, group)| {
            let first = *group.first()?;
            let min_day = group.iter().map(|r| r.observed_day()).min()?;
            let max_day = group.iter().map(|r| r.observed_day()).max()?;
            let blocking_days = blocked_count(&group);

            Some(AccountSummary {
                account_id,
                description: first.description.clone(),
                feature_date: first.feature_date,
                days_active: (max_day - min_day).num_days() + 1,
                avg_depletion_rate: mean_depletion_rate(&group),
                mac_avg: mean_mac(&group),
                total_spikes: total_spikes(&group),
                blocking_days,
                blocking_rate: percentage(blocking_days, group.len()),
                total_blocking_amount: total_blocking(&group),
            })
        })
        .collect();

    summaries.sort_by(|a, b| {
        b.avg_depletion_rate
            .total_cmp(&a.avg_depletion_rate)
            .then(a.account_id.cmp(&b.account_id))
    });

    debug!(
        rows = rows.len(),
        accounts = summaries.len(),
        "rows aggregated by account"
    );
    summaries
}

// -- shared helpers ---------------------------------------------------------

/// Rows per account, keeping each account's input order.
pub(crate) fn group_by_account(rows: &[TelemetryRow]) -> HashMap<u64, Vec<&TelemetryRow>> {
    let mut groups: HashMap<u64, Vec<&TelemetryRow>> = HashMap::new();
    for row in rows {
        groups.entry(row.account_id).or_default().push(row);
    }
    groups
}

/// Arithmetic mean of the present values; 0.0 when nothing is present.
pub(crate) fn mean_present(values: impl Iterator<Item = Option<f64>>) -> f64 {
    let (sum, count) = values
        .flatten()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count > 0 {
        sum / count as f64
    } else {
        0.0
    }
}

pub(crate) fn mean_depletion_rate(rows: &[&TelemetryRow]) -> f64 {
    mean_present(rows.iter().map(|r| r.avg_depletion_rate))
}

fn mean_mac(rows: &[&TelemetryRow]) -> f64 {
    mean_present(rows.iter().map(|r| r.mac_avg))
}

pub(crate) fn total_spikes(rows: &[&TelemetryRow]) -> u64 {
    rows.iter().map(|r| r.spikes_count.unwrap_or(0)).sum()
}

pub(crate) fn total_blocking(rows: &[&TelemetryRow]) -> f64 {
    rows.iter().map(|r| r.blocking_amount.unwrap_or(0.0)).sum()
}

pub(crate) fn blocked_count(rows: &[&TelemetryRow]) -> usize {
    rows.iter()
        .filter(|r| r.blocking_status.is_blocked())
        .count()
}

/// `part / whole * 100`, 0.0 for an empty whole.
pub(crate) fn percentage(part: usize, whole: usize) -> f64 {
    if whole > 0 {
        part as f64 / whole as f64 * 100.0
    } else {
        0.0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
