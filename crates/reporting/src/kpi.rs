//! Headline KPIs and first-half vs second-half trend labels.

use std::collections::HashSet;

use burst_core::types::TelemetryRow;
use serde::{Deserialize, Serialize};

use crate::rows::{mean_present, percentage, DailyMetric};

/// Minimum change in mean depletion rate (percentage points) that counts as a trend.
pub const DEPLETION_TREND_THRESHOLD: f64 = 5.0;
/// Minimum change in mean daily spikes that counts as a trend.
pub const SPIKE_TREND_THRESHOLD: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KpiTrends {
    pub depletion_rate: Trend,
    pub spikes: Trend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiMetrics {
    pub total_accounts: usize,
    pub accounts_with_feature: usize,
    pub avg_depletion_rate: f64,
    pub total_spikes: u64,
    pub daily_avg_spikes: f64,
    pub blocking_percentage: f64,
    pub total_blocking_amount: f64,
    pub trend: KpiTrends,
}

/// Compute KPIs over the raw rows, taking trends from the already sorted
/// daily rollup.
pub fn calculate_kpis(rows: &[TelemetryRow], daily: &[DailyMetric]) -> KpiMetrics {
    let accounts: HashSet<u64> = rows.iter().map(|r| r.account_id).collect();
    let days: HashSet<_> = rows.iter().map(|r| r.observed_day()).collect();

    let total_spikes: u64 = rows.iter().map(|r| r.spikes_count.unwrap_or(0)).sum();
    let daily_avg_spikes = if !days.is_empty() {
        total_spikes as f64 / days.len() as f64
    } else {
        0.0
    };
    let blocked = rows
        .iter()
        .filter(|r| r.blocking_status.is_blocked())
        .count();

    KpiMetrics {
        total_accounts: accounts.len(),
        accounts_with_feature: accounts.len(),
        avg_depletion_rate: mean_present(rows.iter().map(|r| r.avg_depletion_rate)),
        total_spikes,
        daily_avg_spikes,
        blocking_percentage: percentage(blocked, rows.len()),
        total_blocking_amount: rows.iter().map(|r| r.blocking_amount.unwrap_or(0.0)).sum(),
        trend: KpiTrends {
            depletion_rate: half_trend(daily, |d| d.avg_depletion_rate, DEPLETION_TREND_THRESHOLD),
            spikes: half_trend(daily, |d| d.total_spikes as f64, SPIKE_TREND_THRESHOLD),
        },
    }
}

/// Label the change from `first` to `second`. Stable only when the absolute
/// change is strictly below `threshold`.
pub fn classify_trend(first: f64, second: f64, threshold: f64) -> Trend {
    let diff = second - first;
    if diff.abs() < threshold {
        Trend::Stable
    } else if diff > 0.0 {
        Trend::Up
    } else {
        Trend::Down
    }
}

/// Split at `len / 2`; the second half takes the extra day of an odd split.
fn half_trend(daily: &[DailyMetric], value: impl Fn(&DailyMetric) -> f64, threshold: f64) -> Trend {
    let (first, second) = daily.split_at(daily.len() / 2);
    classify_trend(
        mean_present(first.iter().map(|d| Some(value(d)))),
        mean_present(second.iter().map(|d| Some(value(d)))),
        threshold,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rows::aggregate_by_day;
    use crate::test_support::row;
    use burst_core::types::BlockingStatus::{Blocked, NotBlocked};
    use chrono::NaiveDate;

    fn daily(rates: &[f64], spikes: &[u64]) -> Vec<DailyMetric> {
        rates
            .iter()
            .zip(spikes)
            .enumerate()
            .map(|(i, (&rate, &spikes))| DailyMetric {
                date: NaiveDate::from_ymd_opt(2024, 2, 1 + i as u32).unwrap(),
                avg_depletion_rate: rate,
                mac_avg: 0.0,
                total_spikes: spikes,
                total_blocking: 0.0,
                accounts_blocked: 0,
                accounts_tracked: 1,
            })
            .collect()
    }

    // 1. Trend classification ------------------------------------------------

    #[test]
    fn test_threshold_boundary_is_not_stable() {
        assert_eq!(classify_trend(50.0, 55.0, DEPLETION_TREND_THRESHOLD), Trend::Up);
        assert_eq!(classify_trend(55.0, 50.0, DEPLETION_TREND_THRESHOLD), Trend::Down);
        assert_eq!(classify_trend(50.0, 54.9, DEPLETION_TREND_THRESHOLD), Trend::Stable);
        assert_eq!(classify_trend(3.0, 4.0, SPIKE_TREND_THRESHOLD), Trend::Up);
        assert_eq!(classify_trend(3.0, 3.5, SPIKE_TREND_THRESHOLD), Trend::Stable);
    }

    #[test]
    fn test_halves_differing_by_exactly_five() {
        let days = daily(&[40.0, 40.0, 45.0, 45.0], &[0, 0, 0, 0]);
        let kpis = calculate_kpis(&[], &days);
        assert_eq!(kpis.trend.depletion_rate, Trend::Up);
        assert_eq!(kpis.trend.spikes, Trend::Stable);
    }

    #[test]
    fn test_odd_length_second_half_gets_extra_day() {
        // First half [90], second half [10, 10] -> down.
        let days = daily(&[90.0, 10.0, 10.0], &[5, 1, 1]);
        let kpis = calculate_kpis(&[], &days);
        assert_eq!(kpis.trend.depletion_rate, Trend::Down);
        assert_eq!(kpis.trend.spikes, Trend::Down);
    }

    #[test]
    fn test_single_day_compares_against_empty_first_half() {
        let days = daily(&[30.0], &[0]);
        let kpis = calculate_kpis(&[], &days);
        assert_eq!(kpis.trend.depletion_rate, Trend::Up);
        assert_eq!(kpis.trend.spikes, Trend::Stable);
    }

    // 2. Headline totals -----------------------------------------------------

    #[test]
    fn test_headline_totals() {
        let rows = vec![
            row(1, (1, 0), Some(40.0), None, Some(3), Some(10.0), Blocked),
            row(2, (1, 0), None, None, Some(1), None, NotBlocked),
            row(1, (2, 0), Some(60.0), None, None, Some(5.0), Blocked),
            row(3, (2, 0), Some(80.0), None, Some(2), None, NotBlocked),
        ];
        let kpis = calculate_kpis(&rows, &aggregate_by_day(&rows));

        assert_eq!(kpis.total_accounts, 3);
        assert_eq!(kpis.accounts_with_feature, 3);
        assert!((kpis.avg_depletion_rate - 60.0).abs() < f64::EPSILON);
        assert_eq!(kpis.total_spikes, 6);
        assert!((kpis.daily_avg_spikes - 3.0).abs() < f64::EPSILON);
        assert!((kpis.blocking_percentage - 50.0).abs() < f64::EPSILON);
        assert!((kpis.total_blocking_amount - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_rows_degrade_to_zero() {
        let kpis = calculate_kpis(&[], &[]);
        assert_eq!(kpis.total_accounts, 0);
        assert_eq!(kpis.avg_depletion_rate, 0.0);
        assert_eq!(kpis.daily_avg_spikes, 0.0);
        assert_eq!(kpis.blocking_percentage, 0.0);
        assert_eq!(kpis.trend.depletion_rate, Trend::Stable);
        assert_eq!(kpis.trend.spikes, Trend::Stable);
    }

    #[test]
    fn test_trend_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Trend::Stable).unwrap(), "\"stable\"");
    }
}
