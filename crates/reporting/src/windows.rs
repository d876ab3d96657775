//! Active-usage window timelines: per-day merged coverage and per-campaign
//! usage totals.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use burst_core::types::{Campaign, WindowRecord};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::intervals::{merge_intervals, total_duration_ms, TimeInterval};

const MS_PER_MINUTE: f64 = 60_000.0;

// ─── Types ──────────────────────────────────────────────────────────────────

/// Narrowing criteria for a window collection. Every criterion is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WindowFilter {
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    /// Empty means every campaign.
    #[serde(default)]
    pub campaign_ids: Vec<u64>,
}

impl WindowFilter {
    /// Inclusive day range: from the first instant of `start` to the last
    /// instant of `end`.
    pub fn with_date_range(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self {
            start_date: start.map(|d| d.and_time(NaiveTime::MIN)),
            end_date: end.and_then(|d| d.and_hms_milli_opt(23, 59, 59, 999)),
            campaign_ids: Vec::new(),
        }
    }

    pub fn campaigns(mut self, ids: impl IntoIterator<Item = u64>) -> Self {
        self.campaign_ids = ids.into_iter().collect();
        self
    }

    /// Overlap test: a window partially inside the range is kept whole.
    pub fn matches(&self, window: &WindowRecord) -> bool {
        if let Some(start) = self.start_date {
            if window.end_time < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if window.start_time > end {
                return false;
            }
        }
        self.campaign_ids.is_empty() || self.campaign_ids.contains(&window.campaign_id)
    }
}

/// Window activity on one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowDayMetric {
    pub date: NaiveDate,
    /// Windows touching the day. A multi-day window counts once per day.
    pub window_count: usize,
    /// Minutes covered by the union of the day's windows.
    pub total_duration_minutes: f64,
    pub campaigns: Vec<u64>,
}

/// All windows of one campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignWindowSummary {
    pub campaign_id: u64,
    pub campaign_name: Option<String>,
    /// Sorted ascending by start time.
    pub windows: Vec<WindowRecord>,
    pub total_windows: usize,
    /// Sum of source-supplied durations; overlapping windows count twice.
    pub total_duration_minutes: f64,
}

impl CampaignWindowSummary {
    pub fn display_name(&self) -> String {
        self.campaign_name
            .clone()
            .unwrap_or_else(|| format!("Campaign {}", self.campaign_id))
    }
}

#[derive(Default)]
struct DayAccumulator {
    intervals: Vec<TimeInterval>,
    campaigns: BTreeSet<u64>,
    window_count: usize,
}

// ─── Operations ─────────────────────────────────────────────────────────────

pub fn filter_windows(windows: &[WindowRecord], filter: &WindowFilter) -> Vec<WindowRecord> {
    let kept: Vec<WindowRecord> = windows
        .iter()
        .filter(|w| filter.matches(w))
        .cloned()
        .collect();
    debug!(input = windows.len(), kept = kept.len(), "windows filtered");
    kept
}

/// Split every window across the local calendar days it touches and report
/// per-day counts, merged coverage and campaign membership, ascending by day.
pub fn aggregate_windows_by_day(windows: &[WindowRecord]) -> Vec<WindowDayMetric> {
    let mut days: BTreeMap<NaiveDate, DayAccumulator> = BTreeMap::new();

    for window in windows {
        let last_day = window.end_time.date();
        for day in window
            .start_time
            .date()
            .iter_days()
            .take_while(|d| *d <= last_day)
        {
            let day_start = day.and_time(NaiveTime::MIN);
            let day_end = day_start + Duration::days(1);
            let overlap_start = window.start_time.max(day_start);
            let overlap_end = window.end_time.min(day_end);

            let acc = days.entry(day).or_default();
            acc.window_count += 1;
            acc.campaigns.insert(window.campaign_id);
            acc.intervals.push(TimeInterval::new(
                epoch_millis(overlap_start),
                epoch_millis(overlap_end),
            ));
        }
    }

    let metrics: Vec<WindowDayMetric> = days
        .into_iter()
        .map(|(date, acc)| {
            let merged = merge_intervals(acc.intervals);
            WindowDayMetric {
                date,
                window_count: acc.window_count,
                total_duration_minutes: total_duration_ms(&merged) as f64 / MS_PER_MINUTE,
                campaigns: acc.campaigns.into_iter().collect(),
            }
        })
        .collect();

    debug!(windows = windows.len(), days = metrics.len(), "windows aggregated by day");
    metrics
}

/// Group windows per campaign, labelled from `roster` when it has the id.
/// Sorted by window count, most active first.
pub fn aggregate_windows_by_campaign(
    windows: &[WindowRecord],
    roster: Option<&[Campaign]>,
) -> Vec<CampaignWindowSummary> {
    let names: HashMap<u64, &str> = roster
        .unwrap_or_default()
        .iter()
        .map(|c| (c.id, c.name.as_str()))
        .collect();

    let mut groups: HashMap<u64, Vec<WindowRecord>> = HashMap::new();
    for window in windows {
        groups
            .entry(window.campaign_id)
            .or_default()
            .push(window.clone());
    }

    let mut summaries: Vec<CampaignWindowSummary> = groups
        .into_iter()
        .map(|(campaign_id, mut windows)| {
            windows.sort_by_key(|w| w.start_time);
            let total_duration_minutes = windows.iter().map(|w| w.window_duration_minutes).sum();
            CampaignWindowSummary {
                campaign_id,
                campaign_name: names.get(&campaign_id).map(|n| n.to_string()),
                total_windows: windows.len(),
                total_duration_minutes,
                windows,
            }
        })
        .collect();

    summaries.sort_by(|a, b| {
        b.total_windows
            .cmp(&a.total_windows)
            .then(a.campaign_id.cmp(&b.campaign_id))
    });

    debug!(
        windows = windows.len(),
        campaigns = summaries.len(),
        "windows aggregated by campaign"
    );
    summaries
}

/// Earliest start and latest end across the windows.
pub fn window_time_span(windows: &[WindowRecord]) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let start = windows.iter().map(|w| w.start_time).min()?;
    let end = windows.iter().map(|w| w.end_time).max()?;
    Some((start, end))
}

fn epoch_millis(ts: NaiveDateTime) -> i64 {
    ts.and_utc().timestamp_millis()
}

// ─── Tests ──────────────────────────────────────────────────────────────────
