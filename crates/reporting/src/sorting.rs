//! Typed row ordering for tabular views.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use burst_core::error::BurstError;
use burst_core::types::TelemetryRow;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    AccountId,
    AvgDepletionRate,
    SpikesCount,
    FeatureDate,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortField {
    pub const ALL: [SortField; 4] = [
        Self::AccountId,
        Self::AvgDepletionRate,
        Self::SpikesCount,
        Self::FeatureDate,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::AccountId => "account_id",
            Self::AvgDepletionRate => "avg_depletion_rate",
            Self::SpikesCount => "spikes_count",
            Self::FeatureDate => "feature_date",
        }
    }

    /// Ascending comparator. Absent values order before present ones.
    pub fn compare(self, a: &TelemetryRow, b: &TelemetryRow) -> Ordering {
        match self {
            Self::AccountId => a.account_id.cmp(&b.account_id),
            Self::AvgDepletionRate => compare_optional_f64(a.avg_depletion_rate, b.avg_depletion_rate),
            Self::SpikesCount => a.spikes_count.cmp(&b.spikes_count),
            Self::FeatureDate => a.feature_date.cmp(&b.feature_date),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = BurstError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| BurstError::Input(format!("unknown sort field '{s}'")))
    }
}

impl FromStr for SortOrder {
    type Err = BurstError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(BurstError::Input(format!("unknown sort order '{other}'"))),
        }
    }
}

fn compare_optional_f64(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable in-place sort by `field`.
pub fn sort_rows(rows: &mut [TelemetryRow], field: SortField, order: SortOrder) {
    rows.sort_by(|a, b| match order {
        SortOrder::Asc => field.compare(a, b),
        SortOrder::Desc => field.compare(b, a),
    });
}
