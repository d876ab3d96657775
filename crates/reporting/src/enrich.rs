//! Per-row derived fields relative to the feature launch.

use burst_core::types::TelemetryRow;
use serde::{Deserialize, Serialize};

/// Severity bucket for a depletion rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepletionCategory {
    Low,
    Medium,
    High,
    Critical,
}

impl DepletionCategory {
    pub fn from_rate(rate: f64) -> Self {
        if rate < 50.0 {
            Self::Low
        } else if rate < 80.0 {
            Self::Medium
        } else if rate < 100.0 {
            Self::High
        } else {
            Self::Critical
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRow {
    #[serde(flatten)]
    pub row: TelemetryRow,
    /// Negative before the feature day.
    pub days_since_feature: i64,
    pub is_pre_feature: bool,
    pub depletion_category: Option<DepletionCategory>,
}

impl From<TelemetryRow> for EnrichedRow {
    fn from(row: TelemetryRow) -> Self {
        Self {
            days_since_feature: (row.observed_day() - row.feature_date).num_days(),
            is_pre_feature: row.is_pre_feature(),
            depletion_category: row.avg_depletion_rate.map(DepletionCategory::from_rate),
            row,
        }
    }
}

pub fn enrich_rows(rows: &[TelemetryRow]) -> Vec<EnrichedRow> {
    rows.iter().cloned().map(EnrichedRow::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::row;
    use burst_core::types::BlockingStatus::NotBlocked;

    #[test]
    fn test_category_boundaries() {
        assert_eq!(DepletionCategory::from_rate(0.0), DepletionCategory::Low);
        assert_eq!(DepletionCategory::from_rate(49.99), DepletionCategory::Low);
        assert_eq!(DepletionCategory::from_rate(50.0), DepletionCategory::Medium);
        assert_eq!(DepletionCategory::from_rate(80.0), DepletionCategory::High);
        assert_eq!(DepletionCategory::from_rate(100.0), DepletionCategory::Critical);
        assert_eq!(DepletionCategory::from_rate(250.0), DepletionCategory::Critical);
    }

    #[test]
    fn test_days_since_feature_sign() {
        // Feature date in test rows is 2024-01-05.
        let rows = vec![
            row(1, (2, 18), Some(85.0), None, None, None, NotBlocked),
            row(1, (5, 0), None, None, None, None, NotBlocked),
            row(1, (9, 6), Some(20.0), None, None, None, NotBlocked),
        ];

        let enriched = enrich_rows(&rows);
        assert_eq!(enriched[0].days_since_feature, -3);
        assert!(enriched[0].is_pre_feature);
        assert_eq!(enriched[0].depletion_category, Some(DepletionCategory::High));

        assert_eq!(enriched[1].days_since_feature, 0);
        assert!(!enriched[1].is_pre_feature);
        assert_eq!(enriched[1].depletion_category, None);

        assert_eq!(enriched[2].days_since_feature, 4);
        assert_eq!(enriched[2].depletion_category, Some(DepletionCategory::Low));
    }

    #[test]
    fn test_enriched_row_flattens_source_fields() {
        let rows = vec![row(4, (3, 0), Some(60.0), None, None, None, NotBlocked)];
        let json = serde_json::to_value(&enrich_rows(&rows)[0]).unwrap();
        assert_eq!(json["account_id"], 4);
        assert_eq!(json["depletion_category"], "medium");
        assert_eq!(json["is_pre_feature"], true);
    }
}
