use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};

/// Whether burst protection throttled an account on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockingStatus {
    #[serde(rename = "BLOCKED")]
    Blocked,
    #[serde(rename = "NOT_BLOCKED", alias = "NOT BLOCKED")]
    NotBlocked,
}

impl BlockingStatus {
    pub fn is_blocked(self) -> bool {
        matches!(self, Self::Blocked)
    }
}

/// One account's burst-protection telemetry for one day, as returned by the
/// warehouse query. Rows arrive schema-validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRow {
    pub account_id: u64,
    pub description: String,
    #[serde(deserialize_with = "date_or_datetime")]
    pub observed_at: NaiveDateTime,
    /// Day burst protection was enabled. Identical on every row of an account.
    pub feature_date: NaiveDate,
    /// Spend vs. expected daily budget, in percent.
    pub avg_depletion_rate: Option<f64>,
    /// Depletion rate restricted to max-conversions campaigns.
    pub mac_avg: Option<f64>,
    pub spikes_count: Option<u64>,
    pub blocking_amount: Option<f64>,
    pub blocking_status: BlockingStatus,
}

impl TelemetryRow {
    pub fn observed_day(&self) -> NaiveDate {
        self.observed_at.date()
    }

    /// First instant of the feature date. Observations before it are pre-feature.
    pub fn feature_start(&self) -> NaiveDateTime {
        self.feature_date.and_time(NaiveTime::MIN)
    }

    pub fn is_pre_feature(&self) -> bool {
        self.observed_at < self.feature_start()
    }
}

/// A span during which a campaign was judged to be actively spending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowRecord {
    pub campaign_id: u64,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub avg_expected_hourly_spend: Option<f64>,
    pub avg_current_period_spend: Option<f64>,
    /// Supplied by the source; not recomputed from the bounds.
    pub window_duration_minutes: f64,
}

/// Campaign roster entry used to label window timelines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: u64,
    pub name: String,
    pub advertiser_id: u64,
    #[serde(default)]
    pub status: Option<String>,
}

/// Accepts either a full `YYYY-MM-DDTHH:MM:SS` timestamp or a bare date,
/// which maps to midnight.
fn date_or_datetime<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(ts) = raw.parse::<NaiveDateTime>() {
        return Ok(ts);
    }
    raw.parse::<NaiveDate>()
        .map(|d| d.and_time(NaiveTime::MIN))
        .map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_json(observed_at: &str, status: &str) -> String {
        format!(
            r#"{{
                "account_id": 7,
                "description": "Acme",
                "observed_at": "{observed_at}",
                "feature_date": "2024-03-10",
                "avg_depletion_rate": 81.5,
                "mac_avg": null,
                "spikes_count": 2,
                "blocking_amount": null,
                "blocking_status": "{status}"
            }}"#
        )
    }

    #[test]
    fn test_row_accepts_datetime_and_bare_date() {
        let full: TelemetryRow =
            serde_json::from_str(&row_json("2024-03-09T14:30:00", "BLOCKED")).unwrap();
        assert_eq!(full.observed_day(), NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
        assert!(full.blocking_status.is_blocked());

        let bare: TelemetryRow =
            serde_json::from_str(&row_json("2024-03-10", "NOT_BLOCKED")).unwrap();
        assert_eq!(bare.observed_at.time(), NaiveTime::MIN);
        assert!(!bare.blocking_status.is_blocked());
    }

    #[test]
    fn test_blocking_status_accepts_spaced_literal() {
        let row: TelemetryRow =
            serde_json::from_str(&row_json("2024-03-09T00:00:00", "NOT BLOCKED")).unwrap();
        assert_eq!(row.blocking_status, BlockingStatus::NotBlocked);
        assert_eq!(
            serde_json::to_string(&BlockingStatus::NotBlocked).unwrap(),
            "\"NOT_BLOCKED\""
        );
    }

    #[test]
    fn test_feature_date_counts_as_post() {
        let on_day: TelemetryRow =
            serde_json::from_str(&row_json("2024-03-10T00:00:00", "BLOCKED")).unwrap();
        let day_before: TelemetryRow =
            serde_json::from_str(&row_json("2024-03-09T23:59:59", "BLOCKED")).unwrap();
        assert!(!on_day.is_pre_feature());
        assert!(day_before.is_pre_feature());
    }

    #[test]
    fn test_invalid_timestamp_rejected() {
        let result = serde_json::from_str::<TelemetryRow>(&row_json("yesterday", "BLOCKED"));
        assert!(result.is_err());
    }
}
