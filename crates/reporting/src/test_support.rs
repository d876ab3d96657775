use burst_core::types::{BlockingStatus, TelemetryRow};
use chrono::NaiveDate;

/// Row for account `account_id` observed on 2024-01-`day` at `hour`:00,
/// with the feature enabled on 2024-01-05.
pub(crate) fn row(
    account_id: u64,
    (day, hour): (u32, u32),
    rate: Option<f64>,
    mac: Option<f64>,
    spikes: Option<u64>,
    blocking: Option<f64>,
    status: BlockingStatus,
) -> TelemetryRow {
    TelemetryRow {
        account_id,
        description: format!("Account {account_id}"),
        observed_at: NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap(),
        feature_date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
        avg_depletion_rate: rate,
        mac_avg: mac,
        spikes_count: spikes,
        blocking_amount: blocking,
        blocking_status: status,
    }
}
