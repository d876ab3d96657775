//! Before/after comparison around each account's burst-protection launch.

use burst_core::types::TelemetryRow;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::rows::{group_by_account, mean_depletion_rate, total_spikes};

/// Depletion and spike change for one account across its feature date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImpact {
    pub account_id: u64,
    pub description: String,
    pub pre_avg_depletion: f64,
    pub post_avg_depletion: f64,
    pub pre_spikes: u64,
    pub post_spikes: u64,
    /// `(pre - post) / pre * 100`, 0.0 when the pre mean is 0.
    pub improvement_rate: f64,
    pub pre_rows: usize,
    pub post_rows: usize,
}

/// Split each account's rows at its feature date (the feature day itself is
/// post) and compare the halves. Accounts missing either side are dropped.
/// Largest improvement first.
pub fn calculate_feature_impact(rows: &[TelemetryRow]) -> Vec<FeatureImpact> {
    let mut impacts: Vec<FeatureImpact> = group_by_account(rows)
        .into_iter()
        .filter_map(|(account_id, group)| {
            let description = group.first()?.description.clone();
            let (pre, post): (Vec<&TelemetryRow>, Vec<&TelemetryRow>) =
                group.into_iter().partition(|r| r.is_pre_feature());
            if pre.is_empty() || post.is_empty() {
                return None;
            }

            let pre_avg = mean_depletion_rate(&pre);
            let post_avg = mean_depletion_rate(&post);
            let improvement_rate = if pre_avg > 0.0 {
                (pre_avg - post_avg) / pre_avg * 100.0
            } else {
                0.0
            };

            Some(FeatureImpact {
                account_id,
                description,
                pre_avg_depletion: pre_avg,
                post_avg_depletion: post_avg,
                pre_spikes: total_spikes(&pre),
                post_spikes: total_spikes(&post),
                improvement_rate,
                pre_rows: pre.len(),
                post_rows: post.len(),
            })
        })
        .collect();

    impacts.sort_by(|a, b| {
        b.improvement_rate
            .total_cmp(&a.improvement_rate)
            .then(a.account_id.cmp(&b.account_id))
    });

    debug!(accounts = impacts.len(), "feature impact computed");
    impacts
}
