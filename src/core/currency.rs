//! Exchange rate abstractions and core types

use crate::error::RateError;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Success indicator carried on every rates body, live or fallback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatesStatus {
    #[default]
    Success,
}

/// All known rates from one base currency at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateSnapshot {
    pub result: RatesStatus,
    pub base_code: String,
    pub rates: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_last_update_utc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_next_update_utc: Option<String>,
    #[serde(skip_serializing, default = "Utc::now")]
    pub fetched_at: DateTime<Utc>,
}

impl RateSnapshot {
    pub fn new(base_code: &str, rates: BTreeMap<String, f64>, fetched_at: DateTime<Utc>) -> Self {
        RateSnapshot {
            result: RatesStatus::Success,
            base_code: base_code.to_string(),
            rates,
            time_last_update_utc: None,
            time_next_update_utc: None,
            fetched_at,
        }
    }

    /// A snapshot is fresh while its age is strictly below `ttl`.
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.fetched_at < ttl
    }

    /// Rate from the base currency to `to`. Zero or negative rates are
    /// treated as missing.
    pub fn rate(&self, to: &str) -> Option<f64> {
        self.rates.get(to).copied().filter(|rate| *rate > 0.0)
    }
}

#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Performs one live fetch of all rates for `base`.
    async fn fetch_rates(&self, base: &str) -> Result<RateSnapshot, RateError>;
}
