//! Wire types for the Prisma Cloud login, account group and license usage endpoints.

use super::error::ApiError;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const LOGIN_ENDPOINT: &str = "/login";
pub const ACCOUNT_GROUPS_ENDPOINT: &str = "/cloud/group";
pub const USAGE_ENDPOINT: &str = "/license/api/v1/usage/time_series";

/// Usage category holding container credits, left out of every average.
pub const CONTAINER_CATEGORY: &str = "others";

/// Session token returned by `/login`, sent back as `x-redlock-auth`.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Token(<redacted>)")
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
}

/// A named collection of cloud accounts billed together.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AccountGroup {
    pub name: String,
    #[serde(rename = "accountIds", default)]
    pub account_ids: Vec<String>,
}

impl AccountGroup {
    /// Groups without accounts have nothing to bill.
    pub fn is_billable(&self) -> bool {
        !self.account_ids.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Minute,
    Hour,
    #[default]
    Day,
    Week,
    Month,
    Year,
}

/// "`amount` `unit`s back from now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    pub amount: u32,
    pub unit: TimeUnit,
}

impl TimeRange {
    pub const DEFAULT_AMOUNT: u32 = 7;

    pub fn new(amount: u32, unit: TimeUnit) -> Self {
        Self { amount, unit }
    }
}

impl Default for TimeRange {
    fn default() -> Self {
        Self::new(Self::DEFAULT_AMOUNT, TimeUnit::Day)
    }
}

/// Body of a usage query: a relative time range plus the accounts to scope
/// it to. No accounts means the whole tenant.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UsageQuery {
    pub time_range: TimeRange,
    pub account_ids: Vec<String>,
}

impl UsageQuery {
    pub fn unscoped(time_range: TimeRange) -> Self {
        Self {
            time_range,
            account_ids: Vec::new(),
        }
    }

    pub fn for_accounts(time_range: TimeRange, account_ids: &[String]) -> Self {
        Self {
            time_range,
            account_ids: account_ids.to_vec(),
        }
    }

    pub fn is_unscoped(&self) -> bool {
        self.account_ids.is_empty()
    }

    pub(crate) fn body(&self) -> UsageRequestBody<'_> {
        UsageRequestBody {
            time_range: RelativeTimeRange {
                kind: "relative",
                value: self.time_range,
            },
            account_ids: &self.account_ids,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UsageRequestBody<'a> {
    pub time_range: RelativeTimeRange,
    pub account_ids: &'a [String],
}

#[derive(Debug, Serialize)]
pub(crate) struct RelativeTimeRange {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub value: TimeRange,
}

/// One time bucket: usage category -> sub-metric -> credit count.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct DataPoint {
    #[serde(default)]
    pub counts: BTreeMap<String, BTreeMap<String, f64>>,
}

impl DataPoint {
    /// Sum of every sub-metric outside the container category.
    pub fn billable_total(&self) -> f64 {
        self.counts
            .iter()
            .filter(|(category, _)| category.as_str() != CONTAINER_CATEGORY)
            .flat_map(|(_, metrics)| metrics.values())
            .sum()
    }
}

/// Time-ordered usage buckets for one query.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UsageSeries {
    pub data_points: Vec<DataPoint>,
}

impl UsageSeries {
    pub fn new(data_points: Vec<DataPoint>) -> Self {
        Self { data_points }
    }

    pub fn len(&self) -> usize {
        self.data_points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data_points.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageResponse {
    #[serde(default)]
    pub workloads_purchased: Option<u64>,
    #[serde(default)]
    pub data_points: Option<Vec<DataPoint>>,
}

impl UsageResponse {
    pub fn into_series(self) -> Result<UsageSeries, ApiError> {
        self.data_points
            .map(UsageSeries::new)
            .ok_or_else(|| ApiError::missing_field(USAGE_ENDPOINT, "dataPoints"))
    }

    pub fn workloads_purchased(&self) -> Result<u64, ApiError> {
        self.workloads_purchased
            .ok_or_else(|| ApiError::missing_field(USAGE_ENDPOINT, "workloadsPurchased"))
    }
}

#[cfg(test)]
#[path = "tests/types_tests.rs"]
mod tests;
