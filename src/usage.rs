//! Credit usage aggregation: per-bucket averages and the per account group ledger.

use crate::config::ReportOptions;
use crate::prisma_api::types::DataPoint;
use crate::prisma_api::{ApiError, UsageApi, UsageQuery, UsageSeries};

/// Average credits per time bucket, container usage excluded.
///
/// Every data point counts as one bucket, whatever categories it holds.
/// The average is truncated toward zero. An empty series averages to 0:
/// no buckets means no recorded consumption, not a failure.
pub fn average_usage(series: &UsageSeries) -> u64 {
    if series.is_empty() {
        return 0;
    }
    let total: f64 = series.data_points.iter().map(DataPoint::billable_total).sum();
    (total / series.len() as f64) as u64
}

/// Average consumption of the whole tenant over `options.time_range`.
pub fn consumed_credits(api: &dyn UsageApi, options: &ReportOptions) -> Result<u64, ApiError> {
    let series = api
        .usage_series(&UsageQuery::unscoped(options.time_range))?
        .into_series()?;
    let average = average_usage(&series);
    tracing::info!(buckets = series.len(), average, "tenant consumption");
    Ok(average)
}

/// Credits purchased, as reported alongside an unscoped default-range query.
pub fn purchased_credits(api: &dyn UsageApi) -> Result<u64, ApiError> {
    let purchased = api
        .usage_series(&UsageQuery::default())?
        .workloads_purchased()?;
    tracing::info!(purchased, "purchased credits");
    Ok(purchased)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub name: String,
    pub average: u64,
}

/// Account group name -> average credits, in the order the API listed the groups.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Ledger {
    entries: Vec<LedgerEntry>,
}

impl Ledger {
    /// A repeated name replaces the earlier value and keeps its position.
    fn record(&mut self, name: &str, average: u64) {
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => entry.average = average,
            None => self.entries.push(LedgerEntry {
                name: name.to_string(),
                average,
            }),
        }
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.average)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<(S, u64)> for Ledger {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        let mut ledger = Ledger::default();
        for (name, average) in iter {
            ledger.record(name.as_ref(), average);
        }
        ledger
    }
}

/// Builds the ledger: one scoped usage query per account group that has
/// accounts and passes the name filter.
pub fn ledger_by_account_group(
    api: &dyn UsageApi,
    options: &ReportOptions,
) -> Result<Ledger, ApiError> {
    let groups = api.list_account_groups()?;
    let mut ledger = Ledger::default();

    for group in &groups {
        if !group.is_billable() {
            tracing::debug!(group = %group.name, "skipping account group without accounts");
            continue;
        }
        if !options.filter.allows(&group.name) {
            tracing::debug!(group = %group.name, "account group filtered out");
            continue;
        }

        let query = UsageQuery::for_accounts(options.time_range, &group.account_ids);
        let series = api.usage_series(&query)?.into_series()?;
        let average = average_usage(&series);
        tracing::info!(
            group = %group.name,
            accounts = group.account_ids.len(),
            buckets = series.len(),
            average,
            "account group usage"
        );
        if let Some(previous) = ledger.get(&group.name) {
            tracing::warn!(
                group = %group.name,
                previous,
                "account group listed twice, keeping the last value"
            );
        }
        ledger.record(&group.name, average);
    }

    Ok(ledger)
}

/// Account group names to keep or drop from the report.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GroupFilter {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl GroupFilter {
    /// Exclusion wins over inclusion; an empty include list admits everything.
    pub fn allows(&self, name: &str) -> bool {
        if self.exclude.iter().any(|n| n == name) {
            return false;
        }
        self.include.is_empty() || self.include.iter().any(|n| n == name)
    }
}

#[cfg(test)]
#[path = "tests/usage_tests.rs"]
mod tests;
