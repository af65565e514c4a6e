//! The billing run: log in, measure the tenant, then each account group.

use crate::config::ReportOptions;
use crate::prisma_api::PrismaClient;
use crate::report::Report;
use crate::secrets::Credentials;
use crate::stack::Stack;
use crate::usage;
use anyhow::{Context, Result};

/// Runs the whole report against `stack`.
pub fn run(stack: Stack, credentials: &Credentials, options: &ReportOptions) -> Result<Report> {
    let api_host = stack.api_host();
    tracing::info!(stack = %stack, api_host = %api_host, "starting billing run");
    let mut client = PrismaClient::new(&api_host);
    build_report(&mut client, credentials, options)
}

pub fn build_report(
    client: &mut PrismaClient,
    credentials: &Credentials,
    options: &ReportOptions,
) -> Result<Report> {
    if let Err(err) = client.authenticate(credentials) {
        let hint = if err.is_authentication() {
            ", check the access key and secret key"
        } else {
            ""
        };
        let message = format!("Login to {} failed{}", client.base_url(), hint);
        return Err(anyhow::Error::new(err).context(message));
    }

    let consumed = usage::consumed_credits(&*client, options)
        .context("Failed to fetch tenant credit usage")?;
    let purchased =
        usage::purchased_credits(&*client).context("Failed to fetch purchased credits")?;
    let ledger = usage::ledger_by_account_group(&*client, options)
        .context("Failed to compute credit usage per account group")?;

    if ledger.is_empty() {
        tracing::warn!("no account group with accounts matched, the table is empty");
    } else {
        tracing::info!(groups = ledger.len(), "ledger complete");
    }
    Ok(Report::new(ledger, consumed, purchased))
}

/// One line per stack: identifier, console host, API host.
pub fn stack_listing() -> String {
    Stack::ALL
        .iter()
        .map(|stack| {
            format!(
                "{:<10}{:<28}{}\n",
                stack.name(),
                stack.console_host(),
                stack.api_host()
            )
        })
        .collect()
}

#[cfg(test)]
#[path = "tests/app_tests.rs"]
mod tests;
