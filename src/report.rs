//! Fixed-width billing table.

use crate::usage::Ledger;
use std::fmt::Write;

const RULE_WIDTH: usize = 50;

/// Everything one run prints: the ledger and the two totals it is measured against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub ledger: Ledger,
    /// Average credits consumed by the whole tenant.
    pub consumed: u64,
    pub purchased: u64,
}

/// `floor(100 * part / whole)`, or `None` when there is nothing to divide by.
/// Saturates at `u64::MAX`.
pub fn percent_of(part: u64, whole: u64) -> Option<u64> {
    if whole == 0 {
        return None;
    }
    let pct = u128::from(part) * 100 / u128::from(whole);
    Some(u64::try_from(pct).unwrap_or(u64::MAX))
}

fn percent_cell(part: u64, whole: u64) -> String {
    match percent_of(part, whole) {
        Some(pct) => format!("{}%", pct),
        None => "-".to_string(),
    }
}

impl Report {
    pub fn new(ledger: Ledger, consumed: u64, purchased: u64) -> Self {
        Self {
            ledger,
            consumed,
            purchased,
        }
    }

    pub fn render(&self) -> String {
        let rule = "-".repeat(RULE_WIDTH);
        let mut out = String::new();

        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(
            out,
            "{:<17}{:>10}{:>10}{:>12}",
            "NAME", "AVG CREDITS", "USED", "PURCH"
        );
        let _ = writeln!(out, "{}", rule);

        for entry in self.ledger.entries() {
            let _ = writeln!(
                out,
                "{:<17}{:>11}{:>10}{:>12}",
                entry.name,
                entry.average,
                percent_cell(entry.average, self.consumed),
                percent_cell(entry.average, self.purchased)
            );
        }

        let _ = writeln!(
            out,
            "Total consumed credits on purchased credits: {}/{}",
            self.consumed, self.purchased
        );
        out
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}
