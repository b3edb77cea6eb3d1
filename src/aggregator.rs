//! Usage Aggregation
//!
//! Turns parsed usage rows into the per-account, per-product snapshots the status
//! engine and rank engine consume. The [`AccountBook`] is the single in-memory
//! collection of accounts; there is exactly one logical writer (the CLI command
//! handler) and everything is recomputed synchronously.
//!
//! ## Aggregation rules
//!
//! - Rows group by account name (case-insensitive) and then by canonical product.
//! - The "most recent" row per product is the one with the greatest usage date.
//! - Annual mode: `current` sums `period_qty` over the rolling annual window
//!   anchored to the contract start's month/day, shifted to the most recent usage
//!   date's year; `contracted` is the most recent row's annual quantity.
//! - Cumulative mode: `current` is the most recent row's reported cumulative
//!   consumption (not re-summed); `contracted` is the term quantity.
//! - A re-import replaces a matched account's entire product list and usage series;
//!   the account owner is overwritten with the new import's value.
//!
//! Toggling the accounting mode rebuilds every account's products from the retained
//! raw rows. That is O(rows x accounts) and fine at the expected scale (hundreds of
//! accounts, thousands of rows).

use crate::models::{Account, AccountingMode, ImportSummary, ProductSubscription, UsageRecord};
use crate::parser::ImportParser;
use crate::products::canonicalize;
use anyhow::Result;
use chrono::{Months, NaiveDate};
use std::collections::BTreeMap;
use tracing::{error, info};

/// The in-memory account collection plus the mode its snapshots were built under.
#[derive(Debug, Default)]
pub struct AccountBook {
    accounts: Vec<Account>,
    mode: AccountingMode,
}

impl AccountBook {
    pub fn new(mode: AccountingMode) -> Self {
        Self {
            accounts: Vec::new(),
            mode,
        }
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn mode(&self) -> AccountingMode {
        self.mode
    }

    /// Latest usage date across the whole book; the default "now" for pacing.
    pub fn latest_usage_date(&self) -> Option<NaiveDate> {
        self.accounts
            .iter()
            .flat_map(|a| a.records.iter())
            .filter_map(|r| r.usage_date)
            .max()
    }

    /// All canonical product names present, in display order of first appearance.
    pub fn product_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for account in &self.accounts {
            for product in &account.products {
                if !names.iter().any(|n| n == &product.name) {
                    names.push(product.name.clone());
                }
            }
        }
        names
    }

    /// Import a paste of tab-delimited text.
    ///
    /// The parse and apply run as one unit: if anything fails, the existing
    /// accounts are left untouched and the failure is logged. Per-row problems are
    /// absorbed by the lenient parser and never reach this level.
    pub fn import(&mut self, text: &str) -> Result<ImportSummary> {
        let parser = ImportParser::new();
        match self.try_import(&parser, text) {
            Ok(summary) => {
                info!(
                    rows = summary.rows_parsed,
                    accounts = summary.accounts_touched,
                    defaulted = summary.fields_defaulted,
                    "Import applied"
                );
                Ok(summary)
            }
            Err(e) => {
                error!(error = %e, "Import abandoned; existing account data unchanged");
                Err(e)
            }
        }
    }

    fn try_import(&mut self, parser: &ImportParser, text: &str) -> Result<ImportSummary> {
        let outcome = parser.parse(text);

        // Group rows by account name, preserving first-seen order.
        let mut grouped: Vec<(String, Vec<UsageRecord>)> = Vec::new();
        for record in outcome.records.iter().cloned() {
            let key = record.account_name.trim().to_string();
            if key.is_empty() {
                continue;
            }
            match grouped
                .iter_mut()
                .find(|(name, _)| name.eq_ignore_ascii_case(&key))
            {
                Some((_, rows)) => rows.push(record),
                None => grouped.push((key, vec![record])),
            }
        }

        let accounts_touched = grouped.len();

        for (name, rows) in grouped {
            // The first row seen for an account names its owner; a later
            // re-import still replaces it wholesale.
            let owner = rows
                .first()
                .map(|r| r.account_owner.clone())
                .unwrap_or_default();

            let products = build_products(&rows, self.mode);

            match self
                .accounts
                .iter_mut()
                .find(|a| a.name.eq_ignore_ascii_case(&name))
            {
                Some(existing) => {
                    existing.account_owner = owner;
                    existing.records = rows;
                    existing.products = products;
                }
                None => {
                    let mut account = Account::new(name, owner);
                    account.records = rows;
                    account.products = products;
                    self.accounts.push(account);
                }
            }
        }

        Ok(ImportSummary {
            rows_parsed: outcome.records.len(),
            rows_skipped: outcome.lines_skipped,
            fields_defaulted: outcome.fields_defaulted,
            accounts_touched,
        })
    }

    /// Switch accounting mode and rebuild every snapshot from the raw series.
    pub fn set_mode(&mut self, mode: AccountingMode) {
        if self.mode == mode {
            return;
        }
        self.mode = mode;
        for account in &mut self.accounts {
            account.products = build_products(&account.records, mode);
        }
        info!(mode = mode.as_str(), accounts = self.accounts.len(), "Recomputed book");
    }
}

/// Build the product snapshots for one account's usage rows.
fn build_products(rows: &[UsageRecord], mode: AccountingMode) -> Vec<ProductSubscription> {
    // BTreeMap keeps product order deterministic across imports.
    let mut by_product: BTreeMap<String, Vec<&UsageRecord>> = BTreeMap::new();
    for row in rows {
        let name = canonicalize(&row.volume_type).to_string();
        if name.is_empty() {
            continue;
        }
        by_product.entry(name).or_default().push(row);
    }

    by_product
        .into_iter()
        .map(|(name, series)| snapshot_product(name, &series, mode))
        .collect()
}

fn snapshot_product(
    name: String,
    series: &[&UsageRecord],
    mode: AccountingMode,
) -> ProductSubscription {
    // Rows without a usage date still contribute contract terms but lose the
    // recency race to any dated row.
    let most_recent = series
        .iter()
        .max_by_key(|r| r.usage_date)
        .expect("product group is never empty");

    let current = match mode {
        AccountingMode::Annual => match (most_recent.contract_start, most_recent.usage_date) {
            (Some(start), Some(latest)) => annual_window_sum(series, start, latest),
            _ => 0,
        },
        AccountingMode::Cumulative => most_recent.consumed_qty,
    };

    let contracted = match mode {
        AccountingMode::Annual => most_recent.annual_qty,
        AccountingMode::Cumulative => most_recent.term_qty,
    };

    let progress_percent = if contracted > 0 {
        current as f64 / contracted as f64 * 100.0
    } else {
        0.0
    };

    ProductSubscription {
        name,
        contract_start: most_recent.contract_start,
        contract_end: most_recent.contract_end,
        annual_qty: most_recent.annual_qty,
        term_qty: most_recent.term_qty,
        current,
        contracted,
        progress_percent,
        usage_date: most_recent.usage_date,
    }
}

/// Sum period quantities inside the renewal cycle containing the most recent usage
/// date, anchored to the contract start's month/day.
fn annual_window_sum(series: &[&UsageRecord], start: NaiveDate, latest: NaiveDate) -> i64 {
    let window_start = crate::status::current_annual_period_start(start, latest);
    let window_end = window_start
        .checked_add_months(Months::new(12))
        .unwrap_or(window_start);

    series
        .iter()
        .filter_map(|r| r.usage_date.map(|d| (d, r.period_qty)))
        .filter(|(d, _)| *d >= window_start && *d < window_end)
        .map(|(_, qty)| qty)
        .sum()
}
