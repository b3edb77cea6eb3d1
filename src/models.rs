//! Core Data Models
//!
//! This module defines the primary data structures used throughout the client
//! utilization tracker. These models represent the complete data pipeline from raw
//! imported usage rows to per-account subscription snapshots.
//!
//! ## Data Flow
//!
//! 1. **Raw Data**: [`UsageRecord`] - Individual rows parsed from pasted tab-delimited text
//! 2. **Aggregation**: [`Account`] / [`ProductSubscription`] - Usage grouped by account
//!    and canonical product, reduced to one current/contracted snapshot per product
//! 3. **Evaluation**: [`crate::status::UtilizationResult`] - Pure pacing classification
//!    recomputed from the snapshot on every query
//!
//! ## Features
//!
//! - **Serde Integration**: All public types support serialization for JSON output
//! - **Lenient Fields**: Missing dates become `None`, missing quantities become 0
//! - **Explicit View State**: The active accounting mode, product selection, and sort
//!   live in [`ViewState`], never in ambient globals

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of imported usage data. Immutable once parsed; multiple records per
/// account/product form the usage time series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageRecord {
    #[serde(rename = "accountOwner")]
    pub account_owner: String,
    #[serde(rename = "accountName")]
    pub account_name: String,
    #[serde(rename = "volumeType")]
    pub volume_type: String,
    #[serde(rename = "startDate")]
    pub contract_start: Option<NaiveDate>,
    #[serde(rename = "endDate")]
    pub contract_end: Option<NaiveDate>,
    #[serde(rename = "annualQty")]
    pub annual_qty: i64,
    #[serde(rename = "termQty")]
    pub term_qty: i64,
    #[serde(rename = "usageDate")]
    pub usage_date: Option<NaiveDate>,
    #[serde(rename = "periodQty")]
    pub period_qty: i64,
    #[serde(rename = "consumedQty")]
    pub consumed_qty: i64,
    #[serde(rename = "remainingQty")]
    pub remaining_qty: i64,
}

/// How `current` and `contracted` are derived from the same usage history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountingMode {
    /// Rolling 12-month window anchored to contract start; cap is the annual quantity.
    Annual,
    /// Latest reported cumulative consumption; cap is the full-term quantity.
    Cumulative,
}

impl Default for AccountingMode {
    fn default() -> Self {
        AccountingMode::Annual
    }
}

impl AccountingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountingMode::Annual => "annual",
            AccountingMode::Cumulative => "cumulative",
        }
    }
}

impl std::str::FromStr for AccountingMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "annual" => Ok(AccountingMode::Annual),
            "cumulative" => Ok(AccountingMode::Cumulative),
            other => anyhow::bail!("Unknown accounting mode: {}", other),
        }
    }
}

/// One product's contract snapshot for one account, rebuilt wholesale on every
/// import pass and accounting-mode change.
#[derive(Debug, Clone, Serialize)]
pub struct ProductSubscription {
    /// Canonical product name (post alias mapping).
    pub name: String,
    #[serde(rename = "startDate")]
    pub contract_start: Option<NaiveDate>,
    #[serde(rename = "endDate")]
    pub contract_end: Option<NaiveDate>,
    #[serde(rename = "annualQty")]
    pub annual_qty: i64,
    #[serde(rename = "termQty")]
    pub term_qty: i64,
    /// Computed consumption; meaning depends on the accounting mode.
    pub current: i64,
    /// Contract cap matching the accounting mode.
    pub contracted: i64,
    #[serde(rename = "progressPercent")]
    pub progress_percent: f64,
    /// Most recent usage date observed for this product.
    #[serde(rename = "usageDate")]
    pub usage_date: Option<NaiveDate>,
}

impl ProductSubscription {
    /// Whether this subscription carries enough data for a meaningful status.
    pub fn has_valid_data(&self) -> bool {
        self.contracted > 0 && self.contract_end.is_some()
    }

    pub fn usage_percent(&self) -> f64 {
        if self.contracted > 0 {
            self.current as f64 / self.contracted as f64 * 100.0
        } else {
            0.0
        }
    }
}

/// An account with its retained usage history and derived product snapshots.
#[derive(Debug, Clone, Serialize)]
pub struct Account {
    pub name: String,
    #[serde(rename = "accountOwner")]
    pub account_owner: String,
    /// Raw usage series, kept so the whole book can be recomputed on mode toggles.
    #[serde(skip)]
    pub records: Vec<UsageRecord>,
    pub products: Vec<ProductSubscription>,
}

impl Account {
    pub fn new(name: String, account_owner: String) -> Self {
        Self {
            name,
            account_owner,
            records: Vec::new(),
            products: Vec::new(),
        }
    }
}

/// Requested table ordering. Product-based sorts and column sorts are mutually
/// exclusive; the column sorts win when active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortMode {
    UsageDesc,
    UsageAsc,
    EndDate,
    Name,
    Owner,
}

impl std::str::FromStr for SortMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "usage-desc" => Ok(SortMode::UsageDesc),
            "usage-asc" => Ok(SortMode::UsageAsc),
            "end-date" => Ok(SortMode::EndDate),
            "name" => Ok(SortMode::Name),
            "owner" => Ok(SortMode::Owner),
            other => anyhow::bail!("Unknown sort mode: {}", other),
        }
    }
}

/// Explicit application state passed into the pure query/sort functions.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub mode: AccountingMode,
    /// Products selected for display/export; empty means "all seen products".
    pub selected_products: Vec<String>,
    /// Owners selected for display; empty means no owner filter.
    pub selected_owners: Vec<String>,
    /// Product targeted by usage/end-date sorts.
    pub sort_product: Option<String>,
    pub sort: SortMode,
    /// The "now" used for pacing; defaults to the latest usage date in the book.
    pub as_of: Option<NaiveDate>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            mode: AccountingMode::Annual,
            selected_products: Vec::new(),
            selected_owners: Vec::new(),
            sort_product: None,
            sort: SortMode::Name,
            as_of: None,
        }
    }
}

/// Outcome of one import pass, surfaced through logging and JSON output.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportSummary {
    #[serde(rename = "rowsParsed")]
    pub rows_parsed: usize,
    #[serde(rename = "rowsSkipped")]
    pub rows_skipped: usize,
    /// Count of numeric/date fields that fell back to their lenient default.
    #[serde(rename = "fieldsDefaulted")]
    pub fields_defaulted: usize,
    #[serde(rename = "accountsTouched")]
    pub accounts_touched: usize,
}
