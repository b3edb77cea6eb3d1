//! Tab-delimited import parsing.
//!
//! The import format is the raw paste from an upstream usage export: a header row
//! followed by tab-separated rows with 11 fixed positional columns (Account Owner,
//! Account Name, Volume Type, Start Date, End Date, Annual Qty, Term Qty, Usage
//! Date, Period Qty, Consumed Qty, Remaining Qty). Parsing is deliberately lenient:
//!
//! - Blank lines are skipped.
//! - Numeric fields strip thousands-separator commas; anything that still fails to
//!   parse defaults to 0.
//! - Date fields that fail to parse become `None`.
//! - Short rows yield empty-string/zero fields instead of erroring.
//!
//! A single bad row never aborts an import. Defaulted fields are counted and
//! reported through [`ParseOutcome`] so an operator can see how lossy a paste was.

use crate::models::UsageRecord;
use chrono::NaiveDate;
use tracing::debug;

/// Result of parsing one paste of import text.
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    pub records: Vec<UsageRecord>,
    /// Non-header lines skipped because they were blank.
    pub lines_skipped: usize,
    /// Numeric or date fields that fell back to their lenient default.
    pub fields_defaulted: usize,
}

pub struct ImportParser;

impl Default for ImportParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ImportParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse raw tab-delimited import text into usage records.
    ///
    /// The first line is treated as a header and discarded.
    pub fn parse(&self, text: &str) -> ParseOutcome {
        let mut records = Vec::new();
        let mut lines_skipped = 0;
        let mut fields_defaulted = 0;

        for line in text.lines().skip(1) {
            if line.trim().is_empty() {
                lines_skipped += 1;
                continue;
            }
            let (record, defaulted) = self.parse_row(line);
            fields_defaulted += defaulted;
            records.push(record);
        }

        debug!(
            rows = records.len(),
            skipped = lines_skipped,
            defaulted = fields_defaulted,
            "Parsed import text"
        );

        ParseOutcome {
            records,
            lines_skipped,
            fields_defaulted,
        }
    }

    /// Parse a single data row. Returns the record and the number of fields that
    /// fell back to a default.
    fn parse_row(&self, line: &str) -> (UsageRecord, usize) {
        let values: Vec<&str> = line.split('\t').collect();
        let mut defaulted = 0;

        let text_field = |idx: usize| -> String {
            values
                .get(idx)
                .map(|v| v.trim().to_string())
                .unwrap_or_default()
        };

        let mut int_field = |idx: usize| -> i64 {
            match values.get(idx).and_then(|v| lenient_int(v)) {
                Some(n) => n,
                None => {
                    defaulted += 1;
                    0
                }
            }
        };

        let annual_qty = int_field(5);
        let term_qty = int_field(6);
        let period_qty = int_field(8);
        let consumed_qty = int_field(9);
        let remaining_qty = int_field(10);

        let mut date_field = |idx: usize| -> Option<NaiveDate> {
            let raw = values.get(idx).map(|v| v.trim()).unwrap_or("");
            if raw.is_empty() {
                return None;
            }
            match lenient_date(raw) {
                Some(d) => Some(d),
                None => {
                    defaulted += 1;
                    None
                }
            }
        };

        let contract_start = date_field(3);
        let contract_end = date_field(4);
        let usage_date = date_field(7);

        let record = UsageRecord {
            account_owner: text_field(0),
            account_name: text_field(1),
            volume_type: text_field(2),
            contract_start,
            contract_end,
            annual_qty,
            term_qty,
            usage_date,
            period_qty,
            consumed_qty,
            remaining_qty,
        };

        (record, defaulted)
    }
}

/// Parse an integer quantity, stripping thousands-separator commas first.
/// Returns `None` when the field is empty or not a number.
pub fn lenient_int(raw: &str) -> Option<i64> {
    let cleaned = raw.trim().replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<i64>().ok()
}

/// Parse a date in the formats the upstream export produces.
pub fn lenient_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();

    // ISO first, then US-style exports
    for fmt in ["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y"] {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(date);
        }
    }

    // Timestamps with a date prefix. `get` rejects a byte-10 split that lands
    // mid-character, so arbitrary pasted text falls through to None.
    if let Some(prefix) = trimmed.get(..10) {
        if trimmed.len() > 10 {
            if let Ok(date) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
                return Some(date);
            }
        }
    }

    None
}
