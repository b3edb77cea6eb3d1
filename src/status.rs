//! Utilization Status Engine
//!
//! This module is the core of the tracker: given a product's computed consumption,
//! its contract cap, the contract dates, and an explicit as-of date, it classifies
//! pacing and produces the derived display metrics (expected amount, months elapsed,
//! progress-bar geometry).
//!
//! ## Pacing model
//!
//! Consumption is assumed to accrue linearly over the accounting period. In Annual
//! mode the period is the 12-month renewal cycle containing the as-of date, anchored
//! to the contract start's month/day. In Cumulative mode the period is the whole
//! contract term.
//!
//! ## Classification rules
//!
//! - `current >= contracted` is always **Currently Over**, regardless of pacing.
//! - `current > expected` is **Over Pace**.
//! - Within [`ON_TARGET_TOLERANCE`] (2%) under expected is **On Target**.
//! - Anything further under is **Under Pace**.
//!
//! The engine is pure and total: it never reads the wall clock, and degenerate
//! inputs (missing dates, zero cap, zero-length term) return a neutral result
//! instead of failing. Earlier revisions of this calculation disagreed on the month
//! counting and tolerance; the rules here are applied uniformly everywhere.

use crate::models::AccountingMode;
use chrono::{Datelike, Days, Months, NaiveDate};
use serde::Serialize;

/// Fraction under the expected amount still considered on target.
///
/// A product at 98.0%+ of its linearly-expected consumption reads as On Target;
/// below that it is Under Pace. This is the single tolerance used across display,
/// ranking, and export.
pub const ON_TARGET_TOLERANCE: f64 = 0.02;

/// Pacing classification, ordered by severity for ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PacingStatus {
    CurrentlyOver,
    OverPace,
    OnTarget,
    UnderPace,
}

impl PacingStatus {
    /// Severity rank for sorting; higher means more urgent.
    pub fn severity(&self) -> u8 {
        match self {
            PacingStatus::CurrentlyOver => 4,
            PacingStatus::OverPace => 3,
            PacingStatus::OnTarget => 2,
            PacingStatus::UnderPace => 1,
        }
    }

    /// Short uppercase badge text.
    pub fn label(&self) -> &'static str {
        match self {
            PacingStatus::CurrentlyOver => "CURRENTLY OVER",
            PacingStatus::OverPace => "OVER PACE",
            PacingStatus::OnTarget => "ON TARGET",
            PacingStatus::UnderPace => "UNDER PACE",
        }
    }

    /// One-line explanation for tooltips and reports.
    pub fn description(&self) -> &'static str {
        match self {
            PacingStatus::CurrentlyOver => "Currently exceeding contracted amount",
            PacingStatus::OverPace => "Projected to exceed contracted amount",
            PacingStatus::OnTarget => "On pace with expected volume",
            PacingStatus::UnderPace => "Projected to be under contracted amount",
        }
    }
}

/// Pure computed pacing result; never persisted or cached between evaluations.
#[derive(Debug, Clone, Serialize)]
pub struct UtilizationResult {
    pub status: PacingStatus,
    #[serde(rename = "expectedAmount")]
    pub expected_amount: f64,
    #[serde(rename = "monthsElapsed")]
    pub months_elapsed: i64,
    #[serde(rename = "isOverContract")]
    pub is_over_contract: bool,
    #[serde(rename = "periodStart")]
    pub period_start: Option<NaiveDate>,
    #[serde(rename = "periodEnd")]
    pub period_end: Option<NaiveDate>,
}

impl UtilizationResult {
    /// Neutral result for degenerate inputs (missing dates or zero cap).
    fn neutral() -> Self {
        Self {
            status: PacingStatus::OnTarget,
            expected_amount: 0.0,
            months_elapsed: 0,
            is_over_contract: false,
            period_start: None,
            period_end: None,
        }
    }
}

/// Classify a product's pacing at `as_of`.
///
/// `contract_end` is only consulted in Cumulative mode; when absent the term
/// defaults to one year from the contract start.
pub fn calculate_utilization(
    current: i64,
    contracted: i64,
    contract_start: Option<NaiveDate>,
    as_of: Option<NaiveDate>,
    mode: AccountingMode,
    contract_end: Option<NaiveDate>,
) -> UtilizationResult {
    let (start, as_of) = match (contract_start, as_of) {
        (Some(s), Some(a)) if contracted > 0 => (s, a),
        _ => return UtilizationResult::neutral(),
    };

    let (period_start, period_end, months_elapsed, expected_amount) = match mode {
        AccountingMode::Annual => {
            let period_start = current_annual_period_start(start, as_of);
            let period_end = add_year(period_start);
            let months = whole_months_between(period_start, as_of).clamp(0, 12);
            let expected = contracted as f64 / 12.0 * months as f64;
            (period_start, period_end, months, expected)
        }
        AccountingMode::Cumulative => {
            let end = contract_end.unwrap_or_else(|| add_year(start));
            let total_months = whole_months_between(start, end);
            if total_months <= 0 {
                return UtilizationResult::neutral();
            }
            let months = whole_months_between(start, as_of).max(0);
            let expected = contracted as f64 / total_months as f64 * months as f64;
            (start, end, months, expected)
        }
    };

    let is_over_contract = current >= contracted;
    let status = if is_over_contract {
        PacingStatus::CurrentlyOver
    } else if (current as f64) > expected_amount {
        PacingStatus::OverPace
    } else if current as f64 >= expected_amount * (1.0 - ON_TARGET_TOLERANCE) {
        PacingStatus::OnTarget
    } else {
        PacingStatus::UnderPace
    };

    UtilizationResult {
        status,
        expected_amount,
        months_elapsed,
        is_over_contract,
        period_start: Some(period_start),
        period_end: Some(period_end),
    }
}

/// Whole months from `from` to `to`, counting a month only once `to`'s day-of-month
/// has reached `from`'s. Negative when `to` precedes `from`.
pub fn whole_months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    let mut months = (to.year() as i64 - from.year() as i64) * 12
        + (to.month() as i64 - from.month() as i64);
    if to.day() < from.day() {
        months -= 1;
    }
    months
}

/// Start of the annual renewal cycle containing `as_of`, anchored to the contract
/// start's month and day.
pub(crate) fn current_annual_period_start(start: NaiveDate, as_of: NaiveDate) -> NaiveDate {
    let candidate = anchor_to_year(start, as_of.year());
    if candidate > as_of {
        anchor_to_year(start, as_of.year() - 1)
    } else {
        candidate
    }
}

/// Shift a date to another year, clamping Feb 29 to Feb 28 off leap years.
pub(crate) fn anchor_to_year(date: NaiveDate, year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, date.month(), date.day())
        .or_else(|| {
            NaiveDate::from_ymd_opt(year, date.month(), 1)
                .map(|d| d + Days::new(u64::from(date.day()) - 2))
        })
        .unwrap_or(date)
}

fn add_year(date: NaiveDate) -> NaiveDate {
    date.checked_add_months(Months::new(12)).unwrap_or(date)
}

/// Render geometry for a utilization progress bar, expressed as percentages of the
/// bar's full width.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressGeometry {
    /// Usage as a percentage of the contract cap; may exceed 100.
    #[serde(rename = "percentUsed")]
    pub percent_used: f64,
    #[serde(rename = "isOverage")]
    pub is_overage: bool,
    /// Width of the filled (in-contract) segment. When over cap the bar is rescaled
    /// so consumed-so-far fills the track and the cap lands inside it.
    #[serde(rename = "filledWidth")]
    pub filled_width: f64,
    /// Position of the 100%-of-cap marker within the bar.
    #[serde(rename = "capMarker")]
    pub cap_marker: f64,
    /// Positions of annual-cap multiples inside a cumulative-term bar.
    #[serde(rename = "annualBreakpoints")]
    pub annual_breakpoints: Vec<f64>,
}

impl ProgressGeometry {
    pub fn compute(current: i64, contracted: i64, annual_qty: i64, mode: AccountingMode) -> Self {
        if contracted <= 0 {
            return Self {
                percent_used: 0.0,
                is_overage: false,
                filled_width: 0.0,
                cap_marker: 100.0,
                annual_breakpoints: Vec::new(),
            };
        }

        let percent_used = current as f64 / contracted as f64 * 100.0;
        let is_overage = percent_used > 100.0;

        let filled_width = if is_overage {
            contracted as f64 / current as f64 * 100.0
        } else {
            percent_used
        };

        let cap_marker = if is_overage {
            100.0 / percent_used * 100.0
        } else {
            100.0
        };

        let mut annual_breakpoints = Vec::new();
        if mode == AccountingMode::Cumulative && annual_qty > 0 {
            let mut mark = annual_qty;
            while mark < contracted {
                annual_breakpoints.push(mark as f64 / contracted as f64 * 100.0);
                mark += annual_qty;
            }
            // A final mark exactly at the cap only when it stays visually distinct
            // from the cap marker itself.
            if mark <= contracted {
                let pos = mark as f64 / contracted as f64 * 100.0;
                if pos < 98.0 {
                    annual_breakpoints.push(pos);
                }
            }
        }

        Self {
            percent_used,
            is_overage,
            filled_width,
            cap_marker,
            annual_breakpoints,
        }
    }

    /// Percentage string for display; extreme overages are capped at "999+".
    pub fn percent_label(&self) -> String {
        if self.percent_used > 999.0 {
            "999+".to_string()
        } else {
            format!("{:.1}", self.percent_used)
        }
    }
}
