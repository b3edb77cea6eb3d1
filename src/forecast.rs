//! Growth Forecast Engine
//!
//! Derives year-over-year growth from a product's usage series and projects the
//! next period's volume. The math is intentionally simple: monthly buckets, YoY
//! rates where a prior-year comparison exists, an interquartile-trimmed average to
//! shed outliers, and a single-period linear projection.
//!
//! All arithmetic is guarded: months with a zero prior-year bucket are skipped
//! rather than producing infinities, and a non-finite projection falls back to the
//! unmodified input volume.

use crate::models::UsageRecord;
use chrono::Datelike;
use std::collections::BTreeMap;

/// Year-over-year growth rates, one per month that has a same-month bucket exactly
/// one year prior, in chronological order. Rates are fractions (0.5 = 50% growth).
pub fn monthly_growth_rates(series: &[UsageRecord]) -> Vec<f64> {
    // Bucket period quantities by calendar month. BTreeMap keys sort
    // chronologically, which fixes the output order.
    let mut monthly: BTreeMap<(i32, u32), i64> = BTreeMap::new();
    for record in series {
        if let Some(date) = record.usage_date {
            *monthly.entry((date.year(), date.month())).or_insert(0) += record.period_qty;
        }
    }

    monthly
        .iter()
        .filter_map(|(&(year, month), &qty)| {
            let prior = *monthly.get(&(year - 1, month))?;
            if prior == 0 {
                // No meaningful rate against a zero base.
                return None;
            }
            Some((qty - prior) as f64 / prior as f64)
        })
        .collect()
}

/// Average growth after trimming outliers to the interquartile range.
///
/// Rates are ranked ascending and the slice from the 25th to the 75th percentile
/// index (inclusive) is averaged. Empty input yields 0.
pub fn average_growth_rate(rates: &[f64]) -> f64 {
    if rates.is_empty() {
        return 0.0;
    }

    let mut sorted = rates.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let q1 = (sorted.len() as f64 * 0.25).floor() as usize;
    let q3 = (sorted.len() as f64 * 0.75).floor() as usize;
    let kept = &sorted[q1..=q3.min(sorted.len() - 1)];

    kept.iter().sum::<f64>() / kept.len() as f64
}

/// Linear single-period projection: `volume * (1 + rate)`.
///
/// A non-finite result (overflow, NaN rate) returns the volume unchanged so bad
/// arithmetic never reaches the display layer.
pub fn forecasted_volume(current_annual_volume: f64, average_growth_rate: f64) -> f64 {
    let projected = current_annual_volume * (1.0 + average_growth_rate);
    if projected.is_finite() {
        projected
    } else {
        current_annual_volume
    }
}
