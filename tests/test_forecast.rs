use client_utilization::forecast::{average_growth_rate, forecasted_volume, monthly_growth_rates};
use client_utilization::models::UsageRecord;
use chrono::NaiveDate;

fn record(date: &str, period_qty: i64) -> UsageRecord {
    UsageRecord {
        account_owner: "Dana".to_string(),
        account_name: "Acme".to_string(),
        volume_type: "Email".to_string(),
        contract_start: None,
        contract_end: None,
        annual_qty: 0,
        term_qty: 0,
        usage_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").ok(),
        period_qty,
        consumed_qty: 0,
        remaining_qty: 0,
    }
}

#[test]
fn test_single_yoy_pair_gives_fifty_percent() {
    // Two usage rows a year apart, 100 then 150: one growth rate of 0.5.
    let series = vec![record("2023-03-10", 100), record("2024-03-12", 150)];
    assert_eq!(monthly_growth_rates(&series), vec![0.5]);
}

#[test]
fn test_unsorted_input_is_handled() {
    let series = vec![record("2024-03-12", 150), record("2023-03-10", 100)];
    assert_eq!(monthly_growth_rates(&series), vec![0.5]);
}

#[test]
fn test_rows_in_same_month_are_summed() {
    let series = vec![
        record("2023-03-01", 40),
        record("2023-03-20", 60),
        record("2024-03-12", 200),
    ];
    assert_eq!(monthly_growth_rates(&series), vec![1.0]);
}

#[test]
fn test_months_without_prior_year_are_skipped() {
    let series = vec![
        record("2023-03-10", 100),
        record("2024-03-12", 150),
        record("2024-04-12", 999),
    ];
    // April 2024 has no April 2023 comparison.
    assert_eq!(monthly_growth_rates(&series), vec![0.5]);
}

#[test]
fn test_zero_prior_bucket_is_skipped() {
    let series = vec![record("2023-03-10", 0), record("2024-03-12", 150)];
    assert!(monthly_growth_rates(&series).is_empty());
}

#[test]
fn test_empty_series() {
    assert!(monthly_growth_rates(&[]).is_empty());
    assert!(monthly_growth_rates(&[record("n/a", 100)]).is_empty());
}

#[test]
fn test_average_empty_is_zero() {
    assert_eq!(average_growth_rate(&[]), 0.0);
}

#[test]
fn test_average_trims_to_interquartile_range() {
    // Sorted: [-1.0, 0.1, 0.2, 0.3, 10.0]; kept slice is indices 1..=3.
    let rates = [0.2, 10.0, 0.1, -1.0, 0.3];
    let avg = average_growth_rate(&rates);
    assert!((avg - 0.2).abs() < 1e-9);
}

#[test]
fn test_average_single_rate() {
    assert!((average_growth_rate(&[0.4]) - 0.4).abs() < 1e-9);
}

#[test]
fn test_forecast_zero_rate_is_noop() {
    assert_eq!(forecasted_volume(1_200_000.0, 0.0), 1_200_000.0);
    assert_eq!(forecasted_volume(0.0, 0.0), 0.0);
}

#[test]
fn test_forecast_applies_growth_linearly() {
    assert_eq!(forecasted_volume(1_000_000.0, 0.25), 1_250_000.0);
}

#[test]
fn test_forecast_guards_non_finite() {
    assert_eq!(forecasted_volume(100.0, f64::NAN), 100.0);
    assert_eq!(forecasted_volume(f64::MAX, f64::MAX), f64::MAX);
}
