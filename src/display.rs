//! Output Formatting and Display Management
//!
//! Renders utilization reports to the terminal and as structured JSON. Terminal
//! output colors each pacing badge (red for Currently Over, orange for Over Pace,
//! green for On Target, blue for Under Pace) and draws a textual progress bar from
//! the engine's [`ProgressGeometry`]. JSON output mirrors the same data for
//! programmatic consumption.

use crate::models::{Account, ViewState};
use crate::rank::{find_product, sorted_view};
use crate::status::{calculate_utilization, PacingStatus, ProgressGeometry, UtilizationResult};
use colored::Colorize;
use serde_json::json;

const BAR_WIDTH: usize = 24;

pub struct DisplayManager;

impl Default for DisplayManager {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayManager {
    pub fn new() -> Self {
        Self
    }

    /// Print the utilization report for a view. Products follow
    /// `view.selected_products` in order.
    pub fn display_report(
        &self,
        accounts: &[Account],
        view: &ViewState,
        limit: Option<usize>,
        json_output: bool,
    ) {
        let products = &view.selected_products;
        let mut visible = sorted_view(accounts, view);
        if let Some(limit) = limit {
            visible.truncate(limit);
        }

        if json_output {
            self.print_json(&visible, products, view);
            return;
        }

        println!(
            "{} ({} mode, as of {})",
            "Client Utilization".bold(),
            view.mode.as_str(),
            view.as_of
                .map(|d| d.to_string())
                .unwrap_or_else(|| "latest usage".to_string())
        );
        println!();

        for account in &visible {
            println!(
                "{} {}",
                account.name.bold(),
                format!("({})", account.account_owner).dimmed()
            );

            for name in products {
                let Some(sub) = find_product(account, name) else {
                    continue;
                };
                let result = calculate_utilization(
                    sub.current,
                    sub.contracted,
                    sub.contract_start,
                    view.as_of.or(sub.usage_date),
                    view.mode,
                    sub.contract_end,
                );
                let geometry =
                    ProgressGeometry::compute(sub.current, sub.contracted, sub.annual_qty, view.mode);

                println!(
                    "  {:<18} {} {:>7}%  {}  {}",
                    sub.name,
                    render_bar(&geometry),
                    geometry.percent_label(),
                    paint_status(result.status),
                    pacing_note(&result),
                );
            }
            println!();
        }

        println!("{} accounts", visible.len());
    }

    fn print_json(&self, accounts: &[Account], products: &[String], view: &ViewState) {
        let rows: Vec<serde_json::Value> = accounts
            .iter()
            .map(|account| {
                let product_rows: Vec<serde_json::Value> = products
                    .iter()
                    .filter_map(|name| find_product(account, name))
                    .map(|sub| {
                        let result = calculate_utilization(
                            sub.current,
                            sub.contracted,
                            sub.contract_start,
                            view.as_of.or(sub.usage_date),
                            view.mode,
                            sub.contract_end,
                        );
                        json!({
                            "product": sub.name,
                            "current": sub.current,
                            "contracted": sub.contracted,
                            "usagePercent": sub.usage_percent(),
                            "status": result.status.label(),
                            "expectedAmount": result.expected_amount,
                            "monthsElapsed": result.months_elapsed,
                            "endDate": sub.contract_end,
                        })
                    })
                    .collect();
                json!({
                    "client": account.name,
                    "accountOwner": account.account_owner,
                    "products": product_rows,
                })
            })
            .collect();

        let output = json!({
            "mode": view.mode.as_str(),
            "accounts": rows,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
        );
    }
}

/// Draw the progress track: filled segment, overage segment, and cap marker.
fn render_bar(geometry: &ProgressGeometry) -> String {
    let filled = (geometry.filled_width / 100.0 * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);

    let mut bar = String::new();
    bar.push('[');
    if geometry.is_overage {
        bar.push_str(&"#".repeat(filled));
        bar.push_str(&"!".repeat(BAR_WIDTH - filled));
    } else {
        bar.push_str(&"#".repeat(filled));
        bar.push_str(&"-".repeat(BAR_WIDTH - filled));
    }
    bar.push(']');
    bar
}

fn paint_status(status: PacingStatus) -> colored::ColoredString {
    match status {
        PacingStatus::CurrentlyOver => status.label().red().bold(),
        PacingStatus::OverPace => status.label().yellow(),
        PacingStatus::OnTarget => status.label().green(),
        PacingStatus::UnderPace => status.label().blue(),
    }
}

fn pacing_note(result: &UtilizationResult) -> String {
    format!(
        "expected {} at {} mo",
        format_qty(result.expected_amount),
        result.months_elapsed
    )
}

/// Group digits for readability (1234567 -> "1,234,567").
pub fn format_qty(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if rounded < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_qty() {
        assert_eq!(format_qty(0.0), "0");
        assert_eq!(format_qty(1234.0), "1,234");
        assert_eq!(format_qty(1_234_567.4), "1,234,567");
        assert_eq!(format_qty(-5000.0), "-5,000");
    }
}
