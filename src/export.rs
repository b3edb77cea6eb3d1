//! CSV Export
//!
//! Writes the visible account set to CSV, one row per account. The column layout
//! is the contract for downstream spreadsheets:
//!
//! - `Client`, `Account Owner`
//! - `Exceeding Annual Volume`, `Exceeding Cumulative Volume` (Yes/No, any product)
//! - Per selected product, in order: `{P} Contracted`, `{P} Current`, `{P} Usage %`
//!   (one decimal with `%`), `{P} Status`, `{P} End Date` (ISO), `{P} Renewal
//!   Quarter` (fiscal label)
//!
//! Fields containing commas or quotes are quoted per RFC 4180 so free-text account
//! names survive round trips.

use crate::fiscal::fiscal_quarter_label;
use crate::models::{Account, AccountingMode, ViewState};
use crate::rank::{find_product, sorted_view};
use crate::status::calculate_utilization;
use chrono::NaiveDate;

/// Render the canonical CSV for a view over the account set. Columns follow
/// `view.selected_products` in order.
pub fn export_csv(accounts: &[Account], view: &ViewState) -> String {
    let products = &view.selected_products;
    let mut headers = vec![
        "Client".to_string(),
        "Account Owner".to_string(),
        "Exceeding Annual Volume".to_string(),
        "Exceeding Cumulative Volume".to_string(),
    ];
    for product in products {
        headers.push(format!("{} Contracted", product));
        headers.push(format!("{} Current", product));
        headers.push(format!("{} Usage %", product));
        headers.push(format!("{} Status", product));
        headers.push(format!("{} End Date", product));
        headers.push(format!("{} Renewal Quarter", product));
    }

    let mut lines = vec![csv_line(&headers)];
    for account in sorted_view(accounts, view) {
        lines.push(csv_line(&account_row(
            &account,
            products,
            view.mode,
            view.as_of,
        )));
    }
    lines.join("\n")
}

fn account_row(
    account: &Account,
    products: &[String],
    mode: AccountingMode,
    as_of: Option<NaiveDate>,
) -> Vec<String> {
    // Exceed flags look at every product the account holds, not just the
    // selected ones, and check both caps independently of the active mode.
    let mut exceeds_annual = false;
    let mut exceeds_cumulative = false;
    for product in &account.products {
        if product.annual_qty > 0 && product.current > product.annual_qty {
            exceeds_annual = true;
        }
        if product.term_qty > 0 && product.current > product.term_qty {
            exceeds_cumulative = true;
        }
    }

    let mut row = vec![
        account.name.clone(),
        account.account_owner.clone(),
        yes_no(exceeds_annual),
        yes_no(exceeds_cumulative),
    ];

    for name in products {
        match find_product(account, name) {
            Some(sub) => {
                let result = calculate_utilization(
                    sub.current,
                    sub.contracted,
                    sub.contract_start,
                    as_of.or(sub.usage_date),
                    mode,
                    sub.contract_end,
                );
                row.push(sub.contracted.to_string());
                row.push(sub.current.to_string());
                row.push(format!("{:.1}%", sub.usage_percent()));
                row.push(result.status.label().to_string());
                row.push(
                    sub.contract_end
                        .map(|d| d.format("%Y-%m-%d").to_string())
                        .unwrap_or_default(),
                );
                row.push(
                    sub.contract_end
                        .map(fiscal_quarter_label)
                        .unwrap_or_default(),
                );
            }
            None => {
                row.push("0".to_string());
                row.push("0".to_string());
                row.push("0.0%".to_string());
                row.push(String::new());
                row.push(String::new());
                row.push(String::new());
            }
        }
    }

    row
}

fn yes_no(flag: bool) -> String {
    if flag { "Yes" } else { "No" }.to_string()
}

fn csv_line(fields: &[String]) -> String {
    fields
        .iter()
        .map(|f| csv_escape(f))
        .collect::<Vec<_>>()
        .join(",")
}

fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
