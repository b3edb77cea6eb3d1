#![allow(dead_code)]

/// The import header row, 11 positional columns.
pub const HEADER: &str = "Account Owner\tAccount Name\tVolume Type\tStart Date\tEnd Date\tAnnual Qty\tTerm Qty\tUsage Date\tPeriod Qty\tConsumed Qty\tRemaining Qty";

/// Build one tab-delimited usage row.
#[allow(clippy::too_many_arguments)]
pub fn row(
    owner: &str,
    account: &str,
    volume_type: &str,
    start: &str,
    end: &str,
    annual_qty: &str,
    term_qty: &str,
    usage_date: &str,
    period_qty: &str,
    consumed_qty: &str,
    remaining_qty: &str,
) -> String {
    [
        owner,
        account,
        volume_type,
        start,
        end,
        annual_qty,
        term_qty,
        usage_date,
        period_qty,
        consumed_qty,
        remaining_qty,
    ]
    .join("\t")
}

/// Assemble a full import paste from data rows.
pub fn import_text(rows: &[String]) -> String {
    let mut text = String::from(HEADER);
    for row in rows {
        text.push('\n');
        text.push_str(row);
    }
    text.push('\n');
    text
}
