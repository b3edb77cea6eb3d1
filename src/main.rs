use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use client_utilization::aggregator::AccountBook;
use client_utilization::config::get_config;
use client_utilization::display::DisplayManager;
use client_utilization::export::export_csv;
use client_utilization::forecast::{average_growth_rate, forecasted_volume, monthly_growth_rates};
use client_utilization::logging::init_logging;
use client_utilization::models::{AccountingMode, SortMode, ViewState};
use client_utilization::products::canonicalize;

#[derive(Parser)]
#[command(name = "client-utilization")]
#[command(about = "Client-contract utilization tracking and pacing analysis")]
#[command(version = "1.0.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show per-account utilization with pacing status
    Report {
        /// Tab-delimited usage export(s); applied in order as import passes
        #[arg(long, required = true)]
        input: Vec<PathBuf>,
        /// Accounting mode: annual or cumulative
        #[arg(long)]
        mode: Option<AccountingMode>,
        /// Product targeted by usage/end-date sorting
        #[arg(long)]
        product: Option<String>,
        /// Sort mode: usage-desc, usage-asc, end-date, name, owner
        #[arg(long)]
        sort: Option<SortMode>,
        /// Only show accounts belonging to these owners
        #[arg(long)]
        owner: Vec<String>,
        /// Pin "now" for pacing (YYYY-MM-DD); defaults to latest usage date
        #[arg(long)]
        as_of: Option<String>,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
        /// Show first N accounts
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Export the utilization table as CSV
    Export {
        /// Tab-delimited usage export(s); applied in order as import passes
        #[arg(long, required = true)]
        input: Vec<PathBuf>,
        /// Destination CSV file
        #[arg(long)]
        output: PathBuf,
        /// Accounting mode: annual or cumulative
        #[arg(long)]
        mode: Option<AccountingMode>,
        /// Restrict columns to these products (repeatable)
        #[arg(long)]
        product: Vec<String>,
        /// Pin "now" for pacing (YYYY-MM-DD); defaults to latest usage date
        #[arg(long)]
        as_of: Option<String>,
    },
    /// Show growth rates and projected volume per account/product
    Forecast {
        /// Tab-delimited usage export(s); applied in order as import passes
        #[arg(long, required = true)]
        input: Vec<PathBuf>,
        /// Only forecast this product
        #[arg(long)]
        product: Option<String>,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    // The parsed --json flag also picks the error shape for the command.
    let (result, json_errors) = match cli.command {
        Commands::Report {
            input,
            mode,
            product,
            sort,
            owner,
            as_of,
            json,
            limit,
        } => (
            run_report(input, mode, product, sort, owner, as_of, json, limit),
            json,
        ),
        Commands::Export {
            input,
            output,
            mode,
            product,
            as_of,
        } => (run_export(input, output, mode, product, as_of), false),
        Commands::Forecast {
            input,
            product,
            json,
        } => (run_forecast(input, product, json), json),
    };

    match result {
        Ok(()) => Ok(()),
        Err(e) => handle_error(e, json_errors),
    }
}

fn load_book(inputs: &[PathBuf], mode: AccountingMode) -> Result<AccountBook> {
    let mut book = AccountBook::new(mode);
    for path in inputs {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file: {}", path.display()))?;
        book.import(&text)
            .with_context(|| format!("Failed to import: {}", path.display()))?;
    }
    Ok(book)
}

fn resolve_mode(mode: Option<AccountingMode>) -> AccountingMode {
    mode.unwrap_or_else(|| {
        get_config()
            .display
            .default_mode
            .parse()
            .unwrap_or(AccountingMode::Annual)
    })
}

fn parse_as_of(as_of: Option<String>) -> Result<Option<NaiveDate>> {
    as_of
        .map(|s| {
            NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                .with_context(|| format!("Invalid as-of date: {}. Use YYYY-MM-DD", s))
        })
        .transpose()
}

#[allow(clippy::too_many_arguments)]
fn run_report(
    input: Vec<PathBuf>,
    mode: Option<AccountingMode>,
    product: Option<String>,
    sort: Option<SortMode>,
    owner: Vec<String>,
    as_of: Option<String>,
    json: bool,
    limit: Option<usize>,
) -> Result<()> {
    let mode = resolve_mode(mode);
    let book = load_book(&input, mode)?;
    let as_of = parse_as_of(as_of)?.or_else(|| book.latest_usage_date());

    let products = book.product_names();
    let sort = sort.unwrap_or(if product.is_some() {
        SortMode::UsageDesc
    } else {
        SortMode::Name
    });

    let view = ViewState {
        mode,
        selected_products: products,
        selected_owners: owner,
        sort_product: product.map(|p| canonicalize(&p).to_string()),
        sort,
        as_of,
    };

    let config_limit = get_config().display.default_limit;
    let limit = limit.or(if config_limit > 0 {
        Some(config_limit)
    } else {
        None
    });

    DisplayManager::new().display_report(book.accounts(), &view, limit, json);
    Ok(())
}

fn run_export(
    input: Vec<PathBuf>,
    output: PathBuf,
    mode: Option<AccountingMode>,
    product: Vec<String>,
    as_of: Option<String>,
) -> Result<()> {
    let mode = resolve_mode(mode);
    let book = load_book(&input, mode)?;
    let as_of = parse_as_of(as_of)?.or_else(|| book.latest_usage_date());

    let products = if product.is_empty() {
        book.product_names()
    } else {
        product
            .iter()
            .map(|p| canonicalize(p).to_string())
            .collect()
    };

    let view = ViewState {
        mode,
        selected_products: products,
        sort: SortMode::Name,
        as_of,
        ..ViewState::default()
    };

    let csv = export_csv(book.accounts(), &view);
    std::fs::write(&output, csv)
        .with_context(|| format!("Failed to write CSV: {}", output.display()))?;
    println!("Exported {} accounts to {}", book.accounts().len(), output.display());
    Ok(())
}

fn run_forecast(input: Vec<PathBuf>, product: Option<String>, json: bool) -> Result<()> {
    let book = load_book(&input, AccountingMode::Annual)?;
    let target = product.map(|p| canonicalize(&p).to_string());

    let mut rows = Vec::new();
    for account in book.accounts() {
        for sub in &account.products {
            if let Some(target) = &target {
                if &sub.name != target {
                    continue;
                }
            }
            let series: Vec<_> = account
                .records
                .iter()
                .filter(|r| canonicalize(&r.volume_type) == sub.name)
                .cloned()
                .collect();
            let rates = monthly_growth_rates(&series);
            let avg = average_growth_rate(&rates);
            let projected = forecasted_volume(sub.current as f64, avg);
            rows.push((account.name.clone(), sub.name.clone(), rates, avg, projected));
        }
    }

    if json {
        let out: Vec<serde_json::Value> = rows
            .iter()
            .map(|(client, product, rates, avg, projected)| {
                serde_json::json!({
                    "client": client,
                    "product": product,
                    "growthRates": rates,
                    "averageGrowthRate": avg,
                    "forecastedVolume": projected,
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&out).unwrap_or_else(|_| "[]".to_string())
        );
    } else {
        for (client, product, rates, avg, projected) in &rows {
            println!(
                "{} / {}: {} YoY samples, avg growth {:.1}%, projected {:.0}",
                client,
                product,
                rates.len(),
                avg * 100.0,
                projected
            );
        }
    }
    Ok(())
}

fn handle_error(e: anyhow::Error, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::json!({ "error": e.to_string() }));
    } else {
        eprintln!("Error: {:#}", e);
    }
    process::exit(1);
}
