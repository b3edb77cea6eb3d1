//! Client Utilization Library
//!
//! A Rust library for tracking client-contract utilization from pasted tabular
//! usage exports. It ingests tab-delimited usage data, groups it by account and
//! product line, and classifies whether each client's consumption is pacing
//! on-target, under, over, or already past its contracted volume.
//!
//! ## Core Features
//!
//! - **Lenient tabular import**: positional tab-delimited parsing that never fails
//!   an import over one bad row
//! - **Dual accounting modes**: rolling-annual and cumulative-term views derived
//!   from the same usage history
//! - **Pure pacing engine**: deterministic status classification driven by an
//!   explicit as-of date, with a documented 2% on-target tolerance
//! - **Growth forecasting**: IQR-trimmed year-over-year growth with a linear
//!   projection
//! - **Deterministic ranking**: severity-then-percentage ordering with invalid
//!   data always last
//!
//! ## Architecture Overview
//!
//! - [`models`] - Usage records, accounts, subscriptions, and view state
//! - [`parser`] - Tab-delimited import parsing with lenient field recovery
//! - [`products`] - Canonical product-name mapping
//! - [`aggregator`] - The in-memory account book and snapshot computation
//! - [`status`] - The utilization status engine (the core algorithm)
//! - [`forecast`] - Growth-rate derivation and volume projection
//! - [`rank`] - Sort/rank engine for table ordering
//! - [`fiscal`] - Fiscal-quarter labels (February fiscal year)
//! - [`export`] - Canonical CSV layout
//! - [`display`] - Terminal and JSON report rendering
//! - [`config`] - Configuration with environment variable support
//! - [`logging`] - Structured logging setup
//!
//! ## Usage Example
//!
//! ```rust
//! use client_utilization::aggregator::AccountBook;
//! use client_utilization::models::AccountingMode;
//!
//! # fn example() -> anyhow::Result<()> {
//! let mut book = AccountBook::new(AccountingMode::Annual);
//! let text = "Owner\tAccount\tType\tStart\tEnd\tAnnual\tTerm\tDate\tPeriod\tConsumed\tRemaining\n\
//!             Dana\tAcme\tEmail\t2023-01-01\t2024-01-01\t1,200,000\t2,400,000\t2023-07-01\t95,000\t600,000\t600,000\n";
//! book.import(text)?;
//! assert_eq!(book.accounts().len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod aggregator;
pub mod config;
pub mod display;
pub mod export;
pub mod fiscal;
pub mod forecast;
pub mod logging;
pub mod models;
pub mod parser;
pub mod products;
pub mod rank;
pub mod status;

pub use aggregator::AccountBook;
pub use models::*;
pub use status::{calculate_utilization, PacingStatus, UtilizationResult};
