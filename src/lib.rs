//! # Sales Insight
//!
//! An interactive sales reporting and forecasting tool over a local sales
//! ledger. Given a user-specified date range, it fetches the matching sales
//! lines, aggregates them by counterparty, product code, product name, and
//! lot number, renders top-10 bar charts, and optionally forecasts the next
//! six months of aggregate sales volume.
//!
//! ## Core Concepts
//!
//! - **Date expression**: a free-form range bound in one of three shapes -
//!   `Day-Month-Year` (exact day), `Month-Year` (whole month), or `Year`
//!   (whole year). Each resolves to an inclusive first/last-day interval.
//! - **Effective range**: the first day of the start expression and the last
//!   day of the end expression, always at day granularity.
//! - **Sales line**: one ledger row with a month bucket, counterparty,
//!   numeric-like quantity, product code, product name, and lot number.
//!
//! ## Example
//!
//! ```rust,ignore
//! use sales_insight::config::ReportConfig;
//! use sales_insight::report::{build_report, ChartKind, ReportRequest};
//! use sales_insight::store::SalesStore;
//!
//! let store = SalesStore::open("sales.db")?;
//! let request = ReportRequest {
//!     start_expr: "01-01-2023".to_string(),
//!     end_expr: "06-2024".to_string(),
//!     charts: vec![ChartKind::TopCustomers, ChartKind::Forecast],
//! };
//! let report = build_report(&store, &ReportConfig::default(), &request)?;
//! ```

pub mod aggregate;
pub mod chart;
pub mod cli;
pub mod config;
pub mod daterange;
pub mod error;
pub mod forecast;
pub mod ingest;
pub mod report;
pub mod store;

pub use config::AppConfig;
pub use daterange::{
    resolve_range, resolve_single, DateExpression, EffectiveRange, ResolvedInterval,
};
pub use error::{Result, SalesInsightError};
pub use forecast::{forecast_monthly, ForecastPoint};
pub use report::{build_report, ChartKind, Report, ReportRequest, ReportSection};
pub use store::SalesStore;
