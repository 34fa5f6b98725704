//! Report assembly: resolve the range, fetch, coerce, aggregate, forecast.
//!
//! Building a report is pure data-in/data-out so the front end can decide
//! how to render it. Malformed date expressions and reversed ranges abort
//! the build; an empty result set or too little forecast history become
//! warnings carried on the report instead.

use std::fmt;
use std::str::FromStr;

use log::info;

use crate::aggregate::{coerce_quantities, monthly_totals, top_totals, LabelTotal, SalesRecord};
use crate::config::ReportConfig;
use crate::daterange::{resolve_range, EffectiveRange};
use crate::error::{Result, SalesInsightError};
use crate::forecast::{forecast_monthly, ForecastPoint};
use crate::store::SalesStore;

/// The charts a report can include.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    TopCustomers,
    TopProductCodes,
    TopProductNames,
    TopLots,
    Forecast,
}

impl ChartKind {
    pub const ALL: [ChartKind; 5] = [
        ChartKind::TopCustomers,
        ChartKind::TopProductCodes,
        ChartKind::TopProductNames,
        ChartKind::TopLots,
        ChartKind::Forecast,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ChartKind::TopCustomers => "Top 10 customers by sales volume",
            ChartKind::TopProductCodes => "Top 10 product codes by sales volume",
            ChartKind::TopProductNames => "Top 10 product names by sales volume",
            ChartKind::TopLots => "Top 10 lot numbers by sales volume",
            ChartKind::Forecast => "Sales forecast",
        }
    }

    fn slug(self) -> &'static str {
        match self {
            ChartKind::TopCustomers => "customers",
            ChartKind::TopProductCodes => "product-codes",
            ChartKind::TopProductNames => "product-names",
            ChartKind::TopLots => "lots",
            ChartKind::Forecast => "forecast",
        }
    }

    /// Grouping key for the ranked charts; the forecast has none.
    fn key(self) -> Option<fn(&SalesRecord) -> &str> {
        match self {
            ChartKind::TopCustomers => Some(|r: &SalesRecord| r.counterparty.as_str()),
            ChartKind::TopProductCodes => Some(|r: &SalesRecord| r.product_code.as_str()),
            ChartKind::TopProductNames => Some(|r: &SalesRecord| r.product_name.as_str()),
            ChartKind::TopLots => Some(|r: &SalesRecord| r.lot_number.as_str()),
            ChartKind::Forecast => None,
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for ChartKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ChartKind::ALL
            .into_iter()
            .find(|kind| kind.slug() == s)
            .ok_or_else(|| {
                format!(
                    "unknown chart '{s}' (expected one of: customers, product-codes, \
                     product-names, lots, forecast)"
                )
            })
    }
}

/// What the caller asked for: two date expressions and a chart selection.
#[derive(Debug, Clone)]
pub struct ReportRequest {
    pub start_expr: String,
    pub end_expr: String,
    pub charts: Vec<ChartKind>,
}

/// One rendered-ready piece of a report.
#[derive(Debug, Clone)]
pub enum ReportSection {
    TopChart {
        kind: ChartKind,
        totals: Vec<LabelTotal>,
    },
    Forecast {
        history_months: usize,
        points: Vec<ForecastPoint>,
    },
}

/// A fully built report.
#[derive(Debug, Clone)]
pub struct Report {
    pub range: EffectiveRange,
    pub record_count: usize,
    pub dropped_rows: usize,
    pub sections: Vec<ReportSection>,
    pub warnings: Vec<String>,
}

/// Resolves the request's date range, fetches the matching sales lines, and
/// assembles one section per requested chart.
pub fn build_report(
    store: &SalesStore,
    config: &ReportConfig,
    request: &ReportRequest,
) -> Result<Report> {
    let range = resolve_range(&request.start_expr, &request.end_expr)?;
    info!("Building report for {} to {}", range.start, range.end);

    let rows = store.fetch_range(range)?;
    if rows.is_empty() {
        return Ok(Report {
            range,
            record_count: 0,
            dropped_rows: 0,
            sections: Vec::new(),
            warnings: vec!["No sales found in the selected date range.".to_string()],
        });
    }

    let (records, dropped_rows) = coerce_quantities(rows);
    let mut warnings = Vec::new();
    if records.is_empty() {
        warnings.push("All rows in the selected range had non-numeric quantities.".to_string());
    }

    let mut sections = Vec::new();
    for &kind in &request.charts {
        if records.is_empty() {
            break;
        }
        match kind.key() {
            Some(key) => sections.push(ReportSection::TopChart {
                kind,
                totals: top_totals(&records, key, config.top_n),
            }),
            None => {
                let series = monthly_totals(&records);
                match forecast_monthly(&series, config.forecast_periods, config.min_history_months)
                {
                    Ok(points) => sections.push(ReportSection::Forecast {
                        history_months: series.len(),
                        points,
                    }),
                    Err(SalesInsightError::InsufficientHistory {
                        required,
                        available,
                    }) => warnings.push(format!(
                        "Forecasting needs at least {required} months of sales; \
                         the selected range covers {available}."
                    )),
                    Err(e) => return Err(e),
                }
            }
        }
    }

    Ok(Report {
        range,
        record_count: records.len(),
        dropped_rows,
        sections,
        warnings,
    })
}
