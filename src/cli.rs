//! Command-line interface definitions and dispatch.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dialoguer::{theme::ColorfulTheme, Input, MultiSelect};

use crate::chart;
use crate::config::AppConfig;
use crate::error::Result;
use crate::ingest::import_csv;
use crate::report::{build_report, ChartKind, Report, ReportRequest, ReportSection};
use crate::store::SalesStore;

/// sales-insight - Sales reporting and forecasting over a local ledger.
#[derive(Parser, Debug)]
#[command(name = "sales-insight")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "sales-insight.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a report interactively (prompts for dates and charts)
    Run,

    /// Build a report from flags, without prompts
    Report(ReportArgs),

    /// Import sales lines from a CSV file
    Import(ImportArgs),

    /// Create the database schema
    InitDb,
}

/// Arguments for the `report` subcommand.
#[derive(Parser, Debug)]
pub struct ReportArgs {
    /// Start date expression (Day-Month-Year / Month-Year / Year)
    #[arg(long)]
    pub from: String,

    /// End date expression (Day-Month-Year / Month-Year / Year)
    #[arg(long)]
    pub to: String,

    /// Comma-separated charts: customers, product-codes, product-names, lots, forecast
    #[arg(long, value_delimiter = ',', default_value = "customers")]
    pub charts: Vec<ChartKind>,
}

/// Arguments for the `import` subcommand.
#[derive(Parser, Debug)]
pub struct ImportArgs {
    /// CSV file with header date,counterparty,quantity,product_code,product_name,lot_number
    #[arg(short, long)]
    pub file: PathBuf,
}

/// Dispatch a parsed command.
pub fn execute(command: Commands, config: &AppConfig) -> Result<()> {
    let store = SalesStore::open(&config.database.url)?;

    match command {
        Commands::Run => run_interactive(&store, config),
        Commands::Report(args) => {
            let request = ReportRequest {
                start_expr: args.from,
                end_expr: args.to,
                charts: args.charts,
            };
            let report = build_report(&store, &config.report, &request)?;
            render_report(&report);
            Ok(())
        }
        Commands::Import(args) => {
            let inserted = import_csv(&store, &args.file)?;
            chart::ok(&format!(
                "Imported {inserted} sales lines from {}",
                args.file.display()
            ));
            Ok(())
        }
        Commands::InitDb => {
            store.ensure_schema()?;
            chart::ok(&format!("Schema ready in {}", config.database.url));
            Ok(())
        }
    }
}

fn run_interactive(store: &SalesStore, config: &AppConfig) -> Result<()> {
    let theme = ColorfulTheme::default();

    let start_expr: String = Input::with_theme(&theme)
        .with_prompt("Start date (Day-Month-Year / Month-Year / Year)")
        .default("01-01-2024".to_string())
        .interact_text()?;

    let end_expr: String = Input::with_theme(&theme)
        .with_prompt("End date (Day-Month-Year / Month-Year / Year)")
        .default("06-2025".to_string())
        .interact_text()?;

    let items: Vec<&str> = ChartKind::ALL.iter().map(|kind| kind.title()).collect();
    let mut defaults = [false; ChartKind::ALL.len()];
    defaults[0] = true;
    let selection = MultiSelect::with_theme(&theme)
        .with_prompt("Charts to include")
        .items(&items)
        .defaults(&defaults)
        .interact()?;

    let charts: Vec<ChartKind> = if selection.is_empty() {
        vec![ChartKind::TopCustomers]
    } else {
        selection.into_iter().map(|i| ChartKind::ALL[i]).collect()
    };

    chart::note("Loading sales data...");
    let request = ReportRequest {
        start_expr,
        end_expr,
        charts,
    };
    let report = build_report(store, &config.report, &request)?;
    render_report(&report);
    Ok(())
}

/// Prints a built report to the terminal.
pub fn render_report(report: &Report) {
    chart::section(&format!(
        "Sales report: {} to {}",
        report.range.start, report.range.end
    ));

    if report.record_count > 0 {
        chart::ok(&format!("Loaded {} sales lines", report.record_count));
    }
    if report.dropped_rows > 0 {
        chart::warn(&format!(
            "Skipped {} rows with non-numeric quantities",
            report.dropped_rows
        ));
    }
    for warning in &report.warnings {
        chart::warn(warning);
    }

    for section in &report.sections {
        match section {
            ReportSection::TopChart { kind, totals } => {
                chart::render_bar_chart(kind.title(), totals);
            }
            ReportSection::Forecast {
                history_months,
                points,
            } => {
                chart::render_forecast(*history_months, points);
            }
        }
    }
}
