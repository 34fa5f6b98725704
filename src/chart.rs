//! Terminal rendering: ranked horizontal bar charts and the forecast table.

use tabled::{Table, Tabled};

use crate::aggregate::LabelTotal;
use crate::forecast::ForecastPoint;

const RULE_WIDTH: usize = 56;
const BAR_WIDTH: usize = 40;
const LABEL_WIDTH: usize = 28;

/// Print a section header and separator.
pub fn section(title: &str) {
    println!();
    println!("{title}");
    println!("{}", "─".repeat(RULE_WIDTH));
}

/// Print a successful status line.
pub fn ok(message: &str) {
    println!("✓ {message}");
}

/// Print a warning status line.
pub fn warn(message: &str) {
    println!("⚠ {message}");
}

/// Print an error status line.
pub fn error(message: &str) {
    eprintln!("✗ {message}");
}

/// Print a single-line note.
pub fn note(message: &str) {
    println!("{message}");
}

/// Renders a ranked aggregation as a horizontal bar chart, largest first,
/// with the summed quantity printed after each bar.
pub fn render_bar_chart(title: &str, totals: &[LabelTotal]) {
    section(title);

    if totals.is_empty() {
        note("(no data)");
        return;
    }

    let max_total = totals
        .iter()
        .map(|t| t.total)
        .fold(f64::NEG_INFINITY, f64::max)
        .max(0.0);
    let label_width = totals
        .iter()
        .map(|t| clip_label(&t.label).chars().count())
        .max()
        .unwrap_or(0);

    for entry in totals {
        let bar = bar_for(entry.total, max_total);
        println!(
            "{:<label_width$}  {:<BAR_WIDTH$}  {:>14}",
            clip_label(&entry.label),
            bar,
            format_quantity(entry.total),
        );
    }
}

/// Renders the forecast as a table of month, point forecast, and bounds.
pub fn render_forecast(history_months: usize, points: &[ForecastPoint]) {
    section(&format!("Sales forecast ({} months ahead)", points.len()));
    note(&format!("Based on {history_months} observed months"));
    println!();

    let rows: Vec<ForecastRow> = points.iter().map(ForecastRow::from).collect();
    let table = Table::new(rows).to_string();
    for line in table.lines() {
        println!("  {line}");
    }
}

#[derive(Tabled)]
struct ForecastRow {
    #[tabled(rename = "Month")]
    month: String,
    #[tabled(rename = "Forecast")]
    forecast: String,
    #[tabled(rename = "Lower")]
    lower: String,
    #[tabled(rename = "Upper")]
    upper: String,
}

impl From<&ForecastPoint> for ForecastRow {
    fn from(point: &ForecastPoint) -> Self {
        Self {
            month: point.month.format("%Y-%m").to_string(),
            forecast: format_quantity(point.forecast),
            lower: format_quantity(point.lower),
            upper: format_quantity(point.upper),
        }
    }
}

fn bar_for(total: f64, max_total: f64) -> String {
    if max_total <= 0.0 || total <= 0.0 {
        return String::new();
    }
    let len = ((total / max_total) * BAR_WIDTH as f64).round() as usize;
    // Every positive total gets at least one cell.
    "█".repeat(len.clamp(1, BAR_WIDTH))
}

fn clip_label(label: &str) -> String {
    let count = label.chars().count();
    if count <= LABEL_WIDTH {
        return label.to_string();
    }
    let clipped: String = label.chars().take(LABEL_WIDTH - 1).collect();
    format!("{clipped}…")
}

/// Formats a quantity with thousands separators and two decimals, the way
/// the charts annotate bar values.
pub fn format_quantity(value: f64) -> String {
    let negative = value < 0.0;
    let rounded = format!("{:.2}", value.abs());
    let (integer, fraction) = rounded.split_once('.').unwrap_or((&rounded, "00"));

    let mut grouped = String::new();
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}{grouped}.{fraction}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_quantity_groups_thousands() {
        assert_eq!(format_quantity(0.0), "0.00");
        assert_eq!(format_quantity(999.5), "999.50");
        assert_eq!(format_quantity(1000.0), "1,000.00");
        assert_eq!(format_quantity(1234567.891), "1,234,567.89");
        assert_eq!(format_quantity(-4200.0), "-4,200.00");
    }

    #[test]
    fn test_bar_scales_to_the_maximum() {
        assert_eq!(bar_for(100.0, 100.0).chars().count(), BAR_WIDTH);
        assert_eq!(bar_for(50.0, 100.0).chars().count(), BAR_WIDTH / 2);
        // Small but positive totals still show up.
        assert_eq!(bar_for(0.01, 100.0).chars().count(), 1);
        assert!(bar_for(0.0, 100.0).is_empty());
    }

    #[test]
    fn test_long_labels_are_clipped() {
        let long = "An Unreasonably Long Counterparty Name Ltd";
        let clipped = clip_label(long);
        assert_eq!(clipped.chars().count(), LABEL_WIDTH);
        assert!(clipped.ends_with('…'));
        assert_eq!(clip_label("Acme"), "Acme");
    }
}
