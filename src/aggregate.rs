//! Quantity coercion and group-and-sum analytics over fetched sales lines.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use log::warn;

use crate::store::model::SalesLineRow;

/// A sales line whose quantity survived numeric coercion.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesRecord {
    pub month: NaiveDate,
    pub counterparty: String,
    pub product_code: String,
    pub product_name: String,
    pub lot_number: String,
    pub quantity: f64,
}

/// One entry of a ranked aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelTotal {
    pub label: String,
    pub total: f64,
}

/// Parses the numeric-like quantity field of each row, dropping rows that do
/// not yield a finite number. Returns the surviving records and the number of
/// dropped rows.
pub fn coerce_quantities(rows: Vec<SalesLineRow>) -> (Vec<SalesRecord>, usize) {
    let total = rows.len();
    let records: Vec<SalesRecord> = rows
        .into_iter()
        .filter_map(|row| {
            let quantity: f64 = row.quantity.trim().parse().ok()?;
            if !quantity.is_finite() {
                return None;
            }
            Some(SalesRecord {
                month: row.month,
                counterparty: row.counterparty,
                product_code: row.product_code,
                product_name: row.product_name,
                lot_number: row.lot_number,
                quantity,
            })
        })
        .collect();

    let dropped = total - records.len();
    if dropped > 0 {
        warn!("Dropped {dropped} of {total} rows with non-numeric quantities");
    }
    (records, dropped)
}

/// Groups records by `key`, sums quantities, and returns the top `n` groups
/// by descending total. Ties break on the label so the ranking is stable.
pub fn top_totals<F>(records: &[SalesRecord], key: F, n: usize) -> Vec<LabelTotal>
where
    F: Fn(&SalesRecord) -> &str,
{
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for record in records {
        *totals.entry(key(record)).or_insert(0.0) += record.quantity;
    }

    let mut ranked: Vec<LabelTotal> = totals
        .into_iter()
        .map(|(label, total)| LabelTotal {
            label: label.to_string(),
            total,
        })
        .collect();

    // BTreeMap iteration is label-ordered, so a stable sort on the total
    // keeps equal totals alphabetical.
    ranked.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(std::cmp::Ordering::Equal));
    ranked.truncate(n);
    ranked
}

/// Sums quantities per month bucket: the two-column monthly series the
/// forecaster consumes.
pub fn monthly_totals(records: &[SalesRecord]) -> BTreeMap<NaiveDate, f64> {
    let mut series = BTreeMap::new();
    for record in records {
        *series.entry(record.month).or_insert(0.0) += record.quantity;
    }
    series
}
