//! CSV ingestion into the sales ledger.
//!
//! Expected header: `date,counterparty,quantity,product_code,product_name,lot_number`
//! with ISO dates. Day-level dates are normalized to their month bucket on
//! the way in, matching the ledger's month-granular timestamp column.

use std::path::Path;

use chrono::NaiveDate;
use log::info;
use serde::Deserialize;

use crate::daterange::month_bucket;
use crate::error::Result;
use crate::store::model::NewSalesLine;
use crate::store::SalesStore;

#[derive(Debug, Deserialize)]
struct CsvSalesLine {
    date: NaiveDate,
    counterparty: String,
    quantity: String,
    product_code: String,
    product_name: String,
    lot_number: String,
}

impl From<CsvSalesLine> for NewSalesLine {
    fn from(row: CsvSalesLine) -> Self {
        NewSalesLine {
            month: month_bucket(row.date),
            counterparty: row.counterparty,
            quantity: row.quantity,
            product_code: row.product_code,
            product_name: row.product_name,
            lot_number: row.lot_number,
        }
    }
}

/// Reads the whole CSV file and inserts its lines, returning the count.
/// Any unreadable row aborts the import; nothing is written in that case.
pub fn import_csv<P: AsRef<Path>>(store: &SalesStore, path: P) -> Result<usize> {
    let mut reader = csv::Reader::from_path(path.as_ref())?;

    let mut lines: Vec<NewSalesLine> = Vec::new();
    for record in reader.deserialize() {
        let row: CsvSalesLine = record?;
        lines.push(row.into());
    }

    let inserted = store.insert_lines(&lines)?;
    info!(
        "Imported {inserted} sales lines from {}",
        path.as_ref().display()
    );
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_import_normalizes_to_month_buckets() {
        let store = SalesStore::open(":memory:").unwrap();
        let file = write_csv(
            "date,counterparty,quantity,product_code,product_name,lot_number\n\
             2023-03-15,Acme Textiles,1250.5,YRN-001,Cotton 30/1,L-2301\n\
             2023-03-28,Bolt Fabrics,800,YRN-002,Wool 20/2,L-2302\n",
        );

        let inserted = import_csv(&store, file.path()).unwrap();
        assert_eq!(inserted, 2);

        let range = crate::daterange::resolve_range("03-2023", "03-2023").unwrap();
        let rows = store.fetch_range(range).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows
            .iter()
            .all(|r| r.month == NaiveDate::from_ymd_opt(2023, 3, 1).unwrap()));
    }

    #[test]
    fn test_import_rejects_bad_dates() {
        let store = SalesStore::open(":memory:").unwrap();
        let file = write_csv(
            "date,counterparty,quantity,product_code,product_name,lot_number\n\
             not-a-date,Acme,1,YRN-001,Cotton,L-1\n",
        );

        assert!(import_csv(&store, file.path()).is_err());
        assert_eq!(store.count_lines().unwrap(), 0);
    }
}
