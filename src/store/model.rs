//! Database model types for the sales ledger.

use chrono::NaiveDate;
use diesel::prelude::*;

use super::schema::sales_lines;

/// One sales line as stored. The quantity is kept as raw text because the
/// source field is only numeric-like; coercion happens at aggregation time.
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = sales_lines)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SalesLineRow {
    pub id: i32,
    pub month: NaiveDate,
    pub counterparty: String,
    pub quantity: String,
    pub product_code: String,
    pub product_name: String,
    pub lot_number: String,
}

/// A sales line to insert (id assigned by SQLite).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = sales_lines)]
pub struct NewSalesLine {
    pub month: NaiveDate,
    pub counterparty: String,
    pub quantity: String,
    pub product_code: String,
    pub product_name: String,
    pub lot_number: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sales_line_is_insertable() {
        // Type check - if this compiles, the Insertable derive works
        let _row = NewSalesLine {
            month: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            counterparty: "Acme Textiles".to_string(),
            quantity: "1250.5".to_string(),
            product_code: "YRN-001".to_string(),
            product_name: "Cotton 30/1".to_string(),
            lot_number: "L-2301".to_string(),
        };
    }
}
