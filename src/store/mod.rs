//! SQLite persistence for the sales ledger using Diesel ORM.

pub mod model;
pub mod schema;

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel::SqliteConnection;
use log::debug;

use crate::daterange::EffectiveRange;
use crate::error::{Result, SalesInsightError};
use model::{NewSalesLine, SalesLineRow};

/// Database connection pool type alias.
pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS sales_lines (
    id INTEGER PRIMARY KEY,
    month DATE NOT NULL,
    counterparty TEXT NOT NULL,
    quantity TEXT NOT NULL,
    product_code TEXT NOT NULL,
    product_name TEXT NOT NULL,
    lot_number TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_sales_lines_month ON sales_lines (month);
";

/// Create a connection pool for the given database URL.
///
/// # Errors
/// Returns an error if the pool cannot be created.
pub fn create_pool(database_url: &str) -> Result<DbPool> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    // An in-memory SQLite database exists per connection, so the pool must
    // hold exactly one for the schema to be visible everywhere.
    let max_size = if database_url == ":memory:" { 1 } else { 5 };
    Pool::builder()
        .max_size(max_size)
        .build(manager)
        .map_err(|e| SalesInsightError::Connection(e.to_string()))
}

/// Handle to the sales ledger.
pub struct SalesStore {
    pool: DbPool,
}

impl SalesStore {
    /// Opens (creating if necessary) the ledger at `database_url`.
    pub fn open(database_url: &str) -> Result<Self> {
        let store = Self {
            pool: create_pool(database_url)?,
        };
        store.ensure_schema()?;
        Ok(store)
    }

    fn conn(&self) -> Result<PooledConnection<ConnectionManager<SqliteConnection>>> {
        self.pool
            .get()
            .map_err(|e| SalesInsightError::Connection(e.to_string()))
    }

    /// Creates the `sales_lines` table and its month index. Idempotent.
    pub fn ensure_schema(&self) -> Result<()> {
        let mut conn = self.conn()?;
        conn.batch_execute(SCHEMA_SQL)?;
        Ok(())
    }

    /// Inserts a batch of sales lines, returning how many were written.
    pub fn insert_lines(&self, lines: &[NewSalesLine]) -> Result<usize> {
        use schema::sales_lines::dsl::sales_lines;

        let mut conn = self.conn()?;
        let inserted = diesel::insert_into(sales_lines)
            .values(lines)
            .execute(&mut conn)?;
        debug!("Inserted {inserted} sales lines");
        Ok(inserted)
    }

    /// All sales lines whose month bucket falls inside the inclusive range,
    /// ordered by month. This is the `month BETWEEN ? AND ?` bind the whole
    /// report runs on.
    pub fn fetch_range(&self, range: EffectiveRange) -> Result<Vec<SalesLineRow>> {
        use schema::sales_lines::dsl::{month, sales_lines};

        let mut conn = self.conn()?;
        let rows = sales_lines
            .filter(month.between(range.start, range.end))
            .order(month.asc())
            .select(SalesLineRow::as_select())
            .load(&mut conn)?;
        debug!(
            "Fetched {} sales lines between {} and {}",
            rows.len(),
            range.start,
            range.end
        );
        Ok(rows)
    }

    /// Total number of stored sales lines.
    pub fn count_lines(&self) -> Result<i64> {
        use schema::sales_lines::dsl::sales_lines;

        let mut conn = self.conn()?;
        Ok(sales_lines.count().get_result(&mut conn)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn line(month: NaiveDate, counterparty: &str, quantity: &str) -> NewSalesLine {
        NewSalesLine {
            month,
            counterparty: counterparty.to_string(),
            quantity: quantity.to_string(),
            product_code: "YRN-001".to_string(),
            product_name: "Cotton 30/1".to_string(),
            lot_number: "L-1".to_string(),
        }
    }

    fn date(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    #[test]
    fn test_create_pool_with_memory_db() {
        let pool = create_pool(":memory:");
        assert!(pool.is_ok());
    }

    #[test]
    fn test_schema_is_idempotent() {
        let store = SalesStore::open(":memory:").unwrap();
        assert!(store.ensure_schema().is_ok());
    }

    #[test]
    fn test_insert_and_fetch_range() {
        let store = SalesStore::open(":memory:").unwrap();
        store
            .insert_lines(&[
                line(date(2023, 1), "Acme", "100"),
                line(date(2023, 6), "Acme", "200"),
                line(date(2024, 1), "Bolt", "300"),
            ])
            .unwrap();

        let range = EffectiveRange {
            start: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
        };
        let rows = store.fetch_range(range).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].month, date(2023, 1));
        assert_eq!(rows[1].month, date(2023, 6));
        assert_eq!(store.count_lines().unwrap(), 3);
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let store = SalesStore::open(":memory:").unwrap();
        store
            .insert_lines(&[line(date(2023, 1), "Acme", "100")])
            .unwrap();

        let range = EffectiveRange {
            start: date(2023, 1),
            end: date(2023, 1),
        };
        assert_eq!(store.fetch_range(range).unwrap().len(), 1);
    }
}
