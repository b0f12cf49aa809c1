//! # Naap Counter Repository
//!
//! Year-scoped sequential allocation of naap numbers.
//!
//! ## Allocation Protocol
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  How a Naap Number Is Allocated                         │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    INSERT OR IGNORE INTO counters (year, last_number) VALUES (Y, 0)     │
//! │    UPDATE counters SET last_number = last_number + 1                    │
//! │      WHERE year = Y RETURNING last_number                               │
//! │  COMMIT                                                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  "2025-0001", "2025-0002", ...   (fresh sequence every January)         │
//! │                                                                         │
//! │  The counter commits BEFORE the customer row is written. If the         │
//! │  intake insert fails afterwards, the drawn number is burned, never      │
//! │  handed out again. A gap in the books is harmless; a duplicate tag      │
//! │  on two customers' fabric is not.                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{Datelike, NaiveDate};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use darzi_core::naap;

/// Repository for the naap number counter table.
#[derive(Debug, Clone)]
pub struct NaapCounterRepository {
    pool: SqlitePool,
}

impl NaapCounterRepository {
    /// Creates a new NaapCounterRepository.
    pub fn new(pool: SqlitePool) -> Self {
        NaapCounterRepository { pool }
    }

    /// Draws the next naap number for the given day's year.
    ///
    /// ## Arguments
    /// * `today` - The entry date; its year scopes the sequence
    ///
    /// ## Returns
    /// The formatted number, e.g. `"2025-0001"`.
    ///
    /// ## Concurrency
    /// The seed + increment runs in one transaction, so two concurrent
    /// intakes can never observe the same `last_number`.
    pub async fn next_naap_number(&self, today: NaiveDate) -> DbResult<String> {
        let year = today.year();

        let mut tx = self.pool.begin().await?;

        // First allocation of a new year seeds the row at zero.
        sqlx::query("INSERT OR IGNORE INTO counters (year, last_number) VALUES (?1, 0)")
            .bind(year)
            .execute(&mut *tx)
            .await?;

        let next: i64 = sqlx::query_scalar(
            "UPDATE counters SET last_number = last_number + 1 WHERE year = ?1 \
             RETURNING last_number",
        )
        .bind(year)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        let naap_number = naap::format_naap_number(year, next);
        debug!(year, number = next, naap = %naap_number, "Allocated naap number");

        Ok(naap_number)
    }

    /// Reads the last number handed out for a year (0 if none yet).
    ///
    /// ## Usage
    /// Diagnostics and tests; allocation never reads this separately.
    pub async fn last_number(&self, year: i32) -> DbResult<i64> {
        let last: Option<i64> =
            sqlx::query_scalar("SELECT last_number FROM counters WHERE year = ?1")
                .bind(year)
                .fetch_optional(&self.pool)
                .await?;

        Ok(last.unwrap_or(0))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_sequential_allocation() {
        let db = test_db().await;
        let counters = db.counters();
        let today = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();

        assert_eq!(counters.next_naap_number(today).await.unwrap(), "2025-0001");
        assert_eq!(counters.next_naap_number(today).await.unwrap(), "2025-0002");
        assert_eq!(counters.last_number(2025).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_year_rollover_restarts_sequence() {
        let db = test_db().await;
        let counters = db.counters();

        let dec = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        let jan = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();

        assert_eq!(counters.next_naap_number(dec).await.unwrap(), "2025-0001");
        assert_eq!(counters.next_naap_number(jan).await.unwrap(), "2026-0001");

        // The old year's counter is untouched by the new year
        assert_eq!(counters.last_number(2025).await.unwrap(), 1);
        assert_eq!(counters.last_number(2026).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unseeded_year_reads_zero() {
        let db = test_db().await;
        assert_eq!(db.counters().last_number(1999).await.unwrap(), 0);
    }
}
