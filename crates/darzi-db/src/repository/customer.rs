//! # Customer Repository
//!
//! Database operations for customer intake records.
//!
//! ## Intake Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Saving a New Customer                             │
//! │                                                                         │
//! │  create("Aisha Khan", "0501234567", ...)                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Validate: name and mobile non-empty after trimming                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Draw naap number (committed immediately, see counter.rs)               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  INSERT customer row ── UNIQUE(naap_number) backstops the allocator     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Re-read the row (rowid → full Customer, id included)                   │
//! │                                                                         │
//! │  If the INSERT fails the drawn number is burned. Sequence gaps are      │
//! │  acceptable; duplicate fabric tags are not.                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::counter::NaapCounterRepository;
use darzi_core::validation::validate_required;
use darzi_core::Customer;

/// Columns selected for every full Customer read.
const CUSTOMER_COLUMNS: &str =
    "id, naap_number, full_name, mobile_number, address, date_of_entry";

/// Repository for customer database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = CustomerRepository::new(pool);
///
/// let customer = repo.create("Aisha Khan", "0501234567", None, today).await?;
/// let matches = repo.search("0501").await?;
/// ```
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Registers a new customer, allocating their naap number.
    ///
    /// ## Arguments
    /// * `full_name` - Required; stored trimmed
    /// * `mobile_number` - Required; stored trimmed
    /// * `address` - Optional; blank collapses to absent
    /// * `date_of_entry` - Registration day; its year scopes the naap
    ///   sequence
    ///
    /// ## Returns
    /// * `Ok(Customer)` - The stored row, id and naap number assigned
    /// * `Err(DbError::Validation)` - Name or mobile was blank
    pub async fn create(
        &self,
        full_name: &str,
        mobile_number: &str,
        address: Option<&str>,
        date_of_entry: NaiveDate,
    ) -> DbResult<Customer> {
        let full_name = validate_required("full_name", full_name)?;
        let mobile_number = validate_required("mobile_number", mobile_number)?;
        let address = address
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_string);

        // Committed before the insert; a failed insert burns the number.
        let naap_number = NaapCounterRepository::new(self.pool.clone())
            .next_naap_number(date_of_entry)
            .await?;

        debug!(naap = %naap_number, name = %full_name, "Inserting customer");

        let result = sqlx::query(
            "INSERT INTO customers (naap_number, full_name, mobile_number, address, date_of_entry) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&naap_number)
        .bind(&full_name)
        .bind(&mobile_number)
        .bind(&address)
        .bind(date_of_entry)
        .execute(&self.pool)
        .await?;

        self.get_by_id(result.last_insert_rowid()).await
    }

    /// Gets a customer by surrogate id.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - No such customer
    pub async fn get_by_id(&self, id: i64) -> DbResult<Customer> {
        let query = format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = ?1");

        sqlx::query_as::<_, Customer>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Customer", id))
    }

    /// Gets a customer by naap number.
    pub async fn get_by_naap(&self, naap_number: &str) -> DbResult<Option<Customer>> {
        let query = format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE naap_number = ?1");

        let customer = sqlx::query_as::<_, Customer>(&query)
            .bind(naap_number)
            .fetch_optional(&self.pool)
            .await?;

        Ok(customer)
    }

    /// Lists every customer, sorted by name.
    ///
    /// ## Usage
    /// The customer table and the intake pickers (measurement and order
    /// screens) all show this list.
    pub async fn list(&self) -> DbResult<Vec<Customer>> {
        let query =
            format!("SELECT {CUSTOMER_COLUMNS} FROM customers ORDER BY full_name ASC");

        let customers = sqlx::query_as::<_, Customer>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(customers)
    }

    /// Searches customers by name, mobile number, or naap number.
    ///
    /// ## How It Works
    /// Case-insensitive substring match (`LIKE %term%`) across the
    /// three identifying columns. A blank term behaves like [`list`].
    ///
    /// [`list`]: CustomerRepository::list
    pub async fn search(&self, term: &str) -> DbResult<Vec<Customer>> {
        let term = term.trim();

        if term.is_empty() {
            return self.list().await;
        }

        debug!(term = %term, "Searching customers");

        let pattern = format!("%{term}%");
        let query = format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers \
             WHERE full_name LIKE ?1 OR mobile_number LIKE ?1 OR naap_number LIKE ?1 \
             ORDER BY full_name ASC"
        );

        let customers = sqlx::query_as::<_, Customer>(&query)
            .bind(&pattern)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = customers.len(), "Search returned customers");
        Ok(customers)
    }

    /// Counts registered customers (dashboard stat).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
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

    fn march_14() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_naap_numbers() {
        let db = test_db().await;
        let repo = db.customers();

        let first = repo
            .create("Aisha Khan", "0501234567", Some("Al Karama"), march_14())
            .await
            .unwrap();
        let second = repo
            .create("Bilal Ahmed", "0559876543", None, march_14())
            .await
            .unwrap();

        assert_eq!(first.naap_number, "2025-0001");
        assert_eq!(second.naap_number, "2025-0002");
        assert_eq!(first.full_name, "Aisha Khan");
        assert_eq!(first.address.as_deref(), Some("Al Karama"));
        assert_eq!(second.address, None);
    }

    #[tokio::test]
    async fn test_create_trims_and_rejects_blank_fields() {
        let db = test_db().await;
        let repo = db.customers();

        let customer = repo
            .create("  Aisha Khan  ", " 0501234567 ", Some("  "), march_14())
            .await
            .unwrap();
        assert_eq!(customer.full_name, "Aisha Khan");
        assert_eq!(customer.mobile_number, "0501234567");
        assert_eq!(customer.address, None);

        let err = repo.create("   ", "0501234567", None, march_14()).await;
        assert!(matches!(err, Err(DbError::Validation(_))));

        let err = repo.create("Aisha", "", None, march_14()).await;
        assert!(matches!(err, Err(DbError::Validation(_))));

        // Failed intakes never consumed a number beyond the first success
        assert_eq!(db.counters().last_number(2025).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_search_matches_all_three_keys() {
        let db = test_db().await;
        let repo = db.customers();

        repo.create("Aisha Khan", "0501234567", None, march_14())
            .await
            .unwrap();
        repo.create("Bilal Ahmed", "0559876543", None, march_14())
            .await
            .unwrap();

        // By partial name
        let hits = repo.search("aisha").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].full_name, "Aisha Khan");

        // By partial mobile
        let hits = repo.search("9876").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].full_name, "Bilal Ahmed");

        // By naap number
        let hits = repo.search("2025-0001").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].naap_number, "2025-0001");

        // Blank term lists everyone, name-sorted
        let all = repo.search("  ").await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].full_name, "Aisha Khan");
        assert_eq!(all[1].full_name, "Bilal Ahmed");
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = test_db().await;
        let err = db.customers().get_by_id(999).await;
        assert!(matches!(err, Err(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_get_by_naap_and_count() {
        let db = test_db().await;
        let repo = db.customers();

        repo.create("Aisha Khan", "0501234567", None, march_14())
            .await
            .unwrap();

        assert!(repo.get_by_naap("2025-0001").await.unwrap().is_some());
        assert!(repo.get_by_naap("2024-0001").await.unwrap().is_none());
        assert_eq!(repo.count().await.unwrap(), 1);
    }
}
