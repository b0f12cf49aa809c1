//! # Measurement Repository
//!
//! Database operations for garment measurement records.
//!
//! ## Key Operations
//! - Save and re-save measurement records (the edit flow is a full
//!   re-save under the same id)
//! - History listing joined with customer identity
//! - Dashboard counts (total, urgent still pending)
//!
//! ## History Search
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     How History Search Works                            │
//! │                                                                         │
//! │  User types: "0501"                                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  LIKE %0501% across: customer name, mobile, naap number, entry date     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  measurements ⋈ customers, newest first                                 │
//! │  (ORDER BY date_created DESC, id DESC — same-day records show the       │
//! │   most recently saved one on top)                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use darzi_core::validation::validate_delivery;
use darzi_core::{Measurement, MeasurementWithCustomer, NewMeasurement};

/// Measurement columns, qualified for joined queries.
const MEASUREMENT_COLUMNS: &str = "m.id, m.customer_id, m.dress_type, m.measurements, \
     m.collar_type, m.stitch_type, m.fabric_type, m.tailor_instructions, \
     m.urgent_delivery, m.expected_delivery_date, m.date_created";

/// A dashboard row: who had what measured, when.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct RecentMeasurement {
    pub customer_name: String,
    pub dress_type: String,
    pub date_created: NaiveDate,
}

/// Repository for measurement database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = MeasurementRepository::new(pool);
///
/// let saved = repo.create(new_measurement, today).await?;
/// let rows = repo.history(Some("Aisha")).await?;
/// ```
#[derive(Debug, Clone)]
pub struct MeasurementRepository {
    pool: SqlitePool,
}

impl MeasurementRepository {
    /// Creates a new MeasurementRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MeasurementRepository { pool }
    }

    /// Saves a new measurement record.
    ///
    /// ## Arguments
    /// * `new` - The record to store; `fields` is serialized into the
    ///   measurements column
    /// * `today` - Stamped as `date_created`
    ///
    /// ## Returns
    /// * `Ok(Measurement)` - The stored row
    /// * `Err(DbError::NotFound)` - The customer does not exist
    /// * `Err(DbError::Validation)` - Urgent delivery without a date
    pub async fn create(&self, new: NewMeasurement, today: NaiveDate) -> DbResult<Measurement> {
        let expected_date = validate_delivery(new.urgent_delivery, new.expected_delivery_date)?;
        self.ensure_customer_exists(new.customer_id).await?;

        let dress_type = new.dress_type.to_string();
        let blob = new.fields.to_json();

        debug!(customer_id = new.customer_id, dress_type = %dress_type, "Inserting measurement");

        let result = sqlx::query(
            "INSERT INTO measurements (customer_id, dress_type, measurements, collar_type, \
             stitch_type, fabric_type, tailor_instructions, urgent_delivery, \
             expected_delivery_date, date_created) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        )
        .bind(new.customer_id)
        .bind(&dress_type)
        .bind(&blob)
        .bind(&new.collar_type)
        .bind(&new.stitch_type)
        .bind(&new.fabric_type)
        .bind(&new.tailor_instructions)
        .bind(new.urgent_delivery)
        .bind(expected_date)
        .bind(today)
        .execute(&self.pool)
        .await?;

        self.get_by_id(result.last_insert_rowid()).await
    }

    /// Re-saves an existing measurement record under the same id.
    ///
    /// `date_created` is kept; everything else is replaced.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - No measurement with this id
    pub async fn update(&self, id: i64, new: NewMeasurement) -> DbResult<Measurement> {
        let expected_date = validate_delivery(new.urgent_delivery, new.expected_delivery_date)?;
        self.ensure_customer_exists(new.customer_id).await?;

        let dress_type = new.dress_type.to_string();
        let blob = new.fields.to_json();

        debug!(id, "Re-saving measurement");

        let result = sqlx::query(
            "UPDATE measurements SET customer_id = ?2, dress_type = ?3, measurements = ?4, \
             collar_type = ?5, stitch_type = ?6, fabric_type = ?7, tailor_instructions = ?8, \
             urgent_delivery = ?9, expected_delivery_date = ?10 \
             WHERE id = ?1",
        )
        .bind(id)
        .bind(new.customer_id)
        .bind(&dress_type)
        .bind(&blob)
        .bind(&new.collar_type)
        .bind(&new.stitch_type)
        .bind(&new.fabric_type)
        .bind(&new.tailor_instructions)
        .bind(new.urgent_delivery)
        .bind(expected_date)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Measurement", id));
        }

        self.get_by_id(id).await
    }

    /// Gets a measurement by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Measurement> {
        let query = format!("SELECT {MEASUREMENT_COLUMNS} FROM measurements m WHERE m.id = ?1");

        sqlx::query_as::<_, Measurement>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Measurement", id))
    }

    /// Gets a measurement joined with its customer (detail dialog).
    pub async fn details(&self, id: i64) -> DbResult<MeasurementWithCustomer> {
        let query = format!(
            "SELECT {MEASUREMENT_COLUMNS}, c.naap_number, \
             c.full_name AS customer_name, c.mobile_number AS customer_mobile \
             FROM measurements m \
             JOIN customers c ON m.customer_id = c.id \
             WHERE m.id = ?1"
        );

        sqlx::query_as::<_, MeasurementWithCustomer>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Measurement", id))
    }

    /// Lists the history screen rows, newest first.
    ///
    /// ## Arguments
    /// * `term` - Optional filter; matched as a substring against the
    ///   customer's name, mobile, naap number, and the record's entry
    ///   date
    pub async fn history(&self, term: Option<&str>) -> DbResult<Vec<MeasurementWithCustomer>> {
        let base = format!(
            "SELECT {MEASUREMENT_COLUMNS}, c.naap_number, \
             c.full_name AS customer_name, c.mobile_number AS customer_mobile \
             FROM measurements m \
             JOIN customers c ON m.customer_id = c.id"
        );

        let rows = match term.map(str::trim).filter(|t| !t.is_empty()) {
            Some(term) => {
                debug!(term = %term, "Searching measurement history");
                let pattern = format!("%{term}%");
                let query = format!(
                    "{base} WHERE c.full_name LIKE ?1 OR c.mobile_number LIKE ?1 \
                     OR c.naap_number LIKE ?1 OR m.date_created LIKE ?1 \
                     ORDER BY m.date_created DESC, m.id DESC"
                );
                sqlx::query_as::<_, MeasurementWithCustomer>(&query)
                    .bind(&pattern)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let query = format!("{base} ORDER BY m.date_created DESC, m.id DESC");
                sqlx::query_as::<_, MeasurementWithCustomer>(&query)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(rows)
    }

    /// Lists a customer's measurements, newest first (order screen
    /// picker).
    pub async fn list_for_customer(&self, customer_id: i64) -> DbResult<Vec<Measurement>> {
        let query = format!(
            "SELECT {MEASUREMENT_COLUMNS} FROM measurements m \
             WHERE m.customer_id = ?1 \
             ORDER BY m.date_created DESC, m.id DESC"
        );

        let measurements = sqlx::query_as::<_, Measurement>(&query)
            .bind(customer_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(measurements)
    }

    /// Counts all measurement records (dashboard stat).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM measurements")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Counts urgent measurements whose expected delivery date has not
    /// passed (dashboard "pending urgent" stat).
    pub async fn count_urgent_pending(&self, today: NaiveDate) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM measurements \
             WHERE urgent_delivery = 1 AND date(expected_delivery_date) >= date(?1)",
        )
        .bind(today)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// The most recently saved records (dashboard "recent" table).
    pub async fn recent(&self, limit: u32) -> DbResult<Vec<RecentMeasurement>> {
        let rows = sqlx::query_as::<_, RecentMeasurement>(
            "SELECT c.full_name AS customer_name, m.dress_type, m.date_created \
             FROM measurements m \
             JOIN customers c ON m.customer_id = c.id \
             ORDER BY m.id DESC \
             LIMIT ?1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Fails with NotFound unless the customer row exists.
    async fn ensure_customer_exists(&self, customer_id: i64) -> DbResult<()> {
        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM customers WHERE id = ?1")
            .bind(customer_id)
            .fetch_optional(&self.pool)
            .await?;

        if exists.is_none() {
            return Err(DbError::not_found("Customer", customer_id));
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use darzi_core::fields::{MeasurementFields, SuitFields};
    use darzi_core::{Customer, DressType};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    async fn seed_customer(db: &Database) -> Customer {
        db.customers()
            .create("Aisha Khan", "0501234567", None, today())
            .await
            .unwrap()
    }

    fn suit_measurement(customer_id: i64) -> NewMeasurement {
        NewMeasurement {
            customer_id,
            dress_type: DressType::ShalwarKameez,
            fields: MeasurementFields::Suit(SuitFields {
                length: "42".to_string(),
                width: "24".to_string(),
                chest: "46".to_string(),
                waist: "40".to_string(),
                sleeve: "24.5".to_string(),
                neck: "16".to_string(),
                shalwar_waist: "38".to_string(),
                pancha: "9".to_string(),
            }),
            collar_type: Some("Ban collar".to_string()),
            stitch_type: Some("Double".to_string()),
            fabric_type: Some("Boski".to_string()),
            tailor_instructions: Some("Front pocket".to_string()),
            urgent_delivery: false,
            expected_delivery_date: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_read_back() {
        let db = test_db().await;
        let customer = seed_customer(&db).await;

        let saved = db
            .measurements()
            .create(suit_measurement(customer.id), today())
            .await
            .unwrap();

        assert_eq!(saved.customer_id, customer.id);
        assert_eq!(saved.dress_type, "Shalwar Kameez");
        assert_eq!(saved.date_created, today());
        assert!(!saved.urgent_delivery);
        assert_eq!(saved.expected_delivery_date, None);

        // Typed round trip through the stored blob
        match saved.fields().unwrap() {
            MeasurementFields::Suit(fields) => {
                assert_eq!(fields.sleeve, "24.5");
                assert_eq!(fields.chest, "46");
            }
            other => panic!("expected suit fields, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_rejects_missing_customer() {
        let db = test_db().await;
        let err = db.measurements().create(suit_measurement(42), today()).await;
        assert!(matches!(err, Err(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_urgent_delivery_pairing() {
        let db = test_db().await;
        let customer = seed_customer(&db).await;
        let due = NaiveDate::from_ymd_opt(2025, 3, 20).unwrap();

        // Urgent without a date is rejected
        let mut urgent = suit_measurement(customer.id);
        urgent.urgent_delivery = true;
        let err = db.measurements().create(urgent.clone(), today()).await;
        assert!(matches!(err, Err(DbError::Validation(_))));

        // Urgent with a date stores the date
        urgent.expected_delivery_date = Some(due);
        let saved = db.measurements().create(urgent, today()).await.unwrap();
        assert!(saved.urgent_delivery);
        assert_eq!(saved.expected_delivery_date, Some(due));

        // Non-urgent drops any supplied date
        let mut relaxed = suit_measurement(customer.id);
        relaxed.expected_delivery_date = Some(due);
        let saved = db.measurements().create(relaxed, today()).await.unwrap();
        assert_eq!(saved.expected_delivery_date, None);
    }

    #[tokio::test]
    async fn test_update_keeps_date_created() {
        let db = test_db().await;
        let customer = seed_customer(&db).await;
        let repo = db.measurements();

        let saved = repo.create(suit_measurement(customer.id), today()).await.unwrap();

        let mut revised = suit_measurement(customer.id);
        revised.dress_type = DressType::Kurta;
        revised.tailor_instructions = None;
        let updated = repo.update(saved.id, revised).await.unwrap();

        assert_eq!(updated.id, saved.id);
        assert_eq!(updated.dress_type, "Kurta");
        assert_eq!(updated.tailor_instructions, None);
        assert_eq!(updated.date_created, saved.date_created);

        let err = repo.update(999, suit_measurement(customer.id)).await;
        assert!(matches!(err, Err(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_history_ordering_and_search() {
        let db = test_db().await;
        let repo = db.measurements();

        let aisha = seed_customer(&db).await;
        let bilal = db
            .customers()
            .create("Bilal Ahmed", "0559876543", None, today())
            .await
            .unwrap();

        let earlier = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        repo.create(suit_measurement(aisha.id), earlier).await.unwrap();
        let first_today = repo.create(suit_measurement(bilal.id), today()).await.unwrap();
        let second_today = repo.create(suit_measurement(aisha.id), today()).await.unwrap();

        let rows = repo.history(None).await.unwrap();
        assert_eq!(rows.len(), 3);
        // Newest day first; within a day, newest id first
        assert_eq!(rows[0].measurement.id, second_today.id);
        assert_eq!(rows[1].measurement.id, first_today.id);
        assert_eq!(rows[2].measurement.date_created, earlier);
        assert_eq!(rows[0].customer_name, "Aisha Khan");
        assert_eq!(rows[0].naap_number, "2025-0001");

        // Filter by customer identity
        let rows = repo.history(Some("Bilal")).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].customer_mobile, "0559876543");

        // Filter by entry date
        let rows = repo.history(Some("2025-03-01")).await.unwrap();
        assert_eq!(rows.len(), 1);

        // Blank terms list everything
        let rows = repo.history(Some("  ")).await.unwrap();
        assert_eq!(rows.len(), 3);
    }

    #[tokio::test]
    async fn test_dashboard_counts() {
        let db = test_db().await;
        let customer = seed_customer(&db).await;
        let repo = db.measurements();

        let mut urgent_future = suit_measurement(customer.id);
        urgent_future.urgent_delivery = true;
        urgent_future.expected_delivery_date = NaiveDate::from_ymd_opt(2025, 3, 20);

        let mut urgent_past = suit_measurement(customer.id);
        urgent_past.urgent_delivery = true;
        urgent_past.expected_delivery_date = NaiveDate::from_ymd_opt(2025, 3, 1);

        repo.create(suit_measurement(customer.id), today()).await.unwrap();
        repo.create(urgent_future, today()).await.unwrap();
        repo.create(urgent_past, today()).await.unwrap();

        assert_eq!(repo.count().await.unwrap(), 3);
        // Only the urgent record whose date has not passed counts
        assert_eq!(repo.count_urgent_pending(today()).await.unwrap(), 1);

        let recent = repo.recent(2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].customer_name, "Aisha Khan");
    }

    #[tokio::test]
    async fn test_list_for_customer() {
        let db = test_db().await;
        let aisha = seed_customer(&db).await;
        let bilal = db
            .customers()
            .create("Bilal Ahmed", "0559876543", None, today())
            .await
            .unwrap();
        let repo = db.measurements();

        repo.create(suit_measurement(aisha.id), today()).await.unwrap();
        repo.create(suit_measurement(aisha.id), today()).await.unwrap();
        repo.create(suit_measurement(bilal.id), today()).await.unwrap();

        assert_eq!(repo.list_for_customer(aisha.id).await.unwrap().len(), 2);
        assert_eq!(repo.list_for_customer(bilal.id).await.unwrap().len(), 1);
    }
}
