//! # Order Repository
//!
//! Database operations for tailoring orders.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Order State Machine                              │
//! │                                                                         │
//! │  Pending ──► In Progress ──► Ready ──► Completed ──► Delivered          │
//! │     │             │            │           │                            │
//! │     └─────────────┴────────────┴───────────┴──────► Cancelled           │
//! │                                                                         │
//! │  The diagram shows the usual flow, but update_status accepts any of     │
//! │  the six values from any current value. The shop corrects mistakes by   │
//! │  moving status backwards; the typed enum already blocks everything      │
//! │  outside the vocabulary.                                                │
//! │                                                                         │
//! │  Delivered and Cancelled drop the order from the active worklist.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Payment status is never written directly: it is derived from
//! price/amount_paid whenever the amounts are stored.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use darzi_core::validation::validate_order_amounts;
use darzi_core::{NewOrder, Order, OrderStatus, OrderWithCustomer, PaymentStatus};

/// Order columns, qualified for joined queries.
const ORDER_COLUMNS: &str = "o.id, o.customer_id, o.measurement_id, o.order_date, o.due_date, \
     o.price_cents, o.amount_paid_cents, o.payment_status, o.order_status, o.notes";

/// Repository for order database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = OrderRepository::new(pool);
///
/// let order = repo.create(new_order).await?;
/// repo.update_status(order.id, OrderStatus::Ready).await?;
/// let worklist = repo.list_active().await?;
/// ```
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Records a new order.
    ///
    /// ## What This Does
    /// 1. Rejects negative amounts
    /// 2. Checks the customer (and linked measurement, if any) exists
    /// 3. Derives the payment status from the amounts
    /// 4. Inserts with status Pending, stamped with the current time
    ///
    /// ## Returns
    /// * `Ok(Order)` - The stored row
    /// * `Err(DbError::NotFound)` - Customer or measurement missing
    /// * `Err(DbError::Validation)` - Negative price or payment
    pub async fn create(&self, new: NewOrder) -> DbResult<Order> {
        validate_order_amounts(new.price, new.amount_paid)?;
        self.ensure_customer_exists(new.customer_id).await?;

        if let Some(measurement_id) = new.measurement_id {
            let exists: Option<i64> =
                sqlx::query_scalar("SELECT id FROM measurements WHERE id = ?1")
                    .bind(measurement_id)
                    .fetch_optional(&self.pool)
                    .await?;
            if exists.is_none() {
                return Err(DbError::not_found("Measurement", measurement_id));
            }
        }

        let payment_status = PaymentStatus::derive(new.price, new.amount_paid);
        let order_status = OrderStatus::default();
        let order_date = Utc::now();

        debug!(
            customer_id = new.customer_id,
            price = %new.price,
            payment = %payment_status,
            "Inserting order"
        );

        let result = sqlx::query(
            "INSERT INTO orders (customer_id, measurement_id, order_date, due_date, \
             price_cents, amount_paid_cents, payment_status, order_status, notes) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )
        .bind(new.customer_id)
        .bind(new.measurement_id)
        .bind(order_date)
        .bind(new.due_date)
        .bind(new.price)
        .bind(new.amount_paid)
        .bind(payment_status)
        .bind(order_status)
        .bind(&new.notes)
        .execute(&self.pool)
        .await?;

        self.get_by_id(result.last_insert_rowid()).await
    }

    /// Gets an order by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Order> {
        let query = format!("SELECT {ORDER_COLUMNS} FROM orders o WHERE o.id = ?1");

        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Order", id))
    }

    /// Gets an order joined with its customer (detail dialog).
    pub async fn details(&self, id: i64) -> DbResult<OrderWithCustomer> {
        let query = format!(
            "SELECT {ORDER_COLUMNS}, c.full_name AS customer_name \
             FROM orders o \
             JOIN customers c ON o.customer_id = c.id \
             WHERE o.id = ?1"
        );

        sqlx::query_as::<_, OrderWithCustomer>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Order", id))
    }

    /// Sets the workshop status of an order.
    ///
    /// Any of the six values is accepted from any current value; the
    /// typed parameter is the whole guard.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - No order with this id
    pub async fn update_status(&self, id: i64, status: OrderStatus) -> DbResult<()> {
        debug!(id, status = %status, "Updating order status");

        let result = sqlx::query("UPDATE orders SET order_status = ?2 WHERE id = ?1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", id));
        }

        Ok(())
    }

    /// The active worklist: everything not yet Delivered or Cancelled.
    ///
    /// Sorted soonest due date first; within a day, newest order first.
    pub async fn list_active(&self) -> DbResult<Vec<OrderWithCustomer>> {
        let query = format!(
            "SELECT {ORDER_COLUMNS}, c.full_name AS customer_name \
             FROM orders o \
             JOIN customers c ON o.customer_id = c.id \
             WHERE o.order_status NOT IN ('Delivered', 'Cancelled') \
             ORDER BY o.due_date ASC, o.id DESC"
        );

        let orders = sqlx::query_as::<_, OrderWithCustomer>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(orders)
    }

    /// Counts all orders (dashboard stat).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
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
