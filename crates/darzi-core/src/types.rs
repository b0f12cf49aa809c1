//! # Domain Types
//!
//! Core domain types used throughout Darzi.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                │
//! │                                                                     │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐    │
//! │  │    Customer     │   │   Measurement   │   │      Order      │    │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │    │
//! │  │  id (i64)       │   │  id (i64)       │   │  id (i64)       │    │
//! │  │  naap_number    │   │  customer_id    │   │  customer_id    │    │
//! │  │  full_name      │   │  dress_type     │   │  order_status   │    │
//! │  │  mobile_number  │   │  measurements   │   │  payment_status │    │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘    │
//! │                                                                     │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐    │
//! │  │   OrderStatus   │   │  PaymentStatus  │   │    DressType    │    │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │    │
//! │  │  Pending        │   │  Unpaid         │   │  Shalwar Kameez │    │
//! │  │  In Progress    │   │  Partially Paid │   │  Kurta          │    │
//! │  │  ... Delivered  │   │  Paid           │   │  ... Other      │    │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Customers have two identifiers:
//! - `id`: SQLite rowid - immutable, used for database relations
//! - `naap_number`: year-scoped sequence string - human-readable, what
//!   the tailor writes on the fabric tag

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Customer
// =============================================================================

/// A customer intake record.
///
/// Customers are never deleted in the normal flow; only Replace-mode
/// import clears them wholesale. The naap number is immutable once
/// assigned.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Customer {
    /// Surrogate key (SQLite rowid).
    pub id: i64,

    /// Year-scoped sequence string, e.g. `2025-0001`. Unique.
    pub naap_number: String,

    /// Customer full name (required non-empty).
    pub full_name: String,

    /// Mobile number (required non-empty; the merge-import dedup key).
    pub mobile_number: String,

    /// Optional street address.
    pub address: Option<String>,

    /// Day the customer was first registered.
    pub date_of_entry: NaiveDate,
}

// =============================================================================
// Dress Type
// =============================================================================

/// The garment a measurement record describes.
///
/// The stored text matches what the intake form offers. `Other` keeps
/// records readable when a not-yet-specified garment name shows up in
/// an imported database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DressType {
    ShalwarKameez,
    Kurta,
    PantShirt,
    Waistcoat,
    Jacket,
    Other(String),
}

impl DressType {
    /// Garment names offered by the intake form, in display order.
    pub const KNOWN: &'static [&'static str] =
        &["Shalwar Kameez", "Kurta", "Pant Shirt", "Waistcoat", "Jacket"];

    /// Maps stored text back to a variant. Unknown names land in
    /// `Other` rather than failing, so foreign databases stay readable.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Shalwar Kameez" => DressType::ShalwarKameez,
            "Kurta" => DressType::Kurta,
            "Pant Shirt" => DressType::PantShirt,
            "Waistcoat" => DressType::Waistcoat,
            "Jacket" => DressType::Jacket,
            other => DressType::Other(other.to_string()),
        }
    }

    /// Whether this garment uses the structured suit field set
    /// (length, chest, sleeve, ...).
    pub fn has_suit_fields(&self) -> bool {
        matches!(self, DressType::ShalwarKameez | DressType::Kurta)
    }
}

impl fmt::Display for DressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DressType::ShalwarKameez => "Shalwar Kameez",
            DressType::Kurta => "Kurta",
            DressType::PantShirt => "Pant Shirt",
            DressType::Waistcoat => "Waistcoat",
            DressType::Jacket => "Jacket",
            DressType::Other(name) => name,
        };
        f.write_str(name)
    }
}

// =============================================================================
// Style Option Vocabularies
// =============================================================================
// The intake form offers these as dropdowns, but the columns stay
// free-text so imported records with other values survive untouched.

/// Collar options offered for suit garments.
pub const COLLAR_TYPES: &[&str] = &["Ban collar", "2 Piece collar", "Other"];

/// Stitch options offered for suit garments.
pub const STITCH_TYPES: &[&str] = &["Single", "Double", "Designer"];

/// Fabric options offered on the intake form.
pub const FABRIC_TYPES: &[&str] =
    &["Cotton", "Wash & Wear", "Boski", "Latha", "Karandi", "Other"];

// =============================================================================
// Measurement
// =============================================================================

/// A stored measurement record.
///
/// `measurements` holds the raw JSON blob exactly as persisted (a flat
/// object mapping field keys to numeric-as-text values). Use
/// [`Measurement::fields`] for the typed view; the raw string is kept
/// so export/import round-trips byte-identically.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Measurement {
    pub id: i64,

    /// Owning customer (FK, enforced).
    pub customer_id: i64,

    /// Stored garment name, e.g. "Shalwar Kameez".
    pub dress_type: String,

    /// JSON object of measurement fields (double-encoded in exports).
    pub measurements: String,

    pub collar_type: Option<String>,
    pub stitch_type: Option<String>,
    pub fabric_type: Option<String>,
    pub tailor_instructions: Option<String>,

    /// When true, `expected_delivery_date` is guaranteed present.
    pub urgent_delivery: bool,
    pub expected_delivery_date: Option<NaiveDate>,

    pub date_created: NaiveDate,
}

impl Measurement {
    /// Typed view of the stored garment name.
    pub fn dress_type(&self) -> DressType {
        DressType::from_name(&self.dress_type)
    }

    /// Parses the stored JSON blob into typed measurement fields.
    pub fn fields(&self) -> Result<crate::fields::MeasurementFields, crate::error::CoreError> {
        crate::fields::MeasurementFields::from_json(&self.dress_type(), &self.measurements)
    }
}

/// Input for creating or fully re-saving a measurement record.
///
/// The repository serializes `fields` into the measurements column and
/// stamps `date_created`; everything else is stored as given.
#[derive(Debug, Clone)]
pub struct NewMeasurement {
    pub customer_id: i64,
    pub dress_type: DressType,
    pub fields: crate::fields::MeasurementFields,
    pub collar_type: Option<String>,
    pub stitch_type: Option<String>,
    pub fabric_type: Option<String>,
    pub tailor_instructions: Option<String>,
    pub urgent_delivery: bool,
    /// Required when `urgent_delivery` is true; dropped otherwise.
    pub expected_delivery_date: Option<NaiveDate>,
}

/// A measurement joined with its owning customer, as shown in the
/// history screen and the detail dialog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct MeasurementWithCustomer {
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    #[serde(flatten)]
    pub measurement: Measurement,

    pub naap_number: String,
    pub customer_name: String,
    pub customer_mobile: String,
}

// =============================================================================
// Order Status
// =============================================================================

/// Workshop status of an order.
///
/// The usual flow is Pending → In Progress → Ready → Completed →
/// Delivered, with Cancelled reachable from any non-terminal state.
/// Transition adjacency is deliberately NOT enforced (any value may be
/// set from any other, matching how the shop actually corrects
/// mistakes); Delivered and Cancelled drop the order from the active
/// worklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
pub enum OrderStatus {
    Pending,
    #[cfg_attr(feature = "sqlx", sqlx(rename = "In Progress"))]
    #[serde(rename = "In Progress")]
    InProgress,
    Ready,
    Completed,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Every allowed status, in lifecycle order.
    pub const ALL: &'static [OrderStatus] = &[
        OrderStatus::Pending,
        OrderStatus::InProgress,
        OrderStatus::Ready,
        OrderStatus::Completed,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// The stored/displayed text for this status.
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::InProgress => "In Progress",
            OrderStatus::Ready => "Ready",
            OrderStatus::Completed => "Completed",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Terminal statuses leave the active worklist for good.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses the displayed text; rejects anything outside the six values.
impl FromStr for OrderStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "order_status".to_string(),
                allowed: OrderStatus::ALL.iter().map(|s| s.as_str().to_string()).collect(),
            })
    }
}

// =============================================================================
// Payment Status
// =============================================================================

/// Payment state of an order.
///
/// This is a derived display value, recomputed from price/amount_paid
/// whenever the amounts are written. It is never set independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
pub enum PaymentStatus {
    Unpaid,
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Partially Paid"))]
    #[serde(rename = "Partially Paid")]
    PartiallyPaid,
    Paid,
}

impl PaymentStatus {
    /// Derives the payment state from the order amounts.
    ///
    /// ## Rules
    /// - nothing paid          → Unpaid
    /// - paid >= price         → Paid
    /// - anything in between   → Partially Paid
    pub fn derive(price: Money, amount_paid: Money) -> Self {
        if amount_paid.is_zero() {
            PaymentStatus::Unpaid
        } else if amount_paid >= price {
            PaymentStatus::Paid
        } else {
            PaymentStatus::PartiallyPaid
        }
    }

    /// The stored/displayed text for this state.
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Unpaid => "Unpaid",
            PaymentStatus::PartiallyPaid => "Partially Paid",
            PaymentStatus::Paid => "Paid",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Order
// =============================================================================

/// A tailoring order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub customer_id: i64,

    /// Optional advisory link to the measurement being stitched.
    pub measurement_id: Option<i64>,

    pub order_date: DateTime<Utc>,
    pub due_date: Option<NaiveDate>,

    /// Agreed price in cents.
    #[cfg_attr(feature = "sqlx", sqlx(rename = "price_cents"))]
    pub price: Money,

    /// Amount received so far, in cents.
    #[cfg_attr(feature = "sqlx", sqlx(rename = "amount_paid_cents"))]
    pub amount_paid: Money,

    pub payment_status: PaymentStatus,
    pub order_status: OrderStatus,
    pub notes: Option<String>,
}

impl Order {
    /// Outstanding balance (price minus what has been paid).
    #[inline]
    pub fn balance_due(&self) -> Money {
        self.price - self.amount_paid
    }
}

/// Input for creating an order. Status defaults to Pending and the
/// payment state is derived from the amounts at insert time.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_id: i64,
    pub measurement_id: Option<i64>,
    pub due_date: NaiveDate,
    pub price: Money,
    pub amount_paid: Money,
    pub notes: Option<String>,
}

/// An order joined with its customer, as shown in the active worklist.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderWithCustomer {
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    #[serde(flatten)]
    pub order: Order,

    pub customer_name: String,
}

// =============================================================================
// User
// =============================================================================

/// A login credential row. No roles beyond "authenticated".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub username: String,

    /// SHA-256 hex digest of the password.
    pub password_hash: String,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_round_trip() {
        for status in OrderStatus::ALL {
            let parsed: OrderStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, *status);
        }
    }

    #[test]
    fn test_order_status_rejects_unknown() {
        let err = "Shipped".parse::<OrderStatus>().unwrap_err();
        assert!(matches!(err, ValidationError::NotAllowed { .. }));
    }

    #[test]
    fn test_order_status_terminal() {
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(!OrderStatus::Ready.is_terminal());
    }

    #[test]
    fn test_payment_status_derivation() {
        let price = Money::from_cents(10000);
        assert_eq!(PaymentStatus::derive(price, Money::zero()), PaymentStatus::Unpaid);
        assert_eq!(
            PaymentStatus::derive(price, Money::from_cents(4000)),
            PaymentStatus::PartiallyPaid
        );
        assert_eq!(
            PaymentStatus::derive(price, Money::from_cents(10000)),
            PaymentStatus::Paid
        );
        // Overpayment still counts as Paid
        assert_eq!(
            PaymentStatus::derive(price, Money::from_cents(12000)),
            PaymentStatus::Paid
        );
    }

    #[test]
    fn test_dress_type_names() {
        assert_eq!(DressType::from_name("Shalwar Kameez"), DressType::ShalwarKameez);
        assert_eq!(DressType::ShalwarKameez.to_string(), "Shalwar Kameez");
        assert!(DressType::Kurta.has_suit_fields());
        assert!(!DressType::Jacket.has_suit_fields());

        let sherwani = DressType::from_name("Sherwani");
        assert_eq!(sherwani, DressType::Other("Sherwani".to_string()));
        assert_eq!(sherwani.to_string(), "Sherwani");
    }

    #[test]
    fn test_balance_due() {
        let order = Order {
            id: 1,
            customer_id: 1,
            measurement_id: None,
            order_date: Utc::now(),
            due_date: None,
            price: Money::from_cents(10000),
            amount_paid: Money::from_cents(4000),
            payment_status: PaymentStatus::PartiallyPaid,
            order_status: OrderStatus::Pending,
            notes: None,
        };
        assert_eq!(order.balance_due(), Money::from_cents(6000));
    }
}
