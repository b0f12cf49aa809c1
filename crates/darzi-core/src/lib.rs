//! # darzi-core: Pure Business Logic for Darzi
//!
//! This crate is the heart of the Darzi tailoring record keeper. It
//! contains domain types and business rules as pure functions with zero
//! I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        Darzi Architecture                           │
//! │                                                                     │
//! │  ┌─────────────────────────────────────────────────────────────┐    │
//! │  │                 Desktop Shell (out of scope)                │    │
//! │  │   Login ──► Customers ──► Measurements ──► Orders ──► ...   │    │
//! │  └─────────────────────────────┬───────────────────────────────┘    │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼───────────────────────────────┐    │
//! │  │               ★ darzi-core (THIS CRATE) ★                   │    │
//! │  │                                                             │    │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌───────────┐         │    │
//! │  │   │  types  │ │  money  │ │  naap   │ │ validation│         │    │
//! │  │   │Customer │ │  Money  │ │ format  │ │   rules   │         │    │
//! │  │   │  Order  │ │ (cents) │ │  parse  │ │   checks  │         │    │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └───────────┘         │    │
//! │  │                                                             │    │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS        │    │
//! │  └─────────────────────────────┬───────────────────────────────┘    │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼───────────────────────────────┐    │
//! │  │                    darzi-db (Database Layer)                │    │
//! │  │          SQLite queries, migrations, repositories           │    │
//! │  └─────────────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Customer, Measurement, Order, User)
//! - [`fields`] - Per-garment measurement field variants
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`naap`] - Year-scoped sequential naap number formatting
//! - [`auth`] - Password digest helper
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation

// =============================================================================
// Module Declarations
// =============================================================================

pub mod auth;
pub mod error;
pub mod fields;
pub mod money;
pub mod naap;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use darzi_core::Money` instead of
// `use darzi_core::money::Money`

pub use error::{CoreError, ValidationError};
pub use fields::{MeasurementFields, SuitFields};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Username seeded into an empty users table on first boot.
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";

/// Well-known default password paired with [`DEFAULT_ADMIN_USERNAME`].
///
/// ## Why a constant?
/// The shop owner logs in once with admin/password and is expected to
/// change it from the admin panel. The seed only happens when the users
/// table is completely empty.
pub const DEFAULT_ADMIN_PASSWORD: &str = "password";

/// Minimum accepted password length for self-service password changes.
pub const MIN_PASSWORD_LENGTH: usize = 6;
