//! # darzi-db: Database Layer for Darzi
//!
//! This crate provides database access for the Darzi tailoring record
//! keeper. It uses SQLite for local storage with sqlx for async
//! operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        Darzi Data Flow                              │
//! │                                                                     │
//! │  Shell action (save customer, update order status, ...)             │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌─────────────────────────────────────────────────────────────┐    │
//! │  │                    darzi-db (THIS CRATE)                    │    │
//! │  │                                                             │    │
//! │  │   ┌──────────────┐   ┌───────────────┐   ┌──────────────┐   │    │
//! │  │   │   Database   │   │  Repositories │   │  Migrations  │   │    │
//! │  │   │  (pool.rs)   │   │ customer.rs   │   │  (embedded)  │   │    │
//! │  │   │              │   │ measurement.rs│   │              │   │    │
//! │  │   │ SqlitePool   │◄──│ order.rs      │   │ 001_init.sql │   │    │
//! │  │   │ Connection   │   │ user.rs       │   │ + admin seed │   │    │
//! │  │   │ Management   │   │ counter.rs    │   │              │   │    │
//! │  │   └──────────────┘   └───────────────┘   └──────────────┘   │    │
//! │  │                                                             │    │
//! │  │   ┌─────────────────────────────────────────────────────┐   │    │
//! │  │   │ Backups: file copy backup/restore, JSON export/     │   │    │
//! │  │   │ import with Replace/Merge reconciliation            │   │    │
//! │  │   └─────────────────────────────────────────────────────┘   │    │
//! │  └─────────────────────────────────────────────────────────────┘    │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌─────────────────────────────────────────────────────────────┐    │
//! │  │                     SQLite Database                         │    │
//! │  │          ./darzi.db  (+ ./backups/darzi_*.db)               │    │
//! │  └─────────────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations and the admin seed
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (customer, order, ...)
//! - [`backup`] - File backup/restore and JSON export/import
//!
//! ## Usage
//!
//! ```rust,ignore
//! use darzi_db::{Database, DbConfig};
//!
//! // Create database with default config
//! let config = DbConfig::new("path/to/darzi.db");
//! let db = Database::new(config).await?;
//!
//! // Use repositories
//! let customer = db
//!     .customers()
//!     .create("Aisha Khan", "0501234567", None, today)
//!     .await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod backup;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use backup::{Backups, ExportDocument, ImportMode, ImportSummary};
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::counter::NaapCounterRepository;
pub use repository::customer::CustomerRepository;
pub use repository::measurement::MeasurementRepository;
pub use repository::order::OrderRepository;
pub use repository::user::UserRepository;
