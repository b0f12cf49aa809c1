//! # Repository Module
//!
//! Database repository implementations for Darzi.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.   │
//! │                                                                         │
//! │  Shell action                                                           │
//! │       │                                                                 │
//! │       │  db.customers().search("2025-0001")                             │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  CustomerRepository                                                     │
//! │  ├── create(&self, name, mobile, address, date)                         │
//! │  ├── search(&self, term)                                                │
//! │  ├── get_by_id(&self, id)                                               │
//! │  └── count(&self)                                                       │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • Clean separation of concerns                                         │
//! │  • Easy to test (in-memory pool, real SQL)                              │
//! │  • SQL is isolated in one place                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`customer::CustomerRepository`] - Intake, search, counts
//! - [`measurement::MeasurementRepository`] - Measurement entry and history
//! - [`order::OrderRepository`] - Order tracking and the active worklist
//! - [`user::UserRepository`] - Login gate and account self-service
//! - [`counter::NaapCounterRepository`] - Year-scoped naap number allocation

pub mod counter;
pub mod customer;
pub mod measurement;
pub mod order;
pub mod user;
