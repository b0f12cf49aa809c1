//! # Database Migrations
//!
//! Embedded SQL migrations plus the first-run credential seed.
//!
//! ## How Migrations Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Startup Sequence                               │
//! │                                                                     │
//! │  Database::new                                                      │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  Run pending migrations (tracked in _sqlx_migrations)               │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  users table empty?                                                 │
//! │       ├── yes → insert admin / SHA-256("password")                  │
//! │       └── no  → leave credentials untouched                         │
//! │                                                                     │
//! │  Any failure here is fatal to startup (propagated, not swallowed).  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Adding New Migrations
//!
//! 1. Create a new file in `migrations/sqlite/` with the next sequence number
//! 2. Name format: `NNN_description.sql` (e.g., `002_add_fabric_table.sql`)
//! 3. Write idempotent SQL (use `IF NOT EXISTS` where possible)
//! 4. **NEVER** modify existing migrations - always add new ones

use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;
use darzi_core::{auth, DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_USERNAME};

/// Embedded migrations from the `migrations/sqlite` directory.
///
/// The `sqlx::migrate!()` macro embeds all SQL files from the specified
/// directory into the binary at compile time. No runtime file access
/// needed.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Runs all pending database migrations.
///
/// ## Safety
/// - Idempotent: safe to run on every process start
/// - Transactional: each migration runs in a transaction
/// - Ordered: migrations run in filename order (001, 002, ...)
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    info!("Checking for pending migrations");

    MIGRATOR.run(pool).await?;

    info!("All migrations applied successfully");
    Ok(())
}

/// Seeds the default admin credential when the users table is empty.
///
/// Only the very first boot of a fresh database inserts anything; once
/// any user row exists (including a renamed admin), this is a no-op.
pub async fn seed_default_admin(pool: &SqlitePool) -> DbResult<()> {
    let user_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    if user_count > 0 {
        return Ok(());
    }

    info!(
        username = DEFAULT_ADMIN_USERNAME,
        "No users found, creating default admin credential"
    );

    let password_hash = auth::hash_password(DEFAULT_ADMIN_PASSWORD);
    sqlx::query("INSERT INTO users (username, password_hash) VALUES (?1, ?2)")
        .bind(DEFAULT_ADMIN_USERNAME)
        .bind(password_hash)
        .execute(pool)
        .await?;

    Ok(())
}

/// Returns information about migrations.
///
/// ## Returns
/// Tuple of (total_migrations, applied_migrations)
///
/// ## Usage
/// For diagnostics and health checks.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let total = MIGRATOR.migrations.len();

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await
        .unwrap_or(0);

    Ok((total, applied as usize))
}
