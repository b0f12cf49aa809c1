//! # User Repository
//!
//! The credential store behind the login gate.
//!
//! ## Login Gate
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         How Login Works                                 │
//! │                                                                         │
//! │  Login dialog: username + password                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  verify("admin", "password")                                            │
//! │       │                                                                 │
//! │       ├── user missing          → false  (same answer as a wrong        │
//! │       ├── digest mismatch       → false   password; the dialog never    │
//! │       └── digest matches        → true    reveals which part failed)    │
//! │                                                                         │
//! │  Digest: unsalted SHA-256 hex. The database never stores a plaintext    │
//! │  password, matching the stored format of existing installations.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Self-service actions (rename, change password) operate on the
//! logged-in user only; there is no user administration surface.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use darzi_core::validation::{validate_password, validate_required};
use darzi_core::{auth, User};

/// Repository for user credential operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = UserRepository::new(pool);
///
/// if repo.verify("admin", "password").await? {
///     // unlock the shell
/// }
/// ```
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Gets a user row by username.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - No such user
    pub async fn get_by_username(&self, username: &str) -> DbResult<User> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash FROM users WHERE username = ?1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("User", username))
    }

    /// Checks a username/password pair.
    ///
    /// A missing user and a wrong password both answer `false`; the
    /// login dialog shows one message either way.
    pub async fn verify(&self, username: &str, password: &str) -> DbResult<bool> {
        let stored: Option<String> =
            sqlx::query_scalar("SELECT password_hash FROM users WHERE username = ?1")
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;

        let ok = match stored {
            Some(hash) => auth::verify_password(password, &hash),
            None => false,
        };

        debug!(username, ok, "Verified credentials");
        Ok(ok)
    }

    /// Overwrites a user's password without checking the old one.
    ///
    /// ## When To Call
    /// The forced-change dialog after a first login with the default
    /// credential. Interactive changes go through [`change_password`].
    ///
    /// [`change_password`]: UserRepository::change_password
    pub async fn set_password(&self, username: &str, new_password: &str) -> DbResult<()> {
        validate_password(new_password)?;

        let hash = auth::hash_password(new_password);
        let result = sqlx::query("UPDATE users SET password_hash = ?2 WHERE username = ?1")
            .bind(username)
            .bind(hash)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", username));
        }

        info!(username, "Password changed");
        Ok(())
    }

    /// Changes a password after verifying the current one.
    ///
    /// ## Returns
    /// * `Err(DbError::InvalidCredentials)` - Current password wrong
    /// * `Err(DbError::Validation)` - New password too short
    pub async fn change_password(
        &self,
        username: &str,
        current_password: &str,
        new_password: &str,
    ) -> DbResult<()> {
        if !self.verify(username, current_password).await? {
            return Err(DbError::InvalidCredentials {
                username: username.to_string(),
            });
        }

        self.set_password(username, new_password).await
    }

    /// Renames a user.
    ///
    /// ## Returns
    /// * `Err(DbError::Conflict)` - New name already taken
    /// * `Err(DbError::NotFound)` - Current user does not exist
    pub async fn rename_user(&self, current: &str, new_username: &str) -> DbResult<()> {
        let new_username = validate_required("username", new_username)?;

        let taken: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE username = ?1")
            .bind(&new_username)
            .fetch_optional(&self.pool)
            .await?;
        if taken.is_some() {
            return Err(DbError::conflict("username", new_username));
        }

        let result = sqlx::query("UPDATE users SET username = ?2 WHERE username = ?1")
            .bind(current)
            .bind(&new_username)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", current));
        }

        info!(from = current, to = %new_username, "User renamed");
        Ok(())
    }

    /// Inserts the default admin credential when no users exist.
    ///
    /// Idempotent; normally called through the startup sequence.
    pub async fn ensure_default_admin(&self) -> DbResult<()> {
        migrations::seed_default_admin(&self.pool).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
