//! # Backup, Restore, and Import/Export
//!
//! Two data-safety surfaces with different granularity:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Two Kinds of Safety Net                           │
//! │                                                                         │
//! │  FILE LEVEL (whole database)                                            │
//! │    backup()       → backups/darzi_backup_20250314_093000.db             │
//! │    auto_backup()  → backups/darzi_autobackup_20250314_093000.db         │
//! │    restore(path)  → safety backup first, then overwrite the live file   │
//! │                                                                         │
//! │    WAL is checkpointed (TRUNCATE) before any copy so the single file    │
//! │    holds every committed write.                                         │
//! │                                                                         │
//! │  ROW LEVEL (JSON interchange)                                           │
//! │    export_all()   → { "customers": [...], "measurements": [...] }       │
//! │    import_all(doc, Replace) → wipe measurements+customers, reinsert     │
//! │                               verbatim (original ids and naap numbers)  │
//! │    import_all(doc, Merge)   → skip customers whose mobile number is     │
//! │                               already present, skip measurements whose  │
//! │                               id is already present                     │
//! │                                                                         │
//! │    The whole import is ONE transaction: a malformed row late in the     │
//! │    document leaves the database exactly as it was.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Orders, users, and counters are deliberately outside the JSON
//! document; it is a customer-book interchange format, not a full dump.
//! Counters are realigned from the surviving naap numbers after an
//! import so the allocator can never re-issue an imported number.

use chrono::Local;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use darzi_core::{naap, Customer, Measurement};

/// Filename prefix for manual backups.
const BACKUP_PREFIX: &str = "darzi_backup";

/// Filename prefix for automatic backups.
const AUTO_BACKUP_PREFIX: &str = "darzi_autobackup";

// =============================================================================
// Export Document
// =============================================================================

/// How import reconciles incoming rows with existing data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    /// Wipe measurements and customers, then reinsert the document
    /// verbatim (original ids and naap numbers preserved).
    Replace,

    /// Keep existing data; skip incoming customers whose mobile number
    /// already exists and incoming measurements whose id already
    /// exists.
    Merge,
}

/// The JSON interchange document: flat table dumps of the customer
/// book. The `measurements` column inside each measurement row stays a
/// JSON-encoded string, so the document nests JSON-in-JSON exactly as
/// stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportDocument {
    pub customers: Vec<Customer>,
    pub measurements: Vec<Measurement>,
}

impl ExportDocument {
    /// Parses a document from JSON text.
    ///
    /// ## Returns
    /// * `Err(DbError::Format)` - Not valid JSON, or wrong shape
    pub fn parse(text: &str) -> DbResult<Self> {
        serde_json::from_str(text).map_err(|e| DbError::Format(e.to_string()))
    }

    /// Renders the document as indented JSON for the export file.
    pub fn to_pretty_json(&self) -> DbResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| DbError::Format(e.to_string()))
    }
}

/// What an import did, for the completion dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub customers_inserted: usize,
    pub customers_skipped: usize,
    pub measurements_inserted: usize,
    pub measurements_skipped: usize,
}

// =============================================================================
// Backups
// =============================================================================

/// File backup/restore and JSON export/import for one database file.
///
/// ## Usage
/// ```rust,ignore
/// let backups = db.backups()?;
///
/// let path = backups.backup().await?;
/// let doc = backups.export_all().await?;
/// let summary = backups.import_all(&doc, ImportMode::Merge).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Backups {
    pool: SqlitePool,
    database_path: PathBuf,
}

impl Backups {
    /// Creates a backup facade for a file-backed database.
    pub fn new(pool: SqlitePool, database_path: PathBuf) -> Self {
        Backups {
            pool,
            database_path,
        }
    }

    /// The directory backups are written to: `backups/` next to the
    /// database file.
    pub fn backup_dir(&self) -> PathBuf {
        self.database_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join("backups")
    }

    // -------------------------------------------------------------------------
    // File-level backup / restore
    // -------------------------------------------------------------------------

    /// Takes a manual backup of the database file.
    ///
    /// ## Returns
    /// The path of the new backup file.
    pub async fn backup(&self) -> DbResult<PathBuf> {
        self.copy_with_prefix(BACKUP_PREFIX).await
    }

    /// Takes an automatic (scheduled) backup.
    ///
    /// Same mechanics as [`backup`], distinguished only by filename
    /// prefix so the settings screen can tell them apart.
    ///
    /// [`backup`]: Backups::backup
    pub async fn auto_backup(&self) -> DbResult<PathBuf> {
        self.copy_with_prefix(AUTO_BACKUP_PREFIX).await
    }

    /// Restores the database file from a backup.
    ///
    /// ## What This Does
    /// 1. Takes a safety backup of the current live file
    /// 2. Checkpoints and copies the chosen backup over the live file
    ///
    /// The caller confirms with the user beforehand and reopens the
    /// database afterwards; open pools keep serving the old pages
    /// until then.
    ///
    /// ## Returns
    /// The path of the safety backup taken before the overwrite.
    pub async fn restore(&self, backup_path: &Path) -> DbResult<PathBuf> {
        if !backup_path.exists() {
            return Err(DbError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("backup file not found: {}", backup_path.display()),
            )));
        }

        let safety = self.backup().await?;
        info!(safety = %safety.display(), "Safety backup taken before restore");

        // Empty the WAL so the incoming file is not replayed against
        // stale frames.
        self.checkpoint().await?;
        tokio::fs::copy(backup_path, &self.database_path).await?;

        info!(
            from = %backup_path.display(),
            to = %self.database_path.display(),
            "Database restored from backup"
        );

        Ok(safety)
    }

    /// Lists backup files, newest first.
    ///
    /// The timestamped names sort chronologically, so this is a name
    /// sort in reverse.
    pub async fn list_backups(&self) -> DbResult<Vec<PathBuf>> {
        let dir = self.backup_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut entries = tokio::fs::read_dir(&dir).await?;
        let mut backups = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "db") {
                backups.push(path);
            }
        }

        backups.sort();
        backups.reverse();
        Ok(backups)
    }

    /// Checkpoints the WAL into the main database file.
    async fn checkpoint(&self) -> DbResult<()> {
        sqlx::query("PRAGMA wal_checkpoint(TRUNCATE)")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn copy_with_prefix(&self, prefix: &str) -> DbResult<PathBuf> {
        let dir = self.backup_dir();
        tokio::fs::create_dir_all(&dir).await?;

        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let target = dir.join(format!("{prefix}_{timestamp}.db"));

        // Flush the WAL so the copy alone is the complete database.
        self.checkpoint().await?;
        tokio::fs::copy(&self.database_path, &target).await?;

        info!(path = %target.display(), "Database backed up");
        Ok(target)
    }

    // -------------------------------------------------------------------------
    // JSON export / import
    // -------------------------------------------------------------------------

    /// Dumps the customer book as an interchange document.
    pub async fn export_all(&self) -> DbResult<ExportDocument> {
        let customers = sqlx::query_as::<_, Customer>(
            "SELECT id, naap_number, full_name, mobile_number, address, date_of_entry \
             FROM customers ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        let measurements = sqlx::query_as::<_, Measurement>(
            "SELECT id, customer_id, dress_type, measurements, collar_type, stitch_type, \
             fabric_type, tailor_instructions, urgent_delivery, expected_delivery_date, \
             date_created \
             FROM measurements ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(
            customers = customers.len(),
            measurements = measurements.len(),
            "Exported customer book"
        );

        Ok(ExportDocument {
            customers,
            measurements,
        })
    }

    /// Loads an interchange document into the database.
    ///
    /// ## Atomicity
    /// Everything (the Replace wipe included) runs in one transaction.
    /// Any failure rolls the database back to its pre-import state.
    ///
    /// ## Returns
    /// Counts of inserted and skipped rows.
    pub async fn import_all(
        &self,
        doc: &ExportDocument,
        mode: ImportMode,
    ) -> DbResult<ImportSummary> {
        info!(
            ?mode,
            customers = doc.customers.len(),
            measurements = doc.measurements.len(),
            "Importing customer book"
        );

        let mut summary = ImportSummary::default();
        let mut tx = self.pool.begin().await?;

        if mode == ImportMode::Replace {
            // Children first, the FK points measurements → customers.
            sqlx::query("DELETE FROM measurements").execute(&mut *tx).await?;
            sqlx::query("DELETE FROM customers").execute(&mut *tx).await?;
        }

        for customer in &doc.customers {
            if mode == ImportMode::Merge {
                let exists: Option<i64> =
                    sqlx::query_scalar("SELECT id FROM customers WHERE mobile_number = ?1")
                        .bind(&customer.mobile_number)
                        .fetch_optional(&mut *tx)
                        .await?;
                if exists.is_some() {
                    summary.customers_skipped += 1;
                    continue;
                }
            }

            sqlx::query(
                "INSERT INTO customers (id, naap_number, full_name, mobile_number, address, \
                 date_of_entry) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )
            .bind(customer.id)
            .bind(&customer.naap_number)
            .bind(&customer.full_name)
            .bind(&customer.mobile_number)
            .bind(&customer.address)
            .bind(customer.date_of_entry)
            .execute(&mut *tx)
            .await?;
            summary.customers_inserted += 1;
        }

        for measurement in &doc.measurements {
            if mode == ImportMode::Merge {
                let exists: Option<i64> =
                    sqlx::query_scalar("SELECT id FROM measurements WHERE id = ?1")
                        .bind(measurement.id)
                        .fetch_optional(&mut *tx)
                        .await?;
                if exists.is_some() {
                    summary.measurements_skipped += 1;
                    continue;
                }
            }

            sqlx::query(
                "INSERT INTO measurements (id, customer_id, dress_type, measurements, \
                 collar_type, stitch_type, fabric_type, tailor_instructions, urgent_delivery, \
                 expected_delivery_date, date_created) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            )
            .bind(measurement.id)
            .bind(measurement.customer_id)
            .bind(&measurement.dress_type)
            .bind(&measurement.measurements)
            .bind(&measurement.collar_type)
            .bind(&measurement.stitch_type)
            .bind(&measurement.fabric_type)
            .bind(&measurement.tailor_instructions)
            .bind(measurement.urgent_delivery)
            .bind(measurement.expected_delivery_date)
            .bind(measurement.date_created)
            .execute(&mut *tx)
            .await?;
            summary.measurements_inserted += 1;
        }

        // The allocator must never re-issue an imported number: pull
        // every counter up to the highest naap number now on record.
        let naap_numbers: Vec<String> =
            sqlx::query_scalar("SELECT naap_number FROM customers")
                .fetch_all(&mut *tx)
                .await?;

        let mut highest: HashMap<i32, i64> = HashMap::new();
        for naap_number in &naap_numbers {
            match naap::parse_naap_number(naap_number) {
                Ok((year, number)) => {
                    let entry = highest.entry(year).or_insert(0);
                    *entry = (*entry).max(number);
                }
                Err(_) => {
                    warn!(naap = %naap_number, "Skipping malformed naap number during counter realignment");
                }
            }
        }

        for (year, number) in highest {
            sqlx::query(
                "INSERT INTO counters (year, last_number) VALUES (?1, ?2) \
                 ON CONFLICT(year) DO UPDATE SET last_number = MAX(last_number, excluded.last_number)",
            )
            .bind(year)
            .bind(number)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(?summary, "Import complete");
        Ok(summary)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::NaiveDate;
    use darzi_core::fields::MeasurementFields;
    use darzi_core::{DressType, NewMeasurement};
    use tempfile::TempDir;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    async fn file_db(dir: &TempDir) -> Database {
        let path = dir.path().join("darzi.db");
        Database::new(DbConfig::new(path)).await.unwrap()
    }

    async fn seed_book(db: &Database) {
        let aisha = db
            .customers()
            .create("Aisha Khan", "0501234567", Some("Al Karama"), today())
            .await
            .unwrap();
        db.customers()
            .create("Bilal Ahmed", "0559876543", None, today())
            .await
            .unwrap();
        db.measurements()
            .create(
                NewMeasurement {
                    customer_id: aisha.id,
                    dress_type: DressType::ShalwarKameez,
                    fields: MeasurementFields::for_dress_type(&DressType::ShalwarKameez),
                    collar_type: Some("Ban collar".to_string()),
                    stitch_type: None,
                    fabric_type: Some("Cotton".to_string()),
                    tailor_instructions: None,
                    urgent_delivery: false,
                    expected_delivery_date: None,
                },
                today(),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_backup_creates_timestamped_file() {
        let dir = TempDir::new().unwrap();
        let db = file_db(&dir).await;
        seed_book(&db).await;
        let backups = db.backups().unwrap();

        let path = backups.backup().await.unwrap();
        assert!(path.exists());
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("darzi_backup_"));
        assert!(name.ends_with(".db"));

        let auto = backups.auto_backup().await.unwrap();
        let auto_name = auto.file_name().unwrap().to_string_lossy().to_string();
        assert!(auto_name.starts_with("darzi_autobackup_"));

        // The backup is a complete database: every seeded row survived
        // the WAL checkpoint and is in the copied file.
        let restored = Database::new(DbConfig::new(&path)).await.unwrap();
        assert_eq!(restored.customers().count().await.unwrap(), 2);
        assert_eq!(restored.measurements().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_restore_takes_safety_backup() {
        let dir = TempDir::new().unwrap();
        let db = file_db(&dir).await;
        seed_book(&db).await;
        let backups = db.backups().unwrap();

        let snapshot = backups.backup().await.unwrap();

        // More data arrives after the snapshot
        db.customers()
            .create("Chandni Malik", "0521112222", None, today())
            .await
            .unwrap();
        assert_eq!(db.customers().count().await.unwrap(), 3);

        let safety = backups.restore(&snapshot).await.unwrap();
        assert!(safety.exists());
        db.close().await;

        // Reopening sees the snapshot's two customers
        let reopened = file_db(&dir).await;
        assert_eq!(reopened.customers().count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_restore_missing_file() {
        let dir = TempDir::new().unwrap();
        let db = file_db(&dir).await;
        let backups = db.backups().unwrap();

        let err = backups.restore(Path::new("/nonexistent/backup.db")).await;
        assert!(matches!(err, Err(DbError::Io(_))));
    }

    #[tokio::test]
    async fn test_list_backups_newest_first() {
        let dir = TempDir::new().unwrap();
        let db = file_db(&dir).await;
        let backups = db.backups().unwrap();

        assert!(backups.list_backups().await.unwrap().is_empty());

        let first = backups.backup().await.unwrap();
        // Distinct names even within the same second are not guaranteed
        // by the timestamp alone, so force a different name.
        tokio::fs::copy(&first, backups.backup_dir().join("darzi_backup_99999999_999999.db"))
            .await
            .unwrap();

        let listed = backups.list_backups().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed[0]
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("darzi_backup_9999"));
    }

    #[tokio::test]
    async fn test_export_replace_round_trip() {
        let dir = TempDir::new().unwrap();
        let db = file_db(&dir).await;
        seed_book(&db).await;
        let backups = db.backups().unwrap();

        let doc = backups.export_all().await.unwrap();
        assert_eq!(doc.customers.len(), 2);
        assert_eq!(doc.measurements.len(), 1);

        // Through text and back: the document survives serialization
        let text = doc.to_pretty_json().unwrap();
        let parsed = ExportDocument::parse(&text).unwrap();

        // Import into a fresh database
        let other_dir = TempDir::new().unwrap();
        let other = file_db(&other_dir).await;
        let summary = other
            .backups()
            .unwrap()
            .import_all(&parsed, ImportMode::Replace)
            .await
            .unwrap();

        assert_eq!(summary.customers_inserted, 2);
        assert_eq!(summary.measurements_inserted, 1);
        assert_eq!(summary.customers_skipped, 0);

        // Identity round trip: ids, naap numbers, and blobs verbatim
        let reexported = other.backups().unwrap().export_all().await.unwrap();
        assert_eq!(
            serde_json::to_value(&reexported).unwrap(),
            serde_json::to_value(&doc).unwrap()
        );

        // The allocator continues past the imported numbers
        let next = other
            .customers()
            .create("Dawood Iqbal", "0533334444", None, today())
            .await
            .unwrap();
        assert_eq!(next.naap_number, "2025-0003");
    }

    #[tokio::test]
    async fn test_merge_skips_existing() {
        let dir = TempDir::new().unwrap();
        let db = file_db(&dir).await;
        seed_book(&db).await;
        let backups = db.backups().unwrap();

        let mut doc = backups.export_all().await.unwrap();

        // One incoming customer shares a mobile number, one is new
        doc.customers[1].mobile_number = "0599990000".to_string();
        doc.customers[1].naap_number = "2024-0007".to_string();
        doc.customers[1].id = 55;

        let summary = backups.import_all(&doc, ImportMode::Merge).await.unwrap();
        assert_eq!(summary.customers_skipped, 1); // Aisha's mobile already present
        assert_eq!(summary.customers_inserted, 1);
        assert_eq!(summary.measurements_skipped, 1); // same measurement id

        assert_eq!(db.customers().count().await.unwrap(), 3);

        // The foreign year's counter was aligned too
        assert_eq!(db.counters().last_number(2024).await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_import_failure_rolls_back() {
        let dir = TempDir::new().unwrap();
        let db = file_db(&dir).await;
        seed_book(&db).await;
        let backups = db.backups().unwrap();

        let mut doc = backups.export_all().await.unwrap();
        // A measurement pointing at a customer the document never
        // defines violates the FK mid-transaction.
        doc.measurements[0].customer_id = 9999;

        let err = backups.import_all(&doc, ImportMode::Replace).await;
        assert!(matches!(err, Err(DbError::ForeignKeyViolation { .. })));

        // The Replace wipe was rolled back with everything else
        assert_eq!(db.customers().count().await.unwrap(), 2);
        assert_eq!(db.measurements().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_parse_rejects_malformed_documents() {
        assert!(matches!(
            ExportDocument::parse("not json"),
            Err(DbError::Format(_))
        ));
        assert!(matches!(
            ExportDocument::parse(r#"{"customers": 3}"#),
            Err(DbError::Format(_))
        ));
    }
}
