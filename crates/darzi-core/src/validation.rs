//! # Validation Module
//!
//! Input validation utilities for Darzi.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                              │
//! │                                                                     │
//! │  Layer 1: Desktop shell                                             │
//! │  ├── Basic format checks (empty, length)                            │
//! │  └── Immediate user feedback                                        │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 2: THIS MODULE, called by the repositories                   │
//! │  └── Business rule validation before any row is written             │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 3: Database (SQLite)                                         │
//! │  ├── NOT NULL / UNIQUE / CHECK constraints                          │
//! │  └── Foreign key constraints                                        │
//! │                                                                     │
//! │  Defense in depth: multiple layers catch different errors           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::money::Money;
use crate::MIN_PASSWORD_LENGTH;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required free-text field (customer name, mobile number).
///
/// ## Rules
/// - Must not be empty after trimming
///
/// ## Returns
/// The trimmed value, which is what gets stored.
///
/// ## Example
/// ```rust
/// use darzi_core::validation::validate_required;
///
/// assert_eq!(validate_required("full_name", " Aisha Khan ").unwrap(), "Aisha Khan");
/// assert!(validate_required("full_name", "   ").is_err());
/// ```
pub fn validate_required(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    Ok(value.to_string())
}

/// Validates a new password for the self-service account actions.
///
/// ## Rules
/// - Minimum six characters (no other complexity rules; this is a
///   single-shop login gate, not an internet-facing account)
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LENGTH,
        });
    }

    Ok(())
}

// =============================================================================
// Order Amount Validators
// =============================================================================

/// Validates the money amounts on a new order.
///
/// ## Rules
/// - price must not be negative (zero is allowed: alteration favors)
/// - amount_paid must not be negative
/// - amount_paid may exceed price; the derived state is simply Paid
pub fn validate_order_amounts(price: Money, amount_paid: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
        });
    }

    if amount_paid.is_negative() {
        return Err(ValidationError::Negative {
            field: "amount_paid".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Delivery Validators
// =============================================================================

/// Validates the urgent-delivery pairing on a measurement.
///
/// ## Rules
/// - urgent ⇒ an expected delivery date is mandatory
/// - not urgent ⇒ any supplied date is discarded (stored as absent)
///
/// ## Returns
/// The expected date to actually store.
pub fn validate_delivery(
    urgent: bool,
    expected_date: Option<NaiveDate>,
) -> ValidationResult<Option<NaiveDate>> {
    if urgent {
        match expected_date {
            Some(date) => Ok(Some(date)),
            None => Err(ValidationError::Required {
                field: "expected_delivery_date".to_string(),
            }),
        }
    } else {
        Ok(None)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_required() {
        assert_eq!(validate_required("full_name", "Aisha Khan").unwrap(), "Aisha Khan");
        assert_eq!(validate_required("mobile", "  0501234567 ").unwrap(), "0501234567");

        assert!(validate_required("full_name", "").is_err());
        assert!(validate_required("full_name", "   ").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("secret").is_ok());
        assert!(validate_password("longer password").is_ok());

        assert!(validate_password("12345").is_err());
        assert!(validate_password("").is_err());
    }

    #[test]
    fn test_validate_order_amounts() {
        let price = Money::from_cents(10000);
        assert!(validate_order_amounts(price, Money::zero()).is_ok());
        assert!(validate_order_amounts(Money::zero(), Money::zero()).is_ok());
        // Overpayment is fine
        assert!(validate_order_amounts(price, Money::from_cents(12000)).is_ok());

        assert!(validate_order_amounts(Money::from_cents(-1), Money::zero()).is_err());
        assert!(validate_order_amounts(price, Money::from_cents(-1)).is_err());
    }

    #[test]
    fn test_validate_delivery() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();

        // Urgent requires a date
        assert_eq!(validate_delivery(true, Some(date)).unwrap(), Some(date));
        assert!(validate_delivery(true, None).is_err());

        // Non-urgent drops any supplied date
        assert_eq!(validate_delivery(false, Some(date)).unwrap(), None);
        assert_eq!(validate_delivery(false, None).unwrap(), None);
    }
}
