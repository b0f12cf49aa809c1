//! # Measurement Fields
//!
//! Typed view over the per-garment measurement blob.
//!
//! ## Storage Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  measurements column (TEXT)                                         │
//! │                                                                     │
//! │  Shalwar Kameez / Kurta:                                            │
//! │    {"length":"42","width":"24","chest":"46","waist":"40",           │
//! │     "sleeve":"24.5","neck":"16","shalwar_waist":"38","pancha":"9"}  │
//! │                                                                     │
//! │  Every value is numeric-as-text (the tailor writes "24.5 inches",   │
//! │  the form stores exactly what was typed).                           │
//! │                                                                     │
//! │  Other garment types: an arbitrary flat object (often `{}`) until   │
//! │  their field sets are specified.                                    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The tagged enum gives compile-time coverage of the known garment
//! types while the `Unstructured` fallback keeps not-yet-specified
//! types loadable.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::CoreError;
use crate::types::DressType;

// =============================================================================
// Suit Fields
// =============================================================================

/// The fixed field set for Shalwar Kameez and Kurta.
///
/// Values stay numeric-as-text: the form accepts entries like "24.5"
/// or "16 loose" and the record keeps them verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuitFields {
    /// Length (Lambai)
    #[serde(default)]
    pub length: String,
    /// Width (Chorai)
    #[serde(default)]
    pub width: String,
    /// Chest (Chati)
    #[serde(default)]
    pub chest: String,
    /// Waist (Tera)
    #[serde(default)]
    pub waist: String,
    /// Sleeve (Bazo)
    #[serde(default)]
    pub sleeve: String,
    /// Neck (Gala)
    #[serde(default)]
    pub neck: String,
    /// Shalwar waist
    #[serde(default)]
    pub shalwar_waist: String,
    /// Pancha (ankle width)
    #[serde(default)]
    pub pancha: String,
}

impl SuitFields {
    /// Short "Lambai: 42, Chati: 46, Bazo: 24.5" line for list views.
    pub fn summary(&self) -> String {
        format!(
            "Lambai: {}, Chati: {}, Bazo: {}",
            self.length, self.chest, self.sleeve
        )
    }
}

// =============================================================================
// Measurement Fields
// =============================================================================

/// Measurement fields keyed by garment type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MeasurementFields {
    /// Structured fields for Shalwar Kameez / Kurta.
    Suit(SuitFields),

    /// Flat map fallback for garment types without a specified field
    /// set (Pant Shirt, Waistcoat, Jacket, imported unknowns).
    Unstructured(BTreeMap<String, String>),
}

impl MeasurementFields {
    /// The empty field set appropriate for a garment type.
    pub fn for_dress_type(dress_type: &DressType) -> Self {
        if dress_type.has_suit_fields() {
            MeasurementFields::Suit(SuitFields::default())
        } else {
            MeasurementFields::Unstructured(BTreeMap::new())
        }
    }

    /// Parses a stored measurements blob.
    ///
    /// Suit garments decode into [`SuitFields`] (missing keys default
    /// to empty, extra keys are ignored); everything else keeps the
    /// raw map. A blob that is not a JSON object is malformed.
    pub fn from_json(dress_type: &DressType, raw: &str) -> Result<Self, CoreError> {
        if dress_type.has_suit_fields() {
            let fields: SuitFields = serde_json::from_str(raw)
                .map_err(|e| CoreError::MalformedFields(e.to_string()))?;
            Ok(MeasurementFields::Suit(fields))
        } else {
            let map: BTreeMap<String, String> = serde_json::from_str(raw)
                .map_err(|e| CoreError::MalformedFields(e.to_string()))?;
            Ok(MeasurementFields::Unstructured(map))
        }
    }

    /// Serializes to the flat JSON object stored in the measurements
    /// column.
    pub fn to_json(&self) -> String {
        // Both variants are plain string-to-string maps; serialization
        // cannot fail.
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Short one-line summary for history tables.
    pub fn summary(&self) -> String {
        match self {
            MeasurementFields::Suit(fields) => fields.summary(),
            MeasurementFields::Unstructured(map) if map.is_empty() => "-".to_string(),
            MeasurementFields::Unstructured(map) => map
                .iter()
                .take(3)
                .map(|(k, v)| format!("{k}: {v}"))
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_suit() -> SuitFields {
        SuitFields {
            length: "42".to_string(),
            width: "24".to_string(),
            chest: "46".to_string(),
            waist: "40".to_string(),
            sleeve: "24.5".to_string(),
            neck: "16".to_string(),
            shalwar_waist: "38".to_string(),
            pancha: "9".to_string(),
        }
    }

    #[test]
    fn test_suit_round_trip() {
        let fields = MeasurementFields::Suit(sample_suit());
        let json = fields.to_json();
        let parsed = MeasurementFields::from_json(&DressType::ShalwarKameez, &json).unwrap();
        assert_eq!(parsed, fields);
    }

    #[test]
    fn test_suit_tolerates_missing_keys() {
        let parsed =
            MeasurementFields::from_json(&DressType::Kurta, r#"{"length":"40"}"#).unwrap();
        match parsed {
            MeasurementFields::Suit(fields) => {
                assert_eq!(fields.length, "40");
                assert_eq!(fields.chest, "");
            }
            other => panic!("expected suit fields, got {other:?}"),
        }
    }

    #[test]
    fn test_unstructured_for_other_garments() {
        let parsed =
            MeasurementFields::from_json(&DressType::Jacket, r#"{"shoulder":"18"}"#).unwrap();
        match parsed {
            MeasurementFields::Unstructured(map) => {
                assert_eq!(map.get("shoulder").map(String::as_str), Some("18"));
            }
            other => panic!("expected unstructured fields, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_blob() {
        let err = MeasurementFields::from_json(&DressType::ShalwarKameez, "not json");
        assert!(err.is_err());

        let err = MeasurementFields::from_json(&DressType::Jacket, "[1,2,3]");
        assert!(err.is_err());
    }

    #[test]
    fn test_summary() {
        let fields = MeasurementFields::Suit(sample_suit());
        assert_eq!(fields.summary(), "Lambai: 42, Chati: 46, Bazo: 24.5");

        let empty = MeasurementFields::Unstructured(BTreeMap::new());
        assert_eq!(empty.summary(), "-");
    }

    #[test]
    fn test_for_dress_type() {
        assert!(matches!(
            MeasurementFields::for_dress_type(&DressType::ShalwarKameez),
            MeasurementFields::Suit(_)
        ));
        assert!(matches!(
            MeasurementFields::for_dress_type(&DressType::Waistcoat),
            MeasurementFields::Unstructured(_)
        ));
    }
}
