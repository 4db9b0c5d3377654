//! The license record consumed by the renderer.

use crate::error::{ValidationError, ValidationErrors};
use serde::{Deserialize, Serialize};

/// Printed when the record has no tax id.
pub const TAX_ID_PLACEHOLDER: &str = "Not registered";

/// Printed when the record has no risk level.
pub const DEFAULT_RISK_LEVEL: &str = "EVALUATED";

/// One operating license to print.
///
/// Strings are printed verbatim. Missing required fields deserialize as
/// empty so that [`validate`](Self::validate) can report all of them at once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LicenseRecord {
    /// Case file number, unique per issuance
    pub file_number: String,
    /// Owner (person or company) name
    pub owner_name: String,
    /// Owner tax id
    pub tax_id: Option<String>,
    /// Trade name of the business
    pub trade_name: String,
    /// Business address
    pub address: String,
    /// Authorized business activity
    pub business_activity: String,
    /// Zoning classification
    pub zoning: String,
    /// Floor area in square meters
    pub area_square_meters: f64,
    /// Inspection certificate expiry, pre-formatted
    pub inspection_expiry_date: String,
    /// Inspection risk level
    pub risk_level: Option<String>,
}

impl LicenseRecord {
    /// Set the tax id.
    pub fn with_tax_id(mut self, tax_id: impl Into<String>) -> Self {
        self.tax_id = Some(tax_id.into());
        self
    }

    /// Set the risk level.
    pub fn with_risk_level(mut self, risk_level: impl Into<String>) -> Self {
        self.risk_level = Some(risk_level.into());
        self
    }

    /// Tax id as printed.
    pub fn tax_id_display(&self) -> &str {
        non_blank(self.tax_id.as_deref()).unwrap_or(TAX_ID_PLACEHOLDER)
    }

    /// Risk level as printed.
    pub fn risk_level_display(&self) -> &str {
        non_blank(self.risk_level.as_deref()).unwrap_or(DEFAULT_RISK_LEVEL)
    }

    /// Check every required field, collecting all failures.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let required = [
            ("file_number", &self.file_number),
            ("owner_name", &self.owner_name),
            ("trade_name", &self.trade_name),
            ("address", &self.address),
            ("business_activity", &self.business_activity),
            ("zoning", &self.zoning),
            ("inspection_expiry_date", &self.inspection_expiry_date),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                errors.add(ValidationError::empty_field(field));
            }
        }

        if !self.area_square_meters.is_finite() || self.area_square_meters <= 0.0 {
            errors.add(ValidationError::new(
                "area_square_meters",
                format!("must be a positive number, got {}", self.area_square_meters),
            ));
        }

        errors.into_result()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> LicenseRecord {
        LicenseRecord {
            file_number: "EXP-0001".to_string(),
            owner_name: "ACME".to_string(),
            tax_id: None,
            trade_name: "ACME SHOP".to_string(),
            address: "MAIN ST 1".to_string(),
            business_activity: "RETAIL".to_string(),
            zoning: "COMMERCIAL".to_string(),
            area_square_meters: 120.0,
            inspection_expiry_date: "12/12/2026".to_string(),
            risk_level: None,
        }
    }

    #[test]
    fn test_valid_record() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_all_failures_are_reported() {
        let record = LicenseRecord {
            owner_name: "  ".to_string(),
            area_square_meters: -3.0,
            ..sample()
        };
        let errors = record.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.has_field("owner_name"));
        assert!(errors.has_field("area_square_meters"));
    }

    #[test]
    fn test_zero_and_nan_area_rejected() {
        for area in [0.0, f64::NAN, f64::INFINITY] {
            let record = LicenseRecord {
                area_square_meters: area,
                ..sample()
            };
            assert!(record.validate().is_err(), "area {} accepted", area);
        }
    }

    #[test]
    fn test_optional_field_defaults() {
        let record = sample();
        assert_eq!(record.tax_id_display(), "Not registered");
        assert_eq!(record.risk_level_display(), "EVALUATED");

        let record = sample().with_tax_id("20481234567").with_risk_level("HIGH");
        assert_eq!(record.tax_id_display(), "20481234567");
        assert_eq!(record.risk_level_display(), "HIGH");

        assert_eq!(sample().with_tax_id("").tax_id_display(), "Not registered");
    }

    #[test]
    fn test_missing_json_fields_fail_validation() {
        let record: LicenseRecord =
            serde_json::from_str(r#"{"file_number": "EXP-9", "area_square_meters": 10}"#).unwrap();
        let errors = record.validate().unwrap_err();
        assert!(errors.has_field("owner_name"));
        assert!(!errors.has_field("file_number"));
    }
}
