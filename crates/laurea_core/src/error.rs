//! Validation errors for issuance input.

use chrono::NaiveDate;

/// Error raised when issuance input fails validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required field was empty or missing
    #[error("missing required field: {field}")]
    MissingField {
        /// Name of the missing field
        field: String,
    },
    /// A field held a value outside its domain
    #[error("invalid {field}: {reason}")]
    InvalidField {
        /// Name of the offending field
        field: String,
        /// Why the value was rejected
        reason: String,
    },
    /// Expiry date does not lie strictly after the issue date
    #[error("expiry date {expiry} is not after issue date {issue}")]
    DateOrder {
        /// Issue date
        issue: NaiveDate,
        /// Offending expiry date
        expiry: NaiveDate,
    },
}

impl ValidationError {
    /// Shorthand for a missing-field error
    #[must_use]
    pub fn missing(field: &str) -> Self {
        Self::MissingField {
            field: field.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_display() {
        let err = ValidationError::missing("holder.name");
        assert_eq!(format!("{}", err), "missing required field: holder.name");
    }

    #[test]
    fn test_date_order_display() {
        let err = ValidationError::DateOrder {
            issue: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            expiry: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        };
        let s = format!("{}", err);
        assert!(s.contains("2024-01-10"));
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(
            ValidationError::missing("grade"),
            ValidationError::missing("grade")
        );
        assert_ne!(
            ValidationError::missing("grade"),
            ValidationError::missing("holder.name")
        );
    }
}
