//! Core error types shared across certanchor crates.

/// Core result type
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors for request-field validation and identifier parsing.
///
/// Component-specific failures (render, store, ledger, registry) carry their
/// own error enums; this type covers only concerns that belong to the pure
/// core.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// A request field failed validation
    #[error("validation failed for {field}: {reason}")]
    Validation {
        /// Field name
        field: String,
        /// Why the value was rejected
        reason: String,
    },

    /// An identifier could not be parsed
    #[error("invalid id: {reason}")]
    InvalidId {
        /// Parse failure detail
        reason: String,
    },
}

impl CoreError {
    /// Validation error for a named field
    #[must_use]
    pub fn validation(field: &str, reason: &str) -> Self {
        Self::Validation {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Reject empty or whitespace-only required fields.
    ///
    /// # Errors
    ///
    /// Returns `Validation` when the trimmed value is empty
    pub fn require_non_empty(field: &str, value: &str) -> CoreResult<()> {
        if value.trim().is_empty() {
            return Err(Self::validation(field, "must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_non_empty() {
        assert!(CoreError::require_non_empty("owner_name", "Ada").is_ok());
        assert!(CoreError::require_non_empty("owner_name", "").is_err());
        assert!(CoreError::require_non_empty("owner_name", "   ").is_err());
    }

    #[test]
    fn test_display() {
        let err = CoreError::validation("course_name", "must not be empty");
        assert_eq!(
            err.to_string(),
            "validation failed for course_name: must not be empty"
        );
    }
}
