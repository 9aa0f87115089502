//! Order entry errors.

/// Errors raised while accepting or storing orders.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderError {
    /// One or more of symbol, orderType, quantity, side is absent.
    #[error("Missing required fields")]
    MissingRequiredFields {
        /// Wire names of the missing fields.
        fields: Vec<&'static str>,
    },

    /// A conditional price rule failed.
    #[error("{message}")]
    InvalidParameters {
        /// Wire name of the offending field.
        field: &'static str,
        /// Human-readable message.
        message: String,
    },

    /// The registry could not be accessed.
    #[error("Order registry unavailable: {reason}")]
    RegistryUnavailable {
        /// Underlying cause.
        reason: String,
    },
}

impl OrderError {
    /// Returns true if the caller sent a bad order (as opposed to a server fault).
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingRequiredFields { .. } | Self::InvalidParameters { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_message_is_fixed() {
        let err = OrderError::MissingRequiredFields {
            fields: vec!["side"],
        };
        assert_eq!(err.to_string(), "Missing required fields");
        assert!(err.is_validation());
    }

    #[test]
    fn invalid_parameters_message_is_passed_through() {
        let err = OrderError::InvalidParameters {
            field: "price",
            message: "Price is required for Limit orders".to_string(),
        };
        assert_eq!(err.to_string(), "Price is required for Limit orders");
        assert!(err.is_validation());
    }

    #[test]
    fn registry_unavailable_is_not_validation() {
        let err = OrderError::RegistryUnavailable {
            reason: "lock poisoned".to_string(),
        };
        assert!(!err.is_validation());
        assert!(err.to_string().contains("lock poisoned"));
    }
}
