//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`BridgeError`]
//! at port boundaries.

use std::error::Error;

/// Top-level error crossing port boundaries.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// A value failed domain validation.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// A referenced accessory or device does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// The vendor API rejected or failed a request.
    #[error("vendor API error")]
    Vendor(#[source] Box<dyn Error + Send + Sync>),
}

impl BridgeError {
    /// Wrap any vendor-side failure.
    pub fn vendor(err: impl Error + Send + Sync + 'static) -> Self {
        Self::Vendor(Box::new(err))
    }
}

/// Domain invariant violations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("device id must not be empty")]
    EmptyDeviceId,

    #[error("group id must not be empty")]
    EmptyGroupId,
}

/// Lookup failure for a named resource.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_not_found_with_entity_and_id() {
        let err = NotFoundError {
            entity: "Accessory",
            id: "3014F711A0000000000000AB".to_string(),
        };
        assert_eq!(err.to_string(), "Accessory 3014F711A0000000000000AB not found");
    }

    #[test]
    fn should_convert_validation_error_into_bridge_error() {
        let err: BridgeError = ValidationError::EmptyDeviceId.into();
        assert!(matches!(
            err,
            BridgeError::Validation(ValidationError::EmptyDeviceId)
        ));
    }

    #[test]
    fn should_keep_vendor_source() {
        let io = std::io::Error::other("connection reset");
        let err = BridgeError::vendor(io);
        let source = err.source().map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("connection reset"));
    }
}
