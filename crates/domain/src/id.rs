//! Typed identifier newtypes backed by vendor-assigned strings.
//!
//! HomematicIP identifies devices by their SGTIN (e.g. `3014F711A0000A9A4991B2F2`)
//! and groups by UUID strings. The bridge never generates identifiers; it only
//! carries the ones reported by the vendor.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

macro_rules! define_id {
    ($(#[doc = $doc:expr])* $name:ident, $empty:expr) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl $name {
            /// Wrap a vendor identifier.
            ///
            /// # Errors
            ///
            /// Returns a validation error when `value` is empty.
            pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
                let value = value.into();
                if value.is_empty() {
                    return Err($empty);
                }
                Ok(Self(value))
            }

            /// Borrow the raw identifier.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }
    };
}

define_id!(
    /// Identifier of a HomematicIP [`Device`](crate::device::Device).
    DeviceId,
    ValidationError::EmptyDeviceId
);

define_id!(
    /// Identifier of a HomematicIP [`Group`](crate::group::Group).
    GroupId,
    ValidationError::EmptyGroupId
);
