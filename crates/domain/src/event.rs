//! Event — an immutable record of a characteristic push.
//!
//! Hosts emit one event per value pushed by an accessory so that observers
//! (the SSE stream, tests) can follow state changes in order.

use serde::{Deserialize, Serialize};

use crate::accessory::{Characteristic, CharacteristicValue};
use crate::id::DeviceId;
use crate::time::{Timestamp, now};

/// A characteristic value was pushed to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacteristicChanged {
    pub device_id: DeviceId,
    pub characteristic: Characteristic,
    pub value: CharacteristicValue,
    pub timestamp: Timestamp,
}

impl CharacteristicChanged {
    /// Record a push happening now.
    #[must_use]
    pub fn new(
        device_id: DeviceId,
        characteristic: Characteristic,
        value: CharacteristicValue,
    ) -> Self {
        Self {
            device_id,
            characteristic,
            value,
            timestamp: now(),
        }
    }
}
