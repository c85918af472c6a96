//! Commands sent back to the vendor API.

use serde::{Deserialize, Serialize};

use crate::channel::SWITCH_CHANNEL_INDEX;
use crate::id::DeviceId;

/// Body of `device/control/setSwitchState`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchStateCommand {
    pub channel_index: u32,
    pub device_id: DeviceId,
    pub on: bool,
}

impl SwitchStateCommand {
    /// Target the switching channel of a measuring switch.
    #[must_use]
    pub fn switch_channel(device_id: DeviceId, on: bool) -> Self {
        Self {
            channel_index: SWITCH_CHANNEL_INDEX,
            device_id,
            on,
        }
    }
}
