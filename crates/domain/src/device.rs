//! Device — a vendor-reported snapshot of one physical device.
//!
//! Snapshots are owned by the platform's registry and handed to device
//! adapters read-only. Channel maps are ordered by channel index so every
//! consumer walks channels in the same order.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::channel::{FunctionalChannel, SwitchMeasuringChannel};
use crate::group::GroupMap;
use crate::id::DeviceId;
use crate::time::{Timestamp, from_epoch_millis};

/// Full reported state of one device at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: DeviceId,
    #[serde(default)]
    pub label: String,
    /// Vendor device type, e.g. `PLUGABLE_SWITCH_MEASURING`.
    #[serde(rename = "type", default)]
    pub device_type: String,
    #[serde(default, deserialize_with = "crate::lenient::optional")]
    pub model_type: Option<String>,
    #[serde(default, deserialize_with = "crate::lenient::optional")]
    pub oem: Option<String>,
    #[serde(default, deserialize_with = "crate::lenient::optional")]
    pub firmware_version: Option<String>,
    /// Epoch milliseconds of the last report received by the vendor cloud.
    #[serde(default, deserialize_with = "crate::lenient::optional")]
    pub last_status_update: Option<i64>,
    #[serde(default, deserialize_with = "crate::lenient::channels")]
    pub functional_channels: BTreeMap<u32, FunctionalChannel>,
}

impl Device {
    /// Iterate over all measuring-switch channels in ascending index order.
    pub fn switch_measuring_channels(&self) -> impl Iterator<Item = &SwitchMeasuringChannel> {
        self.functional_channels
            .values()
            .filter_map(FunctionalChannel::as_switch_measuring)
    }

    /// Whether the device exposes at least one measuring-switch channel.
    #[must_use]
    pub fn has_switch_measuring_channel(&self) -> bool {
        self.switch_measuring_channels().next().is_some()
    }

    /// Display name: the label, or the device id when the label is blank.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.label.trim().is_empty() {
            self.id.as_str()
        } else {
            &self.label
        }
    }

    /// Last vendor report time, if present and representable.
    #[must_use]
    pub fn last_status_update_at(&self) -> Option<Timestamp> {
        self.last_status_update.and_then(from_epoch_millis)
    }
}

/// Full state of a home: every device and every group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HomeSnapshot {
    pub devices: BTreeMap<DeviceId, Device>,
    pub groups: GroupMap,
    /// Devices the vendor reported but whose payload could not be decoded.
    /// They are still present in the home and keep their accessories.
    pub unreadable_devices: BTreeSet<DeviceId>,
}
