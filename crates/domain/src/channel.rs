//! Functional channels — vendor sub-units of a device report.
//!
//! A HomematicIP device report carries a map of functional channels keyed by
//! channel index. Each channel declares its kind through the
//! `functionalChannelType` tag; this module turns that tag into a closed enum
//! so consumers dispatch with an exhaustive `match`.

use serde::{Deserialize, Serialize};

/// Index of the switching channel on measuring switches (channel 0 is the
/// device base channel).
pub const SWITCH_CHANNEL_INDEX: u32 = 1;

/// One functional channel of a device snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "functionalChannelType", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FunctionalChannel {
    /// `SWITCH_MEASURING_CHANNEL` — relay with power and energy metering.
    SwitchMeasuringChannel(SwitchMeasuringChannel),
    /// `DEVICE_BASE` — reachability and radio diagnostics.
    DeviceBase(DeviceBaseChannel),
    /// Any channel kind the bridge does not model.
    #[serde(other)]
    Unsupported,
}

impl FunctionalChannel {
    /// Borrow the measuring-switch state if this is a measuring channel.
    #[must_use]
    pub fn as_switch_measuring(&self) -> Option<&SwitchMeasuringChannel> {
        match self {
            Self::SwitchMeasuringChannel(channel) => Some(channel),
            Self::DeviceBase(_) | Self::Unsupported => None,
        }
    }
}

/// State of a `SWITCH_MEASURING_CHANNEL`.
///
/// Every field is optional: the vendor omits or nulls values it could not
/// measure, and consumers must treat a missing value as "no update". A value
/// of the wrong type is treated the same way.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SwitchMeasuringChannel {
    #[serde(deserialize_with = "crate::lenient::optional")]
    pub index: Option<u32>,
    #[serde(deserialize_with = "crate::lenient::optional")]
    pub label: Option<String>,
    #[serde(deserialize_with = "crate::lenient::optional")]
    pub on: Option<bool>,
    /// Instantaneous power in watts.
    #[serde(deserialize_with = "crate::lenient::optional")]
    pub current_power_consumption: Option<f64>,
    /// Cumulative energy in watt-hours.
    #[serde(deserialize_with = "crate::lenient::optional")]
    pub energy_counter: Option<f64>,
    #[serde(deserialize_with = "crate::lenient::optional")]
    pub profile_mode: Option<String>,
    #[serde(deserialize_with = "crate::lenient::optional")]
    pub user_desired_profile_mode: Option<String>,
}

/// State of a `DEVICE_BASE` channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeviceBaseChannel {
    #[serde(deserialize_with = "crate::lenient::optional")]
    pub index: Option<u32>,
    #[serde(deserialize_with = "crate::lenient::optional")]
    pub unreach: Option<bool>,
    #[serde(deserialize_with = "crate::lenient::optional")]
    pub low_bat: Option<bool>,
    #[serde(deserialize_with = "crate::lenient::optional")]
    pub rssi_device_value: Option<i32>,
}
