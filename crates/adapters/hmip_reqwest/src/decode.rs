//! Lenient decoding of `getCurrentState` responses.
//!
//! Devices and groups are decoded one by one: an entry that does not match
//! the domain model is logged and skipped instead of failing the whole
//! snapshot. Skipped devices are listed in
//! [`HomeSnapshot::unreadable_devices`] so they are not mistaken for removed
//! ones.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use hmipbridge_domain::device::{Device, HomeSnapshot};
use hmipbridge_domain::group::Group;
use hmipbridge_domain::id::DeviceId;

use crate::error::HmipError;

#[derive(Deserialize)]
struct CurrentStateResponse {
    #[serde(default)]
    devices: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    groups: BTreeMap<String, serde_json::Value>,
}

/// Decode a `getCurrentState` response body.
pub(crate) fn current_state(payload: &[u8]) -> Result<HomeSnapshot, HmipError> {
    let response: CurrentStateResponse =
        serde_json::from_slice(payload).map_err(HmipError::Decode)?;

    let mut snapshot = HomeSnapshot::default();

    let (devices, skipped) = decode_entries::<Device>("device", response.devices);
    for device in devices {
        snapshot.devices.insert(device.id.clone(), device);
    }
    snapshot.unreadable_devices = skipped
        .into_iter()
        .filter_map(|key| DeviceId::new(key).ok())
        .collect();

    let (groups, _) = decode_entries::<Group>("group", response.groups);
    for group in groups {
        snapshot.groups.insert(group.id.clone(), group);
    }

    Ok(snapshot)
}

/// Decode every entry, returning the decoded values and the keys of the
/// entries that failed.
fn decode_entries<T: DeserializeOwned>(
    kind: &'static str,
    entries: BTreeMap<String, serde_json::Value>,
) -> (Vec<T>, Vec<String>) {
    let mut decoded = Vec::with_capacity(entries.len());
    let mut skipped = Vec::new();
    for (key, raw) in entries {
        match serde_json::from_value(raw) {
            Ok(entry) => decoded.push(entry),
            Err(err) => {
                tracing::warn!(kind, %key, error = %err, "skipping undecodable entry");
                skipped.push(key);
            }
        }
    }
    (decoded, skipped)
}
