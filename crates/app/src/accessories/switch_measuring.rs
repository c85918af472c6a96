//! Measuring switch — HMIP-PSM, HMIP-BSM, HMIP-FSM and HMIP-FSM16.
//!
//! Exposes the switching channel as an `On` characteristic and the metering
//! values as the Eve `ElectricPower` / `ElectricalEnergy` characteristics.
//! Writes to `On` are forwarded to the vendor; the cache only ever changes
//! through [`SwitchMeasuringAccessory::synchronize`].

use std::sync::{Mutex, MutexGuard, PoisonError};

use hmipbridge_domain::accessory::{
    AccessoryDescriptor, AccessoryInformation, Characteristic, ServiceKind,
};
use hmipbridge_domain::channel::SwitchMeasuringChannel;
use hmipbridge_domain::command::SwitchStateCommand;
use hmipbridge_domain::device::Device;
use hmipbridge_domain::error::BridgeError;
use hmipbridge_domain::group::GroupMap;
use hmipbridge_domain::id::DeviceId;
use hmipbridge_domain::time::Timestamp;

use crate::ports::{AccessoryHandle, AccessoryHost, SwitchControl};

/// Cached values exposed by a measuring switch.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MeasuringState {
    pub on: bool,
    /// Watts.
    pub current_power_consumption: f64,
    /// Watt-hours.
    pub energy_counter: f64,
}

/// A single cache change, in the order it must be pushed.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Change {
    On(bool),
    Power(f64),
    Energy(f64),
}

impl MeasuringState {
    /// Fold one channel report into the cache and return what changed.
    ///
    /// Missing values never count as a change.
    #[allow(clippy::float_cmp)]
    fn apply(&mut self, channel: &SwitchMeasuringChannel) -> Vec<Change> {
        let mut changes = Vec::with_capacity(3);

        if let Some(on) = channel.on
            && on != self.on
        {
            self.on = on;
            changes.push(Change::On(on));
        }

        if let Some(power) = channel.current_power_consumption
            && power != self.current_power_consumption
        {
            self.current_power_consumption = power;
            changes.push(Change::Power(power));
        }

        if let Some(energy) = channel.energy_counter
            && energy != self.energy_counter
        {
            self.energy_counter = energy;
            changes.push(Change::Energy(energy));
        }

        changes
    }
}

#[derive(Debug, Default)]
struct ReportMeta {
    firmware_revision: Option<String>,
    last_report: Option<Timestamp>,
}

/// Accessory adapter for one measuring switch.
///
/// `S` is the host handle the values are pushed to, `C` the vendor control
/// port the `On` writes are forwarded to.
pub struct SwitchMeasuringAccessory<S, C> {
    device_id: DeviceId,
    name: String,
    sink: S,
    control: C,
    state: Mutex<MeasuringState>,
    meta: Mutex<ReportMeta>,
}

impl<S: AccessoryHandle, C: SwitchControl> SwitchMeasuringAccessory<S, C> {
    /// Register the accessory with `host` and run a first synchronization
    /// pass with the discovery snapshot.
    pub fn new<H>(device: &Device, groups: &GroupMap, host: &H, control: C) -> Self
    where
        H: AccessoryHost<Handle = S>,
    {
        tracing::debug!(
            device_id = %device.id,
            label = %device.label,
            "created switch (measuring)"
        );

        let descriptor = Self::descriptor(device);
        let sink = host.register(descriptor);

        let accessory = Self {
            device_id: device.id.clone(),
            name: device.display_name().to_string(),
            sink,
            control,
            state: Mutex::new(MeasuringState::default()),
            meta: Mutex::new(ReportMeta {
                firmware_revision: device.firmware_version.clone(),
                last_report: None,
            }),
        };
        accessory.synchronize(device, groups);
        accessory
    }

    /// Registration payload for a measuring switch.
    #[must_use]
    pub fn descriptor(device: &Device) -> AccessoryDescriptor {
        AccessoryDescriptor {
            device_id: device.id.clone(),
            name: device.display_name().to_string(),
            service: ServiceKind::Switch,
            information: AccessoryInformation::from_device(device),
            characteristics: vec![
                Characteristic::Name,
                Characteristic::On,
                Characteristic::ElectricPower,
                Characteristic::ElectricalEnergy,
            ],
        }
    }

    #[must_use]
    pub fn device_id(&self) -> &DeviceId {
        &self.device_id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cached power state.
    #[must_use]
    pub fn on(&self) -> bool {
        self.lock_state().on
    }

    /// Cached instantaneous power, in watts.
    #[must_use]
    pub fn power_consumption(&self) -> f64 {
        self.lock_state().current_power_consumption
    }

    /// Cached cumulative energy, in watt-hours.
    #[must_use]
    pub fn energy_counter(&self) -> f64 {
        self.lock_state().energy_counter
    }

    /// Copy of all cached values.
    #[must_use]
    pub fn state(&self) -> MeasuringState {
        *self.lock_state()
    }

    /// Vendor timestamp of the last synchronized snapshot, when reported.
    #[must_use]
    pub fn last_report(&self) -> Option<Timestamp> {
        self.lock_meta().last_report
    }

    /// Forward a power-state write to the vendor.
    ///
    /// The cache is left untouched: the new state becomes visible through the
    /// next snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Vendor`] when the vendor call fails.
    pub async fn set_on(&self, on: bool) -> Result<(), BridgeError> {
        tracing::info!(
            device_id = %self.device_id,
            name = %self.name,
            state = if on { "on" } else { "off" },
            "setting switch"
        );

        let command = SwitchStateCommand::switch_channel(self.device_id.clone(), on);
        self.control
            .set_switch_state(command)
            .await
            .inspect_err(|err| {
                tracing::warn!(
                    device_id = %self.device_id,
                    error = %err,
                    "switch command failed"
                );
            })
    }

    /// Diff a snapshot against the cache and push every changed value.
    ///
    /// Measuring channels are visited in ascending index order; when several
    /// are present the last reported value wins per field. Group state does
    /// not affect a measuring switch.
    pub fn synchronize(&self, device: &Device, _groups: &GroupMap) {
        self.refresh_meta(device);

        for channel in device.switch_measuring_channels() {
            tracing::debug!(device_id = %self.device_id, ?channel, "switch (measuring) update");

            let changes = self.lock_state().apply(channel);
            for change in changes {
                self.push(change);
            }
        }
    }

    fn push(&self, change: Change) {
        match change {
            Change::On(on) => {
                tracing::info!(
                    name = %self.name,
                    state = if on { "on" } else { "off" },
                    "switch state changed"
                );
                self.sink.push_on(on);
            }
            Change::Power(watts) => {
                tracing::info!(name = %self.name, watts, "switch power consumption changed");
                self.sink.push_power(watts);
            }
            Change::Energy(watt_hours) => {
                tracing::info!(name = %self.name, watt_hours, "switch energy counter changed");
                self.sink.push_energy(watt_hours);
            }
        }
    }

    fn refresh_meta(&self, device: &Device) {
        let changed_revision = {
            let mut meta = self.lock_meta();
            if let Some(ts) = device.last_status_update_at() {
                meta.last_report = Some(ts);
            }
            match &device.firmware_version {
                Some(revision) if meta.firmware_revision.as_ref() != Some(revision) => {
                    meta.firmware_revision = Some(revision.clone());
                    Some(revision.clone())
                }
                _ => None,
            }
        };

        if let Some(revision) = changed_revision {
            tracing::info!(name = %self.name, %revision, "firmware revision changed");
            self.sink.push_firmware_revision(&revision);
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, MeasuringState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_meta(&self) -> MutexGuard<'_, ReportMeta> {
        self.meta.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
