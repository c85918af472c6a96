//! In-process accessory host backed by a shared map and a tokio broadcast channel.
//!
//! Stores the latest value of every characteristic per accessory and emits a
//! [`CharacteristicChanged`] event for each push, in push order.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio::sync::broadcast;

use hmipbridge_domain::accessory::{AccessoryDescriptor, Characteristic, CharacteristicValue};
use hmipbridge_domain::event::CharacteristicChanged;
use hmipbridge_domain::id::DeviceId;
use hmipbridge_domain::time::{Timestamp, now};

use crate::ports::{AccessoryHost, InformationSink, MeteringSink, PowerStateSink};

/// Host-side view of one registered accessory.
#[derive(Debug, Clone)]
pub struct AccessoryRecord {
    pub descriptor: AccessoryDescriptor,
    pub values: BTreeMap<Characteristic, CharacteristicValue>,
    pub last_changed: Timestamp,
}

impl AccessoryRecord {
    /// Current value of a characteristic, if one was ever set.
    #[must_use]
    pub fn value(&self, characteristic: Characteristic) -> Option<&CharacteristicValue> {
        self.values.get(&characteristic)
    }
}

type Records = Arc<RwLock<BTreeMap<DeviceId, AccessoryRecord>>>;

/// In-process [`AccessoryHost`].
///
/// Publishing succeeds even when there are no active subscribers
/// (the event is simply dropped).
pub struct InMemoryAccessoryHost {
    records: Records,
    sender: broadcast::Sender<CharacteristicChanged>,
}

impl InMemoryAccessoryHost {
    /// Create a new host with the given event channel capacity (at least 1).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            records: Arc::default(),
            sender,
        }
    }

    /// Subscribe to characteristic pushes made *after* this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CharacteristicChanged> {
        self.sender.subscribe()
    }

    /// Look up one accessory record.
    #[must_use]
    pub fn get(&self, device_id: &DeviceId) -> Option<AccessoryRecord> {
        read(&self.records).get(device_id).cloned()
    }

    /// All accessory records, ordered by device id.
    #[must_use]
    pub fn list(&self) -> Vec<AccessoryRecord> {
        read(&self.records).values().cloned().collect()
    }
}

impl AccessoryHost for InMemoryAccessoryHost {
    type Handle = InMemoryAccessoryHandle;

    fn register(&self, descriptor: AccessoryDescriptor) -> InMemoryAccessoryHandle {
        let device_id = descriptor.device_id.clone();
        let values = descriptor.static_values().into_iter().collect();
        write(&self.records).insert(
            device_id.clone(),
            AccessoryRecord {
                descriptor,
                values,
                last_changed: now(),
            },
        );
        tracing::debug!(%device_id, "accessory registered");

        InMemoryAccessoryHandle {
            device_id,
            records: Arc::clone(&self.records),
            sender: self.sender.clone(),
        }
    }

    fn unregister(&self, device_id: &DeviceId) {
        if write(&self.records).remove(device_id).is_some() {
            tracing::debug!(%device_id, "accessory unregistered");
        }
    }
}

/// Sink handle for one accessory registered with an [`InMemoryAccessoryHost`].
#[derive(Clone)]
pub struct InMemoryAccessoryHandle {
    device_id: DeviceId,
    records: Records,
    sender: broadcast::Sender<CharacteristicChanged>,
}

impl InMemoryAccessoryHandle {
    fn update(&self, characteristic: Characteristic, value: CharacteristicValue) {
        {
            let mut records = write(&self.records);
            let Some(record) = records.get_mut(&self.device_id) else {
                tracing::debug!(
                    device_id = %self.device_id,
                    ?characteristic,
                    "push to unregistered accessory ignored"
                );
                return;
            };
            record.values.insert(characteristic, value.clone());
            record.last_changed = now();
        }

        // broadcast::send fails only when there are zero receivers.
        let _ = self.sender.send(CharacteristicChanged::new(
            self.device_id.clone(),
            characteristic,
            value,
        ));
    }
}

impl PowerStateSink for InMemoryAccessoryHandle {
    fn push_on(&self, on: bool) {
        self.update(Characteristic::On, on.into());
    }
}

impl MeteringSink for InMemoryAccessoryHandle {
    fn push_power(&self, watts: f64) {
        self.update(Characteristic::ElectricPower, watts.into());
    }

    fn push_energy(&self, watt_hours: f64) {
        self.update(Characteristic::ElectricalEnergy, watt_hours.into());
    }
}

impl InformationSink for InMemoryAccessoryHandle {
    fn push_firmware_revision(&self, revision: &str) {
        self.update(Characteristic::FirmwareRevision, revision.into());
    }
}

fn read(records: &Records) -> RwLockReadGuard<'_, BTreeMap<DeviceId, AccessoryRecord>> {
    records.read().unwrap_or_else(PoisonError::into_inner)
}

fn write(records: &Records) -> RwLockWriteGuard<'_, BTreeMap<DeviceId, AccessoryRecord>> {
    records.write().unwrap_or_else(PoisonError::into_inner)
}
