//! Bridge service — keeps one accessory per supported device in step with
//! the vendor's home state.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use hmipbridge_domain::device::HomeSnapshot;
use hmipbridge_domain::error::{BridgeError, NotFoundError};
use hmipbridge_domain::id::DeviceId;

use crate::accessories::SwitchMeasuringAccessory;
use crate::ports::{AccessoryHost, SwitchControl};

/// Measuring-switch accessory as managed by a [`BridgeService`].
pub type MeasuringAccessory<H, C> = SwitchMeasuringAccessory<<H as AccessoryHost>::Handle, Arc<C>>;

/// Outcome of applying one snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Accessories created for newly discovered devices.
    pub added: usize,
    /// Existing accessories that were synchronized.
    pub updated: usize,
    /// Accessories dropped because their device disappeared.
    pub removed: usize,
}

/// Application service owning the accessory registry.
pub struct BridgeService<H: AccessoryHost, C> {
    host: H,
    control: Arc<C>,
    accessories: RwLock<BTreeMap<DeviceId, Arc<MeasuringAccessory<H, C>>>>,
}

impl<H, C> BridgeService<H, C>
where
    H: AccessoryHost,
    C: SwitchControl,
{
    /// Create an empty registry bound to a host and a vendor control port.
    pub fn new(host: H, control: C) -> Self {
        Self {
            host,
            control: Arc::new(control),
            accessories: RwLock::new(BTreeMap::new()),
        }
    }

    /// Apply a full home snapshot.
    ///
    /// New devices with a measuring channel get an accessory (whose
    /// construction already synchronizes them), known devices are
    /// synchronized, and accessories of vanished devices are unregistered.
    /// Devices listed as unreadable are still in the home: their
    /// accessories are kept untouched.
    pub fn apply_snapshot(&self, snapshot: &HomeSnapshot) -> SyncReport {
        let mut report = SyncReport::default();

        let existing: Vec<_> = {
            let mut accessories = self
                .accessories
                .write()
                .unwrap_or_else(PoisonError::into_inner);

            let vanished: Vec<DeviceId> = accessories
                .keys()
                .filter(|id| {
                    !snapshot.devices.contains_key(*id)
                        && !snapshot.unreadable_devices.contains(*id)
                })
                .cloned()
                .collect();
            for id in vanished {
                accessories.remove(&id);
                self.host.unregister(&id);
                tracing::info!(device_id = %id, "device removed, accessory dropped");
                report.removed += 1;
            }

            let mut existing = Vec::new();
            for device in snapshot.devices.values() {
                if let Some(accessory) = accessories.get(&device.id) {
                    existing.push((Arc::clone(accessory), device));
                } else if device.has_switch_measuring_channel() {
                    let accessory = SwitchMeasuringAccessory::new(
                        device,
                        &snapshot.groups,
                        &self.host,
                        Arc::clone(&self.control),
                    );
                    tracing::info!(
                        device_id = %device.id,
                        name = %accessory.name(),
                        "accessory added"
                    );
                    accessories.insert(device.id.clone(), Arc::new(accessory));
                    report.added += 1;
                }
            }
            existing
        };

        for (accessory, device) in existing {
            accessory.synchronize(device, &snapshot.groups);
            report.updated += 1;
        }

        report
    }

    /// Look up the accessory of a device.
    #[must_use]
    pub fn accessory(&self, device_id: &DeviceId) -> Option<Arc<MeasuringAccessory<H, C>>> {
        self.accessories
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(device_id)
            .cloned()
    }

    /// All accessories, ordered by device id.
    #[must_use]
    pub fn accessories(&self) -> Vec<Arc<MeasuringAccessory<H, C>>> {
        self.accessories
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }

    /// Forward a power-state write to the accessory of `device_id`.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::NotFound`] for unknown devices, or the
    /// accessory's vendor error.
    pub async fn set_on(&self, device_id: &DeviceId, on: bool) -> Result<(), BridgeError> {
        let accessory = self.accessory(device_id).ok_or_else(|| NotFoundError {
            entity: "Accessory",
            id: device_id.to_string(),
        })?;
        accessory.set_on(on).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessory_host::InMemoryAccessoryHost;
    use hmipbridge_domain::accessory::{Characteristic, CharacteristicValue};
    use hmipbridge_domain::command::SwitchStateCommand;
    use hmipbridge_domain::device::Device;
    use std::future::Future;
    use std::sync::Mutex;

    #[derive(Default)]
    struct StubControl {
        commands: Mutex<Vec<SwitchStateCommand>>,
    }

    impl SwitchControl for StubControl {
        fn set_switch_state(
            &self,
            command: SwitchStateCommand,
        ) -> impl Future<Output = Result<(), BridgeError>> + Send {
            self.commands.lock().unwrap().push(command);
            async { Ok(()) }
        }
    }

    fn snapshot(devices: serde_json::Value) -> HomeSnapshot {
        let devices: BTreeMap<DeviceId, Device> = serde_json::from_value(devices).unwrap();
        HomeSnapshot {
            devices,
            ..HomeSnapshot::default()
        }
    }

    fn plug(id: &str, on: bool, power: f64) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "label": format!("Plug {id}"),
            "type": "PLUGABLE_SWITCH_MEASURING",
            "functionalChannels": {
                "1": {
                    "functionalChannelType": "SWITCH_MEASURING_CHANNEL",
                    "on": on,
                    "currentPowerConsumption": power,
                    "energyCounter": 1.0
                }
            }
        })
    }

    fn service() -> BridgeService<Arc<InMemoryAccessoryHost>, StubControl> {
        BridgeService::new(Arc::new(InMemoryAccessoryHost::new(16)), StubControl::default())
    }

    fn id(value: &str) -> DeviceId {
        value.parse().unwrap()
    }

    #[test]
    fn should_add_accessories_for_measuring_switches_only() {
        let service = service();
        let report = service.apply_snapshot(&snapshot(serde_json::json!({
            "P1": plug("P1", true, 5.0),
            "C1": {
                "id": "C1",
                "label": "Window",
                "functionalChannels": {"1": {"functionalChannelType": "SHUTTER_CONTACT_CHANNEL"}}
            }
        })));

        assert_eq!(
            report,
            SyncReport {
                added: 1,
                updated: 0,
                removed: 0
            }
        );
        assert_eq!(service.accessories().len(), 1);
        let accessory = service.accessory(&id("P1")).unwrap();
        assert!(accessory.on());
        assert_eq!(accessory.power_consumption(), 5.0);
    }

    #[test]
    fn should_synchronize_known_accessories() {
        let service = service();
        service.apply_snapshot(&snapshot(serde_json::json!({"P1": plug("P1", false, 0.0)})));

        let report =
            service.apply_snapshot(&snapshot(serde_json::json!({"P1": plug("P1", true, 60.0)})));

        assert_eq!(report.updated, 1);
        assert_eq!(report.added, 0);
        let accessory = service.accessory(&id("P1")).unwrap();
        assert!(accessory.on());
        assert_eq!(accessory.power_consumption(), 60.0);
    }

    #[test]
    fn should_reuse_accessory_instance_across_snapshots() {
        let service = service();
        service.apply_snapshot(&snapshot(serde_json::json!({"P1": plug("P1", false, 0.0)})));
        let first = service.accessory(&id("P1")).unwrap();

        service.apply_snapshot(&snapshot(serde_json::json!({"P1": plug("P1", true, 1.0)})));
        let second = service.accessory(&id("P1")).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn should_drop_accessories_of_vanished_devices() {
        let host = Arc::new(InMemoryAccessoryHost::new(16));
        let service = BridgeService::new(Arc::clone(&host), StubControl::default());
        service.apply_snapshot(&snapshot(serde_json::json!({
            "P1": plug("P1", false, 0.0),
            "P2": plug("P2", false, 0.0)
        })));

        let report =
            service.apply_snapshot(&snapshot(serde_json::json!({"P2": plug("P2", false, 0.0)})));

        assert_eq!(report.removed, 1);
        assert!(service.accessory(&id("P1")).is_none());
        assert!(host.get(&id("P1")).is_none());
        assert!(host.get(&id("P2")).is_some());
    }

    #[test]
    fn should_keep_accessories_of_unreadable_devices() {
        let host = Arc::new(InMemoryAccessoryHost::new(16));
        let service = BridgeService::new(Arc::clone(&host), StubControl::default());
        service.apply_snapshot(&snapshot(serde_json::json!({"P1": plug("P1", true, 5.0)})));

        let mut unreadable = snapshot(serde_json::json!({}));
        unreadable.unreadable_devices.insert(id("P1"));
        let report = service.apply_snapshot(&unreadable);

        assert_eq!(report, SyncReport::default());
        let accessory = service.accessory(&id("P1")).unwrap();
        assert!(accessory.on());
        assert_eq!(accessory.power_consumption(), 5.0);
        assert!(host.get(&id("P1")).is_some());
    }

    #[test]
    fn should_reflect_pushes_in_host_records() {
        let host = Arc::new(InMemoryAccessoryHost::new(16));
        let service = BridgeService::new(Arc::clone(&host), StubControl::default());

        service.apply_snapshot(&snapshot(serde_json::json!({"P1": plug("P1", true, 7.5)})));

        let record = host.get(&id("P1")).unwrap();
        assert_eq!(
            record.value(Characteristic::On),
            Some(&CharacteristicValue::Bool(true))
        );
        assert_eq!(
            record.value(Characteristic::ElectricPower),
            Some(&CharacteristicValue::Float(7.5))
        );
    }

    #[tokio::test]
    async fn should_forward_set_on_to_accessory() {
        let service = service();
        service.apply_snapshot(&snapshot(serde_json::json!({"P1": plug("P1", false, 0.0)})));

        service.set_on(&id("P1"), true).await.unwrap();

        let commands = service.control.commands.lock().unwrap();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].device_id, id("P1"));
        assert!(commands[0].on);
    }

    #[tokio::test]
    async fn should_return_not_found_for_unknown_device() {
        let service = service();
        let result = service.set_on(&id("missing"), true).await;
        assert!(matches!(result, Err(BridgeError::NotFound(_))));
    }
}
