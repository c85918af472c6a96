//! Accessory — the smart-home facing view of a device.
//!
//! An accessory groups characteristics (readable/writable properties) under a
//! service. Characteristic identities follow the HAP definitions, with the two
//! metering characteristics taken from the Eve vendor namespace.

use serde::{Deserialize, Serialize};

use crate::device::Device;
use crate::id::DeviceId;

/// Manufacturer reported when the device snapshot carries no `oem`.
pub const DEFAULT_MANUFACTURER: &str = "eQ-3";

/// Service an accessory is exposed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceKind {
    AccessoryInformation,
    Switch,
}

/// A single exposed property of an accessory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Characteristic {
    Name,
    Manufacturer,
    Model,
    SerialNumber,
    FirmwareRevision,
    On,
    /// Eve "Consumption", instantaneous power.
    ElectricPower,
    /// Eve "Total Consumption", cumulative energy.
    ElectricalEnergy,
}

impl Characteristic {
    /// Characteristic type UUID.
    #[must_use]
    pub fn uuid(self) -> &'static str {
        match self {
            Self::Name => "00000023-0000-1000-8000-0026BB765291",
            Self::Manufacturer => "00000020-0000-1000-8000-0026BB765291",
            Self::Model => "00000021-0000-1000-8000-0026BB765291",
            Self::SerialNumber => "00000030-0000-1000-8000-0026BB765291",
            Self::FirmwareRevision => "00000052-0000-1000-8000-0026BB765291",
            Self::On => "00000025-0000-1000-8000-0026BB765291",
            Self::ElectricPower => "E863F10D-079E-48FF-8F27-9C2605A29F52",
            Self::ElectricalEnergy => "E863F10C-079E-48FF-8F27-9C2605A29F52",
        }
    }

    /// Whether the ecosystem may write this characteristic.
    #[must_use]
    pub fn is_writable(self) -> bool {
        matches!(self, Self::On)
    }

    /// Unit of numeric characteristics.
    #[must_use]
    pub fn unit(self) -> Option<&'static str> {
        match self {
            Self::ElectricPower => Some("W"),
            Self::ElectricalEnergy => Some("Wh"),
            _ => None,
        }
    }

    /// Service the characteristic belongs to.
    #[must_use]
    pub fn service(self) -> ServiceKind {
        match self {
            Self::Manufacturer | Self::Model | Self::SerialNumber | Self::FirmwareRevision => {
                ServiceKind::AccessoryInformation
            }
            Self::Name | Self::On | Self::ElectricPower | Self::ElectricalEnergy => {
                ServiceKind::Switch
            }
        }
    }
}

/// A typed characteristic value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CharacteristicValue {
    Bool(bool),
    Float(f64),
    String(String),
}

impl From<bool> for CharacteristicValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for CharacteristicValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<String> for CharacteristicValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for CharacteristicValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

/// Accessory information service content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessoryInformation {
    pub manufacturer: String,
    pub model: String,
    pub serial_number: String,
    pub firmware_revision: Option<String>,
}

impl AccessoryInformation {
    /// Derive the information service from a device snapshot.
    #[must_use]
    pub fn from_device(device: &Device) -> Self {
        Self {
            manufacturer: device
                .oem
                .clone()
                .unwrap_or_else(|| DEFAULT_MANUFACTURER.to_string()),
            model: device
                .model_type
                .clone()
                .unwrap_or_else(|| device.device_type.clone()),
            serial_number: device.id.to_string(),
            firmware_revision: device.firmware_version.clone(),
        }
    }
}

/// Everything a host needs to register an accessory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessoryDescriptor {
    pub device_id: DeviceId,
    pub name: String,
    pub service: ServiceKind,
    pub information: AccessoryInformation,
    pub characteristics: Vec<Characteristic>,
}

impl AccessoryDescriptor {
    /// Initial values for the name and information characteristics.
    #[must_use]
    pub fn static_values(&self) -> Vec<(Characteristic, CharacteristicValue)> {
        let mut values = vec![
            (Characteristic::Name, self.name.as_str().into()),
            (
                Characteristic::Manufacturer,
                self.information.manufacturer.as_str().into(),
            ),
            (Characteristic::Model, self.information.model.as_str().into()),
            (
                Characteristic::SerialNumber,
                self.information.serial_number.as_str().into(),
            ),
        ];
        if let Some(revision) = &self.information.firmware_revision {
            values.push((Characteristic::FirmwareRevision, revision.as_str().into()));
        }
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(json: &str) -> Device {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn should_only_allow_writing_on() {
        assert!(Characteristic::On.is_writable());
        assert!(!Characteristic::ElectricPower.is_writable());
        assert!(!Characteristic::ElectricalEnergy.is_writable());
        assert!(!Characteristic::Name.is_writable());
    }

    #[test]
    fn should_report_metering_units() {
        assert_eq!(Characteristic::ElectricPower.unit(), Some("W"));
        assert_eq!(Characteristic::ElectricalEnergy.unit(), Some("Wh"));
        assert_eq!(Characteristic::On.unit(), None);
    }

    #[test]
    fn should_use_eve_uuids_for_metering() {
        assert!(Characteristic::ElectricPower.uuid().starts_with("E863F10D"));
        assert!(Characteristic::ElectricalEnergy.uuid().starts_with("E863F10C"));
    }

    #[test]
    fn should_place_information_characteristics_on_information_service() {
        assert_eq!(
            Characteristic::SerialNumber.service(),
            ServiceKind::AccessoryInformation
        );
        assert_eq!(Characteristic::On.service(), ServiceKind::Switch);
    }

    #[test]
    fn should_serialize_values_untagged() {
        assert_eq!(
            serde_json::to_string(&CharacteristicValue::Bool(true)).unwrap(),
            "true"
        );
        assert_eq!(
            serde_json::to_string(&CharacteristicValue::Float(12.5)).unwrap(),
            "12.5"
        );
    }

    #[test]
    fn should_derive_information_from_device() {
        let info = AccessoryInformation::from_device(&device(
            r#"{"id": "D1", "type": "PLUGABLE_SWITCH_MEASURING", "modelType": "HMIP-PSM", "oem": "eQ-3", "firmwareVersion": "2.6.2"}"#,
        ));
        assert_eq!(info.manufacturer, "eQ-3");
        assert_eq!(info.model, "HMIP-PSM");
        assert_eq!(info.serial_number, "D1");
        assert_eq!(info.firmware_revision.as_deref(), Some("2.6.2"));
    }

    #[test]
    fn should_fall_back_to_defaults_when_metadata_missing() {
        let info = AccessoryInformation::from_device(&device(
            r#"{"id": "D2", "type": "BRAND_SWITCH_MEASURING"}"#,
        ));
        assert_eq!(info.manufacturer, DEFAULT_MANUFACTURER);
        assert_eq!(info.model, "BRAND_SWITCH_MEASURING");
        assert!(info.firmware_revision.is_none());
    }

    #[test]
    fn should_list_static_values_without_missing_firmware() {
        let descriptor = AccessoryDescriptor {
            device_id: "D2".parse().unwrap(),
            name: "Lamp".to_string(),
            service: ServiceKind::Switch,
            information: AccessoryInformation {
                manufacturer: "eQ-3".to_string(),
                model: "HMIP-BSM".to_string(),
                serial_number: "D2".to_string(),
                firmware_revision: None,
            },
            characteristics: vec![Characteristic::Name, Characteristic::On],
        };
        let values = descriptor.static_values();
        assert_eq!(values.len(), 4);
        assert_eq!(
            values[0],
            (Characteristic::Name, CharacteristicValue::from("Lamp"))
        );
    }
}
