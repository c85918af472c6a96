//! Accessory host port — where accessories are registered and values pushed.
//!
//! The host is the smart-home facing runtime. An accessory registers itself
//! once with an [`AccessoryDescriptor`] and receives a handle implementing
//! the sink traits; from then on it only pushes values through that handle
//! and never looks characteristics up by name.

use std::sync::Arc;

use hmipbridge_domain::accessory::AccessoryDescriptor;
use hmipbridge_domain::id::DeviceId;

/// Receives power-state pushes.
pub trait PowerStateSink: Send + Sync {
    fn push_on(&self, on: bool);
}

/// Receives metering pushes.
pub trait MeteringSink: Send + Sync {
    /// Instantaneous power, in watts.
    fn push_power(&self, watts: f64);
    /// Cumulative energy, in watt-hours.
    fn push_energy(&self, watt_hours: f64);
}

/// Receives accessory-information updates that change after registration.
pub trait InformationSink: Send + Sync {
    fn push_firmware_revision(&self, revision: &str);
}

/// Everything a registered measuring switch can push to.
pub trait AccessoryHandle: PowerStateSink + MeteringSink + InformationSink {}

impl<T: PowerStateSink + MeteringSink + InformationSink> AccessoryHandle for T {}

/// Registers accessories with the host runtime.
pub trait AccessoryHost: Send + Sync {
    /// Sink handle bound to one registered accessory.
    type Handle: AccessoryHandle + 'static;

    /// Register an accessory and return its sink handle.
    ///
    /// Registering a device id twice replaces the previous registration.
    fn register(&self, descriptor: AccessoryDescriptor) -> Self::Handle;

    /// Remove an accessory. Unknown ids are ignored.
    fn unregister(&self, device_id: &DeviceId);
}

impl<T: AccessoryHost> AccessoryHost for Arc<T> {
    type Handle = T::Handle;

    fn register(&self, descriptor: AccessoryDescriptor) -> Self::Handle {
        (**self).register(descriptor)
    }

    fn unregister(&self, device_id: &DeviceId) {
        (**self).unregister(device_id);
    }
}
