//! Vendor ports — outbound calls to the HomematicIP API.

use std::future::Future;
use std::sync::Arc;

use hmipbridge_domain::command::SwitchStateCommand;
use hmipbridge_domain::device::HomeSnapshot;
use hmipbridge_domain::error::BridgeError;

/// Sends switch commands to the vendor.
pub trait SwitchControl: Send + Sync {
    /// Issue one `setSwitchState` call.
    ///
    /// Resolves once the vendor acknowledged or rejected the request. The
    /// response body is not inspected.
    fn set_switch_state(
        &self,
        command: SwitchStateCommand,
    ) -> impl Future<Output = Result<(), BridgeError>> + Send;
}

impl<T: SwitchControl> SwitchControl for Arc<T> {
    fn set_switch_state(
        &self,
        command: SwitchStateCommand,
    ) -> impl Future<Output = Result<(), BridgeError>> + Send {
        (**self).set_switch_state(command)
    }
}

/// Fetches the full current state of the home.
pub trait StateSource: Send + Sync {
    fn current_state(&self) -> impl Future<Output = Result<HomeSnapshot, BridgeError>> + Send;
}

impl<T: StateSource> StateSource for Arc<T> {
    fn current_state(&self) -> impl Future<Output = Result<HomeSnapshot, BridgeError>> + Send {
        (**self).current_state()
    }
}
