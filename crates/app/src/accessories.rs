//! Device accessories — one adapter type per supported vendor device family.
//!
//! Each accessory registers itself with the [`AccessoryHost`](crate::ports::AccessoryHost)
//! on construction, keeps a cache of the values it exposes, and pushes only
//! genuine changes when a new snapshot is synchronized.

pub mod switch_measuring;

pub use switch_measuring::{MeasuringState, SwitchMeasuringAccessory};
