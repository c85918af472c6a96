//! # hmipbridge-adapter-hmip-reqwest
//!
//! HomematicIP cloud adapter — talks to the vendor REST API over HTTPS.
//!
//! ## Responsibilities
//! - Implement [`SwitchControl`](hmipbridge_app::ports::SwitchControl) by
//!   calling `device/control/setSwitchState`
//! - Implement [`StateSource`](hmipbridge_app::ports::StateSource) by calling
//!   `home/getCurrentState` and decoding the device and group maps
//! - Translate transport and status failures into typed errors
//!
//! ## Endpoints
//!
//! | Port | Path | Body |
//! |------|------|------|
//! | `SwitchControl` | `POST /hmip/device/control/setSwitchState` | `{channelIndex, deviceId, on}` |
//! | `StateSource` | `POST /hmip/home/getCurrentState` | `{clientCharacteristics, id}` |
//!
//! ## Dependency rule
//!
//! Same as other adapters: depends on `hmipbridge-app` and `hmipbridge-domain`.

mod client;
mod config;
mod decode;
mod error;

pub use client::HmipClient;
pub use config::HmipConfig;
pub use error::HmipError;
