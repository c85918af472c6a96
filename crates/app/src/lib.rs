//! # hmipbridge-app
//!
//! Application layer — accessory use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `AccessoryHost` — registers accessories and hands out value sinks
//!   - `SwitchControl` — forwards switch commands to the vendor
//!   - `StateSource` — fetches the vendor's current home state
//! - Implement the **device accessories** (`SwitchMeasuringAccessory`) that
//!   diff snapshots against cached values and push genuine changes
//! - Provide the **bridge service** that creates, updates and drops
//!   accessories as snapshots arrive, and the polling **sync loop**
//! - Provide **in-process infrastructure** (`InMemoryAccessoryHost`) that
//!   doesn't need IO
//!
//! ## Dependency rule
//! Depends on `hmipbridge-domain` only (plus `tokio::sync`/`tokio::time`).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod accessories;
pub mod accessory_host;
pub mod ports;
pub mod services;
pub mod sync_loop;
