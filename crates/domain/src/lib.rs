//! # hmipbridge-domain
//!
//! Pure domain model for the hmipbridge HomematicIP accessory bridge.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Devices** (vendor-reported snapshots with their functional channels)
//! - Define **Groups** (vendor-side groupings passed alongside device snapshots)
//! - Define **Accessories** (characteristics exposed to the smart-home ecosystem)
//! - Define **Commands** (requests sent back to the vendor, e.g. `setSwitchState`)
//! - Define **Events** (characteristic-change records)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

mod lenient;

pub mod accessory;
pub mod channel;
pub mod command;
pub mod device;
pub mod event;
pub mod group;
