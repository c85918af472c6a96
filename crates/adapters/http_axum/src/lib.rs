//! # hmipbridge-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a JSON API over the bridged accessories
//!   (`/api/accessories`, `/api/accessories/{id}/on`)
//! - Stream every characteristic push as Server-Sent Events
//!   (`/api/events/stream`)
//! - Map application errors into HTTP status codes
//!
//! ## Dependency rule
//! Depends on `hmipbridge-app` (ports, services, in-memory host) and
//! `hmipbridge-domain`. Never leaks axum types into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
