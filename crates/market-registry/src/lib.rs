//! Records-management library for municipal market and vendor stall approvals.
//!
//! The `registry` module carries the domain model, the role/status workflow
//! guard, and the SQLite-backed store behind the service facade. `config`,
//! `telemetry`, and `error` provide the runtime plumbing shared with the HTTP
//! service crate.

pub mod config;
pub mod error;
pub mod registry;
pub mod telemetry;
