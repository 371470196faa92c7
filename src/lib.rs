//! Solar PV and battery storage sizing with a 25-year financial projection.
//!
//! [`dimension::Engine`] turns a [`project::ProjectInput`] into a
//! [`dimension::DimensioningResult`]: battery bank, PV array, inverters,
//! installed cost and investment indicators. All constants and lookup tables
//! live in [`config::EngineConfig`].

#[cfg(feature = "api")]
pub mod api;
pub mod config;
pub mod dimension;
pub mod directory;
pub mod finance;
pub mod io;
pub mod project;
/// Sizing steps for loads, battery, array, inverters and cost.
pub mod sizing;
pub mod tables;

pub use config::{ConfigError, EngineConfig};
pub use dimension::{DimensioningResult, Engine, compute_dimensioning};
pub use project::{LoadProfile, NominalLoads, ProjectInput, SystemTopology, VoltageClass};
