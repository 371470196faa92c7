//! End-to-end dimensioning: sizing, costing and financial projection.

pub mod engine;
pub mod types;

pub use engine::{Engine, compute_dimensioning};
pub use types::{BatterySubsystem, DimensioningResult, Economics, SolarSubsystem};
