//! Battery bank sizing.

use super::load::{LoadAssessment, SizingBasis};
use super::{guarded_div, unit_count};
use crate::config::{HeuristicsConfig, SizingConfig};

/// Sized battery bank.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatteryBank {
    /// Nominal bank energy (kWh), before depth-of-discharge derating.
    pub energy_kwh: f64,
    /// Number of battery units, `ceil(energy / unit capacity)`.
    pub unit_count: u32,
    /// Load the inverter must carry (kW). Back-derived from energy in metered mode.
    pub effective_load_kw: f64,
}

impl BatteryBank {
    /// Empty bank for topologies without storage.
    pub fn none() -> Self {
        Self {
            energy_kwh: 0.0,
            unit_count: 0,
            effective_load_kw: 0.0,
        }
    }

    /// Sizes the bank for `load` over `backup_hours` of autonomy.
    ///
    /// Load-based and estimated assessments size `load * hours / DOD`. Metered
    /// assessments size one day of metered energy over DOD and set the effective
    /// load to that energy spread over `heuristics.metered_discharge_hours`.
    pub fn size(
        load: &LoadAssessment,
        backup_hours: f64,
        sizing: &SizingConfig,
        heuristics: &HeuristicsConfig,
    ) -> Self {
        let dod = sizing.depth_of_discharge;
        let (energy_kwh, effective_load_kw) = match load.basis {
            SizingBasis::LoadBased | SizingBasis::Estimated => (
                guarded_div(load.effective_load_kw * backup_hours, dod),
                load.effective_load_kw,
            ),
            SizingBasis::Metered => {
                let daily_kwh = guarded_div(load.metered_monthly_kwh, heuristics.days_per_month);
                let energy = guarded_div(daily_kwh, dod);
                (
                    energy,
                    guarded_div(energy, heuristics.metered_discharge_hours),
                )
            }
        };

        Self {
            energy_kwh,
            unit_count: unit_count(energy_kwh, sizing.battery_unit_kwh),
            effective_load_kw,
        }
    }
}
