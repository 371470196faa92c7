//! PV array sizing and monthly savings.

use super::battery::BatteryBank;
use super::load::{LoadAssessment, SizingBasis};
use super::{guarded_div, unit_count};
use crate::config::{HeuristicsConfig, SizingConfig};
use crate::project::SystemTopology;

/// Sized PV array.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PvArray {
    /// Array peak power (kWp).
    pub kwp: f64,
    /// Number of modules, `ceil(kwp * 1000 / module Wp)`.
    pub module_count: u32,
    /// Expected daily production (kWh).
    pub daily_production_kwh: f64,
}

impl PvArray {
    /// Sizes an array that produces `daily_demand_kwh` at `hsp` peak sun hours.
    ///
    /// # Examples
    ///
    /// ```
    /// use pv_sizer::config::SizingConfig;
    /// use pv_sizer::sizing::PvArray;
    ///
    /// let array = PvArray::size(500.0 / 30.0, 5.0, &SizingConfig::default());
    /// assert!((array.kwp - 4.1667).abs() < 1e-3);
    /// assert_eq!(array.module_count, 7);
    /// ```
    pub fn size(daily_demand_kwh: f64, hsp: f64, sizing: &SizingConfig) -> Self {
        let yield_per_kwp = hsp * sizing.performance_factor;
        let kwp = guarded_div(daily_demand_kwh, yield_per_kwp);
        Self {
            kwp,
            module_count: unit_count(kwp * 1000.0, sizing.module_power_wp),
            daily_production_kwh: kwp * yield_per_kwp,
        }
    }
}

/// Daily energy the array has to cover (kWh).
///
/// Off-grid systems cover the load (load-based: a duty cycle of the
/// effective load over 24 h; metered: the metered daily energy plus a
/// replenishment margin on usable storage). Grid-connected systems offset
/// the average daily consumption.
pub fn daily_demand_kwh(
    topology: SystemTopology,
    load: &LoadAssessment,
    bank: &BatteryBank,
    monthly_consumption_kwh: f64,
    sizing: &SizingConfig,
    heuristics: &HeuristicsConfig,
) -> f64 {
    match topology {
        SystemTopology::OffGrid => match load.basis {
            SizingBasis::Metered => {
                guarded_div(load.metered_monthly_kwh, heuristics.days_per_month)
                    + bank.energy_kwh * sizing.depth_of_discharge * heuristics.replenishment_margin
            }
            SizingBasis::LoadBased | SizingBasis::Estimated => {
                bank.effective_load_kw * 24.0 * heuristics.off_grid_duty_cycle
            }
        },
        SystemTopology::GridTied | SystemTopology::Hybrid => {
            guarded_div(monthly_consumption_kwh, heuristics.days_per_month)
        }
    }
}

/// Estimated monthly savings in currency units.
///
/// Grid-connected systems save the bill times the net-compensation factor;
/// off-grid systems replace all purchased energy they produce.
pub fn monthly_savings(
    topology: SystemTopology,
    monthly_consumption_kwh: f64,
    array: &PvArray,
    price_per_kwh: f64,
    sizing: &SizingConfig,
    heuristics: &HeuristicsConfig,
) -> f64 {
    match topology {
        SystemTopology::OffGrid => {
            array.daily_production_kwh * heuristics.days_per_month * price_per_kwh
        }
        SystemTopology::GridTied | SystemTopology::Hybrid => {
            monthly_consumption_kwh * price_per_kwh * sizing.net_compensation_factor
        }
    }
}
