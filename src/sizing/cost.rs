//! Linear CAPEX estimate from the configured price table.

use crate::config::PricingConfig;

/// Equipment quantities priced by [`estimate_capex`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostBasis {
    pub array_kwp: f64,
    pub inverter_kw: f64,
    pub battery_kwh: f64,
    /// Price the inverter from the hybrid list and include the battery.
    pub hybrid: bool,
}

/// Hardware cost before markup.
///
/// A hybrid basis, or any basis with battery energy, is priced with the hybrid
/// inverter rate plus the battery; otherwise PV modules and a string inverter.
pub fn hardware_cost(basis: &CostBasis, pricing: &PricingConfig) -> f64 {
    let kwp = basis.array_kwp.max(0.0);
    let inverter_kw = basis.inverter_kw.max(0.0);
    let battery_kwh = basis.battery_kwh.max(0.0);

    if basis.hybrid || battery_kwh > 0.0 {
        kwp * pricing.pv_per_kwp
            + inverter_kw * pricing.hybrid_inverter_per_kw
            + battery_kwh * pricing.battery_per_kwh
    } else {
        kwp * pricing.pv_per_kwp + inverter_kw * pricing.pv_inverter_per_kw
    }
}

/// Installed project cost: hardware times the project and labor markup.
///
/// # Examples
///
/// ```
/// use pv_sizer::config::PricingConfig;
/// use pv_sizer::sizing::cost::{estimate_capex, CostBasis};
///
/// let basis = CostBasis { array_kwp: 5.0, inverter_kw: 4.0, battery_kwh: 0.0, hybrid: false };
/// // (5 * 3200 + 4 * 1200) * 1.4
/// assert!((estimate_capex(&basis, &PricingConfig::default()) - 29_120.0).abs() < 1e-6);
/// ```
pub fn estimate_capex(basis: &CostBasis, pricing: &PricingConfig) -> f64 {
    let capex = hardware_cost(basis, pricing) * pricing.project_markup;
    if capex.is_finite() { capex.max(0.0) } else { 0.0 }
}
