//! Inverter selection: PV-only string inverters and hybrid (battery) inverters.

use crate::config::SizingConfig;
use crate::project::{NominalLoads, VoltageClass};
use crate::tables::InverterCatalog;

/// Suggested PV-only inverter rating (kW).
///
/// Inverts the DC:AC oversizing ratio, rounds up to whole kW and applies the
/// configured floor. An empty array needs no inverter.
pub fn pv_inverter_kw(array_kwp: f64, sizing: &SizingConfig) -> f64 {
    if !(array_kwp > 0.0 && sizing.pv_inverter_ratio > 0.0) {
        return 0.0;
    }
    let target = (array_kwp / sizing.pv_inverter_ratio).ceil();
    if target.is_finite() {
        target.max(sizing.pv_inverter_min_kw)
    } else {
        0.0
    }
}

/// Suggested hybrid inverter rating (kW) from the commercial catalog.
///
/// The smallest rating covering the load is the floor. When the array calls for
/// a larger inverter (`kwp / hybrid_pv_ratio` at or above the load), the
/// catalog entry at or above the load closest to that target is chosen, with
/// ties going to the smaller rating. Loads beyond the catalog get its largest
/// entry. A non-positive load is replaced by `default_backup_load_kw`.
///
/// # Examples
///
/// ```
/// use pv_sizer::config::SizingConfig;
/// use pv_sizer::sizing::inverter::hybrid_inverter_kw;
/// use pv_sizer::tables::InverterCatalog;
///
/// let kw = hybrid_inverter_kw(6.2, 4.0, &InverterCatalog::default(), &SizingConfig::default());
/// assert_eq!(kw, 7.0);
/// ```
pub fn hybrid_inverter_kw(
    effective_load_kw: f64,
    array_kwp: f64,
    catalog: &InverterCatalog,
    sizing: &SizingConfig,
) -> f64 {
    let load = if effective_load_kw > 0.0 {
        effective_load_kw
    } else {
        sizing.default_backup_load_kw
    };

    let Some(floor) = catalog.smallest_at_least(load) else {
        let largest = catalog.largest().unwrap_or(0.0);
        tracing::warn!(load_kw = load, largest_kw = largest, "load exceeds inverter catalog");
        return largest;
    };

    let pv_target = if sizing.hybrid_pv_ratio > 0.0 {
        array_kwp.max(0.0) / sizing.hybrid_pv_ratio
    } else {
        0.0
    };
    if pv_target < load {
        return floor;
    }

    catalog.at_least(load).fold(floor, |best, kw| {
        if (kw - pv_target).abs() < (best - pv_target).abs() {
            kw
        } else {
            best
        }
    })
}

/// Descriptive inverter family for the declared loads and service voltage.
pub fn inverter_model(loads: &NominalLoads, voltage: VoltageClass) -> &'static str {
    let has_low = loads.low_voltage_w > 0.0;
    let has_mid = loads.mid_voltage_w > 0.0;
    let has_high = loads.high_voltage_w > 0.0;

    if !(has_low || has_mid || has_high) {
        return "No priority loads defined";
    }
    match voltage {
        VoltageClass::Tri380 => "Three-phase 380V",
        VoltageClass::Tri220 => "Three-phase 220V",
        VoltageClass::Mono127 | VoltageClass::Mono220 => match (has_low, has_mid) {
            (true, true) => "Split-phase or single-phase with transformer",
            (false, true) => "Single-phase 220V",
            (true, false) => "Single-phase 127V",
            (false, false) => "Single-phase (standard)",
        },
    }
}
