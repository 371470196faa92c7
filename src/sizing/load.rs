//! Load aggregation and sizing-mode selection for storage topologies.

use serde::Serialize;

use super::guarded_div;
use crate::config::HeuristicsConfig;
use crate::project::{LoadProfile, SystemTopology};

/// How the battery bank was dimensioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SizingBasis {
    /// Declared nominal loads.
    LoadBased,
    /// Load synthesised from monthly consumption (hybrid, no declared loads).
    Estimated,
    /// Metered monthly consumption (off-grid).
    Metered,
}

/// Aggregated load for battery and inverter sizing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadAssessment {
    pub basis: SizingBasis,
    /// Nominal (or estimated) connected load, W.
    pub total_load_w: f64,
    /// Load expected to run concurrently, kW.
    pub effective_load_kw: f64,
    /// Metered monthly energy, kWh. Non-zero only for [`SizingBasis::Metered`].
    pub metered_monthly_kwh: f64,
}

impl LoadAssessment {
    /// Assessment for topologies without storage.
    pub fn none() -> Self {
        Self {
            basis: SizingBasis::LoadBased,
            total_load_w: 0.0,
            effective_load_kw: 0.0,
            metered_monthly_kwh: 0.0,
        }
    }
}

/// Aggregates the project's loads into an effective concurrent load.
///
/// A metered profile is honoured only for off-grid systems with a positive
/// reading; otherwise it counts as zero declared load. A hybrid system with no
/// declared load estimates one from monthly consumption as the average hourly
/// draw times `heuristics.estimate_load_multiplier`.
///
/// # Arguments
///
/// * `topology` - System topology (only storage topologies carry a load)
/// * `profile` - Declared or metered load description
/// * `monthly_consumption_kwh` - Monthly consumption used in estimate mode
/// * `simultaneity_pct` - Share of the load active at once, in `[0, 100]`
/// * `heuristics` - Empirical multipliers
pub fn aggregate(
    topology: SystemTopology,
    profile: &LoadProfile,
    monthly_consumption_kwh: f64,
    simultaneity_pct: f64,
    heuristics: &HeuristicsConfig,
) -> LoadAssessment {
    if !topology.stores_energy() {
        return LoadAssessment::none();
    }

    if let LoadProfile::Metered { monthly_kwh } = *profile {
        if topology == SystemTopology::OffGrid && monthly_kwh > 0.0 {
            return LoadAssessment {
                basis: SizingBasis::Metered,
                total_load_w: 0.0,
                effective_load_kw: 0.0,
                metered_monthly_kwh: monthly_kwh,
            };
        }
    }

    let mut basis = SizingBasis::LoadBased;
    let mut total_load_w = profile.nominal_loads().total_w();

    if total_load_w <= 0.0
        && topology == SystemTopology::Hybrid
        && monthly_consumption_kwh > 0.0
    {
        let avg_hourly_kw = guarded_div(monthly_consumption_kwh, heuristics.days_per_month) / 24.0;
        total_load_w = avg_hourly_kw * heuristics.estimate_load_multiplier * 1000.0;
        basis = SizingBasis::Estimated;
        tracing::debug!(total_load_w, "no declared loads, estimated from consumption");
    }

    LoadAssessment {
        basis,
        total_load_w,
        effective_load_kw: total_load_w * (simultaneity_pct / 100.0) / 1000.0,
        metered_monthly_kwh: 0.0,
    }
}
