//! Dimensioning result records.

use std::fmt;

use serde::Serialize;

use crate::finance::YearCashFlow;
use crate::project::SystemTopology;
use crate::sizing::SizingBasis;

/// Battery side of the system.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatterySubsystem {
    /// Nominal bank energy (kWh).
    pub energy_kwh: f64,
    /// Number of battery units.
    pub unit_count: u32,
    /// Concurrent load the hybrid inverter carries (kW).
    pub effective_load_kw: f64,
    /// Declared or estimated connected load (W).
    pub total_load_w: f64,
    /// Suggested inverter family.
    pub inverter_model: String,
    /// Suggested hybrid inverter rating (kW).
    pub hybrid_inverter_kw: f64,
    pub basis: SizingBasis,
}

/// PV side of the system.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolarSubsystem {
    /// Array peak power (kWp).
    pub array_kwp: f64,
    pub module_count: u32,
    /// Peak sun hours used for the region.
    pub irradiance_hsp: f64,
    pub daily_production_kwh: f64,
    /// Daily energy the array was sized to cover.
    pub daily_consumption_kwh: f64,
    /// Suggested PV-only inverter rating (kW).
    pub pv_inverter_kw: f64,
}

/// Cost and investment indicators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Economics {
    pub monthly_savings: f64,
    pub capex: f64,
    pub npv: f64,
    pub irr_pct: f64,
    pub payback_years: f64,
    /// Inflated savings forgone over the horizon without the system.
    pub inertia_cost: f64,
    /// Cumulative cash flow from year 0 (`-capex`).
    pub cumulative_cash_flow: Vec<f64>,
    /// Levelized cost of energy per kWh.
    pub lcoe: f64,
    pub years: Vec<YearCashFlow>,
}

/// Complete dimensioning output for one project.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensioningResult {
    pub topology: Option<SystemTopology>,
    pub battery: BatterySubsystem,
    pub solar: SolarSubsystem,
    pub economics: Economics,
    /// Carried through from the input; affects reporting only.
    pub anti_export_enabled: bool,
}

impl fmt::Display for DimensioningResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = &self.battery;
        let s = &self.solar;
        let e = &self.economics;

        writeln!(f, "--- Dimensioning Report ---")?;
        match self.topology {
            Some(topology) => writeln!(f, "Topology:              {topology}")?,
            None => writeln!(f, "Topology:              not selected")?,
        }
        writeln!(f, "Anti-export:           {}", if self.anti_export_enabled { "on" } else { "off" })?;
        writeln!(f, "Irradiance:            {:.2} h/day", s.irradiance_hsp)?;
        writeln!(f, "Array power:           {:.2} kWp ({} modules)", s.array_kwp, s.module_count)?;
        writeln!(
            f,
            "Daily energy:          {:.2} kWh produced / {:.2} kWh needed",
            s.daily_production_kwh, s.daily_consumption_kwh
        )?;
        writeln!(f, "PV inverter:           {:.1} kW", s.pv_inverter_kw)?;

        if self.topology.is_some_and(SystemTopology::stores_energy) {
            writeln!(f, "Battery bank:          {:.1} kWh ({} units)", b.energy_kwh, b.unit_count)?;
            writeln!(f, "Effective load:        {:.1} kW ({:?})", b.effective_load_kw, b.basis)?;
            writeln!(f, "Hybrid inverter:       {:.1} kW", b.hybrid_inverter_kw)?;
            writeln!(f, "Inverter type:         {}", b.inverter_model)?;
        }

        writeln!(f, "Monthly savings:       {:.2}", e.monthly_savings)?;
        writeln!(f, "Estimated CAPEX:       {:.2}", e.capex)?;
        writeln!(f, "NPV:                   {:.2}", e.npv)?;
        writeln!(f, "IRR:                   {:.2}%", e.irr_pct)?;
        writeln!(f, "Payback:               {:.2} years", e.payback_years)?;
        writeln!(f, "Inertia cost:          {:.2}", e.inertia_cost)?;
        write!(f, "LCOE:                  {:.4} per kWh", e.lcoe)
    }
}
