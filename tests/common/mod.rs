//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use pv_sizer::dimension::DimensioningResult;
use pv_sizer::project::{LoadProfile, NominalLoads, ProjectInput, SystemTopology, VoltageClass};

/// Grid-tied project in the default region (HSP 5.0), 500 kWh at 0.90.
pub fn grid_tied_default_region() -> ProjectInput {
    ProjectInput {
        topology: Some(SystemTopology::GridTied),
        monthly_consumption_kwh: 500.0,
        energy_price_per_kwh: Some(0.90),
        ..ProjectInput::default()
    }
}

/// Hybrid project without declared loads, 600 kWh, 4 h backup, 70% simultaneity.
pub fn hybrid_estimate_mode() -> ProjectInput {
    ProjectInput {
        topology: Some(SystemTopology::Hybrid),
        monthly_consumption_kwh: 600.0,
        backup_hours: 4.0,
        simultaneity_pct: 70.0,
        energy_price_per_kwh: Some(0.90),
        ..ProjectInput::default()
    }
}

/// Off-grid project sized from a 300 kWh metered reading.
pub fn off_grid_metered(monthly_kwh: f64) -> ProjectInput {
    ProjectInput {
        topology: Some(SystemTopology::OffGrid),
        load_profile: LoadProfile::Metered { monthly_kwh },
        energy_price_per_kwh: Some(0.90),
        ..ProjectInput::default()
    }
}

/// Deterministic RNG for property sweeps.
pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

const REGIONS: &[&str] = &["PADRAO", "SP", "RN", "RS", "AM", "MG", "XX"];
const VOLTAGES: &[VoltageClass] = &[
    VoltageClass::Mono127,
    VoltageClass::Mono220,
    VoltageClass::Tri220,
    VoltageClass::Tri380,
];

/// Random but valid project covering every topology and load mode.
pub fn random_project(rng: &mut StdRng) -> ProjectInput {
    let topology = match rng.random_range(0..4) {
        0 => None,
        1 => Some(SystemTopology::GridTied),
        2 => Some(SystemTopology::Hybrid),
        _ => Some(SystemTopology::OffGrid),
    };
    let load_profile = if rng.random_bool(0.3) {
        LoadProfile::Metered {
            monthly_kwh: rng.random_range(0.0..2000.0),
        }
    } else {
        LoadProfile::Nominal(NominalLoads {
            low_voltage_w: random_load(rng),
            mid_voltage_w: random_load(rng),
            high_voltage_w: random_load(rng),
        })
    };

    ProjectInput {
        topology,
        monthly_consumption_kwh: if rng.random_bool(0.1) {
            0.0
        } else {
            rng.random_range(0.0..5000.0)
        },
        backup_hours: rng.random_range(0.0..24.0),
        load_profile,
        simultaneity_pct: rng.random_range(0.0..=100.0),
        voltage_class: VOLTAGES[rng.random_range(0..VOLTAGES.len())],
        anti_export_enabled: rng.random_bool(0.5),
        region: REGIONS[rng.random_range(0..REGIONS.len())].to_string(),
        locality: None,
        energy_price_per_kwh: Some(rng.random_range(0.0..2.0)),
    }
}

fn random_load(rng: &mut StdRng) -> f64 {
    if rng.random_bool(0.4) {
        0.0
    } else {
        rng.random_range(0.0..20_000.0)
    }
}

/// Every float in the result, labelled, for finiteness checks.
pub fn all_floats(r: &DimensioningResult) -> Vec<(&'static str, f64)> {
    let mut out = vec![
        ("battery.energy_kwh", r.battery.energy_kwh),
        ("battery.effective_load_kw", r.battery.effective_load_kw),
        ("battery.total_load_w", r.battery.total_load_w),
        ("battery.hybrid_inverter_kw", r.battery.hybrid_inverter_kw),
        ("solar.array_kwp", r.solar.array_kwp),
        ("solar.irradiance_hsp", r.solar.irradiance_hsp),
        ("solar.daily_production_kwh", r.solar.daily_production_kwh),
        ("solar.daily_consumption_kwh", r.solar.daily_consumption_kwh),
        ("solar.pv_inverter_kw", r.solar.pv_inverter_kw),
        ("economics.monthly_savings", r.economics.monthly_savings),
        ("economics.capex", r.economics.capex),
        ("economics.npv", r.economics.npv),
        ("economics.irr_pct", r.economics.irr_pct),
        ("economics.payback_years", r.economics.payback_years),
        ("economics.inertia_cost", r.economics.inertia_cost),
        ("economics.lcoe", r.economics.lcoe),
    ];
    out.extend(
        r.economics
            .cumulative_cash_flow
            .iter()
            .map(|v| ("economics.cumulative_cash_flow", *v)),
    );
    out
}
