//! End-to-end dimensioning scenarios with hand-checked figures.

mod common;

use pv_sizer::config::{EngineConfig, FinanceConfig};
use pv_sizer::dimension::{Engine, compute_dimensioning};
use pv_sizer::finance::FinancialReport;
use pv_sizer::project::{LoadProfile, NominalLoads, ProjectInput, SystemTopology};
use pv_sizer::sizing::SizingBasis;
use pv_sizer::sizing::inverter::hybrid_inverter_kw;
use pv_sizer::tables::InverterCatalog;

#[test]
fn grid_tied_default_region() {
    let result = compute_dimensioning(&common::grid_tied_default_region());

    assert_eq!(result.solar.irradiance_hsp, 5.0);
    assert!((result.solar.array_kwp - 4.1667).abs() < 1e-3, "kwp = {}", result.solar.array_kwp);
    assert_eq!(result.solar.module_count, 7);
    assert!((result.economics.monthly_savings - 382.50).abs() < 1e-9);
    assert_eq!(result.battery.unit_count, 0);
    assert_eq!(result.economics.cumulative_cash_flow.len(), 26);
    assert_eq!(result.economics.cumulative_cash_flow[0], -result.economics.capex);
}

#[test]
fn hybrid_without_loads_estimates_battery() {
    let result = compute_dimensioning(&common::hybrid_estimate_mode());

    assert_eq!(result.battery.basis, SizingBasis::Estimated);
    assert!(result.battery.energy_kwh > 0.0);
    assert_eq!(
        result.battery.unit_count,
        (result.battery.energy_kwh / 5.0).ceil() as u32
    );
    assert!(result.battery.hybrid_inverter_kw >= result.battery.effective_load_kw);
}

#[test]
fn degenerate_financials_are_all_zero() {
    for (capex, savings) in [(0.0, 500.0), (40_000.0, 0.0), (0.0, 0.0), (-10.0, 300.0)] {
        let report = FinancialReport::project(capex, savings, &FinanceConfig::default(), 0.85);
        assert_eq!(report.npv, 0.0);
        assert_eq!(report.irr_pct, 0.0);
        assert_eq!(report.payback_years, 0.0);
        assert_eq!(report.inertia_cost, 0.0);
        assert_eq!(report.lcoe, 0.0);
        assert_eq!(report.cumulative_cash_flow, vec![0.0]);
    }
}

#[test]
fn off_grid_metered_battery() {
    let result = compute_dimensioning(&common::off_grid_metered(300.0));

    assert_eq!(result.battery.basis, SizingBasis::Metered);
    assert!((result.battery.energy_kwh - 12.5).abs() < 1e-12);
    assert_eq!(result.battery.unit_count, 3);
    assert_eq!(result.battery.total_load_w, 0.0);
    assert_eq!(result.battery.inverter_model, "No priority loads defined");
}

#[test]
fn hybrid_inverter_keeps_load_floor() {
    let catalog = InverterCatalog::new(vec![5.0, 6.0, 7.0, 7.5, 8.0, 10.0]);
    let config = EngineConfig::default();
    assert_eq!(hybrid_inverter_kw(6.2, 2.0, &catalog, &config.sizing), 7.0);

    // Same decision through the engine: 6.2 kW of loads, tiny array.
    let input = ProjectInput {
        topology: Some(SystemTopology::Hybrid),
        monthly_consumption_kwh: 100.0,
        simultaneity_pct: 100.0,
        load_profile: LoadProfile::Nominal(NominalLoads {
            mid_voltage_w: 6200.0,
            ..NominalLoads::default()
        }),
        energy_price_per_kwh: Some(0.9),
        ..ProjectInput::default()
    };
    let engine = Engine::new(EngineConfig {
        inverter_catalog: catalog,
        ..EngineConfig::default()
    });
    let result = engine.compute(&input);
    assert!((result.battery.effective_load_kw - 6.2).abs() < 1e-12);
    assert_eq!(result.battery.hybrid_inverter_kw, 7.0);
}

#[test]
fn hybrid_capex_includes_battery_and_hybrid_inverter() {
    let result = compute_dimensioning(&common::hybrid_estimate_mode());
    let expected = (result.solar.array_kwp * 3200.0
        + result.battery.hybrid_inverter_kw * 2500.0
        + result.battery.energy_kwh * 3800.0)
        * 1.4;
    assert!((result.economics.capex - expected).abs() < 1e-6);
}

#[test]
fn metered_reading_ignored_outside_off_grid() {
    let input = ProjectInput {
        topology: Some(SystemTopology::Hybrid),
        monthly_consumption_kwh: 600.0,
        ..common::off_grid_metered(300.0)
    };
    let result = compute_dimensioning(&input);
    assert_eq!(result.battery.basis, SizingBasis::Estimated);
}

#[test]
fn result_serializes_to_json() {
    let result = compute_dimensioning(&common::off_grid_metered(300.0));
    let json = serde_json::to_value(&result).expect("result serializes");
    assert_eq!(json["topology"], "off_grid");
    assert_eq!(json["battery"]["basis"], "metered");
    assert_eq!(json["economics"]["years"].as_array().map(Vec::len), Some(26));
}

#[test]
fn report_lists_key_figures() {
    let report = compute_dimensioning(&common::hybrid_estimate_mode()).to_string();
    assert!(report.starts_with("--- Dimensioning Report ---"));
    for label in ["Array power:", "Battery bank:", "Hybrid inverter:", "Monthly savings:", "Payback:"] {
        assert!(report.contains(label), "missing `{label}` in:\n{report}");
    }

    let grid = compute_dimensioning(&common::grid_tied_default_region()).to_string();
    assert!(!grid.contains("Battery bank:"));
}
