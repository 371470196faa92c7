//! Dimensioning engine: one pure pass from project input to result.

use super::types::{BatterySubsystem, DimensioningResult, Economics, SolarSubsystem};
use crate::config::EngineConfig;
use crate::finance::FinancialReport;
use crate::project::ProjectInput;
use crate::sizing::cost::{CostBasis, estimate_capex};
use crate::sizing::inverter::{hybrid_inverter_kw, inverter_model, pv_inverter_kw};
use crate::sizing::load::{LoadAssessment, aggregate};
use crate::sizing::solar::{daily_demand_kwh, monthly_savings};
use crate::sizing::{BatteryBank, PvArray};

/// Dimensioning engine bound to an immutable configuration.
///
/// `compute` never fails and never performs I/O, so one engine can be shared
/// across threads behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Sizes battery, array and inverters for `input` and projects the economics.
    ///
    /// Invalid numbers in `input` are clamped to their valid range first. A
    /// project without a topology sizes nothing and reports zeros.
    ///
    /// # Examples
    ///
    /// ```
    /// use pv_sizer::dimension::Engine;
    /// use pv_sizer::project::ProjectInput;
    ///
    /// let result = Engine::default().compute(&ProjectInput::grid_tied_home());
    /// assert_eq!(result.solar.module_count, 7);
    /// assert!((result.economics.monthly_savings - 382.5).abs() < 1e-9);
    /// ```
    pub fn compute(&self, input: &ProjectInput) -> DimensioningResult {
        let cfg = &self.config;
        if input.energy_price_per_kwh.is_none() {
            tracing::warn!("no energy price set, savings will be zero");
        }
        let input = input.normalized();
        let hsp = cfg.irradiance.hsp(&input.region);
        if !cfg.irradiance.contains(&input.region) {
            tracing::debug!(region = %input.region, hsp, "region not in irradiance table, using default");
        }

        let Some(topology) = input.topology else {
            tracing::debug!("no topology selected, nothing sized");
            return DimensioningResult::empty(hsp, input.anti_export_enabled);
        };
        let stores_energy = topology.stores_energy();

        let (load, bank, model) = if stores_energy {
            let load = aggregate(
                topology,
                &input.load_profile,
                input.monthly_consumption_kwh,
                input.simultaneity_pct,
                &cfg.heuristics,
            );
            let bank = BatteryBank::size(&load, input.backup_hours, &cfg.sizing, &cfg.heuristics);
            let model = inverter_model(&input.load_profile.nominal_loads(), input.voltage_class);
            (load, bank, model)
        } else {
            (LoadAssessment::none(), BatteryBank::none(), "")
        };

        let demand = daily_demand_kwh(
            topology,
            &load,
            &bank,
            input.monthly_consumption_kwh,
            &cfg.sizing,
            &cfg.heuristics,
        );
        let array = PvArray::size(demand, hsp, &cfg.sizing);
        let savings = monthly_savings(
            topology,
            input.monthly_consumption_kwh,
            &array,
            input.price_per_kwh(),
            &cfg.sizing,
            &cfg.heuristics,
        );

        let pv_inverter = pv_inverter_kw(array.kwp, &cfg.sizing);
        let hybrid_inverter = if stores_energy {
            hybrid_inverter_kw(bank.effective_load_kw, array.kwp, &cfg.inverter_catalog, &cfg.sizing)
        } else {
            0.0
        };

        let capex = estimate_capex(
            &CostBasis {
                array_kwp: array.kwp,
                inverter_kw: if stores_energy { hybrid_inverter } else { pv_inverter },
                battery_kwh: bank.energy_kwh,
                hybrid: stores_energy,
            },
            &cfg.pricing,
        );

        tracing::debug!(
            %topology,
            basis = ?load.basis,
            battery_kwh = bank.energy_kwh,
            array_kwp = array.kwp,
            hybrid_inverter,
            pv_inverter,
            capex,
            "system sized"
        );

        let finance = FinancialReport::project(
            capex,
            savings,
            &cfg.finance,
            cfg.sizing.net_compensation_factor,
        );

        DimensioningResult {
            topology: Some(topology),
            battery: BatterySubsystem {
                energy_kwh: bank.energy_kwh,
                unit_count: bank.unit_count,
                effective_load_kw: bank.effective_load_kw,
                total_load_w: load.total_load_w,
                inverter_model: model.to_string(),
                hybrid_inverter_kw: hybrid_inverter,
                basis: load.basis,
            },
            solar: SolarSubsystem {
                array_kwp: array.kwp,
                module_count: array.module_count,
                irradiance_hsp: hsp,
                daily_production_kwh: array.daily_production_kwh,
                daily_consumption_kwh: demand,
                pv_inverter_kw: pv_inverter,
            },
            economics: Economics::new(savings, capex, finance),
            anti_export_enabled: input.anti_export_enabled,
        }
    }
}

/// Computes a dimensioning with the built-in configuration.
pub fn compute_dimensioning(input: &ProjectInput) -> DimensioningResult {
    Engine::default().compute(input)
}

impl Economics {
    fn new(monthly_savings: f64, capex: f64, finance: FinancialReport) -> Self {
        Self {
            monthly_savings,
            capex,
            npv: finance.npv,
            irr_pct: finance.irr_pct,
            payback_years: finance.payback_years,
            inertia_cost: finance.inertia_cost,
            cumulative_cash_flow: finance.cumulative_cash_flow,
            lcoe: finance.lcoe,
            years: finance.years,
        }
    }
}

impl DimensioningResult {
    fn empty(hsp: f64, anti_export_enabled: bool) -> Self {
        Self {
            topology: None,
            battery: BatterySubsystem {
                energy_kwh: 0.0,
                unit_count: 0,
                effective_load_kw: 0.0,
                total_load_w: 0.0,
                inverter_model: String::new(),
                hybrid_inverter_kw: 0.0,
                basis: LoadAssessment::none().basis,
            },
            solar: SolarSubsystem {
                array_kwp: 0.0,
                module_count: 0,
                irradiance_hsp: hsp,
                daily_production_kwh: 0.0,
                daily_consumption_kwh: 0.0,
                pv_inverter_kw: 0.0,
            },
            economics: Economics::new(0.0, 0.0, FinancialReport::zero()),
            anti_export_enabled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{LoadProfile, NominalLoads, SystemTopology, VoltageClass};
    use crate::sizing::SizingBasis;

    #[test]
    fn engine_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Engine>();
    }

    #[test]
    fn grid_tied_home_sizes_array_only() {
        let result = compute_dimensioning(&ProjectInput::grid_tied_home());
        assert!((result.solar.array_kwp - 500.0 / 30.0 / 4.0).abs() < 1e-9);
        assert_eq!(result.solar.module_count, 7);
        assert_eq!(result.solar.irradiance_hsp, 5.0);
        assert_eq!(result.solar.pv_inverter_kw, 3.0);
        assert_eq!(result.battery.energy_kwh, 0.0);
        assert_eq!(result.battery.hybrid_inverter_kw, 0.0);
        assert!(result.battery.inverter_model.is_empty());
        // (4.1667 * 3200 + 3 * 1200) * 1.4
        let expected_capex = (500.0 / 30.0 / 4.0 * 3200.0 + 3600.0) * 1.4;
        assert!((result.economics.capex - expected_capex).abs() < 1e-6);
        assert_eq!(result.economics.cumulative_cash_flow.len(), 26);
    }

    #[test]
    fn hybrid_estimate_mode_sizes_battery() {
        let input = ProjectInput {
            region: "PADRAO".to_string(),
            ..ProjectInput::hybrid_backup()
        };
        let result = compute_dimensioning(&input);
        // 600 / 30 / 24 * 2 = 1.667 kW, 70% -> 1.167 kW, 4 h / 0.8 -> 5.83 kWh
        assert_eq!(result.battery.basis, SizingBasis::Estimated);
        assert!((result.battery.total_load_w - 1666.666_666_7).abs() < 1e-3);
        assert!((result.battery.energy_kwh - 5.833_333_3).abs() < 1e-6);
        assert_eq!(result.battery.unit_count, 2);
        assert_eq!(result.battery.inverter_model, "No priority loads defined");
        // 1.167 kW load, 5 kWp / 1.3 = 3.85 kW target -> 4.0 kW is closest
        assert_eq!(result.battery.hybrid_inverter_kw, 4.0);
    }

    #[test]
    fn off_grid_metered_mode() {
        let result = compute_dimensioning(&ProjectInput::off_grid_cabin());
        assert_eq!(result.battery.basis, SizingBasis::Metered);
        assert!((result.battery.energy_kwh - 12.5).abs() < 1e-12);
        assert_eq!(result.battery.unit_count, 3);
        assert!((result.battery.effective_load_kw - 2.5).abs() < 1e-12);
        assert!((result.solar.daily_consumption_kwh - 12.0).abs() < 1e-12);
        // Off-grid savings replace purchased energy: 12 kWh * 30 * 0.98
        assert!((result.economics.monthly_savings - 352.8).abs() < 1e-9);
    }

    #[test]
    fn off_grid_load_based_uses_duty_cycle() {
        let input = ProjectInput {
            topology: Some(SystemTopology::OffGrid),
            load_profile: LoadProfile::Nominal(NominalLoads {
                low_voltage_w: 1000.0,
                mid_voltage_w: 1000.0,
                high_voltage_w: 0.0,
            }),
            simultaneity_pct: 50.0,
            backup_hours: 8.0,
            voltage_class: VoltageClass::Mono220,
            energy_price_per_kwh: Some(1.0),
            ..ProjectInput::default()
        };
        let result = compute_dimensioning(&input);
        assert_eq!(result.battery.basis, SizingBasis::LoadBased);
        assert!((result.battery.effective_load_kw - 1.0).abs() < 1e-12);
        assert!((result.battery.energy_kwh - 10.0).abs() < 1e-12);
        assert!((result.solar.daily_consumption_kwh - 12.0).abs() < 1e-12);
        assert_eq!(
            result.battery.inverter_model,
            "Split-phase or single-phase with transformer"
        );
    }

    #[test]
    fn no_topology_sizes_nothing() {
        let input = ProjectInput {
            monthly_consumption_kwh: 800.0,
            region: "RN".to_string(),
            energy_price_per_kwh: Some(1.0),
            ..ProjectInput::default()
        };
        let result = compute_dimensioning(&input);
        assert_eq!(result.topology, None);
        assert_eq!(result.solar.irradiance_hsp, 5.9);
        assert_eq!(result.solar.array_kwp, 0.0);
        assert_eq!(result.economics.capex, 0.0);
        assert_eq!(result.economics.cumulative_cash_flow, vec![0.0]);
    }

    #[test]
    fn zero_consumption_is_degenerate() {
        let input = ProjectInput {
            monthly_consumption_kwh: 0.0,
            ..ProjectInput::grid_tied_home()
        };
        let result = compute_dimensioning(&input);
        assert_eq!(result.solar.module_count, 0);
        assert_eq!(result.economics.monthly_savings, 0.0);
        assert_eq!(result.economics.npv, 0.0);
        assert_eq!(result.economics.irr_pct, 0.0);
        assert_eq!(result.economics.payback_years, 0.0);
        assert_eq!(result.economics.cumulative_cash_flow, vec![0.0]);
    }

    #[test]
    fn custom_tables_are_used() {
        let mut config = EngineConfig::default();
        config.irradiance.default_hsp = 4.0;
        config.pricing.project_markup = 1.0;
        let engine = Engine::new(config);
        let result = engine.compute(&ProjectInput::grid_tied_home());
        assert_eq!(result.solar.irradiance_hsp, 4.0);
        let expected = 500.0 / 30.0 / 3.2;
        assert!((result.solar.array_kwp - expected).abs() < 1e-9);
        assert!((result.economics.capex - (expected * 3200.0 + 4.0 * 1200.0)).abs() < 1e-6);
    }

    #[test]
    fn anti_export_is_carried_through() {
        let input = ProjectInput {
            anti_export_enabled: true,
            ..ProjectInput::grid_tied_home()
        };
        assert!(compute_dimensioning(&input).anti_export_enabled);
    }
}
