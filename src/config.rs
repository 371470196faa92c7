//! TOML-based engine configuration: sizing constants, empirical heuristics,
//! the price table, financial parameters and the bundled lookup tables.

use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::finance::irr::IrrSearch;
use crate::tables::{InverterCatalog, IrradianceTable, region_key};

/// Longest projection horizon accepted by [`EngineConfig::validate`] (years).
pub const MAX_HORIZON_YEARS: u32 = 100;

/// Most IRR bisection steps accepted by [`EngineConfig::validate`].
pub const MAX_IRR_ITERATIONS: u32 = 10_000;

/// Complete engine configuration.
///
/// Every section defaults to the built-in values, so a TOML file only needs
/// the keys it overrides. Load with [`EngineConfig::from_toml_file`] or use
/// [`EngineConfig::default`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Equipment and sizing constants.
    #[serde(default)]
    pub sizing: SizingConfig,
    /// Empirical multipliers used when device-level data is missing.
    #[serde(default)]
    pub heuristics: HeuristicsConfig,
    /// Per-unit equipment prices and project markup.
    #[serde(default)]
    pub pricing: PricingConfig,
    /// Cash-flow projection parameters.
    #[serde(default)]
    pub finance: FinanceConfig,
    /// Peak sun hours by region.
    #[serde(default)]
    pub irradiance: IrradianceTable,
    /// Commercial inverter ratings (kW, ascending).
    #[serde(default)]
    pub inverter_catalog: InverterCatalog,
}

/// Equipment and sizing constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SizingConfig {
    /// Usable energy of one battery unit (kWh).
    pub battery_unit_kwh: f64,
    /// Depth of discharge (0.0–1.0].
    pub depth_of_discharge: f64,
    /// Nameplate power of one PV module (Wp).
    pub module_power_wp: f64,
    /// PV system performance factor (0.0–1.0].
    pub performance_factor: f64,
    /// Share of the bill actually offset under net metering (0.0–1.0].
    pub net_compensation_factor: f64,
    /// Typical DC:AC oversizing ratio for PV-only inverters.
    pub pv_inverter_ratio: f64,
    /// Smallest PV-only inverter suggested (kW).
    pub pv_inverter_min_kw: f64,
    /// DC:AC ratio used to derive the PV target of hybrid inverters.
    pub hybrid_pv_ratio: f64,
    /// Load assumed for hybrid inverter sizing when none is known (kW).
    pub default_backup_load_kw: f64,
}

impl Default for SizingConfig {
    fn default() -> Self {
        Self {
            battery_unit_kwh: 5.0,
            depth_of_discharge: 0.8,
            module_power_wp: 640.0,
            performance_factor: 0.8,
            net_compensation_factor: 0.85,
            pv_inverter_ratio: 1.5,
            pv_inverter_min_kw: 2.0,
            hybrid_pv_ratio: 1.3,
            default_backup_load_kw: 3.0,
        }
    }
}

/// Empirical multipliers with undocumented provenance. Kept overridable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeuristicsConfig {
    /// Peak-to-average factor applied to the hourly draw in estimate mode.
    pub estimate_load_multiplier: f64,
    /// Fraction of the day an off-grid load is assumed to run.
    pub off_grid_duty_cycle: f64,
    /// Nominal discharge duration used to back-derive load from battery energy (h).
    pub metered_discharge_hours: f64,
    /// Extra daily PV energy for battery replenishment, as a fraction of usable storage.
    pub replenishment_margin: f64,
    /// Days per billing month.
    pub days_per_month: f64,
}

impl Default for HeuristicsConfig {
    fn default() -> Self {
        Self {
            estimate_load_multiplier: 2.0,
            off_grid_duty_cycle: 0.5,
            metered_discharge_hours: 5.0,
            replenishment_margin: 0.2,
            days_per_month: 30.0,
        }
    }
}

/// Linear price table for the cost estimator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PricingConfig {
    /// PV array price per kWp.
    pub pv_per_kwp: f64,
    /// Grid-tied inverter price per kW.
    pub pv_inverter_per_kw: f64,
    /// Hybrid inverter price per kW.
    pub hybrid_inverter_per_kw: f64,
    /// Battery price per kWh.
    pub battery_per_kwh: f64,
    /// Project and labor multiplier applied to hardware cost.
    pub project_markup: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            pv_per_kwp: 3200.0,
            pv_inverter_per_kw: 1200.0,
            hybrid_inverter_per_kw: 2500.0,
            battery_per_kwh: 3800.0,
            project_markup: 1.4,
        }
    }
}

/// Cash-flow projection parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FinanceConfig {
    /// Projection horizon (years).
    pub horizon_years: u32,
    /// Annual energy price inflation.
    pub energy_inflation: f64,
    /// Discount rate for NPV.
    pub discount_rate: f64,
    /// Annual O&M cost as a fraction of CAPEX, charged from year 2.
    pub maintenance_fraction: f64,
    /// Year in which the inverter is replaced.
    pub inverter_replacement_year: u32,
    /// Inverter replacement cost as a fraction of CAPEX.
    pub inverter_replacement_fraction: f64,
    /// IRR bisection parameters.
    pub irr: IrrSearch,
}

impl Default for FinanceConfig {
    fn default() -> Self {
        Self {
            horizon_years: 25,
            energy_inflation: 0.08,
            discount_rate: 0.10,
            maintenance_fraction: 0.005,
            inverter_replacement_year: 12,
            inverter_replacement_fraction: 0.15,
            irr: IrrSearch::default(),
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"sizing.depth_of_discharge"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    pub(crate) fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl Error for ConfigError {}

impl EngineConfig {
    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("config", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if the configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let s = &self.sizing;
        positive(&mut errors, "sizing.battery_unit_kwh", s.battery_unit_kwh);
        fraction(&mut errors, "sizing.depth_of_discharge", s.depth_of_discharge);
        positive(&mut errors, "sizing.module_power_wp", s.module_power_wp);
        fraction(&mut errors, "sizing.performance_factor", s.performance_factor);
        fraction(
            &mut errors,
            "sizing.net_compensation_factor",
            s.net_compensation_factor,
        );
        positive(&mut errors, "sizing.pv_inverter_ratio", s.pv_inverter_ratio);
        non_negative(&mut errors, "sizing.pv_inverter_min_kw", s.pv_inverter_min_kw);
        positive(&mut errors, "sizing.hybrid_pv_ratio", s.hybrid_pv_ratio);
        positive(
            &mut errors,
            "sizing.default_backup_load_kw",
            s.default_backup_load_kw,
        );

        let h = &self.heuristics;
        non_negative(
            &mut errors,
            "heuristics.estimate_load_multiplier",
            h.estimate_load_multiplier,
        );
        non_negative(
            &mut errors,
            "heuristics.off_grid_duty_cycle",
            h.off_grid_duty_cycle,
        );
        positive(
            &mut errors,
            "heuristics.metered_discharge_hours",
            h.metered_discharge_hours,
        );
        non_negative(
            &mut errors,
            "heuristics.replenishment_margin",
            h.replenishment_margin,
        );
        positive(&mut errors, "heuristics.days_per_month", h.days_per_month);

        let p = &self.pricing;
        non_negative(&mut errors, "pricing.pv_per_kwp", p.pv_per_kwp);
        non_negative(&mut errors, "pricing.pv_inverter_per_kw", p.pv_inverter_per_kw);
        non_negative(
            &mut errors,
            "pricing.hybrid_inverter_per_kw",
            p.hybrid_inverter_per_kw,
        );
        non_negative(&mut errors, "pricing.battery_per_kwh", p.battery_per_kwh);
        non_negative(&mut errors, "pricing.project_markup", p.project_markup);

        let f = &self.finance;
        if f.horizon_years == 0 || f.horizon_years > MAX_HORIZON_YEARS {
            errors.push(ConfigError::new(
                "finance.horizon_years",
                format!("must be in [1, {MAX_HORIZON_YEARS}]"),
            ));
        }
        if !f.energy_inflation.is_finite() || f.energy_inflation <= -1.0 {
            errors.push(ConfigError::new(
                "finance.energy_inflation",
                "must be finite and > -1.0",
            ));
        }
        if !f.discount_rate.is_finite() || f.discount_rate <= -1.0 {
            errors.push(ConfigError::new(
                "finance.discount_rate",
                "must be finite and > -1.0",
            ));
        }
        non_negative(
            &mut errors,
            "finance.maintenance_fraction",
            f.maintenance_fraction,
        );
        non_negative(
            &mut errors,
            "finance.inverter_replacement_fraction",
            f.inverter_replacement_fraction,
        );
        if f.irr.lower >= f.irr.upper {
            errors.push(ConfigError::new("finance.irr.lower", "must be < finance.irr.upper"));
        }
        if !(f.irr.lower..=f.irr.upper).contains(&f.irr.seed) {
            errors.push(ConfigError::new(
                "finance.irr.seed",
                "must lie within [finance.irr.lower, finance.irr.upper]",
            ));
        }
        positive(&mut errors, "finance.irr.tolerance", f.irr.tolerance);
        if f.irr.max_iterations > MAX_IRR_ITERATIONS {
            errors.push(ConfigError::new(
                "finance.irr.max_iterations",
                format!("must be <= {MAX_IRR_ITERATIONS}"),
            ));
        }

        positive(
            &mut errors,
            "irradiance.default_hsp",
            self.irradiance.default_hsp,
        );
        for (region, hsp) in &self.irradiance.regions {
            positive(&mut errors, &format!("irradiance.regions.{region}"), *hsp);
            if *region != region_key(region) {
                errors.push(ConfigError::new(
                    format!("irradiance.regions.{region}"),
                    "must be a trimmed upper-case region code",
                ));
            }
        }

        if self.inverter_catalog.is_empty() {
            errors.push(ConfigError::new("inverter_catalog", "must not be empty"));
        } else if !self.inverter_catalog.is_strictly_ascending() {
            errors.push(ConfigError::new(
                "inverter_catalog",
                "ratings must be positive and strictly ascending",
            ));
        }

        errors
    }
}

fn positive(errors: &mut Vec<ConfigError>, field: &str, value: f64) {
    if !(value.is_finite() && value > 0.0) {
        errors.push(ConfigError::new(field, "must be > 0"));
    }
}

fn non_negative(errors: &mut Vec<ConfigError>, field: &str, value: f64) {
    if !(value.is_finite() && value >= 0.0) {
        errors.push(ConfigError::new(field, "must be >= 0"));
    }
}

fn fraction(errors: &mut Vec<ConfigError>, field: &str, value: f64) {
    if !(value > 0.0 && value <= 1.0) {
        errors.push(ConfigError::new(field, "must be in (0.0, 1.0]"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_valid() {
        let errors = EngineConfig::default().validate();
        assert!(errors.is_empty(), "default config should be valid: {errors:?}");
    }

    #[test]
    fn empty_toml_is_default() {
        let cfg = EngineConfig::from_toml_str("").expect("empty TOML should parse");
        assert_eq!(cfg, EngineConfig::default());
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
inverter_catalog = [3.0, 5.0, 8.0, 10.0]

[sizing]
battery_unit_kwh = 10.0
depth_of_discharge = 0.9
module_power_wp = 550.0

[heuristics]
off_grid_duty_cycle = 0.4

[pricing]
pv_per_kwp = 2900.0
project_markup = 1.25

[finance]
horizon_years = 20
discount_rate = 0.12

[finance.irr]
max_iterations = 80

[irradiance]
default_hsp = 4.5

[irradiance.regions]
SP = 4.9
"#;
        let cfg = EngineConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.sizing.battery_unit_kwh), Some(10.0));
        assert_eq!(cfg.as_ref().map(|c| c.finance.horizon_years), Some(20));
        assert_eq!(cfg.as_ref().map(|c| c.finance.irr.max_iterations), Some(80));
        assert_eq!(cfg.as_ref().map(|c| c.finance.irr.seed), Some(0.10));
        assert_eq!(cfg.as_ref().map(|c| c.irradiance.hsp("SP")), Some(4.9));
        assert_eq!(cfg.as_ref().map(|c| c.irradiance.hsp("RJ")), Some(4.5));
        assert_eq!(
            cfg.as_ref().map(|c| c.inverter_catalog.ratings_kw().len()),
            Some(4)
        );
        assert!(cfg.map(|c| c.validate().is_empty()).unwrap_or(false));
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[pricing]
battery_per_kwh = 2500.0
"#;
        let cfg = EngineConfig::from_toml_str(toml).ok();
        // overridden
        assert_eq!(cfg.as_ref().map(|c| c.pricing.battery_per_kwh), Some(2500.0));
        // kept default
        assert_eq!(cfg.as_ref().map(|c| c.pricing.pv_per_kwp), Some(3200.0));
        assert_eq!(cfg.as_ref().map(|c| c.sizing.module_power_wp), Some(640.0));
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[sizing]
module_power_wp = 640.0
bogus_field = true
"#;
        assert!(EngineConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn validation_catches_zero_dod() {
        let mut cfg = EngineConfig::default();
        cfg.sizing.depth_of_discharge = 0.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "sizing.depth_of_discharge"));
    }

    #[test]
    fn validation_catches_unsorted_catalog() {
        let toml = "inverter_catalog = [5.0, 3.0, 8.0]";
        let cfg = EngineConfig::from_toml_str(toml).expect("TOML should parse");
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "inverter_catalog"));
    }

    #[test]
    fn validation_catches_empty_catalog() {
        let cfg = EngineConfig::from_toml_str("inverter_catalog = []").expect("TOML should parse");
        let errors = cfg.validate();
        assert!(
            errors
                .iter()
                .any(|e| e.field == "inverter_catalog" && e.message.contains("empty"))
        );
    }

    #[test]
    fn validation_catches_bad_irr_bracket() {
        let mut cfg = EngineConfig::default();
        cfg.finance.irr.lower = 0.5;
        cfg.finance.irr.upper = 0.2;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "finance.irr.lower"));
        assert!(errors.iter().any(|e| e.field == "finance.irr.seed"));
    }

    #[test]
    fn validation_reports_region_path() {
        let mut cfg = EngineConfig::default();
        cfg.irradiance.regions.insert("XX".to_string(), -1.0);
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "irradiance.regions.XX"));
    }

    #[test]
    fn lower_case_region_key_is_normalised() {
        let cfg = EngineConfig::from_toml_str("[irradiance.regions]\nsp = 3.0\n")
            .expect("TOML should parse");
        assert!(cfg.validate().is_empty());
        assert_eq!(cfg.irradiance.hsp("sp"), 3.0);
        assert_eq!(cfg.irradiance.hsp("SP"), 3.0);
    }

    #[test]
    fn validation_catches_unnormalised_region_key() {
        let mut cfg = EngineConfig::default();
        cfg.irradiance.regions.insert("sp".to_string(), 3.0);
        let errors = cfg.validate();
        assert!(
            errors
                .iter()
                .any(|e| e.field == "irradiance.regions.sp" && e.message.contains("upper-case"))
        );
    }

    #[test]
    fn validation_caps_unbounded_work() {
        let toml = r#"
[finance]
horizon_years = 4000000000

[finance.irr]
max_iterations = 4000000000
tolerance = 1e-300
"#;
        let cfg = EngineConfig::from_toml_str(toml).expect("TOML should parse");
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "finance.horizon_years"));
        assert!(errors.iter().any(|e| e.field == "finance.irr.max_iterations"));
    }

    #[test]
    fn validation_accepts_limits() {
        let mut cfg = EngineConfig::default();
        cfg.finance.horizon_years = MAX_HORIZON_YEARS;
        cfg.finance.irr.max_iterations = MAX_IRR_ITERATIONS;
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn config_error_display_includes_field() {
        let e = ConfigError::new("finance.horizon_years", "must be > 0");
        assert_eq!(
            e.to_string(),
            "config error: finance.horizon_years: must be > 0"
        );
    }
}
