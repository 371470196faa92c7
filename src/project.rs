//! Project input: topology, consumption, loads and tariff for one calculation.
//!
//! Inputs are read from TOML project files or built-in presets and are never
//! mutated by the engine.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::directory::TariffDirectory;
use crate::tables::DEFAULT_REGION;

/// Electrical topology of the installation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemTopology {
    /// PV with net metering, no storage.
    GridTied,
    /// PV plus battery backup, still grid connected.
    Hybrid,
    /// Standalone PV plus battery.
    OffGrid,
}

impl SystemTopology {
    /// Whether the topology includes a battery bank.
    pub fn stores_energy(self) -> bool {
        matches!(self, Self::Hybrid | Self::OffGrid)
    }
}

impl fmt::Display for SystemTopology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::GridTied => "grid-tied",
            Self::Hybrid => "hybrid",
            Self::OffGrid => "off-grid",
        })
    }
}

/// Electrical service configuration of the site.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoltageClass {
    #[serde(rename = "127V")]
    Mono127,
    #[default]
    #[serde(rename = "220V")]
    Mono220,
    #[serde(rename = "220V-3P")]
    Tri220,
    #[serde(rename = "380V")]
    Tri380,
}

/// Declared nominal loads per voltage class, in watts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NominalLoads {
    /// 127 V loads (W).
    pub low_voltage_w: f64,
    /// 220 V loads (W).
    pub mid_voltage_w: f64,
    /// 380 V loads (W).
    pub high_voltage_w: f64,
}

impl NominalLoads {
    pub fn total_w(&self) -> f64 {
        self.low_voltage_w + self.mid_voltage_w + self.high_voltage_w
    }

    pub fn is_empty(&self) -> bool {
        self.low_voltage_w <= 0.0 && self.mid_voltage_w <= 0.0 && self.high_voltage_w <= 0.0
    }
}

/// How the backup/off-grid load is described.
///
/// # Examples
///
/// ```
/// use pv_sizer::project::{LoadProfile, NominalLoads, SystemTopology};
///
/// // Off-grid with a meter reading and no declared loads sizes from the meter.
/// let profile = LoadProfile::from_form(NominalLoads::default(), 300.0, Some(SystemTopology::OffGrid));
/// assert_eq!(profile, LoadProfile::Metered { monthly_kwh: 300.0 });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum LoadProfile {
    /// Size from declared device loads.
    Nominal(NominalLoads),
    /// Size from metered monthly consumption.
    Metered { monthly_kwh: f64 },
}

impl Default for LoadProfile {
    fn default() -> Self {
        Self::Nominal(NominalLoads::default())
    }
}

impl LoadProfile {
    /// Builds a profile from flat form fields.
    ///
    /// Metered sizing is chosen only for off-grid systems with a positive meter
    /// reading and no declared loads; everything else is load-based.
    pub fn from_form(
        loads: NominalLoads,
        metered_monthly_kwh: f64,
        topology: Option<SystemTopology>,
    ) -> Self {
        if topology == Some(SystemTopology::OffGrid) && metered_monthly_kwh > 0.0 && loads.is_empty()
        {
            Self::Metered {
                monthly_kwh: metered_monthly_kwh,
            }
        } else {
            Self::Nominal(loads)
        }
    }

    /// Declared loads, zero for metered profiles.
    pub fn nominal_loads(&self) -> NominalLoads {
        match self {
            Self::Nominal(loads) => *loads,
            Self::Metered { .. } => NominalLoads::default(),
        }
    }
}

/// Inputs of one dimensioning calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectInput {
    /// System topology; `None` means nothing is sized.
    pub topology: Option<SystemTopology>,
    /// Average monthly consumption (kWh).
    pub monthly_consumption_kwh: f64,
    /// Desired backup autonomy (h).
    pub backup_hours: f64,
    /// Load description for battery sizing.
    pub load_profile: LoadProfile,
    /// Share of nominal load active at once (%).
    pub simultaneity_pct: f64,
    /// Electrical service configuration.
    pub voltage_class: VoltageClass,
    /// Zero-export operation requested. Reported only.
    pub anti_export_enabled: bool,
    /// Region code for irradiance and tariff lookups.
    pub region: String,
    /// Locality used for tariff resolution.
    pub locality: Option<String>,
    /// Energy price per kWh; resolved from the tariff directory when absent.
    pub energy_price_per_kwh: Option<f64>,
}

impl Default for ProjectInput {
    fn default() -> Self {
        Self {
            topology: None,
            monthly_consumption_kwh: 0.0,
            backup_hours: 4.0,
            load_profile: LoadProfile::default(),
            simultaneity_pct: 70.0,
            voltage_class: VoltageClass::default(),
            anti_export_enabled: false,
            region: DEFAULT_REGION.to_string(),
            locality: None,
            energy_price_per_kwh: None,
        }
    }
}

impl ProjectInput {
    /// Grid-tied home: 500 kWh/month at the default region and tariff.
    pub fn grid_tied_home() -> Self {
        Self {
            topology: Some(SystemTopology::GridTied),
            monthly_consumption_kwh: 500.0,
            energy_price_per_kwh: Some(0.90),
            ..Self::default()
        }
    }

    /// Hybrid backup without device detail: loads estimated from consumption.
    pub fn hybrid_backup() -> Self {
        Self {
            topology: Some(SystemTopology::Hybrid),
            monthly_consumption_kwh: 600.0,
            backup_hours: 4.0,
            simultaneity_pct: 70.0,
            region: "SP".to_string(),
            locality: Some("Campinas".to_string()),
            energy_price_per_kwh: Some(0.96),
            ..Self::default()
        }
    }

    /// Off-grid cabin sized from a 300 kWh/month meter reading.
    pub fn off_grid_cabin() -> Self {
        Self {
            topology: Some(SystemTopology::OffGrid),
            load_profile: LoadProfile::Metered { monthly_kwh: 300.0 },
            region: "MG".to_string(),
            energy_price_per_kwh: Some(0.98),
            ..Self::default()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["grid_tied_home", "hybrid_backup", "off_grid_cabin"];

    /// Loads a project from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "grid_tied_home" => Ok(Self::grid_tied_home()),
            "hybrid_backup" => Ok(Self::hybrid_backup()),
            "off_grid_cabin" => Ok(Self::off_grid_cabin()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a project from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("project", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a project from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Fills in a missing energy price from `directory`.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the price is missing and the lookup fails.
    pub fn with_resolved_price(
        mut self,
        directory: &dyn TariffDirectory,
    ) -> Result<Self, ConfigError> {
        if self.energy_price_per_kwh.is_none() {
            let quote = directory
                .tariff(&self.region, self.locality.as_deref())
                .map_err(|e| ConfigError::new("energy_price_per_kwh", e.to_string()))?;
            tracing::info!(
                region = %quote.region,
                distributor = %quote.distributor,
                price = quote.price_per_kwh,
                specificity = ?quote.specificity,
                "resolved energy price"
            );
            self.energy_price_per_kwh = Some(quote.price_per_kwh);
        }
        Ok(self)
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// The engine itself tolerates every input; this is for front ends that
    /// want to reject bad projects before computing.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.topology.is_none() {
            errors.push(ConfigError::new("topology", "must be set"));
        }
        let mut non_negative = |field: &str, value: f64| {
            if !(value.is_finite() && value >= 0.0) {
                errors.push(ConfigError::new(field, "must be a finite number >= 0"));
            }
        };
        non_negative("monthly_consumption_kwh", self.monthly_consumption_kwh);
        non_negative("backup_hours", self.backup_hours);
        match self.load_profile {
            LoadProfile::Nominal(loads) => {
                non_negative("load_profile.low_voltage_w", loads.low_voltage_w);
                non_negative("load_profile.mid_voltage_w", loads.mid_voltage_w);
                non_negative("load_profile.high_voltage_w", loads.high_voltage_w);
            }
            LoadProfile::Metered { monthly_kwh } => {
                non_negative("load_profile.monthly_kwh", monthly_kwh);
            }
        }
        if let Some(price) = self.energy_price_per_kwh {
            non_negative("energy_price_per_kwh", price);
        }
        if !(0.0..=100.0).contains(&self.simultaneity_pct) {
            errors.push(ConfigError::new("simultaneity_pct", "must be in [0, 100]"));
        }
        if self.region.trim().is_empty() {
            errors.push(ConfigError::new("region", "must not be empty"));
        }

        errors
    }

    /// Returns a copy with every numeric field clamped into its valid range.
    ///
    /// Negative and non-finite values become zero and the simultaneity factor
    /// is clamped to `[0, 100]`.
    pub(crate) fn normalized(&self) -> Self {
        let mut out = self.clone();
        out.monthly_consumption_kwh = clamp_non_negative("monthly_consumption_kwh", out.monthly_consumption_kwh);
        out.backup_hours = clamp_non_negative("backup_hours", out.backup_hours);
        out.load_profile = match out.load_profile {
            LoadProfile::Nominal(loads) => LoadProfile::Nominal(NominalLoads {
                low_voltage_w: clamp_non_negative("low_voltage_w", loads.low_voltage_w),
                mid_voltage_w: clamp_non_negative("mid_voltage_w", loads.mid_voltage_w),
                high_voltage_w: clamp_non_negative("high_voltage_w", loads.high_voltage_w),
            }),
            LoadProfile::Metered { monthly_kwh } => LoadProfile::Metered {
                monthly_kwh: clamp_non_negative("metered monthly_kwh", monthly_kwh),
            },
        };
        let pct = if out.simultaneity_pct.is_finite() {
            out.simultaneity_pct.clamp(0.0, 100.0)
        } else {
            0.0
        };
        if pct != out.simultaneity_pct {
            tracing::warn!(value = out.simultaneity_pct, clamped = pct, "simultaneity_pct out of range");
        }
        out.simultaneity_pct = pct;
        out.energy_price_per_kwh = Some(clamp_non_negative(
            "energy_price_per_kwh",
            out.energy_price_per_kwh.unwrap_or(0.0),
        ));
        out
    }

    /// Normalised energy price; zero when unset.
    pub fn price_per_kwh(&self) -> f64 {
        self.energy_price_per_kwh
            .filter(|p| p.is_finite() && *p > 0.0)
            .unwrap_or(0.0)
    }
}

fn clamp_non_negative(field: &str, value: f64) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        tracing::warn!(field, value, "invalid input replaced with 0");
        0.0
    }
}
