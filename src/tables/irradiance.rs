use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{deserialize_region_map, region_key};

/// Built-in average peak sun hours by region code.
const BUILTIN_HSP: &[(&str, f64)] = &[
    ("AC", 4.9),
    ("AL", 5.3),
    ("AM", 4.6),
    ("AP", 4.7),
    ("BA", 5.6),
    ("CE", 5.7),
    ("DF", 5.2),
    ("ES", 4.9),
    ("GO", 5.3),
    ("MA", 5.4),
    ("MG", 5.1),
    ("MS", 5.0),
    ("MT", 5.1),
    ("PA", 4.8),
    ("PB", 5.6),
    ("PE", 5.5),
    ("PI", 5.8),
    ("PR", 4.5),
    ("RJ", 4.8),
    ("RN", 5.9),
    ("RO", 4.6),
    ("RR", 4.9),
    ("RS", 4.3),
    ("SC", 4.4),
    ("SE", 5.3),
    ("SP", 4.7),
    ("TO", 5.2),
];

/// Irradiance used for any region missing from the table.
const DEFAULT_HSP: f64 = 5.0;

/// Mapping of region code to average daily peak sun hours (HSP).
///
/// Lookups never fail: unknown regions resolve to `default_hsp`.
///
/// # Examples
///
/// ```
/// use pv_sizer::tables::IrradianceTable;
///
/// let table = IrradianceTable::default();
/// assert_eq!(table.hsp("SP"), 4.7);
/// assert_eq!(table.hsp("nowhere"), 5.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IrradianceTable {
    /// HSP for regions without an explicit entry.
    pub default_hsp: f64,
    /// Per-region HSP keyed by upper-case region code.
    #[serde(deserialize_with = "deserialize_region_map")]
    pub regions: BTreeMap<String, f64>,
}

impl Default for IrradianceTable {
    fn default() -> Self {
        Self {
            default_hsp: DEFAULT_HSP,
            regions: BUILTIN_HSP
                .iter()
                .map(|&(code, hsp)| (code.to_string(), hsp))
                .collect(),
        }
    }
}

impl IrradianceTable {
    /// Returns the HSP for `region`, falling back to the default entry.
    pub fn hsp(&self, region: &str) -> f64 {
        self.regions
            .get(&region_key(region))
            .copied()
            .unwrap_or(self.default_hsp)
    }

    /// Whether `region` has its own entry.
    pub fn contains(&self, region: &str) -> bool {
        self.regions.contains_key(&region_key(region))
    }
}
