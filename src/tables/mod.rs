//! Bundled static lookup tables: irradiance, tariffs and the inverter catalog.

use std::collections::BTreeMap;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

/// Commercial inverter power ratings.
pub mod inverter;
/// Peak sun hours per region.
pub mod irradiance;
/// Distributor tariffs per region and locality.
pub mod tariff;

pub use inverter::InverterCatalog;
pub use irradiance::IrradianceTable;
pub use tariff::{Tariff, TariffTable};

/// Region key of the mandatory default entry used for unknown regions.
pub const DEFAULT_REGION: &str = "PADRAO";

/// Normalises a region code for table lookups (trimmed, upper-case).
pub(crate) fn region_key(region: &str) -> String {
    region.trim().to_ascii_uppercase()
}

/// Deserializes a region-keyed map, normalising every key with [`region_key`].
///
/// Two keys that normalise to the same code (`sp` and `SP`) are rejected.
pub(crate) fn deserialize_region_map<'de, D, V>(
    deserializer: D,
) -> Result<BTreeMap<String, V>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    let raw = BTreeMap::<String, V>::deserialize(deserializer)?;
    let mut regions = BTreeMap::new();
    for (code, value) in raw {
        let key = region_key(&code);
        if regions.insert(key.clone(), value).is_some() {
            return Err(D::Error::custom(format!("duplicate region \"{key}\"")));
        }
    }
    Ok(regions)
}
