//! Region and tariff directory interfaces.
//!
//! These lookups sit outside the dimensioning core: callers resolve a price
//! through a [`TariffDirectory`] and place it in the project input before the
//! engine runs. [`crate::tables::TariffTable`] is the bundled implementation.

use std::error::Error;
use std::fmt;

use serde::Serialize;

/// How specific a resolved tariff is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TariffSpecificity {
    /// The locality has its own distributor entry.
    Locality,
    /// The region's default distributor was used.
    RegionDefault,
}

/// A resolved distributor tariff.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TariffQuote {
    pub region: String,
    pub locality: Option<String>,
    pub distributor: String,
    pub price_per_kwh: f64,
    pub specificity: TariffSpecificity,
}

/// Failure of a directory lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupError {
    /// The region code is not known to the directory.
    UnknownRegion(String),
    /// The directory could not be reached or answered with garbage.
    Unavailable(String),
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownRegion(region) => write!(f, "unknown region \"{region}\""),
            Self::Unavailable(reason) => write!(f, "directory unavailable: {reason}"),
        }
    }
}

impl Error for LookupError {}

/// Lists the localities of a region.
pub trait RegionDirectory {
    /// Returns locality names for `region`, sorted alphabetically.
    ///
    /// # Errors
    ///
    /// Returns a [`LookupError`] if the region is unknown or the directory fails.
    fn localities(&self, region: &str) -> Result<Vec<String>, LookupError>;
}

/// Resolves the distributor and energy price for a region and locality.
pub trait TariffDirectory {
    /// Returns the tariff for `locality` in `region`.
    ///
    /// # Errors
    ///
    /// Returns a [`LookupError`] if the directory cannot answer.
    fn tariff(&self, region: &str, locality: Option<&str>) -> Result<TariffQuote, LookupError>;
}
