use serde::{Deserialize, Serialize};

/// Built-in commercial inverter ratings in kW, ascending.
const BUILTIN_RATINGS_KW: &[f64] = &[
    3.0, 3.5, 3.6, 4.0, 4.6, 5.0, 6.0, 7.0, 7.5, 8.0, 8.2, 9.0, 10.0, 12.0, 15.0, 20.0, 25.0,
    30.0, 40.0, 50.0, 60.0, 75.0, 100.0,
];

/// Ascending list of commercially available inverter power ratings (kW).
///
/// Serialized as a bare array so it reads naturally in TOML:
/// `inverter_catalog = [3.0, 5.0, 8.0]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InverterCatalog {
    ratings_kw: Vec<f64>,
}

impl Default for InverterCatalog {
    fn default() -> Self {
        Self {
            ratings_kw: BUILTIN_RATINGS_KW.to_vec(),
        }
    }
}

impl InverterCatalog {
    /// Builds a catalog from arbitrary ratings, sorting them ascending and
    /// dropping duplicates and non-finite values.
    pub fn new(mut ratings_kw: Vec<f64>) -> Self {
        ratings_kw.retain(|kw| kw.is_finite());
        ratings_kw.sort_by(f64::total_cmp);
        ratings_kw.dedup();
        Self { ratings_kw }
    }

    /// All ratings in ascending order.
    pub fn ratings_kw(&self) -> &[f64] {
        &self.ratings_kw
    }

    pub fn is_empty(&self) -> bool {
        self.ratings_kw.is_empty()
    }

    /// Whether every rating is finite, positive and strictly greater than its predecessor.
    pub fn is_strictly_ascending(&self) -> bool {
        self.ratings_kw.iter().all(|kw| kw.is_finite() && *kw > 0.0)
            && self.ratings_kw.windows(2).all(|w| w[0] < w[1])
    }

    /// Smallest rating that is at least `kw`.
    pub fn smallest_at_least(&self, kw: f64) -> Option<f64> {
        self.ratings_kw.iter().copied().find(|&rating| rating >= kw)
    }

    /// Ratings at least `kw`, ascending.
    pub fn at_least(&self, kw: f64) -> impl Iterator<Item = f64> + '_ {
        self.ratings_kw.iter().copied().filter(move |&rating| rating >= kw)
    }

    pub fn largest(&self) -> Option<f64> {
        self.ratings_kw.last().copied()
    }
}
