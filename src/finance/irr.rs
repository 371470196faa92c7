//! Discounting and internal-rate-of-return root finding.

use serde::{Deserialize, Serialize};

/// Bisection parameters for the IRR search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IrrSearch {
    /// Lower bound of the rate bracket.
    pub lower: f64,
    /// Upper bound of the rate bracket.
    pub upper: f64,
    /// First rate evaluated.
    pub seed: f64,
    /// Iteration cap.
    pub max_iterations: u32,
    /// Search stops once |NPV| drops below this (currency units).
    pub tolerance: f64,
}

impl Default for IrrSearch {
    fn default() -> Self {
        Self {
            lower: -1.0,
            upper: 1.0,
            seed: 0.10,
            max_iterations: 50,
            tolerance: 1.0,
        }
    }
}

/// Net present value of `flows` (index = period, index 0 undiscounted).
///
/// # Examples
///
/// ```
/// use pv_sizer::finance::irr::net_present_value;
///
/// let npv = net_present_value(&[-100.0, 110.0], 0.10);
/// assert!(npv.abs() < 1e-9);
/// ```
pub fn net_present_value(flows: &[f64], rate: f64) -> f64 {
    let factor = 1.0 + rate;
    flows
        .iter()
        .zip(0_i32..)
        .map(|(flow, t)| flow / factor.powi(t))
        .sum()
}

/// Finds the discount rate at which the NPV of `flows` is (close to) zero.
///
/// Bisects inside `[search.lower, search.upper]` starting from `search.seed`:
/// a positive NPV raises the lower bound, anything else lowers the upper bound.
/// Stops when |NPV| is below `search.tolerance` or the iteration cap is hit.
/// Returns the rate as a fraction; a non-finite result is reported as `0.0`.
pub fn internal_rate_of_return(flows: &[f64], search: &IrrSearch) -> f64 {
    let mut lower = search.lower;
    let mut upper = search.upper;
    let mut guess = search.seed;

    for _ in 0..search.max_iterations {
        let npv = net_present_value(flows, guess);
        if npv.abs() < search.tolerance {
            break;
        }
        if npv > 0.0 {
            lower = guess;
        } else {
            upper = guess;
        }
        guess = (lower + upper) / 2.0;
    }

    if guess.is_finite() { guess } else { 0.0 }
}
