//! Equipment sizing: loads, battery bank, PV array, inverters and cost.
//!
//! Every function here is pure and total. Divisions go through
//! [`guarded_div`], so degenerate inputs produce zeros instead of NaN.

pub mod battery;
pub mod cost;
pub mod inverter;
pub mod load;
pub mod solar;

pub use battery::BatteryBank;
pub use load::{LoadAssessment, SizingBasis};
pub use solar::PvArray;

/// `numerator / denominator`, or `0.0` when the denominator is not positive
/// or the quotient is not finite.
pub(crate) fn guarded_div(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        let q = numerator / denominator;
        if q.is_finite() { q } else { 0.0 }
    } else {
        0.0
    }
}

/// `ceil(quantity / unit)` as a count, zero for non-positive quantities.
pub(crate) fn unit_count(quantity: f64, unit: f64) -> u32 {
    let units = guarded_div(quantity, unit).ceil();
    if units > 0.0 { units as u32 } else { 0 }
}
