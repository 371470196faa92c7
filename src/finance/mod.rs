//! Financial projection of a sized system over its service life.

pub mod cash_flow;
pub mod irr;

pub use cash_flow::{FinancialReport, YearCashFlow};
