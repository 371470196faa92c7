//! Yearly cash-flow projection and the indicators derived from it.

use serde::Serialize;

use super::irr::{internal_rate_of_return, net_present_value};
use crate::config::FinanceConfig;
use crate::sizing::guarded_div;

/// One row of the projected cash-flow table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearCashFlow {
    /// Year index; 0 is the investment.
    pub year: u32,
    /// Savings after energy inflation.
    pub inflated_savings: f64,
    /// Operation and maintenance cost.
    pub maintenance: f64,
    /// Inverter replacement cost.
    pub inverter_replacement: f64,
    /// Net flow of the year (`-capex` for year 0).
    pub net_flow: f64,
    /// Running sum of net flows.
    pub cumulative: f64,
}

/// Investment indicators over the projection horizon.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialReport {
    /// Net present value at the configured discount rate.
    pub npv: f64,
    /// Internal rate of return (%).
    pub irr_pct: f64,
    /// Years until the cumulative cash flow turns non-negative.
    pub payback_years: f64,
    /// Sum of inflated savings forgone by not investing.
    pub inertia_cost: f64,
    /// Cumulative cash flow, year 0 to horizon.
    pub cumulative_cash_flow: Vec<f64>,
    /// Levelized cost of energy per kWh.
    pub lcoe: f64,
    /// Per-year breakdown, year 0 to horizon. Empty for the degenerate case.
    pub years: Vec<YearCashFlow>,
}

impl FinancialReport {
    /// Report for projects with no investment or no savings.
    pub fn zero() -> Self {
        Self {
            npv: 0.0,
            irr_pct: 0.0,
            payback_years: 0.0,
            inertia_cost: 0.0,
            cumulative_cash_flow: vec![0.0],
            lcoe: 0.0,
            years: Vec::new(),
        }
    }

    /// Projects the investment over `config.horizon_years`.
    ///
    /// Savings grow with energy inflation from year 1. Maintenance is charged
    /// from year 2 and the inverter is replaced once in
    /// `config.inverter_replacement_year`. Payback is interpolated inside the
    /// year the cumulative flow crosses zero and is the horizon when it never
    /// does. LCOE spreads lifetime cost over the energy implied by the savings
    /// and `net_compensation_factor`.
    ///
    /// # Arguments
    ///
    /// * `capex` - Installed project cost
    /// * `monthly_savings` - First-year monthly savings
    /// * `config` - Projection parameters
    /// * `net_compensation_factor` - Share of the bill offset by net metering
    ///
    /// # Returns
    ///
    /// [`FinancialReport::zero`] if `capex` or `monthly_savings` is not positive.
    pub fn project(
        capex: f64,
        monthly_savings: f64,
        config: &FinanceConfig,
        net_compensation_factor: f64,
    ) -> Self {
        if !(capex > 0.0 && capex.is_finite() && monthly_savings > 0.0 && monthly_savings.is_finite())
        {
            return Self::zero();
        }

        let horizon = config.horizon_years;
        let annual_savings = monthly_savings * 12.0;

        let mut years = Vec::with_capacity(horizon as usize + 1);
        years.push(YearCashFlow {
            year: 0,
            inflated_savings: 0.0,
            maintenance: 0.0,
            inverter_replacement: 0.0,
            net_flow: -capex,
            cumulative: -capex,
        });

        let mut cumulative = -capex;
        let mut inertia_cost = 0.0;
        let mut payback = None;

        for year in 1..=horizon {
            let inflated_savings =
                annual_savings * (1.0 + config.energy_inflation).powi(year as i32 - 1);
            let maintenance = if year > 1 {
                capex * config.maintenance_fraction
            } else {
                0.0
            };
            let inverter_replacement = if year == config.inverter_replacement_year {
                capex * config.inverter_replacement_fraction
            } else {
                0.0
            };
            let net_flow = inflated_savings - maintenance - inverter_replacement;

            let previous = cumulative;
            cumulative += net_flow;
            inertia_cost += inflated_savings;

            if payback.is_none() && cumulative >= 0.0 {
                payback = Some(f64::from(year - 1) + guarded_div(previous.abs(), net_flow));
            }

            years.push(YearCashFlow {
                year,
                inflated_savings,
                maintenance,
                inverter_replacement,
                net_flow,
                cumulative,
            });
        }

        let horizon_f = f64::from(horizon);
        let payback_years = payback.unwrap_or(horizon_f).clamp(0.0, horizon_f);

        let flows: Vec<f64> = years.iter().map(|y| y.net_flow).collect();
        let npv = finite_or_zero(net_present_value(&flows, config.discount_rate));
        let irr_pct = finite_or_zero(internal_rate_of_return(&flows, &config.irr) * 100.0);

        let lifetime_energy_kwh =
            guarded_div(monthly_savings, net_compensation_factor) * 12.0 * horizon_f;
        let replacements = if (1..=horizon).contains(&config.inverter_replacement_year) {
            capex * config.inverter_replacement_fraction
        } else {
            0.0
        };
        let lifetime_cost = capex
            + capex * config.maintenance_fraction * f64::from(horizon.saturating_sub(1))
            + replacements;
        let lcoe = guarded_div(lifetime_cost, lifetime_energy_kwh);

        tracing::debug!(capex, npv, irr_pct, payback_years, "financial projection complete");

        Self {
            npv,
            irr_pct,
            payback_years,
            inertia_cost: finite_or_zero(inertia_cost),
            cumulative_cash_flow: years.iter().map(|y| y.cumulative).collect(),
            lcoe,
            years,
        }
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}
