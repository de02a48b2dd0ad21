//! Derived-metrics aggregation over the monthly rows
//!
//! Consumes the row sequence to produce the savings series, the
//! investment-track compounding, and the owner/household cash-flow vectors
//! feeding IRR and NPV.

use super::row::{InvestmentTrack, MonthlyRow, ScheduleResult};
use super::state::ScheduleState;
use crate::config::LoanConfiguration;
use crate::math::{
    amortized_payment, internal_rate_of_return, monthly_rate_from_annual_pct, net_present_value,
};

/// Initial guess handed to the IRR solver (periodic rate)
const IRR_INITIAL_GUESS: f64 = 0.05;

/// Assemble the final [`ScheduleResult`] from the emitted rows and the
/// end-of-run state
pub(super) fn derive(
    config: &LoanConfiguration,
    rows: Vec<MonthlyRow>,
    state: &ScheduleState,
) -> ScheduleResult {
    let monthly_savings = savings_series(config, &rows);
    let investment_tracks = compound_tracks(config, &monthly_savings);

    let owner_cashflows = cashflow_vector(config, &rows, |r| r.total_monthly);
    let household_cashflows = cashflow_vector(config, &rows, |r| r.household_monthly);

    let owner_irr = annualized_irr(&owner_cashflows);
    let household_irr = annualized_irr(&household_cashflows);
    let owner_npv = net_present_value(config.discount_rate_pct, &owner_cashflows);
    let household_npv = net_present_value(config.discount_rate_pct, &household_cashflows);

    ScheduleResult {
        rows,
        cumulative_bank_interest: state.cumulative_bank_interest,
        cumulative_family_interest: state.cumulative_family_interest,
        cumulative_reinvestment_earnings: state.cumulative_reinvestment_earnings,
        reinvestment_pot: state.reinvestment_pot,
        monthly_savings,
        investment_tracks,
        owner_irr,
        household_irr,
        owner_npv,
        household_npv,
    }
}

/// Per-month savings vs the full-bank-only baseline
///
/// The baseline is the level payment that would retire the entire bank-full
/// principal (price minus down, ignoring any family loan) at the nominal
/// bank rate over the full term — a fixed reference repeated every month,
/// never recomputed.
fn savings_series(config: &LoanConfiguration, rows: &[MonthlyRow]) -> Vec<f64> {
    let full_principal = (config.home_price - config.down_payment).max(0.0);
    let baseline =
        amortized_payment(full_principal, config.bank.annual_rate_pct, config.bank.term_months);

    rows.iter()
        .map(|r| (baseline - (r.bank_payment + r.family_payment)).max(0.0))
        .collect()
}

/// Compound the savings series through each configured investment track
fn compound_tracks(config: &LoanConfiguration, savings: &[f64]) -> Vec<InvestmentTrack> {
    let contributed: f64 = savings.iter().sum();

    config
        .investment_tracks
        .iter()
        .map(|spec| {
            let rate = monthly_rate_from_annual_pct(spec.annual_return_pct);
            let mut balance = 0.0;
            for &deposit in savings {
                balance = balance * (1.0 + rate) + deposit;
            }
            InvestmentTrack {
                label: spec.label.clone(),
                annual_return_pct: spec.annual_return_pct,
                final_balance: balance,
                profit: balance - contributed,
            }
        })
        .collect()
}

/// Cash-flow vector for IRR/NPV: upfront cash out at time zero, monthly
/// outflows after, with the final month's equity added back into the last
/// entry as a terminal liquidation value
fn cashflow_vector(
    config: &LoanConfiguration,
    rows: &[MonthlyRow],
    outflow: impl Fn(&MonthlyRow) -> f64,
) -> Vec<f64> {
    let mut cashflows = Vec::with_capacity(rows.len() + 1);
    cashflows.push(-config.upfront_cash());
    for row in rows {
        cashflows.push(-outflow(row));
    }
    if let (Some(last_row), Some(last_cf)) = (rows.last(), cashflows.last_mut()) {
        *last_cf += last_row.equity;
    }
    cashflows
}

/// Monthly IRR annualized via `(1 + monthly)^12 - 1`
fn annualized_irr(cashflows: &[f64]) -> f64 {
    let monthly = internal_rate_of_return(cashflows, IRR_INITIAL_GUESS);
    (1.0 + monthly).powi(12) - 1.0
}
