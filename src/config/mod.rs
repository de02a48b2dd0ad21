//! Loan and cost configuration
//!
//! A [`LoanConfiguration`] is the single immutable input to a schedule run.
//! Every optional group (ARM terms, family loan, PMI, prepayments) is a
//! concrete struct with neutral defaults, so a minimal configuration — just
//! a price, a down payment, and bank terms — always works.

mod bank;
mod costs;
mod family;

pub use bank::{ArmTerms, BankLoanTerms, LoanKind};
pub use costs::{LumpSum, PmiRule, PrepaymentPlan, RecurringCosts};
pub use family::{FamilyAmortization, FamilyLoanTerms};

use serde::{Deserialize, Serialize};

/// Hard ceiling on simulated months (60 years)
pub const MAX_SCHEDULE_MONTHS: u32 = 720;

/// A named investment track for the savings comparison
///
/// Each track compounds the monthly-savings series at its own fixed annual
/// return.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestmentTrackSpec {
    /// Display label, e.g. "Index fund"
    pub label: String,

    /// Annual return, in percent
    pub annual_return_pct: f64,
}

/// Complete input for one schedule run
///
/// Supplied wholesale and never mutated; the engine recomputes everything
/// deterministically from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoanConfiguration {
    /// Purchase price of the home
    pub home_price: f64,

    /// Down payment at closing
    pub down_payment: f64,

    /// Primary bank-loan terms
    pub bank: BankLoanTerms,

    /// Points paid at closing, as a percent of the bank principal
    pub points_pct: f64,

    /// Closing costs in dollars
    pub closing_costs: f64,

    /// Optional family loan; `None` means bank-only financing
    pub family: Option<FamilyLoanTerms>,

    /// Recurring ownership costs
    pub costs: RecurringCosts,

    /// PMI rule
    pub pmi: PmiRule,

    /// Prepayment plan for the bank loan
    pub prepayments: PrepaymentPlan,

    /// Projection horizon in years (capped at 60)
    pub horizon_years: u32,

    /// Annual discount rate for NPV, in percent
    pub discount_rate_pct: f64,

    /// Investment tracks for compounding the monthly-savings series
    pub investment_tracks: Vec<InvestmentTrackSpec>,
}

impl Default for LoanConfiguration {
    fn default() -> Self {
        Self {
            home_price: 0.0,
            down_payment: 0.0,
            bank: BankLoanTerms::default(),
            points_pct: 0.0,
            closing_costs: 0.0,
            family: None,
            costs: RecurringCosts::default(),
            pmi: PmiRule::default(),
            prepayments: PrepaymentPlan::default(),
            horizon_years: 30,
            discount_rate_pct: 0.0,
            investment_tracks: Vec::new(),
        }
    }
}

impl LoanConfiguration {
    /// Bank principal: price minus down payment, minus any family principal
    pub fn bank_principal(&self) -> f64 {
        let family = self.family_principal();
        (self.home_price - self.down_payment - family).max(0.0)
    }

    /// Family principal, zero when no family loan is configured
    pub fn family_principal(&self) -> f64 {
        self.family
            .as_ref()
            .filter(|f| f.is_active())
            .map(|f| f.principal)
            .unwrap_or(0.0)
    }

    /// Dollar cost of points at closing
    pub fn points_cost(&self) -> f64 {
        self.bank_principal() * self.points_pct / 100.0
    }

    /// Cash due at closing: down payment, closing costs, and points
    pub fn upfront_cash(&self) -> f64 {
        self.down_payment + self.closing_costs + self.points_cost()
    }

    /// Number of rows a run of this configuration produces
    pub fn schedule_months(&self) -> u32 {
        (self.horizon_years * 12).min(MAX_SCHEDULE_MONTHS)
    }
}
