//! Primary bank-loan terms

use serde::{Deserialize, Serialize};

/// How the bank loan amortizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanKind {
    /// Level payment for the whole term
    Fixed,
    /// Rate resets annually from an index forecast, bounded by caps
    Adjustable,
    /// Interest-only for a window, then level payment over the remainder
    InterestOnly,
}

impl Default for LoanKind {
    fn default() -> Self {
        LoanKind::Fixed
    }
}

/// Adjustable-rate parameters
///
/// The effective rate starts at the loan's nominal rate and resets on every
/// 12th-month boundary after month 1. Each reset targets `index forecast for
/// that reset year + margin`, with the change bounded by the first-reset cap
/// (reset 1) or the periodic cap (later resets), and the absolute rate never
/// exceeding `nominal + lifetime_cap_pct`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArmTerms {
    /// Margin added to the forecasted index, in percent
    pub margin_pct: f64,

    /// Maximum rate change at the first reset, in percentage points
    pub first_reset_cap_pct: f64,

    /// Maximum rate change at each subsequent reset, in percentage points
    pub periodic_cap_pct: f64,

    /// Maximum lifetime increase over the nominal starting rate
    pub lifetime_cap_pct: f64,

    /// Forecasted annual index values, one per reset year
    ///
    /// When the path is shorter than the loan, the last value is held
    /// constant for all remaining years. An empty path behaves as a
    /// constant zero index.
    pub index_forecast_pct: Vec<f64>,
}

impl Default for ArmTerms {
    fn default() -> Self {
        Self {
            margin_pct: 0.0,
            first_reset_cap_pct: 2.0,
            periodic_cap_pct: 2.0,
            lifetime_cap_pct: 5.0,
            index_forecast_pct: Vec::new(),
        }
    }
}

impl ArmTerms {
    /// Forecasted index for a 1-indexed reset year, holding the last
    /// available value once the path is exhausted
    pub fn index_for_reset(&self, reset_index: u32) -> f64 {
        if self.index_forecast_pct.is_empty() {
            return 0.0;
        }
        let idx = (reset_index as usize - 1).min(self.index_forecast_pct.len() - 1);
        self.index_forecast_pct[idx]
    }
}

/// Terms of the primary bank loan
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BankLoanTerms {
    /// Amortization style
    pub kind: LoanKind,

    /// Nominal annual rate, in percent
    pub annual_rate_pct: f64,

    /// Term in months
    pub term_months: u32,

    /// ARM parameters (only consulted when `kind` is `Adjustable`)
    pub arm: ArmTerms,

    /// Interest-only window length in months (only for `InterestOnly`)
    pub interest_only_months: u32,
}

impl Default for BankLoanTerms {
    fn default() -> Self {
        Self {
            kind: LoanKind::Fixed,
            annual_rate_pct: 0.0,
            term_months: 360,
            arm: ArmTerms::default(),
            interest_only_months: 0,
        }
    }
}
