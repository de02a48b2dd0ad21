//! Intra-family loan terms
//!
//! The family leg models a below-market loan from relatives that displaces
//! part of the bank principal, plus the investment assumptions needed to
//! price the family's opportunity cost of lending.

use serde::{Deserialize, Serialize};

/// How the family loan repays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FamilyAmortization {
    /// Level payment over the family term
    Amortized,
    /// Interest payments only; principal never reduces within the run
    InterestOnly,
}

impl Default for FamilyAmortization {
    fn default() -> Self {
        FamilyAmortization::Amortized
    }
}

/// Terms of the optional family loan
///
/// The default is a zero-principal loan, which leaves the family leg
/// entirely inactive.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FamilyLoanTerms {
    /// Amount lent by the family
    pub principal: f64,

    /// Annual rate charged on the family loan, in percent
    pub annual_rate_pct: f64,

    /// Term in months
    pub term_months: u32,

    /// Repayment mode
    pub amortization: FamilyAmortization,

    /// Annual return the family would otherwise earn on the lent capital,
    /// in percent
    pub alternative_return_pct: f64,

    /// Tax rate applied to the alternative return, as a decimal (0.25 = 25%)
    pub alternative_return_tax_rate: f64,

    /// Annual return the family earns reinvesting payments received, in
    /// percent
    pub reinvestment_return_pct: f64,
}

impl Default for FamilyLoanTerms {
    fn default() -> Self {
        Self {
            principal: 0.0,
            annual_rate_pct: 0.0,
            term_months: 360,
            amortization: FamilyAmortization::Amortized,
            alternative_return_pct: 0.0,
            alternative_return_tax_rate: 0.0,
            reinvestment_return_pct: 0.0,
        }
    }
}

impl FamilyLoanTerms {
    /// Whether this family leg contributes anything to the run
    pub fn is_active(&self) -> bool {
        self.principal > 0.0
    }
}
