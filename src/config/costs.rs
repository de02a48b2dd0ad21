//! Recurring ownership costs, PMI rule, and prepayment plan

use serde::{Deserialize, Serialize};

/// Recurring cost assumptions
///
/// Property tax and insurance drift by compounding their annual inflation
/// rates once per completed simulation year; HOA, maintenance, and
/// utilities are flat.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecurringCosts {
    /// Annual property-tax rate as a percent of home price
    pub property_tax_rate_pct: f64,

    /// Annual drift applied to the property-tax amount, as a decimal
    pub property_tax_annual_drift: f64,

    /// Annual insurance premium in dollars
    pub insurance_annual: f64,

    /// Annual drift applied to insurance, as a decimal
    pub insurance_annual_drift: f64,

    /// Monthly HOA dues
    pub hoa_monthly: f64,

    /// Annual maintenance as a percent of home price
    pub maintenance_rate_pct: f64,

    /// Monthly utilities
    pub utilities_monthly: f64,

    /// Whether tax and insurance are escrowed into the monthly outflow
    pub escrow_enabled: bool,
}

impl Default for RecurringCosts {
    fn default() -> Self {
        Self {
            property_tax_rate_pct: 0.0,
            property_tax_annual_drift: 0.0,
            insurance_annual: 0.0,
            insurance_annual_drift: 0.0,
            hoa_monthly: 0.0,
            maintenance_rate_pct: 0.0,
            utilities_monthly: 0.0,
            escrow_enabled: false,
        }
    }
}

/// PMI rule
///
/// PMI applies only when enabled and the initial loan-to-value exceeds 80%.
/// The monthly charge is fixed at setup from the initial balance; it drops
/// permanently once LTV reaches the drop threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PmiRule {
    /// Whether PMI is modeled at all
    pub enabled: bool,

    /// LTV at or below which PMI deactivates (0.78 = 78%)
    pub drop_ltv: f64,

    /// Annual PMI rate as a percent of the initial balance
    pub annual_rate_pct: f64,
}

impl Default for PmiRule {
    fn default() -> Self {
        Self {
            enabled: false,
            drop_ltv: 0.78,
            annual_rate_pct: 0.0,
        }
    }
}

/// A one-off extra principal payment tagged to a month index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LumpSum {
    /// 1-indexed simulation month the payment lands in
    pub month: u32,

    /// Extra principal applied that month
    pub amount: f64,
}

/// Prepayment plan for the bank loan
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PrepaymentPlan {
    /// Flat extra principal paid every month
    pub monthly_extra: f64,

    /// One-off lump sums by month index
    pub lump_sums: Vec<LumpSum>,
}

impl PrepaymentPlan {
    /// Total prepayment landing in a given 1-indexed month
    pub fn amount_for_month(&self, month: u32) -> f64 {
        let lumps: f64 = self
            .lump_sums
            .iter()
            .filter(|ls| ls.month == month)
            .map(|ls| ls.amount)
            .sum();
        self.monthly_extra + lumps
    }
}
