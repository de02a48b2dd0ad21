//! Month-to-month simulation state
//!
//! An explicit state record carried through the loop in
//! [`builder`](super::builder); nothing here is rounded — full precision is
//! kept between months and rows are rounded only at emission.

use crate::config::{LoanConfiguration, LoanKind};
use crate::math::{amortized_payment, monthly_rate_from_annual_pct};

/// Mutable state advanced one month at a time by the schedule builder
#[derive(Debug, Clone)]
pub struct ScheduleState {
    /// Outstanding bank balance
    pub bank_balance: f64,

    /// Outstanding family balance
    pub family_balance: f64,

    /// Current effective bank rate in percent (moves only for ARMs)
    pub effective_rate_pct: f64,

    /// Current bank payment; re-derived on ARM resets and at the end of an
    /// interest-only window
    pub bank_payment: f64,

    /// Level family payment (amortized mode)
    pub family_payment: f64,

    /// Whether PMI is still charging
    pub pmi_active: bool,

    /// Fixed monthly PMI charge while active
    pub pmi_monthly: f64,

    /// Running total of bank interest paid
    pub cumulative_bank_interest: f64,

    /// Running total of family interest paid
    pub cumulative_family_interest: f64,

    /// Running total of interest earned in the reinvestment pot
    pub cumulative_reinvestment_earnings: f64,

    /// Balance of the family's reinvestment pot
    pub reinvestment_pot: f64,
}

impl ScheduleState {
    /// Initialize state from a configuration at month 0
    pub fn from_config(config: &LoanConfiguration) -> Self {
        let bank_principal = config.bank_principal();
        let family_principal = config.family_principal();

        let bank_payment = match config.bank.kind {
            LoanKind::Fixed | LoanKind::Adjustable => {
                amortized_payment(bank_principal, config.bank.annual_rate_pct, config.bank.term_months)
            }
            // Payment inside the IO window is recomputed from the balance
            // each month; the post-window level payment is derived at the
            // transition
            LoanKind::InterestOnly => {
                bank_principal * monthly_rate_from_annual_pct(config.bank.annual_rate_pct)
            }
        };

        let family_payment = config
            .family
            .as_ref()
            .filter(|f| f.is_active())
            .map(|f| amortized_payment(f.principal, f.annual_rate_pct, f.term_months))
            .unwrap_or(0.0);

        // PMI base amount is fixed once at setup: enabled and initial LTV
        // above 80%, charged on the initial balance
        let initial_ltv = if config.home_price > 0.0 {
            bank_principal / config.home_price
        } else {
            0.0
        };
        let pmi_applies = config.pmi.enabled && initial_ltv > 0.8;
        let pmi_monthly = if pmi_applies {
            bank_principal * config.pmi.annual_rate_pct / 100.0 / 12.0
        } else {
            0.0
        };

        Self {
            bank_balance: bank_principal,
            family_balance: family_principal,
            effective_rate_pct: config.bank.annual_rate_pct,
            bank_payment,
            family_payment,
            pmi_active: pmi_applies,
            pmi_monthly,
            cumulative_bank_interest: 0.0,
            cumulative_family_interest: 0.0,
            cumulative_reinvestment_earnings: 0.0,
            reinvestment_pot: 0.0,
        }
    }

    /// Deactivate PMI permanently once LTV reaches the drop threshold or
    /// the balance is gone
    pub fn update_pmi(&mut self, home_price: f64, drop_ltv: f64) {
        if !self.pmi_active {
            return;
        }
        if self.bank_balance <= 0.0 || (home_price > 0.0 && self.bank_balance / home_price <= drop_ltv) {
            self.pmi_active = false;
        }
    }

    /// PMI charge for the current month
    pub fn pmi_charge(&self) -> f64 {
        if self.pmi_active {
            self.pmi_monthly
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PmiRule;
    use approx::assert_relative_eq;

    #[test]
    fn test_initial_state_fixed_loan() {
        let config = LoanConfiguration {
            home_price: 1_000_000.0,
            down_payment: 200_000.0,
            bank: crate::config::BankLoanTerms {
                annual_rate_pct: 6.3,
                term_months: 360,
                ..Default::default()
            },
            ..Default::default()
        };

        let state = ScheduleState::from_config(&config);
        assert_eq!(state.bank_balance, 800_000.0);
        assert_eq!(state.family_balance, 0.0);
        assert_relative_eq!(state.bank_payment, 4951.78, epsilon = 0.01);
        assert!(!state.pmi_active);
    }

    #[test]
    fn test_pmi_requires_high_ltv() {
        // 20% down puts initial LTV at exactly 0.8, not above it
        let mut config = LoanConfiguration {
            home_price: 500_000.0,
            down_payment: 100_000.0,
            pmi: PmiRule {
                enabled: true,
                drop_ltv: 0.78,
                annual_rate_pct: 0.5,
            },
            ..Default::default()
        };
        let state = ScheduleState::from_config(&config);
        assert!(!state.pmi_active);

        // 10% down exceeds it
        config.down_payment = 50_000.0;
        let state = ScheduleState::from_config(&config);
        assert!(state.pmi_active);
        assert_relative_eq!(state.pmi_monthly, 450_000.0 * 0.005 / 12.0);
    }

    #[test]
    fn test_pmi_never_reactivates() {
        let config = LoanConfiguration {
            home_price: 500_000.0,
            down_payment: 50_000.0,
            pmi: PmiRule {
                enabled: true,
                drop_ltv: 0.78,
                annual_rate_pct: 0.5,
            },
            ..Default::default()
        };
        let mut state = ScheduleState::from_config(&config);

        state.bank_balance = 380_000.0; // LTV 0.76
        state.update_pmi(500_000.0, 0.78);
        assert!(!state.pmi_active);

        // Even if the balance somehow rose, the flag stays off
        state.bank_balance = 450_000.0;
        state.update_pmi(500_000.0, 0.78);
        assert!(!state.pmi_active);
        assert_eq!(state.pmi_charge(), 0.0);
    }
}
