//! Output structures for a schedule run

use serde::{Deserialize, Serialize};

/// One simulated month, rounded to whole cents at emission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyRow {
    /// 1-indexed simulation month
    pub month: u32,

    /// 1-indexed calendar year within the simulation
    pub year: u32,

    // Bank leg
    pub bank_payment: f64,
    pub bank_interest: f64,
    pub bank_principal: f64,
    pub bank_balance: f64,

    // Family leg
    pub family_payment: f64,
    pub family_interest: f64,
    pub family_principal: f64,
    pub family_balance: f64,

    // Recurring charges
    pub pmi: f64,
    pub property_tax: f64,
    pub insurance: f64,
    pub hoa: f64,
    pub maintenance: f64,
    pub utilities: f64,

    /// Tax plus insurance when escrowed, zero otherwise
    pub escrow: f64,

    /// Owner-view total: payments + PMI + escrow + carrying costs
    pub total_monthly: f64,

    /// Owner total plus the family's opportunity-cost adjustment
    pub household_monthly: f64,

    /// Price minus all outstanding debt, ignoring transaction costs
    pub equity: f64,
}

/// Final state of one investment track after compounding the savings series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestmentTrack {
    /// Track label from the configuration
    pub label: String,

    /// Annual return, in percent
    pub annual_return_pct: f64,

    /// Balance after depositing every month's savings
    pub final_balance: f64,

    /// Final balance minus total deposits
    pub profit: f64,
}

/// Complete, self-contained result of one schedule run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleResult {
    /// Ordered monthly rows
    pub rows: Vec<MonthlyRow>,

    /// Total bank interest paid over the run
    pub cumulative_bank_interest: f64,

    /// Total family-loan interest paid over the run
    pub cumulative_family_interest: f64,

    /// Total interest the family earned reinvesting received payments
    pub cumulative_reinvestment_earnings: f64,

    /// Ending balance of the family's reinvestment pot
    pub reinvestment_pot: f64,

    /// Per-month savings vs the full-bank-only baseline payment
    pub monthly_savings: Vec<f64>,

    /// Investment-track end balances from compounding the savings series
    pub investment_tracks: Vec<InvestmentTrack>,

    /// Annualized IRR of the owner cash-flow vector
    pub owner_irr: f64,

    /// Annualized IRR of the household cash-flow vector
    pub household_irr: f64,

    /// NPV of the owner cash-flow vector at the configured discount rate
    pub owner_npv: f64,

    /// NPV of the household cash-flow vector
    pub household_npv: f64,
}

impl ScheduleResult {
    /// Final month's row, if the run produced any
    pub fn final_row(&self) -> Option<&MonthlyRow> {
        self.rows.last()
    }

    /// Total owner outflow across the run, excluding upfront cash
    pub fn total_owner_outflow(&self) -> f64 {
        self.rows.iter().map(|r| r.total_monthly).sum()
    }

    /// Cumulative household cost per year index (1-indexed), for
    /// side-by-side scenario comparison
    pub fn yearly_cumulative_household_cost(&self) -> Vec<f64> {
        Self::yearly_cumulative(&self.rows, |r| r.household_monthly)
    }

    /// Cumulative bank + family interest per year index
    pub fn yearly_cumulative_interest(&self) -> Vec<f64> {
        Self::yearly_cumulative(&self.rows, |r| r.bank_interest + r.family_interest)
    }

    fn yearly_cumulative(rows: &[MonthlyRow], f: impl Fn(&MonthlyRow) -> f64) -> Vec<f64> {
        let mut out: Vec<f64> = Vec::new();
        let mut running = 0.0;
        for row in rows {
            running += f(row);
            let year = row.year as usize;
            if out.len() < year {
                out.push(running);
            } else {
                out[year - 1] = running;
            }
        }
        out
    }
}
