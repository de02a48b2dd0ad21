//! Mortgage System - amortization and financing-comparison engine for home
//! purchases with intra-family loans
//!
//! This library provides:
//! - Month-by-month schedule simulation (bank loan, family loan, PMI,
//!   escrow drift, ARM resets, prepayments)
//! - Derived investment metrics (savings compounding, IRR, NPV)
//! - Bank-only vs family-assisted variant comparison across named scenarios
//! - Fixed-layout CSV export of monthly schedules

pub mod config;
pub mod export;
pub mod math;
pub mod scenario;
pub mod schedule;

// Re-export commonly used types
pub use config::{BankLoanTerms, FamilyLoanTerms, LoanConfiguration, LoanKind};
pub use scenario::{ComparisonMetric, FinancingVariant, Scenario, ScenarioRunner};
pub use schedule::{build_schedule, MonthlyRow, ScheduleResult};
