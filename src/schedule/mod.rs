//! Month-by-month schedule simulation and derived metrics

pub mod builder;
pub mod metrics;
pub mod row;
pub mod state;

pub use builder::{build_schedule, ScheduleBuilder};
pub use row::{InvestmentTrack, MonthlyRow, ScheduleResult};
pub use state::ScheduleState;
