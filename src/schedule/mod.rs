//! Cash-flow schedules and their normalization
//!
//! Per-asset schedules produced by the portfolio are turned into:
//! - year fractions relative to the modelling date, keeping only flows strictly after it
//! - a single sorted date axis with a dense `[assets x dates]` amount matrix

mod cashflows;
mod fractions;
mod matrix;
pub mod writer;

pub use cashflows::{CashFlowProfile, CashFlowSchedule};
pub use fractions::{
    fractions_and_indices, schedule_fractions, terminal_fractions_and_indices, DateFractionSet,
    FRACTION_DAYS_PER_YEAR, TERMINAL_INDEX,
};
pub use matrix::{to_matrix, unique_dates, UnifiedCashFlowMatrix};
pub use writer::write_equity_matrices;
