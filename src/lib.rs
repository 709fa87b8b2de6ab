//! Equity Projection - cash-flow projection and growth calibration for equity holdings
//!
//! This library provides:
//! - Dividend date generation and Gordon growth dividend/terminal amounts per holding
//! - Portfolio-wide dividend and terminal cash-flow schedules
//! - Year-fraction conversion and consolidation onto a single dated matrix
//! - Bisection calibration of growth rates against a yield curve

pub mod error;
pub mod equity;
pub mod portfolio;
pub mod schedule;
pub mod calibration;
pub mod curve;
pub mod settings;

// Re-export commonly used types
pub use equity::{EquityInstrument, PaymentFrequency};
pub use portfolio::{Portfolio, GrowthCalibration};
pub use schedule::{CashFlowProfile, CashFlowSchedule, DateFractionSet, UnifiedCashFlowMatrix};
pub use calibration::{bisect, pricing_objective, GrowthBracket, SolverConfig};
pub use curve::YieldCurve;
pub use settings::RunSettings;
