//! Growth-rate calibration against the Gordon pricing equation
//!
//! - [`pricing_objective`]: residual of the pricing equation for a candidate growth rate
//! - [`bisect`]: bracketing root finder driven by a [`SolverConfig`]
//! - [`calibrate_growth_rate`]: wires one instrument's dividend dates and a yield curve
//!   into the solver

mod bisection;
mod objective;

pub use bisection::bisect;
pub use objective::{pricing_objective, GordonInputs};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::curve::YieldCurve;
use crate::equity::EquityInstrument;
use crate::error::CalibrationResult;
use crate::portfolio::dividend_schedule;
use crate::schedule::schedule_fractions;

/// Default precision for the bisection solver
pub const DEFAULT_PRECISION: f64 = 1e-10;

/// Default iteration cap for the bisection solver
pub const DEFAULT_MAX_ITERATIONS: u32 = 1000;

/// Stopping rules for the solver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Residual tolerance at the bounds and half-width tolerance of the bracket
    pub precision: f64,
    /// Maximum number of midpoint evaluations
    pub max_iterations: u32,
    /// Wall-clock limit for one solve
    pub timeout: Option<Duration>,
}

impl SolverConfig {
    pub fn new(precision: f64, max_iterations: u32) -> Self {
        Self {
            precision,
            max_iterations,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PRECISION, DEFAULT_MAX_ITERATIONS)
    }
}

/// Search interval for the growth rate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthBracket {
    pub lower: f64,
    pub upper: f64,
}

impl GrowthBracket {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// Bracket from `lower` up to just below the UFR, where the terminal value explodes
    pub fn below_ufr(lower: f64, ufr: f64, margin: f64) -> Self {
        Self::new(lower, ufr - margin)
    }
}

/// Calibrate the growth rate of one instrument
///
/// Dividend dates in `[modelling_date, end_date]` strictly after the modelling date are
/// converted to year fractions, the curve is read at those fractions, and the pricing
/// equation is solved for `g` inside `bracket`.
pub fn calibrate_growth_rate(
    instrument: &EquityInstrument,
    curve: &YieldCurve,
    modelling_date: NaiveDate,
    end_date: NaiveDate,
    bracket: GrowthBracket,
    config: &SolverConfig,
) -> CalibrationResult<f64> {
    let schedule = dividend_schedule(instrument, modelling_date, end_date);
    let fractions = schedule_fractions(modelling_date, &schedule);
    let rates = curve.rates_at(&fractions.fractions);

    let inputs = GordonInputs::new(instrument.dividend_yield(), &rates, &fractions.fractions, curve.ufr())?;
    log::debug!(
        "Calibrating asset {} over {} dividend dates",
        instrument.asset_id(),
        fractions.len()
    );

    bisect(bracket.lower, bracket.upper, &inputs, config, pricing_objective)
}
