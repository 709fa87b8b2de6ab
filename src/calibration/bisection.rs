//! Bisection root finder for the growth-rate calibration

use std::time::Instant;

use super::{GordonInputs, SolverConfig};
use crate::error::{CalibrationError, CalibrationResult};

/// Sign of `x`: 1, -1, 0, or NaN for NaN (never equal to anything)
fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else if x == 0.0 {
        0.0
    } else {
        f64::NAN
    }
}

/// Find a root of `objective` in `[x_low, x_high]` by bisection
///
/// A bound whose residual is already within `config.precision` of zero is returned
/// without iterating. Otherwise at most `config.max_iterations` midpoints are evaluated;
/// the search stops once the half-width of the bracket drops below the precision, or the
/// residual at the original lower bound is exactly zero, and returns the midpoint.
///
/// # Errors
/// [`CalibrationError::NotConverged`] when the iteration cap is reached,
/// [`CalibrationError::TimedOut`] when `config.timeout` elapses first, and
/// [`CalibrationError::InvalidInput`] for a non-positive precision or non-finite bounds.
pub fn bisect<F>(
    x_low: f64,
    x_high: f64,
    inputs: &GordonInputs<'_>,
    config: &SolverConfig,
    objective: F,
) -> CalibrationResult<f64>
where
    F: Fn(f64, &[f64], &[f64], f64, f64) -> f64,
{
    if config.precision.is_nan() || config.precision <= 0.0 {
        return Err(CalibrationError::invalid_input(format!(
            "precision must be positive, got {}",
            config.precision
        )));
    }
    if !x_low.is_finite() || !x_high.is_finite() {
        return Err(CalibrationError::invalid_input(format!(
            "bracket [{}, {}] is not finite",
            x_low, x_high
        )));
    }

    let f = |x: f64| {
        objective(
            inputs.dividend_yield(),
            inputs.yield_curve_rates(),
            inputs.date_fractions(),
            inputs.ufr(),
            x,
        )
    };

    let started = Instant::now();
    let mut x_start = x_low;
    let mut x_end = x_high;

    let y_start = f(x_start);
    let y_end = f(x_end);
    if y_start.abs() < config.precision {
        return Ok(x_start);
    }
    if y_end.abs() < config.precision {
        return Ok(x_end);
    }

    for iteration in 0..config.max_iterations {
        if config.timeout.is_some_and(|limit| started.elapsed() >= limit) {
            return Err(CalibrationError::TimedOut { iterations: iteration });
        }

        let x_mid = (x_end + x_start) / 2.0;
        let y_mid = f(x_mid);

        if y_start == 0.0 || (x_end - x_start) / 2.0 < config.precision {
            log::debug!(
                "Bisection converged to {} after {} iterations (residual {:.3e})",
                x_mid,
                iteration + 1,
                y_mid
            );
            return Ok(x_mid);
        }

        // root lies in the half whose end residuals differ in sign
        if sign(y_mid) == sign(y_start) {
            x_start = x_mid;
        } else {
            x_end = x_mid;
        }
    }

    Err(CalibrationError::NotConverged {
        iterations: config.max_iterations,
        lower: x_start,
        upper: x_end,
    })
}
