//! Gordon growth pricing equation used as the calibration target

use crate::error::{CalibrationError, CalibrationResult};

/// Gordon pricing residual for a candidate growth rate `g`
///
/// `Σ (1+g)^tᵢ / (1+yᵢ)^tᵢ + 1/(1+y_last)^t_last · 1/(ufr − g) − 1/dividend_yield`
///
/// Zero when `g` reproduces the market price (normalised to 1) under the curve.
/// Returns NaN when either slice is empty.
pub fn pricing_objective(
    dividend_yield: f64,
    yield_curve_rates: &[f64],
    date_fractions: &[f64],
    ufr: f64,
    g: f64,
) -> f64 {
    let (Some(&y_last), Some(&t_last)) = (yield_curve_rates.last(), date_fractions.last()) else {
        return f64::NAN;
    };

    let dividends: f64 = yield_curve_rates
        .iter()
        .zip(date_fractions)
        .map(|(&y, &t)| (1.0 + g).powf(t) / (1.0 + y).powf(t))
        .sum();
    let terminal_value = 1.0 / (1.0 + y_last).powf(t_last) * (1.0 / (ufr - g));

    dividends + terminal_value - 1.0 / dividend_yield
}

/// Market inputs of the pricing equation for one asset
#[derive(Debug, Clone, Copy)]
pub struct GordonInputs<'a> {
    dividend_yield: f64,
    yield_curve_rates: &'a [f64],
    date_fractions: &'a [f64],
    ufr: f64,
}

impl<'a> GordonInputs<'a> {
    /// Validate and bundle the equation inputs
    ///
    /// Rates and fractions must be non-empty and of equal length, and the dividend
    /// yield strictly positive.
    pub fn new(
        dividend_yield: f64,
        yield_curve_rates: &'a [f64],
        date_fractions: &'a [f64],
        ufr: f64,
    ) -> CalibrationResult<Self> {
        if date_fractions.is_empty() {
            return Err(CalibrationError::invalid_input("no cash-flow dates after the modelling date"));
        }
        if yield_curve_rates.len() != date_fractions.len() {
            return Err(CalibrationError::invalid_input(format!(
                "{} yield rates for {} date fractions",
                yield_curve_rates.len(),
                date_fractions.len()
            )));
        }
        if dividend_yield.is_nan() || dividend_yield <= 0.0 {
            return Err(CalibrationError::invalid_input(format!(
                "dividend yield must be positive, got {}",
                dividend_yield
            )));
        }

        Ok(Self {
            dividend_yield,
            yield_curve_rates,
            date_fractions,
            ufr,
        })
    }

    pub fn dividend_yield(&self) -> f64 {
        self.dividend_yield
    }

    pub fn yield_curve_rates(&self) -> &'a [f64] {
        self.yield_curve_rates
    }

    pub fn date_fractions(&self) -> &'a [f64] {
        self.date_fractions
    }

    pub fn ufr(&self) -> f64 {
        self.ufr
    }

    pub fn residual(&self, g: f64) -> f64 {
        pricing_objective(self.dividend_yield, self.yield_curve_rates, self.date_fractions, self.ufr, g)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_single_flow_objective() {
        // one flow at t = 1, flat 3% curve, ufr 5%, g = 1%
        let value = pricing_objective(0.04, &[0.03], &[1.0], 0.05, 0.01);
        let expected = 1.01 / 1.03 + (1.0 / 1.03) * (1.0 / 0.04) - 25.0;
        assert_relative_eq!(value, expected, max_relative = 1e-12);
    }

    #[test]
    fn test_objective_increases_with_growth() {
        let rates = [0.02, 0.025, 0.03];
        let fractions = [0.5, 1.5, 2.5];
        let low = pricing_objective(0.03, &rates, &fractions, 0.04, 0.0);
        let high = pricing_objective(0.03, &rates, &fractions, 0.04, 0.02);
        assert!(high > low);
    }

    #[test]
    fn test_objective_degenerate_at_ufr() {
        let value = pricing_objective(0.03, &[0.03], &[1.0], 0.04, 0.04);
        assert!(!value.is_finite());
        assert!(pricing_objective(0.03, &[], &[], 0.04, 0.01).is_nan());
    }

    #[test]
    fn test_inputs_validation() {
        assert!(GordonInputs::new(0.03, &[0.01], &[1.0], 0.04).is_ok());
        assert!(GordonInputs::new(0.03, &[], &[], 0.04).is_err());
        assert!(GordonInputs::new(0.03, &[0.01], &[1.0, 2.0], 0.04).is_err());
        assert!(GordonInputs::new(0.0, &[0.01], &[1.0], 0.04).is_err());
        assert!(GordonInputs::new(f64::NAN, &[0.01], &[1.0], 0.04).is_err());
    }
}
