//! Yield-curve inputs for calibration
//!
//! The curve itself is built upstream (e.g. Smith-Wilson extrapolation). This module only
//! holds its output:
//! - the ultimate forward rate
//! - spot rates by maturity, read at arbitrary year fractions

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{CalibrationError, CalibrationResult, LoadResult};

/// Spot-rate curve with its ultimate forward rate
///
/// Always holds at least one point; deserialization runs the [`YieldCurve::from_points`] checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CurveRecord")]
pub struct YieldCurve {
    /// Ultimate forward rate (annual)
    ufr: f64,

    /// Maturities in years, strictly increasing
    maturities: Vec<f64>,

    /// Annual spot rate at each maturity
    rates: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct CurveRecord {
    ufr: f64,
    maturities: Vec<f64>,
    rates: Vec<f64>,
}

impl TryFrom<CurveRecord> for YieldCurve {
    type Error = CalibrationError;

    fn try_from(record: CurveRecord) -> CalibrationResult<Self> {
        if record.maturities.len() != record.rates.len() {
            return Err(CalibrationError::invalid_input(format!(
                "yield curve has {} maturities but {} rates",
                record.maturities.len(),
                record.rates.len()
            )));
        }
        let points = record.maturities.into_iter().zip(record.rates).collect();
        Self::from_points(points, record.ufr)
    }
}

impl YieldCurve {
    /// Create a curve with the same spot rate at every maturity
    pub fn flat(rate: f64, ufr: f64) -> Self {
        Self {
            ufr,
            maturities: vec![0.0],
            rates: vec![rate],
        }
    }

    /// Create a curve from `(maturity, rate)` points
    ///
    /// Points must be non-empty, finite and strictly increasing in maturity.
    pub fn from_points(points: Vec<(f64, f64)>, ufr: f64) -> CalibrationResult<Self> {
        if points.is_empty() {
            return Err(CalibrationError::invalid_input("yield curve has no points"));
        }
        if points.iter().any(|(m, r)| !m.is_finite() || !r.is_finite()) {
            return Err(CalibrationError::invalid_input("yield curve contains non-finite points"));
        }
        if points.windows(2).any(|w| w[1].0 <= w[0].0) {
            return Err(CalibrationError::invalid_input(
                "yield curve maturities must be strictly increasing",
            ));
        }

        let (maturities, rates) = points.into_iter().unzip();
        Ok(Self {
            ufr,
            maturities,
            rates,
        })
    }

    pub fn ufr(&self) -> f64 {
        self.ufr
    }

    /// Spot rate at year fraction `t`
    ///
    /// Linear between points, flat beyond the first and last maturity.
    pub fn rate_at(&self, t: f64) -> f64 {
        let (Some(&first_maturity), Some(&last_maturity)) = (self.maturities.first(), self.maturities.last()) else {
            return f64::NAN;
        };
        let (Some(&first_rate), Some(&last_rate)) = (self.rates.first(), self.rates.last()) else {
            return f64::NAN;
        };
        if t <= first_maturity {
            return first_rate;
        }
        if t >= last_maturity {
            return last_rate;
        }

        let upper = self.maturities.partition_point(|&m| m < t);
        let (m0, m1) = (self.maturities[upper - 1], self.maturities[upper]);
        let (r0, r1) = (self.rates[upper - 1], self.rates[upper]);
        r0 + (r1 - r0) * (t - m0) / (m1 - m0)
    }

    /// Spot rates aligned to a vector of year fractions
    pub fn rates_at(&self, fractions: &[f64]) -> Vec<f64> {
        fractions.iter().map(|&t| self.rate_at(t)).collect()
    }
}

#[derive(Debug, serde::Deserialize)]
struct CurveRow {
    #[serde(rename = "Maturity")]
    maturity: f64,
    #[serde(rename = "Rate")]
    rate: f64,
}

/// Load spot points from a `Maturity,Rate` CSV
pub fn load_curve<P: AsRef<Path>>(path: P, ufr: f64) -> LoadResult<YieldCurve> {
    let reader = std::fs::File::open(path)?;
    load_curve_from_reader(reader, ufr)
}

/// Load spot points from any reader
pub fn load_curve_from_reader<R: std::io::Read>(reader: R, ufr: f64) -> LoadResult<YieldCurve> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut points = Vec::new();
    for result in csv_reader.deserialize() {
        let row: CurveRow = result?;
        points.push((row.maturity, row.rate));
    }

    let curve = YieldCurve::from_points(points, ufr)?;
    Ok(curve)
}
