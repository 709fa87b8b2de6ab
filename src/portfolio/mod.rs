//! Equity portfolio and per-asset cash-flow generation
//!
//! The portfolio keeps each asset at the position of its first insertion. Every profile it
//! produces has one schedule per asset in that order, which the matrix and fraction steps
//! rely on.

mod projection;

pub use projection::{dividend_schedule, terminal_schedule};

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::calibration::{calibrate_growth_rate, GrowthBracket, SolverConfig};
use crate::curve::YieldCurve;
use crate::equity::EquityInstrument;
use crate::error::CalibrationResult;
use crate::schedule::CashFlowProfile;

/// Market price and growth rate of one asset at the modelling date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub asset_id: u32,
    pub modelling_date: NaiveDate,
    pub market_price: f64,
    pub growth_rate: f64,
}

/// Outcome of calibrating one asset
#[derive(Debug, Clone, PartialEq)]
pub struct GrowthCalibration {
    pub asset_id: u32,
    pub growth_rate: CalibrationResult<f64>,
}

/// Collection of equity holdings keyed by asset id
#[derive(Debug, Clone, Default)]
pub struct Portfolio {
    instruments: Vec<EquityInstrument>,
    positions: HashMap<u32, usize>,
}

impl Portfolio {
    /// Create an empty portfolio
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a portfolio from an initial mapping of holdings
    pub fn from_map<I>(equities: I) -> Self
    where
        I: IntoIterator<Item = (u32, EquityInstrument)>,
    {
        equities.into_iter().map(|(_, instrument)| instrument).collect()
    }

    /// Insert a holding, replacing any holding with the same asset id
    ///
    /// A replaced holding keeps its position. Returns the replaced holding.
    pub fn add(&mut self, instrument: EquityInstrument) -> Option<EquityInstrument> {
        match self.positions.get(&instrument.asset_id()) {
            Some(&position) => Some(std::mem::replace(&mut self.instruments[position], instrument)),
            None => {
                self.positions.insert(instrument.asset_id(), self.instruments.len());
                self.instruments.push(instrument);
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn get(&self, asset_id: u32) -> Option<&EquityInstrument> {
        self.positions.get(&asset_id).map(|&position| &self.instruments[position])
    }

    /// Holdings in portfolio order
    pub fn iter(&self) -> std::slice::Iter<'_, EquityInstrument> {
        self.instruments.iter()
    }

    pub fn asset_ids(&self) -> Vec<u32> {
        self.instruments.iter().map(|i| i.asset_id()).collect()
    }

    /// Dividend schedules of every asset for dates in `[modelling_date, end_date]`
    pub fn build_dividend_schedules(&self, modelling_date: NaiveDate, end_date: NaiveDate) -> CashFlowProfile {
        let schedules = self
            .instruments
            .par_iter()
            .map(|instrument| dividend_schedule(instrument, modelling_date, end_date))
            .collect();
        CashFlowProfile::new(schedules)
    }

    /// One terminal flow per asset at `terminal_date`
    pub fn build_terminal_schedules(
        &self,
        modelling_date: NaiveDate,
        terminal_date: NaiveDate,
        terminal_rate: f64,
    ) -> CashFlowProfile {
        let schedules = self
            .instruments
            .par_iter()
            .map(|instrument| terminal_schedule(instrument, modelling_date, terminal_date, terminal_rate))
            .collect();
        CashFlowProfile::new(schedules)
    }

    /// Market price and growth rate of every asset at the modelling date
    pub fn market_snapshot(&self, modelling_date: NaiveDate) -> Vec<MarketSnapshot> {
        self.instruments
            .iter()
            .map(|instrument| MarketSnapshot {
                asset_id: instrument.asset_id(),
                modelling_date,
                market_price: instrument.market_price(),
                growth_rate: instrument.growth_rate(),
            })
            .collect()
    }

    /// Calibrate the growth rate of every asset against the curve
    ///
    /// Assets are solved independently; a failure for one asset is reported in its entry
    /// and does not stop the others.
    pub fn calibrate_growth_rates(
        &self,
        curve: &YieldCurve,
        modelling_date: NaiveDate,
        end_date: NaiveDate,
        bracket: GrowthBracket,
        config: &SolverConfig,
    ) -> Vec<GrowthCalibration> {
        self.instruments
            .par_iter()
            .map(|instrument| {
                let growth_rate =
                    calibrate_growth_rate(instrument, curve, modelling_date, end_date, bracket, config);
                if let Err(err) = &growth_rate {
                    log::warn!("Asset {}: growth calibration failed: {}", instrument.asset_id(), err);
                }
                GrowthCalibration {
                    asset_id: instrument.asset_id(),
                    growth_rate,
                }
            })
            .collect()
    }
}

impl FromIterator<EquityInstrument> for Portfolio {
    fn from_iter<I: IntoIterator<Item = EquityInstrument>>(iter: I) -> Self {
        let mut portfolio = Portfolio::new();
        for instrument in iter {
            portfolio.add(instrument);
        }
        portfolio
    }
}

impl<'a> IntoIterator for &'a Portfolio {
    type Item = &'a EquityInstrument;
    type IntoIter = std::slice::Iter<'a, EquityInstrument>;

    fn into_iter(self) -> Self::IntoIter {
        self.instruments.iter()
    }
}
