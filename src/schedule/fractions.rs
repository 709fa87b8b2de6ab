//! Year fractions of cash-flow dates relative to the modelling date

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::{CashFlowProfile, CashFlowSchedule};
use crate::equity::days_between;

/// Day-count base for year fractions
pub const FRACTION_DAYS_PER_YEAR: f64 = 365.25;

/// Index recorded for an in-scope terminal flow
pub const TERMINAL_INDEX: usize = 1;

/// Year fractions and source indices of the in-scope flows of one asset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DateFractionSet {
    /// Years from the modelling date to each retained flow
    pub fractions: Vec<f64>,
    /// Position of each retained flow within its schedule
    pub indices: Vec<usize>,
}

impl DateFractionSet {
    pub fn len(&self) -> usize {
        self.fractions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fractions.is_empty()
    }

    fn push(&mut self, days: i64, index: usize) {
        self.fractions.push(days as f64 / FRACTION_DAYS_PER_YEAR);
        self.indices.push(index);
    }
}

/// Fractions of one schedule; dates not strictly after the modelling date are skipped
pub fn schedule_fractions(modelling_date: NaiveDate, schedule: &CashFlowSchedule) -> DateFractionSet {
    let mut set = DateFractionSet::default();
    for (index, date) in schedule.dates().enumerate() {
        let days = days_between(modelling_date, date);
        if days > 0 {
            set.push(days, index);
        }
    }
    set
}

/// Fractions for every schedule of a dividend profile, in profile order
pub fn fractions_and_indices(modelling_date: NaiveDate, profile: &CashFlowProfile) -> Vec<DateFractionSet> {
    profile
        .schedules()
        .par_iter()
        .map(|schedule| schedule_fractions(modelling_date, schedule))
        .collect()
}

/// Fractions for a terminal profile
///
/// Only the first date of each schedule is considered. An in-scope terminal flow is
/// recorded with index [`TERMINAL_INDEX`].
pub fn terminal_fractions_and_indices(
    modelling_date: NaiveDate,
    profile: &CashFlowProfile,
) -> Vec<DateFractionSet> {
    profile
        .schedules()
        .par_iter()
        .map(|schedule| {
            let mut set = DateFractionSet::default();
            if let Some(date) = schedule.dates().next() {
                let days = days_between(modelling_date, date);
                if days > 0 {
                    set.push(days, TERMINAL_INDEX);
                }
            }
            set
        })
        .collect()
}
