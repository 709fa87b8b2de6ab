//! Per-asset cash-flow schedules and the portfolio-ordered profile

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Dated cash flows of a single asset, one amount per date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowSchedule {
    asset_id: u32,
    flows: BTreeMap<NaiveDate, f64>,
}

impl CashFlowSchedule {
    pub fn new(asset_id: u32) -> Self {
        Self {
            asset_id,
            flows: BTreeMap::new(),
        }
    }

    /// Build a schedule from `(date, amount)` pairs; a repeated date keeps its first amount
    pub fn from_flows<I>(asset_id: u32, flows: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        let mut schedule = Self::new(asset_id);
        for (date, amount) in flows {
            schedule.insert_if_absent(date, amount);
        }
        schedule
    }

    /// Record a flow unless the date is already present. Amounts are never summed.
    pub(crate) fn insert_if_absent(&mut self, date: NaiveDate, amount: f64) -> bool {
        if self.flows.contains_key(&date) {
            return false;
        }
        self.flows.insert(date, amount);
        true
    }

    pub fn asset_id(&self) -> u32 {
        self.asset_id
    }

    pub fn len(&self) -> usize {
        self.flows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }

    pub fn amount(&self, date: NaiveDate) -> Option<f64> {
        self.flows.get(&date).copied()
    }

    /// Payment dates in ascending order
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.flows.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.flows.iter().map(|(date, amount)| (*date, *amount))
    }

    pub fn total(&self) -> f64 {
        self.flows.values().sum()
    }
}

/// One schedule per asset, in portfolio iteration order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CashFlowProfile {
    schedules: Vec<CashFlowSchedule>,
}

impl CashFlowProfile {
    pub fn new(schedules: Vec<CashFlowSchedule>) -> Self {
        Self { schedules }
    }

    pub fn schedules(&self) -> &[CashFlowSchedule] {
        &self.schedules
    }

    pub fn len(&self) -> usize {
        self.schedules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schedules.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CashFlowSchedule> {
        self.schedules.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CashFlowSchedule> {
        self.schedules.iter()
    }
}

impl FromIterator<CashFlowSchedule> for CashFlowProfile {
    fn from_iter<I: IntoIterator<Item = CashFlowSchedule>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a CashFlowProfile {
    type Item = &'a CashFlowSchedule;
    type IntoIter = std::slice::Iter<'a, CashFlowSchedule>;

    fn into_iter(self) -> Self::IntoIter {
        self.schedules.iter()
    }
}
