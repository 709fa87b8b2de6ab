//! Consolidation of a profile onto a single sorted date axis

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use super::CashFlowProfile;

/// Dense `[assets x dates]` cash-flow matrix
///
/// Row `i` is profile entry `i`; column `j` is `dates[j]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnifiedCashFlowMatrix {
    dates: Vec<NaiveDate>,
    rows: Vec<Vec<f64>>,
}

impl UnifiedCashFlowMatrix {
    /// Sorted unique dates
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn n_assets(&self) -> usize {
        self.rows.len()
    }

    pub fn n_dates(&self) -> usize {
        self.dates.len()
    }

    pub fn get(&self, row: usize, column: usize) -> Option<f64> {
        self.rows.get(row).and_then(|r| r.get(column)).copied()
    }

    /// Sum over assets for each date
    pub fn column_totals(&self) -> Vec<f64> {
        let mut totals = vec![0.0; self.dates.len()];
        for row in &self.rows {
            for (total, amount) in totals.iter_mut().zip(row) {
                *total += amount;
            }
        }
        totals
    }
}

/// Every date carrying a flow in any schedule, ascending and without duplicates
pub fn unique_dates(profile: &CashFlowProfile) -> Vec<NaiveDate> {
    profile
        .iter()
        .flat_map(|schedule| schedule.dates())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Lay every schedule of the profile out on the shared date axis
pub fn to_matrix(profile: &CashFlowProfile) -> UnifiedCashFlowMatrix {
    let dates = unique_dates(profile);
    let columns: HashMap<NaiveDate, usize> = dates
        .iter()
        .enumerate()
        .map(|(column, date)| (*date, column))
        .collect();

    let rows = profile
        .iter()
        .map(|schedule| {
            let mut row = vec![0.0; dates.len()];
            for (date, amount) in schedule.iter() {
                // every schedule date is on the axis by construction
                if let Some(&column) = columns.get(&date) {
                    row[column] = amount;
                }
            }
            row
        })
        .collect();

    UnifiedCashFlowMatrix { dates, rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::CashFlowSchedule;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn test_profile() -> CashFlowProfile {
        CashFlowProfile::new(vec![
            CashFlowSchedule::from_flows(10, [(date(2024, 7, 1), 2.5), (date(2024, 1, 1), 1.5)]),
            CashFlowSchedule::from_flows(20, [(date(2024, 1, 1), 7.0), (date(2023, 9, 30), 3.0)]),
            CashFlowSchedule::new(30),
        ])
    }

    #[test]
    fn test_unique_dates_sorted() {
        let dates = unique_dates(&test_profile());
        assert_eq!(dates, vec![date(2023, 9, 30), date(2024, 1, 1), date(2024, 7, 1)]);
    }

    #[test]
    fn test_matrix_reconstructs_every_flow() {
        let profile = test_profile();
        let matrix = to_matrix(&profile);

        assert_eq!(matrix.n_assets(), 3);
        assert_eq!(matrix.n_dates(), 3);
        for (row, schedule) in profile.iter().enumerate() {
            for (date, amount) in schedule.iter() {
                let column = matrix.dates().iter().position(|d| *d == date).unwrap();
                assert_eq!(matrix.get(row, column), Some(amount));
            }
        }

        assert_eq!(matrix.rows()[0], vec![0.0, 1.5, 2.5]);
        assert_eq!(matrix.rows()[1], vec![3.0, 7.0, 0.0]);
        assert_eq!(matrix.rows()[2], vec![0.0, 0.0, 0.0]);
        assert_eq!(matrix.column_totals(), vec![3.0, 8.5, 2.5]);
    }

    #[test]
    fn test_empty_profile() {
        let matrix = to_matrix(&CashFlowProfile::default());
        assert_eq!(matrix.n_assets(), 0);
        assert!(matrix.dates().is_empty());
    }
}
