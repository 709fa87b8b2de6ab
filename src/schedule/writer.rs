//! Write intermediate date axes and cash-flow matrices to CSV

use csv::Writer;
use std::path::Path;

use super::UnifiedCashFlowMatrix;

pub const DIVIDEND_DATES_FILE: &str = "unique_dividend_dates.csv";
pub const TERMINAL_DATES_FILE: &str = "unique_terminal_dates.csv";
pub const DIVIDEND_MATRIX_FILE: &str = "cashflow_dividend_matrix.csv";
pub const TERMINAL_MATRIX_FILE: &str = "cashflow_terminal_matrix.csv";

/// Write the date axis: one row per date, prefixed by its column index
pub fn write_dates<W: std::io::Write>(writer: W, matrix: &UnifiedCashFlowMatrix) -> csv::Result<()> {
    let mut csv_writer = Writer::from_writer(writer);
    csv_writer.write_record(["", "0"])?;
    for (index, date) in matrix.dates().iter().enumerate() {
        csv_writer.write_record([index.to_string(), date.to_string()])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write the amount matrix: one row per asset in profile order
pub fn write_matrix<W: std::io::Write>(writer: W, matrix: &UnifiedCashFlowMatrix) -> csv::Result<()> {
    let mut csv_writer = Writer::from_writer(writer);

    let header: Vec<String> = std::iter::once(String::new())
        .chain((0..matrix.n_dates()).map(|c| c.to_string()))
        .collect();
    csv_writer.write_record(&header)?;

    for (index, row) in matrix.rows().iter().enumerate() {
        let record: Vec<String> = std::iter::once(index.to_string())
            .chain(row.iter().map(|amount| amount.to_string()))
            .collect();
        csv_writer.write_record(&record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Persist dividend and terminal axes and matrices into `dir`, creating it if needed
pub fn write_equity_matrices(
    dir: &Path,
    dividends: &UnifiedCashFlowMatrix,
    terminals: &UnifiedCashFlowMatrix,
) -> csv::Result<()> {
    std::fs::create_dir_all(dir)?;

    write_dates(std::fs::File::create(dir.join(DIVIDEND_DATES_FILE))?, dividends)?;
    write_dates(std::fs::File::create(dir.join(TERMINAL_DATES_FILE))?, terminals)?;
    write_matrix(std::fs::File::create(dir.join(DIVIDEND_MATRIX_FILE))?, dividends)?;
    write_matrix(std::fs::File::create(dir.join(TERMINAL_MATRIX_FILE))?, terminals)?;

    log::info!("Wrote equity cash-flow matrices to {}", dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{to_matrix, CashFlowProfile, CashFlowSchedule};
    use chrono::NaiveDate;

    fn test_matrix() -> UnifiedCashFlowMatrix {
        let d1 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        to_matrix(&CashFlowProfile::new(vec![
            CashFlowSchedule::from_flows(1, [(d1, 1.5), (d2, 2.5)]),
            CashFlowSchedule::from_flows(2, [(d2, 4.0)]),
        ]))
    }

    #[test]
    fn test_write_dates_and_matrix() {
        let matrix = test_matrix();

        let mut dates = Vec::new();
        write_dates(&mut dates, &matrix).unwrap();
        assert_eq!(
            String::from_utf8(dates).unwrap(),
            ",0\n0,2024-01-01\n1,2024-07-01\n"
        );

        let mut amounts = Vec::new();
        write_matrix(&mut amounts, &matrix).unwrap();
        assert_eq!(String::from_utf8(amounts).unwrap(), ",0,1\n0,1.5,2.5\n1,0,4\n");
    }

    #[test]
    fn test_write_equity_matrices_creates_files() {
        let dir = std::env::temp_dir().join(format!("equity_projection_writer_{}", std::process::id()));
        let matrix = test_matrix();
        write_equity_matrices(&dir, &matrix, &matrix).unwrap();

        for file in [DIVIDEND_DATES_FILE, TERMINAL_DATES_FILE, DIVIDEND_MATRIX_FILE, TERMINAL_MATRIX_FILE] {
            assert!(dir.join(file).exists(), "missing {}", file);
        }
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
