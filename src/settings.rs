//! Run parameters loaded from a `Parameter,Value` CSV

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use crate::calibration::{SolverConfig, DEFAULT_MAX_ITERATIONS};
use crate::equity::loader::parse_input_date;
use crate::error::{LoadError, LoadResult};

/// Settings for a projection and calibration run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSettings {
    pub modelling_date: NaiveDate,

    /// Projection horizon in years
    pub n_proj_years: u32,

    /// Last date of the projection window, `modelling_date + n_proj_years`
    pub end_date: NaiveDate,

    /// Solver precision
    pub precision: f64,

    pub max_iterations: u32,

    /// Ultimate forward rate, also the terminal rate of the Gordon model
    pub ufr: f64,
}

impl RunSettings {
    pub fn new(modelling_date: NaiveDate, n_proj_years: u32, precision: f64, ufr: f64) -> LoadResult<Self> {
        let end_date = modelling_date
            .checked_add_months(Months::new(n_proj_years.saturating_mul(12)))
            .ok_or_else(|| LoadError::invalid_field("n_proj_years", n_proj_years.to_string()))?;

        Ok(Self {
            modelling_date,
            n_proj_years,
            end_date,
            precision,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            ufr,
        })
    }

    pub fn solver_config(&self) -> SolverConfig {
        SolverConfig::new(self.precision, self.max_iterations)
    }

    /// Load settings from a CSV file
    pub fn load<P: AsRef<Path>>(path: P) -> LoadResult<Self> {
        let reader = std::fs::File::open(path)?;
        Self::from_reader(reader)
    }

    /// Load settings from any reader
    ///
    /// Required: `Modelling_Date` (dd/mm/yyyy), `n_proj_years`, `Precision`, `UFR`.
    /// Optional: `Max_Iterations`. Unknown parameters are ignored.
    pub fn from_reader<R: std::io::Read>(reader: R) -> LoadResult<Self> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut values: HashMap<String, String> = HashMap::new();

        for result in csv_reader.records() {
            let record = result?;
            let (Some(key), Some(value)) = (record.get(0), record.get(1)) else {
                continue;
            };
            values.insert(key.trim().to_string(), value.trim().to_string());
        }

        let modelling_date = parse_input_date("Modelling_Date", required(&values, "Modelling_Date")?)?;
        let n_proj_years = parse_value(&values, "n_proj_years")?;
        let precision = parse_value(&values, "Precision")?;
        let ufr = parse_value(&values, "UFR")?;

        let mut settings = Self::new(modelling_date, n_proj_years, precision, ufr)?;
        if values.contains_key("Max_Iterations") {
            settings.max_iterations = parse_value(&values, "Max_Iterations")?;
        }

        log::info!(
            "Run settings: modelling date {}, horizon {} years, UFR {}",
            settings.modelling_date,
            settings.n_proj_years,
            settings.ufr
        );
        Ok(settings)
    }
}

fn required<'a>(values: &'a HashMap<String, String>, key: &str) -> LoadResult<&'a str> {
    values
        .get(key)
        .map(String::as_str)
        .ok_or_else(|| LoadError::MissingSetting(key.to_string()))
}

fn parse_value<T: FromStr>(values: &HashMap<String, String>, key: &str) -> LoadResult<T> {
    let raw = required(values, key)?;
    raw.parse().map_err(|_| LoadError::invalid_field(key, raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARAMETERS: &str = "\
Parameter,Value
EIOPA_param_file,Param_no_VA.csv
country,Slovenia
Modelling_Date,31/12/2022
n_proj_years,50
Precision,0.000001
UFR,0.0345
";

    #[test]
    fn test_load_settings() {
        let settings = RunSettings::from_reader(PARAMETERS.as_bytes()).unwrap();
        assert_eq!(settings.modelling_date, NaiveDate::from_ymd_opt(2022, 12, 31).unwrap());
        assert_eq!(settings.end_date, NaiveDate::from_ymd_opt(2072, 12, 31).unwrap());
        assert_eq!(settings.n_proj_years, 50);
        assert_eq!(settings.precision, 0.000001);
        assert_eq!(settings.ufr, 0.0345);
        assert_eq!(settings.max_iterations, DEFAULT_MAX_ITERATIONS);

        let config = settings.solver_config();
        assert_eq!(config.precision, 0.000001);
    }

    #[test]
    fn test_max_iterations_override() {
        let input = format!("{}Max_Iterations,250\n", PARAMETERS);
        let settings = RunSettings::from_reader(input.as_bytes()).unwrap();
        assert_eq!(settings.max_iterations, 250);
    }

    #[test]
    fn test_missing_setting() {
        let input = "Parameter,Value\nModelling_Date,31/12/2022\nn_proj_years,50\n";
        let err = RunSettings::from_reader(input.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::MissingSetting(ref key) if key == "Precision"));
    }

    #[test]
    fn test_invalid_number() {
        let input = "Parameter,Value\nModelling_Date,31/12/2022\nn_proj_years,fifty\nPrecision,1e-6\nUFR,0.03\n";
        let err = RunSettings::from_reader(input.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::InvalidField { ref field, .. } if field == "n_proj_years"));
    }
}
