//! Load equity holdings from an equity portfolio CSV

use chrono::NaiveDate;
use csv::Reader;
use std::path::Path;

use super::EquityInstrument;
use crate::error::{LoadError, LoadResult};

/// Date format used by the input files
pub const INPUT_DATE_FORMAT: &str = "%d/%m/%Y";

/// Parse a dd/mm/yyyy input date
pub(crate) fn parse_input_date(field: &str, value: &str) -> LoadResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), INPUT_DATE_FORMAT)
        .map_err(|_| LoadError::invalid_field(field, value))
}

/// Raw CSV row matching the equity portfolio columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "Asset_ID")]
    asset_id: u32,
    #[serde(rename = "NACE")]
    nace: String,
    #[serde(rename = "Issue_Date")]
    issue_date: String,
    #[serde(rename = "Dividend_Yield")]
    dividend_yield: f64,
    #[serde(rename = "Frequency")]
    frequency: u32,
    #[serde(rename = "Market_Price")]
    market_price: f64,
    #[serde(rename = "Growth_Rate")]
    growth_rate: f64,
}

impl CsvRow {
    fn into_instrument(self) -> LoadResult<EquityInstrument> {
        let issue_date = parse_input_date("Issue_Date", &self.issue_date)?;
        let instrument = EquityInstrument::new(
            self.asset_id,
            self.nace,
            issue_date,
            self.dividend_yield,
            self.frequency,
            self.market_price,
            self.growth_rate,
        )?;
        Ok(instrument)
    }
}

/// Load all equity holdings from a CSV file
pub fn load_equities<P: AsRef<Path>>(path: P) -> LoadResult<Vec<EquityInstrument>> {
    let reader = std::fs::File::open(path)?;
    load_equities_from_reader(reader)
}

/// Load equity holdings from any reader (e.g., string buffer)
pub fn load_equities_from_reader<R: std::io::Read>(reader: R) -> LoadResult<Vec<EquityInstrument>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut equities = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        equities.push(row.into_instrument()?);
    }

    log::debug!("Loaded {} equity holdings", equities.len());
    Ok(equities)
}
