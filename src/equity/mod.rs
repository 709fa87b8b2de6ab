//! Equity holding records and inforce loading

mod instrument;
pub mod loader;

pub use instrument::{DividendDates, EquityInstrument, PaymentFrequency, MARKET_VALUE_DAYS_PER_YEAR};
pub use loader::{load_equities, load_equities_from_reader};

pub(crate) use instrument::days_between;
