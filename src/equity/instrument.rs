//! Equity holding record and its valuation formulas

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{InstrumentError, InstrumentResult};

/// Day-count base used when compounding market prices forward
pub const MARKET_VALUE_DAYS_PER_YEAR: f64 = 365.5;

/// Number of days between two dates, negative when `to` precedes `from`
pub(crate) fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days()
}

/// Dividend payments per year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentFrequency {
    Annual,
    SemiAnnual,
    TriAnnual,
    Quarterly,
    BiMonthly,
    Monthly,
}

impl PaymentFrequency {
    /// Parse a payments-per-year count; only divisors of 12 are accepted
    pub fn from_payments_per_year(payments: u32) -> Option<Self> {
        match payments {
            1 => Some(PaymentFrequency::Annual),
            2 => Some(PaymentFrequency::SemiAnnual),
            3 => Some(PaymentFrequency::TriAnnual),
            4 => Some(PaymentFrequency::Quarterly),
            6 => Some(PaymentFrequency::BiMonthly),
            12 => Some(PaymentFrequency::Monthly),
            _ => None,
        }
    }

    pub fn payments_per_year(&self) -> u32 {
        match self {
            PaymentFrequency::Annual => 1,
            PaymentFrequency::SemiAnnual => 2,
            PaymentFrequency::TriAnnual => 3,
            PaymentFrequency::Quarterly => 4,
            PaymentFrequency::BiMonthly => 6,
            PaymentFrequency::Monthly => 12,
        }
    }

    /// Length of one payment period in months
    pub fn period_months(&self) -> u32 {
        12 / self.payments_per_year()
    }
}

/// A single dividend-paying equity holding
///
/// Fields are validated once in [`EquityInstrument::new`] and are read-only afterwards.
/// Deserialization goes through the same validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EquityRecord")]
pub struct EquityInstrument {
    asset_id: u32,
    sector_code: String,
    issuer: Option<String>,
    issue_date: NaiveDate,
    dividend_yield: f64,
    payment_frequency: PaymentFrequency,
    market_price: f64,
    growth_rate: f64,
}

/// Unvalidated serialized form of [`EquityInstrument`]
#[derive(Debug, Deserialize)]
struct EquityRecord {
    asset_id: u32,
    sector_code: String,
    #[serde(default)]
    issuer: Option<String>,
    issue_date: NaiveDate,
    dividend_yield: f64,
    payment_frequency: PaymentFrequency,
    market_price: f64,
    growth_rate: f64,
}

impl TryFrom<EquityRecord> for EquityInstrument {
    type Error = InstrumentError;

    fn try_from(record: EquityRecord) -> InstrumentResult<Self> {
        let instrument = Self::new(
            record.asset_id,
            record.sector_code,
            record.issue_date,
            record.dividend_yield,
            record.payment_frequency.payments_per_year(),
            record.market_price,
            record.growth_rate,
        )?;
        Ok(match record.issuer {
            Some(issuer) => instrument.with_issuer(issuer),
            None => instrument,
        })
    }
}

impl EquityInstrument {
    /// Create a validated equity record
    ///
    /// Rejects a payment frequency that does not divide 12, negative or non-finite
    /// dividend yield and market price, and a non-finite growth rate.
    pub fn new(
        asset_id: u32,
        sector_code: impl Into<String>,
        issue_date: NaiveDate,
        dividend_yield: f64,
        payment_frequency: u32,
        market_price: f64,
        growth_rate: f64,
    ) -> InstrumentResult<Self> {
        let frequency = PaymentFrequency::from_payments_per_year(payment_frequency).ok_or(
            InstrumentError::InvalidFrequency {
                asset_id,
                frequency: payment_frequency,
            },
        )?;

        for (field, value) in [
            ("dividend_yield", dividend_yield),
            ("market_price", market_price),
            ("growth_rate", growth_rate),
        ] {
            if !value.is_finite() {
                return Err(InstrumentError::NonFinite { asset_id, field });
            }
        }
        if dividend_yield < 0.0 {
            return Err(InstrumentError::NegativeDividendYield {
                asset_id,
                value: dividend_yield,
            });
        }
        if market_price < 0.0 {
            return Err(InstrumentError::NegativeMarketPrice {
                asset_id,
                value: market_price,
            });
        }

        Ok(Self {
            asset_id,
            sector_code: sector_code.into(),
            issuer: None,
            issue_date,
            dividend_yield,
            payment_frequency: frequency,
            market_price,
            growth_rate,
        })
    }

    /// Attach the issuer name
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    pub fn asset_id(&self) -> u32 {
        self.asset_id
    }

    /// NACE sector code
    pub fn sector_code(&self) -> &str {
        &self.sector_code
    }

    pub fn issuer(&self) -> Option<&str> {
        self.issuer.as_deref()
    }

    pub fn issue_date(&self) -> NaiveDate {
        self.issue_date
    }

    pub fn dividend_yield(&self) -> f64 {
        self.dividend_yield
    }

    pub fn payment_frequency(&self) -> PaymentFrequency {
        self.payment_frequency
    }

    /// Market price as of the modelling date
    pub fn market_price(&self) -> f64 {
        self.market_price
    }

    pub fn growth_rate(&self) -> f64 {
        self.growth_rate
    }

    /// Compound `base_price` from the modelling date to `evaluation_date`
    ///
    /// Uses a 365.5-day year, unlike the 365.25 used for year fractions.
    pub fn projected_market_value(
        &self,
        modelling_date: NaiveDate,
        evaluation_date: NaiveDate,
        base_price: f64,
        growth_rate: f64,
    ) -> f64 {
        let t = days_between(modelling_date, evaluation_date) as f64 / MARKET_VALUE_DAYS_PER_YEAR;
        base_price * (1.0 + growth_rate).powf(t)
    }

    /// Dividend paid on a given market price
    pub fn dividend_amount(&self, current_market_price: f64) -> f64 {
        current_market_price * self.dividend_yield
    }

    /// Gordon growth perpetuity value `market_price / (terminal_rate - growth_rate)`
    ///
    /// Infinite or NaN when `terminal_rate == growth_rate`; callers must check
    /// `is_finite()` before using the result.
    pub fn terminal_amount(&self, market_price: f64, growth_rate: f64, terminal_rate: f64) -> f64 {
        market_price / (terminal_rate - growth_rate)
    }

    /// Dividend payment dates in `[modelling_date, end_date]`, anchored on the issue date
    pub fn dividend_date_sequence(&self, modelling_date: NaiveDate, end_date: NaiveDate) -> DividendDates {
        DividendDates::new(
            self.issue_date,
            self.payment_frequency,
            modelling_date,
            end_date,
        )
    }
}

/// Iterator over dividend dates
///
/// Starts one period before the issue date and advances one period at a time while the
/// current date is before the end date. Dates before the modelling date are skipped.
/// Each step advances from the previously reached date, so a month-end clamp carries over.
#[derive(Debug, Clone)]
pub struct DividendDates {
    current: Option<NaiveDate>,
    period: Months,
    modelling_date: NaiveDate,
    end_date: NaiveDate,
}

impl DividendDates {
    fn new(
        issue_date: NaiveDate,
        frequency: PaymentFrequency,
        modelling_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        let period = Months::new(frequency.period_months());
        Self {
            current: issue_date.checked_sub_months(period),
            period,
            modelling_date,
            end_date,
        }
    }
}

impl Iterator for DividendDates {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        loop {
            let current = self.current?;
            if current >= self.end_date {
                self.current = None;
                return None;
            }

            let next = current.checked_add_months(self.period);
            self.current = next;
            let date = next?;

            if date < self.modelling_date {
                continue;
            }
            if date <= self.end_date {
                return Some(date);
            }
            self.current = None;
            return None;
        }
    }
}

impl std::iter::FusedIterator for DividendDates {}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn test_equity(issue_date: NaiveDate, frequency: u32) -> EquityInstrument {
        EquityInstrument::new(1, "C10", issue_date, 0.03, frequency, 100.0, 0.02).unwrap()
    }

    #[test]
    fn test_semiannual_dividend_dates() {
        let equity = test_equity(date(2020, 1, 1), 2);
        let dates: Vec<_> = equity
            .dividend_date_sequence(date(2023, 6, 1), date(2024, 6, 1))
            .collect();
        assert_eq!(dates, vec![date(2023, 7, 1), date(2024, 1, 1)]);
    }

    #[test]
    fn test_dividend_dates_within_window_and_increasing() {
        let modelling = date(2023, 3, 15);
        let end = date(2033, 3, 15);
        for frequency in [1, 2, 3, 4, 6, 12] {
            let equity = test_equity(date(1998, 11, 30), frequency);
            let dates: Vec<_> = equity.dividend_date_sequence(modelling, end).collect();

            assert!(!dates.is_empty());
            assert!(dates.windows(2).all(|w| w[0] < w[1]));
            assert!(dates.iter().all(|d| *d >= modelling && *d <= end));
        }
    }

    #[test]
    fn test_dividend_date_on_modelling_and_end_date_included() {
        let equity = test_equity(date(2020, 6, 30), 1);
        let dates: Vec<_> = equity
            .dividend_date_sequence(date(2022, 6, 30), date(2024, 6, 30))
            .collect();
        assert_eq!(dates, vec![date(2022, 6, 30), date(2023, 6, 30), date(2024, 6, 30)]);
    }

    #[test]
    fn test_issue_date_after_modelling_date() {
        let equity = test_equity(date(2025, 2, 1), 4);
        let dates: Vec<_> = equity
            .dividend_date_sequence(date(2023, 1, 1), date(2025, 12, 31))
            .collect();
        assert_eq!(
            dates,
            vec![date(2025, 2, 1), date(2025, 5, 1), date(2025, 8, 1), date(2025, 11, 1)]
        );
    }

    #[test]
    fn test_month_end_clamp_carries_forward() {
        let equity = test_equity(date(2021, 1, 31), 12);
        let dates: Vec<_> = equity
            .dividend_date_sequence(date(2021, 1, 1), date(2021, 4, 30))
            .collect();
        assert_eq!(
            dates,
            vec![date(2021, 1, 31), date(2021, 2, 28), date(2021, 3, 28), date(2021, 4, 28)]
        );
    }

    #[test]
    fn test_empty_window() {
        let equity = test_equity(date(2020, 1, 1), 2);
        let mut dates = equity.dividend_date_sequence(date(2024, 6, 1), date(2023, 6, 1));
        assert_eq!(dates.next(), None);
        assert_eq!(dates.next(), None);
    }

    #[test]
    fn test_sequence_is_fresh_per_call() {
        let equity = test_equity(date(2020, 1, 1), 4);
        let first: Vec<_> = equity
            .dividend_date_sequence(date(2023, 1, 1), date(2024, 1, 1))
            .collect();
        let second: Vec<_> = equity
            .dividend_date_sequence(date(2023, 1, 1), date(2024, 1, 1))
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_terminal_amount() {
        let equity = test_equity(date(2020, 1, 1), 1);
        let modelling = date(2023, 6, 1);
        let price = equity.projected_market_value(modelling, modelling, 100.0, 0.02);
        assert_eq!(price, 100.0);
        assert_relative_eq!(equity.terminal_amount(price, 0.02, 0.04), 5000.0, max_relative = 1e-12);
        assert_eq!(equity.terminal_amount(250.0, 0.01, 0.06), 250.0 / (0.06 - 0.01));
    }

    #[test]
    fn test_terminal_amount_degenerate() {
        let equity = test_equity(date(2020, 1, 1), 1);
        assert!(!equity.terminal_amount(100.0, 0.04, 0.04).is_finite());
        assert!(equity.terminal_amount(0.0, 0.04, 0.04).is_nan());
    }

    #[test]
    fn test_dividend_amount_and_market_value() {
        let equity = test_equity(date(2020, 1, 1), 1);
        assert_relative_eq!(equity.dividend_amount(200.0), 6.0, max_relative = 1e-12);

        let modelling = date(2023, 1, 1);
        let later = modelling + chrono::Duration::days(731);
        let value = equity.projected_market_value(modelling, later, 100.0, 0.05);
        assert_relative_eq!(value, 100.0 * 1.05_f64.powf(2.0), max_relative = 1e-12);
    }

    #[test]
    fn test_invalid_instruments_rejected() {
        let issue = date(2020, 1, 1);
        assert_eq!(
            EquityInstrument::new(3, "K64", issue, 0.03, 5, 100.0, 0.02),
            Err(InstrumentError::InvalidFrequency { asset_id: 3, frequency: 5 })
        );
        assert!(matches!(
            EquityInstrument::new(3, "K64", issue, 0.03, 0, 100.0, 0.02),
            Err(InstrumentError::InvalidFrequency { .. })
        ));
        assert!(matches!(
            EquityInstrument::new(3, "K64", issue, -0.01, 4, 100.0, 0.02),
            Err(InstrumentError::NegativeDividendYield { .. })
        ));
        assert!(matches!(
            EquityInstrument::new(3, "K64", issue, 0.03, 4, -1.0, 0.02),
            Err(InstrumentError::NegativeMarketPrice { .. })
        ));
        assert!(matches!(
            EquityInstrument::new(3, "K64", issue, 0.03, 4, 100.0, f64::NAN),
            Err(InstrumentError::NonFinite { field: "growth_rate", .. })
        ));
    }

    #[test]
    fn test_period_months() {
        assert_eq!(PaymentFrequency::Annual.period_months(), 12);
        assert_eq!(PaymentFrequency::TriAnnual.period_months(), 4);
        assert_eq!(PaymentFrequency::Monthly.period_months(), 1);
        assert_eq!(PaymentFrequency::from_payments_per_year(7), None);
    }

    #[test]
    fn test_deserialize_validates() {
        let json = r#"{"asset_id":3,"sector_code":"C10","issuer":"Acme","issue_date":"2020-01-01",
            "dividend_yield":0.03,"payment_frequency":"Quarterly","market_price":100.0,"growth_rate":0.02}"#;
        let equity: EquityInstrument = serde_json::from_str(json).unwrap();
        assert_eq!(equity.issuer(), Some("Acme"));
        assert_eq!(equity.payment_frequency(), PaymentFrequency::Quarterly);

        let round_trip: EquityInstrument =
            serde_json::from_str(&serde_json::to_string(&equity).unwrap()).unwrap();
        assert_eq!(round_trip, equity);

        let negative = r#"{"asset_id":3,"sector_code":"C10","issuer":null,"issue_date":"2020-01-01",
            "dividend_yield":-0.5,"payment_frequency":"Annual","market_price":-100.0,"growth_rate":0.02}"#;
        let err = serde_json::from_str::<EquityInstrument>(negative).unwrap_err();
        assert!(err.to_string().contains("dividend yield must be non-negative"));
    }
}
