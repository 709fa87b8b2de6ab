//! Per-asset dividend and terminal cash-flow projection

use chrono::NaiveDate;

use crate::equity::EquityInstrument;
use crate::schedule::CashFlowSchedule;

/// Dividend schedule of one instrument over `[modelling_date, end_date]`
///
/// Each dividend is the projected market value at the payment date times the dividend
/// yield. A date that recurs is dropped; amounts on the same date are not summed.
pub fn dividend_schedule(
    instrument: &EquityInstrument,
    modelling_date: NaiveDate,
    end_date: NaiveDate,
) -> CashFlowSchedule {
    let mut schedule = CashFlowSchedule::new(instrument.asset_id());

    for dividend_date in instrument.dividend_date_sequence(modelling_date, end_date) {
        if schedule.amount(dividend_date).is_some() {
            log::trace!(
                "Asset {}: dropping repeated dividend date {}",
                instrument.asset_id(),
                dividend_date
            );
            continue;
        }
        let market_value = instrument.projected_market_value(
            modelling_date,
            dividend_date,
            instrument.market_price(),
            instrument.growth_rate(),
        );
        schedule.insert_if_absent(dividend_date, instrument.dividend_amount(market_value));
    }

    schedule
}

/// Single terminal (sale) flow of one instrument at `terminal_date`
///
/// The amount is the Gordon value of the compounded market value. It is infinite or NaN
/// when `terminal_rate` equals the growth rate; such values are logged, not clamped.
pub fn terminal_schedule(
    instrument: &EquityInstrument,
    modelling_date: NaiveDate,
    terminal_date: NaiveDate,
    terminal_rate: f64,
) -> CashFlowSchedule {
    let market_value = instrument.projected_market_value(
        modelling_date,
        terminal_date,
        instrument.market_price(),
        instrument.growth_rate(),
    );
    let amount = instrument.terminal_amount(market_value, instrument.growth_rate(), terminal_rate);
    if !amount.is_finite() {
        log::warn!(
            "Asset {}: terminal value is not finite (growth rate {} vs terminal rate {})",
            instrument.asset_id(),
            instrument.growth_rate(),
            terminal_rate
        );
    }

    CashFlowSchedule::from_flows(instrument.asset_id(), [(terminal_date, amount)])
}
