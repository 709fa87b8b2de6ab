//! Equity Projection CLI
//!
//! Projects dividend and terminal cash flows for an equity portfolio, writes the
//! intermediate matrices and calibrates a growth rate per holding.

use anyhow::{Context, Result};
use clap::Parser;
use equity_projection::{
    curve::{load_curve, YieldCurve},
    equity::load_equities,
    schedule::{to_matrix, write_equity_matrices},
    GrowthBracket, Portfolio, RunSettings,
};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

/// Margin kept between the upper growth bound and the UFR
const UFR_MARGIN: f64 = 1e-4;

#[derive(Parser, Debug)]
#[command(name = "equity_projection", version, about = "Equity cash-flow projection and growth calibration")]
struct Args {
    /// Equity portfolio CSV
    #[arg(long)]
    equities: PathBuf,

    /// Run parameters CSV (Parameter,Value)
    #[arg(long)]
    settings: PathBuf,

    /// Spot curve CSV (Maturity,Rate); a flat curve is used when omitted
    #[arg(long)]
    curve: Option<PathBuf>,

    /// Flat spot rate used without a curve file
    #[arg(long, default_value_t = 0.03)]
    flat_rate: f64,

    /// Directory for intermediate date axes and matrices
    #[arg(long)]
    intermediate: Option<PathBuf>,

    /// Lower bound of the growth search
    #[arg(long, default_value_t = -0.5, allow_hyphen_values = true)]
    growth_lower: f64,

    /// Upper bound of the growth search (default: just below the UFR)
    #[arg(long, allow_hyphen_values = true)]
    growth_upper: Option<f64>,

    /// Print a JSON report instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct RunReport {
    modelling_date: String,
    end_date: String,
    asset_count: usize,
    dividend_dates: usize,
    total_dividends: f64,
    total_terminal: f64,
    calibrations: Vec<CalibrationRow>,
    execution_time_ms: u64,
}

#[derive(Serialize)]
struct CalibrationRow {
    asset_id: u32,
    input_growth_rate: f64,
    projected_dividends: f64,
    calibrated_growth_rate: Option<f64>,
    error: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let start = Instant::now();

    let settings = RunSettings::load(&args.settings)
        .with_context(|| format!("failed to load settings from {}", args.settings.display()))?;

    let equities = load_equities(&args.equities)
        .with_context(|| format!("failed to load equities from {}", args.equities.display()))?;
    let portfolio: Portfolio = equities.into_iter().collect();
    if portfolio.is_empty() {
        log::warn!("Equity portfolio is empty; nothing to project");
        return Ok(());
    }
    log::info!("Loaded {} equity holdings", portfolio.len());

    let curve = match &args.curve {
        Some(path) => load_curve(path, settings.ufr)
            .with_context(|| format!("failed to load curve from {}", path.display()))?,
        None => YieldCurve::flat(args.flat_rate, settings.ufr),
    };

    let dividends = portfolio.build_dividend_schedules(settings.modelling_date, settings.end_date);
    let terminals = portfolio.build_terminal_schedules(settings.modelling_date, settings.end_date, settings.ufr);
    let dividend_matrix = to_matrix(&dividends);
    let terminal_matrix = to_matrix(&terminals);

    if let Some(dir) = &args.intermediate {
        write_equity_matrices(dir, &dividend_matrix, &terminal_matrix)
            .with_context(|| format!("failed to write intermediate files to {}", dir.display()))?;
    }

    let bracket = GrowthBracket::new(
        args.growth_lower,
        args.growth_upper.unwrap_or(settings.ufr - UFR_MARGIN),
    );
    let calibrations = portfolio.calibrate_growth_rates(
        &curve,
        settings.modelling_date,
        settings.end_date,
        bracket,
        &settings.solver_config(),
    );

    let rows: Vec<CalibrationRow> = portfolio
        .iter()
        .zip(&dividends)
        .zip(&calibrations)
        .map(|((instrument, schedule), calibration)| CalibrationRow {
            asset_id: calibration.asset_id,
            input_growth_rate: instrument.growth_rate(),
            projected_dividends: schedule.total(),
            calibrated_growth_rate: calibration.growth_rate.as_ref().ok().copied(),
            error: calibration.growth_rate.as_ref().err().map(|e| e.to_string()),
        })
        .collect();

    let report = RunReport {
        modelling_date: settings.modelling_date.to_string(),
        end_date: settings.end_date.to_string(),
        asset_count: portfolio.len(),
        dividend_dates: dividend_matrix.n_dates(),
        total_dividends: dividend_matrix.column_totals().iter().sum(),
        total_terminal: terminal_matrix.column_totals().iter().sum(),
        calibrations: rows,
        execution_time_ms: start.elapsed().as_millis() as u64,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Equity Projection v{}", env!("CARGO_PKG_VERSION"));
    println!("========================\n");
    println!("Modelling date: {}", report.modelling_date);
    println!("End date:       {}", report.end_date);
    println!("Assets:         {}", report.asset_count);
    println!("Dividend dates: {}", report.dividend_dates);
    println!("Total dividends (undiscounted): {:.2}", report.total_dividends);
    println!("Total terminal (undiscounted):  {:.2}", report.total_terminal);
    println!();

    println!(
        "{:>8} {:>14} {:>12} {:>14}  {}",
        "Asset", "Dividends", "Input g", "Calibrated g", "Status"
    );
    println!("{}", "-".repeat(75));
    for row in &report.calibrations {
        let prefix = format!(
            "{:>8} {:>14.2} {:>12.6}",
            row.asset_id, row.projected_dividends, row.input_growth_rate
        );
        match (row.calibrated_growth_rate, &row.error) {
            (Some(g), _) => println!("{} {:>14.8}  ok", prefix, g),
            (None, Some(err)) => println!("{} {:>14}  {}", prefix, "-", err),
            (None, None) => println!("{} {:>14}", prefix, "-"),
        }
    }

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
