//! Compare avalanche and snowball across a grid of extra monthly budgets
//!
//! Usage: cargo run --bin compare_strategies -- --debts data/sample_debts.csv --max-extra 1000 --step 50

use anyhow::{Context, Result};
use clap::Parser;
use payoff_engine::payoff::load_debts;
use payoff_engine::PlanRunner;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(about = "Sweep extra monthly budgets and compare payoff strategies")]
struct Args {
    /// CSV with columns name,balance,apr,minimum_payment
    #[arg(long, default_value = "data/sample_debts.csv")]
    debts: PathBuf,

    /// Largest extra budget in the grid
    #[arg(long, default_value_t = 1000.0)]
    max_extra: f64,

    /// Grid spacing
    #[arg(long, default_value_t = 50.0)]
    step: f64,

    #[arg(long, default_value = "strategy_comparison.csv")]
    output: PathBuf,
}

/// One CSV output row per budget
#[derive(Debug, Serialize)]
struct ComparisonRow {
    extra_budget: f64,
    avalanche_months: Option<u32>,
    avalanche_interest: Option<f64>,
    snowball_months: Option<u32>,
    snowball_interest: Option<f64>,
    interest_saved_by_avalanche: Option<f64>,
    error: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    anyhow::ensure!(args.step > 0.0, "--step must be positive");
    anyhow::ensure!(args.max_extra >= 0.0, "--max-extra must be non-negative");

    let start = Instant::now();
    let debts = load_debts(&args.debts)
        .with_context(|| format!("Failed to load debts from {}", args.debts.display()))?;
    println!("Loaded {} debts from {}", debts.len(), args.debts.display());

    let steps = (args.max_extra / args.step).floor() as usize;
    let budgets: Vec<f64> = (0..=steps).map(|i| i as f64 * args.step).collect();

    let runner = PlanRunner::new(debts);
    let sweep_start = Instant::now();
    let points = runner.sweep_extra_budgets(&budgets);
    println!("Ran {} comparisons in {:?}", points.len() * 2, sweep_start.elapsed());

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;

    for point in &points {
        let row = match &point.comparison {
            Ok(c) => ComparisonRow {
                extra_budget: point.extra_monthly_budget,
                avalanche_months: Some(c.avalanche.total_periods),
                avalanche_interest: Some(c.avalanche.total_interest),
                snowball_months: Some(c.snowball.total_periods),
                snowball_interest: Some(c.snowball.total_interest),
                interest_saved_by_avalanche: Some(c.interest_saved_by_avalanche()),
                error: None,
            },
            Err(e) => ComparisonRow {
                extra_budget: point.extra_monthly_budget,
                avalanche_months: None,
                avalanche_interest: None,
                snowball_months: None,
                snowball_interest: None,
                interest_saved_by_avalanche: None,
                error: Some(e.to_string()),
            },
        };
        writer.serialize(row)?;
    }
    writer.flush()?;
    println!("Output written to {}", args.output.display());

    println!("\n{:>10} {:>8} {:>14} {:>8} {:>14}", "Extra", "Aval.", "Interest", "Snow.", "Interest");
    println!("{}", "-".repeat(58));
    for point in &points {
        match &point.comparison {
            Ok(c) => println!("{:>10.2} {:>8} {:>14.2} {:>8} {:>14.2}",
                point.extra_monthly_budget,
                c.avalanche.total_periods, c.avalanche.total_interest,
                c.snowball.total_periods, c.snowball.total_interest),
            Err(e) => println!("{:>10.2}  {}", point.extra_monthly_budget, e),
        }
    }

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
