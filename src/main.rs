//! Payoff Engine CLI
//!
//! Command-line front end for the amortization, payoff, bond and goal calculators

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use payoff_engine::{
    amortization::{compute_schedule, interest_saved, Loan, PaymentFrequency},
    bond::{solve_price, solve_yield, Bond},
    goal::{required_contribution, solve_time_to_goal, SavingsGoal},
    payoff::{compare_strategies, load_debts, PayoffConfig, PayoffSimulator, Strategy},
    report::{AmountFormatter, CalculationKind, HistoryEntry, HistoryRecorder, MemoryHistory, PlainFormatter, Summarize},
};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "payoff-engine", version, about = "Loan, debt payoff, bond yield and savings goal calculators")]
struct Cli {
    /// Print results as JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    /// Currency symbol used in tables and summaries
    #[arg(long, global = true, default_value = "$")]
    currency: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Amortization schedule for a single loan
    Schedule(ScheduleArgs),
    /// Simulate paying off a set of debts
    Payoff(PayoffArgs),
    /// Compare avalanche and snowball on the same debts
    Compare(CompareArgs),
    /// Solve a bond's yield to maturity from its price
    Yield(YieldArgs),
    /// Price a bond from its yield to maturity
    Price(PriceArgs),
    /// Months needed to reach a savings goal
    Goal(GoalArgs),
}

#[derive(Args)]
struct ScheduleArgs {
    #[arg(long)]
    principal: f64,
    /// Annual rate as a decimal (0.055 for 5.5%)
    #[arg(long)]
    rate: f64,
    /// Term in years
    #[arg(long)]
    years: u32,
    #[arg(long, default_value_t = 12)]
    payments_per_year: u32,
    /// Extra principal paid every period
    #[arg(long, default_value_t = 0.0)]
    extra: f64,
    /// Rows printed to the console
    #[arg(long, default_value_t = 12)]
    rows: usize,
    /// Write the full schedule to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,
}

#[derive(Args)]
struct PayoffArgs {
    /// CSV with columns name,balance,apr,minimum_payment
    #[arg(long)]
    debts: PathBuf,
    /// Monthly budget above the sum of minimums
    #[arg(long, default_value_t = 0.0)]
    extra: f64,
    #[arg(long, default_value = "avalanche")]
    strategy: Strategy,
    /// First payment month, used to print calendar payoff dates
    #[arg(long)]
    start_date: Option<NaiveDate>,
    /// Include month-by-month totals
    #[arg(long)]
    detailed: bool,
}

#[derive(Args)]
struct CompareArgs {
    #[arg(long)]
    debts: PathBuf,
    #[arg(long, default_value_t = 0.0)]
    extra: f64,
}

#[derive(Args)]
struct BondArgs {
    #[arg(long, default_value_t = 1000.0)]
    face: f64,
    /// Annual coupon rate as a decimal
    #[arg(long)]
    coupon_rate: f64,
    #[arg(long)]
    years: f64,
    #[arg(long, default_value_t = 2)]
    payments_per_year: u32,
}

#[derive(Args)]
struct YieldArgs {
    #[arg(long)]
    price: f64,
    #[command(flatten)]
    bond: BondArgs,
}

#[derive(Args)]
struct PriceArgs {
    /// Annual yield in percent
    #[arg(long)]
    yield_pct: f64,
    #[command(flatten)]
    bond: BondArgs,
}

#[derive(Args)]
struct GoalArgs {
    #[arg(long)]
    target: f64,
    #[arg(long, default_value_t = 0.0)]
    initial: f64,
    /// Monthly contribution
    #[arg(long, default_value_t = 0.0)]
    contribution: f64,
    /// Annual rate as a decimal
    #[arg(long, default_value_t = 0.0)]
    rate: f64,
    #[arg(long, default_value_t = 12)]
    compounding: u32,
    /// Also report the contribution needed to finish in this many months
    #[arg(long)]
    within_months: Option<u32>,
    #[arg(long)]
    start_date: Option<NaiveDate>,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let fmt = PlainFormatter {
        symbol: cli.currency.clone(),
        ..PlainFormatter::default()
    };
    let mut history = MemoryHistory::new();

    match &cli.command {
        Command::Schedule(args) => {
            let frequency = PaymentFrequency::from_periods(args.payments_per_year)?;
            let loan = Loan::with_term_years(args.principal, args.rate, args.years, frequency)
                .with_extra_payment(args.extra);
            let schedule = compute_schedule(&loan)?;

            if let Some(path) = &args.csv {
                let mut writer = csv::Writer::from_path(path)
                    .with_context(|| format!("Unable to create {}", path.display()))?;
                for entry in &schedule.entries {
                    writer.serialize(entry)?;
                }
                writer.flush()?;
                println!("Full schedule written to: {}", path.display());
            }

            if cli.json {
                print_json(&schedule)?;
            } else {
                println!("{:>6} {:>14} {:>12} {:>12} {:>12} {:>14}",
                    "Period", "Start", "Payment", "Principal", "Interest", "End");
                println!("{}", "-".repeat(76));
                for e in schedule.entries.iter().take(args.rows) {
                    println!("{:>6} {:>14.2} {:>12.2} {:>12.2} {:>12.2} {:>14.2}",
                        e.period, e.starting_balance, e.payment, e.principal_portion,
                        e.interest_portion, e.ending_balance);
                }
                if schedule.len() > args.rows {
                    println!("... ({} more periods)", schedule.len() - args.rows);
                }
                if args.extra > 0.0 {
                    println!("\nInterest saved by extra payment: {}", fmt.format_amount(interest_saved(&loan)?));
                }
            }
            schedule.record_to(&mut history, &fmt);
        }

        Command::Payoff(args) => {
            let debts = load_debts(&args.debts)
                .with_context(|| format!("Failed to load debts from {}", args.debts.display()))?;
            let mut config = PayoffConfig::new(args.strategy, args.extra);
            config.detailed_output = args.detailed;
            let plan = PayoffSimulator::new(config).simulate(&debts)?;

            if cli.json {
                print_json(&plan)?;
            } else {
                println!("Strategy: {}", plan.strategy.as_str());
                println!("{:<24} {:>8} {:>12}", "Debt", "Month", "Date");
                println!("{}", "-".repeat(46));
                let dates = args.start_date.map(|d| plan.payoff_dates(d)).unwrap_or_default();
                for (i, paid) in plan.payoff_order.iter().enumerate() {
                    let date = dates.get(i).map(|(_, d)| d.to_string()).unwrap_or_default();
                    println!("{:<24} {:>8} {:>12}", paid.name, paid.period_paid_off, date);
                }
                if let Some(warning) = &plan.warning {
                    println!("\nWarning: {}", warning);
                }
                for snapshot in &plan.periods {
                    println!("  Month {:>4}: balance {:>14.2} interest {:>10.2} paid {:>10.2}",
                        snapshot.period, snapshot.total_balance, snapshot.interest, snapshot.paid);
                }
            }
            plan.record_to(&mut history, &fmt);
        }

        Command::Compare(args) => {
            let debts = load_debts(&args.debts)
                .with_context(|| format!("Failed to load debts from {}", args.debts.display()))?;
            let comparison = compare_strategies(&debts, args.extra)?;

            if cli.json {
                print_json(&comparison)?;
            } else {
                for plan in [&comparison.avalanche, &comparison.snowball] {
                    println!("{:<10} {:>5} months  interest {:>14}  paid {:>14}",
                        plan.strategy.as_str(), plan.total_periods,
                        fmt.format_amount(plan.total_interest), fmt.format_amount(plan.total_paid));
                }
                println!("\nAvalanche saves {}", fmt.format_amount(comparison.interest_saved_by_avalanche()));
            }
            comparison.record_to(&mut history, &fmt);
        }

        Command::Yield(args) => {
            let bond = Bond::priced(
                args.bond.face,
                args.bond.coupon_rate,
                args.bond.years,
                PaymentFrequency::from_periods(args.bond.payments_per_year)?,
                args.price,
            );
            let solution = solve_yield(&bond)?;

            if cli.json {
                print_json(&solution)?;
            } else {
                println!("Yield to maturity: {:.4}%", solution.annual_yield_pct);
                println!("Current yield:     {:.4}%", bond.current_yield_pct(args.price));
                if solution.is_approximate() {
                    println!("Note: approximate value, bisection did not converge");
                }
            }
            solution.record_to(&mut history, &fmt);
        }

        Command::Price(args) => {
            let bond = Bond::yielding(
                args.bond.face,
                args.bond.coupon_rate,
                args.bond.years,
                PaymentFrequency::from_periods(args.bond.payments_per_year)?,
                args.yield_pct,
            );
            let price = solve_price(&bond)?;

            if cli.json {
                print_json(&serde_json::json!({ "price": price }))?;
            } else {
                println!("Price: {}", fmt.format_amount(price));
            }
            history.record(HistoryEntry {
                kind: CalculationKind::BondPrice,
                summary: format!("Bond price {} at {:.4}% yield", fmt.format_amount(price), args.yield_pct),
            });
        }

        Command::Goal(args) => {
            let goal = SavingsGoal::new(args.target, args.initial, args.contribution, args.rate, args.compounding);
            let projection = solve_time_to_goal(&goal)?;
            let needed = args
                .within_months
                .map(|months| required_contribution(&goal, months))
                .transpose()?;

            if cli.json {
                print_json(&serde_json::json!({
                    "projection": projection,
                    "required_contribution": needed,
                }))?;
            } else {
                println!("Months to goal:   {}", projection.periods);
                println!("Final balance:    {}", fmt.format_amount(projection.final_balance));
                println!("Contributions:    {}", fmt.format_amount(projection.total_contributions));
                println!("Interest earned:  {}", fmt.format_amount(projection.total_interest));
                if let Some(date) = args.start_date.and_then(|d| projection.target_date(d)) {
                    println!("Target date:      {}", date);
                }
                if let (Some(months), Some(amount)) = (args.within_months, needed) {
                    println!("Monthly contribution to finish in {} months: {}", months, fmt.format_amount(amount));
                }
            }
            projection.record_to(&mut history, &fmt);
        }
    }

    for entry in history.entries() {
        log::info!("{}", entry.summary);
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
