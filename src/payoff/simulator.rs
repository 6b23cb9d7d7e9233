//! Multi-debt payoff simulation under avalanche and snowball ordering

use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use super::data::{Debt, PayoffPlan, PeriodSnapshot, Strategy};
use super::state::PayoffState;
use crate::error::{ensure_non_negative, EngineError, EngineResult};
use crate::rates::accrue_interest;

/// Hard ceiling on simulated months (100 years)
pub const MAX_PAYOFF_PERIODS: u32 = 1200;

/// Plans longer than this (30 years) carry a warning
pub const LONG_PLAN_WARNING_PERIODS: u32 = 360;

/// Configuration for a payoff run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoffConfig {
    pub strategy: Strategy,

    /// Monthly amount available above the sum of minimums
    pub extra_monthly_budget: f64,

    /// Whether to record a snapshot for every month
    #[serde(default)]
    pub detailed_output: bool,
}

impl PayoffConfig {
    pub fn new(strategy: Strategy, extra_monthly_budget: f64) -> Self {
        Self {
            strategy,
            extra_monthly_budget,
            detailed_output: false,
        }
    }

    pub fn detailed(mut self) -> Self {
        self.detailed_output = true;
        self
    }
}

/// Payoff simulator bound to one configuration
#[derive(Debug, Clone)]
pub struct PayoffSimulator {
    config: PayoffConfig,
}

impl PayoffSimulator {
    pub fn new(config: PayoffConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PayoffConfig {
        &self.config
    }

    /// Run the simulation to completion
    pub fn simulate(&self, debts: &[Debt]) -> EngineResult<PayoffPlan> {
        self.validate(debts)?;
        check_minimums_cover_interest(debts)?;

        let strategy = self.config.strategy;
        let mut state = PayoffState::new(debts, self.config.extra_monthly_budget, strategy);
        let mut snapshots = Vec::new();

        debug!(
            "Simulating {} debts ({}), extra budget {:.2}",
            debts.len(),
            strategy.as_str(),
            self.config.extra_monthly_budget
        );

        while !state.is_done() {
            if state.period >= MAX_PAYOFF_PERIODS {
                warn!(
                    "Payoff did not finish in {} periods; {:.2} still owed",
                    MAX_PAYOFF_PERIODS,
                    state.remaining_balance()
                );
                return Err(EngineError::divergent(format!(
                    "exceeds time horizon of {} months",
                    MAX_PAYOFF_PERIODS
                )));
            }

            let (interest, paid) = state.advance_period();
            trace!(
                "period {}: interest {:.2} paid {:.2} pool {:.2}",
                state.period, interest, paid, state.extra_pool
            );

            if self.config.detailed_output {
                snapshots.push(PeriodSnapshot {
                    period: state.period,
                    total_balance: state.remaining_balance(),
                    interest,
                    paid,
                });
            }
        }

        debug!(
            "Debt free after {} periods, interest {:.2}",
            state.period, state.total_interest
        );

        let warning = self.warning_for(state.period);

        Ok(PayoffPlan {
            strategy,
            total_periods: state.period,
            total_interest: state.total_interest,
            total_paid: state.total_paid,
            per_debt: state.debt_totals(),
            payoff_order: state.payoff_order,
            periods: snapshots,
            warning,
        })
    }

    fn validate(&self, debts: &[Debt]) -> EngineResult<()> {
        if debts.is_empty() {
            return Err(EngineError::invalid("debts", "must contain at least one debt"));
        }
        ensure_non_negative("extra_monthly_budget", self.config.extra_monthly_budget)?;
        debts.iter().try_for_each(Debt::validate)
    }

    fn warning_for(&self, total_periods: u32) -> Option<String> {
        let mut notes = Vec::new();
        if self.config.extra_monthly_budget == 0.0 {
            notes.push("no extra budget: only freed minimums are redirected".to_string());
        }
        if total_periods > LONG_PLAN_WARNING_PERIODS {
            notes.push(format!(
                "plan takes {} months, longer than {} years",
                total_periods,
                LONG_PLAN_WARNING_PERIODS / 12
            ));
        }
        if notes.is_empty() {
            None
        } else {
            Some(notes.join("; "))
        }
    }
}

/// Every minimum must exceed its debt's first month of interest, or that
/// debt never shrinks
fn check_minimums_cover_interest(debts: &[Debt]) -> EngineResult<()> {
    for debt in debts {
        let first_interest = accrue_interest(debt.balance, debt.monthly_rate());
        if debt.minimum_payment <= first_interest {
            warn!("Minimum on '{}' does not cover interest", debt.name);
            return Err(EngineError::divergent(format!(
                "minimum payment {:.2} on '{}' does not cover its monthly interest of {:.2}",
                debt.minimum_payment, debt.name, first_interest
            )));
        }
    }
    Ok(())
}

/// Simulate payoff of `debts` with `extra_monthly_budget` under `strategy`
pub fn simulate_payoff(debts: &[Debt], extra_monthly_budget: f64, strategy: Strategy) -> EngineResult<PayoffPlan> {
    PayoffSimulator::new(PayoffConfig::new(strategy, extra_monthly_budget)).simulate(debts)
}

/// Both strategies run on the same debts and budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyComparison {
    pub avalanche: PayoffPlan,
    pub snowball: PayoffPlan,
}

impl StrategyComparison {
    /// Positive when avalanche pays less interest than snowball
    pub fn interest_saved_by_avalanche(&self) -> f64 {
        self.snowball.total_interest - self.avalanche.total_interest
    }

    pub fn cheaper(&self) -> &PayoffPlan {
        if self.avalanche.total_interest <= self.snowball.total_interest {
            &self.avalanche
        } else {
            &self.snowball
        }
    }
}

pub fn compare_strategies(debts: &[Debt], extra_monthly_budget: f64) -> EngineResult<StrategyComparison> {
    Ok(StrategyComparison {
        avalanche: simulate_payoff(debts, extra_monthly_budget, Strategy::Avalanche)?,
        snowball: simulate_payoff(debts, extra_monthly_budget, Strategy::Snowball)?,
    })
}
