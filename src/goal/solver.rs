//! Time-to-goal projection for a savings balance with regular contributions
//!
//! Contributions are monthly. The goal's nominal annual rate is converted to
//! an effective annual rate using its own compounding frequency, and from
//! there to the equivalent monthly rate.

use chrono::NaiveDate;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::calendar::months_after;
use crate::error::{ensure_non_negative, EngineError, EngineResult};
use crate::rates::{effective_annual_rate, equivalent_periodic_rate, sinking_fund_payment};

/// Ceiling on projected months (150 years)
pub const MAX_GOAL_PERIODS: u32 = 1800;

/// Contributions per year
const CONTRIBUTIONS_PER_YEAR: u32 = 12;

/// A savings target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsGoal {
    pub target_amount: f64,

    #[serde(default)]
    pub initial_balance: f64,

    /// Deposited at the end of every month
    #[serde(default)]
    pub periodic_contribution: f64,

    /// Nominal annual rate as a decimal
    #[serde(default)]
    pub annual_rate: f64,

    #[serde(default = "default_compounding")]
    pub compounding_periods_per_year: u32,
}

fn default_compounding() -> u32 {
    12
}

impl SavingsGoal {
    pub fn new(
        target_amount: f64,
        initial_balance: f64,
        periodic_contribution: f64,
        annual_rate: f64,
        compounding_periods_per_year: u32,
    ) -> Self {
        Self {
            target_amount,
            initial_balance,
            periodic_contribution,
            annual_rate,
            compounding_periods_per_year,
        }
    }

    /// Monthly growth rate equivalent to the goal's compounding convention
    pub fn monthly_rate(&self) -> f64 {
        if self.annual_rate == 0.0 {
            return 0.0;
        }
        let effective = effective_annual_rate(self.annual_rate, self.compounding_periods_per_year);
        equivalent_periodic_rate(effective, CONTRIBUTIONS_PER_YEAR)
    }

    pub fn validate(&self) -> EngineResult<()> {
        ensure_non_negative("target_amount", self.target_amount)?;
        ensure_non_negative("initial_balance", self.initial_balance)?;
        ensure_non_negative("periodic_contribution", self.periodic_contribution)?;
        ensure_non_negative("annual_rate", self.annual_rate)?;
        if self.compounding_periods_per_year == 0 {
            return Err(EngineError::invalid("compounding_periods_per_year", "must be > 0 (got 0)"));
        }
        Ok(())
    }
}

/// Outcome of a time-to-goal solve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalProjection {
    /// Months of contributions needed
    pub periods: u32,
    pub final_balance: f64,
    pub total_contributions: f64,
    /// Growth earned: final balance less initial balance and contributions
    pub total_interest: f64,
    /// The starting balance already met the target
    pub already_met: bool,
}

impl GoalProjection {
    pub fn years(&self) -> f64 {
        self.periods as f64 / CONTRIBUTIONS_PER_YEAR as f64
    }

    /// Month in which the target is reached, counting from `start`
    pub fn target_date(&self, start: NaiveDate) -> Option<NaiveDate> {
        months_after(start, self.periods)
    }
}

/// Number of monthly periods until the balance reaches the target
pub fn solve_time_to_goal(goal: &SavingsGoal) -> EngineResult<GoalProjection> {
    goal.validate()?;

    if goal.target_amount <= goal.initial_balance {
        debug!("Goal already met by initial balance {:.2}", goal.initial_balance);
        return Ok(GoalProjection {
            periods: 0,
            final_balance: goal.initial_balance,
            total_contributions: 0.0,
            total_interest: 0.0,
            already_met: true,
        });
    }

    let contribution = goal.periodic_contribution;
    if contribution == 0.0 && (goal.annual_rate == 0.0 || goal.initial_balance == 0.0) {
        return Err(EngineError::divergent(
            "goal unreachable: nothing is contributed and the balance cannot grow",
        ));
    }

    let rate = goal.monthly_rate();
    let periods = if rate == 0.0 {
        let needed = ((goal.target_amount - goal.initial_balance) / contribution).ceil() as u32;
        if needed > MAX_GOAL_PERIODS {
            return Err(unreachable_within_horizon(goal));
        }
        needed
    } else {
        let mut balance = goal.initial_balance;
        let mut periods = 0;
        while balance < goal.target_amount {
            if periods >= MAX_GOAL_PERIODS {
                return Err(unreachable_within_horizon(goal));
            }
            balance = balance * (1.0 + rate) + contribution;
            periods += 1;
        }
        periods
    };

    let final_balance = balance_after(goal, rate, periods);
    let total_contributions = contribution * periods as f64;

    debug!(
        "Goal of {:.2} reached after {} periods at {:.6}/month",
        goal.target_amount, periods, rate
    );

    Ok(GoalProjection {
        periods,
        final_balance,
        total_contributions,
        total_interest: final_balance - goal.initial_balance - total_contributions,
        already_met: false,
    })
}

/// Level monthly contribution that reaches the target in exactly `periods` months
pub fn required_contribution(goal: &SavingsGoal, periods: u32) -> EngineResult<f64> {
    goal.validate()?;
    if periods == 0 {
        return Err(EngineError::invalid("periods", "must be > 0 (got 0)"));
    }

    let rate = goal.monthly_rate();
    let contribution = sinking_fund_payment(goal.target_amount, goal.initial_balance, rate, periods);
    if !contribution.is_finite() {
        return Err(EngineError::invalid(
            "periods",
            format!("no finite contribution reaches the target in {} months", periods),
        ));
    }
    Ok(contribution)
}

/// Balance after `periods` months of growth and end-of-month contributions
fn balance_after(goal: &SavingsGoal, rate: f64, periods: u32) -> f64 {
    (0..periods).fold(goal.initial_balance, |balance, _| {
        balance * (1.0 + rate) + goal.periodic_contribution
    })
}

fn unreachable_within_horizon(goal: &SavingsGoal) -> EngineError {
    warn!("Goal of {:.2} not reached within {} months", goal.target_amount, MAX_GOAL_PERIODS);
    EngineError::divergent(format!(
        "goal of {:.2} not reached within {} months",
        goal.target_amount, MAX_GOAL_PERIODS
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_monthly_saver_with_interest() {
        let goal = SavingsGoal::new(10_000.0, 0.0, 200.0, 0.05, 12);
        let projection = solve_time_to_goal(&goal).unwrap();

        assert!((45..=46).contains(&projection.periods), "periods = {}", projection.periods);
        assert!(projection.final_balance >= 10_000.0);
        assert_abs_diff_eq!(projection.total_contributions, 200.0 * projection.periods as f64);
        assert!(projection.total_interest > 0.0);
        assert_abs_diff_eq!(
            projection.final_balance,
            projection.total_contributions + projection.total_interest,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_zero_rate_is_exact_ceiling() {
        for (target, initial, contribution) in [
            (10_000.0, 0.0, 200.0),
            (10_000.0, 1_234.0, 300.0),
            (999.99, 0.0, 100.0),
            (5_000.0, 4_999.0, 250.0),
        ] {
            let goal = SavingsGoal::new(target, initial, contribution, 0.0, 12);
            let projection = solve_time_to_goal(&goal).unwrap();
            let expected = ((target - initial) / contribution).ceil() as u32;
            assert_eq!(projection.periods, expected);
            assert_eq!(projection.total_interest, 0.0);
        }
    }

    #[test]
    fn test_already_met() {
        let goal = SavingsGoal::new(5_000.0, 6_000.0, 100.0, 0.03, 12);
        let projection = solve_time_to_goal(&goal).unwrap();
        assert!(projection.already_met);
        assert_eq!(projection.periods, 0);
        assert_eq!(projection.final_balance, 6_000.0);
    }

    #[test]
    fn test_unreachable_without_contribution_or_rate() {
        let goal = SavingsGoal::new(5_000.0, 1_000.0, 0.0, 0.0, 12);
        assert!(matches!(solve_time_to_goal(&goal), Err(EngineError::Divergent { .. })));
    }

    #[test]
    fn test_growth_only_goal() {
        // No contributions, balance doubles through interest alone
        let goal = SavingsGoal::new(2_000.0, 1_000.0, 0.0, 0.06, 12);
        let projection = solve_time_to_goal(&goal).unwrap();
        assert_eq!(projection.periods, 139);
        assert_eq!(projection.total_contributions, 0.0);
    }

    #[test]
    fn test_horizon_exceeded() {
        let goal = SavingsGoal::new(10_000_000.0, 0.0, 1.0, 0.001, 1);
        assert!(matches!(solve_time_to_goal(&goal), Err(EngineError::Divergent { .. })));
    }

    #[test]
    fn test_compounding_frequency_changes_rate() {
        let annual = SavingsGoal::new(10_000.0, 0.0, 200.0, 0.05, 1);
        let daily = SavingsGoal::new(10_000.0, 0.0, 200.0, 0.05, 365);
        assert!(daily.monthly_rate() > annual.monthly_rate());
        assert_abs_diff_eq!(annual.monthly_rate(), 1.05_f64.powf(1.0 / 12.0) - 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_required_contribution_hits_target() {
        let goal = SavingsGoal::new(10_000.0, 500.0, 0.0, 0.05, 12);
        let contribution = required_contribution(&goal, 48).unwrap();

        let funded = SavingsGoal { periodic_contribution: contribution, ..goal.clone() };
        let projection = solve_time_to_goal(&funded).unwrap();
        assert!((48..=49).contains(&projection.periods));
        assert_abs_diff_eq!(balance_after(&funded, funded.monthly_rate(), 48), 10_000.0, epsilon = 1e-6);

        assert!(required_contribution(&goal, 0).is_err());
        let rich = SavingsGoal::new(1_000.0, 2_000.0, 0.0, 0.05, 12);
        assert_eq!(required_contribution(&rich, 12).unwrap(), 0.0);
    }

    #[test]
    fn test_required_contribution_long_horizon() {
        // (1+r)^n overflows over this horizon; the contribution must stay finite
        let goal = SavingsGoal::new(10_000.0, 0.0, 0.0, 0.6, 12);
        let contribution = required_contribution(&goal, 100_000).unwrap();
        assert!(contribution.is_finite());
        assert!(contribution >= 0.0 && contribution < 1e-6);

        let seeded = SavingsGoal::new(10_000.0, 1.0, 0.0, 0.6, 12);
        assert_eq!(required_contribution(&seeded, 100_000).unwrap(), 0.0);
    }

    #[test]
    fn test_target_date() {
        let goal = SavingsGoal::new(1_200.0, 0.0, 100.0, 0.0, 12);
        let projection = solve_time_to_goal(&goal).unwrap();
        let start = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert_eq!(projection.target_date(start), NaiveDate::from_ymd_opt(2026, 6, 1));
        assert_abs_diff_eq!(projection.years(), 1.0);
    }
}
