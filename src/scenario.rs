//! Scenario runner for batch payoff simulations
//!
//! Holds one set of debts and evaluates many budgets and strategies against
//! it. Each run is independent, so batches fan out across threads.

use rayon::prelude::*;

use crate::error::EngineResult;
use crate::payoff::{compare_strategies, Debt, PayoffConfig, PayoffPlan, PayoffSimulator, StrategyComparison};

/// Pre-loaded scenario runner for batch payoff plans
///
/// # Example
/// ```ignore
/// let runner = PlanRunner::new(load_debts("debts.csv")?);
///
/// for extra in [0.0, 100.0, 250.0] {
///     let plan = runner.run(PayoffConfig::new(Strategy::Avalanche, extra))?;
/// }
/// ```
#[derive(Debug, Clone)]
pub struct PlanRunner {
    debts: Vec<Debt>,
}

/// Strategy comparison at one extra budget
#[derive(Debug, Clone)]
pub struct BudgetPoint {
    pub extra_monthly_budget: f64,
    pub comparison: EngineResult<StrategyComparison>,
}

impl PlanRunner {
    pub fn new(debts: Vec<Debt>) -> Self {
        Self { debts }
    }

    /// Run a single plan with the given config
    pub fn run(&self, config: PayoffConfig) -> EngineResult<PayoffPlan> {
        PayoffSimulator::new(config).simulate(&self.debts)
    }

    /// Run many configs in parallel; results keep the order of `configs`
    pub fn run_batch(&self, configs: &[PayoffConfig]) -> Vec<EngineResult<PayoffPlan>> {
        configs
            .par_iter()
            .map(|config| PayoffSimulator::new(config.clone()).simulate(&self.debts))
            .collect()
    }

    /// Avalanche against snowball at one budget
    pub fn compare(&self, extra_monthly_budget: f64) -> EngineResult<StrategyComparison> {
        compare_strategies(&self.debts, extra_monthly_budget)
    }

    /// Compare both strategies across a grid of extra budgets
    pub fn sweep_extra_budgets(&self, budgets: &[f64]) -> Vec<BudgetPoint> {
        budgets
            .par_iter()
            .map(|&extra| BudgetPoint {
                extra_monthly_budget: extra,
                comparison: compare_strategies(&self.debts, extra),
            })
            .collect()
    }

    pub fn debts(&self) -> &[Debt] {
        &self.debts
    }

    pub fn debts_mut(&mut self) -> &mut Vec<Debt> {
        &mut self.debts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payoff::Strategy;

    fn runner() -> PlanRunner {
        PlanRunner::new(vec![
            Debt::new("Visa", 4_200.0, 0.249, 120.0),
            Debt::new("Car", 9_800.0, 0.065, 310.0),
            Debt::new("Store", 650.0, 0.199, 35.0),
        ])
    }

    #[test]
    fn test_batch_matches_sequential() {
        let runner = runner();
        let configs: Vec<_> = [0.0, 100.0, 400.0]
            .iter()
            .flat_map(|&extra| Strategy::ALL.map(|s| PayoffConfig::new(s, extra)))
            .collect();

        let batch = runner.run_batch(&configs);
        assert_eq!(batch.len(), configs.len());
        for (config, result) in configs.iter().zip(&batch) {
            assert_eq!(result.as_ref().unwrap(), &runner.run(config.clone()).unwrap());
        }
    }

    #[test]
    fn test_more_budget_finishes_sooner() {
        let points = runner().sweep_extra_budgets(&[0.0, 100.0, 400.0]);
        let periods: Vec<u32> = points
            .iter()
            .map(|p| p.comparison.as_ref().unwrap().avalanche.total_periods)
            .collect();

        assert!(periods[0] > periods[1] && periods[1] > periods[2]);
        assert_eq!(points[2].extra_monthly_budget, 400.0);
    }

    #[test]
    fn test_errors_stay_per_point() {
        let mut runner = runner();
        runner.debts_mut().push(Debt::new("Underwater", 5_000.0, 0.30, 20.0));
        let points = runner.sweep_extra_budgets(&[50.0]);
        assert!(points[0].comparison.is_err());
        assert_eq!(runner.debts().len(), 4);
    }
}
