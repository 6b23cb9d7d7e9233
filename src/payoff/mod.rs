//! Multi-debt payoff simulation

mod data;
mod simulator;
mod state;
pub mod loader;

pub use data::{Debt, DebtTotals, PaidOff, PayoffPlan, PeriodSnapshot, Strategy};
pub use loader::{load_debts, load_debts_from_reader, LoadError};
pub use simulator::{
    compare_strategies, simulate_payoff, PayoffConfig, PayoffSimulator, StrategyComparison,
    LONG_PLAN_WARNING_PERIODS, MAX_PAYOFF_PERIODS,
};
pub use state::{PayoffState, WorkingDebt};
