//! Payoff Engine - amortization and payoff simulation core for loan calculators
//!
//! This library provides:
//! - Level-payment amortization schedules
//! - Multi-debt payoff simulation (avalanche and snowball ordering with rollover)
//! - Bond yield-to-maturity solving by bisection, and pricing from yield
//! - Savings goal time-to-target projection
//! - Batch scenario runs and calling-layer reporting helpers
//!
//! Every engine operation is a pure function over plain input records and
//! returns an `EngineResult`.

pub mod error;
pub mod rates;
pub mod calendar;
pub mod amortization;
pub mod payoff;
pub mod bond;
pub mod goal;
pub mod scenario;
pub mod report;

// Re-export commonly used types
pub use error::{EngineError, EngineResult};
pub use amortization::{compute_schedule, AmortizationEntry, AmortizationSchedule, Loan, PaymentFrequency};
pub use payoff::{compare_strategies, simulate_payoff, Debt, PayoffPlan, Strategy};
pub use bond::{solve_price, solve_yield, Bond, BondQuote, YieldSolution};
pub use goal::{solve_time_to_goal, GoalProjection, SavingsGoal};
pub use scenario::PlanRunner;
