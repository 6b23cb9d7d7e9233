//! Savings goal projection

mod solver;

pub use solver::{required_contribution, solve_time_to_goal, GoalProjection, SavingsGoal, MAX_GOAL_PERIODS};
