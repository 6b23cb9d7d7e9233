//! Bond pricing and yield solving

mod data;
mod solver;

pub use data::{Bond, BondQuote, MAX_BOND_PERIODS};
pub use solver::{
    approximate_yield, bond_price, solve_price, solve_yield, SolveMethod, YieldSolution,
    MAX_BISECTION_ITERATIONS, PRICE_TOLERANCE,
};
