//! Bond pricing and yield-to-maturity solving
//!
//! Yield is found by bisection on the per-period rate over [0, 1]. Price is
//! monotonically decreasing in yield, so a price above the observed one means
//! the yield is too low.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::data::{Bond, BondQuote};
use crate::error::{EngineError, EngineResult};
use crate::rates::discount_factor;

/// Iteration cap for the bisection
pub const MAX_BISECTION_ITERATIONS: u32 = 100;

/// Convergence tolerance on price, in currency units
pub const PRICE_TOLERANCE: f64 = 0.00001;

/// Per-period yield search interval
const YIELD_LOWER_BOUND: f64 = 0.0;
const YIELD_UPPER_BOUND: f64 = 1.0;

/// How a yield was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolveMethod {
    /// Bisection converged within tolerance
    Bisection,
    /// Iterations ran out; closed-form approximate yield returned instead
    Approximation,
}

/// Result of a yield solve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldSolution {
    /// Annualized yield in percent (`per_period_yield × periods_per_year × 100`)
    pub annual_yield_pct: f64,
    pub per_period_yield: f64,
    pub iterations: u32,
    pub method: SolveMethod,
    /// Model price at the solved yield minus the observed price
    pub price_error: f64,
}

impl YieldSolution {
    /// True when the value is only the approximate-yield estimate
    pub fn is_approximate(&self) -> bool {
        self.method == SolveMethod::Approximation
    }
}

/// Price of the bond's remaining cash flows at per-period yield `y`
///
/// `coupon·(1 − (1+y)^−N)/y + face·(1+y)^−N`, or `coupon·N + face` at `y = 0`.
pub fn bond_price(bond: &Bond, y: f64) -> f64 {
    let coupon = bond.coupon_payment();
    let n = bond.total_periods();

    if y == 0.0 {
        return coupon * n as f64 + bond.face_value;
    }

    let discount = discount_factor(y, n);
    coupon * (1.0 - discount) / y + bond.face_value * discount
}

/// Closed-form approximate yield to maturity, annual decimal
///
/// `(annual coupon + (F − P)/T) / ((F + P)/2)`
pub fn approximate_yield(bond: &Bond, price: f64) -> f64 {
    let annual_coupon = bond.annual_coupon_rate * bond.face_value;
    let face = bond.face_value;
    (annual_coupon + (face - price) / bond.years_to_maturity) / ((face + price) / 2.0)
}

/// Solve for the yield that reproduces the bond's quoted price
pub fn solve_yield(bond: &Bond) -> EngineResult<YieldSolution> {
    bond.validate()?;
    let target = match bond.quote {
        BondQuote::Price(price) => price,
        BondQuote::Yield(_) => {
            return Err(EngineError::invalid("quote", "must be a price to solve for yield"))
        }
    };

    // The root must lie between the prices at the two ends of the interval
    let price_at_low = bond_price(bond, YIELD_LOWER_BOUND);
    let price_at_high = bond_price(bond, YIELD_UPPER_BOUND);
    if target > price_at_low + PRICE_TOLERANCE || target < price_at_high - PRICE_TOLERANCE {
        return Err(EngineError::non_convergent(format!(
            "price {:.4} outside [{:.4}, {:.4}] implied by per-period yields {}..{}",
            target, price_at_high, price_at_low, YIELD_LOWER_BOUND, YIELD_UPPER_BOUND
        )));
    }

    bisect(bond, target, MAX_BISECTION_ITERATIONS)
}

/// Bisect the per-period yield for `target`, falling back to the approximate
/// yield when `max_iterations` run out
fn bisect(bond: &Bond, target: f64, max_iterations: u32) -> EngineResult<YieldSolution> {
    let ppy = bond.periods_per_year() as f64;
    let mut low = YIELD_LOWER_BOUND;
    let mut high = YIELD_UPPER_BOUND;

    for iteration in 1..=max_iterations {
        if !(high > low) || low < YIELD_LOWER_BOUND || high > YIELD_UPPER_BOUND {
            return Err(EngineError::non_convergent(format!(
                "bracket collapsed to [{}, {}] after {} iterations",
                low, high, iteration - 1
            )));
        }

        let mid = (low + high) / 2.0;
        let error = bond_price(bond, mid) - target;

        if error.abs() < PRICE_TOLERANCE {
            debug!("Yield converged after {} iterations: {:.8}/period", iteration, mid);
            return Ok(YieldSolution {
                annual_yield_pct: mid * ppy * 100.0,
                per_period_yield: mid,
                iterations: iteration,
                method: SolveMethod::Bisection,
                price_error: error,
            });
        }

        if error > 0.0 {
            low = mid;
        } else {
            high = mid;
        }
    }

    let annual = approximate_yield(bond, target);
    let per_period = annual / ppy;
    warn!(
        "Bisection did not reach tolerance in {} iterations, using approximate yield {:.4}%",
        max_iterations,
        annual * 100.0
    );

    Ok(YieldSolution {
        annual_yield_pct: annual * 100.0,
        per_period_yield: per_period,
        iterations: max_iterations,
        method: SolveMethod::Approximation,
        price_error: bond_price(bond, per_period) - target,
    })
}

/// Price the bond from its quoted annual yield (percent)
pub fn solve_price(bond: &Bond) -> EngineResult<f64> {
    bond.validate()?;
    match bond.quote {
        BondQuote::Yield(yield_pct) => {
            let per_period = yield_pct / 100.0 / bond.periods_per_year() as f64;
            Ok(bond_price(bond, per_period))
        }
        BondQuote::Price(_) => Err(EngineError::invalid("quote", "must be a yield to solve for price")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amortization::PaymentFrequency;
    use approx::assert_abs_diff_eq;

    fn discount_bond() -> Bond {
        Bond::priced(1000.0, 0.05, 10.0, PaymentFrequency::SemiAnnual, 950.0)
    }

    #[test]
    fn test_price_at_par_yield() {
        // Coupon rate equal to yield prices at par
        let bond = discount_bond();
        assert_abs_diff_eq!(bond_price(&bond, 0.025), 1000.0, epsilon = 1e-9);
        assert_abs_diff_eq!(bond_price(&bond, 0.0), 1500.0);
    }

    #[test]
    fn test_solve_discount_bond() {
        let solution = solve_yield(&discount_bond()).unwrap();

        assert_eq!(solution.method, SolveMethod::Bisection);
        assert!(solution.iterations <= MAX_BISECTION_ITERATIONS);
        assert_abs_diff_eq!(solution.annual_yield_pct, 5.6617, epsilon = 0.001);
        assert!(solution.price_error.abs() < PRICE_TOLERANCE);
    }

    #[test]
    fn test_round_trip_reproduces_price() {
        for (price, coupon, years, freq) in [
            (950.0, 0.05, 10.0, PaymentFrequency::SemiAnnual),
            (1082.5, 0.07, 5.0, PaymentFrequency::Annual),
            (612.0, 0.0, 12.0, PaymentFrequency::Annual),
            (998.0, 0.03, 2.0, PaymentFrequency::Quarterly),
        ] {
            let bond = Bond::priced(1000.0, coupon, years, freq, price);
            let solution = solve_yield(&bond).unwrap();
            let repriced = bond_price(&bond, solution.per_period_yield);
            assert!((repriced - price).abs() < PRICE_TOLERANCE, "price {} repriced {}", price, repriced);
        }
    }

    #[test]
    fn test_premium_bond_yields_below_coupon() {
        let bond = Bond::priced(1000.0, 0.07, 5.0, PaymentFrequency::Annual, 1082.5);
        let solution = solve_yield(&bond).unwrap();
        assert!(solution.annual_yield_pct < 7.0);
    }

    #[test]
    fn test_price_above_undiscounted_cash_flows_cannot_bracket() {
        // No non-negative yield can justify paying more than every cash flow combined
        let bond = Bond::priced(1000.0, 0.05, 10.0, PaymentFrequency::SemiAnnual, 1600.0);
        assert!(matches!(solve_yield(&bond), Err(EngineError::NonConvergent { .. })));
    }

    #[test]
    fn test_approximate_yield_formula() {
        // (50 + 5) / 975
        assert_abs_diff_eq!(approximate_yield(&discount_bond(), 950.0), 0.056410, epsilon = 1e-6);
    }

    #[test]
    fn test_falls_back_to_approximation_when_iterations_run_out() {
        let bond = discount_bond();
        let solution = bisect(&bond, 950.0, 3).unwrap();

        assert_eq!(solution.method, SolveMethod::Approximation);
        assert!(solution.is_approximate());
        assert_eq!(solution.iterations, 3);
        assert_abs_diff_eq!(solution.annual_yield_pct, approximate_yield(&bond, 950.0) * 100.0, epsilon = 1e-12);
        assert_abs_diff_eq!(solution.per_period_yield, solution.annual_yield_pct / 100.0 / 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(
            solution.price_error,
            bond_price(&bond, solution.per_period_yield) - 950.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_solve_price_from_yield() {
        let bond = Bond::yielding(1000.0, 0.05, 10.0, PaymentFrequency::SemiAnnual, 5.0);
        assert_abs_diff_eq!(solve_price(&bond).unwrap(), 1000.0, epsilon = 1e-9);

        let solved = solve_yield(&discount_bond()).unwrap();
        let quoted = Bond::yielding(1000.0, 0.05, 10.0, PaymentFrequency::SemiAnnual, solved.annual_yield_pct);
        assert!((solve_price(&quoted).unwrap() - 950.0).abs() < 1e-4);
    }

    #[test]
    fn test_quote_kind_mismatch() {
        let bond = Bond::yielding(1000.0, 0.05, 10.0, PaymentFrequency::SemiAnnual, 5.0);
        assert!(matches!(solve_yield(&bond), Err(EngineError::InvalidInput { .. })));
        assert!(matches!(solve_price(&discount_bond()), Err(EngineError::InvalidInput { .. })));
    }

    #[test]
    fn test_idempotent() {
        assert_eq!(solve_yield(&discount_bond()).unwrap(), solve_yield(&discount_bond()).unwrap());
    }
}
