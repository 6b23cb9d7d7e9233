//! Interest rate primitives shared by the amortization and payoff engines
//!
//! Rates are annual decimal fractions (0.055 for 5.5%) unless a function
//! says otherwise.

/// Balances within this distance of zero are treated as fully repaid
pub const BALANCE_EPSILON: f64 = 0.005;

/// Rates below this are treated as zero when choosing between closed forms
const ZERO_RATE: f64 = 1e-12;

/// Nominal annual rate split evenly across `periods_per_year`
pub fn periodic_rate(annual_rate: f64, periods_per_year: u32) -> f64 {
    annual_rate / periods_per_year as f64
}

/// Interest accrued on `balance` over one period at `rate`
pub fn accrue_interest(balance: f64, rate: f64) -> f64 {
    balance * rate
}

/// Level payment that retires `principal` over `periods` at `rate` per period
///
/// Annuity formula written as `P·r / (1 − (1+r)^−n)` so a long horizon
/// tends to `P·r` instead of overflowing. Falls back to `P / n` when the rate
/// is zero.
pub fn level_payment(principal: f64, rate: f64, periods: u32) -> f64 {
    if periods == 0 {
        return principal;
    }
    if rate.abs() < ZERO_RATE {
        return principal / periods as f64;
    }

    principal * rate / (1.0 - discount_factor(rate, periods))
}

/// Present value of 1 due `periods` periods from now, `(1+r)^−n`
pub fn discount_factor(rate: f64, periods: u32) -> f64 {
    (1.0 + rate).powf(-(periods as f64))
}

/// Effective annual rate of a nominal rate compounded `compounding` times a year
pub fn effective_annual_rate(annual_rate: f64, compounding: u32) -> f64 {
    (1.0 + annual_rate / compounding as f64).powf(compounding as f64) - 1.0
}

/// Per-period rate equivalent to an effective annual rate
pub fn equivalent_periodic_rate(effective_annual: f64, periods_per_year: u32) -> f64 {
    (1.0 + effective_annual).powf(1.0 / periods_per_year as f64) - 1.0
}

/// Level end-of-period contribution that grows `present` to `target` in `periods`
///
/// Solves `present·(1+r)^n + c·((1+r)^n − 1)/r = target` in discounted form,
/// `c = (target·v − present)·r / (1 − v)` with `v = (1+r)^−n`, which stays
/// finite for any horizon. Never negative.
pub fn sinking_fund_payment(target: f64, present: f64, rate: f64, periods: u32) -> f64 {
    if periods == 0 {
        return 0.0;
    }
    if rate.abs() < ZERO_RATE {
        return ((target - present) / periods as f64).max(0.0);
    }

    let v = discount_factor(rate, periods);
    let shortfall = target * v - present;
    if shortfall <= 0.0 {
        return 0.0;
    }
    shortfall * rate / (1.0 - v)
}
