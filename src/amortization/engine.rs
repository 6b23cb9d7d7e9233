//! Level-payment amortization engine

use log::{debug, trace};

use super::data::Loan;
use super::schedule::{AmortizationEntry, AmortizationSchedule};
use crate::error::{EngineError, EngineResult};
use crate::rates::{accrue_interest, level_payment, periodic_rate, BALANCE_EPSILON};

/// Build the period-by-period schedule for a loan
///
/// The level payment comes from the annuity formula. Each period pays
/// interest on the opening balance first and the rest goes to principal.
/// On the last scheduled period, or as soon as the scheduled principal would
/// take the balance below zero, principal is forced to the remaining balance
/// and that period's payment is recomputed as principal plus interest, so the
/// final entry always ends at exactly zero.
pub fn compute_schedule(loan: &Loan) -> EngineResult<AmortizationSchedule> {
    loan.validate()?;

    let rate = periodic_rate(loan.annual_rate, loan.periods_per_year());
    let level = level_payment(loan.principal, rate, loan.term_periods);
    if !level.is_finite() {
        return Err(EngineError::invalid(
            "annual_rate",
            format!("level payment is not finite at {:.6}/period over {} periods", rate, loan.term_periods),
        ));
    }
    let scheduled = level + loan.extra_payment;

    debug!(
        "Amortizing {:.2} at {:.6}/period over {} periods: level payment {:.2}, scheduled {:.2}",
        loan.principal, rate, loan.term_periods, level, scheduled
    );

    let mut entries = Vec::with_capacity(loan.term_periods as usize);
    let mut balance = loan.principal;

    for period in 1..=loan.term_periods {
        let interest = accrue_interest(balance, rate);
        let mut principal = scheduled - interest;
        let mut payment = scheduled;

        let is_final = period == loan.term_periods || balance - principal < BALANCE_EPSILON;
        if is_final {
            principal = balance;
            payment = principal + interest;
        }

        let ending_balance = if is_final { 0.0 } else { balance - principal };

        trace!(
            "period {}: start {:.2} interest {:.2} principal {:.2} end {:.2}",
            period, balance, interest, principal, ending_balance
        );

        entries.push(AmortizationEntry {
            period,
            starting_balance: balance,
            payment,
            principal_portion: principal,
            interest_portion: interest,
            ending_balance,
        });

        balance = ending_balance;
        if is_final {
            break;
        }
    }

    Ok(AmortizationSchedule {
        loan: loan.clone(),
        level_payment: level,
        entries,
    })
}

/// Interest avoided by the loan's extra payment, versus paying only the level amount
pub fn interest_saved(loan: &Loan) -> EngineResult<f64> {
    let with_extra = compute_schedule(loan)?.summary().total_interest;
    let baseline = compute_schedule(&loan.clone().with_extra_payment(0.0))?
        .summary()
        .total_interest;
    Ok(baseline - with_extra)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amortization::PaymentFrequency;
    use approx::assert_abs_diff_eq;

    fn mortgage() -> Loan {
        Loan::with_term_years(200_000.0, 0.055, 30, PaymentFrequency::Monthly)
    }

    #[test]
    fn test_thirty_year_mortgage() {
        let schedule = compute_schedule(&mortgage()).unwrap();

        assert_eq!(schedule.len(), 360);
        assert_abs_diff_eq!(schedule.level_payment, 1135.58, epsilon = 0.01);
        assert_eq!(schedule.final_balance(), 0.0);

        // First period: interest on the full balance
        let first = &schedule.entries[0];
        assert_abs_diff_eq!(first.interest_portion, 916.67, epsilon = 0.01);
        assert_abs_diff_eq!(first.principal_portion, 218.91, epsilon = 0.01);
    }

    #[test]
    fn test_principal_sums_to_original() {
        for (rate, years, freq) in [
            (0.055, 30, PaymentFrequency::Monthly),
            (0.12, 5, PaymentFrequency::Weekly),
            (0.03, 10, PaymentFrequency::Quarterly),
            (0.08, 7, PaymentFrequency::BiWeekly),
        ] {
            let loan = Loan::with_term_years(87_654.32, rate, years, freq);
            let schedule = compute_schedule(&loan).unwrap();
            let summary = schedule.summary();

            assert_abs_diff_eq!(summary.total_principal, loan.principal, epsilon = 0.01);
            assert_eq!(schedule.final_balance(), 0.0);
            assert_abs_diff_eq!(
                summary.total_paid,
                summary.total_principal + summary.total_interest,
                epsilon = 1e-6
            );
        }
    }

    #[test]
    fn test_zero_rate_equal_payments() {
        let loan = Loan::new(1200.0, 0.0, 12, PaymentFrequency::Monthly);
        let schedule = compute_schedule(&loan).unwrap();

        assert_eq!(schedule.len(), 12);
        for entry in &schedule.entries {
            assert_abs_diff_eq!(entry.payment, 100.0, epsilon = 1e-9);
            assert_abs_diff_eq!(entry.principal_portion, 100.0, epsilon = 1e-9);
            assert_eq!(entry.interest_portion, 0.0);
        }
        assert_eq!(schedule.final_balance(), 0.0);
    }

    #[test]
    fn test_balances_chain_and_stay_non_negative() {
        let schedule = compute_schedule(&mortgage()).unwrap();
        for pair in schedule.entries.windows(2) {
            assert_eq!(pair[0].ending_balance, pair[1].starting_balance);
        }
        assert!(schedule.entries.iter().all(|e| e.ending_balance >= 0.0));
    }

    #[test]
    fn test_extra_payment_shortens_term() {
        let loan = mortgage().with_extra_payment(200.0);
        let schedule = compute_schedule(&loan).unwrap();

        assert!(schedule.len() < 360);
        assert_eq!(schedule.final_balance(), 0.0);
        assert_abs_diff_eq!(schedule.summary().total_principal, 200_000.0, epsilon = 0.01);

        // Last payment is only what was left plus its interest
        let last = schedule.entries.last().unwrap();
        assert!(last.payment <= schedule.level_payment + 200.0);

        assert!(interest_saved(&loan).unwrap() > 0.0);
        assert_abs_diff_eq!(interest_saved(&mortgage()).unwrap(), 0.0);
    }

    #[test]
    fn test_invalid_input() {
        let loan = Loan::new(-1.0, 0.05, 12, PaymentFrequency::Monthly);
        assert!(matches!(
            compute_schedule(&loan),
            Err(EngineError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_very_long_term_stays_finite() {
        let loan = Loan::new(100_000.0, 0.30, 30_000, PaymentFrequency::Monthly);
        let schedule = compute_schedule(&loan).unwrap();

        assert_eq!(schedule.len(), 30_000);
        assert_abs_diff_eq!(schedule.level_payment, 2_500.0, epsilon = 1e-6);
        assert!(schedule.entries.iter().all(|e| {
            e.payment.is_finite() && e.principal_portion.is_finite() && e.ending_balance.is_finite()
        }));

        let principal: f64 = schedule.entries.iter().map(|e| e.principal_portion).sum();
        assert_abs_diff_eq!(principal, 100_000.0, epsilon = 1e-6);
        assert_eq!(schedule.final_balance(), 0.0);
    }

    #[test]
    fn test_idempotent() {
        let a = compute_schedule(&mortgage()).unwrap();
        let b = compute_schedule(&mortgage()).unwrap();
        assert_eq!(a, b);
    }
}
