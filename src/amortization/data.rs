//! Loan input records

use serde::{Deserialize, Serialize};

use crate::error::{ensure_non_negative, ensure_positive, EngineError, EngineResult};

/// Longest accepted term, in payment periods
pub const MAX_TERM_PERIODS: u32 = 100_000;

/// How many payments fall in a year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentFrequency {
    Annual,
    SemiAnnual,
    Quarterly,
    Monthly,
    BiWeekly,
    Weekly,
}

impl PaymentFrequency {
    pub const ALL: [PaymentFrequency; 6] = [
        PaymentFrequency::Annual,
        PaymentFrequency::SemiAnnual,
        PaymentFrequency::Quarterly,
        PaymentFrequency::Monthly,
        PaymentFrequency::BiWeekly,
        PaymentFrequency::Weekly,
    ];

    pub fn periods_per_year(&self) -> u32 {
        match self {
            PaymentFrequency::Annual => 1,
            PaymentFrequency::SemiAnnual => 2,
            PaymentFrequency::Quarterly => 4,
            PaymentFrequency::Monthly => 12,
            PaymentFrequency::BiWeekly => 26,
            PaymentFrequency::Weekly => 52,
        }
    }

    /// Map a payments-per-year count back to a frequency
    pub fn from_periods(periods_per_year: u32) -> EngineResult<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.periods_per_year() == periods_per_year)
            .ok_or_else(|| {
                EngineError::invalid(
                    "payments_per_year",
                    format!("must be one of 1, 2, 4, 12, 26, 52 (got {})", periods_per_year),
                )
            })
    }
}

impl Default for PaymentFrequency {
    fn default() -> Self {
        PaymentFrequency::Monthly
    }
}

/// A level-payment loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    /// Amount borrowed
    pub principal: f64,

    /// Nominal annual rate as a decimal
    pub annual_rate: f64,

    /// Number of scheduled payments
    pub term_periods: u32,

    /// Payment frequency
    #[serde(default)]
    pub frequency: PaymentFrequency,

    /// Additional principal paid every period on top of the level payment
    #[serde(default)]
    pub extra_payment: f64,
}

impl Loan {
    pub fn new(principal: f64, annual_rate: f64, term_periods: u32, frequency: PaymentFrequency) -> Self {
        Self {
            principal,
            annual_rate,
            term_periods,
            frequency,
            extra_payment: 0.0,
        }
    }

    /// Loan whose term is given in whole years
    ///
    /// An oversized term saturates and is rejected by `validate`.
    pub fn with_term_years(principal: f64, annual_rate: f64, term_years: u32, frequency: PaymentFrequency) -> Self {
        let term_periods = term_years.saturating_mul(frequency.periods_per_year());
        Self::new(principal, annual_rate, term_periods, frequency)
    }

    /// Same loan with an extra principal payment every period
    pub fn with_extra_payment(mut self, extra_payment: f64) -> Self {
        self.extra_payment = extra_payment;
        self
    }

    pub fn periods_per_year(&self) -> u32 {
        self.frequency.periods_per_year()
    }

    /// Range checks run before any schedule is built
    pub fn validate(&self) -> EngineResult<()> {
        ensure_positive("principal", self.principal)?;
        ensure_non_negative("annual_rate", self.annual_rate)?;
        ensure_non_negative("extra_payment", self.extra_payment)?;
        if self.term_periods == 0 {
            return Err(EngineError::invalid("term_periods", "must be > 0 (got 0)"));
        }
        if self.term_periods > MAX_TERM_PERIODS {
            return Err(EngineError::invalid(
                "term_periods",
                format!("must be <= {} (got {})", MAX_TERM_PERIODS, self.term_periods),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_round_trip() {
        for freq in PaymentFrequency::ALL {
            assert_eq!(PaymentFrequency::from_periods(freq.periods_per_year()).unwrap(), freq);
        }
        assert!(PaymentFrequency::from_periods(3).is_err());
    }

    #[test]
    fn test_term_years() {
        let loan = Loan::with_term_years(10_000.0, 0.05, 3, PaymentFrequency::BiWeekly);
        assert_eq!(loan.term_periods, 78);

        let huge = Loan::with_term_years(10_000.0, 0.05, u32::MAX, PaymentFrequency::Weekly);
        assert_eq!(huge.term_periods, u32::MAX);
        assert!(matches!(huge.validate(), Err(EngineError::InvalidInput { .. })));
    }

    #[test]
    fn test_validate() {
        assert!(Loan::new(1000.0, 0.05, 12, PaymentFrequency::Monthly).validate().is_ok());
        assert!(Loan::new(0.0, 0.05, 12, PaymentFrequency::Monthly).validate().is_err());
        assert!(Loan::new(1000.0, -0.01, 12, PaymentFrequency::Monthly).validate().is_err());
        assert!(Loan::new(1000.0, 0.05, 0, PaymentFrequency::Monthly).validate().is_err());
        assert!(Loan::new(1000.0, 0.05, MAX_TERM_PERIODS, PaymentFrequency::Monthly).validate().is_ok());
        assert!(Loan::new(1000.0, 0.05, MAX_TERM_PERIODS + 1, PaymentFrequency::Monthly).validate().is_err());
        assert!(Loan::new(1000.0, 0.05, 12, PaymentFrequency::Monthly)
            .with_extra_payment(-5.0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_deserialize_defaults() {
        let loan: Loan = serde_json::from_str(
            r#"{"principal": 5000.0, "annual_rate": 0.04, "term_periods": 24}"#,
        )
        .unwrap();
        assert_eq!(loan.frequency, PaymentFrequency::Monthly);
        assert_eq!(loan.extra_payment, 0.0);
    }
}
