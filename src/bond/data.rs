//! Bond input records

use serde::{Deserialize, Serialize};

use crate::amortization::PaymentFrequency;
use crate::error::{ensure_non_negative, ensure_positive, EngineError, EngineResult};

/// Longest accepted maturity, in coupon periods
pub const MAX_BOND_PERIODS: u32 = 10_000;

/// Observed market side of a bond: either its price or its yield
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BondQuote {
    /// Clean price in currency units, solve for yield
    Price(f64),
    /// Annual yield in percent, solve for price
    Yield(f64),
}

/// A fixed-coupon bond
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bond {
    pub face_value: f64,

    /// Annual coupon rate as a decimal
    pub annual_coupon_rate: f64,

    pub years_to_maturity: f64,

    /// Coupon frequency
    #[serde(default = "default_bond_frequency")]
    pub frequency: PaymentFrequency,

    pub quote: BondQuote,
}

fn default_bond_frequency() -> PaymentFrequency {
    PaymentFrequency::SemiAnnual
}

impl Bond {
    /// Bond quoted at a price
    pub fn priced(
        face_value: f64,
        annual_coupon_rate: f64,
        years_to_maturity: f64,
        frequency: PaymentFrequency,
        price: f64,
    ) -> Self {
        Self {
            face_value,
            annual_coupon_rate,
            years_to_maturity,
            frequency,
            quote: BondQuote::Price(price),
        }
    }

    /// Bond quoted at an annual yield in percent
    pub fn yielding(
        face_value: f64,
        annual_coupon_rate: f64,
        years_to_maturity: f64,
        frequency: PaymentFrequency,
        yield_pct: f64,
    ) -> Self {
        Self {
            quote: BondQuote::Yield(yield_pct),
            ..Self::priced(face_value, annual_coupon_rate, years_to_maturity, frequency, 0.0)
        }
    }

    pub fn periods_per_year(&self) -> u32 {
        self.frequency.periods_per_year()
    }

    /// Coupon paid each period
    pub fn coupon_payment(&self) -> f64 {
        self.face_value * self.annual_coupon_rate / self.periods_per_year() as f64
    }

    /// Remaining coupon periods, rounded to the nearest whole period
    pub fn total_periods(&self) -> u32 {
        (self.years_to_maturity * self.periods_per_year() as f64).round() as u32
    }

    /// Annual coupon divided by price, in percent
    pub fn current_yield_pct(&self, price: f64) -> f64 {
        self.face_value * self.annual_coupon_rate / price * 100.0
    }

    pub fn validate(&self) -> EngineResult<()> {
        ensure_positive("face_value", self.face_value)?;
        ensure_non_negative("annual_coupon_rate", self.annual_coupon_rate)?;
        ensure_positive("years_to_maturity", self.years_to_maturity)?;
        let periods = (self.years_to_maturity * self.periods_per_year() as f64).round();
        if periods < 1.0 {
            return Err(EngineError::invalid(
                "years_to_maturity",
                "must cover at least one coupon period",
            ));
        }
        if periods > MAX_BOND_PERIODS as f64 {
            return Err(EngineError::invalid(
                "years_to_maturity",
                format!("must cover at most {} coupon periods (got {})", MAX_BOND_PERIODS, periods),
            ));
        }
        match self.quote {
            BondQuote::Price(price) => ensure_positive("price", price),
            BondQuote::Yield(yield_pct) => ensure_non_negative("yield", yield_pct),
        }
    }
}
