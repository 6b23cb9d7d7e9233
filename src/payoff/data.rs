//! Debt records and payoff plan output structures

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::months_after;
use crate::error::{ensure_non_negative, ensure_positive, EngineError, EngineResult};

/// Ordering policy deciding which debt receives the extra budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Highest APR first
    Avalanche,
    /// Lowest balance first
    Snowball,
}

impl Strategy {
    pub const ALL: [Strategy; 2] = [Strategy::Avalanche, Strategy::Snowball];

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Avalanche => "avalanche",
            Strategy::Snowball => "snowball",
        }
    }
}

impl std::str::FromStr for Strategy {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "avalanche" => Ok(Strategy::Avalanche),
            "snowball" => Ok(Strategy::Snowball),
            other => Err(EngineError::invalid(
                "strategy",
                format!("must be avalanche or snowball (got {})", other),
            )),
        }
    }
}

/// One debt as supplied by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debt {
    pub name: String,

    /// Outstanding balance
    pub balance: f64,

    /// Annual percentage rate as a decimal
    pub apr: f64,

    /// Required payment every month
    pub minimum_payment: f64,
}

impl Debt {
    pub fn new(name: impl Into<String>, balance: f64, apr: f64, minimum_payment: f64) -> Self {
        Self {
            name: name.into(),
            balance,
            apr,
            minimum_payment,
        }
    }

    pub fn monthly_rate(&self) -> f64 {
        crate::rates::periodic_rate(self.apr, 12)
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.name.trim().is_empty() {
            return Err(EngineError::invalid("name", "must not be empty"));
        }
        let field = |f: &str| format!("{}.{}", self.name, f);
        ensure_positive(&field("balance"), self.balance)?;
        ensure_non_negative(&field("apr"), self.apr)?;
        ensure_positive(&field("minimum_payment"), self.minimum_payment)?;
        Ok(())
    }
}

/// When a debt reached zero
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaidOff {
    pub name: String,
    pub period_paid_off: u32,
}

/// Lifetime totals for one debt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtTotals {
    pub name: String,
    pub interest_paid: f64,
    pub total_paid: f64,
}

/// Aggregate state at the end of one simulated month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSnapshot {
    pub period: u32,
    /// Sum of remaining balances after payments
    pub total_balance: f64,
    pub interest: f64,
    pub paid: f64,
}

/// Complete payoff simulation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoffPlan {
    pub strategy: Strategy,
    pub total_periods: u32,
    pub total_interest: f64,
    pub total_paid: f64,

    /// Every debt exactly once, ascending by payoff period
    pub payoff_order: Vec<PaidOff>,

    /// Per-debt totals in input order
    pub per_debt: Vec<DebtTotals>,

    /// Month-by-month aggregates, only when detailed output was requested
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub periods: Vec<PeriodSnapshot>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl PayoffPlan {
    /// Calendar date each debt is retired, counting one month per period from `start`
    pub fn payoff_dates(&self, start: NaiveDate) -> Vec<(String, NaiveDate)> {
        self.payoff_order
            .iter()
            .filter_map(|p| months_after(start, p.period_paid_off).map(|d| (p.name.clone(), d)))
            .collect()
    }

    /// Date the last debt is retired
    pub fn debt_free_date(&self, start: NaiveDate) -> Option<NaiveDate> {
        months_after(start, self.total_periods)
    }

    pub fn period_paid_off(&self, name: &str) -> Option<u32> {
        self.payoff_order
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.period_paid_off)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_parse() {
        assert_eq!("Avalanche".parse::<Strategy>().unwrap(), Strategy::Avalanche);
        assert_eq!("snowball".parse::<Strategy>().unwrap(), Strategy::Snowball);
        assert!("lottery".parse::<Strategy>().is_err());
        assert_eq!(serde_json::to_string(&Strategy::Snowball).unwrap(), "\"snowball\"");
    }

    #[test]
    fn test_debt_validate_names_field() {
        let err = Debt::new("Visa", 0.0, 0.2, 25.0).validate().unwrap_err();
        assert!(err.to_string().contains("Visa.balance"));
        assert!(Debt::new("Visa", 100.0, 0.2, 0.0).validate().is_err());
        assert!(Debt::new("Visa", 100.0, 0.0, 10.0).validate().is_ok());
    }

    #[test]
    fn test_debt_requires_name() {
        for name in ["", "   "] {
            let err = Debt::new(name, 100.0, 0.2, 25.0).validate().unwrap_err();
            assert_eq!(err, EngineError::invalid("name", "must not be empty"));
        }
    }

    #[test]
    fn test_payoff_dates() {
        let plan = PayoffPlan {
            strategy: Strategy::Avalanche,
            total_periods: 14,
            total_interest: 0.0,
            total_paid: 0.0,
            payoff_order: vec![
                PaidOff { name: "A".into(), period_paid_off: 2 },
                PaidOff { name: "B".into(), period_paid_off: 14 },
            ],
            per_debt: Vec::new(),
            periods: Vec::new(),
            warning: None,
        };
        let start = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let dates = plan.payoff_dates(start);
        assert_eq!(dates[0], ("A".to_string(), NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()));
        assert_eq!(plan.debt_free_date(start), NaiveDate::from_ymd_opt(2026, 3, 15));
        assert_eq!(plan.period_paid_off("B"), Some(14));
        assert_eq!(plan.period_paid_off("C"), None);
    }
}
