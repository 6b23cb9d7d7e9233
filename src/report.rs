//! Calling-layer collaborators: amount formatting, history and summaries
//!
//! The engine never formats or records anything itself. Front ends inject an
//! `AmountFormatter` and a `HistoryRecorder` and use `Summarize` to turn a
//! result into one line of text.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::amortization::AmortizationSchedule;
use crate::bond::{SolveMethod, YieldSolution};
use crate::goal::GoalProjection;
use crate::payoff::{PayoffPlan, StrategyComparison};

/// Renders a currency amount for display
pub trait AmountFormatter {
    fn format_amount(&self, value: f64) -> String;
}

/// Symbol prefix, thousands separators and fixed decimals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlainFormatter {
    pub symbol: String,
    pub decimals: usize,
}

impl Default for PlainFormatter {
    fn default() -> Self {
        Self {
            symbol: "$".to_string(),
            decimals: 2,
        }
    }
}

impl AmountFormatter for PlainFormatter {
    fn format_amount(&self, value: f64) -> String {
        let formatted = format!("{:.*}", self.decimals, value.abs());
        let (whole, fraction) = match formatted.split_once('.') {
            Some((w, f)) => (w, Some(f)),
            None => (formatted.as_str(), None),
        };

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, ch) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        let sign = if value < 0.0 && formatted.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
            "-"
        } else {
            ""
        };
        match fraction {
            Some(f) => format!("{}{}{}.{}", sign, self.symbol, grouped, f),
            None => format!("{}{}{}", sign, self.symbol, grouped),
        }
    }
}

/// Which calculator produced a history entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationKind {
    Amortization,
    Payoff,
    StrategyComparison,
    BondYield,
    BondPrice,
    SavingsGoal,
}

/// One textual record of an invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub kind: CalculationKind,
    pub summary: String,
}

/// Sink for invocation summaries
pub trait HistoryRecorder {
    fn record(&mut self, entry: HistoryEntry);
}

/// Keeps the most recent entries in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryHistory {
    entries: VecDeque<HistoryEntry>,
    capacity: Option<usize>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `capacity` entries, dropping the oldest first
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity: Some(capacity),
        }
    }

    /// Oldest first
    pub fn entries(&self) -> &VecDeque<HistoryEntry> {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl HistoryRecorder for MemoryHistory {
    fn record(&mut self, entry: HistoryEntry) {
        if let Some(cap) = self.capacity {
            if cap == 0 {
                return;
            }
            if self.entries.len() >= cap {
                self.entries.pop_front();
            }
        }
        self.entries.push_back(entry);
    }
}

/// One-line description of a result
pub trait Summarize {
    fn kind(&self) -> CalculationKind;

    fn summarize(&self, fmt: &dyn AmountFormatter) -> String;

    /// Summarize and hand the text to a recorder
    fn record_to(&self, recorder: &mut dyn HistoryRecorder, fmt: &dyn AmountFormatter) {
        recorder.record(HistoryEntry {
            kind: self.kind(),
            summary: self.summarize(fmt),
        });
    }
}

impl Summarize for AmortizationSchedule {
    fn kind(&self) -> CalculationKind {
        CalculationKind::Amortization
    }

    fn summarize(&self, fmt: &dyn AmountFormatter) -> String {
        let summary = self.summary();
        format!(
            "Loan of {} at {:.3}%: {} payments of {}, total interest {}",
            fmt.format_amount(self.loan.principal),
            self.loan.annual_rate * 100.0,
            summary.periods,
            fmt.format_amount(summary.level_payment + self.loan.extra_payment),
            fmt.format_amount(summary.total_interest),
        )
    }
}

impl Summarize for PayoffPlan {
    fn kind(&self) -> CalculationKind {
        CalculationKind::Payoff
    }

    fn summarize(&self, fmt: &dyn AmountFormatter) -> String {
        let order: Vec<&str> = self.payoff_order.iter().map(|p| p.name.as_str()).collect();
        format!(
            "{} plan: debt free in {} months, interest {}, total paid {} (order: {})",
            self.strategy.as_str(),
            self.total_periods,
            fmt.format_amount(self.total_interest),
            fmt.format_amount(self.total_paid),
            order.join(", "),
        )
    }
}

impl Summarize for StrategyComparison {
    fn kind(&self) -> CalculationKind {
        CalculationKind::StrategyComparison
    }

    fn summarize(&self, fmt: &dyn AmountFormatter) -> String {
        format!(
            "avalanche {} months / {} interest, snowball {} months / {} interest",
            self.avalanche.total_periods,
            fmt.format_amount(self.avalanche.total_interest),
            self.snowball.total_periods,
            fmt.format_amount(self.snowball.total_interest),
        )
    }
}

impl Summarize for YieldSolution {
    fn kind(&self) -> CalculationKind {
        CalculationKind::BondYield
    }

    fn summarize(&self, _fmt: &dyn AmountFormatter) -> String {
        match self.method {
            SolveMethod::Bisection => format!(
                "Yield to maturity {:.4}% ({} iterations)",
                self.annual_yield_pct, self.iterations
            ),
            SolveMethod::Approximation => format!(
                "Approximate yield to maturity {:.4}% (bisection did not converge)",
                self.annual_yield_pct
            ),
        }
    }
}

impl Summarize for GoalProjection {
    fn kind(&self) -> CalculationKind {
        CalculationKind::SavingsGoal
    }

    fn summarize(&self, fmt: &dyn AmountFormatter) -> String {
        if self.already_met {
            return format!("Goal already met with {}", fmt.format_amount(self.final_balance));
        }
        format!(
            "Goal reached in {} months ({:.1} years): balance {}, interest earned {}",
            self.periods,
            self.years(),
            fmt.format_amount(self.final_balance),
            fmt.format_amount(self.total_interest),
        )
    }
}
