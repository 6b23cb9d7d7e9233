//! Working state carried between simulated months

use super::data::{Debt, DebtTotals, PaidOff, Strategy};
use crate::rates::BALANCE_EPSILON;

/// Mutable working copy of one input debt
#[derive(Debug, Clone)]
pub struct WorkingDebt {
    /// Position in the caller's input, used for tie-breaks and output order
    pub input_index: usize,
    pub name: String,
    pub balance: f64,
    pub monthly_rate: f64,
    pub minimum_payment: f64,
    pub interest_paid: f64,
    pub total_paid: f64,
    pub paid_off_period: Option<u32>,
}

impl WorkingDebt {
    fn from_debt(input_index: usize, debt: &Debt) -> Self {
        Self {
            input_index,
            name: debt.name.clone(),
            balance: debt.balance,
            monthly_rate: debt.monthly_rate(),
            minimum_payment: debt.minimum_payment,
            interest_paid: 0.0,
            total_paid: 0.0,
            paid_off_period: None,
        }
    }

    pub fn is_paid_off(&self) -> bool {
        self.paid_off_period.is_some()
    }
}

/// Simulation state: an arena of working debts plus the remaining payoff queue
#[derive(Debug, Clone)]
pub struct PayoffState {
    /// Current month (0 before the first period runs)
    pub period: u32,

    /// Working debts in input order
    pub debts: Vec<WorkingDebt>,

    /// Indices into `debts` still carrying a balance, in strategy order.
    /// The first entry is the current target.
    pub queue: Vec<usize>,

    /// Extra budget plus minimums freed in earlier periods
    pub extra_pool: f64,

    pub total_interest: f64,
    pub total_paid: f64,

    /// Retired debts in the order they reached zero
    pub payoff_order: Vec<PaidOff>,
}

impl PayoffState {
    /// Build the arena and sort the queue once by the strategy's comparator
    pub fn new(debts: &[Debt], extra_budget: f64, strategy: Strategy) -> Self {
        let working: Vec<WorkingDebt> = debts
            .iter()
            .enumerate()
            .map(|(i, d)| WorkingDebt::from_debt(i, d))
            .collect();

        let mut queue: Vec<usize> = (0..working.len()).collect();
        // Stable sort keeps input order on ties
        match strategy {
            Strategy::Avalanche => queue.sort_by(|&a, &b| {
                debts[b].apr.total_cmp(&debts[a].apr)
            }),
            Strategy::Snowball => queue.sort_by(|&a, &b| {
                debts[a].balance.total_cmp(&debts[b].balance)
            }),
        }

        Self {
            period: 0,
            debts: working,
            queue,
            extra_pool: extra_budget,
            total_interest: 0.0,
            total_paid: 0.0,
            payoff_order: Vec::new(),
        }
    }

    pub fn is_done(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn remaining_balance(&self) -> f64 {
        self.queue.iter().map(|&i| self.debts[i].balance).sum()
    }

    /// Run one month: accrue, pay minimums, send the pool to the target,
    /// then retire anything at zero. Returns (interest, paid) for the month.
    ///
    /// Minimums freed by debts retired this month join the pool only from
    /// the next month onward.
    pub fn advance_period(&mut self) -> (f64, f64) {
        self.period += 1;

        let mut period_interest = 0.0;
        let mut period_paid = 0.0;
        let mut freed = 0.0;

        for (position, &idx) in self.queue.iter().enumerate() {
            let debt = &mut self.debts[idx];

            let interest = crate::rates::accrue_interest(debt.balance, debt.monthly_rate);
            let due = debt.balance + interest;

            let mut payment = debt.minimum_payment;
            if position == 0 {
                payment += self.extra_pool;
            }
            let payment = payment.min(due);

            debt.balance = due - payment;
            debt.interest_paid += interest;
            debt.total_paid += payment;
            period_interest += interest;
            period_paid += payment;

            if debt.balance < BALANCE_EPSILON {
                debt.balance = 0.0;
                debt.paid_off_period = Some(self.period);
                freed += debt.minimum_payment;
                self.payoff_order.push(PaidOff {
                    name: debt.name.clone(),
                    period_paid_off: self.period,
                });
            }
        }

        let debts = &self.debts;
        self.queue.retain(|&i| !debts[i].is_paid_off());
        self.extra_pool += freed;

        self.total_interest += period_interest;
        self.total_paid += period_paid;

        (period_interest, period_paid)
    }

    /// Per-debt totals in input order
    pub fn debt_totals(&self) -> Vec<DebtTotals> {
        self.debts
            .iter()
            .map(|d| DebtTotals {
                name: d.name.clone(),
                interest_paid: d.interest_paid,
                total_paid: d.total_paid,
            })
            .collect()
    }
}
