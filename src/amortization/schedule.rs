//! Amortization schedule output structures

use serde::{Deserialize, Serialize};

use super::data::Loan;

/// One period of an amortization schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationEntry {
    /// 1-based period index
    pub period: u32,
    pub starting_balance: f64,
    pub payment: f64,
    pub principal_portion: f64,
    pub interest_portion: f64,
    pub ending_balance: f64,
}

/// Complete schedule for one loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    /// Loan the schedule was built from
    pub loan: Loan,

    /// Level payment from the annuity formula (before any extra payment)
    pub level_payment: f64,

    /// Ordered entries, one per period
    pub entries: Vec<AmortizationEntry>,
}

impl AmortizationSchedule {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn final_balance(&self) -> f64 {
        self.entries.last().map(|e| e.ending_balance).unwrap_or(self.loan.principal)
    }

    /// Get summary statistics
    pub fn summary(&self) -> ScheduleSummary {
        let total_paid: f64 = self.entries.iter().map(|e| e.payment).sum();
        let total_interest: f64 = self.entries.iter().map(|e| e.interest_portion).sum();
        let total_principal: f64 = self.entries.iter().map(|e| e.principal_portion).sum();

        ScheduleSummary {
            periods: self.entries.len() as u32,
            level_payment: self.level_payment,
            total_paid,
            total_interest,
            total_principal,
        }
    }
}

/// Summary statistics for a schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub periods: u32,
    pub level_payment: f64,
    pub total_paid: f64,
    pub total_interest: f64,
    pub total_principal: f64,
}
