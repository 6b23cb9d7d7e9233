//! Fixed-payment loan amortization

mod data;
mod engine;
mod schedule;

pub use data::{Loan, PaymentFrequency, MAX_TERM_PERIODS};
pub use engine::{compute_schedule, interest_saved};
pub use schedule::{AmortizationEntry, AmortizationSchedule, ScheduleSummary};
