//! Calendar projection of monthly period counts

use chrono::{Months, NaiveDate};

/// Date `months` whole months after `start`, or None past the calendar's range
pub fn months_after(start: NaiveDate, months: u32) -> Option<NaiveDate> {
    start.checked_add_months(Months::new(months))
}
