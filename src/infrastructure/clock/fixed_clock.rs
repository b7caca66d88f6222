use chrono::NaiveDate;

use crate::application::ports::Clock;

/// Always reports the same date. Used to pin the license window.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
