use chrono::NaiveDate;

/// Source of the current calendar date for the license window.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}
