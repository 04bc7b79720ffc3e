use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LeaderboardError {
    #[error("window starts on {from} but ends on {to}")]
    InvalidWindow { from: NaiveDate, to: NaiveDate },

    #[error("{year}-{month:02} is not a calendar month")]
    InvalidMonth { year: i32, month: u32 },

    #[error("expected a month as YYYY-MM, got {0:?}")]
    InvalidMonthLabel(String),

    #[error("a {days}-day window ending on {end} starts before the earliest supported date")]
    InvalidSpan { end: NaiveDate, days: i64 },

    #[error("baseline score must be finite and non-negative, got {0}")]
    InvalidBaseline(f64),
}
