use chrono::{DateTime, NaiveDate};
use thiserror::Error;
use tracing::debug;

use crate::models::{NormalizedLogEntry, RawDay, RawLogEntry, RawValue};

/// Why a single raw log was left out. Never escapes [`normalize`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MalformedRecord {
    #[error("missing day")]
    MissingDay,
    #[error("unparseable day {0:?}")]
    InvalidDay(String),
    #[error("missing value")]
    MissingValue,
    #[error("non-numeric value {0:?}")]
    InvalidValue(String),
    #[error("value is not finite")]
    NonFinite,
    #[error("negative value {0}")]
    Negative(f64),
}

pub fn normalize(raw: &[RawLogEntry]) -> Vec<NormalizedLogEntry> {
    raw.iter()
        .enumerate()
        .filter_map(|(index, entry)| match normalize_entry(entry) {
            Ok(normalized) => Some(normalized),
            Err(reason) => {
                debug!(index, %reason, "dropping malformed log entry");
                None
            }
        })
        .collect()
}

pub fn normalize_entry(entry: &RawLogEntry) -> Result<NormalizedLogEntry, MalformedRecord> {
    let date = parse_day(entry.day.as_ref().ok_or(MalformedRecord::MissingDay)?)?;
    let value = parse_value(entry.value.as_ref().ok_or(MalformedRecord::MissingValue)?)?;
    Ok(NormalizedLogEntry { date, value })
}

fn parse_day(day: &RawDay) -> Result<NaiveDate, MalformedRecord> {
    match day {
        RawDay::Date(date) => Ok(*date),
        RawDay::Text(text) => {
            let text = text.trim();
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .or_else(|| {
                    DateTime::parse_from_rfc3339(text)
                        .ok()
                        .map(|stamp| stamp.date_naive())
                })
                .ok_or_else(|| MalformedRecord::InvalidDay(text.to_string()))
        }
        RawDay::Other(other) => Err(MalformedRecord::InvalidDay(other.to_string())),
    }
}

fn parse_value(value: &RawValue) -> Result<f64, MalformedRecord> {
    let number = match value {
        RawValue::Number(number) => *number,
        RawValue::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| MalformedRecord::InvalidValue(text.clone()))?,
        RawValue::Other(other) => return Err(MalformedRecord::InvalidValue(other.to_string())),
    };

    if !number.is_finite() {
        return Err(MalformedRecord::NonFinite);
    }
    if number < 0.0 {
        return Err(MalformedRecord::Negative(number));
    }
    Ok(number)
}
