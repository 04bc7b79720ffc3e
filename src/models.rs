use std::fmt;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::LeaderboardError;

/// Stable participant key. Also the secondary sort key for tied scores.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityId(pub String);

impl IdentityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for IdentityId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// The `day` of a raw log as it was stored: either already a date or free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawDay {
    Date(NaiveDate),
    Text(String),
    /// Anything else the store handed back; always malformed.
    Other(serde_json::Value),
}

/// The `value` of a raw log: a number, or text that hopefully holds one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
    /// Anything else the store handed back; always malformed.
    Other(serde_json::Value),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawLogEntry {
    #[serde(default)]
    pub day: Option<RawDay>,
    #[serde(default)]
    pub value: Option<RawValue>,
}

impl RawLogEntry {
    pub fn text(day: &str, value: &str) -> Self {
        Self {
            day: Some(RawDay::Text(day.to_string())),
            value: Some(RawValue::Text(value.to_string())),
        }
    }

    pub fn reading(day: NaiveDate, value: f64) -> Self {
        Self {
            day: Some(RawDay::Date(day)),
            value: Some(RawValue::Number(value)),
        }
    }
}

/// A log entry that passed validation: a real date and a finite, non-negative value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedLogEntry {
    pub date: NaiveDate,
    pub value: f64,
}

/// Opaque contact details carried alongside a participant. The engine never reads them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub identity_id: IdentityId,
    pub display_name: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub logs: Vec<RawLogEntry>,
    #[serde(default)]
    pub contact: ContactInfo,
}

/// Inclusive calendar-date range used to filter logs before aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSpec {
    from: NaiveDate,
    to: NaiveDate,
}

impl WindowSpec {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, LeaderboardError> {
        if from > to {
            return Err(LeaderboardError::InvalidWindow { from, to });
        }
        Ok(Self { from, to })
    }

    /// The whole calendar month, first to last day.
    pub fn month(year: i32, month: u32) -> Result<Self, LeaderboardError> {
        let invalid = || LeaderboardError::InvalidMonth { year, month };
        let from = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let next = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or_else(invalid)?;
        Ok(Self {
            from,
            to: next - Duration::days(1),
        })
    }

    /// Parses `YYYY-MM` into [`WindowSpec::month`].
    pub fn parse_month(label: &str) -> Result<Self, LeaderboardError> {
        let bad = || LeaderboardError::InvalidMonthLabel(label.to_string());
        let (year, month) = label.trim().split_once('-').ok_or_else(bad)?;
        let year: i32 = year.parse().map_err(|_| bad())?;
        let month: u32 = month.parse().map_err(|_| bad())?;
        Self::month(year, month)
    }

    /// The `days` days ending on `end`, inclusive. At least one day.
    pub fn trailing_days(end: NaiveDate, days: i64) -> Result<Self, LeaderboardError> {
        let from = Duration::try_days(days.max(1) - 1)
            .and_then(|span| end.checked_sub_signed(span))
            .ok_or(LeaderboardError::InvalidSpan { end, days })?;
        Ok(Self { from, to: end })
    }

    /// The calendar month containing `day`.
    pub fn month_of(day: NaiveDate) -> Self {
        let from = day.with_day(1).unwrap_or(day);
        let to = from
            .checked_add_months(chrono::Months::new(1))
            .map(|next| next - Duration::days(1))
            .unwrap_or(day);
        Self { from, to }
    }

    pub fn from(&self) -> NaiveDate {
        self.from
    }

    pub fn to(&self) -> NaiveDate {
        self.to
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

impl fmt::Display for WindowSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.from, self.to)
    }
}

/// Which end of the score range wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Lowest score ranks first ("lowest emitter wins").
    #[default]
    Ascending,
    /// Highest score ranks first ("highest offset wins").
    Descending,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Ascending => f.write_str("ascending"),
            Direction::Descending => f.write_str("descending"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredUser {
    pub identity_id: IdentityId,
    pub display_name: String,
    pub avatar: Option<String>,
    /// Unrounded, used for ordering.
    pub score: f64,
    /// `score` rounded to two decimals for display.
    pub display_score: f64,
    pub entries_in_window: usize,
    /// No entries fell in the window, so `score` is the configured baseline.
    pub baseline_applied: bool,
    pub logs: Vec<NormalizedLogEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedUser {
    /// 1-based and unique within one leaderboard.
    pub rank: usize,
    #[serde(flatten)]
    pub user: ScoredUser,
}

/// Outcome of the masking decision for one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// The viewer's own entry, shown as stored.
    Own,
    /// Someone else's entry, name and avatar obfuscated.
    Masked,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub visibility: Visibility,
    #[serde(flatten)]
    pub ranked: RankedUser,
}

impl LeaderboardEntry {
    pub fn rank(&self) -> usize {
        self.ranked.rank
    }

    pub fn identity_id(&self) -> &IdentityId {
        &self.ranked.user.identity_id
    }

    pub fn display_name(&self) -> &str {
        &self.ranked.user.display_name
    }

    pub fn avatar(&self) -> Option<&str> {
        self.ranked.user.avatar.as_deref()
    }
}

/// Viewer-specific leaderboard. Every entry has been through the masker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardView {
    /// Display order: 2nd, 1st, 3rd when there are at least three users.
    pub podium: Vec<LeaderboardEntry>,
    /// Everyone else, in rank order.
    pub remainder: Vec<LeaderboardEntry>,
    pub viewer_id: Option<IdentityId>,
    pub window: WindowSpec,
    pub direction: Direction,
}

impl LeaderboardView {
    pub fn len(&self) -> usize {
        self.podium.len() + self.remainder.len()
    }

    pub fn is_empty(&self) -> bool {
        self.podium.is_empty() && self.remainder.is_empty()
    }

    /// All entries in rank order, regardless of podium layout.
    pub fn ranked(&self) -> Vec<&LeaderboardEntry> {
        let mut entries: Vec<&LeaderboardEntry> =
            self.podium.iter().chain(self.remainder.iter()).collect();
        entries.sort_by_key(|entry| entry.rank());
        entries
    }

    pub fn viewer_entry(&self) -> Option<&LeaderboardEntry> {
        self.podium
            .iter()
            .chain(self.remainder.iter())
            .find(|entry| entry.visibility == Visibility::Own)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn window_rejects_reversed_range() {
        let err = WindowSpec::new(date(2024, 2, 1), date(2024, 1, 1)).unwrap_err();
        assert!(matches!(err, LeaderboardError::InvalidWindow { .. }));
    }

    #[test]
    fn window_is_inclusive_on_both_ends() {
        let window = WindowSpec::new(date(2024, 1, 1), date(2024, 1, 31)).unwrap();
        assert!(window.contains(date(2024, 1, 1)));
        assert!(window.contains(date(2024, 1, 31)));
        assert!(!window.contains(date(2023, 12, 31)));
        assert!(!window.contains(date(2024, 2, 1)));
    }

    #[test]
    fn month_covers_leap_february_and_december() {
        let feb = WindowSpec::month(2024, 2).unwrap();
        assert_eq!(feb.from(), date(2024, 2, 1));
        assert_eq!(feb.to(), date(2024, 2, 29));

        let dec = WindowSpec::month(2023, 12).unwrap();
        assert_eq!(dec.to(), date(2023, 12, 31));

        assert!(WindowSpec::month(2024, 13).is_err());
    }

    #[test]
    fn parse_month_reads_labels() {
        assert_eq!(
            WindowSpec::parse_month("2024-01").unwrap(),
            WindowSpec::month(2024, 1).unwrap()
        );
        assert!(matches!(
            WindowSpec::parse_month("January"),
            Err(LeaderboardError::InvalidMonthLabel(_))
        ));
    }

    #[test]
    fn trailing_days_counts_the_end_day() {
        let window = WindowSpec::trailing_days(date(2024, 1, 30), 30).unwrap();
        assert_eq!(window.from(), date(2024, 1, 1));
        let single = WindowSpec::trailing_days(date(2024, 1, 30), 0).unwrap();
        assert_eq!(single.from(), single.to());
    }

    #[test]
    fn trailing_days_rejects_spans_past_the_calendar() {
        let end = date(2024, 1, 31);
        assert_eq!(
            WindowSpec::trailing_days(end, 1_000_000_000),
            Err(LeaderboardError::InvalidSpan { end, days: 1_000_000_000 })
        );
        assert!(WindowSpec::trailing_days(end, i64::MAX).is_err());
    }

    #[test]
    fn month_of_finds_the_enclosing_month() {
        assert_eq!(
            WindowSpec::month_of(date(2024, 2, 17)),
            WindowSpec::month(2024, 2).unwrap()
        );
    }

    #[test]
    fn raw_entries_accept_numbers_and_text() {
        let entries: Vec<RawLogEntry> = serde_json::from_str(
            r#"[{"day": "2024-01-05", "value": "10"}, {"day": "2024-01-06", "value": 4.5}, {"value": "3"}]"#,
        )
        .unwrap();
        assert_eq!(entries[0].day, Some(RawDay::Date(date(2024, 1, 5))));
        assert_eq!(entries[0].value, Some(RawValue::Text("10".to_string())));
        assert_eq!(entries[1].value, Some(RawValue::Number(4.5)));
        assert_eq!(entries[2].day, None);
    }

    #[test]
    fn raw_entries_keep_unexpected_shapes() {
        let entry: RawLogEntry =
            serde_json::from_str(r#"{"day": 20240105, "value": {"kg": 3}}"#).unwrap();
        assert_eq!(entry.day, Some(RawDay::Other(serde_json::json!(20240105))));
        assert_eq!(entry.value, Some(RawValue::Other(serde_json::json!({"kg": 3}))));
    }
}
