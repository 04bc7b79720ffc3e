use crate::models::{NormalizedLogEntry, WindowSpec};

/// Sum and count of the entries that fell inside a window.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WindowTotal {
    pub sum: f64,
    pub count: usize,
}

impl WindowTotal {
    /// The sum, or `baseline` when nothing was logged in the window.
    pub fn score_or(&self, baseline: f64) -> f64 {
        if self.count == 0 {
            baseline
        } else {
            self.sum
        }
    }
}

pub fn window_total(entries: &[NormalizedLogEntry], window: &WindowSpec) -> WindowTotal {
    entries
        .iter()
        .filter(|entry| window.contains(entry.date))
        .fold(WindowTotal::default(), |mut total, entry| {
            total.sum += entry.value;
            total.count += 1;
            total
        })
}

pub fn aggregate(entries: &[NormalizedLogEntry], window: &WindowSpec, baseline: f64) -> f64 {
    window_total(entries, window).score_or(baseline)
}

pub fn round_display(score: f64) -> f64 {
    (score * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn entry(m: u32, d: u32, value: f64) -> NormalizedLogEntry {
        NormalizedLogEntry {
            date: NaiveDate::from_ymd_opt(2024, m, d).unwrap(),
            value,
        }
    }

    #[test]
    fn sums_only_entries_inside_window() {
        let january = WindowSpec::month(2024, 1).unwrap();
        let entries = vec![entry(1, 1, 3.0), entry(1, 31, 4.5), entry(2, 1, 100.0), entry(12, 31, 9.0)];

        let total = window_total(&entries, &january);
        assert_eq!(total.count, 2);
        assert!((total.sum - 7.5).abs() < 1e-9);
        assert!((aggregate(&entries, &january, 100.0) - 7.5).abs() < 1e-9);
    }

    #[test]
    fn falls_back_to_baseline_without_activity() {
        let january = WindowSpec::month(2024, 1).unwrap();
        assert_eq!(aggregate(&[], &january, 100.0), 100.0);
        assert_eq!(aggregate(&[entry(3, 1, 1.0)], &january, 42.0), 42.0);
    }

    #[test]
    fn zero_readings_are_activity() {
        let january = WindowSpec::month(2024, 1).unwrap();
        assert_eq!(aggregate(&[entry(1, 2, 0.0)], &january, 100.0), 0.0);
    }

    #[test]
    fn display_rounding_keeps_two_decimals() {
        assert_eq!(round_display(0.1 + 0.2), 0.3);
        assert_eq!(round_display(12.345_6), 12.35);
        assert_eq!(round_display(7.0), 7.0);
    }
}
