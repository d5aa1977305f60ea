//! Transfer window rules
//!
//! A transfer window is a configured month-day range during which
//! transfers may be initiated. The check is a pure date-range test of the
//! configured ranges resolved against the current year in the
//! federation's timezone; no window state is persisted.
//!
//! Ranges that would span a year boundary (start after end) are rejected
//! at construction: resolved against a single calendar year they could
//! never match, so accepting them would silently disable the window.

use chrono::{Datelike, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::TransferError;

/// A month-day pair, e.g. `01-31`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthDay {
    pub month: u32,
    pub day: u32,
}

impl MonthDay {
    pub fn new(month: u32, day: u32) -> Result<Self, TransferError> {
        // Resolve against a leap year so 02-29 is accepted
        NaiveDate::from_ymd_opt(2024, month, day)
            .ok_or(TransferError::InvalidWindowConfig)?;
        Ok(Self { month, day })
    }

    /// Resolves this month-day against a calendar year
    ///
    /// Feb 29 outside a leap year clamps to Feb 28.
    fn resolve(&self, year: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, self.month, self.day)
            .or_else(|| NaiveDate::from_ymd_opt(year, self.month, self.day - 1))
            .expect("month-day validated at construction")
    }
}

/// A single named transfer window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferWindow {
    /// Window name, e.g. "summer" or "winter"
    pub label: String,
    pub start: MonthDay,
    pub end: MonthDay,
}

/// The federation's transfer window configuration
///
/// Passed into the transfer service at construction; never read from
/// ambient global state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferWindows {
    windows: Vec<TransferWindow>,
    timezone: Tz,
}

impl TransferWindows {
    /// Creates a window configuration
    ///
    /// # Errors
    ///
    /// Rejects windows whose start falls after their end within one
    /// calendar year (a Dec→Jan window needs product input, see design
    /// notes) and empty configurations.
    pub fn new(windows: Vec<TransferWindow>, timezone: Tz) -> Result<Self, TransferError> {
        if windows.is_empty() {
            return Err(TransferError::InvalidWindowConfig);
        }
        for window in &windows {
            let start = window.start.resolve(2024);
            let end = window.end.resolve(2024);
            if start > end {
                return Err(TransferError::InvalidWindowConfig);
            }
        }
        Ok(Self { windows, timezone })
    }

    /// The federation's standard configuration: January and July windows,
    /// evaluated in Harare time
    pub fn standard() -> Self {
        Self {
            windows: vec![
                TransferWindow {
                    label: "summer".to_string(),
                    start: MonthDay { month: 1, day: 1 },
                    end: MonthDay { month: 1, day: 31 },
                },
                TransferWindow {
                    label: "winter".to_string(),
                    start: MonthDay { month: 7, day: 1 },
                    end: MonthDay { month: 7, day: 31 },
                },
            ],
            timezone: chrono_tz::Africa::Harare,
        }
    }

    /// Today in the federation's timezone
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.timezone).date_naive()
    }

    /// Whether any window contains the given date
    pub fn is_open_on(&self, date: NaiveDate) -> bool {
        self.windows.iter().any(|window| {
            let start = window.start.resolve(date.year());
            let end = window.end.resolve(date.year());
            date >= start && date <= end
        })
    }

    /// Whether a transfer may be initiated right now
    pub fn is_open(&self) -> bool {
        self.is_open_on(self.today())
    }

    /// Label for the window a date falls into, e.g. `2026_summer`
    ///
    /// First-half dates label as summer, second-half as winter, matching
    /// the federation's season naming.
    pub fn window_label(&self, date: NaiveDate) -> String {
        if date.month() <= 6 {
            format!("{}_summer", date.year())
        } else {
            format!("{}_winter", date.year())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_open_in_january() {
        let windows = TransferWindows::standard();
        assert!(windows.is_open_on(date(2026, 1, 15)));
    }

    #[test]
    fn test_open_in_july() {
        let windows = TransferWindows::standard();
        assert!(windows.is_open_on(date(2026, 7, 1)));
        assert!(windows.is_open_on(date(2026, 7, 31)));
    }

    #[test]
    fn test_closed_in_march() {
        let windows = TransferWindows::standard();
        assert!(!windows.is_open_on(date(2026, 3, 15)));
    }

    #[test]
    fn test_boundaries_inclusive() {
        let windows = TransferWindows::standard();
        assert!(windows.is_open_on(date(2026, 1, 1)));
        assert!(windows.is_open_on(date(2026, 1, 31)));
        assert!(!windows.is_open_on(date(2026, 2, 1)));
    }

    #[test]
    fn test_year_spanning_window_rejected() {
        let result = TransferWindows::new(
            vec![TransferWindow {
                label: "december".to_string(),
                start: MonthDay { month: 12, day: 15 },
                end: MonthDay { month: 1, day: 15 },
            }],
            chrono_tz::Africa::Harare,
        );
        assert!(matches!(result, Err(TransferError::InvalidWindowConfig)));
    }

    #[test]
    fn test_empty_config_rejected() {
        let result = TransferWindows::new(vec![], chrono_tz::Africa::Harare);
        assert!(result.is_err());
    }

    #[test]
    fn test_window_labels() {
        let windows = TransferWindows::standard();
        assert_eq!(windows.window_label(date(2026, 1, 10)), "2026_summer");
        assert_eq!(windows.window_label(date(2026, 6, 30)), "2026_summer");
        assert_eq!(windows.window_label(date(2026, 7, 1)), "2026_winter");
        assert_eq!(windows.window_label(date(2026, 12, 31)), "2026_winter");
    }

    #[test]
    fn test_invalid_month_day_rejected() {
        assert!(MonthDay::new(13, 1).is_err());
        assert!(MonthDay::new(2, 30).is_err());
        assert!(MonthDay::new(2, 29).is_ok());
    }
}
