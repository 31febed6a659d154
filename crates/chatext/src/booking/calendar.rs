//! Calendar arithmetic for the date step.
//!
//! Months are zero-based (`January = 0`) everywhere in this module. Nothing
//! here reads ambient time: "today" is always passed in, and callers obtain
//! it from a [`Clock`].

use chrono::{Datelike, Local, Month, NaiveDate};
use serde::{Deserialize, Serialize};

/// How many months past the current one the calendar may display.
pub const MONTHS_AHEAD: i32 = 2;

/// Column headers of the calendar grid, Sunday first.
pub const WEEKDAY_LABELS: [&str; 7] = ["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"];

/// Source of the current calendar day.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// The host machine's local calendar day.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock frozen on one day.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Number of days in `month` of `year`. Returns 0 for a month outside `0..12`.
pub fn days_in_month(month: u32, year: i32) -> u32 {
    let Some(first) = NaiveDate::from_ymd_opt(year, month + 1, 1) else {
        return 0;
    };
    let next = MonthCursor { year, month }.offset(1);
    match NaiveDate::from_ymd_opt(next.year, next.month + 1, 1) {
        Some(next_first) => next_first.signed_duration_since(first).num_days() as u32,
        None => 0,
    }
}

/// Weekday of the first of the month, Sunday = 0.
pub fn first_weekday_of_month(month: u32, year: i32) -> u32 {
    NaiveDate::from_ymd_opt(year, month + 1, 1)
        .map(|d| d.weekday().num_days_from_sunday())
        .unwrap_or(0)
}

/// Whether the given day is strictly before `today`.
pub fn is_past_date(day: u32, month: u32, year: i32, today: NaiveDate) -> bool {
    (year, month, day) < (today.year(), today.month0(), today.day())
}

/// Long English month name, or an empty string for a month outside `0..12`.
pub fn month_name(month: u32) -> &'static str {
    u8::try_from(month + 1)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name())
        .unwrap_or("")
}

/// Header label for a displayed month, e.g. `"October 2026"`.
pub fn month_label(month: u32, year: i32) -> String {
    format!("{} {year}", month_name(month))
}

/// A (year, month) pair. Ordering is chronological.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthCursor {
    pub year: i32,
    /// Zero-based.
    pub month: u32,
}

impl MonthCursor {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month0(),
        }
    }

    /// Move by `delta` months, rolling the year over as needed.
    pub fn offset(self, delta: i32) -> Self {
        let index = i64::from(self.year) * 12 + i64::from(self.month) + i64::from(delta);
        Self {
            year: index.div_euclid(12) as i32,
            month: index.rem_euclid(12) as u32,
        }
    }
}

/// The range of months the calendar may display, relative to today.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CalendarBounds {
    pub earliest: MonthCursor,
    pub latest: MonthCursor,
}

impl CalendarBounds {
    pub fn from_today(today: NaiveDate) -> Self {
        let earliest = MonthCursor::of(today);
        Self {
            earliest,
            latest: earliest.offset(MONTHS_AHEAD),
        }
    }

    pub fn clamp(&self, cursor: MonthCursor) -> MonthCursor {
        cursor.clamp(self.earliest, self.latest)
    }

    pub fn can_go_back(&self, cursor: MonthCursor) -> bool {
        cursor > self.earliest
    }

    pub fn can_go_forward(&self, cursor: MonthCursor) -> bool {
        cursor < self.latest
    }
}

/// A calendar day chosen by the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingDate {
    pub day: u32,
    /// Zero-based.
    pub month: u32,
    pub year: i32,
}

impl BookingDate {
    pub fn cursor(&self) -> MonthCursor {
        MonthCursor {
            year: self.year,
            month: self.month,
        }
    }

    pub fn is_past(&self, today: NaiveDate) -> bool {
        is_past_date(self.day, self.month, self.year, today)
    }

    /// `YYYY/MM/DD` with zero-padded month and day, as sent to the host.
    pub fn to_slash_format(&self) -> String {
        format!("{:04}/{:02}/{:02}", self.year, self.month + 1, self.day)
    }

    /// Human-readable form, e.g. `"October 15, 2026"`.
    pub fn long_label(&self) -> String {
        format!("{} {}, {}", month_name(self.month), self.day, self.year)
    }
}

/// One cell of the 7-column month grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GridCell {
    /// Padding before the first of the month.
    Blank,
    Day { day: u32, past: bool },
}

/// Build the month grid: one blank per weekday before the first, then one
/// cell per day, each flagged `past` iff strictly before `today`.
pub fn month_grid(month: u32, year: i32, today: NaiveDate) -> Vec<GridCell> {
    let blanks = first_weekday_of_month(month, year);
    let days = days_in_month(month, year);
    let mut cells = Vec::with_capacity((blanks + days) as usize);
    cells.extend((0..blanks).map(|_| GridCell::Blank));
    cells.extend((1..=days).map(|day| GridCell::Day {
        day,
        past: is_past_date(day, month, year, today),
    }));
    cells
}
