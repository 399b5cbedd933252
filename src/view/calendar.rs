//! Date Selector
//!
//! A single-month grid, Sunday first, padded with leading blanks for the
//! weekday of the 1st. Picking a day keeps the time of day of the current
//! selection; days after today cannot be picked.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone};

pub const WEEKDAYS: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];

/// First day of a displayed month
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthPivot {
    year: i32,
    month: u32,
}

impl MonthPivot {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Self { year: self.year - 1, month: 12 }
        } else {
            Self { year: self.year, month: self.month - 1 }
        }
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self { year: self.year + 1, month: 1 }
        } else {
            Self { year: self.year, month: self.month + 1 }
        }
    }

    pub fn days_in_month(&self) -> u32 {
        let next = self.next().first_day();
        (next - self.first_day()).num_days() as u32
    }

    /// `"March 2025"`
    pub fn title(&self) -> String {
        self.first_day().format("%B %Y").to_string()
    }

    /// Grid cells: `None` for leading blanks, then every day of the month
    pub fn grid(&self) -> Vec<Option<NaiveDate>> {
        let first = self.first_day();
        let offset = first.weekday().num_days_from_sunday() as usize;
        let mut cells = vec![None; offset];
        cells.extend((0..self.days_in_month()).map(|d| Some(first + Duration::days(d as i64))));
        cells
    }
}

/// Strictly after today at day granularity
pub fn is_future(day: NaiveDate, today: NaiveDate) -> bool {
    day > today
}

/// New selection for a clicked day, or `None` when the day is in the future.
/// The current selection's time of day is carried over.
pub fn select_day<Tz: TimeZone>(
    current: &DateTime<Tz>,
    day: NaiveDate,
    today: NaiveDate,
) -> Option<DateTime<Tz>> {
    if is_future(day, today) {
        return None;
    }
    let naive = day.and_time(current.time());
    let tz = current.timezone();
    tz.from_local_datetime(&naive)
        .earliest()
        .or_else(|| Some(tz.from_utc_datetime(&naive)))
}

/// Button caption: `Today`, `Yesterday` or `Mar 14, 2025`
pub fn button_label(selected: NaiveDate, today: NaiveDate) -> String {
    if selected == today {
        "Today".to_string()
    } else if Some(selected) == today.pred_opt() {
        "Yesterday".to_string()
    } else {
        selected.format("%b %-d, %Y").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Timelike, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_grid_leading_blanks() {
        // 1 March 2025 is a Saturday
        let grid = MonthPivot::new(2025, 3).unwrap().grid();
        assert_eq!(grid.iter().take_while(|c| c.is_none()).count(), 6);
        assert_eq!(grid[6], Some(date(2025, 3, 1)));
        assert_eq!(grid.len(), 6 + 31);
    }

    #[test]
    fn test_grid_sunday_start_has_no_blanks() {
        // 1 June 2025 is a Sunday
        let grid = MonthPivot::new(2025, 6).unwrap().grid();
        assert_eq!(grid[0], Some(date(2025, 6, 1)));
        assert_eq!(grid.len(), 30);
    }

    #[test]
    fn test_month_navigation_wraps_years() {
        let jan = MonthPivot::new(2025, 1).unwrap();
        assert_eq!(jan.previous(), MonthPivot::new(2024, 12).unwrap());
        assert_eq!(jan.previous().next(), jan);
        assert_eq!(MonthPivot::new(2024, 2).unwrap().days_in_month(), 29);
        assert_eq!(jan.title(), "January 2025");
    }

    #[test]
    fn test_select_day_keeps_time_of_day() {
        let current = Utc.with_ymd_and_hms(2025, 3, 14, 15, 42, 7).unwrap();
        let picked = select_day(&current, date(2025, 3, 2), date(2025, 3, 14)).unwrap();

        assert_eq!(picked.date_naive(), date(2025, 3, 2));
        assert_eq!((picked.hour(), picked.minute(), picked.second()), (15, 42, 7));
    }

    #[test]
    fn test_future_day_is_noop() {
        let current = Utc.with_ymd_and_hms(2025, 3, 14, 9, 0, 0).unwrap();
        assert!(select_day(&current, date(2025, 3, 15), date(2025, 3, 14)).is_none());
        assert!(select_day(&current, date(2025, 3, 14), date(2025, 3, 14)).is_some());
    }

    #[test]
    fn test_button_label() {
        let today = date(2025, 3, 14);
        assert_eq!(button_label(today, today), "Today");
        assert_eq!(button_label(date(2025, 3, 13), today), "Yesterday");
        assert_eq!(button_label(date(2025, 2, 3), today), "Feb 3, 2025");
    }
}
