//! Time Windows
//!
//! Every metric request is bounded by millisecond epochs derived from the
//! single selected date (in the viewer's time zone) plus a fixed window per
//! panel.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone};

/// Demographics area chart lookback
pub const DEMOGRAPHICS_LOOKBACK_HOURS: i64 = 8;
/// Demographics pie lookback
pub const DEMOGRAPHICS_PIE_LOOKBACK_HOURS: i64 = 24;
/// Occupancy chart lookback
pub const OCCUPANCY_LOOKBACK_HOURS: i64 = 10;

/// Half-open range of epoch milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeWindow {
    pub from_ms: i64,
    pub to_ms: i64,
}

impl TimeWindow {
    pub fn new(from_ms: i64, to_ms: i64) -> Self {
        Self { from_ms, to_ms }
    }

    pub fn duration_ms(&self) -> i64 {
        self.to_ms - self.from_ms
    }

    /// `[selected - hours, selected]`
    pub fn lookback<Tz: TimeZone>(selected: &DateTime<Tz>, hours: i64) -> Self {
        let to_ms = selected.timestamp_millis();
        Self::new(to_ms - Duration::hours(hours).num_milliseconds(), to_ms)
    }

    /// From local midnight of the selected day up to the selected instant
    pub fn since_start_of_day<Tz: TimeZone>(selected: &DateTime<Tz>) -> Self {
        let start = local_instant(&selected.timezone(), start_of(selected.date_naive()));
        Self::new(start.timestamp_millis(), selected.timestamp_millis())
    }

    /// The whole local day of the selection, `00:00:00.000 ..= 23:59:59.999`
    pub fn whole_day<Tz: TimeZone>(selected: &DateTime<Tz>) -> Self {
        let tz = selected.timezone();
        let date = selected.date_naive();
        let start = local_instant(&tz, start_of(date));
        let end = local_instant(&tz, end_of(date));
        Self::new(start.timestamp_millis(), end.timestamp_millis())
    }
}

/// Window for the demographics area chart
pub fn demographics_area<Tz: TimeZone>(selected: &DateTime<Tz>) -> TimeWindow {
    TimeWindow::lookback(selected, DEMOGRAPHICS_LOOKBACK_HOURS)
}

/// Window for the demographics pie
pub fn demographics_pie<Tz: TimeZone>(selected: &DateTime<Tz>) -> TimeWindow {
    TimeWindow::lookback(selected, DEMOGRAPHICS_PIE_LOOKBACK_HOURS)
}

/// Window for the occupancy chart
pub fn occupancy<Tz: TimeZone>(selected: &DateTime<Tz>) -> TimeWindow {
    TimeWindow::lookback(selected, OCCUPANCY_LOOKBACK_HOURS)
}

/// "Start of day to now" against the same span one day earlier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayComparison {
    pub today: TimeWindow,
    pub yesterday: TimeWindow,
}

pub fn day_comparison<Tz: TimeZone>(selected: &DateTime<Tz>) -> DayComparison {
    let tz = selected.timezone();
    let same_time_yesterday = local_instant(&tz, selected.naive_local() - Duration::days(1));
    let yesterday_start = local_instant(&tz, start_of(same_time_yesterday.date_naive()));

    DayComparison {
        today: TimeWindow::since_start_of_day(selected),
        yesterday: TimeWindow::new(
            yesterday_start.timestamp_millis(),
            same_time_yesterday.timestamp_millis(),
        ),
    }
}

fn start_of(date: NaiveDate) -> NaiveDateTime {
    date.and_time(chrono::NaiveTime::MIN)
}

fn end_of(date: NaiveDate) -> NaiveDateTime {
    start_of(date) + Duration::days(1) - Duration::milliseconds(1)
}

/// Resolve a wall-clock time; in a DST gap fall back to reading it as UTC
fn local_instant<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    tz.from_local_datetime(&naive)
        .earliest()
        .unwrap_or_else(|| tz.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    const HOUR_MS: i64 = 3_600_000;

    fn selected() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 15, 30, 0).unwrap()
    }

    #[test]
    fn test_lookbacks() {
        let now = selected();
        assert_eq!(demographics_area(&now).duration_ms(), 8 * HOUR_MS);
        assert_eq!(demographics_pie(&now).duration_ms(), 24 * HOUR_MS);
        assert_eq!(occupancy(&now).duration_ms(), 10 * HOUR_MS);
        assert_eq!(occupancy(&now).to_ms, now.timestamp_millis());
    }

    #[test]
    fn test_day_comparison_windows() {
        let now = selected();
        let cmp = day_comparison(&now);

        let midnight = Utc.with_ymd_and_hms(2025, 3, 14, 0, 0, 0).unwrap();
        assert_eq!(cmp.today.from_ms, midnight.timestamp_millis());
        assert_eq!(cmp.today.to_ms, now.timestamp_millis());

        assert_eq!(cmp.yesterday.from_ms, midnight.timestamp_millis() - 24 * HOUR_MS);
        assert_eq!(cmp.yesterday.to_ms, now.timestamp_millis() - 24 * HOUR_MS);
        assert_eq!(cmp.today.duration_ms(), cmp.yesterday.duration_ms());
    }

    #[test]
    fn test_whole_day_uses_local_midnight() {
        let dubai = FixedOffset::east_opt(4 * 3600).unwrap();
        let now = dubai.with_ymd_and_hms(2025, 3, 14, 1, 0, 0).unwrap();
        let day = TimeWindow::whole_day(&now);

        let expected_start = Utc.with_ymd_and_hms(2025, 3, 13, 20, 0, 0).unwrap();
        assert_eq!(day.from_ms, expected_start.timestamp_millis());
        assert_eq!(day.duration_ms(), 24 * HOUR_MS - 1);
    }

    #[test]
    fn test_since_start_of_day_at_midnight_is_empty() {
        let midnight = Utc.with_ymd_and_hms(2025, 3, 14, 0, 0, 0).unwrap();
        assert_eq!(TimeWindow::since_start_of_day(&midnight).duration_ms(), 0);
    }
}
