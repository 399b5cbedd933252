//! Day-over-day comparison text for the footfall and dwell tiles.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Rise,
    Fall,
}

/// Percentage change of today against yesterday
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Change {
    /// Rounded to two decimals; zero when there is no baseline
    pub percent: f64,
    pub trend: Trend,
    no_baseline: bool,
}

impl Change {
    /// Shown before data arrives and whenever yesterday was zero
    pub fn no_baseline() -> Self {
        Self {
            percent: 0.0,
            trend: Trend::Rise,
            no_baseline: true,
        }
    }

    pub fn is_fall(&self) -> bool {
        self.trend == Trend::Fall
    }
}

impl Default for Change {
    fn default() -> Self {
        Self::no_baseline()
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.no_baseline {
            return f.write_str("0% More than yesterday");
        }
        let word = match self.trend {
            Trend::Rise => "More",
            Trend::Fall => "Less",
        };
        write!(f, "{:.2}% {} than yesterday", self.percent.abs(), word)
    }
}

/// Compare two same-length windows
pub fn day_over_day(today: f64, yesterday: f64) -> Change {
    if yesterday == 0.0 {
        return Change::no_baseline();
    }

    let raw = (today - yesterday) / yesterday * 100.0;
    let percent = (raw * 100.0).round() / 100.0;
    let trend = if percent >= 0.0 { Trend::Rise } else { Trend::Fall };

    Change {
        percent,
        trend,
        no_baseline: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rise() {
        let change = day_over_day(10.0, 5.0);
        assert_eq!(change.to_string(), "100.00% More than yesterday");
        assert!(!change.is_fall());
    }

    #[test]
    fn test_fall() {
        let change = day_over_day(5.0, 10.0);
        assert_eq!(change.to_string(), "50.00% Less than yesterday");
        assert!(change.is_fall());
    }

    #[test]
    fn test_zero_baseline() {
        assert_eq!(day_over_day(42.0, 0.0).to_string(), "0% More than yesterday");
        assert_eq!(Change::default().to_string(), "0% More than yesterday");
    }

    #[test]
    fn test_rounding() {
        assert_eq!(day_over_day(4.0, 3.0).to_string(), "33.33% More than yesterday");
        assert_eq!(day_over_day(2.0, 3.0).to_string(), "33.33% Less than yesterday");
        assert_eq!(day_over_day(7.0, 7.0).to_string(), "0.00% More than yesterday");
    }
}
