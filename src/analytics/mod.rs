//! Client-side analytics helpers: time windows, comparisons, display
//! formatting and the optional response cache.

pub mod cache;
pub mod compare;
pub mod format;
pub mod window;

pub use cache::CachedApi;
pub use compare::{day_over_day, Change, Trend};
pub use window::{day_comparison, DayComparison, TimeWindow};
