//! Footfall and dwell-time tiles.
//!
//! Both compare "start of day to the selected instant" against the same span
//! one day earlier; the two requests run concurrently and are joined before
//! the percentage is computed.

use chrono::TimeZone;
use futures_util::future::try_join;

use super::{settle, PanelState};
use crate::analytics::compare::{day_over_day, Change};
use crate::analytics::format::dwell_duration;
use crate::analytics::window::day_comparison;
use crate::api::{AnalyticsApi, RangeQuery};
use crate::view::Selection;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FootfallTile {
    pub footfall: u64,
    pub change: Change,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DwellTile {
    pub avg_minutes: f64,
    pub change: Change,
}

impl DwellTile {
    /// `"12 min 30 sec"`
    pub fn duration(&self) -> String {
        dwell_duration(self.avg_minutes)
    }
}

pub async fn load_footfall<A, Tz>(api: &A, selection: Option<&Selection<Tz>>) -> PanelState<FootfallTile>
where
    A: AnalyticsApi + ?Sized,
    Tz: TimeZone,
{
    let Some(selection) = selection else {
        return PanelState::Fallback;
    };
    let windows = day_comparison(&selection.date);
    let today = RangeQuery::new(selection.site_id.as_str(), windows.today);
    let yesterday = RangeQuery::new(selection.site_id.as_str(), windows.yesterday);

    let result = try_join(api.footfall(&today), api.footfall(&yesterday))
        .await
        .map(|(today, yesterday)| FootfallTile {
            footfall: today.footfall,
            change: day_over_day(today.footfall as f64, yesterday.footfall as f64),
        });
    settle("footfall", result)
}

pub async fn load_dwell<A, Tz>(api: &A, selection: Option<&Selection<Tz>>) -> PanelState<DwellTile>
where
    A: AnalyticsApi + ?Sized,
    Tz: TimeZone,
{
    let Some(selection) = selection else {
        return PanelState::Fallback;
    };
    let windows = day_comparison(&selection.date);
    let today = RangeQuery::new(selection.site_id.as_str(), windows.today);
    let yesterday = RangeQuery::new(selection.site_id.as_str(), windows.yesterday);

    let result = try_join(api.dwell(&today), api.dwell(&yesterday))
        .await
        .map(|(today, yesterday)| DwellTile {
            avg_minutes: today.avg_dwell_minutes,
            change: day_over_day(today.avg_dwell_minutes, yesterday.avg_dwell_minutes),
        });
    settle("dwell", result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Endpoint;
    use crate::testing::FakeApi;
    use chrono::Utc;

    fn selection() -> Selection<Utc> {
        Selection {
            site_id: "site-1".to_string(),
            date: Utc.with_ymd_and_hms(2025, 3, 14, 15, 0, 0).unwrap(),
        }
    }

    fn windows() -> (i64, i64) {
        let w = day_comparison(&selection().date);
        (w.today.from_ms, w.yesterday.from_ms)
    }

    #[tokio::test]
    async fn test_footfall_compares_against_yesterday() {
        let (today, yesterday) = windows();
        let api = FakeApi::default()
            .with_footfall_at(today, 150)
            .with_footfall_at(yesterday, 100);

        let tile = load_footfall(&api, Some(&selection())).await;
        let tile = tile.ready().copied().unwrap();
        assert_eq!(tile.footfall, 150);
        assert_eq!(tile.change.to_string(), "50.00% More than yesterday");
        assert_eq!(api.calls(Endpoint::Footfall), 2);
    }

    #[tokio::test]
    async fn test_dwell_fall() {
        let (today, yesterday) = windows();
        let api = FakeApi::default().with_dwell_at(today, 5.0).with_dwell_at(yesterday, 10.0);

        let tile = load_dwell(&api, Some(&selection())).await.settled_or_default();
        assert_eq!(tile.duration(), "5 min 0 sec");
        assert_eq!(tile.change.to_string(), "50.00% Less than yesterday");
        assert!(tile.change.is_fall());
    }

    #[tokio::test]
    async fn test_dwell_unchanged_day() {
        let api = FakeApi::default().with_dwell(2.999);

        let tile = load_dwell(&api, Some(&selection())).await.settled_or_default();
        assert_eq!(tile.duration(), "3 min 0 sec");
        assert_eq!(tile.change.to_string(), "0.00% More than yesterday");
        assert_eq!(api.calls(Endpoint::Dwell), 2);
    }

    #[tokio::test]
    async fn test_no_site_is_fallback_without_requests() {
        let api = FakeApi::default();
        let state = load_footfall::<_, Utc>(&api, None::<&Selection<Utc>>).await;
        assert_eq!(state, PanelState::Fallback);
        assert_eq!(api.calls(Endpoint::Footfall), 0);
    }

    #[tokio::test]
    async fn test_request_failure_falls_back() {
        let api = FakeApi::default().failing(Endpoint::Dwell);
        let state = load_dwell(&api, Some(&selection())).await;
        assert_eq!(state, PanelState::Fallback);

        let tile = state.settled_or_default();
        assert_eq!(tile.change.to_string(), "0% More than yesterday");
    }
}
