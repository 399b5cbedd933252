//! Occupancy and demographics charts.

use chrono::TimeZone;
use std::fmt::Display;

use super::{settle, PanelState};
use crate::analytics::format::short_time;
use crate::analytics::window;
use crate::api::{AnalyticsApi, RangeQuery};
use crate::models::{DemographicsResponse, OccupancyResponse};
use crate::view::Selection;

/// One point of the occupancy line
#[derive(Debug, Clone, PartialEq)]
pub struct OccupancyPoint {
    pub utc: i64,
    /// `hh:mm AM/PM` in the viewer's zone
    pub label: String,
    pub occupancy: f64,
}

/// One point of the demographics area chart
#[derive(Debug, Clone, PartialEq)]
pub struct DemographicsPoint {
    pub utc: i64,
    pub label: String,
    pub male: u64,
    pub female: u64,
}

/// Male/female totals for the pie
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DemographicsSplit {
    pub male: u64,
    pub female: u64,
}

impl DemographicsSplit {
    pub fn from_response(response: &DemographicsResponse) -> Self {
        response.buckets.iter().fold(Self::default(), |acc, b| Self {
            male: acc.male + b.male,
            female: acc.female + b.female,
        })
    }

    pub fn total(&self) -> u64 {
        self.male + self.female
    }

    /// Whole percent of the total; zero when nobody was counted
    pub fn male_percent(&self) -> u64 {
        percent_of(self.male, self.total())
    }

    pub fn female_percent(&self) -> u64 {
        percent_of(self.female, self.total())
    }
}

fn percent_of(part: u64, total: u64) -> u64 {
    if total == 0 {
        0
    } else {
        (part as f64 / total as f64 * 100.0).round() as u64
    }
}

pub fn occupancy_series<Tz>(response: &OccupancyResponse, tz: &Tz) -> Vec<OccupancyPoint>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    response
        .buckets
        .iter()
        .map(|b| OccupancyPoint {
            utc: b.utc,
            label: short_time(b.utc, tz),
            occupancy: b.avg,
        })
        .collect()
}

pub fn demographics_series<Tz>(response: &DemographicsResponse, tz: &Tz) -> Vec<DemographicsPoint>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    response
        .buckets
        .iter()
        .map(|b| DemographicsPoint {
            utc: b.utc,
            label: short_time(b.utc, tz),
            male: b.male,
            female: b.female,
        })
        .collect()
}

/// Average occupancy over the last ten hours
pub async fn load_occupancy<A, Tz>(
    api: &A,
    selection: Option<&Selection<Tz>>,
) -> PanelState<Vec<OccupancyPoint>>
where
    A: AnalyticsApi + ?Sized,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let Some(selection) = selection else {
        return PanelState::Fallback;
    };
    let query = RangeQuery::new(selection.site_id.as_str(), window::occupancy(&selection.date));
    let tz = selection.date.timezone();

    let result = api
        .occupancy(&query)
        .await
        .map(|response| occupancy_series(&response, &tz));
    settle("occupancy", result)
}

/// Male/female counts per bucket over the last eight hours
pub async fn load_demographics<A, Tz>(
    api: &A,
    selection: Option<&Selection<Tz>>,
) -> PanelState<Vec<DemographicsPoint>>
where
    A: AnalyticsApi + ?Sized,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let Some(selection) = selection else {
        return PanelState::Fallback;
    };
    let query = RangeQuery::new(
        selection.site_id.as_str(),
        window::demographics_area(&selection.date),
    );
    let tz = selection.date.timezone();

    let result = api
        .demographics(&query)
        .await
        .map(|response| demographics_series(&response, &tz));
    settle("demographics", result)
}

/// Male/female totals over the last 24 hours
pub async fn load_demographics_split<A, Tz>(
    api: &A,
    selection: Option<&Selection<Tz>>,
) -> PanelState<DemographicsSplit>
where
    A: AnalyticsApi + ?Sized,
    Tz: TimeZone,
{
    let Some(selection) = selection else {
        return PanelState::Fallback;
    };
    let query = RangeQuery::new(
        selection.site_id.as_str(),
        window::demographics_pie(&selection.date),
    );

    let result = api
        .demographics(&query)
        .await
        .map(|response| DemographicsSplit::from_response(&response));
    settle("demographics_pie", result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Endpoint;
    use crate::models::{DemographicsBucket, OccupancyBucket};
    use crate::testing::FakeApi;
    use chrono::Utc;

    fn selection() -> Selection<Utc> {
        Selection {
            site_id: "site-1".to_string(),
            date: Utc.with_ymd_and_hms(2025, 3, 14, 15, 0, 0).unwrap(),
        }
    }

    fn bucket(utc: i64, male: u64, female: u64) -> DemographicsBucket {
        DemographicsBucket {
            utc,
            local: None,
            male,
            female,
        }
    }

    #[test]
    fn test_split_totals_and_percent() {
        let response = DemographicsResponse {
            buckets: vec![bucket(0, 3, 1), bucket(1, 3, 1)],
            ..Default::default()
        };
        let split = DemographicsSplit::from_response(&response);
        assert_eq!(split, DemographicsSplit { male: 6, female: 2 });
        assert_eq!(split.male_percent(), 75);
        assert_eq!(split.female_percent(), 25);
        assert_eq!(DemographicsSplit::default().male_percent(), 0);
    }

    #[tokio::test]
    async fn test_occupancy_labels_in_viewer_zone() {
        let mut api = FakeApi::default();
        api.occupancy = OccupancyResponse {
            buckets: vec![OccupancyBucket {
                utc: 1_741_957_500_000,
                avg: 12.5,
            }],
        };

        let points = load_occupancy(&api, Some(&selection())).await.settled_or_default();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].label, "01:05 PM");
        assert_eq!(points[0].occupancy, 12.5);
    }

    #[tokio::test]
    async fn test_demographics_series() {
        let mut api = FakeApi::default();
        api.demographics.buckets = vec![bucket(1_741_957_500_000, 4, 5)];

        let points = load_demographics(&api, Some(&selection())).await.settled_or_default();
        assert_eq!(points[0].male, 4);
        assert_eq!(points[0].female, 5);
        assert_eq!(api.calls(Endpoint::Demographics), 1);
    }

    #[tokio::test]
    async fn test_expired_session_falls_back() {
        let api = FakeApi::default().expired();
        let state = load_demographics_split(&api, Some(&selection())).await;
        assert_eq!(state, PanelState::Fallback);
    }
}
