//! Visitor entry/exit log.

use chrono::TimeZone;

use super::{settle, PanelState};
use crate::analytics::format::{clock_time, dwell_cell, initials, DASH};
use crate::analytics::window::TimeWindow;
use crate::api::{AnalyticsApi, PageQuery, RangeQuery};
use crate::models::{Gender, Severity, VisitorRecord};
use crate::view::{Pager, Selection};

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// A visitor record formatted for the table
#[derive(Debug, Clone, PartialEq)]
pub struct EntryRow {
    pub person_id: String,
    pub person_name: String,
    pub initials: String,
    pub gender: Gender,
    pub zone_name: String,
    pub severity: Severity,
    /// `HH:MM`
    pub entry: String,
    /// `HH:MM`, or a dash while the visitor is still inside
    pub exit: String,
    pub dwell: String,
}

impl From<&VisitorRecord> for EntryRow {
    fn from(record: &VisitorRecord) -> Self {
        Self {
            person_id: record.person_id.clone(),
            person_name: record.person_name.clone(),
            initials: initials(&record.person_name),
            gender: record.gender,
            zone_name: record.zone_name.clone(),
            severity: record.severity,
            entry: clock_time(&record.entry_local).unwrap_or_else(|| DASH.to_string()),
            exit: record
                .exit_local
                .as_deref()
                .and_then(clock_time)
                .unwrap_or_else(|| DASH.to_string()),
            dwell: dwell_cell(record.dwell_minutes),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntriesTable {
    pub rows: Vec<EntryRow>,
    pub total_records: u64,
    /// The requested page with the page count from the response applied
    pub pager: Pager,
}

/// One page of the selected day's log
pub async fn load_entries<A, Tz>(
    api: &A,
    selection: Option<&Selection<Tz>>,
    pager: Pager,
    page_size: u32,
) -> PanelState<EntriesTable>
where
    A: AnalyticsApi + ?Sized,
    Tz: TimeZone,
{
    let Some(selection) = selection else {
        return PanelState::Fallback;
    };
    let query = PageQuery {
        range: RangeQuery::new(selection.site_id.as_str(), TimeWindow::whole_day(&selection.date)),
        page_number: pager.current(),
        page_size: page_size.max(1),
    };

    let result = api.entry_exit(&query).await.map(|page| {
        let mut pager = pager;
        pager.set_total(page.total_pages);
        EntriesTable {
            rows: page.records.iter().map(EntryRow::from).collect(),
            total_records: page.total_records,
            pager,
        }
    });
    settle("entries", result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Endpoint;
    use crate::models::EntryExitPage;
    use crate::testing::FakeApi;
    use chrono::Utc;

    fn record(exit: Option<&str>, dwell: Option<f64>) -> VisitorRecord {
        VisitorRecord {
            person_id: "p1".to_string(),
            person_name: "Jane Doe".to_string(),
            gender: Gender::Female,
            zone_id: "z1".to_string(),
            zone_name: "Lobby".to_string(),
            severity: Severity::Medium,
            entry_local: "2025-03-14 09:15:42".to_string(),
            exit_local: exit.map(str::to_string),
            dwell_minutes: dwell,
        }
    }

    #[test]
    fn test_row_formatting() {
        let row = EntryRow::from(&record(Some("2025-03-14 09:27:12"), Some(11.5)));
        assert_eq!(row.initials, "JD");
        assert_eq!(row.entry, "09:15");
        assert_eq!(row.exit, "09:27");
        assert_eq!(row.dwell, "11 min 30 sec");
    }

    #[test]
    fn test_row_still_inside() {
        let row = EntryRow::from(&record(None, None));
        assert_eq!(row.exit, DASH);
        assert_eq!(row.dwell, DASH);
    }

    #[tokio::test]
    async fn test_load_requests_whole_day_page() {
        let api = FakeApi::default().with_page(EntryExitPage {
            records: vec![record(None, None)],
            total_pages: 4,
            total_records: 31,
            ..Default::default()
        });
        let selection = Selection {
            site_id: "site-1".to_string(),
            date: Utc.with_ymd_and_hms(2025, 3, 14, 15, 0, 0).unwrap(),
        };
        let mut pager = Pager::default();
        pager.set_total(10);
        pager.go_to_page(7);

        let table = load_entries(&api, Some(&selection), pager, 10).await.settled_or_default();

        let query = api.last_page_query().unwrap();
        assert_eq!(query.page_number, 7);
        assert_eq!(query.page_size, 10);
        let midnight = Utc.with_ymd_and_hms(2025, 3, 14, 0, 0, 0).unwrap();
        assert_eq!(query.range.window.from_ms, midnight.timestamp_millis());

        // Response has fewer pages than requested; the pager clamps
        assert_eq!(table.pager.total(), 4);
        assert_eq!(table.pager.current(), 4);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.total_records, 31);
    }

    #[tokio::test]
    async fn test_no_site_skips_request() {
        let api = FakeApi::default();
        let state = load_entries::<_, Utc>(&api, None, Pager::default(), 10).await;
        assert_eq!(state, PanelState::Fallback);
        assert_eq!(api.calls(Endpoint::EntryExit), 0);
    }
}
