//! View State
//!
//! Selected site, selected date, active dashboard tab and the two panel
//! flags. Every metric panel is driven by [`ViewState::selection`], which is
//! `None` until a site is chosen.

use chrono::{DateTime, NaiveDate, TimeZone};

use super::calendar;
use super::route::DashboardTab;
use crate::models::Site;

/// Inputs every metric panel is a function of
#[derive(Debug, Clone, PartialEq)]
pub struct Selection<Tz: TimeZone> {
    pub site_id: String,
    pub date: DateTime<Tz>,
}

#[derive(Debug, Clone)]
pub struct ViewState<Tz: TimeZone> {
    sites: Vec<Site>,
    site: Option<Site>,
    date: DateTime<Tz>,
    tab: DashboardTab,
    sidebar_open: bool,
    notifications_open: bool,
}

impl<Tz: TimeZone> ViewState<Tz> {
    /// Fresh state at mount; the date defaults to `now`
    pub fn new(now: DateTime<Tz>) -> Self {
        Self {
            sites: Vec::new(),
            site: None,
            date: now,
            tab: DashboardTab::default(),
            sidebar_open: false,
            notifications_open: false,
        }
    }

    /// Adopt a freshly fetched site list and select the first site if none
    /// is selected yet. Returns true when the selection changed.
    pub fn set_sites(&mut self, sites: Vec<Site>) -> bool {
        self.sites = sites;
        let still_listed = self
            .site
            .as_ref()
            .is_some_and(|s| self.sites.iter().any(|listed| listed.id == s.id));
        if still_listed {
            return false;
        }
        self.site = self.sites.first().cloned();
        if let Some(site) = &self.site {
            tracing::debug!(site_id = %site.id, "Selected first site");
        }
        true
    }

    /// Select a listed site by id. Unknown ids are ignored.
    pub fn select_site(&mut self, site_id: &str) -> bool {
        if self.site.as_ref().is_some_and(|s| s.id == site_id) {
            return false;
        }
        match self.sites.iter().find(|s| s.id == site_id) {
            Some(site) => {
                self.site = Some(site.clone());
                true
            }
            None => {
                tracing::warn!(site_id, "Ignoring unknown site");
                false
            }
        }
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn site(&self) -> Option<&Site> {
        self.site.as_ref()
    }

    pub fn date(&self) -> &DateTime<Tz> {
        &self.date
    }

    pub fn set_date(&mut self, date: DateTime<Tz>) {
        self.date = date;
    }

    /// Calendar click; future days are ignored
    pub fn pick_day(&mut self, day: NaiveDate, today: NaiveDate) -> bool {
        match calendar::select_day(&self.date, day, today) {
            Some(date) => {
                self.date = date;
                true
            }
            None => false,
        }
    }

    pub fn selection(&self) -> Option<Selection<Tz>> {
        self.site.as_ref().map(|site| Selection {
            site_id: site.id.clone(),
            date: self.date.clone(),
        })
    }

    pub fn tab(&self) -> DashboardTab {
        self.tab
    }

    /// Switch tab and return the path to push onto history
    pub fn navigate(&mut self, tab: DashboardTab) -> &'static str {
        self.tab = tab;
        self.sidebar_open = false;
        tab.path()
    }

    /// Back/forward navigation: re-read the tab from the address bar
    pub fn sync_from_path(&mut self, path: &str) {
        self.tab = DashboardTab::from_path(path);
    }

    pub fn sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_open = !self.sidebar_open;
    }

    pub fn close_sidebar(&mut self) {
        self.sidebar_open = false;
    }

    pub fn notifications_open(&self) -> bool {
        self.notifications_open
    }

    pub fn toggle_notifications(&mut self) {
        self.notifications_open = !self.notifications_open;
    }

    pub fn close_notifications(&mut self) {
        self.notifications_open = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::site;
    use chrono::Utc;

    fn state() -> ViewState<Utc> {
        ViewState::new(Utc.with_ymd_and_hms(2025, 3, 14, 10, 0, 0).unwrap())
    }

    #[test]
    fn test_no_selection_without_site() {
        let view = state();
        assert!(view.selection().is_none());
    }

    #[test]
    fn test_first_site_auto_selected() {
        let mut view = state();
        assert!(view.set_sites(vec![site("a"), site("b")]));
        assert_eq!(view.site().map(|s| s.id.as_str()), Some("a"));
        assert_eq!(view.selection().unwrap().site_id, "a");
    }

    #[test]
    fn test_refetch_keeps_existing_selection() {
        let mut view = state();
        view.set_sites(vec![site("a"), site("b")]);
        assert!(view.select_site("b"));
        assert!(!view.set_sites(vec![site("a"), site("b")]));
        assert_eq!(view.site().unwrap().id, "b");
    }

    #[test]
    fn test_unknown_site_ignored() {
        let mut view = state();
        view.set_sites(vec![site("a")]);
        assert!(!view.select_site("zzz"));
        assert_eq!(view.site().unwrap().id, "a");
    }

    #[test]
    fn test_navigation_and_panels() {
        let mut view = state();
        view.toggle_sidebar();
        assert!(view.sidebar_open());
        assert_eq!(view.navigate(DashboardTab::Entries), "/dashboard/entries");
        assert!(!view.sidebar_open());

        view.sync_from_path("/dashboard/overview");
        assert_eq!(view.tab(), DashboardTab::Overview);

        view.toggle_notifications();
        assert!(view.notifications_open());
        view.close_notifications();
        assert!(!view.notifications_open());
    }

    #[test]
    fn test_pick_day() {
        let mut view = state();
        let today = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        assert!(!view.pick_day(NaiveDate::from_ymd_opt(2025, 3, 20).unwrap(), today));
        assert!(view.pick_day(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(), today));
        assert_eq!(
            *view.date(),
            Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap()
        );
    }
}
