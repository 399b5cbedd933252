//! Per-view state fed by live events, filtered by the selected site.

use std::collections::VecDeque;

use super::event::{AlertEvent, LiveEvent, OccupancyUpdate};

/// Alerts retained by the notifications panel
pub const ALERT_CAPACITY: usize = 10;

/// Bounded alert history, newest first
#[derive(Debug, Clone)]
pub struct AlertFeed {
    site_id: Option<String>,
    alerts: VecDeque<AlertEvent>,
    capacity: usize,
}

impl Default for AlertFeed {
    fn default() -> Self {
        Self::with_capacity(ALERT_CAPACITY)
    }
}

impl AlertFeed {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            site_id: None,
            alerts: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Change the site filter. History already received is kept.
    pub fn select_site(&mut self, site_id: Option<String>) {
        self.site_id = site_id;
    }

    /// Record an alert for the selected site; returns false when dropped
    pub fn push(&mut self, alert: AlertEvent) -> bool {
        if self.site_id.as_deref() != Some(alert.site_id.as_str()) {
            return false;
        }
        self.alerts.push_front(alert);
        self.alerts.truncate(self.capacity);
        true
    }

    /// Feed any live event; non-alerts are ignored
    pub fn apply(&mut self, event: &LiveEvent) -> bool {
        match event {
            LiveEvent::Alert(alert) => self.push(alert.clone()),
            LiveEvent::Occupancy(_) => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &AlertEvent> {
        self.alerts.iter()
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    pub fn clear(&mut self) {
        self.alerts.clear();
    }
}

/// Latest live occupancy reading for the selected site
#[derive(Debug, Clone, Default)]
pub struct OccupancySlot {
    site_id: Option<String>,
    latest: Option<OccupancyUpdate>,
}

impl OccupancySlot {
    /// Change the site filter; a reading for the previous site is discarded
    pub fn select_site(&mut self, site_id: Option<String>) {
        if self.site_id != site_id {
            self.latest = None;
        }
        self.site_id = site_id;
    }

    pub fn apply(&mut self, event: &LiveEvent) -> bool {
        match event {
            LiveEvent::Occupancy(update)
                if self.site_id.as_deref() == Some(update.site_id.as_str()) =>
            {
                self.latest = Some(update.clone());
                true
            }
            _ => false,
        }
    }

    pub fn latest(&self) -> Option<&OccupancyUpdate> {
        self.latest.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::live::event::EventTime;
    use crate::models::Severity;

    fn alert(site: &str, n: i64) -> AlertEvent {
        AlertEvent {
            site_id: site.to_string(),
            person_name: format!("Person {}", n),
            severity: Severity::Low,
            zone_name: "Lobby".to_string(),
            ts: EventTime::Millis(n),
        }
    }

    #[test]
    fn test_other_site_alert_dropped() {
        let mut feed = AlertFeed::default();
        feed.select_site(Some("s1".to_string()));

        assert!(!feed.push(alert("s2", 1)));
        assert!(feed.is_empty());
        assert!(feed.push(alert("s1", 2)));
        assert_eq!(feed.len(), 1);
    }

    #[test]
    fn test_no_site_selected_drops_everything() {
        let mut feed = AlertFeed::default();
        assert!(!feed.push(alert("s1", 1)));
    }

    #[test]
    fn test_eleventh_alert_evicts_oldest() {
        let mut feed = AlertFeed::default();
        feed.select_site(Some("s1".to_string()));
        for n in 1..=11 {
            feed.push(alert("s1", n));
        }

        assert_eq!(feed.len(), ALERT_CAPACITY);
        let names: Vec<_> = feed.iter().map(|a| a.person_name.as_str()).collect();
        assert_eq!(names.first(), Some(&"Person 11"));
        assert_eq!(names.last(), Some(&"Person 2"));
    }

    #[test]
    fn test_occupancy_slot_keeps_latest() {
        let mut slot = OccupancySlot::default();
        slot.select_site(Some("s1".to_string()));

        let update = |site: &str, n: u64| {
            LiveEvent::Occupancy(OccupancyUpdate {
                site_id: site.to_string(),
                site_occupancy: n,
                ts: EventTime::Millis(0),
            })
        };

        assert!(slot.apply(&update("s1", 5)));
        assert!(slot.apply(&update("s1", 7)));
        assert!(!slot.apply(&update("s2", 99)));
        assert_eq!(slot.latest().map(|u| u.site_occupancy), Some(7));

        slot.select_site(Some("s2".to_string()));
        assert!(slot.latest().is_none());
    }
}
