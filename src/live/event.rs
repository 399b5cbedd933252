//! Typed push events
//!
//! Two events are consumed: `live_occupancy` replaces the latest occupancy
//! reading for a site and `alert` reports a person entering a watched zone.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::Severity;

pub const OCCUPANCY_EVENT: &str = "live_occupancy";
pub const ALERT_EVENT: &str = "alert";

/// Event timestamp. The backend sends either epoch millis or RFC 3339.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventTime {
    Millis(i64),
    Text(String),
}

impl EventTime {
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Millis(ms) => DateTime::<Utc>::from_timestamp_millis(*ms),
            Self::Text(s) => DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .ok(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccupancyUpdate {
    pub site_id: String,
    pub site_occupancy: u64,
    pub ts: EventTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertEvent {
    pub site_id: String,
    pub person_name: String,
    pub severity: Severity,
    pub zone_name: String,
    pub ts: EventTime,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiveEvent {
    Occupancy(OccupancyUpdate),
    Alert(AlertEvent),
}

impl LiveEvent {
    /// Decode a named event. `Ok(None)` for events this client ignores.
    pub fn decode(name: &str, data: Value) -> Result<Option<Self>, serde_json::Error> {
        match name {
            OCCUPANCY_EVENT => serde_json::from_value(data).map(|u| Some(Self::Occupancy(u))),
            ALERT_EVENT => serde_json::from_value(data).map(|a| Some(Self::Alert(a))),
            _ => Ok(None),
        }
    }

    pub fn site_id(&self) -> &str {
        match self {
            Self::Occupancy(update) => &update.site_id,
            Self::Alert(alert) => &alert.site_id,
        }
    }
}
