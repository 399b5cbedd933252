//! Domain Types
//!
//! Snapshots returned by the analytics backend: sites, zones, visitor
//! records and the per-metric response bodies.

use serde::{Deserialize, Serialize};

/// Security level of a zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecurityLevel {
    #[serde(alias = "Low", alias = "LOW")]
    Low,
    #[serde(alias = "Medium", alias = "MEDIUM")]
    Medium,
    #[serde(alias = "High", alias = "HIGH")]
    High,
}

/// Alert / visitor severity. Shares the backend's three-level scale.
pub type Severity = SecurityLevel;

impl SecurityLevel {
    /// Capitalized label used in alert badges
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl std::fmt::Display for SecurityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A sub-area of a site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    #[serde(rename = "zoneId", alias = "id")]
    pub id: String,
    pub name: String,
    #[serde(rename = "securityLevel")]
    pub security_level: SecurityLevel,
}

/// A monitored venue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    #[serde(rename = "siteId", alias = "id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub timezone: String,
    #[serde(default)]
    pub zones: Vec<Zone>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[serde(alias = "Male")]
    Male,
    #[serde(alias = "Female")]
    Female,
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Male => f.write_str("male"),
            Self::Female => f.write_str("female"),
        }
    }
}

/// One row of the entry/exit log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitorRecord {
    pub person_id: String,
    pub person_name: String,
    pub gender: Gender,
    pub zone_id: String,
    pub zone_name: String,
    pub severity: Severity,
    /// Local time, `YYYY-MM-DD HH:MM:SS`
    #[serde(alias = "entryTime")]
    pub entry_local: String,
    #[serde(default, alias = "exitTime")]
    pub exit_local: Option<String>,
    #[serde(default)]
    pub dwell_minutes: Option<f64>,
}

// ============================================
// Response bodies
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemographicsBucket {
    pub utc: i64,
    #[serde(default)]
    pub local: Option<String>,
    #[serde(default)]
    pub male: u64,
    #[serde(default)]
    pub female: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemographicsResponse {
    #[serde(default)]
    pub site_id: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub buckets: Vec<DemographicsBucket>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccupancyBucket {
    pub utc: i64,
    #[serde(default)]
    pub avg: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OccupancyResponse {
    #[serde(default)]
    pub buckets: Vec<OccupancyBucket>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DwellResponse {
    #[serde(default)]
    pub avg_dwell_minutes: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FootfallResponse {
    #[serde(default)]
    pub footfall: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryExitPage {
    #[serde(default)]
    pub records: Vec<VisitorRecord>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_records: u64,
    #[serde(default)]
    pub page_number: Option<u32>,
    #[serde(default)]
    pub page_size: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_deserialize_backend_shape() {
        let json = r#"{
            "siteId": "8bd0d580",
            "name": "Dubai Mall",
            "city": "Dubai",
            "country": "UAE",
            "timezone": "Asia/Dubai",
            "zones": [
                {"zoneId": "788ab32d", "name": "HIGH Zone", "securityLevel": "high"},
                {"zoneId": "2201d536", "name": "MEDIUM Zone", "securityLevel": "medium"}
            ]
        }"#;
        let site: Site = serde_json::from_str(json).unwrap();
        assert_eq!(site.id, "8bd0d580");
        assert_eq!(site.zones.len(), 2);
        assert_eq!(site.zones[0].security_level, SecurityLevel::High);
    }

    #[test]
    fn test_severity_accepts_capitalized() {
        let s: Severity = serde_json::from_str("\"Medium\"").unwrap();
        assert_eq!(s, Severity::Medium);
        let s: Severity = serde_json::from_str("\"low\"").unwrap();
        assert_eq!(s, Severity::Low);
    }

    #[test]
    fn test_visitor_record_optional_exit() {
        let json = r#"{
            "personId": "p1",
            "personName": "Jane Doe",
            "gender": "female",
            "zoneId": "z1",
            "zoneName": "Lobby",
            "severity": "low",
            "entryLocal": "2025-01-10 09:15:00",
            "exitLocal": null,
            "dwellMinutes": null
        }"#;
        let record: VisitorRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.gender, Gender::Female);
        assert!(record.exit_local.is_none());
        assert!(record.dwell_minutes.is_none());
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let dwell: DwellResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(dwell.avg_dwell_minutes, 0.0);

        let page: EntryExitPage = serde_json::from_str(r#"{"totalPages": 3}"#).unwrap();
        assert_eq!(page.total_pages, 3);
        assert!(page.records.is_empty());
    }
}
