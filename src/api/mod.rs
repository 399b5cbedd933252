//! Request Layer
//!
//! Endpoint table, request bodies and the [`AnalyticsApi`] contract every
//! panel fetches through. Concrete transports live next to it: the reqwest
//! client ([`client`], native) and the browser crate's gloo-net client.
//!
//! Expiry handling is written once here ([`check_status`]): a 401/403 tears
//! the session down and aborts the request before its body is read.

#[cfg(feature = "native")]
pub mod client;

#[cfg(feature = "native")]
pub use client::{ApiClient, ClientConfig};

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::analytics::window::TimeWindow;
use crate::models::{
    DemographicsResponse, DwellResponse, EntryExitPage, FootfallResponse, OccupancyResponse, Site,
};
use crate::session::SessionController;

/// Backend endpoints used by the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Login,
    Sites,
    Demographics,
    Occupancy,
    Dwell,
    Footfall,
    EntryExit,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Login => "/api/auth/login",
            Self::Sites => "/api/sites",
            Self::Demographics => "/api/analytics/demographics",
            Self::Occupancy => "/api/analytics/occupancy",
            Self::Dwell => "/api/analytics/dwell",
            Self::Footfall => "/api/analytics/footfall",
            Self::EntryExit => "/api/analytics/entry-exit",
        }
    }

    /// How this endpoint expects millisecond bounds on the wire.
    /// Demographics takes JSON numbers; the rest take numeric strings.
    pub fn millis_repr(&self) -> MillisRepr {
        match self {
            Self::Demographics => MillisRepr::Number,
            _ => MillisRepr::Text,
        }
    }

    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.path())
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MillisRepr {
    Number,
    Text,
}

/// Epoch milliseconds as the endpoint wants them
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Millis {
    Number(i64),
    Text(String),
}

impl Millis {
    pub fn encode(value: i64, repr: MillisRepr) -> Self {
        match repr {
            MillisRepr::Number => Self::Number(value),
            MillisRepr::Text => Self::Text(value.to_string()),
        }
    }
}

/// Aggregate metric query: one site, one time window
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RangeQuery {
    pub site_id: String,
    pub window: TimeWindow,
}

impl RangeQuery {
    pub fn new(site_id: impl Into<String>, window: TimeWindow) -> Self {
        Self {
            site_id: site_id.into(),
            window,
        }
    }

    pub fn body(&self, endpoint: Endpoint) -> RangeBody {
        let repr = endpoint.millis_repr();
        RangeBody {
            site_id: self.site_id.clone(),
            from_utc: Millis::encode(self.window.from_ms, repr),
            to_utc: Millis::encode(self.window.to_ms, repr),
            page_number: None,
            page_size: None,
        }
    }
}

/// Visitor-log query: a range plus pagination
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageQuery {
    pub range: RangeQuery,
    pub page_number: u32,
    pub page_size: u32,
}

impl PageQuery {
    pub fn body(&self) -> RangeBody {
        RangeBody {
            page_number: Some(self.page_number),
            page_size: Some(self.page_size),
            ..self.range.body(Endpoint::EntryExit)
        }
    }
}

/// JSON body shared by every analytics POST
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeBody {
    pub site_id: String,
    pub from_utc: Millis,
    pub to_utc: Millis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default, rename = "errorMessage")]
    pub error_message: Option<String>,
}

/// Message shown when a rejection carries no `errorMessage`
pub const DEFAULT_REJECTION: &str = "Login failed";

/// Errors from authenticated requests
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Invalid or expired token")]
    SessionExpired,

    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: Endpoint, status: u16 },

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Parse error: {0}")]
    Decode(String),
}

impl RequestError {
    /// True when the session was torn down by this request
    pub fn is_expiry(&self) -> bool {
        matches!(self, Self::SessionExpired | Self::NotAuthenticated)
    }
}

/// Bearer token for the next request, or `NotAuthenticated`
pub fn bearer_token(session: &SessionController) -> Result<String, RequestError> {
    session.token().ok_or(RequestError::NotAuthenticated)
}

/// Central status check for authenticated calls.
///
/// 401/403 triggers `logout()` and aborts; other non-2xx statuses are
/// reported without touching the session.
pub fn check_status(
    session: &SessionController,
    endpoint: Endpoint,
    status: u16,
) -> Result<(), RequestError> {
    match status {
        200..=299 => Ok(()),
        401 | 403 => {
            tracing::warn!(endpoint = %endpoint, status, "Invalid or expired token");
            session.logout();
            Err(RequestError::SessionExpired)
        }
        _ => {
            tracing::error!(endpoint = %endpoint, status, "Request failed");
            Err(RequestError::Status { endpoint, status })
        }
    }
}

/// Everything the dashboard reads from the analytics backend
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait AnalyticsApi {
    async fn sites(&self) -> Result<Vec<Site>, RequestError>;

    async fn demographics(&self, query: &RangeQuery) -> Result<DemographicsResponse, RequestError>;

    async fn occupancy(&self, query: &RangeQuery) -> Result<OccupancyResponse, RequestError>;

    async fn dwell(&self, query: &RangeQuery) -> Result<DwellResponse, RequestError>;

    async fn footfall(&self, query: &RangeQuery) -> Result<FootfallResponse, RequestError>;

    async fn entry_exit(&self, query: &PageQuery) -> Result<EntryExitPage, RequestError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemoryTokenStore;

    fn window() -> TimeWindow {
        TimeWindow::new(1_700_000_000_000, 1_700_000_360_000)
    }

    #[test]
    fn test_demographics_body_uses_numbers() {
        let body = RangeQuery::new("site-1", window()).body(Endpoint::Demographics);
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["siteId"], "site-1");
        assert_eq!(json["fromUtc"], 1_700_000_000_000_i64);
        assert_eq!(json["toUtc"], 1_700_000_360_000_i64);
        assert!(json.get("pageNumber").is_none());
    }

    #[test]
    fn test_footfall_body_uses_strings() {
        let body = RangeQuery::new("site-1", window()).body(Endpoint::Footfall);
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["fromUtc"], "1700000000000");
        assert_eq!(json["toUtc"], "1700000360000");
    }

    #[test]
    fn test_page_body_adds_pagination() {
        let query = PageQuery {
            range: RangeQuery::new("site-1", window()),
            page_number: 3,
            page_size: 10,
        };
        let json = serde_json::to_value(query.body()).unwrap();

        assert_eq!(json["pageNumber"], 3);
        assert_eq!(json["pageSize"], 10);
        assert_eq!(json["toUtc"], "1700000360000");
    }

    #[test]
    fn test_endpoint_url_trims_slash() {
        assert_eq!(
            Endpoint::EntryExit.url("http://api.local/"),
            "http://api.local/api/analytics/entry-exit"
        );
    }

    #[test]
    fn test_forbidden_tears_down_session() {
        let session = SessionController::new(MemoryTokenStore::with_token("tok"));
        session.initialize();

        let err = check_status(&session, Endpoint::Footfall, 403).unwrap_err();
        assert_eq!(err, RequestError::SessionExpired);
        assert!(!session.is_authenticated());
        assert_eq!(bearer_token(&session), Err(RequestError::NotAuthenticated));
    }

    #[test]
    fn test_server_error_keeps_session() {
        let session = SessionController::new(MemoryTokenStore::with_token("tok"));
        session.initialize();

        let err = check_status(&session, Endpoint::Dwell, 500).unwrap_err();
        assert_eq!(
            err,
            RequestError::Status {
                endpoint: Endpoint::Dwell,
                status: 500
            }
        );
        assert!(session.is_authenticated());
        assert!(check_status(&session, Endpoint::Dwell, 200).is_ok());
    }
}
