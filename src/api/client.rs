//! Analytics API Client
//!
//! reqwest transport for [`AnalyticsApi`] and [`Authenticator`]. Every
//! authenticated call goes through [`ApiClient::send`], which attaches the
//! bearer token and a request id and runs the shared status check.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::Instrument;
use uuid::Uuid;

use super::{
    bearer_token, check_status, AnalyticsApi, Endpoint, LoginRequest, LoginResponse, PageQuery,
    RangeQuery, RequestError, DEFAULT_REJECTION,
};
use crate::models::{
    DemographicsResponse, DwellResponse, EntryExitPage, FootfallResponse, OccupancyResponse, Site,
};
use crate::session::{AuthFailure, Authenticator, SessionController};

/// Correlates a request with the client's logs
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base, e.g. `https://analytics.example.com`
    pub base_url: String,
    /// Per-request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            request_timeout_ms: 10_000,
        }
    }
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    config: ClientConfig,
    session: Arc<SessionController>,
}

impl ApiClient {
    pub fn new(config: ClientConfig, session: Arc<SessionController>) -> Result<Self, RequestError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| RequestError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            config,
            session,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<SessionController> {
        &self.session
    }

    fn url(&self, endpoint: Endpoint) -> String {
        endpoint.url(&self.config.base_url)
    }

    /// Authenticated request: token, request id, status check, then decode
    async fn send<T>(&self, endpoint: Endpoint, request: RequestBuilder) -> Result<T, RequestError>
    where
        T: DeserializeOwned + Send,
    {
        let token = bearer_token(&self.session)?;
        let request_id = Uuid::new_v4();
        let span = tracing::debug_span!("api_request", endpoint = %endpoint, request_id = %request_id);

        async move {
            let response = request
                .bearer_auth(token)
                .header(REQUEST_ID_HEADER, request_id.to_string())
                .send()
                .await
                .map_err(transport_error)?;

            check_status(&self.session, endpoint, response.status().as_u16())?;

            let body = response.json::<T>().await.map_err(|e| {
                tracing::error!(error = %e, "Failed to decode response");
                RequestError::Decode(e.to_string())
            })?;
            tracing::debug!("Request complete");
            Ok(body)
        }
        .instrument(span)
        .await
    }

    async fn post_range<T>(&self, endpoint: Endpoint, query: &RangeQuery) -> Result<T, RequestError>
    where
        T: DeserializeOwned + Send,
    {
        let request = self.client.post(self.url(endpoint)).json(&query.body(endpoint));
        self.send(endpoint, request).await
    }
}

fn transport_error(e: reqwest::Error) -> RequestError {
    let message = if e.is_timeout() {
        "request timed out".to_string()
    } else if e.is_connect() {
        format!("connection failed: {}", e)
    } else {
        e.to_string()
    };
    tracing::error!(error = %message, "Request failed");
    RequestError::Transport(message)
}

#[async_trait]
impl AnalyticsApi for ApiClient {
    async fn sites(&self) -> Result<Vec<Site>, RequestError> {
        let request = self.client.get(self.url(Endpoint::Sites));
        self.send(Endpoint::Sites, request).await
    }

    async fn demographics(&self, query: &RangeQuery) -> Result<DemographicsResponse, RequestError> {
        self.post_range(Endpoint::Demographics, query).await
    }

    async fn occupancy(&self, query: &RangeQuery) -> Result<OccupancyResponse, RequestError> {
        self.post_range(Endpoint::Occupancy, query).await
    }

    async fn dwell(&self, query: &RangeQuery) -> Result<DwellResponse, RequestError> {
        self.post_range(Endpoint::Dwell, query).await
    }

    async fn footfall(&self, query: &RangeQuery) -> Result<FootfallResponse, RequestError> {
        self.post_range(Endpoint::Footfall, query).await
    }

    async fn entry_exit(&self, query: &PageQuery) -> Result<EntryExitPage, RequestError> {
        let request = self
            .client
            .post(self.url(Endpoint::EntryExit))
            .json(&query.body());
        self.send(Endpoint::EntryExit, request).await
    }
}

#[async_trait]
impl Authenticator for ApiClient {
    async fn exchange(&self, email: &str, password: &str) -> Result<String, AuthFailure> {
        let request_id = Uuid::new_v4();
        let response = self
            .client
            .post(self.url(Endpoint::Login))
            .header(REQUEST_ID_HEADER, request_id.to_string())
            .json(&LoginRequest { email, password })
            .send()
            .await
            .map_err(|e| AuthFailure::Transport(transport_error(e).to_string()))?;

        let status = response.status();
        let body = match response.json::<LoginResponse>().await {
            Ok(body) => body,
            Err(e) if status.is_success() => {
                return Err(AuthFailure::Transport(format!("Parse error: {}", e)));
            }
            Err(_) => LoginResponse {
                token: None,
                error_message: None,
            },
        };

        let rejection = || {
            AuthFailure::Rejected(
                body.error_message
                    .clone()
                    .unwrap_or_else(|| DEFAULT_REJECTION.to_string()),
            )
        };

        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), %request_id, "Login rejected");
            return Err(rejection());
        }
        match body.token.clone() {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(rejection()),
        }
    }
}
