//! HTTP API Client
//!
//! gloo-net implementation of [`AnalyticsApi`] and [`Authenticator`]. Status
//! handling is shared with the native client through
//! [`check_status`](crowdwatch::api::check_status), so a 401/403 here logs
//! the session out the same way.

use async_trait::async_trait;
use gloo_net::http::{Request, RequestBuilder};
use serde::de::DeserializeOwned;
use std::rc::Rc;

use crowdwatch::api::{
    bearer_token, check_status, LoginRequest, LoginResponse, RangeBody, DEFAULT_REJECTION,
};
use crowdwatch::{
    AnalyticsApi, AuthFailure, Authenticator, DemographicsResponse, DwellResponse, Endpoint,
    EntryExitPage, FootfallResponse, OccupancyResponse, PageQuery, RangeQuery, RequestError,
    SessionController, Site,
};

/// Request layer bound to one API base and the page's session
#[derive(Clone)]
pub struct HttpApi {
    base_url: String,
    session: Rc<SessionController>,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>, session: Rc<SessionController>) -> Self {
        Self {
            base_url: base_url.into(),
            session,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: Endpoint) -> String {
        endpoint.url(&self.base_url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        builder: RequestBuilder,
        body: Option<RangeBody>,
    ) -> Result<T, RequestError> {
        let token = bearer_token(&self.session)?;
        let builder = builder.header("Authorization", &format!("Bearer {}", token));
        let request = match body {
            Some(body) => builder.json(&body),
            None => builder.build(),
        }
        .map_err(|e| RequestError::Transport(e.to_string()))?;

        let response = request.send().await.map_err(|e| {
            web_sys::console::error_1(&format!("{} failed: {}", endpoint, e).into());
            RequestError::Transport(e.to_string())
        })?;

        check_status(&self.session, endpoint, response.status())?;

        response.json::<T>().await.map_err(|e| {
            web_sys::console::error_1(&format!("Failed to decode {} response: {}", endpoint, e).into());
            RequestError::Decode(e.to_string())
        })
    }

    async fn post_range<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        query: &RangeQuery,
    ) -> Result<T, RequestError> {
        let builder = Request::post(&self.url(endpoint));
        self.send(endpoint, builder, Some(query.body(endpoint))).await
    }
}

#[async_trait(?Send)]
impl AnalyticsApi for HttpApi {
    async fn sites(&self) -> Result<Vec<Site>, RequestError> {
        let builder = Request::get(&self.url(Endpoint::Sites));
        self.send(Endpoint::Sites, builder, None).await
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
        let builder = Request::post(&self.url(Endpoint::EntryExit));
        self.send(Endpoint::EntryExit, builder, Some(query.body())).await
    }
}

#[async_trait(?Send)]
impl Authenticator for HttpApi {
    async fn exchange(&self, email: &str, password: &str) -> Result<String, AuthFailure> {
        let response = Request::post(&self.url(Endpoint::Login))
            .json(&LoginRequest { email, password })
            .map_err(|e| AuthFailure::Transport(e.to_string()))?
            .send()
            .await
            .map_err(|e| AuthFailure::Transport(format!("Network error: {}", e)))?;

        let ok = response.ok();
        let body = match response.json::<LoginResponse>().await {
            Ok(body) => body,
            Err(e) if ok => return Err(AuthFailure::Transport(format!("Parse error: {}", e))),
            Err(_) => LoginResponse {
                token: None,
                error_message: None,
            },
        };

        match body.token {
            Some(token) if ok && !token.is_empty() => Ok(token),
            _ => Err(AuthFailure::Rejected(
                body.error_message
                    .unwrap_or_else(|| DEFAULT_REJECTION.to_string()),
            )),
        }
    }
}
