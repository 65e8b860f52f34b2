use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::HeaderMap;

use crate::types::{PushRequest, PushResult};

/// Raw HTTP reply before JSON decoding.
#[derive(Debug, Clone, Default)]
pub struct HttpReply {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: String,
}

/// Trait abstracting the HTTP exchange for testing.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST `request` form-encoded to `endpoint` and return whatever came back,
    /// including 4xx/5xx replies. Only connectivity failures are errors.
    async fn post_form(&self, endpoint: &str, request: &PushRequest) -> PushResult<HttpReply>;
}

/// Real transport backed by `reqwest`.
///
/// Idle connections are not pooled: every push is its own round-trip, so a
/// client can be driven from the caller's runtime and from the private
/// runtime of the blocking variants alike.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Option<Duration>, user_agent: &str) -> PushResult<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(user_agent)
            .pool_max_idle_per_host(0);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_form(&self, endpoint: &str, request: &PushRequest) -> PushResult<HttpReply> {
        let response = self.client.post(endpoint).form(request).send().await?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.text().await?;
        Ok(HttpReply {
            status,
            headers,
            body,
        })
    }
}
