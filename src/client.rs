use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::HeaderMap;

use crate::transport::{HttpReply, HttpTransport, Transport};
use crate::types::*;

/// User agent sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = concat!("pushover-rs/", env!("CARGO_PKG_VERSION"));

/// Pushover API client. Create with [`Pushover::new`] or [`Pushover::builder`].
///
/// Every push is independent: the client holds configuration only, so it can
/// be shared freely across tasks and threads.
///
/// Each entry point comes in two flavours with the same validation, wire
/// format and result: the async one suspends the calling task until the
/// reply arrives, the `_blocking` one parks the calling thread instead.
#[derive(Clone)]
pub struct Pushover {
    app_token: String,
    default_user_key: Option<String>,
    endpoint: String,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for Pushover {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pushover")
            .field("endpoint", &self.endpoint)
            .field("default_user_key", &self.default_user_key)
            .finish_non_exhaustive()
    }
}

impl Pushover {
    /// Client for `app_token` with default settings.
    pub fn new(app_token: impl Into<String>) -> PushResult<Self> {
        Self::builder(app_token).build()
    }

    /// Create a new client builder.
    pub fn builder(app_token: impl Into<String>) -> PushoverBuilder {
        PushoverBuilder {
            app_token: app_token.into(),
            default_user_key: None,
            endpoint: None,
            timeout: None,
            user_agent: None,
            transport: None,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    // ── Suspending variants ──

    /// Push `message` with no title to the default recipients.
    pub async fn push(&self, message: &str) -> PushResult<PushResponse> {
        self.push_with("", message, &self.default_options()).await
    }

    /// Push `title` and `message` to the default recipients.
    pub async fn push_titled(&self, title: &str, message: &str) -> PushResult<PushResponse> {
        self.push_with(title, message, &self.default_options()).await
    }

    /// Push with explicit sending options.
    pub async fn push_with(
        &self,
        title: &str,
        message: &str,
        options: &PushOptions,
    ) -> PushResult<PushResponse> {
        let request = PushRequest::build(&self.app_token, title, message, options)?;
        self.dispatch(&request).await
    }

    /// Push to a single user or group key, optionally narrowed to one device.
    ///
    /// An empty `user_key` falls back to the client's default key.
    #[deprecated(note = "use `push_with` and `PushOptions`")]
    pub async fn push_to(
        &self,
        title: &str,
        message: &str,
        user_key: &str,
        device: &str,
        html: bool,
    ) -> PushResult<PushResponse> {
        let request = PushRequest::build_legacy(
            &self.app_token,
            self.default_user_key.as_deref(),
            title,
            message,
            user_key,
            device,
            html,
        )?;
        self.dispatch(&request).await
    }

    // ── Blocking variants ──

    /// Blocking form of [`push`](Self::push).
    pub fn push_blocking(&self, message: &str) -> PushResult<PushResponse> {
        block_on(self.push(message))?
    }

    /// Blocking form of [`push_titled`](Self::push_titled).
    pub fn push_titled_blocking(&self, title: &str, message: &str) -> PushResult<PushResponse> {
        block_on(self.push_titled(title, message))?
    }

    /// Blocking form of [`push_with`](Self::push_with).
    pub fn push_with_blocking(
        &self,
        title: &str,
        message: &str,
        options: &PushOptions,
    ) -> PushResult<PushResponse> {
        block_on(self.push_with(title, message, options))?
    }

    /// Blocking form of [`push_to`](Self::push_to).
    #[deprecated(note = "use `push_with_blocking` and `PushOptions`")]
    #[allow(deprecated)]
    pub fn push_to_blocking(
        &self,
        title: &str,
        message: &str,
        user_key: &str,
        device: &str,
        html: bool,
    ) -> PushResult<PushResponse> {
        block_on(self.push_to(title, message, user_key, device, html))?
    }

    // ── Internals ──

    fn default_options(&self) -> PushOptions {
        PushOptions::to(self.default_user_key.clone().unwrap_or_default())
    }

    /// Send a validated request and fold the reply into a [`PushResponse`].
    async fn dispatch(&self, request: &PushRequest) -> PushResult<PushResponse> {
        tracing::debug!(
            endpoint = %self.endpoint,
            recipients = request.recipient_count(),
            priority = %request.priority(),
            sound = %request.sound(),
            "dispatching push"
        );

        let reply = self.transport.post_form(&self.endpoint, request).await?;
        let response = decode_reply(reply)?;

        if response.is_accepted() {
            tracing::debug!(
                request_id = %response.request,
                limit = response.rate_limit.limit,
                remaining = response.rate_limit.remaining,
                "push accepted"
            );
        } else {
            tracing::warn!(
                status = response.status,
                request_id = %response.request,
                errors = ?response.errors,
                "push rejected"
            );
        }

        Ok(response)
    }
}

/// Parse a reply body and attach the rate-limit headers.
///
/// 4xx replies carry the same JSON shape as accepted ones and are decoded the
/// same way; rate-limit metadata is attached on both paths.
pub(crate) fn decode_reply(reply: HttpReply) -> PushResult<PushResponse> {
    let mut response: PushResponse =
        serde_json::from_str(&reply.body).map_err(|source| PushError::UnexpectedResponse {
            status: reply.status,
            source,
        })?;
    response.rate_limit = rate_limit_from_headers(&reply.headers);
    Ok(response)
}

/// Read the application rate-limit headers.
///
/// Missing or malformed numbers become 0, a missing reset marker becomes "".
pub fn rate_limit_from_headers(headers: &HeaderMap) -> RateLimit {
    RateLimit {
        limit: header_number(headers, HEADER_LIMIT),
        remaining: header_number(headers, HEADER_REMAINING),
        reset: header_text(headers, HEADER_RESET).to_string(),
    }
}

fn header_text<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .unwrap_or_default()
}

fn header_number(headers: &HeaderMap, name: &str) -> u32 {
    let raw = header_text(headers, name);
    raw.parse().unwrap_or_else(|_| {
        if !raw.is_empty() {
            tracing::warn!(header = name, value = raw, "malformed rate-limit header");
        }
        0
    })
}

/// Drive `fut` to completion on a private current-thread runtime.
fn block_on<F: Future>(fut: F) -> PushResult<F::Output> {
    if tokio::runtime::Handle::try_current().is_ok() {
        return Err(PushError::BlockingInRuntime);
    }
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    Ok(runtime.block_on(fut))
}

/// Builder for constructing a [`Pushover`] client.
pub struct PushoverBuilder {
    app_token: String,
    default_user_key: Option<String>,
    endpoint: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    transport: Option<Arc<dyn Transport>>,
}

impl PushoverBuilder {
    /// User or group key used by [`Pushover::push`], [`Pushover::push_titled`]
    /// and by the legacy form when no key is passed.
    pub fn default_user_key(mut self, key: impl Into<String>) -> Self {
        self.default_user_key = Some(key.into());
        self
    }

    /// Override the messages endpoint (defaults to [`API_URL`]).
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint = Some(url.into());
        self
    }

    /// Bound each push. No timeout is applied unless set.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Replace the HTTP transport. `timeout` and `user_agent` are then ignored.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the client.
    pub fn build(self) -> PushResult<Pushover> {
        let transport = match self.transport {
            Some(t) => t,
            None => {
                let user_agent = self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);
                Arc::new(HttpTransport::new(self.timeout, user_agent)?)
            }
        };

        Ok(Pushover {
            app_token: self.app_token,
            default_user_key: self.default_user_key.filter(|k| !k.is_empty()),
            endpoint: self.endpoint.unwrap_or_else(|| API_URL.into()),
            transport,
        })
    }
}
