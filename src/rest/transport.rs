//! HTTP transport with per-attempt deadlines and bounded retries.
//!
//! [`HttpTransport`] performs exactly one attempt. [`RetryTransport`] wraps
//! any [`Transport`] and drives it through a [`RetryStateMachine`]:
//!
//! ```text
//! Idle -> Attempting(n) -> Succeeded
//!                       -> RetryWait(n) -> Attempting(n + 1)
//!                       -> Exhausted
//! ```
//!
//! Only transport failures (connection errors, timeouts) are retried. A
//! response with any HTTP status is a successful transport outcome and is
//! handed back unchanged.

use std::future::Future;
use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;

use crate::error::TransportError;

/// A fully prepared HTTP request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL.
    pub url: String,
    /// Request headers.
    pub headers: HeaderMap,
    /// Request body, if any.
    pub body: Option<String>,
}

impl HttpRequest {
    /// A GET request without body.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// A POST request with a body.
    pub fn post(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            method: Method::POST,
            url: url.into(),
            headers: HeaderMap::new(),
            body: Some(body.into()),
        }
    }
}

/// The status and body of an HTTP response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Response body as text.
    pub body: String,
}

/// Executes HTTP requests.
///
/// Implementations return `Ok` for every response that arrived, whatever its
/// status, and `Err` only when no response could be obtained.
pub trait Transport: Send + Sync {
    /// Send one logical request.
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}

/// Single-attempt transport over `reqwest` with tracing middleware.
#[derive(Clone)]
pub struct HttpTransport {
    client: ClientWithMiddleware,
}

impl HttpTransport {
    /// Wrap a configured `reqwest` client.
    pub fn new(client: reqwest::Client) -> Self {
        let client = ClientBuilder::new(client)
            .with(TracingMiddleware::default())
            .build();
        Self { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport").finish_non_exhaustive()
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self
            .client
            .request(request.method, request.url.as_str())
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        Ok(HttpResponse { status, body })
    }
}

/// Retry and timeout settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one. At least 1.
    pub max_attempts: u32,
    /// Deadline for each individual attempt.
    pub attempt_timeout: Duration,
    /// Wait before the second attempt; doubles for each later attempt.
    pub base_backoff: Duration,
}

impl RetryPolicy {
    /// Default number of attempts.
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
    /// Default per-attempt deadline.
    pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(10);
    /// Default first backoff.
    pub const DEFAULT_BASE_BACKOFF: Duration = Duration::from_secs(1);

    /// Wait after failed attempt `attempt` (1-based): `base_backoff * 2^(attempt - 1)`.
    pub fn backoff_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.base_backoff.saturating_mul(1 << exponent)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            attempt_timeout: Self::DEFAULT_ATTEMPT_TIMEOUT,
            base_backoff: Self::DEFAULT_BASE_BACKOFF,
        }
    }
}

/// States of one logical request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    /// Nothing sent yet.
    Idle,
    /// Attempt `n` (1-based) is in flight.
    Attempting(u32),
    /// Attempt `n` failed; waiting before the next one.
    RetryWait(u32),
    /// An attempt produced a response.
    Succeeded,
    /// Every attempt failed.
    Exhausted,
}

impl RetryState {
    /// Whether no further transitions are possible.
    pub fn is_terminal(self) -> bool {
        matches!(self, RetryState::Succeeded | RetryState::Exhausted)
    }
}

/// Pure transition logic for [`RetryTransport`], with no I/O or timers.
#[derive(Debug, Clone)]
pub struct RetryStateMachine {
    policy: RetryPolicy,
    state: RetryState,
}

impl RetryStateMachine {
    /// A machine in [`RetryState::Idle`].
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            state: RetryState::Idle,
        }
    }

    /// Current state.
    pub fn state(&self) -> RetryState {
        self.state
    }

    /// Begin the next attempt and return its number.
    ///
    /// Valid from `Idle` and `RetryWait`; any other state is left unchanged.
    pub fn begin_attempt(&mut self) -> u32 {
        let attempt = match self.state {
            RetryState::Idle => 1,
            RetryState::RetryWait(n) => n + 1,
            RetryState::Attempting(n) => return n,
            RetryState::Succeeded | RetryState::Exhausted => return 0,
        };
        self.state = RetryState::Attempting(attempt);
        attempt
    }

    /// The in-flight attempt produced a response.
    pub fn succeed(&mut self) {
        if let RetryState::Attempting(_) = self.state {
            self.state = RetryState::Succeeded;
        }
    }

    /// The in-flight attempt failed.
    ///
    /// Returns the backoff to wait before the next attempt, or `None` once
    /// attempts are used up and the machine is `Exhausted`.
    pub fn fail(&mut self) -> Option<Duration> {
        let RetryState::Attempting(n) = self.state else {
            return None;
        };
        if n >= self.policy.max_attempts.max(1) {
            self.state = RetryState::Exhausted;
            None
        } else {
            self.state = RetryState::RetryWait(n);
            Some(self.policy.backoff_after(n))
        }
    }
}

/// Transport decorator adding per-attempt deadlines and exponential backoff.
#[derive(Debug, Clone)]
pub struct RetryTransport<T> {
    inner: T,
    policy: RetryPolicy,
}

impl<T: Transport> RetryTransport<T> {
    /// Wrap `inner` with `policy`.
    pub fn new(inner: T, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    /// The active policy.
    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// The wrapped transport.
    pub fn inner(&self) -> &T {
        &self.inner
    }
}

impl<T: Transport> Transport for RetryTransport<T> {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut machine = RetryStateMachine::new(self.policy);

        loop {
            let attempt = machine.begin_attempt();
            tracing::debug!(attempt, url = %request.url, "Sending request");

            let outcome =
                match tokio::time::timeout(self.policy.attempt_timeout, self.inner.send(request.clone()))
                    .await
                {
                    Ok(result) => result,
                    Err(_) => Err(TransportError::Timeout(self.policy.attempt_timeout)),
                };

            match outcome {
                Ok(response) => {
                    machine.succeed();
                    tracing::debug!(attempt, status = %response.status, "Request completed");
                    return Ok(response);
                }
                Err(error) => match machine.fail() {
                    Some(delay) => {
                        tracing::warn!(attempt, ?delay, %error, "Attempt failed, retrying");
                        tokio::time::sleep(delay).await;
                    }
                    None => {
                        tracing::error!(attempt, %error, "All attempts failed");
                        return Err(TransportError::Exhausted {
                            attempts: attempt,
                            last: Box::new(error),
                        });
                    }
                },
            }
        }
    }
}
