//! Exchange logging with `tracing`.
//!
//! Only the URL path is logged. Query values and header values may carry
//! credentials, so the debug level lists their names and nothing more.

use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use apiclient_core::{Request, Response, StatusClass, TransportError};
use tower::{Layer, Service};
use tracing::{Instrument, debug, error, info, info_span, warn};

use crate::ServiceFuture;

/// How much of the outgoing request is logged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// Adds header names, query parameter names and whether basic
    /// credentials are attached.
    Debug,
    /// Method and URL path.
    #[default]
    Info,
}

/// Wraps a transport service in [`Logging`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoggingLayer {
    level: LogLevel,
}

impl LoggingLayer {
    /// Info-level logging.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Debug-level logging.
    #[must_use]
    pub fn debug() -> Self {
        Self {
            level: LogLevel::Debug,
        }
    }

    /// Configured level.
    #[must_use]
    pub const fn level(&self) -> LogLevel {
        self.level
    }
}

impl<S> Layer<S> for LoggingLayer {
    type Service = Logging<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Logging {
            inner,
            level: self.level,
        }
    }
}

/// Logs each request once and each outcome once, inside an
/// `api_request` span.
#[derive(Debug, Clone)]
pub struct Logging<S> {
    inner: S,
    level: LogLevel,
}

impl<S> Logging<S> {
    /// Wrap `inner` with info-level logging.
    pub fn new(inner: S) -> Self {
        LoggingLayer::new().layer(inner)
    }
}

impl<S> Service<Request> for Logging<S>
where
    S: Service<Request, Response = Response, Error = TransportError> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = TransportError;
    type Future = ServiceFuture;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let span = info_span!("api_request", method = %request.method(), url = %request.url());
        log_request(&request, self.level);

        // Take the service that was driven to readiness, leave a fresh clone behind.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(
            async move {
                let started = Instant::now();
                let outcome = inner.call(request).await;
                log_outcome(&outcome, started.elapsed());
                outcome
            }
            .instrument(span),
        )
    }
}

fn log_request(request: &Request, level: LogLevel) {
    match level {
        LogLevel::Info => info!("sending request"),
        LogLevel::Debug => debug!(
            headers = ?request.headers().keys().collect::<Vec<_>>(),
            query = ?request.query_params().names().collect::<Vec<_>>(),
            basic_auth = request.basic_auth().is_some(),
            body_len = request.body().map_or(0, |body| body.len()),
            "sending request"
        ),
    }
}

fn log_outcome(outcome: &Result<Response, TransportError>, elapsed: Duration) {
    let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
    match outcome {
        Ok(response) => {
            let status = response.status();
            match response.status_class() {
                StatusClass::Success => info!(status, elapsed_ms, "response received"),
                StatusClass::Redirection | StatusClass::BadRequest => {
                    warn!(status, elapsed_ms, "response received with client-side status");
                }
                StatusClass::ServerError => warn!(status, elapsed_ms, "server failed"),
                StatusClass::Unexpected => error!(status, elapsed_ms, "invalid status"),
            }
        }
        Err(err) => warn!(error = %err, elapsed_ms, "no response"),
    }
}
