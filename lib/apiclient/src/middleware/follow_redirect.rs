//! Follow redirect middleware.
//!
//! Follows 301, 302, 303, 307 and 308 responses carrying a usable `Location`
//! header. A redirect that cannot be followed (limit reached, no or invalid
//! `Location`, or a 300/304) is returned as is, so the caller sees the 3xx
//! response.

use std::task::{Context, Poll};

use apiclient_core::{Method, Request, Response, TransportError};
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use tower::{Layer, Service};
use tracing::debug;
use url::Url;

use crate::ServiceFuture;

/// Default maximum number of redirects to follow.
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// Layer that follows HTTP redirects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowRedirectLayer {
    max_redirects: usize,
}

impl Default for FollowRedirectLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl FollowRedirectLayer {
    /// Follow at most [`DEFAULT_MAX_REDIRECTS`] redirects.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }

    /// Follow at most `max_redirects` redirects.
    #[must_use]
    pub const fn with_max_redirects(max_redirects: usize) -> Self {
        Self { max_redirects }
    }

    /// Configured limit.
    #[must_use]
    pub const fn max_redirects(&self) -> usize {
        self.max_redirects
    }
}

impl<S> Layer<S> for FollowRedirectLayer {
    type Service = FollowRedirect<S>;

    fn layer(&self, inner: S) -> Self::Service {
        FollowRedirect {
            inner,
            max_redirects: self.max_redirects,
        }
    }
}

/// Service that follows HTTP redirects.
#[derive(Debug, Clone)]
pub struct FollowRedirect<S> {
    inner: S,
    max_redirects: usize,
}

impl<S> FollowRedirect<S> {
    /// Wrap `inner`, following at most [`DEFAULT_MAX_REDIRECTS`] redirects.
    #[must_use]
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }
}

fn is_redirect(status: u16) -> bool {
    matches!(status, 301 | 302 | 303 | 307 | 308)
}

/// 307 and 308 keep the method, the others switch to GET.
fn redirect_method(status: u16, original: Method) -> Method {
    match status {
        307 | 308 => original,
        _ if original == Method::Head => Method::Head,
        _ => Method::Get,
    }
}

fn resolve_redirect_url(base_url: &Url, location: &str) -> Option<Url> {
    Url::parse(location)
        .or_else(|_| base_url.join(location))
        .ok()
}

fn same_origin(a: &Url, b: &Url) -> bool {
    a.origin() == b.origin()
}

/// Rewrite `request` to follow a redirect to `url`.
fn redirect_request(request: &mut Request, status: u16, url: Url) {
    let method = redirect_method(status, request.method());
    if method != request.method() {
        request.take_body();
        request
            .headers_mut()
            .retain(|name, _| !name.eq_ignore_ascii_case(CONTENT_TYPE.as_str()));
    }

    // Credentials stay with the origin they were meant for.
    if !same_origin(request.url(), &url) {
        request
            .headers_mut()
            .retain(|name, _| !name.eq_ignore_ascii_case(AUTHORIZATION.as_str()));
        request.take_basic_auth();
    }

    request.set_method(method);
    request.set_url(url);
}

impl<S> Service<Request> for FollowRedirect<S>
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
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let max_redirects = self.max_redirects;

        Box::pin(async move {
            let mut current = request;
            let mut redirects = 0;

            loop {
                let response = inner.call(current.clone()).await?;
                let status = response.status();

                if !is_redirect(status) || redirects >= max_redirects {
                    return Ok(response);
                }

                let Some(next_url) = response
                    .header("location")
                    .and_then(|location| resolve_redirect_url(current.url(), location))
                else {
                    return Ok(response);
                };

                debug!(status, from = %current.url(), to = %next_url, "following redirect");
                redirect_request(&mut current, status, next_url);
                redirects += 1;
            }
        })
    }
}
