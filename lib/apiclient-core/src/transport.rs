//! Transport trait.
//!
//! The transport executes a fully prepared [`Request`] and returns the raw
//! [`Response`]. It owns connection handling, TLS, timeouts and redirect
//! following; it never interprets status codes.

use std::future::Future;
use std::sync::Arc;

use crate::{Request, Response, TransportError};

/// Executes HTTP requests.
pub trait Transport: Send + Sync {
    /// Execute a request and return the response.
    ///
    /// Any status code is a successful execution; only failures to obtain a
    /// response (connection, TLS, timeout, malformed request) are errors.
    fn execute(
        &self,
        request: Request,
    ) -> impl Future<Output = Result<Response, TransportError>> + Send;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn execute(
        &self,
        request: Request,
    ) -> impl Future<Output = Result<Response, TransportError>> + Send {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(
        &self,
        request: Request,
    ) -> impl Future<Output = Result<Response, TransportError>> + Send {
        (**self).execute(request)
    }
}
