//! Tower middleware for [`HyperTransport`](crate::HyperTransport).
//!
//! Layers wrap the transport's [`BoxedService`](crate::BoxedService) and are
//! added with [`HyperTransportBuilder::layer`](crate::HyperTransportBuilder::layer).
//! Any tower layer whose service speaks [`Request`](crate::Request) and
//! [`Response`](crate::Response) with [`TransportError`](crate::TransportError)
//! composes, so retry, rate limiting or concurrency limits can be added from
//! outside this crate.
//!
//! - [`LoggingLayer`] - logs requests and responses using `tracing`
//! - [`FollowRedirectLayer`] - follows 301/302/303/307/308 redirects

mod follow_redirect;
mod logging;

pub use follow_redirect::{DEFAULT_MAX_REDIRECTS, FollowRedirect, FollowRedirectLayer};
pub use logging::{LogLevel, Logging, LoggingLayer};

pub use tower::{Layer, ServiceBuilder};
