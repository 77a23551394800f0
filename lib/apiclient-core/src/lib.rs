//! Core types and strategies for apiclient.
//!
//! This crate provides the transport-agnostic half of apiclient:
//! - [`Method`], [`Request`] and [`Response`] - HTTP message types
//! - [`AuthenticationMethod`] - how a request is authenticated
//! - [`RequestFormatter`] - how outgoing data is encoded
//! - [`ResponseHandler`] - how a response becomes the caller's value
//! - [`ClientError`] - the closed error taxonomy, keyed by [`StatusClass`]
//! - [`Transport`] - the capability that executes requests
//! - [`TransportError`] and [`ConfigError`] - transport and construction failures

mod auth;
mod body;
mod error;
mod formatter;
mod handler;
mod method;
pub mod prelude;
mod request;
mod response;
mod status;
mod transport;

pub use auth::{
    AuthenticationMethod, BasicAuthentication, HeaderAuthentication, NoAuthentication,
    QueryParameterAuthentication,
};
pub use body::{BodyError, ContentType, from_json, to_form, to_json, to_text};
pub use error::{BoxError, ClientError, ConfigError, Result, TransportError};
pub use formatter::{FormRequestFormatter, FormattedBody, JsonRequestFormatter, RequestFormatter};
pub use handler::{JsonResponseHandler, RawResponseHandler, ResponseHandler, TextResponseHandler};
pub use method::Method;
pub use request::{Credentials, QueryParams, Request, RequestBuilder};
pub use response::Response;
pub use status::{StatusClass, reason_phrase};
pub use transport::Transport;

// Re-export http crate types for status codes and headers
pub use http::{StatusCode, header};
