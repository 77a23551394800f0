//! HTTP API clients built from interchangeable strategies.
//!
//! A [`BaseClient`] is assembled from:
//! - a [`Transport`] that sends requests, usually [`HyperTransport`]
//! - an [`AuthenticationMethod`] that puts credentials on each request
//! - a [`RequestFormatter`] that encodes payloads
//! - a [`ResponseHandler`] that turns successful responses into values
//!
//! Every failure is one of the four [`ClientError`] kinds.
//!
//! # Example
//!
//! ```no_run
//! use apiclient::prelude::*;
//!
//! #[derive(Debug, Deserialize)]
//! struct Todo {
//!     id: u64,
//!     title: String,
//!     completed: bool,
//! }
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = BaseClient::builder(HyperTransport::new())
//!     .authentication(QueryParameterAuthentication::new("apikey", "secret")?)
//!     .request_formatter(JsonRequestFormatter)
//!     .response_handler(JsonResponseHandler::<Todo>::new())
//!     .base_url("https://jsonplaceholder.typicode.com")
//!     .build()?;
//!
//! match client.read(&client.endpoint("todos/45"), &[]).await {
//!     Ok(todo) => println!("{}: {}", todo.id, todo.title),
//!     Err(err) if err.is_not_found() => println!("no such todo"),
//!     Err(err) => return Err(err.into()),
//! }
//! # Ok(())
//! # }
//! ```

mod base_client;
mod config;
mod connector;
pub mod middleware;
mod pagination;
pub mod prelude;
mod transport;

pub use base_client::{BaseClient, BaseClientBuilder, Unset, classify_response};
pub use config::{TransportConfig, TransportConfigBuilder};
pub use connector::https_connector;
pub use pagination::PageParams;
pub use transport::{BoxedService, HyperTransport, HyperTransportBuilder, ServiceFuture};

// Re-export tower for middleware composition
pub use tower;

pub use apiclient_core::{
    AuthenticationMethod, BasicAuthentication, BodyError, BoxError, ClientError, ConfigError,
    ContentType, Credentials, FormRequestFormatter, FormattedBody, HeaderAuthentication,
    JsonRequestFormatter, JsonResponseHandler, Method, NoAuthentication,
    QueryParameterAuthentication, QueryParams, RawResponseHandler, Request, RequestBuilder, RequestFormatter,
    Response, ResponseHandler, Result, StatusClass, StatusCode, TextResponseHandler, Transport,
    TransportError, from_json, header, reason_phrase, to_form, to_json, to_text,
};
