//! Response handlers.
//!
//! A [`ResponseHandler`] converts a successful [`Response`] into the value a
//! verb method returns. Handlers only fail on their own parsing problems;
//! the client reports those as [`ClientError::Unexpected`](crate::ClientError::Unexpected).

use std::convert::Infallible;
use std::marker::PhantomData;

use crate::{BodyError, Response, from_json, to_text};

/// Strategy that turns a completed response into the caller-facing value.
pub trait ResponseHandler: Send + Sync {
    /// The value produced for the caller.
    type Output;
    /// The parse failure.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Produce the caller-facing value from `response`.
    fn handle(&self, response: Response) -> Result<Self::Output, Self::Error>;
}

/// Returns the response unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawResponseHandler;

impl ResponseHandler for RawResponseHandler {
    type Output = Response;
    type Error = Infallible;

    fn handle(&self, response: Response) -> Result<Self::Output, Self::Error> {
        Ok(response)
    }
}

/// Parses the body as JSON into `T` (a [`serde_json::Value`] by default).
///
/// An empty body is read as JSON `null`.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
///
/// use apiclient_core::{JsonResponseHandler, Response, ResponseHandler};
///
/// #[derive(serde::Deserialize)]
/// struct Todo { id: u64 }
///
/// let response = Response::new(200, HashMap::new(), r#"{"id":45}"#.into());
/// let todo = JsonResponseHandler::<Todo>::new().handle(response).expect("json");
/// assert_eq!(todo.id, 45);
/// ```
pub struct JsonResponseHandler<T = serde_json::Value> {
    _output: PhantomData<fn() -> T>,
}

impl<T> JsonResponseHandler<T> {
    /// Create a JSON handler.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _output: PhantomData,
        }
    }
}

impl<T> Default for JsonResponseHandler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for JsonResponseHandler<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for JsonResponseHandler<T> {}

impl<T> std::fmt::Debug for JsonResponseHandler<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonResponseHandler")
            .field("output", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T> ResponseHandler for JsonResponseHandler<T>
where
    T: serde::de::DeserializeOwned,
{
    type Output = T;
    type Error = BodyError;

    fn handle(&self, response: Response) -> Result<Self::Output, Self::Error> {
        from_json(response.body())
    }
}

/// Returns the body as UTF-8 text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextResponseHandler;

impl ResponseHandler for TextResponseHandler {
    type Output = String;
    type Error = BodyError;

    fn handle(&self, response: Response) -> Result<Self::Output, Self::Error> {
        to_text(response.body())
    }
}
