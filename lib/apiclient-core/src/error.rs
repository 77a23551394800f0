//! Error types for apiclient.
//!
//! - [`ClientError`]: the closed taxonomy every verb method fails with
//! - [`TransportError`]: failures raised by a [`Transport`](crate::Transport)
//! - [`ConfigError`]: invalid configuration rejected at construction

use bytes::Bytes;
use derive_more::{Display, Error, From};

use crate::status::reason_phrase;

/// Boxed error used to carry the original cause of a [`ClientError`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias using [`ClientError`].
pub type Result<T> = std::result::Result<T, ClientError>;

// ============================================================================
// Transport Error
// ============================================================================

/// Failure reported by a transport before a complete response was received.
#[derive(Debug, Display, Error)]
pub enum TransportError {
    /// Network/connection errors (DNS, refused, reset).
    #[display("connection error: {_0}")]
    Connection(#[error(not(source))] String),

    /// TLS/SSL errors.
    #[display("TLS error: {_0}")]
    Tls(#[error(not(source))] String),

    /// Request timeout.
    #[display("request timeout")]
    Timeout,

    /// The request could not be turned into a wire request.
    #[display("invalid request: {_0}")]
    InvalidRequest(#[error(not(source))] String),
}

impl TransportError {
    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a TLS error.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Returns `true` if the server could not be reached or did not answer in time.
    #[must_use]
    pub const fn is_unreachable(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Tls(_) | Self::Timeout)
    }
}

// ============================================================================
// Configuration Error
// ============================================================================

/// Invalid configuration, rejected when a client or strategy is constructed.
#[derive(Debug, Display, Error, From)]
pub enum ConfigError {
    /// A required credential field is empty.
    #[display("{_0} must not be empty")]
    #[from(skip)]
    EmptyCredential(#[error(not(source))] &'static str),

    /// A header name or value the strategy would send is not valid HTTP.
    #[display("{_0} is not a valid HTTP header")]
    #[from(skip)]
    InvalidHeader(#[error(not(source))] &'static str),

    /// No base URL was configured.
    #[display("missing base URL")]
    #[from(skip)]
    MissingBaseUrl,

    /// The base URL could not be parsed.
    #[display("invalid base URL: {_0}")]
    InvalidBaseUrl(url::ParseError),
}

// ============================================================================
// Client Error
// ============================================================================

/// The error taxonomy returned by every call.
///
/// The set of kinds is closed: callers can match exhaustively, or handle the
/// error uniformly when they are not interested in the specific kind.
///
/// # Example
///
/// ```ignore
/// match client.read(&url, &[]).await {
///     Ok(todo) => println!("{todo}"),
///     Err(ClientError::BadRequest { status: 404, .. }) => println!("no such todo"),
///     Err(err) if err.is_server_error() => retry_later(),
///     Err(err) => return Err(err.into()),
/// }
/// ```
#[derive(Debug, Display)]
pub enum ClientError {
    /// The server answered with a 4xx status.
    #[display("{status} Error: {reason} for url: {url}")]
    BadRequest {
        /// HTTP status code.
        status: u16,
        /// Canonical reason phrase.
        reason: String,
        /// Requested URL.
        url: String,
        /// Response body, if non-empty.
        body: Option<Bytes>,
    },

    /// The server answered with a 3xx status the transport did not resolve.
    #[display("{status} Error: {reason} for url: {url}")]
    Redirection {
        /// HTTP status code.
        status: u16,
        /// Canonical reason phrase.
        reason: String,
        /// Requested URL.
        url: String,
    },

    /// The server answered with a 5xx status, or could not be reached.
    #[display("{message}")]
    ServerError {
        /// HTTP status code, absent for transport-level failures.
        status: Option<u16>,
        /// Error message.
        message: String,
        /// Underlying transport failure.
        source: Option<BoxError>,
    },

    /// Any other failure: handler or formatter errors, out-of-range status,
    /// invalid URL.
    #[display("{message}")]
    Unexpected {
        /// HTTP status code, if a response was received.
        status: Option<u16>,
        /// Error message.
        message: String,
        /// Underlying cause.
        source: Option<BoxError>,
    },
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ServerError { source, .. } | Self::Unexpected { source, .. } => source
                .as_deref()
                .map(|err| err as &(dyn std::error::Error + 'static)),
            Self::BadRequest { .. } | Self::Redirection { .. } => None,
        }
    }
}

/// Formats the `"{status} Error: {reason} for url: {url}"` message.
fn status_message(status: u16, url: &str) -> String {
    format!("{status} Error: {} for url: {url}", reason_phrase(status))
}

impl ClientError {
    /// Create a bad request error; an empty body is dropped.
    #[must_use]
    pub fn bad_request(status: u16, url: impl Into<String>, body: Bytes) -> Self {
        Self::BadRequest {
            status,
            reason: reason_phrase(status).to_string(),
            url: url.into(),
            body: (!body.is_empty()).then_some(body),
        }
    }

    /// Create a redirection error.
    #[must_use]
    pub fn redirection(status: u16, url: impl Into<String>) -> Self {
        Self::Redirection {
            status,
            reason: reason_phrase(status).to_string(),
            url: url.into(),
        }
    }

    /// Create a server error for a 5xx status.
    #[must_use]
    pub fn server_error(status: u16, url: &str) -> Self {
        Self::ServerError {
            status: Some(status),
            message: status_message(status, url),
            source: None,
        }
    }

    /// Create a server error for a server that could not be reached.
    #[must_use]
    pub fn unreachable(url: &str, cause: impl Into<BoxError>) -> Self {
        Self::ServerError {
            status: None,
            message: format!("Error when contacting '{url}'"),
            source: Some(cause.into()),
        }
    }

    /// Create an unexpected error for a status outside `100..600`.
    #[must_use]
    pub fn unexpected_status(status: u16, url: &str) -> Self {
        Self::Unexpected {
            status: Some(status),
            message: status_message(status, url),
            source: None,
        }
    }

    /// Create an unexpected error wrapping a cause.
    #[must_use]
    pub fn unexpected(message: impl Into<String>, cause: impl Into<BoxError>) -> Self {
        Self::Unexpected {
            status: None,
            message: message.into(),
            source: Some(cause.into()),
        }
    }

    /// Attach the status of the response that triggered an unexpected error.
    #[must_use]
    pub fn with_status(mut self, code: u16) -> Self {
        if let Self::Unexpected { status, .. } | Self::ServerError { status, .. } = &mut self {
            *status = Some(code);
        }
        self
    }

    /// Returns the HTTP status code, if a response was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::BadRequest { status, .. } | Self::Redirection { status, .. } => Some(*status),
            Self::ServerError { status, .. } | Self::Unexpected { status, .. } => *status,
        }
    }

    /// Returns `true` for [`ClientError::BadRequest`].
    #[must_use]
    pub const fn is_bad_request(&self) -> bool {
        matches!(self, Self::BadRequest { .. })
    }

    /// Returns `true` for [`ClientError::Redirection`].
    #[must_use]
    pub const fn is_redirection(&self) -> bool {
        matches!(self, Self::Redirection { .. })
    }

    /// Returns `true` for [`ClientError::ServerError`].
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(self, Self::ServerError { .. })
    }

    /// Returns `true` for [`ClientError::Unexpected`].
    #[must_use]
    pub const fn is_unexpected(&self) -> bool {
        matches!(self, Self::Unexpected { .. })
    }

    /// Returns `true` if this is a 404 Not Found error.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::BadRequest { status: 404, .. })
    }

    /// Returns the response body of a bad request, if any.
    #[must_use]
    pub fn body(&self) -> Option<&Bytes> {
        match self {
            Self::BadRequest { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    /// Try to decode the bad request body as JSON.
    ///
    /// Returns `None` if there is no body or this is not a bad request.
    ///
    /// # Example
    ///
    /// ```ignore
    /// #[derive(Debug, Deserialize)]
    /// struct ApiError {
    ///     message: String,
    /// }
    ///
    /// if let Err(err) = client.create(&url, &todo, &[]).await {
    ///     if let Some(Ok(api_error)) = err.decode_body::<ApiError>() {
    ///         println!("rejected: {}", api_error.message);
    ///     }
    /// }
    /// ```
    pub fn decode_body<T: serde::de::DeserializeOwned>(
        &self,
    ) -> Option<std::result::Result<T, crate::BodyError>> {
        self.body().map(|body| crate::from_json(body))
    }
}
