//! Status code classification.

/// Outcome category of a numeric HTTP status code.
///
/// This is the single place where a status is mapped onto the error
/// taxonomy; see [`ClientError`](crate::ClientError).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusClass {
    /// `100..300`: handed to the response handler.
    Success,
    /// `300..400`: a redirect the transport did not resolve.
    Redirection,
    /// `400..500`.
    BadRequest,
    /// `500..600`.
    ServerError,
    /// Anything else (protocol violation).
    Unexpected,
}

impl StatusClass {
    /// Classify a status code.
    #[must_use]
    pub const fn from_status(status: u16) -> Self {
        match status {
            100..300 => Self::Success,
            300..400 => Self::Redirection,
            400..500 => Self::BadRequest,
            500..600 => Self::ServerError,
            _ => Self::Unexpected,
        }
    }
}

/// Canonical reason phrase for a status code, or `"Unknown Status"`.
#[must_use]
pub fn reason_phrase(status: u16) -> &'static str {
    http::StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .unwrap_or("Unknown Status")
}
