//! HTTP method types.

use derive_more::Display;

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Method {
    /// GET method, used by `read`.
    #[display("GET")]
    Get,
    /// POST method, used by `create`.
    #[display("POST")]
    Post,
    /// PUT method, used by `replace`.
    #[display("PUT")]
    Put,
    /// PATCH method, used by `update`.
    #[display("PATCH")]
    Patch,
    /// DELETE method, used by `delete`.
    #[display("DELETE")]
    Delete,
    /// HEAD method.
    #[display("HEAD")]
    Head,
    /// OPTIONS method.
    #[display("OPTIONS")]
    Options,
}

impl From<Method> for http::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => Self::GET,
            Method::Post => Self::POST,
            Method::Put => Self::PUT,
            Method::Patch => Self::PATCH,
            Method::Delete => Self::DELETE,
            Method::Head => Self::HEAD,
            Method::Options => Self::OPTIONS,
        }
    }
}
