//! Prelude module for convenient imports.
//!
//! ```
//! use apiclient::prelude::*;
//! ```

pub use crate::{
    AuthenticationMethod, BaseClient, BasicAuthentication, ClientError, FormRequestFormatter,
    HeaderAuthentication, HyperTransport, JsonRequestFormatter, JsonResponseHandler, Method,
    NoAuthentication, QueryParameterAuthentication, RawResponseHandler, RequestFormatter,
    Response, ResponseHandler, TextResponseHandler, Transport,
};
pub use serde::{Deserialize, Serialize};
