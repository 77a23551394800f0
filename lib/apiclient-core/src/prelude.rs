//! Prelude module for convenient imports.

pub use crate::{
    AuthenticationMethod, BasicAuthentication, ClientError, HeaderAuthentication,
    JsonRequestFormatter, JsonResponseHandler, Method, NoAuthentication,
    QueryParameterAuthentication, RawResponseHandler, Request, RequestFormatter, Response,
    ResponseHandler, Result, Transport,
};
