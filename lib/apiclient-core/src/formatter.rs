//! Request body formatters.
//!
//! A [`RequestFormatter`] turns an in-memory payload into a wire body and the
//! headers that describe it. Formatters are pure: formatting the same payload
//! twice yields the same bytes and headers.

use std::collections::HashMap;

use bytes::Bytes;

use crate::{BodyError, ContentType, Request, to_form, to_json};

/// A serialized body and the headers to merge into the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedBody {
    /// Wire body.
    pub body: Bytes,
    /// Headers describing the body (e.g. `Content-Type`).
    pub headers: HashMap<String, String>,
}

impl FormattedBody {
    /// A body with a single `Content-Type` header.
    #[must_use]
    pub fn with_content_type(body: Bytes, content_type: ContentType) -> Self {
        Self {
            body,
            headers: HashMap::from([(
                http::header::CONTENT_TYPE.as_str().to_string(),
                content_type.as_str().to_string(),
            )]),
        }
    }

    /// Merge the headers into `request` and set its body.
    pub fn write_into(self, request: &mut Request) {
        let headers = request.headers_mut();
        for (name, value) in self.headers {
            headers.retain(|existing, _| !existing.eq_ignore_ascii_case(&name));
            headers.insert(name, value);
        }
        request.set_body(self.body);
    }
}

/// Strategy that serializes request payloads.
pub trait RequestFormatter: Send + Sync {
    /// The serialization failure.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Serialize `data` into a body and headers.
    fn format<T>(&self, data: &T) -> Result<FormattedBody, Self::Error>
    where
        T: serde::Serialize + ?Sized;
}

/// Formats payloads as JSON with `Content-Type: application/json`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonRequestFormatter;

impl RequestFormatter for JsonRequestFormatter {
    type Error = BodyError;

    fn format<T>(&self, data: &T) -> Result<FormattedBody, Self::Error>
    where
        T: serde::Serialize + ?Sized,
    {
        let body = to_json(data)?;
        Ok(FormattedBody::with_content_type(body, ContentType::Json))
    }
}

/// Formats payloads as `application/x-www-form-urlencoded`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormRequestFormatter;

impl RequestFormatter for FormRequestFormatter {
    type Error = BodyError;

    fn format<T>(&self, data: &T) -> Result<FormattedBody, Self::Error>
    where
        T: serde::Serialize + ?Sized,
    {
        let body = to_form(data)?;
        Ok(FormattedBody::with_content_type(
            body,
            ContentType::FormUrlEncoded,
        ))
    }
}
