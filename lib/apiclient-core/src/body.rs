//! Body serialization utilities shared by the formatters and handlers.

use bytes::Bytes;
use derive_more::{Display, Error, From};

/// Failure while encoding or decoding a message body.
#[derive(Debug, Display, Error, From)]
pub enum BodyError {
    /// JSON serialization error.
    #[display("JSON serialization error: {_0}")]
    JsonSerialization(serde_json::Error),

    /// JSON deserialization error with path context.
    #[display("JSON deserialization error at '{path}': {message}")]
    #[from(skip)]
    JsonDeserialization {
        /// JSON path to the error (e.g., "user.address.city").
        path: String,
        /// Error message.
        message: String,
    },

    /// Form URL-encoded serialization error.
    #[display("form serialization error: {_0}")]
    FormSerialization(serde_html_form::ser::Error),

    /// Body is not valid UTF-8.
    #[display("invalid UTF-8 body: {_0}")]
    Utf8(std::string::FromUtf8Error),
}

/// Content type for request bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// JSON content type (`application/json`).
    Json,
    /// Form URL-encoded content type (`application/x-www-form-urlencoded`).
    FormUrlEncoded,
    /// Plain text content type (`text/plain`).
    PlainText,
}

impl ContentType {
    /// Get the MIME type string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::FormUrlEncoded => "application/x-www-form-urlencoded",
            Self::PlainText => "text/plain",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Serialize a value to JSON bytes.
///
/// # Example
///
/// ```
/// use apiclient_core::to_json;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Todo { title: String }
///
/// let todo = Todo { title: "write docs".to_string() };
/// let bytes = to_json(&todo).expect("serialize");
/// assert_eq!(bytes.as_ref(), br#"{"title":"write docs"}"#);
/// ```
pub fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<Bytes, BodyError> {
    serde_json::to_vec(value)
        .map(Bytes::from)
        .map_err(Into::into)
}

/// Serialize a value to form URL-encoded bytes.
///
/// Sequences become repeated fields (e.g., `tags=a&tags=b`).
pub fn to_form<T: serde::Serialize + ?Sized>(value: &T) -> Result<Bytes, BodyError> {
    serde_html_form::to_string(value)
        .map(|s| Bytes::from(s.into_bytes()))
        .map_err(Into::into)
}

/// Deserialize JSON bytes to a value with path-aware error messages.
///
/// An empty (or whitespace-only) body is decoded as JSON `null`, so it maps
/// to `serde_json::Value::Null` or `Option::None`.
///
/// # Example
///
/// ```
/// use apiclient_core::from_json;
///
/// let value: serde_json::Value = from_json(br#"{"id":45}"#).expect("deserialize");
/// assert_eq!(value["id"], 45);
///
/// let empty: Option<u32> = from_json(b"").expect("deserialize");
/// assert_eq!(empty, None);
/// ```
pub fn from_json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T, BodyError> {
    let bytes = if bytes.trim_ascii().is_empty() {
        b"null".as_slice()
    } else {
        bytes
    };

    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    let value = serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        BodyError::JsonDeserialization {
            path: e.path().to_string(),
            message: e.inner().to_string(),
        }
    })?;

    // Only whitespace may follow the value.
    deserializer
        .end()
        .map_err(|e| BodyError::JsonDeserialization {
            path: ".".to_string(),
            message: e.to_string(),
        })?;

    Ok(value)
}

/// Decode a body as UTF-8 text.
pub fn to_text(bytes: &[u8]) -> Result<String, BodyError> {
    String::from_utf8(bytes.to_vec()).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_as_str() {
        assert_eq!(ContentType::Json.as_str(), "application/json");
        assert_eq!(
            ContentType::FormUrlEncoded.as_str(),
            "application/x-www-form-urlencoded"
        );
        assert_eq!(ContentType::PlainText.to_string(), "text/plain");
    }

    #[test]
    fn to_json_serialize() {
        #[derive(serde::Serialize)]
        struct Todo {
            title: String,
            completed: bool,
        }

        let todo = Todo {
            title: "x".to_string(),
            completed: false,
        };

        let bytes = to_json(&todo).expect("serialize");
        assert_eq!(bytes.as_ref(), br#"{"title":"x","completed":false}"#);
    }

    #[test]
    fn to_json_rejects_non_string_map_keys() {
        let mut map = std::collections::HashMap::new();
        map.insert(vec![1_u8], "value");

        let err = to_json(&map).expect_err("vec keys are not valid JSON object keys");
        assert!(matches!(err, BodyError::JsonSerialization(_)));
    }

    #[test]
    fn to_form_with_vec() {
        #[derive(serde::Serialize)]
        struct Filter {
            name: String,
            tags: Vec<String>,
        }

        let filter = Filter {
            name: "test".to_string(),
            tags: vec!["rust".to_string(), "http".to_string()],
        };

        let bytes = to_form(&filter).expect("serialize");
        let result = String::from_utf8(bytes.to_vec()).expect("utf8");
        assert!(result.contains("name=test"));
        assert!(result.contains("tags=rust"));
        assert!(result.contains("tags=http"));
    }

    #[test]
    fn from_json_empty_body_is_null() {
        let value: serde_json::Value = from_json(b"").expect("deserialize");
        assert!(value.is_null());

        let value: serde_json::Value = from_json(b"  \n").expect("deserialize");
        assert!(value.is_null());
    }

    #[test]
    fn from_json_syntax_error() {
        let err = from_json::<serde_json::Value>(b"not json").expect_err("should fail");
        assert!(err.to_string().contains("JSON deserialization error"));
    }

    #[test]
    fn from_json_rejects_a_second_value() {
        let err = from_json::<serde_json::Value>(br#"{"id":1} {"id":2}"#).expect_err("should fail");
        assert!(err.to_string().contains("trailing characters"));
    }

    #[test]
    fn from_json_missing_field_error_with_path() {
        #[derive(Debug, serde::Deserialize)]
        struct Owner {
            #[allow(dead_code)]
            login: String,
        }

        #[derive(Debug, serde::Deserialize)]
        struct Repo {
            #[allow(dead_code)]
            owner: Owner,
        }

        let err = from_json::<Repo>(br#"{"owner":{}}"#).expect_err("should fail");
        let msg = err.to_string();
        assert!(msg.contains("owner"), "Expected path 'owner' in error: {msg}");
        assert!(msg.contains("login"), "Expected field 'login' in error: {msg}");
    }

    #[test]
    fn to_text_rejects_invalid_utf8() {
        assert_eq!(to_text(b"hello").expect("utf8"), "hello");
        assert!(matches!(to_text(&[0xff, 0xfe]), Err(BodyError::Utf8(_))));
    }
}
