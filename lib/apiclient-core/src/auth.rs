//! Authentication strategies.
//!
//! An [`AuthenticationMethod`] embeds credentials into an outgoing
//! [`Request`]. Implementations are immutable configuration: one instance can
//! be shared by any number of calls and clients.
//!
//! - [`NoAuthentication`]: leaves the request untouched
//! - [`QueryParameterAuthentication`]: `?apikey=<token>`
//! - [`HeaderAuthentication`]: `Authorization: Bearer <token>` (configurable)
//! - [`BasicAuthentication`]: fills the request's basic-auth slot

use http::{HeaderName, HeaderValue};

use crate::{ConfigError, Credentials, Request};

/// Strategy that embeds credentials into a request.
///
/// `apply` never fails; invalid configuration is rejected by the constructors.
pub trait AuthenticationMethod: Send + Sync {
    /// Return the request with credentials embedded.
    fn apply(&self, request: Request) -> Request;
}

/// Does not authenticate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoAuthentication;

impl AuthenticationMethod for NoAuthentication {
    fn apply(&self, request: Request) -> Request {
        request
    }
}

/// Adds the token as a query parameter.
///
/// Existing query parameters are kept; a parameter with the same name is replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParameterAuthentication {
    parameter: String,
    token: String,
}

impl QueryParameterAuthentication {
    /// Create a query parameter authentication.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyCredential`] if `parameter` or `token` is empty.
    pub fn new(
        parameter: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let parameter = non_empty("parameter", parameter.into())?;
        let token = non_empty("token", token.into())?;
        Ok(Self { parameter, token })
    }
}

impl AuthenticationMethod for QueryParameterAuthentication {
    fn apply(&self, mut request: Request) -> Request {
        request
            .query_params_mut()
            .set(self.parameter.as_str(), self.token.as_str());
        request
    }
}

/// Sets a header carrying the token, `Authorization: Bearer <token>` by default.
///
/// # Example
///
/// ```
/// use apiclient_core::{AuthenticationMethod, HeaderAuthentication, Method, Request};
///
/// let auth = HeaderAuthentication::new("secret")
///     .expect("token")
///     .with_parameter("X-Api-Key")
///     .expect("header name")
///     .without_realm();
///
/// let request = Request::new(Method::Get, "https://api.example.com".parse().expect("url"));
/// let request = auth.apply(request);
/// assert_eq!(request.header("X-Api-Key"), Some("secret"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderAuthentication {
    token: String,
    parameter: String,
    realm: Option<String>,
}

impl HeaderAuthentication {
    /// Header used when no parameter is configured.
    pub const DEFAULT_PARAMETER: &'static str = "Authorization";
    /// Realm used when none is configured.
    pub const DEFAULT_REALM: &'static str = "Bearer";

    /// Create a header authentication with the default header and realm.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyCredential`] if `token` is empty and
    /// [`ConfigError::InvalidHeader`] if it cannot be sent in a header.
    pub fn new(token: impl Into<String>) -> Result<Self, ConfigError> {
        let token = valid_header_value("token", non_empty("token", token.into())?)?;
        Ok(Self {
            token,
            parameter: Self::DEFAULT_PARAMETER.to_string(),
            realm: Some(Self::DEFAULT_REALM.to_string()),
        })
    }

    /// Use another header name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyCredential`] if `parameter` is empty and
    /// [`ConfigError::InvalidHeader`] if it is not a valid header name.
    pub fn with_parameter(mut self, parameter: impl Into<String>) -> Result<Self, ConfigError> {
        let parameter = non_empty("parameter", parameter.into())?;
        if HeaderName::from_bytes(parameter.as_bytes()).is_err() {
            return Err(ConfigError::InvalidHeader("parameter"));
        }
        self.parameter = parameter;
        Ok(self)
    }

    /// Use another realm (e.g. `Token`).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyCredential`] if `realm` is empty and
    /// [`ConfigError::InvalidHeader`] if it cannot be sent in a header.
    pub fn with_realm(mut self, realm: impl Into<String>) -> Result<Self, ConfigError> {
        let realm = valid_header_value("realm", non_empty("realm", realm.into())?)?;
        self.realm = Some(realm);
        Ok(self)
    }

    /// Send the bare token as the header value.
    #[must_use]
    pub fn without_realm(mut self) -> Self {
        self.realm = None;
        self
    }

    fn header_value(&self) -> String {
        match &self.realm {
            Some(realm) => format!("{realm} {}", self.token),
            None => self.token.clone(),
        }
    }
}

impl AuthenticationMethod for HeaderAuthentication {
    fn apply(&self, mut request: Request) -> Request {
        let value = self.header_value();
        // Header names are case-insensitive on the wire.
        request
            .headers_mut()
            .retain(|name, _| !name.eq_ignore_ascii_case(&self.parameter));
        request
            .headers_mut()
            .insert(self.parameter.clone(), value);
        request
    }
}

/// Authenticates with a username and password through the transport's
/// basic-auth credential slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicAuthentication {
    credentials: Credentials,
}

impl BasicAuthentication {
    /// Create a basic authentication.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyCredential`] if `username` is empty.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let username = non_empty("username", username.into())?;
        Ok(Self {
            credentials: Credentials::new(username, password),
        })
    }
}

impl AuthenticationMethod for BasicAuthentication {
    fn apply(&self, mut request: Request) -> Request {
        request.set_basic_auth(self.credentials.clone());
        request
    }
}

fn valid_header_value(field: &'static str, value: String) -> Result<String, ConfigError> {
    if HeaderValue::from_str(&value).is_ok() {
        Ok(value)
    } else {
        Err(ConfigError::InvalidHeader(field))
    }
}

fn non_empty(field: &'static str, value: String) -> Result<String, ConfigError> {
    if value.is_empty() {
        Err(ConfigError::EmptyCredential(field))
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert2::{check, let_assert};

    use super::*;
    use crate::Method;

    fn request(url: &str) -> Request {
        Request::new(Method::Get, url.parse().expect("valid URL"))
    }

    #[test]
    fn no_authentication_does_not_alter_request() {
        let request = NoAuthentication.apply(request("https://api.example.com/todos?age=27"));

        check!(request.headers().is_empty());
        check!(request.query_params().len() == 1);
        check!(request.basic_auth().is_none());
    }

    #[test]
    fn query_parameter_authentication_merges_with_existing_params() {
        let auth = QueryParameterAuthentication::new("apikey", "secret_token").expect("auth");
        let request = auth.apply(request("https://api.example.com/users?age=27"));

        check!(request.query_param("age") == Some("27"));
        check!(request.query_param("apikey") == Some("secret_token"));
        check!(request.headers().is_empty());

        let query = request.full_url().query().map(str::to_string).unwrap_or_default();
        check!(query.contains("age=27"));
        check!(query.contains("apikey=secret_token"));
    }

    #[test]
    fn query_parameter_authentication_overwrites_same_parameter() {
        let auth = QueryParameterAuthentication::new("apikey", "secret").expect("auth");
        let request = auth.apply(request("https://api.example.com/users?apikey=stale"));

        check!(request.query_param("apikey") == Some("secret"));
    }

    #[test]
    fn header_authentication_with_default_values() {
        let auth = HeaderAuthentication::new("secret_value").expect("auth");
        let request = auth.apply(request("https://api.example.com"));

        let expected = HashMap::from([(
            "Authorization".to_string(),
            "Bearer secret_value".to_string(),
        )]);
        check!(request.headers() == &expected);
        check!(request.query_params().is_empty());
    }

    #[test]
    fn header_authentication_overwriting_parameter_and_realm() {
        let auth = HeaderAuthentication::new("secret_value")
            .expect("auth")
            .with_parameter("Foo")
            .expect("header name")
            .with_realm("Bar")
            .expect("realm");
        let request = auth.apply(request("https://api.example.com"));

        let expected = HashMap::from([("Foo".to_string(), "Bar secret_value".to_string())]);
        check!(request.headers() == &expected);
    }

    #[test]
    fn header_authentication_overwriting_realm() {
        let auth = HeaderAuthentication::new("secret")
            .expect("auth")
            .with_realm("Token")
            .expect("realm");
        let request = auth.apply(request("https://api.example.com"));

        check!(request.header("Authorization") == Some("Token secret"));
    }

    #[test]
    fn header_authentication_replaces_existing_header_case_insensitively() {
        let mut request = request("https://api.example.com");
        request
            .headers_mut()
            .insert("authorization".to_string(), "Bearer stale".to_string());

        let auth = HeaderAuthentication::new("fresh").expect("auth");
        let request = auth.apply(request);

        check!(request.headers().len() == 1);
        check!(request.header("Authorization") == Some("Bearer fresh"));
    }

    #[test]
    fn basic_authentication_fills_credential_slot() {
        let auth = BasicAuthentication::new("uname", "password").expect("auth");
        let request = auth.apply(request("https://api.example.com"));

        let_assert!(Some(credentials) = request.basic_auth());
        check!(credentials.username() == "uname");
        check!(credentials.password() == "password");
        check!(request.headers().is_empty());
        check!(request.query_params().is_empty());
    }

    #[test]
    fn apply_is_repeatable() {
        let auth = HeaderAuthentication::new("secret").expect("auth");
        let once = auth.apply(request("https://api.example.com"));
        let twice = auth.apply(once.clone());

        check!(once.headers() == twice.headers());
    }

    #[test]
    fn empty_credentials_are_rejected() {
        let_assert!(
            Err(ConfigError::EmptyCredential("token")) = HeaderAuthentication::new("")
        );
        let_assert!(
            Err(ConfigError::EmptyCredential("parameter")) =
                QueryParameterAuthentication::new("", "token")
        );
        let_assert!(
            Err(ConfigError::EmptyCredential("token")) =
                QueryParameterAuthentication::new("apikey", "")
        );
        let_assert!(
            Err(ConfigError::EmptyCredential("username")) = BasicAuthentication::new("", "pw")
        );
    }

    #[test]
    fn malformed_header_settings_are_rejected_at_construction() {
        let auth = HeaderAuthentication::new("secret").expect("auth");

        let_assert!(
            Err(ConfigError::EmptyCredential("parameter")) = auth.clone().with_parameter("")
        );
        let_assert!(
            Err(ConfigError::InvalidHeader("parameter")) = auth.clone().with_parameter("X Api Key")
        );
        let_assert!(Err(ConfigError::EmptyCredential("realm")) = auth.clone().with_realm(""));
        let_assert!(
            Err(ConfigError::InvalidHeader("realm")) = auth.with_realm("Bearer\r\nX-Evil: 1")
        );
        let_assert!(
            Err(ConfigError::InvalidHeader("token")) = HeaderAuthentication::new("line\nbreak")
        );
    }
}
