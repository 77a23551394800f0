//! HTTP request descriptor.
//!
//! A [`Request`] is built fresh for every call and owned by that call only.
//! Authentication methods and request formatters mutate it before it is
//! handed to the [`Transport`](crate::Transport).
//!
//! # Example
//!
//! ```
//! use apiclient_core::{Method, Request};
//!
//! let url = "https://api.example.com/todos?age=27".parse().expect("url");
//! let request = Request::builder(Method::Get, url)
//!     .header("Accept", "application/json")
//!     .query("page", "1")
//!     .build();
//!
//! assert_eq!(request.query_param("age"), Some("27"));
//! assert_eq!(request.full_url().as_str(), "https://api.example.com/todos?age=27&page=1");
//! ```

use std::collections::HashMap;

use bytes::Bytes;
use url::Url;

use crate::Method;

/// Username/password pair placed in the request's basic-auth slot.
///
/// The transport renders it as an `Authorization: Basic ...` header.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Create a new credential pair.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Password.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Ordered query parameters, where a name may repeat.
///
/// Pairs keep the order they were added in, so `?tag=a&tag=b` is sent back
/// unchanged. [`set`](Self::set) and [`replace_with`](Self::replace_with)
/// overwrite the names they mention and leave every other pair alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// No parameters.
    #[must_use]
    pub const fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Number of pairs, counting repeated names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// `true` when there are no pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// First value of `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_all(name).next()
    }

    /// Every value of `name`, in order.
    pub fn get_all<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a str> {
        self.pairs
            .iter()
            .filter(move |(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// `true` if `name` has at least one value.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.pairs.iter().any(|(key, _)| key == name)
    }

    /// Distinct names, in order of first appearance.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        let mut seen = Vec::new();
        self.pairs.iter().filter_map(move |(key, _)| {
            if seen.contains(&key) {
                None
            } else {
                seen.push(key);
                Some(key.as_str())
            }
        })
    }

    /// All pairs, in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Add a pair, keeping existing values of `name`.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((name.into(), value.into()));
    }

    /// Make `value` the only value of `name`.
    ///
    /// The pair takes the place of the first existing one, or goes last.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        let mut found = false;
        self.pairs.retain_mut(|(key, current)| {
            if *key != name {
                return true;
            }
            if found {
                return false;
            }
            found = true;
            current.clone_from(&value);
            true
        });
        if !found {
            self.pairs.push((name, value));
        }
    }

    /// Add `name=value` only if `name` has no value yet.
    pub fn set_default(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        if !self.contains(&name) {
            self.pairs.push((name, value.into()));
        }
    }

    /// Drop every value of `name`.
    pub fn remove(&mut self, name: &str) {
        self.pairs.retain(|(key, _)| key != name);
    }

    /// Drop the names mentioned by `pairs`, then append all of `pairs`.
    ///
    /// Names repeated inside `pairs` keep all their values.
    pub fn replace_with<K, V>(&mut self, pairs: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        let pairs: Vec<(String, String)> = pairs
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .collect();
        self.pairs
            .retain(|(key, _)| !pairs.iter().any(|(name, _)| name == key));
        self.pairs.extend(pairs);
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

/// An HTTP request with method, URL, headers, query parameters and optional body.
///
/// The URL is stored without its query string; query pairs live in
/// [`Request::query_params`] so they can be merged, and are appended back by
/// [`Request::full_url`].
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    url: Url,
    headers: HashMap<String, String>,
    query_params: QueryParams,
    basic_auth: Option<Credentials>,
    body: Option<Bytes>,
}

impl Request {
    /// Creates a new request with empty headers and no body.
    ///
    /// Query pairs already present in `url` are lifted into the query parameters.
    #[must_use]
    pub fn new(method: Method, mut url: Url) -> Self {
        let query_params = url.query_pairs().into_owned().collect();
        url.set_query(None);

        Self {
            method,
            url,
            headers: HashMap::new(),
            query_params,
            basic_auth: None,
            body: None,
        }
    }

    /// Creates a new [`RequestBuilder`].
    #[must_use]
    pub fn builder(method: Method, url: Url) -> RequestBuilder {
        RequestBuilder::new(method, url)
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Change the HTTP method.
    pub fn set_method(&mut self, method: Method) {
        self.method = method;
    }

    /// Request URL without the query string.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Point the request at another URL.
    ///
    /// The query parameters are replaced by the query pairs of `url`.
    pub fn set_url(&mut self, mut url: Url) {
        self.query_params = url.query_pairs().into_owned().collect();
        url.set_query(None);
        self.url = url;
    }

    /// Request URL with the query parameters appended.
    #[must_use]
    pub fn full_url(&self) -> Url {
        let mut url = self.url.clone();
        if !self.query_params.is_empty() {
            url.query_pairs_mut().extend_pairs(self.query_params.iter());
        }
        url
    }

    /// Request headers.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Mutable access to headers.
    #[must_use]
    pub fn headers_mut(&mut self) -> &mut HashMap<String, String> {
        &mut self.headers
    }

    /// Single header value by name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Query parameters.
    #[must_use]
    pub const fn query_params(&self) -> &QueryParams {
        &self.query_params
    }

    /// Mutable access to query parameters.
    #[must_use]
    pub fn query_params_mut(&mut self) -> &mut QueryParams {
        &mut self.query_params
    }

    /// First value of a query parameter.
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query_params.get(name)
    }

    /// Basic-auth credential slot.
    #[must_use]
    pub const fn basic_auth(&self) -> Option<&Credentials> {
        self.basic_auth.as_ref()
    }

    /// Fill the basic-auth credential slot, replacing any previous credentials.
    pub fn set_basic_auth(&mut self, credentials: Credentials) {
        self.basic_auth = Some(credentials);
    }

    /// Empty the basic-auth credential slot, returning its credentials.
    pub fn take_basic_auth(&mut self) -> Option<Credentials> {
        self.basic_auth.take()
    }

    /// Request body.
    #[must_use]
    pub const fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Set the request body.
    pub fn set_body(&mut self, body: Bytes) {
        self.body = Some(body);
    }

    /// Take the body out of the request, leaving `None`.
    pub fn take_body(&mut self) -> Option<Bytes> {
        self.body.take()
    }
}

/// Builder for constructing [`Request`] instances.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    request: Request,
}

impl RequestBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            request: Request::new(method, url),
        }
    }

    /// Sets a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.headers.insert(name.into(), value.into());
        self
    }

    /// Sets multiple headers.
    #[must_use]
    pub fn headers(mut self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        self.request.headers.extend(headers);
        self
    }

    /// Sets a query parameter, replacing any previous value for `name`.
    #[must_use]
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.query_params.set(name, value);
        self
    }

    /// Sets multiple query parameters, replacing previous values of the
    /// names they mention.
    #[must_use]
    pub fn query_pairs(mut self, pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        self.request.query_params.replace_with(pairs);
        self
    }

    /// Fills the basic-auth credential slot.
    #[must_use]
    pub fn basic_auth(mut self, credentials: Credentials) -> Self {
        self.request.basic_auth = Some(credentials);
        self
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: Bytes) -> Self {
        self.request.body = Some(body);
        self
    }

    /// Builds the [`Request`].
    #[must_use]
    pub fn build(self) -> Request {
        self.request
    }
}
