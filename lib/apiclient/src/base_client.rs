//! The API client.
//!
//! A [`BaseClient`] combines one [`Transport`], one [`AuthenticationMethod`],
//! one [`RequestFormatter`] and one [`ResponseHandler`]. Every call goes
//! through the same steps:
//!
//! 1. build a [`Request`] from the URL, the default headers and query
//!    parameters, and the per-call parameters
//! 2. apply the authentication method
//! 3. format the payload, if any
//! 4. execute the request on the transport
//! 5. classify the status, then hand successful responses to the handler
//!
//! A call yields either the handler's output or exactly one [`ClientError`].

use std::collections::{BTreeMap, HashMap};

use apiclient_core::{
    AuthenticationMethod, BasicAuthentication, ClientError, ConfigError, Method, Request, RequestFormatter, Response,
    ResponseHandler, StatusClass, Transport, TransportError,
};
use serde::Serialize;
use tracing::{debug, error, warn};
use url::Url;

/// Client for one HTTP API.
///
/// The client holds no per-call state: a single instance can serve any number
/// of concurrent calls.
///
/// # Example
///
/// ```no_run
/// use apiclient::prelude::*;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let client = BaseClient::new(
///     HyperTransport::new(),
///     HeaderAuthentication::new("secret")?,
///     JsonResponseHandler::<serde_json::Value>::new(),
///     JsonRequestFormatter,
///     "https://jsonplaceholder.typicode.com",
/// )?;
///
/// let todo = client.read(&client.endpoint("todos/45"), &[]).await?;
/// println!("{todo}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct BaseClient<T, A, F, H> {
    transport: T,
    authentication: A,
    request_formatter: F,
    response_handler: H,
    base_url: Url,
    default_headers: HashMap<String, String>,
    default_query_params: BTreeMap<String, String>,
    default_basic_auth: Option<BasicAuthentication>,
}

impl<T> BaseClient<T, Unset, Unset, Unset> {
    /// Start building a client on top of `transport`.
    ///
    /// `build` only becomes available once every strategy has been set:
    ///
    /// ```compile_fail
    /// use apiclient::prelude::*;
    ///
    /// let client = BaseClient::builder(HyperTransport::new())
    ///     .authentication(NoAuthentication)
    ///     .response_handler(RawResponseHandler)
    ///     .base_url("https://api.example.com")
    ///     .build();
    /// ```
    #[must_use]
    pub fn builder(transport: T) -> BaseClientBuilder<T> {
        BaseClientBuilder::new(transport)
    }
}

impl<T, A, F, H> BaseClient<T, A, F, H>
where
    T: Transport,
    A: AuthenticationMethod,
    F: RequestFormatter,
    H: ResponseHandler,
{
    /// Create a client.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingBaseUrl`] for an empty base URL and
    /// [`ConfigError::InvalidBaseUrl`] for one that does not parse.
    pub fn new(
        transport: T,
        authentication: A,
        response_handler: H,
        request_formatter: F,
        base_url: impl AsRef<str>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            transport,
            authentication,
            request_formatter,
            response_handler,
            base_url: parse_base_url(base_url.as_ref())?,
            default_headers: HashMap::new(),
            default_query_params: BTreeMap::new(),
            default_basic_auth: None,
        })
    }

    // ========================================================================
    // Verbs
    // ========================================================================

    /// `GET url`.
    pub async fn read(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<H::Output, ClientError> {
        self.request(Method::Get, url, None::<&()>, params).await
    }

    /// `POST url` with `data` as body.
    pub async fn create<D>(
        &self,
        url: &str,
        data: &D,
        params: &[(&str, &str)],
    ) -> Result<H::Output, ClientError>
    where
        D: Serialize + ?Sized,
    {
        self.request(Method::Post, url, Some(data), params).await
    }

    /// `PUT url` with `data` as body.
    pub async fn replace<D>(
        &self,
        url: &str,
        data: &D,
        params: &[(&str, &str)],
    ) -> Result<H::Output, ClientError>
    where
        D: Serialize + ?Sized,
    {
        self.request(Method::Put, url, Some(data), params).await
    }

    /// `PATCH url` with `data` as body.
    pub async fn update<D>(
        &self,
        url: &str,
        data: &D,
        params: &[(&str, &str)],
    ) -> Result<H::Output, ClientError>
    where
        D: Serialize + ?Sized,
    {
        self.request(Method::Patch, url, Some(data), params).await
    }

    /// `DELETE url`.
    pub async fn delete(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<H::Output, ClientError> {
        self.request(Method::Delete, url, None::<&()>, params).await
    }

    /// Perform one call with any method.
    ///
    /// `url` is fully qualified; see [`endpoint`](Self::endpoint). Pass
    /// `None::<&()>` when there is no payload.
    ///
    /// # Errors
    ///
    /// - [`ClientError::BadRequest`] for a 4xx status
    /// - [`ClientError::Redirection`] for a 3xx status
    /// - [`ClientError::ServerError`] for a 5xx status, or a server that
    ///   could not be reached
    /// - [`ClientError::Unexpected`] for anything else: invalid URL,
    ///   formatting or handling failure, status outside `100..600`
    pub async fn request<D>(
        &self,
        method: Method,
        url: &str,
        data: Option<&D>,
        params: &[(&str, &str)],
    ) -> Result<H::Output, ClientError>
    where
        D: Serialize + ?Sized,
    {
        let request = self.prepare(method, url, data, params).map_err(log_failure)?;

        // Query parameters stay out of messages, they may hold credentials.
        let target = request.url().to_string();
        debug!(%method, url = %target, "sending request");

        let response = self
            .transport
            .execute(request)
            .await
            .map_err(|err| log_failure(transport_failure(&target, err)))?;

        debug!(%method, url = %target, status = response.status(), "received response");
        self.handle(&target, response).map_err(log_failure)
    }

    fn prepare<D>(
        &self,
        method: Method,
        url: &str,
        data: Option<&D>,
        params: &[(&str, &str)],
    ) -> Result<Request, ClientError>
    where
        D: Serialize + ?Sized,
    {
        let parsed = Url::parse(url)
            .map_err(|err| ClientError::unexpected(format!("Invalid URL '{url}'"), err))?;

        let mut request = Request::new(method, parsed);
        request.headers_mut().extend(
            self.default_headers
                .iter()
                .map(|(name, value)| (name.clone(), value.clone())),
        );

        // Defaults < query already in the URL < per-call parameters.
        // Names nobody overrides keep every value they had in the URL.
        let query_params = request.query_params_mut();
        for (name, value) in &self.default_query_params {
            query_params.set_default(name, value);
        }
        query_params.replace_with(params.iter().copied());

        // The client-wide credentials go in first so the strategy can replace them.
        if let Some(basic) = &self.default_basic_auth {
            request = basic.apply(request);
        }
        let mut request = self.authentication.apply(request);

        if let Some(data) = data {
            self.request_formatter
                .format(data)
                .map_err(|err| ClientError::unexpected("Unable to format the request data", err))?
                .write_into(&mut request);
        }

        Ok(request)
    }

    fn handle(&self, url: &str, response: Response) -> Result<H::Output, ClientError> {
        let response = classify_response(url, response)?;
        let status = response.status();

        self.response_handler.handle(response).map_err(|err| {
            ClientError::unexpected(format!("Unable to handle the response from '{url}'"), err)
                .with_status(status)
        })
    }
}

impl<T, A, F, H> BaseClient<T, A, F, H> {
    /// Join `path` onto the base URL.
    ///
    /// ```
    /// use apiclient::prelude::*;
    ///
    /// let client = BaseClient::builder(HyperTransport::new())
    ///     .authentication(NoAuthentication)
    ///     .request_formatter(JsonRequestFormatter)
    ///     .response_handler(RawResponseHandler)
    ///     .base_url("https://api.example.com/v1/")
    ///     .build()
    ///     .expect("valid base URL");
    ///
    /// assert_eq!(client.endpoint("/todos/45"), "https://api.example.com/v1/todos/45");
    /// ```
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Headers added to every request.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Query parameters added to every request.
    #[must_use]
    pub const fn default_query_params(&self) -> &BTreeMap<String, String> {
        &self.default_query_params
    }

    /// Add a header to every request.
    #[must_use]
    pub fn with_default_header(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }

    /// Add a query parameter to every request.
    ///
    /// A parameter of the same name in the URL or in the call wins.
    #[must_use]
    pub fn with_default_query_param(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.default_query_params.insert(name.into(), value.into());
        self
    }

    /// Basic credentials attached to every request.
    #[must_use]
    pub const fn default_basic_auth(&self) -> Option<&BasicAuthentication> {
        self.default_basic_auth.as_ref()
    }

    /// Attach basic credentials to every request.
    ///
    /// A [`BasicAuthentication`] strategy on the client overrides them.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyCredential`] if `username` is empty.
    pub fn with_default_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        self.default_basic_auth = Some(BasicAuthentication::new(username, password)?);
        Ok(self)
    }

    /// The transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// The authentication method.
    #[must_use]
    pub const fn authentication(&self) -> &A {
        &self.authentication
    }

    /// The request formatter.
    #[must_use]
    pub const fn request_formatter(&self) -> &F {
        &self.request_formatter
    }

    /// The response handler.
    #[must_use]
    pub const fn response_handler(&self) -> &H {
        &self.response_handler
    }
}

// ============================================================================
// Classification
// ============================================================================

/// Pass a success response through, or turn it into the matching error.
///
/// | Status | Outcome |
/// |---|---|
/// | `100..300` | `Ok(response)` |
/// | `300..400` | [`ClientError::Redirection`] |
/// | `400..500` | [`ClientError::BadRequest`], with the body |
/// | `500..600` | [`ClientError::ServerError`] |
/// | other | [`ClientError::Unexpected`] |
pub fn classify_response(url: &str, response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    match response.status_class() {
        StatusClass::Success => Ok(response),
        StatusClass::Redirection => Err(ClientError::redirection(status, url)),
        StatusClass::BadRequest => Err(ClientError::bad_request(status, url, response.into_body())),
        StatusClass::ServerError => Err(ClientError::server_error(status, url)),
        StatusClass::Unexpected => Err(ClientError::unexpected_status(status, url)),
    }
}

fn transport_failure(url: &str, err: TransportError) -> ClientError {
    if err.is_unreachable() {
        ClientError::unreachable(url, err)
    } else {
        ClientError::unexpected(format!("Unable to send the request to '{url}'"), err)
    }
}

fn log_failure(err: ClientError) -> ClientError {
    if err.is_server_error() {
        warn!(status = err.status(), error = %err, "server error");
    } else {
        error!(status = err.status(), error = %err, "request failed");
    }
    err
}

fn parse_base_url(base_url: &str) -> Result<Url, ConfigError> {
    let base_url = base_url.trim();
    if base_url.is_empty() {
        return Err(ConfigError::MissingBaseUrl);
    }
    Ok(Url::parse(base_url)?)
}

// ============================================================================
// Builder
// ============================================================================

/// Marks a strategy the builder has not been given yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Unset;

/// Builder for [`BaseClient`].
///
/// Each strategy setter changes the builder's type, and
/// [`build`](BaseClientBuilder::build) exists only once the authentication
/// method, request formatter and response handler are all set.
#[derive(Debug, Clone)]
pub struct BaseClientBuilder<T, A = Unset, F = Unset, H = Unset> {
    transport: T,
    authentication: A,
    request_formatter: F,
    response_handler: H,
    base_url: Option<String>,
    default_headers: HashMap<String, String>,
    default_query_params: BTreeMap<String, String>,
    default_basic_auth: Option<BasicAuthentication>,
}

impl<T> BaseClientBuilder<T> {
    /// Create a builder on top of `transport`.
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            authentication: Unset,
            request_formatter: Unset,
            response_handler: Unset,
            base_url: None,
            default_headers: HashMap::new(),
            default_query_params: BTreeMap::new(),
            default_basic_auth: None,
        }
    }
}

impl<T, A, F, H> BaseClientBuilder<T, A, F, H> {
    /// Set the authentication method.
    #[must_use]
    pub fn authentication<A2>(self, authentication: A2) -> BaseClientBuilder<T, A2, F, H>
    where
        A2: AuthenticationMethod,
    {
        BaseClientBuilder {
            transport: self.transport,
            authentication,
            request_formatter: self.request_formatter,
            response_handler: self.response_handler,
            base_url: self.base_url,
            default_headers: self.default_headers,
            default_query_params: self.default_query_params,
            default_basic_auth: self.default_basic_auth,
        }
    }

    /// Set the request formatter.
    #[must_use]
    pub fn request_formatter<F2>(self, request_formatter: F2) -> BaseClientBuilder<T, A, F2, H>
    where
        F2: RequestFormatter,
    {
        BaseClientBuilder {
            transport: self.transport,
            authentication: self.authentication,
            request_formatter,
            response_handler: self.response_handler,
            base_url: self.base_url,
            default_headers: self.default_headers,
            default_query_params: self.default_query_params,
            default_basic_auth: self.default_basic_auth,
        }
    }

    /// Set the response handler.
    #[must_use]
    pub fn response_handler<H2>(self, response_handler: H2) -> BaseClientBuilder<T, A, F, H2>
    where
        H2: ResponseHandler,
    {
        BaseClientBuilder {
            transport: self.transport,
            authentication: self.authentication,
            request_formatter: self.request_formatter,
            response_handler,
            base_url: self.base_url,
            default_headers: self.default_headers,
            default_query_params: self.default_query_params,
            default_basic_auth: self.default_basic_auth,
        }
    }

    /// Set the base URL.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Add a header to every request.
    #[must_use]
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }

    /// Add a query parameter to every request.
    #[must_use]
    pub fn default_query_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_query_params.insert(name.into(), value.into());
        self
    }

    /// Attach basic credentials to every request.
    #[must_use]
    pub fn default_basic_auth(mut self, credentials: BasicAuthentication) -> Self {
        self.default_basic_auth = Some(credentials);
        self
    }
}

impl<T, A, F, H> BaseClientBuilder<T, A, F, H>
where
    T: Transport,
    A: AuthenticationMethod,
    F: RequestFormatter,
    H: ResponseHandler,
{
    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingBaseUrl`] if no base URL was set and
    /// [`ConfigError::InvalidBaseUrl`] if it does not parse.
    pub fn build(self) -> Result<BaseClient<T, A, F, H>, ConfigError> {
        Ok(BaseClient {
            transport: self.transport,
            authentication: self.authentication,
            request_formatter: self.request_formatter,
            response_handler: self.response_handler,
            base_url: parse_base_url(self.base_url.as_deref().unwrap_or_default())?,
            default_headers: self.default_headers,
            default_query_params: self.default_query_params,
            default_basic_auth: self.default_basic_auth,
        })
    }
}
