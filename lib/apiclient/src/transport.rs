//! HTTP transport using hyper-util.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;

use apiclient_core::{Credentials, Request, Response, Transport, TransportError};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use http::HeaderValue;
use http::header::AUTHORIZATION;
use http_body_util::{BodyExt, Full};
use hyper_rustls::HttpsConnector;
use hyper_util::{
    client::legacy::{Client, connect::HttpConnector},
    rt::TokioExecutor,
};
use tower::Layer;
use tower::util::BoxCloneService;
use tower_service::Service;

use crate::{
    config::{TransportConfig, TransportConfigBuilder},
    connector::https_connector,
    middleware::{FollowRedirectLayer, LoggingLayer},
};

// ============================================================================
// Type-Erased Service for Middleware Composition
// ============================================================================

/// Type-erased service that layers are composed onto.
pub type BoxedService = BoxCloneService<Request, Response, TransportError>;

/// Future returned by the transport's tower service.
pub type ServiceFuture =
    Pin<Box<dyn Future<Output = Result<Response, TransportError>> + Send + 'static>>;

/// `BoxCloneService` is not `Sync`; the mutex only guards the clone taken per call.
#[derive(Clone)]
struct SyncService {
    inner: Arc<Mutex<BoxedService>>,
}

impl SyncService {
    fn new(service: BoxedService) -> Self {
        Self {
            inner: Arc::new(Mutex::new(service)),
        }
    }

    fn call(&self, request: Request) -> ServiceFuture {
        let mut service = self
            .inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone();

        Box::pin(async move { service.call(request).await })
    }
}

// ============================================================================
// Raw Transport
// ============================================================================

#[derive(Clone)]
struct RawHyperTransport {
    inner: Client<HttpsConnector<HttpConnector>, Full<Bytes>>,
    config: TransportConfig,
}

impl RawHyperTransport {
    fn new(config: TransportConfig) -> Self {
        let connector = https_connector(config.connect_timeout);

        let inner = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_idle_per_host)
            .build(connector);

        Self { inner, config }
    }

    /// Convert a request into a hyper request.
    ///
    /// The basic-auth slot, when filled, wins over any `Authorization` header.
    fn build_hyper_request(request: Request) -> Result<http::Request<Full<Bytes>>, TransportError> {
        let mut builder = http::Request::builder()
            .method(http::Method::from(request.method()))
            .uri(request.full_url().as_str());

        for (name, value) in request.headers() {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let body = request.body().cloned().map_or_else(Full::default, Full::new);
        let mut http_request = builder
            .body(body)
            .map_err(|e| TransportError::invalid_request(e.to_string()))?;

        if let Some(credentials) = request.basic_auth() {
            let value = HeaderValue::from_str(&basic_auth_value(credentials))
                .map_err(|e| TransportError::invalid_request(e.to_string()))?;
            http_request.headers_mut().insert(AUTHORIZATION, value);
        }

        Ok(http_request)
    }

    /// Flatten the response headers, one entry per name.
    ///
    /// Repeated fields are joined with `", "` in arrival order, so several
    /// `Set-Cookie` lines end up in a single value. Bytes that are not UTF-8
    /// are replaced with `U+FFFD`.
    fn extract_headers(headers: &http::HeaderMap) -> HashMap<String, String> {
        let mut extracted = HashMap::with_capacity(headers.keys_len());
        for name in headers.keys() {
            let value = headers
                .get_all(name)
                .iter()
                .map(|value| String::from_utf8_lossy(value.as_bytes()))
                .collect::<Vec<_>>()
                .join(", ");
            extracted.insert(name.to_string(), value);
        }
        extracted
    }

    async fn execute(&self, request: Request) -> Result<Response, TransportError> {
        let hyper_request = Self::build_hyper_request(request)?;

        // The timeout covers reading the body too.
        tokio::time::timeout(self.config.timeout, async {
            let response = self
                .inner
                .request(hyper_request)
                .await
                .map_err(Self::map_hyper_error)?;

            let status = response.status().as_u16();
            let headers = Self::extract_headers(response.headers());

            let body = response
                .into_body()
                .collect()
                .await
                .map_err(|e| TransportError::connection(e.to_string()))?
                .to_bytes();

            Ok::<_, TransportError>(Response::new(status, headers, body))
        })
        .await
        .map_err(|_| TransportError::Timeout)?
    }

    #[allow(clippy::needless_pass_by_value)]
    fn map_hyper_error(err: hyper_util::client::legacy::Error) -> TransportError {
        let msg = match std::error::Error::source(&err) {
            Some(source) => format!("{err}: {source}"),
            None => err.to_string(),
        };

        if err.is_connect() {
            return TransportError::connection(msg);
        }

        if msg.contains("ssl") || msg.contains("tls") || msg.contains("certificate") {
            return TransportError::tls(msg);
        }

        TransportError::connection(msg)
    }
}

/// `Basic base64(username:password)`.
fn basic_auth_value(credentials: &Credentials) -> String {
    let encoded = STANDARD.encode(format!(
        "{}:{}",
        credentials.username(),
        credentials.password()
    ));
    format!("Basic {encoded}")
}

impl Service<Request> for RawHyperTransport {
    type Response = Response;
    type Error = TransportError;
    type Future = ServiceFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let transport = self.clone();
        Box::pin(async move { transport.execute(request).await })
    }
}

// ============================================================================
// Public Transport
// ============================================================================

/// [`Transport`] over hyper-util with connection pooling, rustls TLS and
/// tower middleware.
///
/// Cloning is cheap and clones share the connection pool.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use apiclient::HyperTransport;
///
/// // Logging and redirect following
/// let transport = HyperTransport::new();
///
/// // Bare transport with a short timeout
/// let transport = HyperTransport::builder()
///     .timeout(Duration::from_secs(5))
///     .build();
/// ```
#[derive(Clone)]
pub struct HyperTransport {
    service: SyncService,
    config: TransportConfig,
}

impl std::fmt::Debug for HyperTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperTransport")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl HyperTransport {
    /// Create a transport with the default configuration and default middleware
    /// (logging and redirect following).
    #[must_use]
    pub fn new() -> Self {
        Self::builder().with_defaults().build()
    }

    /// Create a transport with a custom configuration and no middleware.
    #[must_use]
    pub fn with_config(config: TransportConfig) -> Self {
        let raw = RawHyperTransport::new(config.clone());
        Self {
            service: SyncService::new(BoxCloneService::new(raw)),
            config,
        }
    }

    fn with_service(service: BoxedService, config: TransportConfig) -> Self {
        Self {
            service: SyncService::new(service),
            config,
        }
    }

    /// Create a new transport builder, without any middleware.
    #[must_use]
    pub fn builder() -> HyperTransportBuilder {
        HyperTransportBuilder::default()
    }

    /// Get the transport configuration.
    #[must_use]
    pub const fn config(&self) -> &TransportConfig {
        &self.config
    }
}

impl Default for HyperTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HyperTransport {
    async fn execute(&self, request: Request) -> Result<Response, TransportError> {
        self.service.call(request).await
    }
}

impl Service<Request> for HyperTransport {
    type Response = Response;
    type Error = TransportError;
    type Future = ServiceFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request) -> Self::Future {
        self.service.call(request)
    }
}

/// Builder for [`HyperTransport`].
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use apiclient::HyperTransport;
/// use apiclient::middleware::LoggingLayer;
///
/// let transport = HyperTransport::builder()
///     .connect_timeout(Duration::from_secs(2))
///     .with_follow_redirects_max(3)
///     .layer(LoggingLayer::debug())
///     .build();
/// ```
#[derive(Default)]
pub struct HyperTransportBuilder {
    config: TransportConfigBuilder,
    layers: Vec<Arc<dyn Fn(BoxedService) -> BoxedService + Send + Sync>>,
    use_defaults: bool,
}

impl std::fmt::Debug for HyperTransportBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperTransportBuilder")
            .field("config", &self.config)
            .field("layers_count", &self.layers.len())
            .field("use_defaults", &self.use_defaults)
            .finish()
    }
}

impl HyperTransportBuilder {
    // ========================================================================
    // Core Configuration
    // ========================================================================

    /// Set the request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.timeout(timeout);
        self
    }

    /// Set the connect timeout.
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.connect_timeout(timeout);
        self
    }

    /// Set the maximum idle connections per host.
    #[must_use]
    pub fn pool_idle_per_host(mut self, count: usize) -> Self {
        self.config = self.config.pool_idle_per_host(count);
        self
    }

    /// Set the idle connection timeout.
    #[must_use]
    pub fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.pool_idle_timeout(timeout);
        self
    }

    // ========================================================================
    // Middleware
    // ========================================================================

    /// Add a tower layer.
    ///
    /// The last layer added is the outermost one and sees requests first.
    #[must_use]
    pub fn layer<L>(mut self, layer: L) -> Self
    where
        L: Layer<BoxedService> + Send + Sync + 'static,
        L::Service: Service<Request, Response = Response, Error = TransportError>
            + Clone
            + Send
            + 'static,
        <L::Service as Service<Request>>::Future: Send,
    {
        self.layers.push(Arc::new(move |service| {
            BoxCloneService::new(layer.layer(service))
        }));
        self
    }

    /// Alias for [`layer`](Self::layer).
    #[must_use]
    pub fn with<L>(self, layer: L) -> Self
    where
        L: Layer<BoxedService> + Send + Sync + 'static,
        L::Service: Service<Request, Response = Response, Error = TransportError>
            + Clone
            + Send
            + 'static,
        <L::Service as Service<Request>>::Future: Send,
    {
        self.layer(layer)
    }

    /// Enable the default middleware: redirect following, wrapped in logging.
    ///
    /// Defaults sit below any layer added with [`layer`](Self::layer).
    #[must_use]
    pub fn with_defaults(mut self) -> Self {
        self.use_defaults = true;
        self
    }

    /// Disable the default middleware.
    #[must_use]
    pub fn without_defaults(mut self) -> Self {
        self.use_defaults = false;
        self
    }

    /// Log requests and responses at info level.
    #[must_use]
    pub fn with_logging(self) -> Self {
        self.layer(LoggingLayer::new())
    }

    /// Log requests and responses at debug level, with header names.
    #[must_use]
    pub fn with_debug_logging(self) -> Self {
        self.layer(LoggingLayer::debug())
    }

    /// Follow 301, 302, 303, 307 and 308 redirects, at most 10 in a row.
    #[must_use]
    pub fn with_follow_redirects(self) -> Self {
        self.layer(FollowRedirectLayer::new())
    }

    /// Follow redirects, at most `max_redirects` in a row.
    #[must_use]
    pub fn with_follow_redirects_max(self, max_redirects: usize) -> Self {
        self.layer(FollowRedirectLayer::with_max_redirects(max_redirects))
    }

    // ========================================================================
    // Build
    // ========================================================================

    /// Build the transport.
    #[must_use]
    pub fn build(self) -> HyperTransport {
        let config = self.config.build();
        let raw = RawHyperTransport::new(config.clone());

        let mut service: BoxedService = BoxCloneService::new(raw);

        if self.use_defaults {
            service = BoxCloneService::new(FollowRedirectLayer::new().layer(service));
            service = BoxCloneService::new(LoggingLayer::new().layer(service));
        }

        for layer_fn in self.layers {
            service = layer_fn(service);
        }

        HyperTransport::with_service(service, config)
    }
}
