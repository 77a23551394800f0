//! TCP and TLS connection setup.

use std::time::Duration;

use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::connect::HttpConnector;
use rustls::{ClientConfig, RootCertStore};

/// Connector for both `https://` and plain `http://` URLs.
///
/// Servers are verified against the Mozilla root certificates. HTTP/1.1 and
/// HTTP/2 are negotiated through ALPN. A TCP connect attempt gives up after
/// `connect_timeout`.
#[must_use]
pub fn https_connector(connect_timeout: Duration) -> HttpsConnector<HttpConnector> {
    HttpsConnectorBuilder::new()
        .with_tls_config(tls_config())
        .https_or_http()
        .enable_http1()
        .enable_http2()
        .wrap_connector(tcp_connector(connect_timeout))
}

fn tls_config() -> ClientConfig {
    let roots: RootCertStore = webpki_roots::TLS_SERVER_ROOTS.iter().cloned().collect();
    ClientConfig::builder()
        .with_root_certificates(roots)
        .with_no_client_auth()
}

fn tcp_connector(connect_timeout: Duration) -> HttpConnector {
    let mut tcp = HttpConnector::new();
    // The TLS wrapper decides which schemes are accepted.
    tcp.enforce_http(false);
    tcp.set_connect_timeout(Some(connect_timeout));
    tcp.set_nodelay(true);
    tcp
}

#[cfg(test)]
mod tests {
    use assert2::check;

    use super::*;

    #[test]
    fn tls_config_leaves_alpn_to_the_connector() {
        let config = tls_config();
        check!(config.alpn_protocols.is_empty());
    }

    #[test]
    fn creates_connector() {
        let _connector = https_connector(Duration::from_millis(500));
    }
}
