//! http transport
//!
//! every request the client makes goes through [`Transport::send`]. the
//! default implementation wraps a blocking reqwest client; tests plug in
//! their own.

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use url::Url;

/// one outbound http request
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    /// bearer token; `None` means no authorization header
    pub bearer: Option<String>,
    /// json body, if any
    pub body: Option<Vec<u8>>,
}

/// status and body text of a completed request
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// blocking request sender.
///
/// implementations perform exactly one exchange per call and report
/// network-level failures as [`Error::Transport`]. any status code,
/// including errors, is returned as a response.
pub trait Transport: Send + Sync {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// transport backed by `reqwest::blocking`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::blocking::Client,
}

impl ReqwestTransport {
    /// build the http client described by `config`
    pub fn new(config: &ClientConfig) -> Result<Self> {
        if let Some(http) = &config.http_client {
            return Ok(Self { http: http.clone() });
        }

        let mut builder = reqwest::blocking::Client::builder()
            .default_headers(config.extra_headers.clone())
            .user_agent(config.user_agent.clone())
            .danger_accept_invalid_certs(!config.verify_ssl);

        // the blocking builder applies a 30s default; an unset timeout means none
        builder = builder.timeout(config.timeout);

        if let Some(hook) = &config.http_client_builder {
            builder = hook(builder);
        }

        let http = builder
            .build()
            .map_err(|err| Error::Config(format!("failed to build http client: {err}")))?;

        Ok(Self { http })
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut builder = self
            .http
            .request(request.method, request.url)
            .header(CONTENT_TYPE, "application/json");

        if let Some(token) = request.bearer.as_deref().filter(|token| !token.is_empty()) {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().map_err(Error::transport)?;
        let status = response.status();
        let body = response.text().map_err(Error::transport)?;

        Ok(HttpResponse { status, body })
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_new_builds_with_defaults() {
        let config = ClientConfig::new("http://localhost:8080", "admin", "pw");
        assert!(ReqwestTransport::new(&config).is_ok());
    }

    #[test]
    fn test_new_with_timeout_and_hook() {
        let config = ClientConfig::new("http://localhost:8080", "admin", "pw")
            .with_timeout(Duration::from_secs(3))
            .with_http_client_builder(|b| b.no_proxy());
        assert!(ReqwestTransport::new(&config).is_ok());
    }

    #[test]
    fn test_unreachable_host_is_transport_error() {
        let config = ClientConfig::new("http://127.0.0.1:9", "admin", "pw")
            .with_timeout(Duration::from_secs(2))
            .with_http_client_builder(|b| b.no_proxy());
        let transport = ReqwestTransport::new(&config).unwrap();
        let err = transport
            .send(HttpRequest {
                method: Method::POST,
                url: Url::parse("http://127.0.0.1:9/api/query").unwrap(),
                bearer: None,
                body: Some(b"{}".to_vec()),
            })
            .unwrap_err();
        assert!(matches!(err, Error::Transport { status: None, .. }));
    }
}
