//! client configuration
//!
//! build a [`ClientConfig`] with endpoint, login, and optional overrides.
//! pass it to [`crate::Client::new`] to authenticate and create a client.

use crate::error::{Error, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// default path of the graphql endpoint, relative to the control plane url
pub const DEFAULT_GRAPHQL_PATH: &str = "/api/query";

/// default prefix of the rest auth endpoints
pub const DEFAULT_AUTH_PATH: &str = "/auth";

const DEFAULT_ENDPOINT: &str = "http://localhost:8080";
const DEFAULT_USERNAME: &str = "admin";
const DEFAULT_PASSWORD: &str = "litmus";

type BuilderHook =
    Arc<dyn Fn(reqwest::blocking::ClientBuilder) -> reqwest::blocking::ClientBuilder + Send + Sync>;

/// configuration for the litmus client
#[derive(Clone)]
pub struct ClientConfig {
    /// original endpoint input
    pub(crate) raw_endpoint: String,

    /// parsed endpoint of the control plane, if the input parsed
    pub(crate) endpoint: Option<Url>,

    pub(crate) username: String,

    pub(crate) password: String,

    /// project to select right after login
    pub(crate) project_id: Option<String>,

    /// request timeout; none means calls wait indefinitely
    pub(crate) timeout: Option<Duration>,

    /// user agent string
    pub(crate) user_agent: String,

    /// whether to verify ssl certificates
    pub(crate) verify_ssl: bool,

    /// additional headers to send with every request
    pub(crate) extra_headers: HeaderMap,

    pub(crate) graphql_path: String,

    pub(crate) auth_path: String,

    /// prebuilt http client (takes precedence over http_client_builder)
    pub(crate) http_client: Option<reqwest::blocking::Client>,

    /// callback to customize the http client builder before building
    pub(crate) http_client_builder: Option<BuilderHook>,
}

impl ClientConfig {
    /// create a new client configuration
    ///
    /// # arguments
    ///
    /// * `endpoint` - the control plane url (with or without trailing slash)
    /// * `username` - login name
    /// * `password` - login password
    ///
    /// # example
    ///
    /// ```
    /// use litmus::ClientConfig;
    ///
    /// let config = ClientConfig::new("https://chaos.example.com", "admin", "litmus");
    /// ```
    pub fn new(
        endpoint: impl AsRef<str>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let raw = endpoint.as_ref();

        Self {
            raw_endpoint: raw.to_string(),
            endpoint: parse_endpoint(raw).ok(),
            username: username.into(),
            password: password.into(),
            project_id: None,
            timeout: None,
            user_agent: format!("litmus-rs/{} (Rust)", env!("CARGO_PKG_VERSION")),
            verify_ssl: true,
            extra_headers: HeaderMap::new(),
            graphql_path: DEFAULT_GRAPHQL_PATH.to_string(),
            auth_path: DEFAULT_AUTH_PATH.to_string(),
            http_client: None,
            http_client_builder: None,
        }
    }

    /// read `LITMUS_ENDPOINT`, `LITMUS_USERNAME`, `LITMUS_PASSWORD`, and
    /// `LITMUS_PROJECT_ID` from the process environment.
    ///
    /// unset variables fall back to a local default install
    /// (`http://localhost:8080`, `admin`, `litmus`, no project).
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// same as [`ClientConfig::from_env`] with a custom variable lookup
    pub fn from_env_with<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let config = Self::new(
            var("LITMUS_ENDPOINT").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            var("LITMUS_USERNAME").unwrap_or_else(|| DEFAULT_USERNAME.to_string()),
            var("LITMUS_PASSWORD").unwrap_or_else(|| DEFAULT_PASSWORD.to_string()),
        );

        match var("LITMUS_PROJECT_ID") {
            Some(project_id) => config.with_project(project_id),
            None => config,
        }
    }

    /// select a project right after login instead of the server default
    pub fn with_project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    /// set a request timeout
    ///
    /// default: none, a stalled server blocks the calling thread
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// set a custom user agent string
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// disable ssl certificate verification (not recommended for production)
    ///
    /// default: enabled
    pub fn with_ssl_verification(mut self, verify: bool) -> Self {
        self.verify_ssl = verify;
        self
    }

    /// add a header to every request
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.extra_headers.insert(name, value);
        self
    }

    /// add a set of headers to every request
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.extra_headers.extend(headers);
        self
    }

    /// access extra headers configured on this client
    pub fn extra_headers(&self) -> &HeaderMap {
        &self.extra_headers
    }

    /// override the graphql path (default `/api/query`)
    pub fn with_graphql_path(mut self, path: impl Into<String>) -> Self {
        self.graphql_path = path.into();
        self
    }

    /// override the auth path prefix (default `/auth`)
    pub fn with_auth_path(mut self, path: impl Into<String>) -> Self {
        self.auth_path = path.into();
        self
    }

    /// inject a prebuilt blocking http client.
    ///
    /// when set, this client is used as-is: tls, timeouts, ssl verification,
    /// user agent, and extra headers come from the prebuilt client and the
    /// corresponding `ClientConfig` fields are ignored. the bearer token is
    /// still added per request.
    pub fn with_http_client(mut self, http_client: reqwest::blocking::Client) -> Self {
        self.http_client = Some(http_client);
        self
    }

    /// customize the http client builder before the client is created.
    ///
    /// the callback receives a builder that already has the extra headers,
    /// user agent, timeout, and ssl settings applied.
    ///
    /// ignored if `with_http_client` is also set.
    pub fn with_http_client_builder<F>(mut self, f: F) -> Self
    where
        F: Fn(reqwest::blocking::ClientBuilder) -> reqwest::blocking::ClientBuilder
            + Send
            + Sync
            + 'static,
    {
        self.http_client_builder = Some(Arc::new(f));
        self
    }

    /// parsed control plane url
    pub fn endpoint(&self) -> Result<&Url> {
        self.endpoint
            .as_ref()
            .ok_or_else(|| Error::validation(format!("invalid endpoint: {}", self.raw_endpoint)))
    }

    /// validate the configuration
    pub(crate) fn validate(&self) -> Result<()> {
        self.endpoint()?;

        if self.username.is_empty() {
            return Err(Error::validation("username cannot be empty"));
        }

        if self.password.is_empty() {
            return Err(Error::validation("password cannot be empty"));
        }

        if matches!(&self.project_id, Some(project_id) if project_id.is_empty()) {
            return Err(Error::validation("project ID cannot be empty"));
        }

        Ok(())
    }
}

/// parse a control plane url, accepting only http and https
pub(crate) fn parse_endpoint(raw: &str) -> Result<Url> {
    if raw.trim().is_empty() {
        return Err(Error::validation("endpoint cannot be empty"));
    }

    let url = Url::parse(raw.trim_end_matches('/'))
        .map_err(|err| Error::validation(format!("invalid endpoint {raw}: {err}")))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(Error::validation(format!(
            "invalid url scheme: {}. must be http or https",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(Error::validation(format!("invalid endpoint {raw}: missing host")));
    }

    if url.query().is_some() || url.fragment().is_some() {
        return Err(Error::validation(format!(
            "invalid endpoint {raw}: query and fragment are not allowed"
        )));
    }

    Ok(url)
}

/// join an api path onto the control plane url
pub(crate) fn api_url(endpoint: &Url, path: &str) -> Result<Url> {
    let base = endpoint.as_str().trim_end_matches('/');
    let path = path.trim_start_matches('/');
    Url::parse(&format!("{base}/{path}"))
        .map_err(|err| Error::validation(format!("invalid api url for {path}: {err}")))
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoint", &self.raw_endpoint)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("project_id", &self.project_id)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field("verify_ssl", &self.verify_ssl)
            .field("extra_headers", &self.extra_headers.len())
            .field("graphql_path", &self.graphql_path)
            .field("auth_path", &self.auth_path)
            .field("http_client", &self.http_client.is_some())
            .field("http_client_builder", &self.http_client_builder.is_some())
            .finish()
    }
}
