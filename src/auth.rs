//! authentication
//!
//! exchanges a username and password for [`Credentials`] through the rest
//! login endpoint. tokens are not renewed; log in again for a fresh one.

use crate::config::{api_url, parse_endpoint, ClientConfig, DEFAULT_AUTH_PATH};
use crate::credentials::Credentials;
use crate::error::{Error, Result};
use crate::graphql::null_default;
use crate::rest::RestError;
use crate::transport::{HttpRequest, ReqwestTransport, Transport};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use url::Url;

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    #[serde(rename = "accessToken", default)]
    access_token: String,
    #[serde(rename = "projectID", default)]
    project_id: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    errors: Vec<RestError>,
}

/// error payload shapes the auth service answers with
#[derive(Default, Deserialize)]
struct ErrorBody {
    #[serde(rename = "errorDescription")]
    error_description: Option<String>,
    error: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    errors: Vec<RestError>,
    message: Option<String>,
}

/// logs in against the auth service
#[derive(Clone)]
pub struct Authenticator {
    transport: Arc<dyn Transport>,
    auth_path: String,
}

impl Authenticator {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            auth_path: DEFAULT_AUTH_PATH.to_string(),
        }
    }

    /// override the auth path prefix (default `/auth`)
    pub fn with_auth_path(mut self, path: impl Into<String>) -> Self {
        self.auth_path = path.into();
        self
    }

    /// validate the inputs and log in.
    ///
    /// malformed input fails with a validation error before any request.
    pub fn authenticate(&self, endpoint: &str, username: &str, password: &str) -> Result<Credentials> {
        let endpoint = parse_endpoint(endpoint)?;
        self.login(&endpoint, username, password)
    }

    pub(crate) fn login(&self, endpoint: &Url, username: &str, password: &str) -> Result<Credentials> {
        if username.is_empty() {
            return Err(Error::validation("username cannot be empty"));
        }
        if password.is_empty() {
            return Err(Error::validation("password cannot be empty"));
        }

        let url = api_url(endpoint, &format!("{}/login", self.auth_path.trim_end_matches('/')))?;
        let body = serde_json::to_vec(&LoginRequest { username, password }).map_err(Error::Encoding)?;

        tracing::debug!(%url, username, "POST login");
        let response = self.transport.send(HttpRequest {
            method: Method::POST,
            url,
            bearer: None,
            body: Some(body),
        })?;

        if !response.status.is_success() {
            return Err(Error::Authentication {
                status: Some(response.status.as_u16()),
                message: server_message(&response.body)
                    .unwrap_or_else(|| format!("login rejected with status {}", response.status)),
            });
        }

        let login: LoginResponse = serde_json::from_str(&response.body)
            .map_err(|err| Error::Decoding(format!("invalid login response: {err}")))?;

        if let Some(first) = login.errors.first() {
            return Err(Error::Authentication {
                status: Some(response.status.as_u16()),
                message: first.message.clone(),
            });
        }
        if login.access_token.is_empty() {
            return Err(Error::Authentication {
                status: Some(response.status.as_u16()),
                message: "login response carried no access token".to_string(),
            });
        }

        tracing::info!(username, "authenticated");
        let credentials = Credentials::new(endpoint.clone(), login.access_token, username);
        Ok(match login.project_id {
            Some(project_id) => credentials.with_project(project_id),
            None => credentials,
        })
    }
}

impl fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authenticator")
            .field("auth_path", &self.auth_path)
            .finish_non_exhaustive()
    }
}

/// log in with a default http transport
///
/// ```no_run
/// let credentials = litmus::authenticate("http://localhost:8080", "admin", "litmus")?;
/// println!("logged in as {}", credentials.username());
/// # Ok::<(), litmus::Error>(())
/// ```
pub fn authenticate(endpoint: &str, username: &str, password: &str) -> Result<Credentials> {
    let config = ClientConfig::new(endpoint, username, password);
    config.validate()?;
    let transport = ReqwestTransport::new(&config)?;
    Authenticator::new(Arc::new(transport)).authenticate(endpoint, username, password)
}

fn server_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();

    [
        parsed.error_description,
        parsed.error,
        parsed.errors.into_iter().next().map(|err| err.message),
        parsed.message,
    ]
    .into_iter()
    .flatten()
    .find(|message| !message.is_empty())
    .or_else(|| {
        let trimmed = body.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::transport::mock::MockTransport;

    fn authenticator(mock: &Arc<MockTransport>) -> Authenticator {
        Authenticator::new(mock.clone())
    }

    #[test]
    fn test_authenticate_success() {
        let mock = Arc::new(
            MockTransport::new().reply(200, r#"{"accessToken": "jwt", "projectID": "p1", "expiresIn": 86400, "type": "Bearer"}"#),
        );
        let credentials = authenticator(&mock)
            .authenticate("http://localhost:8080", "admin", "correct-pw")
            .unwrap();

        assert_eq!(credentials.token(), "jwt");
        assert_eq!(credentials.username(), "admin");
        assert_eq!(credentials.project_id(), Some("p1"));

        let request = mock.request(0);
        assert_eq!(request.url.as_str(), "http://localhost:8080/auth/login");
        assert_eq!(request.bearer, None);
        let body = mock.body_json(0);
        assert_eq!(body["username"], "admin");
        assert_eq!(body["password"], "correct-pw");
    }

    #[test]
    fn test_authenticate_rejected() {
        let mock = Arc::new(MockTransport::new().reply(
            401,
            r#"{"error": "invalid_credentials", "errorDescription": "Invalid Credentials"}"#,
        ));
        let err = authenticator(&mock)
            .authenticate("http://localhost:8080", "admin", "wrong-pw")
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Authentication);
        assert!(matches!(
            err,
            Error::Authentication { status: Some(401), ref message } if message == "Invalid Credentials"
        ));
    }

    #[test]
    fn test_authenticate_error_payload_on_success_status() {
        let mock = Arc::new(
            MockTransport::new().reply(200, r#"{"errors": [{"message": "user is deactivated"}]}"#),
        );
        let err = authenticator(&mock)
            .authenticate("http://localhost:8080", "admin", "pw")
            .unwrap_err();
        assert!(matches!(err, Error::Authentication { ref message, .. } if message == "user is deactivated"));
    }

    #[test]
    fn test_authenticate_missing_token() {
        let mock = Arc::new(MockTransport::new().reply(200, r#"{"accessToken": ""}"#));
        let err = authenticator(&mock)
            .authenticate("http://localhost:8080", "admin", "pw")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authentication);
    }

    #[test]
    fn test_authenticate_rejects_bad_input_without_request() {
        let mock = Arc::new(MockTransport::new());
        let auth = authenticator(&mock);

        for (endpoint, username, password) in [
            ("", "admin", "pw"),
            ("not a url", "admin", "pw"),
            ("ftp://example.com", "admin", "pw"),
            ("http://h:1/base?x=1", "a", "b"),
            ("http://h:1/base#top", "a", "b"),
            ("http://localhost:8080", "", "pw"),
            ("http://localhost:8080", "admin", ""),
        ] {
            let err = auth.authenticate(endpoint, username, password).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation, "{endpoint:?} {username:?}");
        }
        assert_eq!(mock.calls(), 0);
    }

    #[test]
    fn test_authenticate_custom_auth_path() {
        let mock = Arc::new(MockTransport::new().reply(200, r#"{"accessToken": "jwt"}"#));
        let credentials = authenticator(&mock)
            .with_auth_path("/api/auth/")
            .authenticate("https://chaos.example.com", "admin", "pw")
            .unwrap();
        assert_eq!(credentials.project_id(), None);
        assert_eq!(mock.request(0).url.path(), "/api/auth/login");
    }

    #[test]
    fn test_server_message_fallbacks() {
        assert_eq!(server_message(r#"{"error": "nope"}"#).as_deref(), Some("nope"));
        assert_eq!(
            server_message(r#"{"errors": [{"message": "listed"}]}"#).as_deref(),
            Some("listed")
        );
        assert_eq!(server_message(r#"{"message": "plain"}"#).as_deref(), Some("plain"));
        assert_eq!(server_message("gateway timeout").as_deref(), Some("gateway timeout"));
        assert_eq!(server_message("  "), None);
    }
}
