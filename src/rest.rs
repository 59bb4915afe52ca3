//! rest calls against the auth service
//!
//! project bootstrap lives outside graphql. responses use a
//! `{data, errors, message}` envelope.

use crate::config::api_url;
use crate::credentials::Credentials;
use crate::error::{Error, Result};
use crate::graphql::null_default;
use crate::transport::{HttpRequest, Transport};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use url::Url;

/// `{message}` entry of a rest error list
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RestError {
    #[serde(default)]
    pub(crate) message: String,
}

#[derive(Debug, Deserialize)]
struct RestResponse {
    #[serde(default)]
    data: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "null_default")]
    errors: Vec<RestError>,
}

#[derive(Clone)]
pub(crate) struct RestCaller {
    transport: Arc<dyn Transport>,
    auth_path: String,
}

impl RestCaller {
    pub(crate) fn new(transport: Arc<dyn Transport>, auth_path: impl Into<String>) -> Self {
        Self {
            transport,
            auth_path: auth_path.into(),
        }
    }

    /// url of `segments` under the auth prefix, each segment percent-encoded
    pub(crate) fn url(&self, credentials: &Credentials, segments: &[&str]) -> Result<Url> {
        let mut url = api_url(credentials.endpoint(), &self.auth_path)?;
        url.path_segments_mut()
            .map_err(|_| Error::validation("endpoint cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub(crate) fn get<T: DeserializeOwned>(&self, credentials: &Credentials, url: Url, context: &str) -> Result<T> {
        self.call(credentials, Method::GET, url, None)
            .map_err(|err| err.context(context))
    }

    pub(crate) fn post<T, B>(&self, credentials: &Credentials, url: Url, body: &B, context: &str) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let call = || {
            let body = serde_json::to_vec(body).map_err(Error::Encoding)?;
            self.call(credentials, Method::POST, url, Some(body))
        };
        call().map_err(|err| err.context(context))
    }

    fn call<T: DeserializeOwned>(
        &self,
        credentials: &Credentials,
        method: Method,
        url: Url,
        body: Option<Vec<u8>>,
    ) -> Result<T> {
        tracing::debug!(%method, %url, "rest request");
        let token = credentials.token();
        let response = self.transport.send(HttpRequest {
            method,
            url,
            bearer: (!token.is_empty()).then(|| token.to_string()),
            body,
        })?;
        tracing::debug!(status = %response.status, "rest response");

        parse_rest_response(response.status, &response.body)
    }
}

impl fmt::Debug for RestCaller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestCaller")
            .field("auth_path", &self.auth_path)
            .finish_non_exhaustive()
    }
}

/// classify a rest exchange the same way graphql ones are: status first,
/// then the error list, then the data member
pub(crate) fn parse_rest_response<T: DeserializeOwned>(status: StatusCode, text: &str) -> Result<T> {
    if !status.is_success() {
        return Err(Error::Transport {
            status: Some(status.as_u16()),
            message: format!("unexpected status {status}: {text}"),
        });
    }

    let envelope: RestResponse = serde_json::from_str(text)
        .map_err(|err| Error::Decoding(format!("invalid response: {err}")))?;

    if let Some(first) = envelope.errors.first() {
        return Err(Error::OperationFailed(first.message.clone()));
    }

    serde_json::from_value(envelope.data.unwrap_or(serde_json::Value::Null))
        .map_err(|err| Error::Decoding(format!("unexpected response data: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[derive(Debug, Deserialize)]
    struct Named {
        name: String,
    }

    #[test]
    fn test_parse_rest_response_success() {
        let named: Named =
            parse_rest_response(StatusCode::OK, r#"{"message": "ok", "data": {"name": "p"}}"#)
                .unwrap();
        assert_eq!(named.name, "p");
    }

    #[test]
    fn test_parse_rest_response_error_list() {
        let err = parse_rest_response::<Named>(
            StatusCode::OK,
            r#"{"errors": [{"message": "project exists"}, {"message": "other"}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::OperationFailed(message) if message == "project exists"));
    }

    #[test]
    fn test_parse_rest_response_status_first() {
        let err = parse_rest_response::<Named>(StatusCode::UNAUTHORIZED, "{not json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(err.is_auth_error());
    }

    #[test]
    fn test_url_encodes_segments() {
        let caller = RestCaller::new(
            Arc::new(crate::transport::mock::MockTransport::new()),
            "/auth",
        );
        let credentials = Credentials::new(
            Url::parse("http://localhost:3000/").unwrap(),
            "t",
            "admin",
        );
        let url = caller
            .url(&credentials, &["get_user_with_project", "a b"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:3000/auth/get_user_with_project/a%20b"
        );
    }
}
