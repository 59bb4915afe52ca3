//! graphql executor
//!
//! the one place graphql requests are built, sent, and classified. every
//! resource client funnels its queries and mutations through [`Executor`].

use crate::config::{api_url, DEFAULT_GRAPHQL_PATH};
use crate::credentials::Credentials;
use crate::error::{Error, Result};
use crate::graphql::{GraphQlRequest, GraphQlResponse};
use crate::operation::Operation;
use crate::transport::{HttpRequest, Transport};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use url::Url;

/// generic graphql executor.
///
/// holds no per-call state; clones share the transport.
#[derive(Clone)]
pub struct Executor {
    transport: Arc<dyn Transport>,
    graphql_path: String,
}

impl Executor {
    /// create an executor posting to the default `/api/query` path
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            graphql_path: DEFAULT_GRAPHQL_PATH.to_string(),
        }
    }

    /// post to a different graphql path
    pub fn with_graphql_path(mut self, path: impl Into<String>) -> Self {
        self.graphql_path = path.into();
        self
    }

    /// run `query` with `variables` against `endpoint` and decode `data` as `T`.
    ///
    /// an empty `token` sends no authorization header. every error is
    /// wrapped with `context`. when the server returns several graphql
    /// errors only the first message is reported.
    pub fn execute<T, V>(
        &self,
        endpoint: &Url,
        token: &str,
        query: &str,
        variables: &V,
        context: &str,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        V: Serialize + ?Sized,
    {
        self.execute_inner(endpoint, token, query, variables)
            .map_err(|err| err.context(context))
    }

    /// run a typed operation with the endpoint and token of `credentials`
    /// and return the value of its root field
    pub fn execute_operation<O: Operation>(
        &self,
        credentials: &Credentials,
        variables: &O::Variables,
        context: &str,
    ) -> Result<O::Response> {
        tracing::debug!(operation = O::FIELD, "executing graphql operation");
        let mut data: HashMap<String, O::Response> = self.execute(
            credentials.endpoint(),
            credentials.token(),
            O::QUERY,
            variables,
            context,
        )?;

        data.remove(O::FIELD).ok_or_else(|| {
            Error::Decoding(format!("response data has no {} field", O::FIELD)).context(context)
        })
    }

    fn execute_inner<T, V>(&self, endpoint: &Url, token: &str, query: &str, variables: &V) -> Result<T>
    where
        T: DeserializeOwned,
        V: Serialize + ?Sized,
    {
        let body = serde_json::to_vec(&GraphQlRequest { query, variables }).map_err(Error::Encoding)?;
        let url = api_url(endpoint, &self.graphql_path)?;

        tracing::debug!(%url, "POST graphql");
        let response = self.transport.send(HttpRequest {
            method: Method::POST,
            url,
            bearer: (!token.is_empty()).then(|| token.to_string()),
            body: Some(body),
        })?;
        tracing::debug!(status = %response.status, "graphql response");

        parse_graphql_response(response.status, &response.body)
    }
}

impl fmt::Debug for Executor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Executor")
            .field("graphql_path", &self.graphql_path)
            .finish_non_exhaustive()
    }
}

/// classify a raw graphql http exchange.
///
/// a non-success status is a transport error carrying the body and the body
/// is not parsed. errors in the envelope win over any data.
pub(crate) fn parse_graphql_response<T: DeserializeOwned>(status: StatusCode, text: &str) -> Result<T> {
    if !status.is_success() {
        return Err(Error::Transport {
            status: Some(status.as_u16()),
            message: format!("unexpected status {status}: {text}"),
        });
    }

    let envelope: GraphQlResponse<serde_json::Value> = serde_json::from_str(text)
        .map_err(|err| Error::Decoding(format!("invalid graphql response: {err}")))?;

    if let Some(first) = envelope.errors.first() {
        if envelope.errors.len() > 1 {
            tracing::warn!(
                discarded = envelope.errors.len() - 1,
                "graphql response carried several errors, reporting the first"
            );
        }
        return Err(Error::GraphQl {
            message: first.message.clone(),
        });
    }

    let data = envelope.data.unwrap_or(serde_json::Value::Null);
    serde_json::from_value(data)
        .map_err(|err| Error::Decoding(format!("unexpected graphql data: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::transport::mock::MockTransport;
    use serde::Deserialize;
    use std::collections::BTreeMap;

    fn endpoint() -> Url {
        Url::parse("http://localhost:1234").unwrap()
    }

    fn executor(mock: &Arc<MockTransport>) -> Executor {
        Executor::new(mock.clone())
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Data {
        value: i64,
    }

    #[test]
    fn test_execute_sends_envelope_and_bearer() {
        let mock = Arc::new(MockTransport::new().reply(200, r#"{"data": {"value": 7}}"#));
        let data: Data = executor(&mock)
            .execute(
                &endpoint(),
                "tok",
                "query { value }",
                &serde_json::json!({"projectID": "p1"}),
                "ctx",
            )
            .unwrap();

        assert_eq!(data, Data { value: 7 });
        assert_eq!(mock.calls(), 1);

        let request = mock.request(0);
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.url.path(), "/api/query");
        assert_eq!(request.bearer.as_deref(), Some("tok"));

        let body = mock.body_json(0);
        assert_eq!(body["query"], "query { value }");
        assert_eq!(body["variables"]["projectID"], "p1");
    }

    #[test]
    fn test_execute_omits_bearer_for_empty_token() {
        let mock = Arc::new(MockTransport::new().reply(200, r#"{"data": {"value": 1}}"#));
        let _: Data = executor(&mock)
            .execute(&endpoint(), "", "query { value }", &(), "ctx")
            .unwrap();
        assert_eq!(mock.request(0).bearer, None);
    }

    #[test]
    fn test_execute_custom_graphql_path() {
        let mock = Arc::new(MockTransport::new().reply(200, r#"{"data": {"value": 1}}"#));
        let _: Data = executor(&mock)
            .with_graphql_path("/query")
            .execute(&endpoint(), "t", "query { value }", &(), "ctx")
            .unwrap();
        assert_eq!(mock.request(0).url.path(), "/query");
    }

    #[test]
    fn test_execute_reports_first_graphql_error_only() {
        let mock = Arc::new(MockTransport::new().reply(
            200,
            r#"{"errors":[{"message":"first"},{"message":"second"}]}"#,
        ));
        let err = executor(&mock)
            .execute::<serde_json::Value, _>(&endpoint(), "t", "query { x }", &(), "ctx")
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::GraphQl);
        match err.root() {
            Error::GraphQl { message } => assert_eq!(message, "first"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!err.to_string().contains("second"));
    }

    #[test]
    fn test_execute_null_locations_and_path_stay_graphql_error() {
        let mock = Arc::new(MockTransport::new().reply(
            200,
            r#"{"data":null,"errors":[{"message":"first","locations":null,"path":null}]}"#,
        ));
        let err = executor(&mock)
            .execute::<serde_json::Value, _>(&endpoint(), "t", "query { x }", &(), "ctx")
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::GraphQl);
        assert!(matches!(err.root(), Error::GraphQl { message } if message == "first"));
    }

    #[test]
    fn test_execute_errors_win_over_data() {
        let mock = Arc::new(MockTransport::new().reply(
            200,
            r#"{"data": {"value": 3}, "errors": [{"message": "partial"}]}"#,
        ));
        let err = executor(&mock)
            .execute::<Data, _>(&endpoint(), "t", "query { value }", &(), "ctx")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::GraphQl);
    }

    #[test]
    fn test_execute_http_error_keeps_body_unparsed() {
        let mock = Arc::new(MockTransport::new().reply(500, "boom"));
        let err = executor(&mock)
            .execute::<Data, _>(&endpoint(), "t", "query { value }", &(), "ctx")
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(matches!(err.root(), Error::Transport { status: Some(500), message } if message.contains("boom")));
    }

    #[test]
    fn test_execute_http_error_with_envelope_body_is_transport() {
        let mock = Arc::new(MockTransport::new().reply(
            502,
            r#"{"errors":[{"message":"gateway"}]}"#,
        ));
        let err = executor(&mock)
            .execute::<Data, _>(&endpoint(), "t", "query { value }", &(), "ctx")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[test]
    fn test_execute_malformed_success_body_is_decoding() {
        let mock = Arc::new(MockTransport::new().reply(200, "not json"));
        let err = executor(&mock)
            .execute::<Data, _>(&endpoint(), "t", "query { value }", &(), "ctx")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decoding);
    }

    #[test]
    fn test_execute_wrong_data_shape_is_decoding() {
        let mock = Arc::new(MockTransport::new().reply(200, r#"{"data": {"value": "seven"}}"#));
        let err = executor(&mock)
            .execute::<Data, _>(&endpoint(), "t", "query { value }", &(), "ctx")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decoding);
    }

    #[test]
    fn test_execute_encoding_error_sends_nothing() {
        let mock = Arc::new(MockTransport::new());
        let mut variables = BTreeMap::new();
        variables.insert((1, 2), "tuple keys are not json object keys");

        let err = executor(&mock)
            .execute::<Data, _>(&endpoint(), "t", "query { value }", &variables, "saving thing")
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Encoding);
        assert!(err.to_string().starts_with("saving thing: "));
        assert_eq!(mock.calls(), 0);
    }

    #[test]
    fn test_execute_transport_failure_is_wrapped() {
        let mock = Arc::new(MockTransport::new().fail("connection refused"));
        let err = executor(&mock)
            .execute::<Data, _>(&endpoint(), "t", "query { value }", &(), "listing probes")
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(
            err.to_string(),
            "listing probes: transport error: connection refused"
        );
    }

    #[test]
    fn test_parse_graphql_response_null_data_into_option() {
        let parsed = parse_graphql_response::<Option<Data>>(StatusCode::OK, r#"{"data": null}"#)
            .unwrap();
        assert_eq!(parsed, None);
    }

    #[test]
    fn test_parse_graphql_response_ignores_empty_errors() {
        let parsed = parse_graphql_response::<Data>(
            StatusCode::OK,
            r#"{"data": {"value": 9}, "errors": []}"#,
        )
        .unwrap();
        assert_eq!(parsed.value, 9);
    }
}
