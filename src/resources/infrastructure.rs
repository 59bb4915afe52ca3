//! chaos infrastructure (delegates connected to a project)

use super::{require, total, NoVariables, ProjectRequest, Scope, UserDetails};
use crate::error::{Error, Result};
use crate::graphql::null_default;
use crate::pagination::{Page, Pagination, Paginator};
use crate::queries;
use serde::{Deserialize, Serialize};

/// whether the delegate watches one namespace or the whole cluster
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InfraScope {
    #[default]
    Namespace,
    Cluster,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InfrastructureType {
    #[default]
    Kubernetes,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Toleration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toleration_seconds: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Infra {
    #[serde(rename = "infraID")]
    pub infra_id: String,
    #[serde(rename = "projectID", default)]
    pub project_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub tags: Vec<String>,
    #[serde(rename = "environmentID", default)]
    pub environment_id: String,
    #[serde(default)]
    pub platform_name: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_infra_confirmed: bool,
    #[serde(default)]
    pub is_removed: bool,
    #[serde(default)]
    pub infra_namespace: Option<String>,
    #[serde(default)]
    pub service_account: Option<String>,
    #[serde(default)]
    pub infra_scope: Option<InfraScope>,
    #[serde(default)]
    pub infra_ns_exists: Option<bool>,
    #[serde(default)]
    pub infra_sa_exists: Option<bool>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub last_experiment_timestamp: Option<String>,
    #[serde(default)]
    pub no_of_experiments: Option<i64>,
    #[serde(default)]
    pub no_of_experiment_runs: Option<i64>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub created_by: Option<UserDetails>,
    #[serde(default)]
    pub updated_by: Option<UserDetails>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct InfraFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "infraID", default, skip_serializing_if = "Option::is_none")]
    pub infra_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infra_scope: Option<InfraScope>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ListInfraRequest {
    #[serde(rename = "infraIDs", default, skip_serializing_if = "Vec::is_empty")]
    pub infra_ids: Vec<String>,
    #[serde(rename = "environmentIDs", default, skip_serializing_if = "Vec::is_empty")]
    pub environment_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<InfraFilter>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListInfraResponse {
    #[serde(default)]
    pub total_no_of_infras: Option<i64>,
    #[serde(default, deserialize_with = "null_default")]
    pub infras: Vec<Infra>,
}

/// body of a register call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegisterInfraRequest {
    pub name: String,
    #[serde(rename = "environmentID")]
    pub environment_id: String,
    pub infrastructure_type: InfrastructureType,
    pub infra_scope: InfraScope,
    pub platform_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infra_namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_account: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infra_ns_exists: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infra_sa_exists: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_ssl: Option<bool>,
    /// comma separated `key=value` pairs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_selector: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tolerations: Vec<Toleration>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl RegisterInfraRequest {
    /// namespace-scoped kubernetes delegate installed into `litmus`
    pub fn new(name: impl Into<String>, environment_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            environment_id: environment_id.into(),
            infrastructure_type: InfrastructureType::Kubernetes,
            infra_scope: InfraScope::Namespace,
            platform_name: "default-platform".to_string(),
            description: None,
            infra_namespace: Some("litmus".to_string()),
            service_account: Some("litmus".to_string()),
            infra_ns_exists: None,
            infra_sa_exists: None,
            skip_ssl: None,
            node_selector: None,
            tolerations: Vec::new(),
            tags: Vec::new(),
        }
    }

    fn validate(&self) -> Result<()> {
        require(&self.name, "infrastructure name")?;
        require(&self.environment_id, "environment ID")?;
        require(&self.platform_name, "platform name")?;

        if self.infra_scope == InfraScope::Namespace {
            require(self.infra_namespace.as_deref().unwrap_or_default(), "namespace")?;
        }
        if let Some(selector) = &self.node_selector {
            validate_node_selector(selector)?;
        }
        Ok(())
    }
}

fn validate_node_selector(selector: &str) -> Result<()> {
    for pair in selector.split(',') {
        match pair.split_once('=') {
            Some((key, value))
                if !key.trim().is_empty()
                    && !value.trim().is_empty()
                    && !key.contains('"')
                    && !value.contains('"') => {}
            _ => {
                return Err(Error::validation(format!(
                    "invalid node selector {selector:?}, expected key=value[,key=value]"
                )))
            }
        }
    }
    Ok(())
}

/// install details returned by a register call
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInfraResponse {
    pub token: String,
    #[serde(rename = "infraID")]
    pub infra_id: String,
    pub name: String,
    /// kubernetes manifest to apply on the target cluster
    #[serde(default)]
    pub manifest: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerVersion {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct InfraVariables {
    #[serde(rename = "projectID")]
    project_id: String,
    #[serde(rename = "infraID")]
    infra_id: String,
}

graphql_operation!(ListInfras, "listInfras", queries::LIST_INFRAS,
    ProjectRequest<ListInfraRequest> => ListInfraResponse);
graphql_operation!(RegisterInfra, "registerInfra", queries::REGISTER_INFRA,
    ProjectRequest<RegisterInfraRequest> => RegisterInfraResponse);
graphql_operation!(DeleteInfra, "deleteInfra", queries::DELETE_INFRA,
    InfraVariables => String);
graphql_operation!(GetServerVersion, "getServerVersion", queries::SERVER_VERSION,
    NoVariables => ServerVersion);

/// infrastructure operations scoped to the active project
#[derive(Debug, Clone)]
pub struct InfrastructureClient {
    scope: Scope,
}

impl InfrastructureClient {
    pub(crate) fn new(scope: Scope) -> Self {
        Self { scope }
    }

    pub fn list(&self, request: ListInfraRequest) -> Result<ListInfraResponse> {
        let variables = ProjectRequest {
            project_id: self.scope.project_id()?,
            request,
        };
        self.scope
            .run::<ListInfras>(&variables, "listing infrastructure")
    }

    /// walk every page of infrastructure
    pub fn list_all(&self, page_size: u32) -> Result<Vec<Infra>> {
        Paginator::new(page_size, |pagination| {
            let response = self.list(ListInfraRequest {
                pagination: Some(pagination),
                ..Default::default()
            })?;
            let fetched = response.infras.len();
            Ok(Page {
                total: total(response.total_no_of_infras, fetched),
                items: response.infras,
            })
        })
        .collect_all()
    }

    /// find one infrastructure by id; there is no single-item query
    pub fn get(&self, infra_id: &str) -> Result<Infra> {
        require(infra_id, "infrastructure ID")?;
        let response = self.list(ListInfraRequest {
            infra_ids: vec![infra_id.to_string()],
            ..Default::default()
        })?;

        response
            .infras
            .into_iter()
            .find(|infra| infra.infra_id == infra_id)
            .ok_or_else(|| {
                Error::OperationFailed(format!("infrastructure not found with ID: {infra_id}"))
                    .context("getting infrastructure")
            })
    }

    /// register a delegate and return the manifest to install it with
    pub fn register(&self, request: RegisterInfraRequest) -> Result<RegisterInfraResponse> {
        request.validate()?;
        let variables = ProjectRequest {
            project_id: self.scope.project_id()?,
            request,
        };
        let response = self
            .scope
            .run::<RegisterInfra>(&variables, "registering infrastructure")?;
        tracing::info!(infra_id = %response.infra_id, name = %response.name, "infrastructure registered");
        Ok(response)
    }

    /// same as [`InfrastructureClient::register`]
    pub fn create(&self, request: RegisterInfraRequest) -> Result<RegisterInfraResponse> {
        self.register(request)
    }

    /// disconnect a delegate and return the server's message
    pub fn disconnect(&self, infra_id: &str) -> Result<String> {
        let project_id = self.scope.project_id()?;
        require(infra_id, "infrastructure ID")?;
        let variables = InfraVariables {
            project_id,
            infra_id: infra_id.to_string(),
        };
        self.scope
            .run::<DeleteInfra>(&variables, "disconnecting infrastructure")
    }

    /// same as [`InfrastructureClient::disconnect`]
    pub fn delete(&self, infra_id: &str) -> Result<String> {
        self.disconnect(infra_id)
    }

    /// control plane version; sent without a token
    pub fn server_version(&self) -> Result<ServerVersion> {
        self.scope
            .run_anonymous::<GetServerVersion>(&NoVariables {}, "getting server version")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::resources::testing::{scope, scope_without_project};
    use crate::transport::mock::MockTransport;
    use std::sync::Arc;

    fn client(mock: &Arc<MockTransport>) -> InfrastructureClient {
        InfrastructureClient::new(scope(mock))
    }

    #[test]
    fn test_get_filters_by_id() {
        let mock = Arc::new(MockTransport::new().reply(
            200,
            r#"{"data": {"listInfras": {"totalNoOfInfras": 1, "infras": [
                {"infraID": "i1", "name": "k8s", "environmentID": "staging", "isActive": true,
                 "infraScope": "cluster", "tags": null}]}}}"#,
        ));
        let infra = client(&mock).get("i1").unwrap();

        assert_eq!(infra.name, "k8s");
        assert!(infra.is_active);
        assert_eq!(infra.infra_scope, Some(InfraScope::Cluster));
        assert_eq!(
            mock.body_json(0)["variables"]["request"],
            serde_json::json!({"infraIDs": ["i1"]})
        );
    }

    #[test]
    fn test_get_not_found_is_operation_failed() {
        let mock = Arc::new(MockTransport::new().reply(
            200,
            r#"{"data": {"listInfras": {"totalNoOfInfras": 0, "infras": []}}}"#,
        ));
        let err = client(&mock).get("missing").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OperationFailed);
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_register_defaults() {
        let mock = Arc::new(MockTransport::new().reply(
            200,
            r#"{"data": {"registerInfra": {"token": "t", "infraID": "i9", "name": "edge", "manifest": "apiVersion: v1"}}}"#,
        ));
        let response = client(&mock)
            .register(RegisterInfraRequest::new("edge", "staging"))
            .unwrap();

        assert_eq!(response.infra_id, "i9");
        assert_eq!(response.manifest, "apiVersion: v1");
        assert_eq!(
            mock.body_json(0)["variables"]["request"],
            serde_json::json!({
                "name": "edge",
                "environmentID": "staging",
                "infrastructureType": "Kubernetes",
                "infraScope": "namespace",
                "platformName": "default-platform",
                "infraNamespace": "litmus",
                "serviceAccount": "litmus"
            })
        );
    }

    #[test]
    fn test_register_validation() {
        let mock = Arc::new(MockTransport::new());
        let infrastructure = client(&mock);

        let mut request = RegisterInfraRequest::new("edge", "staging");
        request.node_selector = Some("disk=ssd,zone".to_string());
        assert_eq!(infrastructure.create(request).unwrap_err().kind(), ErrorKind::Validation);

        let mut request = RegisterInfraRequest::new("edge", "staging");
        request.node_selector = Some(r#"disk="ssd""#.to_string());
        assert_eq!(infrastructure.create(request).unwrap_err().kind(), ErrorKind::Validation);

        let mut request = RegisterInfraRequest::new("edge", "staging");
        request.node_selector = Some(r#""disk"=ssd"#.to_string());
        assert!(request.validate().is_err());

        let mut request = RegisterInfraRequest::new("edge", "staging");
        request.infra_namespace = None;
        assert_eq!(infrastructure.register(request).unwrap_err().kind(), ErrorKind::Validation);

        let mut request = RegisterInfraRequest::new("edge", "staging");
        request.infra_scope = InfraScope::Cluster;
        request.infra_namespace = None;
        request.node_selector = Some("disk=ssd,zone=a".to_string());
        assert!(request.validate().is_ok());

        assert_eq!(
            infrastructure
                .register(RegisterInfraRequest::new("edge", ""))
                .unwrap_err()
                .kind(),
            ErrorKind::Validation
        );
        assert_eq!(mock.calls(), 0);
    }

    #[test]
    fn test_disconnect() {
        let mock = Arc::new(MockTransport::new().reply(
            200,
            r#"{"data": {"deleteInfra": "infra deleted"}}"#,
        ));
        let message = client(&mock).delete("i1").unwrap();
        assert_eq!(message, "infra deleted");
        assert_eq!(
            mock.body_json(0)["variables"],
            serde_json::json!({"projectID": "p1", "infraID": "i1"})
        );
    }

    #[test]
    fn test_disconnect_rejects_empty_id() {
        let mock = Arc::new(MockTransport::new());
        assert_eq!(client(&mock).disconnect("").unwrap_err().kind(), ErrorKind::Validation);
        assert_eq!(mock.calls(), 0);
    }

    #[test]
    fn test_server_version_sends_no_token() {
        let mock = Arc::new(MockTransport::new().reply(
            200,
            r#"{"data": {"getServerVersion": {"key": "version", "value": "3.16.0"}}}"#,
        ));
        let version = InfrastructureClient::new(scope_without_project(&mock))
            .server_version()
            .unwrap();

        assert_eq!(version.value, "3.16.0");
        let request = mock.request(0);
        assert_eq!(request.bearer, None);
        assert_eq!(mock.body_json(0)["variables"], serde_json::json!({}));
    }
}
