//! resource clients
//!
//! each client validates its input locally, builds typed variables, and
//! hands a fixed document to the [`Executor`]. clients hold their own copy
//! of the session credentials and keep no other state.

use crate::credentials::Credentials;
use crate::error::{Error, Result};
use crate::executor::Executor;
use crate::operation::Operation;
use serde::{Deserialize, Serialize};

/// declare a unit struct implementing [`Operation`]
macro_rules! graphql_operation {
    ($name:ident, $field:literal, $query:expr, $variables:ty => $response:ty) => {
        pub(crate) struct $name;

        impl crate::operation::Operation for $name {
            const FIELD: &'static str = $field;
            const QUERY: &'static str = $query;
            type Variables = $variables;
            type Response = $response;
        }
    };
}

mod environments;
mod experiments;
mod infrastructure;
mod probes;
mod projects;

pub use environments::{
    CreateEnvironmentRequest, Environment, EnvironmentClient, EnvironmentFilter, EnvironmentType,
    ListEnvironmentRequest, ListEnvironmentResponse, UpdateEnvironmentRequest,
};
pub use experiments::{
    Experiment, ExperimentClient, ExperimentDetails, ExperimentFilter, ExperimentInfra,
    ExperimentRun, ExperimentRunFilter, ExperimentRunPhase, ListExperimentRequest,
    ListExperimentResponse, ListExperimentRunRequest, ListExperimentRunResponse, RecentRun,
    SaveExperimentRequest,
};
pub use infrastructure::{
    Infra, InfraFilter, InfraScope, InfrastructureClient, InfrastructureType, ListInfraRequest,
    ListInfraResponse, RegisterInfraRequest, RegisterInfraResponse, ServerVersion, Toleration,
};
pub use probes::{
    CmdProbeProperties, Comparator, GetMethod, HttpMethod, HttpProbeProperties, K8sProbeProperties,
    PostMethod, Probe, ProbeClient, ProbeFilter, ProbeMode, ProbeProperties, ProbeRequest,
    ProbeType, PromProbeProperties,
};
pub use projects::{Member, Project, ProjectClient, ProjectList, UserWithProjects};

/// user reference attached to created/updated records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDetails {
    #[serde(rename = "userID", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// executor plus the credentials one resource client was built with
#[derive(Debug, Clone)]
pub(crate) struct Scope {
    executor: Executor,
    credentials: Credentials,
}

impl Scope {
    pub(crate) fn new(executor: Executor, credentials: Credentials) -> Self {
        Self {
            executor,
            credentials,
        }
    }

    /// active project, owned for use in variables
    pub(crate) fn project_id(&self) -> Result<String> {
        self.credentials.require_project().map(str::to_string)
    }

    pub(crate) fn run<O: Operation>(&self, variables: &O::Variables, context: &str) -> Result<O::Response> {
        self.executor
            .execute_operation::<O>(&self.credentials, variables, context)
    }

    /// run without an authorization header
    pub(crate) fn run_anonymous<O: Operation>(
        &self,
        variables: &O::Variables,
        context: &str,
    ) -> Result<O::Response> {
        let anonymous = Credentials::new(
            self.credentials.endpoint().clone(),
            "",
            self.credentials.username(),
        );
        self.executor
            .execute_operation::<O>(&anonymous, variables, context)
    }
}

/// `{projectID, request}` variables shared by most list and save calls
#[derive(Debug, Serialize)]
pub(crate) struct ProjectRequest<R> {
    #[serde(rename = "projectID")]
    pub(crate) project_id: String,
    pub(crate) request: R,
}

/// variables of documents that take none
#[derive(Debug, Serialize)]
pub(crate) struct NoVariables {}

/// reject an empty identifier
pub(crate) fn require(value: &str, what: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::validation(format!("{what} cannot be empty")));
    }
    Ok(())
}

/// server totals arrive as optional signed ints
pub(crate) fn total(count: Option<i64>, fallback: usize) -> usize {
    count
        .and_then(|count| usize::try_from(count).ok())
        .unwrap_or(fallback)
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::transport::mock::MockTransport;
    use std::sync::Arc;
    use url::Url;

    pub(crate) fn credentials() -> Credentials {
        Credentials::new(Url::parse("http://localhost:8080").unwrap(), "tok", "admin")
            .with_project("p1")
    }

    pub(crate) fn scope(mock: &Arc<MockTransport>) -> Scope {
        Scope::new(Executor::new(mock.clone()), credentials())
    }

    pub(crate) fn scope_without_project(mock: &Arc<MockTransport>) -> Scope {
        Scope::new(Executor::new(mock.clone()), credentials().with_project(""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_rejects_blank() {
        assert!(require("env-1", "environment ID").is_ok());
        let err = require("  ", "environment ID").unwrap_err();
        assert_eq!(err.to_string(), "validation error: environment ID cannot be empty");
    }

    #[test]
    fn test_total_falls_back_on_missing_or_negative() {
        assert_eq!(total(Some(12), 3), 12);
        assert_eq!(total(None, 3), 3);
        assert_eq!(total(Some(-1), 3), 3);
    }

    #[test]
    fn test_project_request_shape() {
        let variables = ProjectRequest {
            project_id: "p1".to_string(),
            request: NoVariables {},
        };
        assert_eq!(
            serde_json::to_value(&variables).unwrap(),
            serde_json::json!({"projectID": "p1", "request": {}})
        );
    }
}
