//! chaos environments

use super::{require, total, ProjectRequest, Scope, UserDetails};
use crate::error::Result;
use crate::graphql::null_default;
use crate::pagination::{Page, Pagination, Paginator};
use crate::queries;
use serde::{Deserialize, Serialize};

/// deployment stage of an environment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnvironmentType {
    Prod,
    #[default]
    NonProd,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    #[serde(rename = "projectID", default)]
    pub project_id: String,
    #[serde(rename = "environmentID")]
    pub environment_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub tags: Vec<String>,
    #[serde(rename = "type", default)]
    pub environment_type: EnvironmentType,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub created_by: Option<UserDetails>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub updated_by: Option<UserDetails>,
    #[serde(rename = "infraIDs", default, deserialize_with = "null_default")]
    pub infra_ids: Vec<String>,
    #[serde(default)]
    pub is_removed: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EnvironmentFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub environment_type: Option<EnvironmentType>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ListEnvironmentRequest {
    #[serde(rename = "environmentIDs", default, skip_serializing_if = "Vec::is_empty")]
    pub environment_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<EnvironmentFilter>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEnvironmentResponse {
    #[serde(default)]
    pub total_no_of_environments: Option<i64>,
    #[serde(default, deserialize_with = "null_default")]
    pub environments: Vec<Environment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateEnvironmentRequest {
    #[serde(rename = "environmentID")]
    pub environment_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub environment_type: EnvironmentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl CreateEnvironmentRequest {
    pub fn new(environment_id: impl Into<String>, name: impl Into<String>, environment_type: EnvironmentType) -> Self {
        Self {
            environment_id: environment_id.into(),
            name: name.into(),
            environment_type,
            description: None,
            tags: Vec::new(),
        }
    }

    fn validate(&self) -> Result<()> {
        require(&self.environment_id, "environment ID")?;
        require(&self.name, "environment name")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateEnvironmentRequest {
    #[serde(rename = "environmentID")]
    pub environment_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub environment_type: Option<EnvironmentType>,
}

#[derive(Debug, Serialize)]
pub(crate) struct EnvironmentVariables {
    #[serde(rename = "projectID")]
    project_id: String,
    #[serde(rename = "environmentID")]
    environment_id: String,
}

graphql_operation!(ListEnvironments, "listEnvironments", queries::LIST_ENVIRONMENTS,
    ProjectRequest<ListEnvironmentRequest> => ListEnvironmentResponse);
graphql_operation!(GetEnvironment, "getEnvironment", queries::GET_ENVIRONMENT,
    EnvironmentVariables => Environment);
graphql_operation!(CreateEnvironment, "createEnvironment", queries::CREATE_ENVIRONMENT,
    ProjectRequest<CreateEnvironmentRequest> => Environment);
graphql_operation!(UpdateEnvironment, "updateEnvironment", queries::UPDATE_ENVIRONMENT,
    ProjectRequest<UpdateEnvironmentRequest> => String);
graphql_operation!(DeleteEnvironment, "deleteEnvironment", queries::DELETE_ENVIRONMENT,
    EnvironmentVariables => String);

/// environment operations scoped to the active project
#[derive(Debug, Clone)]
pub struct EnvironmentClient {
    scope: Scope,
}

impl EnvironmentClient {
    pub(crate) fn new(scope: Scope) -> Self {
        Self { scope }
    }

    pub fn list(&self, request: ListEnvironmentRequest) -> Result<ListEnvironmentResponse> {
        let variables = ProjectRequest {
            project_id: self.scope.project_id()?,
            request,
        };
        self.scope
            .run::<ListEnvironments>(&variables, "listing environments")
    }

    /// walk every page of environments
    pub fn list_all(&self, page_size: u32) -> Result<Vec<Environment>> {
        Paginator::new(page_size, |pagination| {
            let response = self.list(ListEnvironmentRequest {
                pagination: Some(pagination),
                ..Default::default()
            })?;
            let fetched = response.environments.len();
            Ok(Page {
                total: total(response.total_no_of_environments, fetched),
                items: response.environments,
            })
        })
        .collect_all()
    }

    pub fn get(&self, environment_id: &str) -> Result<Environment> {
        let variables = self.environment_variables(environment_id)?;
        self.scope
            .run::<GetEnvironment>(&variables, "getting environment")
    }

    pub fn create(&self, request: CreateEnvironmentRequest) -> Result<Environment> {
        request.validate()?;
        let variables = ProjectRequest {
            project_id: self.scope.project_id()?,
            request,
        };
        self.scope
            .run::<CreateEnvironment>(&variables, "creating environment")
    }

    /// apply `request` and return the server's confirmation message
    pub fn update(&self, request: UpdateEnvironmentRequest) -> Result<String> {
        require(&request.environment_id, "environment ID")?;
        let variables = ProjectRequest {
            project_id: self.scope.project_id()?,
            request,
        };
        self.scope
            .run::<UpdateEnvironment>(&variables, "updating environment")
    }

    pub fn delete(&self, environment_id: &str) -> Result<()> {
        let variables = self.environment_variables(environment_id)?;
        self.scope
            .run::<DeleteEnvironment>(&variables, "deleting environment")?;
        Ok(())
    }

    fn environment_variables(&self, environment_id: &str) -> Result<EnvironmentVariables> {
        let project_id = self.scope.project_id()?;
        require(environment_id, "environment ID")?;
        Ok(EnvironmentVariables {
            project_id,
            environment_id: environment_id.to_string(),
        })
    }
}
