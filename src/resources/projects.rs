//! projects, served by the rest auth api

use super::require;
use crate::credentials::Credentials;
use crate::error::Result;
use crate::graphql::null_default;
use crate::rest::RestCaller;
use serde::{Deserialize, Serialize};

/// project membership entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    #[serde(rename = "userID", alias = "UserID", default)]
    pub user_id: String,
    #[serde(alias = "Username", alias = "userName", default)]
    pub username: String,
    #[serde(alias = "Role", default)]
    pub role: Option<String>,
}

/// a project; the user detail endpoint capitalizes its keys
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    #[serde(rename = "projectID", alias = "ProjectID", alias = "ID")]
    pub project_id: String,
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(rename = "createdAt", alias = "CreatedAt", default)]
    pub created_at: Option<i64>,
    #[serde(alias = "Members", default, deserialize_with = "null_default")]
    pub members: Vec<Member>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProjectList {
    #[serde(default, deserialize_with = "null_default")]
    pub projects: Vec<Project>,
    #[serde(rename = "totalNumberOfProjects", default)]
    pub total_number_of_projects: usize,
}

/// a user and the projects they belong to
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserWithProjects {
    #[serde(rename = "ID", alias = "userID", default)]
    pub user_id: String,
    #[serde(rename = "Projects", alias = "projects", default, deserialize_with = "null_default")]
    pub projects: Vec<Project>,
}

#[derive(Serialize)]
struct CreateProjectBody<'a> {
    #[serde(rename = "projectName")]
    project_name: &'a str,
}

/// servers answer a create either with the project itself or wrapped in
/// a `createProject` member
#[derive(Deserialize)]
#[serde(untagged)]
enum CreatedProject {
    Wrapped {
        #[serde(rename = "createProject")]
        create_project: Project,
    },
    Direct(Project),
}

/// project operations; these need a token but no active project
#[derive(Debug, Clone)]
pub struct ProjectClient {
    rest: RestCaller,
    credentials: Credentials,
}

impl ProjectClient {
    pub(crate) fn new(rest: RestCaller, credentials: Credentials) -> Self {
        Self { rest, credentials }
    }

    /// projects visible to the logged in user
    pub fn list(&self) -> Result<ProjectList> {
        let url = self.rest.url(&self.credentials, &["list_projects"])?;
        self.rest.get(&self.credentials, url, "listing projects")
    }

    pub fn create(&self, name: &str) -> Result<Project> {
        require(name, "project name")?;
        let url = self.rest.url(&self.credentials, &["create_project"])?;
        let created: CreatedProject = self.rest.post(
            &self.credentials,
            url,
            &CreateProjectBody { project_name: name },
            "creating project",
        )?;

        let project = match created {
            CreatedProject::Wrapped { create_project } => create_project,
            CreatedProject::Direct(project) => project,
        };
        tracing::info!(project_id = %project.project_id, name = %project.name, "project created");
        Ok(project)
    }

    /// the logged in user with every project membership
    pub fn details(&self) -> Result<UserWithProjects> {
        let username = self.credentials.username();
        require(username, "username")?;
        let url = self
            .rest
            .url(&self.credentials, &["get_user_with_project", username])?;
        self.rest.get(&self.credentials, url, "getting project details")
    }
}
