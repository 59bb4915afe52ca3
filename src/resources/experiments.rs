//! chaos experiments and their runs

use super::{require, total, ProjectRequest, Scope, UserDetails};
use crate::error::{Error, Result};
use crate::graphql::null_default;
use crate::pagination::{Page, Pagination, Paginator};
use crate::queries;
use serde::{Deserialize, Serialize};
use std::fmt;

/// lifecycle phase of an experiment run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExperimentRunPhase {
    Queued,
    Running,
    Completed,
    #[serde(rename = "Completed_With_Error")]
    CompletedWithError,
    #[serde(rename = "Completed_With_Probe_Failure")]
    CompletedWithProbeFailure,
    Error,
    Stopped,
    Terminated,
    Skipped,
    Timeout,
    #[serde(rename = "NA")]
    NotAvailable,
    #[default]
    #[serde(other)]
    Unknown,
}

impl ExperimentRunPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "Queued",
            Self::Running => "Running",
            Self::Completed => "Completed",
            Self::CompletedWithError => "Completed_With_Error",
            Self::CompletedWithProbeFailure => "Completed_With_Probe_Failure",
            Self::Error => "Error",
            Self::Stopped => "Stopped",
            Self::Terminated => "Terminated",
            Self::Skipped => "Skipped",
            Self::Timeout => "Timeout",
            Self::NotAvailable => "NA",
            Self::Unknown => "Unknown",
        }
    }

    /// the run has stopped progressing, successfully or not
    pub fn is_finished(&self) -> bool {
        !matches!(self, Self::Queued | Self::Running | Self::Unknown)
    }
}

impl fmt::Display for ExperimentRunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// infrastructure an experiment is bound to
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperimentInfra {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "infraID", default)]
    pub infra_id: String,
    #[serde(rename = "environmentID", default)]
    pub environment_id: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentRun {
    #[serde(rename = "experimentRunID")]
    pub experiment_run_id: String,
    #[serde(default)]
    pub phase: ExperimentRunPhase,
    #[serde(default)]
    pub resiliency_score: Option<f64>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experiment {
    #[serde(rename = "experimentID")]
    pub experiment_id: String,
    #[serde(default)]
    pub experiment_type: Option<String>,
    #[serde(default)]
    pub experiment_manifest: String,
    #[serde(default)]
    pub cron_syntax: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "null_default")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub infra: Option<ExperimentInfra>,
    #[serde(default)]
    pub is_custom_experiment: Option<bool>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub created_by: Option<UserDetails>,
    #[serde(default)]
    pub updated_by: Option<UserDetails>,
    #[serde(default)]
    pub is_removed: Option<bool>,
    #[serde(default, deserialize_with = "null_default")]
    pub recent_experiment_run_details: Vec<RecentRun>,
}

/// one experiment plus its average resiliency score
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperimentDetails {
    pub experiment_details: Experiment,
    #[serde(default)]
    pub average_resiliency_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperimentRun {
    #[serde(rename = "projectID", default)]
    pub project_id: String,
    #[serde(rename = "experimentRunID")]
    pub experiment_run_id: String,
    #[serde(rename = "experimentID", default)]
    pub experiment_id: String,
    #[serde(default)]
    pub experiment_name: String,
    #[serde(rename = "notifyID", default)]
    pub notify_id: Option<String>,
    #[serde(default)]
    pub infra: Option<ExperimentInfra>,
    #[serde(default)]
    pub phase: ExperimentRunPhase,
    #[serde(default)]
    pub resiliency_score: Option<f64>,
    #[serde(default)]
    pub faults_passed: Option<i64>,
    #[serde(default)]
    pub faults_failed: Option<i64>,
    #[serde(default)]
    pub faults_awaited: Option<i64>,
    #[serde(default)]
    pub faults_stopped: Option<i64>,
    #[serde(default)]
    pub faults_na: Option<i64>,
    #[serde(default)]
    pub total_faults: Option<i64>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub updated_by: Option<UserDetails>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ExperimentFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experiment_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infra_name: Option<String>,
    #[serde(rename = "infraID", default, skip_serializing_if = "Option::is_none")]
    pub infra_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infra_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub infra_types: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ListExperimentRequest {
    #[serde(rename = "experimentIDs", default, skip_serializing_if = "Vec::is_empty")]
    pub experiment_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<ExperimentFilter>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListExperimentResponse {
    #[serde(default)]
    pub total_no_of_experiments: Option<i64>,
    #[serde(default, deserialize_with = "null_default")]
    pub experiments: Vec<Experiment>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ExperimentRunFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experiment_name: Option<String>,
    #[serde(rename = "infraID", default, skip_serializing_if = "Option::is_none")]
    pub infra_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub experiment_run_status: Vec<ExperimentRunPhase>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ListExperimentRunRequest {
    #[serde(rename = "experimentRunIDs", default, skip_serializing_if = "Vec::is_empty")]
    pub experiment_run_ids: Vec<String>,
    #[serde(rename = "experimentIDs", default, skip_serializing_if = "Vec::is_empty")]
    pub experiment_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<ExperimentRunFilter>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListExperimentRunResponse {
    #[serde(default)]
    pub total_no_of_experiment_runs: Option<i64>,
    #[serde(default, deserialize_with = "null_default")]
    pub experiment_runs: Vec<ExperimentRun>,
}

/// body of a save (create or update) call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SaveExperimentRequest {
    /// experiment id; the server assigns one on create when empty
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// workflow manifest, yaml or json
    pub manifest: String,
    #[serde(rename = "infraID")]
    pub infra_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cron_syntax: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub experiment_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_custom_experiment: Option<bool>,
}

impl SaveExperimentRequest {
    pub fn new(name: impl Into<String>, manifest: impl Into<String>, infra_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            manifest: manifest.into(),
            infra_id: infra_id.into(),
            ..Default::default()
        }
    }

    fn validate(&self) -> Result<()> {
        require(&self.name, "experiment name")?;
        require(&self.manifest, "experiment manifest")?;
        require(&self.infra_id, "infrastructure ID")
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ExperimentVariables {
    #[serde(rename = "projectID")]
    project_id: String,
    #[serde(rename = "experimentID")]
    experiment_id: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct DeleteVariables {
    #[serde(rename = "projectID")]
    project_id: String,
    #[serde(rename = "experimentID")]
    experiment_id: String,
    #[serde(rename = "experimentRunID", skip_serializing_if = "Option::is_none")]
    experiment_run_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RunLookupVariables {
    #[serde(rename = "projectID")]
    project_id: String,
    #[serde(rename = "experimentRunID", skip_serializing_if = "Option::is_none")]
    experiment_run_id: Option<String>,
    #[serde(rename = "notifyID", skip_serializing_if = "Option::is_none")]
    notify_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RunResponse {
    #[serde(rename = "notifyID")]
    notify_id: String,
}

graphql_operation!(SaveExperiment, "saveChaosExperiment", queries::SAVE_EXPERIMENT,
    ProjectRequest<SaveExperimentRequest> => String);
graphql_operation!(ListExperiments, "listExperiment", queries::LIST_EXPERIMENTS,
    ProjectRequest<ListExperimentRequest> => ListExperimentResponse);
graphql_operation!(ListExperimentRuns, "listExperimentRun", queries::LIST_EXPERIMENT_RUNS,
    ProjectRequest<ListExperimentRunRequest> => ListExperimentRunResponse);
graphql_operation!(GetExperiment, "getExperiment", queries::GET_EXPERIMENT,
    ExperimentVariables => ExperimentDetails);
graphql_operation!(GetExperimentRun, "getExperimentRun", queries::GET_EXPERIMENT_RUN,
    RunLookupVariables => ExperimentRun);
graphql_operation!(DeleteExperiment, "deleteChaosExperiment", queries::DELETE_EXPERIMENT,
    DeleteVariables => bool);
graphql_operation!(RunExperiment, "runChaosExperiment", queries::RUN_EXPERIMENT,
    ExperimentVariables => RunResponse);

/// experiment operations scoped to the active project
#[derive(Debug, Clone)]
pub struct ExperimentClient {
    scope: Scope,
}

impl ExperimentClient {
    pub(crate) fn new(scope: Scope) -> Self {
        Self { scope }
    }

    pub fn list(&self, request: ListExperimentRequest) -> Result<ListExperimentResponse> {
        let variables = ProjectRequest {
            project_id: self.scope.project_id()?,
            request,
        };
        self.scope
            .run::<ListExperiments>(&variables, "listing experiments")
    }

    /// walk every page of experiments
    pub fn list_all(&self, page_size: u32) -> Result<Vec<Experiment>> {
        Paginator::new(page_size, |pagination| {
            let response = self.list(ListExperimentRequest {
                pagination: Some(pagination),
                ..Default::default()
            })?;
            let fetched = response.experiments.len();
            Ok(Page {
                total: total(response.total_no_of_experiments, fetched),
                items: response.experiments,
            })
        })
        .collect_all()
    }

    pub fn list_runs(&self, request: ListExperimentRunRequest) -> Result<ListExperimentRunResponse> {
        let variables = ProjectRequest {
            project_id: self.scope.project_id()?,
            request,
        };
        self.scope
            .run::<ListExperimentRuns>(&variables, "listing experiment runs")
    }

    pub fn get(&self, experiment_id: &str) -> Result<ExperimentDetails> {
        let variables = self.experiment_variables(experiment_id)?;
        self.scope
            .run::<GetExperiment>(&variables, "getting experiment")
    }

    pub fn get_run(&self, experiment_run_id: &str) -> Result<ExperimentRun> {
        let project_id = self.scope.project_id()?;
        require(experiment_run_id, "experiment run ID")?;
        let variables = RunLookupVariables {
            project_id,
            experiment_run_id: Some(experiment_run_id.to_string()),
            notify_id: None,
        };
        self.scope
            .run::<GetExperimentRun>(&variables, "getting experiment run")
    }

    /// look a run up by the notify id returned from [`ExperimentClient::run`]
    pub fn get_run_by_notify_id(&self, notify_id: &str) -> Result<ExperimentRun> {
        let project_id = self.scope.project_id()?;
        require(notify_id, "notify ID")?;
        let variables = RunLookupVariables {
            project_id,
            experiment_run_id: None,
            notify_id: Some(notify_id.to_string()),
        };
        self.scope
            .run::<GetExperimentRun>(&variables, "getting experiment run")
    }

    pub fn run_phase(&self, experiment_run_id: &str) -> Result<ExperimentRunPhase> {
        self.get_run(experiment_run_id).map(|run| run.phase)
    }

    /// save a new experiment and return the server's message
    pub fn create(&self, request: SaveExperimentRequest) -> Result<String> {
        request.validate()?;
        self.save(request, "creating experiment")
    }

    /// save `request` over the experiment `experiment_id`
    pub fn update(&self, experiment_id: &str, mut request: SaveExperimentRequest) -> Result<String> {
        require(experiment_id, "experiment ID")?;
        request.validate()?;
        request.id = experiment_id.to_string();
        self.save(request, "updating experiment")
    }

    pub fn delete(&self, experiment_id: &str) -> Result<()> {
        self.remove(experiment_id, None, "deleting experiment")
    }

    /// delete a single run of an experiment
    pub fn delete_run(&self, experiment_id: &str, experiment_run_id: &str) -> Result<()> {
        require(experiment_run_id, "experiment run ID")?;
        self.remove(
            experiment_id,
            Some(experiment_run_id.to_string()),
            "deleting experiment run",
        )
    }

    /// start a run and return its notify id
    pub fn run(&self, experiment_id: &str) -> Result<String> {
        let variables = self.experiment_variables(experiment_id)?;
        let response = self
            .scope
            .run::<RunExperiment>(&variables, "running experiment")?;
        tracing::info!(experiment_id, notify_id = %response.notify_id, "experiment run started");
        Ok(response.notify_id)
    }

    fn save(&self, request: SaveExperimentRequest, context: &str) -> Result<String> {
        let variables = ProjectRequest {
            project_id: self.scope.project_id()?,
            request,
        };
        self.scope.run::<SaveExperiment>(&variables, context)
    }

    fn remove(&self, experiment_id: &str, experiment_run_id: Option<String>, context: &str) -> Result<()> {
        let project_id = self.scope.project_id()?;
        require(experiment_id, "experiment ID")?;
        let variables = DeleteVariables {
            project_id,
            experiment_id: experiment_id.to_string(),
            experiment_run_id,
        };

        if !self.scope.run::<DeleteExperiment>(&variables, context)? {
            return Err(Error::OperationFailed("experiment deletion was not successful".to_string())
                .context(context));
        }
        Ok(())
    }

    fn experiment_variables(&self, experiment_id: &str) -> Result<ExperimentVariables> {
        let project_id = self.scope.project_id()?;
        require(experiment_id, "experiment ID")?;
        Ok(ExperimentVariables {
            project_id,
            experiment_id: experiment_id.to_string(),
        })
    }
}
