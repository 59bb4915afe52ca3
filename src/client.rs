//! main client
//!
//! logs in once and hands every resource client its own copy of the
//! resulting credentials.

use crate::auth::Authenticator;
use crate::config::ClientConfig;
use crate::credentials::Credentials;
use crate::error::{Result, ResultExt};
use crate::executor::Executor;
use crate::resources::{
    require, EnvironmentClient, ExperimentClient, InfrastructureClient, ProbeClient,
    ProjectClient, Scope,
};
use crate::rest::RestCaller;
use crate::transport::{ReqwestTransport, Transport};
use std::fmt;
use std::sync::Arc;

/// authenticated litmus client
///
/// cheap to clone; clones share the transport and credentials.
#[derive(Clone)]
pub struct Client {
    config: Arc<ClientConfig>,
    transport: Arc<dyn Transport>,
    credentials: Credentials,
    projects: ProjectClient,
    environments: EnvironmentClient,
    experiments: ExperimentClient,
    infrastructure: InfrastructureClient,
    probes: ProbeClient,
}

impl Client {
    /// validate `config`, build the http client, and log in
    ///
    /// ```no_run
    /// use litmus::{Client, ClientConfig};
    ///
    /// let client = Client::new(ClientConfig::new("http://localhost:8080", "admin", "litmus"))?;
    /// for project in client.projects().list()?.projects {
    ///     println!("{} {}", project.project_id, project.name);
    /// }
    /// # Ok::<(), litmus::Error>(())
    /// ```
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let transport = ReqwestTransport::new(&config)?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// same as [`Client::new`] over a caller supplied transport
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        config.validate()?;
        let config = Arc::new(config);
        let credentials = login(&config, &transport)?;
        Ok(Self::assemble(config, transport, credentials))
    }

    /// a new client scoped to `project_id`; this client is left as is
    pub fn with_project(&self, project_id: &str) -> Result<Self> {
        require(project_id, "project ID")?;
        tracing::info!(project_id, "project selected");
        Ok(Self::assemble(
            self.config.clone(),
            self.transport.clone(),
            self.credentials.with_project(project_id),
        ))
    }

    /// log in again and return a client with fresh credentials.
    ///
    /// the active project carries over. this client is left as is.
    pub fn reauthenticate(&self) -> Result<Self> {
        let credentials = login(&self.config, &self.transport)?;
        let credentials = match self.credentials.project_id() {
            Some(project_id) => credentials.with_project(project_id),
            None => credentials,
        };
        Ok(Self::assemble(
            self.config.clone(),
            self.transport.clone(),
            credentials,
        ))
    }

    fn assemble(config: Arc<ClientConfig>, transport: Arc<dyn Transport>, credentials: Credentials) -> Self {
        let executor = Executor::new(transport.clone()).with_graphql_path(config.graphql_path.clone());
        let scope = || Scope::new(executor.clone(), credentials.clone());

        let projects = ProjectClient::new(
            RestCaller::new(transport.clone(), config.auth_path.clone()),
            credentials.clone(),
        );
        let environments = EnvironmentClient::new(scope());
        let experiments = ExperimentClient::new(scope());
        let infrastructure = InfrastructureClient::new(scope());
        let probes = ProbeClient::new(scope());

        Self {
            config,
            transport,
            credentials,
            projects,
            environments,
            experiments,
            infrastructure,
            probes,
        }
    }

    /// access the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// credentials of this session
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn projects(&self) -> &ProjectClient {
        &self.projects
    }

    pub fn environments(&self) -> &EnvironmentClient {
        &self.environments
    }

    pub fn experiments(&self) -> &ExperimentClient {
        &self.experiments
    }

    pub fn infrastructure(&self) -> &InfrastructureClient {
        &self.infrastructure
    }

    pub fn probes(&self) -> &ProbeClient {
        &self.probes
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

fn login(config: &ClientConfig, transport: &Arc<dyn Transport>) -> Result<Credentials> {
    let endpoint = config.endpoint()?;
    let credentials = Authenticator::new(transport.clone())
        .with_auth_path(config.auth_path.clone())
        .login(endpoint, &config.username, &config.password)
        .context("authentication failed")?;

    Ok(match &config.project_id {
        Some(project_id) => credentials.with_project(project_id.clone()),
        None => credentials,
    })
}
