use litmus::{Client, ClientConfig, ListEnvironmentRequest, ListExperimentRequest, ProbeFilter};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("litmus=info")))
        .init();

    let client = Client::new(ClientConfig::from_env())?;

    let version = client.infrastructure().server_version()?;
    println!("server version: {}", version.value);

    let projects = client.projects().list()?;
    for project in &projects.projects {
        println!("project {} {}", project.project_id, project.name);
    }

    if client.credentials().project_id().is_none() {
        println!("no project selected, set LITMUS_PROJECT_ID to list project resources");
        return Ok(());
    }

    let environments = client.environments().list(ListEnvironmentRequest::default())?;
    for environment in &environments.environments {
        println!("environment {} {}", environment.environment_id, environment.name);
    }

    let experiments = client.experiments().list(ListExperimentRequest::default())?;
    for experiment in &experiments.experiments {
        println!("experiment {} {}", experiment.experiment_id, experiment.name);
    }

    for probe in client.probes().list(ProbeFilter::default())? {
        println!("probe {}", probe.name);
    }

    Ok(())
}
