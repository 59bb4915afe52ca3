//! graphql documents
//!
//! fixed queries and mutations sent by the resource clients. they mirror
//! the chaos center schema and have to change together with it.

pub const LIST_ENVIRONMENTS: &str = r#"query listEnvironments($projectID: ID!, $request: ListEnvironmentRequest) {
  listEnvironments(projectID: $projectID, request: $request) {
    totalNoOfEnvironments
    environments {
      projectID
      environmentID
      name
      description
      tags
      type
      createdAt
      createdBy { userID username email }
      updatedAt
      updatedBy { userID username email }
      infraIDs
      isRemoved
    }
  }
}"#;

pub const GET_ENVIRONMENT: &str = r#"query getEnvironment($projectID: ID!, $environmentID: ID!) {
  getEnvironment(projectID: $projectID, environmentID: $environmentID) {
    projectID
    environmentID
    name
    description
    tags
    type
    createdAt
    createdBy { userID username email }
    updatedAt
    updatedBy { userID username email }
    infraIDs
    isRemoved
  }
}"#;

pub const CREATE_ENVIRONMENT: &str = r#"mutation createEnvironment($projectID: ID!, $request: CreateEnvironmentRequest) {
  createEnvironment(projectID: $projectID, request: $request) {
    projectID
    environmentID
    name
    description
    tags
    type
    createdAt
    updatedAt
    infraIDs
  }
}"#;

pub const UPDATE_ENVIRONMENT: &str = r#"mutation updateEnvironment($projectID: ID!, $request: UpdateEnvironmentRequest) {
  updateEnvironment(projectID: $projectID, request: $request)
}"#;

pub const DELETE_ENVIRONMENT: &str = r#"mutation deleteEnvironment($projectID: ID!, $environmentID: ID!) {
  deleteEnvironment(projectID: $projectID, environmentID: $environmentID)
}"#;

pub const SAVE_EXPERIMENT: &str = r#"mutation saveChaosExperiment($projectID: ID!, $request: SaveChaosExperimentRequest!) {
  saveChaosExperiment(projectID: $projectID, request: $request)
}"#;

pub const LIST_EXPERIMENTS: &str = r#"query listExperiment($projectID: ID!, $request: ListExperimentRequest!) {
  listExperiment(projectID: $projectID, request: $request) {
    totalNoOfExperiments
    experiments {
      experimentID
      experimentType
      experimentManifest
      cronSyntax
      name
      description
      tags
      infra { name infraID environmentID isActive }
      isCustomExperiment
      createdAt
      updatedAt
      createdBy { username email }
      updatedBy { username email }
      isRemoved
      recentExperimentRunDetails {
        experimentRunID
        phase
        resiliencyScore
        updatedAt
      }
    }
  }
}"#;

pub const LIST_EXPERIMENT_RUNS: &str = r#"query listExperimentRuns($projectID: ID!, $request: ListExperimentRunRequest!) {
  listExperimentRun(projectID: $projectID, request: $request) {
    totalNoOfExperimentRuns
    experimentRuns {
      projectID
      experimentRunID
      experimentID
      experimentName
      notifyID
      infra { name infraID environmentID isActive }
      phase
      resiliencyScore
      faultsPassed
      faultsFailed
      faultsAwaited
      faultsStopped
      faultsNa
      totalFaults
      updatedAt
      updatedBy { username }
    }
  }
}"#;

pub const GET_EXPERIMENT: &str = r#"query getExperiment($projectID: ID!, $experimentID: String!) {
  getExperiment(projectID: $projectID, experimentID: $experimentID) {
    experimentDetails {
      experimentID
      experimentType
      experimentManifest
      cronSyntax
      name
      description
      tags
      infra { name infraID environmentID isActive }
      createdAt
      updatedAt
      isRemoved
      recentExperimentRunDetails {
        experimentRunID
        phase
        resiliencyScore
        updatedAt
      }
    }
    averageResiliencyScore
  }
}"#;

pub const GET_EXPERIMENT_RUN: &str = r#"query getExperimentRun($projectID: ID!, $experimentRunID: ID, $notifyID: ID) {
  getExperimentRun(projectID: $projectID, experimentRunID: $experimentRunID, notifyID: $notifyID) {
    projectID
    experimentRunID
    experimentID
    experimentName
    notifyID
    infra { name infraID environmentID isActive }
    phase
    resiliencyScore
    faultsPassed
    faultsFailed
    faultsAwaited
    faultsStopped
    faultsNa
    totalFaults
    updatedAt
    updatedBy { username }
  }
}"#;

pub const DELETE_EXPERIMENT: &str = r#"mutation deleteChaosExperiment($projectID: ID!, $experimentID: String!, $experimentRunID: String) {
  deleteChaosExperiment(projectID: $projectID, experimentID: $experimentID, experimentRunID: $experimentRunID)
}"#;

pub const RUN_EXPERIMENT: &str = r#"mutation runChaosExperiment($experimentID: String!, $projectID: ID!) {
  runChaosExperiment(experimentID: $experimentID, projectID: $projectID) {
    notifyID
  }
}"#;

pub const LIST_INFRAS: &str = r#"query listInfras($projectID: ID!, $request: ListInfraRequest) {
  listInfras(projectID: $projectID, request: $request) {
    totalNoOfInfras
    infras {
      infraID
      projectID
      name
      description
      tags
      environmentID
      platformName
      isActive
      isInfraConfirmed
      isRemoved
      infraNamespace
      serviceAccount
      infraScope
      infraNsExists
      infraSaExists
      startTime
      version
      lastExperimentTimestamp
      noOfExperiments
      noOfExperimentRuns
      createdAt
      updatedAt
      createdBy { username }
      updatedBy { username }
    }
  }
}"#;

pub const REGISTER_INFRA: &str = r#"mutation registerInfra($projectID: ID!, $request: RegisterInfraRequest!) {
  registerInfra(projectID: $projectID, request: $request) {
    token
    infraID
    name
    manifest
  }
}"#;

pub const DELETE_INFRA: &str = r#"mutation deleteInfra($projectID: ID!, $infraID: String!) {
  deleteInfra(projectID: $projectID, infraID: $infraID)
}"#;

pub const SERVER_VERSION: &str = r#"query getServerVersion {
  getServerVersion {
    key
    value
  }
}"#;

pub const LIST_PROBES: &str = r#"query listProbes($projectID: ID!, $infrastructureType: InfrastructureType, $probeNames: [ID!], $filter: ProbeFilterInput) {
  listProbes(projectID: $projectID, infrastructureType: $infrastructureType, probeNames: $probeNames, filter: $filter) {
    name
    description
    tags
    type
    infrastructureType
    createdAt
    createdBy { username }
    updatedAt
    updatedBy { username }
    referencedBy
  }
}"#;

pub const GET_PROBE: &str = r#"query getProbe($projectID: ID!, $probeName: ID!) {
  getProbe(projectID: $projectID, probeName: $probeName) {
    name
    description
    tags
    type
    infrastructureType
    kubernetesHTTPProperties {
      probeTimeout
      interval
      retry
      attempt
      probePollingInterval
      initialDelay
      evaluationTimeout
      stopOnFailure
      url
      method {
        get { criteria responseCode }
        post { contentType body bodyPath criteria responseCode }
      }
      insecureSkipVerify
    }
    kubernetesCMDProperties {
      probeTimeout
      interval
      retry
      attempt
      probePollingInterval
      initialDelay
      evaluationTimeout
      stopOnFailure
      command
      comparator { type value criteria }
      source
    }
    k8sProperties {
      probeTimeout
      interval
      retry
      attempt
      probePollingInterval
      initialDelay
      evaluationTimeout
      stopOnFailure
      group
      version
      resource
      namespace
      resourceNames
      fieldSelector
      labelSelector
      operation
    }
    promProperties {
      probeTimeout
      interval
      retry
      attempt
      probePollingInterval
      initialDelay
      evaluationTimeout
      stopOnFailure
      endpoint
      query
      queryPath
      comparator { type value criteria }
    }
    createdAt
    createdBy { username }
    updatedAt
    updatedBy { username }
    referencedBy
  }
}"#;

pub const GET_PROBE_YAML: &str = r#"query getProbeYAML($projectID: ID!, $request: GetProbeYAMLRequest!) {
  getProbeYAML(projectID: $projectID, request: $request)
}"#;

pub const ADD_PROBE: &str = r#"mutation addProbe($projectID: ID!, $request: ProbeRequest!) {
  addProbe(projectID: $projectID, request: $request) {
    name
    description
    tags
    type
    infrastructureType
    kubernetesHTTPProperties {
      probeTimeout
      interval
      url
      method {
        get { criteria responseCode }
        post { contentType body bodyPath criteria responseCode }
      }
      insecureSkipVerify
    }
    kubernetesCMDProperties {
      probeTimeout
      interval
      command
      comparator { type value criteria }
      source
    }
    k8sProperties {
      probeTimeout
      interval
      group
      version
      resource
      namespace
      operation
    }
    promProperties {
      probeTimeout
      interval
      endpoint
      query
      comparator { type value criteria }
    }
    createdAt
    updatedAt
  }
}"#;

pub const UPDATE_PROBE: &str = r#"mutation updateProbe($projectID: ID!, $request: ProbeRequest!) {
  updateProbe(projectID: $projectID, request: $request)
}"#;

pub const DELETE_PROBE: &str = r#"mutation deleteProbe($projectID: ID!, $probeName: ID!) {
  deleteProbe(projectID: $projectID, probeName: $probeName)
}"#;

pub const VALIDATE_UNIQUE_PROBE: &str = r#"query validateUniqueProbe($projectID: ID!, $probeName: ID!) {
  validateUniqueProbe(projectID: $projectID, probeName: $probeName)
}"#;

/// every document above, keyed by operation name
pub const ALL: &[(&str, &str)] = &[
    ("listEnvironments", LIST_ENVIRONMENTS),
    ("getEnvironment", GET_ENVIRONMENT),
    ("createEnvironment", CREATE_ENVIRONMENT),
    ("updateEnvironment", UPDATE_ENVIRONMENT),
    ("deleteEnvironment", DELETE_ENVIRONMENT),
    ("saveChaosExperiment", SAVE_EXPERIMENT),
    ("listExperiment", LIST_EXPERIMENTS),
    ("listExperimentRuns", LIST_EXPERIMENT_RUNS),
    ("getExperiment", GET_EXPERIMENT),
    ("getExperimentRun", GET_EXPERIMENT_RUN),
    ("deleteChaosExperiment", DELETE_EXPERIMENT),
    ("runChaosExperiment", RUN_EXPERIMENT),
    ("listInfras", LIST_INFRAS),
    ("registerInfra", REGISTER_INFRA),
    ("deleteInfra", DELETE_INFRA),
    ("getServerVersion", SERVER_VERSION),
    ("listProbes", LIST_PROBES),
    ("getProbe", GET_PROBE),
    ("getProbeYAML", GET_PROBE_YAML),
    ("addProbe", ADD_PROBE),
    ("updateProbe", UPDATE_PROBE),
    ("deleteProbe", DELETE_PROBE),
    ("validateUniqueProbe", VALIDATE_UNIQUE_PROBE),
];
