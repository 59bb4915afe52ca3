//! resilience probes

use super::{require, InfrastructureType, ProjectRequest, Scope, UserDetails};
use crate::error::{Error, Result};
use crate::graphql::null_default;
use crate::queries;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProbeType {
    #[serde(rename = "httpProbe")]
    Http,
    #[serde(rename = "cmdProbe")]
    Cmd,
    #[serde(rename = "k8sProbe")]
    K8s,
    #[serde(rename = "promProbe")]
    Prom,
}

impl ProbeType {
    fn properties_field(&self) -> &'static str {
        match self {
            Self::Http => "kubernetesHTTPProperties",
            Self::Cmd => "kubernetesCMDProperties",
            Self::K8s => "k8sProperties",
            Self::Prom => "promProperties",
        }
    }
}

/// when a probe runs relative to the chaos injection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProbeMode {
    #[serde(rename = "SOT")]
    StartOfTest,
    #[serde(rename = "EOT")]
    EndOfTest,
    Edge,
    Continuous,
    OnChaos,
}

/// properties struct carrying the run settings every probe kind shares
macro_rules! probe_properties {
    ($(#[$meta:meta])* $name:ident { $($(#[$field_meta:meta])* $field:ident: $ty:ty,)* }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase", deny_unknown_fields)]
        pub struct $name {
            pub probe_timeout: String,
            pub interval: String,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub retry: Option<i32>,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub attempt: Option<i32>,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub probe_polling_interval: Option<String>,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub initial_delay: Option<String>,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub evaluation_timeout: Option<String>,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub stop_on_failure: Option<bool>,
            $($(#[$field_meta])* pub $field: $ty,)*
        }
    };
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GetMethod {
    pub criteria: String,
    pub response_code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PostMethod {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_path: Option<String>,
    pub criteria: String,
    pub response_code: String,
}

/// http method a probe calls with; set exactly one
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpMethod {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get: Option<GetMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<PostMethod>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Comparator {
    #[serde(rename = "type")]
    pub comparator_type: String,
    pub value: String,
    pub criteria: String,
}

probe_properties!(HttpProbeProperties {
    url: String,
    method: HttpMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    insecure_skip_verify: Option<bool>,
});

probe_properties!(CmdProbeProperties {
    command: String,
    comparator: Comparator,
    /// source pod spec, as json
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source: Option<String>,
});

probe_properties!(K8sProbeProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    group: Option<String>,
    version: String,
    resource: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    resource_names: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    field_selector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label_selector: Option<String>,
    operation: String,
});

probe_properties!(PromProbeProperties {
    endpoint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    query_path: Option<String>,
    comparator: Comparator,
});

/// one property block, tagged with the probe kind it belongs to
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeProperties {
    Http(HttpProbeProperties),
    Cmd(CmdProbeProperties),
    K8s(K8sProbeProperties),
    Prom(PromProbeProperties),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Probe {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub tags: Vec<String>,
    #[serde(rename = "type")]
    pub probe_type: ProbeType,
    #[serde(default)]
    pub infrastructure_type: Option<InfrastructureType>,
    #[serde(rename = "kubernetesHTTPProperties", default)]
    pub kubernetes_http_properties: Option<HttpProbeProperties>,
    #[serde(rename = "kubernetesCMDProperties", default)]
    pub kubernetes_cmd_properties: Option<CmdProbeProperties>,
    #[serde(default)]
    pub k8s_properties: Option<K8sProbeProperties>,
    #[serde(default)]
    pub prom_properties: Option<PromProbeProperties>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub created_by: Option<UserDetails>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub updated_by: Option<UserDetails>,
    /// number of experiments using the probe
    #[serde(default)]
    pub referenced_by: Option<i64>,
}

/// body of an add or update call.
///
/// exactly one property block must be set and it must match `probe_type`;
/// [`ProbeRequest::new`] always builds a consistent request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProbeRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(rename = "type")]
    pub probe_type: ProbeType,
    pub infrastructure_type: InfrastructureType,
    #[serde(rename = "kubernetesHTTPProperties", default, skip_serializing_if = "Option::is_none")]
    pub kubernetes_http_properties: Option<HttpProbeProperties>,
    #[serde(rename = "kubernetesCMDProperties", default, skip_serializing_if = "Option::is_none")]
    pub kubernetes_cmd_properties: Option<CmdProbeProperties>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub k8s_properties: Option<K8sProbeProperties>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prom_properties: Option<PromProbeProperties>,
}

impl ProbeRequest {
    pub fn new(name: impl Into<String>, properties: ProbeProperties) -> Self {
        let mut request = Self {
            name: name.into(),
            description: None,
            tags: Vec::new(),
            probe_type: ProbeType::Http,
            infrastructure_type: InfrastructureType::Kubernetes,
            kubernetes_http_properties: None,
            kubernetes_cmd_properties: None,
            k8s_properties: None,
            prom_properties: None,
        };
        match properties {
            ProbeProperties::Http(properties) => {
                request.probe_type = ProbeType::Http;
                request.kubernetes_http_properties = Some(properties);
            }
            ProbeProperties::Cmd(properties) => {
                request.probe_type = ProbeType::Cmd;
                request.kubernetes_cmd_properties = Some(properties);
            }
            ProbeProperties::K8s(properties) => {
                request.probe_type = ProbeType::K8s;
                request.k8s_properties = Some(properties);
            }
            ProbeProperties::Prom(properties) => {
                request.probe_type = ProbeType::Prom;
                request.prom_properties = Some(properties);
            }
        }
        request
    }

    pub fn validate(&self) -> Result<()> {
        require(&self.name, "probe name")?;

        let present = [
            (ProbeType::Http, self.kubernetes_http_properties.is_some()),
            (ProbeType::Cmd, self.kubernetes_cmd_properties.is_some()),
            (ProbeType::K8s, self.k8s_properties.is_some()),
            (ProbeType::Prom, self.prom_properties.is_some()),
        ];
        match present.iter().filter(|(_, set)| *set).count() {
            0 => return Err(Error::validation("no probe properties provided")),
            1 => {}
            _ => {
                return Err(Error::validation(
                    "multiple probe property types provided, only one is allowed",
                ))
            }
        }

        if !present.contains(&(self.probe_type, true)) {
            return Err(Error::validation(format!(
                "{} type requires {}",
                probe_type_name(self.probe_type),
                self.probe_type.properties_field()
            )));
        }
        Ok(())
    }
}

fn probe_type_name(probe_type: ProbeType) -> &'static str {
    match probe_type {
        ProbeType::Http => "httpProbe",
        ProbeType::Cmd => "cmdProbe",
        ProbeType::K8s => "k8sProbe",
        ProbeType::Prom => "promProbe",
    }
}

/// list filter; empty fields are not sent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProbeFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Vec::is_empty")]
    pub probe_types: Vec<ProbeType>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ListVariables {
    #[serde(rename = "projectID")]
    project_id: String,
    #[serde(rename = "infrastructureType", skip_serializing_if = "Option::is_none")]
    infrastructure_type: Option<InfrastructureType>,
    #[serde(rename = "probeNames", skip_serializing_if = "Option::is_none")]
    probe_names: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<ProbeFilter>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ProbeVariables {
    #[serde(rename = "projectID")]
    project_id: String,
    #[serde(rename = "probeName")]
    probe_name: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct YamlRequest {
    #[serde(rename = "probeName")]
    probe_name: String,
    mode: ProbeMode,
}

graphql_operation!(ListProbes, "listProbes", queries::LIST_PROBES,
    ListVariables => Vec<Probe>);
graphql_operation!(GetProbe, "getProbe", queries::GET_PROBE,
    ProbeVariables => Probe);
graphql_operation!(GetProbeYaml, "getProbeYAML", queries::GET_PROBE_YAML,
    ProjectRequest<YamlRequest> => String);
graphql_operation!(AddProbe, "addProbe", queries::ADD_PROBE,
    ProjectRequest<ProbeRequest> => Probe);
graphql_operation!(UpdateProbe, "updateProbe", queries::UPDATE_PROBE,
    ProjectRequest<ProbeRequest> => String);
graphql_operation!(DeleteProbe, "deleteProbe", queries::DELETE_PROBE,
    ProbeVariables => bool);
graphql_operation!(ValidateUniqueProbe, "validateUniqueProbe", queries::VALIDATE_UNIQUE_PROBE,
    ProbeVariables => bool);

/// probe operations scoped to the active project
#[derive(Debug, Clone)]
pub struct ProbeClient {
    scope: Scope,
}

impl ProbeClient {
    pub(crate) fn new(scope: Scope) -> Self {
        Self { scope }
    }

    pub fn list(&self, filter: ProbeFilter) -> Result<Vec<Probe>> {
        let variables = ListVariables {
            project_id: self.scope.project_id()?,
            infrastructure_type: None,
            probe_names: None,
            filter: (filter != ProbeFilter::default()).then_some(filter),
        };
        self.scope.run::<ListProbes>(&variables, "listing probes")
    }

    pub fn get(&self, probe_name: &str) -> Result<Probe> {
        let variables = self.probe_variables(probe_name)?;
        self.scope.run::<GetProbe>(&variables, "getting probe")
    }

    /// render the probe as the yaml snippet used inside experiment manifests
    pub fn yaml(&self, probe_name: &str, mode: ProbeMode) -> Result<String> {
        let project_id = self.scope.project_id()?;
        require(probe_name, "probe name")?;
        let variables = ProjectRequest {
            project_id,
            request: YamlRequest {
                probe_name: probe_name.to_string(),
                mode,
            },
        };
        self.scope
            .run::<GetProbeYaml>(&variables, "getting probe yaml")
    }

    pub fn create(&self, request: ProbeRequest) -> Result<Probe> {
        request.validate()?;
        let variables = ProjectRequest {
            project_id: self.scope.project_id()?,
            request,
        };
        self.scope.run::<AddProbe>(&variables, "creating probe")
    }

    /// replace a probe's settings and return the server's message
    pub fn update(&self, request: ProbeRequest) -> Result<String> {
        request.validate()?;
        let variables = ProjectRequest {
            project_id: self.scope.project_id()?,
            request,
        };
        self.scope.run::<UpdateProbe>(&variables, "updating probe")
    }

    pub fn delete(&self, probe_name: &str) -> Result<()> {
        let variables = self.probe_variables(probe_name)?;
        if !self.scope.run::<DeleteProbe>(&variables, "deleting probe")? {
            return Err(Error::OperationFailed("probe deletion was not successful".to_string())
                .context("deleting probe"));
        }
        Ok(())
    }

    /// whether no probe in the project uses `probe_name` yet
    pub fn is_name_available(&self, probe_name: &str) -> Result<bool> {
        let variables = self.probe_variables(probe_name)?;
        self.scope
            .run::<ValidateUniqueProbe>(&variables, "checking probe name")
    }

    fn probe_variables(&self, probe_name: &str) -> Result<ProbeVariables> {
        let project_id = self.scope.project_id()?;
        require(probe_name, "probe name")?;
        Ok(ProbeVariables {
            project_id,
            probe_name: probe_name.to_string(),
        })
    }
}
