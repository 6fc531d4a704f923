//! The runtime unit: execution role, agent runtime, and the parameter
//! import boundary.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ProvisionError;
use crate::execution::{execution_statements, runtime_trust};
use crate::types::{
    Attr, DeployContext, JwtAuthorizer, NetworkMode, ParameterMap, Resource,
};
use crate::unit::ProvisioningUnit;

use super::{
    OUTPUT_RUNTIME_ID, OUTPUT_RUNTIME_ROLE_ARN, PARAM_CLIENT_ID, PARAM_DISCOVERY_URL,
    PARAM_REPOSITORY_NAME, PARAM_REPOSITORY_URI,
};

pub const DEFAULT_AGENT_NAME: &str = "rust_agent";
pub const DEFAULT_IMAGE_TAG: &str = "latest";

/// The foundation outputs the runtime unit consumes, bound to fields.
///
/// Binding is the unit's fail-fast boundary: a missing or blank parameter
/// fails here, before a single resource is declared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RuntimeParams {
    pub repository_name: String,
    pub repository_uri: String,
    pub cognito_client_id: String,
    pub cognito_discovery_url: String,
}

impl RuntimeParams {
    /// Bind the named parameters from a captured snapshot.
    pub fn from_map(parameters: &ParameterMap) -> Result<Self, ProvisionError> {
        Ok(RuntimeParams {
            repository_name: parameters.require(PARAM_REPOSITORY_NAME)?.to_string(),
            repository_uri: parameters.require(PARAM_REPOSITORY_URI)?.to_string(),
            cognito_client_id: parameters.require(PARAM_CLIENT_ID)?.to_string(),
            cognito_discovery_url: parameters.require(PARAM_DISCOVERY_URL)?.to_string(),
        })
    }

    /// The container reference the runtime binds to.
    pub fn container_uri(&self, tag: &str) -> String {
        format!("{}/{}:{}", self.repository_uri, self.repository_name, tag)
    }
}

/// Configuration of the runtime unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct RuntimeConfig {
    pub agent_name: String,
    pub image_tag: String,
    pub network_mode: NetworkMode,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            agent_name: DEFAULT_AGENT_NAME.to_string(),
            image_tag: DEFAULT_IMAGE_TAG.to_string(),
            network_mode: NetworkMode::Public,
        }
    }
}

/// Assemble the runtime unit from a captured foundation snapshot.
///
/// The execution role carries the full least-privilege statement set; the
/// runtime resource binds the container image, the role, and the JWT
/// authorizer, and is ordered strictly after the role through an explicit
/// edge on top of the inferred role-ARN reference.
pub fn runtime_unit(
    ctx: DeployContext,
    config: RuntimeConfig,
    parameters: ParameterMap,
) -> Result<ProvisioningUnit, ProvisionError> {
    let bound = RuntimeParams::from_map(&parameters)?;

    let mut unit = ProvisioningUnit::new("runtime", ctx.clone());
    for name in [
        PARAM_REPOSITORY_NAME,
        PARAM_REPOSITORY_URI,
        PARAM_CLIENT_ID,
        PARAM_DISCOVERY_URL,
    ] {
        unit.require(name);
    }
    unit.import(parameters)?;

    let role = unit.declare(
        "AgentRuntimeRole",
        Resource::Role {
            name: format!("{}-execution", config.agent_name),
            trust: runtime_trust(&ctx)?,
            policies: execution_statements(&ctx, &bound.repository_name, &config.agent_name)?,
        },
    )?;

    let authorizer = JwtAuthorizer::new(
        bound.cognito_discovery_url.clone(),
        vec![bound.cognito_client_id.clone()],
    )?;
    let runtime = unit.declare(
        "AgentRuntime",
        Resource::AgentRuntime {
            name: config.agent_name.clone(),
            container_uri: bound.container_uri(&config.image_tag),
            role_arn: role.attr(Attr::Arn),
            authorizer: Some(authorizer),
            network_mode: config.network_mode,
        },
    )?;
    // Policy attachment is asynchronous in the provider; the reference edge
    // alone does not rule out a runtime invoking before its permissions
    // exist.
    unit.depends_on(&runtime, &role)?;

    unit.export(OUTPUT_RUNTIME_ID, runtime.attr(Attr::Id))?;
    unit.export(OUTPUT_RUNTIME_ROLE_ARN, role.attr(Attr::Arn))?;

    Ok(unit)
}
