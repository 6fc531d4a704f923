//! The two deployable units and the parameter surface between them.
//!
//! The foundation unit evaluates first; its captured outputs are re-keyed
//! by [`runtime_parameters`] and supplied to the runtime unit. The capture
//! is a snapshot: re-run it before every runtime deployment.

mod foundation;
mod runtime;

pub use foundation::{foundation_unit, CiConfig, FoundationConfig, IdentityConfig};
pub use runtime::{runtime_unit, RuntimeConfig, RuntimeParams, DEFAULT_AGENT_NAME, DEFAULT_IMAGE_TAG};

use crate::error::ProvisionError;
use crate::types::{OutputValues, ParameterMap};

/// Parameter names the runtime unit imports.
pub const PARAM_REPOSITORY_NAME: &str = "REPO_NAME";
pub const PARAM_REPOSITORY_URI: &str = "REPO_URI";
pub const PARAM_CLIENT_ID: &str = "COGNITO_CLIENT_ID";
pub const PARAM_DISCOVERY_URL: &str = "COGNITO_DISCOVERY_URL";

/// Output names the foundation unit exports.
pub const OUTPUT_REPOSITORY_URI: &str = "ECRRepositoryURI";
pub const OUTPUT_REPOSITORY_NAME: &str = "ECRRepositoryName";
pub const OUTPUT_CLIENT_ID: &str = "CognitoClientId";
pub const OUTPUT_DISCOVERY_URL: &str = "CognitoDiscoveryUrl";
pub const OUTPUT_CI_ROLE_ARN: &str = "GithubActionsRoleArn";

/// Output names the runtime unit exports.
pub const OUTPUT_RUNTIME_ID: &str = "AgentRuntimeId";
pub const OUTPUT_RUNTIME_ROLE_ARN: &str = "AgentRuntimeRoleArn";

/// Re-key captured foundation outputs as runtime parameters. Fails naming
/// the first missing output, so a foundation deployed without its identity
/// surface cannot silently feed a runtime.
pub fn runtime_parameters(outputs: &OutputValues) -> Result<ParameterMap, ProvisionError> {
    let mut parameters = ParameterMap::new();
    for (output, parameter) in [
        (OUTPUT_REPOSITORY_NAME, PARAM_REPOSITORY_NAME),
        (OUTPUT_REPOSITORY_URI, PARAM_REPOSITORY_URI),
        (OUTPUT_CLIENT_ID, PARAM_CLIENT_ID),
        (OUTPUT_DISCOVERY_URL, PARAM_DISCOVERY_URL),
    ] {
        let value = outputs
            .get(output)
            .ok_or_else(|| ProvisionError::MissingParameter(output.to_string()))?;
        parameters.insert(parameter, value);
    }
    Ok(parameters)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_parameters_rekey_outputs() {
        let mut outputs = OutputValues::default();
        outputs.insert(OUTPUT_REPOSITORY_NAME, "agent-repo");
        outputs.insert(OUTPUT_REPOSITORY_URI, "123456789012.dkr.ecr.us-east-1.amazonaws.com");
        outputs.insert(OUTPUT_CLIENT_ID, "client-id");
        outputs.insert(OUTPUT_DISCOVERY_URL, "https://issuer/.well-known/openid-configuration");

        let parameters = runtime_parameters(&outputs).unwrap();
        assert_eq!(parameters.get(PARAM_REPOSITORY_NAME), Some("agent-repo"));
        assert_eq!(parameters.get(PARAM_CLIENT_ID), Some("client-id"));
    }

    #[test]
    fn test_runtime_parameters_name_the_missing_output() {
        let mut outputs = OutputValues::default();
        outputs.insert(OUTPUT_REPOSITORY_NAME, "agent-repo");
        let err = runtime_parameters(&outputs).unwrap_err();
        assert_eq!(
            err,
            ProvisionError::MissingParameter(OUTPUT_REPOSITORY_URI.to_string())
        );
    }
}
