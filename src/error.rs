use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while assembling or evaluating provisioning units.
///
/// Configuration errors carry the name of the offending parameter, field, or
/// pattern so a failed evaluation never surfaces as a generic failure.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum ProvisionError {
    #[error("missing required parameter: {0}")]
    MissingParameter(String),

    #[error("parameter '{0}' is present but blank")]
    EmptyParameter(String),

    #[error("incomplete federation subject: '{0}' is blank")]
    IncompleteFederation(String),

    #[error("malformed ARN pattern: {0}")]
    MalformedArn(String),

    #[error("invalid name: {0}")]
    InvalidName(String),

    #[error("invalid deployment context: {0}")]
    InvalidContext(String),

    #[error("duplicate output name: {0}")]
    DuplicateOutput(String),

    #[error("duplicate logical id: {0}")]
    DuplicateLogicalId(String),

    #[error("statement '{0}' uses the universal wildcard without a recorded justification")]
    UnscopedStatement(String),

    #[error("statement '{statement}' resource '{pattern}' is not scoped to the deployment account/region")]
    UnscopedResource { statement: String, pattern: String },

    #[error("reference to unknown resource: {0}")]
    UnknownResource(String),

    #[error("dependency cycle among resources: {0}")]
    DependencyCycle(String),

    #[error("resource '{id}' did not yield attribute '{attr}'")]
    UnresolvedAttribute { id: String, attr: String },

    #[error("provider error: {0}")]
    Provider(String),
}
