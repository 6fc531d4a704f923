//! Data model types for provisioning units and policy assembly.
//!
//! Canonical string forms:
//! - ARN pattern: `arn:<partition>:<service>:<region>:<account>:<resource>`
//! - Action: `<service>:<Operation>` (e.g. `ecr:BatchGetImage`)
//! - Attribute reference: `<LogicalId>.<attr>` (e.g. `AgentRole.arn`)
//!
//! Scoped patterns are always built through the typed constructors in
//! [`arn`]; the universal wildcard is an explicit variant, never the result
//! of interpolation.

mod action;
mod arn;
mod condition;
mod context;
mod output;
mod parameter;
mod reference;
mod resource;
mod statement;
mod trust;

pub use action::{
    ActionName, AgentCoreAction, BedrockAction, CloudWatchAction, EcrAction, LogsAction,
    StsAction, XrayAction,
};
pub use arn::{Arn, ResourcePattern};
pub use condition::{ConditionOperator, Conditions};
pub use context::DeployContext;
pub use output::{Output, OutputValue, OutputValues};
pub use parameter::ParameterMap;
pub use reference::{Attr, AttrRef, LogicalId};
pub use resource::{JwtAuthorizer, NetworkMode, Resource, ResourceKind};
pub use statement::{Effect, PolicyDocument, PolicyStatement, POLICY_VERSION};
pub use trust::{Principal, TrustPolicy, TrustStatement};
