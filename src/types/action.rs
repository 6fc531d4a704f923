//! Provider action names, one enum per service surface.
//!
//! Statements hold [`ActionName`] values; the per-service enums render the
//! exact `service:Operation` strings so action lists are never assembled
//! from ad hoc literals.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use strum_macros::{Display as StrumDisplay, EnumString};
use utoipa::ToSchema;

/// A fully-qualified provider action (e.g. `ecr:BatchGetImage`).
#[derive(
    Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(transparent)]
pub struct ActionName(String);

impl ActionName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The universal action wildcard. Only the administrative CI grant uses
    /// this, and it must carry a justification to pass validation.
    pub fn any() -> Self {
        ActionName("*".to_string())
    }
}

impl Display for ActionName {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

/// Image registry actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, EnumString)]
pub enum EcrAction {
    #[strum(to_string = "ecr:BatchGetImage")]
    BatchGetImage,
    #[strum(to_string = "ecr:GetDownloadUrlForLayer")]
    GetDownloadUrlForLayer,
    #[strum(to_string = "ecr:GetAuthorizationToken")]
    GetAuthorizationToken,
    #[strum(to_string = "ecr:BatchCheckLayerAvailability")]
    BatchCheckLayerAvailability,
    #[strum(to_string = "ecr:PutImage")]
    PutImage,
    #[strum(to_string = "ecr:InitiateLayerUpload")]
    InitiateLayerUpload,
    #[strum(to_string = "ecr:UploadLayerPart")]
    UploadLayerPart,
    #[strum(to_string = "ecr:CompleteLayerUpload")]
    CompleteLayerUpload,
}

/// Log-group and log-stream actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, EnumString)]
pub enum LogsAction {
    #[strum(to_string = "logs:DescribeLogStreams")]
    DescribeLogStreams,
    #[strum(to_string = "logs:CreateLogGroup")]
    CreateLogGroup,
    #[strum(to_string = "logs:DescribeLogGroups")]
    DescribeLogGroups,
    #[strum(to_string = "logs:CreateLogStream")]
    CreateLogStream,
    #[strum(to_string = "logs:PutLogEvents")]
    PutLogEvents,
}

/// Trace submission and sampling retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, EnumString)]
pub enum XrayAction {
    #[strum(to_string = "xray:PutTraceSegments")]
    PutTraceSegments,
    #[strum(to_string = "xray:PutTelemetryRecords")]
    PutTelemetryRecords,
    #[strum(to_string = "xray:GetSamplingRules")]
    GetSamplingRules,
    #[strum(to_string = "xray:GetSamplingTargets")]
    GetSamplingTargets,
}

/// Metric submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, EnumString)]
pub enum CloudWatchAction {
    #[strum(to_string = "cloudwatch:PutMetricData")]
    PutMetricData,
}

/// Workload-identity token issuance on the agent-hosting service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, EnumString)]
pub enum AgentCoreAction {
    #[strum(to_string = "bedrock-agentcore:GetWorkloadAccessToken")]
    GetWorkloadAccessToken,
    #[strum(to_string = "bedrock-agentcore:GetWorkloadAccessTokenForJWT")]
    GetWorkloadAccessTokenForJwt,
    #[strum(to_string = "bedrock-agentcore:GetWorkloadAccessTokenForUserId")]
    GetWorkloadAccessTokenForUserId,
}

/// Model invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, EnumString)]
pub enum BedrockAction {
    #[strum(to_string = "bedrock:InvokeModel")]
    InvokeModel,
    #[strum(to_string = "bedrock:InvokeModelWithResponseStream")]
    InvokeModelWithResponseStream,
}

/// Credential federation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, EnumString)]
pub enum StsAction {
    #[strum(to_string = "sts:AssumeRole")]
    AssumeRole,
    #[strum(to_string = "sts:AssumeRoleWithWebIdentity")]
    AssumeRoleWithWebIdentity,
}

macro_rules! into_action_name {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for ActionName {
                fn from(action: $ty) -> Self {
                    ActionName(action.to_string())
                }
            }
        )+
    };
}

into_action_name!(
    EcrAction,
    LogsAction,
    XrayAction,
    CloudWatchAction,
    AgentCoreAction,
    BedrockAction,
    StsAction,
);
