//! The least-privilege policy recipe for the agent execution identity, and
//! the scoped grants for the CI push identity.
//!
//! Each statement group is its own constructor so the set stays testable
//! statement by statement. Scoped groups build their patterns through the
//! typed ARN constructors; the three unscoped groups (registry auth token,
//! trace submission, metric submission) are actions with no resource-level
//! ARN, and each records that justification. Metric submission additionally
//! carries the namespace condition, the pattern to follow whenever an
//! action family offers a request-attribute condition instead of ARNs.

use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;

use crate::error::ProvisionError;
use crate::types::{
    ActionName, AgentCoreAction, Arn, BedrockAction, CloudWatchAction, ConditionOperator,
    Conditions, DeployContext, EcrAction, LogsAction, PolicyStatement, TrustPolicy, XrayAction,
};

/// Service principal of the agent-hosting service.
pub const RUNTIME_SERVICE_PRINCIPAL: &str = "bedrock-agentcore.amazonaws.com";

/// The only namespace the execution identity may publish metrics into.
pub const METRICS_NAMESPACE: &str = "bedrock-agentcore";

/// Log-group namespace the hosting service writes runtime logs under.
pub const RUNTIME_LOG_PREFIX: &str = "/aws/bedrock-agentcore/runtimes";

/// The default workload-identity directory.
pub const WORKLOAD_DIRECTORY: &str = "default";

/// Pull access for exactly one image repository.
pub fn image_pull(
    ctx: &DeployContext,
    repository_name: &str,
) -> Result<PolicyStatement, ProvisionError> {
    Ok(PolicyStatement::allow(
        [
            EcrAction::BatchGetImage.into(),
            EcrAction::GetDownloadUrlForLayer.into(),
        ],
        [Arn::ecr_repository(ctx, repository_name)?],
    )
    .with_sid("ECRImageAccess"))
}

/// Log-group lifecycle under the runtime namespace.
pub fn log_group_lifecycle(ctx: &DeployContext) -> Result<PolicyStatement, ProvisionError> {
    Ok(PolicyStatement::allow(
        [
            LogsAction::DescribeLogStreams.into(),
            LogsAction::CreateLogGroup.into(),
        ],
        [Arn::log_group(ctx, &format!("{RUNTIME_LOG_PREFIX}/*"))?],
    ))
}

/// Log-group discovery. Deliberately a separate statement from
/// [`log_group_lifecycle`]: describing groups needs the wildcard one path
/// segment higher.
pub fn log_group_discovery(ctx: &DeployContext) -> Result<PolicyStatement, ProvisionError> {
    Ok(PolicyStatement::allow(
        [LogsAction::DescribeLogGroups.into()],
        [Arn::log_group(ctx, "*")?],
    ))
}

/// Stream creation and event writes under the runtime namespace.
pub fn log_stream_write(ctx: &DeployContext) -> Result<PolicyStatement, ProvisionError> {
    Ok(PolicyStatement::allow(
        [
            LogsAction::CreateLogStream.into(),
            LogsAction::PutLogEvents.into(),
        ],
        [Arn::log_stream(ctx, &format!("{RUNTIME_LOG_PREFIX}/*"), "*")?],
    ))
}

/// Registry auth-token issuance. No resource-level ARN exists for this
/// action.
pub fn registry_auth() -> PolicyStatement {
    PolicyStatement::allow_unscoped(
        [EcrAction::GetAuthorizationToken.into()],
        "auth token issuance has no resource-level ARN",
    )
    .with_sid("ECRTokenAccess")
}

/// Trace submission and sampling-rule retrieval. The wire protocol exposes
/// no resource-level ARN.
pub fn tracing_telemetry() -> PolicyStatement {
    PolicyStatement::allow_unscoped(
        [
            XrayAction::PutTraceSegments.into(),
            XrayAction::PutTelemetryRecords.into(),
            XrayAction::GetSamplingRules.into(),
            XrayAction::GetSamplingTargets.into(),
        ],
        "trace submission has no resource-level ARN",
    )
}

/// Metric submission, gated to the fixed namespace.
pub fn metrics_submission() -> PolicyStatement {
    PolicyStatement::allow_unscoped(
        [CloudWatchAction::PutMetricData.into()],
        "metric submission has no resource-level ARN; namespace condition applies",
    )
    .with_condition(
        ConditionOperator::StringEquals,
        "cloudwatch:namespace",
        METRICS_NAMESPACE,
    )
}

/// Workload-identity token issuance: the default directory plus the
/// per-agent identity prefix, nothing wider.
pub fn workload_identity_tokens(
    ctx: &DeployContext,
    agent_name: &str,
) -> Result<PolicyStatement, ProvisionError> {
    if agent_name.trim().is_empty() {
        return Err(ProvisionError::InvalidName("agent name is blank".to_string()));
    }
    Ok(PolicyStatement::allow(
        [
            AgentCoreAction::GetWorkloadAccessToken.into(),
            AgentCoreAction::GetWorkloadAccessTokenForJwt.into(),
            AgentCoreAction::GetWorkloadAccessTokenForUserId.into(),
        ],
        [
            Arn::workload_identity_directory(ctx, WORKLOAD_DIRECTORY)?,
            Arn::workload_identity(ctx, WORKLOAD_DIRECTORY, &format!("{agent_name}-*"))?,
        ],
    )
    .with_sid("GetAgentAccessToken"))
}

/// Model invocation: the published catalog plus account-owned models.
pub fn model_invocation(ctx: &DeployContext) -> Result<PolicyStatement, ProvisionError> {
    Ok(PolicyStatement::allow(
        [
            BedrockAction::InvokeModel.into(),
            BedrockAction::InvokeModelWithResponseStream.into(),
        ],
        [Arn::foundation_models(ctx)?, Arn::account_models(ctx)?],
    )
    .with_sid("BedrockModelInvocation"))
}

/// The full execution statement set, in attachment order.
pub fn execution_statements(
    ctx: &DeployContext,
    repository_name: &str,
    agent_name: &str,
) -> Result<Vec<PolicyStatement>, ProvisionError> {
    Ok(vec![
        image_pull(ctx, repository_name)?,
        log_group_lifecycle(ctx)?,
        log_group_discovery(ctx)?,
        log_stream_write(ctx)?,
        registry_auth(),
        tracing_telemetry(),
        metrics_submission(),
        workload_identity_tokens(ctx, agent_name)?,
        model_invocation(ctx)?,
    ])
}

/// Trust policy of the execution role: the hosting service may assume it,
/// but only on behalf of this account's runtimes.
pub fn runtime_trust(ctx: &DeployContext) -> Result<TrustPolicy, ProvisionError> {
    let source = Arn::agent_runtime_any(ctx)?;
    Ok(TrustPolicy::for_service(
        RUNTIME_SERVICE_PRINCIPAL,
        Conditions::new()
            .when(
                ConditionOperator::StringEquals,
                "aws:SourceAccount",
                ctx.account(),
            )
            .when(
                ConditionOperator::ArnLike,
                "aws:SourceArn",
                source.to_string(),
            ),
    ))
}

/// Privilege level of the CI identity. The broad variant exists for
/// bootstrap scenarios and is never the default.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema,
)]
pub enum CiPrivilege {
    /// Auth-token issuance plus push/pull on one repository.
    #[default]
    ScopedPush,
    /// Unrestricted. Accepted with a warning; the grant records its own
    /// justification so validation knows it was deliberate.
    Administrator,
}

/// Push/pull access to exactly one repository.
pub fn image_push(
    ctx: &DeployContext,
    repository_name: &str,
) -> Result<PolicyStatement, ProvisionError> {
    Ok(PolicyStatement::allow(
        [
            EcrAction::BatchCheckLayerAvailability.into(),
            EcrAction::PutImage.into(),
            EcrAction::InitiateLayerUpload.into(),
            EcrAction::UploadLayerPart.into(),
            EcrAction::CompleteLayerUpload.into(),
            EcrAction::BatchGetImage.into(),
            EcrAction::GetDownloadUrlForLayer.into(),
        ],
        [Arn::ecr_repository(ctx, repository_name)?],
    )
    .with_sid("ECRPushAccess"))
}

/// Statement set for the CI role at the configured privilege level.
pub fn ci_statements(
    ctx: &DeployContext,
    repository_name: &str,
    privilege: CiPrivilege,
) -> Result<Vec<PolicyStatement>, ProvisionError> {
    match privilege {
        CiPrivilege::ScopedPush => Ok(vec![registry_auth(), image_push(ctx, repository_name)?]),
        CiPrivilege::Administrator => {
            warn!("CI role granted administrative access; prefer the scoped push grant");
            Ok(vec![PolicyStatement::allow_unscoped(
                [ActionName::any()],
                "administrative CI grant requested by configuration",
            )
            .with_sid("Administrator")])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PolicyDocument, ResourcePattern};
    use yare::parameterized;

    const ACCOUNT: &str = "123456789012";
    const REGION: &str = "us-east-1";

    fn ctx() -> DeployContext {
        DeployContext::new(ACCOUNT, REGION).unwrap()
    }

    fn statements() -> Vec<PolicyStatement> {
        execution_statements(&ctx(), "agentcore-rust-agent-repo", "rust_agent").unwrap()
    }

    #[test]
    fn test_recipe_has_nine_groups() {
        assert_eq!(statements().len(), 9);
    }

    #[test]
    fn test_recipe_validates_as_a_document() {
        PolicyDocument::new(statements()).validate(&ctx()).unwrap();
    }

    #[test]
    fn test_exactly_three_wildcard_exceptions() {
        let unscoped: Vec<String> = statements()
            .iter()
            .filter(|s| s.resources().iter().any(ResourcePattern::is_any))
            .map(|s| s.actions()[0].to_string())
            .collect();
        assert_eq!(
            unscoped,
            vec![
                "ecr:GetAuthorizationToken",
                "xray:PutTraceSegments",
                "cloudwatch:PutMetricData"
            ]
        );
    }

    #[test]
    fn test_scoped_statements_pin_account_and_region() {
        for statement in statements() {
            for pattern in statement.resources() {
                if let ResourcePattern::Arn(arn) = pattern {
                    let rendered = arn.to_string();
                    if arn.is_model_catalog() {
                        continue;
                    }
                    assert!(
                        rendered.contains(ACCOUNT) && rendered.contains(REGION),
                        "pattern not pinned: {rendered}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_image_pull_is_single_repository() {
        let statement = image_pull(&ctx(), "agent-repo").unwrap();
        assert_eq!(statement.sid(), Some("ECRImageAccess"));
        assert_eq!(statement.resources().len(), 1);
        assert_eq!(
            statement.resources()[0].to_string(),
            "arn:aws:ecr:us-east-1:123456789012:repository/agent-repo"
        );
    }

    #[test]
    fn test_log_statements_are_separated_by_scope() {
        let lifecycle = log_group_lifecycle(&ctx()).unwrap();
        let discovery = log_group_discovery(&ctx()).unwrap();
        let write = log_stream_write(&ctx()).unwrap();

        assert_eq!(
            lifecycle.resources()[0].to_string(),
            "arn:aws:logs:us-east-1:123456789012:log-group:/aws/bedrock-agentcore/runtimes/*"
        );
        assert_eq!(
            discovery.resources()[0].to_string(),
            "arn:aws:logs:us-east-1:123456789012:log-group:*"
        );
        assert_eq!(
            write.resources()[0].to_string(),
            "arn:aws:logs:us-east-1:123456789012:log-group:/aws/bedrock-agentcore/runtimes/*:log-stream:*"
        );
    }

    #[test]
    fn test_metrics_statement_carries_namespace_condition() {
        let statement = metrics_submission();
        assert_eq!(
            statement
                .conditions()
                .get(ConditionOperator::StringEquals, "cloudwatch:namespace"),
            Some(METRICS_NAMESPACE)
        );
    }

    #[parameterized(
        default_agent = { "rust_agent" },
        other_agent = { "support_bot" },
    )]
    fn test_workload_identity_has_exactly_two_patterns(agent: &str) {
        let statement = workload_identity_tokens(&ctx(), agent).unwrap();
        let patterns: Vec<String> = statement
            .resources()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            patterns,
            vec![
                "arn:aws:bedrock-agentcore:us-east-1:123456789012:workload-identity-directory/default".to_string(),
                format!(
                    "arn:aws:bedrock-agentcore:us-east-1:123456789012:workload-identity-directory/default/workload-identity/{agent}-*"
                ),
            ]
        );
    }

    #[test]
    fn test_workload_identity_rejects_blank_agent() {
        let err = workload_identity_tokens(&ctx(), " ").unwrap_err();
        assert!(matches!(err, ProvisionError::InvalidName(_)));
    }

    #[test]
    fn test_model_invocation_covers_catalog_and_account() {
        let statement = model_invocation(&ctx()).unwrap();
        let patterns: Vec<String> = statement
            .resources()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            patterns,
            vec![
                "arn:aws:bedrock:*::foundation-model/*",
                "arn:aws:bedrock:us-east-1:123456789012:*"
            ]
        );
    }

    #[test]
    fn test_runtime_trust_is_account_gated() {
        let trust = runtime_trust(&ctx()).unwrap();
        let statement = &trust.statements()[0];
        assert_eq!(
            statement
                .conditions()
                .get(ConditionOperator::StringEquals, "aws:SourceAccount"),
            Some(ACCOUNT)
        );
        assert_eq!(
            statement
                .conditions()
                .get(ConditionOperator::ArnLike, "aws:SourceArn"),
            Some("arn:aws:bedrock-agentcore:us-east-1:123456789012:*")
        );
    }

    #[test]
    fn test_ci_scoped_push_statements() {
        let statements = ci_statements(&ctx(), "agent-repo", CiPrivilege::ScopedPush).unwrap();
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0].sid(), Some("ECRTokenAccess"));
        assert_eq!(statements[1].sid(), Some("ECRPushAccess"));
        assert_eq!(
            statements[1].resources()[0].to_string(),
            "arn:aws:ecr:us-east-1:123456789012:repository/agent-repo"
        );
        PolicyDocument::new(statements).validate(&ctx()).unwrap();
    }

    #[test]
    fn test_ci_administrator_is_justified_but_broad() {
        let statements = ci_statements(&ctx(), "agent-repo", CiPrivilege::Administrator).unwrap();
        assert_eq!(statements.len(), 1);
        assert!(statements[0].resources()[0].is_any());
        assert!(statements[0].wildcard_justification().is_some());
        statements[0].validate(&ctx()).unwrap();
    }
}
