//! Policy statements and documents in the provider JSON grammar.

use serde::{Deserialize, Serialize};
use strum_macros::Display as StrumDisplay;

use crate::error::ProvisionError;

use super::action::ActionName;
use super::arn::{Arn, ResourcePattern};
use super::condition::{ConditionOperator, Conditions};
use super::context::DeployContext;

/// Document version the provider grammar pins.
pub const POLICY_VERSION: &str = "2012-10-17";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, StrumDisplay,
)]
pub enum Effect {
    Allow,
    Deny,
}

/// One permission statement.
///
/// Statements are immutable once handed to a role declaration; the builder
/// methods consume and return the statement. The wildcard justification is
/// construction-time metadata: it never serializes, it exists so
/// [`PolicyStatement::validate`] can tell a documented exception from an
/// interpolation accident.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyStatement {
    #[serde(rename = "Sid", skip_serializing_if = "Option::is_none", default)]
    sid: Option<String>,
    #[serde(rename = "Effect")]
    effect: Effect,
    #[serde(rename = "Action")]
    actions: Vec<ActionName>,
    #[serde(rename = "Resource")]
    resources: Vec<ResourcePattern>,
    #[serde(
        rename = "Condition",
        skip_serializing_if = "Conditions::is_empty",
        default
    )]
    conditions: Conditions,
    #[serde(skip)]
    wildcard_justification: Option<String>,
}

impl PolicyStatement {
    /// An allow statement scoped to concrete ARN patterns.
    pub fn allow(
        actions: impl IntoIterator<Item = ActionName>,
        resources: impl IntoIterator<Item = Arn>,
    ) -> Self {
        PolicyStatement {
            sid: None,
            effect: Effect::Allow,
            actions: actions.into_iter().collect(),
            resources: resources.into_iter().map(ResourcePattern::from).collect(),
            conditions: Conditions::new(),
            wildcard_justification: None,
        }
    }

    /// An allow statement against the universal wildcard, for actions with
    /// no resource-level ARN. The justification is mandatory and names why
    /// the exception holds.
    pub fn allow_unscoped(
        actions: impl IntoIterator<Item = ActionName>,
        justification: impl Into<String>,
    ) -> Self {
        PolicyStatement {
            sid: None,
            effect: Effect::Allow,
            actions: actions.into_iter().collect(),
            resources: vec![ResourcePattern::Any],
            conditions: Conditions::new(),
            wildcard_justification: Some(justification.into()),
        }
    }

    pub fn with_sid(mut self, sid: impl Into<String>) -> Self {
        self.sid = Some(sid.into());
        self
    }

    pub fn with_condition(
        mut self,
        operator: ConditionOperator,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.conditions = self.conditions.when(operator, key, value);
        self
    }

    pub fn sid(&self) -> Option<&str> {
        self.sid.as_deref()
    }

    pub fn effect(&self) -> Effect {
        self.effect
    }

    pub fn actions(&self) -> &[ActionName] {
        &self.actions
    }

    pub fn resources(&self) -> &[ResourcePattern] {
        &self.resources
    }

    pub fn conditions(&self) -> &Conditions {
        &self.conditions
    }

    pub fn wildcard_justification(&self) -> Option<&str> {
        self.wildcard_justification.as_deref()
    }

    /// Label used in error messages: the sid if present, otherwise the
    /// first action.
    fn label(&self) -> String {
        self.sid
            .clone()
            .or_else(|| self.actions.first().map(|a| a.to_string()))
            .unwrap_or_else(|| "<empty>".to_string())
    }

    /// Check the narrowest-pattern invariant against a deployment context.
    ///
    /// Every ARN pattern must be pinned to the context's account and region,
    /// with two sanctioned shapes excepted: the unowned model catalog, and
    /// the universal wildcard when a justification was recorded at
    /// construction. Condition coverage for wildcard statements is the
    /// recipe's responsibility (not every action family exposes a condition
    /// key), and the recipe tests pin it.
    pub fn validate(&self, ctx: &DeployContext) -> Result<(), ProvisionError> {
        for pattern in &self.resources {
            match pattern {
                ResourcePattern::Any => {
                    if self.wildcard_justification.is_none() {
                        return Err(ProvisionError::UnscopedStatement(self.label()));
                    }
                }
                ResourcePattern::Arn(arn) => {
                    if !arn.is_scoped_to(ctx) && !arn.is_model_catalog() {
                        return Err(ProvisionError::UnscopedResource {
                            statement: self.label(),
                            pattern: arn.to_string(),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

/// A full permissions policy document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyDocument {
    #[serde(rename = "Version")]
    version: String,
    #[serde(rename = "Statement")]
    statements: Vec<PolicyStatement>,
}

impl PolicyDocument {
    pub fn new(statements: Vec<PolicyStatement>) -> Self {
        PolicyDocument {
            version: POLICY_VERSION.to_string(),
            statements,
        }
    }

    pub fn statements(&self) -> &[PolicyStatement] {
        &self.statements
    }

    pub fn validate(&self, ctx: &DeployContext) -> Result<(), ProvisionError> {
        for statement in &self.statements {
            statement.validate(ctx)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::action::{CloudWatchAction, EcrAction};

    fn ctx() -> DeployContext {
        DeployContext::new("123456789012", "us-east-1").unwrap()
    }

    #[test]
    fn test_scoped_statement_serialization() {
        let statement = PolicyStatement::allow(
            [
                EcrAction::BatchGetImage.into(),
                EcrAction::GetDownloadUrlForLayer.into(),
            ],
            [Arn::ecr_repository(&ctx(), "agent-repo").unwrap()],
        )
        .with_sid("ECRImageAccess");

        let value = serde_json::to_value(&statement).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "Sid": "ECRImageAccess",
                "Effect": "Allow",
                "Action": ["ecr:BatchGetImage", "ecr:GetDownloadUrlForLayer"],
                "Resource": ["arn:aws:ecr:us-east-1:123456789012:repository/agent-repo"]
            })
        );
        statement.validate(&ctx()).unwrap();
    }

    #[test]
    fn test_unscoped_statement_requires_justification() {
        let ok = PolicyStatement::allow_unscoped(
            [EcrAction::GetAuthorizationToken.into()],
            "auth token issuance has no resource-level ARN",
        );
        ok.validate(&ctx()).unwrap();

        // A wildcard that arrives without a justification is treated as an
        // interpolation accident.
        let value = serde_json::to_value(&ok).unwrap();
        let reparsed: PolicyStatement = serde_json::from_value(value).unwrap();
        let err = reparsed.validate(&ctx()).unwrap_err();
        assert!(matches!(err, ProvisionError::UnscopedStatement(_)));
    }

    #[test]
    fn test_foreign_scope_is_rejected() {
        let other = DeployContext::new("999999999999", "eu-west-1").unwrap();
        let statement = PolicyStatement::allow(
            [EcrAction::BatchGetImage.into()],
            [Arn::ecr_repository(&other, "agent-repo").unwrap()],
        );
        let err = statement.validate(&ctx()).unwrap_err();
        match err {
            ProvisionError::UnscopedResource { pattern, .. } => {
                assert!(pattern.contains("999999999999"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_condition_serialization() {
        let statement = PolicyStatement::allow_unscoped(
            [CloudWatchAction::PutMetricData.into()],
            "metric submission has no resource-level ARN",
        )
        .with_condition(
            ConditionOperator::StringEquals,
            "cloudwatch:namespace",
            "bedrock-agentcore",
        );

        let value = serde_json::to_value(&statement).unwrap();
        assert_eq!(
            value["Condition"],
            serde_json::json!({
                "StringEquals": { "cloudwatch:namespace": "bedrock-agentcore" }
            })
        );
    }

    #[test]
    fn test_document_shape() {
        let document = PolicyDocument::new(vec![PolicyStatement::allow(
            [EcrAction::BatchGetImage.into()],
            [Arn::ecr_repository(&ctx(), "agent-repo").unwrap()],
        )]);
        let value = serde_json::to_value(&document).unwrap();
        assert_eq!(value["Version"], "2012-10-17");
        assert_eq!(value["Statement"].as_array().unwrap().len(), 1);
        document.validate(&ctx()).unwrap();
    }
}
