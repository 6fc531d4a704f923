//! Condition blocks for policy and trust statements.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::Display as StrumDisplay;
use utoipa::ToSchema;

/// The condition operators this crate emits.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    ToSchema,
    StrumDisplay,
)]
pub enum ConditionOperator {
    StringEquals,
    StringLike,
    ArnLike,
}

/// A condition block: operator -> condition key -> expected value.
///
/// Serializes to the provider grammar, e.g.
/// `{"StringEquals": {"cloudwatch:namespace": "bedrock-agentcore"}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct Conditions(BTreeMap<ConditionOperator, BTreeMap<String, String>>);

impl Conditions {
    pub fn new() -> Self {
        Conditions::default()
    }

    /// Add a single matcher, returning the updated block.
    pub fn when(
        mut self,
        operator: ConditionOperator,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.0
            .entry(operator)
            .or_default()
            .insert(key.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, operator: ConditionOperator, key: &str) -> Option<&str> {
        self.0
            .get(&operator)
            .and_then(|matchers| matchers.get(key))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conditions_serialize_to_provider_grammar() {
        let conditions = Conditions::new()
            .when(ConditionOperator::StringEquals, "aws:SourceAccount", "123456789012")
            .when(
                ConditionOperator::ArnLike,
                "aws:SourceArn",
                "arn:aws:bedrock-agentcore:us-east-1:123456789012:*",
            );

        let value = serde_json::to_value(&conditions).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "StringEquals": { "aws:SourceAccount": "123456789012" },
                "ArnLike": {
                    "aws:SourceArn": "arn:aws:bedrock-agentcore:us-east-1:123456789012:*"
                }
            })
        );
    }

    #[test]
    fn test_conditions_lookup() {
        let conditions = Conditions::new().when(
            ConditionOperator::StringLike,
            "token.actions.githubusercontent.com:sub",
            "repo:acme/agent:ref:refs/heads/main",
        );
        assert_eq!(
            conditions.get(
                ConditionOperator::StringLike,
                "token.actions.githubusercontent.com:sub"
            ),
            Some("repo:acme/agent:ref:refs/heads/main")
        );
        assert_eq!(
            conditions.get(ConditionOperator::StringEquals, "anything"),
            None
        );
    }

    #[test]
    fn test_empty_conditions() {
        assert!(Conditions::new().is_empty());
    }
}
