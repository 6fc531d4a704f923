//! Assume-role trust documents: who may become an identity, and under
//! which conditions.

use serde::{Deserialize, Serialize};

use super::action::{ActionName, StsAction};
use super::arn::Arn;
use super::condition::Conditions;
use super::statement::{Effect, POLICY_VERSION};

/// The principal granted assumption rights.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Principal {
    /// A provider service (e.g. `bedrock-agentcore.amazonaws.com`).
    Service(String),
    /// A registered external token issuer, by provider-registration ARN.
    Federated(Arn),
}

/// One trust statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustStatement {
    #[serde(rename = "Effect")]
    effect: Effect,
    #[serde(rename = "Principal")]
    principal: Principal,
    #[serde(rename = "Action")]
    actions: Vec<ActionName>,
    #[serde(
        rename = "Condition",
        skip_serializing_if = "Conditions::is_empty",
        default
    )]
    conditions: Conditions,
}

impl TrustStatement {
    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    pub fn actions(&self) -> &[ActionName] {
        &self.actions
    }

    pub fn conditions(&self) -> &Conditions {
        &self.conditions
    }
}

/// A full trust policy document.
///
/// `broad` is construction-time metadata, carried when the federation
/// subject matches more than a single ref; it never serializes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustPolicy {
    #[serde(rename = "Version")]
    version: String,
    #[serde(rename = "Statement")]
    statements: Vec<TrustStatement>,
    #[serde(skip)]
    broad: bool,
}

impl TrustPolicy {
    /// Trust a provider service, gated by the given conditions.
    pub fn for_service(service: impl Into<String>, conditions: Conditions) -> Self {
        TrustPolicy {
            version: POLICY_VERSION.to_string(),
            statements: vec![TrustStatement {
                effect: Effect::Allow,
                principal: Principal::Service(service.into()),
                actions: vec![StsAction::AssumeRole.into()],
                conditions,
            }],
            broad: false,
        }
    }

    /// Trust a federated token issuer, gated by the given conditions.
    pub fn for_federated(provider: Arn, conditions: Conditions) -> Self {
        TrustPolicy {
            version: POLICY_VERSION.to_string(),
            statements: vec![TrustStatement {
                effect: Effect::Allow,
                principal: Principal::Federated(provider),
                actions: vec![StsAction::AssumeRoleWithWebIdentity.into()],
                conditions,
            }],
            broad: false,
        }
    }

    pub(crate) fn mark_broad(mut self) -> Self {
        self.broad = true;
        self
    }

    /// Whether the trust condition matches a broad subject pattern.
    pub fn broad(&self) -> bool {
        self.broad
    }

    pub fn statements(&self) -> &[TrustStatement] {
        &self.statements
    }
}
