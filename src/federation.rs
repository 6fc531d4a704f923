//! Federation trust assembly for the CI identity.
//!
//! Builds the trust policy that lets a CI workflow assume a role through an
//! OIDC token exchange instead of long-lived credentials. The subject claim
//! is composed from its parts and matched exactly; the audience is an
//! exact-match condition.

use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;

use crate::error::ProvisionError;
use crate::types::{Arn, ConditionOperator, Conditions, DeployContext, TrustPolicy};

/// Default token issuer host for GitHub Actions.
pub const GITHUB_ISSUER_HOST: &str = "token.actions.githubusercontent.com";

/// The fixed audience the credential service expects.
pub const STS_AUDIENCE: &str = "sts.amazonaws.com";

/// Subject components of a GitHub Actions federation trust.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GithubFederation {
    organization: String,
    repository: String,
    ref_pattern: String,
    audience: String,
    issuer_host: String,
}

impl GithubFederation {
    /// Build a federation for `organization/repository`, trusting workflow
    /// runs on branches matching `ref_pattern` (e.g. `main`, `release/*`,
    /// or `*`).
    ///
    /// Every subject component must be non-blank; nothing is defaulted.
    pub fn new(
        organization: impl Into<String>,
        repository: impl Into<String>,
        ref_pattern: impl Into<String>,
    ) -> Result<Self, ProvisionError> {
        let federation = GithubFederation {
            organization: organization.into(),
            repository: repository.into(),
            ref_pattern: ref_pattern.into(),
            audience: STS_AUDIENCE.to_string(),
            issuer_host: GITHUB_ISSUER_HOST.to_string(),
        };
        federation.check_components()?;
        Ok(federation)
    }

    /// Override the audience condition value.
    pub fn with_audience(mut self, audience: impl Into<String>) -> Result<Self, ProvisionError> {
        self.audience = audience.into();
        self.check_components()?;
        Ok(self)
    }

    /// Override the issuer host (for a GitHub Enterprise deployment).
    pub fn with_issuer_host(
        mut self,
        issuer_host: impl Into<String>,
    ) -> Result<Self, ProvisionError> {
        self.issuer_host = issuer_host.into();
        if self.issuer_host.trim().is_empty() {
            return Err(ProvisionError::IncompleteFederation(
                "issuer_host".to_string(),
            ));
        }
        Ok(self)
    }

    fn check_components(&self) -> Result<(), ProvisionError> {
        for (field, value) in [
            ("organization", &self.organization),
            ("repository", &self.repository),
            ("ref_pattern", &self.ref_pattern),
            ("audience", &self.audience),
        ] {
            if value.trim().is_empty() {
                return Err(ProvisionError::IncompleteFederation(field.to_string()));
            }
        }
        Ok(())
    }

    /// The composed subject claim:
    /// `repo:<org>/<repo>:ref:refs/heads/<pattern>`.
    pub fn subject(&self) -> String {
        format!(
            "repo:{}/{}:ref:refs/heads/{}",
            self.organization, self.repository, self.ref_pattern
        )
    }

    /// Whether the ref pattern trusts every branch. Accepted, but callers
    /// should prefer an explicit branch or tag pattern in production.
    pub fn is_broad(&self) -> bool {
        self.ref_pattern == "*"
    }

    pub fn issuer_host(&self) -> &str {
        &self.issuer_host
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    /// Assemble the trust policy: federated principal for the registered
    /// issuer, exact-match audience, pattern-match subject.
    pub fn trust_policy(&self, ctx: &DeployContext) -> Result<TrustPolicy, ProvisionError> {
        self.check_components()?;

        let provider = Arn::oidc_provider(ctx, &self.issuer_host)?;
        let conditions = Conditions::new()
            .when(
                ConditionOperator::StringEquals,
                format!("{}:aud", self.issuer_host),
                self.audience.as_str(),
            )
            .when(
                ConditionOperator::StringLike,
                format!("{}:sub", self.issuer_host),
                self.subject(),
            );

        let trust = TrustPolicy::for_federated(provider, conditions);
        if self.is_broad() {
            warn!(
                subject = self.subject(),
                "federation trusts every branch; prefer an explicit ref pattern"
            );
            return Ok(trust.mark_broad());
        }
        Ok(trust)
    }
}
