//! A deterministic in-process provider for tests and dry-runs.
//!
//! Generated identifiers are stable functions of the declaration and the
//! deployment context, so two evaluations of the same unit produce the same
//! attribute values. A real deployment swaps this for a provider backed by
//! the actual provisioning engine; nothing else changes.

use crate::error::ProvisionError;
use crate::traits::{ResourceProvider, ResourceState};
use crate::types::{Arn, Attr, DeployContext, LogicalId, Resource};

/// Deterministic provider; see the module docs.
#[derive(Debug, Default)]
pub struct SyntheticProvider {
    sequence: u32,
}

impl SyntheticProvider {
    fn next_sequence(&mut self) -> u32 {
        self.sequence += 1;
        self.sequence
    }
}

fn compact(name: &str) -> String {
    name.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

fn issuer_host(url: &str) -> &str {
    let trimmed = url.strip_prefix("https://").unwrap_or(url);
    trimmed.split('/').next().unwrap_or(trimmed)
}

impl ResourceProvider for SyntheticProvider {
    fn materialize(
        &mut self,
        ctx: &DeployContext,
        _id: &LogicalId,
        resource: &Resource,
    ) -> Result<ResourceState, ProvisionError> {
        let mut state = ResourceState::new();
        match resource {
            Resource::Repository { name } => {
                state.insert(Attr::Name, name.clone());
                state.insert(
                    Attr::Uri,
                    format!("{}.dkr.ecr.{}.amazonaws.com", ctx.account(), ctx.region()),
                );
                state.insert(Attr::Arn, Arn::ecr_repository(ctx, name)?.to_string());
            }
            Resource::UserPool { name } => {
                let pool_id = format!("{}_{}", ctx.region(), compact(name));
                state.insert(
                    Attr::DiscoveryUrl,
                    format!(
                        "https://cognito-idp.{}.amazonaws.com/{}/.well-known/openid-configuration",
                        ctx.region(),
                        pool_id
                    ),
                );
                state.insert(
                    Attr::Arn,
                    format!(
                        "arn:{}:cognito-idp:{}:{}:userpool/{}",
                        ctx.partition(),
                        ctx.region(),
                        ctx.account(),
                        pool_id
                    ),
                );
                state.insert(Attr::Name, name.clone());
                state.insert(Attr::Id, pool_id);
            }
            Resource::UserPoolClient { name, .. } => {
                state.insert(Attr::Name, name.clone());
                state.insert(Attr::Id, format!("client-{}", compact(name)));
            }
            Resource::OpenIdProvider { url, .. } => {
                state.insert(
                    Attr::Arn,
                    Arn::oidc_provider(ctx, issuer_host(url))?.to_string(),
                );
            }
            Resource::Role { name, .. } => {
                state.insert(Attr::Name, name.clone());
                state.insert(Attr::Arn, Arn::role(ctx, name)?.to_string());
            }
            Resource::AgentRuntime { name, .. } => {
                let runtime_id = format!("{name}-{:04}", self.next_sequence());
                state.insert(
                    Attr::Arn,
                    format!(
                        "arn:{}:bedrock-agentcore:{}:{}:runtime/{}",
                        ctx.partition(),
                        ctx.region(),
                        ctx.account(),
                        runtime_id
                    ),
                );
                state.insert(Attr::Name, name.clone());
                state.insert(Attr::Id, runtime_id);
            }
        }
        Ok(state)
    }
}
