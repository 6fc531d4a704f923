//! The foundation unit: image repository, CI federation identity, and the
//! end-user identity provider.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ProvisionError;
use crate::execution::{ci_statements, CiPrivilege};
use crate::federation::GithubFederation;
use crate::types::{Attr, DeployContext, Resource};
use crate::unit::ProvisioningUnit;

use super::{
    OUTPUT_CI_ROLE_ARN, OUTPUT_CLIENT_ID, OUTPUT_DISCOVERY_URL, OUTPUT_REPOSITORY_NAME,
    OUTPUT_REPOSITORY_URI,
};

/// End-user identity provider surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct IdentityConfig {
    pub pool_name: String,
    pub client_name: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        IdentityConfig {
            pool_name: "agentcore-user-pool".to_string(),
            client_name: "agentcore-web-client".to_string(),
        }
    }
}

/// CI federation surface: who may push images, and with what privilege.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CiConfig {
    pub federation: GithubFederation,
    pub role_name: String,
    #[serde(default)]
    pub privilege: CiPrivilege,
}

impl CiConfig {
    pub fn new(federation: GithubFederation) -> Self {
        CiConfig {
            federation,
            role_name: "github-actions-deploy".to_string(),
            privilege: CiPrivilege::default(),
        }
    }
}

/// Configuration of the foundation unit. The identity and CI blocks are
/// optional: a bare foundation is just the repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct FoundationConfig {
    pub repository_name: String,
    pub identity: Option<IdentityConfig>,
    pub ci: Option<CiConfig>,
}

impl Default for FoundationConfig {
    fn default() -> Self {
        FoundationConfig {
            repository_name: "agentcore-rust-agent-repo".to_string(),
            identity: Some(IdentityConfig::default()),
            ci: None,
        }
    }
}

/// Assemble the foundation unit.
///
/// Exports the repository name/URI always, the client id and discovery URL
/// when the identity block is present, and the CI role ARN when the CI
/// block is present.
pub fn foundation_unit(
    ctx: DeployContext,
    config: FoundationConfig,
) -> Result<ProvisioningUnit, ProvisionError> {
    let mut unit = ProvisioningUnit::new("foundation", ctx.clone());

    let repository = unit.declare(
        "Repository",
        Resource::Repository {
            name: config.repository_name.clone(),
        },
    )?;
    unit.export(OUTPUT_REPOSITORY_URI, repository.attr(Attr::Uri))?;
    unit.export(OUTPUT_REPOSITORY_NAME, repository.attr(Attr::Name))?;

    if let Some(identity) = config.identity {
        let pool = unit.declare(
            "UserPool",
            Resource::UserPool {
                name: identity.pool_name,
            },
        )?;
        let client = unit.declare(
            "UserPoolClient",
            Resource::UserPoolClient {
                name: identity.client_name,
                user_pool: pool.attr(Attr::Id),
            },
        )?;
        unit.export(OUTPUT_CLIENT_ID, client.attr(Attr::Id))?;
        unit.export(OUTPUT_DISCOVERY_URL, pool.attr(Attr::DiscoveryUrl))?;
    }

    if let Some(ci) = config.ci {
        let provider = unit.declare(
            "GithubOidcProvider",
            Resource::OpenIdProvider {
                url: format!("https://{}", ci.federation.issuer_host()),
                client_ids: vec![ci.federation.audience().to_string()],
            },
        )?;
        let role = unit.declare(
            "GithubActionsRole",
            Resource::Role {
                name: ci.role_name,
                trust: ci.federation.trust_policy(&ctx)?,
                policies: ci_statements(&ctx, &config.repository_name, ci.privilege)?,
            },
        )?;
        // The trust policy names the provider registration by ARN pattern,
        // not by reference, so the ordering edge must be explicit.
        unit.depends_on(&role, &provider)?;
        unit.export(OUTPUT_CI_ROLE_ARN, role.attr(Attr::Arn))?;
    }

    Ok(unit)
}
