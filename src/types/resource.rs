//! Resource declarations a provisioning unit can hold.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum_macros::{Display as StrumDisplay, EnumDiscriminants, EnumString};
use utoipa::ToSchema;

use crate::error::ProvisionError;

use super::context::DeployContext;
use super::reference::AttrRef;
use super::statement::PolicyStatement;
use super::trust::TrustPolicy;

static REPOSITORY_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9._/-]{1,255}$").unwrap());
static RUNTIME_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]{0,47}$").unwrap());
static ROLE_NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\w+=,.@-]{1,64}$").unwrap());

/// How the hosted runtime is exposed.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, StrumDisplay,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum NetworkMode {
    #[default]
    Public,
    Vpc,
}

/// Inbound-token validation for the hosted runtime: tokens must come from
/// the issuer behind `discovery_url` and name one of `allowed_clients`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct JwtAuthorizer {
    discovery_url: String,
    allowed_clients: Vec<String>,
}

impl JwtAuthorizer {
    pub fn new(
        discovery_url: impl Into<String>,
        allowed_clients: Vec<String>,
    ) -> Result<Self, ProvisionError> {
        let discovery_url = discovery_url.into();
        if !discovery_url.starts_with("https://") {
            return Err(ProvisionError::InvalidName(format!(
                "discovery url '{discovery_url}' is not an https URL"
            )));
        }
        if allowed_clients.is_empty() {
            return Err(ProvisionError::InvalidName(
                "authorizer allow-list is empty".to_string(),
            ));
        }
        if allowed_clients.iter().any(|c| c.trim().is_empty()) {
            return Err(ProvisionError::InvalidName(
                "authorizer allow-list contains a blank client id".to_string(),
            ));
        }
        Ok(JwtAuthorizer {
            discovery_url,
            allowed_clients,
        })
    }

    pub fn discovery_url(&self) -> &str {
        &self.discovery_url
    }

    pub fn allowed_clients(&self) -> &[String] {
        &self.allowed_clients
    }
}

/// A declared resource. Declarations are immutable once added to a unit;
/// generated values (ARNs, ids, URIs) exist only after materialization and
/// are reached through [`AttrRef`]s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, EnumDiscriminants)]
#[strum_discriminants(name(ResourceKind), derive(EnumString, StrumDisplay))]
pub enum Resource {
    /// A container image repository.
    Repository { name: String },
    /// A managed end-user identity pool.
    UserPool { name: String },
    /// An app client registered against a pool.
    UserPoolClient { name: String, user_pool: AttrRef },
    /// An external token issuer registered with the identity service.
    OpenIdProvider { url: String, client_ids: Vec<String> },
    /// An assumable identity with an inline permissions policy.
    Role {
        name: String,
        trust: TrustPolicy,
        policies: Vec<PolicyStatement>,
    },
    /// The hosted agent runtime.
    AgentRuntime {
        name: String,
        container_uri: String,
        role_arn: AttrRef,
        authorizer: Option<JwtAuthorizer>,
        network_mode: NetworkMode,
    },
}

impl Resource {
    pub fn kind(&self) -> ResourceKind {
        self.into()
    }

    /// Generated-attribute references this declaration carries; the engine
    /// turns each into an ordering edge.
    pub fn references(&self) -> Vec<&AttrRef> {
        match self {
            Resource::UserPoolClient { user_pool, .. } => vec![user_pool],
            Resource::AgentRuntime { role_arn, .. } => vec![role_arn],
            _ => Vec::new(),
        }
    }

    /// Declaration-time validation: name grammars, policy scoping, and
    /// authorizer shape. Runs before the resource enters a unit.
    pub fn validate(&self, ctx: &DeployContext) -> Result<(), ProvisionError> {
        match self {
            Resource::Repository { name } => {
                if !REPOSITORY_NAME_RE.is_match(name) {
                    return Err(ProvisionError::InvalidName(format!(
                        "repository name '{name}' (lowercase, 2-256 chars)"
                    )));
                }
            }
            Resource::UserPool { name } => {
                if name.trim().is_empty() {
                    return Err(ProvisionError::InvalidName("user pool name is blank".into()));
                }
            }
            Resource::UserPoolClient { name, .. } => {
                if name.trim().is_empty() {
                    return Err(ProvisionError::InvalidName(
                        "user pool client name is blank".into(),
                    ));
                }
            }
            Resource::OpenIdProvider { url, client_ids } => {
                if !url.starts_with("https://") {
                    return Err(ProvisionError::InvalidName(format!(
                        "issuer url '{url}' is not an https URL"
                    )));
                }
                if client_ids.is_empty() {
                    return Err(ProvisionError::InvalidName(
                        "issuer registration has no client ids".into(),
                    ));
                }
            }
            Resource::Role { name, policies, .. } => {
                if !ROLE_NAME_RE.is_match(name) {
                    return Err(ProvisionError::InvalidName(format!(
                        "role name '{name}' (1-64 chars of [A-Za-z0-9_+=,.@-])"
                    )));
                }
                for statement in policies {
                    statement.validate(ctx)?;
                }
            }
            Resource::AgentRuntime {
                name,
                container_uri,
                ..
            } => {
                if !RUNTIME_NAME_RE.is_match(name) {
                    return Err(ProvisionError::InvalidName(format!(
                        "runtime name '{name}' (letter start, then [A-Za-z0-9_], max 48)"
                    )));
                }
                if container_uri.trim().is_empty() || !container_uri.contains(':') {
                    return Err(ProvisionError::InvalidName(format!(
                        "container uri '{container_uri}' is missing a tag"
                    )));
                }
            }
        }
        Ok(())
    }
}
