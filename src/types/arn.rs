//! Typed ARN builders, one constructor per service surface.
//!
//! Every pattern used in a policy statement is built here from explicit
//! structured fields and validated before it can appear in a document. The
//! string form is `arn:<partition>:<service>:<region>:<account>:<resource>`;
//! wildcards are legal inside the resource part, the universal wildcard is
//! the separate [`ResourcePattern::Any`].

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ProvisionError;

use super::context::DeployContext;

/// Interpolation residue: any of these in a segment means a template was
/// never filled in.
static PLACEHOLDER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[{}<>$\s]").unwrap());

/// A validated ARN pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Arn {
    partition: String,
    service: String,
    region: String,
    account: String,
    resource: String,
}

impl Arn {
    fn build(
        partition: &str,
        service: &str,
        region: &str,
        account: &str,
        resource: &str,
    ) -> Result<Self, ProvisionError> {
        for (label, segment) in [
            ("partition", partition),
            ("service", service),
            ("region", region),
            ("account", account),
            ("resource", resource),
        ] {
            if PLACEHOLDER_RE.is_match(segment) {
                return Err(ProvisionError::MalformedArn(format!(
                    "{label} segment '{segment}' contains placeholder residue"
                )));
            }
        }
        if partition.is_empty() || service.is_empty() || resource.is_empty() {
            return Err(ProvisionError::MalformedArn(format!(
                "empty segment in arn:{partition}:{service}:{region}:{account}:{resource}"
            )));
        }
        Ok(Arn {
            partition: partition.to_string(),
            service: service.to_string(),
            region: region.to_string(),
            account: account.to_string(),
            resource: resource.to_string(),
        })
    }

    fn regional(
        ctx: &DeployContext,
        service: &str,
        resource: &str,
    ) -> Result<Self, ProvisionError> {
        Arn::build(
            ctx.partition(),
            service,
            ctx.region(),
            ctx.account(),
            resource,
        )
    }

    fn named(label: &str, value: &str) -> Result<(), ProvisionError> {
        if value.trim().is_empty() {
            return Err(ProvisionError::InvalidName(format!("{label} is blank")));
        }
        Ok(())
    }

    /// `repository/<name>` under the image registry service.
    pub fn ecr_repository(ctx: &DeployContext, name: &str) -> Result<Self, ProvisionError> {
        Arn::named("repository name", name)?;
        Arn::regional(ctx, "ecr", &format!("repository/{name}"))
    }

    /// `log-group:<group>`; the group part may carry a trailing wildcard.
    pub fn log_group(ctx: &DeployContext, group: &str) -> Result<Self, ProvisionError> {
        Arn::named("log group", group)?;
        Arn::regional(ctx, "logs", &format!("log-group:{group}"))
    }

    /// `log-group:<group>:log-stream:<stream>`.
    pub fn log_stream(
        ctx: &DeployContext,
        group: &str,
        stream: &str,
    ) -> Result<Self, ProvisionError> {
        Arn::named("log group", group)?;
        Arn::named("log stream", stream)?;
        Arn::regional(ctx, "logs", &format!("log-group:{group}:log-stream:{stream}"))
    }

    /// A workload-identity directory under the agent-hosting service.
    pub fn workload_identity_directory(
        ctx: &DeployContext,
        directory: &str,
    ) -> Result<Self, ProvisionError> {
        Arn::named("workload identity directory", directory)?;
        Arn::regional(
            ctx,
            "bedrock-agentcore",
            &format!("workload-identity-directory/{directory}"),
        )
    }

    /// A workload identity (or identity pattern) inside a directory.
    pub fn workload_identity(
        ctx: &DeployContext,
        directory: &str,
        identity: &str,
    ) -> Result<Self, ProvisionError> {
        Arn::named("workload identity directory", directory)?;
        Arn::named("workload identity", identity)?;
        Arn::regional(
            ctx,
            "bedrock-agentcore",
            &format!("workload-identity-directory/{directory}/workload-identity/{identity}"),
        )
    }

    /// Any resource of the agent-hosting service in this account/region.
    pub fn agent_runtime_any(ctx: &DeployContext) -> Result<Self, ProvisionError> {
        Arn::regional(ctx, "bedrock-agentcore", "*")
    }

    /// The cross-region foundation-model catalog. The catalog is the one
    /// documented pattern with no account owner: models are published per
    /// region by the provider, so region is a wildcard and account is empty.
    pub fn foundation_models(ctx: &DeployContext) -> Result<Self, ProvisionError> {
        Arn::build(ctx.partition(), "bedrock", "*", "", "foundation-model/*")
    }

    /// Account-owned model resources (custom and provisioned models).
    pub fn account_models(ctx: &DeployContext) -> Result<Self, ProvisionError> {
        Arn::regional(ctx, "bedrock", "*")
    }

    /// The IAM OIDC provider registration for a token issuer host.
    pub fn oidc_provider(ctx: &DeployContext, host: &str) -> Result<Self, ProvisionError> {
        Arn::named("issuer host", host)?;
        Arn::build(
            ctx.partition(),
            "iam",
            "",
            ctx.account(),
            &format!("oidc-provider/{host}"),
        )
    }

    /// An IAM role by name.
    pub fn role(ctx: &DeployContext, name: &str) -> Result<Self, ProvisionError> {
        Arn::named("role name", name)?;
        Arn::build(
            ctx.partition(),
            "iam",
            "",
            ctx.account(),
            &format!("role/{name}"),
        )
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Whether the pattern is pinned to the context's account and region.
    /// IAM patterns have no region segment; the account pin is what counts.
    pub fn is_scoped_to(&self, ctx: &DeployContext) -> bool {
        let region_ok = self.region == ctx.region() || (self.service == "iam" && self.region.is_empty());
        self.account == ctx.account() && region_ok
    }

    /// The documented unowned catalog form (`bedrock:*::foundation-model/...`).
    pub fn is_model_catalog(&self) -> bool {
        self.service == "bedrock"
            && self.region == "*"
            && self.account.is_empty()
            && self.resource.starts_with("foundation-model/")
    }
}

impl Display for Arn {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "arn:{}:{}:{}:{}:{}",
            self.partition, self.service, self.region, self.account, self.resource
        )
    }
}

impl FromStr for Arn {
    type Err = ProvisionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.splitn(6, ':').collect();
        match parts.as_slice() {
            ["arn", partition, service, region, account, resource] => {
                Arn::build(partition, service, region, account, resource)
            }
            _ => Err(ProvisionError::MalformedArn(format!(
                "'{s}' is not an arn:<partition>:<service>:<region>:<account>:<resource> pattern"
            ))),
        }
    }
}

impl Serialize for Arn {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Arn {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A statement resource entry: a concrete ARN pattern or the universal
/// wildcard. The wildcard is a distinct variant so it can never arise from
/// interpolation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourcePattern {
    Arn(Arn),
    Any,
}

impl ResourcePattern {
    pub fn is_any(&self) -> bool {
        matches!(self, ResourcePattern::Any)
    }
}

impl From<Arn> for ResourcePattern {
    fn from(arn: Arn) -> Self {
        ResourcePattern::Arn(arn)
    }
}

impl Display for ResourcePattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ResourcePattern::Arn(arn) => write!(f, "{arn}"),
            ResourcePattern::Any => write!(f, "*"),
        }
    }
}

impl FromStr for ResourcePattern {
    type Err = ProvisionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "*" {
            return Ok(ResourcePattern::Any);
        }
        Ok(ResourcePattern::Arn(s.parse()?))
    }
}

impl Serialize for ResourcePattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ResourcePattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
