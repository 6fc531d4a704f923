//! Deployment context: the account, region, and partition every scoped
//! pattern is built against.
//!
//! The context is always passed explicitly to constructors. Nothing in this
//! crate reads account or region from ambient state.

use std::fmt::{Display, Formatter, Result as FmtResult};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ProvisionError;

static ACCOUNT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{12}$").unwrap());
static REGION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z]{2}(-[a-z]+)+-\d$").unwrap());

/// The account/region/partition a unit deploys into.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
pub struct DeployContext {
    account: String,
    region: String,
    partition: String,
}

impl DeployContext {
    /// Create a context for the standard partition.
    ///
    /// The account must be a 12-digit identifier and the region must follow
    /// the provider region grammar (e.g. `us-east-1`).
    pub fn new(
        account: impl Into<String>,
        region: impl Into<String>,
    ) -> Result<Self, ProvisionError> {
        let account = account.into();
        let region = region.into();
        if !ACCOUNT_RE.is_match(&account) {
            return Err(ProvisionError::InvalidContext(format!(
                "account '{account}' is not a 12-digit account id"
            )));
        }
        if !REGION_RE.is_match(&region) {
            return Err(ProvisionError::InvalidContext(format!(
                "region '{region}' is not a valid region name"
            )));
        }
        Ok(DeployContext {
            account,
            region,
            partition: "aws".to_string(),
        })
    }

    /// Override the partition (e.g. `aws-us-gov`).
    pub fn with_partition(mut self, partition: impl Into<String>) -> Result<Self, ProvisionError> {
        let partition = partition.into();
        if partition.is_empty() || partition.contains(':') {
            return Err(ProvisionError::InvalidContext(format!(
                "partition '{partition}' is not a valid partition name"
            )));
        }
        self.partition = partition;
        Ok(self)
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn partition(&self) -> &str {
        &self.partition
    }
}

impl Display for DeployContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}/{}/{}", self.partition, self.account, self.region)
    }
}
