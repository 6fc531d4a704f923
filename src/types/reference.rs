//! References to resources and their generated attributes.
//!
//! A declaration may name another resource's generated value only through an
//! [`AttrRef`]; the evaluation engine derives ordering edges from these.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use strum_macros::Display as StrumDisplay;
use utoipa::ToSchema;

/// The name a resource is declared under within its unit.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    ToSchema,
)]
#[serde(transparent)]
pub struct LogicalId(String);

impl LogicalId {
    pub fn new(id: impl Into<String>) -> Self {
        LogicalId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for LogicalId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for LogicalId {
    fn from(id: &str) -> Self {
        LogicalId(id.to_string())
    }
}

/// A generated attribute a materialized resource can expose.
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
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Attr {
    /// The provider-generated ARN.
    Arn,
    /// The provider-generated identifier (pool id, client id, runtime id).
    Id,
    /// The declared or generated name.
    Name,
    /// A generated URI (e.g. the registry host of a repository).
    Uri,
    /// The OpenID discovery document URL of an identity provider.
    DiscoveryUrl,
}

/// A reference to one generated attribute of one declared resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct AttrRef {
    id: LogicalId,
    attr: Attr,
}

impl AttrRef {
    pub fn new(id: LogicalId, attr: Attr) -> Self {
        AttrRef { id, attr }
    }

    pub fn id(&self) -> &LogicalId {
        &self.id
    }

    pub fn attr(&self) -> Attr {
        self.attr
    }
}

impl Display for AttrRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}.{}", self.id, self.attr)
    }
}
