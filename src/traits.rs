use std::collections::BTreeMap;

use crate::error::ProvisionError;
use crate::types::{Attr, DeployContext, LogicalId, Resource};

/// Generated attributes of one materialized resource.
pub type ResourceState = BTreeMap<Attr, String>;

/// The seam to the underlying provisioning engine.
///
/// The engine owns creation, update, retries, and teardown; this crate only
/// asks it to make a declaration real and hand back the generated
/// identifiers. Implementations are called in dependency order, one
/// resource at a time.
pub trait ResourceProvider {
    fn materialize(
        &mut self,
        ctx: &DeployContext,
        id: &LogicalId,
        resource: &Resource,
    ) -> Result<ResourceState, ProvisionError>;
}
