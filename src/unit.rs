//! Provisioning units: named collections of resource declarations with
//! explicit dependency edges, required parameters, and exported outputs.

use serde::{Deserialize, Serialize};

use crate::error::ProvisionError;
use crate::types::{
    Attr, AttrRef, DeployContext, LogicalId, Output, OutputValue, ParameterMap, Resource,
};

/// Handle to a declared resource, owned by the declaring unit's caller.
///
/// A handle only mints attribute references; generated values appear after
/// evaluation. Other units never receive a handle, only exported strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceHandle {
    id: LogicalId,
}

impl ResourceHandle {
    pub fn id(&self) -> &LogicalId {
        &self.id
    }

    /// A reference to one of this resource's generated attributes.
    pub fn attr(&self, attr: Attr) -> AttrRef {
        AttrRef::new(self.id.clone(), attr)
    }
}

/// A named, independently deployable collection of resource declarations.
///
/// Declarations are registered in order; the engine derives the dependency
/// graph from explicit edges plus attribute references and materializes in
/// topological order. Handles are the only way to mint references, so a
/// declaration can never reference a resource that is not already in the
/// unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisioningUnit {
    name: String,
    context: DeployContext,
    required: Vec<String>,
    parameters: ParameterMap,
    resources: Vec<(LogicalId, Resource)>,
    edges: Vec<(LogicalId, LogicalId)>,
    outputs: Vec<Output>,
}

impl ProvisioningUnit {
    pub fn new(name: impl Into<String>, context: DeployContext) -> Self {
        ProvisioningUnit {
            name: name.into(),
            context,
            required: Vec::new(),
            parameters: ParameterMap::new(),
            resources: Vec::new(),
            edges: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// Declare a named parameter this unit cannot evaluate without.
    pub fn require(&mut self, name: impl Into<String>) {
        self.required.push(name.into());
    }

    /// Supply the parameter snapshot. Every required name must be present
    /// and non-blank; the first violation aborts before any declaration is
    /// inspected.
    pub fn import(&mut self, parameters: ParameterMap) -> Result<(), ProvisionError> {
        for name in &self.required {
            parameters.require(name)?;
        }
        self.parameters = parameters;
        Ok(())
    }

    /// Register a resource declaration under a unit-unique logical id.
    pub fn declare(
        &mut self,
        id: impl Into<LogicalId>,
        resource: Resource,
    ) -> Result<ResourceHandle, ProvisionError> {
        let id = id.into();
        if self.resources.iter().any(|(existing, _)| *existing == id) {
            return Err(ProvisionError::DuplicateLogicalId(id.to_string()));
        }
        resource.validate(&self.context)?;
        self.resources.push((id.clone(), resource));
        Ok(ResourceHandle { id })
    }

    /// Record an explicit ordering edge: `dependency` materializes strictly
    /// before `dependent`. Needed when the ordering matters but no value
    /// reference exists to infer it from (policy attachment is asynchronous
    /// in the provider, so a runtime racing its role's policies would fail
    /// at first invocation).
    pub fn depends_on(
        &mut self,
        dependent: &ResourceHandle,
        dependency: &ResourceHandle,
    ) -> Result<(), ProvisionError> {
        for handle in [dependent, dependency] {
            if !self.resources.iter().any(|(id, _)| id == handle.id()) {
                return Err(ProvisionError::UnknownResource(handle.id().to_string()));
            }
        }
        self.edges
            .push((dependency.id().clone(), dependent.id().clone()));
        Ok(())
    }

    /// Export a value under a unit-unique output name.
    pub fn export(
        &mut self,
        name: impl Into<String>,
        value: impl Into<OutputValue>,
    ) -> Result<(), ProvisionError> {
        let name = name.into();
        if self.outputs.iter().any(|output| output.name() == name) {
            return Err(ProvisionError::DuplicateOutput(name));
        }
        self.outputs.push(Output::new(name, value));
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn context(&self) -> &DeployContext {
        &self.context
    }

    pub fn required(&self) -> &[String] {
        &self.required
    }

    pub fn parameters(&self) -> &ParameterMap {
        &self.parameters
    }

    pub fn resources(&self) -> &[(LogicalId, Resource)] {
        &self.resources
    }

    pub fn edges(&self) -> &[(LogicalId, LogicalId)] {
        &self.edges
    }

    pub fn outputs(&self) -> &[Output] {
        &self.outputs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> DeployContext {
        DeployContext::new("123456789012", "us-east-1").unwrap()
    }

    fn repository() -> Resource {
        Resource::Repository {
            name: "agent-repo".to_string(),
        }
    }

    #[test]
    fn test_duplicate_logical_id_is_rejected() {
        let mut unit = ProvisioningUnit::new("foundation", ctx());
        unit.declare("Repository", repository()).unwrap();
        let err = unit.declare("Repository", repository()).unwrap_err();
        assert_eq!(
            err,
            ProvisionError::DuplicateLogicalId("Repository".to_string())
        );
    }

    #[test]
    fn test_duplicate_output_is_rejected() {
        let mut unit = ProvisioningUnit::new("foundation", ctx());
        let repo = unit.declare("Repository", repository()).unwrap();
        unit.export("ECRRepositoryName", repo.attr(Attr::Name)).unwrap();
        let err = unit
            .export("ECRRepositoryName", repo.attr(Attr::Uri))
            .unwrap_err();
        assert_eq!(
            err,
            ProvisionError::DuplicateOutput("ECRRepositoryName".to_string())
        );
    }

    #[test]
    fn test_import_checks_required_before_storing() {
        let mut unit = ProvisioningUnit::new("runtime", ctx());
        unit.require("REPO_NAME");
        unit.require("REPO_URI");

        let err = unit
            .import(ParameterMap::new().with("REPO_NAME", "agent-repo"))
            .unwrap_err();
        assert_eq!(err, ProvisionError::MissingParameter("REPO_URI".to_string()));
        assert!(unit.parameters().is_empty());

        unit.import(
            ParameterMap::new()
                .with("REPO_NAME", "agent-repo")
                .with("REPO_URI", "host"),
        )
        .unwrap();
        assert_eq!(unit.parameters().get("REPO_URI"), Some("host"));
    }

    #[test]
    fn test_declaration_validation_runs_at_declare_time() {
        let mut unit = ProvisioningUnit::new("foundation", ctx());
        let err = unit
            .declare(
                "Repository",
                Resource::Repository {
                    name: "Bad Name".to_string(),
                },
            )
            .unwrap_err();
        assert!(matches!(err, ProvisionError::InvalidName(_)));
        assert!(unit.resources().is_empty());
    }

    #[test]
    fn test_depends_on_rejects_unknown_handles() {
        let mut unit = ProvisioningUnit::new("runtime", ctx());
        let repo = unit.declare("Repository", repository()).unwrap();

        let mut other = ProvisioningUnit::new("other", ctx());
        let foreign = other.declare("Foreign", repository()).unwrap();

        let err = unit.depends_on(&repo, &foreign).unwrap_err();
        assert_eq!(err, ProvisionError::UnknownResource("Foreign".to_string()));
    }

    #[test]
    fn test_edge_orientation() {
        let mut unit = ProvisioningUnit::new("runtime", ctx());
        let a = unit.declare("A", repository()).unwrap();
        let b = unit
            .declare(
                "B",
                Resource::UserPool {
                    name: "pool".to_string(),
                },
            )
            .unwrap();
        unit.depends_on(&b, &a).unwrap();
        assert_eq!(
            unit.edges(),
            &[(LogicalId::from("A"), LogicalId::from("B"))]
        );
    }
}
