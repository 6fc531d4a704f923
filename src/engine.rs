use std::collections::{BTreeMap, HashMap, HashSet};

use itertools::Itertools;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::ProvisionError;
use crate::traits::{ResourceProvider, ResourceState};
use crate::types::{LogicalId, OutputValue, OutputValues};
use crate::unit::ProvisioningUnit;

/// Evaluates provisioning units against a [`ResourceProvider`].
pub struct UnitEngine<P> {
    provider: P,
}

/// The result of one unit evaluation: materialization order, per-resource
/// generated attributes, and resolved outputs.
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    unit: String,
    order: Vec<LogicalId>,
    states: BTreeMap<LogicalId, ResourceState>,
    outputs: OutputValues,
}

impl Evaluation {
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Logical ids in the order they were materialized.
    pub fn order(&self) -> &[LogicalId] {
        &self.order
    }

    pub fn state(&self, id: &LogicalId) -> Option<&ResourceState> {
        self.states.get(id)
    }

    pub fn outputs(&self) -> &OutputValues {
        &self.outputs
    }
}

impl<P: ResourceProvider> UnitEngine<P> {
    pub fn new(provider: P) -> Self {
        UnitEngine { provider }
    }

    /// Evaluate a unit: check parameters, derive the dependency graph,
    /// materialize in topological order, resolve outputs.
    ///
    /// Parameter checks run before anything else so a misconfigured unit
    /// never partially provisions. The graph combines explicit edges with
    /// edges inferred from attribute references; declaration order breaks
    /// ties, so evaluation is deterministic.
    pub fn evaluate(&mut self, unit: &ProvisioningUnit) -> Result<Evaluation, ProvisionError> {
        for name in unit.required() {
            let value = unit.parameters().require(name)?;
            debug!(unit = unit.name(), parameter = name.as_str(), value, "parameter bound");
        }

        let order = evaluation_order(unit)?;

        let mut states: BTreeMap<LogicalId, ResourceState> = BTreeMap::new();
        for id in &order {
            let (_, resource) = unit
                .resources()
                .iter()
                .find(|(candidate, _)| candidate == id)
                .expect("ordered id comes from the resource list");
            debug!(
                unit = unit.name(),
                id = id.to_string(),
                kind = resource.kind().to_string(),
                "materializing"
            );
            let state = self.provider.materialize(unit.context(), id, resource)?;
            states.insert(id.clone(), state);
        }

        let mut outputs = OutputValues::default();
        for output in unit.outputs() {
            let value = match output.value() {
                OutputValue::Literal(value) => value.clone(),
                OutputValue::Attr(attr_ref) => states
                    .get(attr_ref.id())
                    .and_then(|state| state.get(&attr_ref.attr()))
                    .cloned()
                    .ok_or_else(|| ProvisionError::UnresolvedAttribute {
                        id: attr_ref.id().to_string(),
                        attr: attr_ref.attr().to_string(),
                    })?,
            };
            outputs.insert(output.name(), value);
        }

        info!(
            unit = unit.name(),
            resources = order.len(),
            outputs = outputs.len(),
            "unit evaluated"
        );

        Ok(Evaluation {
            unit: unit.name().to_string(),
            order,
            states,
            outputs,
        })
    }
}

/// Derive the materialization order: explicit edges plus reference-inferred
/// edges, Kahn's algorithm with declaration order as the tie-break.
fn evaluation_order(unit: &ProvisioningUnit) -> Result<Vec<LogicalId>, ProvisionError> {
    let ids: Vec<&LogicalId> = unit.resources().iter().map(|(id, _)| id).collect();
    let index: HashMap<&LogicalId, usize> = ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();

    let mut edges: HashSet<(usize, usize)> = HashSet::new();
    for (dependency, dependent) in unit.edges() {
        let from = *index
            .get(dependency)
            .ok_or_else(|| ProvisionError::UnknownResource(dependency.to_string()))?;
        let to = *index
            .get(dependent)
            .ok_or_else(|| ProvisionError::UnknownResource(dependent.to_string()))?;
        edges.insert((from, to));
    }
    for (id, resource) in unit.resources() {
        let to = index[id];
        for attr_ref in resource.references() {
            let from = *index
                .get(attr_ref.id())
                .ok_or_else(|| ProvisionError::UnknownResource(attr_ref.id().to_string()))?;
            edges.insert((from, to));
        }
    }

    let mut indegree = vec![0usize; ids.len()];
    for (_, to) in &edges {
        indegree[*to] += 1;
    }

    let mut order = Vec::with_capacity(ids.len());
    let mut done = vec![false; ids.len()];
    while order.len() < ids.len() {
        let next = (0..ids.len()).find(|i| !done[*i] && indegree[*i] == 0);
        let Some(next) = next else {
            let stuck = (0..ids.len())
                .filter(|i| !done[*i])
                .map(|i| ids[i].to_string())
                .join(", ");
            return Err(ProvisionError::DependencyCycle(stuck));
        };
        done[next] = true;
        order.push(ids[next].clone());
        for (from, to) in &edges {
            if *from == next {
                indegree[*to] -= 1;
            }
        }
    }

    Ok(order)
}
