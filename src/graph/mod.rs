//! The schedule graph: registry, edge arena and incidence index kept in
//! lockstep.
//!
//! Every mutation goes through [`ScheduleGraph`] and bumps its revision.
//! Edges enter only as [`ValidatedEdge`]s built against the current revision
//! of this very graph, so insertion itself never re-validates.

mod arena;
mod error;
mod ingest;
mod query;
mod shared;
mod structure;

#[cfg(test)]
mod tests;

use std::fmt;

use tracing::debug;
use uuid::Uuid;

use crate::builders::{EdgeBuilder, GraphView, ValidatedEdge};
use crate::config::GraphConfig;
use crate::edges::{EdgeId, Hyperedge, PeriodDay, WorkOrderActivity};
use crate::incidence::IncidenceIndex;
use crate::nodes::{ExternalKey, Node, NodeId, NodeRegistry, RegistryError};

use arena::EdgeArena;
use structure::StructureIndex;

pub use error::GraphError;
pub use ingest::IngestedWorkOrder;
pub use shared::SharedScheduleGraph;

/// Identity of one graph instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GraphId(Uuid);

impl GraphId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for GraphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Typed scheduling hypergraph.
///
/// # Internal Structure
/// - `registry`: node identity and attributes
/// - `edges`: generation-stamped arena of committed edges
/// - `incidence`: node → incident edges with roles
/// - `structure`: period, day and activity → decomposing or composing edge
///
/// # Invariants
///
/// - Every node an edge names is registered with the kind its role demands
/// - `incidence` and `structure` index exactly the edges in `edges`
/// - `revision` grows with every mutation
/// - No two graphs share an id, clones included
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use schedule_hypergraph::domain::{Activity, Skill, Technician, WorkOrder};
/// use schedule_hypergraph::{AssignmentBuilder, ExternalKey, ScheduleGraph};
///
/// let monday = NaiveDate::from_ymd_opt(2025, 1, 13).unwrap();
/// let mut graph = ScheduleGraph::new();
///
/// // A period, its fourteen days and the edge decomposing it
/// let period = graph.ingest_periods(&[monday]).unwrap()[0];
/// assert_eq!(graph.period_days(period).map(|days| days.len()), Some(14));
///
/// let record = WorkOrder::new(1000000001, monday, vec![Activity::new(10, 1, Skill::MtnMech)]);
/// let activity = graph.ingest_work_order(&record.unwrap()).unwrap().activities[0];
///
/// let technician = Technician::builder(7)
///     .add_skill(Skill::MtnMech)
///     .add_availability(
///         monday.and_hms_opt(7, 0, 0).unwrap(),
///         monday.and_hms_opt(17, 0, 0).unwrap(),
///     )
///     .unwrap()
///     .build()
///     .unwrap();
/// let technician = graph.ingest_technician(&technician).unwrap();
///
/// let day = graph.resolve(&ExternalKey::Day(monday)).unwrap();
/// let edge = graph
///     .add(&AssignmentBuilder::new(activity, period).technician(technician).day(day))
///     .unwrap();
/// let (found, _) = graph.assignments_for_technician(technician).next().unwrap();
/// assert_eq!(found, edge);
///
/// // Nobody is available on Tuesday
/// let tuesday = graph
///     .resolve(&ExternalKey::Day(monday.succ_opt().unwrap()))
///     .unwrap();
/// let rejected = AssignmentBuilder::new(activity, period).technician(technician).day(tuesday);
/// assert!(graph.add(&rejected).is_err());
/// assert_eq!(graph.assignments_for_period(period).count(), 1);
/// ```
#[derive(Debug)]
pub struct ScheduleGraph {
    id: GraphId,
    config: GraphConfig,
    revision: u64,
    registry: NodeRegistry,
    edges: EdgeArena,
    incidence: IncidenceIndex,
    structure: StructureIndex,
}

/// The copy is a separate graph with its own id: an edge validated on one
/// is foreign to the other.
impl Clone for ScheduleGraph {
    fn clone(&self) -> Self {
        Self {
            id: GraphId::generate(),
            config: self.config.clone(),
            revision: self.revision,
            registry: self.registry.clone(),
            edges: self.edges.clone(),
            incidence: self.incidence.clone(),
            structure: self.structure.clone(),
        }
    }
}

impl Default for ScheduleGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduleGraph {
    pub fn new() -> Self {
        Self::from_valid_config(GraphConfig::default())
    }

    pub fn with_config(config: GraphConfig) -> Result<Self, GraphError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: GraphConfig) -> Self {
        Self {
            id: GraphId::generate(),
            config,
            revision: 0,
            registry: NodeRegistry::new(),
            edges: EdgeArena::default(),
            incidence: IncidenceIndex::new(),
            structure: StructureIndex::default(),
        }
    }

    pub fn id(&self) -> GraphId {
        self.id
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    pub fn incidence(&self) -> &IncidenceIndex {
        &self.incidence
    }

    pub fn node_count(&self) -> usize {
        self.registry.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn register(&mut self, node: Node) -> Result<NodeId, RegistryError> {
        let id = self.registry.register(node)?;
        self.revision += 1;
        Ok(id)
    }

    /// Registers `node` unless the identical fact already exists.
    pub fn ensure(&mut self, node: Node) -> Result<NodeId, RegistryError> {
        let before = self.registry.len();
        let id = self.registry.ensure(node)?;
        if self.registry.len() != before {
            self.revision += 1;
        }
        Ok(id)
    }

    pub fn lookup(&self, id: NodeId) -> Result<&Node, RegistryError> {
        self.registry.lookup(id)
    }

    pub fn resolve(&self, key: &ExternalKey) -> Option<NodeId> {
        self.registry.resolve_external_key(key)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Hyperedge> {
        self.edges.get(id)
    }

    pub fn contains_edge(&self, id: EdgeId) -> bool {
        self.edges.contains(id)
    }

    /// Commits an edge validated against this graph at its current revision.
    ///
    /// An edge from [`validate_replacement`](Self::validate_replacement)
    /// retires the edge it replaces in the same step.
    ///
    /// # Errors
    ///
    /// - `ForeignEdge` if it was built against another graph
    /// - `StaleEdge` if the graph changed since it was built
    pub fn insert(&mut self, edge: ValidatedEdge) -> Result<EdgeId, GraphError> {
        if edge.graph_id() != self.id {
            return Err(GraphError::ForeignEdge {
                expected: self.id,
                found: edge.graph_id(),
            });
        }
        if edge.revision() != self.revision {
            return Err(GraphError::StaleEdge {
                built_at: edge.revision(),
                current: self.revision,
            });
        }
        // An unchanged revision means the replaced edge is still live.
        let replaces = edge.replaces();
        if let Some(old) = replaces {
            self.retire_edge(old)?;
        }
        let id = self.insert_edge(edge.into_edge());
        self.revision += 1;
        if let Some(old) = replaces {
            debug!(%old, new = %id, "edge replaced");
        }
        Ok(id)
    }

    /// Builds `builder` against the current state and commits the result.
    pub fn add<B: EdgeBuilder + ?Sized>(&mut self, builder: &B) -> Result<EdgeId, GraphError> {
        let edge = builder.build(&*self)?;
        self.insert(edge)
    }

    /// Removes a committed edge and hands it back.
    pub fn retire(&mut self, id: EdgeId) -> Result<Hyperedge, GraphError> {
        let edge = self.retire_edge(id)?;
        self.revision += 1;
        Ok(edge)
    }

    /// Validates `builder` as the replacement of `old`.
    ///
    /// The new edge is checked as if `old` were already gone, so it may
    /// reuse the members `old` held exclusively. Inserting the result
    /// retires `old`.
    pub fn validate_replacement<B: EdgeBuilder + ?Sized>(
        &self,
        old: EdgeId,
        builder: &B,
    ) -> Result<ValidatedEdge, GraphError> {
        if !self.edges.contains(old) {
            return Err(GraphError::EdgeNotFound(old));
        }
        let view = HidingView {
            graph: self,
            hidden: old,
        };
        Ok(builder.build(&view)?.replacing(old))
    }

    /// Swaps `old` for the edge `builder` produces, in one step. On failure
    /// nothing changes.
    pub fn replace<B: EdgeBuilder + ?Sized>(
        &mut self,
        old: EdgeId,
        builder: &B,
    ) -> Result<EdgeId, GraphError> {
        let edge = self.validate_replacement(old, builder)?;
        self.insert(edge)
    }

    /// Removes a node no edge references any more.
    pub fn remove_node(&mut self, id: NodeId) -> Result<Node, GraphError> {
        let edges = self.incidence.degree(id);
        if edges > 0 {
            return Err(GraphError::NodeStillReferenced { node: id, edges });
        }
        let node = self.registry.remove(id)?;
        self.revision += 1;
        debug!(node = %id, kind = %node.kind(), "node removed");
        Ok(node)
    }

    /// Re-derives both indexes from the edge set and compares, and checks
    /// every edge member resolves to a node of the right kind.
    pub fn check_consistency(&self) -> bool {
        let mut rebuilt = IncidenceIndex::new();
        let mut structure = StructureIndex::default();
        for (id, edge) in self.edges.iter() {
            let members_ok = edge.roled_nodes().all(|(role, node)| {
                self.registry
                    .get(node)
                    .is_some_and(|n| n.kind() == role.expected_kind())
            });
            if !members_ok {
                return false;
            }
            rebuilt.on_insert(id, edge);
            structure.on_insert(id, edge);
        }
        rebuilt == self.incidence && structure == self.structure
    }

    pub(crate) fn insert_edge(&mut self, edge: Hyperedge) -> EdgeId {
        let kind = edge.kind();
        let (id, stored) = self.edges.insert(edge);
        self.incidence.on_insert(id, stored);
        self.structure.on_insert(id, stored);
        debug!(edge = %id, %kind, "edge inserted");
        id
    }

    pub(crate) fn retire_edge(&mut self, id: EdgeId) -> Result<Hyperedge, GraphError> {
        let edge = self.edges.remove(id).ok_or(GraphError::EdgeNotFound(id))?;
        self.incidence.on_retire(id, &edge);
        self.structure.on_retire(id, &edge);
        debug!(edge = %id, kind = %edge.kind(), "edge retired");
        Ok(edge)
    }
}

impl GraphView for ScheduleGraph {
    fn config(&self) -> &GraphConfig {
        &self.config
    }

    fn graph_id(&self) -> GraphId {
        self.id
    }

    fn revision(&self) -> u64 {
        self.revision
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.registry.get(id)
    }

    fn edge(&self, id: EdgeId) -> Option<&Hyperedge> {
        self.edges.get(id)
    }

    fn incident_edges(&self, node: NodeId) -> Box<dyn Iterator<Item = EdgeId> + '_> {
        Box::new(self.incidence.edges_touching(node))
    }

    fn period_day_edge(&self, period: NodeId) -> Option<(EdgeId, &PeriodDay)> {
        let id = self.structure.decomposition_of_period(period)?;
        self.edges
            .get(id)
            .and_then(Hyperedge::as_period_day)
            .map(|edge| (id, edge))
    }

    fn period_day_edge_of_day(&self, day: NodeId) -> Option<(EdgeId, &PeriodDay)> {
        let id = self.structure.decomposition_of_day(day)?;
        self.edges
            .get(id)
            .and_then(Hyperedge::as_period_day)
            .map(|edge| (id, edge))
    }

    fn composing_edge(&self, activity: NodeId) -> Option<(EdgeId, &WorkOrderActivity)> {
        let id = self.structure.composition_of_activity(activity)?;
        self.edges
            .get(id)
            .and_then(Hyperedge::as_work_order_activity)
            .map(|edge| (id, edge))
    }
}

/// The graph as it will look once `hidden` is retired.
struct HidingView<'a> {
    graph: &'a ScheduleGraph,
    hidden: EdgeId,
}

impl GraphView for HidingView<'_> {
    fn config(&self) -> &GraphConfig {
        &self.graph.config
    }

    fn graph_id(&self) -> GraphId {
        self.graph.id
    }

    fn revision(&self) -> u64 {
        self.graph.revision
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.graph.registry.get(id)
    }

    fn edge(&self, id: EdgeId) -> Option<&Hyperedge> {
        if id == self.hidden {
            None
        } else {
            self.graph.edges.get(id)
        }
    }

    fn incident_edges(&self, node: NodeId) -> Box<dyn Iterator<Item = EdgeId> + '_> {
        let hidden = self.hidden;
        Box::new(
            self.graph
                .incidence
                .edges_touching(node)
                .filter(move |&id| id != hidden),
        )
    }

    fn period_day_edge(&self, period: NodeId) -> Option<(EdgeId, &PeriodDay)> {
        self.graph
            .period_day_edge(period)
            .filter(|&(id, _)| id != self.hidden)
    }

    fn period_day_edge_of_day(&self, day: NodeId) -> Option<(EdgeId, &PeriodDay)> {
        self.graph
            .period_day_edge_of_day(day)
            .filter(|&(id, _)| id != self.hidden)
    }

    fn composing_edge(&self, activity: NodeId) -> Option<(EdgeId, &WorkOrderActivity)> {
        self.graph
            .composing_edge(activity)
            .filter(|&(id, _)| id != self.hidden)
    }
}
