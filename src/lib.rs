//! schedule-hypergraph - typed hypergraph model of a maintenance scheduling
//! domain.
//!
//! Work orders, activities, technicians, skills, periods and days are typed
//! nodes; assignments, period decompositions, work-order compositions,
//! activity relations and exclusions are immutable, role-tagged hyperedges.
//! Edges are created only through validating builders and indexed both ways,
//! so scheduling algorithms can ask "which edges touch this node" and "which
//! nodes fill this role" without scanning.

pub mod builders;
pub mod config;
pub mod domain;
pub mod edges;
pub mod graph;
pub mod incidence;
pub mod nodes;

pub use builders::{
    ActivityRelationBuilder, AssignmentBuilder, EdgeBuilder, ExcludeBuilder, GraphView,
    PeriodDayBuilder, ValidatedEdge, ValidationError, WorkOrderActivityBuilder,
};
pub use config::GraphConfig;
pub use edges::{EdgeId, EdgeKind, Hyperedge, Role};
pub use graph::{GraphError, GraphId, ScheduleGraph, SharedScheduleGraph};
pub use nodes::{ExternalKey, Node, NodeId, NodeKind};
