use thiserror::Error;

use crate::builders::ValidationError;
use crate::config::ConfigError;
use crate::domain::{TechnicianError, WorkOrderError};
use crate::edges::EdgeId;
use crate::nodes::{NodeId, NodeKind, RegistryError};

use super::GraphId;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GraphError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("invalid graph configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("rejected work order: {0}")]
    WorkOrder(#[from] WorkOrderError),

    #[error("rejected technician: {0}")]
    Technician(#[from] TechnicianError),

    #[error("edge {0} not found")]
    EdgeNotFound(EdgeId),

    #[error("node {node} is still referenced by {edges} edges")]
    NodeStillReferenced { node: NodeId, edges: usize },

    #[error("node {node} is a {found}, expected a {expected}")]
    KindMismatch {
        node: NodeId,
        expected: NodeKind,
        found: NodeKind,
    },

    #[error("edge was validated at revision {built_at}, graph is at {current}")]
    StaleEdge { built_at: u64, current: u64 },

    #[error("edge was validated against graph {found}, not {expected}")]
    ForeignEdge { expected: GraphId, found: GraphId },

    #[error("activity relations of work order {work_order} form a cycle")]
    RelationCycle { work_order: NodeId },

    #[error("edge went stale on each of {attempts} commit attempts")]
    CommitContention { attempts: u32 },
}
