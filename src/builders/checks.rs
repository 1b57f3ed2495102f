//! Role-level checks shared by every builder.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::domain::{Period, Technician};
use crate::edges::Role;
use crate::nodes::{ActivityNode, Node, NodeId, WorkOrderNode};

use super::{GraphView, ValidationError};

/// Rejects an empty member list or one naming a node twice.
pub(crate) fn distinct_members(role: Role, members: &[NodeId]) -> Result<(), ValidationError> {
    if members.is_empty() {
        return Err(ValidationError::EmptyRole(role));
    }
    let mut seen = HashSet::with_capacity(members.len());
    for &node in members {
        if !seen.insert(node) {
            return Err(ValidationError::DuplicateRoleMember { role, node });
        }
    }
    Ok(())
}

/// Resolves `id` and checks it has the kind `role` demands.
pub(crate) fn node_in_role<'a>(
    view: &'a dyn GraphView,
    id: NodeId,
    role: Role,
) -> Result<&'a Node, ValidationError> {
    let node = view.node(id).ok_or(ValidationError::NodeNotFound(id))?;
    let expected = role.expected_kind();
    if node.kind() != expected {
        return Err(ValidationError::KindMismatch {
            node: id,
            role,
            expected,
            found: node.kind(),
        });
    }
    Ok(node)
}

fn mismatch(id: NodeId, role: Role, node: &Node) -> ValidationError {
    ValidationError::KindMismatch {
        node: id,
        role,
        expected: role.expected_kind(),
        found: node.kind(),
    }
}

pub(crate) fn work_order<'a>(
    view: &'a dyn GraphView,
    id: NodeId,
) -> Result<&'a WorkOrderNode, ValidationError> {
    let node = node_in_role(view, id, Role::WorkOrder)?;
    node.as_work_order()
        .ok_or_else(|| mismatch(id, Role::WorkOrder, node))
}

pub(crate) fn activity<'a>(
    view: &'a dyn GraphView,
    id: NodeId,
    role: Role,
) -> Result<&'a ActivityNode, ValidationError> {
    let node = node_in_role(view, id, role)?;
    node.as_activity().ok_or_else(|| mismatch(id, role, node))
}

pub(crate) fn technician<'a>(
    view: &'a dyn GraphView,
    id: NodeId,
) -> Result<&'a Technician, ValidationError> {
    let node = node_in_role(view, id, Role::Technician)?;
    node.as_technician()
        .ok_or_else(|| mismatch(id, Role::Technician, node))
}

pub(crate) fn period(view: &dyn GraphView, id: NodeId) -> Result<Period, ValidationError> {
    let node = node_in_role(view, id, Role::Period)?;
    node.as_period().ok_or_else(|| mismatch(id, Role::Period, node))
}

pub(crate) fn day(view: &dyn GraphView, id: NodeId) -> Result<NaiveDate, ValidationError> {
    let node = node_in_role(view, id, Role::Day)?;
    node.as_day().ok_or_else(|| mismatch(id, Role::Day, node))
}
