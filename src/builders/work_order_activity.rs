use std::collections::HashSet;

use crate::edges::{EdgeKind, Hyperedge, Role, RoleMembers, WorkOrderActivity};
use crate::nodes::NodeId;

use super::{checks, EdgeBuilder, GraphView, ValidationError};

/// Proposes the set of activities a work order is composed of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkOrderActivityBuilder {
    work_order: NodeId,
    activities: RoleMembers,
}

impl WorkOrderActivityBuilder {
    pub fn new(work_order: NodeId) -> Self {
        Self {
            work_order,
            activities: RoleMembers::new(),
        }
    }

    pub fn activity(mut self, activity: NodeId) -> Self {
        self.activities.push(activity);
        self
    }

    pub fn activities(mut self, activities: impl IntoIterator<Item = NodeId>) -> Self {
        self.activities.extend(activities);
        self
    }
}

impl EdgeBuilder for WorkOrderActivityBuilder {
    fn kind(&self) -> EdgeKind {
        EdgeKind::WorkOrderActivity
    }

    fn build_edge(&self, view: &dyn GraphView) -> Result<Hyperedge, ValidationError> {
        checks::distinct_members(Role::Activity, &self.activities)?;
        let work_order = checks::work_order(view, self.work_order)?;

        let mut numbers = HashSet::with_capacity(self.activities.len());
        for &id in &self.activities {
            let activity = checks::activity(view, id, Role::Activity)?;
            if activity.work_order_number() != work_order.work_order_number() {
                return Err(ValidationError::ActivityOwnerMismatch {
                    activity: id,
                    owner: activity.work_order_number(),
                    work_order: work_order.work_order_number(),
                });
            }
            if !numbers.insert(activity.activity_number()) {
                return Err(ValidationError::DuplicateActivityNumber {
                    work_order: self.work_order,
                    activity_number: activity.activity_number(),
                });
            }
            if let Some((edge, _)) = view.composing_edge(id) {
                return Err(ValidationError::ActivityAlreadyComposed { activity: id, edge });
            }
        }

        Ok(Hyperedge::WorkOrderActivity(WorkOrderActivity::new(
            self.work_order,
            self.activities.clone(),
        )))
    }
}
