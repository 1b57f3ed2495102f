use crate::edges::{EdgeKind, Exclude, Hyperedge, Role, RoleMembers};
use crate::nodes::NodeId;

use super::{checks, EdgeBuilder, GraphView, ValidationError};

/// Proposes periods in which a work order must not be scheduled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcludeBuilder {
    work_order: NodeId,
    periods: RoleMembers,
}

impl ExcludeBuilder {
    pub fn new(work_order: NodeId) -> Self {
        Self {
            work_order,
            periods: RoleMembers::new(),
        }
    }

    pub fn period(mut self, period: NodeId) -> Self {
        self.periods.push(period);
        self
    }

    pub fn periods(mut self, periods: impl IntoIterator<Item = NodeId>) -> Self {
        self.periods.extend(periods);
        self
    }
}

impl EdgeBuilder for ExcludeBuilder {
    fn kind(&self) -> EdgeKind {
        EdgeKind::Exclude
    }

    fn build_edge(&self, view: &dyn GraphView) -> Result<Hyperedge, ValidationError> {
        checks::distinct_members(Role::Period, &self.periods)?;
        checks::work_order(view, self.work_order)?;
        for &period in &self.periods {
            if view.node(period).is_none() {
                return Err(ValidationError::UnknownPeriod(period));
            }
            checks::period(view, period)?;
        }
        Ok(Hyperedge::Exclude(Exclude::new(
            self.work_order,
            self.periods.clone(),
        )))
    }
}
