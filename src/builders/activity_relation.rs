use chrono::TimeDelta;

use crate::domain::RelationKind;
use crate::edges::{ActivityRelation, EdgeKind, Hyperedge, Role};
use crate::nodes::NodeId;

use super::{checks, EdgeBuilder, GraphView, ValidationError};

/// Proposes an ordering between two activities, `from` before `to`.
///
/// Cycles across several relations are not rejected here; see
/// [`ScheduleGraph::activity_order`](crate::graph::ScheduleGraph::activity_order).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityRelationBuilder {
    from: NodeId,
    to: NodeId,
    kind: RelationKind,
}

impl ActivityRelationBuilder {
    pub fn new(from: NodeId, to: NodeId) -> Self {
        Self {
            from,
            to,
            kind: RelationKind::default(),
        }
    }

    pub fn relation(mut self, kind: RelationKind) -> Self {
        self.kind = kind;
        self
    }
}

impl EdgeBuilder for ActivityRelationBuilder {
    fn kind(&self) -> EdgeKind {
        EdgeKind::ActivityRelation
    }

    fn build_edge(&self, view: &dyn GraphView) -> Result<Hyperedge, ValidationError> {
        if self.from == self.to {
            return Err(ValidationError::SelfRelation(self.from));
        }
        checks::activity(view, self.from, Role::From)?;
        checks::activity(view, self.to, Role::To)?;
        if let RelationKind::Postpone(lag) = self.kind {
            if lag < TimeDelta::zero() {
                return Err(ValidationError::NegativeLag(lag));
            }
        }
        Ok(Hyperedge::ActivityRelation(ActivityRelation::new(
            self.from, self.to, self.kind,
        )))
    }
}
