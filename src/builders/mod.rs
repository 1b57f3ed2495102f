//! Validating edge builders.
//!
//! A builder holds a proposed set of role members and checks every business
//! rule of its edge kind against a read-only [`GraphView`]. Building never
//! mutates anything: a rejected builder leaves the graph exactly as it was.
//!
//! A successful [`EdgeBuilder::build`] yields a [`ValidatedEdge`] stamped with
//! the id and revision of the graph it was checked against. The container
//! only accepts it at that same revision, so an edge can never be committed
//! against state it was not validated on.

mod activity_relation;
mod assignment;
pub(crate) mod checks;
mod error;
mod exclude;
mod period_day;
mod work_order_activity;

use crate::config::GraphConfig;
use crate::edges::{EdgeId, EdgeKind, Hyperedge, PeriodDay, WorkOrderActivity};
use crate::graph::GraphId;
use crate::nodes::{Node, NodeId};

pub use activity_relation::ActivityRelationBuilder;
pub use assignment::AssignmentBuilder;
pub use error::ValidationError;
pub use exclude::ExcludeBuilder;
pub use period_day::PeriodDayBuilder;
pub use work_order_activity::WorkOrderActivityBuilder;

/// Read-only view of a graph, as seen by builders.
///
/// The decomposition and composition lookups answer in constant time no
/// matter how many assignments touch the node.
pub trait GraphView {
    fn config(&self) -> &GraphConfig;

    fn graph_id(&self) -> GraphId;

    /// Monotonic mutation counter of the underlying graph.
    fn revision(&self) -> u64;

    fn node(&self, id: NodeId) -> Option<&Node>;

    fn edge(&self, id: EdgeId) -> Option<&Hyperedge>;

    fn incident_edges(&self, node: NodeId) -> Box<dyn Iterator<Item = EdgeId> + '_>;

    /// The committed decomposition of `period`, if any.
    fn period_day_edge(&self, period: NodeId) -> Option<(EdgeId, &PeriodDay)>;

    /// The committed decomposition listing `day`, if any.
    fn period_day_edge_of_day(&self, day: NodeId) -> Option<(EdgeId, &PeriodDay)>;

    /// The committed `WorkOrderActivity` edge composing `activity`, if any.
    fn composing_edge(&self, activity: NodeId) -> Option<(EdgeId, &WorkOrderActivity)>;

    /// Whether a committed `Exclude` edge bars `work_order` from `period`.
    fn is_excluded(&self, work_order: NodeId, period: NodeId) -> bool {
        self.incident_edges(work_order).any(|id| match self.edge(id) {
            Some(Hyperedge::Exclude(edge)) => {
                edge.work_order() == work_order && edge.periods().contains(&period)
            }
            _ => false,
        })
    }
}

mod sealed {
    pub trait Sealed {}

    impl Sealed for super::AssignmentBuilder {}
    impl Sealed for super::PeriodDayBuilder {}
    impl Sealed for super::WorkOrderActivityBuilder {}
    impl Sealed for super::ActivityRelationBuilder {}
    impl Sealed for super::ExcludeBuilder {}
}

/// Produces one kind of hyperedge after checking its invariants.
///
/// Sealed: the five builders of this module are the only way to obtain a
/// [`Hyperedge`].
pub trait EdgeBuilder: sealed::Sealed {
    fn kind(&self) -> EdgeKind;

    /// Validates the proposal against `view` and assembles the edge.
    fn build_edge(&self, view: &dyn GraphView) -> Result<Hyperedge, ValidationError>;

    /// Validates and stamps the edge for insertion into the graph behind
    /// `view`.
    fn build(&self, view: &dyn GraphView) -> Result<ValidatedEdge, ValidationError> {
        let edge = self.build_edge(view)?;
        debug_assert_eq!(edge.kind(), self.kind());
        Ok(ValidatedEdge {
            edge,
            graph_id: view.graph_id(),
            revision: view.revision(),
            replaces: None,
        })
    }
}

/// An edge that passed validation against a specific graph revision.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedEdge {
    edge: Hyperedge,
    graph_id: GraphId,
    revision: u64,
    replaces: Option<EdgeId>,
}

impl ValidatedEdge {
    pub fn edge(&self) -> &Hyperedge {
        &self.edge
    }

    pub fn graph_id(&self) -> GraphId {
        self.graph_id
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The edge this one was validated to replace.
    pub fn replaces(&self) -> Option<EdgeId> {
        self.replaces
    }

    pub(crate) fn replacing(mut self, old: EdgeId) -> Self {
        self.replaces = Some(old);
        self
    }

    pub(crate) fn into_edge(self) -> Hyperedge {
        self.edge
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{NaiveDate, NaiveDateTime};

    use crate::domain::{Activity, Skill, Technician, WorkOrder};
    use crate::graph::ScheduleGraph;
    use crate::nodes::{ExternalKey, NodeId};

    pub(crate) const WORK_ORDER: u64 = 1000000001;

    pub(crate) fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, day).unwrap()
    }

    pub(crate) fn at(day: u32, hour: u32) -> NaiveDateTime {
        date(day).and_hms_opt(hour, 0, 0).unwrap()
    }

    pub(crate) fn technician(id: u64, skill: Skill) -> Technician {
        Technician::builder(id)
            .add_skill(skill)
            .add_availability(at(13, 7), at(17, 17))
            .unwrap()
            .build()
            .unwrap()
    }

    /// Period 2025-01-13 decomposed into its days, work order 1000000001 with
    /// activity 10 needing two MTN-MECH technicians, technicians 1 and 2
    /// (MTN-MECH) and 3 (MTN-ELEC), all available 13th 07:00 to 17th 17:00.
    pub(crate) struct Scenario {
        pub graph: ScheduleGraph,
        pub period: NodeId,
        pub work_order: NodeId,
        pub activity: NodeId,
        pub technicians: [NodeId; 3],
    }

    impl Scenario {
        pub(crate) fn new() -> Self {
            let mut graph = ScheduleGraph::new();
            let period = graph.ingest_periods(&[date(13)]).unwrap()[0];
            let work_order = WorkOrder::new(
                WORK_ORDER,
                date(13),
                vec![Activity::new(10, 2, Skill::MtnMech)],
            )
            .unwrap();
            let ingested = graph.ingest_work_order(&work_order).unwrap();
            let technicians = [
                graph.ingest_technician(&technician(1, Skill::MtnMech)).unwrap(),
                graph.ingest_technician(&technician(2, Skill::MtnMech)).unwrap(),
                graph.ingest_technician(&technician(3, Skill::MtnElec)).unwrap(),
            ];
            Self {
                graph,
                period,
                work_order: ingested.work_order,
                activity: ingested.activities[0],
                technicians,
            }
        }

        pub(crate) fn day(&self, day: u32) -> NodeId {
            self.graph
                .resolve(&ExternalKey::Day(date(day)))
                .unwrap()
        }
    }
}
