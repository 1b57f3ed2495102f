//! Copying external records into the graph.
//!
//! Each entry point is re-entrant: ingesting the same record twice yields
//! the same node ids and adds no edges. A failing call leaves the graph as it
//! found it, edge ids included; only the revision moves on.

use chrono::NaiveDate;
use tracing::{info, instrument, warn};

use crate::builders::{
    ActivityRelationBuilder, EdgeBuilder, GraphView, PeriodDayBuilder, WorkOrderActivityBuilder,
};
use crate::domain::{Period, Technician, WorkOrder};
use crate::edges::{EdgeId, EdgeKind};
use crate::nodes::{ActivityNode, Node, NodeId, WorkOrderNode};

use super::{GraphError, ScheduleGraph};

/// Node ids a work order was ingested as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestedWorkOrder {
    pub work_order: NodeId,
    /// In the record's activity order.
    pub activities: Vec<NodeId>,
}

/// What one ingestion call created, so it can be undone.
///
/// Nothing is ever retired before the last fallible step, so undoing a call
/// only removes what it added.
#[derive(Debug, Default)]
struct Journal {
    nodes: Vec<NodeId>,
    edges: Vec<EdgeId>,
}

impl Journal {
    fn rollback(self, graph: &mut ScheduleGraph) {
        for id in self.edges.into_iter().rev() {
            graph.retire_edge(id).expect("journaled edge is live");
        }
        for id in self.nodes.into_iter().rev() {
            graph.registry.remove(id).expect("journaled node is registered");
        }
        graph.revision += 1;
    }
}

impl ScheduleGraph {
    /// Registers periods starting on `start_dates`, their days, and one
    /// `PeriodDay` decomposition each.
    ///
    /// Returns the period node ids in input order.
    #[instrument(skip(self, start_dates), fields(periods = start_dates.len()))]
    pub fn ingest_periods(&mut self, start_dates: &[NaiveDate]) -> Result<Vec<NodeId>, GraphError> {
        let mut journal = Journal::default();
        match self.ingest_periods_journaled(start_dates, &mut journal) {
            Ok(periods) => {
                info!(
                    nodes = journal.nodes.len(),
                    edges = journal.edges.len(),
                    "periods ingested"
                );
                Ok(periods)
            }
            Err(error) => {
                warn!(%error, "rejected periods, rolling back");
                journal.rollback(self);
                Err(error)
            }
        }
    }

    fn ingest_periods_journaled(
        &mut self,
        start_dates: &[NaiveDate],
        journal: &mut Journal,
    ) -> Result<Vec<NodeId>, GraphError> {
        let length = self.config.period_length_days;
        let mut periods = Vec::with_capacity(start_dates.len());
        for &start in start_dates {
            let period = Period::from_start_date(start);
            let period_id = self.ensure_journaled(Node::Period(period), journal)?;
            periods.push(period_id);
            if self.period_day_edge(period_id).is_some() {
                continue;
            }
            let days = period
                .days(length)
                .map(|day| self.ensure_journaled(Node::Day(day), journal))
                .collect::<Result<Vec<_>, _>>()?;
            self.add_journaled(&PeriodDayBuilder::new(period_id).days(days), journal)?;
        }
        Ok(periods)
    }

    /// Registers a work order and its activities, composes them, and links
    /// consecutive activities with the record's relations.
    ///
    /// A record listing activities the graph has not seen yet replaces the
    /// existing composition with one covering all of them.
    #[instrument(skip(self, work_order), fields(work_order = work_order.work_order_number()))]
    pub fn ingest_work_order(
        &mut self,
        work_order: &WorkOrder,
    ) -> Result<IngestedWorkOrder, GraphError> {
        let mut journal = Journal::default();
        match self.ingest_work_order_journaled(work_order, &mut journal) {
            Ok(ingested) => {
                info!(
                    activities = ingested.activities.len(),
                    nodes = journal.nodes.len(),
                    edges = journal.edges.len(),
                    "work order ingested"
                );
                Ok(ingested)
            }
            Err(error) => {
                warn!(%error, "rejected work order, rolling back");
                journal.rollback(self);
                Err(error)
            }
        }
    }

    fn ingest_work_order_journaled(
        &mut self,
        work_order: &WorkOrder,
        journal: &mut Journal,
    ) -> Result<IngestedWorkOrder, GraphError> {
        work_order.validate()?;
        let number = work_order.work_order_number();
        let work_order_id =
            self.ensure_journaled(Node::WorkOrder(WorkOrderNode::from(work_order)), journal)?;
        let activities = work_order
            .activities()
            .iter()
            .map(|activity| {
                self.ensure_journaled(
                    Node::Activity(ActivityNode::from_activity(number, activity)),
                    journal,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        let relations = work_order.activity_relations();
        for (pair, kind) in activities.windows(2).zip(relations) {
            let (from, to) = (pair[0], pair[1]);
            let linked = self
                .edges_of_kind(from, EdgeKind::ActivityRelation)
                .filter_map(|(_, edge)| edge.as_activity_relation())
                .any(|relation| relation.from() == from && relation.to() == to);
            if !linked {
                self.add_journaled(&ActivityRelationBuilder::new(from, to).relation(kind), journal)?;
            }
        }

        // Composition goes last: once it is replaced nothing else can fail.
        if !activities.is_empty() {
            let existing = self
                .edges_of_kind(work_order_id, EdgeKind::WorkOrderActivity)
                .find_map(|(id, edge)| {
                    edge.as_work_order_activity()
                        .map(|composition| (id, composition.activities().to_vec()))
                });
            match existing {
                None => {
                    let builder =
                        WorkOrderActivityBuilder::new(work_order_id).activities(activities.clone());
                    self.add_journaled(&builder, journal)?;
                }
                Some((old, members)) => {
                    let missing: Vec<_> = activities
                        .iter()
                        .copied()
                        .filter(|activity| !members.contains(activity))
                        .collect();
                    if !missing.is_empty() {
                        let builder = WorkOrderActivityBuilder::new(work_order_id)
                            .activities(members.into_iter().chain(missing));
                        self.replace(old, &builder)?;
                    }
                }
            }
        }

        Ok(IngestedWorkOrder {
            work_order: work_order_id,
            activities,
        })
    }

    /// Registers a technician and the skill nodes it holds.
    #[instrument(skip(self, technician), fields(technician = technician.id()))]
    pub fn ingest_technician(&mut self, technician: &Technician) -> Result<NodeId, GraphError> {
        let mut journal = Journal::default();
        let result = technician
            .validate()
            .map_err(GraphError::from)
            .and_then(|()| {
                for &skill in technician.skills() {
                    self.ensure_journaled(Node::Skill(skill), &mut journal)?;
                }
                self.ensure_journaled(Node::Technician(technician.clone()), &mut journal)
            });
        match result {
            Ok(id) => {
                info!(
                    skills = technician.skills().len(),
                    availabilities = technician.availabilities().len(),
                    "technician ingested"
                );
                Ok(id)
            }
            Err(error) => {
                warn!(%error, "rejected technician, rolling back");
                journal.rollback(self);
                Err(error)
            }
        }
    }

    fn ensure_journaled(&mut self, node: Node, journal: &mut Journal) -> Result<NodeId, GraphError> {
        let fresh = self.resolve(&node.external_key()).is_none();
        let id = self.ensure(node)?;
        if fresh {
            journal.nodes.push(id);
        }
        Ok(id)
    }

    fn add_journaled<B: EdgeBuilder>(
        &mut self,
        builder: &B,
        journal: &mut Journal,
    ) -> Result<EdgeId, GraphError> {
        let id = self.add(builder)?;
        journal.edges.push(id);
        Ok(id)
    }
}
