//! Read-only queries over a [`ScheduleGraph`].

use std::collections::{BTreeSet, HashMap};

use petgraph::algo::toposort;
use petgraph::graph::DiGraph;
use qtty::{Hour, Quantity, Second};

use crate::builders::GraphView;
use crate::domain::Period;
use crate::edges::{Assignment, EdgeId, EdgeKind, Hyperedge, Role};
use crate::nodes::{NodeId, NodeKind};

use super::{GraphError, ScheduleGraph};

impl ScheduleGraph {
    /// Every edge naming `node`, in any role.
    pub fn edges_touching(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        self.incidence.edges_touching(node)
    }

    /// Edges of `kind` naming `node`.
    pub fn edges_of_kind(
        &self,
        node: NodeId,
        kind: EdgeKind,
    ) -> impl Iterator<Item = (EdgeId, &Hyperedge)> + '_ {
        self.incidence.edges_touching(node).filter_map(move |id| {
            self.edges
                .get(id)
                .filter(|edge| edge.kind() == kind)
                .map(|edge| (id, edge))
        })
    }

    /// Every committed edge of `kind`. This scans the whole edge set.
    pub fn edges(&self, kind: EdgeKind) -> impl Iterator<Item = (EdgeId, &Hyperedge)> + '_ {
        self.edges.iter().filter(move |(_, edge)| edge.kind() == kind)
    }

    fn assignments_in_role(
        &self,
        node: NodeId,
        role: Role,
    ) -> impl Iterator<Item = (EdgeId, &Assignment)> + '_ {
        self.incidence
            .edges_touching_in_role(node, role)
            .filter_map(move |id| {
                self.edges
                    .get(id)
                    .and_then(Hyperedge::as_assignment)
                    .map(|assignment| (id, assignment))
            })
    }

    pub fn assignments_for_technician(
        &self,
        technician: NodeId,
    ) -> impl Iterator<Item = (EdgeId, &Assignment)> + '_ {
        self.assignments_in_role(technician, Role::Technician)
    }

    pub fn assignments_for_activity(
        &self,
        activity: NodeId,
    ) -> impl Iterator<Item = (EdgeId, &Assignment)> + '_ {
        self.assignments_in_role(activity, Role::Activity)
    }

    pub fn assignments_for_period(
        &self,
        period: NodeId,
    ) -> impl Iterator<Item = (EdgeId, &Assignment)> + '_ {
        self.assignments_in_role(period, Role::Period)
    }

    /// Days of `period`'s committed decomposition.
    pub fn period_days(&self, period: NodeId) -> Option<&[NodeId]> {
        self.period_day_edge(period).map(|(_, edge)| edge.days())
    }

    pub fn period_of_day(&self, day: NodeId) -> Option<NodeId> {
        self.period_day_edge_of_day(day)
            .map(|(_, edge)| edge.period())
    }

    /// Activities composing `work_order`.
    pub fn activities_of(&self, work_order: NodeId) -> Option<&[NodeId]> {
        self.incidence
            .edges_touching_in_role(work_order, Role::WorkOrder)
            .find_map(|id| match self.edges.get(id) {
                Some(Hyperedge::WorkOrderActivity(edge)) => Some(edge.activities()),
                _ => None,
            })
    }

    pub fn work_order_of(&self, activity: NodeId) -> Option<NodeId> {
        self.composing_edge(activity)
            .map(|(_, edge)| edge.work_order())
    }

    /// Union of the periods every `Exclude` edge of `work_order` lists.
    pub fn excluded_periods(&self, work_order: NodeId) -> BTreeSet<NodeId> {
        self.edges_of_kind(work_order, EdgeKind::Exclude)
            .filter_map(|(_, edge)| edge.as_exclude())
            .flat_map(|exclude| exclude.periods().iter().copied())
            .collect()
    }

    /// Registered periods in start-date order.
    pub fn periods(&self) -> impl Iterator<Item = (Period, NodeId)> + '_ {
        self.registry.periods()
    }

    /// Hours of `technician`'s availability inside `period`'s window.
    pub fn technician_capacity(
        &self,
        technician: NodeId,
        period: NodeId,
    ) -> Result<Quantity<Hour>, GraphError> {
        let technician_node = self.registry.lookup(technician)?;
        let technician_record =
            technician_node
                .as_technician()
                .ok_or(GraphError::KindMismatch {
                    node: technician,
                    expected: NodeKind::Technician,
                    found: technician_node.kind(),
                })?;
        let period_node = self.registry.lookup(period)?;
        let window = period_node
            .as_period()
            .ok_or(GraphError::KindMismatch {
                node: period,
                expected: NodeKind::Period,
                found: period_node.kind(),
            })?
            .window(self.config.period_length_days);

        let seconds: i64 = technician_record
            .availabilities()
            .iter()
            .map(|availability| availability.overlap_seconds(window.0, window.1))
            .sum();
        Ok(Quantity::<Second>::new(seconds as f64).to::<Hour>())
    }

    /// Activities of `work_order` ordered so every `ActivityRelation`
    /// between them points forward.
    ///
    /// # Errors
    ///
    /// `RelationCycle` if the relations among them are cyclic.
    pub fn activity_order(&self, work_order: NodeId) -> Result<Vec<NodeId>, GraphError> {
        let activities = self.activities_of(work_order).unwrap_or_default();

        let mut dag = DiGraph::<NodeId, ()>::with_capacity(activities.len(), activities.len());
        let index: HashMap<_, _> = activities
            .iter()
            .map(|&activity| (activity, dag.add_node(activity)))
            .collect();
        for &activity in activities {
            for (_, edge) in self.edges_of_kind(activity, EdgeKind::ActivityRelation) {
                let Some(relation) = edge.as_activity_relation() else {
                    continue;
                };
                if relation.from() != activity {
                    continue;
                }
                if let (Some(&from), Some(&to)) =
                    (index.get(&relation.from()), index.get(&relation.to()))
                {
                    dag.add_edge(from, to, ());
                }
            }
        }

        let order = toposort(&dag, None).map_err(|_| GraphError::RelationCycle { work_order })?;
        Ok(order.into_iter().map(|ix| dag[ix]).collect())
    }
}
