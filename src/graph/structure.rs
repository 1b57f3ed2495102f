//! Direct lookups for the edges that shape the calendar and the work orders.

use std::collections::HashMap;

use crate::edges::{EdgeId, Hyperedge};
use crate::nodes::NodeId;

/// Period, day and activity to the one edge that decomposes or composes it.
///
/// Assignments are incident to periods, days and activities as well, so the
/// incidence index alone would make these lookups cost the node's degree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct StructureIndex {
    period_decomposition: HashMap<NodeId, EdgeId>,
    day_decomposition: HashMap<NodeId, EdgeId>,
    activity_composition: HashMap<NodeId, EdgeId>,
}

impl StructureIndex {
    pub(crate) fn on_insert(&mut self, id: EdgeId, edge: &Hyperedge) {
        match edge {
            Hyperedge::PeriodDay(decomposition) => {
                self.period_decomposition.insert(decomposition.period(), id);
                for &day in decomposition.days() {
                    self.day_decomposition.insert(day, id);
                }
            }
            Hyperedge::WorkOrderActivity(composition) => {
                for &activity in composition.activities() {
                    self.activity_composition.insert(activity, id);
                }
            }
            _ => {}
        }
    }

    pub(crate) fn on_retire(&mut self, id: EdgeId, edge: &Hyperedge) {
        match edge {
            Hyperedge::PeriodDay(decomposition) => {
                release(&mut self.period_decomposition, decomposition.period(), id);
                for &day in decomposition.days() {
                    release(&mut self.day_decomposition, day, id);
                }
            }
            Hyperedge::WorkOrderActivity(composition) => {
                for &activity in composition.activities() {
                    release(&mut self.activity_composition, activity, id);
                }
            }
            _ => {}
        }
    }

    pub(crate) fn decomposition_of_period(&self, period: NodeId) -> Option<EdgeId> {
        self.period_decomposition.get(&period).copied()
    }

    pub(crate) fn decomposition_of_day(&self, day: NodeId) -> Option<EdgeId> {
        self.day_decomposition.get(&day).copied()
    }

    pub(crate) fn composition_of_activity(&self, activity: NodeId) -> Option<EdgeId> {
        self.activity_composition.get(&activity).copied()
    }
}

fn release(map: &mut HashMap<NodeId, EdgeId>, node: NodeId, id: EdgeId) {
    if map.get(&node) == Some(&id) {
        map.remove(&node);
    }
}
