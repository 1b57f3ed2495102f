//! Bidirectional incidence: node → edges touching it, with the roles it
//! plays in each.
//!
//! The index holds no business logic. The container calls
//! [`on_insert`](IncidenceIndex::on_insert) and
//! [`on_retire`](IncidenceIndex::on_retire) in the same step that changes
//! its edge set, so the index never disagrees with it.

use std::collections::HashMap;

use smallvec::SmallVec;

use crate::edges::{EdgeId, Hyperedge, Role};
use crate::nodes::NodeId;

/// Roles a node plays within one edge. A node usually has one.
type Roles = SmallVec<[Role; 2]>;

/// # Complexity
/// - `on_insert` / `on_retire`: O(arity) hash operations
/// - `edges_touching`: O(1) to start, O(1) amortized per edge yielded
/// - `roles_of`, `degree`, `is_referenced`: O(1)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncidenceIndex {
    incident: HashMap<NodeId, HashMap<EdgeId, Roles>>,
}

impl IncidenceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `edge` under every node it names.
    pub fn on_insert(&mut self, id: EdgeId, edge: &Hyperedge) {
        for (role, node) in edge.roled_nodes() {
            self.incident
                .entry(node)
                .or_default()
                .entry(id)
                .or_default()
                .push(role);
        }
    }

    /// Forgets `edge`; nodes left without incident edges are dropped.
    pub fn on_retire(&mut self, id: EdgeId, edge: &Hyperedge) {
        for node in edge.all_nodes() {
            if let Some(edges) = self.incident.get_mut(&node) {
                edges.remove(&id);
                if edges.is_empty() {
                    self.incident.remove(&node);
                }
            }
        }
    }

    pub fn edges_touching(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        self.incident
            .get(&node)
            .into_iter()
            .flat_map(|edges| edges.keys().copied())
    }

    pub fn edges_touching_in_role(
        &self,
        node: NodeId,
        role: Role,
    ) -> impl Iterator<Item = EdgeId> + '_ {
        self.incident
            .get(&node)
            .into_iter()
            .flat_map(move |edges| {
                edges
                    .iter()
                    .filter(move |(_, roles)| roles.contains(&role))
                    .map(|(id, _)| *id)
            })
    }

    /// Roles `node` plays in `edge`; empty if it plays none.
    pub fn roles_of(&self, node: NodeId, edge: EdgeId) -> &[Role] {
        self.incident
            .get(&node)
            .and_then(|edges| edges.get(&edge))
            .map(SmallVec::as_slice)
            .unwrap_or_default()
    }

    /// Number of edges touching `node`.
    pub fn degree(&self, node: NodeId) -> usize {
        self.incident.get(&node).map_or(0, HashMap::len)
    }

    pub fn is_referenced(&self, node: NodeId) -> bool {
        self.incident.contains_key(&node)
    }

    /// Number of nodes with at least one incident edge.
    pub fn node_count(&self) -> usize {
        self.incident.len()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::domain::RelationKind;
    use crate::edges::{ActivityRelation, Assignment, PeriodDay};
    use smallvec::smallvec;

    fn ids<const N: usize>() -> [NodeId; N] {
        std::array::from_fn(|_| NodeId::next())
    }

    fn assignment(n: &[NodeId; 5]) -> Hyperedge {
        Hyperedge::Assignment(Assignment::new(
            n[0],
            smallvec![n[1], n[2]],
            n[3],
            smallvec![n[4]],
            None,
        ))
    }

    #[test]
    fn insert_records_every_member_with_its_role() {
        let n = ids::<5>();
        let edge = assignment(&n);
        let id = EdgeId::new(0, 0);
        let mut index = IncidenceIndex::new();
        index.on_insert(id, &edge);

        for node in n {
            assert_eq!(index.edges_touching(node).collect::<Vec<_>>(), vec![id]);
        }
        assert_eq!(index.roles_of(n[1], id), &[Role::Technician]);
        assert_eq!(index.roles_of(n[4], id), &[Role::Day]);
        assert_eq!(index.node_count(), 5);
    }

    #[test]
    fn retire_drops_empty_entries() {
        let n = ids::<5>();
        let edge = assignment(&n);
        let id = EdgeId::new(0, 0);
        let mut index = IncidenceIndex::new();
        index.on_insert(id, &edge);
        index.on_retire(id, &edge);

        assert_eq!(index, IncidenceIndex::new());
        assert!(!index.is_referenced(n[0]));
        assert_eq!(index.edges_touching(n[0]).count(), 0);
    }

    #[test]
    fn shared_node_keeps_remaining_edges() {
        let [period, d1, d2, a, b] = ids::<5>();
        let decomposition = Hyperedge::PeriodDay(PeriodDay::new(period, smallvec![d1, d2]));
        let relation = Hyperedge::ActivityRelation(ActivityRelation::new(
            a,
            b,
            RelationKind::FinishStart,
        ));
        let other = Hyperedge::PeriodDay(PeriodDay::new(period, smallvec![d2]));

        let mut index = IncidenceIndex::new();
        index.on_insert(EdgeId::new(0, 0), &decomposition);
        index.on_insert(EdgeId::new(1, 0), &relation);
        index.on_insert(EdgeId::new(2, 0), &other);
        assert_eq!(index.degree(period), 2);

        index.on_retire(EdgeId::new(0, 0), &decomposition);
        assert_eq!(index.degree(period), 1);
        assert!(!index.is_referenced(d1));
        assert_eq!(
            index.edges_touching(d2).collect::<HashSet<_>>(),
            HashSet::from([EdgeId::new(2, 0)])
        );
        assert_eq!(
            index
                .edges_touching_in_role(a, Role::From)
                .collect::<Vec<_>>(),
            vec![EdgeId::new(1, 0)]
        );
        assert_eq!(index.edges_touching_in_role(a, Role::To).count(), 0);
    }

    #[test]
    fn unknown_node_has_nothing() {
        let index = IncidenceIndex::new();
        let node = NodeId::next();
        assert_eq!(index.degree(node), 0);
        assert!(index.roles_of(node, EdgeId::new(0, 0)).is_empty());
    }
}
