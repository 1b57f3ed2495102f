use std::collections::BTreeSet;
use std::slice;

use chrono::NaiveTime;
use smallvec::SmallVec;

use crate::domain::RelationKind;
use crate::nodes::NodeId;

use super::{EdgeKind, Role};

/// Inline storage for a role's members; most roles hold a handful of nodes.
pub type RoleMembers = SmallVec<[NodeId; 4]>;

/// Working hours of an assignment on each of its days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shift {
    start: NaiveTime,
    finish: NaiveTime,
}

impl Shift {
    pub const fn new(start: NaiveTime, finish: NaiveTime) -> Self {
        Self { start, finish }
    }

    pub const fn start(&self) -> NaiveTime {
        self.start
    }

    pub const fn finish(&self) -> NaiveTime {
        self.finish
    }

    pub fn is_valid(&self) -> bool {
        self.start < self.finish
    }
}

/// `Activity×1, Technician×N, Period×1, Day×M`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    activity: NodeId,
    technicians: RoleMembers,
    period: NodeId,
    days: RoleMembers,
    shift: Option<Shift>,
}

impl Assignment {
    pub(crate) fn new(
        activity: NodeId,
        technicians: RoleMembers,
        period: NodeId,
        days: RoleMembers,
        shift: Option<Shift>,
    ) -> Self {
        Self {
            activity,
            technicians,
            period,
            days,
            shift,
        }
    }

    pub fn activity(&self) -> NodeId {
        self.activity
    }

    pub fn technicians(&self) -> &[NodeId] {
        &self.technicians
    }

    pub fn period(&self) -> NodeId {
        self.period
    }

    pub fn days(&self) -> &[NodeId] {
        &self.days
    }

    pub fn shift(&self) -> Option<Shift> {
        self.shift
    }
}

/// `Period×1, Day×M`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodDay {
    period: NodeId,
    days: RoleMembers,
}

impl PeriodDay {
    pub(crate) fn new(period: NodeId, days: RoleMembers) -> Self {
        Self { period, days }
    }

    pub fn period(&self) -> NodeId {
        self.period
    }

    pub fn days(&self) -> &[NodeId] {
        &self.days
    }
}

/// `WorkOrder×1, Activity×M`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkOrderActivity {
    work_order: NodeId,
    activities: RoleMembers,
}

impl WorkOrderActivity {
    pub(crate) fn new(work_order: NodeId, activities: RoleMembers) -> Self {
        Self {
            work_order,
            activities,
        }
    }

    pub fn work_order(&self) -> NodeId {
        self.work_order
    }

    pub fn activities(&self) -> &[NodeId] {
        &self.activities
    }
}

/// `Activity×1 (from), Activity×1 (to)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityRelation {
    from: NodeId,
    to: NodeId,
    kind: RelationKind,
}

impl ActivityRelation {
    pub(crate) fn new(from: NodeId, to: NodeId, kind: RelationKind) -> Self {
        Self { from, to, kind }
    }

    pub fn from(&self) -> NodeId {
        self.from
    }

    pub fn to(&self) -> NodeId {
        self.to
    }

    pub fn kind(&self) -> RelationKind {
        self.kind
    }
}

/// `WorkOrder×1, Period×M`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exclude {
    work_order: NodeId,
    periods: RoleMembers,
}

impl Exclude {
    pub(crate) fn new(work_order: NodeId, periods: RoleMembers) -> Self {
        Self {
            work_order,
            periods,
        }
    }

    pub fn work_order(&self) -> NodeId {
        self.work_order
    }

    pub fn periods(&self) -> &[NodeId] {
        &self.periods
    }
}

/// A committed relation between nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hyperedge {
    Assignment(Assignment),
    PeriodDay(PeriodDay),
    WorkOrderActivity(WorkOrderActivity),
    ActivityRelation(ActivityRelation),
    Exclude(Exclude),
}

impl Hyperedge {
    pub fn kind(&self) -> EdgeKind {
        match self {
            Hyperedge::Assignment(_) => EdgeKind::Assignment,
            Hyperedge::PeriodDay(_) => EdgeKind::PeriodDay,
            Hyperedge::WorkOrderActivity(_) => EdgeKind::WorkOrderActivity,
            Hyperedge::ActivityRelation(_) => EdgeKind::ActivityRelation,
            Hyperedge::Exclude(_) => EdgeKind::Exclude,
        }
    }

    /// Members of `role`, in the order the builder received them. Roles the
    /// variant does not have yield an empty slice.
    pub fn nodes_in_role(&self, role: Role) -> &[NodeId] {
        match (self, role) {
            (Hyperedge::Assignment(a), Role::Activity) => slice::from_ref(&a.activity),
            (Hyperedge::Assignment(a), Role::Technician) => &a.technicians,
            (Hyperedge::Assignment(a), Role::Period) => slice::from_ref(&a.period),
            (Hyperedge::Assignment(a), Role::Day) => &a.days,
            (Hyperedge::PeriodDay(p), Role::Period) => slice::from_ref(&p.period),
            (Hyperedge::PeriodDay(p), Role::Day) => &p.days,
            (Hyperedge::WorkOrderActivity(w), Role::WorkOrder) => slice::from_ref(&w.work_order),
            (Hyperedge::WorkOrderActivity(w), Role::Activity) => &w.activities,
            (Hyperedge::ActivityRelation(r), Role::From) => slice::from_ref(&r.from),
            (Hyperedge::ActivityRelation(r), Role::To) => slice::from_ref(&r.to),
            (Hyperedge::Exclude(e), Role::WorkOrder) => slice::from_ref(&e.work_order),
            (Hyperedge::Exclude(e), Role::Period) => &e.periods,
            _ => &[],
        }
    }

    /// Every `(role, node)` pair of the edge.
    pub fn roled_nodes(&self) -> impl Iterator<Item = (Role, NodeId)> + '_ {
        self.kind()
            .roles()
            .iter()
            .flat_map(move |&role| self.nodes_in_role(role).iter().map(move |&node| (role, node)))
    }

    /// Role-erased node set.
    pub fn all_nodes(&self) -> BTreeSet<NodeId> {
        self.roled_nodes().map(|(_, node)| node).collect()
    }

    pub fn involves(&self, node: NodeId) -> bool {
        self.roled_nodes().any(|(_, n)| n == node)
    }

    pub fn arity(&self) -> usize {
        self.roled_nodes().count()
    }

    pub fn as_assignment(&self) -> Option<&Assignment> {
        match self {
            Hyperedge::Assignment(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_period_day(&self) -> Option<&PeriodDay> {
        match self {
            Hyperedge::PeriodDay(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_work_order_activity(&self) -> Option<&WorkOrderActivity> {
        match self {
            Hyperedge::WorkOrderActivity(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_activity_relation(&self) -> Option<&ActivityRelation> {
        match self {
            Hyperedge::ActivityRelation(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_exclude(&self) -> Option<&Exclude> {
        match self {
            Hyperedge::Exclude(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    fn ids(n: usize) -> Vec<NodeId> {
        (0..n).map(|_| NodeId::next()).collect()
    }

    #[test]
    fn assignment_roles_are_kept_apart() {
        let n = ids(6);
        let edge = Hyperedge::Assignment(Assignment::new(
            n[0],
            smallvec![n[1], n[2]],
            n[3],
            smallvec![n[4], n[5]],
            None,
        ));

        assert_eq!(edge.nodes_in_role(Role::Activity), &[n[0]]);
        assert_eq!(edge.nodes_in_role(Role::Technician), &[n[1], n[2]]);
        assert_eq!(edge.nodes_in_role(Role::Period), &[n[3]]);
        assert_eq!(edge.nodes_in_role(Role::Day), &[n[4], n[5]]);
        assert!(edge.nodes_in_role(Role::WorkOrder).is_empty());
        assert_eq!(edge.arity(), 6);
        assert_eq!(edge.all_nodes(), n.iter().copied().collect());
    }

    #[test]
    fn relation_from_and_to_are_distinct_roles() {
        let n = ids(2);
        let edge = Hyperedge::ActivityRelation(ActivityRelation::new(
            n[0],
            n[1],
            RelationKind::StartStart,
        ));

        assert_eq!(edge.nodes_in_role(Role::From), &[n[0]]);
        assert_eq!(edge.nodes_in_role(Role::To), &[n[1]]);
        assert!(edge.nodes_in_role(Role::Activity).is_empty());
        let roled: Vec<_> = edge.roled_nodes().collect();
        assert_eq!(roled, vec![(Role::From, n[0]), (Role::To, n[1])]);
    }

    #[test]
    fn involves_checks_every_role() {
        let n = ids(4);
        let edge = Hyperedge::Exclude(Exclude::new(n[0], smallvec![n[1], n[2]]));
        assert!(edge.involves(n[0]));
        assert!(edge.involves(n[2]));
        assert!(!edge.involves(n[3]));
        assert_eq!(edge.kind(), EdgeKind::Exclude);
    }

    #[test]
    fn shift_validity() {
        let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let eleven = NaiveTime::from_hms_opt(11, 0, 0).unwrap();
        assert!(Shift::new(nine, eleven).is_valid());
        assert!(!Shift::new(eleven, nine).is_valid());
        assert!(!Shift::new(nine, nine).is_valid());
    }
}
