//! Typed nodes and the registry that owns them.
//!
//! Every node carries the attributes it was registered with and nothing
//! else: which period a day belongs to, or which work order composes an
//! activity, is recorded by hyperedges, never by node fields.

mod error;
mod registry;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::NaiveDate;

use crate::domain::{
    Activity, ActivityNumber, NumberOfPeople, Period, Skill, Technician, TechnicianId, WorkOrder,
    WorkOrderNumber,
};

pub use error::RegistryError;
pub use registry::NodeRegistry;

/// Process-unique node identifier. Identifiers are never reused, even after
/// the node they named has been removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u64);

impl NodeId {
    pub(crate) fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeKind {
    WorkOrder,
    Activity,
    Technician,
    Skill,
    Period,
    Day,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::WorkOrder => "work order",
            NodeKind::Activity => "activity",
            NodeKind::Technician => "technician",
            NodeKind::Skill => "skill",
            NodeKind::Period => "period",
            NodeKind::Day => "day",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorkOrderNode {
    work_order_number: WorkOrderNumber,
    basic_start_date: NaiveDate,
}

impl WorkOrderNode {
    pub const fn new(work_order_number: WorkOrderNumber, basic_start_date: NaiveDate) -> Self {
        Self {
            work_order_number,
            basic_start_date,
        }
    }

    pub const fn work_order_number(&self) -> WorkOrderNumber {
        self.work_order_number
    }

    pub const fn basic_start_date(&self) -> NaiveDate {
        self.basic_start_date
    }
}

impl From<&WorkOrder> for WorkOrderNode {
    fn from(work_order: &WorkOrder) -> Self {
        Self::new(work_order.work_order_number(), work_order.basic_start())
    }
}

/// Activity attributes. The owning work order number is part of the
/// activity's identity (activity numbers are only unique per work order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActivityNode {
    work_order_number: WorkOrderNumber,
    activity_number: ActivityNumber,
    number_of_people: NumberOfPeople,
    skill: Skill,
}

impl ActivityNode {
    pub const fn new(
        work_order_number: WorkOrderNumber,
        activity_number: ActivityNumber,
        number_of_people: NumberOfPeople,
        skill: Skill,
    ) -> Self {
        Self {
            work_order_number,
            activity_number,
            number_of_people,
            skill,
        }
    }

    pub const fn from_activity(work_order_number: WorkOrderNumber, activity: &Activity) -> Self {
        Self::new(
            work_order_number,
            activity.activity_number(),
            activity.number_of_people(),
            activity.skill(),
        )
    }

    pub const fn work_order_number(&self) -> WorkOrderNumber {
        self.work_order_number
    }

    pub const fn activity_number(&self) -> ActivityNumber {
        self.activity_number
    }

    pub const fn number_of_people(&self) -> NumberOfPeople {
        self.number_of_people
    }

    pub const fn skill(&self) -> Skill {
        self.skill
    }
}

/// A node and its immutable attributes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Node {
    WorkOrder(WorkOrderNode),
    Activity(ActivityNode),
    Technician(Technician),
    Skill(Skill),
    Period(Period),
    Day(NaiveDate),
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::WorkOrder(_) => NodeKind::WorkOrder,
            Node::Activity(_) => NodeKind::Activity,
            Node::Technician(_) => NodeKind::Technician,
            Node::Skill(_) => NodeKind::Skill,
            Node::Period(_) => NodeKind::Period,
            Node::Day(_) => NodeKind::Day,
        }
    }

    /// The key the external environment identifies this fact by.
    pub fn external_key(&self) -> ExternalKey {
        match self {
            Node::WorkOrder(w) => ExternalKey::WorkOrder(w.work_order_number),
            Node::Activity(a) => ExternalKey::Activity {
                work_order_number: a.work_order_number,
                activity_number: a.activity_number,
            },
            Node::Technician(t) => ExternalKey::Technician(t.id()),
            Node::Skill(s) => ExternalKey::Skill(*s),
            Node::Period(p) => ExternalKey::Period(*p),
            Node::Day(d) => ExternalKey::Day(*d),
        }
    }

    pub fn as_work_order(&self) -> Option<&WorkOrderNode> {
        match self {
            Node::WorkOrder(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_activity(&self) -> Option<&ActivityNode> {
        match self {
            Node::Activity(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_technician(&self) -> Option<&Technician> {
        match self {
            Node::Technician(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_period(&self) -> Option<Period> {
        match self {
            Node::Period(p) => Some(*p),
            _ => None,
        }
    }

    pub fn as_day(&self) -> Option<NaiveDate> {
        match self {
            Node::Day(d) => Some(*d),
            _ => None,
        }
    }
}

/// External identity of a node, used for duplicate detection and re-entrant
/// ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExternalKey {
    WorkOrder(WorkOrderNumber),
    Activity {
        work_order_number: WorkOrderNumber,
        activity_number: ActivityNumber,
    },
    Technician(TechnicianId),
    Skill(Skill),
    Period(Period),
    Day(NaiveDate),
}

impl ExternalKey {
    pub fn kind(&self) -> NodeKind {
        match self {
            ExternalKey::WorkOrder(_) => NodeKind::WorkOrder,
            ExternalKey::Activity { .. } => NodeKind::Activity,
            ExternalKey::Technician(_) => NodeKind::Technician,
            ExternalKey::Skill(_) => NodeKind::Skill,
            ExternalKey::Period(_) => NodeKind::Period,
            ExternalKey::Day(_) => NodeKind::Day,
        }
    }
}

impl fmt::Display for ExternalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExternalKey::WorkOrder(number) => write!(f, "work order {number}"),
            ExternalKey::Activity {
                work_order_number,
                activity_number,
            } => write!(f, "activity {work_order_number}/{activity_number}"),
            ExternalKey::Technician(id) => write!(f, "technician {id}"),
            ExternalKey::Skill(skill) => write!(f, "skill {skill}"),
            ExternalKey::Period(period) => write!(f, "period {}", period.start_date()),
            ExternalKey::Day(day) => write!(f, "day {day}"),
        }
    }
}
