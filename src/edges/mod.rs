//! Immutable, role-tagged hyperedges.
//!
//! The five relation kinds form a closed tagged union ([`Hyperedge`]). Every
//! role is an explicit field of its variant, so a malformed role boundary is
//! a type error rather than a misplaced separator in a flat node list.
//!
//! Values of these types are produced only by the validating builders in
//! [`crate::builders`]; nothing outside the crate can construct one.

mod hyperedge;

use std::fmt;

use crate::nodes::NodeKind;

pub use hyperedge::{
    ActivityRelation, Assignment, Exclude, Hyperedge, PeriodDay, RoleMembers, Shift,
    WorkOrderActivity,
};

/// Generation-stamped edge identifier.
///
/// The slot is reused after an edge is retired, the generation is not: a
/// retired `EdgeId` never resolves to the edge that later occupies its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId {
    slot: u32,
    generation: u32,
}

impl EdgeId {
    pub(crate) const fn new(slot: u32, generation: u32) -> Self {
        Self { slot, generation }
    }

    pub const fn slot(&self) -> u32 {
        self.slot
    }

    pub const fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}v{}", self.slot, self.generation)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EdgeKind {
    Assignment,
    PeriodDay,
    WorkOrderActivity,
    ActivityRelation,
    Exclude,
}

impl EdgeKind {
    /// Roles an edge of this kind fills, in declaration order.
    pub const fn roles(self) -> &'static [Role] {
        match self {
            EdgeKind::Assignment => &[Role::Activity, Role::Technician, Role::Period, Role::Day],
            EdgeKind::PeriodDay => &[Role::Period, Role::Day],
            EdgeKind::WorkOrderActivity => &[Role::WorkOrder, Role::Activity],
            EdgeKind::ActivityRelation => &[Role::From, Role::To],
            EdgeKind::Exclude => &[Role::WorkOrder, Role::Period],
        }
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EdgeKind::Assignment => "Assignment",
            EdgeKind::PeriodDay => "PeriodDay",
            EdgeKind::WorkOrderActivity => "WorkOrderActivity",
            EdgeKind::ActivityRelation => "ActivityRelation",
            EdgeKind::Exclude => "Exclude",
        };
        f.write_str(name)
    }
}

/// Semantic position a node occupies within a hyperedge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    WorkOrder,
    Activity,
    Technician,
    Period,
    Day,
    /// Predecessor activity of an `ActivityRelation`.
    From,
    /// Successor activity of an `ActivityRelation`.
    To,
}

impl Role {
    /// Node kind a member of this role must have.
    pub const fn expected_kind(self) -> NodeKind {
        match self {
            Role::WorkOrder => NodeKind::WorkOrder,
            Role::Activity | Role::From | Role::To => NodeKind::Activity,
            Role::Technician => NodeKind::Technician,
            Role::Period => NodeKind::Period,
            Role::Day => NodeKind::Day,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::WorkOrder => "work-order",
            Role::Activity => "activity",
            Role::Technician => "technician",
            Role::Period => "period",
            Role::Day => "day",
            Role::From => "from",
            Role::To => "to",
        };
        f.write_str(name)
    }
}
