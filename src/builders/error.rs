use chrono::{NaiveDate, TimeDelta};
use thiserror::Error;

use crate::domain::{ActivityNumber, Skill, WorkOrderNumber};
use crate::edges::{EdgeId, Role};
use crate::nodes::{NodeId, NodeKind};

/// Why a builder refused to produce an edge. Nothing was mutated.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    #[error("node {node} in role {role} is a {found}, expected a {expected}")]
    KindMismatch {
        node: NodeId,
        role: Role,
        expected: NodeKind,
        found: NodeKind,
    },

    #[error("node {node} is listed twice in role {role}")]
    DuplicateRoleMember { role: Role, node: NodeId },

    #[error("role {0} needs at least one member")]
    EmptyRole(Role),

    #[error("technician {technician} does not hold required skill {required}")]
    SkillMismatch { technician: NodeId, required: Skill },

    #[error("activity {activity} needs {required} technicians, {assigned} assigned")]
    HeadcountMismatch {
        activity: NodeId,
        required: u64,
        assigned: usize,
    },

    #[error("technician {technician} is not available on {day}")]
    AvailabilityGap { technician: NodeId, day: NaiveDate },

    #[error("day {day} does not belong to period {period}")]
    DayOutsidePeriod { day: NodeId, period: NodeId },

    #[error("period {0} has not been decomposed into days")]
    PeriodNotDecomposed(NodeId),

    #[error("shift must finish after it starts")]
    InvalidShift,

    #[error("work order {work_order} is excluded from period {period}")]
    ExcludedPeriod { work_order: NodeId, period: NodeId },

    #[error("work order {work_order} lists activity number {activity_number} twice")]
    DuplicateActivityNumber {
        work_order: NodeId,
        activity_number: ActivityNumber,
    },

    #[error("activity {activity} belongs to work order {owner}, not {work_order}")]
    ActivityOwnerMismatch {
        activity: NodeId,
        owner: WorkOrderNumber,
        work_order: WorkOrderNumber,
    },

    #[error("activity {activity} is already composed by edge {edge}")]
    ActivityAlreadyComposed { activity: NodeId, edge: EdgeId },

    #[error(
        "period {period} decomposition: {} days missing, {} unexpected",
        .missing.len(),
        .unexpected.len()
    )]
    PeriodDaysMismatch {
        period: NodeId,
        missing: Vec<NaiveDate>,
        unexpected: Vec<NaiveDate>,
    },

    #[error("day {day} already belongs to period decomposition {edge}")]
    DayAlreadyInPeriod { day: NodeId, edge: EdgeId },

    #[error("period {0} is not registered")]
    UnknownPeriod(NodeId),

    #[error("activity {0} cannot be related to itself")]
    SelfRelation(NodeId),

    #[error("postpone lag must not be negative, got {0}")]
    NegativeLag(TimeDelta),
}
