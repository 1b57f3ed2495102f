use std::collections::BTreeSet;

use crate::edges::{EdgeKind, Hyperedge, PeriodDay, Role, RoleMembers};
use crate::nodes::NodeId;

use super::{checks, EdgeBuilder, GraphView, ValidationError};

/// Proposes the decomposition of a period into its calendar days.
///
/// The day set must be exactly the window `[start, start + period length)`,
/// and no day may already belong to another committed decomposition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodDayBuilder {
    period: NodeId,
    days: RoleMembers,
}

impl PeriodDayBuilder {
    pub fn new(period: NodeId) -> Self {
        Self {
            period,
            days: RoleMembers::new(),
        }
    }

    pub fn day(mut self, day: NodeId) -> Self {
        self.days.push(day);
        self
    }

    pub fn days(mut self, days: impl IntoIterator<Item = NodeId>) -> Self {
        self.days.extend(days);
        self
    }
}

impl EdgeBuilder for PeriodDayBuilder {
    fn kind(&self) -> EdgeKind {
        EdgeKind::PeriodDay
    }

    fn build_edge(&self, view: &dyn GraphView) -> Result<Hyperedge, ValidationError> {
        checks::distinct_members(Role::Day, &self.days)?;
        let period = checks::period(view, self.period)?;
        let dates = self
            .days
            .iter()
            .map(|&id| checks::day(view, id))
            .collect::<Result<BTreeSet<_>, _>>()?;

        let expected: BTreeSet<_> = period.days(view.config().period_length_days).collect();
        if dates != expected {
            return Err(ValidationError::PeriodDaysMismatch {
                period: self.period,
                missing: expected.difference(&dates).copied().collect(),
                unexpected: dates.difference(&expected).copied().collect(),
            });
        }

        for &day in &self.days {
            if let Some((edge, _)) = view.period_day_edge_of_day(day) {
                return Err(ValidationError::DayAlreadyInPeriod { day, edge });
            }
        }

        Ok(Hyperedge::PeriodDay(PeriodDay::new(
            self.period,
            self.days.clone(),
        )))
    }
}
