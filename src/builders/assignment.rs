use chrono::NaiveTime;
use tracing::trace;

use crate::edges::{Assignment, EdgeKind, Hyperedge, Role, RoleMembers, Shift};
use crate::nodes::NodeId;

use super::{checks, EdgeBuilder, GraphView, ValidationError};

/// Proposes assigning technicians to an activity on some days of a period.
///
/// # Checks, in order
///
/// 1. Technician and Day roles are non-empty and free of repeats.
/// 2. Every member exists and has the kind its role demands.
/// 3. The shift, if any, finishes after it starts.
/// 4. The technician count equals the activity's headcount.
/// 5. The period has a committed decomposition that lists every day.
/// 6. Every technician holds the activity's skill.
/// 7. Every technician is available on every day (for the whole shift, when
///    one is given).
/// 8. The activity's work order is not excluded from the period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentBuilder {
    activity: NodeId,
    period: NodeId,
    technicians: RoleMembers,
    days: RoleMembers,
    shift: Option<Shift>,
}

impl AssignmentBuilder {
    pub fn new(activity: NodeId, period: NodeId) -> Self {
        Self {
            activity,
            period,
            technicians: RoleMembers::new(),
            days: RoleMembers::new(),
            shift: None,
        }
    }

    pub fn technician(mut self, technician: NodeId) -> Self {
        self.technicians.push(technician);
        self
    }

    pub fn technicians(mut self, technicians: impl IntoIterator<Item = NodeId>) -> Self {
        self.technicians.extend(technicians);
        self
    }

    pub fn day(mut self, day: NodeId) -> Self {
        self.days.push(day);
        self
    }

    pub fn days(mut self, days: impl IntoIterator<Item = NodeId>) -> Self {
        self.days.extend(days);
        self
    }

    pub fn shift(mut self, start: NaiveTime, finish: NaiveTime) -> Self {
        self.shift = Some(Shift::new(start, finish));
        self
    }
}

impl EdgeBuilder for AssignmentBuilder {
    fn kind(&self) -> EdgeKind {
        EdgeKind::Assignment
    }

    fn build_edge(&self, view: &dyn GraphView) -> Result<Hyperedge, ValidationError> {
        checks::distinct_members(Role::Technician, &self.technicians)?;
        checks::distinct_members(Role::Day, &self.days)?;

        let activity = checks::activity(view, self.activity, Role::Activity)?;
        checks::period(view, self.period)?;
        let technicians = self
            .technicians
            .iter()
            .map(|&id| checks::technician(view, id).map(|t| (id, t)))
            .collect::<Result<Vec<_>, _>>()?;
        let days = self
            .days
            .iter()
            .map(|&id| checks::day(view, id).map(|d| (id, d)))
            .collect::<Result<Vec<_>, _>>()?;

        if self.shift.is_some_and(|shift| !shift.is_valid()) {
            return Err(ValidationError::InvalidShift);
        }

        let required = activity.number_of_people();
        if technicians.len() as u64 != required {
            return Err(ValidationError::HeadcountMismatch {
                activity: self.activity,
                required,
                assigned: technicians.len(),
            });
        }

        let (_, decomposition) = view
            .period_day_edge(self.period)
            .ok_or(ValidationError::PeriodNotDecomposed(self.period))?;
        if let Some(&(day, _)) = days
            .iter()
            .find(|(id, _)| !decomposition.days().contains(id))
        {
            return Err(ValidationError::DayOutsidePeriod {
                day,
                period: self.period,
            });
        }

        let required_skill = activity.skill();
        if let Some(&(technician, _)) = technicians
            .iter()
            .find(|(_, t)| !t.has_skill(required_skill))
        {
            return Err(ValidationError::SkillMismatch {
                technician,
                required: required_skill,
            });
        }

        let shift = self.shift.map(|s| (s.start(), s.finish()));
        for &(technician_id, technician) in &technicians {
            for &(_, day) in &days {
                if !technician.is_available(day, shift) {
                    return Err(ValidationError::AvailabilityGap {
                        technician: technician_id,
                        day,
                    });
                }
            }
        }

        if let Some((_, composition)) = view.composing_edge(self.activity) {
            let work_order = composition.work_order();
            if view.is_excluded(work_order, self.period) {
                return Err(ValidationError::ExcludedPeriod {
                    work_order,
                    period: self.period,
                });
            }
        }

        trace!(
            activity = %self.activity,
            technicians = technicians.len(),
            days = days.len(),
            "assignment validated"
        );
        Ok(Hyperedge::Assignment(Assignment::new(
            self.activity,
            self.technicians.clone(),
            self.period,
            self.days.clone(),
            self.shift,
        )))
    }
}
