//! Work order records and their activities.

use std::fmt;

use chrono::{NaiveDate, TimeDelta};
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::Skill;

pub type WorkOrderNumber = u64;
pub type ActivityNumber = u64;
pub type NumberOfPeople = u64;

/// Number of decimal digits every work order number carries.
const WORK_ORDER_NUMBER_DIGITS: usize = 10;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorkOrderError {
    #[error("work order number {0} must have exactly 10 digits")]
    InvalidWorkOrderNumber(WorkOrderNumber),

    #[error("work order {work_order}: activities are not sorted by activity number")]
    UnsortedActivities { work_order: WorkOrderNumber },

    #[error("work order {work_order}: activity {activity} appears more than once")]
    DuplicatedActivity {
        work_order: WorkOrderNumber,
        activity: ActivityNumber,
    },

    #[error("work order {work_order}: activity {activity} requires nobody")]
    ZeroHeadcount {
        work_order: WorkOrderNumber,
        activity: ActivityNumber,
    },
}

/// How two consecutive activities are sequenced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RelationKind {
    /// The successor may start once the predecessor has started.
    StartStart,
    /// The successor may start once the predecessor has finished.
    #[default]
    FinishStart,
    /// The successor starts a fixed lag after the predecessor finishes.
    Postpone(TimeDelta),
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationKind::StartStart => write!(f, "start-start"),
            RelationKind::FinishStart => write!(f, "finish-start"),
            RelationKind::Postpone(lag) => write!(f, "postpone({}s)", lag.num_seconds()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Activity {
    activity_number: ActivityNumber,
    number_of_people: NumberOfPeople,
    resource: Skill,
}

impl Activity {
    pub const fn new(
        activity_number: ActivityNumber,
        number_of_people: NumberOfPeople,
        resource: Skill,
    ) -> Self {
        Self {
            activity_number,
            number_of_people,
            resource,
        }
    }

    pub const fn activity_number(&self) -> ActivityNumber {
        self.activity_number
    }

    pub const fn number_of_people(&self) -> NumberOfPeople {
        self.number_of_people
    }

    pub const fn skill(&self) -> Skill {
        self.resource
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WorkOrder {
    work_order_number: WorkOrderNumber,
    basic_start_date: NaiveDate,
    activities: Vec<Activity>,
}

impl WorkOrder {
    pub fn new(
        work_order_number: WorkOrderNumber,
        basic_start_date: NaiveDate,
        activities: Vec<Activity>,
    ) -> Result<Self, WorkOrderError> {
        let work_order = Self {
            work_order_number,
            basic_start_date,
            activities,
        };
        work_order.validate()?;
        Ok(work_order)
    }

    /// Checks the record invariants `new` enforces.
    ///
    /// Deserialized records bypass `new`; ingestion re-validates them here.
    pub fn validate(&self) -> Result<(), WorkOrderError> {
        if self.work_order_number.to_string().len() != WORK_ORDER_NUMBER_DIGITS {
            return Err(WorkOrderError::InvalidWorkOrderNumber(
                self.work_order_number,
            ));
        }
        for pair in self.activities.windows(2) {
            match pair[0].activity_number.cmp(&pair[1].activity_number) {
                std::cmp::Ordering::Less => {}
                std::cmp::Ordering::Equal => {
                    return Err(WorkOrderError::DuplicatedActivity {
                        work_order: self.work_order_number,
                        activity: pair[1].activity_number,
                    })
                }
                std::cmp::Ordering::Greater => {
                    return Err(WorkOrderError::UnsortedActivities {
                        work_order: self.work_order_number,
                    })
                }
            }
        }
        if let Some(activity) = self.activities.iter().find(|a| a.number_of_people == 0) {
            return Err(WorkOrderError::ZeroHeadcount {
                work_order: self.work_order_number,
                activity: activity.activity_number,
            });
        }
        Ok(())
    }

    pub fn work_order_number(&self) -> WorkOrderNumber {
        self.work_order_number
    }

    pub fn basic_start(&self) -> NaiveDate {
        self.basic_start_date
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    /// Sequencing between consecutive activities; entry `i` links activity
    /// `i` to activity `i + 1`.
    pub fn activity_relations(&self) -> Vec<RelationKind> {
        (1..self.activities.len())
            .map(|_| RelationKind::FinishStart)
            .collect()
    }
}
