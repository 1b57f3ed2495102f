//! Technician records: held skills and availability intervals.

use std::collections::BTreeSet;

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::Skill;

pub type TechnicianId = u64;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TechnicianError {
    #[error("technician {technician} has no skills")]
    NoSkills { technician: TechnicianId },

    #[error("technician {technician}: availability ends ({end}) before it starts ({start})")]
    InvertedAvailability {
        technician: TechnicianId,
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    #[error(
        "technician {technician}: availability {new_start}..{new_end} overlaps {existing_start}..{existing_end}"
    )]
    OverlappingAvailability {
        technician: TechnicianId,
        new_start: NaiveDateTime,
        new_end: NaiveDateTime,
        existing_start: NaiveDateTime,
        existing_end: NaiveDateTime,
    },
}

/// Half-open availability interval `[start, end)`.
///
/// Ordered by start, then end, so a `BTreeSet<Availability>` is sorted along
/// the time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Availability(NaiveDateTime, NaiveDateTime);

impl Availability {
    pub const fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self(start, end)
    }

    pub const fn start(&self) -> NaiveDateTime {
        self.0
    }

    pub const fn end(&self) -> NaiveDateTime {
        self.1
    }

    pub fn overlaps(&self, other: &Availability) -> bool {
        self.0 < other.1 && other.0 < self.1
    }

    /// Returns true if the interval has positive overlap with calendar day `day`.
    pub fn covers_day(&self, day: NaiveDate) -> bool {
        let day_start = day.and_time(NaiveTime::MIN);
        let day_end = day
            .checked_add_days(Days::new(1))
            .map(|next| next.and_time(NaiveTime::MIN))
            .unwrap_or(NaiveDateTime::MAX);
        self.0 < day_end && day_start < self.1
    }

    /// Returns true if `[from, to]` lies entirely inside the interval.
    pub fn covers_span(&self, from: NaiveDateTime, to: NaiveDateTime) -> bool {
        self.0 <= from && to <= self.1
    }

    /// Seconds of this interval falling inside `[from, to)`.
    pub fn overlap_seconds(&self, from: NaiveDateTime, to: NaiveDateTime) -> i64 {
        let start = self.0.max(from);
        let end = self.1.min(to);
        if start < end {
            (end - start).num_seconds()
        } else {
            0
        }
    }
}

/// A technician as delivered by the external environment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Technician {
    id: TechnicianId,
    skills: BTreeSet<Skill>,
    availabilities: BTreeSet<Availability>,
}

impl Technician {
    pub fn builder(id: TechnicianId) -> TechnicianBuilder {
        TechnicianBuilder::new(id)
    }

    pub fn id(&self) -> TechnicianId {
        self.id
    }

    pub fn skills(&self) -> &BTreeSet<Skill> {
        &self.skills
    }

    pub fn has_skill(&self, skill: Skill) -> bool {
        self.skills.contains(&skill)
    }

    pub fn availabilities(&self) -> &BTreeSet<Availability> {
        &self.availabilities
    }

    /// Whether some availability interval covers `day`.
    ///
    /// With a shift, the interval must contain the whole shift on that day;
    /// without one, any positive overlap with the day counts.
    pub fn is_available(&self, day: NaiveDate, shift: Option<(NaiveTime, NaiveTime)>) -> bool {
        match shift {
            Some((start, finish)) => {
                let (from, to) = (day.and_time(start), day.and_time(finish));
                // Only the last interval starting at or before `from` can contain it.
                self.availabilities
                    .range(..=Availability::new(from, NaiveDateTime::MAX))
                    .next_back()
                    .is_some_and(|availability| availability.covers_span(from, to))
            }
            None => self.availabilities.iter().any(|a| a.covers_day(day)),
        }
    }

    /// Re-checks the builder invariants.
    ///
    /// Records arriving through deserialization skip the builder, so ingestion
    /// calls this before trusting them.
    pub fn validate(&self) -> Result<(), TechnicianError> {
        if self.skills.is_empty() {
            return Err(TechnicianError::NoSkills {
                technician: self.id,
            });
        }
        let mut previous: Option<&Availability> = None;
        for availability in &self.availabilities {
            if availability.start() >= availability.end() {
                return Err(TechnicianError::InvertedAvailability {
                    technician: self.id,
                    start: availability.start(),
                    end: availability.end(),
                });
            }
            if let Some(prev) = previous {
                if prev.overlaps(availability) {
                    return Err(TechnicianError::OverlappingAvailability {
                        technician: self.id,
                        new_start: availability.start(),
                        new_end: availability.end(),
                        existing_start: prev.start(),
                        existing_end: prev.end(),
                    });
                }
            }
            previous = Some(availability);
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct TechnicianBuilder {
    id: TechnicianId,
    skills: BTreeSet<Skill>,
    availabilities: BTreeSet<Availability>,
}

impl TechnicianBuilder {
    pub fn new(id: TechnicianId) -> Self {
        Self {
            id,
            skills: BTreeSet::new(),
            availabilities: BTreeSet::new(),
        }
    }

    pub fn add_skill(mut self, skill: Skill) -> Self {
        self.skills.insert(skill);
        self
    }

    /// Adds an availability interval.
    ///
    /// Only the predecessor and successor need checking because the set is
    /// kept sorted and non-overlapping.
    pub fn add_availability(
        mut self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Self, TechnicianError> {
        if start >= end {
            return Err(TechnicianError::InvertedAvailability {
                technician: self.id,
                start,
                end,
            });
        }
        let new = Availability::new(start, end);
        let neighbours = self
            .availabilities
            .range(..new)
            .next_back()
            .into_iter()
            .chain(self.availabilities.range(new..).next());
        for existing in neighbours {
            if existing.overlaps(&new) {
                return Err(TechnicianError::OverlappingAvailability {
                    technician: self.id,
                    new_start: start,
                    new_end: end,
                    existing_start: existing.start(),
                    existing_end: existing.end(),
                });
            }
        }
        self.availabilities.insert(new);
        Ok(self)
    }

    pub fn build(self) -> Result<Technician, TechnicianError> {
        if self.skills.is_empty() {
            return Err(TechnicianError::NoSkills {
                technician: self.id,
            });
        }
        Ok(Technician {
            id: self.id,
            skills: self.skills,
            availabilities: self.availabilities,
        })
    }
}
