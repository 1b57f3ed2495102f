use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Capability tag held by technicians and required by activities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Skill {
    MtnMech,
    MtnElec,
}

impl Skill {
    pub const ALL: [Skill; 2] = [Skill::MtnMech, Skill::MtnElec];
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Skill::MtnMech => write!(f, "MTN-MECH"),
            Skill::MtnElec => write!(f, "MTN-ELEC"),
        }
    }
}
