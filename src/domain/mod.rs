//! Aggregates ingested from the external scheduling environment.
//!
//! These are plain, already-deserialized records. The graph copies the facts
//! they carry into nodes and edges at well-defined ingestion points and never
//! keeps a reference back to them.

mod period;
mod skill;
pub mod technician;
pub mod work_order;

pub use period::Period;
pub use skill::Skill;
pub use technician::{Availability, Technician, TechnicianBuilder, TechnicianError, TechnicianId};
pub use work_order::{
    Activity, ActivityNumber, NumberOfPeople, RelationKind, WorkOrder, WorkOrderError,
    WorkOrderNumber,
};
