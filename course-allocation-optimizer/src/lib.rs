extern crate alloc;

pub mod constraints;
pub mod engine;
pub mod error;
pub mod manual;
pub mod model;
pub mod roster;
pub mod stats;

#[cfg(test)]
mod fixtures;

pub use engine::{AllocationConfig, AllocationReport, AllocationRun, RoundSummary};
pub use error::{AllocationError, OverrideError, RosterError};
pub use manual::ManualAssignment;
pub use model::{
    Activity, ActivityId, ClassGroup, ClassId, ClassLetter, NewActivity, NewStudent, PublicId,
    Student, StudentId, TimeSlot,
};
pub use roster::Roster;
pub use stats::{ActivityLoad, AllocationStats};
