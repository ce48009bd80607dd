use thiserror::Error;

use crate::model::{ActivityId, ClassId, StudentId, TimeSlot};

/// Preconditions of an allocation run. Nothing is mutated when one of these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AllocationError {
    #[error("no activities defined, create activities before running the allocation")]
    NoActivities,
    #[error("no classes selected for the allocation run")]
    NoClassesSelected,
    #[error("the selected classes contain no students")]
    NoStudentsSelected,
    #[error("assignments per student must be at least 1")]
    ZeroAssignmentTarget,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OverrideError {
    #[error("unknown student {0}")]
    UnknownStudent(StudentId),
    #[error("unknown activity {0}")]
    UnknownActivity(ActivityId),
    #[error("{student} is only present in the morning and cannot join a {time_slot} activity")]
    MorningOnlyMismatch {
        student: String,
        time_slot: TimeSlot,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("an activity needs room for at least one participant")]
    ZeroCapacity,
    #[error("unknown class {0}")]
    UnknownClass(ClassId),
    #[error("unknown activity {0}")]
    UnknownActivity(ActivityId),
    #[error("unknown student {0}")]
    UnknownStudent(StudentId),
    #[error("unknown time slot {0:?}, expected G, V or N")]
    UnknownTimeSlot(String),
}
