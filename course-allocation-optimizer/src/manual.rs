//! Operator edits of single assignments.
//!
//! Only availability is enforced here. Capacity and duplicate courses are left to the operator,
//! who may deliberately overbook, and locked students stay editable.

use tracing::{info, warn};

use crate::constraints::is_eligible;
use crate::error::OverrideError;
use crate::model::{ActivityId, StudentId};
use crate::roster::Roster;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManualAssignment {
    Added,
    AlreadyHeld,
}

impl Roster {
    pub fn assign_manually(
        &mut self,
        student_id: StudentId,
        activity_id: ActivityId,
    ) -> Result<ManualAssignment, OverrideError> {
        let activity = self
            .activities
            .iter()
            .find(|activity| activity.id == activity_id)
            .ok_or(OverrideError::UnknownActivity(activity_id))?;
        let student = self
            .students
            .iter_mut()
            .find(|student| student.id == student_id)
            .ok_or(OverrideError::UnknownStudent(student_id))?;

        if !is_eligible(student, activity) {
            warn!(student = %student_id, activity = %activity_id, "rejected manual assignment");
            return Err(OverrideError::MorningOnlyMismatch {
                student: student.name.clone(),
                time_slot: activity.time_slot,
            });
        }
        if student.holds(activity_id) {
            return Ok(ManualAssignment::AlreadyHeld);
        }

        student.assigned_activity_ids.push(activity_id);
        info!(student = %student_id, activity = %activity_id, "manual assignment");
        Ok(ManualAssignment::Added)
    }

    /// Returns whether the student held the instance.
    pub fn remove_assignment(
        &mut self,
        student_id: StudentId,
        activity_id: ActivityId,
    ) -> Result<bool, OverrideError> {
        let student = self
            .students
            .iter_mut()
            .find(|student| student.id == student_id)
            .ok_or(OverrideError::UnknownStudent(student_id))?;
        let before = student.held_count();
        student
            .assigned_activity_ids
            .retain(|held| *held != activity_id);
        Ok(student.held_count() < before)
    }

    /// Drops every assignment of the student and returns how many there were.
    pub fn clear_assignments(&mut self, student_id: StudentId) -> Result<usize, OverrideError> {
        let student = self
            .students
            .iter_mut()
            .find(|student| student.id == student_id)
            .ok_or(OverrideError::UnknownStudent(student_id))?;
        Ok(core::mem::take(&mut student.assigned_activity_ids).len())
    }
}
