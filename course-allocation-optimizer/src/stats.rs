use serde::Serialize;

use crate::model::{ActivityId, PublicId, Student};
use crate::roster::Roster;

/// How far the roster is from every student holding `target` activities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AllocationStats {
    pub total: usize,
    pub fully_assigned: usize,
    pub partially_assigned: usize,
    pub unassigned: usize,
}

impl AllocationStats {
    #[must_use]
    pub fn from_students<'a>(
        students: impl IntoIterator<Item = &'a Student>,
        target: usize,
    ) -> Self {
        let mut stats = Self::default();
        for student in students {
            let held = student.held_count();
            stats.total += 1;
            if held >= target {
                stats.fully_assigned += 1;
            } else if held > 0 {
                stats.partially_assigned += 1;
            } else {
                stats.unassigned += 1;
            }
        }
        stats
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActivityLoad {
    pub activity_id: ActivityId,
    pub public_id: PublicId,
    pub held: usize,
    pub max_participants: usize,
}

impl ActivityLoad {
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.held >= self.max_participants
    }
}

impl Roster {
    #[must_use]
    pub fn stats(&self, target: usize) -> AllocationStats {
        AllocationStats::from_students(self.students(), target)
    }

    /// Occupancy of every instance, in catalogue order.
    #[must_use]
    pub fn activity_loads(&self) -> Vec<ActivityLoad> {
        self.activities()
            .iter()
            .map(|activity| ActivityLoad {
                activity_id: activity.id,
                public_id: activity.public_id,
                held: self.occupancy(activity.id),
                max_participants: activity.max_participants,
            })
            .collect()
    }
}
