//! Greedy, round based allocation.
//!
//! A run partitions the roster into students it must not touch (other classes, locked students)
//! and students it reallocates from scratch. Every round each unlocked student may receive at most
//! one more instance: the first instance of their best ranked, not yet held course that they are
//! eligible for and that still has room. Students are shuffled before every round and morning-only
//! students are served first.

use alloc::collections::BTreeSet;
use std::collections::HashMap;

use itertools::Itertools;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

use crate::constraints::{
    already_holds_public_id, has_capacity, index_by_public_id, is_eligible, InstanceIndex,
};
use crate::error::AllocationError;
use crate::model::{Activity, ActivityId, ClassLetter, Student, StudentId};
use crate::roster::Roster;
use crate::stats::AllocationStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocationConfig {
    /// Number of distinct courses every reallocated student should end up with.
    pub assignments_per_student: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoundSummary {
    pub round: usize,
    pub newly_assigned: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocationReport {
    pub rounds: Vec<RoundSummary>,
    pub stats: AllocationStats,
    /// Reallocated students that ended below the target.
    pub under_assigned: Vec<StudentId>,
}

/// Result of [`AllocationRun::finish`].
#[derive(Debug, Clone)]
pub struct AllocationOutcome {
    /// The whole roster, sorted by name.
    pub students: Vec<Student>,
    pub rounds: Vec<RoundSummary>,
    pub under_assigned: Vec<StudentId>,
}

/// Seats taken per instance. Ids outside the catalogue are ignored.
#[derive(Debug, Clone, Default)]
struct Occupancy(HashMap<ActivityId, usize>);

impl Occupancy {
    fn seed<'a>(activities: &[Activity], holders: impl Iterator<Item = &'a Student>) -> Self {
        let mut counts: HashMap<ActivityId, usize> =
            activities.iter().map(|activity| (activity.id, 0)).collect();
        for activity_id in holders.flat_map(|student| &student.assigned_activity_ids) {
            if let Some(count) = counts.get_mut(activity_id) {
                *count += 1;
            }
        }
        Self(counts)
    }

    fn get(&self, activity_id: ActivityId) -> usize {
        self.0.get(&activity_id).copied().unwrap_or(0)
    }

    fn increment(&mut self, activity_id: ActivityId) {
        *self.0.entry(activity_id).or_default() += 1;
    }
}

/// One allocation run, advanced a round at a time.
///
/// Building the run clones the students, so nothing in the source roster changes until the
/// caller swaps in the result of [`AllocationRun::finish`].
#[derive(Debug)]
pub struct AllocationRun<'a> {
    target: usize,
    instances_by_public_id: InstanceIndex<'a>,
    occupancy: Occupancy,
    inactive: Vec<Student>,
    locked: Vec<Student>,
    working: Vec<Student>,
    rounds: Vec<RoundSummary>,
}

impl<'a> AllocationRun<'a> {
    pub fn prepare(
        students: &[Student],
        activities: &'a [Activity],
        config: &AllocationConfig,
        active_classes: &BTreeSet<ClassLetter>,
    ) -> Result<Self, AllocationError> {
        if config.assignments_per_student == 0 {
            return Err(AllocationError::ZeroAssignmentTarget);
        }
        if activities.is_empty() {
            return Err(AllocationError::NoActivities);
        }
        if active_classes.is_empty() {
            return Err(AllocationError::NoClassesSelected);
        }

        let (active, inactive): (Vec<Student>, Vec<Student>) = students
            .iter()
            .cloned()
            .partition(|student| active_classes.contains(&student.class_letter));
        if active.is_empty() {
            return Err(AllocationError::NoStudentsSelected);
        }
        let (locked, mut working): (Vec<Student>, Vec<Student>) =
            active.into_iter().partition(|student| student.is_locked);

        let occupancy = Occupancy::seed(activities, inactive.iter().chain(&locked));
        for student in &mut working {
            student.assigned_activity_ids.clear();
        }

        debug!(
            inactive = inactive.len(),
            locked = locked.len(),
            working = working.len(),
            "prepared allocation run"
        );

        Ok(Self {
            target: config.assignments_per_student,
            instances_by_public_id: index_by_public_id(activities),
            occupancy,
            inactive,
            locked,
            working,
            rounds: Vec::with_capacity(config.assignments_per_student),
        })
    }

    #[must_use]
    pub const fn target(&self) -> usize {
        self.target
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.rounds.len() >= self.target
    }

    /// Students being reallocated, in the order the last round served them.
    #[must_use]
    pub fn working_students(&self) -> &[Student] {
        &self.working
    }

    /// Seats taken on the instance, including immovable reservations.
    #[must_use]
    pub fn occupancy(&self, activity_id: ActivityId) -> usize {
        self.occupancy.get(activity_id)
    }

    /// Runs the next round, or returns `None` once all rounds are done.
    pub fn run_round<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<RoundSummary> {
        if self.is_complete() {
            return None;
        }
        let round = self.rounds.len() + 1;

        self.working.shuffle(rng);
        // stable, so the shuffled order survives inside both groups
        self.working.sort_by_key(|student| !student.is_morning_only);

        let mut newly_assigned = 0;
        for student in &mut self.working {
            if student.held_count() >= self.target {
                continue;
            }
            if let Some(activity) =
                select_instance(student, &self.instances_by_public_id, &self.occupancy)
            {
                self.occupancy.increment(activity.id);
                student.assigned_activity_ids.push(activity.id);
                newly_assigned += 1;
                debug!(
                    round,
                    student = %student.id,
                    activity = %activity.id,
                    public_id = %activity.public_id,
                    "assigned"
                );
            }
        }

        let summary = RoundSummary {
            round,
            newly_assigned,
        };
        self.rounds.push(summary);
        Some(summary)
    }

    /// Runs all remaining rounds.
    pub fn run_to_completion<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        while self.run_round(rng).is_some() {}
    }

    /// Merges untouched and reallocated students back into one list sorted by name.
    #[must_use]
    pub fn finish(self) -> AllocationOutcome {
        let under_assigned = self
            .working
            .iter()
            .filter(|student| student.held_count() < self.target)
            .map(|student| student.id)
            .sorted()
            .collect();

        let mut students = self.inactive;
        students.extend(self.locked);
        students.extend(self.working);
        students.sort_by_cached_key(name_key);

        AllocationOutcome {
            students,
            rounds: self.rounds,
            under_assigned,
        }
    }
}

/// Case-insensitive, with the raw name breaking ties.
fn name_key(student: &Student) -> (String, String) {
    (student.name.to_lowercase(), student.name.clone())
}

/// First instance, in priority then catalogue order, the student may still take.
fn select_instance<'a>(
    student: &Student,
    index: &InstanceIndex<'a>,
    occupancy: &Occupancy,
) -> Option<&'a Activity> {
    student
        .priorities
        .iter()
        .filter(|public_id| !already_holds_public_id(student, **public_id, index))
        .find_map(|public_id| {
            index
                .get(public_id)?
                .iter()
                .copied()
                .find(|activity| {
                    is_eligible(student, activity)
                        && has_capacity(activity, occupancy.get(activity.id))
                })
        })
}

impl Roster {
    /// Reallocates every unlocked student of `active_classes`.
    ///
    /// The roster is replaced in one step; on a precondition failure it is left as it was.
    pub fn run_allocation<R: Rng + ?Sized>(
        &mut self,
        config: &AllocationConfig,
        active_classes: &BTreeSet<ClassLetter>,
        rng: &mut R,
    ) -> Result<AllocationReport, AllocationError> {
        let mut run =
            AllocationRun::prepare(&self.students, &self.activities, config, active_classes)?;
        run.run_to_completion(rng);
        let outcome = run.finish();
        self.students = outcome.students;

        let stats = self.stats(config.assignments_per_student);
        info!(
            total = stats.total,
            fully_assigned = stats.fully_assigned,
            partially_assigned = stats.partially_assigned,
            unassigned = stats.unassigned,
            "allocation finished"
        );
        Ok(AllocationReport {
            rounds: outcome.rounds,
            stats,
            under_assigned: outcome.under_assigned,
        })
    }
}
