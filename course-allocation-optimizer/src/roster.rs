use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::RosterError;
use crate::model::{
    Activity, ActivityId, ClassGroup, ClassId, ClassLetter, NewActivity, NewStudent, PublicId,
    Student, StudentId,
};

const CLASS_LETTERS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// The in-memory aggregate of classes, activities and students.
///
/// Ids of all three entity kinds come from one counter and are never reused, so a stale id can
/// not silently point at a newer record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredRoster")]
pub struct Roster {
    next_id: u32,
    pub(crate) classes: Vec<ClassGroup>,
    pub(crate) activities: Vec<Activity>,
    pub(crate) students: Vec<Student>,
}

/// On-disk shape. A missing or stale counter is raised past the largest stored id on load.
#[derive(Default, Deserialize)]
#[serde(default)]
struct StoredRoster {
    next_id: u32,
    classes: Vec<ClassGroup>,
    activities: Vec<Activity>,
    students: Vec<Student>,
}

impl From<StoredRoster> for Roster {
    fn from(stored: StoredRoster) -> Self {
        let mut roster = Self::from_parts(stored.classes, stored.activities, stored.students);
        roster.next_id = roster.next_id.max(stored.next_id);
        roster
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

impl Roster {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a roster from existing records, continuing the id counter after the largest id.
    #[must_use]
    pub fn from_parts(
        classes: Vec<ClassGroup>,
        activities: Vec<Activity>,
        students: Vec<Student>,
    ) -> Self {
        let next_id = classes
            .iter()
            .map(|class| class.id.0)
            .chain(activities.iter().map(|activity| activity.id.0))
            .chain(students.iter().map(|student| student.id.0))
            .max()
            .unwrap_or(0);
        Self {
            next_id,
            classes,
            activities,
            students,
        }
    }

    fn allocate_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    #[must_use]
    pub fn classes(&self) -> &[ClassGroup] {
        &self.classes
    }

    /// Activities in catalogue order.
    #[must_use]
    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    #[must_use]
    pub fn students(&self) -> &[Student] {
        &self.students
    }

    #[must_use]
    pub fn class(&self, id: ClassId) -> Option<&ClassGroup> {
        self.classes.iter().find(|class| class.id == id)
    }

    #[must_use]
    pub fn class_by_letter(&self, letter: ClassLetter) -> Option<&ClassGroup> {
        self.classes.iter().find(|class| class.letter == letter)
    }

    #[must_use]
    pub fn activity(&self, id: ActivityId) -> Option<&Activity> {
        self.activities.iter().find(|activity| activity.id == id)
    }

    #[must_use]
    pub fn student(&self, id: StudentId) -> Option<&Student> {
        self.students.iter().find(|student| student.id == id)
    }

    /// All instances sharing `public_id`, in catalogue order.
    pub fn instances_of(&self, public_id: PublicId) -> impl Iterator<Item = &Activity> + '_ {
        self.activities
            .iter()
            .filter(move |activity| activity.public_id == public_id)
    }

    /// Number of students currently holding the instance.
    #[must_use]
    pub fn occupancy(&self, activity_id: ActivityId) -> usize {
        self.students
            .iter()
            .filter(|student| student.holds(activity_id))
            .count()
    }

    /// The first letter of the alphabet no class uses yet.
    fn next_class_letter(&self) -> ClassLetter {
        CLASS_LETTERS
            .chars()
            .map(ClassLetter)
            .find(|letter| self.class_by_letter(*letter).is_none())
            .unwrap_or(ClassLetter::PLACEHOLDER)
    }

    pub fn add_class(&mut self, name: &str) -> Result<&ClassGroup, RosterError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RosterError::EmptyName);
        }
        let letter = self.next_class_letter();
        let id = ClassId(self.allocate_id());
        debug!(%id, %letter, name, "adding class");
        self.classes.push(ClassGroup {
            id,
            name: name.to_owned(),
            letter,
        });
        Ok(&self.classes[self.classes.len() - 1])
    }

    /// Removes the class record. Its students keep their letter.
    pub fn remove_class(&mut self, id: ClassId) -> Result<ClassGroup, RosterError> {
        let index = self
            .classes
            .iter()
            .position(|class| class.id == id)
            .ok_or(RosterError::UnknownClass(id))?;
        let class = self.classes.remove(index);
        debug!(%id, letter = %class.letter, "removed class");
        Ok(class)
    }

    fn next_public_id(&self) -> PublicId {
        let highest = self
            .activities
            .iter()
            .map(|activity| activity.public_id.0)
            .max()
            .unwrap_or(0);
        PublicId(highest + 1)
    }

    /// Adds an activity instance.
    ///
    /// An existing activity with the same name and leader (ignoring case) donates its public id,
    /// which is how a second time variant of the same course is created.
    pub fn add_activity(&mut self, new: NewActivity) -> Result<&Activity, RosterError> {
        let name = new.name.trim();
        let leader = new.leader.trim();
        if name.is_empty() || leader.is_empty() {
            return Err(RosterError::EmptyName);
        }
        if new.max_participants == 0 {
            return Err(RosterError::ZeroCapacity);
        }

        let public_id = self
            .activities
            .iter()
            .find(|activity| {
                activity.name.to_lowercase() == name.to_lowercase()
                    && activity.leader.to_lowercase() == leader.to_lowercase()
            })
            .map_or_else(|| self.next_public_id(), |existing| existing.public_id);

        let id = ActivityId(self.allocate_id());
        debug!(%id, %public_id, name, time_slot = %new.time_slot, "adding activity");
        self.activities.push(Activity {
            id,
            public_id,
            name: name.to_owned(),
            leader: leader.to_owned(),
            location: non_blank(new.location),
            description: non_blank(new.description),
            max_participants: new.max_participants,
            time_slot: new.time_slot,
        });
        Ok(&self.activities[self.activities.len() - 1])
    }

    /// Removes the instance and every assignment to it.
    pub fn delete_activity(&mut self, id: ActivityId) -> Result<Activity, RosterError> {
        let index = self
            .activities
            .iter()
            .position(|activity| activity.id == id)
            .ok_or(RosterError::UnknownActivity(id))?;
        for student in &mut self.students {
            student.assigned_activity_ids.retain(|held| *held != id);
        }
        Ok(self.activities.remove(index))
    }

    /// Appends unassigned, unlocked students and returns their ids.
    pub fn append_students(
        &mut self,
        students: impl IntoIterator<Item = NewStudent>,
    ) -> Vec<StudentId> {
        students
            .into_iter()
            .map(|new| {
                let id = StudentId(self.allocate_id());
                self.students.push(Student {
                    id,
                    name: new.name,
                    class_letter: new.class_letter,
                    class_name: new.class_name,
                    priorities: new.priorities,
                    assigned_activity_ids: Vec::new(),
                    is_morning_only: new.is_morning_only,
                    is_locked: false,
                });
                id
            })
            .collect()
    }

    pub fn clear_students(&mut self) {
        self.students.clear();
    }

    /// Flips the lock flag and returns the new state.
    pub fn toggle_lock(&mut self, id: StudentId) -> Result<bool, RosterError> {
        let student = self
            .students
            .iter_mut()
            .find(|student| student.id == id)
            .ok_or(RosterError::UnknownStudent(id))?;
        student.is_locked = !student.is_locked;
        Ok(student.is_locked)
    }
}
