use crate::model::{Activity, ActivityId, ClassLetter, PublicId, Student, StudentId, TimeSlot};

pub fn activity(
    id: u32,
    public_id: u32,
    max_participants: usize,
    time_slot: TimeSlot,
) -> Activity {
    Activity {
        id: ActivityId(id),
        public_id: PublicId(public_id),
        name: format!("Course {public_id}"),
        leader: "Leader".to_owned(),
        location: None,
        description: None,
        max_participants,
        time_slot,
    }
}

pub fn student(id: u32, name: &str, letter: char, priorities: &[u32]) -> Student {
    Student {
        id: StudentId(id),
        name: name.to_owned(),
        class_letter: ClassLetter(letter),
        class_name: format!("Class {letter}"),
        priorities: priorities.iter().copied().map(PublicId).collect(),
        assigned_activity_ids: Vec::new(),
        is_morning_only: false,
        is_locked: false,
    }
}
