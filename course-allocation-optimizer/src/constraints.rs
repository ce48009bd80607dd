//! Pure predicates deciding whether a student may take an activity instance.
//!
//! The automated engine applies all of them; a manual override only applies
//! [`is_eligible`].

use alloc::collections::BTreeMap;

use crate::model::{Activity, PublicId, Student, TimeSlot};

/// Instances grouped by public id, each group in catalogue order.
pub type InstanceIndex<'a> = BTreeMap<PublicId, Vec<&'a Activity>>;

fn group_pairs<A, B, I>(items: I) -> BTreeMap<A, Vec<B>>
where
    A: Ord,
    I: IntoIterator<Item = (A, B)>,
{
    items
        .into_iter()
        .fold(BTreeMap::new(), |mut acc, (key, value)| {
            acc.entry(key).or_default().push(value);
            acc
        })
}

#[must_use]
pub fn index_by_public_id(activities: &[Activity]) -> InstanceIndex<'_> {
    let pairs = activities
        .iter()
        .map(|activity| (activity.public_id, activity));
    group_pairs(pairs)
}

/// Morning-only students may only ever occupy morning instances.
#[must_use]
pub fn is_eligible(student: &Student, activity: &Activity) -> bool {
    !student.is_morning_only || activity.time_slot == TimeSlot::MorningOnly
}

#[must_use]
pub const fn has_capacity(activity: &Activity, current_count: usize) -> bool {
    current_count < activity.max_participants
}

/// Whether the student already holds any instance of `public_id`.
#[must_use]
pub fn already_holds_public_id(
    student: &Student,
    public_id: PublicId,
    instances_by_public_id: &InstanceIndex<'_>,
) -> bool {
    instances_by_public_id
        .get(&public_id)
        .is_some_and(|instances| instances.iter().any(|instance| student.holds(instance.id)))
}
