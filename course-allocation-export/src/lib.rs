//! Printable plain text views of a roster. Rendering never changes the roster.

use core::fmt::{self, Write};

use course_allocation_optimizer::{Activity, Roster, Student};
use itertools::Itertools;

fn name_key(student: &Student) -> (String, String) {
    (student.name.to_lowercase(), student.name.clone())
}

fn morning_note(student: &Student) -> &'static str {
    if student.is_morning_only {
        " (morning only)"
    } else {
        ""
    }
}

fn write_activity_block(
    out: &mut impl Write,
    roster: &Roster,
    activity: &Activity,
) -> fmt::Result {
    let participants = roster
        .students()
        .iter()
        .filter(|student| student.holds(activity.id))
        .sorted_by_key(|student| name_key(student))
        .collect_vec();

    writeln!(out, "{}. {}", activity.public_id, activity.name)?;
    write!(
        out,
        "Time: {} | Leader: {}",
        activity.time_slot.label(),
        activity.leader
    )?;
    if let Some(location) = &activity.location {
        write!(out, " | Location: {location}")?;
    }
    writeln!(
        out,
        " | Occupancy: {}/{}",
        participants.len(),
        activity.max_participants
    )?;
    if participants.is_empty() {
        writeln!(out, "  (no participants)")?;
    }
    for student in participants {
        writeln!(
            out,
            "  {} | {}{}",
            student.name,
            student.class_name,
            morning_note(student)
        )?;
    }
    writeln!(out)
}

/// One block per activity instance, ordered by public id and time slot code, followed by every
/// student holding fewer than `target` activities.
pub fn write_assignment_report(
    out: &mut impl Write,
    roster: &Roster,
    target: usize,
) -> fmt::Result {
    writeln!(out, "Course assignment")?;
    writeln!(out, "Target: {target} course(s) per student")?;
    writeln!(out)?;

    for activity in roster
        .activities()
        .iter()
        .sorted_by_key(|activity| (activity.public_id, activity.time_slot.code()))
    {
        write_activity_block(out, roster, activity)?;
    }

    let incomplete = roster
        .students()
        .iter()
        .filter(|student| student.held_count() < target)
        .sorted_by_key(|student| name_key(student))
        .collect_vec();
    if incomplete.is_empty() {
        return Ok(());
    }

    writeln!(out, "Not fully assigned (target: {target})")?;
    for student in incomplete {
        writeln!(
            out,
            "  {} | {} | {}/{} | {} | wishes: {}",
            student.name,
            student.class_name,
            student.held_count(),
            target,
            if student.is_morning_only {
                "morning only"
            } else {
                "-"
            },
            student.priorities.iter().join(", ")
        )?;
    }
    Ok(())
}

/// Class letters for the import and the course catalogue, for handing out to staff.
pub fn write_reference_overview(out: &mut impl Write, roster: &Roster) -> fmt::Result {
    writeln!(out, "Reference lists")?;
    writeln!(out)?;
    writeln!(out, "1. Classes (letter | name)")?;
    for class in roster.classes().iter().sorted_by_key(|class| class.letter) {
        writeln!(out, "  {} | {}", class.letter, class.name)?;
    }
    writeln!(out)?;
    writeln!(
        out,
        "2. Activities (no. | name | time | leader | location | max)"
    )?;
    for activity in roster
        .activities()
        .iter()
        .sorted_by_key(|activity| activity.public_id)
    {
        writeln!(
            out,
            "  {} | {} | {} | {} | {} | {}",
            activity.public_id,
            activity.name,
            activity.time_slot.label(),
            activity.leader,
            activity.location.as_deref().unwrap_or("-"),
            activity.max_participants
        )?;
    }
    Ok(())
}

#[must_use]
pub fn assignment_report(roster: &Roster, target: usize) -> String {
    let mut out = String::new();
    // writing into a String can not fail
    let _ = write_assignment_report(&mut out, roster, target);
    out
}

#[must_use]
pub fn reference_overview(roster: &Roster) -> String {
    let mut out = String::new();
    let _ = write_reference_overview(&mut out, roster);
    out
}
