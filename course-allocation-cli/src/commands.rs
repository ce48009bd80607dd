use std::collections::BTreeSet;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use course_allocation_config::Config;
use course_allocation_export::{assignment_report, reference_overview};
use course_allocation_import::{import_into, ImportMode};
use course_allocation_optimizer::{
    AllocationConfig, AllocationReport, ClassLetter, ManualAssignment, NewActivity, Roster,
};
use itertools::Itertools;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::cli::{Command, ExportKind};
use crate::error::AppError;

fn letter(raw: char) -> ClassLetter {
    ClassLetter(raw.to_ascii_uppercase())
}

fn read_input(file: Option<&Path>) -> io::Result<String> {
    match file {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

/// Every class letter known to the roster, including letters only students carry.
fn all_letters(roster: &Roster) -> BTreeSet<ClassLetter> {
    let carried = roster.students().iter().map(|s| s.class_letter);
    roster
        .classes()
        .iter()
        .map(|class| class.letter)
        .chain(carried)
        .collect()
}

fn write_allocation_report(
    out: &mut impl Write,
    roster: &Roster,
    report: &AllocationReport,
) -> io::Result<()> {
    for round in &report.rounds {
        writeln!(
            out,
            "round {}: {} assigned",
            round.round, round.newly_assigned
        )?;
    }
    let stats = report.stats;
    writeln!(
        out,
        "{} students: {} complete, {} partial, {} without course",
        stats.total, stats.fully_assigned, stats.partially_assigned, stats.unassigned
    )?;
    if !report.under_assigned.is_empty() {
        let names = report
            .under_assigned
            .iter()
            .filter_map(|id| roster.student(*id))
            .map(|student| student.name.as_str())
            .join(", ");
        writeln!(out, "below target: {names}")?;
    }
    Ok(())
}

fn write_listing(out: &mut impl Write, roster: &Roster) -> io::Result<()> {
    writeln!(out, "classes:")?;
    for class in roster.classes() {
        writeln!(out, "  #{} {} {}", class.id, class.letter, class.name)?;
    }
    writeln!(out, "activities:")?;
    for activity in roster.activities() {
        writeln!(
            out,
            "  #{} [{}] {} ({}) {}/{}",
            activity.id,
            activity.public_id,
            activity.name,
            activity.time_slot.code(),
            roster.occupancy(activity.id),
            activity.max_participants
        )?;
    }
    writeln!(out, "students:")?;
    for student in roster.students() {
        writeln!(
            out,
            "  #{} {} ({}){}{} wishes [{}] holds [{}]",
            student.id,
            student.name,
            student.class_letter,
            if student.is_morning_only { " morning" } else { "" },
            if student.is_locked { " locked" } else { "" },
            student.priorities.iter().join(", "),
            student.assigned_activity_ids.iter().join(", ")
        )?;
    }
    Ok(())
}

pub fn execute(
    command: Command,
    roster: &mut Roster,
    config: &Config,
    out: &mut impl Write,
) -> Result<(), AppError> {
    match command {
        Command::AddClass { name } => {
            let class = roster.add_class(&name)?;
            writeln!(
                out,
                "class {} created with letter {}",
                class.id, class.letter
            )?;
        }
        Command::RemoveClass { id } => {
            let class = roster.remove_class(id)?;
            writeln!(out, "class {} removed", class.name)?;
        }
        Command::AddActivity {
            name,
            leader,
            max,
            slot,
            location,
            description,
        } => {
            let activity = roster.add_activity(NewActivity {
                name,
                leader,
                location,
                description,
                max_participants: max,
                time_slot: slot,
            })?;
            writeln!(
                out,
                "activity {} created as course number {}",
                activity.id, activity.public_id
            )?;
        }
        Command::DeleteActivity { id } => {
            let activity = roster.delete_activity(id)?;
            writeln!(out, "activity {} deleted", activity.name)?;
        }
        Command::Import { class, file } => {
            let text = read_input(file.as_deref())?;
            let mode = class.map_or(ImportMode::Bulk, |raw| ImportMode::SingleClass(letter(raw)));
            let added = import_into(roster, &text, mode)?;
            writeln!(out, "{} students imported", added.len())?;
        }
        Command::ClearStudents => {
            roster.clear_students();
            writeln!(out, "all students removed")?;
        }
        Command::Lock { student } => {
            let locked = roster.toggle_lock(student)?;
            writeln!(
                out,
                "student {student} {}",
                if locked { "locked" } else { "unlocked" }
            )?;
        }
        Command::Allocate {
            classes,
            assignments,
            seed,
        } => {
            let config = match assignments {
                Some(assignments_per_student) => Config {
                    assignments_per_student,
                    ..config.clone()
                }
                .validate()?,
                None => config.clone(),
            };
            let active = if classes.is_empty() {
                all_letters(roster)
            } else {
                classes.into_iter().map(letter).collect()
            };
            let mut rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
            let report = roster.run_allocation(
                &AllocationConfig {
                    assignments_per_student: config.assignments_per_student,
                },
                &active,
                &mut rng,
            )?;
            write_allocation_report(out, roster, &report)?;
        }
        Command::Assign { student, activity } => match roster.assign_manually(student, activity)? {
            ManualAssignment::Added => writeln!(out, "assigned")?,
            ManualAssignment::AlreadyHeld => writeln!(out, "already assigned")?,
        },
        Command::Unassign { student, activity } => {
            if roster.remove_assignment(student, activity)? {
                writeln!(out, "removed")?;
            } else {
                writeln!(out, "student {student} did not hold activity {activity}")?;
            }
        }
        Command::Clear { student } => {
            let removed = roster.clear_assignments(student)?;
            writeln!(out, "{removed} assignments removed")?;
        }
        Command::Stats => {
            let stats = roster.stats(config.assignments_per_student);
            writeln!(
                out,
                "{} students: {} complete, {} partial, {} without course",
                stats.total, stats.fully_assigned, stats.partially_assigned, stats.unassigned
            )?;
            for load in roster.activity_loads() {
                writeln!(
                    out,
                    "  #{} [{}] {}/{}{}",
                    load.activity_id,
                    load.public_id,
                    load.held,
                    load.max_participants,
                    if load.is_full() { " full" } else { "" }
                )?;
            }
        }
        Command::List => write_listing(out, roster)?,
        Command::Export { kind, out: target } => {
            let document = match kind {
                ExportKind::Rosters => assignment_report(roster, config.assignments_per_student),
                ExportKind::Overview => reference_overview(roster),
            };
            match target {
                Some(path) => {
                    fs::write(&path, document)?;
                    info!(path = %path.display(), "export written");
                }
                None => out.write_all(document.as_bytes())?,
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use course_allocation_optimizer::{ActivityId, StudentId, TimeSlot};

    use super::*;

    fn run(roster: &mut Roster, command: Command) -> Result<String, AppError> {
        let mut out = Vec::new();
        execute(command, roster, &Config::default(), &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    fn add_activity(roster: &mut Roster, name: &str, max: usize, slot: TimeSlot) -> ActivityId {
        run(
            roster,
            Command::AddActivity {
                name: name.to_owned(),
                leader: "Meier".to_owned(),
                max,
                slot,
                location: None,
                description: None,
            },
        )
        .unwrap();
        roster.activities().last().unwrap().id
    }

    fn import(roster: &mut Roster, text: &str) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.csv");
        fs::write(&path, text).unwrap();
        run(
            roster,
            Command::Import {
                class: Some('a'),
                file: Some(path),
            },
        )
        .unwrap();
    }

    #[test]
    fn full_workflow() {
        let mut roster = Roster::new();
        let add_class = Command::AddClass {
            name: "4a".to_owned(),
        };
        assert_eq!(
            run(&mut roster, add_class).unwrap(),
            format!("class {} created with letter A\n", roster.classes()[0].id)
        );
        add_activity(&mut roster, "Chess", 1, TimeSlot::FullDay);
        add_activity(&mut roster, "Pottery", 5, TimeSlot::MorningOnly);
        import(&mut roster, "Anna, 1\nBen, 1, 2, X\nCleo, 1\n");
        assert_eq!(roster.students().len(), 3);

        let output = run(
            &mut roster,
            Command::Allocate {
                classes: vec![],
                assignments: None,
                seed: Some(3),
            },
        )
        .unwrap();
        assert!(output.starts_with("round 1: "));
        assert!(output.contains("3 students: 2 complete, 0 partial, 1 without course"));

        let ben = roster.students().iter().find(|s| s.name == "Ben").unwrap();
        assert_eq!(ben.assigned_activity_ids.len(), 1);
        let pottery = roster.activity(ben.assigned_activity_ids[0]).unwrap();
        assert_eq!(pottery.time_slot, TimeSlot::MorningOnly);

        let report = run(
            &mut roster,
            Command::Export {
                kind: ExportKind::Rosters,
                out: None,
            },
        )
        .unwrap();
        assert!(report.starts_with("Course assignment\n"));
        assert!(report.contains("Not fully assigned (target: 1)"));
    }

    #[test]
    fn assignment_override_is_validated() {
        let mut roster = Roster::new();
        roster.add_class("4a").unwrap();
        add_activity(&mut roster, "Chess", 3, TimeSlot::FullDay);
        import(&mut roster, "Anna, 1\n");

        let result = run(
            &mut roster,
            Command::Allocate {
                classes: vec!['a'],
                assignments: Some(9),
                seed: Some(1),
            },
        );
        assert!(matches!(result, Err(AppError::Config(_))));
        assert!(roster.students()[0].assigned_activity_ids.is_empty());
    }

    #[test]
    fn unknown_class_selection_reports_no_students() {
        let mut roster = Roster::new();
        roster.add_class("4a").unwrap();
        add_activity(&mut roster, "Chess", 3, TimeSlot::FullDay);
        import(&mut roster, "Anna, 1\n");

        let result = run(
            &mut roster,
            Command::Allocate {
                classes: vec!['Q'],
                assignments: None,
                seed: Some(1),
            },
        );
        assert!(matches!(result, Err(AppError::Allocation(_))));
    }

    #[test]
    fn manual_changes() {
        let mut roster = Roster::new();
        roster.add_class("4a").unwrap();
        let afternoon = add_activity(&mut roster, "Chess", 1, TimeSlot::AfternoonOnly);
        import(&mut roster, "Anna, 1\nBen, 1, X\n");
        let anna = roster.students()[0].id;
        let ben = roster.students()[1].id;

        let assign = |student: StudentId| Command::Assign {
            student,
            activity: afternoon,
        };
        assert_eq!(run(&mut roster, assign(anna)).unwrap(), "assigned\n");
        assert_eq!(
            run(&mut roster, assign(anna)).unwrap(),
            "already assigned\n"
        );
        assert!(matches!(run(&mut roster, assign(ben)), Err(AppError::Override(_))));

        assert_eq!(
            run(&mut roster, Command::Clear { student: anna }).unwrap(),
            "1 assignments removed\n"
        );
        let unassign = Command::Unassign {
            student: anna,
            activity: afternoon,
        };
        assert_eq!(
            run(&mut roster, unassign).unwrap(),
            format!("student {anna} did not hold activity {afternoon}\n")
        );
    }

    #[test]
    fn export_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overview.txt");
        let mut roster = Roster::new();
        roster.add_class("4a").unwrap();

        let printed = run(
            &mut roster,
            Command::Export {
                kind: ExportKind::Overview,
                out: Some(path.clone()),
            },
        )
        .unwrap();
        assert!(printed.is_empty());
        assert!(fs::read_to_string(path).unwrap().contains("  A | 4a"));
    }
}
