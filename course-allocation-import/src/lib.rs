//! Turns pasted spreadsheet text into student records.
//!
//! Two dialects are understood, one line per student, fields separated by `,` or `;`:
//!
//! * single class: `Name, Prio1, Prio2, ..., [X]`, the class is chosen by the operator
//! * bulk: `Name, ClassLetter, Prio1, Prio2, ..., [X]`
//!
//! A trailing `X` marks a student who is only present in the morning. Priorities are the public
//! course numbers; tokens that are not numbers are skipped.

pub mod error;

use course_allocation_optimizer::{
    ClassGroup, ClassLetter, NewStudent, PublicId, Roster, StudentId,
};
use itertools::Itertools;
use tracing::{info, warn};

pub use crate::error::ImportError;

const MORNING_ONLY_MARKER: &str = "X";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    /// Every line belongs to the class with this letter.
    SingleClass(ClassLetter),
    /// Every line names its class letter in the second field.
    Bulk,
}

/// Splits off a trailing morning-only marker.
fn strip_morning_marker<'a>(fields: &'a [&'a str]) -> (&'a [&'a str], bool) {
    match fields.split_last() {
        Some((last, rest)) if last.eq_ignore_ascii_case(MORNING_ONLY_MARKER) => (rest, true),
        _ => (fields, false),
    }
}

fn parse_priorities(fields: &[&str]) -> Vec<PublicId> {
    fields
        .iter()
        .filter_map(|field| field.parse().ok())
        .collect()
}

fn placeholder_class_name(token: &str) -> String {
    let token = if token.is_empty() { "?" } else { token };
    format!("{} (unknown)", token.to_uppercase())
}

/// Resolves the class token of a bulk line. Tokens longer than one character never match an
/// existing class and land in a placeholder class named after the token.
fn resolve_class(token: &str, classes: &[ClassGroup]) -> (ClassLetter, String) {
    let Some(letter) = ClassLetter::from_token(token) else {
        warn!(token, "class token is not a single letter");
        return (ClassLetter::PLACEHOLDER, placeholder_class_name(token));
    };
    let name = match classes.iter().find(|class| class.letter == letter) {
        Some(class) => class.name.clone(),
        None => placeholder_class_name(token),
    };
    (letter, name)
}

fn parse_line(line: &str, mode: ImportMode, classes: &[ClassGroup]) -> Option<NewStudent> {
    let fields = line.split([',', ';']).map(str::trim).collect_vec();

    let (class_letter, class_name, rest) = match mode {
        ImportMode::SingleClass(letter) => {
            let class = classes.iter().find(|class| class.letter == letter)?;
            (class.letter, class.name.clone(), &fields[1..])
        }
        ImportMode::Bulk => {
            if fields.len() < 3 {
                return None;
            }
            let (letter, name) = resolve_class(fields[1], classes);
            (letter, name, &fields[2..])
        }
    };

    let name = fields[0];
    if name.is_empty() {
        return None;
    }
    let (priority_fields, is_morning_only) = strip_morning_marker(rest);

    Some(NewStudent {
        name: name.to_owned(),
        class_letter,
        class_name,
        priorities: parse_priorities(priority_fields),
        is_morning_only,
    })
}

/// Parses every non-blank line, dropping lines without a name or, in bulk mode, with fewer than
/// three fields.
pub fn parse_students(
    text: &str,
    mode: ImportMode,
    classes: &[ClassGroup],
) -> Result<Vec<NewStudent>, ImportError> {
    if let ImportMode::SingleClass(letter) = mode {
        if !classes.iter().any(|class| class.letter == letter) {
            return Err(ImportError::UnknownClass(letter));
        }
    }

    Ok(text
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(index, line)| {
            let parsed = parse_line(line, mode, classes);
            if parsed.is_none() {
                warn!(line = index + 1, "skipping unparsable import line");
            }
            parsed
        })
        .collect())
}

/// Parses `text` and appends the students. Nothing is appended when no line is valid.
pub fn import_into(
    roster: &mut Roster,
    text: &str,
    mode: ImportMode,
) -> Result<Vec<StudentId>, ImportError> {
    let students = parse_students(text, mode, roster.classes())?;
    if students.is_empty() {
        return Err(ImportError::NoValidStudents);
    }
    let ids = roster.append_students(students);
    info!(count = ids.len(), "imported students");
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use course_allocation_optimizer::ClassId;

    use super::*;

    fn classes() -> Vec<ClassGroup> {
        vec![
            ClassGroup {
                id: ClassId(1),
                name: "4. Klasse".to_owned(),
                letter: ClassLetter('A'),
            },
            ClassGroup {
                id: ClassId(2),
                name: "5. Klasse".to_owned(),
                letter: ClassLetter('B'),
            },
        ]
    }

    fn ids(raw: &[u32]) -> Vec<PublicId> {
        raw.iter().copied().map(PublicId).collect()
    }

    #[test]
    fn single_class_line_with_morning_marker() {
        let mode = ImportMode::SingleClass(ClassLetter('A'));
        let students = parse_students("Anna,5,2,1,X", mode, &classes()).unwrap();
        assert_eq!(
            students,
            vec![NewStudent {
                name: "Anna".to_owned(),
                class_letter: ClassLetter('A'),
                class_name: "4. Klasse".to_owned(),
                priorities: ids(&[5, 2, 1]),
                is_morning_only: true,
            }]
        );
    }

    #[test]
    fn single_class_mixed_separators_and_noise() {
        let text = "Marco; 5 ;two, 1\r\n\n   \nLena, x\nTom";
        let mode = ImportMode::SingleClass(ClassLetter('B'));
        let students = parse_students(text, mode, &classes()).unwrap();

        assert_eq!(students.len(), 3);
        assert_eq!(students[0].name, "Marco");
        assert_eq!(students[0].priorities, ids(&[5, 1]));
        assert!(!students[0].is_morning_only);
        assert_eq!(students[0].class_name, "5. Klasse");
        assert!(students[1].is_morning_only);
        assert!(students[1].priorities.is_empty());
        assert_eq!(students[2].name, "Tom");
    }

    #[test]
    fn single_class_needs_existing_class() {
        let mode = ImportMode::SingleClass(ClassLetter('Q'));
        assert_eq!(
            parse_students("Anna,1", mode, &classes()),
            Err(ImportError::UnknownClass(ClassLetter('Q')))
        );
    }

    #[test]
    fn bulk_lines() {
        let text = "Marco, a, 5, 2, 1\nAnna, Z, 5, 3, 1, X\nShort, A\n, A, 1, 2";
        let students = parse_students(text, ImportMode::Bulk, &classes()).unwrap();

        assert_eq!(students.len(), 2);
        assert_eq!(students[0].class_letter, ClassLetter('A'));
        assert_eq!(students[0].class_name, "4. Klasse");
        assert_eq!(students[0].priorities, ids(&[5, 2, 1]));
        assert_eq!(students[1].class_letter, ClassLetter('Z'));
        assert_eq!(students[1].class_name, "Z (unknown)");
        assert!(students[1].is_morning_only);
    }

    #[test]
    fn multi_character_class_tokens_get_placeholder_class() {
        let text = "Marco, AB, 5\nLena, 10, 2\nTom, , 3";
        let students = parse_students(text, ImportMode::Bulk, &classes()).unwrap();

        assert_eq!(students.len(), 3);
        for student in &students {
            assert_eq!(student.class_letter, ClassLetter::PLACEHOLDER);
        }
        assert_eq!(students[0].class_name, "AB (unknown)");
        assert_eq!(students[1].class_name, "10 (unknown)");
        assert_eq!(students[2].class_name, "? (unknown)");
        assert_eq!(students[0].priorities, ids(&[5]));
    }

    #[test]
    fn marker_only_counts_at_the_end() {
        let students = parse_students("Ben, A, X, 3", ImportMode::Bulk, &classes()).unwrap();
        assert_eq!(students[0].priorities, ids(&[3]));
        assert!(!students[0].is_morning_only);
    }

    #[test]
    fn empty_batch_appends_nothing() {
        let mut roster = Roster::new();
        roster.add_class("4. Klasse").unwrap();

        assert_eq!(
            import_into(&mut roster, "\n, A, 1\nonly-two, A", ImportMode::Bulk),
            Err(ImportError::NoValidStudents)
        );
        assert!(roster.students().is_empty());

        let added = import_into(
            &mut roster,
            "Anna, 1, 2\nBen, 2",
            ImportMode::SingleClass(ClassLetter('A')),
        )
        .unwrap();
        assert_eq!(added.len(), 2);
        assert_eq!(roster.students().len(), 2);
        assert!(roster.students().iter().all(|s| !s.is_locked));
    }
}
