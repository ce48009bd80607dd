use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use course_allocation_optimizer::{ActivityId, ClassId, StudentId, TimeSlot};

#[derive(Parser, Debug)]
#[command(name = "course-allocation", version, about)]
pub struct Cli {
    /// Shared access secret.
    #[arg(
        long,
        global = true,
        env = "COURSE_ALLOCATION_SECRET",
        hide_env_values = true,
        default_value = ""
    )]
    pub secret: String,

    /// Use this roster file instead of the configured one.
    #[arg(long, global = true)]
    pub roster: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create a class, it gets the next free letter.
    AddClass {
        name: String,
    },
    RemoveClass {
        id: ClassId,
    },
    /// Add a course instance. Reusing name and leader of an existing course keeps its number.
    AddActivity {
        #[arg(long)]
        name: String,
        #[arg(long)]
        leader: String,
        #[arg(long)]
        max: usize,
        /// G (full day), V (morning) or N (afternoon).
        #[arg(long, default_value = "G")]
        slot: TimeSlot,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a course instance and strip it from every student.
    DeleteActivity {
        id: ActivityId,
    },
    /// Append students from a file or stdin.
    Import {
        /// Every line belongs to this class. Without it lines carry their own letter.
        #[arg(long)]
        class: Option<char>,
        file: Option<PathBuf>,
    },
    ClearStudents,
    /// Toggle the lock of a student.
    Lock {
        student: StudentId,
    },
    /// Run the automatic allocation.
    Allocate {
        /// Class letters taking part, all classes when omitted.
        #[arg(long, value_delimiter = ',')]
        classes: Vec<char>,
        /// Overrides the configured number of courses per student.
        #[arg(long)]
        assignments: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Put a student into a course instance regardless of capacity.
    Assign {
        student: StudentId,
        activity: ActivityId,
    },
    Unassign {
        student: StudentId,
        activity: ActivityId,
    },
    /// Remove every assignment of a student.
    Clear {
        student: StudentId,
    },
    Stats,
    List,
    Export {
        #[arg(value_enum)]
        kind: ExportKind,
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

impl Command {
    /// Whether the roster has to be written back afterwards.
    pub const fn mutates(&self) -> bool {
        !matches!(self, Self::Stats | Self::List | Self::Export { .. })
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    /// Participants per course and the students still missing courses.
    Rosters,
    /// Class letters and the course catalogue.
    Overview,
}
