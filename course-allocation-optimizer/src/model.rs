// these are owned by the roster store; the engine only ever replaces `assigned_activity_ids`

use core::fmt::{self, Display};
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RosterError;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[derive(Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = core::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map(Self)
            }
        }
    };
}

id_newtype!(StudentId);
id_newtype!(ActivityId);
id_newtype!(ClassId);
id_newtype!(PublicId);

/// Single character that ties a student to a [`ClassGroup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassLetter(pub char);

impl ClassLetter {
    /// Used when no real letter is available.
    pub const PLACEHOLDER: Self = Self('?');

    /// Upper-cased letter of a one character token. Longer or empty tokens name no letter.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        let mut chars = token.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(single), None) => single.to_uppercase().next().map(Self),
            _ => None,
        }
    }
}

impl Display for ClassLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TimeSlot {
    #[serde(rename = "G")]
    FullDay,
    #[serde(rename = "V")]
    MorningOnly,
    #[serde(rename = "N")]
    AfternoonOnly,
}

impl TimeSlot {
    pub const ALL: [Self; 3] = [Self::FullDay, Self::MorningOnly, Self::AfternoonOnly];

    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Self::FullDay => 'G',
            Self::MorningOnly => 'V',
            Self::AfternoonOnly => 'N',
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::FullDay => "Full day",
            Self::MorningOnly => "Morning",
            Self::AfternoonOnly => "Afternoon",
        }
    }
}

impl Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TimeSlot {
    type Err = RosterError;

    /// Accepts the single letter codes as well as the english names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "g" | "full-day" | "fullday" | "full day" => Ok(Self::FullDay),
            "v" | "morning" | "morning-only" => Ok(Self::MorningOnly),
            "n" | "afternoon" | "afternoon-only" => Ok(Self::AfternoonOnly),
            _ => Err(RosterError::UnknownTimeSlot(s.to_owned())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassGroup {
    pub id: ClassId,
    pub name: String,
    pub letter: ClassLetter,
}

/// One concrete, independently capacitated offering.
///
/// Several instances may share a [`PublicId`]; they are alternatives of the same course at
/// different times of day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    pub public_id: PublicId,
    pub name: String,
    pub leader: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub max_participants: usize,
    pub time_slot: TimeSlot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub class_letter: ClassLetter,
    pub class_name: String,
    /// Most preferred first. Later duplicates have no effect.
    pub priorities: Vec<PublicId>,
    pub assigned_activity_ids: Vec<ActivityId>,
    #[serde(default)]
    pub is_morning_only: bool,
    #[serde(default)]
    pub is_locked: bool,
}

impl Student {
    #[must_use]
    pub fn holds(&self, activity_id: ActivityId) -> bool {
        self.assigned_activity_ids.contains(&activity_id)
    }

    #[must_use]
    pub fn held_count(&self) -> usize {
        self.assigned_activity_ids.len()
    }
}

/// A student record before the roster has given it an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    pub name: String,
    pub class_letter: ClassLetter,
    pub class_name: String,
    pub priorities: Vec<PublicId>,
    pub is_morning_only: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewActivity {
    pub name: String,
    pub leader: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub max_participants: usize,
    pub time_slot: TimeSlot,
}
