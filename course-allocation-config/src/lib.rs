use core::fmt::{self, Debug};
use std::path::PathBuf;

use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::Deserialize;

pub const CONFIG_FILE: &str = "course-allocation.toml";
pub const ENV_PREFIX: &str = "COURSE_ALLOCATION_";
/// Upper bound operators may choose for the per-student target.
pub const MAX_ASSIGNMENTS_PER_STUDENT: usize = 5;

#[derive(Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Where the roster is kept between invocations.
    pub roster_path: PathBuf,
    pub assignments_per_student: usize,
    /// Passwords accepted by the access gate. Empty means nobody gets in.
    pub access_secrets: Vec<String>,
    /// Used when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            roster_path: PathBuf::from("roster.json"),
            assignments_per_student: 1,
            access_secrets: Vec::new(),
            log_filter: "info".to_owned(),
        }
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("roster_path", &self.roster_path)
            .field("assignments_per_student", &self.assignments_per_student)
            .field(
                "access_secrets",
                &format_args!("[{} redacted]", self.access_secrets.len()),
            )
            .field("log_filter", &self.log_filter)
            .finish()
    }
}

impl Config {
    pub fn validate(self) -> Result<Self, ConfigError> {
        if !(1..=MAX_ASSIGNMENTS_PER_STUDENT).contains(&self.assignments_per_student) {
            return Err(ConfigError::AssignmentsOutOfRange(self.assignments_per_student));
        }
        Ok(self)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("config error: {0}")]
    Extract(#[from] Box<figment::Error>),
    #[error("assignments_per_student must be between 1 and 5, got {0}")]
    AssignmentsOutOfRange(usize),
}

#[must_use]
pub fn figment() -> Figment {
    Figment::new()
        .merge(Toml::file(CONFIG_FILE))
        .merge(Env::prefixed(ENV_PREFIX))
}

pub fn get_config() -> Result<Config, ConfigError> {
    let config: Config = figment().extract().map_err(Box::new)?;
    config.validate()
}
