use course_allocation_config::ConfigError;
use course_allocation_import::ImportError;
use course_allocation_optimizer::{AllocationError, OverrideError, RosterError};

use crate::gate::AccessError;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("IO error: {0}")]
    File(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Access(#[from] AccessError),
    #[error("allocation not started: {0}")]
    Allocation(#[from] AllocationError),
    #[error("manual change rejected: {0}")]
    Override(#[from] OverrideError),
    #[error("{0}")]
    Roster(#[from] RosterError),
    #[error("import failed: {0}")]
    Import(#[from] ImportError),
}
