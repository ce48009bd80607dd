//! Shared-secret check in front of every command. There are no roles, whoever knows one of the
//! configured secrets may do everything.

use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[error("no access secret configured, set access_secrets in the config file")]
    NotConfigured,
    #[error("wrong password, access denied")]
    Denied,
}

pub struct AccessGate {
    secrets: Vec<String>,
}

impl AccessGate {
    #[must_use]
    pub const fn new(secrets: Vec<String>) -> Self {
        Self { secrets }
    }

    pub fn verify(&self, candidate: &str) -> Result<(), AccessError> {
        if self.secrets.is_empty() {
            return Err(AccessError::NotConfigured);
        }
        if self.secrets.iter().any(|secret| secret == candidate) {
            Ok(())
        } else {
            warn!("rejected access attempt");
            Err(AccessError::Denied)
        }
    }
}
