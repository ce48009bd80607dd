use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use course_allocation_optimizer::Roster;
use tracing::debug;

use crate::error::AppError;

/// Reads the roster, starting empty when the file does not exist yet.
pub fn load(path: &Path) -> Result<Roster, AppError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(serde_json::from_str(&text)?),
        Err(error) if error.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "no roster yet, starting empty");
            Ok(Roster::new())
        }
        Err(error) => Err(error.into()),
    }
}

/// Writes next to the target first so a crash never leaves a half written roster.
pub fn save(path: &Path, roster: &Roster) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(roster)?;
    let temporary = path.with_extension("json.tmp");
    fs::write(&temporary, json)?;
    fs::rename(&temporary, path)?;
    debug!(path = %path.display(), "saved roster");
    Ok(())
}
