use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::ops::expansion::ExpansionState;

/// Default name of the persisted expansion state inside a project directory
pub const STATE_FILE: &str = ".tasktree-state.json";

/// Read the persisted expansion state.
///
/// Returns `None` when the file does not exist. A file that cannot be read
/// or parsed is treated as empty: the user only loses expand/collapse
/// choices, so it is logged and otherwise ignored.
pub fn read_expansion_state(path: &Path) -> Option<ExpansionState> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "could not read expansion state");
            return None;
        }
    };
    match serde_json::from_str(&content) {
        Ok(state) => Some(state),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring malformed expansion state");
            None
        }
    }
}

/// Read the state, falling back to an empty one
pub fn load_expansion_state(path: &Path) -> ExpansionState {
    read_expansion_state(path).unwrap_or_default()
}

/// Write the expansion state atomically (temp file + rename)
pub fn write_expansion_state(path: &Path, state: &ExpansionState) -> io::Result<()> {
    let content = serde_json::to_string_pretty(state)?;
    atomic_write(path, content.as_bytes())
}

/// Delete the persisted state. Missing files are fine.
pub fn remove_expansion_state(path: &Path) -> io::Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
