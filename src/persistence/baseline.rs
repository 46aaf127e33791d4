use crate::error::BaselineError;
use crate::models::Snapshot;
use std::path::Path;

/// Replace the baseline with `snapshot`. Written to a sibling temp file
/// first so a crash never leaves a half-written baseline behind.
pub fn save_baseline(path: &Path, snapshot: &Snapshot) -> Result<(), BaselineError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let tmp_path = path.with_extension("json.tmp");
    let data = serde_json::to_vec(snapshot)?;
    std::fs::write(&tmp_path, &data)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Read the baseline. A missing or undecodable file yields `Ok(None)`;
/// only I/O failures on an existing file are errors.
pub fn load_baseline(path: &Path) -> Result<Option<Snapshot>, BaselineError> {
    if !path.exists() {
        return Ok(None);
    }
    let data = std::fs::read(path)?;
    match serde_json::from_slice::<Snapshot>(&data) {
        Ok(snapshot) => Ok(Some(snapshot)),
        Err(e) => {
            tracing::error!(path = %path.display(), "Failed to decode baseline: {}", e);
            Ok(None)
        }
    }
}
