// claimsguard-core/src/infrastructure/fs.rs

use crate::infrastructure::error::InfrastructureError;
use std::io::Write;
use std::path::Path;
use tempfile::TempPath;

fn parent_dir(path: &Path) -> Result<&Path, InfrastructureError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;
    Ok(parent)
}

/// Writes `content` to `path` through a temporary file in the same directory, so
/// readers see either the old file or the complete new one.
pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(
    path: P,
    content: C,
) -> Result<(), InfrastructureError> {
    let path = path.as_ref();
    let mut temp_file = tempfile::NamedTempFile::new_in(parent_dir(path)?)?;
    temp_file.write_all(content.as_ref())?;
    temp_file
        .persist(path)
        .map_err(|e| InfrastructureError::Io(e.error))?;
    Ok(())
}

/// Reserves a temporary path next to `path` for writers that need a file name
/// rather than a handle (e.g. DuckDB `COPY ... TO`). Dropped paths are removed.
pub fn staging_path(path: &Path, suffix: &str) -> Result<TempPath, InfrastructureError> {
    let file = tempfile::Builder::new()
        .prefix(".claimsguard-")
        .suffix(suffix)
        .tempfile_in(parent_dir(path)?)?;
    Ok(file.into_temp_path())
}

/// Moves a staged file over `path`.
pub fn commit_staged(staged: TempPath, path: &Path) -> Result<(), InfrastructureError> {
    staged
        .persist(path)
        .map_err(|e| InfrastructureError::Io(e.error))
}
