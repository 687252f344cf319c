use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("could not write response to {path}: {source}")]
pub struct StorageError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Writes the decoded response, headers included, overwriting `path`.
pub fn persist_response(path: &Path, response: &str) -> Result<(), StorageError> {
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
        && !dir.exists()
    {
        fs::create_dir_all(dir).map_err(|source| StorageError {
            path: path.to_path_buf(),
            source,
        })?;
    }

    fs::write(path, response).map_err(|source| StorageError {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("saved {} bytes to {}", response.len(), path.display());
    Ok(())
}
