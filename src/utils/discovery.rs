use crate::error::{ProcessingError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// List the regular files in `dir` with the given extension, sorted by file name
pub fn discover_input_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let metadata = fs::metadata(dir).map_err(|e| ProcessingError::InputNotFound {
        path: dir.to_path_buf(),
        reason: e.to_string(),
    })?;

    if !metadata.is_dir() {
        return Err(ProcessingError::InputNotFound {
            path: dir.to_path_buf(),
            reason: "not a directory".to_string(),
        });
    }

    let entries = fs::read_dir(dir).map_err(|e| ProcessingError::InputNotFound {
        path: dir.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| ProcessingError::file_io(dir, e))?.path();

        if path.is_file() && path.extension().is_some_and(|ext| ext == extension) {
            files.push(path);
        }
    }

    // Sort by filename for consistent processing order
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(files)
}
