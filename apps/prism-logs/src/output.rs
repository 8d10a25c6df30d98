//! # Output Sink
//!
//! Writes a [`ResultSet`] to disk as an indented JSON array.

use prism_logs_core::{PrismError, ResultSet};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Indentation of the output file.
const INDENT: &[u8] = b"    ";

/// Validate the output path.
///
/// The parent directory must exist and be a directory. Returns the path with
/// a canonical parent and the original file name.
pub fn validate_output_path(path: &Path) -> Result<PathBuf, PrismError> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    let canonical_parent = parent.canonicalize().map_err(|e| {
        PrismError::IoError(format!(
            "Invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    if !canonical_parent.is_dir() {
        return Err(PrismError::IoError(format!(
            "Output directory '{}' is not a valid directory",
            parent.display()
        )));
    }

    let filename = path
        .file_name()
        .ok_or_else(|| PrismError::IoError("Output path has no filename".to_string()))?;

    Ok(canonical_parent.join(filename))
}

/// Render `results` as a JSON array indented with four spaces.
pub fn render(results: &ResultSet) -> Result<Vec<u8>, PrismError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    results
        .serialize(&mut serializer)
        .map_err(|e| PrismError::SerializationError(e.to_string()))?;
    Ok(buf)
}

/// Write `results` to `path`, returning the number of bytes written.
pub fn write_result_set(path: &Path, results: &ResultSet) -> Result<usize, PrismError> {
    let validated = validate_output_path(path)?;
    let data = render(results)?;

    std::fs::write(&validated, &data)
        .map_err(|e| PrismError::IoError(format!("Write {}: {}", validated.display(), e)))?;

    tracing::info!(
        path = %validated.display(),
        records = results.len(),
        bytes = data.len(),
        "Wrote output file"
    );
    Ok(data.len())
}
