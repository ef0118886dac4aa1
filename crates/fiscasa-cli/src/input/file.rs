use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

/// Read a JSON file and deserialise into a typed struct.
pub fn read_json<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let contents = read_text(path)?;
    let value: T = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", path, e))?;
    Ok(value)
}

/// Read a file that must exist.
pub fn read_text(path: &str) -> Result<String, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    if !canonical.is_file() {
        return Err(format!("File not found: {}", canonical.display()).into());
    }
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;
    Ok(contents)
}

/// Read a file that may not exist yet, such as a ledger before the first
/// payment is recorded. A missing file reads as empty.
pub fn read_text_or_empty(path: &str) -> Result<String, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    if !canonical.exists() {
        tracing::debug!(path = %canonical.display(), "file absent, starting empty");
        return Ok(String::new());
    }
    read_text(path)
}

/// Replace a file's contents, creating it if needed.
pub fn write_text(path: &str, contents: &str) -> Result<(), Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    if canonical.is_dir() {
        return Err(format!("Not a file: {}", canonical.display()).into());
    }
    fs::write(&canonical, contents)
        .map_err(|e| format!("Failed to write '{}': {}", canonical.display(), e))?;
    tracing::info!(path = %canonical.display(), "file saved");
    Ok(())
}

fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    if p.is_absolute() {
        Ok(p.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(p))
    }
}
