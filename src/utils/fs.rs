//! File system utilities.

use std::fs;
use std::path::{Component, Path};

use crate::error::Result;

/// Save data to a JSON file with pretty printing
pub fn save_json<T: serde::Serialize>(path: &Path, data: &T) -> Result<()> {
    ensure_parent(path)?;
    let json = serde_json::to_string_pretty(data)?;
    fs::write(path, json)?;
    Ok(())
}

/// Load a JSON document from a file
pub fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Write text, creating the parent directory first
pub fn write_text(path: &Path, content: &str) -> Result<()> {
    ensure_parent(path)?;
    fs::write(path, content)?;
    Ok(())
}

/// Ensure a directory exists
pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)?;
    Ok(())
}

/// `to` as a `/`-separated path relative to the directory `from`.
///
/// `None` when only one of the two paths is absolute.
pub fn relative_path(from: &Path, to: &Path) -> Option<String> {
    if from.is_absolute() != to.is_absolute() {
        return None;
    }
    let from: Vec<Component<'_>> = from
        .components()
        .filter(|c| *c != Component::CurDir)
        .collect();
    let to: Vec<Component<'_>> = to
        .components()
        .filter(|c| *c != Component::CurDir)
        .collect();
    let shared = from.iter().zip(&to).take_while(|(a, b)| a == b).count();

    let parts: Vec<String> = std::iter::repeat_n("..".to_string(), from.len() - shared)
        .chain(
            to[shared..]
                .iter()
                .map(|c| c.as_os_str().to_string_lossy().into_owned()),
        )
        .collect();
    Some(parts.join("/"))
}

fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir(parent),
        _ => Ok(()),
    }
}
