//! Source document reading

use reqforge_core::{Error, Result};
use std::path::Path;

/// Read a plain-text requirements document, dropping blank lines.
///
/// Binary formats are out of scope; export the document to text or
/// markdown first.
pub fn read_document(path: &Path) -> Result<String> {
    let raw = std::fs::read_to_string(path)?;
    let text = raw
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    if text.is_empty() {
        return Err(Error::InvalidData(format!(
            "Document is empty: {}",
            path.display()
        )));
    }

    Ok(text)
}
