//! JSON persistence for [`MemoryDesign`].

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::{DbError, MemoryDesign};

/// Reads a design from a JSON file.
///
/// # Errors
///
/// [`DbError::Io`] if the file cannot be read, [`DbError::Json`] if it is not
/// a valid design.
pub fn load_design(path: impl AsRef<Path>) -> Result<MemoryDesign, DbError> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let design: MemoryDesign = serde_json::from_reader(reader)?;
    tracing::debug!("Loaded design '{}' from {}", design.name(), path.display());
    Ok(design)
}

/// Writes a design to a JSON file, replacing its contents.
///
/// # Errors
///
/// [`DbError::Io`] or [`DbError::Json`] if writing fails.
pub fn save_design(design: &MemoryDesign, path: impl AsRef<Path>) -> Result<(), DbError> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, design)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    tracing::debug!("Saved design '{}' to {}", design.name(), path.display());
    Ok(())
}

/// Parses a design from JSON text.
///
/// # Errors
///
/// [`DbError::Json`] if the text is not a valid design.
pub fn design_from_str(text: &str) -> Result<MemoryDesign, DbError> {
    Ok(serde_json::from_str(text)?)
}
