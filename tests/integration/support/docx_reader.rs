use anyhow::{Context, Result};
use std::io::{Cursor, Read};
use zip::ZipArchive;

/// Reads one part of a DOCX package back as text.
pub fn read_part(bytes: &[u8], name: &str) -> Result<String> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).context("export is not a zip package")?;
    let mut part = archive
        .by_name(name)
        .with_context(|| format!("missing part {name}"))?;
    let mut contents = String::new();
    part.read_to_string(&mut contents)?;
    Ok(contents)
}
