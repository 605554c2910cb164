#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

use std::{
    io::{self, Write},
    path::Path,
};

use tempfile::NamedTempFile;

pub mod artifacts;
pub mod dataset;
pub mod store;

/// Replaces the file at `path` with `bytes` without ever exposing a partially written file.
fn write_atomically(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|err| err.error)?;
    Ok(())
}
