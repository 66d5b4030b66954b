//! Atomic output files.
//!
//! Output is written to a temporary file in the destination directory and
//! renamed over the target only once everything has been written, so the
//! target path never holds a truncated file.

use log::debug;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::Builder;

use crate::error::Result;

const TEMP_PREFIX: &str = ".steg-";

/// Runs `write` against a temporary file next to `path`, then moves it into
/// place. On any error the temporary file is removed and `path` is untouched.
pub fn write_atomic<P, F>(path: P, write: F) -> Result<()>
where
    P: AsRef<Path>,
    F: FnOnce(&mut BufWriter<&mut File>) -> Result<()>,
{
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = Builder::new().prefix(TEMP_PREFIX).tempfile_in(dir)?;
    debug!("staging {} in {}", path.display(), temp.path().display());

    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        write(&mut writer)?;
        writer.flush()?;
    }
    temp.as_file().sync_all()?;

    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
