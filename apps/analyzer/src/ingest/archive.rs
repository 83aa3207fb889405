//! Archive Extractor: expands an uploaded ZIP into a working directory.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("not a valid ZIP archive: {0}")]
    InvalidZip(#[from] zip::result::ZipError),

    #[error("I/O error while expanding archive: {0}")]
    Io(#[from] io::Error),
}

/// Writes `bytes` to a scratch file, then expands every entry into `dest`.
///
/// Entries whose paths would escape `dest` are skipped. Returns the number of
/// files written.
pub fn extract_zip(bytes: &[u8], dest: &Path) -> Result<usize, ArchiveError> {
    let mut scratch = NamedTempFile::new()?;
    scratch.write_all(bytes)?;
    scratch.flush()?;

    let mut archive = zip::ZipArchive::new(scratch.reopen()?)?;
    let mut written = 0;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;

        let Some(relative) = entry.enclosed_name() else {
            warn!("Skipping archive entry with unsafe path: {}", entry.name());
            continue;
        };
        let out_path = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path)?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = fs::File::create(&out_path)?;
        io::copy(&mut entry, &mut out)?;
        written += 1;
    }

    debug!("Expanded {written} files into {}", dest.display());
    Ok(written)
}
