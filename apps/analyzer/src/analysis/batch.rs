//! Batch Orchestrator — runs every supported file in a working directory through
//! the reader and the field extractor, one file at a time.
//!
//! Per-file read or extraction failures are captured as `FileFailure`s and the
//! batch continues; only successfully extracted resumes become records.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::extraction::extractor::FieldExtractor;
use crate::ingest::reader::{read_document, DocumentKind, ReadError};
use crate::models::resume::ResumeRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    Read,
    Extraction,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureStage::Read => write!(f, "read"),
            FailureStage::Extraction => write!(f, "extraction"),
        }
    }
}

/// A supported file that produced no record.
#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    pub file_name: String,
    pub stage: FailureStage,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchOutcome {
    pub records: Vec<ResumeRecord>,
    pub failures: Vec<FileFailure>,
    /// Files present in the archive with an unsupported extension.
    pub skipped: usize,
}

impl BatchOutcome {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Processes every `.pdf` / `.docx` under `dir`, sorted by path.
pub async fn process_resumes(dir: &Path, extractor: &dyn FieldExtractor) -> BatchOutcome {
    let (candidates, skipped) = collect_candidates(dir);
    let mut outcome = BatchOutcome {
        skipped,
        ..Default::default()
    };

    for path in candidates {
        let file_name = display_name(dir, &path);

        let text = match read_blocking(path).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Skipping {file_name}: {e}");
                outcome.failures.push(FileFailure {
                    file_name,
                    stage: FailureStage::Read,
                    message: e.to_string(),
                });
                continue;
            }
        };

        match extractor.extract(&text).await {
            Ok(record) => outcome.records.push(record),
            Err(e) => {
                warn!("Extraction failed for {file_name}: {e}");
                outcome.failures.push(FileFailure {
                    file_name,
                    stage: FailureStage::Extraction,
                    message: e.to_string(),
                });
            }
        }
    }

    info!(
        "Batch complete: {} extracted, {} failed, {} skipped",
        outcome.records.len(),
        outcome.failures.len(),
        outcome.skipped
    );
    outcome
}

/// Splits the files under `dir` into supported documents and a count of the rest.
fn collect_candidates(dir: &Path) -> (Vec<PathBuf>, usize) {
    let mut candidates = Vec::new();
    let mut skipped = 0;

    let walker = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_archive_metadata(e));
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Cannot list working directory entry: {e}");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if DocumentKind::from_path(entry.path()).is_some() {
            candidates.push(entry.into_path());
        } else {
            skipped += 1;
        }
    }

    (candidates, skipped)
}

/// macOS Finder adds a `__MACOSX/` tree and `._name` AppleDouble files to
/// every archive; neither is a user file.
fn is_archive_metadata(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || (entry.file_type().is_dir() && name == "__MACOSX")
}

async fn read_blocking(path: PathBuf) -> Result<String, ReadError> {
    tokio::task::spawn_blocking(move || read_document(&path))
        .await
        .map_err(|e| ReadError::Io(std::io::Error::other(e)))?
}

fn display_name(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned()
}
