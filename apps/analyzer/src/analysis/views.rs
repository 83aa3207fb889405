//! HTML pages for the upload form and the results table.

use askama::Template;

use crate::analysis::batch::{BatchOutcome, FileFailure};
use crate::analysis::export::CSV_FILE_NAME;
use crate::models::resume::COLUMNS;

pub const NO_VALID_RESUMES: &str = "No valid resumes found in the ZIP file.";

#[derive(Template)]
#[template(path = "upload.html")]
pub struct UploadPage<'a> {
    pub error: Option<&'a str>,
}

#[derive(Template)]
#[template(path = "results.html")]
pub struct ResultsPage<'a> {
    pub columns: &'a [&'a str],
    pub rows: Vec<Vec<String>>,
    pub failures: &'a [FileFailure],
    pub skipped: usize,
    /// CSV payload for the download button; `None` when there is nothing to download.
    pub csv: Option<String>,
    pub csv_file_name: &'a str,
    pub warning: &'a str,
}

impl<'a> ResultsPage<'a> {
    pub fn new(outcome: &'a BatchOutcome, csv: Option<String>) -> Self {
        Self {
            columns: &COLUMNS,
            rows: outcome.records.iter().map(|r| r.to_row()).collect(),
            failures: &outcome.failures,
            skipped: outcome.skipped,
            csv: csv.filter(|_| !outcome.is_empty()),
            csv_file_name: CSV_FILE_NAME,
            warning: NO_VALID_RESUMES,
        }
    }
}
