use crate::models::resume::{ResumeRecord, COLUMNS};

pub const CSV_FILE_NAME: &str = "resume_analysis.csv";
pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// Serializes records to UTF-8 CSV: a header row of `COLUMNS`, then one row per record.
pub fn render_csv(records: &[ResumeRecord]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(COLUMNS)?;
    for record in records {
        writer.write_record(record.to_row())?;
    }
    writer.flush()?;
    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}
