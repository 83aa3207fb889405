//! One upload-to-results cycle: expand the archive into a fresh working
//! directory, run the batch, drop the directory.

use bytes::Bytes;
use tempfile::TempDir;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::analysis::batch::{process_resumes, BatchOutcome};
use crate::errors::AppError;
use crate::extraction::extractor::FieldExtractor;
use crate::ingest::archive::extract_zip;

/// Runs the full pipeline over an uploaded ZIP.
///
/// An invalid archive aborts the whole request. Per-file failures are
/// reported in the returned outcome instead.
pub async fn analyze_archive(
    archive: Bytes,
    extractor: &dyn FieldExtractor,
) -> Result<(Uuid, BatchOutcome), AppError> {
    let batch_id = Uuid::new_v4();
    let span = info_span!("batch", %batch_id);

    async move {
        let workdir = TempDir::new().map_err(|e| AppError::Internal(e.into()))?;
        let dest = workdir.path().to_path_buf();

        info!("Expanding {} byte archive", archive.len());
        let written = tokio::task::spawn_blocking(move || extract_zip(&archive, &dest))
            .await
            .map_err(|e| AppError::Internal(e.into()))??;
        info!("Archive expanded: {written} files");

        let outcome = process_resumes(workdir.path(), extractor).await;
        Ok::<_, AppError>((batch_id, outcome))
    }
    .instrument(span)
    .await
}
