//! JSON export and import of analysis results.
//!
//! Imported summaries are re-validated so a hand-edited file with
//! impossible values is rejected rather than rendered.

use std::path::Path;

use shopguard_detection_models::AnalysisSummary;

use crate::ExportError;
use crate::aggregator::{RunMetrics, validate_events, validate_metrics};

/// Serializes a summary as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`ExportError::Json`] if serialization fails.
pub fn export_summary(summary: &AnalysisSummary) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(summary)?)
}

/// Parses and validates a summary previously produced by [`export_summary`].
///
/// # Errors
///
/// Returns [`ExportError::Json`] for malformed JSON and
/// [`ExportError::Invalid`] when the contents fail validation.
pub fn import_summary(json: &str) -> Result<AnalysisSummary, ExportError> {
    let summary: AnalysisSummary = serde_json::from_str(json)?;

    validate_metrics(RunMetrics {
        total_frames: summary.total_frames,
        processed_frames: summary.processed_frames,
        processing_time: summary.processing_time,
    })?;
    validate_events(&summary.detections)?;

    Ok(summary)
}

/// Writes a summary to `path`.
///
/// # Errors
///
/// Returns [`ExportError`] if serialization or the write fails.
pub fn write_summary(path: &Path, summary: &AnalysisSummary) -> Result<(), ExportError> {
    std::fs::write(path, export_summary(summary)?)?;
    log::info!("Exported analysis to {}", path.display());
    Ok(())
}

/// Reads and validates a summary from `path`.
///
/// # Errors
///
/// Returns [`ExportError`] if the read, parse, or validation fails.
pub fn read_summary(path: &Path) -> Result<AnalysisSummary, ExportError> {
    import_summary(&std::fs::read_to_string(path)?)
}
