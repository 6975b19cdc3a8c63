//! Reshapes analysis payloads from the inference backend.
//!
//! The backend reports detections with either camelCase or snake_case
//! keys, sometimes wrapped in a `results` object, and computes its own
//! (inconsistent) threat level. Only the raw detections and run metrics
//! are trusted; everything derived is recomputed by the aggregator.

use serde::Deserialize;
use shopguard_detection_models::{AnalysisSummary, DetectionEvent};

use crate::AggregationError;
use crate::aggregator::{self, RunMetrics};

/// Raw analysis fields accepted from the backend.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAnalysis {
    /// Frames in the uploaded media.
    #[serde(default, alias = "total_frames")]
    pub total_frames: u64,
    /// Frames examined. Defaults to `total_frames` when absent.
    #[serde(default, alias = "processed_frames")]
    pub processed_frames: Option<u64>,
    /// Seconds spent processing.
    #[serde(default, alias = "processing_time")]
    pub processing_time: f64,
    /// Raw detection events.
    #[serde(default)]
    pub detections: Vec<DetectionEvent>,
}

impl RawAnalysis {
    /// Extracts the analysis from a backend response body, unwrapping a
    /// top-level `results` object when present.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if the payload does not match the
    /// expected shape.
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        match value {
            serde_json::Value::Object(mut map) if map.contains_key("results") => {
                serde_json::from_value(map.remove("results").unwrap_or_default())
            }
            other => serde_json::from_value(other),
        }
    }

    /// Run metrics for this payload.
    #[must_use]
    pub fn metrics(&self) -> RunMetrics {
        RunMetrics {
            total_frames: self.total_frames,
            processed_frames: self.processed_frames.unwrap_or(self.total_frames),
            processing_time: self.processing_time,
        }
    }
}

/// Re-aggregates a backend analysis into the dashboard's summary model.
///
/// # Errors
///
/// Returns [`AggregationError`] if the backend sent malformed detections
/// or inconsistent frame counts.
pub fn normalize(raw: RawAnalysis) -> Result<AnalysisSummary, AggregationError> {
    let metrics = raw.metrics();
    aggregator::aggregate(raw.detections, metrics)
}
