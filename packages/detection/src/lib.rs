#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Detection event synthesis and aggregation.
//!
//! The [`synthesizer`] fabricates believable detection batches for demo
//! mode when no inference backend is reachable. The [`aggregator`] turns a
//! batch of detection events, synthesized or real, into an
//! [`AnalysisSummary`](shopguard_detection_models::AnalysisSummary):
//! average confidence, threat level, and time-range clustering into
//! incidents. Everything here is pure and synchronous. Randomness is
//! injected through [`random::RandomSource`] so output is reproducible
//! under a seeded or scripted source.

pub mod aggregator;
pub mod export;
pub mod frame;
pub mod normalize;
pub mod random;
pub mod synthesizer;

use thiserror::Error;

/// Errors raised when a detection batch cannot be summarized.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AggregationError {
    /// An event timestamp was NaN, infinite, or negative.
    #[error("detection {index}: timestamp {value} is not a finite, non-negative number")]
    InvalidTimestamp {
        /// Position of the event in the input batch.
        index: usize,
        /// The offending value.
        value: f64,
    },

    /// An event confidence was NaN, infinite, or outside `[0, 100]`.
    #[error("detection {index}: confidence {value} is outside [0, 100]")]
    InvalidConfidence {
        /// Position of the event in the input batch.
        index: usize,
        /// The offending value.
        value: f64,
    },

    /// More frames were reported processed than exist.
    #[error("processed frames ({processed}) exceed total frames ({total})")]
    FrameCountMismatch {
        /// Reported processed frames.
        processed: u64,
        /// Reported total frames.
        total: u64,
    },

    /// Processing time was NaN, infinite, or negative.
    #[error("processing time {value} is not a finite, non-negative number")]
    InvalidProcessingTime {
        /// The offending value.
        value: f64,
    },
}

/// Errors from exporting or importing analysis results.
#[derive(Debug, Error)]
pub enum ExportError {
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The imported summary failed validation.
    #[error("Invalid summary: {0}")]
    Invalid(#[from] AggregationError),

    /// Reading or writing the export file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
