//! Turns a batch of detection events into an [`AnalysisSummary`].
//!
//! The pipeline is validate, sort, average, classify, count, cluster.
//! Clustering is a single left-to-right pass over the detected events
//! sorted by timestamp, so the output does not depend on arrival order.

use shopguard_detection_models::{
    AnalysisSummary, DetectionEvent, Incident, SummaryStats, ThreatLevel,
};

use crate::AggregationError;

/// A gap strictly larger than this (seconds) between consecutive detections
/// starts a new incident.
pub const INCIDENT_GAP_SECS: f64 = 30.0;

/// Seconds an incident extends past its latest detection.
pub const INCIDENT_TAIL_SECS: f64 = 10.0;

/// Values strictly above this classify as [`ThreatLevel::High`].
pub const HIGH_THREAT_THRESHOLD: f64 = 85.0;

/// Values strictly above this (and not high) classify as
/// [`ThreatLevel::Medium`].
pub const MEDIUM_THREAT_THRESHOLD: f64 = 70.0;

/// Detections with confidence strictly above this count as high confidence.
pub const HIGH_CONFIDENCE_THRESHOLD: f64 = 80.0;

/// Caller-supplied values passed through to the summary untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunMetrics {
    /// Frames in the source media.
    pub total_frames: u64,
    /// Frames actually examined.
    pub processed_frames: u64,
    /// Processing time in seconds.
    pub processing_time: f64,
}

/// Classifies a confidence value into a threat band.
///
/// Boundaries belong to the lower band: 85 is `Medium` and 70 is `Low`.
#[must_use]
pub fn classify(value: f64) -> ThreatLevel {
    if value > HIGH_THREAT_THRESHOLD {
        ThreatLevel::High
    } else if value > MEDIUM_THREAT_THRESHOLD {
        ThreatLevel::Medium
    } else {
        ThreatLevel::Low
    }
}

/// Validates and summarizes a batch of detection events.
///
/// # Errors
///
/// Returns [`AggregationError`] if any event has a non-finite or negative
/// timestamp, a confidence outside `[0, 100]`, or if the run metrics are
/// inconsistent. Nothing is summarized when validation fails.
pub fn aggregate(
    events: Vec<DetectionEvent>,
    metrics: RunMetrics,
) -> Result<AnalysisSummary, AggregationError> {
    validate_metrics(metrics)?;
    validate_events(&events)?;

    Ok(summarize(events, metrics))
}

/// Checks every event for values that would corrupt a summary.
///
/// # Errors
///
/// Returns the first offending event as an [`AggregationError`].
pub fn validate_events(events: &[DetectionEvent]) -> Result<(), AggregationError> {
    for (index, event) in events.iter().enumerate() {
        if !event.timestamp.is_finite() || event.timestamp < 0.0 {
            return Err(AggregationError::InvalidTimestamp {
                index,
                value: event.timestamp,
            });
        }
        if !event.confidence.is_finite() || !(0.0..=100.0).contains(&event.confidence) {
            return Err(AggregationError::InvalidConfidence {
                index,
                value: event.confidence,
            });
        }
    }
    Ok(())
}

/// Checks frame counts and processing time.
///
/// # Errors
///
/// Returns [`AggregationError`] when processed frames exceed total frames
/// or the processing time is not a finite, non-negative number.
pub fn validate_metrics(metrics: RunMetrics) -> Result<(), AggregationError> {
    if metrics.processed_frames > metrics.total_frames {
        return Err(AggregationError::FrameCountMismatch {
            processed: metrics.processed_frames,
            total: metrics.total_frames,
        });
    }
    if !metrics.processing_time.is_finite() || metrics.processing_time < 0.0 {
        return Err(AggregationError::InvalidProcessingTime {
            value: metrics.processing_time,
        });
    }
    Ok(())
}

/// Summarizes events that are already known to be valid.
pub(crate) fn summarize(mut events: Vec<DetectionEvent>, metrics: RunMetrics) -> AnalysisSummary {
    // `sort_by` is stable, so equal timestamps keep their arrival order.
    events.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));

    let detected: Vec<&DetectionEvent> = events.iter().filter(|e| e.detected).collect();

    let (average_confidence, summary) = if detected.is_empty() {
        (
            0,
            SummaryStats {
                total_detections: 0,
                high_confidence_detections: 0,
                time_ranges: Vec::new(),
            },
        )
    } else {
        let high_confidence = detected
            .iter()
            .filter(|e| e.confidence > HIGH_CONFIDENCE_THRESHOLD)
            .count();

        (
            average_confidence(&detected),
            SummaryStats {
                total_detections: detected.len() as u64,
                high_confidence_detections: high_confidence as u64,
                time_ranges: cluster_incidents(&detected),
            },
        )
    };

    log::debug!(
        "Aggregated {} events: {} detected, average confidence {average_confidence}, {} incidents",
        events.len(),
        summary.total_detections,
        summary.time_ranges.len(),
    );

    AnalysisSummary {
        total_frames: metrics.total_frames,
        processed_frames: metrics.processed_frames,
        detections: events,
        overall_threat_level: classify(f64::from(average_confidence)),
        average_confidence,
        processing_time: metrics.processing_time,
        summary,
    }
}

/// Slack added before flooring so a mean that is a whole number in exact
/// arithmetic is not pushed one point down by float summation error.
const MEAN_EPSILON: f64 = 1e-9;

/// Floor of the mean confidence. `detected` must be non-empty.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn average_confidence(detected: &[&DetectionEvent]) -> u8 {
    let sum: f64 = detected.iter().map(|e| e.confidence).sum();
    let mean = sum / detected.len() as f64;
    (mean + MEAN_EPSILON).floor().clamp(0.0, 100.0) as u8
}

/// Merges time-sorted detections into incidents.
///
/// A detection starts a new incident when it is the first one or when it
/// trails the previous detection by more than [`INCIDENT_GAP_SECS`];
/// otherwise it extends the current incident. Severity is taken from the
/// triggering detection only.
#[must_use]
pub fn cluster_incidents(sorted: &[&DetectionEvent]) -> Vec<Incident> {
    let mut incidents: Vec<Incident> = Vec::new();
    let mut previous: Option<f64> = None;

    for event in sorted {
        let starts_new = previous.is_none_or(|prev| event.timestamp - prev > INCIDENT_GAP_SECS);

        match incidents.last_mut() {
            Some(current) if !starts_new => {
                current.end = event.timestamp + INCIDENT_TAIL_SECS;
            }
            _ => incidents.push(Incident {
                start: event.timestamp,
                end: event.timestamp + INCIDENT_TAIL_SECS,
                severity: classify(event.confidence),
            }),
        }

        previous = Some(event.timestamp);
    }

    incidents
}
