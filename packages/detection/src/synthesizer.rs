//! Fabricates believable detection batches for demo mode.
//!
//! Used when no inference backend is reachable. Output is a pure function
//! of the configuration and the [`RandomSource`], drawn in this order:
//!
//! 1. total frames, in `[1000, 4000)`
//! 2. processing time, in `[30, 90)` seconds
//! 3. detection count, in `[2, 10)` (shifted by [`Sensitivity`])
//! 4. per detection: timestamp `[0, 300)`, confidence `[60, 100)`,
//!    catalog index, then bounding box `x`, `y`, `width`, `height`

use serde::{Deserialize, Serialize};
use shopguard_detection_models::{
    AnalysisSummary, BehaviorKind, BoundingBox, DetectionEvent, Sensitivity,
};

use crate::aggregator::{self, RunMetrics};
use crate::random::RandomSource;

/// Length of the simulated media in seconds.
pub const MEDIA_DURATION_SECS: f64 = 300.0;

/// Frame rate assumed when the caller gives no usable hint.
pub const DEFAULT_FRAME_RATE: f64 = 30.0;

const TOTAL_FRAMES_RANGE: (u64, u64) = (1000, 4000);
const PROCESSING_TIME_RANGE: (f64, f64) = (30.0, 90.0);
const CONFIDENCE_RANGE: (u64, u64) = (60, 100);
const BOX_X_RANGE: (u64, u64) = (0, 800);
const BOX_Y_RANGE: (u64, u64) = (0, 600);
const BOX_WIDTH_RANGE: (u64, u64) = (100, 300);
const BOX_HEIGHT_RANGE: (u64, u64) = (150, 450);

/// A behavior description the synthesizer can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Behavior family.
    pub kind: BehaviorKind,
    /// Human-readable label.
    pub description: &'static str,
}

/// Fixed catalog of synthesized behavior descriptions.
pub const BEHAVIOR_CATALOG: [CatalogEntry; 8] = [
    CatalogEntry {
        kind: BehaviorKind::Concealment,
        description: "Person concealing merchandise in clothing",
    },
    CatalogEntry {
        kind: BehaviorKind::Concealment,
        description: "Item placed in personal bag without scanning",
    },
    CatalogEntry {
        kind: BehaviorKind::Removal,
        description: "Merchandise carried past checkout without payment",
    },
    CatalogEntry {
        kind: BehaviorKind::Removal,
        description: "Item handed off to a second person near the exit",
    },
    CatalogEntry {
        kind: BehaviorKind::Loitering,
        description: "Extended loitering near high-value display",
    },
    CatalogEntry {
        kind: BehaviorKind::Loitering,
        description: "Repeated visits to the same shelf without selection",
    },
    CatalogEntry {
        kind: BehaviorKind::Tampering,
        description: "Security tag tampering detected",
    },
    CatalogEntry {
        kind: BehaviorKind::Tampering,
        description: "Product packaging torn open in aisle",
    },
];

/// Optional knobs for a synthesized run. Unusable values fall back to the
/// defaults without error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesizerConfig {
    /// Frames per second used to derive each event's frame number.
    #[serde(default)]
    pub frame_rate_hint: Option<f64>,
    /// Shifts the number of detections produced.
    #[serde(default)]
    pub sensitivity: Option<Sensitivity>,
    /// Restricts descriptions to these behavior families. Empty means all.
    #[serde(default)]
    pub detect_types: Vec<BehaviorKind>,
}

impl SynthesizerConfig {
    fn frame_rate(&self) -> f64 {
        self.frame_rate_hint
            .filter(|fps| fps.is_finite() && *fps > 0.0)
            .unwrap_or(DEFAULT_FRAME_RATE)
    }

    fn catalog(&self) -> Vec<&'static CatalogEntry> {
        let filtered: Vec<&'static CatalogEntry> = BEHAVIOR_CATALOG
            .iter()
            .filter(|entry| self.detect_types.contains(&entry.kind))
            .collect();

        if filtered.is_empty() {
            if !self.detect_types.is_empty() {
                log::debug!(
                    "detect_types {:?} match no catalog entries, using full catalog",
                    self.detect_types
                );
            }
            BEHAVIOR_CATALOG.iter().collect()
        } else {
            filtered
        }
    }
}

/// Half-open range of detection counts for a sensitivity.
#[must_use]
pub const fn detection_count_range(sensitivity: Sensitivity) -> (u64, u64) {
    match sensitivity {
        Sensitivity::Low => (1, 5),
        Sensitivity::Medium => (2, 10),
        Sensitivity::High => (4, 14),
    }
}

/// A synthesized batch before aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticBatch {
    /// Generated events, in draw order.
    pub events: Vec<DetectionEvent>,
    /// Run metrics. `processed_frames` always equals `total_frames`.
    pub metrics: RunMetrics,
}

/// Draws a batch of detection events.
#[must_use]
pub fn synthesize_events(config: &SynthesizerConfig, rng: &mut dyn RandomSource) -> SyntheticBatch {
    let total_frames = rng.int_in(TOTAL_FRAMES_RANGE.0, TOTAL_FRAMES_RANGE.1);
    let processing_time = tenths(rng.uniform(PROCESSING_TIME_RANGE.0, PROCESSING_TIME_RANGE.1));

    let (low, high) = detection_count_range(config.sensitivity.unwrap_or_default());
    let count = rng.int_in(low, high);

    let fps = config.frame_rate();
    let catalog = config.catalog();

    let events = (0..count)
        .map(|_| synthesize_event(rng, &catalog, fps))
        .collect();

    SyntheticBatch {
        events,
        metrics: RunMetrics {
            total_frames,
            processed_frames: total_frames,
            processing_time,
        },
    }
}

/// Draws a batch and aggregates it into a summary.
#[must_use]
pub fn synthesize(config: &SynthesizerConfig, rng: &mut dyn RandomSource) -> AnalysisSummary {
    let batch = synthesize_events(config, rng);
    log::debug!(
        "Synthesized {} detections over {} frames",
        batch.events.len(),
        batch.metrics.total_frames
    );
    aggregator::summarize(batch.events, batch.metrics)
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn synthesize_event(
    rng: &mut dyn RandomSource,
    catalog: &[&'static CatalogEntry],
    fps: f64,
) -> DetectionEvent {
    let timestamp = tenths(rng.uniform(0.0, MEDIA_DURATION_SECS));
    let confidence = rng.int_in(CONFIDENCE_RANGE.0, CONFIDENCE_RANGE.1) as f64;
    let entry = catalog[rng.int_in(0, catalog.len() as u64) as usize];

    let bounding_box = BoundingBox {
        x: rng.int_in(BOX_X_RANGE.0, BOX_X_RANGE.1) as u32,
        y: rng.int_in(BOX_Y_RANGE.0, BOX_Y_RANGE.1) as u32,
        width: rng.int_in(BOX_WIDTH_RANGE.0, BOX_WIDTH_RANGE.1) as u32,
        height: rng.int_in(BOX_HEIGHT_RANGE.0, BOX_HEIGHT_RANGE.1) as u32,
    };

    DetectionEvent {
        timestamp,
        confidence,
        detected: true,
        description: entry.description.to_string(),
        bounding_box: Some(bounding_box),
        frame_number: Some((timestamp * fps).floor() as u64),
        model_used: Some(false),
    }
}

/// Truncates to one decimal place, staying inside half-open ranges.
fn tenths(value: f64) -> f64 {
    (value * 10.0).floor() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{FixedSequence, SeededRandom};
    use shopguard_detection_models::ThreatLevel;

    #[test]
    fn scripted_draws_produce_exact_output() {
        // frames, time, count, then 7 draws for each of 2 events.
        let mut rng = FixedSequence::new(vec![
            0.5, 0.5, 0.0, // 2500 frames, 60.0s, 2 detections
            0.1, 0.75, 0.0, 0.5, 0.5, 0.5, 0.5, // event 1
            0.05, 0.9, 0.99, 0.0, 0.0, 0.0, 0.0, // event 2
        ]);

        let summary = synthesize(&SynthesizerConfig::default(), &mut rng);

        assert_eq!(summary.total_frames, 2500);
        assert_eq!(summary.processed_frames, 2500);
        assert!((summary.processing_time - 60.0).abs() < f64::EPSILON);
        assert_eq!(summary.detections.len(), 2);

        // Sorted by timestamp: event 2 (15.0s) precedes event 1 (30.0s).
        let first = &summary.detections[0];
        assert!((first.timestamp - 15.0).abs() < f64::EPSILON);
        assert!((first.confidence - 96.0).abs() < f64::EPSILON);
        assert_eq!(first.description, BEHAVIOR_CATALOG[7].description);
        assert_eq!(
            first.bounding_box,
            Some(BoundingBox {
                x: 0,
                y: 0,
                width: 100,
                height: 150,
            })
        );
        assert_eq!(first.frame_number, Some(450));

        let second = &summary.detections[1];
        assert!((second.timestamp - 30.0).abs() < f64::EPSILON);
        assert!((second.confidence - 90.0).abs() < f64::EPSILON);
        assert_eq!(second.description, BEHAVIOR_CATALOG[0].description);
        assert_eq!(
            second.bounding_box,
            Some(BoundingBox {
                x: 400,
                y: 300,
                width: 200,
                height: 300,
            })
        );

        assert_eq!(summary.average_confidence, 93);
        assert_eq!(summary.overall_threat_level, ThreatLevel::High);
        assert_eq!(summary.summary.total_detections, 2);
        assert_eq!(summary.summary.high_confidence_detections, 2);
        assert_eq!(summary.summary.time_ranges.len(), 1);
        assert_eq!(rng.consumed(), 17);
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let config = SynthesizerConfig::default();
        let a = synthesize(&config, &mut SeededRandom::new(7));
        let b = synthesize(&config, &mut SeededRandom::new(7));
        assert_eq!(a, b);
    }

    #[test]
    fn draws_stay_within_ranges() {
        let config = SynthesizerConfig::default();
        let mut rng = SeededRandom::new(1234);

        for _ in 0..200 {
            let batch = synthesize_events(&config, &mut rng);
            let metrics = batch.metrics;

            assert!((1000..4000).contains(&metrics.total_frames));
            assert_eq!(metrics.processed_frames, metrics.total_frames);
            assert!((30.0..90.0).contains(&metrics.processing_time));
            assert!((2..10).contains(&batch.events.len()));

            for event in &batch.events {
                assert!(event.detected);
                assert!((0.0..300.0).contains(&event.timestamp));
                assert!((60.0..100.0).contains(&event.confidence));
                assert!(
                    BEHAVIOR_CATALOG
                        .iter()
                        .any(|entry| entry.description == event.description)
                );
                let bbox = event.bounding_box.unwrap();
                assert!(bbox.x < 800 && bbox.y < 600);
                assert!((100..300).contains(&bbox.width));
                assert!((150..450).contains(&bbox.height));
            }
        }
    }

    #[test]
    fn sensitivity_shifts_detection_count() {
        let config = SynthesizerConfig {
            sensitivity: Some(Sensitivity::High),
            ..SynthesizerConfig::default()
        };
        // Third draw picks the count; 0.999 lands at the top of the range.
        let mut rng = FixedSequence::new(vec![0.0, 0.0, 0.999]);
        let batch = synthesize_events(&config, &mut rng);
        assert_eq!(batch.events.len(), 13);

        let config = SynthesizerConfig {
            sensitivity: Some(Sensitivity::Low),
            ..SynthesizerConfig::default()
        };
        let mut rng = FixedSequence::new(vec![0.0, 0.0, 0.0]);
        assert_eq!(synthesize_events(&config, &mut rng).events.len(), 1);
    }

    #[test]
    fn detect_types_restrict_catalog() {
        let config = SynthesizerConfig {
            detect_types: vec![BehaviorKind::Tampering],
            ..SynthesizerConfig::default()
        };
        let mut rng = SeededRandom::new(99);

        for _ in 0..50 {
            for event in synthesize_events(&config, &mut rng).events {
                assert!(
                    BEHAVIOR_CATALOG
                        .iter()
                        .filter(|entry| entry.kind == BehaviorKind::Tampering)
                        .any(|entry| entry.description == event.description)
                );
            }
        }
    }

    #[test]
    fn invalid_frame_rate_falls_back_to_default() {
        let config = SynthesizerConfig {
            frame_rate_hint: Some(f64::NAN),
            ..SynthesizerConfig::default()
        };
        assert!((config.frame_rate() - DEFAULT_FRAME_RATE).abs() < f64::EPSILON);

        let config = SynthesizerConfig {
            frame_rate_hint: Some(-24.0),
            ..SynthesizerConfig::default()
        };
        assert!((config.frame_rate() - DEFAULT_FRAME_RATE).abs() < f64::EPSILON);

        let config = SynthesizerConfig {
            frame_rate_hint: Some(25.0),
            ..SynthesizerConfig::default()
        };
        assert!((config.frame_rate() - 25.0).abs() < f64::EPSILON);
    }
}
