//! Single-frame classification used for live camera checks in demo mode.
//!
//! Frame thresholds are looser than the batch aggregator's:
//! a frame is `High` above 80 and `Medium` above 60.

use shopguard_detection_models::{FrameClassification, ThreatLevel};

use crate::random::RandomSource;

/// Probability that a synthesized frame is flagged.
pub const FRAME_DETECTION_PROBABILITY: f64 = 0.15;

/// Inclusive confidence range for flagged frames.
pub const DETECTED_CONFIDENCE: (u64, u64) = (65, 95);

/// Inclusive confidence range for clean frames.
pub const CLEAR_CONFIDENCE: (u64, u64) = (10, 40);

/// Frame-level threat band for a confidence score.
#[must_use]
pub const fn frame_threat_level(confidence: u8) -> ThreatLevel {
    if confidence > 80 {
        ThreatLevel::High
    } else if confidence > 60 {
        ThreatLevel::Medium
    } else {
        ThreatLevel::Low
    }
}

/// Synthesizes a classification for one frame.
///
/// Draws once for the detection decision, then once for the confidence.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn classify_frame(rng: &mut dyn RandomSource) -> FrameClassification {
    let detected = rng.chance(FRAME_DETECTION_PROBABILITY);
    let (low, high) = if detected {
        DETECTED_CONFIDENCE
    } else {
        CLEAR_CONFIDENCE
    };
    let confidence = rng.int_in(low, high + 1) as u8;

    FrameClassification {
        detected,
        confidence,
        threat_level: frame_threat_level(confidence),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{FixedSequence, SeededRandom};

    #[test]
    fn flagged_frame_uses_high_confidence_band() {
        let mut rng = FixedSequence::new(vec![0.1, 0.999]);
        let frame = classify_frame(&mut rng);

        assert!(frame.detected);
        assert_eq!(frame.confidence, 95);
        assert_eq!(frame.threat_level, ThreatLevel::High);
    }

    #[test]
    fn clean_frame_uses_low_confidence_band() {
        let mut rng = FixedSequence::new(vec![0.15, 0.0]);
        let frame = classify_frame(&mut rng);

        assert!(!frame.detected);
        assert_eq!(frame.confidence, 10);
        assert_eq!(frame.threat_level, ThreatLevel::Low);
    }

    #[test]
    fn frame_thresholds_are_strict() {
        assert_eq!(frame_threat_level(80), ThreatLevel::Medium);
        assert_eq!(frame_threat_level(81), ThreatLevel::High);
        assert_eq!(frame_threat_level(60), ThreatLevel::Low);
        assert_eq!(frame_threat_level(61), ThreatLevel::Medium);
    }

    #[test]
    fn confidence_stays_in_band() {
        let mut rng = SeededRandom::new(5);
        for _ in 0..500 {
            let frame = classify_frame(&mut rng);
            if frame.detected {
                assert!((65..=95).contains(&frame.confidence));
            } else {
                assert!((10..=40).contains(&frame.confidence));
            }
        }
    }
}
