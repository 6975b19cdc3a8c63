#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Detection event, incident, and analysis summary types.
//!
//! These are the shared value types flowing between the detection
//! synthesizer, the aggregator, the backend proxy, and the REST API. They
//! serialize to the camelCase JSON shape the dashboard front end consumes.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Coarse three-band threat classification.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum ThreatLevel {
    /// Nothing above the medium band.
    #[default]
    Low,
    /// Moderate confidence of suspicious activity.
    Medium,
    /// High confidence of suspicious activity.
    High,
}

impl ThreatLevel {
    /// Returns all variants, lowest first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Low, Self::Medium, Self::High]
    }
}

/// Pixel-space rectangle around the subject of a detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// A single timestamped claim that suspicious activity was observed.
///
/// Created once per analysis run and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionEvent {
    /// Seconds from the start of the observed media.
    pub timestamp: f64,
    /// Confidence score in `[0, 100]`.
    pub confidence: f64,
    /// Only events with `detected = true` participate in aggregation.
    pub detected: bool,
    /// Behavior label.
    pub description: String,
    /// Region of the frame the detection refers to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
    /// Source frame index, when known.
    #[serde(
        default,
        alias = "frame_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub frame_number: Option<u64>,
    /// Whether a real model (as opposed to a heuristic) produced the event.
    #[serde(default, alias = "model_used", skip_serializing_if = "Option::is_none")]
    pub model_used: Option<bool>,
}

/// A merged cluster of nearby detection events.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    /// Timestamp of the triggering event.
    pub start: f64,
    /// End of the range, always `>= start`.
    pub end: f64,
    /// Severity of the triggering event. Not recomputed when the range grows.
    pub severity: ThreatLevel,
}

/// Counts and incidents derived from a batch of detections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    /// Number of events with `detected = true`.
    pub total_detections: u64,
    /// Number of detected events with confidence strictly above 80.
    pub high_confidence_detections: u64,
    /// Non-overlapping incidents ordered by start.
    pub time_ranges: Vec<Incident>,
}

/// The full result of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    /// Frames in the source media.
    pub total_frames: u64,
    /// Frames actually examined (`<= total_frames`).
    pub processed_frames: u64,
    /// Events sorted ascending by timestamp.
    pub detections: Vec<DetectionEvent>,
    /// Classification of `average_confidence`.
    pub overall_threat_level: ThreatLevel,
    /// Floor of the mean confidence of detected events, 0 when there are none.
    pub average_confidence: u8,
    /// Wall-clock processing time in seconds.
    pub processing_time: f64,
    /// Counts and incidents.
    pub summary: SummaryStats,
}

/// Detector sensitivity requested by the caller.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Sensitivity {
    /// Fewer, more conservative detections.
    Low,
    /// Default.
    #[default]
    Medium,
    /// More detections.
    High,
}

/// Broad behavior family a catalog description belongs to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BehaviorKind {
    /// Hiding merchandise on the person or in a bag.
    Concealment,
    /// Taking merchandise past the point of sale.
    Removal,
    /// Lingering or repeated visits without purchase intent.
    Loitering,
    /// Damaging packaging or security tags.
    Tampering,
}

impl BehaviorKind {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Concealment,
            Self::Removal,
            Self::Loitering,
            Self::Tampering,
        ]
    }
}

/// Result of classifying a single camera frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameClassification {
    /// Whether suspicious activity was flagged.
    pub detected: bool,
    /// Confidence score in `[0, 100]`.
    pub confidence: u8,
    /// Frame-level threat band.
    pub threat_level: ThreatLevel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threat_level_uses_capitalized_wire_names() {
        let json = serde_json::to_string(&ThreatLevel::Medium).unwrap();
        assert_eq!(json, "\"Medium\"");
        assert_eq!("High".parse::<ThreatLevel>().unwrap(), ThreatLevel::High);
    }

    #[test]
    fn threat_levels_are_ordered() {
        assert!(ThreatLevel::Low < ThreatLevel::Medium);
        assert!(ThreatLevel::Medium < ThreatLevel::High);
    }

    #[test]
    fn detection_event_accepts_snake_case_backend_fields() {
        let event: DetectionEvent = serde_json::from_str(
            r#"{"timestamp":12.5,"confidence":77,"detected":true,
                "description":"x","model_used":true,"frame_number":375}"#,
        )
        .unwrap();

        assert_eq!(event.frame_number, Some(375));
        assert_eq!(event.model_used, Some(true));
        assert!(event.bounding_box.is_none());
    }

    #[test]
    fn detection_event_omits_absent_optionals() {
        let event = DetectionEvent {
            timestamp: 1.0,
            confidence: 90.0,
            detected: true,
            description: "x".to_string(),
            bounding_box: None,
            frame_number: None,
            model_used: None,
        };
        let json = serde_json::to_value(&event).unwrap();

        assert!(json.get("boundingBox").is_none());
        assert!(json.get("frameNumber").is_none());
    }

    #[test]
    fn sensitivity_parses_lowercase() {
        assert_eq!("high".parse::<Sensitivity>().unwrap(), Sensitivity::High);
        assert!("extreme".parse::<Sensitivity>().is_err());
        assert_eq!(Sensitivity::default(), Sensitivity::Medium);
    }
}
