//! Rules deciding which detections raise alerts.
//!
//! Live frames alert above 60 confidence (`high` > 80, `medium` > 70, else
//! `low`). Uploaded video alerts once per detection above 70 (`high` > 85,
//! else `medium`).

use shopguard_alert_models::{AlertMetadata, AlertSeverity, AlertType, CreateAlertRequest};
use shopguard_detection_models::{AnalysisSummary, FrameClassification};

/// Minimum frame confidence (exclusive) that raises a live alert.
pub const FRAME_ALERT_THRESHOLD: u8 = 60;

/// Minimum detection confidence (exclusive) that raises a video alert.
pub const VIDEO_ALERT_THRESHOLD: f64 = 70.0;

/// Where a live frame came from.
#[derive(Debug, Clone, Copy)]
pub struct FrameSource<'a> {
    /// Camera identifier.
    pub camera_id: &'a str,
    /// Human-readable camera location.
    pub location: &'a str,
}

/// Severity for a live-frame alert.
#[must_use]
pub const fn frame_alert_severity(confidence: u8) -> AlertSeverity {
    if confidence > 80 {
        AlertSeverity::High
    } else if confidence > 70 {
        AlertSeverity::Medium
    } else {
        AlertSeverity::Low
    }
}

/// Severity for an uploaded-video alert.
#[must_use]
pub fn video_alert_severity(confidence: f64) -> AlertSeverity {
    if confidence > 85.0 {
        AlertSeverity::High
    } else {
        AlertSeverity::Medium
    }
}

/// Builds the alert for a positive live frame, if it qualifies.
#[must_use]
pub fn frame_alert(
    frame: &FrameClassification,
    source: FrameSource<'_>,
    model_used: bool,
) -> Option<CreateAlertRequest> {
    if !frame.detected || frame.confidence <= FRAME_ALERT_THRESHOLD {
        return None;
    }

    Some(CreateAlertRequest {
        alert_type: AlertType::Theft,
        severity: frame_alert_severity(frame.confidence),
        confidence: f64::from(frame.confidence),
        location: source.location.to_string(),
        description: format!(
            "Live theft detection - {} threat level (confidence: {}%)",
            frame.threat_level, frame.confidence
        ),
        metadata: AlertMetadata {
            camera_id: Some(source.camera_id.to_string()),
            realtime: Some(true),
            model_used: Some(model_used),
            threat_level: Some(frame.threat_level),
            detection_method: Some("live_stream".to_string()),
            ..AlertMetadata::default()
        },
    })
}

/// Builds one alert per qualifying detection in an uploaded video analysis.
#[must_use]
pub fn video_alerts(summary: &AnalysisSummary, filename: &str) -> Vec<CreateAlertRequest> {
    summary
        .detections
        .iter()
        .filter(|d| d.detected && d.confidence > VIDEO_ALERT_THRESHOLD)
        .map(|d| CreateAlertRequest {
            alert_type: AlertType::Theft,
            severity: video_alert_severity(d.confidence),
            confidence: d.confidence,
            location: format!("Uploaded Video: {filename}"),
            description: format!("{} (at {}s)", d.description, d.timestamp),
            metadata: AlertMetadata {
                bounding_box: d.bounding_box,
                video_file: Some(filename.to_string()),
                video_timestamp: Some(d.timestamp),
                frame_number: d.frame_number,
                detection_method: Some("video_upload".to_string()),
                model_used: Some(d.model_used.unwrap_or(false)),
                processing_time: Some(summary.processing_time),
                ..AlertMetadata::default()
            },
        })
        .collect()
}
