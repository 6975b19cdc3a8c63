#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Alert record, filter, and status types.
//!
//! Alerts are raised from positive detections (live frames or uploaded
//! video) or created directly through the API, then moved through the
//! `active` → `acknowledged` → `resolved` workflow by an operator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shopguard_detection_models::{BoundingBox, ThreatLevel};
use strum_macros::{AsRefStr, Display, EnumString};

/// What kind of event raised the alert.
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
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AlertType {
    /// Theft detected with high confidence.
    Theft,
    /// Behavior worth a second look.
    Suspicious,
    /// Operational notice from the system itself.
    System,
}

/// Operator-facing alert severity.
#[derive(
    Debug,
    Clone,
    Copy,
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
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AlertSeverity {
    /// Low severity.
    Low,
    /// Medium severity.
    Medium,
    /// High severity.
    High,
}

/// Position of an alert in the review workflow.
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
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AlertStatus {
    /// Not yet looked at.
    Active,
    /// Seen by an operator.
    Acknowledged,
    /// Closed.
    Resolved,
}

impl AlertStatus {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Active, Self::Acknowledged, Self::Resolved]
    }
}

/// Free-form context attached to an alert. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertMetadata {
    /// Region of the frame the alert refers to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
    /// Camera that produced the frame.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera_id: Option<String>,
    /// Link to a stored clip.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    /// Name of the uploaded video file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_file: Option<String>,
    /// Offset into the uploaded video, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_timestamp: Option<f64>,
    /// Frame index in the uploaded video.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_number: Option<u64>,
    /// `live_stream`, `video_upload`, or `manual`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detection_method: Option<String>,
    /// Whether a real model produced the detection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_used: Option<bool>,
    /// Frame-level threat band at detection time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threat_level: Option<ThreatLevel>,
    /// Whether the alert came from a live feed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub realtime: Option<bool>,
    /// Analysis processing time for video alerts, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_time: Option<f64>,
}

/// One entry in an alert's status history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    /// Status before the change.
    pub from: AlertStatus,
    /// Status after the change.
    pub to: AlertStatus,
    /// When the change happened.
    pub timestamp: DateTime<Utc>,
}

/// A stored alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    /// UUID v4.
    pub id: String,
    /// When the alert was raised.
    pub timestamp: DateTime<Utc>,
    /// Alert kind.
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    /// Alert severity.
    pub severity: AlertSeverity,
    /// Detection confidence in `[0, 100]`.
    pub confidence: f64,
    /// Camera or upload the alert refers to.
    pub location: String,
    /// Human-readable description.
    pub description: String,
    /// Workflow status.
    pub status: AlertStatus,
    /// Extra context.
    #[serde(default)]
    pub metadata: AlertMetadata,
    /// Time of the last status change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Every status change, oldest first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub status_history: Vec<StatusChange>,
}

/// Fields supplied when creating an alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAlertRequest {
    /// Alert kind.
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    /// Alert severity.
    pub severity: AlertSeverity,
    /// Detection confidence in `[0, 100]`.
    pub confidence: f64,
    /// Camera or upload the alert refers to.
    pub location: String,
    /// Human-readable description.
    pub description: String,
    /// Extra context.
    #[serde(default)]
    pub metadata: AlertMetadata,
}

/// Criteria for listing alerts. `None` means no filter on that field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlertFilter {
    /// Only alerts in this status.
    pub status: Option<AlertStatus>,
    /// Only alerts of this kind.
    pub alert_type: Option<AlertType>,
    /// Only alerts with this severity.
    pub severity: Option<AlertSeverity>,
    /// Maximum number of alerts to return.
    pub limit: Option<u32>,
    /// Number of matching alerts to skip.
    pub offset: Option<u32>,
}

impl AlertFilter {
    /// Whether `alert` satisfies the status, type, and severity criteria.
    #[must_use]
    pub fn matches(&self, alert: &Alert) -> bool {
        self.status.is_none_or(|s| alert.status == s)
            && self.alert_type.is_none_or(|t| alert.alert_type == t)
            && self.severity.is_none_or(|s| alert.severity == s)
    }
}

/// One page of alerts.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertPage {
    /// Alerts on this page, newest first.
    pub alerts: Vec<Alert>,
    /// Number of alerts matching the filter across all pages.
    pub total: u64,
    /// Offset applied.
    pub offset: u32,
    /// Limit applied.
    pub limit: u32,
}

/// Alert counts by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertStats {
    /// All stored alerts.
    pub total: u64,
    /// Alerts in `active`.
    pub active: u64,
    /// Alerts in `acknowledged`.
    pub acknowledged: u64,
    /// Alerts in `resolved`.
    pub resolved: u64,
}
