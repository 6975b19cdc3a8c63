#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the `ShopGuard` server.
//!
//! These types are serialized to JSON for the REST API. Frame detection
//! keeps the snake_case keys the dashboard front end already consumes;
//! everything else is camelCase.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shopguard_alert_models::{
    Alert, AlertFilter, AlertSeverity, AlertStats, AlertStatus, AlertType,
};
use shopguard_detection_models::{AnalysisSummary, ThreatLevel};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the server itself is up.
    pub healthy: bool,
    /// Server version.
    pub version: String,
    /// Whether the last backend observation succeeded.
    pub backend_online: bool,
    /// When the backend was last observed.
    pub last_checked: Option<DateTime<Utc>>,
}

/// JSON error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// Human-readable error.
    pub error: String,
}

/// A locally produced payload returned while the backend is offline.
///
/// The payload's own fields are flattened next to `demoMode` and `error`
/// so the front end can render it exactly like an upstream response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackBody<T> {
    /// Endpoint-specific fallback payload.
    #[serde(flatten)]
    pub payload: T,
    /// Always `true`.
    pub demo_mode: bool,
    /// Why the backend could not be used.
    pub error: String,
}

/// `POST /api/detect-frame` request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectFrameRequest {
    /// Base64 image data URL.
    #[serde(default)]
    pub image: Option<String>,
    /// Camera identifier.
    #[serde(default)]
    pub camera_id: Option<String>,
    /// Human-readable camera location.
    #[serde(default)]
    pub location: Option<String>,
}

/// Frame detection fields as reported by the inference backend.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendFrameDetection {
    /// Whether suspicious activity was flagged.
    pub violence_detected: bool,
    /// Confidence score; integer or float on the wire.
    pub confidence: f64,
    /// Whether a trained model produced the result.
    #[serde(default)]
    pub model_used: Option<bool>,
}

/// `POST /api/detect-frame` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameDetectionResponse {
    /// Whether suspicious activity was flagged.
    pub violence_detected: bool,
    /// Confidence score in `[0, 100]`.
    pub confidence: u8,
    /// Frame-level threat band.
    pub threat_level: ThreatLevel,
    /// When the frame was classified.
    pub timestamp: DateTime<Utc>,
    /// Whether a trained model produced the result.
    pub model_used: bool,
    /// Why the local classifier was used instead of the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
    /// Whether an alert was raised for this frame.
    #[serde(default)]
    pub alert_created: bool,
    /// ID of the raised alert.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert_id: Option<String>,
}

/// Processing state of a video analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    /// Analysis finished.
    Completed,
}

/// `POST /api/analyze-video` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoAnalysisResponse {
    /// Unique ID for this analysis.
    pub analysis_id: String,
    /// Processing state.
    pub status: AnalysisStatus,
    /// Percent complete.
    pub progress: u8,
    /// Uploaded file name.
    pub filename: String,
    /// Whether a trained model produced the detections.
    pub model_used: bool,
    /// Number of alerts raised from the detections.
    pub alerts_created: usize,
    /// Aggregated analysis.
    pub results: AnalysisSummary,
}

/// Query parameters for `GET /api/alerts`.
///
/// Filters are strings so `all` can be passed explicitly.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlertListParams {
    /// Status filter or `all`.
    pub status: Option<String>,
    /// Type filter or `all`.
    #[serde(rename = "type")]
    pub alert_type: Option<String>,
    /// Severity filter or `all`.
    pub severity: Option<String>,
    /// Maximum number of results.
    pub limit: Option<u32>,
    /// Offset for pagination.
    pub offset: Option<u32>,
}

impl AlertListParams {
    /// Converts the query parameters into an [`AlertFilter`].
    ///
    /// # Errors
    ///
    /// Returns a message naming the parameter if a filter value is not
    /// `all` or a known variant.
    pub fn to_filter(&self) -> Result<AlertFilter, String> {
        Ok(AlertFilter {
            status: parse_filter::<AlertStatus>("status", self.status.as_deref())?,
            alert_type: parse_filter::<AlertType>("type", self.alert_type.as_deref())?,
            severity: parse_filter::<AlertSeverity>("severity", self.severity.as_deref())?,
            limit: self.limit,
            offset: self.offset,
        })
    }
}

fn parse_filter<T: std::str::FromStr>(name: &str, value: Option<&str>) -> Result<Option<T>, String> {
    match value.map(str::trim) {
        None | Some("" | "all") => Ok(None),
        Some(v) => v
            .parse()
            .map(Some)
            .map_err(|_| format!("invalid {name} filter '{v}'")),
    }
}

/// `GET /api/alerts` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertListResponse {
    /// Alerts on this page, newest first.
    pub alerts: Vec<Alert>,
    /// Alerts matching the filter across all pages.
    pub total: u64,
    /// Offset applied.
    pub offset: u32,
    /// Limit applied.
    pub limit: u32,
    /// Counts by status across all alerts.
    pub stats: AlertStats,
}

/// `PUT /api/alerts/{id}` request body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAlertRequest {
    /// New status name.
    #[serde(default)]
    pub status: Option<String>,
}

impl UpdateAlertRequest {
    /// Parses the requested status.
    #[must_use]
    pub fn parsed_status(&self) -> Option<AlertStatus> {
        self.status.as_deref().and_then(|s| s.trim().parse().ok())
    }
}

/// `GET /api/dashboard-stats` response.
///
/// Fields the backend adds beyond the known ones are passed through.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Cameras configured.
    #[serde(default)]
    pub total_cameras: u32,
    /// Cameras currently streaming.
    #[serde(default)]
    pub active_cameras: u32,
    /// Alerts raised since midnight.
    #[serde(default)]
    pub alerts_today: u32,
    /// Detection accuracy percentage.
    #[serde(default)]
    pub detection_accuracy: f64,
    /// Additional backend-provided fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_filter_accepts_all_and_absent() {
        let params = AlertListParams {
            status: Some("all".to_string()),
            alert_type: None,
            severity: Some("high".to_string()),
            limit: Some(10),
            offset: None,
        };
        let filter = params.to_filter().unwrap();

        assert_eq!(filter.status, None);
        assert_eq!(filter.alert_type, None);
        assert_eq!(filter.severity, Some(AlertSeverity::High));
        assert_eq!(filter.limit, Some(10));
    }

    #[test]
    fn alert_filter_rejects_unknown_values() {
        let params = AlertListParams {
            alert_type: Some("burglary".to_string()),
            ..AlertListParams::default()
        };
        assert_eq!(
            params.to_filter().unwrap_err(),
            "invalid type filter 'burglary'"
        );
    }

    #[test]
    fn update_status_parsing() {
        let request = |s: &str| UpdateAlertRequest {
            status: Some(s.to_string()),
        };
        assert_eq!(
            request("resolved").parsed_status(),
            Some(AlertStatus::Resolved)
        );
        assert_eq!(request("closed").parsed_status(), None);
        assert_eq!(UpdateAlertRequest::default().parsed_status(), None);
    }

    #[test]
    fn fallback_body_flattens_payload() {
        let body = FallbackBody {
            payload: DashboardStats::default(),
            demo_mode: true,
            error: "Backend offline: refused".to_string(),
        };
        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(value["totalCameras"], 0);
        assert_eq!(value["detectionAccuracy"], 0.0);
        assert_eq!(value["demoMode"], true);
        assert_eq!(value["error"], "Backend offline: refused");
    }

    #[test]
    fn dashboard_stats_keep_unknown_fields() {
        let stats: DashboardStats = serde_json::from_value(serde_json::json!({
            "totalCameras": 4,
            "activeCameras": 3,
            "alertsToday": 7,
            "detectionAccuracy": 94.2,
            "systemUptime": "99.9%"
        }))
        .unwrap();

        assert_eq!(stats.total_cameras, 4);
        assert_eq!(stats.extra["systemUptime"], "99.9%");

        let round = serde_json::to_value(&stats).unwrap();
        assert_eq!(round["systemUptime"], "99.9%");
    }

    #[test]
    fn frame_response_omits_absent_optionals() {
        let response = FrameDetectionResponse {
            violence_detected: false,
            confidence: 22,
            threat_level: ThreatLevel::Low,
            timestamp: Utc::now(),
            model_used: true,
            fallback_reason: None,
            alert_created: false,
            alert_id: None,
        };
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["threat_level"], "Low");
        assert!(value.get("fallback_reason").is_none());
        assert!(value.get("alert_id").is_none());
    }
}
