//! Demo alerts seeded at startup so the dashboard is never empty.

use chrono::{DateTime, Duration, Utc};
use shopguard_alert_models::{Alert, AlertMetadata, AlertSeverity, AlertStatus, AlertType};

/// Builds the three demo alerts relative to `now`: an active theft alert
/// from 15 minutes ago, an acknowledged suspicious alert from 2 hours ago,
/// and a resolved theft alert from 5 hours ago.
#[must_use]
pub fn sample_alerts(now: DateTime<Utc>) -> Vec<Alert> {
    vec![
        sample(
            now - Duration::minutes(15),
            AlertType::Theft,
            AlertSeverity::High,
            87.0,
            "Camera 2 - Aisle 3",
            "Suspicious activity detected - person concealing item",
            AlertStatus::Active,
            AlertMetadata {
                camera_id: Some("cam_002".to_string()),
                video_url: Some("/static/sample_video.mp4".to_string()),
                ..AlertMetadata::default()
            },
        ),
        sample(
            now - Duration::hours(2),
            AlertType::Suspicious,
            AlertSeverity::Medium,
            72.0,
            "Camera 1 - Entrance",
            "Potential theft activity - item removal without payment",
            AlertStatus::Acknowledged,
            AlertMetadata {
                camera_id: Some("cam_001".to_string()),
                ..AlertMetadata::default()
            },
        ),
        sample(
            now - Duration::hours(5),
            AlertType::Theft,
            AlertSeverity::High,
            91.0,
            "Camera 3 - Electronics",
            "High confidence theft detection - concealment behavior",
            AlertStatus::Resolved,
            AlertMetadata {
                camera_id: Some("cam_003".to_string()),
                ..AlertMetadata::default()
            },
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn sample(
    timestamp: DateTime<Utc>,
    alert_type: AlertType,
    severity: AlertSeverity,
    confidence: f64,
    location: &str,
    description: &str,
    status: AlertStatus,
    metadata: AlertMetadata,
) -> Alert {
    Alert {
        id: uuid::Uuid::new_v4().to_string(),
        timestamp,
        alert_type,
        severity,
        confidence,
        location: location.to_string(),
        description: description.to_string(),
        status,
        metadata,
        updated_at: None,
        status_history: Vec::new(),
    }
}
