//! Process-local alert storage.
//!
//! Alerts live in a `RwLock<Vec<Alert>>` and vanish on restart. Reads take
//! the shared lock; creates and status changes take the exclusive lock for
//! the duration of a single push or field update.

use chrono::Utc;
use shopguard_alert_models::{
    Alert, AlertFilter, AlertPage, AlertStats, AlertStatus, CreateAlertRequest, StatusChange,
};
use tokio::sync::RwLock;

use crate::{AlertError, AlertRepository, page_bounds, sample, validate_create};

/// In-memory [`AlertRepository`].
#[derive(Debug, Default)]
pub struct InMemoryAlertRepository {
    alerts: RwLock<Vec<Alert>>,
}

impl InMemoryAlertRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-populated with the demo sample alerts.
    #[must_use]
    pub fn with_sample_alerts() -> Self {
        Self::from_alerts(sample::sample_alerts(Utc::now()))
    }

    /// Creates a repository holding `alerts`.
    #[must_use]
    pub fn from_alerts(alerts: Vec<Alert>) -> Self {
        Self {
            alerts: RwLock::new(alerts),
        }
    }
}

#[async_trait::async_trait]
impl AlertRepository for InMemoryAlertRepository {
    async fn list(&self, filter: &AlertFilter) -> Result<AlertPage, AlertError> {
        let (offset, limit) = page_bounds(filter);

        let mut matching: Vec<Alert> = {
            let alerts = self.alerts.read().await;
            alerts.iter().filter(|a| filter.matches(a)).cloned().collect()
        };
        matching.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        let total = matching.len() as u64;
        let alerts = matching
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect();

        Ok(AlertPage {
            alerts,
            total,
            offset,
            limit,
        })
    }

    async fn get(&self, id: &str) -> Result<Alert, AlertError> {
        self.alerts
            .read()
            .await
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or_else(|| AlertError::NotFound { id: id.to_string() })
    }

    async fn create(&self, request: CreateAlertRequest) -> Result<Alert, AlertError> {
        validate_create(&request)?;

        let alert = Alert {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            alert_type: request.alert_type,
            severity: request.severity,
            confidence: request.confidence,
            location: request.location,
            description: request.description,
            status: AlertStatus::Active,
            metadata: request.metadata,
            updated_at: None,
            status_history: Vec::new(),
        };

        log::info!(
            "Created {} alert {} ({}, confidence {})",
            alert.severity,
            alert.id,
            alert.location,
            alert.confidence
        );

        self.alerts.write().await.push(alert.clone());
        Ok(alert)
    }

    async fn update_status(&self, id: &str, status: AlertStatus) -> Result<Alert, AlertError> {
        let mut alerts = self.alerts.write().await;
        let alert = alerts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| AlertError::NotFound { id: id.to_string() })?;

        let now = Utc::now();
        alert.status_history.push(StatusChange {
            from: alert.status,
            to: status,
            timestamp: now,
        });
        log::info!("Alert {id} status changed from {} to {status}", alert.status);
        alert.status = status;
        alert.updated_at = Some(now);

        Ok(alert.clone())
    }

    async fn stats(&self) -> Result<AlertStats, AlertError> {
        let alerts = self.alerts.read().await;
        let count = |status: AlertStatus| alerts.iter().filter(|a| a.status == status).count() as u64;

        Ok(AlertStats {
            total: alerts.len() as u64,
            active: count(AlertStatus::Active),
            acknowledged: count(AlertStatus::Acknowledged),
            resolved: count(AlertStatus::Resolved),
        })
    }
}
