#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Alert storage abstraction and detection-to-alert rules.
//!
//! Handlers talk to alert storage only through [`AlertRepository`], so the
//! in-memory store used by the demo can be swapped for a real database
//! without touching the HTTP layer. The [`rules`] module decides which
//! detections become alerts and at what severity.

pub mod memory;
pub mod rules;
pub mod sample;

use shopguard_alert_models::{
    Alert, AlertFilter, AlertPage, AlertStats, AlertStatus, CreateAlertRequest,
};
use thiserror::Error;

/// Default page size when the caller gives none.
pub const DEFAULT_PAGE_LIMIT: u32 = 50;

/// Largest page size a caller may request.
pub const MAX_PAGE_LIMIT: u32 = 500;

/// Errors from alert storage operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlertError {
    /// No alert has the requested ID.
    #[error("Alert not found: {id}")]
    NotFound {
        /// The ID that was looked up.
        id: String,
    },

    /// The request was rejected before touching storage.
    #[error("Invalid alert: {message}")]
    Validation {
        /// Description of what was wrong.
        message: String,
    },

    /// The storage backend failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Storage for alerts.
#[async_trait::async_trait]
pub trait AlertRepository: Send + Sync {
    /// Lists alerts matching `filter`, newest first, one page at a time.
    ///
    /// # Errors
    ///
    /// Returns [`AlertError::Storage`] if the backend fails.
    async fn list(&self, filter: &AlertFilter) -> Result<AlertPage, AlertError>;

    /// Fetches one alert.
    ///
    /// # Errors
    ///
    /// Returns [`AlertError::NotFound`] for an unknown ID.
    async fn get(&self, id: &str) -> Result<Alert, AlertError>;

    /// Stores a new `active` alert and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`AlertError::Validation`] if the request is incomplete.
    async fn create(&self, request: CreateAlertRequest) -> Result<Alert, AlertError>;

    /// Moves an alert to `status`, recording the change in its history.
    ///
    /// # Errors
    ///
    /// Returns [`AlertError::NotFound`] for an unknown ID.
    async fn update_status(&self, id: &str, status: AlertStatus) -> Result<Alert, AlertError>;

    /// Counts alerts by status.
    ///
    /// # Errors
    ///
    /// Returns [`AlertError::Storage`] if the backend fails.
    async fn stats(&self) -> Result<AlertStats, AlertError>;
}

/// Checks a create request for missing or out-of-range fields.
///
/// # Errors
///
/// Returns [`AlertError::Validation`] describing the first problem found.
pub fn validate_create(request: &CreateAlertRequest) -> Result<(), AlertError> {
    if !request.confidence.is_finite() || !(0.0..=100.0).contains(&request.confidence) {
        return Err(AlertError::Validation {
            message: format!("confidence {} is outside [0, 100]", request.confidence),
        });
    }
    if request.location.trim().is_empty() {
        return Err(AlertError::Validation {
            message: "location is required".to_string(),
        });
    }
    if request.description.trim().is_empty() {
        return Err(AlertError::Validation {
            message: "description is required".to_string(),
        });
    }
    Ok(())
}

/// Resolves the effective `(offset, limit)` for a filter.
#[must_use]
pub fn page_bounds(filter: &AlertFilter) -> (u32, u32) {
    let limit = filter
        .limit
        .unwrap_or(DEFAULT_PAGE_LIMIT)
        .clamp(1, MAX_PAGE_LIMIT);
    (filter.offset.unwrap_or(0), limit)
}
