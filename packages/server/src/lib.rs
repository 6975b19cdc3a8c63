#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the `ShopGuard` theft detection dashboard.
//!
//! Frame and video analysis are forwarded to the external inference
//! backend. When the backend is offline those endpoints answer `503` with
//! locally synthesized results flagged `demoMode`, so the dashboard keeps
//! working. Alerts are kept in an injected [`AlertRepository`].

pub mod config;
pub mod error;
mod handlers;
pub mod interactive;

use std::sync::{Arc, Mutex, PoisonError};

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use shopguard_alerts::AlertRepository;
use shopguard_alerts::memory::InMemoryAlertRepository;
use shopguard_backend::{BackendClient, BackendError, monitor};
use shopguard_detection::random::{RandomSource, SeededRandom};

use crate::config::ServerConfig;
use crate::error::ApiError;

/// Largest JSON body accepted; frame data URLs are a few megabytes.
pub const MAX_JSON_BYTES: usize = 16 * 1024 * 1024;

/// Shared application state.
pub struct AppState {
    /// Alert storage.
    pub alerts: Arc<dyn AlertRepository>,
    /// Inference backend client.
    pub backend: Arc<BackendClient>,
    /// Randomness for fallback synthesis.
    rng: Mutex<Box<dyn RandomSource>>,
}

impl AppState {
    /// Assembles state from its parts.
    #[must_use]
    pub fn new(
        alerts: Arc<dyn AlertRepository>,
        backend: Arc<BackendClient>,
        rng: Box<dyn RandomSource>,
    ) -> Self {
        Self {
            alerts,
            backend,
            rng: Mutex::new(rng),
        }
    }

    /// Builds the default state for `config`: an in-memory alert store
    /// and a backend client.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Config`] if the HTTP client cannot be built.
    pub fn from_config(config: &ServerConfig) -> Result<Self, BackendError> {
        let alerts = if config.seed_sample_alerts {
            InMemoryAlertRepository::with_sample_alerts()
        } else {
            InMemoryAlertRepository::new()
        };
        let backend = BackendClient::new(&config.backend_url, config.backend_timeout)?;
        let rng: Box<dyn RandomSource> = match config.synth_seed {
            Some(seed) => Box::new(SeededRandom::new(seed)),
            None => Box::new(SeededRandom::from_entropy()),
        };

        Ok(Self::new(Arc::new(alerts), Arc::new(backend), rng))
    }

    /// Runs `f` with exclusive access to the fallback random source.
    pub fn with_rng<T>(&self, f: impl FnOnce(&mut dyn RandomSource) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        f(rng.as_mut())
    }
}

/// Registers the API routes and extractor configuration.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(MAX_JSON_BYTES)
            .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into()),
    )
    .service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/detect-frame", web::post().to(handlers::detect_frame))
            .route("/analyze-video", web::post().to(handlers::analyze_video))
            .route("/alerts", web::get().to(handlers::list_alerts))
            .route("/alerts", web::post().to(handlers::create_alert))
            .route("/alerts/{id}", web::put().to(handlers::update_alert))
            .route("/dashboard-stats", web::get().to(handlers::dashboard_stats)),
    );
}

/// Starts the `ShopGuard` API server.
///
/// Builds the application state, spawns the periodic backend health
/// probe, and runs the Actix-Web HTTP server until shutdown. The caller
/// provides the async runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP client cannot be built,
/// the server fails to bind, or it encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: ServerConfig) -> std::io::Result<()> {
    let state = AppState::from_config(&config).map_err(std::io::Error::other)?;

    log::info!(
        "Using inference backend at {} (timeout {:?})",
        state.backend.base_url(),
        config.backend_timeout
    );
    actix_rt::spawn(monitor::poll_forever(
        Arc::clone(&state.backend),
        config.backend_health_path.clone(),
        config.backend_poll_interval,
    ));

    let state = web::Data::new(state);
    let bind_addr = config.bind_addr.clone();
    let port = config.port;

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
