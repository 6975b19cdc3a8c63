//! HTTP handler functions for the `ShopGuard` API.

use std::sync::LazyLock;

use actix_multipart::{Field, Multipart};
use actix_web::{HttpResponse, web};
use chrono::Utc;
use futures::StreamExt as _;
use regex::Regex;
use serde::Serialize;
use shopguard_alert_models::CreateAlertRequest;
use shopguard_alerts::AlertError;
use shopguard_alerts::rules::{self, FrameSource};
use shopguard_backend::{BackendError, BackendRequest, ProxyOutcome, Upload};
use shopguard_detection::frame::{classify_frame, frame_threat_level};
use shopguard_detection::normalize::{self, RawAnalysis};
use shopguard_detection::synthesizer::{self, SynthesizerConfig};
use shopguard_detection_models::{AnalysisSummary, FrameClassification};
use shopguard_server_models::{
    AlertListParams, AlertListResponse, AnalysisStatus, ApiHealth, BackendFrameDetection,
    DashboardStats, DetectFrameRequest, FrameDetectionResponse, UpdateAlertRequest,
    VideoAnalysisResponse,
};

use crate::AppState;
use crate::error::{ApiError, fallback_response};

const DETECT_FRAME_PATH: &str = "/api/detect-frame";
const ANALYZE_VIDEO_PATH: &str = "/api/analyze-video";
const DASHBOARD_STATS_PATH: &str = "/api/dashboard-stats";

const DEFAULT_CAMERA_ID: &str = "live_cam";
const DEFAULT_LOCATION: &str = "Live Camera Feed";

/// Largest accepted video upload.
const MAX_VIDEO_BYTES: usize = 512 * 1024 * 1024;

/// Largest accepted plain-text form field.
const MAX_FORM_FIELD_BYTES: usize = 4 * 1024;

static DATA_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^data:image/[a-zA-Z0-9.+-]+;base64,[A-Za-z0-9+/]+=*$").expect("valid regex")
});

/// `GET /api/health`
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    let backend = state.backend.monitor().status();

    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        backend_online: backend.online,
        last_checked: backend.last_checked,
    })
}

/// `POST /api/detect-frame`
///
/// Classifies one camera frame. Falls back to the local frame classifier
/// when the backend is offline. A positive frame above the alert
/// threshold raises an alert either way.
pub async fn detect_frame(
    state: web::Data<AppState>,
    body: web::Json<DetectFrameRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = body.into_inner();
    let image = validate_image(request.image.as_deref())?;
    let camera_id = request.camera_id.as_deref().unwrap_or(DEFAULT_CAMERA_ID);
    let location = request.location.as_deref().unwrap_or(DEFAULT_LOCATION);

    let outcome = state
        .backend
        .proxy_with_fallback(
            BackendRequest::PostJson {
                path: DETECT_FRAME_PATH.to_string(),
                body: serde_json::json!({
                    "image": image,
                    "camera_id": camera_id,
                    "location": location,
                }),
            },
            frame_from_backend,
            || (state.with_rng(|rng| classify_frame(rng)), false),
        )
        .await?;

    let (frame, model_used) = *outcome.value();
    let alert = match rules::frame_alert(&frame, FrameSource { camera_id, location }, model_used)
    {
        Some(request) => Some(state.alerts.create(request).await?),
        None => None,
    };

    let response = FrameDetectionResponse {
        violence_detected: frame.detected,
        confidence: frame.confidence,
        threat_level: frame.threat_level,
        timestamp: Utc::now(),
        model_used,
        fallback_reason: None,
        alert_created: alert.is_some(),
        alert_id: alert.map(|a| a.id),
    };

    Ok(match outcome {
        ProxyOutcome::Upstream(_) => HttpResponse::Ok().json(response),
        ProxyOutcome::Fallback { reason, .. } => fallback_response(
            FrameDetectionResponse {
                fallback_reason: Some(reason.to_string()),
                ..response
            },
            &reason,
        ),
    })
}

/// `POST /api/analyze-video`
///
/// Accepts a multipart upload with a `video` file field and optional
/// `sensitivity`, `frameRate`, and `detectTypes` fields that shape the
/// synthesized fallback. Raises one alert per qualifying detection.
pub async fn analyze_video(
    state: web::Data<AppState>,
    payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let VideoForm { upload, config } = read_video_form(payload).await?;
    let filename = upload.file_name.clone();

    log::info!(
        "Analyzing uploaded video {filename} ({} bytes)",
        upload.bytes.len()
    );

    let outcome = state
        .backend
        .proxy_with_fallback(
            BackendRequest::PostMultipart {
                path: ANALYZE_VIDEO_PATH.to_string(),
                upload,
            },
            summary_from_backend,
            || state.with_rng(|rng| synthesizer::synthesize(&config, rng)),
        )
        .await?;

    let (summary, fallback) = match outcome {
        ProxyOutcome::Upstream(summary) => (summary, None),
        ProxyOutcome::Fallback { value, reason } => (value, Some(reason)),
    };

    let mut alerts_created = 0;
    for request in rules::video_alerts(&summary, &filename) {
        match state.alerts.create(request).await {
            Ok(_) => alerts_created += 1,
            Err(e) => log::warn!("Skipping video alert for {filename}: {e}"),
        }
    }

    log::info!(
        "Video analysis of {filename} complete: {} detections, {alerts_created} alerts created",
        summary.summary.total_detections
    );

    let response = VideoAnalysisResponse {
        analysis_id: uuid::Uuid::new_v4().to_string(),
        status: AnalysisStatus::Completed,
        progress: 100,
        filename,
        model_used: fallback.is_none()
            && summary.detections.iter().any(|d| d.model_used == Some(true)),
        alerts_created,
        results: summary,
    };

    Ok(match fallback {
        None => HttpResponse::Ok().json(response),
        Some(reason) => fallback_response(response, &reason),
    })
}

/// `GET /api/alerts`
///
/// Lists alerts newest first with optional `status`, `type`, and
/// `severity` filters (`all` disables a filter) and pagination.
pub async fn list_alerts(
    state: web::Data<AppState>,
    params: web::Query<AlertListParams>,
) -> Result<HttpResponse, ApiError> {
    let filter = params.to_filter().map_err(ApiError::BadRequest)?;

    let page = match state.alerts.list(&filter).await {
        Ok(page) => page,
        Err(AlertError::Storage(message)) => {
            return Ok(fallback_response(AlertListResponse::default(), &message));
        }
        Err(e) => return Err(e.into()),
    };
    let stats = state.alerts.stats().await?;

    Ok(HttpResponse::Ok().json(AlertListResponse {
        alerts: page.alerts,
        total: page.total,
        offset: page.offset,
        limit: page.limit,
        stats,
    }))
}

/// `POST /api/alerts`
pub async fn create_alert(
    state: web::Data<AppState>,
    body: web::Json<CreateAlertRequest>,
) -> Result<HttpResponse, ApiError> {
    let alert = state.alerts.create(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(alert))
}

/// `PUT /api/alerts/{id}`
pub async fn update_alert(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdateAlertRequest>,
) -> Result<HttpResponse, ApiError> {
    let status = body
        .parsed_status()
        .ok_or_else(|| ApiError::BadRequest("Invalid status".to_string()))?;
    let alert = state.alerts.update_status(&path, status).await?;
    Ok(HttpResponse::Ok().json(alert))
}

/// `GET /api/dashboard-stats`
///
/// Proxies the backend's counters; zeroed stats when it is offline.
pub async fn dashboard_stats(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let outcome = state
        .backend
        .proxy_with_fallback(
            BackendRequest::Get {
                path: DASHBOARD_STATS_PATH.to_string(),
            },
            |value| decode::<DashboardStats>(value),
            DashboardStats::default,
        )
        .await?;

    Ok(respond(outcome))
}

fn respond<T: Serialize>(outcome: ProxyOutcome<T>) -> HttpResponse {
    match outcome {
        ProxyOutcome::Upstream(value) => HttpResponse::Ok().json(value),
        ProxyOutcome::Fallback { value, reason } => fallback_response(value, &reason),
    }
}

fn decode<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> Result<T, BackendError> {
    serde_json::from_value(value).map_err(|e| BackendError::Decode(e.to_string()))
}

fn validate_image(image: Option<&str>) -> Result<&str, ApiError> {
    match image.map(str::trim) {
        None | Some("") => Err(ApiError::BadRequest("No image data provided".to_string())),
        Some(image) if DATA_URL_RE.is_match(image) => Ok(image),
        Some(_) => Err(ApiError::BadRequest(
            "image must be a base64 data:image/... URL".to_string(),
        )),
    }
}

fn frame_from_backend(value: serde_json::Value) -> Result<(FrameClassification, bool), BackendError> {
    let raw: BackendFrameDetection = decode(value)?;
    if !raw.confidence.is_finite() || !(0.0..=100.0).contains(&raw.confidence) {
        return Err(BackendError::Decode(format!(
            "frame confidence {} outside [0, 100]",
            raw.confidence
        )));
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let confidence = raw.confidence.round() as u8;

    Ok((
        FrameClassification {
            detected: raw.violence_detected,
            confidence,
            threat_level: frame_threat_level(confidence),
        },
        raw.model_used.unwrap_or(false),
    ))
}

fn summary_from_backend(value: serde_json::Value) -> Result<AnalysisSummary, BackendError> {
    let raw = RawAnalysis::from_value(value).map_err(|e| BackendError::Decode(e.to_string()))?;
    normalize::normalize(raw).map_err(|e| BackendError::Decode(e.to_string()))
}

struct VideoForm {
    upload: Upload,
    config: SynthesizerConfig,
}

async fn read_video_form(mut payload: Multipart) -> Result<VideoForm, ApiError> {
    let mut upload = None;
    let mut config = SynthesizerConfig::default();

    while let Some(field) = payload.next().await {
        let mut field = field.map_err(|e| ApiError::BadRequest(e.to_string()))?;
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "video" => {
                let file_name = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename())
                    .unwrap_or_default()
                    .to_string();
                let content_type = field.content_type().map(ToString::to_string);
                let bytes = read_field(&mut field, MAX_VIDEO_BYTES).await?;
                upload = Some(Upload {
                    field: "video".to_string(),
                    file_name,
                    content_type,
                    bytes,
                });
            }
            "sensitivity" => {
                config.sensitivity = read_text(&mut field).await?.trim().parse().ok();
            }
            "frameRate" | "frame_rate" => {
                config.frame_rate_hint = read_text(&mut field).await?.trim().parse().ok();
            }
            "detectTypes" | "detect_types" => {
                config.detect_types = read_text(&mut field)
                    .await?
                    .split(',')
                    .filter_map(|kind| kind.trim().parse().ok())
                    .collect();
            }
            other => {
                log::debug!("Ignoring unexpected form field '{other}'");
                read_field(&mut field, MAX_VIDEO_BYTES).await?;
            }
        }
    }

    let upload =
        upload.ok_or_else(|| ApiError::BadRequest("No video file provided".to_string()))?;
    if upload.file_name.trim().is_empty() {
        return Err(ApiError::BadRequest("No video file selected".to_string()));
    }

    Ok(VideoForm { upload, config })
}

async fn read_field(field: &mut Field, limit: usize) -> Result<Vec<u8>, ApiError> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk =
            chunk.map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {e}")))?;
        if bytes.len() + chunk.len() > limit {
            return Err(ApiError::BadRequest(format!(
                "form field exceeds {limit} bytes"
            )));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

async fn read_text(field: &mut Field) -> Result<String, ApiError> {
    let bytes = read_field(field, MAX_FORM_FIELD_BYTES).await?;
    String::from_utf8(bytes)
        .map_err(|_| ApiError::BadRequest("form fields must be UTF-8".to_string()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use serde_json::{Value, json};
    use shopguard_alerts::memory::InMemoryAlertRepository;
    use shopguard_backend::BackendClient;
    use shopguard_detection::random::{FixedSequence, SeededRandom};
    use shopguard_detection::random::RandomSource;

    use super::*;
    use crate::configure;

    const PNG: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAAB";
    const BOUNDARY: &str = "shopguard-test-boundary";

    // Nothing listens on port 1, so every proxied call fails fast.
    fn offline_state(rng: Box<dyn RandomSource>) -> web::Data<AppState> {
        let backend = BackendClient::new("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();
        web::Data::new(AppState::new(
            Arc::new(InMemoryAlertRepository::with_sample_alerts()),
            Arc::new(backend),
            rng,
        ))
    }

    fn multipart_body(parts: &[(&str, Option<&str>, &str)]) -> String {
        let mut body = String::new();
        for (name, filename, content) in parts {
            body.push_str(&format!("--{BOUNDARY}\r\n"));
            match filename {
                Some(filename) => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: video/mp4\r\n\r\n"
                )),
                None => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"
                )),
            }
            body.push_str(content);
            body.push_str("\r\n");
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));
        body
    }

    fn upload_request(body: String) -> actix_test::TestRequest {
        actix_test::TestRequest::post()
            .uri("/api/analyze-video")
            .insert_header((
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            ))
            .set_payload(body)
    }

    #[test]
    fn image_validation() {
        assert!(validate_image(Some(PNG)).is_ok());
        assert!(validate_image(None).is_err());
        assert!(validate_image(Some("   ")).is_err());
        assert!(validate_image(Some("data:text/plain;base64,AAAA")).is_err());
        assert!(validate_image(Some("data:image/jpeg;base64,not base64!")).is_err());
    }

    #[test]
    fn backend_frame_is_reclassified() {
        let (frame, model_used) = frame_from_backend(json!({
            "violence_detected": true,
            "confidence": 72.6,
            "threat_level": "High",
            "model_used": true
        }))
        .unwrap();

        assert_eq!(frame.confidence, 73);
        assert_eq!(frame.threat_level, shopguard_detection_models::ThreatLevel::Medium);
        assert!(model_used);

        let err = frame_from_backend(json!({"violence_detected": true, "confidence": 140}))
            .unwrap_err();
        assert!(matches!(err, BackendError::Decode(_)));
    }

    #[test]
    fn backend_summary_is_reaggregated() {
        let summary = summary_from_backend(json!({
            "results": {
                "totalFrames": 900,
                "processedFrames": 30,
                "processingTime": 15.0,
                "overallThreatLevel": "High",
                "detections": [
                    {"timestamp": 50.0, "confidence": 90, "detected": true, "description": "b"},
                    {"timestamp": 10.0, "confidence": 72, "detected": true, "description": "a"}
                ]
            }
        }))
        .unwrap();

        assert_eq!(summary.average_confidence, 81);
        assert_eq!(summary.detections[0].description, "a");
        assert_eq!(summary.summary.time_ranges.len(), 2);

        let err = summary_from_backend(json!({
            "totalFrames": 10,
            "processedFrames": 20,
            "detections": []
        }))
        .unwrap_err();
        assert!(matches!(err, BackendError::Decode(_)));
    }

    #[actix_web::test]
    async fn health_reports_backend_state() {
        let state = offline_state(Box::new(SeededRandom::new(1)));
        let app = actix_test::init_service(App::new().app_data(state).configure(configure)).await;

        let req = actix_test::TestRequest::get().uri("/api/health").to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["healthy"], true);
        assert_eq!(body["backendOnline"], false);
        assert!(body["lastChecked"].is_null());
    }

    #[actix_web::test]
    async fn detect_frame_rejects_bad_input() {
        let state = offline_state(Box::new(SeededRandom::new(1)));
        let app = actix_test::init_service(App::new().app_data(state).configure(configure)).await;

        for payload in [json!({}), json!({"image": "not-a-data-url"})] {
            let req = actix_test::TestRequest::post()
                .uri("/api/detect-frame")
                .set_json(payload)
                .to_request();
            let resp = actix_test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

            let body: Value = actix_test::read_body_json(resp).await;
            assert!(body["error"].as_str().unwrap().starts_with("Bad request:"));
        }

        let req = actix_test::TestRequest::post()
            .uri("/api/detect-frame")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn detect_frame_falls_back_and_raises_alert() {
        // 0.1 < 0.15 flags the frame; 0.999 picks confidence 95.
        let state = offline_state(Box::new(FixedSequence::new(vec![0.1, 0.999])));
        let app =
            actix_test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/detect-frame")
            .set_json(json!({"image": PNG, "camera_id": "cam_009", "location": "Aisle 9"}))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body: Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["demoMode"], true);
        assert!(body["error"].as_str().unwrap().starts_with("Backend offline:"));
        assert_eq!(body["violence_detected"], true);
        assert_eq!(body["confidence"], 95);
        assert_eq!(body["threat_level"], "High");
        assert_eq!(body["model_used"], false);
        assert_eq!(body["alert_created"], true);

        let alert = state
            .alerts
            .get(body["alert_id"].as_str().unwrap())
            .await
            .unwrap();
        assert_eq!(alert.location, "Aisle 9");
        assert_eq!(alert.metadata.camera_id.as_deref(), Some("cam_009"));
    }

    #[actix_web::test]
    async fn analyze_video_requires_a_named_file() {
        let state = offline_state(Box::new(SeededRandom::new(1)));
        let app = actix_test::init_service(App::new().app_data(state).configure(configure)).await;

        let missing = upload_request(multipart_body(&[("sensitivity", None, "high")]));
        let resp = actix_test::call_service(&app, missing.to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["error"], "Bad request: No video file provided");

        let unnamed = upload_request(multipart_body(&[("video", Some(""), "FAKE")]));
        let resp = actix_test::call_service(&app, unnamed.to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["error"], "Bad request: No video file selected");
    }

    #[actix_web::test]
    async fn analyze_video_falls_back_to_synthesized_results() {
        let state = offline_state(Box::new(SeededRandom::new(7)));
        let app =
            actix_test::init_service(App::new().app_data(state.clone()).configure(configure)).await;
        let before = state.alerts.stats().await.unwrap().total;

        let req = upload_request(multipart_body(&[
            ("video", Some("aisle.mp4"), "FAKEVIDEOBYTES"),
            ("sensitivity", None, "high"),
        ]));
        let resp = actix_test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body: Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["demoMode"], true);
        assert_eq!(body["status"], "completed");
        assert_eq!(body["progress"], 100);
        assert_eq!(body["filename"], "aisle.mp4");

        let results = &body["results"];
        let detections = results["detections"].as_array().unwrap();
        assert!((4..14).contains(&detections.len()));
        assert_eq!(results["totalFrames"], results["processedFrames"]);

        let expected_alerts = detections
            .iter()
            .filter(|d| d["confidence"].as_f64().unwrap() > 70.0)
            .count();
        assert_eq!(body["alertsCreated"], expected_alerts);

        let after = state.alerts.stats().await.unwrap().total;
        assert_eq!(after - before, expected_alerts as u64);
    }

    #[actix_web::test]
    async fn list_alerts_filters_and_reports_stats() {
        let state = offline_state(Box::new(SeededRandom::new(1)));
        let app = actix_test::init_service(App::new().app_data(state).configure(configure)).await;

        let req = actix_test::TestRequest::get()
            .uri("/api/alerts?status=active&type=all")
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["total"], 1);
        assert_eq!(body["alerts"][0]["status"], "active");
        assert_eq!(body["stats"]["total"], 3);
        assert_eq!(body["limit"], 50);

        let req = actix_test::TestRequest::get()
            .uri("/api/alerts?severity=critical")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn create_and_update_alert() {
        let state = offline_state(Box::new(SeededRandom::new(1)));
        let app = actix_test::init_service(App::new().app_data(state).configure(configure)).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/alerts")
            .set_json(json!({
                "type": "suspicious",
                "severity": "medium",
                "confidence": 74.0,
                "location": "Camera 5 - Checkout",
                "description": "Repeated visits without purchase"
            }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: Value = actix_test::read_body_json(resp).await;
        assert_eq!(created["status"], "active");
        let id = created["id"].as_str().unwrap().to_string();

        let req = actix_test::TestRequest::put()
            .uri(&format!("/api/alerts/{id}"))
            .set_json(json!({"status": "closed"}))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = actix_test::TestRequest::put()
            .uri("/api/alerts/does-not-exist")
            .set_json(json!({"status": "resolved"}))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = actix_test::TestRequest::put()
            .uri(&format!("/api/alerts/{id}"))
            .set_json(json!({"status": "acknowledged"}))
            .to_request();
        let updated: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(updated["status"], "acknowledged");
        assert_eq!(updated["statusHistory"][0]["from"], "active");
    }

    #[actix_web::test]
    async fn create_alert_rejects_invalid_confidence() {
        let state = offline_state(Box::new(SeededRandom::new(1)));
        let app = actix_test::init_service(App::new().app_data(state).configure(configure)).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/alerts")
            .set_json(json!({
                "type": "theft",
                "severity": "high",
                "confidence": 140.0,
                "location": "Camera 1",
                "description": "Concealment"
            }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn dashboard_stats_fall_back_to_zeroes() {
        let state = offline_state(Box::new(SeededRandom::new(1)));
        let app = actix_test::init_service(App::new().app_data(state).configure(configure)).await;

        let req = actix_test::TestRequest::get()
            .uri("/api/dashboard-stats")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body: Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["totalCameras"], 0);
        assert_eq!(body["alertsToday"], 0);
        assert_eq!(body["demoMode"], true);
        assert!(body["error"].as_str().unwrap().starts_with("Backend offline:"));
    }
}
