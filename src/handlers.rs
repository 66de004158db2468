// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers for the contact gateway.
//!
//! `POST /api/contact` runs each request through the same linear pipeline:
//! identify the client, consume a rate-limit attempt, read and decode the body,
//! validate, deliver to the sink, and shape the response. Every failure is
//! converted to a [`ContactError`] at this boundary.

use crate::config::{Config, CorsConfig};
use crate::error::ContactError;
use crate::limiter::{RateLimitResult, RateLimitStore};
use crate::metrics::{Metrics, Outcome};
use crate::sink::{DeliveryError, SubmissionSink};
use crate::validator::{self, ContactSubmission, ValidationError};
use axum::{
    body::{to_bytes, Body},
    extract::State,
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::any::Any;
use std::sync::Arc;
use std::time::Instant;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{debug, error, info, warn};

/// Forwarded-client-address header, first entry wins.
pub const FORWARDED_FOR: &str = "x-forwarded-for";
/// Direct-connection-address header set by the edge proxy.
pub const REAL_IP: &str = "x-real-ip";
/// Client address used when no header identifies the caller.
pub const UNKNOWN_CLIENT: &str = "unknown";

pub const SUCCESS_MESSAGE: &str = "Thank you for reaching out! We will get back to you soon.";

/// Shared application state.
pub struct AppState {
    pub limiter: Arc<dyn RateLimitStore>,
    pub sink: Arc<dyn SubmissionSink>,
    pub metrics: Metrics,
    pub config: Config,
}

impl AppState {
    pub fn new(
        config: Config,
        limiter: Arc<dyn RateLimitStore>,
        sink: Arc<dyn SubmissionSink>,
    ) -> prometheus::Result<Self> {
        Ok(Self {
            limiter,
            sink,
            metrics: Metrics::new()?,
            config,
        })
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Successful submission response.
#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
}

/// Build the service router.
pub fn router(state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/api/contact", post(contact));

    if state.config.metrics.enabled {
        let path = state.config.metrics.path.clone();
        app = app.route(&path, get(metrics));
    }

    let panic_metrics = state.metrics.clone();
    let mut app = app
        .layer(CatchPanicLayer::custom(move |panic: Box<dyn Any + Send>| {
            panic_metrics.record(Outcome::Internal);
            error!(panic = %panic_message(panic.as_ref()), "Handler panicked");
            ContactError::Internal("handler panicked".to_string()).into_response()
        }))
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = cors_layer(&state.config.cors) {
        app = app.layer(cors);
    }

    app.with_state(state)
}

fn cors_layer(config: &CorsConfig) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|o| o.trim().parse().ok())
        .collect();

    if origins.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE]),
    )
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&str>() {
        *s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "contact-gateway",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Prometheus metrics endpoint.
pub async fn metrics(State(state): State<Arc<AppState>>) -> Response {
    match state.metrics.render() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => {
            warn!(error = %e, "Failed to render metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Accept a contact form submission.
pub async fn contact(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Body,
) -> Response {
    let client = client_address(&headers);

    match process_submission(&state, client, body).await {
        Ok(()) => {
            state.metrics.record(Outcome::Accepted);
            info!(client = %client, "Contact submission accepted");
            (
                StatusCode::OK,
                Json(ContactResponse {
                    success: true,
                    message: SUCCESS_MESSAGE.to_string(),
                }),
            )
                .into_response()
        }
        Err(err) => {
            state.metrics.record(err.outcome());
            match &err {
                ContactError::DeliveryFailed(_) | ContactError::Internal(_) => {
                    warn!(client = %client, error = %err, "Contact submission failed");
                }
                _ => info!(client = %client, error = %err, "Contact submission rejected"),
            }
            err.into_response()
        }
    }
}

async fn process_submission(
    state: &AppState,
    client: &str,
    body: Body,
) -> Result<(), ContactError> {
    let key = format!("{}{}", state.config.rate_limit.key_prefix, client);

    match state.limiter.check_and_consume(&key, Instant::now()).await {
        RateLimitResult::Allowed { remaining, .. } => {
            debug!(client = %client, remaining, "Rate limit check passed");
        }
        RateLimitResult::Denied { retry_after_secs } => {
            return Err(ContactError::RateLimited { retry_after_secs });
        }
    }

    // Read only after the gate; oversized bodies fail here.
    let bytes = to_bytes(body, state.config.max_body_bytes)
        .await
        .map_err(|e| ContactError::MalformedRequest(e.to_string()))?;

    let raw: serde_json::Value = serde_json::from_slice(&bytes)
        .map_err(|e| ContactError::MalformedRequest(e.to_string()))?;

    let submission = validator::validate(&raw).map_err(|e| match e {
        ValidationError::NotAnObject => ContactError::MalformedRequest(e.to_string()),
        ValidationError::Fields(_) => ContactError::ValidationFailed(e.to_string()),
    })?;

    if !submission.email().contains('@') {
        return Err(ContactError::InvalidEmail);
    }

    deliver(state, &submission).await
}

async fn deliver(state: &AppState, submission: &ContactSubmission) -> Result<(), ContactError> {
    let timeout = state.config.sink.timeout();

    match tokio::time::timeout(timeout, state.sink.deliver(submission)).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(ContactError::DeliveryFailed(e.to_string())),
        Err(_) => Err(ContactError::DeliveryFailed(
            DeliveryError::Timeout(state.config.sink.timeout_ms).to_string(),
        )),
    }
}

/// Derive the client address from proxy headers.
///
/// First entry of `X-Forwarded-For`, then `X-Real-IP`, then `"unknown"`.
pub fn client_address(headers: &HeaderMap) -> &str {
    let forwarded = headers
        .get(FORWARDED_FOR)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    let real_ip = || {
        headers
            .get(REAL_IP)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    forwarded.or_else(real_ip).unwrap_or(UNKNOWN_CLIENT)
}
