// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Test harness for the contact gateway.
//!
//! Builds routers with test sinks, drives requests through them, and
//! simulates abusive traffic patterns against the endpoint.

#![allow(dead_code)]

pub mod attacks;
pub mod generators;
pub mod metrics;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use contact_gateway::{
    config::Config,
    handlers::{router, AppState},
    limiter::FixedWindowLimiter,
    sink::{DeliveryError, SubmissionSink},
    validator::ContactSubmission,
};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

/// Counts deliveries and always succeeds.
#[derive(Debug, Default)]
pub struct CountingSink {
    delivered: AtomicUsize,
}

impl CountingSink {
    pub fn delivered(&self) -> usize {
        self.delivered.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SubmissionSink for CountingSink {
    async fn deliver(&self, _submission: &ContactSubmission) -> Result<(), DeliveryError> {
        self.delivered.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Never finishes within any sane timeout.
pub struct StalledSink;

#[async_trait]
impl SubmissionSink for StalledSink {
    async fn deliver(&self, _submission: &ContactSubmission) -> Result<(), DeliveryError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(())
    }
}

/// Panics inside the handler.
pub struct PanickingSink;

#[async_trait]
impl SubmissionSink for PanickingSink {
    async fn deliver(&self, _submission: &ContactSubmission) -> Result<(), DeliveryError> {
        panic!("sink exploded");
    }
}

/// Shared state plus the router built from it.
pub struct TestApp {
    pub state: Arc<AppState>,
    pub router: Router,
}

impl TestApp {
    pub fn new(config: Config, sink: Arc<dyn SubmissionSink>) -> Self {
        let limiter = Arc::new(FixedWindowLimiter::from_config(&config.rate_limit));
        let state = Arc::new(AppState::new(config, limiter, sink).unwrap());
        let router = router(state.clone());
        Self { state, router }
    }

    pub fn with_sink(sink: Arc<dyn SubmissionSink>) -> Self {
        Self::new(Config::default(), sink)
    }

    /// POST a raw body to the contact endpoint from `client_ip`.
    pub async fn post_raw(&self, client_ip: Option<&str>, body: impl Into<Body>) -> (StatusCode, Value) {
        let mut request = Request::post("/api/contact").header("content-type", "application/json");
        if let Some(ip) = client_ip {
            request = request.header("x-forwarded-for", ip);
        }
        let request = request.body(body.into()).unwrap();
        self.send(request).await
    }

    /// POST a JSON body to the contact endpoint from `client_ip`.
    pub async fn post_json(&self, client_ip: &str, body: &Value) -> (StatusCode, Value) {
        self.post_raw(Some(client_ip), body.to_string()).await
    }

    pub async fn get(&self, path: &str) -> (StatusCode, String) {
        let request = Request::get(path).body(Body::empty()).unwrap();
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }
}

/// Pull the first integer out of a retry message.
pub fn retry_seconds(message: &str) -> Option<u64> {
    message
        .split(|c: char| !c.is_ascii_digit())
        .find(|s| !s.is_empty())
        .and_then(|s| s.parse().ok())
}
