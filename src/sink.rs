// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Destinations for accepted contact submissions.

use crate::config::{ConfigError, SinkConfig, SinkKind};
use crate::validator::ContactSubmission;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Delivery failures. All of them are reported to the client as retryable.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Sink rejected the submission: {0}")]
    Rejected(String),

    #[error("Webhook returned status {0}")]
    Status(u16),

    #[error("Webhook request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Delivery timed out after {0} ms")]
    Timeout(u64),
}

/// Capability to hand a validated submission to its destination.
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    async fn deliver(&self, submission: &ContactSubmission) -> Result<(), DeliveryError>;
}

/// Logs each submission and always succeeds.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

#[async_trait]
impl SubmissionSink for LogSink {
    async fn deliver(&self, submission: &ContactSubmission) -> Result<(), DeliveryError> {
        info!(
            name = %submission.name(),
            email = %submission.email(),
            company = ?submission.company(),
            message = %submission.message(),
            timestamp = %Utc::now().to_rfc3339(),
            "Contact form submission"
        );
        Ok(())
    }
}

/// Fails every delivery.
#[derive(Debug, Clone)]
pub struct RejectingSink {
    reason: String,
}

impl RejectingSink {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Default for RejectingSink {
    fn default() -> Self {
        Self::new("sink unavailable")
    }
}

#[async_trait]
impl SubmissionSink for RejectingSink {
    async fn deliver(&self, _submission: &ContactSubmission) -> Result<(), DeliveryError> {
        Err(DeliveryError::Rejected(self.reason.clone()))
    }
}

/// JSON payload posted by [`WebhookSink`].
#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    #[serde(flatten)]
    submission: &'a ContactSubmission,
    received_at: DateTime<Utc>,
}

/// Posts each submission as JSON to a fixed URL.
pub struct WebhookSink {
    url: String,
    client: reqwest::Client,
}

impl WebhookSink {
    /// Create a new webhook sink
    pub fn new(url: String) -> Self {
        Self {
            url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl SubmissionSink for WebhookSink {
    async fn deliver(&self, submission: &ContactSubmission) -> Result<(), DeliveryError> {
        let payload = WebhookPayload {
            submission,
            received_at: Utc::now(),
        };

        let response = self.client.post(&self.url).json(&payload).send().await?;

        if response.status().is_success() {
            Ok(())
        } else {
            warn!(url = %self.url, status = %response.status(), "Webhook rejected submission");
            Err(DeliveryError::Status(response.status().as_u16()))
        }
    }
}

/// Build the sink selected by configuration.
pub fn from_config(config: &SinkConfig) -> Result<Arc<dyn SubmissionSink>, ConfigError> {
    match (config.kind, config.webhook_url.as_ref()) {
        (SinkKind::Webhook, Some(url)) => Ok(Arc::new(WebhookSink::new(url.clone()))),
        (SinkKind::Webhook, None) => Err(ConfigError::Invalid {
            field: "sink.webhook_url",
            reason: "required when sink.kind is webhook".to_string(),
        }),
        (SinkKind::Log, _) => Ok(Arc::new(LogSink)),
    }
}
