// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP client for the contact endpoint.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Path of the contact endpoint relative to the site root.
pub const CONTACT_PATH: &str = "api/contact";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    #[error("Request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Response was not valid JSON: {0}")]
    InvalidResponse(#[source] reqwest::Error),
}

/// Raw form values as sent over the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactFormData {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub message: String,
}

/// Union of the endpoint's success and error bodies.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Status and decoded body of a submission.
#[derive(Debug, Clone)]
pub struct SubmitResponse {
    pub status: u16,
    pub body: ApiResponse,
}

impl SubmitResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Contact endpoint client
pub struct ContactClient {
    endpoint: Url,
    client: reqwest::Client,
}

impl ContactClient {
    /// Create a client for the site rooted at `base_url`.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self {
            endpoint: base.join(CONTACT_PATH)?,
            client: reqwest::Client::new(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// POST form data as JSON and decode the JSON reply.
    pub async fn submit(&self, data: &ContactFormData) -> Result<SubmitResponse, ClientError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(data)
            .send()
            .await
            .map_err(ClientError::Transport)?;

        let status = response.status().as_u16();
        let body = response
            .json::<ApiResponse>()
            .await
            .map_err(ClientError::InvalidResponse)?;

        Ok(SubmitResponse { status, body })
    }
}
