// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact Gateway
//!
//! This crate provides the rate-limited intake pipeline behind a website
//! contact form:
//!
//! - Per-client fixed-window rate limiting (5 attempts per 60 s default)
//! - Field validation of the submitted form
//! - Pluggable delivery sink (log, webhook)
//! - A form client that mirrors the server rules

pub mod client;
pub mod config;
pub mod error;
pub mod form;
pub mod handlers;
pub mod limiter;
pub mod metrics;
pub mod sink;
pub mod validator;

pub use config::Config;
pub use error::ContactError;
pub use limiter::{FixedWindowLimiter, RateLimitResult, RateLimitStore};
pub use sink::{LogSink, RejectingSink, SubmissionSink, WebhookSink};
pub use validator::{validate, ContactSubmission, ValidationError};
