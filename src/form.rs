// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact form state.
//!
//! Mirrors the server's field rules for on-blur feedback, submits through
//! [`ContactClient`], and tracks a three-state status. A success message is
//! shown for [`SUCCESS_DISPLAY`] and then reverts to idle on the next
//! [`ContactForm::tick`].

use crate::client::{ClientError, ContactClient, ContactFormData, SubmitResponse};
use crate::validator::{validate_field, Field};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::warn;

/// How long a success message stays visible.
pub const SUCCESS_DISPLAY: Duration = Duration::from_secs(5);

pub const FALLBACK_SUCCESS: &str = "Message sent successfully!";
pub const FALLBACK_ERROR: &str = "Failed to send message. Please try again.";
pub const TRANSPORT_ERROR: &str = "An error occurred. Please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitStatus {
    #[default]
    Idle,
    Success,
    Error,
}

#[derive(Debug, Default)]
pub struct ContactForm {
    name: String,
    email: String,
    company: String,
    message: String,
    field_errors: HashMap<Field, String>,
    status: SubmitStatus,
    status_message: String,
    submitting: bool,
    success_until: Option<Instant>,
}

impl ContactForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        *self.slot(field) = value.into();
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Company => &self.company,
            Field::Message => &self.message,
        }
    }

    /// Validate one field as it loses focus. Returns its error, if any.
    pub fn blur(&mut self, field: Field) -> Option<&str> {
        self.check(field);
        self.field_error(field)
    }

    pub fn field_error(&self, field: Field) -> Option<&str> {
        self.field_errors.get(&field).map(String::as_str)
    }

    pub fn status(&self) -> SubmitStatus {
        self.status
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    /// Whether the submit control is disabled.
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Validate everything, send, and record the outcome.
    ///
    /// Nothing is sent while any field is invalid. Dropping the returned
    /// future mid-request leaves the form ready to submit again.
    pub async fn submit(&mut self, client: &ContactClient) -> SubmitStatus {
        if self.submitting {
            return self.status;
        }

        self.set_status(SubmitStatus::Idle, "");
        self.success_until = None;

        let mut valid = true;
        for field in Field::ALL {
            valid &= self.check(field);
        }

        if valid {
            let payload = self.payload();
            let result = {
                let _in_flight = InFlight::start(&mut self.submitting);
                client.submit(&payload).await
            };
            self.apply(result);
        }

        self.status
    }

    /// Revert an expired success message to idle.
    pub fn tick(&mut self, now: Instant) {
        if let Some(until) = self.success_until {
            if now >= until {
                self.success_until = None;
                self.set_status(SubmitStatus::Idle, "");
            }
        }
    }

    fn apply(&mut self, result: Result<SubmitResponse, ClientError>) {
        match result {
            Ok(response) if response.is_success() => {
                let message = response.body.message.as_deref().unwrap_or(FALLBACK_SUCCESS);
                self.set_status(SubmitStatus::Success, message);
                self.reset_fields();
                self.success_until = Some(Instant::now() + SUCCESS_DISPLAY);
            }
            Ok(response) => {
                let message = response.body.error.as_deref().unwrap_or(FALLBACK_ERROR);
                self.set_status(SubmitStatus::Error, message);
            }
            Err(e) => {
                warn!(error = %e, "Contact form error");
                self.set_status(SubmitStatus::Error, TRANSPORT_ERROR);
            }
        }
    }

    fn check(&mut self, field: Field) -> bool {
        let value = self.value(field);
        let value = (!value.trim().is_empty()).then_some(value);

        match validate_field(field, value) {
            Ok(()) => {
                self.field_errors.remove(&field);
                true
            }
            Err(e) => {
                self.field_errors.insert(field, e.message);
                false
            }
        }
    }

    fn payload(&self) -> ContactFormData {
        ContactFormData {
            name: self.name.clone(),
            email: self.email.clone(),
            company: (!self.company.trim().is_empty()).then(|| self.company.clone()),
            message: self.message.clone(),
        }
    }

    fn set_status(&mut self, status: SubmitStatus, message: &str) {
        self.status = status;
        self.status_message = message.to_string();
    }

    fn reset_fields(&mut self) {
        for field in Field::ALL {
            self.slot(field).clear();
        }
        self.field_errors.clear();
    }

    fn slot(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
            Field::Company => &mut self.company,
            Field::Message => &mut self.message,
        }
    }
}

/// Holds the submitting flag for the duration of a request.
struct InFlight<'a>(&'a mut bool);

impl<'a> InFlight<'a> {
    fn start(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}
