// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Contact submission validator.
//!
//! Turns an untyped JSON object into a [`ContactSubmission`]:
//! - `name`: 2 to 100 characters after trimming
//! - `email`: `local@domain.tld`, at most 255 characters
//! - `company`: optional, at most 100 characters
//! - `message`: 10 to 2000 characters after trimming
//!
//! Every violation is collected so callers can report all offending fields.

use email_address::EmailAddress;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 100;
pub const EMAIL_MAX_CHARS: usize = 255;
pub const COMPANY_MAX_CHARS: usize = 100;
pub const MESSAGE_MIN_CHARS: usize = 10;
pub const MESSAGE_MAX_CHARS: usize = 2000;

/// Fields of the contact form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Email,
    Company,
    Message,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Name, Field::Email, Field::Company, Field::Message];

    /// JSON key for this field.
    pub fn key(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Company => "company",
            Field::Message => "message",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A single field violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

impl FieldError {
    fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Submission is not a JSON object")]
    NotAnObject,

    #[error("Invalid fields: {}", format_field_errors(.0))]
    Fields(Vec<FieldError>),
}

impl ValidationError {
    /// Field violations, empty for structural failures.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            ValidationError::NotAnObject => &[],
            ValidationError::Fields(errors) => errors,
        }
    }

    /// Whether `field` is among the violations.
    pub fn has_field(&self, field: Field) -> bool {
        self.field_errors().iter().any(|e| e.field == field)
    }
}

fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A contact submission that passed every field check.
///
/// Only [`validate`] constructs this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactSubmission {
    name: String,
    email: String,
    company: Option<String>,
    message: String,
}

impl ContactSubmission {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn company(&self) -> Option<&str> {
        self.company.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Validate a decoded request body.
pub fn validate(raw: &Value) -> Result<ContactSubmission, ValidationError> {
    let object = raw.as_object().ok_or(ValidationError::NotAnObject)?;

    let mut errors = Vec::new();
    let name = collect(&mut errors, check_name(string_field(object, Field::Name)));
    let email = collect(&mut errors, check_email(string_field(object, Field::Email)));
    let company = collect(&mut errors, check_company(string_field(object, Field::Company)));
    let message = collect(&mut errors, check_message(string_field(object, Field::Message)));

    match (name, email, company, message) {
        (Some(name), Some(email), Some(company), Some(message)) if errors.is_empty() => {
            debug!(email = %email, has_company = company.is_some(), "Submission valid");
            Ok(ContactSubmission {
                name,
                email,
                company,
                message,
            })
        }
        _ => {
            let fields: Vec<Field> = errors.iter().map(|e| e.field).collect();
            debug!(?fields, "Submission invalid");
            Err(ValidationError::Fields(errors))
        }
    }
}

/// Validate one field's raw text, as the form does on blur.
///
/// `None` means the field was left empty.
pub fn validate_field(field: Field, value: Option<&str>) -> Result<(), FieldError> {
    let value = Ok(value);
    match field {
        Field::Name => check_name(value).map(drop),
        Field::Email => check_email(value).map(drop),
        Field::Company => check_company(value).map(drop),
        Field::Message => check_message(value).map(drop),
    }
}

/// Field lookup result: `Ok(None)` for absent or null, `Err` for a non-string.
type RawField<'a> = Result<Option<&'a str>, FieldError>;

fn string_field(object: &Map<String, Value>, field: Field) -> RawField<'_> {
    match object.get(field.key()) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(FieldError::new(field, format!("{} must be text", capitalized(field)))),
    }
}

fn collect<T>(errors: &mut Vec<FieldError>, result: Result<T, FieldError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            errors.push(e);
            None
        }
    }
}

fn check_name(raw: RawField<'_>) -> Result<String, FieldError> {
    let name = required(Field::Name, raw?)?;
    check_length(Field::Name, &name, NAME_MIN_CHARS, NAME_MAX_CHARS)?;
    Ok(name)
}

fn check_email(raw: RawField<'_>) -> Result<String, FieldError> {
    let email = required(Field::Email, raw?)?;

    if email.chars().count() > EMAIL_MAX_CHARS {
        return Err(FieldError::new(
            Field::Email,
            format!("Email must be less than {EMAIL_MAX_CHARS} characters"),
        ));
    }

    if !is_valid_email(&email) {
        return Err(FieldError::new(Field::Email, "Please enter a valid email address"));
    }

    Ok(email)
}

fn check_company(raw: RawField<'_>) -> Result<Option<String>, FieldError> {
    let company = match raw?.map(str::trim) {
        None | Some("") => return Ok(None),
        Some(c) => c.to_string(),
    };

    if company.chars().count() > COMPANY_MAX_CHARS {
        return Err(FieldError::new(
            Field::Company,
            format!("Company name must be less than {COMPANY_MAX_CHARS} characters"),
        ));
    }

    Ok(Some(company))
}

fn check_message(raw: RawField<'_>) -> Result<String, FieldError> {
    let message = required(Field::Message, raw?)?;
    check_length(Field::Message, &message, MESSAGE_MIN_CHARS, MESSAGE_MAX_CHARS)?;
    Ok(message)
}

fn required(field: Field, value: Option<&str>) -> Result<String, FieldError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(FieldError::new(field, format!("{} is required", capitalized(field)))),
    }
}

fn check_length(field: Field, value: &str, min: usize, max: usize) -> Result<(), FieldError> {
    let len = value.chars().count();
    if len < min {
        return Err(FieldError::new(
            field,
            format!("{} must be at least {min} characters", capitalized(field)),
        ));
    }
    if len > max {
        return Err(FieldError::new(
            field,
            format!("{} must be less than {max} characters", capitalized(field)),
        ));
    }
    Ok(())
}

/// Exactly one `@`, a non-empty local part, and a dotted domain with no
/// empty labels, on top of the RFC 5322 grammar check.
fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if email.chars().any(char::is_whitespace) {
        return false;
    }

    if local.is_empty() || domain.contains('@') || !domain.contains('.') {
        return false;
    }

    if domain.split('.').any(str::is_empty) {
        return false;
    }

    EmailAddress::from_str(email).is_ok()
}

fn capitalized(field: Field) -> &'static str {
    match field {
        Field::Name => "Name",
        Field::Email => "Email",
        Field::Company => "Company",
        Field::Message => "Message",
    }
}
