//! Field rules for users and microposts.
//!
//! Every rule reports into a [`ValidationErrors`] under the field it checks,
//! with a short machine code (`blank`, `too_long`, `too_short`,
//! `invalid_format`, `taken`, `confirmation`) and a human readable message.
//! Rules never stop at the first failure so callers get the full picture.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;
use validator::{Validate, ValidationError, ValidationErrors};

pub const NAME_MAX_LENGTH: usize = 50;
pub const EMAIL_MAX_LENGTH: usize = 255;
pub const PASSWORD_MIN_LENGTH: usize = 6;
pub const MICROPOST_MAX_LENGTH: usize = 140;

/// `local@label(.label)*.tld`: the local part takes word characters, `+`,
/// `.` and `-`; domain labels take letters, digits and `-` only, are
/// separated by single dots and end in an alphabetic top-level label.
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[a-z0-9_+.\-]+@[a-z0-9\-]+(?:\.[a-z0-9\-]+)*\.[a-z]+$")
        .expect("EMAIL_REGEX is a valid regex pattern")
});

/// A single failed rule, flattened for transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMessage {
    pub field: String,
    pub code: String,
    pub message: String,
}

/// Candidate for a new user; the password pair is transient.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Checked against `password` only when present.
    pub password_confirmation: Option<String>,
}

/// Partial update of an existing user. Absent fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub password_confirmation: Option<String>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.password.is_none()
    }
}

/// Candidate micropost body.
#[derive(Debug, Clone)]
pub struct NewMicropost {
    pub content: String,
}

impl Validate for NewUser {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_name(&mut errors, &self.name);
        check_email(&mut errors, &self.email);
        check_password(
            &mut errors,
            &self.password,
            self.password_confirmation.as_deref(),
        );
        into_result(errors)
    }
}

impl Validate for UserChanges {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(name) = &self.name {
            check_name(&mut errors, name);
        }
        if let Some(email) = &self.email {
            check_email(&mut errors, email);
        }
        if let Some(password) = &self.password {
            check_password(&mut errors, password, self.password_confirmation.as_deref());
        }
        into_result(errors)
    }
}

impl Validate for NewMicropost {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if is_blank(&self.content) {
            errors.add("content", blank());
        }
        if self.content.chars().count() > MICROPOST_MAX_LENGTH {
            errors.add("content", too_long(MICROPOST_MAX_LENGTH));
        }
        into_result(errors)
    }
}

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

pub fn check_name(errors: &mut ValidationErrors, name: &str) {
    if is_blank(name) {
        errors.add("name", blank());
    }
    if name.chars().count() > NAME_MAX_LENGTH {
        errors.add("name", too_long(NAME_MAX_LENGTH));
    }
}

pub fn check_email(errors: &mut ValidationErrors, email: &str) {
    if is_blank(email) {
        errors.add("email", blank());
    }
    if email.chars().count() > EMAIL_MAX_LENGTH {
        errors.add("email", too_long(EMAIL_MAX_LENGTH));
    }
    if !is_blank(email) && !is_valid_email(email) {
        errors.add("email", rule("invalid_format", "is invalid"));
    }
}

/// Presence and minimum length are independent rules. A blank password
/// counts as zero characters long, so all-space input fails both.
pub fn check_password(errors: &mut ValidationErrors, password: &str, confirmation: Option<&str>) {
    let blank_password = is_blank(password);
    if blank_password {
        errors.add("password", blank());
    }
    if blank_password || password.chars().count() < PASSWORD_MIN_LENGTH {
        let mut error = rule(
            "too_short",
            format!("is too short (minimum is {PASSWORD_MIN_LENGTH} characters)"),
        );
        error.add_param(Cow::from("min"), &PASSWORD_MIN_LENGTH);
        errors.add("password", error);
    }
    if let Some(confirmation) = confirmation {
        if confirmation != password {
            errors.add(
                "password_confirmation",
                rule("confirmation", "doesn't match Password"),
            );
        }
    }
}

pub(crate) fn taken() -> ValidationError {
    rule("taken", "has already been taken")
}

/// Flattens the collected errors into `field`/`code`/`message` triples,
/// ordered by field name.
pub fn field_messages(errors: &ValidationErrors) -> Vec<FieldMessage> {
    let mut messages: Vec<FieldMessage> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, list)| {
            let field = field.to_string();
            list.iter().map(move |error| FieldMessage {
                field: field.clone(),
                code: error.code.to_string(),
                message: error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| error.code.to_string()),
            })
        })
        .collect();
    messages.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.code.cmp(&b.code)));
    messages
}

fn rule(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

fn blank() -> ValidationError {
    rule("blank", "can't be blank")
}

fn too_long(max: usize) -> ValidationError {
    let mut error = rule(
        "too_long",
        format!("is too long (maximum is {max} characters)"),
    );
    error.add_param(Cow::from("max"), &max);
    error
}

fn into_result(errors: ValidationErrors) -> Result<(), ValidationErrors> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
