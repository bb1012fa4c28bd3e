//! Form checks run before any request leaves the client.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{Credentials, NewTask, Registration, TaskPatch};
use crate::error::ValidationErrors;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z ]+$").expect("valid name regex"));

pub const MIN_PASSWORD_LEN: usize = 6;

pub fn validate_login(credentials: &Credentials) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    check_email(&credentials.email, &mut errors);
    if credentials.password.is_empty() {
        errors.add("password", "Password is required");
    }

    errors.into_result()
}

pub fn validate_registration(registration: &Registration) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if registration.name.trim().is_empty() {
        errors.add("name", "Name is required");
    } else if !NAME_RE.is_match(&registration.name) {
        errors.add("name", "Only alphabets allowed");
    }

    check_email(&registration.email, &mut errors);

    if registration.password.is_empty() {
        errors.add("password", "Password is required");
    } else if !is_strong_password(&registration.password) {
        errors.add(
            "password",
            "Must contain 1 uppercase, 1 number, 1 symbol and minimum 6 characters",
        );
    }

    if registration.confirm_password.is_empty() {
        errors.add("confirmPassword", "Please confirm your password");
    } else if registration.password != registration.confirm_password {
        errors.add("confirmPassword", "Passwords do not match");
    }

    errors.into_result()
}

pub fn validate_new_task(task: &NewTask) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if task.title.trim().is_empty() {
        errors.add("title", "Task title is required");
    }
    errors.into_result()
}

pub fn validate_patch(patch: &TaskPatch) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if patch.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        errors.add("title", "Task title is required");
    }
    errors.into_result()
}

/// At least one uppercase letter, one digit, one symbol and six characters.
pub fn is_strong_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| !c.is_ascii_alphanumeric())
}

fn check_email(email: &str, errors: &mut ValidationErrors) {
    if email.trim().is_empty() {
        errors.add("email", "Email is required");
    } else if !EMAIL_RE.is_match(email) {
        errors.add("email", "Invalid email format");
    }
}
