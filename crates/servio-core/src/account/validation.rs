//! Client-side validation of account forms.
//!
//! These checks run before any network call. A form that fails them is never
//! submitted; the collected [`FieldErrors`] are shown next to the inputs.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::field_errors::FieldErrors;

use super::model::{ClientRegistrationForm, LoginForm, WorkerRegistrationForm};

pub const MIN_PASSWORD_LENGTH: usize = 8;

pub const MSG_REQUIRED: &str = "This field is required.";
pub const MSG_INVALID_EMAIL: &str = "Enter a valid email address.";
pub const MSG_PASSWORD_TOO_SHORT: &str = "Password must be at least 8 characters.";
pub const MSG_PASSWORD_MISMATCH: &str = "Passwords do not match.";
pub const MSG_TERMS_REQUIRED: &str = "You must accept the terms and conditions.";
pub const MSG_CATEGORY_REQUIRED: &str = "Select the category you work in.";

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
});

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email.trim())
}

pub fn validate_login(form: &LoginForm) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    check_email(&mut errors, "email", &form.email);
    check_required(&mut errors, "password", &form.password);
    errors.into_result()
}

pub fn validate_password_reset(email: &str) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    check_email(&mut errors, "email", email);
    errors.into_result()
}

pub fn validate_client_registration(form: &ClientRegistrationForm) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    collect_account_errors(&mut errors, form);
    errors.into_result()
}

pub fn validate_worker_registration(form: &WorkerRegistrationForm) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    collect_account_errors(&mut errors, &form.account);
    if form.category_id.is_none() {
        errors.add("category", MSG_CATEGORY_REQUIRED);
    }
    errors.into_result()
}

fn collect_account_errors(errors: &mut FieldErrors, form: &ClientRegistrationForm) {
    check_required(errors, "username", &form.username);
    check_email(errors, "email", &form.email);
    check_required(errors, "first_name", &form.first_name);
    check_required(errors, "last_name", &form.last_name);

    if form.password.is_empty() {
        errors.add("password", MSG_REQUIRED);
    } else if form.password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.add("password", MSG_PASSWORD_TOO_SHORT);
    }
    if form.password != form.confirm_password {
        errors.add("confirm_password", MSG_PASSWORD_MISMATCH);
    }

    if !form.accept_terms {
        errors.add("accept_terms", MSG_TERMS_REQUIRED);
    }
}

fn check_required(errors: &mut FieldErrors, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.add(field, MSG_REQUIRED);
    }
}

fn check_email(errors: &mut FieldErrors, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.add(field, MSG_REQUIRED);
    } else if !is_valid_email(value) {
        errors.add(field, MSG_INVALID_EMAIL);
    }
}
