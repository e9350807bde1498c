//! Field-level checks shared by the request validators.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::errors::ValidationErrors;

static ISO_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());
static SLUG: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9-]+$").unwrap());

pub fn is_valid_email(email: &str) -> bool {
    if email.is_empty() || email.len() > 254 {
        return false;
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return false;
    }

    let (local_part, domain_part) = (parts[0], parts[1]);
    if local_part.is_empty() || domain_part.is_empty() {
        return false;
    }
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    domain_part.contains('.') && !domain_part.starts_with('.') && !domain_part.ends_with('.')
}

pub fn is_valid_url(value: &str) -> bool {
    Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

pub fn is_valid_slug(value: &str) -> bool {
    SLUG.is_match(value)
}

/// Parses a strict `YYYY-MM-DD` calendar date.
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    if !ISO_DATE.is_match(value) {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Length checks count characters, not bytes, so Polish text is measured fairly.
pub fn check_length(
    errors: &mut ValidationErrors,
    field: &str,
    value: &str,
    min: usize,
    max: usize,
    required_message: &str,
) {
    let len = value.trim().chars().count();
    if len < min {
        errors.add(field, required_message);
    } else if len > max {
        errors.add(field, format!("Must be at most {} characters long", max));
    }
}

pub fn check_max_length(errors: &mut ValidationErrors, field: &str, value: &str, max: usize) {
    if value.chars().count() > max {
        errors.add(field, format!("Must be at most {} characters long", max));
    }
}

pub fn check_not_blank(errors: &mut ValidationErrors, field: &str, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.add(field, message);
    }
}
