//! Input validation helpers
//!
//! Helpers return `Result<_, String>` so both layers can wrap the message:
//! repositories with `RepoError::Validation`, handlers with `AppError::validation`.
//! Text inputs are trimmed; an empty optional becomes `None`.

use chrono::{NaiveDate, NaiveTime};

// ── Text length limits ──────────────────────────────────────────────

/// Names: employee, department, office, task title
pub const MAX_NAME_LEN: usize = 200;

/// Notes, descriptions, reasons
pub const MAX_NOTE_LEN: usize = 2000;

/// Short identifiers: phone, position, device info
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// Addresses
pub const MAX_ADDRESS_LEN: usize = 500;

// ── Helpers ─────────────────────────────────────────────────────────

/// Required string: present, non-empty after trim, within the limit.
pub fn required_text(value: Option<&str>, field: &str, max_len: usize) -> Result<String, String> {
    let value = value.map(str::trim).unwrap_or_default();
    if value.is_empty() {
        return Err(format!("{field} is required"));
    }
    if value.chars().count() > max_len {
        return Err(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.chars().count()
        ));
    }
    Ok(value.to_string())
}

/// Optional string within the limit.
pub fn optional_text(
    value: Option<&str>,
    field: &str,
    max_len: usize,
) -> Result<Option<String>, String> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) if v.chars().count() > max_len => Err(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.chars().count()
        )),
        Some(v) => Ok(Some(v.to_string())),
    }
}

/// Email: required, one `@` with text on both sides.
pub fn email(value: Option<&str>) -> Result<String, String> {
    let value = required_text(value, "email", MAX_EMAIL_LEN)?;
    match value.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(value)
        }
        _ => Err(format!("email is invalid: {value}")),
    }
}

/// Calendar date in `YYYY-MM-DD`.
pub fn date(value: &str, field: &str) -> Result<NaiveDate, String> {
    shared::util::parse_date(value)
        .ok_or_else(|| format!("{field} must be a date in YYYY-MM-DD format"))
}

/// Required calendar date.
pub fn required_date(value: Option<&str>, field: &str) -> Result<NaiveDate, String> {
    match value.map(str::trim) {
        None | Some("") => Err(format!("{field} is required")),
        Some(v) => date(v, field),
    }
}

/// Clock time in `HH:MM`.
pub fn clock_time(value: &str, field: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|_| format!("{field} must be a time in HH:MM format"))
}

/// Latitude in [-90, 90], longitude in [-180, 180].
pub fn coordinates(latitude: f64, longitude: f64) -> Result<(), String> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err(format!("latitude out of range: {latitude}"));
    }
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err(format!("longitude out of range: {longitude}"));
    }
    Ok(())
}

/// Non-negative finite amount.
pub fn non_negative(value: f64, field: &str) -> Result<f64, String> {
    if !value.is_finite() || value < 0.0 {
        return Err(format!("{field} cannot be negative: {value}"));
    }
    Ok(value)
}
