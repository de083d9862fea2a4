//! Field validation shared by every write path.
//!
//! The rules run server-side only; the browser client renders the per-field
//! messages returned by the API instead of re-encoding them. Error reporting
//! is per-field: at most one message per field, first failing rule wins.

use crate::errors::FieldErrors;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Maximum length of a warehouse name, counted in characters so accented
/// text is measured correctly.
const NAME_MAX_CHARS: usize = 100;
/// Staff count bounds (inclusive upper bound).
const STAFF_COUNT_MAX: i64 = 9999;

static CODE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9]{1,5}$").expect("code regex is valid")
});

static NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-zÁÉÍÓÚáéíóúÑñ0-9\s\-.]+$").expect("name regex is valid")
});

/// Raw form fields as submitted by the client, before any trimming.
#[derive(Debug, Default, Clone)]
pub struct WarehouseForm {
    pub code: Option<String>,
    pub name: String,
    pub address: String,
    pub staff_count: String,
}

/// Validates the warehouse fields, returning one message per failing field.
/// An empty map means the input is acceptable.
///
/// `skip_code` is set on edit: the code is immutable after creation, so it is
/// neither submitted nor checked there.
pub fn validate_warehouse(form: &WarehouseForm, skip_code: bool) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if !skip_code {
        let code = form.code.as_deref().unwrap_or("").trim();
        if code.is_empty() {
            errors.insert("code", "Code is required.".to_string());
        } else if !CODE_RE.is_match(code) {
            errors.insert(
                "code",
                "Code must be alphanumeric with at most 5 characters.".to_string(),
            );
        }
    }

    let name = form.name.trim();
    if name.is_empty() {
        errors.insert("name", "Name is required.".to_string());
    } else if name.chars().count() > NAME_MAX_CHARS {
        errors.insert("name", "Name cannot exceed 100 characters.".to_string());
    } else if !NAME_RE.is_match(name) {
        errors.insert(
            "name",
            "Name may only contain letters, digits, spaces, hyphens and periods.".to_string(),
        );
    }

    if form.address.trim().is_empty() {
        errors.insert("address", "Address is required.".to_string());
    }

    let staff_count = form.staff_count.trim();
    if staff_count.is_empty() || !staff_count.chars().all(|c| c.is_ascii_digit()) {
        errors.insert(
            "staffCount",
            "Staff count must be a positive integer.".to_string(),
        );
    } else {
        // All-digit strings longer than the limit cannot parse into range;
        // treat overflow as exceeding the maximum.
        let value = staff_count.parse::<i64>().unwrap_or(i64::MAX);
        if value == 0 {
            errors.insert(
                "staffCount",
                "Staff count must be greater than zero.".to_string(),
            );
        } else if value > STAFF_COUNT_MAX {
            errors.insert("staffCount", "Staff count cannot exceed 9999.".to_string());
        }
    }

    errors
}

/// Extracts usable manager ids from the submitted array: numeric entries
/// (numbers or digit strings) greater than zero. Everything else is dropped.
/// The caller rejects the request when the result is empty.
pub fn sanitize_manager_ids(raw: &[Value]) -> Vec<i32> {
    raw.iter()
        .filter_map(|value| match value {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        })
        .filter(|&id| id > 0 && id <= i32::MAX as i64)
        .map(|id| id as i32)
        .collect()
}
