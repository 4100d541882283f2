//! Helpers over row values shared by the widgets

use adminkit_formset::{FieldValue, FieldValues, Row};

/// Remove a field that is no longer rendered, so it is not posted
pub(crate) fn drop_value(row: &mut Row, field: &str) {
    if row.get(field).is_some() {
        row.unset(field);
    }
}

/// Non-empty text value
pub(crate) fn text(values: &FieldValues, field: &str) -> Option<String> {
    match values.get(field) {
        Some(FieldValue::Text(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// List value; a single text value counts as a one-item list
pub(crate) fn list(values: &FieldValues, field: &str) -> Vec<String> {
    match values.get(field) {
        Some(FieldValue::List(items)) => items.clone(),
        Some(FieldValue::Text(s)) if !s.is_empty() => vec![s.clone()],
        _ => Vec::new(),
    }
}
