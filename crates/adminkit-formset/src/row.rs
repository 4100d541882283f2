//! Formset rows and the field naming convention
//!
//! Every field of row `i` in formset `prefix` is submitted as
//! `"{prefix}-{i}-{field}"` and rendered with id `"id_{prefix}-{i}-{field}"`.
//! With the default prefix `form` this gives `form-0-label`.

use crate::value::{FieldError, FieldErrors, FieldValue, FieldValues, RowData};

/// Field carrying the mark-for-deletion flag
pub const DELETION_FIELD: &str = "DELETE";

/// Prefix shared by all fields of one row
#[inline]
#[must_use]
pub fn row_prefix(formset_prefix: &str, index: usize) -> String {
    format!("{formset_prefix}-{index}")
}

/// Submitted name of a row field
#[inline]
#[must_use]
pub fn field_name(row_prefix: &str, field: &str) -> String {
    format!("{row_prefix}-{field}")
}

/// Element id of a row field
#[inline]
#[must_use]
pub fn field_id(row_prefix: &str, field: &str) -> String {
    format!("id_{row_prefix}-{field}")
}

/// One instance of a repeated sub-form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    index: usize,
    prefix: String,
    values: FieldValues,
    errors: FieldErrors,
    is_extra: bool,
}

impl Row {
    /// Row seeded from server data
    #[must_use]
    pub(crate) fn from_data(formset_prefix: &str, index: usize, data: RowData) -> Self {
        Self {
            index,
            prefix: row_prefix(formset_prefix, index),
            values: data.values,
            errors: data.errors,
            is_extra: false,
        }
    }

    /// Blank row added beyond the server-provided ones
    #[must_use]
    pub(crate) fn extra(formset_prefix: &str, index: usize) -> Self {
        Self {
            index,
            prefix: row_prefix(formset_prefix, index),
            values: FieldValues::new(),
            errors: FieldErrors::new(),
            is_extra: true,
        }
    }

    /// Zero-based position, stable for the lifetime of the formset
    #[inline]
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Prefix of this row's field names, e.g. `form-3`
    #[inline]
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Whether the row was added beyond the server-provided rows
    #[inline]
    #[must_use]
    pub fn is_extra(&self) -> bool {
        self.is_extra
    }

    /// Even rows and odd rows are styled differently
    #[inline]
    #[must_use]
    pub fn is_even(&self) -> bool {
        self.index % 2 == 0
    }

    /// Submitted name of a field in this row
    #[inline]
    #[must_use]
    pub fn field_name(&self, field: &str) -> String {
        field_name(&self.prefix, field)
    }

    /// Element id of a field in this row
    #[inline]
    #[must_use]
    pub fn field_id(&self, field: &str) -> String {
        field_id(&self.prefix, field)
    }

    /// All values
    #[inline]
    #[must_use]
    pub fn values(&self) -> &FieldValues {
        &self.values
    }

    /// All errors
    #[inline]
    #[must_use]
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Value of a field
    #[inline]
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    /// Text value of a field
    #[must_use]
    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_text)
    }

    /// List value of a field; a single text value counts as a one-item list
    #[must_use]
    pub fn list(&self, field: &str) -> Vec<String> {
        match self.get(field) {
            Some(FieldValue::List(values)) => values.clone(),
            Some(FieldValue::Text(s)) if !s.is_empty() => vec![s.clone()],
            _ => Vec::new(),
        }
    }

    /// Set a field value
    ///
    /// An edit clears the field's errors, the user is assumed to be
    /// addressing them. Returns the previous value.
    pub fn set(&mut self, field: &str, value: impl Into<FieldValue>) -> Option<FieldValue> {
        self.clear_errors(field);
        self.values.insert(field.to_string(), value.into())
    }

    /// Set a value derived from other state, keeping the field's errors
    pub fn sync(&mut self, field: &str, value: impl Into<FieldValue>) -> Option<FieldValue> {
        self.values.insert(field.to_string(), value.into())
    }

    /// Remove a field value, e.g. when its input is no longer shown
    pub fn unset(&mut self, field: &str) -> Option<FieldValue> {
        self.clear_errors(field);
        self.values.shift_remove(field)
    }

    /// Errors of a field
    #[must_use]
    pub fn field_errors(&self, field: &str) -> &[FieldError] {
        self.errors.get(field).map_or(&[], Vec::as_slice)
    }

    /// Drop the errors of a field
    pub fn clear_errors(&mut self, field: &str) -> Vec<FieldError> {
        self.errors.shift_remove(field).unwrap_or_default()
    }

    /// Check if any field has errors
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.errors.values().any(|errors| !errors.is_empty())
    }

    /// Mark or unmark the row for deletion
    pub fn mark_deleted(&mut self, deleted: bool) {
        self.set(DELETION_FIELD, FieldValue::Flag(deleted));
    }

    /// Check if the row is marked for deletion
    #[must_use]
    pub fn is_marked_deleted(&self) -> bool {
        self.get(DELETION_FIELD).is_some_and(FieldValue::is_set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn naming_convention() {
        let row = Row::extra("form", 3);
        assert_eq!(row.prefix(), "form-3");
        assert_eq!(row.field_name("api_root"), "form-3-api_root");
        assert_eq!(row.field_id("api_root"), "id_form-3-api_root");
        assert!(!row.is_even());
    }

    #[test]
    fn set_clears_field_errors() {
        let mut data = RowData::default();
        data.errors.insert("label".into(), vec![FieldError::new("Dit veld is vereist.")]);
        data.errors.insert("api_root".into(), vec![FieldError::new("Ongeldige URL.")]);
        let mut row = Row::from_data("form", 0, data);

        row.set("label", "ZRC");
        assert!(row.field_errors("label").is_empty());
        assert_eq!(row.field_errors("api_root").len(), 1);
        assert!(row.has_errors());
    }

    #[test]
    fn deletion_flag() {
        let mut row = Row::extra("form", 0);
        assert!(!row.is_marked_deleted());
        row.mark_deleted(true);
        assert!(row.is_marked_deleted());
        row.mark_deleted(false);
        assert!(!row.is_marked_deleted());
    }

    #[test]
    fn list_accessor_accepts_single_text() {
        let mut row = Row::extra("form", 0);
        row.set("scopes", "zaken.lezen");
        assert_eq!(row.list("scopes"), vec!["zaken.lezen".to_string()]);
        assert!(row.list("missing").is_empty());
    }
}
