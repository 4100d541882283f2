//! Submission wire format
//!
//! A submission is the ordered list of `name=value` pairs an HTML form posts.
//! Encoding follows browser form semantics:
//!
//! - `Text` fields post one pair, even when empty
//! - `List` fields post one pair per item, nothing when empty
//! - `Flag` fields post `on` when set, nothing when cleared
//!
//! Because cleared flags and empty lists post nothing, decoding needs the
//! processor's [`FieldSchema`] to know which fields to expect.

use crate::counters::{
    management_field, MaxForms, ManagementCounters, INITIAL_FORMS, MAX_NUM_FORMS, MIN_NUM_FORMS,
    TOTAL_FORMS,
};
use crate::error::FormsetError;
use crate::row::{field_name, row_prefix, Row};
use crate::value::{FieldValue, FieldValues};
use indexmap::IndexMap;
use url::form_urlencoded;

/// Value posted for a set checkbox without an explicit value
pub const CHECKBOX_ON: &str = "on";

/// Ordered `name=value` pairs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    pairs: Vec<(String, String)>,
}

impl Submission {
    /// Create empty submission
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pair
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((name.into(), value.into()));
    }

    /// Append every field of a row
    pub fn push_row(&mut self, row: &Row) {
        for (field, value) in row.values() {
            self.push_field(&row.field_name(field), value);
        }
    }

    /// Append one field under a full name
    pub fn push_field(&mut self, name: &str, value: &FieldValue) {
        match value {
            FieldValue::Text(s) => self.push(name, s.as_str()),
            FieldValue::List(items) => {
                for item in items {
                    self.push(name, item.as_str());
                }
            }
            FieldValue::Flag(true) => self.push(name, CHECKBOX_ON),
            FieldValue::Flag(false) => {}
        }
    }

    /// First value posted under a name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Every value posted under a name, in order
    #[must_use]
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Check if anything was posted under a name
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterate pairs in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Number of pairs
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Check if there are no pairs
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// `application/x-www-form-urlencoded` body
    #[must_use]
    pub fn to_urlencoded(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }

    /// Parse an `application/x-www-form-urlencoded` body
    #[must_use]
    pub fn from_urlencoded(body: &str) -> Self {
        Self {
            pairs: form_urlencoded::parse(body.as_bytes())
                .into_owned()
                .collect(),
        }
    }
}

impl FromIterator<(String, String)> for Submission {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            pairs: iter.into_iter().collect(),
        }
    }
}

/// How a field is posted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// One value, always posted
    Text,
    /// Any number of values under one name
    List,
    /// Posted only when set
    Flag,
}

/// Field name to kind, as the processor declares its form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSchema {
    fields: IndexMap<String, FieldKind>,
}

impl FieldSchema {
    /// Create empty schema
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With a field
    #[inline]
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.insert(name.into(), kind);
        self
    }

    /// Kind of a field
    #[inline]
    #[must_use]
    pub fn kind(&self, name: &str) -> Option<FieldKind> {
        self.fields.get(name).copied()
    }

    /// Fields in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, FieldKind)> {
        self.fields.iter().map(|(n, k)| (n.as_str(), *k))
    }

    /// Decode one row's fields
    ///
    /// Text fields that were not posted are left out. Flags and lists are
    /// always present, cleared flags and empty lists included.
    #[must_use]
    pub fn decode_row(&self, submission: &Submission, row_prefix: &str) -> FieldValues {
        let mut values = FieldValues::new();
        for (field, kind) in self.iter() {
            let name = field_name(row_prefix, field);
            let value = match kind {
                FieldKind::Text => match submission.get(&name) {
                    Some(s) => FieldValue::text(s),
                    None => continue,
                },
                FieldKind::List => FieldValue::list(submission.get_all(&name)),
                FieldKind::Flag => FieldValue::Flag(submission.contains(&name)),
            };
            values.insert(field.to_string(), value);
        }
        values
    }
}

impl<N: Into<String>> FromIterator<(N, FieldKind)> for FieldSchema {
    fn from_iter<T: IntoIterator<Item = (N, FieldKind)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().map(|(n, k)| (n.into(), k)).collect(),
        }
    }
}

/// A submission decoded the way the processor reads it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFormset {
    /// Management counters as posted
    pub counters: ManagementCounters,
    /// Row values, one entry per `TOTAL_FORMS`
    pub rows: Vec<FieldValues>,
}

fn required_count(submission: &Submission, prefix: &str, suffix: &str) -> Result<usize, FormsetError> {
    let field = management_field(prefix, suffix);
    let raw = submission
        .get(&field)
        .ok_or_else(|| FormsetError::MissingManagementField(field.clone()))?;
    raw.trim()
        .parse()
        .map_err(|_| FormsetError::invalid_count(field, raw))
}

/// Decode a formset submission
///
/// # Errors
/// - `FormsetError::MissingManagementField` if `TOTAL_FORMS` or `INITIAL_FORMS` is absent
/// - `FormsetError::InvalidCount` if a counter is not a non-negative integer
/// - `FormsetError::TooManyForms` if `TOTAL_FORMS` is above the absolute max
/// - `FormsetError::InvalidCounters` if the counters are inconsistent
pub fn parse_submission(
    submission: &Submission,
    prefix: &str,
    schema: &FieldSchema,
) -> Result<ParsedFormset, FormsetError> {
    let total = required_count(submission, prefix, TOTAL_FORMS)?;
    let initial = required_count(submission, prefix, INITIAL_FORMS)?;

    let min_field = management_field(prefix, MIN_NUM_FORMS);
    let min = match submission.get(&min_field) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| FormsetError::invalid_count(&min_field, raw))?,
        _ => 0,
    };

    let max_field = management_field(prefix, MAX_NUM_FORMS);
    let max = match submission.get(&max_field) {
        Some(raw) => MaxForms::from_field_value(&max_field, raw)?,
        None => MaxForms::Unlimited,
    };

    let absolute_max = max.absolute_max();
    if total > absolute_max {
        tracing::warn!(prefix, total, absolute_max, "rejecting oversized formset submission");
        return Err(FormsetError::TooManyForms { total, absolute_max });
    }

    let counters = ManagementCounters::new(initial, total, min, max)?;
    let rows = (0..total)
        .map(|index| schema.decode_row(submission, &row_prefix(prefix, index)))
        .collect();

    Ok(ParsedFormset { counters, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn schema() -> FieldSchema {
        FieldSchema::from_iter([
            ("label", FieldKind::Text),
            ("scopes", FieldKind::List),
            ("DELETE", FieldKind::Flag),
        ])
    }

    #[test]
    fn encode_follows_browser_semantics() {
        let mut submission = Submission::new();
        submission.push_field("form-0-label", &FieldValue::text(""));
        submission.push_field("form-0-scopes", &FieldValue::list(["a", "b"]));
        submission.push_field("form-0-DELETE", &FieldValue::Flag(false));
        submission.push_field("form-0-is_nlx", &FieldValue::Flag(true));

        assert_eq!(submission.get("form-0-label"), Some(""));
        assert_eq!(submission.get_all("form-0-scopes"), vec!["a", "b"]);
        assert!(!submission.contains("form-0-DELETE"));
        assert_eq!(submission.get("form-0-is_nlx"), Some(CHECKBOX_ON));
    }

    #[test]
    fn urlencoded_round_trip() {
        let submission = Submission::from_iter([
            ("form-0-label".to_string(), "Zaken API".to_string()),
            ("form-0-api_root".to_string(), "https://zaken.example.com/api/v1/".to_string()),
        ]);
        let body = submission.to_urlencoded();
        assert!(body.starts_with("form-0-label=Zaken+API&"));
        assert_eq!(Submission::from_urlencoded(&body), submission);
    }

    #[test]
    fn parse_reads_counters_and_rows() {
        let submission = Submission::from_urlencoded(
            "form-TOTAL_FORMS=2&form-INITIAL_FORMS=1&form-MIN_NUM_FORMS=0&form-MAX_NUM_FORMS=1000\
             &form-0-label=ZRC&form-0-scopes=zaken.lezen&form-0-scopes=zaken.bijwerken\
             &form-1-label=&form-1-DELETE=on",
        );
        let parsed = parse_submission(&submission, "form", &schema()).unwrap();

        assert_eq!(parsed.counters.total_forms(), 2);
        assert_eq!(parsed.counters.max_num_forms(), MaxForms::Limited(1000));
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(
            parsed.rows[0]["scopes"],
            FieldValue::list(["zaken.lezen", "zaken.bijwerken"])
        );
        assert_eq!(parsed.rows[0]["DELETE"], FieldValue::Flag(false));
        assert_eq!(parsed.rows[1]["label"], FieldValue::text(""));
        assert_eq!(parsed.rows[1]["DELETE"], FieldValue::Flag(true));
    }

    #[test]
    fn parse_requires_management_fields() {
        let submission = Submission::from_urlencoded("form-INITIAL_FORMS=0");
        let err = parse_submission(&submission, "form", &schema()).unwrap_err();
        assert!(matches!(err, FormsetError::MissingManagementField(f) if f == "form-TOTAL_FORMS"));

        let submission = Submission::from_urlencoded("form-TOTAL_FORMS=x&form-INITIAL_FORMS=0");
        let err = parse_submission(&submission, "form", &schema()).unwrap_err();
        assert!(matches!(err, FormsetError::InvalidCount { .. }));
    }

    #[test]
    fn parse_rejects_total_above_absolute_max() {
        let submission = Submission::from_urlencoded(
            "form-TOTAL_FORMS=2000000&form-INITIAL_FORMS=0&form-MAX_NUM_FORMS=",
        );
        let err = parse_submission(&submission, "form", &schema()).unwrap_err();
        assert!(matches!(
            err,
            FormsetError::TooManyForms { total: 2_000_000, absolute_max: 1000 }
        ));

        let submission = Submission::from_urlencoded(
            "form-TOTAL_FORMS=1000&form-INITIAL_FORMS=0&form-MAX_NUM_FORMS=",
        );
        let parsed = parse_submission(&submission, "form", &schema()).unwrap();
        assert_eq!(parsed.rows.len(), 1000);

        let submission = Submission::from_urlencoded(
            "form-TOTAL_FORMS=1006&form-INITIAL_FORMS=0&form-MAX_NUM_FORMS=5",
        );
        let err = parse_submission(&submission, "form", &schema()).unwrap_err();
        assert!(matches!(err, FormsetError::TooManyForms { absolute_max: 1005, .. }));
    }
}
