//! Management form counters
//!
//! The server-side processor reads four scalar fields to learn how many
//! sub-forms a formset rendered:
//!
//! | field | meaning | changes client-side |
//! |---|---|---|
//! | `{prefix}-TOTAL_FORMS` | rows rendered | yes, +1 per added row |
//! | `{prefix}-INITIAL_FORMS` | rows backed by existing objects | no |
//! | `{prefix}-MIN_NUM_FORMS` | lower bound | no |
//! | `{prefix}-MAX_NUM_FORMS` | upper bound, empty when unlimited | no |

use crate::error::FormsetError;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Suffix of the total forms field
pub const TOTAL_FORMS: &str = "TOTAL_FORMS";
/// Suffix of the initial forms field
pub const INITIAL_FORMS: &str = "INITIAL_FORMS";
/// Suffix of the minimum forms field
pub const MIN_NUM_FORMS: &str = "MIN_NUM_FORMS";
/// Suffix of the maximum forms field
pub const MAX_NUM_FORMS: &str = "MAX_NUM_FORMS";

/// Rows a submission may declare beyond `MAX_NUM_FORMS`
pub const ABSOLUTE_MAX_SLACK: usize = 1000;

/// Management field name for a formset prefix and suffix
#[inline]
#[must_use]
pub fn management_field(prefix: &str, suffix: &str) -> String {
    format!("{prefix}-{suffix}")
}

/// Upper bound on the number of rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MaxForms {
    /// At most this many rows
    Limited(usize),
    /// No bound; submitted as an empty value
    #[default]
    Unlimited,
}

impl MaxForms {
    /// Check if `count` rows fit
    #[inline]
    #[must_use]
    pub fn allows(self, count: usize) -> bool {
        match self {
            Self::Limited(max) => count <= max,
            Self::Unlimited => true,
        }
    }

    /// Most rows a submission is decoded for
    ///
    /// `max + 1000`, or `1000` when unlimited.
    #[inline]
    #[must_use]
    pub fn absolute_max(self) -> usize {
        match self {
            Self::Limited(max) => max.saturating_add(ABSOLUTE_MAX_SLACK),
            Self::Unlimited => ABSOLUTE_MAX_SLACK,
        }
    }

    /// Wire representation
    #[must_use]
    pub fn to_field_value(self) -> String {
        match self {
            Self::Limited(max) => max.to_string(),
            Self::Unlimited => String::new(),
        }
    }

    /// Parse the wire representation
    ///
    /// # Errors
    /// - `FormsetError::InvalidCount` if the value is neither empty nor a count
    pub fn from_field_value(field: &str, raw: &str) -> Result<Self, FormsetError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(Self::Unlimited);
        }
        raw.parse()
            .map(Self::Limited)
            .map_err(|_| FormsetError::invalid_count(field, raw))
    }
}

impl Serialize for MaxForms {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Limited(max) => serializer.serialize_u64(*max as u64),
            Self::Unlimited => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for MaxForms {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MaxVisitor;

        impl<'de> Visitor<'de> for MaxVisitor {
            type Value = MaxForms;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a non-negative count, an empty string or null")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<MaxForms, E> {
                usize::try_from(v).map(MaxForms::Limited).map_err(E::custom)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<MaxForms, E> {
                usize::try_from(v).map(MaxForms::Limited).map_err(E::custom)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<MaxForms, E> {
                MaxForms::from_field_value(MAX_NUM_FORMS, v).map_err(E::custom)
            }

            fn visit_none<E: de::Error>(self) -> Result<MaxForms, E> {
                Ok(MaxForms::Unlimited)
            }

            fn visit_unit<E: de::Error>(self) -> Result<MaxForms, E> {
                Ok(MaxForms::Unlimited)
            }
        }

        deserializer.deserialize_any(MaxVisitor)
    }
}

/// Accepts a count as a JSON number or a numeric string
fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
    struct CountVisitor;

    impl<'de> Visitor<'de> for CountVisitor {
        type Value = usize;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a non-negative count")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<usize, E> {
            usize::try_from(v).map_err(E::custom)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<usize, E> {
            usize::try_from(v).map_err(E::custom)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<usize, E> {
            v.trim().parse().map_err(E::custom)
        }
    }

    deserializer.deserialize_any(CountVisitor)
}

/// Formset configuration block supplied by the host page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagementConfig {
    /// Formset prefix, `form` by default on the server
    pub prefix: String,
    /// Rows rendered
    #[serde(rename = "TOTAL_FORMS", deserialize_with = "count")]
    pub total_forms: usize,
    /// Rows backed by existing objects
    #[serde(rename = "INITIAL_FORMS", deserialize_with = "count")]
    pub initial_forms: usize,
    /// Lower bound
    #[serde(rename = "MIN_NUM_FORMS", default, deserialize_with = "count")]
    pub min_num_forms: usize,
    /// Upper bound
    #[serde(rename = "MAX_NUM_FORMS", default)]
    pub max_num_forms: MaxForms,
}

impl ManagementConfig {
    /// Create configuration with no bounds
    #[must_use]
    pub fn new(prefix: impl Into<String>, initial_forms: usize, total_forms: usize) -> Self {
        Self {
            prefix: prefix.into(),
            total_forms,
            initial_forms,
            min_num_forms: 0,
            max_num_forms: MaxForms::Unlimited,
        }
    }

    /// With lower bound
    #[inline]
    #[must_use]
    pub fn with_min(mut self, min: usize) -> Self {
        self.min_num_forms = min;
        self
    }

    /// With upper bound
    #[inline]
    #[must_use]
    pub fn with_max(mut self, max: MaxForms) -> Self {
        self.max_num_forms = max;
        self
    }
}

/// The four management counters of a mounted formset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManagementCounters {
    initial_forms: usize,
    total_forms: usize,
    min_num_forms: usize,
    max_num_forms: MaxForms,
}

impl ManagementCounters {
    /// Create counters, checking `initial <= total <= max` and `min <= max`
    ///
    /// # Errors
    /// - `FormsetError::InvalidCounters` if the bounds are inconsistent
    pub fn new(
        initial_forms: usize,
        total_forms: usize,
        min_num_forms: usize,
        max_num_forms: MaxForms,
    ) -> Result<Self, FormsetError> {
        if initial_forms > total_forms {
            return Err(FormsetError::InvalidCounters(format!(
                "INITIAL_FORMS ({initial_forms}) exceeds TOTAL_FORMS ({total_forms})"
            )));
        }
        if !max_num_forms.allows(total_forms) {
            return Err(FormsetError::InvalidCounters(format!(
                "TOTAL_FORMS ({total_forms}) exceeds MAX_NUM_FORMS ({})",
                max_num_forms.to_field_value()
            )));
        }
        if !max_num_forms.allows(min_num_forms) {
            return Err(FormsetError::InvalidCounters(format!(
                "MIN_NUM_FORMS ({min_num_forms}) exceeds MAX_NUM_FORMS ({})",
                max_num_forms.to_field_value()
            )));
        }
        Ok(Self {
            initial_forms,
            total_forms,
            min_num_forms,
            max_num_forms,
        })
    }

    /// Create counters from a configuration block
    ///
    /// # Errors
    /// - `FormsetError::InvalidCounters` if the bounds are inconsistent
    pub fn from_config(config: &ManagementConfig) -> Result<Self, FormsetError> {
        Self::new(
            config.initial_forms,
            config.total_forms,
            config.min_num_forms,
            config.max_num_forms,
        )
    }

    /// Rows backed by existing objects
    #[inline]
    #[must_use]
    pub fn initial_forms(&self) -> usize {
        self.initial_forms
    }

    /// Rows rendered
    #[inline]
    #[must_use]
    pub fn total_forms(&self) -> usize {
        self.total_forms
    }

    /// Lower bound
    #[inline]
    #[must_use]
    pub fn min_num_forms(&self) -> usize {
        self.min_num_forms
    }

    /// Upper bound
    #[inline]
    #[must_use]
    pub fn max_num_forms(&self) -> MaxForms {
        self.max_num_forms
    }

    /// Check if one more row fits
    #[inline]
    #[must_use]
    pub fn can_grow(&self) -> bool {
        self.max_num_forms.allows(self.total_forms + 1)
    }

    /// Count one more row
    ///
    /// # Errors
    /// - `FormsetError::LimitExceeded` if the row would exceed `MAX_NUM_FORMS`
    pub(crate) fn grow(&mut self) -> Result<usize, FormsetError> {
        match self.max_num_forms {
            MaxForms::Limited(max) if self.total_forms >= max => {
                Err(FormsetError::LimitExceeded { max })
            }
            _ => {
                self.total_forms += 1;
                Ok(self.total_forms)
            }
        }
    }

    /// The four management fields in submission order
    #[must_use]
    pub fn to_pairs(&self, prefix: &str) -> [(String, String); 4] {
        [
            (management_field(prefix, TOTAL_FORMS), self.total_forms.to_string()),
            (management_field(prefix, INITIAL_FORMS), self.initial_forms.to_string()),
            (management_field(prefix, MIN_NUM_FORMS), self.min_num_forms.to_string()),
            (management_field(prefix, MAX_NUM_FORMS), self.max_num_forms.to_field_value()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn config_from_host_page() {
        let config: ManagementConfig = serde_json::from_str(
            r#"{"prefix": "form", "extra": 1, "TOTAL_FORMS": 3, "INITIAL_FORMS": "2",
                "MIN_NUM_FORMS": 0, "MAX_NUM_FORMS": 1000}"#,
        )
        .unwrap();

        assert_eq!(config.prefix, "form");
        assert_eq!(config.total_forms, 3);
        assert_eq!(config.initial_forms, 2);
        assert_eq!(config.max_num_forms, MaxForms::Limited(1000));
    }

    #[test]
    fn absolute_max_adds_slack() {
        assert_eq!(MaxForms::Unlimited.absolute_max(), 1000);
        assert_eq!(MaxForms::Limited(5).absolute_max(), 1005);
        assert_eq!(MaxForms::Limited(usize::MAX).absolute_max(), usize::MAX);
    }

    #[test]
    fn config_max_defaults_to_unlimited() {
        let config: ManagementConfig =
            serde_json::from_str(r#"{"prefix": "form", "TOTAL_FORMS": 0, "INITIAL_FORMS": 0}"#)
                .unwrap();
        assert_eq!(config.max_num_forms, MaxForms::Unlimited);

        let config: ManagementConfig = serde_json::from_str(
            r#"{"prefix": "form", "TOTAL_FORMS": 0, "INITIAL_FORMS": 0, "MAX_NUM_FORMS": ""}"#,
        )
        .unwrap();
        assert_eq!(config.max_num_forms, MaxForms::Unlimited);
    }

    #[test]
    fn counters_reject_inconsistent_bounds() {
        assert!(ManagementCounters::new(3, 2, 0, MaxForms::Unlimited).is_err());
        assert!(ManagementCounters::new(0, 5, 0, MaxForms::Limited(4)).is_err());
        assert!(ManagementCounters::new(0, 0, 5, MaxForms::Limited(4)).is_err());
        assert!(ManagementCounters::new(2, 4, 1, MaxForms::Limited(4)).is_ok());
    }

    #[test]
    fn grow_respects_max() {
        let mut counters = ManagementCounters::new(1, 1, 0, MaxForms::Limited(2)).unwrap();
        assert!(counters.can_grow());
        assert_eq!(counters.grow().unwrap(), 2);
        assert!(!counters.can_grow());
        assert!(counters.grow().unwrap_err().is_limit());
        assert_eq!(counters.total_forms(), 2);
    }

    #[test]
    fn pairs_use_wire_names() {
        let counters = ManagementCounters::new(1, 2, 0, MaxForms::Unlimited).unwrap();
        let pairs = counters.to_pairs("form");
        assert_eq!(
            pairs,
            [
                ("form-TOTAL_FORMS".to_string(), "2".to_string()),
                ("form-INITIAL_FORMS".to_string(), "1".to_string()),
                ("form-MIN_NUM_FORMS".to_string(), "0".to_string()),
                ("form-MAX_NUM_FORMS".to_string(), String::new()),
            ]
        );
    }
}
