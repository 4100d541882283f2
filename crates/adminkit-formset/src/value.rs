//! Field values and field errors
//!
//! Values arrive from the host page as whatever the server-side form bound:
//! strings, numbers, booleans, lists or `null`. They are normalised into
//! three shapes matching what an HTML form can submit.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Current value of one field
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Value")]
pub enum FieldValue {
    /// Single text value (text inputs, selects, radios, hidden inputs)
    Text(String),
    /// Multiple values under one name (checkbox groups, repeated inputs)
    List(Vec<String>),
    /// Single checkbox
    Flag(bool),
}

impl FieldValue {
    /// Create text value
    #[inline]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Create list value
    #[inline]
    pub fn list<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }

    /// Text content, if this is a text value
    #[inline]
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// List content, if this is a list value
    #[inline]
    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(values) => Some(values),
            _ => None,
        }
    }

    /// Flag state; text values count as set when non-empty
    #[must_use]
    pub fn is_set(&self) -> bool {
        match self {
            Self::Flag(flag) => *flag,
            Self::Text(s) => !s.is_empty(),
            Self::List(values) => !values.is_empty(),
        }
    }
}

impl TryFrom<Value> for FieldValue {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Null => Ok(Self::Text(String::new())),
            Value::Bool(flag) => Ok(Self::Flag(flag)),
            Value::Number(n) => Ok(Self::Text(n.to_string())),
            Value::String(s) => Ok(Self::Text(s)),
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s),
                    Value::Number(n) => Ok(n.to_string()),
                    other => Err(format!("unsupported list item: {other}")),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Self::List),
            Value::Object(_) => Err("objects are not field values".to_string()),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Text(s) => serializer.serialize_str(s),
            Self::List(values) => values.serialize(serializer),
            Self::Flag(flag) => serializer.serialize_bool(*flag),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(values: Vec<String>) -> Self {
        Self::List(values)
    }
}

/// One validation message attached to a field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawFieldError")]
pub struct FieldError {
    /// Message shown to the user
    pub msg: String,
    /// Machine-readable error code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl FieldError {
    /// Create error with message only
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            code: None,
        }
    }

    /// With error code
    #[inline]
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFieldError {
    Message(String),
    Full {
        msg: String,
        #[serde(default)]
        code: Option<String>,
    },
}

impl From<RawFieldError> for FieldError {
    fn from(raw: RawFieldError) -> Self {
        match raw {
            RawFieldError::Message(msg) => Self { msg, code: None },
            RawFieldError::Full { msg, code } => Self { msg, code },
        }
    }
}

/// Field name to value, in form order
pub type FieldValues = IndexMap<String, FieldValue>;

/// Field name to validation messages
pub type FieldErrors = IndexMap<String, Vec<FieldError>>;

/// One entry of the host page's `formdata` block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowData {
    /// Bound field values
    #[serde(default)]
    pub values: FieldValues,
    /// Validation errors from the last submission
    #[serde(default)]
    pub errors: FieldErrors,
}

impl RowData {
    /// Create row data from values only
    #[inline]
    #[must_use]
    pub fn from_values(values: FieldValues) -> Self {
        Self {
            values,
            errors: FieldErrors::new(),
        }
    }
}
