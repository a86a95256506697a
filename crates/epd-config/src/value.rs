//! Enriched JSON object model that allows to associate raw values with origins.

use std::{collections::BTreeMap, fmt, sync::Arc};

use secrecy::{ExposeSecret, SecretString};

use crate::metadata::BasicTypes;

/// Supported file formats for configuration input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum FileFormat {
    /// JSON file.
    Json,
    /// YAML file.
    Yaml,
}

impl fmt::Display for FileFormat {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Json => "JSON",
            Self::Yaml => "YAML",
        })
    }
}

/// Origin of a [`Value`] in configuration input.
#[derive(Debug, Default)]
#[non_exhaustive]
pub enum ValueOrigin {
    /// Unknown origin.
    #[default]
    Unknown,
    /// Value was not supplied and was filled in from the schema default.
    Default,
    /// File source.
    File {
        /// Filename; may not correspond to a real filesystem path.
        name: String,
        /// File format.
        format: FileFormat,
    },
    /// Path from a structured source.
    Path {
        /// Source of structured data, e.g. a JSON file.
        source: Arc<Self>,
        /// Dot-separated path in the source, like `sensor`.
        path: String,
    },
    /// Synthetic value produced from another value.
    Synthetic {
        /// Original value source.
        source: Arc<Self>,
        /// Human-readable description of the transform.
        transform: String,
    },
}

impl fmt::Display for ValueOrigin {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => formatter.write_str("unknown"),
            Self::Default => formatter.write_str("schema default"),
            Self::File { name, format } => write!(formatter, "{format} file '{name}'"),
            Self::Path { source, path } => {
                if let Self::File { name, format } = source.as_ref() {
                    write!(formatter, "variable at '{path}' in {format} file '{name}'")
                } else {
                    write!(formatter, "variable at '{path}' in {source}")
                }
            }
            Self::Synthetic { source, transform } => {
                write!(formatter, "{transform} from {source}")
            }
        }
    }
}

/// String value that may be secret.
#[derive(Clone)]
pub enum StrValue {
    /// Plain string value.
    Plain(String),
    /// Secret string value.
    Secret(SecretString),
}

impl StrValue {
    /// Exposes a secret string if necessary.
    pub fn expose(&self) -> &str {
        match self {
            Self::Plain(s) => s,
            Self::Secret(s) => s.expose_secret(),
        }
    }

    /// Checks whether this value is secret.
    pub fn is_secret(&self) -> bool {
        matches!(self, Self::Secret(_))
    }

    pub(crate) fn make_secret(&mut self) {
        if let Self::Plain(s) = self {
            *self = Self::Secret(std::mem::take(s).into());
        }
    }
}

impl fmt::Debug for StrValue {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain(s) => fmt::Debug::fmt(s, formatter),
            Self::Secret(_) => formatter.write_str("[REDACTED]"),
        }
    }
}

impl fmt::Display for StrValue {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Plain(s) => s,
            Self::Secret(_) => "[REDACTED]",
        })
    }
}

/// Secrets are compared by their exposed contents; this is only used for equality of resolved configs.
impl PartialEq for StrValue {
    fn eq(&self, other: &Self) -> bool {
        self.is_secret() == other.is_secret() && self.expose() == other.expose()
    }
}

impl From<String> for StrValue {
    fn from(s: String) -> Self {
        Self::Plain(s)
    }
}

impl From<&str> for StrValue {
    fn from(s: &str) -> Self {
        Self::Plain(s.to_owned())
    }
}

/// Scalar JSON value. Raw configuration documents are flat, so arrays and objects are only tracked
/// to be reported as type mismatches.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// `null`.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// Numeric value.
    Number(serde_json::Number),
    /// String value.
    String(StrValue),
    /// Array of values.
    Array(Vec<WithOrigin>),
    /// Object / map of values.
    Object(Map),
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.into())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value.into())
    }
}

impl Value {
    pub(crate) fn basic_type(&self) -> Option<BasicTypes> {
        Some(match self {
            Self::Null => return None,
            Self::Bool(_) => BasicTypes::BOOL,
            Self::Number(number) if number.is_u64() || number.is_i64() => BasicTypes::INTEGER,
            Self::Number(_) => BasicTypes::FLOAT,
            Self::String(_) => BasicTypes::STRING,
            Self::Array(_) => BasicTypes::ARRAY,
            Self::Object(_) => BasicTypes::OBJECT,
        })
    }

    /// Returns a short human-readable representation of the value used in error messages.
    /// Secrets and nested values are never printed verbatim.
    pub fn summary(&self) -> String {
        match self {
            Self::Null => "null".to_owned(),
            Self::Bool(value) => value.to_string(),
            Self::Number(value) => value.to_string(),
            Self::String(value @ StrValue::Plain(_)) => format!("{:?}", value.expose()),
            Self::String(StrValue::Secret(_)) => "[REDACTED]".to_owned(),
            Self::Array(items) => format!("array with {} item(s)", items.len()),
            Self::Object(map) => format!("object with {} key(s)", map.len()),
        }
    }

    pub(crate) fn from_json(value: serde_json::Value, origin: &Arc<ValueOrigin>, path: &str) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(value) => Self::Bool(value),
            serde_json::Value::Number(value) => Self::Number(value),
            serde_json::Value::String(value) => Self::String(StrValue::Plain(value)),
            serde_json::Value::Array(items) => Self::Array(
                items
                    .into_iter()
                    .enumerate()
                    .map(|(i, item)| {
                        let child_path = join_path(path, &i.to_string());
                        WithOrigin::from_json(item, origin, child_path)
                    })
                    .collect(),
            ),
            serde_json::Value::Object(map) => Self::Object(
                map.into_iter()
                    .map(|(key, item)| {
                        let child_path = join_path(path, &key);
                        (key, WithOrigin::from_json(item, origin, child_path))
                    })
                    .collect(),
            ),
        }
    }

    /// Converts this value into the plain JSON object model. Secrets are exposed.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(value) => (*value).into(),
            Self::Number(value) => serde_json::Value::Number(value.clone()),
            Self::String(value) => value.expose().into(),
            Self::Array(items) => items.iter().map(|item| item.inner.to_json()).collect(),
            Self::Object(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), value.inner.to_json()))
                    .collect(),
            ),
        }
    }
}

/// JSON object. Keys are ordered to make iteration deterministic.
pub type Map<V = Value> = BTreeMap<String, WithOrigin<V>>;

/// Value together with its origin.
#[derive(Debug, Clone, Default)]
pub struct WithOrigin<T = Value> {
    /// Inner value.
    pub inner: T,
    /// Origin of the value.
    pub origin: Arc<ValueOrigin>,
}

impl PartialEq for WithOrigin {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T> WithOrigin<T> {
    /// Creates a value with the specified origin.
    pub fn new(inner: T, origin: Arc<ValueOrigin>) -> Self {
        Self { inner, origin }
    }
}

impl WithOrigin {
    pub(crate) fn from_json(
        value: serde_json::Value,
        file_origin: &Arc<ValueOrigin>,
        path: String,
    ) -> Self {
        let inner = Value::from_json(value, file_origin, &path);
        Self {
            inner,
            origin: Arc::new(ValueOrigin::Path {
                source: file_origin.clone(),
                path,
            }),
        }
    }
}

pub(crate) fn join_path(prefix: &str, suffix: &str) -> String {
    if prefix.is_empty() {
        suffix.to_owned()
    } else if suffix.is_empty() {
        prefix.to_owned()
    } else {
        format!("{prefix}.{suffix}")
    }
}
