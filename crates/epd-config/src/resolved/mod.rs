//! Resolved configuration and the resolution algorithm.

use std::{fmt, sync::Arc};

use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::{
    de::{deserialize_field, literal_value},
    error::{ParseError, ParseErrorKind, ParseErrors, ResolveError},
    metadata::{ConfigSchema, DefaultValue, EnumValue, FieldMetadata},
    source::RawDocument,
    value::{StrValue, Value, ValueOrigin, WithOrigin},
};


/// Canonical typed value of a resolved field.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedValue {
    /// Member of an enumeration.
    Enum(EnumValue),
    /// Boolean value.
    Bool(bool),
    /// Integer value; string-or-integer fields are normalized to this variant.
    Integer(i64),
    /// String value.
    String(StrValue),
    /// Absent optional string.
    Null,
}

impl ResolvedValue {
    /// Converts this value back to raw input. Enumeration members are converted to their wire values.
    pub fn to_raw(&self) -> Value {
        match self {
            Self::Enum(value) => Value::from(value.value()),
            Self::Bool(flag) => Value::Bool(*flag),
            Self::Integer(value) => Value::from(*value),
            Self::String(s) => Value::String(s.clone()),
            Self::Null => Value::Null,
        }
    }
}

impl fmt::Display for ResolvedValue {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enum(value) => write!(formatter, "{:?}", value.value()),
            Self::Bool(flag) => write!(formatter, "{flag}"),
            Self::Integer(value) => write!(formatter, "{value}"),
            Self::String(s) => fmt::Debug::fmt(s, formatter),
            Self::Null => formatter.write_str("null"),
        }
    }
}

/// Secrets are serialized in the redacted form.
impl Serialize for ResolvedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Enum(value) => serializer.serialize_str(value.value()),
            Self::Bool(flag) => serializer.serialize_bool(*flag),
            Self::Integer(value) => serializer.serialize_i64(*value),
            Self::String(s) => serializer.collect_str(s),
            Self::Null => serializer.serialize_none(),
        }
    }
}

/// Resolved field together with its metadata and origin.
#[derive(Debug, Clone)]
pub struct ResolvedParam {
    /// Field metadata.
    pub field: &'static FieldMetadata,
    /// Resolved value.
    pub value: ResolvedValue,
    /// Origin of the value; [`ValueOrigin::Default`] for literal defaults.
    pub origin: Arc<ValueOrigin>,
}

/// Complete, immutable configuration: every field of the schema has exactly one value.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    schema: &'static ConfigSchema,
    params: Vec<ResolvedParam>,
}

/// Configs are compared by values; origins are ignored.
impl PartialEq for ResolvedConfig {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.schema, other.schema)
            && self
                .params
                .iter()
                .map(|param| &param.value)
                .eq(other.params.iter().map(|param| &param.value))
    }
}

impl ResolvedConfig {
    /// Returns the schema this config was resolved against.
    pub fn schema(&self) -> &'static ConfigSchema {
        self.schema
    }

    /// Iterates over all params in the schema order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &ResolvedParam> + '_ {
        self.params.iter()
    }

    /// Returns the resolved param with the specified field name.
    pub fn param(&self, name: &str) -> Option<&ResolvedParam> {
        self.params.iter().find(|param| param.field.name == name)
    }

    /// Returns the value of the specified field.
    pub fn get(&self, name: &str) -> Option<&ResolvedValue> {
        self.param(name).map(|param| &param.value)
    }

    /// Returns the value of an enumerated field.
    pub fn enum_value(&self, name: &str) -> Option<EnumValue> {
        match self.get(name)? {
            ResolvedValue::Enum(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the value of a Boolean field.
    pub fn bool(&self, name: &str) -> Option<bool> {
        match self.get(name)? {
            ResolvedValue::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    /// Returns the value of an integer field.
    pub fn int(&self, name: &str) -> Option<i64> {
        match self.get(name)? {
            ResolvedValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the value of a string field. Returns `None` for a `null` optional string.
    pub fn str(&self, name: &str) -> Option<&StrValue> {
        match self.get(name)? {
            ResolvedValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Converts this config back into a raw document. Resolving the document produces an equal config.
    pub fn to_document(&self) -> RawDocument {
        self.params
            .iter()
            .map(|param| {
                let value = WithOrigin::new(param.value.to_raw(), param.origin.clone());
                (param.field.name.to_owned(), value)
            })
            .collect()
    }
}

impl Serialize for ResolvedConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.params.len()))?;
        for param in &self.params {
            map.serialize_entry(param.field.name, &param.value)?;
        }
        map.end()
    }
}

impl ConfigSchema {
    /// Resolves a raw document against this schema.
    ///
    /// Fields are resolved in [dependency order](Self::resolution_order()). All field-level errors are collected;
    /// cross-field rules are only checked if every field was resolved.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Fields`] with errors for all failed fields, or [`ResolveError::Validation`]
    /// with all violated cross-field rules.
    #[tracing::instrument(level = "debug", name = "ConfigSchema::resolve", skip_all)]
    pub fn resolve(&'static self, document: &RawDocument) -> Result<ResolvedConfig, ResolveError> {
        for (key, value) in document.iter() {
            if self.field(key).is_none() {
                tracing::warn!(key = key.as_str(), origin = %value.origin, "Unknown config key is ignored");
            }
        }

        let mut slots: Vec<Option<ResolvedParam>> = self.fields.iter().map(|_| None).collect();
        let mut errors = vec![];
        for idx in self.resolution_order() {
            let field = &self.fields[idx];
            let outcome = if let Some(raw) = document.get(field.name) {
                deserialize_field(field, raw).map(|value| {
                    Some(ResolvedParam {
                        field,
                        value,
                        origin: raw.origin.clone(),
                    })
                })
            } else {
                self.default_param(field, &slots)
            };

            match outcome {
                Ok(param) => slots[idx] = param,
                Err(err) => {
                    tracing::debug!(field = field.name, %err, "Failed resolving field");
                    errors.push((idx, err));
                }
            }
        }

        errors.sort_by_key(|(idx, _)| *idx);
        let errors = errors.into_iter().map(|(_, err)| err).collect();
        if let Some(errors) = ParseErrors::new(errors) {
            return Err(errors.into());
        }

        let params: Vec<_> = slots.into_iter().flatten().collect();
        debug_assert_eq!(params.len(), self.fields.len());
        let config = ResolvedConfig {
            schema: self,
            params,
        };

        let violations: Vec<_> = self
            .validations
            .iter()
            .filter_map(|&rule| {
                let _span = tracing::trace_span!("validation", %rule).entered();
                let err = rule.validate(&config).err()?;
                tracing::debug!(%rule, %err, "Validation failed");
                Some(err)
            })
            .collect();
        if violations.is_empty() {
            tracing::debug!(fields = config.params.len(), "Resolved config");
            Ok(config)
        } else {
            Err(ResolveError::Validation(violations))
        }
    }

    /// Returns `Ok(None)` if the default cannot be computed because the field it depends on has failed to resolve.
    /// This failure is already reported for the dependency.
    fn default_param(
        &'static self,
        field: &'static FieldMetadata,
        resolved: &[Option<ResolvedParam>],
    ) -> Result<Option<ResolvedParam>, ParseError> {
        let (literal, origin) = match field.default {
            DefaultValue::Required => {
                return Err(ParseError::new(
                    ParseErrorKind::MissingRequiredField,
                    field,
                    Arc::default(),
                ));
            }
            DefaultValue::Literal(literal) => (literal, Arc::new(ValueOrigin::Default)),
            DefaultValue::Conditional(conditional) => {
                let flag_param = self
                    .index_of(conditional.flag)
                    .and_then(|idx| resolved[idx].as_ref());
                let Some(flag_param) = flag_param else {
                    return Ok(None);
                };
                let ResolvedValue::Bool(flag) = flag_param.value else {
                    return Ok(None);
                };
                let origin = Arc::new(ValueOrigin::Synthetic {
                    source: flag_param.origin.clone(),
                    transform: format!("default selected by `{}`", conditional.flag),
                });
                (conditional.select(flag), origin)
            }
        };

        tracing::trace!(field = field.name, %literal, "Using default value");
        let value = literal_value(field, literal).unwrap_or_else(|| {
            panic!(
                "default {literal} is invalid for field `{}`; the schema must pass `ConfigSchema::check()`",
                field.name
            )
        });
        Ok(Some(ResolvedParam {
            field,
            value,
            origin,
        }))
    }
}
