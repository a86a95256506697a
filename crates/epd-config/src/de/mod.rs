//! Field-level deserialization of raw values.
//!
//! Each [`FieldKind`] has a fixed set of accepted [basic types](crate::metadata::BasicTypes).
//! Values outside this set produce [`ParseErrorKind::TypeMismatch`]; values of a supported type
//! may still be rejected, e.g. strings not matching any enumeration member.

use crate::{
    error::{ParseError, ParseErrorKind},
    metadata::{FieldKind, FieldMetadata, Literal},
    resolved::ResolvedValue,
    value::{StrValue, Value, WithOrigin},
};

pub use self::literal::parse_int_literal;

mod literal;

const REDACTED: &str = "[REDACTED]";

/// Deserializes a value supplied for the `field`.
pub(crate) fn deserialize_field(
    field: &'static FieldMetadata,
    raw: &WithOrigin,
) -> Result<ResolvedValue, ParseError> {
    let error = |kind| ParseError::new(kind, field, raw.origin.clone());
    let type_mismatch = || {
        error(ParseErrorKind::TypeMismatch {
            expected: field.kind.expecting(),
            received: received_summary(field, &raw.inner),
        })
    };
    let received_str = |s: &StrValue| {
        if field.is_secret {
            REDACTED.to_owned()
        } else {
            s.expose().to_owned()
        }
    };

    Ok(match (field.kind, &raw.inner) {
        (FieldKind::Enum(meta), Value::String(s)) => {
            let value = meta.find(s.expose()).ok_or_else(|| {
                error(ParseErrorKind::InvalidEnumValue {
                    received: received_str(s),
                    legal_values: meta.legal_values(),
                })
            })?;
            ResolvedValue::Enum(value)
        }
        (FieldKind::Bool, Value::Bool(flag)) => ResolvedValue::Bool(*flag),
        (FieldKind::Integer | FieldKind::StringOrInteger, Value::Number(number)) => {
            ResolvedValue::Integer(number.as_i64().ok_or_else(type_mismatch)?)
        }
        (FieldKind::StringOrInteger, Value::String(s)) => {
            let value = parse_int_literal(s.expose()).ok_or_else(|| {
                error(ParseErrorKind::MalformedInteger {
                    received: received_str(s),
                })
            })?;
            ResolvedValue::Integer(value)
        }
        (FieldKind::String | FieldKind::OptionalString, Value::String(s)) => {
            ResolvedValue::String(string_value(field, s.clone()))
        }
        (FieldKind::OptionalString, Value::Null) => ResolvedValue::Null,
        _ => return Err(type_mismatch()),
    })
}

/// Summarizes a value that doesn't fit the `field`. Raw values are only marked as secret once they
/// deserialize, so for secret fields only the basic type of the value is reported.
fn received_summary(field: &FieldMetadata, value: &Value) -> String {
    match value.basic_type() {
        Some(ty) if field.is_secret => format!("{REDACTED} {ty}"),
        _ => value.summary(),
    }
}

/// Converts a default literal for the `field`. Returns `None` if the literal is not legal for the field,
/// which can only happen for schemas not passing [`ConfigSchema::check()`](crate::ConfigSchema::check()).
pub(crate) fn literal_value(field: &'static FieldMetadata, literal: Literal) -> Option<ResolvedValue> {
    Some(match (field.kind, literal) {
        (FieldKind::Enum(meta), Literal::Enum(name)) => ResolvedValue::Enum(meta.by_name(name)?),
        (FieldKind::Bool, Literal::Bool(flag)) => ResolvedValue::Bool(flag),
        (FieldKind::Integer | FieldKind::StringOrInteger, Literal::Integer(value)) => {
            ResolvedValue::Integer(value)
        }
        (FieldKind::String | FieldKind::OptionalString, Literal::Str(s)) => {
            ResolvedValue::String(string_value(field, s.into()))
        }
        (FieldKind::OptionalString, Literal::Null) => ResolvedValue::Null,
        _ => return None,
    })
}

fn string_value(field: &FieldMetadata, mut value: StrValue) -> StrValue {
    if field.is_secret {
        value.make_secret();
    }
    value
}
