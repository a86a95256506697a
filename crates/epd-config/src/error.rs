//! Config resolution errors.

use std::{fmt, sync::Arc};

use crate::{
    metadata::{BasicTypes, FieldMetadata},
    value::ValueOrigin,
};

/// Kind of a field-level [`ParseError`].
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ParseErrorKind {
    /// Value has a wrong scalar kind, e.g. a string for a Boolean field.
    TypeMismatch {
        /// Basic types accepted by the field.
        expected: BasicTypes,
        /// Summary of the received value.
        received: String,
    },
    /// Value is not among the legal members of an enumerated field.
    InvalidEnumValue {
        /// Received value.
        received: String,
        /// Wire values of legal members in declaration order.
        legal_values: Vec<&'static str>,
    },
    /// String cannot be parsed as an integer literal.
    MalformedInteger {
        /// Received string.
        received: String,
    },
    /// Required field is absent.
    MissingRequiredField,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeMismatch { expected, received } => {
                write!(formatter, "invalid type: {received}, expected {expected}")
            }
            Self::InvalidEnumValue {
                received,
                legal_values,
            } => {
                write!(formatter, "unknown value {received:?}, expected one of ")?;
                for (i, value) in legal_values.iter().enumerate() {
                    if i > 0 {
                        formatter.write_str(", ")?;
                    }
                    write!(formatter, "{value:?}")?;
                }
                Ok(())
            }
            Self::MalformedInteger { received } => {
                write!(formatter, "{received:?} is not a valid integer literal")
            }
            Self::MissingRequiredField => formatter.write_str("missing required field"),
        }
    }
}

/// Error resolving a single configuration field.
#[derive(Debug, Clone)]
pub struct ParseError {
    kind: ParseErrorKind,
    field: &'static FieldMetadata,
    origin: Arc<ValueOrigin>,
}

impl fmt::Display for ParseError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "error parsing field `{}`", self.field.name)?;
        if !matches!(self.origin.as_ref(), ValueOrigin::Unknown) {
            write!(formatter, " [origin: {}]", self.origin)?;
        }
        write!(formatter, ": {}", self.kind)
    }
}

impl std::error::Error for ParseError {}

impl ParseError {
    pub(crate) fn new(
        kind: ParseErrorKind,
        field: &'static FieldMetadata,
        origin: Arc<ValueOrigin>,
    ) -> Self {
        Self {
            kind,
            field,
            origin,
        }
    }

    /// Returns the error kind.
    pub fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }

    /// Returns metadata for the failing field.
    pub fn field(&self) -> &'static FieldMetadata {
        self.field
    }

    /// Returns the origin of the value that failed to parse.
    pub fn origin(&self) -> &ValueOrigin {
        &self.origin
    }
}

/// Collection of field-level errors. Always contains at least one error.
#[derive(Debug, Clone)]
pub struct ParseErrors {
    errors: Vec<ParseError>,
}

impl ParseErrors {
    pub(crate) fn new(errors: Vec<ParseError>) -> Option<Self> {
        (!errors.is_empty()).then_some(Self { errors })
    }

    /// Iterates over the contained errors in schema field order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &ParseError> + '_ {
        self.errors.iter()
    }

    /// Returns the number of errors.
    #[allow(clippy::len_without_is_empty)] // is_empty should always return false
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns the first error.
    pub fn first(&self) -> &ParseError {
        &self.errors[0]
    }

    /// Finds an error for the specified field.
    pub fn for_field(&self, name: &str) -> Option<&ParseError> {
        self.errors.iter().find(|err| err.field.name == name)
    }
}

impl IntoIterator for ParseErrors {
    type Item = ParseError;
    type IntoIter = std::vec::IntoIter<ParseError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl fmt::Display for ParseErrors {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        for err in &self.errors {
            writeln!(formatter, "{err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseErrors {}

/// Violation of a cross-field rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    description: String,
}

impl ValidationError {
    /// Creates an error with the specified description.
    pub fn missing_required_combination(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }

    /// Returns a human-readable description of the violated rule.
    pub fn description(&self) -> &str {
        &self.description
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "missing required combination: {}", self.description)
    }
}

impl std::error::Error for ValidationError {}

/// Error resolving a configuration. Field-level errors and cross-field errors are never mixed:
/// cross-field rules are only checked if all fields resolved successfully.
#[derive(Debug, Clone)]
pub enum ResolveError {
    /// One or more fields failed to resolve.
    Fields(ParseErrors),
    /// All fields resolved, but one or more cross-field rules are violated.
    Validation(Vec<ValidationError>),
}

impl fmt::Display for ResolveError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fields(errors) => fmt::Display::fmt(errors, formatter),
            Self::Validation(errors) => {
                for err in errors {
                    writeln!(formatter, "{err}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ResolveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Fields(errors) => Some(errors),
            Self::Validation(errors) => errors
                .first()
                .map(|err| err as &(dyn std::error::Error + 'static)),
        }
    }
}

impl From<ParseErrors> for ResolveError {
    fn from(errors: ParseErrors) -> Self {
        Self::Fields(errors)
    }
}
