//! Configuration metadata: field kinds, enumerations and defaults.

use std::{fmt, ptr};

use crate::validation::Validate;


/// Set of one or more basic types in the JSON object model.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BasicTypes(u8);

impl BasicTypes {
    /// Boolean value.
    pub const BOOL: Self = Self(1);
    /// Integer value.
    pub const INTEGER: Self = Self(2);
    /// Floating-point value.
    pub const FLOAT: Self = Self(4 | 2);
    /// String.
    pub const STRING: Self = Self(8);
    /// Array of values.
    pub const ARRAY: Self = Self(16);
    /// Object / map of values.
    pub const OBJECT: Self = Self(32);
    /// Explicit `null`.
    pub const NULL: Self = Self(64);

    const COMPONENTS: &'static [(Self, &'static str)] = &[
        (Self::BOOL, "Boolean"),
        (Self::INTEGER, "integer"),
        (Self::FLOAT, "float"),
        (Self::STRING, "string"),
        (Self::ARRAY, "array"),
        (Self::OBJECT, "object"),
        (Self::NULL, "null"),
    ];

    /// Returns a union of two sets of basic types.
    #[must_use]
    pub const fn or(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }

    /// Checks whether the `needle` is fully contained in this set.
    pub const fn contains(self, needle: Self) -> bool {
        self.0 & needle.0 == needle.0
    }
}

impl fmt::Display for BasicTypes {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut is_empty = true;
        for &(component, name) in Self::COMPONENTS {
            // `FLOAT` includes `INTEGER`, so we don't want to output both
            if component == Self::INTEGER && self.contains(Self::FLOAT) {
                continue;
            }
            if self.contains(component) {
                if !is_empty {
                    formatter.write_str(" | ")?;
                }
                formatter.write_str(name)?;
                is_empty = false;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for BasicTypes {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, formatter)
    }
}

/// Member of an [enumeration](EnumMetadata).
#[derive(Debug, Clone, Copy)]
pub struct EnumVariant {
    /// Stable symbolic name, e.g. `DISP_BW_V2`. Used as the build define name.
    pub name: &'static str,
    /// Value in configuration input, e.g. `"Good Display DESPI-C02"`.
    pub value: &'static str,
    /// Human-readable documentation. May be empty.
    pub help: &'static str,
}

impl EnumVariant {
    /// Creates a variant without documentation.
    pub const fn new(name: &'static str, value: &'static str) -> Self {
        Self {
            name,
            value,
            help: "",
        }
    }

    /// Adds documentation to this variant.
    #[must_use]
    pub const fn help(mut self, help: &'static str) -> Self {
        self.help = help;
        self
    }
}

/// Closed, ordered set of legal members for an enumerated-choice field. Member order is significant;
/// it defines ordinals emitted into build defines.
#[derive(Debug)]
pub struct EnumMetadata {
    /// Name of the enumeration, e.g. `UnitsTemp`.
    pub name: &'static str,
    /// Human-readable documentation. May be empty.
    pub help: &'static str,
    /// Members in declaration order.
    pub variants: &'static [EnumVariant],
}

impl EnumMetadata {
    /// Looks up a member by its wire value or, failing that, by its symbolic name.
    pub fn find(&'static self, name_or_value: &str) -> Option<EnumValue> {
        let by_value = self
            .variants
            .iter()
            .position(|variant| variant.value == name_or_value);
        let index = by_value.or_else(|| {
            self.variants
                .iter()
                .position(|variant| variant.name == name_or_value)
        })?;
        Some(EnumValue { meta: self, index })
    }

    /// Looks up a member by its symbolic name only.
    pub fn by_name(&'static self, name: &str) -> Option<EnumValue> {
        let index = self.variants.iter().position(|variant| variant.name == name)?;
        Some(EnumValue { meta: self, index })
    }

    /// Returns wire values of all members in declaration order.
    pub fn legal_values(&self) -> Vec<&'static str> {
        self.variants.iter().map(|variant| variant.value).collect()
    }
}

/// Single member of an enumeration, referenced by its position.
#[derive(Clone, Copy)]
pub struct EnumValue {
    meta: &'static EnumMetadata,
    index: usize,
}

impl fmt::Debug for EnumValue {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}::{}", self.meta.name, self.name())
    }
}

impl PartialEq for EnumValue {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.meta, other.meta) && self.index == other.index
    }
}

impl EnumValue {
    /// Returns the enumeration this member belongs to.
    pub fn enumeration(&self) -> &'static EnumMetadata {
        self.meta
    }

    /// Returns the full member description.
    pub fn variant(&self) -> &'static EnumVariant {
        &self.meta.variants[self.index]
    }

    /// 0-based position of the member in declaration order.
    pub fn ordinal(&self) -> usize {
        self.index
    }

    /// Symbolic name of the member.
    pub fn name(&self) -> &'static str {
        self.variant().name
    }

    /// Wire value of the member.
    pub fn value(&self) -> &'static str {
        self.variant().value
    }
}

/// Kind of a configuration field. This is a closed taxonomy; all processing dispatches on it.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// One member of the enclosed enumeration, given by its wire value or symbolic name.
    Enum(&'static EnumMetadata),
    /// Boolean value.
    Bool,
    /// Native integer.
    Integer,
    /// String.
    String,
    /// String or explicit `null`.
    OptionalString,
    /// Native integer, or a string containing a C-style integer literal (`0x76`, `0166`, `118`).
    StringOrInteger,
}

impl FieldKind {
    /// Basic types accepted in raw input for this kind.
    pub const fn expecting(&self) -> BasicTypes {
        match self {
            Self::Enum(_) | Self::String => BasicTypes::STRING,
            Self::Bool => BasicTypes::BOOL,
            Self::Integer => BasicTypes::INTEGER,
            Self::OptionalString => BasicTypes::STRING.or(BasicTypes::NULL),
            Self::StringOrInteger => BasicTypes::INTEGER.or(BasicTypes::STRING),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enum(meta) => write!(formatter, "enum {}", meta.name),
            Self::Bool => formatter.write_str("Boolean"),
            Self::Integer => formatter.write_str("integer"),
            Self::String => formatter.write_str("string"),
            Self::OptionalString => formatter.write_str("optional string"),
            Self::StringOrInteger => formatter.write_str("integer literal"),
        }
    }
}

/// Literal default value for a field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal {
    /// Enumeration member referenced by its symbolic name.
    Enum(&'static str),
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Integer(i64),
    /// String value.
    Str(&'static str),
    /// `null`.
    Null,
}

impl fmt::Display for Literal {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enum(name) => formatter.write_str(name),
            Self::Bool(value) => write!(formatter, "{value}"),
            Self::Integer(value) => write!(formatter, "{value}"),
            Self::Str(value) => write!(formatter, "{value:?}"),
            Self::Null => formatter.write_str("null"),
        }
    }
}

/// Default chosen by a Boolean flag field resolved earlier.
#[derive(Debug, Clone, Copy)]
pub struct ConditionalDefault {
    /// Name of the Boolean field the default depends on.
    pub flag: &'static str,
    /// Default if the flag is `true`.
    pub if_set: Literal,
    /// Default if the flag is `false`.
    pub if_unset: Literal,
}

impl ConditionalDefault {
    /// Selects the default given the flag value.
    pub fn select(&self, flag: bool) -> Literal {
        if flag { self.if_set } else { self.if_unset }
    }
}

impl fmt::Display for ConditionalDefault {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{} if `{}` is set, otherwise {}",
            self.if_set, self.flag, self.if_unset
        )
    }
}

/// Default value specification for a field.
#[derive(Debug, Clone, Copy)]
pub enum DefaultValue {
    /// No default; the field must be supplied.
    Required,
    /// Fixed default.
    Literal(Literal),
    /// Default depending on another field.
    Conditional(ConditionalDefault),
}

/// How a field is emitted into build defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum DefineStyle {
    /// Standard mapping by field kind.
    Standard,
    /// Enumeration member emitted as its wire value (a bare token) instead of its symbolic name.
    WireValue,
    /// Enumeration member emitted as a quoted font header path under the `FONT_HEADER` define.
    FontHeader,
}

/// Metadata for a single configuration field.
#[derive(Debug, Clone, Copy)]
pub struct FieldMetadata {
    /// Unique name of the field in configuration input, e.g. `unitsTemp`.
    pub name: &'static str,
    /// Human-readable help.
    pub help: &'static str,
    /// Kind of the field.
    pub kind: FieldKind,
    /// Default value.
    pub default: DefaultValue,
    /// Whether the value must be hidden in human-readable output.
    pub is_secret: bool,
    /// Mapping to build defines.
    pub define: DefineStyle,
}

impl FieldMetadata {
    /// Creates a required field with no help.
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            help: "",
            kind,
            default: DefaultValue::Required,
            is_secret: false,
            define: DefineStyle::Standard,
        }
    }

    /// Sets help for the field.
    #[must_use]
    pub const fn help(mut self, help: &'static str) -> Self {
        self.help = help;
        self
    }

    /// Sets a literal default.
    #[must_use]
    pub const fn default_to(mut self, value: Literal) -> Self {
        self.default = DefaultValue::Literal(value);
        self
    }

    /// Sets a default depending on the Boolean `flag` field.
    #[must_use]
    pub const fn default_if(
        mut self,
        flag: &'static str,
        if_set: Literal,
        if_unset: Literal,
    ) -> Self {
        self.default = DefaultValue::Conditional(ConditionalDefault {
            flag,
            if_set,
            if_unset,
        });
        self
    }

    /// Marks the field as secret.
    #[must_use]
    pub const fn secret(mut self) -> Self {
        self.is_secret = true;
        self
    }

    /// Overrides how the field is emitted into build defines.
    #[must_use]
    pub const fn define(mut self, style: DefineStyle) -> Self {
        self.define = style;
        self
    }

    /// Checks whether the field must be supplied by the caller.
    pub const fn is_required(&self) -> bool {
        matches!(self.default, DefaultValue::Required)
    }
}

/// Complete configuration schema: fields, enumerations exported as ordinal defines, and cross-field rules.
#[derive(Debug)]
pub struct ConfigSchema {
    /// Fields in declaration order.
    pub fields: &'static [FieldMetadata],
    /// Enumerations whose members are exported as global ordinal defines, in export order.
    pub exported_enums: &'static [&'static EnumMetadata],
    /// Cross-field rules checked after all fields are resolved.
    pub validations: &'static [&'static dyn Validate],
}

/// Structural defect in a [`ConfigSchema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaError(String);

impl fmt::Display for SchemaError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

impl std::error::Error for SchemaError {}

impl ConfigSchema {
    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&'static FieldMetadata> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub(crate) fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name == name)
    }

    /// Returns field indices in an order in which every conditional default is computed
    /// after the flag it depends on: fields with literal (or no) defaults first, then conditional ones.
    pub fn resolution_order(&self) -> impl Iterator<Item = usize> + '_ {
        let is_conditional =
            |field: &FieldMetadata| matches!(field.default, DefaultValue::Conditional(_));
        let independent = self
            .fields
            .iter()
            .enumerate()
            .filter(move |(_, field)| !is_conditional(field));
        let dependent = self
            .fields
            .iter()
            .enumerate()
            .filter(move |(_, field)| is_conditional(field));
        independent.chain(dependent).map(|(i, _)| i)
    }

    /// Checks internal consistency of the schema.
    ///
    /// # Errors
    ///
    /// Returns an error if field names are duplicated, a default is not a legal value for its field,
    /// or a conditional default depends on something other than an unconditional Boolean field.
    pub fn check(&self) -> Result<(), SchemaError> {
        for (i, field) in self.fields.iter().enumerate() {
            if self.fields[..i].iter().any(|prev| prev.name == field.name) {
                return Err(SchemaError(format!("field `{}` is defined twice", field.name)));
            }

            match field.default {
                DefaultValue::Required => {}
                DefaultValue::Literal(literal) => check_literal(field, literal)?,
                DefaultValue::Conditional(conditional) => {
                    check_literal(field, conditional.if_set)?;
                    check_literal(field, conditional.if_unset)?;
                    let flag = self.field(conditional.flag).ok_or_else(|| {
                        SchemaError(format!(
                            "default for `{}` depends on undefined field `{}`",
                            field.name, conditional.flag
                        ))
                    })?;
                    if !matches!(flag.kind, FieldKind::Bool)
                        || matches!(flag.default, DefaultValue::Conditional(_))
                    {
                        return Err(SchemaError(format!(
                            "default for `{}` must depend on a Boolean field with an unconditional default; `{}` is not",
                            field.name, flag.name
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

fn check_literal(field: &FieldMetadata, literal: Literal) -> Result<(), SchemaError> {
    let is_legal = match (field.kind, literal) {
        (FieldKind::Enum(meta), Literal::Enum(name)) => meta.by_name(name).is_some(),
        (FieldKind::Bool, Literal::Bool(_))
        | (FieldKind::Integer | FieldKind::StringOrInteger, Literal::Integer(_))
        | (FieldKind::String | FieldKind::OptionalString, Literal::Str(_))
        | (FieldKind::OptionalString, Literal::Null) => true,
        _ => false,
    };
    if is_legal {
        Ok(())
    } else {
        Err(SchemaError(format!(
            "default {literal} is not a legal value for `{}` ({})",
            field.name, field.kind
        )))
    }
}
