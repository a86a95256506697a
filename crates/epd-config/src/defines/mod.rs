//! Build define generation.
//!
//! A [`ResolvedConfig`] is mapped to an ordered set of preprocessor defines consumed by the firmware build:
//!
//! 1. Every member of each [exported enumeration](crate::ConfigSchema::exported_enums) is defined
//!    as its 0-based ordinal, e.g. `#define FAHRENHEIT 2`.
//! 2. Every field is defined according to its kind and [`DefineStyle`]; the define name is the field name
//!    [converted](upper_snake()) to the upper snake case. Enumerated fields reference the ordinal defines
//!    by symbolic name (`#define UNITS_TEMP FAHRENHEIT`), Booleans are defined as 0 / 1, and strings
//!    are defined as C string literals under the `D_` prefix (`#define D_CITY "Tartu"`).
//!
//! Secret values are emitted verbatim.

use std::fmt::{self, Write as _};

use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::{
    ResolvedConfig,
    metadata::{DefineStyle, FieldKind, FieldMetadata},
    resolved::ResolvedValue,
};

#[cfg(test)]
mod tests;

/// Include guard used by [`Defines::to_header()`].
pub const HEADER_GUARD: &str = "EPD_CONFIG_DEFINES_H";
/// Name of the define holding the path to the font header.
pub const FONT_HEADER: &str = "FONT_HEADER";

const FONT_HEADERS: &[(&str, &str)] = &[
    ("FreeMono", "fonts/FreeMono.h"),
    ("FreeSans", "fonts/FreeSans.h"),
    ("FreeSerif", "fonts/FreeSerif.h"),
    ("Lato", "fonts/Lato_Regular.h"),
    ("Montserrat", "fonts/Montserrat_Regular.h"),
    ("Open Sans", "fonts/OpenSans_Regular.h"),
    ("Poppins", "fonts/Poppins_Regular.h"),
    ("Quicksand", "fonts/Quicksand_Regular.h"),
    ("Raleway", "fonts/Raleway_Regular.h"),
    ("Roboto", "fonts/Roboto_Regular.h"),
    ("Roboto Mono", "fonts/RobotoMono_Regular.h"),
    ("Roboto Slab", "fonts/RobotoSlab_Regular.h"),
    ("Ubuntu", "fonts/Ubuntu_R.h"),
    ("Ubuntu Mono", "fonts/UbuntuMono_R.h"),
];

/// Returns the header path for the font with the specified wire value, e.g. `fonts/Lato_Regular.h` for `Lato`.
pub fn font_header(font: &str) -> Option<&'static str> {
    FONT_HEADERS
        .iter()
        .find_map(|&(name, path)| (name == font).then_some(path))
}

/// Converts a camel-case field name to the upper snake case used for define names.
///
/// A word boundary is placed before an uppercase letter that either starts a run of uppercase letters,
/// or is followed by a lowercase letter. Thus, acronyms are kept together.
///
/// # Examples
///
/// ```
/// use epd_config::defines::upper_snake;
///
/// assert_eq!(upper_snake("pinEpdCS"), "PIN_EPD_CS");
/// assert_eq!(upper_snake("weatherAPI"), "WEATHER_API");
/// assert_eq!(upper_snake("statusBarExtrasWifiRSSI"), "STATUS_BAR_EXTRAS_WIFI_RSSI");
/// ```
pub fn upper_snake(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut snake = String::with_capacity(name.len() + 4);
    for (i, &ch) in chars.iter().enumerate() {
        if i > 0 && ch.is_ascii_uppercase() {
            let starts_run = !chars[i - 1].is_ascii_uppercase();
            let starts_word = chars.get(i + 1).is_some_and(char::is_ascii_lowercase);
            if starts_run || starts_word {
                snake.push('_');
            }
        }
        snake.push(ch.to_ascii_uppercase());
    }
    snake
}

/// Returns the name of the define generated for the `field`.
pub fn define_name(field: &FieldMetadata) -> String {
    match (field.kind, field.define) {
        (FieldKind::Enum(_), DefineStyle::FontHeader) => FONT_HEADER.to_owned(),
        (FieldKind::String | FieldKind::OptionalString, _) => {
            format!("D_{}", upper_snake(field.name))
        }
        _ => upper_snake(field.name),
    }
}

/// Value of a single define.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefineValue {
    /// Integer literal.
    Int(i64),
    /// Bare token, e.g. a reference to another define.
    Symbol(String),
    /// String; rendered as a quoted and escaped C string literal.
    Str(String),
}

impl fmt::Display for DefineValue {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(formatter, "{value}"),
            Self::Symbol(token) => formatter.write_str(token),
            Self::Str(s) => write_c_string(formatter, s),
        }
    }
}

/// Integers are serialized as numbers; other values as their C source text.
impl Serialize for DefineValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Int(value) => serializer.serialize_i64(*value),
            Self::Symbol(token) => serializer.serialize_str(token),
            Self::Str(_) => serializer.collect_str(self),
        }
    }
}

fn write_c_string(formatter: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    formatter.write_char('"')?;
    for ch in s.chars() {
        match ch {
            '"' => formatter.write_str("\\\"")?,
            '\\' => formatter.write_str("\\\\")?,
            '\n' => formatter.write_str("\\n")?,
            '\r' => formatter.write_str("\\r")?,
            '\t' => formatter.write_str("\\t")?,
            // Octal escapes are used since hex escapes in C are not limited in length.
            ch if ch.is_ascii_control() => write!(formatter, "\\{:03o}", ch as u32)?,
            ch => formatter.write_char(ch)?,
        }
    }
    formatter.write_char('"')
}

/// Ordered set of build defines.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Defines {
    entries: Vec<(String, DefineValue)>,
}

impl Defines {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Generates defines for the resolved config.
    #[tracing::instrument(level = "debug", name = "Defines::from_config", skip_all)]
    pub fn from_config(config: &ResolvedConfig) -> Self {
        let mut defines = Self::new();
        for &meta in config.schema().exported_enums {
            for (i, variant) in meta.variants.iter().enumerate() {
                let ordinal = i64::try_from(i).unwrap_or(i64::MAX);
                defines.insert(variant.name, DefineValue::Int(ordinal));
            }
        }
        let ordinal_count = defines.len();

        for param in config.iter() {
            let field = param.field;
            let name = define_name(field);
            match (&param.value, field.define) {
                (ResolvedValue::Enum(value), DefineStyle::WireValue) => {
                    defines.insert(name, DefineValue::Symbol(value.value().to_owned()));
                }
                (ResolvedValue::Enum(value), DefineStyle::FontHeader) => {
                    if let Some(path) = font_header(value.value()) {
                        defines.insert(name, DefineValue::Str(path.to_owned()));
                    } else {
                        tracing::warn!(
                            field = field.name,
                            value = value.value(),
                            "No header for font; firmware default will be used"
                        );
                    }
                }
                (ResolvedValue::Enum(value), _) => {
                    defines.insert(name, DefineValue::Symbol(value.name().to_owned()));
                }
                (ResolvedValue::Bool(flag), _) => {
                    defines.insert(name, DefineValue::Int(i64::from(*flag)));
                }
                (ResolvedValue::Integer(value), _) => {
                    defines.insert(name, DefineValue::Int(*value));
                }
                (ResolvedValue::String(s), _) => {
                    defines.insert(name, DefineValue::Str(s.expose().to_owned()));
                }
                (ResolvedValue::Null, _) => {
                    defines.insert(name, DefineValue::Str(String::new()));
                }
            }
        }

        tracing::debug!(
            ordinal_count,
            total_count = defines.len(),
            "Generated build defines"
        );
        defines
    }

    /// Inserts a define. If a define with the same name is present, its value is replaced
    /// while it retains its position.
    pub fn insert(&mut self, name: impl Into<String>, value: DefineValue) {
        let name = name.into();
        if let Some((_, existing)) = self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            *existing = value;
        } else {
            self.entries.push((name, value));
        }
    }

    /// Returns the value of a define.
    pub fn get(&self, name: &str) -> Option<&DefineValue> {
        self.entries
            .iter()
            .find_map(|(existing, value)| (existing == name).then_some(value))
    }

    /// Iterates over defines in the insertion order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &DefineValue)> + '_ {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Returns the number of defines.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks whether this set is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renders defines as a C header with an include guard.
    pub fn to_header(&self) -> String {
        let mut header = format!(
            "// Generated by epd-config; do not edit.\n#ifndef {HEADER_GUARD}\n#define {HEADER_GUARD}\n\n"
        );
        for (name, value) in &self.entries {
            writeln!(header, "#define {name} {value}").ok();
        }
        write!(header, "\n#endif // {HEADER_GUARD}\n").ok();
        header
    }

    /// Renders defines as compiler flags, one `-DNAME=value` flag per line.
    pub fn to_flags(&self) -> String {
        let mut flags = String::new();
        for (name, value) in &self.entries {
            writeln!(flags, "-D{name}={value}").ok();
        }
        flags
    }
}

/// Serializes defines as a map in the insertion order.
impl Serialize for Defines {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
