//! `epd-config` – build-time configuration validator and define generator for the e-paper weather display firmware.
//!
//! # Overview
//!
//! The firmware is configured with a flat JSON (or YAML) document: hardware pin assignments, display options,
//! units, locale, network credentials and API keys. Before compilation, the document is validated
//! against a compiled-in [schema](schema::SCHEMA) and translated into a flat set of [build defines](defines).
//!
//! Processing consists of the following steps:
//!
//! 1. Configuration input is collected into a [`RawDocument`] from one or more [sources](ConfigSource)
//!    ([`Json`], [`Yaml`]). Later sources override earlier ones key by key. As with other config systems,
//!    input follows the JSON object model (see [`Value`](value::Value)), with each value enriched
//!    with its [origin](value::ValueOrigin), e.g. a path in a specific JSON file. This allows attributing errors.
//! 2. The document is [resolved](ConfigSchema::resolve()) against the schema. Each field has a [kind](metadata::FieldKind)
//!    (an enumerated choice, Boolean, integer, string etc.) and a [default](metadata::DefaultValue), which may depend
//!    on another field. Field-level errors are collected for all fields at once; cross-field [rules](validation)
//!    are checked only if all fields have resolved successfully.
//! 3. The [resolved config](ResolvedConfig) is mapped to [`Defines`](defines::Defines) which can be rendered
//!    as a C header, compiler flags, or JSON.
//!
//! # Secrets
//!
//! Wi-Fi password and the API key are [secret](metadata::FieldMetadata::is_secret). Their values are wrapped
//! in [`SecretString`](secrecy::SecretString) and are redacted in `Debug` output, in error messages and when serializing
//! a [`ResolvedConfig`]. Secrets are still emitted verbatim into build defines since the firmware needs them.
//!
//! # Examples
//!
//! ```
//! use epd_config::{defines::{DefineValue, Defines}, Json, RawDocument};
//!
//! let json = serde_json::json!({
//!     "locale": "en_US",
//!     "useImperialUnitsAsDefault": true,
//!     "bmeAddress": "0x77",
//!     "wifiSSID": "home",
//!     "wifiPassword": "hunter2",
//!     "owmApikey": "0123456789abcdef",
//!     "latitude": "40.7128",
//!     "longitude": "-74.0060",
//!     "city": "New York",
//!     "timezone": "EST5EDT,M3.2.0,M11.1.0",
//!     "dateFormat": "%A, %B %d",
//! });
//! let serde_json::Value::Object(json) = json else { unreachable!() };
//! let document = RawDocument::new().with(Json::new("config.json", json));
//!
//! let config = epd_config::resolve(&document)?;
//! // Conditional default chosen by `useImperialUnitsAsDefault`
//! assert_eq!(config.enum_value("unitsTemp").unwrap().value(), "Fahrenheit");
//! // String-or-integer address is normalized to an integer
//! assert_eq!(config.int("bmeAddress"), Some(0x77));
//!
//! let defines = Defines::from_config(&config);
//! assert_eq!(defines.get("UNITS_TEMP"), Some(&DefineValue::Symbol("FAHRENHEIT".into())));
//! assert_eq!(defines.get("FAHRENHEIT"), Some(&DefineValue::Int(2)));
//! assert_eq!(defines.get("D_CITY"), Some(&DefineValue::Str("New York".into())));
//! # anyhow::Ok(())
//! ```

// Linter settings
#![warn(missing_docs)]

pub use self::{
    error::{ParseError, ParseErrorKind, ParseErrors, ResolveError, ValidationError},
    metadata::ConfigSchema,
    resolved::{ResolvedConfig, ResolvedParam, ResolvedValue},
    source::{ConfigSource, Json, RawDocument, SourceInfo, Yaml},
};

pub mod de;
pub mod defines;
mod error;
pub mod metadata;
mod resolved;
pub mod schema;
mod source;
#[cfg(test)]
mod testonly;
pub mod validation;
pub mod value;

/// Resolves a raw document against the [weather display schema](schema::SCHEMA).
///
/// # Errors
///
/// Returns an error if any field fails to resolve, or if a cross-field rule is violated.
/// See [`ConfigSchema::resolve()`] for details.
pub fn resolve(document: &RawDocument) -> Result<ResolvedConfig, ResolveError> {
    schema::SCHEMA.resolve(document)
}

#[cfg(doctest)]
doc_comment::doctest!("../README.md");
