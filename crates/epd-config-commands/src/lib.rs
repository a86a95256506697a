//! Command-line extensions for the `epd-config` library.
//!
//! The extensions are as follows:
//!
//! - [Printing help](Printer::print_help()) for configuration fields with optional filtering.
//! - [Debugging](Printer::print_debug()) resolved values, their origins, and resolution errors.
//! - [Printing JSON](Printer::print_json()) with syntax highlighting.
//!
//! All extensions are encapsulated in [`Printer`]. The `epd-config` binary wraps them into a CLI
//! invoked by the firmware build.
//!
//! # Examples
//!
//! ## Printing help
//!
//! ```
//! use epd_config::schema::SCHEMA;
//! use epd_config_commands::Printer;
//!
//! Printer::stderr().print_help(&SCHEMA, |field| field.name.starts_with("units"))?;
//! # std::io::Result::Ok(())
//! ```
//!
//! ## Debugging config values
//!
//! ```
//! use epd_config::{RawDocument, schema::SCHEMA};
//! use epd_config_commands::Printer;
//!
//! let document = RawDocument::new();
//! // Add sources to the document...
//!
//! let result = Printer::stderr().print_debug(&SCHEMA, &document, |_| true)?;
//! // The empty document lacks required fields.
//! assert!(result.is_err());
//! # std::io::Result::Ok(())
//! ```

// Linter settings
#![warn(missing_docs)]

use std::{
    io,
    io::{StderrLock, StdoutLock},
};

use anstream::{AutoStream, stream::RawStream};

mod debug;
mod help;
mod utils;

/// Styled output for config help and diagnostics.
///
/// Styling uses ANSI sequences via [`anstream`]. Whether they are emitted for [`stdout`](Self::stdout())
/// and [`stderr`](Self::stderr()) depends on the `NO_COLOR` / `CLICOLOR_FORCE` / `CLICOLOR` env vars and on
/// whether the stream is a terminal. Use [`custom`](Self::custom()) to override the choice, e.g. to capture
/// uncolored output in a buffer.
///
/// [`anstream`]: https://docs.rs/anstream/
#[derive(Debug)]
pub struct Printer<W: RawStream> {
    writer: AutoStream<W>,
}

impl Printer<StdoutLock<'static>> {
    /// Creates a printer writing to stdout. Stdout stays locked until the printer is dropped.
    pub fn stdout() -> Self {
        Self {
            writer: AutoStream::auto(io::stdout()).lock(),
        }
    }
}

impl Printer<StderrLock<'static>> {
    /// Creates a printer writing to stderr. Stderr stays locked until the printer is dropped.
    pub fn stderr() -> Self {
        Self {
            writer: AutoStream::auto(io::stderr()).lock(),
        }
    }
}

impl<W: RawStream> Printer<W> {
    /// Creates a printer over an arbitrary stream with explicitly chosen styling.
    pub fn custom(writer: AutoStream<W>) -> Self {
        Self { writer }
    }
}

#[cfg(doctest)]
doc_comment::doctest!("../README.md");
