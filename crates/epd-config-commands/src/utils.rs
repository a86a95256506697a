//! Functionality shared by multiple CLI commands.

use std::io::{self, Write as _};

use anstream::stream::{AsLockedWrite, RawStream};
use anstyle::{AnsiColor, Color, Style};
use epd_config::{
    ResolvedValue,
    value::{StrValue, Value},
};

use crate::Printer;

pub(crate) const DIMMED: Style = Style::new().dimmed();
pub(crate) const SECRET: Style = Style::new()
    .bg_color(Some(Color::Ansi(AnsiColor::Cyan)))
    .fg_color(None);
const STRING: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan)));
const NULL: Style = Style::new().bold();
const BOOL: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow)));
const NUMBER: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green)));
const OBJECT_KEY: Style = Style::new().bold();

impl<W: RawStream + AsLockedWrite> Printer<W> {
    /// Outputs JSON with syntax highlighting. Keys of a top-level object are placed on separate lines;
    /// nested values are output inline.
    ///
    /// # Errors
    ///
    /// Proxies I/O errors.
    pub fn print_json(&mut self, json: &serde_json::Value) -> io::Result<()> {
        let writer = &mut self.writer;
        let serde_json::Value::Object(map) = json else {
            write_json_value(writer, json)?;
            return writeln!(writer);
        };
        if map.is_empty() {
            return writeln!(writer, "{{}}");
        }

        writeln!(writer, "{{")?;
        for (i, (key, value)) in map.iter().enumerate() {
            write!(writer, "  {OBJECT_KEY}{}{OBJECT_KEY:#}: ", json_string(key)?)?;
            write_json_value(writer, value)?;
            let separator = if i + 1 < map.len() { "," } else { "" };
            writeln!(writer, "{separator}")?;
        }
        writeln!(writer, "}}")
    }

    /// Outputs YAML adhering to the JSON model with syntax highlighting. Nested values are output
    /// in the flow style.
    ///
    /// # Errors
    ///
    /// Proxies I/O errors.
    pub fn print_yaml(&mut self, json: &serde_json::Value) -> io::Result<()> {
        let writer = &mut self.writer;
        let serde_json::Value::Object(map) = json else {
            write_yaml_value(writer, json)?;
            return writeln!(writer);
        };
        if map.is_empty() {
            return writeln!(writer, "{{}}");
        }

        for (key, value) in map {
            write!(writer, "{OBJECT_KEY}{}{OBJECT_KEY:#}: ", yaml_string(key)?)?;
            write_yaml_value(writer, value)?;
            writeln!(writer)?;
        }
        Ok(())
    }
}

fn json_string(val: &str) -> io::Result<String> {
    serde_json::to_string(val).map_err(io::Error::other)
}

fn yaml_string(val: &str) -> io::Result<String> {
    // YAML quoting rules are non-trivial, so the library decides how to escape the string.
    let mut yaml = serde_yaml::to_string(val).map_err(io::Error::other)?;
    if yaml.ends_with('\n') {
        yaml.pop();
    }
    Ok(yaml)
}

/// Writes a value on a single line. The output is valid both as JSON and as flow-style YAML.
fn write_json_value(writer: &mut impl io::Write, value: &serde_json::Value) -> io::Result<()> {
    match value {
        serde_json::Value::Null => write!(writer, "{NULL}null{NULL:#}"),
        serde_json::Value::Bool(val) => write!(writer, "{BOOL}{val:?}{BOOL:#}"),
        serde_json::Value::Number(val) => write!(writer, "{NUMBER}{val}{NUMBER:#}"),
        serde_json::Value::String(val) => write!(writer, "{STRING}{}{STRING:#}", json_string(val)?),
        serde_json::Value::Array(items) => {
            write!(writer, "[")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(writer, ", ")?;
                }
                write_json_value(writer, item)?;
            }
            write!(writer, "]")
        }
        serde_json::Value::Object(map) => {
            write!(writer, "{{")?;
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    write!(writer, ", ")?;
                }
                write!(writer, "{OBJECT_KEY}{}{OBJECT_KEY:#}: ", json_string(key)?)?;
                write_json_value(writer, item)?;
            }
            write!(writer, "}}")
        }
    }
}

fn write_yaml_value(writer: &mut impl io::Write, value: &serde_json::Value) -> io::Result<()> {
    if let serde_json::Value::String(val) = value {
        write!(writer, "{STRING}{}{STRING:#}", yaml_string(val)?)
    } else {
        write_json_value(writer, value)
    }
}

/// Writes a raw input value. Nested values are summarized since config documents are flat.
pub(crate) fn write_raw_value(writer: &mut impl io::Write, value: &Value) -> io::Result<()> {
    match value {
        Value::Null => write!(writer, "{NULL}null{NULL:#}"),
        Value::Bool(val) => write!(writer, "{BOOL}{val:?}{BOOL:#}"),
        Value::Number(val) => write!(writer, "{NUMBER}{val}{NUMBER:#}"),
        Value::String(StrValue::Plain(val)) => write!(writer, "{STRING}{val:?}{STRING:#}"),
        Value::String(StrValue::Secret(_)) => write!(writer, "{SECRET}[REDACTED]{SECRET:#}"),
        Value::Array(_) | Value::Object(_) => {
            write!(writer, "{DIMMED}<{}>{DIMMED:#}", value.summary())
        }
    }
}

pub(crate) fn write_resolved_value(
    writer: &mut impl io::Write,
    value: &ResolvedValue,
) -> io::Result<()> {
    match value {
        ResolvedValue::Enum(member) => {
            let (wire_value, name) = (member.value(), member.name());
            write!(writer, "{STRING}{wire_value:?}{STRING:#}")?;
            if wire_value != name {
                write!(writer, " {DIMMED}[{name}]{DIMMED:#}")?;
            }
            Ok(())
        }
        ResolvedValue::Bool(val) => write!(writer, "{BOOL}{val:?}{BOOL:#}"),
        ResolvedValue::Integer(val) => write!(writer, "{NUMBER}{val}{NUMBER:#}"),
        ResolvedValue::String(StrValue::Plain(val)) => {
            write!(writer, "{STRING}{val:?}{STRING:#}")
        }
        ResolvedValue::String(StrValue::Secret(_)) => {
            write!(writer, "{SECRET}[REDACTED]{SECRET:#}")
        }
        ResolvedValue::Null => write!(writer, "{NULL}null{NULL:#}"),
    }
}
