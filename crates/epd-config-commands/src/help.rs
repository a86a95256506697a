use std::{io, io::Write as _};

use anstream::stream::{AsLockedWrite, RawStream};
use anstyle::{AnsiColor, Color, Style};
use epd_config::{
    ConfigSchema,
    defines::define_name,
    metadata::{DefaultValue, EnumMetadata, FieldKind, FieldMetadata},
};

use crate::{
    Printer,
    utils::{DIMMED, SECRET},
};

const INDENT: &str = "  ";
const MAIN_NAME: Style = Style::new().bold();
const FIELD: Style = Style::new().underline();
const DEFAULT_VAL: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green)));
const REQUIRED: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red)));
const DEFINE: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan)));

impl<W: RawStream + AsLockedWrite> Printer<W> {
    /// Prints help on config fields in the provided `schema`. Fields can be filtered by the supplied predicate.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors.
    pub fn print_help(
        self,
        schema: &ConfigSchema,
        mut filter: impl FnMut(&FieldMetadata) -> bool,
    ) -> io::Result<()> {
        let mut writer = self.writer;
        for field in schema.fields.iter().filter(|&field| filter(field)) {
            write_help(&mut writer, field)?;
            writeln!(&mut writer)?;
        }
        Ok(())
    }
}

fn write_help(writer: &mut impl io::Write, field: &FieldMetadata) -> io::Result<()> {
    writeln!(writer, "{MAIN_NAME}{}{MAIN_NAME:#}", field.name)?;

    let maybe_secret = if field.is_secret {
        format!("{SECRET}secret{SECRET:#} ")
    } else {
        String::new()
    };
    writeln!(
        writer,
        "{INDENT}{FIELD}Type{FIELD:#}: {maybe_secret}{} {DIMMED}[input: {}]{DIMMED:#}",
        field.kind,
        field.kind.expecting()
    )?;

    write!(writer, "{INDENT}{FIELD}Default{FIELD:#}: ")?;
    match field.default {
        DefaultValue::Required => writeln!(writer, "{REQUIRED}none, required{REQUIRED:#}")?,
        DefaultValue::Literal(literal) => {
            writeln!(writer, "{DEFAULT_VAL}{literal}{DEFAULT_VAL:#}")?;
        }
        DefaultValue::Conditional(conditional) => writeln!(
            writer,
            "{DEFAULT_VAL}{}{DEFAULT_VAL:#} if `{}` is set, otherwise {DEFAULT_VAL}{}{DEFAULT_VAL:#}",
            conditional.if_set, conditional.flag, conditional.if_unset
        )?,
    }

    writeln!(
        writer,
        "{INDENT}{FIELD}Define{FIELD:#}: {DEFINE}{}{DEFINE:#}",
        define_name(field)
    )?;

    if let FieldKind::Enum(meta) = field.kind {
        write_members(writer, meta)?;
    }

    for line in field.help.lines() {
        writeln!(writer, "{INDENT}{line}")?;
    }
    Ok(())
}

fn write_members(writer: &mut impl io::Write, meta: &EnumMetadata) -> io::Result<()> {
    write!(writer, "{INDENT}{FIELD}Members{FIELD:#}:")?;
    if meta.help.is_empty() {
        writeln!(writer)?;
    } else {
        writeln!(writer, " {}", meta.help)?;
    }

    for variant in meta.variants {
        write!(writer, "{INDENT}- {DEFAULT_VAL}{:?}{DEFAULT_VAL:#}", variant.value)?;
        if variant.name != variant.value {
            write!(writer, " {DIMMED}[{}]{DIMMED:#}", variant.name)?;
        }
        if variant.help.is_empty() {
            writeln!(writer)?;
        } else {
            writeln!(writer, ": {}", variant.help)?;
        }
    }
    Ok(())
}
