use std::io::{self, Write as _};

use anstream::stream::{AsLockedWrite, RawStream};
use anstyle::{AnsiColor, Color, Style};
use epd_config::{
    ConfigSchema, ParseError, RawDocument, ResolveError, ResolvedConfig,
    metadata::FieldMetadata,
    value::{FileFormat, Value, ValueOrigin, WithOrigin},
};

use crate::{
    Printer,
    utils::{SECRET, write_raw_value, write_resolved_value},
};

const SECTION: Style = Style::new().bold();
const ARROW: Style = Style::new().bold();
const JSON_FILE: Style = Style::new()
    .bg_color(Some(Color::Ansi(AnsiColor::Cyan)))
    .fg_color(None);
const YAML_FILE: Style = Style::new()
    .bg_color(Some(Color::Ansi(AnsiColor::Green)))
    .fg_color(None);
const DEFAULT: Style = Style::new().italic();
const ERROR_LABEL: Style = Style::new()
    .bold()
    .bg_color(Some(Color::Ansi(AnsiColor::Red)))
    .fg_color(None);
const WARNING_LABEL: Style = Style::new()
    .bold()
    .bg_color(Some(Color::Ansi(AnsiColor::Yellow)))
    .fg_color(None);

impl<W: RawStream + AsLockedWrite> Printer<W> {
    /// Resolves the `document` against the `schema` and prints debug info: configuration sources,
    /// resolved values of fields matching the `filter` together with their origins, and unknown keys.
    /// If resolution fails, raw values are printed together with the corresponding error(s).
    ///
    /// Secret values are always redacted.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors. The outcome of resolution is returned as the inner result.
    pub fn print_debug(
        self,
        schema: &'static ConfigSchema,
        document: &RawDocument,
        mut filter: impl FnMut(&FieldMetadata) -> bool,
    ) -> io::Result<Result<ResolvedConfig, ResolveError>> {
        let mut writer = self.writer;
        if document.sources().is_empty() {
            writeln!(&mut writer, "configuration is empty")?;
        } else {
            writeln!(&mut writer, "{SECTION}Configuration sources:{SECTION:#}")?;
            for source in document.sources() {
                write!(&mut writer, "- ")?;
                write_origin(&mut writer, &source.origin)?;
                writeln!(&mut writer, ", {} param(s)", source.param_count)?;
            }
        }

        let result = schema.resolve(document);
        writeln!(&mut writer)?;
        writeln!(&mut writer, "{SECTION}Values:{SECTION:#}")?;
        match &result {
            Ok(config) => {
                for param in config.iter().filter(|param| filter(param.field)) {
                    write!(&mut writer, "{} = ", param.field.name)?;
                    write_resolved_value(&mut writer, &param.value)?;
                    writeln!(&mut writer)?;
                    write!(&mut writer, "  Origin: ")?;
                    write_origin(&mut writer, &param.origin)?;
                    writeln!(&mut writer)?;
                }
            }
            Err(err) => {
                let field_errors: Vec<&ParseError> = match err {
                    ResolveError::Fields(errors) => errors.iter().collect(),
                    ResolveError::Validation(_) => vec![],
                };
                for field in schema.fields.iter().filter(|&field| filter(field)) {
                    let raw = document.get(field.name);
                    let field_error = field_errors
                        .iter()
                        .find(|err| err.field().name == field.name);
                    if let Some(raw) = raw {
                        write_raw_param(&mut writer, field, raw)?;
                    } else if field_error.is_some() {
                        writeln!(&mut writer, "{}", field.name)?;
                    }
                    if let Some(field_error) = field_error {
                        write_de_error(&mut writer, field_error)?;
                    }
                }

                if let ResolveError::Validation(violations) = err {
                    writeln!(&mut writer)?;
                    writeln!(&mut writer, "{SECTION}Cross-field rules:{SECTION:#}")?;
                    for violation in violations {
                        writeln!(
                            &mut writer,
                            "- {ERROR_LABEL}Error:{ERROR_LABEL:#} {violation}"
                        )?;
                    }
                }
            }
        }

        let mut unknown_keys = document
            .iter()
            .filter(|(key, _)| schema.field(key).is_none())
            .peekable();
        if unknown_keys.peek().is_some() {
            writeln!(&mut writer)?;
            writeln!(&mut writer, "{SECTION}Unknown keys:{SECTION:#}")?;
            for (key, value) in unknown_keys {
                write!(
                    &mut writer,
                    "- {key} {WARNING_LABEL}ignored{WARNING_LABEL:#}; "
                )?;
                write_origin(&mut writer, &value.origin)?;
                writeln!(&mut writer)?;
            }
        }
        Ok(result)
    }
}

fn write_origin(writer: &mut impl io::Write, origin: &ValueOrigin) -> io::Result<()> {
    match origin {
        ValueOrigin::File { name, format } => {
            let style = match format {
                FileFormat::Json => JSON_FILE,
                FileFormat::Yaml => YAML_FILE,
                _ => Style::new(),
            };
            write!(writer, "{style}{format}:{style:#}{name}")
        }
        ValueOrigin::Path { source, path } => {
            write_origin(writer, source)?;
            if !path.is_empty() {
                write!(writer, " {ARROW}->{ARROW:#} .{path}")?;
            }
            Ok(())
        }
        ValueOrigin::Synthetic { source, transform } => {
            write_origin(writer, source)?;
            write!(writer, " {ARROW}->{ARROW:#} {transform}")
        }
        ValueOrigin::Default => write!(writer, "{DEFAULT}{origin}{DEFAULT:#}"),
        _ => write!(writer, "{origin}"),
    }
}

fn write_raw_param(
    writer: &mut impl io::Write,
    field: &FieldMetadata,
    value: &WithOrigin,
) -> io::Result<()> {
    write!(writer, "{} = ", field.name)?;
    if field.is_secret && !matches!(value.inner, Value::Null) {
        // Raw values are only marked as secret during deserialization
        write!(writer, "{SECRET}[REDACTED]{SECRET:#}")?;
    } else {
        write_raw_value(writer, &value.inner)?;
    }
    writeln!(writer)?;
    write!(writer, "  Origin: ")?;
    write_origin(writer, &value.origin)?;
    writeln!(writer)
}

fn write_de_error(writer: &mut impl io::Write, err: &ParseError) -> io::Result<()> {
    writeln!(writer, "  {ERROR_LABEL}Error:{ERROR_LABEL:#} {}", err.kind())
}
