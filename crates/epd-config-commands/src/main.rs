//! `epd-config` command-line tool invoked by the firmware build.

use std::{
    fs, io,
    io::Write as _,
    path::{Path, PathBuf},
    process,
};

use anstyle::{AnsiColor, Color, Style};
use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use epd_config::{RawDocument, ResolvedConfig, defines::Defines, schema::SCHEMA};
use epd_config_commands::Printer;
use tracing_subscriber::EnvFilter;

/// Validates the weather display configuration and generates build defines.
#[derive(Debug, Parser)]
#[command(name = "epd-config", version, about, disable_help_subcommand = true)]
enum Cli {
    /// Prints help on configuration fields.
    Help {
        /// Only output fields whose name contains this substring.
        filter: Option<String>,
    },
    /// Checks configuration files and prints resolved values with their origins.
    Check {
        /// Configuration files (JSON or YAML); later files override earlier ones.
        #[arg(required = true)]
        configs: Vec<PathBuf>,
        /// Only output fields whose name contains this substring.
        #[arg(long)]
        filter: Option<String>,
        /// Additionally dump the resolved config (with secrets redacted) to stdout.
        #[arg(long, value_enum)]
        print: Option<DumpFormat>,
    },
    /// Generates build defines from configuration files.
    Defines {
        /// Configuration files (JSON or YAML); later files override earlier ones.
        #[arg(required = true)]
        configs: Vec<PathBuf>,
        /// Output format.
        #[arg(long, value_enum, default_value_t = DefinesFormat::Header)]
        format: DefinesFormat,
        /// Output file. If not specified, defines are written to stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DumpFormat {
    Json,
    Yaml,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DefinesFormat {
    /// C header with an include guard.
    Header,
    /// Compiler flags, one per line.
    Flags,
    /// JSON object.
    Json,
}

const ERROR: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red)));

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(err) = cli.run() {
        anstream::eprintln!("{ERROR}{err:#}{ERROR:#}");
        process::exit(1);
    }
}

fn name_filter(filter: Option<&str>) -> impl Fn(&epd_config::metadata::FieldMetadata) -> bool + '_ {
    move |field| filter.is_none_or(|needle| field.name.contains(needle))
}

fn load_document(paths: &[PathBuf]) -> anyhow::Result<RawDocument> {
    paths
        .iter()
        .try_fold(RawDocument::new(), |document, path| document.with_file(path))
}

fn resolve_or_exit(document: &RawDocument) -> ResolvedConfig {
    match epd_config::resolve(document) {
        Ok(config) => config,
        Err(err) => {
            anstream::eprintln!("{ERROR}Configuration is invalid:\n{err}{ERROR:#}");
            process::exit(1);
        }
    }
}

impl Cli {
    fn run(self) -> anyhow::Result<()> {
        match self {
            Self::Help { filter } => {
                Printer::stderr().print_help(&SCHEMA, name_filter(filter.as_deref()))?;
            }
            Self::Check {
                configs,
                filter,
                print,
            } => {
                let document = load_document(&configs)?;
                let result =
                    Printer::stderr().print_debug(&SCHEMA, &document, name_filter(filter.as_deref()))?;
                let config = match result {
                    Ok(config) => config,
                    Err(err) => {
                        let message = match &err {
                            epd_config::ResolveError::Fields(errors) => {
                                format!("{} field(s) failed to resolve", errors.len())
                            }
                            epd_config::ResolveError::Validation(violations) => {
                                format!("{} cross-field rule(s) violated", violations.len())
                            }
                        };
                        anstream::eprintln!("\n{ERROR}Configuration is invalid: {message}{ERROR:#}");
                        process::exit(1);
                    }
                };

                if let Some(format) = print {
                    let json = serde_json::to_value(&config)?;
                    let mut printer = Printer::stdout();
                    match format {
                        DumpFormat::Json => printer.print_json(&json)?,
                        DumpFormat::Yaml => printer.print_yaml(&json)?,
                    }
                }
            }
            Self::Defines {
                configs,
                format,
                output,
            } => {
                let document = load_document(&configs)?;
                let config = resolve_or_exit(&document);
                let defines = Defines::from_config(&config);
                let rendered = match format {
                    DefinesFormat::Header => defines.to_header(),
                    DefinesFormat::Flags => defines.to_flags(),
                    DefinesFormat::Json => serde_json::to_string_pretty(&defines)? + "\n",
                };
                write_output(output.as_deref(), &rendered)?;
                tracing::info!(count = defines.len(), "Generated build defines");
            }
        }
        Ok(())
    }
}

fn write_output(path: Option<&Path>, contents: &str) -> anyhow::Result<()> {
    if let Some(path) = path {
        fs::write(path, contents)
            .with_context(|| format!("failed writing defines to `{}`", path.display()))
    } else {
        io::stdout()
            .lock()
            .write_all(contents.as_bytes())
            .context("failed writing defines to stdout")
    }
}
