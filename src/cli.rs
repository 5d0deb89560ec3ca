//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::{CsvAdapter, TIME_FORMAT};
use crate::adapters::fast_tester_adapter::{DEFAULT_WORKLOAD_BARS, FastTester, MIN_WORKLOAD_BARS};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::ini_compiler_adapter::IniCompiler;
use crate::domain::admission::AdmissionPipeline;
use crate::domain::error::QuantgateError;
use crate::domain::grammar::{DecimalSeparator, Grammar};
use crate::domain::inference::infer_with_default;
use crate::domain::ohlcv::Bar;
use crate::domain::row_parser;
use crate::ports::bar_export_port::BarExportPort;
use crate::ports::config_port::ConfigPort;

#[derive(Parser, Debug)]
#[command(
    name = "quantgate",
    about = "OHLCV format inference and indicator plugin admission"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Infer the layout of a price file
    Inspect {
        #[arg(short, long)]
        file: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Parse a price file into bars
    Parse {
        #[arg(short, long)]
        file: PathBuf,
        /// Write the bars as CSV instead of printing them
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Compile, check and register indicator sources
    Admit {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

/// Values read from the optional configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// `[parser] decimal_separator`. Reported as the file's convention when no
    /// price carries a fractional part; it never changes how a price is read.
    pub decimal_separator: DecimalSeparator,
    pub builtin_names: Vec<String>,
    pub quick_check_bars: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            decimal_separator: DecimalSeparator::default(),
            builtin_names: Vec::new(),
            quick_check_bars: DEFAULT_WORKLOAD_BARS,
        }
    }
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Inspect { file, config } => run_inspect(&file, config.as_ref()),
        Command::Parse {
            file,
            output,
            config,
        } => run_parse(&file, output.as_ref(), config.as_ref()),
        Command::Admit { config, files } => run_admit(&files, config.as_ref()),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = QuantgateError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Loads settings from `config_path`, or the defaults when none is given.
pub fn load_settings(config_path: Option<&PathBuf>) -> Result<Settings, ExitCode> {
    let Some(path) = config_path else {
        return Ok(Settings::default());
    };
    let adapter = load_config(path)?;
    read_settings(&adapter).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

pub fn read_settings(config: &dyn ConfigPort) -> Result<Settings, QuantgateError> {
    let decimal_separator = match config.get_string("parser", "decimal_separator") {
        None => DecimalSeparator::default(),
        Some(raw) => {
            let mut chars = raw.trim().chars();
            let separator = match (chars.next(), chars.next()) {
                (Some(c), None) => DecimalSeparator::from_char(c),
                _ => None,
            };
            separator.ok_or_else(|| QuantgateError::ConfigInvalid {
                section: "parser".into(),
                key: "decimal_separator".into(),
                reason: format!("expected '.' or ',', got '{}'", raw.trim()),
            })?
        }
    };

    let builtin_names = config
        .get_string("plugins", "builtin_names")
        .map(|raw| parse_names(&raw))
        .unwrap_or_default();

    let bars = config.get_int("plugins", "quick_check_bars", DEFAULT_WORKLOAD_BARS as i64);
    if bars < MIN_WORKLOAD_BARS as i64 {
        return Err(QuantgateError::ConfigInvalid {
            section: "plugins".into(),
            key: "quick_check_bars".into(),
            reason: format!("must be at least {MIN_WORKLOAD_BARS}, got {bars}"),
        });
    }

    Ok(Settings {
        decimal_separator,
        builtin_names,
        quick_check_bars: bars as usize,
    })
}

/// Splits a comma-separated name list, dropping blanks.
pub fn parse_names(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect()
}

pub fn build_pipeline(settings: &Settings) -> AdmissionPipeline {
    AdmissionPipeline::new(
        Box::new(IniCompiler::new()),
        Box::new(FastTester::new(settings.quick_check_bars)),
        settings.builtin_names.iter().cloned(),
    )
}

/// Infers the grammar of `text` and parses it, honouring the configured
/// default decimal separator.
pub fn infer_and_parse(
    text: &str,
    settings: &Settings,
) -> Result<(Grammar, Vec<Bar>), QuantgateError> {
    let grammar = infer_with_default(text, settings.decimal_separator)?;
    let bars = row_parser::parse(text, &grammar)?;
    Ok((grammar, bars))
}

fn read_price_file(path: &PathBuf) -> Result<String, ExitCode> {
    fs::read_to_string(path).map_err(|e| {
        let err = QuantgateError::Io(e);
        eprintln!("error: cannot read {}: {err}", path.display());
        ExitCode::from(&err)
    })
}

fn run_inspect(file: &PathBuf, config_path: Option<&PathBuf>) -> ExitCode {
    let settings = match load_settings(config_path) {
        Ok(s) => s,
        Err(code) => return code,
    };
    let text = match read_price_file(file) {
        Ok(t) => t,
        Err(code) => return code,
    };

    match infer_and_parse(&text, &settings) {
        Ok((grammar, bars)) => {
            println!("date order:        {}", grammar.date_order);
            println!("price layout:      {}", grammar.price_layout);
            println!("decimal separator: {}", grammar.decimal_separator);
            println!("rows:              {}", bars.len());
            if let (Some(first), Some(last)) = (bars.first(), bars.last()) {
                println!(
                    "range:             {} .. {}",
                    first.time.format(TIME_FORMAT),
                    last.time.format(TIME_FORMAT)
                );
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_parse(
    file: &PathBuf,
    output_path: Option<&PathBuf>,
    config_path: Option<&PathBuf>,
) -> ExitCode {
    let settings = match load_settings(config_path) {
        Ok(s) => s,
        Err(code) => return code,
    };
    let text = match read_price_file(file) {
        Ok(t) => t,
        Err(code) => return code,
    };

    let (grammar, bars) = match infer_and_parse(&text, &settings) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    eprintln!("Parsed {} bars ({grammar})", bars.len());

    match output_path {
        Some(path) => {
            if let Err(e) = CsvAdapter::new().write(&bars, path) {
                eprintln!("error: {e}");
                return (&e).into();
            }
            eprintln!("Bars written to {}", path.display());
        }
        None => {
            for bar in &bars {
                println!(
                    "{},{},{},{},{},{}",
                    bar.time.format(TIME_FORMAT),
                    bar.open,
                    bar.high,
                    bar.low,
                    bar.close,
                    bar.volume
                );
            }
        }
    }
    ExitCode::SUCCESS
}

fn run_admit(files: &[PathBuf], config_path: Option<&PathBuf>) -> ExitCode {
    let settings = match load_settings(config_path) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let mut pipeline = build_pipeline(&settings);
    let results = pipeline.admit_all(files);

    let mut first_failure = None;
    for err in results.into_iter().filter_map(Result::err) {
        eprintln!("{err}");
        first_failure.get_or_insert(err);
    }

    let registry = pipeline.registry();
    eprintln!("{} of {} indicator(s) admitted", registry.len(), files.len());
    for name in registry.names() {
        println!("{name}");
    }

    match first_failure {
        Some(err) => ExitCode::from(&QuantgateError::Admission(err)),
        None => ExitCode::SUCCESS,
    }
}
