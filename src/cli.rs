//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::{
    build_engine_config, build_output_config, validate_engine_config, EngineConfig,
};
use crate::domain::error::KlineError;
use crate::domain::indicator::{parse_indicator, parse_indicator_list, Indicator};
use crate::domain::pipeline::IndicatorPipeline;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "klinecalc", about = "Technical indicator calculator for OHLCV bars")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute indicators for one instrument and write them as CSV
    Compute {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        code: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Indicator expression, e.g. "MACD(12,26,9)"; replaces the configured list
        #[arg(short = 'i', long = "indicator")]
        indicators: Vec<String>,
        #[arg(long)]
        section: Option<String>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Print the keys an indicator expression writes
    Keys {
        expression: String,
        #[arg(long)]
        section: Option<String>,
    },
    /// List instruments available in the data directory
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Compute {
            config,
            code,
            output,
            indicators,
            section,
        } => run_compute(
            &config,
            code.as_deref(),
            output.as_deref(),
            &indicators,
            section.as_deref(),
        ),
        Command::Validate { config } => run_validate(&config),
        Command::Keys {
            expression,
            section,
        } => run_keys(&expression, section.as_deref()),
        Command::ListSymbols { config } => run_list_symbols(&config),
    }
}

fn fail(err: &KlineError) -> ExitCode {
    error!("{err}");
    ExitCode::from(err)
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, KlineError> {
    FileConfigAdapter::from_file(path).map_err(|e| KlineError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Apply command-line overrides on top of the file configuration.
pub fn apply_overrides(
    mut engine: EngineConfig,
    code: Option<&str>,
    indicators: &[String],
    section: Option<&str>,
) -> Result<EngineConfig, KlineError> {
    if let Some(code) = code {
        engine.code = Some(code.to_string());
    }
    if !indicators.is_empty() {
        engine.indicators = indicators
            .iter()
            .map(|s| parse_indicator(s))
            .collect::<Result<Vec<Indicator>, _>>()?;
    }
    if let Some(section) = section {
        engine.section = Some(section.to_string()).filter(|s| !s.is_empty());
    }
    Ok(engine)
}

/// Fetch, compute and report one instrument. Returns the number of bars written.
pub fn run_compute_pipeline(
    data: &dyn DataPort,
    report: &dyn ReportPort,
    engine: &EngineConfig,
    out: &mut dyn Write,
) -> Result<usize, KlineError> {
    let code = engine.code.as_deref().ok_or_else(|| KlineError::ConfigMissing {
        section: "data".to_string(),
        key: "code".to_string(),
    })?;

    let mut bars = data.fetch_ohlcv(code)?;
    if bars.is_empty() {
        return Err(KlineError::NoData {
            code: code.to_string(),
        });
    }
    info!(code, bars = bars.len(), "loaded bars");

    let mut pipeline = IndicatorPipeline::from_indicators(&engine.indicators);
    if let Some(section) = engine.section.as_deref() {
        pipeline = pipeline.with_section(section);
    }
    pipeline.run(&mut bars)?;

    let keys = pipeline.output_keys();
    report.write_report(&bars, &keys, out)?;
    Ok(bars.len())
}

fn run_compute(
    config_path: &Path,
    code: Option<&str>,
    output: Option<&Path>,
    indicators: &[String],
    section: Option<&str>,
) -> ExitCode {
    info!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(e) => return fail(&e),
    };

    let prepared = build_engine_config(&adapter)
        .and_then(|engine| apply_overrides(engine, code, indicators, section))
        .and_then(|engine| build_output_config(&adapter).map(|output| (engine, output)));
    let (engine, output_config) = match prepared {
        Ok(p) => p,
        Err(e) => return fail(&e),
    };

    let data = CsvAdapter::new(engine.data_path.clone());
    let report = CsvReportAdapter::new(output_config.include_ohlcv, output_config.precision);

    let result = match output {
        Some(path) => File::create(path)
            .map_err(KlineError::from)
            .and_then(|file| {
                let mut writer = BufWriter::new(file);
                run_compute_pipeline(&data, &report, &engine, &mut writer)
            }),
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            run_compute_pipeline(&data, &report, &engine, &mut lock)
        }
    };

    match result {
        Ok(count) => {
            match output {
                Some(path) => info!("Wrote {} bars to {}", count, path.display()),
                None => info!("Wrote {} bars", count),
            }
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

fn run_validate(config_path: &Path) -> ExitCode {
    info!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(e) => return fail(&e),
    };

    if let Err(e) = validate_engine_config(&adapter) {
        return fail(&e);
    }

    let engine = match build_engine_config(&adapter) {
        Ok(engine) => engine,
        Err(e) => return fail(&e),
    };

    println!("Indicators:");
    for indicator in &engine.indicators {
        println!("  {}", indicator);
    }
    println!("Data path: {}", engine.data_path.display());
    if let Some(code) = &engine.code {
        println!("Code: {}", code);
    }
    if let Some(section) = &engine.section {
        println!("Section: {}", section);
    }
    println!("Configuration is valid");
    ExitCode::SUCCESS
}

/// Keys an indicator expression writes, after the same parameter checks
/// `compute` applies.
pub fn expression_keys(expression: &str, section: Option<&str>) -> Result<Vec<String>, KlineError> {
    let indicators = parse_indicator_list(expression)?;
    for indicator in &indicators {
        indicator.validate_params()?;
    }

    let mut pipeline = IndicatorPipeline::from_indicators(&indicators);
    if let Some(section) = section {
        pipeline = pipeline.with_section(section);
    }
    Ok(pipeline.output_keys())
}

fn run_keys(expression: &str, section: Option<&str>) -> ExitCode {
    match expression_keys(expression, section) {
        Ok(keys) => {
            for key in keys {
                println!("{}", key);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            if let KlineError::IndicatorParse(parse_err) = &e {
                eprintln!("{}", parse_err.display_with_context(expression));
            }
            fail(&e)
        }
    }
}

fn run_list_symbols(config_path: &Path) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(e) => return fail(&e),
    };
    let engine = match build_engine_config(&adapter) {
        Ok(engine) => engine,
        Err(e) => return fail(&e),
    };

    match CsvAdapter::new(engine.data_path).list_symbols() {
        Ok(symbols) => {
            for symbol in &symbols {
                println!("{}", symbol);
            }
            info!("{} symbols found", symbols.len());
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}
