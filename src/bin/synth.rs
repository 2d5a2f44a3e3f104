//! Synth CLI - Command-line interface for Synheart Synth
//!
//! Commands:
//! - generate: Generate a synthetic bundle for a date range
//! - get: Serve one data type through a device facade
//! - config: Print the default configuration

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use synheart_synth::devices::{BiostrapEvo, DataType, Device};
use synheart_synth::encoder::BundleEncoder;
use synheart_synth::{
    logging, DateRange, DeviceConfig, SynthConfig, SyntheticGenerator, SYNTH_VERSION,
};

/// Synth - Deterministic synthetic wearable biometrics
#[derive(Parser)]
#[command(name = "synth")]
#[command(author = "Synheart AI Inc")]
#[command(version = SYNTH_VERSION)]
#[command(about = "Generate synthetic wearable biometrics", long_about = None)]
struct Cli {
    /// Default log level (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a synthetic bundle for an inclusive date range
    Generate {
        /// First day (YYYY-MM-DD)
        #[arg(long)]
        start: String,

        /// Last day (YYYY-MM-DD)
        #[arg(long)]
        end: String,

        /// Random seed
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Generator configuration (TOML)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Output format (pretty JSON on a terminal, compact JSON otherwise)
        #[arg(long)]
        output_format: Option<OutputFormat>,
    },

    /// Serve one data type from a synthetic device
    Get {
        /// Data type (bpm, brpm, hrv, spo2, steps, distance, total_cals, ...)
        data_type: String,

        /// First day of the requested slice (defaults to the synthetic start)
        #[arg(long)]
        start: Option<String>,

        /// Last day of the requested slice (defaults to the synthetic end)
        #[arg(long)]
        end: Option<String>,

        /// First day of the device's synthetic data
        #[arg(long)]
        synthetic_start: Option<String>,

        /// Last day of the device's synthetic data
        #[arg(long)]
        synthetic_end: Option<String>,

        /// Seed for the device's synthetic data
        #[arg(long)]
        seed: Option<u64>,

        /// Device configuration (TOML)
        #[arg(long)]
        device_config: Option<PathBuf>,

        /// Output format
        #[arg(long)]
        output_format: Option<OutputFormat>,
    },

    /// Print the default device configuration as TOML
    Config,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Compact JSON
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_with_level(&cli.log_level);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<(), SynthCliError> {
    match command {
        Commands::Generate {
            start,
            end,
            seed,
            config,
            output,
            output_format,
        } => cmd_generate(&start, &end, seed, config.as_deref(), &output, output_format),

        Commands::Get {
            data_type,
            start,
            end,
            synthetic_start,
            synthetic_end,
            seed,
            device_config,
            output_format,
        } => {
            let mut config = match device_config {
                Some(path) => DeviceConfig::load_from_path(path)?,
                None => DeviceConfig::default(),
            };
            if let Some(date) = synthetic_start {
                config.synthetic_start_date = date;
            }
            if let Some(date) = synthetic_end {
                config.synthetic_end_date = date;
            }
            if let Some(seed) = seed {
                config.seed = seed;
            }
            cmd_get(&data_type, start.as_deref(), end.as_deref(), config, output_format)
        }

        Commands::Config => cmd_config(),
    }
}

fn cmd_generate(
    start: &str,
    end: &str,
    seed: u64,
    config: Option<&Path>,
    output: &Path,
    output_format: Option<OutputFormat>,
) -> Result<(), SynthCliError> {
    let config = match config {
        Some(path) => SynthConfig::load_from_path(path)?,
        None => SynthConfig::default(),
    };

    let generator = SyntheticGenerator::new(config)?;
    let bundle = generator.generate(start, end, seed)?;
    let payload = BundleEncoder::new().encode(&bundle, Some(seed));

    let to_stdout = output.to_string_lossy() == "-";
    let output_data = format_output(&payload, output_format, to_stdout)?;

    if to_stdout {
        println!("{}", output_data);
    } else {
        fs::write(output, output_data)?;
    }

    Ok(())
}

fn cmd_get(
    data_type: &str,
    start: Option<&str>,
    end: Option<&str>,
    config: DeviceConfig,
    output_format: Option<OutputFormat>,
) -> Result<(), SynthCliError> {
    let data_type: DataType = data_type.parse()?;
    let mut device = BiostrapEvo::new(config)?;
    let synthetic = device.synthetic_range();

    let range = match (start, end) {
        (None, None) => None,
        (start, end) => Some(DateRange::parse(
            start.unwrap_or(&synthetic.start().to_string()),
            end.unwrap_or(&synthetic.end().to_string()),
        )?),
    };

    let data = device.get_data(data_type, range)?;
    let output_data = format_output(&data.to_json()?, output_format, true)?;
    println!("{}", output_data);

    Ok(())
}

fn cmd_config() -> Result<(), SynthCliError> {
    print!("{}", DeviceConfig::default().to_toml_string()?);
    Ok(())
}

// Helper functions

fn format_output<T: serde::Serialize>(
    value: &T,
    format: Option<OutputFormat>,
    to_stdout: bool,
) -> Result<String, SynthCliError> {
    let format = format.unwrap_or_else(|| {
        if to_stdout && atty::is(atty::Stream::Stdout) {
            OutputFormat::JsonPretty
        } else {
            OutputFormat::Json
        }
    });

    match format {
        OutputFormat::Json => Ok(serde_json::to_string(value)?),
        OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
    }
}

// Error types

#[derive(Debug)]
enum SynthCliError {
    Io(io::Error),
    Synth(synheart_synth::SynthError),
    Json(serde_json::Error),
}

impl From<io::Error> for SynthCliError {
    fn from(e: io::Error) -> Self {
        SynthCliError::Io(e)
    }
}

impl From<synheart_synth::SynthError> for SynthCliError {
    fn from(e: synheart_synth::SynthError) -> Self {
        SynthCliError::Synth(e)
    }
}

impl From<serde_json::Error> for SynthCliError {
    fn from(e: serde_json::Error) -> Self {
        SynthCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<SynthCliError> for CliError {
    fn from(e: SynthCliError) -> Self {
        use synheart_synth::SynthError;

        match e {
            SynthCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            SynthCliError::Synth(e @ SynthError::InvalidRange(_)) => CliError {
                code: "INVALID_RANGE".to_string(),
                message: e.to_string(),
                hint: Some("Dates are YYYY-MM-DD and start must not be after end".to_string()),
            },
            SynthCliError::Synth(e @ SynthError::UnsupportedDataType(_)) => CliError {
                code: "UNSUPPORTED_DATA_TYPE".to_string(),
                message: e.to_string(),
                hint: Some(format!(
                    "Supported: {}",
                    DataType::ALL
                        .iter()
                        .map(|dt| dt.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                )),
            },
            SynthCliError::Synth(e @ (SynthError::Config(_) | SynthError::Toml(_))) => CliError {
                code: "CONFIG_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Run 'synth config' for a valid starting point".to_string()),
            },
            SynthCliError::Synth(e) => CliError {
                code: "SYNTH_ERROR".to_string(),
                message: e.to_string(),
                hint: None,
            },
            SynthCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: None,
            },
        }
    }
}
