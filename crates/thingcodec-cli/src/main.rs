//! Command-line harness for thingcodec device codecs.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, warn};

use thingcodec_core::config::LoggingConfig;
use thingcodec_core::logging;
use thingcodec_core::prelude::*;
use thingcodec_devices::devices::thermostat::{
    SET_COOLING_THRESHOLD_TOPIC, SET_HEATING_THRESHOLD_TOPIC,
};
use thingcodec_devices::CodecRegistry;

/// Environment prefix for configuration overrides (`THINGCODEC__LOGGING__LEVEL=debug`)
const ENV_PREFIX: &str = "thingcodec";

/// thingcodec - drive smart home device codecs from the command line.
#[derive(Parser, Debug)]
#[command(name = "thingcodec")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Action to perform.
    #[command(subcommand)]
    command: Command,

    /// Verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Show the properties a device model's codec converts.
    Properties {
        /// Device model code (th6320zw, yrd226, zse44).
        #[arg(short, long)]
        model: DeviceModel,
    },
    /// Run encode/decode instructions against a configured accessory.
    Run {
        /// Configuration file.
        #[arg(short, long)]
        config: PathBuf,
        /// Accessory name from the configuration.
        #[arg(short, long)]
        accessory: String,
        /// Instruction script; stdin when omitted.
        #[arg(short, long)]
        script: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Command::Properties { model } => {
            init_logging(args.verbose, &LoggingConfig::default())?;
            print_properties(model, &mut io::stdout().lock())
        }
        Command::Run {
            config,
            accessory,
            script,
        } => {
            let config = ConfigBuilder::new()
                .with_config_file(&config)
                .with_environment_prefix(ENV_PREFIX)
                .build()?;
            init_logging(args.verbose, &config.logging)?;

            let input: Box<dyn BufRead> = match script {
                Some(path) => Box::new(BufReader::new(
                    File::open(&path)
                        .with_context(|| format!("Failed to open script {}", path.display()))?,
                )),
                None => Box::new(io::stdin().lock()),
            };

            run(&config, &accessory, input, &mut io::stdout().lock())
        }
    }
}

fn init_logging(verbose: bool, config: &LoggingConfig) -> Result<()> {
    if verbose {
        logging::init_forced(&verbose_logging(config))?;
    } else {
        logging::init_from_config(config)?;
    }
    Ok(())
}

/// `--verbose` forces debug level but keeps the configured output format
fn verbose_logging(config: &LoggingConfig) -> LoggingConfig {
    LoggingConfig {
        level: "debug".to_string(),
        ..config.clone()
    }
}

fn print_properties(model: DeviceModel, out: &mut impl Write) -> Result<()> {
    let bus = Arc::new(RecordingBus::new());
    // Placeholder topics so codecs that need them can be built for inspection
    let accessory = AccessoryConfig::new(model.as_str(), model)
        .with_topic(SET_HEATING_THRESHOLD_TOPIC, "-")
        .with_topic(SET_COOLING_THRESHOLD_TOPIC, "-");
    let codec = CodecRegistry::with_defaults().create(CodecContext::new(
        accessory,
        bus.clone(),
        bus,
    ))?;

    writeln!(out, "{} ({})", model, model.description())?;
    writeln!(out, "{:<32} {:<7} {:<7}", "PROPERTY", "ENCODE", "DECODE")?;
    for binding in codec.properties() {
        writeln!(
            out,
            "{:<32} {:<7} {:<7}",
            binding.property,
            yes_no(binding.encodes),
            yes_no(binding.decodes)
        )?;
    }
    Ok(())
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

/// One line of an instruction script
#[derive(Debug, Clone, PartialEq)]
struct Instruction {
    direction: Direction,
    property: String,
    payload: Value,
}

impl FromStr for Instruction {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let mut parts = line.trim().splitn(3, char::is_whitespace);
        let direction = parts
            .next()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| anyhow!("missing direction"))?;
        let direction = Direction::from_str(direction)?;
        let property = parts
            .next()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| anyhow!("missing property"))?
            .to_string();
        let payload = parts
            .next()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| anyhow!("missing payload"))?;

        Ok(Self {
            direction,
            property,
            payload: parse_payload(payload),
        })
    }
}

/// A JSON scalar when the payload parses as one, otherwise the raw text
fn parse_payload(payload: &str) -> Value {
    serde_json::from_str(payload).unwrap_or_else(|_| Value::from(payload))
}

/// Parse a script line; `None` for blank lines and comments
fn parse_line(line: &str) -> Option<Result<Instruction>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    Some(line.parse())
}

fn run(config: &Config, name: &str, input: impl BufRead, out: &mut impl Write) -> Result<()> {
    let bus = RecordingBus::new();
    let accessory = config.accessory(name)?.clone();
    let registry = CodecRegistry::with_defaults();
    let mut codec = registry.create(CodecContext::new(
        accessory,
        Arc::new(bus.clone()),
        Arc::new(bus.clone()),
    ))?;

    execute(&mut codec, &bus, input, out)
}

/// Apply every instruction in `input` to `codec`, writing each result and its side effects
fn execute(
    codec: &mut dyn Codec,
    bus: &RecordingBus,
    input: impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    for (index, line) in input.lines().enumerate() {
        let line = line?;
        let instruction = match parse_line(&line) {
            None => continue,
            Some(Ok(instruction)) => instruction,
            Some(Err(e)) => {
                warn!(line = index + 1, "Skipping malformed line: {}", e);
                writeln!(out, "! line {}: {}", index + 1, e)?;
                continue;
            }
        };

        debug!(?instruction, "Applying instruction");
        let result = match instruction.direction {
            Direction::Encode => codec.encode(&instruction.property, &instruction.payload),
            Direction::Decode => codec.decode(&instruction.property, &instruction.payload),
        };

        match result {
            Some(value) => writeln!(out, "{}", value)?,
            None => writeln!(out, "-")?,
        }
        for delivery in bus.take() {
            writeln!(out, "  {}", delivery)?;
        }
    }

    out.flush()?;
    Ok(())
}
